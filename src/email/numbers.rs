//! 號碼生命週期通知：指派、取消、補訂、停用、續約

use super::layout::{
    alert, button, compose, details_table, details_text, escape_html, format_date, format_money,
    greeting, AlertKind,
};
use super::{Branding, EmailContent};
use crate::domain::model::{Capabilities, NumberType, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberAssignedData {
    pub name: String,
    pub phone_number: String,
    pub country: String,
    pub number_type: NumberType,
    pub monthly_rate: f64,
    #[serde(default)]
    pub setup_fee: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub next_billing_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRequestedData {
    pub name: String,
    pub phone_number: String,
    pub request_id: String,
    pub reason: String,
    #[serde(default)]
    pub priority: Priority,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberCancelledData {
    pub name: String,
    pub phone_number: String,
    pub cancelled_at: DateTime<Utc>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// 補訂核准與拒絕共用
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackorderDecisionData {
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub monthly_rate: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberSuspendedData {
    pub name: String,
    pub phone_number: String,
    pub reason: String,
    #[serde(default)]
    pub amount_due: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalChargedData {
    pub name: String,
    pub phone_number: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub remaining_balance: f64,
    pub next_billing_date: DateTime<Utc>,
}

fn type_label(number_type: NumberType) -> &'static str {
    match number_type {
        NumberType::Local => "Local",
        NumberType::National => "National",
        NumberType::Mobile => "Mobile",
        NumberType::TollFree => "Toll-free",
    }
}

fn notes_html(notes: Option<&str>) -> String {
    notes
        .filter(|n| !n.trim().is_empty())
        .map(|n| format!(r#"<div class="quote"><p>{}</p></div>"#, escape_html(n)))
        .unwrap_or_default()
}

fn notes_text(notes: Option<&str>) -> String {
    notes
        .filter(|n| !n.trim().is_empty())
        .map(|n| format!("\nNotes from our team:\n{}\n", n))
        .unwrap_or_default()
}

pub fn number_assigned(data: &NumberAssignedData, branding: &Branding) -> EmailContent {
    let subject = format!("Your new phone number {} is ready", data.phone_number);

    let capabilities = data.capabilities.labels();
    let mut rows = vec![
        ("Phone number", data.phone_number.clone()),
        ("Country", data.country.clone()),
        ("Type", type_label(data.number_type).to_string()),
        (
            "Capabilities",
            if capabilities.is_empty() {
                "None".to_string()
            } else {
                capabilities.join(", ")
            },
        ),
        ("Monthly rate", format_money(data.monthly_rate, &data.currency)),
    ];
    if data.setup_fee > 0.0 {
        rows.push(("Setup fee", format_money(data.setup_fee, &data.currency)));
    }
    if let Some(next) = &data.next_billing_date {
        rows.push(("Next billing date", format_date(next)));
    }

    let html = format!(
        r#"<h1>Your phone number is active</h1>
<p>{greeting}</p>
{notice}
{table}
<p>You can configure routing for this number from your dashboard.</p>
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Success,
            &format!(
                "<p><strong>{}</strong> has been assigned to your account.</p>",
                escape_html(&data.phone_number)
            )
        ),
        table = details_table(&rows),
        button = button(&branding.dashboard_url, "Configure number"),
    );

    let text = format!(
        "{greeting}\n\n{number} has been assigned to your account.\n\n{details}\n\nConfigure it from your dashboard: {url}",
        greeting = greeting(&data.name),
        number = data.phone_number,
        details = details_text(&rows),
        url = branding.dashboard_url,
    );

    compose(subject, &html, &text, branding)
}

pub fn cancellation_requested(data: &CancellationRequestedData, branding: &Branding) -> EmailContent {
    let subject = format!("Cancellation request received for {}", data.phone_number);

    let rows = [
        ("Phone number", data.phone_number.clone()),
        ("Request ID", data.request_id.clone()),
        ("Priority", data.priority.as_str().to_string()),
        ("Submitted", format_date(&data.requested_at)),
        ("Reason", data.reason.clone()),
    ];

    let html = format!(
        r#"<h1>We received your cancellation request</h1>
<p>{greeting}</p>
<p>Our team will review the request shortly. The number stays active and billable until the cancellation is completed.</p>
{table}
{notice}
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        table = details_table(&rows),
        notice = alert(
            AlertKind::Info,
            "<p>Changed your mind? You can withdraw a pending request from your dashboard.</p>"
        ),
        button = button(&branding.dashboard_url, "View request"),
    );

    let text = format!(
        "{greeting}\n\nWe received your cancellation request. The number stays active and billable until the cancellation is completed.\n\n{details}\n\nYou can withdraw a pending request from your dashboard: {url}",
        greeting = greeting(&data.name),
        details = details_text(&rows),
        url = branding.dashboard_url,
    );

    compose(subject, &html, &text, branding)
}

pub fn number_cancelled(data: &NumberCancelledData, branding: &Branding) -> EmailContent {
    let subject = format!("{} has been cancelled", data.phone_number);
    let date = format_date(&data.cancelled_at);

    let html = format!(
        r#"<h1>Your phone number has been cancelled</h1>
<p>{greeting}</p>
{notice}
{notes}
<p>You will not be charged for this number again. Calls and messages to it are no longer routed to your account.</p>
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Info,
            &format!(
                "<p><strong>{}</strong> was cancelled on {}.</p>",
                escape_html(&data.phone_number),
                escape_html(&date)
            )
        ),
        notes = notes_html(data.admin_notes.as_deref()),
        button = button(&branding.dashboard_url, "Browse numbers"),
    );

    let text = format!(
        "{greeting}\n\n{number} was cancelled on {date}.\n{notes}\nYou will not be charged for this number again.\n\nBrowse numbers: {url}",
        greeting = greeting(&data.name),
        number = data.phone_number,
        date = date,
        notes = notes_text(data.admin_notes.as_deref()),
        url = branding.dashboard_url,
    );

    compose(subject, &html, &text, branding)
}

pub fn backorder_approved(data: &BackorderDecisionData, branding: &Branding) -> EmailContent {
    let subject = format!("Backorder approved: {}", data.phone_number);
    let rate = data
        .monthly_rate
        .map(|rate| format!("The monthly rate is {}.", format_money(rate, &data.currency)))
        .unwrap_or_default();

    let html = format!(
        r#"<h1>Your backorder request was approved</h1>
<p>{greeting}</p>
{notice}
{notes}
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Success,
            &format!(
                "<p>We approved your request for <strong>{}</strong>. {}</p>",
                escape_html(&data.phone_number),
                escape_html(&rate)
            )
        ),
        notes = notes_html(data.admin_notes.as_deref()),
        button = button(&branding.dashboard_url, "View my numbers"),
    );

    let text = format!(
        "{greeting}\n\nWe approved your request for {number}. {rate}\n{notes}\nView your numbers: {url}",
        greeting = greeting(&data.name),
        number = data.phone_number,
        rate = rate,
        notes = notes_text(data.admin_notes.as_deref()),
        url = branding.dashboard_url,
    );

    compose(subject, &html, &text, branding)
}

pub fn backorder_rejected(data: &BackorderDecisionData, branding: &Branding) -> EmailContent {
    let subject = format!("Backorder request for {} was not approved", data.phone_number);

    let html = format!(
        r#"<h1>We could not approve your backorder request</h1>
<p>{greeting}</p>
<p>Your request for <strong>{number}</strong> was not approved.</p>
{notes}
<p>You can search for other available numbers or reply to this email if you have questions.</p>
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        number = escape_html(&data.phone_number),
        notes = notes_html(data.admin_notes.as_deref()),
        button = button(&branding.dashboard_url, "Find another number"),
    );

    let text = format!(
        "{greeting}\n\nYour request for {number} was not approved.\n{notes}\nSearch for other available numbers: {url}",
        greeting = greeting(&data.name),
        number = data.phone_number,
        notes = notes_text(data.admin_notes.as_deref()),
        url = branding.dashboard_url,
    );

    compose(subject, &html, &text, branding)
}

pub fn number_suspended(data: &NumberSuspendedData, branding: &Branding) -> EmailContent {
    let subject = format!("{} has been suspended", data.phone_number);
    let due = data
        .amount_due
        .map(|amount| format!("Amount due: {}", format_money(amount, &data.currency)));

    let html = format!(
        r#"<h1>Your phone number has been suspended</h1>
<p>{greeting}</p>
{notice}
<p>Resolve the issue to restore service. Suspended numbers are released after a grace period.</p>
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Danger,
            &format!(
                "<p><strong>{}</strong> is suspended.</p><p>Reason: {}</p>{}",
                escape_html(&data.phone_number),
                escape_html(&data.reason),
                due.as_deref()
                    .map(|d| format!("<p>{}</p>", escape_html(d)))
                    .unwrap_or_default()
            )
        ),
        button = button(&branding.dashboard_url, "Restore service"),
    );

    let text = format!(
        "{greeting}\n\n{number} is suspended.\nReason: {reason}\n{due}\nResolve the issue to restore service: {url}",
        greeting = greeting(&data.name),
        number = data.phone_number,
        reason = data.reason,
        due = due.map(|d| format!("{}\n", d)).unwrap_or_default(),
        url = branding.dashboard_url,
    );

    compose(subject, &html, &text, branding)
}

pub fn renewal_charged(data: &RenewalChargedData, branding: &Branding) -> EmailContent {
    let amount = format_money(data.amount, &data.currency);
    let subject = format!("Renewal charged for {}", data.phone_number);

    let rows = [
        ("Phone number", data.phone_number.clone()),
        ("Amount charged", amount),
        ("Remaining balance", format_money(data.remaining_balance, &data.currency)),
        ("Next renewal", format_date(&data.next_billing_date)),
    ];

    let html = format!(
        r#"<h1>Your number has been renewed</h1>
<p>{greeting}</p>
<p>The monthly renewal for <strong>{number}</strong> was charged to your balance.</p>
{table}
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        number = escape_html(&data.phone_number),
        table = details_table(&rows),
        button = button(&branding.dashboard_url, "View billing"),
    );

    let text = format!(
        "{greeting}\n\nThe monthly renewal for {number} was charged to your balance.\n\n{details}",
        greeting = greeting(&data.name),
        number = data.phone_number,
        details = details_text(&rows),
    );

    compose(subject, &html, &text, branding)
}
