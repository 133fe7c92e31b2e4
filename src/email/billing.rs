use super::layout::{
    alert, button, compose, details_table, details_text, escape_html, format_date, format_money,
    greeting, AlertKind,
};
use super::{Branding, EmailContent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "USD".to_string()
}

/// 低餘額與零餘額通知共用
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAlertData {
    pub name: String,
    pub balance: f64,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// 餘額不足時可能受影響的號碼數
    #[serde(default)]
    pub active_numbers: usize,
    #[serde(default)]
    pub top_up_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmationData {
    pub name: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub new_balance: f64,
    pub transaction_id: String,
    pub payment_method: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFailedData {
    pub name: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub reason: String,
    #[serde(default)]
    pub retry_url: Option<String>,
}

fn top_up_url<'a>(data: &'a BalanceAlertData, branding: &'a Branding) -> &'a str {
    data.top_up_url.as_deref().unwrap_or(&branding.dashboard_url)
}

pub fn low_balance_alert(data: &BalanceAlertData, branding: &Branding) -> EmailContent {
    let balance = format_money(data.balance, &data.currency);
    let threshold = format_money(data.threshold, &data.currency);
    let subject = format!("Low balance: {} remaining", balance);

    let rows = [
        ("Current balance", balance.clone()),
        ("Alert threshold", threshold),
        ("Active numbers", data.active_numbers.to_string()),
    ];

    let html = format!(
        r#"<h1>Your balance is running low</h1>
<p>{greeting}</p>
{notice}
{table}
<p>Top up now to keep your phone numbers active. Monthly renewals are charged from your balance.</p>
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Warning,
            &format!(
                "<p>Your account balance is <strong>{}</strong>, below your alert threshold.</p>",
                escape_html(&balance)
            )
        ),
        table = details_table(&rows),
        button = button(top_up_url(data, branding), "Add funds"),
    );

    let text = format!(
        "{greeting}\n\nYour account balance is {balance}, below your alert threshold.\n\n{details}\n\nTop up now to keep your phone numbers active: {url}",
        greeting = greeting(&data.name),
        balance = balance,
        details = details_text(&rows),
        url = top_up_url(data, branding),
    );

    compose(subject, &html, &text, branding)
}

pub fn zero_balance_alert(data: &BalanceAlertData, branding: &Branding) -> EmailContent {
    let balance = format_money(data.balance, &data.currency);
    let subject = "Action required: your balance is empty".to_string();

    let at_risk = match data.active_numbers {
        0 => "Services that need a balance are paused until you add funds.".to_string(),
        1 => "Your phone number will be suspended if the next renewal cannot be charged.".to_string(),
        n => format!(
            "Your {} phone numbers will be suspended if the next renewal cannot be charged.",
            n
        ),
    };

    let html = format!(
        r#"<h1>Your balance has run out</h1>
<p>{greeting}</p>
{notice}
<p>Add funds to avoid interruptions.</p>
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Danger,
            &format!(
                "<p>Your account balance is <strong>{}</strong>.</p><p>{}</p>",
                escape_html(&balance),
                escape_html(&at_risk)
            )
        ),
        button = button(top_up_url(data, branding), "Add funds now"),
    );

    let text = format!(
        "{greeting}\n\nYour account balance is {balance}.\n{at_risk}\n\nAdd funds to avoid interruptions: {url}",
        greeting = greeting(&data.name),
        balance = balance,
        at_risk = at_risk,
        url = top_up_url(data, branding),
    );

    compose(subject, &html, &text, branding)
}

pub fn payment_confirmation(data: &PaymentConfirmationData, branding: &Branding) -> EmailContent {
    let amount = format_money(data.amount, &data.currency);
    let subject = format!("Payment received: {}", amount);

    let rows = [
        ("Amount", amount.clone()),
        ("Payment method", data.payment_method.clone()),
        ("Transaction ID", data.transaction_id.clone()),
        ("Date", format_date(&data.paid_at)),
        ("New balance", format_money(data.new_balance, &data.currency)),
    ];

    let html = format!(
        r#"<h1>Thank you for your payment</h1>
<p>{greeting}</p>
{notice}
{table}
{button}
<p class="muted">Keep this email for your records.</p>"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Success,
            &format!(
                "<p>We received your payment of <strong>{}</strong>.</p>",
                escape_html(&amount)
            )
        ),
        table = details_table(&rows),
        button = button(&branding.dashboard_url, "View billing history"),
    );

    let text = format!(
        "{greeting}\n\nWe received your payment of {amount}.\n\n{details}\n\nKeep this email for your records.",
        greeting = greeting(&data.name),
        amount = amount,
        details = details_text(&rows),
    );

    compose(subject, &html, &text, branding)
}

pub fn payment_failed(data: &PaymentFailedData, branding: &Branding) -> EmailContent {
    let amount = format_money(data.amount, &data.currency);
    let subject = format!("Payment of {} failed", amount);
    let retry = data.retry_url.as_deref().unwrap_or(&branding.dashboard_url);

    let html = format!(
        r#"<h1>We could not process your payment</h1>
<p>{greeting}</p>
{notice}
<p>No money was taken from your account. Please check your payment details and try again.</p>
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Danger,
            &format!(
                "<p>Your payment of <strong>{}</strong> was declined.</p><p>Reason: {}</p>",
                escape_html(&amount),
                escape_html(&data.reason)
            )
        ),
        button = button(retry, "Try again"),
    );

    let text = format!(
        "{greeting}\n\nYour payment of {amount} was declined.\nReason: {reason}\n\nNo money was taken from your account. Try again: {url}",
        greeting = greeting(&data.name),
        amount = amount,
        reason = data.reason,
        url = retry,
    );

    compose(subject, &html, &text, branding)
}
