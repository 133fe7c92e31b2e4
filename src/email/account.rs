use super::layout::{alert, button, compose, escape_html, greeting, AlertKind};
use super::{Branding, EmailContent};
use serde::{Deserialize, Serialize};

fn default_activation_hours() -> u32 {
    24
}

fn default_reset_minutes() -> u32 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountActivationData {
    pub name: String,
    pub email: String,
    pub activation_url: String,
    #[serde(default = "default_activation_hours")]
    pub expires_in_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountActivatedData {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetData {
    pub name: String,
    pub reset_url: String,
    #[serde(default = "default_reset_minutes")]
    pub expires_in_minutes: u32,
    #[serde(default)]
    pub ip_address: Option<String>,
}

pub fn account_activation(data: &AccountActivationData, branding: &Branding) -> EmailContent {
    let subject = format!("Activate your {} account", branding.company_name);

    let html = format!(
        r#"<h1>Confirm your email address</h1>
<p>{greeting}</p>
<p>Thanks for signing up for {company}. Please confirm that <strong>{email}</strong> is your email address to activate your account.</p>
{button}
<p class="muted">This link expires in {hours} hours. If the button does not work, copy this address into your browser:<br />{url}</p>
<p class="muted">If you did not create an account, you can ignore this email.</p>"#,
        greeting = escape_html(&greeting(&data.name)),
        company = escape_html(&branding.company_name),
        email = escape_html(&data.email),
        button = button(&data.activation_url, "Activate account"),
        hours = data.expires_in_hours,
        url = escape_html(&data.activation_url),
    );

    let text = format!(
        "{greeting}\n\nThanks for signing up for {company}. Confirm that {email} is your email address by opening the link below:\n\n{url}\n\nThis link expires in {hours} hours. If you did not create an account, you can ignore this email.",
        greeting = greeting(&data.name),
        company = branding.company_name,
        email = data.email,
        url = data.activation_url,
        hours = data.expires_in_hours,
    );

    compose(subject, &html, &text, branding)
}

pub fn account_activated(data: &AccountActivatedData, branding: &Branding) -> EmailContent {
    let subject = format!("Welcome to {}", branding.company_name);

    let html = format!(
        r#"<h1>Your account is active</h1>
<p>{greeting}</p>
{notice}
<p>From your dashboard you can:</p>
<ul>
<li>Browse and purchase phone numbers</li>
<li>Check the reputation of your numbers</li>
<li>Top up your balance and review payments</li>
<li>Open support tickets</li>
</ul>
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        notice = alert(
            AlertKind::Success,
            &format!(
                "<p>The account for <strong>{}</strong> has been activated.</p>",
                escape_html(&data.email)
            )
        ),
        button = button(&branding.dashboard_url, "Go to dashboard"),
    );

    let text = format!(
        "{greeting}\n\nThe account for {email} has been activated.\n\nFrom your dashboard you can:\n- Browse and purchase phone numbers\n- Check the reputation of your numbers\n- Top up your balance and review payments\n- Open support tickets\n\nDashboard: {url}",
        greeting = greeting(&data.name),
        email = data.email,
        url = branding.dashboard_url,
    );

    compose(subject, &html, &text, branding)
}

pub fn password_reset(data: &PasswordResetData, branding: &Branding) -> EmailContent {
    let subject = format!("Reset your {} password", branding.company_name);

    let origin_html = data
        .ip_address
        .as_deref()
        .map(|ip| {
            format!(
                r#"<p class="muted">The request came from IP address {}.</p>"#,
                escape_html(ip)
            )
        })
        .unwrap_or_default();
    let origin_text = data
        .ip_address
        .as_deref()
        .map(|ip| format!("\nThe request came from IP address {}.", ip))
        .unwrap_or_default();

    let html = format!(
        r#"<h1>Reset your password</h1>
<p>{greeting}</p>
<p>We received a request to reset your password. Use the button below to choose a new one.</p>
{button}
<p class="muted">This link expires in {minutes} minutes.</p>
{origin}
{warning}"#,
        greeting = escape_html(&greeting(&data.name)),
        button = button(&data.reset_url, "Reset password"),
        minutes = data.expires_in_minutes,
        origin = origin_html,
        warning = alert(
            AlertKind::Warning,
            "<p>If you did not ask for a password reset, ignore this email. Your password will not change.</p>"
        ),
    );

    let text = format!(
        "{greeting}\n\nWe received a request to reset your password. Open the link below to choose a new one:\n\n{url}\n\nThis link expires in {minutes} minutes.{origin}\n\nIf you did not ask for a password reset, ignore this email. Your password will not change.",
        greeting = greeting(&data.name),
        url = data.reset_url,
        minutes = data.expires_in_minutes,
        origin = origin_text,
    );

    compose(subject, &html, &text, branding)
}
