//! 所有通知信共用的外框、樣式與小工具

use super::inline_css::inline_css;
use super::{Branding, EmailContent};
use chrono::{DateTime, Utc};

const BASE_CSS: &str = r#"
body { margin: 0; padding: 0; background-color: #f4f5f7; font-family: Arial, Helvetica, sans-serif; color: #1f2933 }
table { border-collapse: collapse }
.wrapper { width: 100%; background-color: #f4f5f7; padding: 24px 0 }
.container { width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 8px }
.header { padding: 24px 32px; border-bottom: 1px solid #e4e7eb }
.brand { font-size: 20px; font-weight: bold; color: #1f2933 }
.content { padding: 32px }
h1 { font-size: 22px; margin: 0 0 16px 0; color: #1f2933 }
p { font-size: 15px; line-height: 22px; margin: 0 0 16px 0 }
.muted { color: #7b8794; font-size: 13px }
.btn { display: inline-block; padding: 12px 24px; background-color: #2563eb; color: #ffffff; text-decoration: none; border-radius: 6px; font-weight: bold }
.details { width: 100%; margin: 0 0 16px 0 }
td.label { padding: 8px 0; color: #7b8794; width: 40% }
td.value { padding: 8px 0; font-weight: bold }
.alert { padding: 16px; border-radius: 6px; margin: 0 0 16px 0 }
.alert-info { background-color: #eff6ff; border: 1px solid #bfdbfe }
.alert-warning { background-color: #fffbeb; border: 1px solid #fde68a }
.alert-danger { background-color: #fef2f2; border: 1px solid #fecaca }
.alert-success { background-color: #f0fdf4; border: 1px solid #bbf7d0 }
.quote { border-left: 4px solid #e4e7eb; padding: 8px 16px; margin: 0 0 16px 0; color: #3e4c59 }
.footer { padding: 24px 32px; border-top: 1px solid #e4e7eb; color: #7b8794; font-size: 12px }
@media (max-width: 620px) { .container { width: 100% } .content { padding: 20px } }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Warning,
    Danger,
    Success,
}

impl AlertKind {
    fn class(&self) -> &'static str {
        match self {
            AlertKind::Info => "alert alert-info",
            AlertKind::Warning => "alert alert-warning",
            AlertKind::Danger => "alert alert-danger",
            AlertKind::Success => "alert alert-success",
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 依幣別加上符號，未知幣別以代碼結尾
pub fn format_money(amount: f64, currency: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    match currency.to_ascii_uppercase().as_str() {
        "USD" => format!("{}${:.2}", sign, abs),
        "EUR" => format!("{}€{:.2}", sign, abs),
        "GBP" => format!("{}£{:.2}", sign, abs),
        other => format!("{}{:.2} {}", sign, abs, other),
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn greeting(name: &str) -> String {
    if name.trim().is_empty() {
        "Hello,".to_string()
    } else {
        format!("Hello {},", name.trim())
    }
}

pub fn button(url: &str, label: &str) -> String {
    format!(
        r#"<p><a class="btn" href="{}">{}</a></p>"#,
        escape_html(url),
        escape_html(label)
    )
}

pub fn alert(kind: AlertKind, inner_html: &str) -> String {
    format!(r#"<div class="{}">{}</div>"#, kind.class(), inner_html)
}

/// 兩欄明細表；值會被跳脫
pub fn details_table(rows: &[(&str, String)]) -> String {
    let body: String = rows
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<tr><td class="label">{}</td><td class="value">{}</td></tr>"#,
                escape_html(label),
                escape_html(value)
            )
        })
        .collect();
    format!(r#"<table class="details" role="presentation">{}</table>"#, body)
}

/// 純文字版的明細
pub fn details_text(rows: &[(&str, String)]) -> String {
    rows.iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn header_html(branding: &Branding) -> String {
    match &branding.logo_url {
        Some(logo) => format!(
            r#"<div class="header"><img src="{}" alt="{}" height="32" /></div>"#,
            escape_html(logo),
            escape_html(&branding.company_name)
        ),
        None => format!(
            r#"<div class="header"><span class="brand">{}</span></div>"#,
            escape_html(&branding.company_name)
        ),
    }
}

fn footer_html(branding: &Branding) -> String {
    format!(
        r#"<div class="footer"><p class="muted">Questions? Contact us at <a href="mailto:{email}">{email}</a>.</p><p class="muted">&copy; {company}. You are receiving this email because you have an account with {company}.</p></div>"#,
        email = escape_html(&branding.support_email),
        company = escape_html(&branding.company_name),
    )
}

fn footer_text(branding: &Branding) -> String {
    format!(
        "--\nQuestions? Contact us at {}.\n{}",
        branding.support_email, branding.company_name
    )
}

/// 把內文包進共用外框、內嵌 CSS，並組出完整的郵件內容
pub fn compose(subject: String, body_html: &str, body_text: &str, branding: &Branding) -> EmailContent {
    let document = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<table class="wrapper" role="presentation"><tr><td>
<div class="container">
{header}
<div class="content">
{body}
</div>
{footer}
</div>
</td></tr></table>
</body>
</html>
"#,
        title = escape_html(&subject),
        css = BASE_CSS,
        header = header_html(branding),
        body = body_html,
        footer = footer_html(branding),
    );

    EmailContent {
        subject,
        html: inline_css(&document),
        text: format!("{}\n\n{}\n", body_text.trim_end(), footer_text(branding)),
    }
}
