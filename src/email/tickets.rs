use super::layout::{button, compose, details_table, details_text, escape_html, greeting};
use super::{Branding, EmailContent};
use crate::domain::model::TicketStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReplyData {
    pub name: String,
    pub ticket_number: String,
    pub subject: String,
    pub reply_author: String,
    pub reply_message: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub ticket_url: Option<String>,
}

fn status_label(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "Open",
        TicketStatus::InProgress => "In progress",
        TicketStatus::WaitingUser => "Waiting for your reply",
        TicketStatus::Resolved => "Resolved",
        TicketStatus::Closed => "Closed",
    }
}

/// 多行回覆轉成段落
fn message_html(message: &str) -> String {
    message
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("<p>{}</p>", escape_html(p.trim()).replace('\n', "<br />")))
        .collect()
}

pub fn ticket_reply(data: &TicketReplyData, branding: &Branding) -> EmailContent {
    let subject = format!("[#{}] {}", data.ticket_number, data.subject);
    let url = data.ticket_url.as_deref().unwrap_or(&branding.dashboard_url);

    let rows = [
        ("Ticket", format!("#{}", data.ticket_number)),
        ("Status", status_label(data.status).to_string()),
    ];

    let action = if data.status == TicketStatus::WaitingUser {
        "<p>We need more information from you to continue. Reply from the ticket page.</p>"
    } else {
        ""
    };

    let html = format!(
        r#"<h1>New reply on your ticket</h1>
<p>{greeting}</p>
<p><strong>{author}</strong> replied to <strong>{subject}</strong>:</p>
<div class="quote">{message}</div>
{table}
{action}
{button}"#,
        greeting = escape_html(&greeting(&data.name)),
        author = escape_html(&data.reply_author),
        subject = escape_html(&data.subject),
        message = message_html(&data.reply_message),
        table = details_table(&rows),
        action = action,
        button = button(url, "View ticket"),
    );

    let text = format!(
        "{greeting}\n\n{author} replied to \"{subject}\":\n\n{message}\n\n{details}\n\nView the ticket: {url}",
        greeting = greeting(&data.name),
        author = data.reply_author,
        subject = data.subject,
        message = data.reply_message.trim(),
        details = details_text(&rows),
        url = url,
    );

    compose(subject, &html, &text, branding)
}
