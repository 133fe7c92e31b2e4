//! 交易通知信範本。每個範本都是純函式：資料進，`EmailContent` 出。

pub mod account;
pub mod billing;
pub mod inline_css;
pub mod layout;
pub mod numbers;
pub mod samples;
pub mod tickets;

use crate::utils::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use inline_css::inline_css;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// 信件外框用的公司資訊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub company_name: String,
    pub support_email: String,
    pub dashboard_url: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company_name: "Phone Portal".to_string(),
            support_email: "support@example.com".to_string(),
            dashboard_url: "https://portal.example.com/dashboard".to_string(),
            logo_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    AccountActivation,
    AccountActivated,
    PasswordReset,
    LowBalanceAlert,
    ZeroBalanceAlert,
    PaymentConfirmation,
    PaymentFailed,
    NumberAssigned,
    CancellationRequested,
    NumberCancelled,
    BackorderApproved,
    BackorderRejected,
    NumberSuspended,
    RenewalCharged,
    TicketReply,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 15] = [
        TemplateKind::AccountActivation,
        TemplateKind::AccountActivated,
        TemplateKind::PasswordReset,
        TemplateKind::LowBalanceAlert,
        TemplateKind::ZeroBalanceAlert,
        TemplateKind::PaymentConfirmation,
        TemplateKind::PaymentFailed,
        TemplateKind::NumberAssigned,
        TemplateKind::CancellationRequested,
        TemplateKind::NumberCancelled,
        TemplateKind::BackorderApproved,
        TemplateKind::BackorderRejected,
        TemplateKind::NumberSuspended,
        TemplateKind::RenewalCharged,
        TemplateKind::TicketReply,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::AccountActivation => "account-activation",
            TemplateKind::AccountActivated => "account-activated",
            TemplateKind::PasswordReset => "password-reset",
            TemplateKind::LowBalanceAlert => "low-balance-alert",
            TemplateKind::ZeroBalanceAlert => "zero-balance-alert",
            TemplateKind::PaymentConfirmation => "payment-confirmation",
            TemplateKind::PaymentFailed => "payment-failed",
            TemplateKind::NumberAssigned => "number-assigned",
            TemplateKind::CancellationRequested => "cancellation-requested",
            TemplateKind::NumberCancelled => "number-cancelled",
            TemplateKind::BackorderApproved => "backorder-approved",
            TemplateKind::BackorderRejected => "backorder-rejected",
            TemplateKind::NumberSuspended => "number-suspended",
            TemplateKind::RenewalCharged => "renewal-charged",
            TemplateKind::TicketReply => "ticket-reply",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = PortalError;

    /// 接受 kebab-case 或 snake_case
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        TemplateKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| PortalError::TemplateError {
                message: format!("Unknown template '{}'", s),
            })
    }
}

fn parse<T: serde::de::DeserializeOwned>(kind: TemplateKind, data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| PortalError::TemplateError {
        message: format!("Invalid data for {}: {}", kind, e),
    })
}

/// 依範本種類把 JSON 資料轉成對應的資料結構後渲染
pub fn render_template(
    kind: TemplateKind,
    data: serde_json::Value,
    branding: &Branding,
) -> Result<EmailContent> {
    tracing::debug!("Rendering email template {}", kind);

    let email = match kind {
        TemplateKind::AccountActivation => account::account_activation(&parse(kind, data)?, branding),
        TemplateKind::AccountActivated => account::account_activated(&parse(kind, data)?, branding),
        TemplateKind::PasswordReset => account::password_reset(&parse(kind, data)?, branding),
        TemplateKind::LowBalanceAlert => billing::low_balance_alert(&parse(kind, data)?, branding),
        TemplateKind::ZeroBalanceAlert => billing::zero_balance_alert(&parse(kind, data)?, branding),
        TemplateKind::PaymentConfirmation => {
            billing::payment_confirmation(&parse(kind, data)?, branding)
        }
        TemplateKind::PaymentFailed => billing::payment_failed(&parse(kind, data)?, branding),
        TemplateKind::NumberAssigned => numbers::number_assigned(&parse(kind, data)?, branding),
        TemplateKind::CancellationRequested => {
            numbers::cancellation_requested(&parse(kind, data)?, branding)
        }
        TemplateKind::NumberCancelled => numbers::number_cancelled(&parse(kind, data)?, branding),
        TemplateKind::BackorderApproved => {
            numbers::backorder_approved(&parse(kind, data)?, branding)
        }
        TemplateKind::BackorderRejected => {
            numbers::backorder_rejected(&parse(kind, data)?, branding)
        }
        TemplateKind::NumberSuspended => numbers::number_suspended(&parse(kind, data)?, branding),
        TemplateKind::RenewalCharged => numbers::renewal_charged(&parse(kind, data)?, branding),
        TemplateKind::TicketReply => tickets::ticket_reply(&parse(kind, data)?, branding),
    };

    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_kind_parsing() {
        assert_eq!(
            "low_balance_alert".parse::<TemplateKind>().unwrap(),
            TemplateKind::LowBalanceAlert
        );
        assert_eq!(
            "Ticket-Reply".parse::<TemplateKind>().unwrap(),
            TemplateKind::TicketReply
        );
        assert!("newsletter".parse::<TemplateKind>().is_err());
    }

    #[test]
    fn test_render_template_dispatches_by_kind() {
        let email = render_template(
            TemplateKind::AccountActivation,
            json!({
                "name": "Ana",
                "email": "ana@example.com",
                "activationUrl": "https://portal.example.com/activate?t=abc"
            }),
            &Branding::default(),
        )
        .unwrap();

        assert!(email.subject.contains("Activate"));
        assert!(email.html.contains("https://portal.example.com/activate?t=abc"));
    }

    #[test]
    fn test_render_template_reports_missing_fields() {
        let err = render_template(
            TemplateKind::PaymentConfirmation,
            json!({ "name": "Ana" }),
            &Branding::default(),
        )
        .unwrap_err();

        assert!(matches!(err, PortalError::TemplateError { .. }));
        assert!(err.to_string().contains("payment-confirmation"));
    }
}
