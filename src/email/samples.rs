//! 每種範本的示範資料，給預覽工具與測試使用

use super::TemplateKind;
use serde_json::{json, Value};

pub fn sample_data(kind: TemplateKind) -> Value {
    match kind {
        TemplateKind::AccountActivation => json!({
            "name": "Jordan Lee",
            "email": "jordan@example.com",
            "activationUrl": "https://portal.example.com/activate?token=3f9a1c",
            "expiresInHours": 24
        }),
        TemplateKind::AccountActivated => json!({
            "name": "Jordan Lee",
            "email": "jordan@example.com"
        }),
        TemplateKind::PasswordReset => json!({
            "name": "Jordan Lee",
            "resetUrl": "https://portal.example.com/reset-password?token=8b2e77",
            "expiresInMinutes": 60,
            "ipAddress": "198.51.100.23"
        }),
        TemplateKind::LowBalanceAlert => json!({
            "name": "Jordan Lee",
            "balance": 4.75,
            "threshold": 10.0,
            "currency": "USD",
            "activeNumbers": 3
        }),
        TemplateKind::ZeroBalanceAlert => json!({
            "name": "Jordan Lee",
            "balance": 0.0,
            "currency": "USD",
            "activeNumbers": 3
        }),
        TemplateKind::PaymentConfirmation => json!({
            "name": "Jordan Lee",
            "amount": 50.0,
            "currency": "USD",
            "newBalance": 54.75,
            "transactionId": "txn_1Q2w3E4r",
            "paymentMethod": "Visa ending in 4242",
            "paidAt": "2024-06-14T09:21:00Z"
        }),
        TemplateKind::PaymentFailed => json!({
            "name": "Jordan Lee",
            "amount": 50.0,
            "currency": "USD",
            "reason": "Your card was declined"
        }),
        TemplateKind::NumberAssigned => json!({
            "name": "Jordan Lee",
            "phoneNumber": "+14155550123",
            "country": "United States",
            "numberType": "local",
            "monthlyRate": 2.5,
            "setupFee": 1.0,
            "currency": "USD",
            "capabilities": { "voice": true, "sms": true, "fax": false },
            "nextBillingDate": "2024-07-14T00:00:00Z"
        }),
        TemplateKind::CancellationRequested => json!({
            "name": "Jordan Lee",
            "phoneNumber": "+14155550123",
            "requestId": "665c2f1e9b1d4a0012ab34cd",
            "reason": "No longer needed",
            "priority": "medium",
            "requestedAt": "2024-06-20T15:02:00Z"
        }),
        TemplateKind::NumberCancelled => json!({
            "name": "Jordan Lee",
            "phoneNumber": "+14155550123",
            "cancelledAt": "2024-06-22T10:00:00Z",
            "adminNotes": "Final invoice has been settled."
        }),
        TemplateKind::BackorderApproved => json!({
            "name": "Jordan Lee",
            "phoneNumber": "+4930901820",
            "monthlyRate": 4.0,
            "currency": "EUR",
            "adminNotes": "The number will be ported within 3 business days."
        }),
        TemplateKind::BackorderRejected => json!({
            "name": "Jordan Lee",
            "phoneNumber": "+4930901820",
            "currency": "EUR",
            "adminNotes": "This range is reserved by the carrier."
        }),
        TemplateKind::NumberSuspended => json!({
            "name": "Jordan Lee",
            "phoneNumber": "+14155550123",
            "reason": "The monthly renewal could not be charged",
            "amountDue": 2.5,
            "currency": "USD"
        }),
        TemplateKind::RenewalCharged => json!({
            "name": "Jordan Lee",
            "phoneNumber": "+14155550123",
            "amount": 2.5,
            "currency": "USD",
            "remainingBalance": 52.25,
            "nextBillingDate": "2024-08-14T00:00:00Z"
        }),
        TemplateKind::TicketReply => json!({
            "name": "Jordan Lee",
            "ticketNumber": "TKT-1042",
            "subject": "Calls to my number drop after 30 seconds",
            "replyAuthor": "Support Team",
            "replyMessage": "Thanks for reporting this.\n\nWe found a routing issue on our side and deployed a fix. Please try again and let us know.",
            "status": "waiting_user",
            "ticketUrl": "https://portal.example.com/support/tickets/TKT-1042"
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::{render_template, Branding};

    #[test]
    fn test_every_template_renders_sample_data() {
        let branding = Branding::default();
        for kind in TemplateKind::ALL {
            let email = render_template(kind, sample_data(kind), &branding)
                .unwrap_or_else(|e| panic!("{} failed: {}", kind, e));

            assert!(!email.subject.is_empty(), "{} has no subject", kind);
            assert!(email.html.starts_with("<!DOCTYPE html>"), "{}", kind);
            assert!(email.html.contains("style=\""), "{} was not inlined", kind);
            assert!(email.text.contains(&branding.support_email), "{}", kind);
        }
    }
}
