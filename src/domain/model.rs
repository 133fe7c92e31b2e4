use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStatus {
    Available,
    Assigned,
    Reserved,
    Suspended,
    Cancelled,
}

/// 畫面上顯示的狀態：儲存狀態再加上「取消處理中」
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Available,
    Assigned,
    Reserved,
    Suspended,
    Cancelled,
    PendingCancellation,
}

impl DisplayStatus {
    pub const ALL: [DisplayStatus; 6] = [
        DisplayStatus::Available,
        DisplayStatus::Assigned,
        DisplayStatus::Reserved,
        DisplayStatus::Suspended,
        DisplayStatus::Cancelled,
        DisplayStatus::PendingCancellation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Available => "available",
            DisplayStatus::Assigned => "assigned",
            DisplayStatus::Reserved => "reserved",
            DisplayStatus::Suspended => "suspended",
            DisplayStatus::Cancelled => "cancelled",
            DisplayStatus::PendingCancellation => "pending_cancellation",
        }
    }
}

impl From<NumberStatus> for DisplayStatus {
    fn from(status: NumberStatus) -> Self {
        match status {
            NumberStatus::Available => DisplayStatus::Available,
            NumberStatus::Assigned => DisplayStatus::Assigned,
            NumberStatus::Reserved => DisplayStatus::Reserved,
            NumberStatus::Suspended => DisplayStatus::Suspended,
            NumberStatus::Cancelled => DisplayStatus::Cancelled,
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DisplayStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DisplayStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberType {
    Local,
    National,
    Mobile,
    TollFree,
}

impl NumberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberType::Local => "local",
            NumberType::National => "national",
            NumberType::Mobile => "mobile",
            NumberType::TollFree => "toll_free",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub voice: bool,
    #[serde(default)]
    pub sms: bool,
    #[serde(default)]
    pub fax: bool,
}

impl Capabilities {
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.voice {
            labels.push("voice");
        }
        if self.sms {
            labels.push("sms");
        }
        if self.fax {
            labels.push("fax");
        }
        labels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "connectionType", rename_all = "snake_case")]
pub enum ConnectionParams {
    #[serde(rename_all = "camelCase")]
    IpRouting { ip_address: String, port: Option<u16> },
    #[serde(rename_all = "camelCase")]
    Credentials {
        login: String,
        domain: Option<String>,
        // 只接收不輸出
        #[serde(default, skip_serializing)]
        password: Option<String>,
    },
}

impl ConnectionParams {
    pub fn describe(&self) -> String {
        match self {
            ConnectionParams::IpRouting { ip_address, port } => match port {
                Some(port) => format!("IP routing {}:{}", ip_address, port),
                None => format!("IP routing {}", ip_address),
            },
            ConnectionParams::Credentials { login, domain, .. } => match domain {
                Some(domain) => format!("SIP credentials {}@{}", login, domain),
                None => format!("SIP credentials {}", login),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub number: String,
    pub country: String,
    #[serde(default)]
    pub country_code: Option<String>,
    pub number_type: NumberType,
    pub monthly_rate: f64,
    #[serde(default)]
    pub setup_fee: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub capabilities: Capabilities,
    pub status: NumberStatus,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_billing_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_billed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub connection: Option<ConnectionParams>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Cancel,
    Modify,
    Backorder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl RequestStatus {
    /// pending / approved 的請求仍在處理流程中
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Approved)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub phone_number: String,
    pub request_type: RequestType,
    pub status: RequestStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PhoneNumberRequest {
    pub fn is_open_cancellation_for(&self, number: &str) -> bool {
        self.request_type == RequestType::Cancel && self.status.is_open() && self.phone_number == number
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackorderRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub phone_number: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 送出取消請求的內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRequest {
    pub phone_number: String,
    pub request_type: RequestType,
    pub reason: String,
    pub priority: Priority,
}

impl CancellationRequest {
    pub fn new(phone_number: impl Into<String>, reason: impl Into<String>, priority: Priority) -> Self {
        Self {
            phone_number: phone_number.into(),
            request_type: RequestType::Cancel,
            reason: reason.into(),
            priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBackorderRequest {
    pub phone_number: String,
    pub reason: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationStatus {
    #[default]
    Unknown,
    Safe,
    Neutral,
    Suspicious,
    Dangerous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationComment {
    pub text: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationData {
    #[serde(default)]
    pub phone_number: String,
    pub danger_level: u8,
    #[serde(default)]
    pub status: ReputationStatus,
    #[serde(default)]
    pub comments: Vec<ReputationComment>,
    #[serde(default)]
    pub total_comments: usize,
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_url: Option<String>,
}

pub const RISKY_DANGER_LEVEL: u8 = 70;

impl ReputationData {
    pub fn is_risky(&self) -> bool {
        self.status == ReputationStatus::Dangerous || self.danger_level >= RISKY_DANGER_LEVEL
    }

    pub fn risk_label(&self) -> &'static str {
        match (self.status, self.danger_level) {
            (ReputationStatus::Dangerous, _) => "Dangerous",
            (_, level) if level >= RISKY_DANGER_LEVEL => "High risk",
            (ReputationStatus::Suspicious, _) => "Suspicious",
            (_, level) if level >= 40 => "Moderate risk",
            (ReputationStatus::Unknown, 0) => "No data",
            (ReputationStatus::Safe, _) => "Safe",
            _ => "Low risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    WaitingUser,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::WaitingUser => "waiting_user",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "waiting_user" => Ok(TicketStatus::WaitingUser),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(format!("unknown ticket status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReply {
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub ticket_number: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub category: Option<String>,
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub requester_email: Option<String>,
    #[serde(default)]
    pub requester_name: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub replies: Vec<TicketReply>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn public_reply_count(&self) -> usize {
        self.replies.iter().filter(|r| !r.is_internal).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub open: usize,
    #[serde(default)]
    pub in_progress: usize,
    #[serde(default)]
    pub waiting_user: usize,
    #[serde(default)]
    pub resolved: usize,
    #[serde(default)]
    pub closed: usize,
    #[serde(default)]
    pub unassigned: usize,
    #[serde(default)]
    pub urgent: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_number_deserializes_from_api_shape() {
        let json = serde_json::json!({
            "_id": "n1",
            "number": "+14155550100",
            "country": "United States",
            "countryCode": "US",
            "numberType": "local",
            "monthlyRate": 2.5,
            "capabilities": {"voice": true, "sms": true},
            "status": "assigned",
            "nextBillingDate": "2026-11-01T00:00:00Z",
            "connection": {"connectionType": "ip_routing", "ipAddress": "10.0.0.1", "port": 5060}
        });

        let number: PhoneNumber = serde_json::from_value(json).unwrap();
        assert_eq!(number.id, "n1");
        assert_eq!(number.currency, "USD");
        assert_eq!(number.capabilities.labels(), vec!["voice", "sms"]);
        assert_eq!(
            number.connection.unwrap().describe(),
            "IP routing 10.0.0.1:5060"
        );
    }

    #[test]
    fn test_credentials_password_is_never_serialized() {
        let params = ConnectionParams::Credentials {
            login: "trunk1".to_string(),
            domain: Some("sip.example.com".to_string()),
            password: Some("secret".to_string()),
        };
        let json = serde_json::to_string(&params).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"connectionType\":\"credentials\""));
    }

    #[test]
    fn test_open_cancellation_matching() {
        let request = PhoneNumberRequest {
            id: "r1".to_string(),
            phone_number: "+100".to_string(),
            request_type: RequestType::Cancel,
            status: RequestStatus::Approved,
            priority: Priority::Medium,
            reason: None,
            admin_notes: None,
            created_at: None,
        };
        assert!(request.is_open_cancellation_for("+100"));
        assert!(!request.is_open_cancellation_for("+200"));

        let completed = PhoneNumberRequest {
            status: RequestStatus::Completed,
            ..request.clone()
        };
        assert!(!completed.is_open_cancellation_for("+100"));

        let modify = PhoneNumberRequest {
            request_type: RequestType::Modify,
            ..request
        };
        assert!(!modify.is_open_cancellation_for("+100"));
    }

    #[test]
    fn test_reputation_risk_label() {
        let mut data = ReputationData {
            phone_number: "+100".to_string(),
            danger_level: 0,
            status: ReputationStatus::Unknown,
            comments: vec![],
            total_comments: 0,
            last_checked: None,
            source_url: None,
        };
        assert_eq!(data.risk_label(), "No data");
        assert!(!data.is_risky());

        data.danger_level = 85;
        assert_eq!(data.risk_label(), "High risk");
        assert!(data.is_risky());

        data.danger_level = 10;
        data.status = ReputationStatus::Dangerous;
        assert_eq!(data.risk_label(), "Dangerous");
        assert!(data.is_risky());

        data.status = ReputationStatus::Safe;
        assert_eq!(data.risk_label(), "Safe");
    }

    #[test]
    fn test_display_status_parse() {
        assert_eq!(
            "pending_cancellation".parse::<DisplayStatus>().unwrap(),
            DisplayStatus::PendingCancellation
        );
        assert!("gone".parse::<DisplayStatus>().is_err());
    }
}
