use crate::domain::model::{
    BackorderRequest, CancellationRequest, NewBackorderRequest, PhoneNumber, PhoneNumberRequest,
    ReputationData, Ticket, TicketStats, TicketStatus,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 電話號碼相關的 REST API
#[async_trait]
pub trait PhoneNumberApi: Send + Sync {
    async fn list_numbers(&self) -> Result<Vec<PhoneNumber>>;
    async fn list_requests(&self) -> Result<Vec<PhoneNumberRequest>>;
    async fn list_backorder_requests(&self) -> Result<Vec<BackorderRequest>>;
    async fn submit_cancellation(&self, request: &CancellationRequest) -> Result<PhoneNumberRequest>;
    async fn withdraw_request(&self, request_id: &str) -> Result<()>;
    async fn submit_backorder(&self, request: &NewBackorderRequest) -> Result<BackorderRequest>;
    async fn get_reputation(&self, number: &str) -> Result<ReputationData>;
    async fn check_reputation(&self, number: &str) -> Result<ReputationData>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssignmentFilter {
    #[default]
    Any,
    Unassigned,
    Assignee(String),
}

impl AssignmentFilter {
    pub fn query_value(&self) -> Option<&str> {
        match self {
            AssignmentFilter::Any => None,
            AssignmentFilter::Unassigned => Some("unassigned"),
            AssignmentFilter::Assignee(user) => Some(user.as_str()),
        }
    }
}

impl std::str::FromStr for AssignmentFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("assignee cannot be empty".to_string()),
            "any" | "all" => Ok(AssignmentFilter::Any),
            "unassigned" => Ok(AssignmentFilter::Unassigned),
            user => Ok(AssignmentFilter::Assignee(user.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilters {
    pub status: Option<TicketStatus>,
    pub priority: Option<crate::domain::model::Priority>,
    pub assigned: AssignmentFilter,
    pub search: Option<String>,
}

impl TicketFilters {
    /// 轉成查詢參數，只帶有設定的條件
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            query.push(("priority", priority.as_str().to_string()));
        }
        if let Some(assigned) = self.assigned.query_value() {
            query.push(("assigned", assigned.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        query
    }
}

/// 管理端工單 API
#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn list_tickets(&self, filters: &TicketFilters) -> Result<Vec<Ticket>>;
    async fn ticket_stats(&self) -> Result<TicketStats>;
    async fn bulk_assign(&self, ticket_ids: &[String], assignee: &str) -> Result<usize>;
    async fn bulk_update_status(&self, ticket_ids: &[String], status: TicketStatus) -> Result<usize>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn api_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn concurrent_requests(&self) -> usize;
}
