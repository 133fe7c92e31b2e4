use crate::domain::model::{
    BackorderRequest, CancellationRequest, NewBackorderRequest, PhoneNumber, PhoneNumberRequest,
    ReputationData, Ticket, TicketStats, TicketStatus,
};
use crate::domain::ports::{ConfigProvider, PhoneNumberApi, TicketApi, TicketFilters};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again";

/// 以 reqwest 呼叫入口網站 REST API 的客戶端
#[derive(Debug, Clone)]
pub struct HttpPortalClient {
    client: Client,
    base_url: String,
    base: Url,
    token: Option<String>,
}

impl HttpPortalClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| PortalError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            base,
            token,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.base_url(),
            config.api_token().map(str::to_string),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 以路徑區段規則編碼每一段（空白為 %20，'/' 與 '?' 也會被跳脫）
    fn segment_path(&self, segments: &[&str]) -> Result<String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| PortalError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: self.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .clear()
            .extend(segments);
        Ok(url.path().to_string())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("📡 {} {}", method, url);
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// 非 2xx 時從回應內容取出 error / message 欄位當作錯誤訊息
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                ["error", "message"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
            })
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

        tracing::warn!("❌ API responded {}: {}", status, message);
        Err(PortalError::HttpError {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_value(&self, request: RequestBuilder) -> Result<Value> {
        let response = Self::check(request.send().await?).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str, keys: &[&str]) -> Result<Vec<T>> {
        let value = self.send_value(self.request(Method::GET, path)).await?;
        extract_list(value, keys)
    }

    async fn fetch_reputation(&self, method: Method, number: &str) -> Result<ReputationData> {
        let path = self.segment_path(&["api", "phone-numbers", number, "reputation"])?;
        let value = self.send_value(self.request(method, &path)).await?;
        let mut data: ReputationData = extract_object(value, &["reputation", "data"])?;
        if data.phone_number.is_empty() {
            data.phone_number = number.to_string();
        }
        Ok(data)
    }

    async fn post_bulk(&self, path: &str, body: Value, expected: usize) -> Result<usize> {
        let value = self.send_value(self.request(Method::POST, path).json(&body)).await?;
        let updated = ["modifiedCount", "updated", "count"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_u64))
            .map(|n| n as usize)
            .unwrap_or(expected);
        Ok(updated)
    }
}

/// 清單端點可能回傳陣列，或把陣列包在物件的某個欄位中
fn extract_list<T: DeserializeOwned>(value: Value, keys: &[&str]) -> Result<Vec<T>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut obj) => {
            let found = keys
                .iter()
                .chain(["data", "items"].iter())
                .find_map(|key| obj.remove(*key).filter(Value::is_array));
            match found {
                Some(list) => Ok(serde_json::from_value(list)?),
                None => Err(PortalError::HttpError {
                    status: 200,
                    message: format!("Unexpected response shape, expected one of: {}", keys.join(", ")),
                }),
            }
        }
        other => Err(PortalError::HttpError {
            status: 200,
            message: format!("Unexpected response: {}", other),
        }),
    }
}

fn extract_object<T: DeserializeOwned>(value: Value, keys: &[&str]) -> Result<T> {
    if let Value::Object(obj) = &value {
        if let Some(inner) = keys.iter().find_map(|key| obj.get(*key).filter(|v| v.is_object())) {
            return Ok(serde_json::from_value(inner.clone())?);
        }
    }
    Ok(serde_json::from_value(value)?)
}

#[async_trait]
impl PhoneNumberApi for HttpPortalClient {
    async fn list_numbers(&self) -> Result<Vec<PhoneNumber>> {
        self.fetch_list("/api/phone-numbers", &["phoneNumbers", "numbers"]).await
    }

    async fn list_requests(&self) -> Result<Vec<PhoneNumberRequest>> {
        self.fetch_list("/api/phone-numbers/requests", &["requests"]).await
    }

    async fn list_backorder_requests(&self) -> Result<Vec<BackorderRequest>> {
        self.fetch_list("/api/backorder-requests", &["requests", "backorderRequests"])
            .await
    }

    async fn submit_cancellation(&self, request: &CancellationRequest) -> Result<PhoneNumberRequest> {
        let value = self
            .send_value(self.request(Method::POST, "/api/phone-numbers/requests").json(request))
            .await?;
        extract_object(value, &["request", "data"])
    }

    async fn withdraw_request(&self, request_id: &str) -> Result<()> {
        let path = self.segment_path(&["api", "phone-numbers", "requests", request_id])?;
        self.send_value(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn submit_backorder(&self, request: &NewBackorderRequest) -> Result<BackorderRequest> {
        let value = self
            .send_value(self.request(Method::POST, "/api/backorder-requests").json(request))
            .await?;
        extract_object(value, &["request", "data"])
    }

    async fn get_reputation(&self, number: &str) -> Result<ReputationData> {
        self.fetch_reputation(Method::GET, number).await
    }

    async fn check_reputation(&self, number: &str) -> Result<ReputationData> {
        self.fetch_reputation(Method::POST, number).await
    }
}

#[async_trait]
impl TicketApi for HttpPortalClient {
    async fn list_tickets(&self, filters: &TicketFilters) -> Result<Vec<Ticket>> {
        let request = self
            .request(Method::GET, "/api/admin/tickets")
            .query(&filters.to_query());
        let value = self.send_value(request).await?;
        extract_list(value, &["tickets"])
    }

    async fn ticket_stats(&self) -> Result<TicketStats> {
        let value = self
            .send_value(self.request(Method::GET, "/api/admin/tickets/stats"))
            .await?;
        extract_object(value, &["stats", "data"])
    }

    async fn bulk_assign(&self, ticket_ids: &[String], assignee: &str) -> Result<usize> {
        let body = json!({ "ticketIds": ticket_ids, "assignedTo": assignee });
        self.post_bulk("/api/admin/tickets/bulk-assign", body, ticket_ids.len())
            .await
    }

    async fn bulk_update_status(&self, ticket_ids: &[String], status: TicketStatus) -> Result<usize> {
        let body = json!({ "ticketIds": ticket_ids, "status": status.as_str() });
        self.post_bulk("/api/admin/tickets/bulk-status", body, ticket_ids.len())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Priority, RequestStatus, ReputationStatus};
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> HttpPortalClient {
        HttpPortalClient::new(&server.base_url(), Some("tok".to_string()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_numbers_accepts_envelope_and_sends_token() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/phone-numbers")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({
                "phoneNumbers": [{
                    "_id": "n1",
                    "number": "+14155550100",
                    "country": "United States",
                    "numberType": "local",
                    "monthlyRate": 1.0,
                    "status": "assigned"
                }],
                "pagination": {"total": 1}
            }));
        });

        let numbers = client(&server).list_numbers().await.unwrap();

        api_mock.assert();
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers[0].number, "+14155550100");
    }

    #[tokio::test]
    async fn test_list_requests_accepts_bare_array() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/phone-numbers/requests");
            then.status(200).json_body(json!([{
                "_id": "r1",
                "phoneNumber": "+100",
                "requestType": "cancel",
                "status": "pending",
                "priority": "high"
            }]));
        });

        let requests = client(&server).list_requests().await.unwrap();
        assert_eq!(requests[0].status, RequestStatus::Pending);
        assert_eq!(requests[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn test_error_message_taken_from_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/phone-numbers/requests");
            then.status(409)
                .json_body(json!({"error": "A cancellation request already exists"}));
        });

        let request = CancellationRequest::new("+100", "no longer needed", Priority::Medium);
        let err = client(&server).submit_cancellation(&request).await.unwrap_err();

        match err {
            PortalError::HttpError { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "A cancellation request already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_without_body_uses_generic_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/backorder-requests");
            then.status(500).body("<html>oops</html>");
        });

        let err = client(&server).list_backorder_requests().await.unwrap_err();
        assert_eq!(err.user_friendly_message(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_submit_cancellation_posts_camel_case_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/phone-numbers/requests")
                .json_body(json!({
                    "phoneNumber": "+100",
                    "requestType": "cancel",
                    "reason": "moving",
                    "priority": "medium"
                }));
            then.status(201).json_body(json!({
                "request": {
                    "_id": "r9",
                    "phoneNumber": "+100",
                    "requestType": "cancel",
                    "status": "pending"
                }
            }));
        });

        let request = CancellationRequest::new("+100", "moving", Priority::Medium);
        let created = client(&server).submit_cancellation(&request).await.unwrap();

        api_mock.assert();
        assert_eq!(created.id, "r9");
    }

    #[tokio::test]
    async fn test_check_reputation_fills_missing_number() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path_contains("14155550100")
                .path_contains("/reputation");
            then.status(200).json_body(json!({
                "reputation": {
                    "phoneNumber": "",
                    "dangerLevel": 80,
                    "status": "dangerous",
                    "comments": [{"text": "robocalls"}],
                    "totalComments": 1
                }
            }));
        });

        let data = client(&server).check_reputation("+14155550100").await.unwrap();

        api_mock.assert();
        assert_eq!(data.phone_number, "+14155550100");
        assert_eq!(data.status, ReputationStatus::Dangerous);
        assert_eq!(data.comments.len(), 1);
    }

    #[test]
    fn test_segment_path_uses_path_encoding() {
        let client =
            HttpPortalClient::new("https://api.example.com/v1/", None, Duration::from_secs(5)).unwrap();

        let path = client
            .segment_path(&["api", "phone-numbers", "+1 415 555 0100", "reputation"])
            .unwrap();
        assert_eq!(path, "/api/phone-numbers/+1%20415%20555%200100/reputation");

        let path = client.segment_path(&["api", "phone-numbers", "requests", "a/b?c"]).unwrap();
        assert_eq!(path, "/api/phone-numbers/requests/a%2Fb%3Fc");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = HttpPortalClient::new("not a url", None, Duration::from_secs(5));
        assert!(matches!(result, Err(PortalError::InvalidConfigValueError { .. })));
    }

    #[tokio::test]
    async fn test_list_tickets_sends_filters() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/admin/tickets")
                .query_param("status", "open")
                .query_param("assigned", "unassigned");
            then.status(200).json_body(json!({"tickets": [{
                "_id": "t1",
                "subject": "Billing question",
                "status": "open",
                "priority": "urgent"
            }]}));
        });

        let filters = TicketFilters {
            status: Some(TicketStatus::Open),
            assigned: crate::domain::ports::AssignmentFilter::Unassigned,
            ..Default::default()
        };
        let tickets = client(&server).list_tickets(&filters).await.unwrap();

        api_mock.assert();
        assert_eq!(tickets[0].priority, Priority::Urgent);
    }

    #[tokio::test]
    async fn test_bulk_assign_reads_modified_count() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/admin/tickets/bulk-assign")
                .json_body(json!({"ticketIds": ["t1", "t2"], "assignedTo": "agent-7"}));
            then.status(200).json_body(json!({"modifiedCount": 1}));
        });

        let ids = vec!["t1".to_string(), "t2".to_string()];
        let updated = client(&server).bulk_assign(&ids, "agent-7").await.unwrap();
        assert_eq!(updated, 1);
    }

    #[tokio::test]
    async fn test_withdraw_request_accepts_empty_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/phone-numbers/requests/r1");
            then.status(204);
        });

        client(&server).withdraw_request("r1").await.unwrap();
        api_mock.assert();
    }
}
