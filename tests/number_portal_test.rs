use anyhow::Result;
use httpmock::prelude::*;
use httpmock::Mock;
use phone_portal::adapters::export::export_numbers_csv;
use phone_portal::core::dashboard::StatusFilter;
use phone_portal::domain::model::DisplayStatus;
use phone_portal::{
    CancellationOptions, HttpPortalClient, NumberDashboard, NumberPortal, PortalError,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn number(id: usize, status: &str) -> Value {
    json!({
        "_id": format!("n{}", id),
        "number": format!("+1555000{:04}", id),
        "country": if id % 2 == 0 { "United States" } else { "Canada" },
        "numberType": "local",
        "monthlyRate": 2.0,
        "currency": "USD",
        "capabilities": { "voice": true, "sms": true },
        "status": status
    })
}

fn portal(server: &MockServer, options: CancellationOptions) -> NumberPortal<HttpPortalClient> {
    let client = HttpPortalClient::new(
        &server.base_url(),
        Some("test-token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();
    NumberPortal::new(Arc::new(client), NumberDashboard::new(12).unwrap(), options)
}

/// 號碼、請求、補訂三個清單端點；回傳請求清單的 mock 以便測試中替換
fn mock_lists<'a>(server: &'a MockServer, numbers: Vec<Value>, requests: Vec<Value>) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path("/api/phone-numbers");
        then.status(200).json_body(json!({ "phoneNumbers": numbers }));
    });
    let requests_mock = server.mock(|when, then| {
        when.method(GET).path("/api/phone-numbers/requests");
        then.status(200).json_body(Value::Array(requests));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/backorder-requests");
        then.status(200).json_body(json!([]));
    });
    requests_mock
}

#[tokio::test]
async fn test_dashboard_load_search_and_paginate() -> Result<()> {
    let server = MockServer::start();
    let numbers: Vec<Value> = (0..30).map(|i| number(i, "assigned")).collect();
    let requests = vec![json!({
        "_id": "r1",
        "phoneNumber": "+15550000003",
        "requestType": "cancel",
        "status": "pending"
    })];
    mock_lists(&server, numbers, requests);

    let mut portal = portal(&server, CancellationOptions::default());
    portal.load().await?;

    let dashboard = portal.dashboard_mut();
    assert_eq!(dashboard.total_pages(), 3);
    assert_eq!(dashboard.paginated().len(), 12);

    let pending = dashboard.find("+15550000003").unwrap();
    assert_eq!(dashboard.display_status(pending), DisplayStatus::PendingCancellation);

    dashboard.go_to_page(3);
    assert_eq!(dashboard.paginated().len(), 6);

    // 篩選會回到第一頁
    dashboard.set_status_filter(StatusFilter::Only(DisplayStatus::PendingCancellation));
    assert_eq!(dashboard.current_page(), 1);
    assert_eq!(dashboard.filtered().len(), 1);

    dashboard.set_status_filter(StatusFilter::All);
    dashboard.set_search_term("canada");
    assert_eq!(dashboard.filtered().len(), 15);

    Ok(())
}

#[tokio::test]
async fn test_bulk_cancel_success_refreshes_status() -> Result<()> {
    let server = MockServer::start();
    let numbers: Vec<Value> = (0..3).map(|i| number(i, "assigned")).collect();
    let mut requests_mock = mock_lists(&server, numbers, vec![]);

    let submit = server.mock(|when, then| {
        when.method(POST)
            .path("/api/phone-numbers/requests")
            .header("authorization", "Bearer test-token")
            .body_contains("\"requestType\":\"cancel\"");
        then.status(201).json_body(json!({
            "request": {
                "_id": "req-new",
                "phoneNumber": "+15550000000",
                "requestType": "cancel",
                "status": "pending"
            }
        }));
    });

    let mut portal = portal(&server, CancellationOptions::default());
    portal.load().await?;
    portal.dashboard_mut().toggle_selection("+15550000000")?;

    // 重新載入時伺服器已記錄這筆請求
    requests_mock.delete();
    server.mock(|when, then| {
        when.method(GET).path("/api/phone-numbers/requests");
        then.status(200).json_body(json!([{
            "_id": "req-new",
            "phoneNumber": "+15550000000",
            "requestType": "cancel",
            "status": "pending"
        }]));
    });

    let report = portal.cancel_selected().await?;

    submit.assert_hits(1);
    assert!(report.is_complete_success());
    assert!(portal.dashboard().selection().is_empty());

    let cancelled = portal.dashboard().find("+15550000000").unwrap();
    assert_eq!(
        portal.dashboard().display_status(cancelled),
        DisplayStatus::PendingCancellation
    );
    assert!(!portal.dashboard().is_selectable(cancelled));
    Ok(())
}

#[tokio::test]
async fn test_partial_failure_rolls_back_submitted_requests() -> Result<()> {
    let server = MockServer::start();
    let numbers: Vec<Value> = (0..2).map(|i| number(i, "assigned")).collect();
    mock_lists(&server, numbers, vec![]);

    server.mock(|when, then| {
        when.method(POST)
            .path("/api/phone-numbers/requests")
            .body_contains("\"phoneNumber\":\"+15550000000\"");
        then.status(201).json_body(json!({
            "_id": "req-0",
            "phoneNumber": "+15550000000",
            "requestType": "cancel",
            "status": "pending"
        }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/phone-numbers/requests")
            .body_contains("\"phoneNumber\":\"+15550000001\"");
        then.status(502).json_body(json!({ "message": "Carrier unavailable" }));
    });
    let withdraw = server.mock(|when, then| {
        when.method(DELETE).path("/api/phone-numbers/requests/req-0");
        then.status(204);
    });

    let mut portal = portal(&server, CancellationOptions::default());
    portal.load().await?;
    let outcome = portal.dashboard_mut().select_all();
    assert_eq!(outcome.selected, 2);

    let report = portal.cancel_selected().await?;

    withdraw.assert_hits(1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].number, "+15550000001");
    assert_eq!(report.failed[0].message, "Carrier unavailable");
    assert_eq!(report.rolled_back, vec!["+15550000000".to_string()]);
    assert!(report.succeeded.is_empty());

    // 沒有任何請求留在伺服器上，選取保留以便重試
    assert_eq!(portal.dashboard().selection().len(), 2);

    let err = report.into_result().unwrap_err();
    match &err {
        PortalError::PartialFailure { failed, total } => {
            assert_eq!(failed, &vec!["+15550000001".to_string()]);
            assert_eq!(*total, 2);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.user_friendly_message().contains("+15550000001"));
    Ok(())
}

#[tokio::test]
async fn test_partial_failure_without_rollback_keeps_successes() -> Result<()> {
    let server = MockServer::start();
    let numbers: Vec<Value> = (0..2).map(|i| number(i, "assigned")).collect();
    mock_lists(&server, numbers, vec![]);

    server.mock(|when, then| {
        when.method(POST)
            .path("/api/phone-numbers/requests")
            .body_contains("\"phoneNumber\":\"+15550000000\"");
        then.status(201).json_body(json!({
            "_id": "req-0",
            "phoneNumber": "+15550000000",
            "requestType": "cancel",
            "status": "pending"
        }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/phone-numbers/requests")
            .body_contains("\"phoneNumber\":\"+15550000001\"");
        then.status(500);
    });
    let withdraw = server.mock(|when, then| {
        when.method(DELETE);
        then.status(204);
    });

    let options = CancellationOptions {
        rollback_on_failure: false,
        ..CancellationOptions::default()
    };
    let mut portal = portal(&server, options);
    portal.load().await?;
    portal.dashboard_mut().select_all();

    let report = portal.cancel_selected().await?;

    withdraw.assert_hits(0);
    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.failed[0].message, "Something went wrong, please try again");
    assert_eq!(portal.dashboard().selection().to_vec(), vec!["+15550000001".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_selection_limit_over_api_data() -> Result<()> {
    let server = MockServer::start();
    let numbers: Vec<Value> = (0..25).map(|i| number(i, "assigned")).collect();
    mock_lists(&server, numbers, vec![]);

    let mut portal = portal(&server, CancellationOptions::default());
    portal.load().await?;

    let outcome = portal.dashboard_mut().select_all();
    assert_eq!(outcome.selected, 20);
    assert_eq!(outcome.overflow, 5);
    assert!(portal.dashboard_mut().toggle_selection("+15550000024").is_err());
    Ok(())
}

#[tokio::test]
async fn test_reputation_lookup_and_refresh() -> Result<()> {
    let server = MockServer::start();
    let stored = server.mock(|when, then| {
        when.method(GET).path_contains("/reputation");
        then.status(200).json_body(json!({
            "dangerLevel": 12,
            "status": "safe",
            "comments": []
        }));
    });
    let refreshed = server.mock(|when, then| {
        when.method(POST).path_contains("/reputation");
        then.status(200).json_body(json!({
            "reputation": {
                "phoneNumber": "+15550000000",
                "dangerLevel": 85,
                "status": "dangerous",
                "comments": [{ "text": "Robocalls reported" }],
                "totalComments": 14
            }
        }));
    });

    let mut portal = portal(&server, CancellationOptions::default());

    let first = portal.reputation("+15550000000", false).await?;
    let cached = portal.reputation("+15550000000", false).await?;
    assert_eq!(first, cached);
    stored.assert_hits(1);
    assert!(!first.is_risky());

    let fresh = portal.reputation("+15550000000", true).await?;
    refreshed.assert_hits(1);
    assert!(fresh.is_risky());
    assert_eq!(fresh.risk_label(), "Dangerous");
    Ok(())
}

#[tokio::test]
async fn test_backorder_request() -> Result<()> {
    let server = MockServer::start();
    mock_lists(&server, vec![], vec![]);
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/backorder-requests")
            .body_contains("\"phoneNumber\":\"+4930901820\"")
            .body_contains("\"priority\":\"high\"");
        then.status(201).json_body(json!({
            "_id": "b1",
            "phoneNumber": "+4930901820",
            "status": "pending",
            "priority": "high"
        }));
    });

    let mut portal = portal(&server, CancellationOptions::default());
    let created = portal
        .request_backorder("+4930901820", "Berlin office", phone_portal::domain::model::Priority::High)
        .await?;

    create.assert();
    assert_eq!(created.id, "b1");
    Ok(())
}

#[tokio::test]
async fn test_export_filtered_numbers_to_csv() -> Result<()> {
    let server = MockServer::start();
    let numbers = vec![number(0, "assigned"), number(1, "suspended"), number(2, "assigned")];
    mock_lists(&server, numbers, vec![]);

    let mut portal = portal(&server, CancellationOptions::default());
    portal.load().await?;
    portal
        .dashboard_mut()
        .set_status_filter(StatusFilter::Only(DisplayStatus::Assigned));

    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("exports").join("numbers.csv");
    let count = export_numbers_csv(portal.dashboard(), &path)?;

    assert_eq!(count, 2);
    let content = std::fs::read_to_string(&path)?;
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("number,country"));
    assert_eq!(lines.count(), 2);
    assert!(!content.contains("+15550000001"));
    Ok(())
}
