use crate::domain::model::{CancellationRequest, PhoneNumberRequest, Priority};
use crate::domain::ports::PhoneNumberApi;
use crate::utils::error::{PortalError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct CancellationOptions {
    pub concurrent_requests: usize,
    pub rollback_on_failure: bool,
    pub reason: String,
    pub priority: Priority,
}

impl Default for CancellationOptions {
    fn default() -> Self {
        Self {
            concurrent_requests: 5,
            rollback_on_failure: true,
            reason: "Cancellation requested from dashboard".to_string(),
            priority: Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CancelFailure {
    pub number: String,
    pub message: String,
}

/// 批次取消的結果；部分失敗時列出每個失敗的號碼
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkCancelReport {
    pub succeeded: Vec<PhoneNumberRequest>,
    pub failed: Vec<CancelFailure>,
    /// 因其他號碼失敗而撤回的請求
    pub rolled_back: Vec<String>,
    pub rollback_failed: Vec<CancelFailure>,
}

impl BulkCancelReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.rolled_back.len() + self.rollback_failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.rolled_back.is_empty() && self.rollback_failed.is_empty()
    }

    /// 真正留在伺服器上的取消請求所屬號碼
    pub fn applied_numbers(&self) -> Vec<String> {
        self.succeeded
            .iter()
            .map(|r| r.phone_number.clone())
            .chain(self.rollback_failed.iter().map(|f| f.number.clone()))
            .collect()
    }

    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            let total = self.total();
            Err(PortalError::PartialFailure {
                failed: self.failed.into_iter().map(|f| f.number).collect(),
                total,
            })
        }
    }
}

/// 以有限併發送出取消請求，並在部分失敗時撤回已成功的請求
pub struct BulkCanceller<A: PhoneNumberApi + 'static> {
    api: Arc<A>,
    options: CancellationOptions,
}

impl<A: PhoneNumberApi + 'static> BulkCanceller<A> {
    pub fn new(api: Arc<A>, options: CancellationOptions) -> Self {
        Self { api, options }
    }

    pub fn options(&self) -> &CancellationOptions {
        &self.options
    }

    pub async fn submit(&self, numbers: &[String]) -> Result<BulkCancelReport> {
        let mut unique: Vec<String> = Vec::with_capacity(numbers.len());
        for number in numbers {
            if !unique.contains(number) {
                unique.push(number.clone());
            }
        }

        if unique.is_empty() {
            return Err(PortalError::EmptySelection {
                message: "No phone numbers selected for cancellation".to_string(),
            });
        }

        tracing::info!(
            "📤 Submitting {} cancellation requests ({} at a time)",
            unique.len(),
            self.options.concurrent_requests
        );

        let outcomes = run_bounded(unique, self.options.concurrent_requests, |number| {
            let api = Arc::clone(&self.api);
            let request = CancellationRequest::new(number, self.options.reason.clone(), self.options.priority);
            async move { api.submit_cancellation(&request).await }
        })
        .await;

        let mut report = BulkCancelReport::default();
        for (number, outcome) in outcomes {
            match outcome {
                Ok(request) => report.succeeded.push(request),
                Err(e) => {
                    tracing::error!("❌ Cancellation for {} failed: {}", number, e);
                    report.failed.push(CancelFailure {
                        number,
                        message: e.user_friendly_message(),
                    });
                }
            }
        }

        if !report.failed.is_empty() && !report.succeeded.is_empty() && self.options.rollback_on_failure {
            self.roll_back(&mut report).await;
        }

        tracing::info!(
            "📊 Cancellation batch: {} succeeded, {} failed, {} rolled back",
            report.succeeded.len(),
            report.failed.len(),
            report.rolled_back.len()
        );
        Ok(report)
    }

    async fn roll_back(&self, report: &mut BulkCancelReport) {
        let created = std::mem::take(&mut report.succeeded);
        tracing::warn!(
            "↩️ {} of the batch failed, withdrawing {} submitted requests",
            report.failed.len(),
            created.len()
        );

        let outcomes = run_bounded(created, self.options.concurrent_requests, |request| {
            let api = Arc::clone(&self.api);
            async move { api.withdraw_request(&request.id).await }
        })
        .await;

        for (request, outcome) in outcomes {
            match outcome {
                Ok(()) => report.rolled_back.push(request.phone_number),
                Err(e) => {
                    tracing::error!(
                        "❌ Could not withdraw request {} for {}: {}",
                        request.id,
                        request.phone_number,
                        e
                    );
                    report.rollback_failed.push(CancelFailure {
                        number: request.phone_number,
                        message: e.user_friendly_message(),
                    });
                }
            }
        }
    }
}

/// 每個項目各開一個 task，用 semaphore 限制同時進行的數量；結果依輸入順序回傳
async fn run_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, make: F) -> Vec<(T, Result<R>)>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut handles = Vec::with_capacity(items.len());

    for item in items {
        let permit_source = Arc::clone(&semaphore);
        let task = make(item.clone());
        let handle = tokio::spawn(async move {
            let _permit = permit_source.acquire_owned().await.map_err(|e| PortalError::ProcessingError {
                message: format!("Request limiter closed: {}", e),
            })?;
            task.await
        });
        handles.push((item, handle));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (item, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(PortalError::ProcessingError {
                message: format!("Request task failed: {}", e),
            }),
        };
        results.push((item, outcome));
    }
    results
}
