use crate::app::cancellation::{BulkCancelReport, BulkCanceller, CancellationOptions};
use crate::app::reputation::ReputationService;
use crate::core::dashboard::NumberDashboard;
use crate::core::selection::SelectionError;
use crate::domain::model::{BackorderRequest, NewBackorderRequest, Priority, ReputationData};
use crate::domain::ports::PhoneNumberApi;
use crate::utils::error::{PortalError, Result};
use std::sync::Arc;

/// 號碼儀表板的操作：載入、取消、補訂與信譽查詢
pub struct NumberPortal<A: PhoneNumberApi + 'static> {
    api: Arc<A>,
    dashboard: NumberDashboard,
    canceller: BulkCanceller<A>,
    reputation: ReputationService<A>,
}

impl<A: PhoneNumberApi + 'static> NumberPortal<A> {
    pub fn new(api: Arc<A>, dashboard: NumberDashboard, options: CancellationOptions) -> Self {
        Self {
            canceller: BulkCanceller::new(Arc::clone(&api), options),
            reputation: ReputationService::new(Arc::clone(&api)),
            api,
            dashboard,
        }
    }

    pub fn dashboard(&self) -> &NumberDashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut NumberDashboard {
        &mut self.dashboard
    }

    /// 號碼、一般請求與補訂請求三者互不相依，同時抓取
    pub async fn load(&mut self) -> Result<()> {
        let (numbers, requests, backorders) = tokio::try_join!(
            self.api.list_numbers(),
            self.api.list_requests(),
            self.api.list_backorder_requests()
        )?;

        tracing::info!(
            "📂 Loaded {} numbers, {} requests, {} backorder requests",
            numbers.len(),
            requests.len(),
            backorders.len()
        );
        self.dashboard.replace_data(numbers, requests, backorders);
        Ok(())
    }

    /// 送出目前選取號碼的取消請求，成功後重新載入
    pub async fn cancel_selected(&mut self) -> Result<BulkCancelReport> {
        let selected = self.dashboard.selection().to_vec();
        if selected.is_empty() {
            return Err(PortalError::EmptySelection {
                message: "Select at least one phone number to cancel".to_string(),
            });
        }

        // 送出前再確認一次資格，資料可能在選取後已更新
        for number in &selected {
            let eligible = self
                .dashboard
                .find(number)
                .is_some_and(|n| self.dashboard.is_selectable(n));
            if !eligible {
                return Err(SelectionError::NotEligible(number.clone()).into());
            }
        }

        let report = self.canceller.submit(&selected).await?;

        let applied = report.applied_numbers();
        self.dashboard
            .selection_mut()
            .retain(|number| !applied.iter().any(|a| a == number));

        if let Err(e) = self.load().await {
            tracing::warn!("⚠️ Refresh after cancellation failed: {}", e);
        }
        Ok(report)
    }

    pub async fn cancel_one(&mut self, number: &str) -> Result<BulkCancelReport> {
        let eligible = self
            .dashboard
            .find(number)
            .is_some_and(|n| self.dashboard.is_selectable(n));
        if !eligible {
            return Err(SelectionError::NotEligible(number.to_string()).into());
        }

        let report = self.canceller.submit(&[number.to_string()]).await?;
        if let Err(e) = self.load().await {
            tracing::warn!("⚠️ Refresh after cancellation failed: {}", e);
        }
        Ok(report)
    }

    pub async fn request_backorder(
        &mut self,
        number: &str,
        reason: &str,
        priority: Priority,
    ) -> Result<BackorderRequest> {
        crate::utils::validation::validate_non_empty_string("phone_number", number)?;

        let request = NewBackorderRequest {
            phone_number: number.to_string(),
            reason: reason.to_string(),
            priority,
        };
        let created = self.api.submit_backorder(&request).await?;
        tracing::info!("📝 Backorder request {} created for {}", created.id, number);

        if let Err(e) = self.load().await {
            tracing::warn!("⚠️ Refresh after backorder failed: {}", e);
        }
        Ok(created)
    }

    pub async fn reputation(&mut self, number: &str, refresh: bool) -> Result<ReputationData> {
        self.reputation.lookup(&mut self.dashboard, number, refresh).await
    }
}
