use crate::core::dashboard::NumberDashboard;
use crate::domain::model::ReputationData;
use crate::domain::ports::PhoneNumberApi;
use crate::utils::error::Result;
use std::sync::Arc;

/// 號碼信譽查詢；結果只快取在本次工作階段的儀表板中
pub struct ReputationService<A: PhoneNumberApi> {
    api: Arc<A>,
}

impl<A: PhoneNumberApi> ReputationService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// `refresh` 為真時強制重新查詢第三方來源 (POST)，否則先看快取再 GET
    pub async fn lookup(
        &self,
        dashboard: &mut NumberDashboard,
        number: &str,
        refresh: bool,
    ) -> Result<ReputationData> {
        if !refresh {
            if let Some(cached) = dashboard.cached_reputation(number) {
                tracing::debug!("Reputation for {} served from cache", number);
                return Ok(cached.clone());
            }
        }

        let data = if refresh {
            self.api.check_reputation(number).await?
        } else {
            self.api.get_reputation(number).await?
        };

        if data.is_risky() {
            tracing::warn!(
                "⚠️ {} looks risky: {} (danger level {})",
                number,
                data.risk_label(),
                data.danger_level
            );
        }

        dashboard.cache_reputation(number, data.clone());
        Ok(data)
    }
}
