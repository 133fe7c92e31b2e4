use crate::core::tickets::TicketConsole;
use crate::domain::model::TicketStatus;
use crate::domain::ports::{TicketApi, TicketFilters};
use crate::utils::error::{PortalError, Result};
use std::sync::Arc;

/// 管理端工單主控台：讀取列表與統計、批次指派與批次改狀態
pub struct TicketAdmin<A: TicketApi> {
    api: Arc<A>,
    console: TicketConsole,
}

impl<A: TicketApi> TicketAdmin<A> {
    pub fn new(api: Arc<A>, filters: TicketFilters) -> Self {
        Self {
            api,
            console: TicketConsole::new(filters),
        }
    }

    pub fn console(&self) -> &TicketConsole {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut TicketConsole {
        &mut self.console
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let (tickets, stats) = tokio::try_join!(
            self.api.list_tickets(self.console.filters()),
            self.api.ticket_stats()
        )?;
        tracing::info!("📂 Loaded {} tickets ({} total)", tickets.len(), stats.total);
        self.console.replace_tickets(tickets);
        self.console.set_stats(stats);
        Ok(())
    }

    pub async fn apply_filters(&mut self, filters: TicketFilters) -> Result<()> {
        self.console.set_filters(filters);
        self.refresh().await
    }

    fn selected_or_err(&self) -> Result<Vec<String>> {
        let ids = self.console.selected_ids();
        if ids.is_empty() {
            return Err(PortalError::EmptySelection {
                message: "Select at least one ticket first".to_string(),
            });
        }
        Ok(ids)
    }

    pub async fn bulk_assign(&mut self, assignee: &str) -> Result<usize> {
        crate::utils::validation::validate_non_empty_string("assignee", assignee)?;
        let ids = self.selected_or_err()?;

        let updated = self.api.bulk_assign(&ids, assignee).await?;
        tracing::info!("👤 Assigned {} of {} tickets to {}", updated, ids.len(), assignee);

        self.console.clear_selection();
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn bulk_update_status(&mut self, status: TicketStatus) -> Result<usize> {
        let ids = self.selected_or_err()?;

        let updated = self.api.bulk_update_status(&ids, status).await?;
        tracing::info!("🔄 Moved {} of {} tickets to {}", updated, ids.len(), status.as_str());

        self.console.clear_selection();
        self.refresh().await?;
        Ok(updated)
    }
}
