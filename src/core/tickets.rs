use crate::core::selection::{SelectAllOutcome, Selection, SelectionError};
use crate::domain::model::{Priority, Ticket, TicketStats, TicketStatus};
use crate::domain::ports::TicketFilters;

impl TicketStats {
    /// 從目前載入的工單在本地計算統計
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut stats = TicketStats {
            total: tickets.len(),
            ..Default::default()
        };
        for ticket in tickets {
            match ticket.status {
                TicketStatus::Open => stats.open += 1,
                TicketStatus::InProgress => stats.in_progress += 1,
                TicketStatus::WaitingUser => stats.waiting_user += 1,
                TicketStatus::Resolved => stats.resolved += 1,
                TicketStatus::Closed => stats.closed += 1,
            }
            if ticket.assigned_to.is_none() {
                stats.unassigned += 1;
            }
            if ticket.priority == Priority::Urgent {
                stats.urgent += 1;
            }
        }
        stats
    }

    pub fn active(&self) -> usize {
        self.open + self.in_progress + self.waiting_user
    }
}

/// 管理端工單列表的畫面狀態
#[derive(Debug, Default)]
pub struct TicketConsole {
    tickets: Vec<Ticket>,
    stats: TicketStats,
    filters: TicketFilters,
    selection: Selection,
}

impl TicketConsole {
    pub fn new(filters: TicketFilters) -> Self {
        Self {
            filters,
            selection: Selection::unbounded(),
            ..Default::default()
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn stats(&self) -> &TicketStats {
        &self.stats
    }

    pub fn filters(&self) -> &TicketFilters {
        &self.filters
    }

    /// 變更篩選條件時清空選取，避免對看不到的工單做批次操作
    pub fn set_filters(&mut self, filters: TicketFilters) {
        self.filters = filters;
        self.selection.clear();
    }

    pub fn replace_tickets(&mut self, tickets: Vec<Ticket>) {
        let ids: Vec<&str> = tickets.iter().map(|t| t.id.as_str()).collect();
        self.selection.retain(|id| ids.contains(&id));
        self.tickets = tickets;
    }

    pub fn set_stats(&mut self, stats: TicketStats) {
        self.stats = stats;
    }

    pub fn find(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn toggle_selection(&mut self, id: &str) -> Result<bool, SelectionError> {
        let known = self.find(id).is_some();
        self.selection.toggle(id, known)
    }

    pub fn select_all(&mut self) -> SelectAllOutcome {
        let ids: Vec<String> = self.tickets.iter().map(|t| t.id.clone()).collect();
        self.selection.select_all(ids)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.to_vec()
    }
}
