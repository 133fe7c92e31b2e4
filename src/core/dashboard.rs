use crate::core::display_status::CancellationIndex;
use crate::core::pagination::{PaginationError, Paginator};
use crate::core::selection::{SelectAllOutcome, Selection, SelectionError, MAX_BULK_SELECTION};
use crate::domain::model::{
    BackorderRequest, DisplayStatus, PhoneNumber, PhoneNumberRequest, ReputationData,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(DisplayStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: DisplayStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// 儀表板上方的統計卡片
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_numbers: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub monthly_cost: f64,
    pub pending_requests: usize,
    pub pending_backorders: usize,
}

/// 號碼清單畫面的狀態：資料、篩選、分頁、選取與信譽快取
#[derive(Debug, Default)]
pub struct NumberDashboard {
    numbers: Vec<PhoneNumber>,
    requests: Vec<PhoneNumberRequest>,
    backorders: Vec<BackorderRequest>,
    index: CancellationIndex,
    search_term: String,
    status_filter: StatusFilter,
    paginator: Paginator,
    selection: Selection,
    reputation: HashMap<String, ReputationData>,
}

impl NumberDashboard {
    pub fn new(page_size: usize) -> Result<Self, PaginationError> {
        Ok(Self {
            paginator: Paginator::new(page_size)?,
            selection: Selection::with_limit(MAX_BULK_SELECTION),
            ..Default::default()
        })
    }

    /// 重新載入資料；已不符資格的選取會被移除
    pub fn replace_data(
        &mut self,
        numbers: Vec<PhoneNumber>,
        requests: Vec<PhoneNumberRequest>,
        backorders: Vec<BackorderRequest>,
    ) {
        self.index = CancellationIndex::build(&requests);
        self.numbers = numbers;
        self.requests = requests;
        self.backorders = backorders;

        let eligible: Vec<&str> = self
            .numbers
            .iter()
            .filter(|n| self.index.is_selectable(n))
            .map(|n| n.number.as_str())
            .collect();
        let before = self.selection.len();
        self.selection.retain(|key| eligible.contains(&key));
        if before != self.selection.len() {
            tracing::debug!(
                "Dropped {} selected numbers that are no longer eligible",
                before - self.selection.len()
            );
        }

        let filtered = self.filtered().len();
        self.paginator.go_to(self.paginator.current_page(), filtered);
    }

    pub fn numbers(&self) -> &[PhoneNumber] {
        &self.numbers
    }

    pub fn requests(&self) -> &[PhoneNumberRequest] {
        &self.requests
    }

    pub fn backorders(&self) -> &[BackorderRequest] {
        &self.backorders
    }

    pub fn find(&self, number: &str) -> Option<&PhoneNumber> {
        self.numbers.iter().find(|n| n.number == number)
    }

    pub fn display_status(&self, number: &PhoneNumber) -> DisplayStatus {
        self.index.display_status(number)
    }

    pub fn is_selectable(&self, number: &PhoneNumber) -> bool {
        self.index.is_selectable(number)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.paginator.reset();
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.paginator.reset();
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PaginationError> {
        self.paginator.set_page_size(page_size)
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn current_page(&self) -> usize {
        self.paginator.effective_page(self.filtered().len())
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        let total = self.filtered().len();
        self.paginator.go_to(page, total)
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.filtered().len())
    }

    pub fn page_window(&self) -> Vec<usize> {
        self.paginator.page_window(self.filtered().len())
    }

    fn matches_search(number: &PhoneNumber, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        number.number.to_lowercase().contains(needle)
            || number.country.to_lowercase().contains(needle)
            || number.number_type.as_str().contains(needle)
            || number
                .country_code
                .as_deref()
                .is_some_and(|code| code.to_lowercase().contains(needle))
    }

    /// 套用搜尋字串與狀態篩選，保持原始順序
    pub fn filtered(&self) -> Vec<&PhoneNumber> {
        let needle = self.search_term.trim().to_lowercase();
        self.numbers
            .iter()
            .filter(|n| Self::matches_search(n, &needle))
            .filter(|n| self.status_filter.matches(self.index.display_status(n)))
            .collect()
    }

    pub fn paginated(&self) -> Vec<&PhoneNumber> {
        let filtered = self.filtered();
        self.paginator.slice(&filtered).to_vec()
    }

    pub fn eligible_numbers(&self) -> Vec<&PhoneNumber> {
        self.filtered()
            .into_iter()
            .filter(|n| self.index.is_selectable(n))
            .collect()
    }

    pub fn toggle_selection(&mut self, number: &str) -> Result<bool, SelectionError> {
        let eligible = self.find(number).is_some_and(|n| self.index.is_selectable(n));
        self.selection.toggle(number, eligible)
    }

    pub fn select_all(&mut self) -> SelectAllOutcome {
        let eligible: Vec<String> = self
            .eligible_numbers()
            .into_iter()
            .map(|n| n.number.clone())
            .collect();
        self.selection.select_all(eligible)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn cached_reputation(&self, number: &str) -> Option<&ReputationData> {
        self.reputation.get(number)
    }

    /// 以查詢時的號碼為鍵；回應中的號碼可能已被伺服器正規化
    pub fn cache_reputation(&mut self, number: &str, data: ReputationData) {
        self.reputation.insert(number.to_string(), data);
    }

    pub fn summary(&self) -> DashboardSummary {
        let mut by_status = BTreeMap::new();
        for number in &self.numbers {
            *by_status.entry(self.index.display_status(number).as_str()).or_insert(0) += 1;
        }

        let monthly_cost = self
            .numbers
            .iter()
            .filter(|n| {
                matches!(
                    self.index.display_status(n),
                    DisplayStatus::Assigned | DisplayStatus::PendingCancellation
                )
            })
            .map(|n| n.monthly_rate)
            .sum();

        DashboardSummary {
            total_numbers: self.numbers.len(),
            by_status,
            monthly_cost,
            pending_requests: self.requests.iter().filter(|r| r.status.is_open()).count(),
            pending_backorders: self.backorders.iter().filter(|r| r.status.is_open()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display_status::fixtures::*;
    use crate::domain::model::{NumberStatus, NumberType, RequestStatus, RequestType};

    fn dashboard_with(numbers: Vec<PhoneNumber>, requests: Vec<PhoneNumberRequest>) -> NumberDashboard {
        let mut dashboard = NumberDashboard::new(6).unwrap();
        dashboard.replace_data(numbers, requests, Vec::new());
        dashboard
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut dashboard = dashboard_with(assigned_numbers(30), Vec::new());
        dashboard.go_to_page(4);
        assert_eq!(dashboard.current_page(), 4);

        dashboard.set_search_term("+1555");
        assert_eq!(dashboard.current_page(), 1);

        dashboard.go_to_page(3);
        dashboard.set_status_filter(StatusFilter::Only(DisplayStatus::Assigned));
        assert_eq!(dashboard.current_page(), 1);

        dashboard.go_to_page(2);
        dashboard.set_page_size(12).unwrap();
        assert_eq!(dashboard.current_page(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut numbers = assigned_numbers(3);
        numbers[1].country = "Germany".to_string();
        numbers[2].number_type = NumberType::TollFree;
        let mut dashboard = dashboard_with(numbers, Vec::new());

        dashboard.set_search_term("GERMANY");
        assert_eq!(dashboard.filtered().len(), 1);

        dashboard.set_search_term("toll");
        assert_eq!(dashboard.filtered()[0].number, "+15550000002");

        dashboard.set_search_term("  ");
        assert_eq!(dashboard.filtered().len(), 3);
    }

    #[test]
    fn test_status_filter_uses_display_status() {
        let numbers = vec![
            number("+100", NumberStatus::Assigned),
            number("+200", NumberStatus::Assigned),
            number("+300", NumberStatus::Suspended),
        ];
        let requests = vec![request("+200", RequestType::Cancel, RequestStatus::Pending)];
        let mut dashboard = dashboard_with(numbers, requests);

        dashboard.set_status_filter(StatusFilter::Only(DisplayStatus::PendingCancellation));
        let shown: Vec<_> = dashboard.filtered().iter().map(|n| n.number.clone()).collect();
        assert_eq!(shown, vec!["+200"]);

        dashboard.set_status_filter(StatusFilter::Only(DisplayStatus::Assigned));
        let shown: Vec<_> = dashboard.filtered().iter().map(|n| n.number.clone()).collect();
        assert_eq!(shown, vec!["+100"]);
    }

    #[test]
    fn test_paginated_pages_cover_filtered_set() {
        let mut numbers = assigned_numbers(40);
        for n in numbers.iter_mut().skip(35) {
            n.status = NumberStatus::Cancelled;
        }
        let mut dashboard = dashboard_with(numbers, Vec::new());
        dashboard.set_status_filter(StatusFilter::Only(DisplayStatus::Assigned));

        for size in crate::core::pagination::PAGE_SIZES {
            dashboard.set_page_size(size).unwrap();
            let mut seen = Vec::new();
            for page in 1..=dashboard.total_pages() {
                dashboard.go_to_page(page);
                let current = dashboard.paginated();
                assert!(current.len() <= size);
                seen.extend(current.into_iter().map(|n| n.number.clone()));
            }
            let expected: Vec<_> = dashboard.filtered().iter().map(|n| n.number.clone()).collect();
            assert_eq!(seen, expected);
            assert_eq!(seen.len(), 35);
        }
    }

    #[test]
    fn test_toggle_rejects_ineligible_number() {
        let numbers = vec![
            number("+100", NumberStatus::Assigned),
            number("+200", NumberStatus::Assigned),
        ];
        let requests = vec![request("+200", RequestType::Cancel, RequestStatus::Approved)];
        let mut dashboard = dashboard_with(numbers, requests);

        assert_eq!(dashboard.toggle_selection("+100"), Ok(true));
        assert!(matches!(
            dashboard.toggle_selection("+200"),
            Err(SelectionError::NotEligible(_))
        ));
        assert!(matches!(
            dashboard.toggle_selection("+999"),
            Err(SelectionError::NotEligible(_))
        ));
        assert_eq!(dashboard.selection().to_vec(), vec!["+100".to_string()]);
    }

    #[test]
    fn test_select_all_never_exceeds_twenty() {
        let mut dashboard = dashboard_with(assigned_numbers(33), Vec::new());
        let outcome = dashboard.select_all();
        assert_eq!(outcome.selected, 20);
        assert_eq!(outcome.overflow, 13);
        assert_eq!(dashboard.selection().len(), 20);
        assert_eq!(dashboard.selection().iter().next(), Some("+15550000000"));
    }

    #[test]
    fn test_refresh_drops_selection_that_became_ineligible() {
        let mut dashboard = dashboard_with(assigned_numbers(3), Vec::new());
        dashboard.select_all();
        assert_eq!(dashboard.selection().len(), 3);

        let requests = vec![request("+15550000001", RequestType::Cancel, RequestStatus::Pending)];
        dashboard.replace_data(assigned_numbers(3), requests, Vec::new());
        assert_eq!(dashboard.selection().len(), 2);
        assert!(!dashboard.selection().contains("+15550000001"));
    }

    #[test]
    fn test_summary_counts() {
        let mut numbers = assigned_numbers(4);
        numbers[3].status = NumberStatus::Suspended;
        let requests = vec![
            request("+15550000000", RequestType::Cancel, RequestStatus::Pending),
            request("+15550000001", RequestType::Modify, RequestStatus::Completed),
        ];
        let dashboard = dashboard_with(numbers, requests);
        let summary = dashboard.summary();

        assert_eq!(summary.total_numbers, 4);
        assert_eq!(summary.by_status.get("assigned"), Some(&2));
        assert_eq!(summary.by_status.get("pending_cancellation"), Some(&1));
        assert_eq!(summary.by_status.get("suspended"), Some(&1));
        assert!((summary.monthly_cost - 4.5).abs() < f64::EPSILON);
        assert_eq!(summary.pending_requests, 1);
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "assigned".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(DisplayStatus::Assigned))
        );
        assert!("whatever".parse::<StatusFilter>().is_err());
    }
}
