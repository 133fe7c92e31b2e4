use thiserror::Error;

/// 一次批次取消最多可選的號碼數
pub const MAX_BULK_SELECTION: usize = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("{0} cannot be selected: only assigned numbers without a pending cancellation are eligible")]
    NotEligible(String),

    #[error("You can select at most {max} items at a time")]
    LimitReached { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectAllOutcome {
    pub selected: usize,
    /// 因上限而沒被選進來的數量
    pub overflow: usize,
    /// 原本已全選，這次改為清空
    pub cleared: bool,
}

/// 保留選取順序的集合，可選擇性設定上限
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: Vec<String>,
    limit: Option<usize>,
}

impl Selection {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// 切換選取狀態，回傳切換後是否為選取
    ///
    /// 已選取的項目一律可以取消；新選取時不符資格或已達上限會被拒絕，
    /// 拒絕時集合保持不變。
    pub fn toggle(&mut self, key: &str, eligible: bool) -> Result<bool, SelectionError> {
        if let Some(pos) = self.items.iter().position(|k| k == key) {
            self.items.remove(pos);
            return Ok(false);
        }

        if !eligible {
            return Err(SelectionError::NotEligible(key.to_string()));
        }

        if let Some(max) = self.limit {
            if self.items.len() >= max {
                tracing::warn!("⚠️ Selection limit of {} reached, {} not added", max, key);
                return Err(SelectionError::LimitReached { max });
            }
        }

        self.items.push(key.to_string());
        Ok(true)
    }

    /// 全選：依序取前 `limit` 筆符合資格的項目
    ///
    /// 若所有符合資格的項目（在上限內）都已選取，視為取消全選。
    pub fn select_all<I>(&mut self, eligible: I) -> SelectAllOutcome
    where
        I: IntoIterator<Item = String>,
    {
        let eligible: Vec<String> = eligible.into_iter().collect();
        let cap = self.limit.unwrap_or(usize::MAX);
        let take = eligible.len().min(cap);
        let overflow = eligible.len() - take;

        let already_all = take > 0
            && self.items.len() == take
            && eligible[..take].iter().all(|k| self.items.contains(k));
        if already_all {
            self.items.clear();
            return SelectAllOutcome {
                selected: 0,
                overflow: 0,
                cleared: true,
            };
        }

        self.items = eligible.into_iter().take(take).collect();

        if overflow > 0 {
            tracing::warn!(
                "⚠️ Only the first {} items were selected, {} more are eligible",
                take,
                overflow
            );
        }

        SelectAllOutcome {
            selected: take,
            overflow,
            cleared: false,
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|k| k != key);
        before != self.items.len()
    }

    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.items.retain(|k| keep(k));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("+1555{:04}", i)).collect()
    }

    #[test]
    fn test_toggle_selects_and_deselects() {
        let mut selection = Selection::with_limit(MAX_BULK_SELECTION);
        assert_eq!(selection.toggle("+100", true), Ok(true));
        assert!(selection.contains("+100"));
        assert_eq!(selection.toggle("+100", true), Ok(false));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_ineligible_selection_leaves_set_unchanged() {
        let mut selection = Selection::with_limit(MAX_BULK_SELECTION);
        selection.toggle("+100", true).unwrap();

        let result = selection.toggle("+200", false);
        assert_eq!(result, Err(SelectionError::NotEligible("+200".to_string())));
        assert_eq!(selection.to_vec(), vec!["+100".to_string()]);
    }

    #[test]
    fn test_deselect_allowed_even_if_no_longer_eligible() {
        let mut selection = Selection::with_limit(MAX_BULK_SELECTION);
        selection.toggle("+100", true).unwrap();
        assert_eq!(selection.toggle("+100", false), Ok(false));
    }

    #[test]
    fn test_twenty_first_selection_is_rejected() {
        let mut selection = Selection::with_limit(MAX_BULK_SELECTION);
        for key in keys(20) {
            selection.toggle(&key, true).unwrap();
        }
        let before = selection.to_vec();

        let result = selection.toggle("+19999999", true);
        assert_eq!(result, Err(SelectionError::LimitReached { max: 20 }));
        assert_eq!(selection.to_vec(), before);
    }

    #[test]
    fn test_select_all_caps_at_limit_in_order() {
        let mut selection = Selection::with_limit(MAX_BULK_SELECTION);
        let eligible = keys(27);

        let outcome = selection.select_all(eligible.clone());
        assert_eq!(
            outcome,
            SelectAllOutcome {
                selected: 20,
                overflow: 7,
                cleared: false
            }
        );
        assert_eq!(selection.to_vec(), eligible[..20].to_vec());
    }

    #[test]
    fn test_select_all_twice_clears() {
        let mut selection = Selection::with_limit(MAX_BULK_SELECTION);
        let eligible = keys(5);
        selection.select_all(eligible.clone());
        let outcome = selection.select_all(eligible);
        assert!(outcome.cleared);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_with_nothing_eligible() {
        let mut selection = Selection::with_limit(MAX_BULK_SELECTION);
        let outcome = selection.select_all(Vec::new());
        assert_eq!(outcome.selected, 0);
        assert!(!outcome.cleared);
    }

    #[test]
    fn test_unbounded_selection() {
        let mut selection = Selection::unbounded();
        let outcome = selection.select_all(keys(150));
        assert_eq!(outcome.selected, 150);
        assert_eq!(outcome.overflow, 0);
        assert_eq!(selection.limit(), None);
    }

    #[test]
    fn test_retain_and_remove() {
        let mut selection = Selection::unbounded();
        selection.select_all(keys(4));
        assert!(selection.remove("+15550001"));
        assert!(!selection.remove("+15550001"));
        selection.retain(|k| k != "+15550002");
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec!["+15550000", "+15550003"]
        );
    }
}
