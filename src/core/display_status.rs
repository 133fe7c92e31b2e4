use crate::domain::model::{DisplayStatus, PhoneNumber, PhoneNumberRequest};
use std::collections::HashSet;

/// 依據請求清單推導號碼的顯示狀態
///
/// 只要有任何一筆 pending / approved 的取消請求指向該號碼，就顯示為
/// `PendingCancellation`；否則顯示儲存的狀態。
pub fn display_status(number: &PhoneNumber, requests: &[PhoneNumberRequest]) -> DisplayStatus {
    if has_open_cancellation(&number.number, requests) {
        DisplayStatus::PendingCancellation
    } else {
        number.status.into()
    }
}

pub fn has_open_cancellation(number: &str, requests: &[PhoneNumberRequest]) -> bool {
    requests.iter().any(|r| r.is_open_cancellation_for(number))
}

/// 可否加入批次取消：顯示狀態為 assigned 且沒有進行中的取消請求
pub fn is_selectable(number: &PhoneNumber, requests: &[PhoneNumberRequest]) -> bool {
    display_status(number, requests) == DisplayStatus::Assigned
}

/// 有進行中取消請求的號碼集合，整份清單只掃一次
#[derive(Debug, Clone, Default)]
pub struct CancellationIndex {
    pending: HashSet<String>,
}

impl CancellationIndex {
    pub fn build(requests: &[PhoneNumberRequest]) -> Self {
        let pending = requests
            .iter()
            .filter(|r| r.is_open_cancellation_for(&r.phone_number))
            .map(|r| r.phone_number.clone())
            .collect();
        Self { pending }
    }

    pub fn has_open_cancellation(&self, number: &str) -> bool {
        self.pending.contains(number)
    }

    pub fn display_status(&self, number: &PhoneNumber) -> DisplayStatus {
        if self.has_open_cancellation(&number.number) {
            DisplayStatus::PendingCancellation
        } else {
            number.status.into()
        }
    }

    pub fn is_selectable(&self, number: &PhoneNumber) -> bool {
        self.display_status(number) == DisplayStatus::Assigned
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
