//! 화면 상호작용 상태.
//!
//! 선택된 주차면과 빈 자리 목록 스크롤 위치를 컨트롤러가 명시적으로 소유한다.

use serde::{Deserialize, Serialize};

use super::spot::SpotId;

/// 사용자 상호작용 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    /// 현재 선택된 주차면
    pub selected: Option<SpotId>,
    /// 빈 자리 목록의 첫 번째 표시 행
    pub scroll_index: usize,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 선택 갱신. `None`이면 기존 선택 유지
    pub fn select(&mut self, spot: Option<SpotId>) {
        if spot.is_some() {
            self.selected = spot;
        }
    }
}
