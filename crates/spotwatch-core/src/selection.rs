//! 화면 좌표 → 주차면 ID 매핑.
//!
//! 두 좌표계를 다룬다:
//! - 오버레이: 리사이즈되어 표시된 영상 위의 포인터 좌표
//! - 목록: 페이지 단위로 스크롤되는 빈 자리 목록 위젯의 포인터 좌표
//!
//! 선택/스크롤 상태는 호출자가 소유한 [`InteractionState`]로 주고받는다.

use crate::error::CoreError;
use crate::models::interaction::InteractionState;
use crate::models::spot::{Spot, SpotId};

/// 표시 영상 좌표 → 원본 프레임 좌표 매퍼
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayMapper {
    scale_x: f64,
    scale_y: f64,
}

impl OverlayMapper {
    /// 원본/표시 크기로 매퍼 생성
    pub fn new(
        original: (u32, u32),
        display: (u32, u32),
    ) -> Result<Self, CoreError> {
        if display.0 == 0 || display.1 == 0 {
            return Err(CoreError::validation("display", "표시 크기는 0일 수 없음"));
        }
        Ok(Self {
            scale_x: f64::from(original.0) / f64::from(display.0),
            scale_y: f64::from(original.1) / f64::from(display.1),
        })
    }

    /// 표시 좌표를 원본 프레임 좌표로 변환
    pub fn to_source(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale_x, y * self.scale_y)
    }

    /// 원본 좌표를 표시 좌표로 변환
    pub fn to_display(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.scale_x, y / self.scale_y)
    }

    /// 포인터 좌표를 포함하는 첫 번째 주차면 ID
    pub fn select(&self, spots: &[Spot], x: f64, y: f64) -> Option<SpotId> {
        let (sx, sy) = self.to_source(x, y);
        spots
            .iter()
            .find(|spot| spot.bbox.contains(sx, sy))
            .map(|spot| spot.id)
    }
}

/// 빈 자리 목록 위젯 레이아웃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLayout {
    /// 한 번에 보이는 행 수
    pub visible_count: usize,
    /// 행 높이 (픽셀)
    pub row_height: u32,
    /// 헤더 높이 (픽셀)
    pub header_height: u32,
}

impl ListLayout {
    pub fn new(visible_count: usize, row_height: u32, header_height: u32) -> Result<Self, CoreError> {
        if row_height == 0 {
            return Err(CoreError::validation("row_height", "행 높이는 0일 수 없음"));
        }
        if visible_count == 0 {
            return Err(CoreError::validation("visible_count", "표시 행 수는 0일 수 없음"));
        }
        Ok(Self {
            visible_count,
            row_height,
            header_height,
        })
    }

    /// 클릭 y 좌표가 가리키는 목록 행 (스크롤 반영, floor 나눗셈)
    pub fn row_at(&self, state: &InteractionState, y: i64) -> i64 {
        (y - i64::from(self.header_height)).div_euclid(i64::from(self.row_height))
            + state.scroll_index as i64
    }

    /// 클릭 위치의 빈 주차면 ID
    pub fn select(&self, state: &InteractionState, vacant_ids: &[SpotId], y: i64) -> Option<SpotId> {
        let row = self.row_at(state, y);
        usize::try_from(row)
            .ok()
            .and_then(|row| vacant_ids.get(row))
            .copied()
    }

    /// 현재 표시 구간
    pub fn visible<'a>(&self, state: &InteractionState, vacant_ids: &'a [SpotId]) -> &'a [SpotId] {
        let start = state.scroll_index.min(vacant_ids.len());
        let end = (start + self.visible_count).min(vacant_ids.len());
        &vacant_ids[start..end]
    }

    /// 최대 스크롤 위치 (`len - visible_count`, 음수면 0)
    pub fn max_scroll(&self, vacant_len: usize) -> usize {
        vacant_len.saturating_sub(self.visible_count)
    }

    /// 한 행 위로 스크롤
    pub fn scroll_up(&self, state: &mut InteractionState) {
        state.scroll_index = state.scroll_index.saturating_sub(1);
    }

    /// 한 행 아래로 스크롤
    pub fn scroll_down(&self, state: &mut InteractionState, vacant_len: usize) {
        if state.scroll_index < self.max_scroll(vacant_len) {
            state.scroll_index += 1;
        }
    }

    /// 목록이 줄어든 경우 스크롤 위치를 범위 안으로 되돌림
    pub fn clamp_scroll(&self, state: &mut InteractionState, vacant_len: usize) {
        state.scroll_index = state.scroll_index.min(self.max_scroll(vacant_len));
    }
}
