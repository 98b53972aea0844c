//! 주차면별 점유 상태 저장소.
//!
//! 분류 결과를 다음 재분류 전까지 메모이즈한다. 명시적 `update` 호출 외에는
//! 어떤 상태도 지워지지 않으며, 재분류되지 않은 주차면은 이전 값을 그대로 유지한다.

use crate::error::CoreError;
use crate::models::occupancy::{Occupancy, OccupancySummary};
use crate::models::spot::SpotId;

/// 점유 상태 저장소: 인덱스 = 주차면 ID - 1
#[derive(Debug, Clone)]
pub struct StatusStore {
    statuses: Vec<Option<Occupancy>>,
}

impl StatusStore {
    /// 주차면 수만큼 미분류 상태로 초기화
    pub fn new(spot_count: usize) -> Self {
        Self {
            statuses: vec![None; spot_count],
        }
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// 주차면 상태 갱신
    pub fn update(&mut self, spot_id: SpotId, status: Occupancy) -> Result<(), CoreError> {
        let len = self.statuses.len();
        let slot = spot_id
            .checked_sub(1)
            .and_then(|idx| self.statuses.get_mut(idx as usize))
            .ok_or_else(|| {
                CoreError::validation(
                    "spot_id",
                    format!("범위 밖 주차면 ID {spot_id} (1..={len})"),
                )
            })?;
        *slot = Some(status);
        Ok(())
    }

    /// 주차면 상태 조회. 아직 분류되지 않았거나 ID가 없으면 `None`
    pub fn status_of(&self, spot_id: SpotId) -> Option<Occupancy> {
        let idx = spot_id.checked_sub(1)? as usize;
        self.statuses.get(idx).copied().flatten()
    }

    /// 현재 빈 주차면 ID (오름차순, 중복 없음)
    pub fn vacant_ids(&self) -> Vec<SpotId> {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, status)| matches!(status, Some(Occupancy::Vacant)))
            .map(|(idx, _)| idx as SpotId + 1)
            .collect()
    }

    /// 점유 현황 요약
    pub fn summary(&self) -> OccupancySummary {
        let mut summary = OccupancySummary {
            vacant: 0,
            total: self.statuses.len(),
            unknown: 0,
        };
        for status in &self.statuses {
            match status {
                Some(Occupancy::Vacant) => summary.vacant += 1,
                Some(Occupancy::Occupied) => {}
                None => summary.unknown += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_undefined() {
        let store = StatusStore::new(3);
        assert_eq!(store.len(), 3);
        assert_eq!(store.status_of(1), None);
        assert!(store.vacant_ids().is_empty());
        assert_eq!(store.summary().unknown, 3);
    }

    #[test]
    fn update_and_query() {
        let mut store = StatusStore::new(3);
        store.update(1, Occupancy::Vacant).unwrap();
        store.update(2, Occupancy::Occupied).unwrap();
        store.update(3, Occupancy::Vacant).unwrap();

        assert_eq!(store.status_of(2), Some(Occupancy::Occupied));
        assert_eq!(store.vacant_ids(), vec![1, 3]);
    }

    #[test]
    fn toggling_never_duplicates() {
        let mut store = StatusStore::new(2);
        for _ in 0..5 {
            store.update(2, Occupancy::Vacant).unwrap();
            store.update(2, Occupancy::Occupied).unwrap();
            store.update(2, Occupancy::Vacant).unwrap();
        }
        assert_eq!(store.vacant_ids(), vec![2]);
    }

    #[test]
    fn out_of_range_update_rejected() {
        let mut store = StatusStore::new(2);
        assert!(store.update(0, Occupancy::Vacant).is_err());
        let err = store.update(3, Occupancy::Vacant).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(err.to_string().contains("1..=2"));
        assert_eq!(store.status_of(0), None);
        assert_eq!(store.status_of(9), None);
    }

    #[test]
    fn summary_counts() {
        let mut store = StatusStore::new(4);
        store.update(1, Occupancy::Vacant).unwrap();
        store.update(2, Occupancy::Occupied).unwrap();
        let summary = store.summary();
        assert_eq!(summary.vacant, 1);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.unknown, 2);
    }
}
