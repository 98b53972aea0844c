//! 점유 상태 모델.

use serde::{Deserialize, Serialize};

/// 주차면 점유 상태 (분류기 결과)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    /// 빈 자리
    Vacant,
    /// 차량 있음
    Occupied,
}

impl Occupancy {
    /// `true` = 빈 자리
    pub fn from_vacant(vacant: bool) -> Self {
        if vacant {
            Self::Vacant
        } else {
            Self::Occupied
        }
    }

    pub fn is_vacant(self) -> bool {
        matches!(self, Self::Vacant)
    }
}

/// 현재 점유 현황 요약
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySummary {
    /// 빈 주차면 수
    pub vacant: usize,
    /// 전체 주차면 수
    pub total: usize,
    /// 아직 분류되지 않은 주차면 수
    pub unknown: usize,
}

impl OccupancySummary {
    /// 빈 자리 비율 (0.0 ~ 1.0). 주차면이 없으면 0.0
    pub fn vacancy_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.vacant as f64 / self.total as f64
    }
}

impl std::fmt::Display for OccupancySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Available spots: {} / {}", self.vacant, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vacant_maps_bool() {
        assert_eq!(Occupancy::from_vacant(true), Occupancy::Vacant);
        assert_eq!(Occupancy::from_vacant(false), Occupancy::Occupied);
        assert!(Occupancy::Vacant.is_vacant());
        assert!(!Occupancy::Occupied.is_vacant());
    }

    #[test]
    fn vacancy_ratio() {
        let summary = OccupancySummary {
            vacant: 1,
            total: 4,
            unknown: 0,
        };
        assert!((summary.vacancy_ratio() - 0.25).abs() < f64::EPSILON);
        assert_eq!(summary.to_string(), "Available spots: 1 / 4");
    }

    #[test]
    fn empty_lot_ratio_is_zero() {
        let summary = OccupancySummary {
            vacant: 0,
            total: 0,
            unknown: 0,
        };
        assert_eq!(summary.vacancy_ratio(), 0.0);
    }
}
