//! 빈 자리 알림 포트.
//!
//! 빈 자리 비율이 임계값 아래로 내려가거나 회복될 때 한 번씩 호출된다.
//! 메시지 브로커 발행은 외부 소비자의 몫이다.

use crate::error::CoreError;
use crate::models::occupancy::OccupancySummary;

/// 빈 자리 비율 전이 이벤트
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VacancyAlert {
    /// 임계값 아래로 진입
    Low(OccupancySummary),
    /// 임계값 이상으로 회복
    Recovered(OccupancySummary),
}

/// 빈 자리 알림 인터페이스
pub trait VacancyNotifier: Send + Sync {
    fn notify(&self, alert: VacancyAlert) -> Result<(), CoreError>;
}
