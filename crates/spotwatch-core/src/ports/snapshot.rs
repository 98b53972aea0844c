//! 빈 자리 스냅샷 저장소 포트.
//!
//! 구현: `spotwatch-storage::snapshot::FileSnapshotWriter`

use crate::error::CoreError;
use crate::models::spot::SpotId;

/// 빈 자리 스냅샷 기록기
pub trait SnapshotSink: Send {
    /// 현재 빈 자리 ID 목록으로 외부 스냅샷을 통째로 교체한다.
    ///
    /// 같은 목록을 두 번 기록하면 결과가 바이트 단위로 같아야 한다.
    fn write_vacant(&mut self, vacant_ids: &[SpotId]) -> Result<(), CoreError>;
}
