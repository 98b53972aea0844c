//! 점유 분류기 포트.
//!
//! 구현: `spotwatch-vision::classifier::LumaVarianceClassifier` (기본값).
//! 내부 인식 알고리즘은 엔진과 무관하며, 테스트에서는 고정값 스텁으로 교체한다.

use image::RgbImage;

use crate::error::CoreError;
use crate::models::occupancy::Occupancy;

/// 주차면 영역 이미지 → 점유 여부
///
/// 부작용이 없어야 하며 엔진과 상태를 공유하지 않는다.
pub trait OccupancyClassifier: Send + Sync {
    /// 잘라낸 주차면 영역을 분류한다.
    ///
    /// 에러를 반환하면 엔진은 해당 주차면의 이전 상태를 유지한다.
    fn classify(&self, region: &RgbImage) -> Result<Occupancy, CoreError>;

    /// 분류기 이름 (로그용)
    fn name(&self) -> &str;
}
