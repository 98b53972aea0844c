//! 주차면 영역 변화 점수.
//!
//! 기준 프레임과 현재 프레임에서 같은 주차면 영역의 평균 밝기를 각각 구하고
//! 두 평균의 절대 차이(0.0 ~ 255.0)를 점수로 쓴다. 픽셀 단위 차이가 아니므로
//! 영역 평균이 그대로인 재배치(예: 반전된 체커보드)는 0점이다.

use image::RgbImage;
use spotwatch_core::error::CoreError;
use spotwatch_core::models::spot::{BoundingBox, Spot};

/// RGB 3바이트
const CHANNELS: usize = 3;

/// 모든 주차면의 변화 점수 계산 (주차면 순서와 동일)
pub fn compute_spot_diffs(
    reference: &RgbImage,
    current: &RgbImage,
    spots: &[Spot],
) -> Result<Vec<f64>, CoreError> {
    let (rw, rh) = reference.dimensions();
    let (cw, ch) = current.dimensions();
    if rw != cw || rh != ch {
        return Err(CoreError::Source(format!(
            "프레임 해상도 불일치: 기준 {rw}x{rh}, 현재 {cw}x{ch}"
        )));
    }

    let ref_raw = reference.as_raw();
    let cur_raw = current.as_raw();
    let stride = cw as usize * CHANNELS;

    spots
        .iter()
        .map(|spot| {
            if !spot.bbox.fits_within(cw, ch) {
                return Err(CoreError::Layout(format!(
                    "주차면 {} 영역이 프레임 밖: {:?}",
                    spot.id, spot.bbox
                )));
            }
            Ok(region_diff(ref_raw, cur_raw, stride, &spot.bbox))
        })
        .collect()
}

/// 영역 평균 차이: 바이트 슬라이스 직접 접근
///
/// 호출자가 `bbox`가 프레임 안에 있음을 보장한다.
#[inline]
fn region_diff(prev: &[u8], curr: &[u8], stride: usize, bbox: &BoundingBox) -> f64 {
    let start_x = bbox.x as usize * CHANNELS;
    let end_x = bbox.right() as usize * CHANNELS;
    let start_y = bbox.y as usize;
    let end_y = bbox.bottom() as usize;

    let mut prev_sum = 0u64;
    let mut curr_sum = 0u64;
    let mut sample_count = 0u64;

    for y in start_y..end_y {
        let row_offset = y * stride;
        let prev_row = &prev[row_offset + start_x..row_offset + end_x];
        let curr_row = &curr[row_offset + start_x..row_offset + end_x];

        prev_sum += prev_row.iter().map(|&v| u64::from(v)).sum::<u64>();
        curr_sum += curr_row.iter().map(|&v| u64::from(v)).sum::<u64>();
        sample_count += (end_x - start_x) as u64;
    }

    if sample_count == 0 {
        return 0.0;
    }

    curr_sum.abs_diff(prev_sum) as f64 / sample_count as f64
}
