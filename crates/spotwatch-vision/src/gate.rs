//! 변화 게이트.
//!
//! `step` 프레임마다 한 번 샘플링 틱이 온다. 틱마다 기준 프레임과의 주차면별
//! 변화 점수를 구하고, 최대 점수 대비 상대 점수가 임계값을 넘는 주차면만
//! 재분류 대상으로 고른다. 기준 프레임은 변화 여부와 무관하게 매 틱 교체된다.
//!
//! 상대 점수 1위가 아닌 주차면의 실제 점유 변화는 다음 틱까지 놓칠 수 있다.
//! 분류 비용을 줄이기 위해 감수하는 근사다.

use image::RgbImage;
use spotwatch_core::config::EngineConfig;
use spotwatch_core::error::CoreError;
use spotwatch_core::models::spot::Spot;
use tracing::debug;

use crate::delta;

/// 한 프레임에 대한 게이트 판단
#[derive(Debug, Clone, PartialEq)]
pub enum TickPlan {
    /// 샘플링 틱 아님: 비교/분류 없음
    Idle,
    /// 기준 프레임 없음: 모든 주차면 분류
    Cold,
    /// 기준 프레임 대비 변화 평가 결과
    Warm {
        /// 주차면별 변화 점수 (주차면 순서)
        scores: Vec<f64>,
        /// 이번 틱 최대 점수
        max_diff: f64,
        /// 재분류 대상 주차면 인덱스 (오름차순)
        selected: Vec<usize>,
    },
}

impl TickPlan {
    pub fn is_sampling(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// 재분류할 주차면 인덱스
    pub fn targets(&self, spot_count: usize) -> Vec<usize> {
        match self {
            Self::Idle => Vec::new(),
            Self::Cold => (0..spot_count).collect(),
            Self::Warm { selected, .. } => selected.clone(),
        }
    }
}

/// 상대 점수 선택: `score / max > threshold`인 인덱스
///
/// 최대 점수가 0이면 아무것도 선택하지 않는다.
pub fn select_changed(scores: &[f64], threshold: f64) -> (f64, Vec<usize>) {
    let max_diff = scores.iter().copied().fold(0.0_f64, f64::max);
    if max_diff <= 0.0 {
        return (0.0, Vec::new());
    }
    let selected = scores
        .iter()
        .enumerate()
        .filter(|(_, score)| **score / max_diff > threshold)
        .map(|(idx, _)| idx)
        .collect();
    (max_diff, selected)
}

/// 기준 프레임 추적 + 샘플링 스케줄
pub struct ChangeGate {
    step: u64,
    threshold: f64,
    frame_counter: u64,
    /// 마지막 샘플링 틱의 프레임 (항상 하나만 유지)
    reference: Option<RgbImage>,
}

impl ChangeGate {
    pub fn new(step: u64, threshold: f64) -> Result<Self, CoreError> {
        if step == 0 {
            return Err(CoreError::validation("step", "1 이상이어야 함"));
        }
        if !(0.0..1.0).contains(&threshold) {
            return Err(CoreError::validation(
                "diff_threshold",
                format!("[0, 1) 범위 밖: {threshold}"),
            ));
        }
        Ok(Self {
            step,
            threshold,
            frame_counter: 0,
            reference: None,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, CoreError> {
        Self::new(config.step, config.diff_threshold)
    }

    /// 처리한 프레임 수
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// 현재 프레임이 샘플링 틱인지
    pub fn is_sampling_tick(&self) -> bool {
        self.frame_counter % self.step == 0
    }

    /// 현재 프레임에 대한 게이트 판단 (상태 변경 없음)
    pub fn plan(&self, frame: &RgbImage, spots: &[Spot]) -> Result<TickPlan, CoreError> {
        if !self.is_sampling_tick() {
            return Ok(TickPlan::Idle);
        }
        let Some(reference) = &self.reference else {
            debug!("콜드 틱 (프레임 {}): 전체 {}개 분류", self.frame_counter, spots.len());
            return Ok(TickPlan::Cold);
        };

        let scores = delta::compute_spot_diffs(reference, frame, spots)?;
        let (max_diff, selected) = select_changed(&scores, self.threshold);

        debug!(
            "웜 틱 (프레임 {}): 최대 변화 {:.2}, 재분류 {}/{}",
            self.frame_counter,
            max_diff,
            selected.len(),
            spots.len()
        );

        Ok(TickPlan::Warm {
            scores,
            max_diff,
            selected,
        })
    }

    /// 프레임 처리 완료. 샘플링 틱이었다면 기준 프레임을 교체한다
    pub fn finish_frame(&mut self, frame: RgbImage) {
        if self.is_sampling_tick() {
            self.reference = Some(frame);
        }
        self.frame_counter += 1;
    }
}
