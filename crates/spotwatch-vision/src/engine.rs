//! 점유 추적 엔진.
//!
//! 프레임 하나를 처리하는 순서:
//! 1. 변화 게이트 판단 (콜드/웜/대기)
//! 2. 선택된 주차면만 분류기 호출 → 상태 저장소 갱신
//! 3. 샘플링 틱이면 기준 프레임 교체
//! 4. 빈 자리 스냅샷 기록 (매 프레임)
//! 5. 빈 자리 비율 전이 시 알림
//!
//! 분류 실패는 해당 주차면만 이전 상태를 유지하고, 스냅샷/알림 실패는
//! 로그만 남긴다. 어느 쪽도 루프를 멈추지 않는다.

use image::{imageops, RgbImage};
use spotwatch_core::config::EngineConfig;
use spotwatch_core::error::CoreError;
use spotwatch_core::models::occupancy::{Occupancy, OccupancySummary};
use spotwatch_core::models::spot::{Spot, SpotId};
use spotwatch_core::ports::classifier::OccupancyClassifier;
use spotwatch_core::ports::notifier::{VacancyAlert, VacancyNotifier};
use spotwatch_core::ports::snapshot::SnapshotSink;
use spotwatch_core::status::StatusStore;
use tracing::{debug, info, warn};

use crate::gate::{ChangeGate, TickPlan};

/// 틱 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Idle,
    Cold,
    Warm,
}

/// 프레임 처리 결과
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// 처리한 프레임 번호 (0부터)
    pub frame_index: u64,
    pub tick: TickKind,
    /// 웜 틱의 최대 변화 점수
    pub max_diff: Option<f64>,
    /// 분류기가 호출된 주차면
    pub reclassified: Vec<SpotId>,
    /// 분류에 실패해 이전 상태를 유지한 주차면
    pub failed: Vec<SpotId>,
    /// 이번 프레임 기준 빈 자리 ID
    pub vacant_ids: Vec<SpotId>,
    /// 스냅샷 기록 성공 여부
    pub snapshot_written: bool,
}

/// 빈 자리 알림 설정
struct AlertHook {
    notifier: Box<dyn VacancyNotifier>,
    low_ratio: f64,
    /// 마지막으로 알린 상태 (`true` = 부족)
    last_low: Option<bool>,
}

/// 점유 추적 엔진
pub struct OccupancyEngine {
    spots: Vec<Spot>,
    frame_size: (u32, u32),
    gate: ChangeGate,
    store: StatusStore,
    classifier: Box<dyn OccupancyClassifier>,
    snapshot: Box<dyn SnapshotSink>,
    alert: Option<AlertHook>,
}

impl OccupancyEngine {
    /// 엔진 생성
    ///
    /// 모든 주차면은 `frame_size` 안에 있어야 하고 ID는 `1..=N` 연속이어야 한다.
    pub fn new(
        spots: Vec<Spot>,
        frame_size: (u32, u32),
        config: &EngineConfig,
        classifier: Box<dyn OccupancyClassifier>,
        snapshot: Box<dyn SnapshotSink>,
    ) -> Result<Self, CoreError> {
        if spots.is_empty() {
            return Err(CoreError::Layout("주차면이 없음".to_string()));
        }
        for (idx, spot) in spots.iter().enumerate() {
            if spot.id as usize != idx + 1 {
                return Err(CoreError::Layout(format!(
                    "주차면 ID 불연속: 위치 {} 에 ID {}",
                    idx + 1,
                    spot.id
                )));
            }
            if !spot.bbox.fits_within(frame_size.0, frame_size.1) {
                return Err(CoreError::Layout(format!(
                    "주차면 {} 영역이 프레임({}x{}) 밖: {:?}",
                    spot.id, frame_size.0, frame_size.1, spot.bbox
                )));
            }
        }

        let gate = ChangeGate::from_config(config)?;
        let store = StatusStore::new(spots.len());

        info!(
            "엔진 준비: 주차면 {}개, step={}, threshold={}, 분류기={}",
            spots.len(),
            config.step,
            config.diff_threshold,
            classifier.name()
        );

        Ok(Self {
            spots,
            frame_size,
            gate,
            store,
            classifier,
            snapshot,
            alert: None,
        })
    }

    /// 빈 자리 비율 알림 연결
    pub fn with_notifier(mut self, notifier: Box<dyn VacancyNotifier>, low_ratio: f64) -> Self {
        self.alert = Some(AlertHook {
            notifier,
            low_ratio,
            last_low: None,
        });
        self
    }

    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    pub fn status_of(&self, spot_id: SpotId) -> Option<Occupancy> {
        self.store.status_of(spot_id)
    }

    pub fn vacant_ids(&self) -> Vec<SpotId> {
        self.store.vacant_ids()
    }

    pub fn summary(&self) -> OccupancySummary {
        self.store.summary()
    }

    pub fn frames_processed(&self) -> u64 {
        self.gate.frame_counter()
    }

    /// 프레임 하나 처리
    ///
    /// 해상도가 맞지 않는 프레임은 `CoreError::Source`로 거부되며 프레임 카운터도
    /// 증가하지 않는다 (일시적 실패로 취급).
    pub fn process_frame(&mut self, frame: RgbImage) -> Result<FrameReport, CoreError> {
        if frame.dimensions() != self.frame_size {
            return Err(CoreError::Source(format!(
                "프레임 해상도 불일치: {}x{}, 기대 {}x{}",
                frame.width(),
                frame.height(),
                self.frame_size.0,
                self.frame_size.1
            )));
        }

        let frame_index = self.gate.frame_counter();
        let plan = self.gate.plan(&frame, &self.spots)?;
        let (tick, max_diff) = match &plan {
            TickPlan::Idle => (TickKind::Idle, None),
            TickPlan::Cold => (TickKind::Cold, None),
            TickPlan::Warm { max_diff, .. } => (TickKind::Warm, Some(*max_diff)),
        };

        let targets = plan.targets(self.spots.len());
        let (reclassified, failed) = self.reclassify(&frame, &targets);

        self.gate.finish_frame(frame);

        let vacant_ids = self.store.vacant_ids();
        let snapshot_written = match self.snapshot.write_vacant(&vacant_ids) {
            Ok(()) => true,
            Err(e) => {
                warn!("스냅샷 기록 실패 (다음 프레임에서 재시도): {e}");
                false
            }
        };

        if plan.is_sampling() {
            self.check_vacancy_alert();
        }

        Ok(FrameReport {
            frame_index,
            tick,
            max_diff,
            reclassified,
            failed,
            vacant_ids,
            snapshot_written,
        })
    }

    /// 대상 주차면 재분류. (성공 ID, 실패 ID) 반환
    fn reclassify(&mut self, frame: &RgbImage, targets: &[usize]) -> (Vec<SpotId>, Vec<SpotId>) {
        let mut reclassified = Vec::with_capacity(targets.len());
        let mut failed = Vec::new();

        for &idx in targets {
            let spot = self.spots[idx];
            let b = spot.bbox;
            let crop = imageops::crop_imm(frame, b.x, b.y, b.width, b.height).to_image();

            let result = self.classifier.classify(&crop).and_then(|status| {
                self.store.update(spot.id, status)?;
                Ok(status)
            });

            match result {
                Ok(status) => {
                    debug!("주차면 {} 분류: {:?}", spot.id, status);
                    reclassified.push(spot.id);
                }
                Err(e) => {
                    let err = CoreError::Classification {
                        spot_id: spot.id,
                        message: e.to_string(),
                    };
                    warn!("{err}: 이전 상태 유지");
                    failed.push(spot.id);
                }
            }
        }

        (reclassified, failed)
    }

    /// 빈 자리 비율이 임계값을 넘나들 때만 알림
    fn check_vacancy_alert(&mut self) {
        let summary = self.store.summary();
        let Some(hook) = self.alert.as_mut() else {
            return;
        };

        let is_low = summary.vacancy_ratio() < hook.low_ratio;
        let alert = match (hook.last_low, is_low) {
            (None, true) | (Some(false), true) => Some(VacancyAlert::Low(summary)),
            (Some(true), false) => Some(VacancyAlert::Recovered(summary)),
            _ => None,
        };
        hook.last_low = Some(is_low);

        if let Some(alert) = alert {
            if let Err(e) = hook.notifier.notify(alert) {
                warn!("빈 자리 알림 실패: {e}");
            }
        }
    }
}
