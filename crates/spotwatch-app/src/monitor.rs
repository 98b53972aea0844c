//! 모니터링 루프.
//!
//! 단일 동기 루프. 반복 하나의 단계:
//! 프레임 획득 → 엔진 처리 (게이트/분류/저장/스냅샷) → 상태 출력 → 명령 적용 → 취소 확인.
//!
//! 블로킹 스레드(`spawn_blocking`)에서 실행되며, 다른 스레드와는 채널로만
//! 통신하므로 엔진 상태에 락이 필요 없다.

use spotwatch_core::error::CoreError;
use spotwatch_core::models::occupancy::OccupancySummary;
use spotwatch_core::ports::frame_source::{FrameRead, FrameSource};
use spotwatch_vision::engine::{FrameReport, OccupancyEngine, TickKind};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::commands::{Command, CommandOutcome, InteractionController};

/// 루프 옵션
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// 스트림 끝에서 되감기
    pub loop_on_end: bool,
    /// 처리 프레임 수 제한
    pub max_frames: Option<u64>,
    /// 반복 간 대기
    pub frame_interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            loop_on_end: true,
            max_frames: None,
            frame_interval: Duration::ZERO,
        }
    }
}

/// 루프 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 종료 신호 (시그널)
    Cancelled,
    /// `q` 명령
    Quit,
    /// 스트림 끝 (되감기 비활성)
    EndOfStream,
    /// `max_frames` 도달
    FrameLimit,
}

/// 루프 실행 통계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    pub frames_processed: u64,
    /// 일시적 실패로 건너뛴 프레임
    pub frames_skipped: u64,
    pub rewinds: u64,
    pub stop_reason: StopReason,
}

/// 모니터링 루프
pub struct MonitorLoop {
    engine: OccupancyEngine,
    source: Box<dyn FrameSource>,
    controller: InteractionController,
    commands: mpsc::Receiver<Command>,
    shutdown: watch::Receiver<bool>,
    options: MonitorOptions,
    last_summary: Option<OccupancySummary>,
}

impl MonitorLoop {
    pub fn new(
        engine: OccupancyEngine,
        source: Box<dyn FrameSource>,
        controller: InteractionController,
        commands: mpsc::Receiver<Command>,
        shutdown: watch::Receiver<bool>,
        options: MonitorOptions,
    ) -> Self {
        Self {
            engine,
            source,
            controller,
            commands,
            shutdown,
            options,
            last_summary: None,
        }
    }

    pub fn engine(&self) -> &OccupancyEngine {
        &self.engine
    }

    /// 루프 실행: 종료 사유가 생길 때까지 블로킹
    ///
    /// 되감기 후 한 바퀴 동안 처리된 프레임이 하나도 없으면 `CoreError::Source`.
    pub fn run(&mut self) -> Result<MonitorStats, CoreError> {
        info!("모니터링 시작: {}", self.source.describe());

        let mut processed = 0u64;
        let mut skipped = 0u64;
        let mut rewinds = 0u64;
        let mut processed_this_pass = 0u64;

        let stop_reason = loop {
            if let Some(limit) = self.options.max_frames {
                if processed >= limit {
                    break StopReason::FrameLimit;
                }
            }

            // 1. 프레임 획득
            let mut rewound = false;
            match self.source.next_frame() {
                Ok(FrameRead::Frame(frame)) => match self.engine.process_frame(frame) {
                    Ok(report) => {
                        processed += 1;
                        processed_this_pass += 1;
                        self.render(&report);
                    }
                    Err(e) => {
                        warn!("프레임 건너뜀: {e}");
                        skipped += 1;
                    }
                },
                Ok(FrameRead::EndOfStream) => {
                    if !self.options.loop_on_end {
                        info!("스트림 끝: 종료");
                        break StopReason::EndOfStream;
                    }
                    if processed_this_pass == 0 && rewinds > 0 {
                        return Err(CoreError::Source(format!(
                            "한 바퀴 동안 읽은 프레임 없음: {}",
                            self.source.describe()
                        )));
                    }
                    self.source.rewind()?;
                    rewinds += 1;
                    processed_this_pass = 0;
                    rewound = true;
                    debug!("스트림 끝: 처음부터 재생 ({rewinds}회)");
                }
                Err(e) => {
                    warn!("프레임 획득 실패 (다음 반복에서 재시도): {e}");
                    skipped += 1;
                }
            }

            // 2. 명령 적용
            if self.drain_commands() == CommandOutcome::Quit {
                info!("종료 명령 수신");
                break StopReason::Quit;
            }

            // 3. 취소 확인
            if *self.shutdown.borrow() {
                break StopReason::Cancelled;
            }

            if !rewound && !self.options.frame_interval.is_zero() {
                std::thread::sleep(self.options.frame_interval);
            }
        };

        let stats = MonitorStats {
            frames_processed: processed,
            frames_skipped: skipped,
            rewinds,
            stop_reason,
        };
        info!(
            "모니터링 종료: {:?}, 처리 {}프레임, 건너뜀 {}, 되감기 {}회",
            stats.stop_reason, stats.frames_processed, stats.frames_skipped, stats.rewinds
        );
        Ok(stats)
    }

    fn drain_commands(&mut self) -> CommandOutcome {
        while let Ok(command) = self.commands.try_recv() {
            if self.controller.apply(command, &self.engine) == CommandOutcome::Quit {
                return CommandOutcome::Quit;
            }
        }
        CommandOutcome::Continue
    }

    /// 상태 출력 (headless 렌더링)
    fn render(&mut self, report: &FrameReport) {
        self.controller.sync(report.vacant_ids.len());

        if report.tick == TickKind::Idle {
            return;
        }

        debug!(
            "프레임 {} {:?}: max_diff={:?}, 재분류 {:?}, 실패 {:?}",
            report.frame_index, report.tick, report.max_diff, report.reclassified, report.failed
        );

        if let Some(id) = self.controller.state().selected {
            debug!("선택된 주차면 {id}: {:?}", self.engine.status_of(id));
        }

        let summary = self.engine.summary();
        if self.last_summary != Some(summary) {
            let rows = self.controller.visible_rows(&report.vacant_ids);
            info!("{summary}: 목록 {:?}", rows);
            self.last_summary = Some(summary);
        }
    }
}
