//! # spotwatch-app
//!
//! SPOTWATCH 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 모니터링 루프와 라이프사이클 관리.

mod commands;
mod lifecycle;
mod monitor;
mod notifier;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::ProjectDirs;
use spotwatch_core::config_manager::{ConfigManager, ConfigOverrides, CONFIG_FILE_NAME};
use spotwatch_core::error::CoreError;
use spotwatch_core::selection::{ListLayout, OverlayMapper};
use spotwatch_storage::snapshot::FileSnapshotWriter;
use spotwatch_vision::classifier::LumaVarianceClassifier;
use spotwatch_vision::engine::OccupancyEngine;
use spotwatch_vision::layout::extract_from_file;
use spotwatch_vision::source::ImageSequenceSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::commands::{spawn_stdin_reader, InteractionController};
use crate::lifecycle::LifecycleManager;
use crate::monitor::{MonitorLoop, MonitorOptions};
use crate::notifier::LogVacancyNotifier;

/// 명령 채널 용량
const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// SPOTWATCH 주차면 점유 추적기
///
/// 고정 카메라 영상에서 주차면별 빈 자리를 추적하고 스냅샷 파일로 남긴다.
#[derive(Parser, Debug)]
#[command(name = "spotwatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 주차면 마스크 이미지
    #[arg(long, short = 'm')]
    mask: Option<PathBuf>,

    /// 프레임 이미지 디렉토리
    #[arg(long, short = 'f')]
    frames: Option<PathBuf>,

    /// 빈 자리 스냅샷 파일
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// 샘플링 주기 (프레임 수)
    #[arg(long)]
    step: Option<u64>,

    /// 재분류 임계값 (0.0 ~ 1.0 미만)
    #[arg(long)]
    threshold: Option<f64>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 스트림 끝에서 되감지 않고 종료
    #[arg(long)]
    no_loop: bool,

    /// 처리할 최대 프레임 수
    #[arg(long)]
    max_frames: Option<u64>,
}

/// 설정 파일 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/io.spotwatch.spotwatch/config.json`
/// - Windows: `%APPDATA%\spotwatch\spotwatch\config\config.json`
/// - Linux: `~/.config/spotwatch/config.json`
fn resolve_config_path(config: Option<&Path>) -> PathBuf {
    config
        .map(Path::to_path_buf)
        .or_else(|| {
            ProjectDirs::from("io", "spotwatch", "spotwatch")
                .map(|p| p.config_dir().join(CONFIG_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

impl Args {
    /// CLI 인자 → 실행 단위 설정 오버라이드 (파일에는 저장하지 않음)
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mask_path: self.mask.clone(),
            frames_dir: self.frames.clone(),
            snapshot_path: self.snapshot.clone(),
            step: self.step,
            diff_threshold: self.threshold,
            no_loop: self.no_loop,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "spotwatch={},spotwatch_app={},spotwatch_core={},spotwatch_vision={},spotwatch_storage={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("SPOTWATCH 시작");

    // 설정 로드
    let config_path = resolve_config_path(args.config.as_deref());
    let config_manager = ConfigManager::with_path(config_path.clone()).map_err(|e| {
        error!("설정 로드 실패: {e}");
        e
    })?;
    let config = config_manager.effective(&args.overrides())?;
    info!("설정 파일: {}", config_path.display());

    // 레이아웃 추출 (실패 시 시작 불가)
    let (spots, frame_size) = extract_from_file(&config.source.mask_path).map_err(|e| {
        error!("레이아웃 추출 실패: {e}");
        e
    })?;

    // 프레임 소스
    let source = ImageSequenceSource::open(&config.source.frames_dir)
        .map_err(|e| {
            error!("프레임 소스 열기 실패: {e}");
            e
        })?
        .with_expected_size(frame_size.0, frame_size.1);

    // 엔진 와이어링
    let classifier = LumaVarianceClassifier::from_config(&config.classifier);
    let snapshot = FileSnapshotWriter::new(&config.snapshot.path);
    info!("스냅샷 파일: {}", snapshot.path().display());
    let engine = OccupancyEngine::new(
        spots,
        frame_size,
        &config.engine,
        Box::new(classifier),
        Box::new(snapshot),
    )?
    .with_notifier(Box::new(LogVacancyNotifier), config.alert.low_vacancy_ratio);

    let mapper = OverlayMapper::new(frame_size, (config.display.width, config.display.height))?;
    let list = ListLayout::new(
        config.list.visible_count,
        config.list.row_height,
        config.list.header_height,
    )?;
    let controller = InteractionController::new(mapper, list);

    // 라이프사이클 + 시그널
    let lifecycle = Arc::new(LifecycleManager::new());
    let signal_task = lifecycle.spawn_signal_listener();

    // 명령 입력
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    spawn_stdin_reader(cmd_tx)?;

    let options = MonitorOptions {
        loop_on_end: config.source.loop_on_end,
        max_frames: args.max_frames,
        frame_interval: config.frame_interval(),
    };
    let mut monitor = MonitorLoop::new(
        engine,
        Box::new(source),
        controller,
        cmd_rx,
        lifecycle.subscribe(),
        options,
    );

    info!("SPOTWATCH 실행 중 (q 또는 Ctrl+C로 종료)");
    let (stats, summary) = tokio::task::spawn_blocking(move || {
        let stats = monitor.run()?;
        Ok::<_, CoreError>((stats, monitor.engine().summary()))
    })
    .await
    .map_err(|e| anyhow!("모니터링 태스크 실패: {e}"))??;
    signal_task.abort();
    if !lifecycle.is_shutdown() {
        lifecycle.shutdown();
    }

    info!(
        "SPOTWATCH 종료 ({:?}, {}프레임): {summary}",
        stats.stop_reason, stats.frames_processed
    );
    Ok(())
}
