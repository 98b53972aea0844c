//! 애플리케이션 설정 구조체.
//!
//! 샘플링 주기, 변화 임계값, 입력/출력 경로, 화면 매핑 크기 등
//! 런타임 설정을 정의한다. [`crate::config_manager`]가 JSON 파일에서 로드한다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 변화 감지/재분류 스케줄 설정
    pub engine: EngineConfig,
    /// 마스크/프레임 입력 설정
    pub source: SourceConfig,
    /// 빈 자리 스냅샷 설정
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    /// 오버레이 표시 크기
    #[serde(default)]
    pub display: DisplayConfig,
    /// 빈 자리 목록 위젯 설정
    #[serde(default)]
    pub list: ListConfig,
    /// 기본 분류기 설정
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// 빈 자리 알림 설정
    #[serde(default)]
    pub alert: AlertConfig,
}

// ============================================================
// 엔진 설정
// ============================================================

/// 변화 게이트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 샘플링 주기 (프레임 수)
    #[serde(default = "default_step")]
    pub step: u64,
    /// 재분류 임계값: `diff / max_diff`가 이 값을 넘는 주차면만 재분류
    #[serde(default = "default_diff_threshold")]
    pub diff_threshold: f64,
    /// 루프 프레임 간격 (밀리초, 0이면 대기 없음)
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            diff_threshold: default_diff_threshold(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

fn default_step() -> u64 {
    30
}

fn default_diff_threshold() -> f64 {
    0.4
}

fn default_frame_interval_ms() -> u64 {
    25
}

// ============================================================
// 입력 설정
// ============================================================

/// 마스크/프레임 입력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 주차면 마스크 이미지 경로 (단일 채널)
    pub mask_path: PathBuf,
    /// 프레임 이미지 디렉토리
    pub frames_dir: PathBuf,
    /// 스트림 끝에서 처음부터 다시 재생 (연속 모니터링)
    #[serde(default = "default_true")]
    pub loop_on_end: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mask_path: PathBuf::from("mask.png"),
            frames_dir: PathBuf::from("frames"),
            loop_on_end: true,
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================
// 출력 설정
// ============================================================

/// 빈 자리 스냅샷 파일 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// 스냅샷 파일 경로 (매 프레임 덮어씀)
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("empty_slots.txt")
}

// ============================================================
// 화면 설정
// ============================================================

/// 오버레이 표시 크기 (리사이즈된 영상)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_display_width")]
    pub width: u32,
    #[serde(default = "default_display_height")]
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_width(),
            height: default_display_height(),
        }
    }
}

fn default_display_width() -> u32 {
    1000
}

fn default_display_height() -> u32 {
    600
}

/// 빈 자리 목록 위젯
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_visible_count")]
    pub visible_count: usize,
    #[serde(default = "default_row_height")]
    pub row_height: u32,
    #[serde(default = "default_header_height")]
    pub header_height: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            visible_count: default_visible_count(),
            row_height: default_row_height(),
            header_height: default_header_height(),
        }
    }
}

fn default_visible_count() -> usize {
    20
}

fn default_row_height() -> u32 {
    20
}

fn default_header_height() -> u32 {
    30
}

// ============================================================
// 분류기/알림 설정
// ============================================================

/// 기본 분류기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// 분류 전 다운샘플 크기 (정사각형 한 변)
    #[serde(default = "default_sample_size")]
    pub sample_size: u32,
    /// 휘도 표준편차가 이 값보다 작으면 빈 자리
    #[serde(default = "default_stddev_threshold")]
    pub stddev_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            stddev_threshold: default_stddev_threshold(),
        }
    }
}

fn default_sample_size() -> u32 {
    15
}

fn default_stddev_threshold() -> f64 {
    18.0
}

/// 빈 자리 알림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// 빈 자리 비율이 이 값 아래로 내려가면 알림
    #[serde(default = "default_low_vacancy_ratio")]
    pub low_vacancy_ratio: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            low_vacancy_ratio: default_low_vacancy_ratio(),
        }
    }
}

fn default_low_vacancy_ratio() -> f64 {
    0.5
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            engine: EngineConfig::default(),
            source: SourceConfig::default(),
            snapshot: SnapshotConfig::default(),
            display: DisplayConfig::default(),
            list: ListConfig::default(),
            classifier: ClassifierConfig::default(),
            alert: AlertConfig::default(),
        }
    }

    /// 루프 프레임 간격
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.engine.frame_interval_ms)
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.engine.step == 0 {
            return Err(CoreError::validation("engine.step", "1 이상이어야 함"));
        }
        if !(0.0..1.0).contains(&self.engine.diff_threshold) {
            return Err(CoreError::validation(
                "engine.diff_threshold",
                format!("[0, 1) 범위 밖: {}", self.engine.diff_threshold),
            ));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(CoreError::validation("display", "표시 크기는 0일 수 없음"));
        }
        if self.list.row_height == 0 {
            return Err(CoreError::validation("list.row_height", "0일 수 없음"));
        }
        if self.list.visible_count == 0 {
            return Err(CoreError::validation("list.visible_count", "0일 수 없음"));
        }
        if self.classifier.sample_size == 0 {
            return Err(CoreError::validation("classifier.sample_size", "0일 수 없음"));
        }
        if !(0.0..=1.0).contains(&self.alert.low_vacancy_ratio) {
            return Err(CoreError::validation(
                "alert.low_vacancy_ratio",
                format!("[0, 1] 범위 밖: {}", self.alert.low_vacancy_ratio),
            ));
        }
        Ok(())
    }
}
