//! 이미지 시퀀스 프레임 소스.
//!
//! `FrameSource` 포트 구현. 디렉토리 안의 정지 이미지를 파일명 순서로 재생한다.
//! 디렉토리가 없거나 프레임이 하나도 없으면 시작 시 `CoreError::Source`.

use image::RgbImage;
use spotwatch_core::error::CoreError;
use spotwatch_core::ports::frame_source::{FrameRead, FrameSource};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 지원 확장자
const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// 디렉토리 기반 프레임 소스: `FrameSource` 포트 구현
pub struct ImageSequenceSource {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    position: usize,
    /// 기대 해상도 (마스크 크기)
    expected_size: Option<(u32, u32)>,
}

impl ImageSequenceSource {
    /// 디렉토리 열기
    pub fn open(dir: &Path) -> Result<Self, CoreError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CoreError::Source(format!("프레임 디렉토리 열기 실패: {}: {e}", dir.display()))
        })?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_frame_file(path))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(CoreError::Source(format!(
                "프레임 이미지 없음: {}",
                dir.display()
            )));
        }

        info!("프레임 소스 열기: {} ({}개)", dir.display(), frames.len());

        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
            position: 0,
            expected_size: None,
        })
    }

    /// 기대 해상도 지정: 다른 크기의 프레임은 일시적 에러로 반환된다
    pub fn with_expected_size(mut self, width: u32, height: u32) -> Self {
        self.expected_size = Some((width, height));
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<FrameRead, CoreError> {
        let Some(path) = self.frames.get(self.position) else {
            return Ok(FrameRead::EndOfStream);
        };
        // 실패한 프레임도 소비: 다음 반복은 다음 프레임을 읽는다
        self.position += 1;

        let frame = image::open(path)
            .map_err(|e| CoreError::Source(format!("프레임 읽기 실패: {}: {e}", path.display())))?
            .to_rgb8();

        if let Some((w, h)) = self.expected_size {
            if frame.dimensions() != (w, h) {
                return Err(CoreError::Source(format!(
                    "프레임 해상도 불일치: {} = {}x{}, 기대 {w}x{h}",
                    path.display(),
                    frame.width(),
                    frame.height()
                )));
            }
        }

        debug!("프레임 읽기: {}", path.display());
        Ok(FrameRead::Frame(frame))
    }

    fn rewind(&mut self) -> Result<(), CoreError> {
        self.position = 0;
        debug!("프레임 소스 되감기: {}", self.dir.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} ({} frames)", self.dir.display(), self.len())
    }
}

/// 메모리 프레임 소스 (테스트/데모용)
pub struct MemoryFrameSource {
    frames: Vec<RgbImage>,
    position: usize,
}

impl MemoryFrameSource {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames,
            position: 0,
        }
    }
}

impl FrameSource for MemoryFrameSource {
    fn next_frame(&mut self) -> Result<FrameRead, CoreError> {
        match self.frames.get(self.position) {
            Some(frame) => {
                self.position += 1;
                Ok(FrameRead::Frame(frame.clone()))
            }
            None => Ok(FrameRead::EndOfStream),
        }
    }

    fn rewind(&mut self) -> Result<(), CoreError> {
        self.position = 0;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory ({} frames)", self.frames.len())
    }
}
