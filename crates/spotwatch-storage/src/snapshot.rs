//! 빈 자리 스냅샷 파일.
//!
//! 형식:
//! ```text
//! Empty Spots:
//! Spot 1
//! Spot 3
//! ```
//! 매 프레임 통째로 교체된다. 같은 디렉토리의 임시 파일에 쓴 뒤 rename 하므로
//! 읽는 쪽은 이전 내용 또는 새 내용 중 하나만 본다.

use spotwatch_core::error::CoreError;
use spotwatch_core::models::spot::SpotId;
use spotwatch_core::ports::snapshot::SnapshotSink;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 스냅샷 헤더 줄
pub const SNAPSHOT_HEADER: &str = "Empty Spots:";

/// 주차면 줄 접두어
const SPOT_PREFIX: &str = "Spot ";

/// 스냅샷 본문 생성: 순서 유지, 중복 제거
pub fn render_snapshot(vacant_ids: &[SpotId]) -> String {
    let mut seen = HashSet::with_capacity(vacant_ids.len());
    let mut out = String::with_capacity(SNAPSHOT_HEADER.len() + 1 + vacant_ids.len() * 10);
    out.push_str(SNAPSHOT_HEADER);
    out.push('\n');
    for id in vacant_ids {
        if seen.insert(*id) {
            out.push_str(SPOT_PREFIX);
            out.push_str(&id.to_string());
            out.push('\n');
        }
    }
    out
}

/// 스냅샷 본문 파싱
pub fn parse_snapshot(content: &str) -> Result<Vec<SpotId>, CoreError> {
    let mut lines = content.lines();
    match lines.next() {
        Some(header) if header.trim_end() == SNAPSHOT_HEADER => {}
        other => {
            return Err(CoreError::Snapshot(format!(
                "헤더 불일치: {:?}",
                other.unwrap_or("")
            )))
        }
    }

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.trim()
                .strip_prefix(SPOT_PREFIX)
                .and_then(|id| id.trim().parse::<SpotId>().ok())
                .ok_or_else(|| CoreError::Snapshot(format!("잘못된 주차면 줄: {line:?}")))
        })
        .collect()
}

/// 스냅샷 파일 읽기
pub fn read_snapshot(path: &Path) -> Result<Vec<SpotId>, CoreError> {
    let content = fs::read_to_string(path)?;
    parse_snapshot(&content)
}

/// 파일 기반 스냅샷 기록기: `SnapshotSink` 포트 구현
#[derive(Debug, Clone)]
pub struct FileSnapshotWriter {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl FileSnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);
        Self { path, tmp_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for FileSnapshotWriter {
    fn write_vacant(&mut self, vacant_ids: &[SpotId]) -> Result<(), CoreError> {
        let content = render_snapshot(vacant_ids);

        fs::write(&self.tmp_path, content.as_bytes()).map_err(|e| {
            CoreError::Snapshot(format!(
                "임시 스냅샷 기록 실패: {}: {e}",
                self.tmp_path.display()
            ))
        })?;
        fs::rename(&self.tmp_path, &self.path).map_err(|e| {
            CoreError::Snapshot(format!("스냅샷 교체 실패: {}: {e}", self.path.display()))
        })?;

        debug!("스냅샷 기록: 빈 자리 {}개", vacant_ids.len());
        Ok(())
    }
}
