//! # spotwatch-storage
//!
//! 로컬 저장소 어댑터.
//!
//! ## 모듈
//! - `snapshot`: 빈 자리 스냅샷 파일 (SnapshotSink 구현 + 파서)

pub mod snapshot;
