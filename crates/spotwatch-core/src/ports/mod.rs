//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate(`spotwatch-vision`, `spotwatch-storage`)가 이 trait들을 구현하며,
//! `spotwatch-app`에서 `Box<dyn T>`로 와이어링한다.
//!
//! 점유 추적 루프는 단일 동기 루프이므로 모든 포트는 동기 trait이다.

pub mod classifier;
pub mod frame_source;
pub mod notifier;
pub mod snapshot;
