//! # spotwatch-vision
//!
//! 주차면 점유 추적 엔진 크레이트.
//! 마스크에서 주차면 레이아웃을 추출하고, 매 프레임마다 저비용 변화 감지로
//! 재분류할 주차면만 골라 분류기를 호출한 뒤 상태 저장소와 스냅샷을 갱신한다.

pub mod classifier;
pub mod delta;
pub mod engine;
pub mod gate;
pub mod layout;
pub mod source;
