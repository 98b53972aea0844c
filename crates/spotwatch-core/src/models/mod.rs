//! SPOTWATCH 도메인 모델.
//!
//! 레이아웃 추출, 점유 추적, 화면 상호작용에서 공유하는 데이터 구조체를 정의한다.

pub mod interaction;
pub mod occupancy;
pub mod spot;
