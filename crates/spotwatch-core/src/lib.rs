//! # spotwatch-core
//!
//! SPOTWATCH 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 주차면, 점유 상태, 상호작용 상태 (serde Serialize/Deserialize)
//! - [`ports`]: 분류기, 프레임 소스, 스냅샷 저장소 포트 인터페이스
//! - [`status`]: 주차면별 점유 상태 저장소
//! - [`selection`]: 화면 좌표 → 주차면 ID 매핑
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
pub mod selection;
pub mod status;
