//! SPOTWATCH 핵심 에러 타입.
//!
//! 어댑터 crate는 이 타입을 그대로 반환하고, 바이너리는 `anyhow`로 감싼다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 마스크를 읽을 수 없거나 주차면이 하나도 없음 (시작 불가)
    #[error("레이아웃 에러: {0}")]
    Layout(String),

    /// 프레임 소스 열기/읽기 실패
    #[error("프레임 소스 에러: {0}")]
    Source(String),

    /// 분류기 실패 (해당 주차면만 이전 상태 유지)
    #[error("분류 실패: 주차면 {spot_id}: {message}")]
    Classification {
        /// 분류에 실패한 주차면 ID
        spot_id: u32,
        /// 실패 사유
        message: String,
    },

    /// 스냅샷 기록/파싱 실패
    #[error("스냅샷 에러: {0}")]
    Snapshot(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 유효성 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
