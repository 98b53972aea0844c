//! 프레임 소스 포트.
//!
//! 구현: `spotwatch-vision::source::ImageSequenceSource`

use image::RgbImage;

use crate::error::CoreError;

/// 프레임 읽기 결과
#[derive(Debug, Clone)]
pub enum FrameRead {
    /// 새 프레임 (RGB, 마스크와 동일 해상도)
    Frame(RgbImage),
    /// 스트림 끝: 호출자가 `rewind` 여부를 결정한다
    EndOfStream,
}

/// 순차 프레임 공급자
pub trait FrameSource: Send {
    /// 다음 프레임 읽기.
    ///
    /// `Err`는 일시적 실패로 취급된다 (해당 프레임 스킵 후 다음 반복에서 재시도).
    fn next_frame(&mut self) -> Result<FrameRead, CoreError>;

    /// 처음 프레임으로 되감기
    fn rewind(&mut self) -> Result<(), CoreError>;

    /// 소스 설명 (로그용)
    fn describe(&self) -> String;
}
