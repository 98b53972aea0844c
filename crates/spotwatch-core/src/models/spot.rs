//! 주차면 모델.
//!
//! 주차면은 마스크에서 한 번 추출된 뒤 실행 내내 변하지 않는다.
//! ID는 1부터 시작하며 (y, x) 정렬 순서에서 유도된다.

use serde::{Deserialize, Serialize};

/// 주차면 ID (1-based)
pub type SpotId = u32;

/// 원본 프레임 픽셀 좌표계의 바운딩 박스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 오른쪽 경계 (exclusive)
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// 아래쪽 경계 (exclusive)
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// 점 포함 여부 (경계 포함)
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let (x, y) = (f64::from(self.x), f64::from(self.y));
        px >= x
            && px <= x + f64::from(self.width)
            && py >= y
            && py <= y + f64::from(self.height)
    }

    /// 중심 좌표
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// 프레임 크기 안에 완전히 들어가는지 확인
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= frame_width && self.bottom() <= frame_height
    }
}

/// 고정 주차면
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spot {
    /// 안정적인 1-based ID
    pub id: SpotId,
    /// 원본 프레임 좌표계 바운딩 박스
    pub bbox: BoundingBox,
}

impl Spot {
    pub fn new(id: SpotId, bbox: BoundingBox) -> Self {
        Self { id, bbox }
    }
}
