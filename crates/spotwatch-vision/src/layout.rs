//! 주차면 레이아웃 추출.
//!
//! 단일 채널 마스크에서 4-연결 성분을 라벨링하고, 배경(0)을 제외한 성분마다
//! 바운딩 박스를 구한다. 결과는 (y, x) 오름차순으로 정렬되며 주차면 ID는
//! 이 순서의 1-based 위치다. 같은 마스크는 항상 같은 ID 배치를 만든다.

use image::GrayImage;
use spotwatch_core::error::CoreError;
use spotwatch_core::models::spot::{BoundingBox, Spot, SpotId};
use std::path::Path;
use tracing::{debug, info};

/// 연결 성분 통계
#[derive(Debug, Clone, Copy)]
struct ComponentStats {
    area: u64,
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
}

impl ComponentStats {
    fn new(x: u32, y: u32) -> Self {
        Self {
            area: 0,
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.area += 1;
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x + 1,
            self.max_y - self.min_y + 1,
        )
    }
}

/// 라벨 병합용 Union-Find (라벨 0 = 배경)
struct DisjointSet {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new() -> Self {
        Self {
            parent: vec![0],
            rank: vec![0],
        }
    }

    fn len(&self) -> usize {
        self.parent.len()
    }

    fn make_set(&mut self) -> u32 {
        let idx = self.parent.len() as u32;
        self.parent.push(idx);
        self.rank.push(0);
        idx
    }

    /// 반복형 find + 경로 압축 (큰 마스크에서 재귀 깊이 방지)
    fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: u32, b: u32) {
        let mut root_a = self.find(a);
        let mut root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        let rank_a = self.rank[root_a as usize];
        let rank_b = self.rank[root_b as usize];
        if rank_a < rank_b {
            std::mem::swap(&mut root_a, &mut root_b);
        }
        self.parent[root_b as usize] = root_a;
        if rank_a == rank_b {
            self.rank[root_a as usize] = rank_a + 1;
        }
    }
}

/// 2-pass 4-연결 성분 라벨링
fn connected_components(mask: &GrayImage) -> Vec<ComponentStats> {
    let (width, height) = mask.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let raw = mask.as_raw();
    let mut labels = vec![0u32; w * h];
    let mut dsu = DisjointSet::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if raw[idx] == 0 {
                continue;
            }

            let up = if y > 0 { labels[idx - w] } else { 0 };
            let left = if x > 0 { labels[idx - 1] } else { 0 };

            labels[idx] = match (up, left) {
                (0, 0) => dsu.make_set(),
                (0, l) => l,
                (u, 0) => u,
                (u, l) => {
                    dsu.union(u, l);
                    u
                }
            };
        }
    }

    let mut stats: Vec<Option<ComponentStats>> = vec![None; dsu.len()];
    for y in 0..h {
        for x in 0..w {
            let label = labels[y * w + x];
            if label == 0 {
                continue;
            }
            let root = dsu.find(label) as usize;
            stats[root]
                .get_or_insert_with(|| ComponentStats::new(x as u32, y as u32))
                .include(x as u32, y as u32);
        }
    }

    stats.into_iter().flatten().collect()
}

/// 마스크에서 주차면 목록 추출
///
/// 비배경 성분이 하나도 없으면 `CoreError::Layout`.
pub fn extract_spots(mask: &GrayImage) -> Result<Vec<Spot>, CoreError> {
    let components = connected_components(mask);
    if components.is_empty() {
        return Err(CoreError::Layout(format!(
            "마스크({}x{})에 주차면 영역이 없음",
            mask.width(),
            mask.height()
        )));
    }

    let mut boxes: Vec<BoundingBox> = components.iter().map(ComponentStats::bbox).collect();
    boxes.sort_by_key(|b| (b.y, b.x));

    let spots: Vec<Spot> = boxes
        .into_iter()
        .enumerate()
        .map(|(idx, bbox)| Spot::new(idx as SpotId + 1, bbox))
        .collect();

    debug!(
        "연결 성분 {}개 → 주차면 {}개 (최소 면적 {}px)",
        components.len(),
        spots.len(),
        components.iter().map(|c| c.area).min().unwrap_or(0)
    );

    Ok(spots)
}

/// 마스크 이미지 로드 (단일 채널로 변환)
pub fn load_mask(path: &Path) -> Result<GrayImage, CoreError> {
    let image = image::open(path).map_err(|e| {
        CoreError::Layout(format!("마스크 파일 읽기 실패: {}: {e}", path.display()))
    })?;
    Ok(image.to_luma8())
}

/// 마스크 파일에서 바로 레이아웃 추출. 마스크 크기도 함께 반환한다
pub fn extract_from_file(path: &Path) -> Result<(Vec<Spot>, (u32, u32)), CoreError> {
    let mask = load_mask(path)?;
    let spots = extract_spots(&mask)?;
    info!(
        "레이아웃 추출 완료: {} → 주차면 {}개",
        path.display(),
        spots.len()
    );
    Ok((spots, mask.dimensions()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill(mask: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
        for yy in y..y + h {
            for xx in x..x + w {
                mask.put_pixel(xx, yy, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_mask_is_layout_error() {
        let mask = GrayImage::new(32, 32);
        let err = extract_spots(&mask).unwrap_err();
        assert!(matches!(err, CoreError::Layout(_)));
    }

    #[test]
    fn components_sorted_top_to_bottom_left_to_right() {
        let mut mask = GrayImage::new(100, 100);
        fill(&mut mask, 60, 50, 10, 10);
        fill(&mut mask, 5, 50, 10, 10);
        fill(&mut mask, 40, 5, 10, 20);

        let spots = extract_spots(&mask).unwrap();
        assert_eq!(spots.len(), 3);
        assert_eq!(spots[0], Spot::new(1, BoundingBox::new(40, 5, 10, 20)));
        assert_eq!(spots[1], Spot::new(2, BoundingBox::new(5, 50, 10, 10)));
        assert_eq!(spots[2], Spot::new(3, BoundingBox::new(60, 50, 10, 10)));
    }

    #[test]
    fn u_shape_merges_into_one_component() {
        // 두 기둥이 아래에서 이어지는 U자: 1차 패스에서 라벨이 둘로 나뉜 뒤 병합되어야 함
        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 2, 2, 3, 10);
        fill(&mut mask, 12, 2, 3, 10);
        fill(&mut mask, 2, 12, 13, 3);

        let spots = extract_spots(&mask).unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].bbox, BoundingBox::new(2, 2, 13, 13));
    }

    #[test]
    fn diagonal_pixels_are_separate_with_4_connectivity() {
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(0, 0, Luma([1]));
        mask.put_pixel(1, 1, Luma([1]));

        let spots = extract_spots(&mask).unwrap();
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].bbox, BoundingBox::new(0, 0, 1, 1));
        assert_eq!(spots[1].bbox, BoundingBox::new(1, 1, 1, 1));
    }

    #[test]
    fn ids_are_contiguous_for_grid() {
        let mut mask = GrayImage::new(200, 120);
        let mut expected = 0;
        for row in 0..3 {
            for col in 0..5 {
                fill(&mut mask, 10 + col * 38, 10 + row * 38, 30, 30);
                expected += 1;
            }
        }

        let spots = extract_spots(&mask).unwrap();
        assert_eq!(spots.len(), expected);
        for (idx, spot) in spots.iter().enumerate() {
            assert_eq!(spot.id as usize, idx + 1);
        }
        for pair in spots.windows(2) {
            assert!((pair[0].bbox.y, pair[0].bbox.x) <= (pair[1].bbox.y, pair[1].bbox.x));
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let mut mask = GrayImage::new(64, 64);
        fill(&mut mask, 30, 2, 5, 5);
        fill(&mut mask, 2, 2, 5, 5);
        fill(&mut mask, 2, 40, 20, 5);

        assert_eq!(extract_spots(&mask).unwrap(), extract_spots(&mask).unwrap());
    }

    #[test]
    fn missing_mask_file_is_layout_error() {
        let err = extract_from_file(Path::new("/nonexistent/mask.png")).unwrap_err();
        assert!(matches!(err, CoreError::Layout(_)));
    }

    #[test]
    fn mask_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mask.png");
        let mut mask = GrayImage::new(40, 30);
        fill(&mut mask, 1, 1, 8, 8);
        fill(&mut mask, 20, 1, 8, 8);
        mask.save(&path).unwrap();

        let (spots, size) = extract_from_file(&path).unwrap();
        assert_eq!(size, (40, 30));
        assert_eq!(spots.len(), 2);
    }
}
