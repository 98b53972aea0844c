//! spotwatch-vision 성능 벤치마크
//!
//! 실행: cargo bench -p spotwatch-vision
//!
//! 벤치마크 대상:
//! - 주차면 변화 점수 (compute_spot_diffs)
//! - 레이아웃 추출 (extract_spots)
//! - 기본 분류기 (LumaVarianceClassifier)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{GrayImage, Luma, Rgb, RgbImage};
use spotwatch_core::models::spot::{BoundingBox, Spot};
use spotwatch_core::ports::classifier::OccupancyClassifier;
use spotwatch_vision::classifier::LumaVarianceClassifier;
use spotwatch_vision::{delta, layout};
use std::hint::black_box;

/// 테스트용 패턴 프레임 생성
fn create_test_frame(width: u32, height: u32, seed: u8) -> RgbImage {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let r = (x as u8).wrapping_add(seed).wrapping_mul(17);
        let g = (y as u8).wrapping_add(seed).wrapping_mul(31);
        let b = (x as u8).wrapping_add(y as u8).wrapping_add(seed);
        *pixel = Rgb([r, g, b]);
    }
    img
}

/// 격자형 주차장 레이아웃 (주차면 40x80, 간격 10)
fn create_grid_spots(width: u32, height: u32) -> Vec<Spot> {
    let mut boxes = Vec::new();
    let mut y = 10;
    while y + 80 <= height {
        let mut x = 10;
        while x + 40 <= width {
            boxes.push(BoundingBox::new(x, y, 40, 80));
            x += 50;
        }
        y += 90;
    }
    boxes
        .into_iter()
        .enumerate()
        .map(|(i, b)| Spot::new(i as u32 + 1, b))
        .collect()
}

fn create_grid_mask(width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    for spot in create_grid_spots(width, height) {
        for y in spot.bbox.y..spot.bbox.bottom() {
            for x in spot.bbox.x..spot.bbox.right() {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }
    mask
}

/// 변화 점수 벤치마크
fn bench_spot_diffs(c: &mut Criterion) {
    let mut group = c.benchmark_group("spot_diffs");

    let resolutions = [(640, 480), (1280, 720), (1920, 1080)];

    for (width, height) in resolutions {
        let spots = create_grid_spots(width, height);
        let pixels: u64 = spots
            .iter()
            .map(|s| u64::from(s.bbox.width) * u64::from(s.bbox.height))
            .sum();
        group.throughput(Throughput::Elements(pixels));

        let reference = create_test_frame(width, height, 42);
        let current = create_test_frame(width, height, 43);

        group.bench_with_input(
            BenchmarkId::new("grid", format!("{width}x{height}")),
            &(&reference, &current, &spots),
            |b, (r, cur, s)| b.iter(|| delta::compute_spot_diffs(black_box(r), black_box(cur), s)),
        );
    }

    group.finish();
}

/// 레이아웃 추출 벤치마크
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_extraction");

    for (width, height) in [(640, 480), (1920, 1080)] {
        let mask = create_grid_mask(width, height);
        group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
        group.bench_with_input(
            BenchmarkId::new("grid_mask", format!("{width}x{height}")),
            &mask,
            |b, m| b.iter(|| layout::extract_spots(black_box(m))),
        );
    }

    group.finish();
}

/// 기본 분류기 벤치마크
fn bench_classifier(c: &mut Criterion) {
    let classifier = LumaVarianceClassifier::default();
    let region = create_test_frame(40, 80, 7);

    c.bench_function("luma_variance_classify_40x80", |b| {
        b.iter(|| classifier.classify(black_box(&region)))
    });
}

criterion_group!(benches, bench_spot_diffs, bench_layout, bench_classifier);
criterion_main!(benches);
