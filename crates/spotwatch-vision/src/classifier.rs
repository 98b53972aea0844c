//! 기본 점유 분류기.
//!
//! `OccupancyClassifier` 포트 구현. 주차면 영역을 작은 정사각형으로
//! 다운샘플한 뒤 휘도 표준편차로 판단한다. 빈 아스팔트는 균일하고,
//! 차량이 있으면 경계/반사로 분산이 커진다.

use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use spotwatch_core::config::ClassifierConfig;
use spotwatch_core::error::CoreError;
use spotwatch_core::models::occupancy::Occupancy;
use spotwatch_core::ports::classifier::OccupancyClassifier;

/// 휘도 분산 기반 분류기: `OccupancyClassifier` 포트 구현
#[derive(Debug, Clone)]
pub struct LumaVarianceClassifier {
    sample_size: u32,
    stddev_threshold: f64,
}

impl LumaVarianceClassifier {
    pub fn new(sample_size: u32, stddev_threshold: f64) -> Self {
        Self {
            sample_size: sample_size.max(1),
            stddev_threshold,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.sample_size, config.stddev_threshold)
    }

    /// 영역을 `sample_size²`로 리사이즈
    fn downsample(&self, region: &RgbImage) -> Result<Vec<u8>, CoreError> {
        let (src_w, src_h) = region.dimensions();
        if src_w == 0 || src_h == 0 {
            return Err(CoreError::Internal("분류 영역 크기 0".to_string()));
        }

        let size = self.sample_size;
        if src_w == size && src_h == size {
            return Ok(region.as_raw().clone());
        }

        let src_image = FirImage::from_vec_u8(src_w, src_h, region.as_raw().clone(), PixelType::U8x3)
            .map_err(|e| CoreError::Internal(format!("소스 이미지 생성 실패: {e}")))?;
        let mut dst_image = FirImage::new(size, size, PixelType::U8x3);

        let mut resizer = Resizer::new();
        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
            fast_image_resize::FilterType::Bilinear,
        ));

        resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| CoreError::Internal(format!("리사이즈 실패: {e}")))?;

        Ok(dst_image.into_vec())
    }

    /// 휘도 표준편차 (BT.601 가중치)
    pub fn luma_stddev(&self, region: &RgbImage) -> Result<f64, CoreError> {
        let samples = self.downsample(region)?;
        let lumas: Vec<f64> = samples
            .chunks_exact(3)
            .map(|px| 0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2]))
            .collect();

        let n = lumas.len() as f64;
        let mean = lumas.iter().sum::<f64>() / n;
        let variance = lumas.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
        Ok(variance.sqrt())
    }
}

impl Default for LumaVarianceClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl OccupancyClassifier for LumaVarianceClassifier {
    fn classify(&self, region: &RgbImage) -> Result<Occupancy, CoreError> {
        let stddev = self.luma_stddev(region)?;
        Ok(Occupancy::from_vacant(stddev < self.stddev_threshold))
    }

    fn name(&self) -> &str {
        "luma-variance"
    }
}
