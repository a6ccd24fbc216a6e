//! 帧特征提取：低分辨率像素向量 + RGB 联合直方图

use super::frame::Frame;
use super::source::VideoSource;
use crate::core::error::Result;
use log::{debug, info};
use rayon::prelude::*;

/// 单帧特征
#[derive(Debug, Clone, PartialEq)]
pub struct FrameFeatures {
    /// 下采样后的 RGB 像素（展平）
    pub pixels: Vec<f32>,
    /// bins³ 联合颜色直方图
    pub histogram: Vec<f32>,
}

impl FrameFeatures {
    /// 拆分为核心算法使用的两个平行序列
    pub fn split(features: &[FrameFeatures]) -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
        features
            .iter()
            .map(|f| (f.pixels.clone(), f.histogram.clone()))
            .unzip()
    }
}

/// 每批读取的原始帧数，读完一批就提取特征并释放原始帧
const DEFAULT_BATCH_SIZE: usize = 32;

pub struct FeatureExtractor {
    sample_size: (u32, u32),
    bins: u32,
    batch_size: usize,
}

impl FeatureExtractor {
    pub fn new(sample_width: u32, sample_height: u32, bins: u32) -> Self {
        Self {
            sample_size: (sample_width.max(1), sample_height.max(1)),
            bins: bins.clamp(1, 256),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn pixel_len(&self) -> usize {
        self.sample_size.0 as usize * self.sample_size.1 as usize * 3
    }

    pub fn histogram_len(&self) -> usize {
        let bins = self.bins as usize;
        bins * bins * bins
    }

    pub fn extract(&self, frame: &Frame) -> Result<FrameFeatures> {
        let resized = frame.resize_to(self.sample_size.0, self.sample_size.1)?;
        let rgb = resized.to_rgb();

        let pixels = rgb.iter().map(|&v| v as f32).collect();
        let histogram = self.color_histogram(&rgb);

        Ok(FrameFeatures { pixels, histogram })
    }

    /// 按原始顺序分批读取，每批并行计算特征；同一时刻最多持有一批原始帧
    pub fn extract_all(&self, source: &mut dyn VideoSource) -> Result<Vec<FrameFeatures>> {
        let info = source.info();
        info!(
            "🎬 Extracting features from {} frames ({}x{})",
            info.frame_count, info.width, info.height
        );

        let mut features = Vec::with_capacity(info.frame_count);
        let mut batch = Vec::with_capacity(self.batch_size.min(info.frame_count));
        let mut next = 0;
        while next < info.frame_count {
            let end = (next + self.batch_size).min(info.frame_count);
            batch.clear();
            for index in next..end {
                batch.push(source.read_frame(index)?);
            }

            let extracted = batch
                .par_iter()
                .map(|f| self.extract(f))
                .collect::<Result<Vec<_>>>()?;
            features.extend(extracted);
            next = end;
        }

        debug!(
            "Feature dims: pixels={}, histogram={}",
            self.pixel_len(),
            self.histogram_len()
        );
        Ok(features)
    }

    fn color_histogram(&self, rgb: &[u8]) -> Vec<f32> {
        let bins = self.bins as usize;
        let mut hist = vec![0f32; self.histogram_len()];

        for px in rgb.chunks_exact(3) {
            let r = px[0] as usize * bins / 256;
            let g = px[1] as usize * bins / 256;
            let b = px[2] as usize * bins / 256;
            hist[(r * bins + g) * bins + b] += 1.0;
        }

        hist
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(64, 64, 8)
    }
}
