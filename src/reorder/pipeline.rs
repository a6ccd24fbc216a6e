use crate::core::error::{ReorderError, Result};
use crate::core::video::emitter;
use crate::core::video::features::{FeatureExtractor, FrameFeatures};
use crate::core::video::source::{FrameSink, VideoSource};
use crate::reorder::config::ReorderConfig;
use crate::reorder::correspondence;
use crate::reorder::distance::DistanceMatrix;
use crate::reorder::outlier::OutlierFilter;
use crate::reorder::sequence::SequenceReconstructor;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructionKind {
    /// 没有输入帧
    Empty,
    /// 只保留了一帧
    SingleFrame,
    Sequence,
}

/// 一次重建的全部结果
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    index_map: Vec<usize>,
    ordering: Vec<usize>,
    excluded: Vec<usize>,
    forward: Vec<usize>,
    reverse: Vec<usize>,
    rounds_run: usize,
}

impl Reconstruction {
    fn empty() -> Self {
        Self {
            index_map: Vec::new(),
            ordering: Vec::new(),
            excluded: Vec::new(),
            forward: Vec::new(),
            reverse: Vec::new(),
            rounds_run: 0,
        }
    }

    pub fn kind(&self) -> ReconstructionKind {
        match self.ordering.len() {
            0 => ReconstructionKind::Empty,
            1 => ReconstructionKind::SingleFrame,
            _ => ReconstructionKind::Sequence,
        }
    }

    /// 保留帧 -> 原始帧下标
    pub fn index_map(&self) -> &[usize] {
        &self.index_map
    }

    /// 保留帧下标的排列
    pub fn ordering(&self) -> &[usize] {
        &self.ordering
    }

    pub fn excluded(&self) -> &[usize] {
        &self.excluded
    }

    /// 正序的原始帧下标
    pub fn forward(&self) -> &[usize] {
        &self.forward
    }

    /// 倒序的原始帧下标
    pub fn reverse(&self) -> &[usize] {
        &self.reverse
    }

    pub fn rounds_run(&self) -> usize {
        self.rounds_run
    }
}

pub struct FrameReorderer {
    config: ReorderConfig,
}

impl FrameReorderer {
    pub fn new() -> Self {
        Self::with_config(ReorderConfig::default())
    }

    pub fn with_config(config: ReorderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    pub fn feature_extractor(&self) -> FeatureExtractor {
        FeatureExtractor::new(
            self.config.sample_width,
            self.config.sample_height,
            self.config.histogram_bins,
        )
    }

    /// 离群过滤 -> 距离矩阵 -> 帧序重建 -> 映射回原始下标
    pub fn reconstruct(&self, pixels: &[Vec<f32>], histograms: &[Vec<f32>]) -> Result<Reconstruction> {
        let filtered = OutlierFilter::new(self.config.correlation_threshold).filter(histograms, pixels)?;

        if histograms.is_empty() {
            info!("📭 No frames to reorder");
            return Ok(Reconstruction::empty());
        }
        if filtered.index_map.is_empty() {
            warn!("⚠️ Every frame failed the outlier test");
            return Err(ReorderError::AllFramesExcluded {
                total: histograms.len(),
            });
        }

        let matrix = DistanceMatrix::build(&filtered.features)?;
        let ordering = SequenceReconstructor::new(self.config.rounds, self.config.start_anchor)
            .reconstruct(&matrix)?;

        let forward = correspondence::compose(&ordering.order, &filtered.index_map)?;
        let reverse = correspondence::compose_reversed(&ordering.order, &filtered.index_map)?;

        info!(
            "✅ Reconstructed {} frames ({} excluded)",
            forward.len(),
            filtered.excluded.len()
        );

        Ok(Reconstruction {
            index_map: filtered.index_map,
            ordering: ordering.order,
            excluded: filtered.excluded,
            forward,
            reverse,
            rounds_run: ordering.rounds_run,
        })
    }

    pub fn reconstruct_features(&self, features: &[FrameFeatures]) -> Result<Reconstruction> {
        let (pixels, histograms) = FrameFeatures::split(features);
        self.reconstruct(&pixels, &histograms)
    }

    /// 完整流程：提取特征、重建顺序、分别写出正序和倒序
    pub fn reorder_video(
        &self,
        source: &mut dyn VideoSource,
        forward_sink: &mut dyn FrameSink,
        reverse_sink: &mut dyn FrameSink,
    ) -> Result<Reconstruction> {
        let features = self.feature_extractor().extract_all(source)?;
        let reconstruction = self.reconstruct_features(&features)?;
        emitter::emit_both(source, forward_sink, reverse_sink, &reconstruction)?;
        Ok(reconstruction)
    }
}

impl Default for FrameReorderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::frame::Frame;
    use crate::core::video::source::{MemorySink, MemoryVideo};

    fn chain_features(order: &[usize]) -> Vec<Vec<f32>> {
        // 原始时间位置 t 的帧在 t*10 处
        order.iter().map(|&t| vec![t as f32 * 10.0, 0.0]).collect()
    }

    fn flat_histograms(n: usize) -> Vec<Vec<f32>> {
        vec![vec![4.0, 1.0, 0.0, 2.0]; n]
    }

    #[test]
    fn test_chain_without_outliers() {
        let pixels = chain_features(&[0, 1, 2, 3, 4]);
        let result = FrameReorderer::new()
            .reconstruct(&pixels, &flat_histograms(5))
            .unwrap();

        assert_eq!(result.kind(), ReconstructionKind::Sequence);
        assert_eq!(result.index_map(), &[0, 1, 2, 3, 4]);
        assert!(result.forward() == [0, 1, 2, 3, 4] || result.forward() == [4, 3, 2, 1, 0]);
        let mut reversed = result.forward().to_vec();
        reversed.reverse();
        assert_eq!(result.reverse(), reversed.as_slice());
    }

    #[test]
    fn test_outlier_removed_and_mapped_back() {
        // 位置 1 和 3 的帧互换，位置 2 插入一帧离群帧
        let mut pixels = chain_features(&[0, 3, 2, 1, 4]);
        pixels[2] = vec![500.0, 500.0];
        let mut histograms = flat_histograms(5);
        histograms[2] = vec![0.0, 0.0, 9.0, 0.0];

        let result = FrameReorderer::new().reconstruct(&pixels, &histograms).unwrap();

        assert_eq!(result.excluded(), &[2]);
        assert_eq!(result.index_map(), &[0, 1, 3, 4]);
        let forward = result.forward();
        assert!(forward == [0, 3, 1, 4] || forward == [4, 1, 3, 0]);
        assert!(!forward.contains(&2));
    }

    #[test]
    fn test_empty_input() {
        let result = FrameReorderer::new().reconstruct(&[], &[]).unwrap();
        assert_eq!(result.kind(), ReconstructionKind::Empty);
        assert!(result.forward().is_empty());
        assert!(result.reverse().is_empty());
    }

    #[test]
    fn test_single_frame() {
        let result = FrameReorderer::new()
            .reconstruct(&[vec![1.0]], &flat_histograms(1))
            .unwrap();
        assert_eq!(result.kind(), ReconstructionKind::SingleFrame);
        assert_eq!(result.forward(), &[0]);
        assert_eq!(result.rounds_run(), 0);
    }

    #[test]
    fn test_all_frames_excluded() {
        let config = ReorderConfig {
            correlation_threshold: 1.5,
            ..Default::default()
        };
        let err = FrameReorderer::with_config(config)
            .reconstruct(&chain_features(&[0, 1]), &flat_histograms(2))
            .unwrap_err();
        assert!(matches!(err, ReorderError::AllFramesExcluded { total: 2 }));
    }

    #[test]
    fn test_dimension_mismatch() {
        let pixels = vec![vec![0.0, 0.0], vec![1.0]];
        let err = FrameReorderer::new()
            .reconstruct(&pixels, &flat_histograms(2))
            .unwrap_err();
        assert!(matches!(err, ReorderError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_deterministic_runs() {
        let pixels = chain_features(&[3, 0, 4, 1, 2, 6, 5]);
        let reorderer = FrameReorderer::new();
        let a = reorderer.reconstruct(&pixels, &flat_histograms(7)).unwrap();
        let b = reorderer.reconstruct(&pixels, &flat_histograms(7)).unwrap();
        assert_eq!(a, b);
    }

    /// 上 12 行固定灰色背景，下 4 行蓝色随时间变化
    fn shot_frame(blue: u8, frame_number: u64) -> Frame {
        let mut frame = Frame::filled(16, 16, [100, 100, 100], frame_number);
        for px in frame.data.chunks_exact_mut(4).skip(12 * 16) {
            px.copy_from_slice(&[0, 60, blue, 255]);
        }
        frame
    }

    #[test]
    fn test_reorder_video_end_to_end() {
        let shot: Vec<u8> = vec![0, 40, 80, 120, 160, 200];
        let shuffled = [3usize, 0, 5, 1, 4, 2];
        let mut frames: Vec<Frame> = shuffled.iter().map(|&t| shot_frame(shot[t], 0)).collect();
        // 插入一帧纯红
        frames.insert(2, Frame::filled(16, 16, [255, 0, 0], 0));
        for (i, f) in frames.iter_mut().enumerate() {
            f.frame_number = i as u64;
        }

        let config = ReorderConfig {
            sample_width: 16,
            sample_height: 16,
            ..Default::default()
        };
        let mut video = MemoryVideo::new(frames);
        let mut forward = MemorySink::new();
        let mut reverse = MemorySink::new();

        let result = FrameReorderer::with_config(config)
            .reorder_video(&mut video, &mut forward, &mut reverse)
            .unwrap();

        assert_eq!(result.excluded(), &[2]);
        assert!(forward.finished && reverse.finished);
        assert_eq!(forward.frames.len(), 6);
        let expected: Vec<u64> = result.forward().iter().map(|&i| i as u64).collect();
        assert_eq!(forward.frame_numbers(), expected);

        let blues: Vec<u8> = forward
            .frames
            .iter()
            .map(|f| f.data[f.data.len() - 2])
            .collect();
        let mut sorted = blues.clone();
        sorted.sort();
        let mut sorted_desc = sorted.clone();
        sorted_desc.reverse();
        assert!(blues == sorted || blues == sorted_desc);

        let mut backwards = reverse.frame_numbers();
        backwards.reverse();
        assert_eq!(forward.frame_numbers(), backwards);
    }
}
