//! 视频帧序重建

use crate::core::error::ReorderError;
use crate::core::video::{ImageSequenceSource, ImageSequenceWriter, VideoSource};
use crate::reorder::{FrameReorderer, ReorderConfig};
use flutter_rust_bridge::frb;
use log::info;
use serde::{Deserialize, Serialize};

/// 重建错误，FRB 友好的设计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderApiError {
    pub error_type: String,
    pub message: String,
}

impl From<ReorderError> for ReorderApiError {
    fn from(e: ReorderError) -> Self {
        let error_type = match &e {
            ReorderError::Io(_) => "Io",
            ReorderError::Image(_) => "Image",
            ReorderError::Config(_) => "Config",
            ReorderError::DimensionMismatch { .. } => "DimensionMismatch",
            ReorderError::LengthMismatch { .. } => "LengthMismatch",
            ReorderError::AllFramesExcluded { .. } => "AllFramesExcluded",
            ReorderError::FrameOutOfRange { .. } => "FrameOutOfRange",
            ReorderError::InvalidFrame(_) => "InvalidFrame",
        };
        Self {
            error_type: error_type.to_string(),
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ReorderApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error_type, self.message)
    }
}

impl std::error::Error for ReorderApiError {}

/// 重建结果（原始帧下标）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderOutput {
    pub forward: Vec<u32>,
    pub reverse: Vec<u32>,
    pub excluded: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderStats {
    pub total_frames: u32,
    pub written_frames: u32,
    pub excluded_frames: u32,
}

/// 帧序重建器
///
/// ```dart
/// final reorderer = VideoReorderer.create();
/// final stats = await reorderer.reorderImageSequence(
///     inputDir: input, forwardDir: fwd, reverseDir: rev);
/// ```
#[frb(opaque)]
pub struct VideoReorderer {
    reorderer: FrameReorderer,
}

impl VideoReorderer {
    #[frb(sync)]
    pub fn create() -> Self {
        info!("🎬 VideoReorderer: created");
        Self {
            reorderer: FrameReorderer::new(),
        }
    }

    /// 用 JSON 覆盖部分参数，未给出的字段取默认值
    #[frb(sync)]
    pub fn with_config_json(json: String) -> Result<Self, ReorderApiError> {
        let config = ReorderConfig::from_json(&json)?;
        info!("🎬 VideoReorderer: created with {:?}", config);
        Ok(Self {
            reorderer: FrameReorderer::with_config(config),
        })
    }

    /// 直接用外部提取好的特征重建
    #[frb]
    pub fn reorder_features(
        &self,
        pixels: Vec<Vec<f32>>,
        histograms: Vec<Vec<f32>>,
    ) -> Result<ReorderOutput, ReorderApiError> {
        let result = self.reorderer.reconstruct(&pixels, &histograms)?;
        Ok(ReorderOutput {
            forward: to_u32(result.forward())?,
            reverse: to_u32(result.reverse())?,
            excluded: to_u32(result.excluded())?,
        })
    }

    /// 读取图片序列目录，正序写入 forward_dir，倒序写入 reverse_dir
    #[frb]
    pub fn reorder_image_sequence(
        &self,
        input_dir: String,
        forward_dir: String,
        reverse_dir: String,
    ) -> Result<ReorderStats, ReorderApiError> {
        let mut source = ImageSequenceSource::open(&input_dir)?;
        let mut forward = ImageSequenceWriter::create(&forward_dir)?;
        let mut reverse = ImageSequenceWriter::create(&reverse_dir)?;

        let total = source.info().frame_count;
        let result = self
            .reorderer
            .reorder_video(&mut source, &mut forward, &mut reverse)?;

        Ok(ReorderStats {
            total_frames: count_u32(total)?,
            written_frames: count_u32(forward.written())?,
            excluded_frames: count_u32(result.excluded().len())?,
        })
    }

    #[frb(sync, getter)]
    pub fn config(&self) -> ReorderConfig {
        self.reorderer.config().clone()
    }
}

impl Drop for VideoReorderer {
    fn drop(&mut self) {
        info!("🗑️ VideoReorderer: released");
    }
}

/// Dart 侧按 u32 接收帧下标，超出范围报 FrameOutOfRange
fn to_u32(indices: &[usize]) -> Result<Vec<u32>, ReorderError> {
    indices.iter().map(|&i| count_u32(i)).collect()
}

fn count_u32(value: usize) -> Result<u32, ReorderError> {
    u32::try_from(value).map_err(|_| ReorderError::FrameOutOfRange {
        index: value,
        len: u32::MAX as usize,
    })
}
