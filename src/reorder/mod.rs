//! 打乱帧序的视频重建
//!
//! 流程：
//! 1. 离群过滤 - 与中位颜色直方图相关性低于阈值的帧被剔除
//! 2. 距离矩阵 - 保留帧低分辨率像素向量的两两欧氏距离
//! 3. 帧序重建 - 贪心最近邻路径 + 接缝修正，固定轮数
//! 4. 下标映射 - 把保留帧顺序映射回原始视频下标

pub mod config;
pub mod correspondence;
pub mod distance;
pub mod outlier;
pub mod pipeline;
pub mod sequence;

pub use config::ReorderConfig;
pub use distance::{DistanceMatrix, PairwiseDistances};
pub use outlier::{FilteredFrames, OutlierFilter};
pub use pipeline::{FrameReorderer, Reconstruction, ReconstructionKind};
pub use sequence::{Ordering, SequenceReconstructor};
