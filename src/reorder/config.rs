use crate::core::error::Result;
use serde::{Deserialize, Serialize};

/// 重建参数。默认值为经验常数（0.85 / 10 轮），调整即视为行为变化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// 与中位直方图的相关系数低于此值的帧视为离群帧
    pub correlation_threshold: f64,
    /// 贪心路径 + 接缝修正的最大轮数。0 按 1 处理：至少要走一次贪心路径才有结果
    pub rounds: usize,
    /// 第一轮的起点（保留帧下标）
    pub start_anchor: usize,
    pub sample_width: u32,
    pub sample_height: u32,
    /// 每个通道的直方图 bin 数
    pub histogram_bins: u32,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            correlation_threshold: 0.85,
            rounds: 10,
            start_anchor: 0,
            sample_width: 64,
            sample_height: 64,
            histogram_bins: 8,
        }
    }
}

impl ReorderConfig {
    /// 更激进地剔除插入帧
    pub fn strict() -> Self {
        Self {
            correlation_threshold: 0.92,
            ..Default::default()
        }
    }

    /// 光照变化大的素材，少剔除
    pub fn lenient() -> Self {
        Self {
            correlation_threshold: 0.75,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
