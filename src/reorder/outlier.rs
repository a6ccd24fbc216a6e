//! 离群帧过滤：与中位直方图做相关性比较，低于阈值的帧被剔除

use crate::core::error::{ReorderError, Result};
use log::{debug, info};

/// 过滤结果
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredFrames {
    /// 保留帧的像素向量
    pub features: Vec<Vec<f32>>,
    /// 保留帧 -> 原始帧下标，严格递增
    pub index_map: Vec<usize>,
    /// 被剔除的原始帧下标，升序
    pub excluded: Vec<usize>,
    /// 每个原始帧与中位直方图的相关系数
    pub scores: Vec<f64>,
}

pub struct OutlierFilter {
    threshold: f64,
}

impl OutlierFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// 单次打分、单次剔除，不会在剔除后重新计算中位数
    pub fn filter(&self, histograms: &[Vec<f32>], features: &[Vec<f32>]) -> Result<FilteredFrames> {
        if histograms.len() != features.len() {
            return Err(ReorderError::LengthMismatch {
                features: features.len(),
                histograms: histograms.len(),
            });
        }
        check_dimensions("histogram", histograms)?;
        check_dimensions("feature", features)?;

        if histograms.is_empty() {
            return Ok(FilteredFrames {
                features: Vec::new(),
                index_map: Vec::new(),
                excluded: Vec::new(),
                scores: Vec::new(),
            });
        }

        let reference = median_histogram(histograms);
        let scores: Vec<f64> = histograms
            .iter()
            .map(|h| correlation(&reference, h))
            .collect();

        let excluded: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|&(_, &score)| score < self.threshold)
            .map(|(idx, _)| idx)
            .collect();

        let mut kept = features.to_vec();
        let mut index_map: Vec<usize> = (0..features.len()).collect();
        // 从后往前删，前面的下标不受影响
        for &idx in excluded.iter().rev() {
            kept.remove(idx);
            index_map.remove(idx);
        }

        for &idx in &excluded {
            debug!("frame {} excluded (correlation {:.3})", idx, scores[idx]);
        }
        info!(
            "🧹 Outlier filter: kept {}/{} frames (threshold {:.2})",
            index_map.len(),
            histograms.len(),
            self.threshold
        );

        Ok(FilteredFrames {
            features: kept,
            index_map,
            excluded,
            scores,
        })
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new(0.85)
    }
}

pub(crate) fn check_dimensions(kind: &'static str, vectors: &[Vec<f32>]) -> Result<()> {
    let Some(first) = vectors.first() else {
        return Ok(());
    };
    let expected = first.len();
    match vectors.iter().position(|v| v.len() != expected) {
        Some(index) => Err(ReorderError::DimensionMismatch {
            kind,
            index,
            expected,
            found: vectors[index].len(),
        }),
        None => Ok(()),
    }
}

/// 逐 bin 中位数；偶数个时取中间两个的平均
pub fn median_histogram(histograms: &[Vec<f32>]) -> Vec<f64> {
    let bins = histograms.first().map(|h| h.len()).unwrap_or(0);
    let n = histograms.len();
    let mut column = Vec::with_capacity(n);

    (0..bins)
        .map(|bin| {
            column.clear();
            column.extend(histograms.iter().map(|h| h[bin] as f64));
            column.sort_by(f64::total_cmp);
            if n % 2 == 1 {
                column[n / 2]
            } else {
                (column[n / 2 - 1] + column[n / 2]) / 2.0
            }
        })
        .collect()
}

/// Pearson 相关系数。方差为 0 时：两者完全相同记 1.0，否则记 0.0。
pub fn correlation(reference: &[f64], histogram: &[f32]) -> f64 {
    let n = reference.len();
    if n == 0 {
        return 1.0;
    }

    let mean_a = reference.iter().sum::<f64>() / n as f64;
    let mean_b = histogram.iter().map(|&v| v as f64).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&a, &b) in reference.iter().zip(histogram) {
        let da = a - mean_a;
        let db = b as f64 - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = (var_a * var_b).sqrt();
    if denom > f64::EPSILON {
        return cov / denom;
    }

    let identical = reference
        .iter()
        .zip(histogram)
        .all(|(&a, &b)| (a - b as f64).abs() <= f64::EPSILON);
    if identical {
        1.0
    } else {
        0.0
    }
}
