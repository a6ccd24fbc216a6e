use super::outlier::check_dimensions;
use crate::core::error::Result;

/// 成对距离查询
pub trait PairwiseDistances {
    fn len(&self) -> usize;

    fn distance(&self, i: usize, j: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 对称、对角线为 0 的欧氏距离矩阵（行优先存储）
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub fn build(features: &[Vec<f32>]) -> Result<Self> {
        check_dimensions("feature", features)?;

        let n = features.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean(&features[i], &features[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Ok(Self { size: n, data })
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }
}

impl PairwiseDistances for DistanceMatrix {
    fn len(&self) -> usize {
        self.size
    }

    fn distance(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}
