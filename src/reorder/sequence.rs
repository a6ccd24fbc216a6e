//! 帧序重建：从起点做贪心最近邻遍历，找出路径中距离最大的相邻对（接缝），
//! 以接缝处的帧作为下一轮起点，重复若干轮。

use super::distance::PairwiseDistances;
use crate::core::error::{ReorderError, Result};
use log::{debug, info};

/// 重建出的帧序
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    /// 保留帧下标的一个排列
    pub order: Vec<usize>,
    /// 实际运行的轮数
    pub rounds_run: usize,
}

pub struct SequenceReconstructor {
    rounds: usize,
    start_anchor: usize,
}

impl SequenceReconstructor {
    /// `rounds` 至少为 1，传入 0 时仍运行一轮
    pub fn new(rounds: usize, start_anchor: usize) -> Self {
        Self {
            rounds: rounds.max(1),
            start_anchor,
        }
    }

    pub fn reconstruct(&self, distances: &dyn PairwiseDistances) -> Result<Ordering> {
        let n = distances.len();
        // 0 或 1 帧不进入主循环
        if n < 2 {
            return Ok(Ordering {
                order: (0..n).collect(),
                rounds_run: 0,
            });
        }
        if self.start_anchor >= n {
            return Err(ReorderError::FrameOutOfRange {
                index: self.start_anchor,
                len: n,
            });
        }

        let neighbors = sorted_neighbors(distances);

        let mut start = self.start_anchor;
        let mut order = greedy_walk(&neighbors, start);
        let mut rounds_run = 1;

        while rounds_run < self.rounds {
            let (seam, gap) = find_seam(distances, &order);
            let next = seam.unwrap_or(self.start_anchor);
            debug!(
                "round {}: start={} seam={} gap={:.3}",
                rounds_run, start, next, gap
            );

            // 起点不变，后续轮次结果相同
            if next == start {
                break;
            }
            start = next;
            order = greedy_walk(&neighbors, start);
            rounds_run += 1;
        }

        info!(
            "🔗 Reconstructed order of {} frames in {} rounds",
            n, rounds_run
        );
        Ok(Ordering { order, rounds_run })
    }
}

impl Default for SequenceReconstructor {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

/// 每行按距离稳定排序，距离相同时下标小的在前
fn sorted_neighbors(distances: &dyn PairwiseDistances) -> Vec<Vec<usize>> {
    let n = distances.len();
    (0..n)
        .map(|i| {
            let mut row: Vec<usize> = (0..n).collect();
            row.sort_by(|&a, &b| distances.distance(i, a).total_cmp(&distances.distance(i, b)));
            row
        })
        .collect()
}

fn greedy_walk(neighbors: &[Vec<usize>], start: usize) -> Vec<usize> {
    let n = neighbors.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut current = start;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let next = neighbors[current]
            .iter()
            .copied()
            .find(|&candidate| !visited[candidate]);
        let Some(next) = next else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// 在路径（含末尾到开头的回绕对）中找距离最大的相邻对，返回前一帧。
/// 严格大于才更新，所以相同距离取最先遇到的一对；全为 0 时返回 None。
fn find_seam(distances: &dyn PairwiseDistances, order: &[usize]) -> (Option<usize>, f64) {
    let Some(&last) = order.last() else {
        return (None, 0.0);
    };

    let mut prev = last;
    let mut max_gap = 0.0;
    let mut seam = None;
    for &current in order {
        let gap = distances.distance(prev, current);
        if gap > max_gap {
            max_gap = gap;
            seam = Some(prev);
        }
        prev = current;
    }

    (seam, max_gap)
}
