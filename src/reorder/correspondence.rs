use crate::core::error::{ReorderError, Result};

/// 将保留帧的顺序映射回原始视频下标：`final[p] = index_map[order[p]]`
pub fn compose(order: &[usize], index_map: &[usize]) -> Result<Vec<usize>> {
    order
        .iter()
        .map(|&retained| {
            index_map
                .get(retained)
                .copied()
                .ok_or(ReorderError::FrameOutOfRange {
                    index: retained,
                    len: index_map.len(),
                })
        })
        .collect()
}

/// 倒序版本
pub fn compose_reversed(order: &[usize], index_map: &[usize]) -> Result<Vec<usize>> {
    let mut reversed = compose(order, index_map)?;
    reversed.reverse();
    Ok(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose() {
        assert_eq!(compose(&[2, 0, 1], &[0, 2, 3]).unwrap(), vec![3, 0, 2]);
    }

    #[test]
    fn test_reverse_is_exact_reverse() {
        let index_map = [1, 4, 5, 9];
        let order = [3, 1, 0, 2];
        let forward = compose(&order, &index_map).unwrap();
        let reverse = compose_reversed(&order, &index_map).unwrap();

        assert_eq!(forward, vec![9, 4, 1, 5]);
        assert_eq!(reverse, forward.iter().rev().copied().collect::<Vec<_>>());
    }

    #[test]
    fn test_empty() {
        assert!(compose(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let err = compose(&[0, 3], &[0, 2, 3]).unwrap_err();
        assert!(matches!(err, ReorderError::FrameOutOfRange { index: 3, len: 3 }));
    }
}
