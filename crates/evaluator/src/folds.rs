//! Chronological Validation Folds

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::CvStrategy;

/// One validation fold over positions `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// Training positions as ordered, disjoint ranges
    pub train: Vec<Range<usize>>,
    /// Held-out positions
    pub test: Range<usize>,
}

impl Fold {
    /// Training positions in order
    pub fn train_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.train.iter().flat_map(|r| r.clone())
    }

    /// Number of training positions
    pub fn train_len(&self) -> usize {
        self.train.iter().map(|r| r.len()).sum()
    }
}

/// Cut `n` positions into `k` folds; empty when `n < 2k` or `k < 2`
pub fn folds(n: usize, k: usize, strategy: CvStrategy) -> Vec<Fold> {
    if k < 2 || n < 2 * k {
        return Vec::new();
    }
    match strategy {
        CvStrategy::KFold => k_fold(n, k),
        CvStrategy::Expanding => expanding(n, k),
    }
}

/// The first `n % k` folds hold one extra position
fn k_fold(n: usize, k: usize) -> Vec<Fold> {
    let base = n / k;
    let extra = n % k;
    let mut start = 0;

    (0..k)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let test = start..start + size;
            start += size;

            let train = [0..test.start, test.end..n]
                .into_iter()
                .filter(|r| !r.is_empty())
                .collect();
            Fold { train, test }
        })
        .collect()
}

/// `k` test blocks of `n / (k + 1)` positions at the end of the series
fn expanding(n: usize, k: usize) -> Vec<Fold> {
    let test_size = n / (k + 1);
    (0..k)
        .map(|i| {
            let train_end = n - (k - i) * test_size;
            Fold {
                train: vec![0..train_end],
                test: train_end..train_end + test_size,
            }
        })
        .collect()
}
