// scoutseed — batching.rs
// Splits a dataset into contiguous fixed-size upload batches.
// Author: d65v <https://github.com/d65v>

use std::iter::{Enumerate, FusedIterator};
use std::slice::Chunks;

use crate::{Record, Result, SeedError};

/// A borrowed, contiguous run of records sent in one upload request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch<'a> {
    /// Position of this batch in partition order, starting at 0
    pub index: usize,
    pub records: &'a [Record],
}

impl<'a> Batch<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Lazy sequence of batches produced by [`partition`].
#[derive(Debug, Clone)]
pub struct Batches<'a> {
    chunks: Enumerate<Chunks<'a, Record>>,
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks
            .next()
            .map(|(index, records)| Batch { index, records })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Batches<'_> {}

impl FusedIterator for Batches<'_> {}

/// Partition `records` into batches of `batch_size`.
///
/// Every batch holds exactly `batch_size` records except possibly the last.
/// An empty dataset yields no batches.
///
/// # Errors
/// Returns `SeedError::InvalidConfiguration` if `batch_size <= 0`.
pub fn partition(records: &[Record], batch_size: i64) -> Result<Batches<'_>> {
    let size = checked_size(batch_size)?;
    Ok(Batches {
        chunks: records.chunks(size).enumerate(),
    })
}

fn checked_size(batch_size: i64) -> Result<usize> {
    if batch_size <= 0 {
        return Err(SeedError::InvalidConfiguration(format!(
            "batch size must be positive, got {}",
            batch_size
        )));
    }
    usize::try_from(batch_size).map_err(|_| {
        SeedError::InvalidConfiguration(format!("batch size {} is too large", batch_size))
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Record> {
        (0..n).map(|i| json!({ "id": i })).collect()
    }

    fn lengths(records: &[Record], size: i64) -> Vec<usize> {
        partition(records, size).unwrap().map(|b| b.len()).collect()
    }

    #[test]
    fn test_uneven_tail() {
        assert_eq!(lengths(&rows(250), 100), vec![100, 100, 50]);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(lengths(&rows(100), 100), vec![100]);
        assert_eq!(lengths(&rows(300), 100), vec![100, 100, 100]);
    }

    #[test]
    fn test_empty_dataset() {
        let batches = partition(&[], 10).unwrap();
        assert_eq!(batches.len(), 0);
        assert_eq!(batches.count(), 0);
    }

    #[test]
    fn test_batch_larger_than_dataset() {
        assert_eq!(lengths(&rows(3), 100), vec![3]);
    }

    #[test]
    fn test_non_positive_size_rejected() {
        for size in [0, -1, -5, i64::MIN] {
            let err = partition(&rows(10), size).unwrap_err();
            assert!(matches!(err, SeedError::InvalidConfiguration(_)));
            assert!(partition(&[], size).is_err());
        }
    }

    #[test]
    fn test_concatenation_preserves_order() {
        let data = rows(47);
        for size in 1..=50 {
            let joined: Vec<Record> = partition(&data, size)
                .unwrap()
                .flat_map(|b| b.records.iter().cloned())
                .collect();
            assert_eq!(joined, data, "batch size {}", size);
        }
    }

    #[test]
    fn test_counts_and_indices() {
        for n in 0..40usize {
            let data = rows(n);
            for size in 1..12i64 {
                let batches: Vec<Batch<'_>> = partition(&data, size).unwrap().collect();
                let expected = n.div_ceil(size as usize);
                assert_eq!(batches.len(), expected);
                assert_eq!(partition(&data, size).unwrap().len(), expected);

                for (i, b) in batches.iter().enumerate() {
                    assert_eq!(b.index, i);
                    if i + 1 < batches.len() {
                        assert_eq!(b.len(), size as usize);
                    } else {
                        assert!(b.len() >= 1 && b.len() <= size as usize);
                    }
                }
            }
        }
    }

    #[test]
    fn test_exact_size_hint() {
        let data = rows(250);
        let mut batches = partition(&data, 100).unwrap();
        assert_eq!(batches.len(), 3);
        batches.next();
        assert_eq!(batches.len(), 2);
    }
}
