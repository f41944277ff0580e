//! Flat (exhaustive) nearest-neighbor index over squared L2 distance.
//!
//! Every query scans all stored vectors — no approximation, no pruning
//! structure. Membership is fixed at construction; changing it means
//! rebuilding. The index stores positions only: mapping a position back to
//! a movie id is the caller's job, via whatever structure owns the pairing.

use thiserror::Error;

/// Errors from index construction or queries
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Query has dimension {got}, index expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Vector at position {position} has dimension {got}, expected {expected}")]
    RaggedVector {
        position: usize,
        expected: usize,
        got: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, IndexError>;

/// One query hit: a stored position and its squared L2 distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// Exhaustive k-NN index, immutable after construction.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    /// Row-major, `count * dimension` values, insertion order
    vectors: Vec<f32>,
    count: usize,
}

impl FlatIndex {
    /// Build an index from an ordered sequence of equal-dimension vectors.
    pub fn build<'a>(
        dimension: usize,
        rows: impl IntoIterator<Item = &'a [f32]>,
    ) -> Result<Self> {
        let mut vectors = Vec::new();
        let mut count = 0usize;
        for row in rows {
            if row.len() != dimension {
                return Err(IndexError::RaggedVector {
                    position: count,
                    expected: dimension,
                    got: row.len(),
                });
            }
            vectors.extend_from_slice(row);
            count += 1;
        }
        Ok(Self {
            dimension,
            vectors,
            count,
        })
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Return the `k` nearest stored vectors to `query`, ascending by
    /// squared L2 distance. Ties break toward the earlier insertion
    /// position. Asking for more neighbors than stored vectors returns
    /// them all.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<Neighbor> = self
            .rows()
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                distance: squared_l2(query, row),
            })
            .collect();

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        scored.truncate(k.min(self.count));
        Ok(scored)
    }

    fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.vectors.chunks_exact(self.dimension.max(1))
    }
}

/// Squared Euclidean distance (no square root; ordering is preserved)
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_index() -> FlatIndex {
        // Vectors at known positions on the plane
        let rows: Vec<Vec<f32>> = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![10.0, 10.0],
            vec![0.0, 2.0],
        ];
        FlatIndex::build(2, rows.iter().map(|r| r.as_slice())).unwrap()
    }

    #[test]
    fn test_knn_returns_nearest_in_ascending_order() {
        let index = small_index();
        let hits = index.search(&[0.1, 0.0], 3).unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].position, 0); // (0,0), distance 0.01
        assert_eq!(hits[1].position, 1); // (1,0), distance 0.81
        assert_eq!(hits[2].position, 3); // (0,2), distance 4.01
        assert!(hits[0].distance < hits[1].distance);
        assert!(hits[1].distance < hits[2].distance);
        assert!((hits[0].distance - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_query_is_deterministic() {
        let index = small_index();
        let first = index.search(&[3.0, 4.0], 4).unwrap();
        let second = index.search(&[3.0, 4.0], 4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let rows: Vec<Vec<f32>> = vec![vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, 1.0]];
        let index = FlatIndex::build(2, rows.iter().map(|r| r.as_slice())).unwrap();

        // All three are at distance 1 from the origin
        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[1].position, 1);
        assert_eq!(hits[2].position, 2);
    }

    #[test]
    fn test_k_larger_than_index_returns_all() {
        let index = small_index();
        let hits = index.search(&[0.0, 0.0], 100).unwrap();
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let index = small_index();
        let result = index.search(&[0.0, 0.0, 0.0], 2);
        assert!(matches!(result, Err(IndexError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_ragged_build_is_error() {
        let rows: Vec<Vec<f32>> = vec![vec![0.0, 0.0], vec![1.0]];
        let result = FlatIndex::build(2, rows.iter().map(|r| r.as_slice()));
        assert!(matches!(result, Err(IndexError::RaggedVector { position: 1, .. })));
    }

    #[test]
    fn test_empty_index_returns_no_hits() {
        let index = FlatIndex::build(2, std::iter::empty()).unwrap();
        let hits = index.search(&[0.0, 0.0], 5).unwrap();
        assert!(hits.is_empty());
    }
}
