//! Offline ranking-quality evaluation.
//!
//! For every user with at least one relevant held-out rating, the
//! evaluator queries the index with the user's embedding and compares the
//! top-k movies against what the user actually rated. Precision@k and
//! Recall@k are averaged across users. Multiple k values run as
//! independent passes over the same index and embeddings.

use crate::context::RecContext;
use anyhow::Result;
use data_loader::{MovieId, UserId};
use std::collections::HashSet;
use tracing::{info, warn};

/// Aggregate metrics for one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingMetrics {
    pub k: usize,
    pub precision: f32,
    pub recall: f32,
    /// Number of users averaged over
    pub users: usize,
}

/// Precision@k / Recall@k evaluator against the held-out rating table.
pub struct Evaluator<'a> {
    context: &'a RecContext,
    relevance_threshold: f32,
}

impl<'a> Evaluator<'a> {
    /// `relevance_threshold` decides which held-out ratings count as
    /// relevant (`rating >= threshold`).
    pub fn new(context: &'a RecContext, relevance_threshold: f32) -> Self {
        Self {
            context,
            relevance_threshold,
        }
    }

    /// Run one evaluation pass at a given k.
    pub fn evaluate_at(&self, k: usize) -> Result<RankingMetrics> {
        let users = self
            .context
            .ratings
            .users_with_relevant(self.relevance_threshold);

        if users.is_empty() {
            warn!(
                "No users with relevant ratings at threshold {}; metrics are zero",
                self.relevance_threshold
            );
            return Ok(RankingMetrics {
                k,
                precision: 0.0,
                recall: 0.0,
                users: 0,
            });
        }

        let mut precision_sum = 0.0f32;
        let mut recall_sum = 0.0f32;
        for &user_id in &users {
            let (precision, recall) = self.evaluate_user(user_id, k)?;
            precision_sum += precision;
            recall_sum += recall;
        }

        let metrics = RankingMetrics {
            k,
            precision: precision_sum / users.len() as f32,
            recall: recall_sum / users.len() as f32,
            users: users.len(),
        };
        info!(
            "Precision@{}: {:.4}, Recall@{}: {:.4} over {} users",
            k, metrics.precision, k, metrics.recall, metrics.users
        );
        Ok(metrics)
    }

    /// Per-user (precision, recall) at k.
    ///
    /// A user with no embedding contributes (0, 0); a user with no
    /// relevant rated movies gets recall 0 rather than a division fault.
    pub fn evaluate_user(&self, user_id: UserId, k: usize) -> Result<(f32, f32)> {
        let Some(user_vec) = self.context.user_embedding(user_id) else {
            return Ok((0.0, 0.0));
        };

        let hits = self.context.index.search(user_vec, k)?;
        let recommended: HashSet<MovieId> = hits
            .iter()
            .filter_map(|n| self.context.movie_id_at(n.position))
            .collect();

        let actual = self
            .context
            .ratings
            .relevant_movies(user_id, self.relevance_threshold);

        let hit_count = recommended.intersection(&actual).count();
        let precision = hit_count as f32 / k as f32;
        let recall = if actual.is_empty() {
            0.0
        } else {
            hit_count as f32 / actual.len() as f32
        };
        Ok((precision, recall))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{
        compose_movie_text, Movie, MovieCatalog, Rating, RatingTable,
    };
    use encoder::MovieEmbeddings;
    use std::collections::HashMap;
    use vec_index::FlatIndex;

    /// Context over three movies at known plane positions, one embedded
    /// user near the origin. No encoder involved.
    fn test_context() -> RecContext {
        let catalog = MovieCatalog::from_movies(vec![
            Movie { id: 101, text: compose_movie_text("Zero", "at origin", "A") },
            Movie { id: 102, text: compose_movie_text("One", "one right", "B") },
            Movie { id: 103, text: compose_movie_text("Far", "way out", "C") },
        ]);

        let movie_embeddings = MovieEmbeddings::from_rows(
            vec![101, 102, 103],
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 10.0]],
        )
        .unwrap();

        let index =
            FlatIndex::build(movie_embeddings.dimension(), movie_embeddings.rows()).unwrap();

        let mut user_embeddings = HashMap::new();
        user_embeddings.insert(1u32, vec![0.1, 0.0]);

        let ratings = RatingTable::from_ratings(vec![
            Rating { user_id: 1, movie_id: 101, rating: 5.0 },
            Rating { user_id: 1, movie_id: 103, rating: 4.0 },
            Rating { user_id: 2, movie_id: 102, rating: 3.0 },
        ]);

        RecContext {
            catalog,
            movie_embeddings,
            index,
            user_embeddings,
            ratings,
        }
    }

    #[test]
    fn test_evaluate_user_hits_and_misses() {
        let context = test_context();
        let evaluator = Evaluator::new(&context, 0.0);

        // Top-2 for user 1 is {101, 102}; relevant is {101, 103}
        let (precision, recall) = evaluator.evaluate_user(1, 2).unwrap();
        assert!((precision - 0.5).abs() < 1e-6);
        assert!((recall - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_user_without_embedding_scores_zero() {
        let context = test_context();
        let evaluator = Evaluator::new(&context, 0.0);

        // User 2 rated movies but was never embedded
        let (precision, recall) = evaluator.evaluate_user(2, 5).unwrap();
        assert_eq!((precision, recall), (0.0, 0.0));
    }

    #[test]
    fn test_user_with_no_relevant_movies_has_zero_recall() {
        let context = test_context();
        // Threshold above every rating user 1 gave
        let evaluator = Evaluator::new(&context, 6.0);

        let (precision, recall) = evaluator.evaluate_user(1, 2).unwrap();
        assert_eq!(precision, 0.0);
        assert_eq!(recall, 0.0); // never a division fault
    }

    #[test]
    fn test_evaluate_at_averages_over_users() {
        let context = test_context();
        let evaluator = Evaluator::new(&context, 0.0);

        // User 1: precision 0.5, recall 0.5; user 2: (0, 0)
        let metrics = evaluator.evaluate_at(2).unwrap();
        assert_eq!(metrics.users, 2);
        assert!((metrics.precision - 0.25).abs() < 1e-6);
        assert!((metrics.recall - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_narrows_evaluated_users() {
        let context = test_context();
        // At threshold 4.0 only user 1 has relevant ratings
        let evaluator = Evaluator::new(&context, 4.0);

        let metrics = evaluator.evaluate_at(2).unwrap();
        assert_eq!(metrics.users, 1);
        // Relevant = {101, 103}; top-2 = {101, 102}
        assert!((metrics.precision - 0.5).abs() < 1e-6);
        assert!((metrics.recall - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_two_k_passes_reuse_same_context() {
        let context = test_context();
        let evaluator = Evaluator::new(&context, 0.0);

        let at_2 = evaluator.evaluate_at(2).unwrap();
        let at_3 = evaluator.evaluate_at(3).unwrap();
        assert_eq!(at_2.k, 2);
        assert_eq!(at_3.k, 3);
        // With k=3 everything is recommended, so user 1 recalls both
        assert!(at_3.recall > at_2.recall);
    }
}
