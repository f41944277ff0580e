//! Top-k recommendation.
//!
//! Queries the index with a user's embedding and formats the hits as a
//! ranked table. The display title and genres are re-derived from the
//! composed movie text (before the first `'.'` / after the last
//! `"Genres: "`), and the squared L2 distance is folded into a bounded
//! pseudo-similarity `1 / (1 + d)`.

use crate::context::RecContext;
use anyhow::Result;
use data_loader::{MovieId, UserId};
use tracing::warn;

/// Default number of recommendations
pub const DEFAULT_TOP_K: usize = 10;

/// One row of the recommendation table.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub rank: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub genres: String,
    /// `1 / (1 + distance)`, in (0, 1]; higher is nearer
    pub score: f32,
}

/// Ranks movies for a user by vector proximity.
pub struct Recommender<'a> {
    context: &'a RecContext,
}

impl<'a> Recommender<'a> {
    pub fn new(context: &'a RecContext) -> Self {
        Self { context }
    }

    /// Recommend the `top_k` nearest movies for a user.
    ///
    /// Returns `Ok(None)` when the user has no embedding — an unknown
    /// user is a notice, not a fault.
    pub fn recommend(&self, user_id: UserId, top_k: usize) -> Result<Option<Vec<Recommendation>>> {
        let Some(user_vec) = self.context.user_embedding(user_id) else {
            warn!("User ID {} not found in user embeddings", user_id);
            return Ok(None);
        };

        let hits = self.context.index.search(user_vec, top_k)?;

        let mut rows = Vec::with_capacity(hits.len());
        for (i, neighbor) in hits.iter().enumerate() {
            let Some(movie_id) = self.context.movie_id_at(neighbor.position) else {
                continue;
            };
            let Some(movie) = self.context.catalog.get(movie_id) else {
                continue;
            };

            rows.push(Recommendation {
                rank: i + 1,
                movie_id,
                title: display_title(&movie.text),
                genres: display_genres(&movie.text),
                score: 1.0 / (1.0 + neighbor.distance),
            });
        }
        Ok(Some(rows))
    }
}

/// Text before the first '.'
fn display_title(text: &str) -> String {
    text.split('.').next().unwrap_or("").to_string()
}

/// Text after the last occurrence of "Genres: "
fn display_genres(text: &str) -> String {
    text.rsplit("Genres: ").next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{compose_movie_text, Movie, MovieCatalog, RatingTable};
    use encoder::MovieEmbeddings;
    use std::collections::HashMap;
    use vec_index::FlatIndex;

    fn test_context() -> RecContext {
        let catalog = MovieCatalog::from_movies(vec![
            Movie {
                id: 101,
                text: compose_movie_text("Zero", "Sits at the origin.", "Drama"),
            },
            Movie {
                id: 102,
                text: compose_movie_text("One", "One step to the right.", "Action, Crime"),
            },
            Movie {
                id: 103,
                text: compose_movie_text("Far", "Way out there.", "Sci-Fi"),
            },
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

        RecContext {
            catalog,
            movie_embeddings,
            index,
            user_embeddings,
            ratings: RatingTable::from_ratings(vec![]),
        }
    }

    #[test]
    fn test_recommend_ranks_by_proximity() {
        let context = test_context();
        let recommender = Recommender::new(&context);

        let rows = recommender.recommend(1, 2).unwrap().expect("known user");
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].movie_id, 101);
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].movie_id, 102);
        assert!(rows[0].score > rows[1].score);

        // Scores are the bounded pseudo-similarity of the distances
        assert!((rows[0].score - 1.0 / 1.01).abs() < 1e-5);
        assert!(rows.iter().all(|r| r.score > 0.0 && r.score <= 1.0));
    }

    #[test]
    fn test_recommend_derives_display_fields() {
        let context = test_context();
        let recommender = Recommender::new(&context);

        let rows = recommender.recommend(1, 3).unwrap().unwrap();
        assert_eq!(rows[0].title, "Zero");
        assert_eq!(rows[1].genres, "Action, Crime");
        assert_eq!(rows[2].title, "Far");
        assert_eq!(rows[2].genres, "Sci-Fi");
    }

    #[test]
    fn test_unknown_user_yields_none_not_error() {
        let context = test_context();
        let recommender = Recommender::new(&context);

        let result = recommender.recommend(999, 10).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_top_k_beyond_catalog_returns_all() {
        let context = test_context();
        let recommender = Recommender::new(&context);

        let rows = recommender.recommend(1, 50).unwrap().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.last().unwrap().rank, 3);
    }

    #[test]
    fn test_display_splits() {
        let text = compose_movie_text("A. Title. With Dots", "Overview here.", "Drama, War");
        // Before the FIRST '.' only
        assert_eq!(display_title(&text), "A");
        // After the LAST "Genres: "
        assert_eq!(display_genres(&text), "Drama, War");
        assert_eq!(display_genres("X. Genres: once Genres: twice"), "twice");
    }
}
