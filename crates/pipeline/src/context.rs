//! # Pipeline context
//!
//! [`RecContext`] is the one explicit structure behind a run: the loaded
//! tables, the movie embedding matrix, the vector index over it, and the
//! per-user embeddings. It is built once, stage by stage (encode movies →
//! index → encode users), and read-only afterwards — evaluation and
//! recommendation only ever borrow it.

use anyhow::{ensure, Context, Result};
use data_loader::{Dataset, MovieCatalog, MovieId, RatingTable, UserId};
use encoder::{encode_catalog, encode_users, MovieEmbeddings, SentenceEncoder};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// All state for one recommender run.
pub struct RecContext {
    pub catalog: MovieCatalog,
    pub movie_embeddings: MovieEmbeddings,
    pub index: vec_index::FlatIndex,
    pub user_embeddings: HashMap<UserId, Vec<f32>>,
    pub ratings: RatingTable,
}

impl RecContext {
    /// Build the full context from a loaded dataset.
    ///
    /// If `artifact` names an existing embedding artifact it is loaded
    /// instead of re-encoding the catalog; an artifact whose ids do not
    /// line up with the catalog is rejected rather than silently
    /// misaligning every downstream lookup. Users are always encoded
    /// fresh (one text at a time).
    pub fn build(
        dataset: Dataset,
        encoder: &dyn SentenceEncoder,
        artifact: Option<&Path>,
    ) -> Result<Self> {
        let start = Instant::now();
        let Dataset {
            catalog,
            profiles,
            ratings,
        } = dataset;

        let movie_embeddings = match artifact {
            Some(path) if path.exists() => {
                let embeddings = MovieEmbeddings::load(path)
                    .with_context(|| format!("Failed to load embedding artifact {}", path.display()))?;
                ensure!(
                    embeddings.matches_catalog(&catalog),
                    "Embedding artifact {} does not match the loaded catalog",
                    path.display()
                );
                info!("Reusing embedding artifact {}", path.display());
                embeddings
            }
            _ => encode_catalog(encoder, &catalog).context("Failed to encode movie catalog")?,
        };

        let index = vec_index::FlatIndex::build(movie_embeddings.dimension(), movie_embeddings.rows())
            .context("Failed to build vector index")?;
        info!(
            "Indexed {} movie vectors ({}-d)",
            index.len(),
            index.dimension()
        );

        let user_embeddings =
            encode_users(encoder, &profiles).context("Failed to encode user profiles")?;

        info!("Pipeline context ready in {:.2?}", start.elapsed());
        Ok(Self {
            catalog,
            movie_embeddings,
            index,
            user_embeddings,
            ratings,
        })
    }

    /// A user's embedding, if the profile table had them
    pub fn user_embedding(&self, user_id: UserId) -> Option<&[f32]> {
        self.user_embeddings.get(&user_id).map(|v| v.as_slice())
    }

    /// Map an index position back to its movie id
    pub fn movie_id_at(&self, position: usize) -> Option<MovieId> {
        self.movie_embeddings.id_at(position)
    }
}
