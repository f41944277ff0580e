//! Movie and user embeddings.
//!
//! [`MovieEmbeddings`] owns the (movie_id, vector) pairing as one unit:
//! position `i` always corresponds to `ids()[i]`, and neither side can be
//! reordered without the other. The same structure backs the on-disk
//! artifact so a reload cannot drift out of alignment either.
//!
//! Artifact layout (little-endian):
//! magic `SEMR` | u32 dimension | u32 count | count u32 movie ids |
//! count * dimension f32 vectors, row-major in catalog order.

use crate::model::{EncodeError, Result, SentenceEncoder, ENCODE_BATCH_SIZE};
use data_loader::{MovieCatalog, MovieId, UserId, UserProfiles};
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

const ARTIFACT_MAGIC: &[u8; 4] = b"SEMR";

/// Errors reading or writing the embedding artifact
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an embedding artifact (bad magic)")]
    BadMagic,

    #[error("Corrupt embedding artifact: {0}")]
    Corrupt(String),
}

/// All movie vectors with their ids, in catalog row order.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieEmbeddings {
    ids: Vec<MovieId>,
    /// Row-major, `ids.len() * dimension` values
    vectors: Vec<f32>,
    dimension: usize,
}

impl MovieEmbeddings {
    /// Build from per-movie rows. Every row must have the same dimension.
    pub fn from_rows(ids: Vec<MovieId>, rows: Vec<Vec<f32>>) -> Result<Self> {
        if rows.len() != ids.len() {
            return Err(EncodeError::CountMismatch {
                expected: ids.len(),
                got: rows.len(),
            });
        }
        let dimension = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut vectors = Vec::with_capacity(ids.len() * dimension);
        for row in &rows {
            if row.len() != dimension {
                return Err(EncodeError::DimensionMismatch {
                    expected: dimension,
                    got: row.len(),
                });
            }
            vectors.extend_from_slice(row);
        }
        Ok(Self {
            ids,
            vectors,
            dimension,
        })
    }

    /// Number of movies
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Movie ids in row order
    pub fn ids(&self) -> &[MovieId] {
        &self.ids
    }

    /// The movie id paired with a row position
    pub fn id_at(&self, position: usize) -> Option<MovieId> {
        self.ids.get(position).copied()
    }

    /// The vector at a row position
    pub fn row(&self, position: usize) -> Option<&[f32]> {
        if position < self.ids.len() {
            let start = position * self.dimension;
            Some(&self.vectors[start..start + self.dimension])
        } else {
            None
        }
    }

    /// All rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.vectors.chunks_exact(self.dimension.max(1))
    }

    /// Whether these embeddings line up with a catalog, id for id.
    pub fn matches_catalog(&self, catalog: &MovieCatalog) -> bool {
        self.ids == catalog.ids()
    }

    /// Write the artifact to disk.
    pub fn save(&self, path: &Path) -> std::result::Result<(), ArtifactError> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(ARTIFACT_MAGIC)?;
        writer.write_all(&(self.dimension as u32).to_le_bytes())?;
        writer.write_all(&(self.ids.len() as u32).to_le_bytes())?;
        for id in &self.ids {
            writer.write_all(&id.to_le_bytes())?;
        }
        for value in &self.vectors {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;

        info!(
            "Saved {} movie embeddings ({}-d) to {}",
            self.ids.len(),
            self.dimension,
            path.display()
        );
        Ok(())
    }

    /// Read an artifact back. Vectors come back bit-identical, in the
    /// order they were saved.
    pub fn load(path: &Path) -> std::result::Result<Self, ArtifactError> {
        let bytes = std::fs::read(path)?;
        if bytes.len() < 12 || &bytes[0..4] != ARTIFACT_MAGIC {
            return Err(ArtifactError::BadMagic);
        }

        let dimension = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
        let count = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;

        let ids_end = 12 + count * 4;
        let vectors_end = ids_end + count * dimension * 4;
        if bytes.len() != vectors_end {
            return Err(ArtifactError::Corrupt(format!(
                "expected {} bytes for {} x {}-d vectors, found {}",
                vectors_end,
                count,
                dimension,
                bytes.len()
            )));
        }

        let ids = bytes[12..ids_end]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
            .collect();
        let vectors = bytes[ids_end..vectors_end]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
            .collect();

        info!(
            "Loaded {} movie embeddings ({}-d) from {}",
            count,
            dimension,
            path.display()
        );
        Ok(Self {
            ids,
            vectors,
            dimension,
        })
    }
}

/// Encode every movie in the catalog, in catalog order.
///
/// Texts are encoded in fixed-size batches; batch order is preserved so
/// row `i` of the result corresponds to catalog position `i`.
pub fn encode_catalog(
    encoder: &dyn SentenceEncoder,
    catalog: &MovieCatalog,
) -> Result<MovieEmbeddings> {
    let texts: Vec<&str> = catalog.movies().iter().map(|m| m.text.as_str()).collect();
    let mut rows = Vec::with_capacity(texts.len());

    for (batch_no, chunk) in texts.chunks(ENCODE_BATCH_SIZE).enumerate() {
        let batch = encoder.encode_batch(chunk)?;
        rows.extend(batch);
        debug!(
            "Encoded movie batch {} ({} / {} texts)",
            batch_no,
            rows.len(),
            texts.len()
        );
    }

    info!("Generated embeddings for {} movies", rows.len());
    MovieEmbeddings::from_rows(catalog.ids(), rows)
}

/// Encode every user profile, one text at a time.
///
/// Users are not batched: profile volume per run is small compared to the
/// catalog, and one-at-a-time keeps the mapping trivially keyed.
pub fn encode_users(
    encoder: &dyn SentenceEncoder,
    profiles: &UserProfiles,
) -> Result<HashMap<UserId, Vec<f32>>> {
    let mut embeddings = HashMap::with_capacity(profiles.len());
    for profile in profiles.profiles() {
        let vector = encoder.encode(&profile.composed_text())?;
        embeddings.insert(profile.id, vector);
    }
    info!("Generated embeddings for {} users", embeddings.len());
    Ok(embeddings)
}
