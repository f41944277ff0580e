//! Sentence encoding for the recommender.
//!
//! This crate wraps the pretrained sentence-embedding model and owns the
//! movie embedding table:
//! - **model**: the [`SentenceEncoder`] trait and the fastembed-backed
//!   all-MiniLM-L6-v2 implementation
//! - **embeddings**: [`MovieEmbeddings`] (the id/vector pairing as one
//!   structure), batch encoding of the catalog, per-user encoding, and the
//!   binary embedding artifact
//!
//! The model is treated as an opaque collaborator: it is loaded once per
//! run and invoked for inference only.

pub mod embeddings;
pub mod model;

pub use embeddings::{encode_catalog, encode_users, ArtifactError, MovieEmbeddings};
pub use model::{
    EncodeError, MiniLmEncoder, Result, SentenceEncoder, ENCODE_BATCH_SIZE, MODEL_DIMENSION,
    MODEL_NAME,
};
