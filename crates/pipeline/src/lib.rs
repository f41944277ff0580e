//! Evaluation and recommendation over the embedded movie catalog.
//!
//! This crate ties the loaded tables, the embeddings, and the vector index
//! together:
//! - [`RecContext`]: the explicit per-run pipeline state, built once and
//!   then only borrowed
//! - [`Evaluator`]: Precision@k / Recall@k against held-out ratings
//! - [`Recommender`]: ranked top-k table for a single user
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{Evaluator, RecContext, Recommender};
//!
//! let context = RecContext::build(dataset, &encoder, Some(&artifact))?;
//!
//! let metrics = Evaluator::new(&context, 0.0).evaluate_at(5)?;
//! println!("Precision@5: {:.4}", metrics.precision);
//!
//! if let Some(rows) = Recommender::new(&context).recommend(1, 10)? {
//!     println!("{} recommendations", rows.len());
//! }
//! ```

pub mod context;
pub mod evaluator;
pub mod recommender;

// Re-export main types
pub use context::RecContext;
pub use evaluator::{Evaluator, RankingMetrics};
pub use recommender::{Recommendation, Recommender, DEFAULT_TOP_K};
