//! # Data Loader Crate
//!
//! This crate handles loading the recommender's three flat input tables.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, UserProfile, Rating and their tables)
//! - **parser**: Parse the flat files into Rust structs
//! - **load**: Build a full [`Dataset`] with parallel parsing
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data"))?;
//!
//! let movie = dataset.catalog.get(1).unwrap();
//! println!("Movie 1 text: {}", movie.text);
//! ```
//!
//! A missing input file fails the whole load: the pipeline depends on all
//! three tables, so the loader surfaces a [`DataLoadError::FileNotFound`]
//! instead of continuing with absent data.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod load;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use load::Dataset;
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    MovieCatalog,
    UserProfile,
    UserProfiles,
    Rating,
    RatingTable,
    // Helpers
    compose_movie_text,
};
