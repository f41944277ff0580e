//! Dataset loading.
//!
//! Builds the three typed tables from a data directory. All three files are
//! parsed in parallel with nested rayon joins, and any failure aborts the
//! load: later stages only ever see validated, present tables.

use crate::error::Result;
use crate::parser;
use crate::types::{MovieCatalog, RatingTable, UserProfiles};
use std::path::Path;
use tracing::info;

/// File names expected inside the data directory
pub const MOVIES_FILE: &str = "movies.dat";
pub const PROFILES_FILE: &str = "user_last_genres.csv";
pub const RATINGS_FILE: &str = "ratings.dat";

/// The three loaded input tables for one run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: MovieCatalog,
    pub profiles: UserProfiles,
    pub ratings: RatingTable,
}

impl Dataset {
    /// Load the full dataset from a directory.
    ///
    /// Expects `movies.dat`, `user_last_genres.csv`, and `ratings.dat` in
    /// `data_dir`. Movie rows with missing fields are filtered during
    /// parsing; everything else that fails to parse is an error.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let movies_path = data_dir.join(MOVIES_FILE);
        let profiles_path = data_dir.join(PROFILES_FILE);
        let ratings_path = data_dir.join(RATINGS_FILE);

        // Parse the three files in parallel; nested joins give three-way
        // parallelism
        let ((movies, profiles), ratings) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movies(&movies_path),
                    || parser::parse_profiles(&profiles_path),
                )
            },
            || parser::parse_ratings(&ratings_path),
        );

        let movies = movies?;
        let profiles = profiles?;
        let ratings = ratings?;

        info!(
            "Loaded {} movies, {} user profiles, {} ratings",
            movies.len(),
            profiles.len(),
            ratings.len()
        );

        Ok(Self {
            catalog: MovieCatalog::from_movies(movies),
            profiles: UserProfiles::from_profiles(profiles),
            ratings: RatingTable::from_ratings(ratings),
        })
    }
}
