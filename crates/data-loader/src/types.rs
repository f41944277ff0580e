//! Core domain types for the recommender's input tables.
//!
//! Three tables come off disk: the movie catalog, the per-user recent-genre
//! profiles, and the ratings used as held-out relevance labels. Each table
//! gets a typed wrapper that owns its lookup structure, so the rest of the
//! pipeline never touches raw rows.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movies
// =============================================================================

/// A movie with its composed description text.
///
/// Only the identifier and the composed text survive loading; title and
/// genres are re-derived from the text at display time, so the text format
/// is a contract: `"{title}. {overview} Genres: {genres}"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub text: String,
}

/// Compose the description text that gets embedded for a movie.
///
/// Overview and genres may be empty strings; they are substituted as-is.
/// The `"Genres: "` marker is always present so the recommender can split
/// the text back apart.
pub fn compose_movie_text(title: &str, overview: &str, genres: &str) -> String {
    format!("{title}. {overview} Genres: {genres}")
}

/// The filtered movie catalog, in file row order.
///
/// Row order is load-bearing: position `i` here must correspond to row `i`
/// of the embedding matrix and to slot `i` of the vector index. The catalog
/// is the single source of that ordering.
#[derive(Debug, Clone, Default)]
pub struct MovieCatalog {
    movies: Vec<Movie>,
    by_id: HashMap<MovieId, usize>,
}

impl MovieCatalog {
    /// Build a catalog from already-filtered movies, preserving their order.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let by_id = movies
            .iter()
            .enumerate()
            .map(|(pos, movie)| (movie.id, pos))
            .collect();
        Self { movies, by_id }
    }

    /// Get a movie by ID
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Get the movie at a catalog position (index slot)
    pub fn movie_at(&self, position: usize) -> Option<&Movie> {
        self.movies.get(position)
    }

    /// All movies, in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Movie IDs in catalog order
    pub fn ids(&self) -> Vec<MovieId> {
        self.movies.iter().map(|m| m.id).collect()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

// =============================================================================
// User profiles
// =============================================================================

/// A user's recent-genre history, one slot per `Last_genres*` column.
///
/// Missing values are kept as `None` rather than dropped: the composed text
/// renders them as the literal string `"nan"`, and the embedding is
/// sensitive to that exact artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub last_genres: Vec<Option<String>>,
}

impl UserProfile {
    /// Compose the text that gets embedded for this user.
    pub fn composed_text(&self) -> String {
        let genres: Vec<&str> = self
            .last_genres
            .iter()
            .map(|g| g.as_deref().unwrap_or("nan"))
            .collect();
        format!("User's last watched genres: {}", genres.join(", "))
    }
}

/// All user profiles, in file row order.
#[derive(Debug, Clone, Default)]
pub struct UserProfiles {
    profiles: Vec<UserProfile>,
}

impl UserProfiles {
    pub fn from_profiles(profiles: Vec<UserProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[UserProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// =============================================================================
// Ratings
// =============================================================================

/// A single rating from a user for a movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f32,
}

/// The held-out rating table, indexed by user.
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    ratings: Vec<Rating>,
    by_user: HashMap<UserId, Vec<Rating>>,
}

impl RatingTable {
    pub fn from_ratings(ratings: Vec<Rating>) -> Self {
        let mut by_user: HashMap<UserId, Vec<Rating>> = HashMap::new();
        for rating in &ratings {
            by_user.entry(rating.user_id).or_default().push(*rating);
        }
        Self { ratings, by_user }
    }

    /// All ratings made by a user (empty slice if the user is unknown)
    pub fn user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.by_user
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Movies the user rated at or above the relevance threshold.
    pub fn relevant_movies(&self, user_id: UserId, threshold: f32) -> HashSet<MovieId> {
        self.user_ratings(user_id)
            .iter()
            .filter(|r| r.rating >= threshold)
            .map(|r| r.movie_id)
            .collect()
    }

    /// Distinct users with at least one relevant rating, in first-seen order.
    ///
    /// These are the users an evaluation pass iterates over.
    pub fn users_with_relevant(&self, threshold: f32) -> Vec<UserId> {
        let mut seen = HashSet::new();
        let mut users = Vec::new();
        for rating in &self.ratings {
            if rating.rating >= threshold && seen.insert(rating.user_id) {
                users.push(rating.user_id);
            }
        }
        users
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
