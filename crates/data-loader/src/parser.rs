//! Parsers for the three flat input tables.
//!
//! Formats:
//! - movies.dat: `movie_id::title::overview::genres` (overview and genres
//!   may be empty; rows with fewer than four fields are dropped, not errors)
//! - user_last_genres.csv: comma-separated with a header line naming a
//!   `user_id` column and one or more `Last_genres*` columns
//! - ratings.dat: `user_id::movie_id::rating`

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::path::Path;
use tracing::debug;

/// Read a file into lines, mapping a missing file to a dedicated error.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DataLoadError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            DataLoadError::IoError(e)
        }
    })?;
    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Short file label for error messages
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the movies file.
///
/// Each retained row becomes a [`Movie`] with its composed description
/// text. Rows missing any of title/overview/genres (fewer than four
/// `::`-separated fields) are filtered out; the drop count is logged.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = file_label(path);
    let lines = read_lines(path)?;
    let mut movies = Vec::new();
    let mut dropped = 0usize;

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim_end_matches(['\r', '\n']);
        if line_trimmed.trim().is_empty() {
            continue; // Skip empty lines
        }

        // Split into at most four fields; overview and genres keep any
        // embedded punctuation
        let parts: Vec<&str> = line_trimmed.splitn(4, "::").collect();
        if parts.len() < 4 {
            // A structurally missing field drops the row (filter, not error)
            dropped += 1;
            continue;
        }

        let id: MovieId = parts[0].parse().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid movie_id: {}", e),
        })?;

        movies.push(Movie {
            id,
            text: compose_movie_text(parts[1], parts[2], parts[3]),
        });
    }

    if dropped > 0 {
        debug!("Dropped {} movie rows with missing fields", dropped);
    }
    Ok(movies)
}

/// Parse the user profile file.
///
/// The header line is scanned for the `user_id` column and every column
/// whose name starts with `Last_genres`, in header order. Empty cells in
/// genre columns are kept as missing values (`None`), which the composed
/// text later renders as the literal string `"nan"`.
pub fn parse_profiles(path: &Path) -> Result<Vec<UserProfile>> {
    let file = file_label(path);
    let lines = read_lines(path)?;

    let header = lines.first().ok_or_else(|| DataLoadError::ParseError {
        file: file.clone(),
        line: 1,
        reason: "Empty profile file (missing header)".to_string(),
    })?;

    let columns: Vec<&str> = header.split(',').map(|c| c.trim()).collect();
    let user_id_col = columns
        .iter()
        .position(|&c| c == "user_id")
        .ok_or_else(|| DataLoadError::MissingColumn {
            file: file.clone(),
            column: "user_id".to_string(),
        })?;

    // Genre columns in header order; this order defines the composed text
    let genre_cols: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.starts_with("Last_genres"))
        .map(|(i, _)| i)
        .collect();

    if genre_cols.is_empty() {
        return Err(DataLoadError::MissingColumn {
            file,
            column: "Last_genres*".to_string(),
        });
    }

    let mut profiles = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split(',').map(|c| c.trim()).collect();
        let id_cell = cells.get(user_id_col).copied().unwrap_or("");
        let id: UserId = id_cell.parse().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid user_id: {}", e),
        })?;

        let last_genres = genre_cols
            .iter()
            .map(|&col| {
                let cell = cells.get(col).copied().unwrap_or("");
                if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();

        profiles.push(UserProfile { id, last_genres });
    }

    Ok(profiles)
}

/// Parse the ratings file.
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let file = file_label(path);
    let lines = read_lines(path)?;
    let mut ratings = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split("::");
        let user_id = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: "Missing user_id".to_string(),
        })?;
        let movie_id = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: "Missing movie_id".to_string(),
        })?;
        let rating_value = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: "Missing rating".to_string(),
        })?;

        ratings.push(Rating {
            user_id: user_id.parse().map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid user_id: {}", e),
            })?,
            movie_id: movie_id.parse().map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid movie_id: {}", e),
            })?,
            rating: rating_value.parse().map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid rating: {}", e),
            })?,
        });
    }

    Ok(ratings)
}
