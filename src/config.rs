// In: src/config.rs

//! The single source of truth for costar run configuration.
//!
//! `CostarConfig` is created once at the application boundary (from an optional
//! JSON file plus command-line overrides) and then passed down read-only. It
//! covers tuning and file locations only; what to search for lives in
//! `query::PairQuery`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CostarError, Result};

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// What the aggregator does when a film id reappears after its run was closed,
/// i.e. when the credit stream is not contiguous by film.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReopenedFilmPolicy {
    /// **Default:** log a warning and keep aggregating the late records as a
    /// fresh run of the same film. Pairs split across the two runs are missed.
    #[default]
    Warn,

    /// Log a warning and discard every record of the reappearing run.
    Reject,
}

/// Locations of the three working tables produced by `prepare`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DataPaths {
    #[serde(default = "default_films_path")]
    pub films: PathBuf,
    #[serde(default = "default_persons_path")]
    pub persons: PathBuf,
    #[serde(default = "default_credits_path")]
    pub credits: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            films: default_films_path(),
            persons: default_persons_path(),
            credits: default_credits_path(),
        }
    }
}

/// Locations of the raw source tables `prepare` reads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RawDataPaths {
    #[serde(default = "default_title_basics_path")]
    pub title_basics: PathBuf,
    #[serde(default = "default_title_ratings_path")]
    pub title_ratings: PathBuf,
    #[serde(default = "default_title_principals_path")]
    pub title_principals: PathBuf,
    #[serde(default = "default_name_basics_path")]
    pub name_basics: PathBuf,
}

impl Default for RawDataPaths {
    fn default() -> Self {
        Self {
            title_basics: default_title_basics_path(),
            title_ratings: default_title_ratings_path(),
            title_principals: default_title_principals_path(),
            name_basics: default_name_basics_path(),
        }
    }
}

//==================================================================================
// II. The Unified CostarConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CostarConfig {
    /// **The number of rows per batch read from any table.**
    /// Bounds how much of the credit stream is in memory at once. It has no
    /// effect on results.
    #[serde(default = "default_batch_size_rows")]
    pub batch_size_rows: usize,

    /// Working tables.
    #[serde(default)]
    pub data: DataPaths,

    /// Raw tables for the preparation step.
    #[serde(default)]
    pub raw: RawDataPaths,

    #[serde(default)]
    pub reopened_films: ReopenedFilmPolicy,
}

impl Default for CostarConfig {
    fn default() -> Self {
        Self {
            batch_size_rows: default_batch_size_rows(),
            data: DataPaths::default(),
            raw: RawDataPaths::default(),
            reopened_films: ReopenedFilmPolicy::default(),
        }
    }
}

impl CostarConfig {
    /// Parses a JSON config; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CostarConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: CostarConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size_rows == 0 {
            return Err(CostarError::Config(
                "batch_size_rows must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Helper for `serde` to provide a default for `batch_size_rows`.
fn default_batch_size_rows() -> usize {
    1000
}

fn default_films_path() -> PathBuf {
    PathBuf::from("data/movies.ratings.tsv")
}

fn default_persons_path() -> PathBuf {
    PathBuf::from("data/names.short.tsv")
}

fn default_credits_path() -> PathBuf {
    PathBuf::from("data/movies.principals.tsv")
}

fn default_title_basics_path() -> PathBuf {
    PathBuf::from("data/title.basics.tsv")
}

fn default_title_ratings_path() -> PathBuf {
    PathBuf::from("data/title.ratings.tsv")
}

fn default_title_principals_path() -> PathBuf {
    PathBuf::from("data/title.principals.tsv")
}

fn default_name_basics_path() -> PathBuf {
    PathBuf::from("data/name.basics.tsv")
}
