//! This file is the root of the `costar` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring the top-level modules of the library (`pairing`, `source`, `bridge`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of items a caller needs to run a pair search.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod error;
pub mod pairing;
pub mod prepare;
pub mod query;
pub mod source;
pub mod types;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use bridge::{find_top_pairs, render_report, PairSearch, Shortfall};
pub use config::{CostarConfig, ReopenedFilmPolicy};
pub use error::{CostarError, Result};
pub use observability::init_logging;
pub use pairing::{pattern_for, registered_patterns, RolePattern};
pub use prepare::{prepare_dataset, PrepareSummary};
pub use query::{FilmFilter, PairQuery};
pub use types::Role;
