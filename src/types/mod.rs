//! This module defines the core, strongly-typed data representations used
//! throughout costar.
//!
//! It includes the canonical `Role` enum, which replaces free-form category
//! strings with a closed set, and the row records read from the working tables.

pub mod records;
pub mod role;

// Re-export the main type(s) for easier access.
pub use records::{CreditRecord, FilmRecord, PersonRecord};
pub use role::Role;
