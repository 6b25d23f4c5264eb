//! Library domain module.
//!
//! Stores generated audio and its JSON metadata under date-bucketed,
//! slugified names.

mod error;
mod manager;

pub use error::LibraryError;
pub use manager::{FileManager, SavedMusic, extension_for_format, slugify};
