//! Preferences domain module.
//!
//! Learns which prompts the user liked, in which activity and mood, and
//! recommends them again later.
//!
//! - `record.rs` - the persisted record and feedback labels
//! - `store.rs` - the append-only store and its queries
//! - `backend.rs` - storage backends (JSON file, memory)

mod backend;
mod error;
mod record;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, PREFERENCES_FILE, PreferenceBackend};
pub use error::PreferenceError;
pub use record::{FeedbackKind, PreferenceRecord, PreferenceTags};
pub use store::{ImportReport, PreferenceStatistics, PreferenceStore, PruneReport, SaveStatus};
