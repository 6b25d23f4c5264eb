//! Preference learning tools.

pub mod feedback;
pub mod manage;
pub mod recommendations;
pub mod statistics;

pub use feedback::{RecordFeedbackParams, RecordMusicFeedbackTool};
pub use manage::{ManagePreferencesParams, ManagePreferencesTool, PreferenceAction};
pub use recommendations::{GetMusicRecommendationsTool, RecommendationParams};
pub use statistics::{GetPreferenceStatisticsTool, StatisticsParams};
