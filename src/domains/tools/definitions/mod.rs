//! Tool definitions module.
//!
//! Each tool is defined in its own file, grouped by the domain it exposes.

pub mod analysis;
pub mod common;
pub mod composition;
pub mod generation;
pub mod preferences;

#[cfg(test)]
pub(crate) mod testing;

pub use analysis::{AnalyzeMoodForMusicTool, AnalyzeMoodParams};
pub use composition::{CreateCompositionPlanParams, CreateCompositionPlanTool};
pub use generation::{
    GenerateMusicSimpleTool, GenerateMusicStructuredTool, GenerateSimpleParams,
    GenerateStructuredParams,
};
pub use preferences::{
    GetMusicRecommendationsTool, GetPreferenceStatisticsTool, ManagePreferencesParams,
    ManagePreferencesTool, PreferenceAction, RecommendationParams, RecordFeedbackParams,
    RecordMusicFeedbackTool, StatisticsParams,
};
