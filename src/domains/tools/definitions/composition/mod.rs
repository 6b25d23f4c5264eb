//! Composition planning tools.

pub mod plan;

pub use plan::{CreateCompositionPlanParams, CreateCompositionPlanTool};
