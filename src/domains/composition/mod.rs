//! Composition domain module.
//!
//! Multi-section composition plans, the built-in templates, and the planner
//! that turns free-text requests into plans.

mod error;
mod plan;
mod planner;
mod templates;

pub use error::PlanError;
pub use plan::{CompositionPlan, DURATION_TOLERANCE_MS, MIN_SECTION_MS, Section};
pub use planner::{
    CompositionPlanner, DEFAULT_TOTAL_MS, MoodProgression, extract_genre, extract_mood,
    suggest_section_count,
};
pub use templates::{CompositionTemplate, TEMPLATES, TemplateSection, find_template, template_names};
