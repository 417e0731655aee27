#![forbid(unsafe_code)]

//! Core domain model for the Fitcoach workout system.
//!
//! This crate provides:
//! - Activity structures (interval-based / exercise-based) and their adjustments
//! - Workout activities and derived estimates
//! - The workout template aggregate and its lifecycle state machine
//! - Persistence adapters (JSON template store, lifecycle journal)
//! - Configuration and logging setup

pub mod error;
pub mod structure;
pub mod activity;
pub mod goals;
pub mod lifecycle;
pub mod template;
pub mod config;
pub mod logging;
pub mod store;
pub mod journal;

// Re-export commonly used types
pub use error::{Error, Result};
pub use structure::{ActivityStructure, Exercise, Intensity, Interval, RawStructure};
pub use activity::{ActivityInput, ActivityType, WorkoutActivity, DEFAULT_BODY_WEIGHT_KG};
pub use goals::WorkoutGoals;
pub use lifecycle::{LifecycleCommand, WorkoutStatus};
pub use template::{
    Importance, NewTemplate, TemplateProps, WorkoutAlternative, WorkoutCategory,
    WorkoutTemplate, WorkoutType,
};
pub use config::Config;
pub use store::{JsonFileStore, TemplateStore};
pub use journal::{JournalSink, JsonlJournal, LifecycleEvent};
