//! Workout template lifecycle.
//!
//! ```text
//! scheduled ──start──▶ in_progress ──complete──▶ completed
//!     │ └────────────────complete────────────────────▲
//!     ├──skip───────▶ skipped
//!     └──reschedule─▶ rescheduled
//! ```
//!
//! The transition table lives in [`WorkoutStatus::transition`] so it can be
//! exercised independently of the template aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a scheduled workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Skipped,
    /// Terminal for this instance; the moved occurrence is a new template
    Rescheduled,
}

/// Commands that move a template between statuses
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleCommand {
    Start,
    Complete,
    Skip,
    Reschedule,
}

impl WorkoutStatus {
    pub const ALL: [WorkoutStatus; 5] = [
        WorkoutStatus::Scheduled,
        WorkoutStatus::InProgress,
        WorkoutStatus::Completed,
        WorkoutStatus::Skipped,
        WorkoutStatus::Rescheduled,
    ];

    /// Target status for `command`, or `None` when the command is not allowed
    pub fn transition(self, command: LifecycleCommand) -> Option<WorkoutStatus> {
        use LifecycleCommand::*;
        use WorkoutStatus::*;

        match (self, command) {
            (Scheduled, Start) => Some(InProgress),
            (Scheduled | InProgress, Complete) => Some(Completed),
            (Scheduled, Skip) => Some(Skipped),
            (Scheduled, Reschedule) => Some(Rescheduled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkoutStatus::Completed | WorkoutStatus::Skipped | WorkoutStatus::Rescheduled
        )
    }

    /// Content (goals, activities, alternatives) may only change while scheduled
    pub fn allows_modification(self) -> bool {
        self == WorkoutStatus::Scheduled
    }
}

impl fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkoutStatus::Scheduled => "scheduled",
            WorkoutStatus::InProgress => "in_progress",
            WorkoutStatus::Completed => "completed",
            WorkoutStatus::Skipped => "skipped",
            WorkoutStatus::Rescheduled => "rescheduled",
        };
        f.write_str(name)
    }
}

impl fmt::Display for LifecycleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleCommand::Start => "start",
            LifecycleCommand::Complete => "complete",
            LifecycleCommand::Skip => "skip",
            LifecycleCommand::Reschedule => "reschedule",
        };
        f.write_str(name)
    }
}
