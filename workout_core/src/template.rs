//! Workout template aggregate.
//!
//! A `WorkoutTemplate` is one scheduled workout in a training plan: an ordered
//! list of activities, the goals they serve, and a lifecycle status. All
//! mutation goes through commands that return a new template; content
//! commands are only accepted while the workout is still `scheduled`
//! (see [`crate::lifecycle`] for the transition table).
//!
//! Commands that depend on the current time take `now` explicitly.

use crate::activity::WorkoutActivity;
use crate::goals::WorkoutGoals;
use crate::lifecycle::{LifecycleCommand, WorkoutStatus};
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A workout can be started at most this many days after its scheduled date
pub const MAX_START_DELAY_DAYS: i64 = 7;

/// Kind of workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Easy,
    Tempo,
    Interval,
    LongRun,
    Recovery,
    Strength,
    CrossTraining,
    Race,
    Rest,
}

/// Training focus of a workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutCategory {
    Endurance,
    Speed,
    Strength,
    Recovery,
    Mobility,
    Mixed,
}

/// How much it matters that the workout gets done
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Optional,
    #[default]
    Recommended,
    Key,
    Critical,
}

/// Replacement activities offered for a given reason (e.g. "treadmill only")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutAlternative {
    pub reason: String,
    pub activities: Vec<WorkoutActivity>,
}

/// Input for a freshly planned workout
#[derive(Clone, Debug)]
pub struct NewTemplate {
    /// Generated when absent
    pub id: Option<Uuid>,
    pub plan_id: Uuid,
    pub week_number: u32,
    pub day_of_week: u8,
    pub scheduled_date: DateTime<Utc>,
    pub title: String,
    pub workout_type: WorkoutType,
    pub category: WorkoutCategory,
    pub goals: WorkoutGoals,
    pub activities: Vec<WorkoutActivity>,
    pub importance: Importance,
    pub coach_notes: Option<String>,
}

/// Full template state; also the persisted document shape
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TemplateProps {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub week_number: u32,
    pub day_of_week: u8,
    pub scheduled_date: DateTime<Utc>,
    pub title: String,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub category: WorkoutCategory,
    pub goals: WorkoutGoals,
    #[serde(default)]
    pub activities: Vec<WorkoutActivity>,
    #[serde(default)]
    pub status: WorkoutStatus,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_workout_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduled_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub alternatives: Vec<WorkoutAlternative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A scheduled workout and its lifecycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TemplateProps", into = "TemplateProps")]
pub struct WorkoutTemplate {
    props: TemplateProps,
}

impl WorkoutTemplate {
    /// Plan a new workout in the `scheduled` status
    pub fn create(new: NewTemplate) -> Result<Self> {
        let template = Self::from_props(TemplateProps {
            id: new.id.unwrap_or_else(Uuid::new_v4),
            plan_id: new.plan_id,
            week_number: new.week_number,
            day_of_week: new.day_of_week,
            scheduled_date: new.scheduled_date,
            title: new.title,
            workout_type: new.workout_type,
            category: new.category,
            goals: new.goals,
            activities: new.activities,
            status: WorkoutStatus::Scheduled,
            importance: new.importance,
            completed_workout_id: None,
            user_notes: None,
            coach_notes: new.coach_notes,
            rescheduled_to: None,
            alternatives: Vec::new(),
            started_at: None,
            completed_at: None,
        })?;

        tracing::debug!(
            "Created workout template {} ('{}') for {}",
            template.id(),
            template.title(),
            template.scheduled_date()
        );
        Ok(template)
    }

    /// Rebuild a template from stored state, re-checking every invariant
    pub fn from_props(mut props: TemplateProps) -> Result<Self> {
        if props.title.trim().is_empty() {
            return Err(Error::validation("title", "must not be empty"));
        }
        if props.week_number < 1 {
            return Err(Error::validation("week_number", "must be at least 1"));
        }
        if props.day_of_week > 6 {
            return Err(Error::validation(
                "day_of_week",
                format!("must be between 0 and 6, got {}", props.day_of_week),
            ));
        }
        props.goals.validate()?;
        validate_activities(props.workout_type, &mut props.activities)?;
        for (i, alternative) in props.alternatives.iter().enumerate() {
            validate_alternative(&alternative.reason, &alternative.activities)
                .map_err(|e| prefix_field(e, &format!("alternatives[{i}]")))?;
        }
        if props.completed_workout_id.is_some() && props.status != WorkoutStatus::Completed {
            return Err(Error::validation(
                "completed_workout_id",
                format!("only allowed on completed workouts, status is {}", props.status),
            ));
        }

        Ok(Self { props })
    }

    // ------------------------------------------------------------------------
    // Lifecycle commands
    // ------------------------------------------------------------------------

    /// Begin the workout; refused once it is more than a week overdue
    pub fn start(&self, now: DateTime<Utc>) -> Result<Self> {
        let status = self.next_status(LifecycleCommand::Start)?;
        if now - self.props.scheduled_date > Duration::days(MAX_START_DELAY_DAYS) {
            return Err(Error::validation(
                "scheduled_date",
                format!(
                    "workout scheduled for {} is more than {} days overdue",
                    self.props.scheduled_date.date_naive(),
                    MAX_START_DELAY_DAYS
                ),
            ));
        }

        let mut next = self.clone();
        next.props.status = status;
        next.props.started_at = Some(now);
        tracing::info!("Started workout {} ('{}')", self.id(), self.title());
        Ok(next)
    }

    /// Finish the workout, linking the recorded session
    pub fn mark_complete(&self, completed_workout_id: &str, now: DateTime<Utc>) -> Result<Self> {
        let status = self.next_status(LifecycleCommand::Complete)?;
        if completed_workout_id.trim().is_empty() {
            return Err(Error::validation("completed_workout_id", "must not be empty"));
        }

        let mut next = self.clone();
        next.props.status = status;
        next.props.completed_workout_id = Some(completed_workout_id.to_string());
        next.props.completed_at = Some(now);
        tracing::info!(
            "Completed workout {} as session {}",
            self.id(),
            completed_workout_id
        );
        Ok(next)
    }

    pub fn skip(&self, reason: &str) -> Result<Self> {
        let status = self.next_status(LifecycleCommand::Skip)?;
        if reason.trim().is_empty() {
            return Err(Error::validation("reason", "must not be empty"));
        }

        let mut next = self.clone();
        next.props.status = status;
        next.props.user_notes = Some(reason.to_string());
        tracing::info!("Skipped workout {}: {}", self.id(), reason);
        Ok(next)
    }

    /// Move this occurrence to `new_date`; the moved workout is a new template
    pub fn reschedule(&self, new_date: DateTime<Utc>, now: DateTime<Utc>) -> Result<Self> {
        let status = self.next_status(LifecycleCommand::Reschedule)?;
        // Calendar days: any time later today is still a valid target
        if new_date.date_naive() < now.date_naive() {
            return Err(Error::validation(
                "rescheduled_to",
                format!("{new_date} is in the past"),
            ));
        }

        let mut next = self.clone();
        next.props.status = status;
        next.props.rescheduled_to = Some(new_date);
        tracing::info!("Rescheduled workout {} to {}", self.id(), new_date);
        Ok(next)
    }

    fn next_status(&self, command: LifecycleCommand) -> Result<WorkoutStatus> {
        self.props
            .status
            .transition(command)
            .ok_or(Error::StateTransition {
                from: self.props.status,
                attempted: command,
            })
    }

    // ------------------------------------------------------------------------
    // Content commands (scheduled only)
    // ------------------------------------------------------------------------

    pub fn update_goals(&self, goals: WorkoutGoals) -> Result<Self> {
        self.ensure_modifiable("update goals of")?;
        goals.validate()?;

        let mut next = self.clone();
        next.props.goals = goals;
        Ok(next)
    }

    /// Replace all activities
    pub fn update_activities(&self, mut activities: Vec<WorkoutActivity>) -> Result<Self> {
        self.ensure_modifiable("update activities of")?;
        validate_activities(self.props.workout_type, &mut activities)?;

        let mut next = self.clone();
        next.props.activities = activities;
        Ok(next)
    }

    pub fn add_activity(&self, activity: WorkoutActivity) -> Result<Self> {
        self.ensure_modifiable("add an activity to")?;
        if self.activity(activity.order()).is_some() {
            return Err(Error::validation(
                "order",
                format!("an activity with order {} already exists", activity.order()),
            ));
        }

        let mut activities = self.props.activities.clone();
        activities.push(activity);
        activities.sort_by_key(WorkoutActivity::order);

        let mut next = self.clone();
        next.props.activities = activities;
        Ok(next)
    }

    pub fn remove_activity(&self, order: u32) -> Result<Self> {
        self.ensure_modifiable("remove an activity from")?;
        if self.activity(order).is_none() {
            return Err(Error::ActivityNotFound { order });
        }

        let mut activities = self.props.activities.clone();
        activities.retain(|a| a.order() != order);
        validate_activities(self.props.workout_type, &mut activities)?;

        let mut next = self.clone();
        next.props.activities = activities;
        Ok(next)
    }

    /// Replace the activity at `order` with the result of `adjust`
    pub fn adjust_activity<F>(&self, order: u32, adjust: F) -> Result<Self>
    where
        F: FnOnce(&WorkoutActivity) -> Result<WorkoutActivity>,
    {
        self.ensure_modifiable("adjust an activity of")?;
        let current = self
            .activity(order)
            .ok_or(Error::ActivityNotFound { order })?;
        let adjusted = adjust(current)?.with_order(order);

        let activities = self
            .props
            .activities
            .iter()
            .map(|a| {
                if a.order() == order {
                    adjusted.clone()
                } else {
                    a.clone()
                }
            })
            .collect();

        let mut next = self.clone();
        next.props.activities = activities;
        Ok(next)
    }

    /// Lower goal intensity by `factor` in (0, 1]
    pub fn reduce_intensity(&self, factor: f64) -> Result<Self> {
        self.ensure_modifiable("reduce intensity of")?;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(Error::validation(
                "factor",
                format!("must be greater than 0 and at most 1, got {factor}"),
            ));
        }
        let goals = self.props.goals.adjust_intensity(factor)?;

        let mut next = self.clone();
        next.props.goals = goals;
        tracing::debug!("Reduced intensity of workout {} by factor {}", self.id(), factor);
        Ok(next)
    }

    pub fn add_alternative(&self, reason: &str, activities: Vec<WorkoutActivity>) -> Result<Self> {
        self.ensure_modifiable("add an alternative to")?;
        validate_alternative(reason, &activities)?;

        let mut next = self.clone();
        next.props.alternatives.push(WorkoutAlternative {
            reason: reason.to_string(),
            activities,
        });
        Ok(next)
    }

    /// Append coach commentary; allowed in every status
    pub fn add_coach_notes(&self, note: &str) -> Result<Self> {
        let note = note.trim();
        if note.is_empty() {
            return Err(Error::validation("coach_notes", "must not be empty"));
        }

        let mut next = self.clone();
        next.props.coach_notes = Some(match self.props.coach_notes {
            Some(ref existing) => format!("{existing}\n{note}"),
            None => note.to_string(),
        });
        Ok(next)
    }

    fn ensure_modifiable(&self, operation: &'static str) -> Result<()> {
        if self.can_be_modified() {
            Ok(())
        } else {
            Err(Error::Modification {
                status: self.props.status,
                operation,
            })
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.props.status == WorkoutStatus::Scheduled && now > self.props.scheduled_date
    }

    /// Calendar days from `now` to the scheduled date (negative when overdue)
    pub fn days_until_scheduled(&self, now: DateTime<Utc>) -> i64 {
        (self.props.scheduled_date.date_naive() - now.date_naive()).num_days()
    }

    pub fn can_be_modified(&self) -> bool {
        self.props.status.allows_modification()
    }

    pub fn requires_equipment(&self) -> bool {
        self.props
            .activities
            .iter()
            .any(WorkoutActivity::requires_equipment)
    }

    /// Sum of activity durations in minutes
    pub fn estimated_duration_minutes(&self) -> f64 {
        self.props
            .activities
            .iter()
            .map(WorkoutActivity::estimated_duration_minutes)
            .sum()
    }

    pub fn estimated_calories(&self, body_weight_kg: f64) -> u32 {
        self.props
            .activities
            .iter()
            .map(|a| a.estimated_calories(body_weight_kg))
            .fold(0, u32::saturating_add)
    }

    pub fn is_rest_day(&self) -> bool {
        self.props.workout_type == WorkoutType::Rest
    }

    pub fn is_key_workout(&self) -> bool {
        matches!(self.props.importance, Importance::Key | Importance::Critical)
    }

    pub fn activity(&self, order: u32) -> Option<&WorkoutActivity> {
        self.props.activities.iter().find(|a| a.order() == order)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.props.id
    }

    pub fn plan_id(&self) -> Uuid {
        self.props.plan_id
    }

    pub fn week_number(&self) -> u32 {
        self.props.week_number
    }

    pub fn day_of_week(&self) -> u8 {
        self.props.day_of_week
    }

    pub fn scheduled_date(&self) -> DateTime<Utc> {
        self.props.scheduled_date
    }

    pub fn title(&self) -> &str {
        &self.props.title
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.props.workout_type
    }

    pub fn category(&self) -> WorkoutCategory {
        self.props.category
    }

    pub fn goals(&self) -> &WorkoutGoals {
        &self.props.goals
    }

    pub fn activities(&self) -> &[WorkoutActivity] {
        &self.props.activities
    }

    pub fn status(&self) -> WorkoutStatus {
        self.props.status
    }

    pub fn importance(&self) -> Importance {
        self.props.importance
    }

    pub fn completed_workout_id(&self) -> Option<&str> {
        self.props.completed_workout_id.as_deref()
    }

    pub fn user_notes(&self) -> Option<&str> {
        self.props.user_notes.as_deref()
    }

    pub fn coach_notes(&self) -> Option<&str> {
        self.props.coach_notes.as_deref()
    }

    pub fn rescheduled_to(&self) -> Option<DateTime<Utc>> {
        self.props.rescheduled_to
    }

    pub fn alternatives(&self) -> &[WorkoutAlternative] {
        &self.props.alternatives
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.props.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.props.completed_at
    }

    pub fn props(&self) -> &TemplateProps {
        &self.props
    }
}

impl TryFrom<TemplateProps> for WorkoutTemplate {
    type Error = Error;

    fn try_from(props: TemplateProps) -> Result<Self> {
        WorkoutTemplate::from_props(props)
    }
}

impl From<WorkoutTemplate> for TemplateProps {
    fn from(template: WorkoutTemplate) -> Self {
        template.props
    }
}

/// Non-rest workouts need activities; orders must be unique. Sorts by order.
fn validate_activities(workout_type: WorkoutType, activities: &mut [WorkoutActivity]) -> Result<()> {
    if workout_type != WorkoutType::Rest && activities.is_empty() {
        return Err(Error::validation(
            "activities",
            "a non-rest workout needs at least one activity",
        ));
    }
    activities.sort_by_key(WorkoutActivity::order);
    if let Some(pair) = activities.windows(2).find(|w| w[0].order() == w[1].order()) {
        return Err(Error::validation(
            "activities",
            format!("duplicate activity order {}", pair[0].order()),
        ));
    }
    Ok(())
}

fn validate_alternative(reason: &str, activities: &[WorkoutActivity]) -> Result<()> {
    if reason.trim().is_empty() {
        return Err(Error::validation("reason", "must not be empty"));
    }
    if activities.is_empty() {
        return Err(Error::validation(
            "activities",
            "an alternative needs at least one activity",
        ));
    }
    Ok(())
}

fn prefix_field(error: Error, prefix: &str) -> Error {
    match error {
        Error::Validation { field, message } => Error::Validation {
            field: format!("{prefix}.{field}"),
            message,
        },
        other => other,
    }
}
