//! Activity structure: how a single activity is performed.
//!
//! A structure is one of three shapes:
//! - `Empty`: free-form, nothing to count
//! - `IntervalBased`: timed work intervals with rest, optionally repeated for rounds
//! - `ExerciseBased`: named exercises with sets, reps, weight and rest
//!
//! Every command returns a new structure; the receiver is never mutated.
//! The persisted form is a JSON object carrying `intervals` or `exercises`
//! (never both), and decoding goes through the same validation as
//! [`ActivityStructure::create`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Average intensity reported for structures that carry no interval intensities.
///
/// This is a fixed default (moderate), not a derived value.
pub const DEFAULT_AVERAGE_INTENSITY: f64 = 2.0;

// ============================================================================
// Intensity
// ============================================================================

/// Four-level interval intensity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Easy,
    Moderate,
    Hard,
    Sprint,
}

impl Intensity {
    /// Ordinal level: easy=1, moderate=2, hard=3, sprint=4
    pub fn level(self) -> u8 {
        match self {
            Intensity::Easy => 1,
            Intensity::Moderate => 2,
            Intensity::Hard => 3,
            Intensity::Sprint => 4,
        }
    }

    /// Bucket a (possibly fractional) level back into the four-level scale
    pub fn from_level(level: f64) -> Self {
        let rounded = level.round();
        if rounded <= 1.0 {
            Intensity::Easy
        } else if rounded <= 2.0 {
            Intensity::Moderate
        } else if rounded <= 3.0 {
            Intensity::Hard
        } else {
            Intensity::Sprint
        }
    }

    fn scaled(self, factor: f64) -> Self {
        Self::from_level(f64::from(self.level()) * factor)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intensity::Easy => "easy",
            Intensity::Moderate => "moderate",
            Intensity::Hard => "hard",
            Intensity::Sprint => "sprint",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Interval and Exercise
// ============================================================================

/// One timed work interval followed by rest
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    duration_seconds: f64,
    intensity: Intensity,
    rest_seconds: f64,
}

impl Interval {
    pub fn new(duration_seconds: f64, intensity: Intensity, rest_seconds: f64) -> Result<Self> {
        Self::from_raw(
            RawInterval {
                duration_seconds,
                intensity,
                rest_seconds,
            },
            "interval",
        )
    }

    fn from_raw(raw: RawInterval, path: &str) -> Result<Self> {
        ensure_positive(&format!("{path}.duration_seconds"), raw.duration_seconds)?;
        ensure_non_negative(&format!("{path}.rest_seconds"), raw.rest_seconds)?;
        Ok(Self {
            duration_seconds: raw.duration_seconds,
            intensity: raw.intensity,
            rest_seconds: raw.rest_seconds,
        })
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn rest_seconds(&self) -> f64 {
        self.rest_seconds
    }

    fn total_seconds(&self) -> f64 {
        self.duration_seconds + self.rest_seconds
    }
}

/// A named exercise performed for a number of sets
#[derive(Clone, Debug, PartialEq)]
pub struct Exercise {
    name: String,
    sets: u32,
    reps: Option<u32>,
    duration_seconds: Option<f64>,
    weight: Option<f64>,
    rest_seconds: f64,
}

impl Exercise {
    /// Exercise with the given sets and no reps, duration, weight or rest
    pub fn new(name: impl Into<String>, sets: u32) -> Result<Self> {
        Self::from_raw(
            RawExercise {
                name: name.into(),
                sets: i64::from(sets),
                reps: None,
                duration_seconds: None,
                weight: None,
                rest_seconds: 0.0,
            },
            "exercise",
        )
    }

    pub fn with_reps(mut self, reps: u32) -> Result<Self> {
        if reps == 0 {
            return Err(Error::validation("exercise.reps", "must be positive"));
        }
        self.reps = Some(reps);
        Ok(self)
    }

    pub fn with_duration(mut self, seconds: f64) -> Result<Self> {
        ensure_positive("exercise.duration_seconds", seconds)?;
        self.duration_seconds = Some(seconds);
        Ok(self)
    }

    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        ensure_non_negative("exercise.weight", weight)?;
        self.weight = Some(weight);
        Ok(self)
    }

    pub fn with_rest(mut self, seconds: f64) -> Result<Self> {
        ensure_non_negative("exercise.rest_seconds", seconds)?;
        self.rest_seconds = seconds;
        Ok(self)
    }

    fn from_raw(raw: RawExercise, path: &str) -> Result<Self> {
        if raw.name.trim().is_empty() {
            return Err(Error::validation(format!("{path}.name"), "must not be empty"));
        }
        let sets = positive_count(&format!("{path}.sets"), raw.sets)?;
        let reps = raw
            .reps
            .map(|reps| positive_count(&format!("{path}.reps"), reps))
            .transpose()?;
        if let Some(duration) = raw.duration_seconds {
            ensure_positive(&format!("{path}.duration_seconds"), duration)?;
        }
        if let Some(weight) = raw.weight {
            ensure_non_negative(&format!("{path}.weight"), weight)?;
        }
        ensure_non_negative(&format!("{path}.rest_seconds"), raw.rest_seconds)?;

        Ok(Self {
            name: raw.name,
            sets,
            reps,
            duration_seconds: raw.duration_seconds,
            weight: raw.weight,
            rest_seconds: raw.rest_seconds,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sets(&self) -> u32 {
        self.sets
    }

    pub fn reps(&self) -> Option<u32> {
        self.reps
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn rest_seconds(&self) -> f64 {
        self.rest_seconds
    }

    /// Work time across all sets plus rest between sets (none after the last)
    fn total_seconds(&self) -> f64 {
        let work = self
            .duration_seconds
            .map_or(0.0, |d| d * f64::from(self.sets));
        work + self.rest_seconds * f64::from(self.sets - 1)
    }
}

// ============================================================================
// ActivityStructure
// ============================================================================

/// How an activity is performed
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawStructure", into = "RawStructure")]
pub enum ActivityStructure {
    #[default]
    Empty,
    IntervalBased {
        intervals: Vec<Interval>,
        rounds: Option<u32>,
    },
    ExerciseBased {
        exercises: Vec<Exercise>,
    },
}

impl ActivityStructure {
    /// Validate raw input and build the matching variant
    ///
    /// Rejects payloads carrying both `intervals` and `exercises`, empty
    /// interval/exercise lists, `rounds` without intervals, non-positive
    /// durations, sets or rounds, and negative rest or weight.
    pub fn create(raw: RawStructure) -> Result<Self> {
        match (raw.intervals, raw.exercises) {
            (Some(_), Some(_)) => Err(Error::validation(
                "structure",
                "cannot be both interval-based and exercise-based",
            )),
            (None, None) => match raw.rounds {
                Some(_) => Err(Error::validation(
                    "rounds",
                    "only allowed on interval-based structures",
                )),
                None => Ok(ActivityStructure::Empty),
            },
            (Some(intervals), None) => {
                if intervals.is_empty() {
                    return Err(Error::validation("intervals", "must contain at least one interval"));
                }
                let intervals = intervals
                    .into_iter()
                    .enumerate()
                    .map(|(i, raw)| Interval::from_raw(raw, &format!("intervals[{i}]")))
                    .collect::<Result<Vec<_>>>()?;
                let rounds = raw
                    .rounds
                    .map(|r| positive_count("rounds", r))
                    .transpose()?;
                Ok(ActivityStructure::IntervalBased { intervals, rounds })
            }
            (None, Some(exercises)) => {
                if raw.rounds.is_some() {
                    return Err(Error::validation(
                        "rounds",
                        "only allowed on interval-based structures",
                    ));
                }
                if exercises.is_empty() {
                    return Err(Error::validation("exercises", "must contain at least one exercise"));
                }
                let exercises = exercises
                    .into_iter()
                    .enumerate()
                    .map(|(i, raw)| Exercise::from_raw(raw, &format!("exercises[{i}]")))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ActivityStructure::ExerciseBased { exercises })
            }
        }
    }

    /// Interval-based structure from already validated intervals
    pub fn interval_based(intervals: Vec<Interval>, rounds: Option<u32>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(Error::validation("intervals", "must contain at least one interval"));
        }
        if rounds == Some(0) {
            return Err(Error::validation("rounds", "must be positive"));
        }
        Ok(ActivityStructure::IntervalBased { intervals, rounds })
    }

    /// Exercise-based structure from already validated exercises
    pub fn exercise_based(exercises: Vec<Exercise>) -> Result<Self> {
        if exercises.is_empty() {
            return Err(Error::validation("exercises", "must contain at least one exercise"));
        }
        Ok(ActivityStructure::ExerciseBased { exercises })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ActivityStructure::Empty)
    }

    pub fn is_interval_based(&self) -> bool {
        matches!(self, ActivityStructure::IntervalBased { .. })
    }

    pub fn is_exercise_based(&self) -> bool {
        matches!(self, ActivityStructure::ExerciseBased { .. })
    }

    pub fn rounds(&self) -> Option<u32> {
        match self {
            ActivityStructure::IntervalBased { rounds, .. } => *rounds,
            _ => None,
        }
    }

    /// Total time in seconds
    ///
    /// Intervals: `(Σ duration + rest) × max(rounds, 1)`.
    /// Exercises: per exercise `duration × sets + rest × (sets − 1)`, summed.
    pub fn total_duration_seconds(&self) -> f64 {
        match self {
            ActivityStructure::Empty => 0.0,
            ActivityStructure::IntervalBased { intervals, rounds } => {
                let per_round: f64 = intervals.iter().map(Interval::total_seconds).sum();
                per_round * f64::from(rounds.unwrap_or(1).max(1))
            }
            ActivityStructure::ExerciseBased { exercises } => {
                exercises.iter().map(Exercise::total_seconds).sum()
            }
        }
    }

    /// Sum of sets across exercises (saturating); zero for other variants
    pub fn total_sets(&self) -> u32 {
        match self {
            ActivityStructure::ExerciseBased { exercises } => exercises
                .iter()
                .map(Exercise::sets)
                .fold(0, u32::saturating_add),
            _ => 0,
        }
    }

    /// Mean interval intensity level, or [`DEFAULT_AVERAGE_INTENSITY`]
    pub fn average_intensity(&self) -> f64 {
        match self {
            ActivityStructure::IntervalBased { intervals, .. } if !intervals.is_empty() => {
                let total: f64 = intervals
                    .iter()
                    .map(|i| f64::from(i.intensity.level()))
                    .sum();
                total / intervals.len() as f64
            }
            _ => DEFAULT_AVERAGE_INTENSITY,
        }
    }

    /// True iff any exercise has a weight
    pub fn requires_equipment(&self) -> bool {
        match self {
            ActivityStructure::ExerciseBased { exercises } => {
                exercises.iter().any(|e| e.weight.is_some())
            }
            _ => false,
        }
    }

    pub fn description(&self) -> String {
        match self {
            ActivityStructure::Empty => "No structure defined".to_string(),
            ActivityStructure::IntervalBased { intervals, rounds } => {
                let rounds = rounds.unwrap_or(1).max(1);
                format!(
                    "Interval session: {} x {}",
                    plural(intervals.len(), "interval"),
                    plural(rounds as usize, "round")
                )
            }
            ActivityStructure::ExerciseBased { exercises } => format!(
                "Exercise circuit: {}, {} total",
                plural(exercises.len(), "exercise"),
                plural(self.total_sets() as usize, "set")
            ),
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Scale every present work duration by `factor`
    pub fn adjust_duration(&self, factor: f64) -> Result<Self> {
        ensure_factor("duration_factor", factor)?;
        match self {
            ActivityStructure::Empty => Ok(ActivityStructure::Empty),
            ActivityStructure::IntervalBased { intervals, rounds } => {
                let intervals: Vec<Interval> = intervals
                    .iter()
                    .enumerate()
                    .map(|(idx, i)| -> Result<Interval> {
                        Ok(Interval {
                            duration_seconds: scale_finite(
                                &format!("intervals[{idx}].duration_seconds"),
                                i.duration_seconds,
                                factor,
                            )?,
                            ..i.clone()
                        })
                    })
                    .collect::<Result<_>>()?;
                Ok(ActivityStructure::IntervalBased { intervals, rounds: *rounds })
            }
            ActivityStructure::ExerciseBased { exercises } => {
                let exercises: Vec<Exercise> = exercises
                    .iter()
                    .enumerate()
                    .map(|(idx, e)| -> Result<Exercise> {
                        let field = format!("exercises[{idx}].duration_seconds");
                        Ok(Exercise {
                            duration_seconds: e
                                .duration_seconds
                                .map(|d| scale_finite(&field, d, factor))
                                .transpose()?,
                            ..e.clone()
                        })
                    })
                    .collect::<Result<_>>()?;
                Ok(ActivityStructure::ExerciseBased { exercises })
            }
        }
    }

    /// Rescale interval intensities (re-bucketed) or exercise weights
    pub fn adjust_intensity(&self, factor: f64) -> Result<Self> {
        ensure_factor("intensity_factor", factor)?;
        match self {
            ActivityStructure::Empty => Ok(ActivityStructure::Empty),
            ActivityStructure::IntervalBased { intervals, rounds } => {
                Ok(ActivityStructure::IntervalBased {
                    intervals: intervals
                        .iter()
                        .map(|i| Interval {
                            intensity: i.intensity.scaled(factor),
                            ..i.clone()
                        })
                        .collect(),
                    rounds: *rounds,
                })
            }
            ActivityStructure::ExerciseBased { exercises } => {
                let exercises: Vec<Exercise> = exercises
                    .iter()
                    .enumerate()
                    .map(|(idx, e)| -> Result<Exercise> {
                        let field = format!("exercises[{idx}].weight");
                        Ok(Exercise {
                            weight: e
                                .weight
                                .map(|w| scale_finite(&field, w, factor))
                                .transpose()?,
                            ..e.clone()
                        })
                    })
                    .collect::<Result<_>>()?;
                Ok(ActivityStructure::ExerciseBased { exercises })
            }
        }
    }

    /// Add `n` rounds; an interval structure without rounds starts from one
    pub fn add_rounds(&self, n: u32) -> Self {
        match self {
            ActivityStructure::IntervalBased { intervals, rounds } => {
                ActivityStructure::IntervalBased {
                    intervals: intervals.clone(),
                    rounds: Some(rounds.unwrap_or(1).saturating_add(n)),
                }
            }
            other => other.clone(),
        }
    }

    /// Cap rounds at `target`; sets `target` when no rounds were defined
    pub fn reduce_rounds(&self, target: u32) -> Result<Self> {
        if target == 0 {
            return Err(Error::validation("rounds", "target must be positive"));
        }
        Ok(match self {
            ActivityStructure::IntervalBased { intervals, rounds } => {
                ActivityStructure::IntervalBased {
                    intervals: intervals.clone(),
                    rounds: Some(rounds.map_or(target, |current| current.min(target))),
                }
            }
            other => other.clone(),
        })
    }

    /// Scale every rest period by `factor`
    pub fn increase_rest(&self, factor: f64) -> Result<Self> {
        ensure_factor("rest_factor", factor)?;
        match self {
            ActivityStructure::Empty => Ok(ActivityStructure::Empty),
            ActivityStructure::IntervalBased { intervals, rounds } => {
                let intervals: Vec<Interval> = intervals
                    .iter()
                    .enumerate()
                    .map(|(idx, i)| -> Result<Interval> {
                        Ok(Interval {
                            rest_seconds: scale_finite(
                                &format!("intervals[{idx}].rest_seconds"),
                                i.rest_seconds,
                                factor,
                            )?,
                            ..i.clone()
                        })
                    })
                    .collect::<Result<_>>()?;
                Ok(ActivityStructure::IntervalBased { intervals, rounds: *rounds })
            }
            ActivityStructure::ExerciseBased { exercises } => {
                let exercises: Vec<Exercise> = exercises
                    .iter()
                    .enumerate()
                    .map(|(idx, e)| -> Result<Exercise> {
                        Ok(Exercise {
                            rest_seconds: scale_finite(
                                &format!("exercises[{idx}].rest_seconds"),
                                e.rest_seconds,
                                factor,
                            )?,
                            ..e.clone()
                        })
                    })
                    .collect::<Result<_>>()?;
                Ok(ActivityStructure::ExerciseBased { exercises })
            }
        }
    }
}

impl fmt::Display for ActivityStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

// ============================================================================
// Raw (document) form
// ============================================================================

/// Unvalidated structure as it appears in JSON documents
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RawStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervals: Option<Vec<RawInterval>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<RawExercise>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RawInterval {
    pub duration_seconds: f64,
    pub intensity: Intensity,
    #[serde(default)]
    pub rest_seconds: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RawExercise {
    pub name: String,
    pub sets: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub rest_seconds: f64,
}

impl TryFrom<RawStructure> for ActivityStructure {
    type Error = Error;

    fn try_from(raw: RawStructure) -> Result<Self> {
        ActivityStructure::create(raw)
    }
}

impl From<ActivityStructure> for RawStructure {
    fn from(structure: ActivityStructure) -> Self {
        match structure {
            ActivityStructure::Empty => RawStructure::default(),
            ActivityStructure::IntervalBased { intervals, rounds } => RawStructure {
                intervals: Some(
                    intervals
                        .into_iter()
                        .map(|i| RawInterval {
                            duration_seconds: i.duration_seconds,
                            intensity: i.intensity,
                            rest_seconds: i.rest_seconds,
                        })
                        .collect(),
                ),
                rounds: rounds.map(i64::from),
                exercises: None,
            },
            ActivityStructure::ExerciseBased { exercises } => RawStructure {
                intervals: None,
                rounds: None,
                exercises: Some(
                    exercises
                        .into_iter()
                        .map(|e| RawExercise {
                            name: e.name,
                            sets: i64::from(e.sets),
                            reps: e.reps.map(i64::from),
                            duration_seconds: e.duration_seconds,
                            weight: e.weight,
                            rest_seconds: e.rest_seconds,
                        })
                        .collect(),
                ),
            },
        }
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Scaling factors must be finite and strictly positive
pub(crate) fn ensure_factor(field: &str, factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(Error::validation(field, format!("must be a positive number, got {factor}")))
    }
}

pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::validation(field, format!("must be positive, got {value}")))
    }
}

/// `value × factor`, rejected when the product overflows or a positive value
/// underflows to zero
pub(crate) fn scale_finite(field: &str, value: f64, factor: f64) -> Result<f64> {
    let scaled = value * factor;
    if scaled.is_finite() && (scaled > 0.0 || value == 0.0) {
        Ok(scaled)
    } else {
        Err(Error::validation(field, format!("{value} x {factor} is out of range")))
    }
}

fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::validation(field, format!("must not be negative, got {value}")))
    }
}

fn positive_count(field: &str, value: i64) -> Result<u32> {
    match u32::try_from(value) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(Error::validation(field, format!("must be a positive integer, got {value}"))),
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval_structure(rounds: Option<u32>) -> ActivityStructure {
        ActivityStructure::interval_based(
            vec![
                Interval::new(300.0, Intensity::Moderate, 60.0).unwrap(),
                Interval::new(180.0, Intensity::Hard, 90.0).unwrap(),
            ],
            rounds,
        )
        .unwrap()
    }

    fn exercise_structure() -> ActivityStructure {
        ActivityStructure::exercise_based(vec![
            Exercise::new("Goblet squat", 3)
                .unwrap()
                .with_reps(10)
                .unwrap()
                .with_weight(16.0)
                .unwrap()
                .with_rest(60.0)
                .unwrap(),
            Exercise::new("Plank", 4)
                .unwrap()
                .with_duration(30.0)
                .unwrap()
                .with_rest(30.0)
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_interval_total_duration() {
        assert_eq!(interval_structure(Some(2)).total_duration_seconds(), 1260.0);
        assert_eq!(interval_structure(None).total_duration_seconds(), 630.0);
    }

    #[test]
    fn test_exercise_total_duration() {
        // Goblet squat: no duration, rest 60 x 2 = 120
        // Plank: 30 x 4 + 30 x 3 = 210
        assert_eq!(exercise_structure().total_duration_seconds(), 330.0);
        assert_eq!(ActivityStructure::Empty.total_duration_seconds(), 0.0);
    }

    #[test]
    fn test_total_sets() {
        assert_eq!(exercise_structure().total_sets(), 7);
        assert_eq!(interval_structure(Some(3)).total_sets(), 0);
        assert_eq!(ActivityStructure::Empty.total_sets(), 0);
    }

    #[test]
    fn test_total_sets_saturates() {
        let huge = ActivityStructure::exercise_based(vec![
            Exercise::new("Step-up", 3_000_000_000).unwrap(),
            Exercise::new("Lunge", 3_000_000_000).unwrap(),
        ])
        .unwrap();
        assert_eq!(huge.total_sets(), u32::MAX);
        assert!(huge.description().contains(&u32::MAX.to_string()));
    }

    #[test]
    fn test_average_intensity() {
        assert_eq!(interval_structure(None).average_intensity(), 2.5);
        assert_eq!(
            exercise_structure().average_intensity(),
            DEFAULT_AVERAGE_INTENSITY
        );
        assert_eq!(ActivityStructure::Empty.average_intensity(), 2.0);
    }

    #[test]
    fn test_requires_equipment() {
        assert!(exercise_structure().requires_equipment());
        assert!(!interval_structure(None).requires_equipment());

        let bodyweight =
            ActivityStructure::exercise_based(vec![Exercise::new("Push-up", 3).unwrap()]).unwrap();
        assert!(!bodyweight.requires_equipment());
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(ActivityStructure::Empty.description(), "No structure defined");
        assert_eq!(
            interval_structure(Some(3)).description(),
            "Interval session: 2 intervals x 3 rounds"
        );
        assert_eq!(
            exercise_structure().description(),
            "Exercise circuit: 2 exercises, 7 total sets"
        );
    }

    #[test]
    fn test_create_rejects_mixed_payload() {
        let raw = RawStructure {
            intervals: Some(vec![RawInterval {
                duration_seconds: 60.0,
                intensity: Intensity::Easy,
                rest_seconds: 0.0,
            }]),
            rounds: None,
            exercises: Some(vec![RawExercise {
                name: "Burpee".into(),
                sets: 3,
                reps: Some(10),
                duration_seconds: None,
                weight: None,
                rest_seconds: 0.0,
            }]),
        };

        let err = ActivityStructure::create(raw).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "structure"));
    }

    #[test]
    fn test_create_rejects_non_positive_values() {
        let zero_duration = RawStructure {
            intervals: Some(vec![RawInterval {
                duration_seconds: 0.0,
                intensity: Intensity::Easy,
                rest_seconds: 0.0,
            }]),
            ..Default::default()
        };
        let err = ActivityStructure::create(zero_duration).unwrap_err();
        assert!(
            matches!(err, Error::Validation { ref field, .. } if field == "intervals[0].duration_seconds")
        );

        let zero_sets = RawStructure {
            exercises: Some(vec![RawExercise {
                name: "Row".into(),
                sets: 0,
                reps: None,
                duration_seconds: None,
                weight: None,
                rest_seconds: 0.0,
            }]),
            ..Default::default()
        };
        let err = ActivityStructure::create(zero_sets).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "exercises[0].sets"));

        let zero_rounds = RawStructure {
            intervals: Some(vec![RawInterval {
                duration_seconds: 30.0,
                intensity: Intensity::Sprint,
                rest_seconds: 30.0,
            }]),
            rounds: Some(0),
            exercises: None,
        };
        let err = ActivityStructure::create(zero_rounds).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "rounds"));
    }

    #[test]
    fn test_create_empty() {
        let structure = ActivityStructure::create(RawStructure::default()).unwrap();
        assert!(structure.is_empty());
        assert!(!structure.is_interval_based());
        assert!(!structure.is_exercise_based());
    }

    #[test]
    fn test_adjust_duration_composes() {
        for structure in [interval_structure(Some(2)), exercise_structure()] {
            let twice = structure
                .adjust_duration(1.5)
                .unwrap()
                .adjust_duration(2.0)
                .unwrap();
            let once = structure.adjust_duration(3.0).unwrap();
            assert_eq!(twice, once);
        }
    }

    /// Composition matches a single combined factor up to floating-point rounding
    #[test]
    fn test_adjust_duration_composes_approximately() {
        let pairs = [(0.1, 0.3), (0.7, 1.3), (1.1, 2.5), (0.25, 4.0), (3.7, 0.01)];
        for structure in [interval_structure(Some(3)), exercise_structure()] {
            for (a, b) in pairs {
                let twice = structure
                    .adjust_duration(a)
                    .unwrap()
                    .adjust_duration(b)
                    .unwrap()
                    .total_duration_seconds();
                let once = structure
                    .adjust_duration(a * b)
                    .unwrap()
                    .total_duration_seconds();
                assert!(
                    (twice - once).abs() <= 1e-9 * once.abs(),
                    "factors {a} then {b}: {twice} vs {once}"
                );
            }
        }
    }

    #[test]
    fn test_adjustments_reject_overflow() {
        let err = interval_structure(None).adjust_duration(1e308).unwrap_err();
        assert!(
            matches!(err, Error::Validation { ref field, .. } if field == "intervals[0].duration_seconds")
        );

        let err = interval_structure(None).increase_rest(1e308).unwrap_err();
        assert!(
            matches!(err, Error::Validation { ref field, .. } if field == "intervals[0].rest_seconds")
        );

        let err = exercise_structure().increase_rest(1e308).unwrap_err();
        assert!(
            matches!(err, Error::Validation { ref field, .. } if field == "exercises[0].rest_seconds")
        );

        let err = exercise_structure().adjust_intensity(1e308).unwrap_err();
        assert!(
            matches!(err, Error::Validation { ref field, .. } if field == "exercises[0].weight")
        );
    }

    #[test]
    fn test_adjust_duration_leaves_absent_fields() {
        let adjusted = exercise_structure().adjust_duration(2.0).unwrap();
        if let ActivityStructure::ExerciseBased { exercises } = adjusted {
            assert_eq!(exercises[0].duration_seconds(), None);
            assert_eq!(exercises[1].duration_seconds(), Some(60.0));
        } else {
            panic!("Expected exercise-based structure");
        }

        assert_eq!(
            ActivityStructure::Empty.adjust_duration(2.0).unwrap(),
            ActivityStructure::Empty
        );
        assert!(interval_structure(None).adjust_duration(0.0).is_err());
    }

    #[test]
    fn test_adjust_intensity_rebuckets_intervals() {
        let easier = interval_structure(None).adjust_intensity(0.5).unwrap();
        if let ActivityStructure::IntervalBased { intervals, .. } = &easier {
            // moderate 2 x 0.5 = 1 -> easy; hard 3 x 0.5 = 1.5 -> rounds to 2
            assert_eq!(intervals[0].intensity(), Intensity::Easy);
            assert_eq!(intervals[1].intensity(), Intensity::Moderate);
        } else {
            panic!("Expected interval-based structure");
        }

        let harder = interval_structure(None).adjust_intensity(2.0).unwrap();
        if let ActivityStructure::IntervalBased { intervals, .. } = &harder {
            assert_eq!(intervals[0].intensity(), Intensity::Sprint);
            assert_eq!(intervals[1].intensity(), Intensity::Sprint);
        } else {
            panic!("Expected interval-based structure");
        }
    }

    #[test]
    fn test_adjust_intensity_scales_weight() {
        let lighter = exercise_structure().adjust_intensity(0.5).unwrap();
        if let ActivityStructure::ExerciseBased { exercises } = lighter {
            assert_eq!(exercises[0].weight(), Some(8.0));
            assert_eq!(exercises[1].weight(), None);
        } else {
            panic!("Expected exercise-based structure");
        }
    }

    #[test]
    fn test_add_rounds() {
        assert_eq!(interval_structure(None).add_rounds(2).rounds(), Some(3));
        assert_eq!(interval_structure(Some(4)).add_rounds(1).rounds(), Some(5));
        assert_eq!(exercise_structure().add_rounds(2), exercise_structure());
    }

    #[test]
    fn test_reduce_rounds() {
        let five = interval_structure(Some(5));
        assert_eq!(five.reduce_rounds(2).unwrap().rounds(), Some(2));
        assert_eq!(five.reduce_rounds(8).unwrap().rounds(), Some(5));
        assert_eq!(interval_structure(None).reduce_rounds(3).unwrap().rounds(), Some(3));
        assert!(five.reduce_rounds(0).is_err());
    }

    #[test]
    fn test_increase_rest() {
        let rested = interval_structure(Some(2)).increase_rest(2.0).unwrap();
        // (300 + 120 + 180 + 180) x 2
        assert_eq!(rested.total_duration_seconds(), 1560.0);

        let rested = exercise_structure().increase_rest(0.5).unwrap();
        if let ActivityStructure::ExerciseBased { exercises } = rested {
            assert_eq!(exercises[0].rest_seconds(), 30.0);
            assert_eq!(exercises[1].rest_seconds(), 15.0);
        } else {
            panic!("Expected exercise-based structure");
        }
    }

    #[test]
    fn test_json_roundtrip_preserves_variant() {
        for structure in [
            ActivityStructure::Empty,
            interval_structure(Some(2)),
            exercise_structure(),
        ] {
            let json = serde_json::to_string(&structure).unwrap();
            let parsed: ActivityStructure = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, structure);
        }
    }

    #[test]
    fn test_json_discriminants() {
        let json = serde_json::to_value(ActivityStructure::Empty).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let json = serde_json::to_value(interval_structure(None)).unwrap();
        assert!(json.get("intervals").is_some());
        assert!(json.get("exercises").is_none());
        assert!(json.get("rounds").is_none());

        let json = serde_json::to_value(exercise_structure()).unwrap();
        assert!(json.get("exercises").is_some());
        assert!(json.get("intervals").is_none());
    }

    #[test]
    fn test_json_rejects_invalid_document() {
        let json = r#"{
            "intervals": [{"duration_seconds": 60, "intensity": "hard"}],
            "exercises": [{"name": "Squat", "sets": 3}]
        }"#;
        assert!(serde_json::from_str::<ActivityStructure>(json).is_err());

        let json = r#"{"intervals": [{"duration_seconds": -5, "intensity": "easy"}]}"#;
        assert!(serde_json::from_str::<ActivityStructure>(json).is_err());
    }
}
