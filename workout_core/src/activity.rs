//! A single scheduled unit of work inside a workout.
//!
//! `WorkoutActivity` is an immutable value: adjustments such as
//! [`WorkoutActivity::make_easier`] return a new activity and leave the
//! receiver untouched. Warm-ups and cool-downs are never adjusted.

use crate::structure::{ensure_positive, scale_finite, ActivityStructure};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Body weight assumed for calorie estimates when none is known
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

/// Lower bound applied to durations when an activity is made easier
pub const MIN_ADJUSTED_DURATION_MINUTES: f64 = 5.0;

/// Lower bound applied to distances when an activity is made easier
pub const MIN_ADJUSTED_DISTANCE_METERS: f64 = 100.0;

/// Role of an activity within a workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Warmup,
    Main,
    Cooldown,
    Interval,
    Circuit,
}

impl ActivityType {
    /// Duration assumed when neither an explicit duration nor a structure is known
    pub fn default_duration_minutes(self) -> f64 {
        match self {
            ActivityType::Warmup | ActivityType::Cooldown => 10.0,
            ActivityType::Main => 30.0,
            ActivityType::Interval | ActivityType::Circuit => 20.0,
        }
    }

    /// Metabolic equivalent used for calorie estimates
    pub fn met(self) -> f64 {
        match self {
            ActivityType::Warmup | ActivityType::Cooldown => 3.0,
            ActivityType::Interval => 10.0,
            ActivityType::Circuit => 8.0,
            ActivityType::Main => 6.0,
        }
    }

    fn is_bookend(self) -> bool {
        matches!(self, ActivityType::Warmup | ActivityType::Cooldown)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityType::Warmup => "warmup",
            ActivityType::Main => "main",
            ActivityType::Cooldown => "cooldown",
            ActivityType::Interval => "interval",
            ActivityType::Circuit => "circuit",
        };
        f.write_str(name)
    }
}

/// Unvalidated activity properties; also the persisted document shape
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityInput {
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<ActivityStructure>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub alternative_exercises: Vec<String>,
}

impl ActivityInput {
    pub fn new(name: impl Into<String>, activity_type: ActivityType, order: i64) -> Self {
        Self {
            name: name.into(),
            activity_type,
            order,
            structure: None,
            instructions: Vec::new(),
            distance_meters: None,
            duration_minutes: None,
            pace: None,
            video_url: None,
            equipment: Vec::new(),
            alternative_exercises: Vec::new(),
        }
    }
}

/// A validated workout activity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ActivityInput", into = "ActivityInput")]
pub struct WorkoutActivity {
    name: String,
    activity_type: ActivityType,
    order: u32,
    structure: Option<ActivityStructure>,
    instructions: Vec<String>,
    distance_meters: Option<f64>,
    duration_minutes: Option<f64>,
    pace: Option<String>,
    video_url: Option<Url>,
    equipment: Vec<String>,
    alternative_exercises: Vec<String>,
}

impl WorkoutActivity {
    pub fn create(props: ActivityInput) -> Result<Self> {
        if props.name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        let order = u32::try_from(props.order).map_err(|_| {
            Error::validation("order", format!("must be between 0 and {}, got {}", u32::MAX, props.order))
        })?;
        if let Some(distance) = props.distance_meters {
            ensure_positive("distance_meters", distance)?;
        }
        if let Some(duration) = props.duration_minutes {
            ensure_positive("duration_minutes", duration)?;
        }
        let video_url = props
            .video_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| Error::validation("video_url", format!("invalid URL {raw:?}: {e}")))
            })
            .transpose()?;
        if let Some(i) = props.equipment.iter().position(|e| e.trim().is_empty()) {
            return Err(Error::validation(format!("equipment[{i}]"), "must not be empty"));
        }

        Ok(Self {
            name: props.name,
            activity_type: props.activity_type,
            order,
            structure: props.structure,
            instructions: props.instructions,
            distance_meters: props.distance_meters,
            duration_minutes: props.duration_minutes,
            pace: props.pace,
            video_url,
            equipment: props.equipment,
            alternative_exercises: props.alternative_exercises,
        })
    }

    // ------------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------------

    pub fn create_warmup(duration_minutes: f64, order: u32) -> Result<Self> {
        let mut props = ActivityInput::new("Warm-up", ActivityType::Warmup, i64::from(order));
        props.duration_minutes = Some(duration_minutes);
        props.instructions = vec![
            "Start at an easy, conversational effort".into(),
            "Gradually raise your heart rate".into(),
            "Finish with a few dynamic mobility drills".into(),
        ];
        Self::create(props)
    }

    pub fn create_cooldown(duration_minutes: f64, order: u32) -> Result<Self> {
        let mut props = ActivityInput::new("Cool-down", ActivityType::Cooldown, i64::from(order));
        props.duration_minutes = Some(duration_minutes);
        props.instructions = vec![
            "Ease down to a gentle walk or jog".into(),
            "Let your breathing return to normal".into(),
            "Stretch the muscles you worked".into(),
        ];
        Self::create(props)
    }

    pub fn create_distance_run(
        name: impl Into<String>,
        distance_meters: f64,
        pace: Option<String>,
        order: u32,
    ) -> Result<Self> {
        let mut props = ActivityInput::new(name, ActivityType::Main, i64::from(order));
        props.distance_meters = Some(distance_meters);
        props.pace = pace;
        Self::create(props)
    }

    /// Interval activity; the structure must be interval-based
    pub fn create_interval_session(
        name: impl Into<String>,
        structure: ActivityStructure,
        order: u32,
    ) -> Result<Self> {
        if !structure.is_interval_based() {
            return Err(Error::validation(
                "structure",
                "an interval session requires an interval-based structure",
            ));
        }
        let mut props = ActivityInput::new(name, ActivityType::Interval, i64::from(order));
        props.structure = Some(structure);
        Self::create(props)
    }

    /// Circuit activity; the structure must be exercise-based
    pub fn create_circuit(
        name: impl Into<String>,
        structure: ActivityStructure,
        order: u32,
    ) -> Result<Self> {
        if !structure.is_exercise_based() {
            return Err(Error::validation(
                "structure",
                "a circuit requires an exercise-based structure",
            ));
        }
        let mut props = ActivityInput::new(name, ActivityType::Circuit, i64::from(order));
        props.structure = Some(structure);
        Self::create(props)
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    pub fn with_instructions(&self, instructions: Vec<String>) -> Self {
        Self {
            instructions,
            ..self.clone()
        }
    }

    pub fn with_equipment(&self, equipment: Vec<String>) -> Result<Self> {
        let mut props = ActivityInput::from(self.clone());
        props.equipment = equipment;
        Self::create(props)
    }

    pub fn with_video_url(&self, url: &str) -> Result<Self> {
        let mut props = ActivityInput::from(self.clone());
        props.video_url = Some(url.to_string());
        Self::create(props)
    }

    pub fn with_alternative_exercises(&self, alternatives: Vec<String>) -> Self {
        Self {
            alternative_exercises: alternatives,
            ..self.clone()
        }
    }

    pub fn with_order(&self, order: u32) -> Self {
        Self {
            order,
            ..self.clone()
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn structure(&self) -> Option<&ActivityStructure> {
        self.structure.as_ref()
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn distance_meters(&self) -> Option<f64> {
        self.distance_meters
    }

    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration_minutes
    }

    pub fn pace(&self) -> Option<&str> {
        self.pace.as_deref()
    }

    pub fn video_url(&self) -> Option<&Url> {
        self.video_url.as_ref()
    }

    pub fn equipment(&self) -> &[String] {
        &self.equipment
    }

    pub fn alternative_exercises(&self) -> &[String] {
        &self.alternative_exercises
    }

    // ------------------------------------------------------------------------
    // Derived queries
    // ------------------------------------------------------------------------

    /// Explicit duration, else structure duration, else a per-type default (minutes)
    pub fn estimated_duration_minutes(&self) -> f64 {
        if let Some(duration) = self.duration_minutes {
            return duration;
        }
        match self.non_empty_structure() {
            Some(structure) => structure.total_duration_seconds() / 60.0,
            None => self.activity_type.default_duration_minutes(),
        }
    }

    /// `duration × MET × weight / 60`, rounded to the nearest kcal
    pub fn estimated_calories(&self, body_weight_kg: f64) -> u32 {
        let weight = if body_weight_kg.is_finite() {
            body_weight_kg.max(0.0)
        } else {
            0.0
        };
        let kcal = self.estimated_duration_minutes() * self.activity_type.met() * weight / 60.0;
        kcal.round() as u32
    }

    pub fn requires_equipment(&self) -> bool {
        !self.equipment.is_empty()
            || self
                .structure
                .as_ref()
                .is_some_and(ActivityStructure::requires_equipment)
    }

    /// A structure is present and is not `Empty`
    pub fn has_structure(&self) -> bool {
        self.non_empty_structure().is_some()
    }

    pub fn has_instructions(&self) -> bool {
        !self.instructions.is_empty()
    }

    pub fn has_video(&self) -> bool {
        self.video_url.is_some()
    }

    pub fn has_alternatives(&self) -> bool {
        !self.alternative_exercises.is_empty()
    }

    /// One-line human summary, e.g. `"Tempo run (main): 5.0 km at 5:00/km"`
    pub fn description(&self) -> String {
        let mut description = format!("{} ({})", self.name, self.activity_type);

        let mut details = Vec::new();
        if let Some(distance) = self.distance_meters {
            details.push(format_distance(distance));
        }
        if let Some(duration) = self.duration_minutes {
            details.push(format!("{duration:.0} min"));
        }
        if let Some(ref pace) = self.pace {
            details.push(format!("at {pace}"));
        }
        if !details.is_empty() {
            description.push_str(": ");
            description.push_str(&details.join(" "));
        }
        if let Some(structure) = self.non_empty_structure() {
            description.push_str(" - ");
            description.push_str(&structure.description());
        }
        description
    }

    /// Short detail line for display next to the name
    pub fn duration_summary(&self) -> String {
        format!("~{:.0} min", self.estimated_duration_minutes())
    }

    // ------------------------------------------------------------------------
    // Adjustments
    // ------------------------------------------------------------------------

    /// Scale duration, intensity and distance down by `factor` in (0, 1)
    ///
    /// Duration and distance never drop below 5 min / 100 m through this
    /// command (nor rise above their current values).
    pub fn make_easier(&self, factor: f64) -> Result<Self> {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(Error::validation(
                "factor",
                format!("must be between 0 and 1 (exclusive), got {factor}"),
            ));
        }
        if self.activity_type.is_bookend() {
            return Ok(self.clone());
        }
        tracing::debug!("Making '{}' easier by factor {}", self.name, factor);
        self.scaled(factor, factor, factor, true)
    }

    /// Scale duration, intensity and distance up by `factor` > 1
    pub fn make_harder(&self, factor: f64) -> Result<Self> {
        if !(factor.is_finite() && factor > 1.0) {
            return Err(Error::validation(
                "factor",
                format!("must be greater than 1, got {factor}"),
            ));
        }
        if self.activity_type.is_bookend() {
            return Ok(self.clone());
        }
        tracing::debug!("Making '{}' harder by factor {}", self.name, factor);
        self.scaled(factor, factor, factor, false)
    }

    /// Reduce load for a fatigue level in [0, 1]
    ///
    /// At full fatigue: duration −30%, structure intensity −25%, distance −20%.
    pub fn adjust_for_fatigue(&self, level: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&level) {
            return Err(Error::validation(
                "fatigue_level",
                format!("must be between 0 and 1, got {level}"),
            ));
        }
        if self.activity_type.is_bookend() {
            return Ok(self.clone());
        }
        tracing::debug!("Adjusting '{}' for fatigue level {}", self.name, level);
        self.scaled(1.0 - level * 0.3, 1.0 - level * 0.25, 1.0 - level * 0.2, true)
    }

    fn scaled(
        &self,
        duration_factor: f64,
        intensity_factor: f64,
        distance_factor: f64,
        floored: bool,
    ) -> Result<Self> {
        let scale = |field: &str, value: f64, factor: f64, floor: f64| -> Result<f64> {
            let scaled = scale_finite(field, value, factor)?;
            Ok(if floored {
                scaled.max(floor.min(value))
            } else {
                scaled
            })
        };

        let structure = self
            .structure
            .as_ref()
            .map(|s| s.adjust_intensity(intensity_factor))
            .transpose()?;
        let duration_minutes = self
            .duration_minutes
            .map(|d| scale("duration_minutes", d, duration_factor, MIN_ADJUSTED_DURATION_MINUTES))
            .transpose()?;
        let distance_meters = self
            .distance_meters
            .map(|d| scale("distance_meters", d, distance_factor, MIN_ADJUSTED_DISTANCE_METERS))
            .transpose()?;

        Ok(Self {
            duration_minutes,
            distance_meters,
            structure,
            ..self.clone()
        })
    }

    fn non_empty_structure(&self) -> Option<&ActivityStructure> {
        self.structure.as_ref().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for WorkoutActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl TryFrom<ActivityInput> for WorkoutActivity {
    type Error = Error;

    fn try_from(props: ActivityInput) -> Result<Self> {
        WorkoutActivity::create(props)
    }
}

impl From<WorkoutActivity> for ActivityInput {
    fn from(activity: WorkoutActivity) -> Self {
        Self {
            name: activity.name,
            activity_type: activity.activity_type,
            order: i64::from(activity.order),
            structure: activity.structure,
            instructions: activity.instructions,
            distance_meters: activity.distance_meters,
            duration_minutes: activity.duration_minutes,
            pace: activity.pace,
            video_url: activity.video_url.map(String::from),
            equipment: activity.equipment,
            alternative_exercises: activity.alternative_exercises,
        }
    }
}

fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{meters:.0} m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Exercise, Intensity, Interval};

    fn intervals() -> ActivityStructure {
        ActivityStructure::interval_based(
            vec![
                Interval::new(300.0, Intensity::Moderate, 60.0).unwrap(),
                Interval::new(180.0, Intensity::Hard, 90.0).unwrap(),
            ],
            Some(2),
        )
        .unwrap()
    }

    fn circuit_structure() -> ActivityStructure {
        ActivityStructure::exercise_based(vec![Exercise::new("Kettlebell swing", 3)
            .unwrap()
            .with_reps(15)
            .unwrap()
            .with_weight(16.0)
            .unwrap()])
        .unwrap()
    }

    fn tempo_run() -> WorkoutActivity {
        let mut props = ActivityInput::new("Tempo run", ActivityType::Main, 1);
        props.duration_minutes = Some(40.0);
        props.distance_meters = Some(8000.0);
        props.structure = Some(intervals());
        WorkoutActivity::create(props).unwrap()
    }

    #[test]
    fn test_create_validates_props() {
        let mut props = ActivityInput::new("", ActivityType::Main, 0);
        assert!(WorkoutActivity::create(props.clone()).is_err());

        props.name = "Easy run".into();
        props.order = -1;
        let err = WorkoutActivity::create(props.clone()).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "order"));

        props.order = 0;
        props.distance_meters = Some(0.0);
        let err = WorkoutActivity::create(props.clone()).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "distance_meters"));

        props.distance_meters = None;
        props.duration_minutes = Some(-5.0);
        let err = WorkoutActivity::create(props.clone()).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "duration_minutes"));

        props.duration_minutes = None;
        props.video_url = Some("not a url".into());
        let err = WorkoutActivity::create(props.clone()).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "video_url"));

        props.video_url = Some("https://example.com/drills".into());
        let activity = WorkoutActivity::create(props).unwrap();
        assert!(activity.has_video());
    }

    #[test]
    fn test_factories() {
        let warmup = WorkoutActivity::create_warmup(10.0, 0).unwrap();
        assert_eq!(warmup.activity_type(), ActivityType::Warmup);
        assert!(warmup.has_instructions());

        let cooldown = WorkoutActivity::create_cooldown(8.0, 3).unwrap();
        assert_eq!(cooldown.order(), 3);

        let run =
            WorkoutActivity::create_distance_run("Long run", 16000.0, Some("6:00/km".into()), 1)
                .unwrap();
        assert_eq!(run.activity_type(), ActivityType::Main);
        assert_eq!(run.pace(), Some("6:00/km"));

        assert!(WorkoutActivity::create_interval_session("Repeats", intervals(), 1).is_ok());
        assert!(WorkoutActivity::create_interval_session("Repeats", circuit_structure(), 1).is_err());
        assert!(WorkoutActivity::create_circuit("Strength", circuit_structure(), 2).is_ok());
        assert!(WorkoutActivity::create_circuit("Strength", intervals(), 2).is_err());
    }

    #[test]
    fn test_estimated_duration() {
        assert_eq!(tempo_run().estimated_duration_minutes(), 40.0);

        let session = WorkoutActivity::create_interval_session("Repeats", intervals(), 1).unwrap();
        assert_eq!(session.estimated_duration_minutes(), 21.0);

        let bare = WorkoutActivity::create(ActivityInput::new("Run", ActivityType::Main, 0)).unwrap();
        assert_eq!(bare.estimated_duration_minutes(), 30.0);

        let mut props = ActivityInput::new("Circuit", ActivityType::Circuit, 0);
        props.structure = Some(ActivityStructure::Empty);
        let empty = WorkoutActivity::create(props).unwrap();
        assert!(!empty.has_structure());
        assert_eq!(empty.estimated_duration_minutes(), 20.0);
    }

    #[test]
    fn test_estimated_calories() {
        // 10 min x MET 3 x 70 kg / 60 = 35
        let warmup = WorkoutActivity::create_warmup(10.0, 0).unwrap();
        assert_eq!(warmup.estimated_calories(DEFAULT_BODY_WEIGHT_KG), 35);

        // 40 min x MET 6 x 80 kg / 60 = 320
        assert_eq!(tempo_run().estimated_calories(80.0), 320);
    }

    #[test]
    fn test_requires_equipment() {
        let circuit = WorkoutActivity::create_circuit("KB", circuit_structure(), 0).unwrap();
        assert!(circuit.requires_equipment());

        let run = WorkoutActivity::create_distance_run("Run", 5000.0, None, 0).unwrap();
        assert!(!run.requires_equipment());
        assert!(run
            .with_equipment(vec!["heart rate monitor".into()])
            .unwrap()
            .requires_equipment());
        assert!(run.with_equipment(vec!["  ".into()]).is_err());
    }

    #[test]
    fn test_make_easier_scales_and_floors() {
        let easier = tempo_run().make_easier(0.5).unwrap();
        assert_eq!(easier.duration_minutes(), Some(20.0));
        assert_eq!(easier.distance_meters(), Some(4000.0));
        assert_eq!(easier.structure().unwrap().average_intensity(), 1.5);

        let short = WorkoutActivity::create_distance_run("Strides", 150.0, None, 1).unwrap();
        let easier = short.make_easier(0.1).unwrap();
        assert_eq!(easier.distance_meters(), Some(100.0));

        let mut props = ActivityInput::new("Shakeout", ActivityType::Main, 1);
        props.duration_minutes = Some(8.0);
        let easier = WorkoutActivity::create(props).unwrap().make_easier(0.2).unwrap();
        assert_eq!(easier.duration_minutes(), Some(5.0));
    }

    #[test]
    fn test_make_harder() {
        let harder = tempo_run().make_harder(1.5).unwrap();
        assert_eq!(harder.duration_minutes(), Some(60.0));
        assert_eq!(harder.distance_meters(), Some(12000.0));
        assert_eq!(harder.structure().unwrap().average_intensity(), 3.5);
    }

    #[test]
    fn test_make_harder_rejects_overflow() {
        let mut props = ActivityInput::new("Long run", ActivityType::Main, 1);
        props.duration_minutes = Some(40.0);
        let run = WorkoutActivity::create(props).unwrap();

        let err = run.make_harder(1e308).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "duration_minutes"));

        // A successful adjustment still survives the document round trip
        let harder = run.make_harder(1e300).unwrap();
        let json = serde_json::to_string(&harder).unwrap();
        let decoded: WorkoutActivity = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.duration_minutes(), Some(40.0 * 1e300));
    }

    #[test]
    fn test_adjustment_factor_out_of_range() {
        let run = tempo_run();
        assert!(run.make_easier(1.0).is_err());
        assert!(run.make_easier(0.0).is_err());
        assert!(run.make_harder(1.0).is_err());
        assert!(run.make_harder(f64::INFINITY).is_err());
        assert!(run.adjust_for_fatigue(-0.1).is_err());
        assert!(run.adjust_for_fatigue(1.1).is_err());
    }

    #[test]
    fn test_bookends_are_never_adjusted() {
        let warmup = WorkoutActivity::create_warmup(10.0, 0).unwrap();
        assert_eq!(warmup.make_easier(0.5).unwrap(), warmup);
        assert_eq!(warmup.make_harder(2.0).unwrap(), warmup);
        assert_eq!(warmup.adjust_for_fatigue(1.0).unwrap(), warmup);
    }

    #[test]
    fn test_adjust_for_fatigue() {
        let tired = tempo_run().adjust_for_fatigue(1.0).unwrap();
        assert_eq!(tired.duration_minutes(), Some(28.0));
        assert_eq!(tired.distance_meters(), Some(6400.0));

        let rested = tempo_run().adjust_for_fatigue(0.0).unwrap();
        assert_eq!(rested, tempo_run());
    }

    #[test]
    fn test_description() {
        let run =
            WorkoutActivity::create_distance_run("Tempo run", 5000.0, Some("5:00/km".into()), 1)
                .unwrap();
        assert_eq!(run.description(), "Tempo run (main): 5.0 km at 5:00/km");

        let session = WorkoutActivity::create_interval_session("Repeats", intervals(), 1).unwrap();
        assert_eq!(
            session.description(),
            "Repeats (interval) - Interval session: 2 intervals x 2 rounds"
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let activity = tempo_run()
            .with_video_url("https://example.com/tempo")
            .unwrap();
        let json = serde_json::to_string(&activity).unwrap();
        assert!(json.contains("\"type\":\"main\""));

        let parsed: WorkoutActivity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, activity);
    }

    #[test]
    fn test_json_rejects_negative_order() {
        let json = r#"{"name": "Run", "type": "main", "order": -2}"#;
        assert!(serde_json::from_str::<WorkoutActivity>(json).is_err());
    }
}
