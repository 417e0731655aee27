//! Goals attached to a workout template.

use crate::structure::ensure_positive;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const MAX_HEART_RATE_ZONE: u8 = 5;
const MAX_RPE: u8 = 10;
const MAX_INTENSITY_FACTOR: f64 = 2.0;

/// What a workout is meant to achieve
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutGoals {
    pub primary: String,
    #[serde(default)]
    pub secondary: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_distance_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_pace: Option<String>,
    /// Heart-rate zone 1-5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_heart_rate_zone: Option<u8>,
    /// Rate of perceived exertion 1-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_rpe: Option<u8>,
}

impl WorkoutGoals {
    pub fn new(primary: impl Into<String>) -> Result<Self> {
        let goals = Self {
            primary: primary.into(),
            secondary: Vec::new(),
            target_duration_minutes: None,
            target_distance_meters: None,
            target_pace: None,
            target_heart_rate_zone: None,
            target_rpe: None,
        };
        goals.validate()?;
        Ok(goals)
    }

    pub fn validate(&self) -> Result<()> {
        if self.primary.trim().is_empty() {
            return Err(Error::validation("goals.primary", "must not be empty"));
        }
        if let Some(duration) = self.target_duration_minutes {
            ensure_positive("goals.target_duration_minutes", duration)?;
        }
        if let Some(distance) = self.target_distance_meters {
            ensure_positive("goals.target_distance_meters", distance)?;
        }
        if let Some(zone) = self.target_heart_rate_zone {
            if !(1..=MAX_HEART_RATE_ZONE).contains(&zone) {
                return Err(Error::validation(
                    "goals.target_heart_rate_zone",
                    format!("must be between 1 and {MAX_HEART_RATE_ZONE}, got {zone}"),
                ));
            }
        }
        if let Some(rpe) = self.target_rpe {
            if !(1..=MAX_RPE).contains(&rpe) {
                return Err(Error::validation(
                    "goals.target_rpe",
                    format!("must be between 1 and {MAX_RPE}, got {rpe}"),
                ));
            }
        }
        Ok(())
    }

    pub fn has_targets(&self) -> bool {
        self.target_duration_minutes.is_some()
            || self.target_distance_meters.is_some()
            || self.target_pace.is_some()
            || self.target_heart_rate_zone.is_some()
            || self.target_rpe.is_some()
    }

    /// Scale RPE and heart-rate zone by `factor` in (0, 2], rounded and kept in range
    pub fn adjust_intensity(&self, factor: f64) -> Result<Self> {
        if !(factor > 0.0 && factor <= MAX_INTENSITY_FACTOR) {
            return Err(Error::validation(
                "intensity_factor",
                format!("must be greater than 0 and at most {MAX_INTENSITY_FACTOR}, got {factor}"),
            ));
        }
        let scale = |value: u8, max: u8| {
            (f64::from(value) * factor).round().clamp(1.0, f64::from(max)) as u8
        };

        Ok(Self {
            target_heart_rate_zone: self
                .target_heart_rate_zone
                .map(|zone| scale(zone, MAX_HEART_RATE_ZONE)),
            target_rpe: self.target_rpe.map(|rpe| scale(rpe, MAX_RPE)),
            ..self.clone()
        })
    }
}
