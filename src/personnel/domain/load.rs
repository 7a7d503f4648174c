//! Load classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Traffic-light summary of a member's daily load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLight {
    /// No load at all.
    Idle,
    /// Load up to the normal ceiling.
    Normal,
    /// Load up to the busy ceiling.
    Busy,
    /// Load above the busy ceiling.
    Overloaded,
}

impl StatusLight {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Normal => "normal",
            Self::Busy => "busy",
            Self::Overloaded => "overloaded",
        }
    }
}

impl fmt::Display for StatusLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ceilings, in daily hours, separating the status lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadThresholds {
    normal_max_hours: f64,
    busy_max_hours: f64,
}

impl Default for LoadThresholds {
    fn default() -> Self {
        Self {
            normal_max_hours: 6.0,
            busy_max_hours: 8.0,
        }
    }
}

impl LoadThresholds {
    /// Sets the highest load still shown as normal.
    #[must_use]
    pub const fn with_normal_max_hours(mut self, hours: f64) -> Self {
        self.normal_max_hours = hours;
        self
    }

    /// Sets the highest load still shown as busy.
    #[must_use]
    pub const fn with_busy_max_hours(mut self, hours: f64) -> Self {
        self.busy_max_hours = hours;
        self
    }

    /// Classifies a daily load in hours.
    #[must_use]
    pub fn classify(&self, load_hours: f64) -> StatusLight {
        if load_hours <= 0.0 {
            StatusLight::Idle
        } else if load_hours <= self.normal_max_hours {
            StatusLight::Normal
        } else if load_hours <= self.busy_max_hours {
            StatusLight::Busy
        } else {
            StatusLight::Overloaded
        }
    }
}

/// Spreads `effort` evenly over `working_days`.
///
/// With no working day left the whole effort falls on today.
#[must_use]
pub fn daily_share(effort: u32, working_days: u32) -> f64 {
    if working_days == 0 {
        f64::from(effort)
    } else {
        f64::from(effort) / f64::from(working_days)
    }
}
