use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Minimum total, per category, needed to pass the course.
pub const DEFAULT_PASS_THRESHOLD: f64 = 50.0;
/// Top of the GPA scale; a course total of 100 maps to this value.
pub const DEFAULT_GPA_SCALE: f64 = 5.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GradingPolicy {
    pub pass_threshold: f64,
    pub gpa_scale: f64,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            gpa_scale: DEFAULT_GPA_SCALE,
        }
    }
}

impl GradingPolicy {
    pub fn new(pass_threshold: f64, gpa_scale: f64) -> Result<Self, PolicyError> {
        if !(0.0..=100.0).contains(&pass_threshold) {
            return Err(PolicyError::Threshold(pass_threshold));
        }
        if !gpa_scale.is_finite() || gpa_scale <= 0.0 {
            return Err(PolicyError::Scale(gpa_scale));
        }
        Ok(Self {
            pass_threshold,
            gpa_scale,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrontEnd {
    #[default]
    Tui,
    Plain,
}

/// Everything a run needs to know, resolved from the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    pub policy: GradingPolicy,
    pub output: OutputFormat,
    pub front_end: FrontEnd,
}

impl Config {
    /// Plain mode is forced when stdin cannot drive the TUI.
    pub fn with_tty(mut self, stdin_is_tty: bool) -> Self {
        if !stdin_is_tty {
            self.front_end = FrontEnd::Plain;
        }
        self
    }
}
