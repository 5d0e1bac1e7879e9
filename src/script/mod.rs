//! Scripted pipelines for driving a tracker.
//!
//! A script is a timed list of tracker calls, defined in YAML. Scripts
//! simulate a running pipeline for demos and make end-to-end checks
//! reproducible: played instantly, they produce the same snapshot every time.

pub mod player;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{EventTracker, TrackerError};
use crate::domain::{EventConfig, EventTypeConfig};

pub use player::{Pacing, PlaybackReport, ScriptPlayer};

const BUILTIN_SCRIPTS: &[(&str, &str)] = &[
    ("demo", include_str!("../../scripts/demo.yaml")),
    ("parallel", include_str!("../../scripts/parallel.yaml")),
    ("failure", include_str!("../../scripts/failure.yaml")),
];

/// Latest time a step may be scheduled at (one day)
pub const MAX_AT_MS: u64 = 24 * 60 * 60 * 1000;

const DEMO_EVENT_TYPES: &str = include_str!("../../scripts/demo_types.yaml");

/// A named, timed sequence of tracker calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Extra type definitions the script's events rely on
    #[serde(default)]
    pub event_types: Option<EventTypeConfig>,

    pub steps: Vec<ScriptStep>,
}

/// One call, scheduled relative to the start of playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Milliseconds after playback starts
    pub at_ms: u64,

    #[serde(flatten)]
    pub action: ScriptAction,
}

/// Tracker call performed by a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptAction {
    Start {
        id: String,
        name: String,
        #[serde(rename = "type")]
        event_type: String,
        #[serde(default)]
        pipeline_id: Option<String>,
        #[serde(default)]
        parent_id: Option<String>,
    },
    Progress {
        id: String,
        progress: u8,
        #[serde(default)]
        message: Option<String>,
    },
    Complete {
        id: String,
        #[serde(default = "default_success")]
        success: bool,
        #[serde(default)]
        error: Option<String>,
    },
    Amend {
        id: String,
        success: bool,
        #[serde(default)]
        error: Option<String>,
    },
    Clear,
}

fn default_success() -> bool {
    true
}

impl ScriptAction {
    /// Perform the call against a tracker
    pub fn apply(&self, tracker: &mut EventTracker) -> Result<(), TrackerError> {
        match self {
            ScriptAction::Start {
                id,
                name,
                event_type,
                pipeline_id,
                parent_id,
            } => {
                let config = EventConfig {
                    name: name.clone(),
                    event_type: event_type.clone(),
                    pipeline_id: pipeline_id.clone(),
                    parent_id: parent_id.clone(),
                };
                tracker.start_event(id, config)
            }
            ScriptAction::Progress {
                id,
                progress,
                message,
            } => tracker.update_progress(id, *progress, message.as_deref()),
            ScriptAction::Complete { id, success, error } => {
                tracker.complete_event(id, *success, error.as_deref())
            }
            ScriptAction::Amend { id, success, error } => {
                tracker.amend_completion(id, *success, error.as_deref())
            }
            ScriptAction::Clear => {
                tracker.clear();
                Ok(())
            }
        }
    }

    /// Event id the action targets, if any
    pub fn event_id(&self) -> Option<&str> {
        match self {
            ScriptAction::Start { id, .. }
            | ScriptAction::Progress { id, .. }
            | ScriptAction::Complete { id, .. }
            | ScriptAction::Amend { id, .. } => Some(id),
            ScriptAction::Clear => None,
        }
    }
}

/// Script loading and validation errors
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse script YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown built-in script: {0}")]
    UnknownBuiltin(String),

    #[error("Script name cannot be empty")]
    EmptyName,

    #[error("Script '{0}' has no steps")]
    NoSteps(String),

    #[error("Step {step} has an empty event id")]
    EmptyId { step: usize },

    #[error("Step {step} sets progress {progress} (must be 0-100)")]
    ProgressOutOfRange { step: usize, progress: u8 },

    #[error("Step {step} is scheduled at {at_ms}ms (must be at most {max}ms)")]
    TimeOutOfRange { step: usize, at_ms: u64, max: u64 },
}

impl Script {
    /// Load a script from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a script from YAML content
    pub fn from_yaml(content: &str) -> Result<Self, ScriptError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load one of the bundled scripts by name.
    ///
    /// Bundled scripts use the demo type set unless they bring their own.
    pub fn builtin(name: &str) -> Result<Self, ScriptError> {
        let (_, content) = BUILTIN_SCRIPTS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| ScriptError::UnknownBuiltin(name.to_string()))?;

        let mut script = Self::from_yaml(content)?;
        if script.event_types.is_none() {
            script.event_types = Some(demo_event_types()?);
        }
        Ok(script)
    }

    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_SCRIPTS.iter().map(|(name, _)| *name)
    }

    /// Validate the script definition
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.name.trim().is_empty() {
            return Err(ScriptError::EmptyName);
        }

        if self.steps.is_empty() {
            return Err(ScriptError::NoSteps(self.name.clone()));
        }

        for (i, step) in self.steps.iter().enumerate() {
            if step.at_ms > MAX_AT_MS {
                return Err(ScriptError::TimeOutOfRange {
                    step: i,
                    at_ms: step.at_ms,
                    max: MAX_AT_MS,
                });
            }

            if let Some(id) = step.action.event_id() {
                if id.trim().is_empty() {
                    return Err(ScriptError::EmptyId { step: i });
                }
            }

            if let ScriptAction::Progress { progress, .. } = step.action {
                if progress > 100 {
                    return Err(ScriptError::ProgressOutOfRange { step: i, progress });
                }
            }
        }

        Ok(())
    }

    /// Steps in playback order (by time, ties in file order)
    pub fn ordered_steps(&self) -> Vec<&ScriptStep> {
        let mut steps: Vec<&ScriptStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.at_ms);
        steps
    }

    /// Time of the last step
    pub fn duration_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.at_ms).max().unwrap_or(0)
    }
}

/// Type definitions used by the bundled demo scripts
pub fn demo_event_types() -> Result<EventTypeConfig, ScriptError> {
    Ok(serde_yaml::from_str(DEMO_EVENT_TYPES)?)
}
