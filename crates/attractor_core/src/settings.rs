use serde::{Deserialize, Serialize};

pub use crate::parameter::ValidationMode;

/// How an experiment answers `is_outdated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StalenessPolicy {
    /// Every poll reports a change.
    Always,
    /// Reports a change only when a version counter or the active selection
    /// moved since the last `mark_current`.
    #[default]
    Tracked,
}

/// Process-level knobs applied by the registry to every experiment it builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// System built when a requested one cannot be.
    pub default_system: String,
    pub validation: ValidationMode,
    pub staleness: StalenessPolicy,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            default_system: "Lorenz".to_string(),
            validation: ValidationMode::Unchecked,
            staleness: StalenessPolicy::Tracked,
        }
    }
}
