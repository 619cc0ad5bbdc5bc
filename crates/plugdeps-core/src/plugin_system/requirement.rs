use std::fmt;

use serde::Serialize;

/// Kinds of unmet requirements reported for a plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequirementKind {
    /// No installed plugin answers to the declared name
    MissingPlugin,
    /// The dependency is installed but not active
    InactivePlugin,
    /// The dependency is installed in a version outside the declared range
    IncompatibleVersion,
    /// The host core version is outside the plugin's `Core` range
    IncompatibleCore,
}

impl RequirementKind {
    /// Get a human-readable description of this requirement kind
    pub fn description(&self) -> &str {
        match self {
            RequirementKind::MissingPlugin => "Missing plugin",
            RequirementKind::InactivePlugin => "Inactive plugin",
            RequirementKind::IncompatibleVersion => "Incompatible plugin version",
            RequirementKind::IncompatibleCore => "Incompatible core version",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An unmet requirement, shown against the declaring plugin's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementNotice {
    pub kind: RequirementKind,
    /// What the requirement is about, e.g. `"Foo (>=2.0)"` or `"Core"`
    pub subject: String,
    pub message: String,
}

impl RequirementNotice {
    pub fn missing(subject: &str) -> Self {
        Self {
            kind: RequirementKind::MissingPlugin,
            subject: subject.to_string(),
            message: format!("{} is required but not installed.", subject),
        }
    }

    pub fn inactive(subject: &str, network: bool) -> Self {
        let message = if network {
            format!("{} is installed but not network active.", subject)
        } else {
            format!("{} is installed but not active.", subject)
        };
        Self {
            kind: RequirementKind::InactivePlugin,
            subject: subject.to_string(),
            message,
        }
    }

    pub fn incompatible_version(subject: &str, constraint: &str, actual: &str) -> Self {
        Self {
            kind: RequirementKind::IncompatibleVersion,
            subject: format!("{} ({})", subject, constraint),
            message: format!(
                "{} ({}) is required, but version {} is installed.",
                subject, constraint, actual
            ),
        }
    }

    pub fn incompatible_core(constraint: &str, actual: &str) -> Self {
        Self {
            kind: RequirementKind::IncompatibleCore,
            subject: format!("Core ({})", constraint),
            message: format!(
                "Core version {} is required, but version {} is running.",
                constraint, actual
            ),
        }
    }
}

impl fmt::Display for RequirementNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
