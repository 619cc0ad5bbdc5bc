use std::fmt;

use serde::Serialize;

use crate::plugin_system::constraint::{ConstraintParser, VersionConstraint};

/// Splits a comma separated header value on `,\s*`, dropping empty items.
pub fn parse_field(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim_start)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// One entry of a plugin's `Depends` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDeclaration {
    /// Name as written by the declaring plugin; may be a display name, an
    /// identifier or a virtual capability
    pub target: String,

    /// Version requirement, if the declaration carries one
    pub constraint: Option<VersionConstraint>,

    /// The token as it appeared in the header
    pub raw: String,
}

impl DependencyDeclaration {
    /// Create a declaration accepting any version
    pub fn any(target: &str) -> Self {
        Self {
            target: target.trim().to_string(),
            constraint: None,
            raw: target.trim().to_string(),
        }
    }

    /// Parse a single `Depends` token like `Foo (>=1.2)`
    pub fn parse(token: &str, parser: &ConstraintParser) -> Self {
        let parsed = parser.parse(token);
        let target = parsed.subject().to_string();
        let constraint = if parsed.raw().is_some() { Some(parsed) } else { None };
        Self {
            target,
            constraint,
            raw: token.trim().to_string(),
        }
    }

    /// Parse a whole `Depends` header value
    pub fn parse_all(header: &str, parser: &ConstraintParser) -> Vec<Self> {
        parse_field(header)
            .iter()
            .map(|token| Self::parse(token, parser))
            .collect()
    }

    /// Check the declaration against a version; `None` means compatible
    pub fn check(&self, version: &str) -> Option<String> {
        self.constraint.as_ref().and_then(|c| c.check(version))
    }

    /// Check if this dependency is compatible with the given version string
    pub fn is_compatible_with(&self, version: &str) -> bool {
        self.check(version).is_none()
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constraint.as_ref().and_then(|c| c.raw()) {
            Some(raw) => write!(f, "{} ({})", self.target, raw),
            None => write!(f, "{}", self.target),
        }
    }
}
