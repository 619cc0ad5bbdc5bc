//! # Version Constraints
//!
//! Parses dependency declarations such as `Foo (>=2.x-1.5/3.x)` into a
//! [`VersionConstraint`] and evaluates them against an installed version.
//!
//! ## Grammar
//!
//! ```text
//! declaration := subject [ "(" body [ ")" ] ]
//! body        := clause { ( "/" | "," ) clause }
//! clause      := ws [ op ] ws [ core "-" ] major "." minor ...
//! op          := "!=" | "==" | "=" | "<>" | "<=" | "<" | ">=" | ">"
//! core        := the host core compatibility branch, e.g. "3.x"
//! major       := digit { digit }
//! minor       := ( digit { digit } | "x" ) [ "-" alpha { alpha } digit { digit } ]
//! ```
//!
//! Anything after the matched `minor` in a clause is ignored. Clauses that do
//! not match are skipped without error. A missing operator means `=`.
//!
//! ## Branch wildcards
//!
//! A minor of `x` selects a whole branch: `2.x` is every `2.*` version. The
//! version comparison ranks `x` below any number, so `2.x < 2.0`, which makes
//! `>=2.x` and `<2.x` already correct. The other operators are rewritten:
//!
//! - `>N.x` and `<=N.x` compare against `(N+1).x` instead,
//! - `=N.x` becomes the pair `<(N+1).x`, `>=N.x`.
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::Serialize;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::version::{Operator, PluginVersion};

/// A single `(operator, version)` requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintEntry {
    pub operator: Operator,
    pub version: String,
}

impl ConstraintEntry {
    pub fn new(operator: Operator, version: impl Into<String>) -> Self {
        Self {
            operator,
            version: version.into(),
        }
    }

    /// Whether `actual <operator> version` holds.
    pub fn is_satisfied_by(&self, actual: &PluginVersion) -> bool {
        actual.satisfies(self.operator, &PluginVersion::parse(&self.version))
    }
}

impl fmt::Display for ConstraintEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// A parsed dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionConstraint {
    subject: String,
    entries: Vec<ConstraintEntry>,
    /// Constraint body as written, without the enclosing parentheses.
    raw: Option<String>,
}

impl VersionConstraint {
    /// A constraint on `subject` that any version satisfies.
    pub fn any(subject: &str) -> Self {
        Self {
            subject: subject.trim().to_string(),
            entries: Vec::new(),
            raw: None,
        }
    }

    /// Parses a declaration without a core compatibility prefix.
    pub fn parse(input: &str) -> Result<Self, PluginSystemError> {
        Ok(ConstraintParser::new(None)?.parse(input))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn entries(&self) -> &[ConstraintEntry] {
        &self.entries
    }

    /// The constraint text for display, e.g. `">=2.x-1.5"`.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// True when no entry restricts the version.
    pub fn is_unconstrained(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks `actual` against every entry.
    ///
    /// Returns `None` if compatible, otherwise the constraint text to show
    /// the user. All entries must hold.
    pub fn check(&self, actual: &str) -> Option<String> {
        let actual = PluginVersion::parse(actual);
        let failing = self.entries.iter().find(|entry| !entry.is_satisfied_by(&actual))?;
        log::debug!(
            "Version '{}' of '{}' fails constraint entry '{}'",
            actual,
            self.subject,
            failing
        );
        Some(self.raw.clone().unwrap_or_else(|| failing.to_string()))
    }

    pub fn is_satisfied_by(&self, actual: &str) -> bool {
        self.check(actual).is_none()
    }
}

impl FromStr for VersionConstraint {
    type Err = PluginSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionConstraint::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(f, "{} ({})", self.subject, raw),
            None => write!(f, "{}", self.subject),
        }
    }
}

/// Parser for dependency declarations, bound to one host core branch.
#[derive(Debug, Clone)]
pub struct ConstraintParser {
    core_compatibility: Option<String>,
    pattern: Regex,
}

impl ConstraintParser {
    /// Creates a parser. `core_compatibility` (e.g. `"3.x"`) is the branch
    /// prefix that may precede a version, as in `3.x-1.2`.
    pub fn new(core_compatibility: Option<&str>) -> Result<Self, PluginSystemError> {
        let core = core_compatibility
            .map(|core| format!("(?:{}-)?", regex::escape(core)))
            .unwrap_or_default();
        let pattern = format!(
            r"^\s*(?P<op>!=|==|=|<>|<=|<|>=|>)?\s*{}(?P<major>\d+)\.(?P<minor>(?:\d+|x)(?:-[A-Za-z]+\d+)?)",
            core
        );
        let pattern = Regex::new(&pattern).map_err(|e| PluginSystemError::InvalidConstraint {
            constraint: pattern.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            core_compatibility: core_compatibility.map(str::to_string),
            pattern,
        })
    }

    /// Creates a parser whose core branch is derived from a host core
    /// version: `"3.9.1"` gives `"3.x"`.
    pub fn for_core_version(core_version: &str) -> Result<Self, PluginSystemError> {
        let major: String = core_version
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if major.is_empty() {
            return Self::new(None);
        }
        Self::new(Some(&format!("{}.x", major)))
    }

    pub fn core_compatibility(&self) -> Option<&str> {
        self.core_compatibility.as_deref()
    }

    /// Parses a declaration. Never fails: unparsable clauses are skipped.
    pub fn parse(&self, input: &str) -> VersionConstraint {
        let (subject, body) = match input.split_once('(') {
            Some((subject, body)) => (subject, Some(body)),
            None => (input, None),
        };

        let Some(body) = body else {
            return VersionConstraint::any(subject);
        };

        let raw = body.trim();
        let raw = raw.strip_suffix(')').unwrap_or(raw).trim().to_string();

        let mut entries = Vec::new();
        for clause in raw.split(['/', ',']).filter(|clause| !clause.trim().is_empty()) {
            if !self.parse_clause(clause, &mut entries) {
                log::warn!("Skipping malformed version constraint '{}' in '{}'", clause.trim(), input.trim());
            }
        }

        VersionConstraint {
            subject: subject.trim().to_string(),
            entries,
            raw: if raw.is_empty() { None } else { Some(raw) },
        }
    }

    /// Appends the entries of one clause. Returns false when the clause does not
    /// match the grammar.
    fn parse_clause(&self, clause: &str, entries: &mut Vec<ConstraintEntry>) -> bool {
        let Some(caps) = self.pattern.captures(clause) else {
            return false;
        };

        let mut operator = match caps.name("op") {
            Some(op) => match op.as_str().parse::<Operator>() {
                Ok(op) => op,
                Err(_) => return false,
            },
            None => Operator::Eq,
        };
        let Ok(mut major) = caps["major"].parse::<u64>() else {
            return false;
        };
        let minor = &caps["minor"];

        if minor == "x" {
            if matches!(operator, Operator::Gt | Operator::Le) {
                let Some(next) = major.checked_add(1) else {
                    return false;
                };
                major = next;
            }
            if operator == Operator::Eq {
                let Some(next) = major.checked_add(1) else {
                    return false;
                };
                entries.push(ConstraintEntry::new(Operator::Lt, format!("{}.x", next)));
                operator = Operator::Ge;
            }
        }

        entries.push(ConstraintEntry::new(operator, format!("{}.{}", major, minor)));
        true
    }
}
