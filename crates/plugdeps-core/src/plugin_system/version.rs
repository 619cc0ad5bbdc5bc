use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error type for version parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    UnknownOperator(String),
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::UnknownOperator(op) => write!(f, "Unknown comparison operator '{}'", op),
        }
    }
}

impl std::error::Error for VersionError {}

/// One component of a dotted version string.
///
/// `"1.2beta3"` splits into `[Number(1), Number(2), Tag("beta"), Number(3)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionPart {
    Number(u64),
    Tag(String),
}

impl VersionPart {
    /// Rank of a tag among the known pre/post release markers.
    ///
    /// `dev < alpha|a < beta|b < RC|rc < (number) < pl|p`. Anything else,
    /// including the `x` of a branch wildcard, ranks below `dev`. Tags are
    /// matched by prefix, so `"alpha2"` style leftovers still rank as alpha.
    fn tag_rank(tag: &str) -> i8 {
        const FORMS: [(&str, i8); 9] = [
            ("dev", 0),
            ("alpha", 1),
            ("a", 1),
            ("beta", 2),
            ("b", 2),
            ("RC", 3),
            ("rc", 3),
            ("pl", 5),
            ("p", 5),
        ];
        FORMS
            .iter()
            .find(|(name, _)| tag.starts_with(name))
            .map(|(_, rank)| *rank)
            .unwrap_or(-1)
    }

    /// Rank used when a number is compared against a tag.
    const NUMBER_RANK: i8 = 4;

    fn rank(&self) -> i8 {
        match self {
            VersionPart::Number(_) => Self::NUMBER_RANK,
            VersionPart::Tag(tag) => Self::tag_rank(tag),
        }
    }

    fn compare(&self, other: &VersionPart) -> Ordering {
        match (self, other) {
            (VersionPart::Number(a), VersionPart::Number(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPart::Number(n) => write!(f, "{}", n),
            VersionPart::Tag(t) => write!(f, "{}", t),
        }
    }
}

/// A loosely structured plugin version such as `"2.1"`, `"3.0-beta5"` or `"2.x"`.
///
/// Plugin authors do not follow semver, so versions are compared the way
/// plugin hosts traditionally compare them: the string is cut into numeric
/// and alphabetic runs (separators `.`, `-`, `_`, `+` and any other
/// non-alphanumeric character are dropped), numbers compare numerically and
/// tags compare by their release rank.
#[derive(Debug, Clone)]
pub struct PluginVersion {
    raw: String,
    parts: Vec<VersionPart>,
}

impl PluginVersion {
    /// Parses a version string. Parsing never fails; an empty string yields
    /// an empty version that sorts before everything else.
    pub fn parse(raw: &str) -> Self {
        fn flush(current: &mut String, is_digit: bool, parts: &mut Vec<VersionPart>) {
            if current.is_empty() {
                return;
            }
            let part = if is_digit {
                // Saturate absurdly long numeric runs rather than failing.
                VersionPart::Number(current.parse::<u64>().unwrap_or(u64::MAX))
            } else {
                VersionPart::Tag(current.clone())
            };
            parts.push(part);
            current.clear();
        }

        let mut parts = Vec::new();
        let mut current = String::new();
        let mut current_is_digit = false;

        for c in raw.trim().chars() {
            if !c.is_ascii_alphanumeric() {
                flush(&mut current, current_is_digit, &mut parts);
                continue;
            }
            let is_digit = c.is_ascii_digit();
            if !current.is_empty() && is_digit != current_is_digit {
                flush(&mut current, current_is_digit, &mut parts);
            }
            current_is_digit = is_digit;
            current.push(c);
        }
        flush(&mut current, current_is_digit, &mut parts);

        Self {
            raw: raw.trim().to_string(),
            parts,
        }
    }

    pub fn parts(&self) -> &[VersionPart] {
        &self.parts
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Compares two versions.
    ///
    /// When one version runs out of parts, the leftover part of the other
    /// decides: a trailing number makes the longer version newer
    /// (`1.0 < 1.0.1`), a trailing tag is ranked against a release number
    /// (`1.0beta < 1.0 < 1.0pl1`).
    pub fn compare(&self, other: &PluginVersion) -> Ordering {
        match (self.parts.is_empty(), other.parts.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }

        for (a, b) in self.parts.iter().zip(other.parts.iter()) {
            let ord = a.compare(b);
            if ord != Ordering::Equal {
                return ord;
            }
        }

        let common = self.parts.len().min(other.parts.len());
        match (self.parts.get(common), other.parts.get(common)) {
            (Some(VersionPart::Number(_)), None) => Ordering::Greater,
            (Some(tag @ VersionPart::Tag(_)), None) => tag.rank().cmp(&VersionPart::NUMBER_RANK),
            (None, Some(VersionPart::Number(_))) => Ordering::Less,
            (None, Some(tag @ VersionPart::Tag(_))) => VersionPart::NUMBER_RANK.cmp(&tag.rank()),
            _ => Ordering::Equal,
        }
    }

    /// Evaluates `self <op> other`.
    pub fn satisfies(&self, op: Operator, other: &PluginVersion) -> bool {
        op.holds(self.compare(other))
    }
}

impl PartialEq for PluginVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for PluginVersion {}

impl PartialOrd for PluginVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PluginVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl FromStr for PluginVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PluginVersion::parse(s))
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Comparison operator of a single constraint entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `=` or `==`
    Eq,
    /// `!=` or `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Operator {
    /// Whether an ordering of `actual` against `required` satisfies the operator.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl FromStr for Operator {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            other => Err(VersionError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
