use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::label::TargetLabel;

/// Identifier of one independent unit of work (a network such as `base_sepolia`).
///
/// Immutable for the duration of a run and unique within one [`TargetSet`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    /// Create a new target from a string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the conventional environment variable name for this target.
    ///
    /// The identifier is uppercased and every non-alphanumeric character is
    /// mapped to `_`, then the suffix is appended:
    /// `base_sepolia` + `RPC_URL` -> `BASE_SEPOLIA_RPC_URL`.
    pub fn env_var(&self, suffix: &str) -> String {
        let mut name: String = self
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        name.push('_');
        name.push_str(suffix);
        name
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Target {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ordered, deduplicated list of targets for one run.
///
/// Order determines label assignment only, never execution order.
/// Duplicates keep the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Target>")]
pub struct TargetSet(Vec<Target>);

impl TargetSet {
    /// Build a set from any iterator of targets, dropping duplicates.
    pub fn new(targets: impl IntoIterator<Item = Target>) -> Self {
        let mut out: Vec<Target> = Vec::new();
        for t in targets {
            if !out.contains(&t) {
                out.push(t);
            }
        }
        Self(out)
    }

    /// Number of targets in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no targets.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over targets in set order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.0.iter()
    }

    /// Position of a target within the set, if present.
    pub fn position(&self, target: &Target) -> Option<usize> {
        self.0.iter().position(|t| t == target)
    }

    /// Returns `true` if the target belongs to this set.
    pub fn contains(&self, target: &Target) -> bool {
        self.0.contains(target)
    }

    /// Deterministic display label for a member of this set.
    ///
    /// Two runs over the same set produce the same assignment.
    pub fn label_of(&self, target: &Target) -> Option<TargetLabel> {
        self.position(target)
            .map(|idx| TargetLabel::new(target.clone(), idx))
    }
}

impl From<Vec<Target>> for TargetSet {
    fn from(targets: Vec<Target>) -> Self {
        Self::new(targets)
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self::new(iter)
    }
}
