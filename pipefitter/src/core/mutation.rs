//! Membership diffing
//!
//! A [`Mutation`] is the minimal change moving an observed membership set to
//! the desired one. Both sides are deduplicated and sorted, so the same inputs
//! always produce the same lists in the same order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use shared::sets::{contains, uniq};

/// Additions and removals needed to move an observed set to a desired set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// Desired members missing from the observed set
    pub additions: Vec<String>,
    /// Observed members absent from the desired set
    pub removals: Vec<String>,
}

impl Mutation {
    /// Diff `desired` against `observed`
    ///
    /// A member present on both sides never appears in either list.
    pub fn compute<D, O>(desired: &[D], observed: &[O]) -> Self
    where
        D: AsRef<str>,
        O: AsRef<str>,
    {
        let additions = uniq(
            desired
                .iter()
                .map(|member| member.as_ref())
                .filter(|member| !contains(observed, member))
                .map(str::to_string),
        );
        let removals = uniq(
            observed
                .iter()
                .map(|member| member.as_ref())
                .filter(|member| !contains(desired, member))
                .map(str::to_string),
        );
        Self { additions, removals }
    }

    /// No additions and no removals; nothing must be written
    pub fn is_noop(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Observed set after this mutation is applied (`observed ∪ additions ∖ removals`)
    pub fn apply_to<O: AsRef<str>>(&self, observed: &[O]) -> BTreeSet<String> {
        let mut result: BTreeSet<String> = observed
            .iter()
            .map(|member| member.as_ref().to_string())
            .collect();
        result.extend(self.additions.iter().cloned());
        for removed in &self.removals {
            result.remove(removed);
        }
        result
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.additions.is_empty(), self.removals.is_empty()) {
            (true, true) => write!(f, "no changes"),
            (false, true) => write!(f, "added {:?}", self.additions),
            (true, false) => write!(f, "removed {:?}", self.removals),
            (false, false) => write!(
                f,
                "added {:?}, removed {:?}",
                self.additions, self.removals
            ),
        }
    }
}
