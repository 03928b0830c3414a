//! Set helpers over small ordered string collections
//!
//! Membership sets handled here hold tens of entries at most, so linear scans
//! are fine. `uniq` sorts its output so every derived list (regions, mutation
//! members, log lines) comes out in the same order on every run.

use std::collections::BTreeSet;

/// True iff `element` is present in `set`
pub fn contains<T: AsRef<str>>(set: &[T], element: &str) -> bool {
    set.iter().any(|item| item.as_ref() == element)
}

/// Remove duplicates, returning the members in ascending order
pub fn uniq<T>(elements: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Ord,
{
    elements
        .into_iter()
        .collect::<BTreeSet<T>>()
        .into_iter()
        .collect()
}
