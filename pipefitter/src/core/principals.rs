//! Allowed-principal normalization for endpoint services
//!
//! Endpoint services report principals as root-account ARNs
//! (`arn:aws:iam::123456789012:root`), bare account numbers, or opaque values
//! such as `*`. Desired principals are always bare account numbers. Diffing
//! happens on account numbers; the write side needs ARNs again, except for
//! opaque values, which go back exactly as they were read.

use std::collections::BTreeMap;

use shared::config::is_account_number;
use shared::sets::uniq;

use super::mutation::Mutation;

/// Wrap an account number into its root-account ARN
pub fn wrap_account(account: &str) -> String {
    format!("arn:aws:iam::{account}:root")
}

/// Extract the account number from a root-account ARN
///
/// Anything that is not shaped like `arn:<partition>:iam::<account>:root`
/// with a 12-digit account is returned unchanged.
pub fn extract_account(principal: &str) -> String {
    let parts: Vec<&str> = principal.split(':').collect();
    match parts.as_slice() {
        ["arn", _partition, "iam", "", account, "root"] if is_account_number(account) => {
            account.to_string()
        }
        _ => principal.to_string(),
    }
}

/// Form in which an observed principal is sent for removal
///
/// Bare account numbers become ARNs; ARNs, wildcards and unknown values pass
/// through exactly as the service reported them.
pub fn removal_form(observed: &str) -> String {
    if is_account_number(observed) {
        wrap_account(observed)
    } else {
        observed.to_string()
    }
}

/// Diff desired accounts against the principals an endpoint service reports
///
/// The returned mutation is in write form: additions are ARNs, removals name
/// the principals as observed (bare account numbers wrapped into ARNs).
pub fn principal_mutation<D, O>(desired_accounts: &[D], observed_principals: &[O]) -> Mutation
where
    D: AsRef<str>,
    O: AsRef<str>,
{
    // Normalized account -> every principal string reported for it
    let mut observed: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for principal in observed_principals {
        let principal = principal.as_ref();
        observed
            .entry(extract_account(principal))
            .or_default()
            .push(principal);
    }
    let observed_accounts: Vec<&str> = observed.keys().map(String::as_str).collect();

    let diff = Mutation::compute(desired_accounts, &observed_accounts);
    let removals = diff
        .removals
        .iter()
        .filter_map(|account| observed.get(account))
        .flatten()
        .map(|principal| removal_form(principal));

    Mutation {
        additions: diff.additions.iter().map(|a| wrap_account(a)).collect(),
        removals: uniq(removals),
    }
}
