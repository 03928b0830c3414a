//! Core reconciliation logic
//!
//! Pure functions and data with no I/O: membership diffing, principal
//! normalization, ownership filtering and pass bookkeeping.

pub mod mutation;
pub mod ownership;
pub mod principals;
pub mod report;

pub use mutation::Mutation;
pub use ownership::{owned_resources, service_id_from_name, DESCRIBE_TAGS_BATCH};
pub use principals::{extract_account, principal_mutation, removal_form, wrap_account};
pub use report::{FailureStage, PassReport, ResourceFailure, ResourceOutcome, STATUS_OK};
