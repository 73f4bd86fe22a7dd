//! Reconciliation pipeline: group, diff, plan.
//!
//! All three stages are pure functions over the record model; the only remote
//! interaction happens before (listing) and after (executing corrections).

pub mod differ;
pub mod grouper;
pub mod planner;

pub use differ::changed_keys;
pub use grouper::{group, group_remote, is_provider_managed, RecordSetMap};
pub use planner::plan;
