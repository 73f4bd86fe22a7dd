use std::fmt;

use dns_reconciler_provider::{ProviderZone, RecordKey, RecordSet, RecordType};
use serde::Serialize;

use crate::error::CoreError;

/// How a record set changes between the remote zone and the desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeKind {
    /// Key only exists in the desired state.
    Create,
    /// Key only exists remotely.
    Delete,
    /// Key exists on both sides with different records or TTL.
    Update,
}

/// A record set that differs, with human-readable description lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyChange {
    pub key: RecordKey,
    pub kind: ChangeKind,
    pub messages: Vec<String>,
}

/// Remote operation carried by a [`Correction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CorrectionAction {
    /// Delete the remote record set addressed by `remote_id`.
    Delete {
        remote_id: String,
        record_type: RecordType,
        /// Label relative to the zone.
        name: String,
    },
    /// Create or replace the whole record set.
    Upsert { record_set: RecordSet },
}

/// One atomic, idempotent remote operation plus its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    /// Key of the change this correction belongs to. Conflict-clearing deletes
    /// carry the key of the upsert they make room for.
    pub key: RecordKey,
    /// Description lines, newline separated.
    pub msg: String,
    pub action: CorrectionAction,
}

impl Correction {
    pub fn is_delete(&self) -> bool {
        matches!(self.action, CorrectionAction::Delete { .. })
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

/// Corrections computed for one zone.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionPlan {
    pub zone: ProviderZone,
    pub changes: Vec<KeyChange>,
    pub corrections: Vec<Correction>,
}

impl CorrectionPlan {
    /// True when the zone already matches the desired state.
    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}

/// A correction that failed or was not attempted.
#[derive(Debug, Serialize)]
pub struct CorrectionFailure {
    /// Position of the correction in the plan.
    pub index: usize,
    pub key: RecordKey,
    pub msg: String,
    pub error: CoreError,
}

/// Outcome of executing a plan.
#[derive(Debug, Default, Serialize)]
pub struct ApplyReport {
    /// Plan indexes of corrections that succeeded.
    pub applied: Vec<usize>,
    pub failures: Vec<CorrectionFailure>,
    /// Plan indexes not attempted because an earlier correction of the same key failed.
    pub skipped: Vec<usize>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}
