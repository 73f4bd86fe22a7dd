use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// TTL applied to records that do not specify one.
pub const DEFAULT_TTL: u32 = 300;

/// Desired state of one zone.
///
/// ```json
/// {
///   "name": "example.com",
///   "records": [
///     { "name": "@",   "type": "A",     "ttl": 300, "address": "192.0.2.1" },
///     { "name": "www", "type": "CNAME", "target": "example.com." },
///     { "name": "@",   "type": "MX",    "preference": 10, "exchange": "mail.example.com." },
///     { "name": "@",   "type": "TXT",   "strings": ["v=spf1 -all"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    /// Zone name (ASCII, trailing dot optional).
    pub name: String,
    /// Desired records; an empty list removes every manageable record set.
    #[serde(default)]
    pub records: Vec<RecordConfig>,
}

/// One desired record as written by the user.
///
/// Type-specific fields are kept loose until validation so that an unknown
/// `type` surfaces as `UnsupportedRecordType` rather than a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Label relative to the zone (`"www"`), `"@"` for the apex, or an FQDN ending in a dot.
    pub name: String,
    /// Record type mnemonic (`"A"`, `"CNAME"`, ...).
    #[serde(rename = "type")]
    pub record_type: String,
    /// TTL in seconds; defaults to [`DEFAULT_TTL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Type-specific fields (`address`, `target`, `preference`, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RecordConfig {
    /// Create a record config from its parts.
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: Option<u32>,
        fields: Map<String, Value>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl,
            fields,
        }
    }
}

/// Knobs for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Upper bound for a single correction action (default: 120s).
    pub action_timeout: Duration,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            action_timeout: Duration::from_secs(120),
        }
    }
}

impl ReconcileOptions {
    /// Set the per-action timeout.
    #[must_use]
    pub fn action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }
}
