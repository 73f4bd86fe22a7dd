//! Type definitions

mod config;
mod correction;

pub use config::{DomainConfig, RecordConfig, ReconcileOptions, DEFAULT_TTL};
pub use correction::{
    ApplyReport, ChangeKind, Correction, CorrectionAction, CorrectionFailure, CorrectionPlan,
    KeyChange,
};

// Re-export the provider library's record model
pub use dns_reconciler_provider::{
    ProviderMetadata, ProviderZone, Record, RecordData, RecordKey, RecordSet, RecordType,
    RemoteRecordSet,
};
