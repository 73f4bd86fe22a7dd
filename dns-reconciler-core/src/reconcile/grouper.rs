//! Record-set grouping

use std::collections::HashMap;

use dns_reconciler_provider::name::normalize_domain_name;

use crate::types::{Record, RecordKey, RecordType, RemoteRecordSet};

/// Records grouped by [`RecordKey`], in first-seen key order.
///
/// Records inside a group keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSetMap {
    order: Vec<RecordKey>,
    groups: HashMap<RecordKey, Vec<Record>>,
}

impl RecordSetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its group, creating the group on first sight.
    pub fn insert(&mut self, record: Record) {
        let key = record.key();
        if let Some(group) = self.groups.get_mut(&key) {
            group.push(record);
        } else {
            self.order.push(key.clone());
            self.groups.insert(key, vec![record]);
        }
    }

    pub fn get(&self, key: &RecordKey) -> Option<&[Record]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &RecordKey) -> bool {
        self.groups.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
        self.order.iter()
    }

    /// Groups in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &[Record])> {
        self.order
            .iter()
            .filter_map(|key| self.groups.get(key).map(|g| (key, g.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Normalizes a record for comparison: FQDN lowercase without trailing dot,
/// hostname targets lowercase and fully-qualified.
fn normalize(record: Record) -> Record {
    Record {
        fqdn: normalize_domain_name(&record.fqdn),
        data: record.data.canonical(),
        ..record
    }
}

/// Group records by (FQDN, type), preserving first-seen order.
pub fn group(records: impl IntoIterator<Item = Record>) -> RecordSetMap {
    let mut map = RecordSetMap::new();
    for record in records {
        map.insert(normalize(record));
    }
    map
}

/// Whether the set at `key` belongs to the provider rather than the desired state.
///
/// The apex NS set carries the name servers the provider assigned to the zone;
/// it can be neither deleted nor reduced through the record-set API.
pub fn is_provider_managed(key: &RecordKey, zone: &str) -> bool {
    key.record_type == RecordType::Ns && key.fqdn == normalize_domain_name(zone)
}

/// Expand remote record sets into records and group them.
///
/// Empty remote sets contribute no group.
pub fn group_remote(sets: &[RemoteRecordSet]) -> RecordSetMap {
    group(sets.iter().flat_map(|s| s.record_set.to_records()))
}
