//! Test helpers
//!
//! An in-memory [`ZoneProvider`] with operation logging and failure injection.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use dns_reconciler_provider::{
    ProviderError, ProviderFeatures, ProviderLimits, ProviderMetadata, ProviderType, ZoneProvider,
};
use tokio::sync::RwLock;

use crate::types::{
    ProviderZone, Record, RecordData, RecordKey, RecordSet, RecordType, RemoteRecordSet,
};

const MOCK: &str = "mock";

// ===== MockZoneProvider =====

pub struct MockZoneProvider {
    zones: RwLock<Vec<ProviderZone>>,
    /// Record sets per zone, in insertion order
    sets: RwLock<HashMap<String, Vec<RemoteRecordSet>>>,
    /// Mutations in call order: `"UPSERT <key>"` / `"DELETE <remote id>"`
    ops: RwLock<Vec<String>>,
    /// Keys whose mutations fail with a network error
    failing: RwLock<HashSet<RecordKey>>,
    /// Artificial latency for every upsert
    upsert_delay: RwLock<Option<Duration>>,
    record_types: Vec<RecordType>,
}

impl MockZoneProvider {
    pub fn new() -> Self {
        Self::with_record_types(RecordType::ALL.to_vec())
    }

    pub fn with_record_types(record_types: Vec<RecordType>) -> Self {
        Self {
            zones: RwLock::new(Vec::new()),
            sets: RwLock::new(HashMap::new()),
            ops: RwLock::new(Vec::new()),
            failing: RwLock::new(HashSet::new()),
            upsert_delay: RwLock::new(None),
            record_types,
        }
    }

    fn remote_id(zone: &str, set: &RecordSet) -> String {
        format!("/zones/{zone}/{}/{}", set.key.record_type, set.name)
    }

    pub async fn add_zone(&self, name: &str) {
        self.zones.write().await.push(zone(name));
        self.sets.write().await.entry(name.to_string()).or_default();
    }

    /// Seed a remote record set without logging an operation.
    pub async fn seed(&self, zone: &str, label: &str, ttl: u32, records: Vec<RecordData>) {
        let set = record_set(zone, label, ttl, records);
        let remote = RemoteRecordSet {
            remote_id: Self::remote_id(zone, &set),
            record_set: set,
        };
        self.sets
            .write()
            .await
            .entry(zone.to_string())
            .or_default()
            .push(remote);
    }

    /// Make every upsert or delete touching `key` fail.
    pub async fn fail_on(&self, key: RecordKey) {
        self.failing.write().await.insert(key);
    }

    pub async fn set_upsert_delay(&self, delay: Option<Duration>) {
        *self.upsert_delay.write().await = delay;
    }

    pub async fn ops(&self) -> Vec<String> {
        self.ops.read().await.clone()
    }

    /// Current records of a zone, flattened.
    pub async fn records(&self, zone: &str) -> Vec<Record> {
        self.sets
            .read()
            .await
            .get(zone)
            .map(|sets| {
                sets.iter()
                    .flat_map(|s| s.record_set.to_records())
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn check_failure(&self, key: &RecordKey) -> dns_reconciler_provider::Result<()> {
        if self.failing.read().await.contains(key) {
            return Err(ProviderError::NetworkError {
                provider: MOCK.to_string(),
                detail: format!("injected failure for {key}"),
            });
        }
        Ok(())
    }

    fn not_found(zone: &str) -> ProviderError {
        ProviderError::DomainNotFound {
            provider: MOCK.to_string(),
            domain: zone.to_string(),
            raw_message: None,
        }
    }
}

#[async_trait]
impl ZoneProvider for MockZoneProvider {
    fn id(&self) -> &'static str {
        MOCK
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Azure,
            name: "Mock".to_string(),
            description: "In-memory zone store".to_string(),
            required_fields: Vec::new(),
            features: ProviderFeatures {
                create_zones: true,
                txt_multi: true,
                record_types: self.record_types.clone(),
            },
            limits: ProviderLimits {
                page_size_zones: 100,
                page_size_record_sets: 100,
            },
        }
    }

    async fn list_zones(&self) -> dns_reconciler_provider::Result<Vec<ProviderZone>> {
        Ok(self.zones.read().await.clone())
    }

    async fn create_zone(&self, domain: &str) -> dns_reconciler_provider::Result<ProviderZone> {
        self.ops.write().await.push(format!("CREATE_ZONE {domain}"));
        self.add_zone(domain).await;
        Ok(zone(domain))
    }

    async fn list_record_sets(
        &self,
        zone: &str,
    ) -> dns_reconciler_provider::Result<Vec<RemoteRecordSet>> {
        self.sets
            .read()
            .await
            .get(zone)
            .cloned()
            .ok_or_else(|| Self::not_found(zone))
    }

    async fn upsert_record_set(
        &self,
        zone: &str,
        record_set: &RecordSet,
    ) -> dns_reconciler_provider::Result<()> {
        let delay = *self.upsert_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.ops
            .write()
            .await
            .push(format!("UPSERT {}", record_set.key));
        self.check_failure(&record_set.key).await?;

        let mut sets = self.sets.write().await;
        let sets = sets.get_mut(zone).ok_or_else(|| Self::not_found(zone))?;
        let remote = RemoteRecordSet {
            remote_id: Self::remote_id(zone, record_set),
            record_set: record_set.clone(),
        };
        match sets.iter_mut().find(|s| s.key() == &record_set.key) {
            Some(existing) => *existing = remote,
            None => sets.push(remote),
        }
        Ok(())
    }

    async fn delete_record_set(
        &self,
        zone: &str,
        remote_id: &str,
    ) -> dns_reconciler_provider::Result<()> {
        self.ops.write().await.push(format!("DELETE {remote_id}"));

        let target = self
            .sets
            .read()
            .await
            .get(zone)
            .and_then(|sets| sets.iter().find(|s| s.remote_id == remote_id))
            .map(|s| s.key().clone());
        if let Some(key) = target {
            self.check_failure(&key).await?;
        }

        let mut sets = self.sets.write().await;
        let sets = sets.get_mut(zone).ok_or_else(|| Self::not_found(zone))?;
        sets.retain(|s| s.remote_id != remote_id);
        Ok(())
    }
}

// ===== Factories =====

pub fn zone(name: &str) -> ProviderZone {
    ProviderZone {
        id: format!("/zones/{name}"),
        name: name.to_string(),
        name_servers: vec![
            format!("ns1.{MOCK}-dns.net."),
            format!("ns2.{MOCK}-dns.net."),
        ],
        record_set_count: None,
    }
}

pub fn record_set(zone: &str, label: &str, ttl: u32, records: Vec<RecordData>) -> RecordSet {
    let fqdn = if label == "@" {
        zone.to_string()
    } else {
        format!("{label}.{zone}")
    };
    RecordSet {
        key: RecordKey::new(&fqdn, records[0].record_type()),
        name: label.to_string(),
        ttl,
        records: records.into_iter().map(RecordData::canonical).collect(),
    }
}

pub fn a(address: &str) -> RecordData {
    RecordData::A {
        address: address.to_string(),
    }
}

pub fn cname(target: &str) -> RecordData {
    RecordData::CNAME {
        target: target.to_string(),
    }
}

pub fn txt(text: &str) -> RecordData {
    RecordData::TXT {
        strings: vec![text.to_string()],
    }
}
