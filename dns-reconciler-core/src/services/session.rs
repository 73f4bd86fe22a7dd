//! Reconciliation session

use std::sync::Arc;

use dns_reconciler_provider::name::normalize_domain_name;
use dns_reconciler_provider::ZoneProvider;

use crate::error::{CoreError, CoreResult};
use crate::reconcile::{changed_keys, group, group_remote, is_provider_managed, plan};
use crate::types::{ApplyReport, CorrectionPlan, DomainConfig, ProviderZone, ReconcileOptions};
use crate::validation::validate_domain;

use super::executor::apply_corrections;

/// One reconciliation run against one provider account.
///
/// Holds the provider handle, the run options and the zone list fetched at
/// construction. There is no state shared between sessions.
pub struct ReconcileSession {
    provider: Arc<dyn ZoneProvider>,
    options: ReconcileOptions,
    zones: Vec<ProviderZone>,
}

impl ReconcileSession {
    /// Open a session and fetch the zone list once.
    pub async fn connect(
        provider: Arc<dyn ZoneProvider>,
        options: ReconcileOptions,
    ) -> CoreResult<Self> {
        let zones = provider.list_zones().await?;
        log::debug!("[{}] {} zone(s) visible", provider.id(), zones.len());
        Ok(Self {
            provider,
            options,
            zones,
        })
    }

    pub fn provider(&self) -> &Arc<dyn ZoneProvider> {
        &self.provider
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Zones known to this session, including ones it created.
    pub fn zones(&self) -> &[ProviderZone] {
        &self.zones
    }

    fn find_zone(&self, domain: &str) -> Option<&ProviderZone> {
        let domain = normalize_domain_name(domain);
        self.zones
            .iter()
            .find(|z| normalize_domain_name(&z.name) == domain)
    }

    /// Authoritative name servers of a known zone.
    pub fn nameservers(&self, domain: &str) -> CoreResult<Vec<String>> {
        self.find_zone(domain)
            .map(|z| z.name_servers.clone())
            .ok_or_else(|| CoreError::DomainNotFound(normalize_domain_name(domain)))
    }

    /// Create the zone unless it is already known.
    pub async fn ensure_zone_exists(&mut self, domain: &str) -> CoreResult<()> {
        if self.find_zone(domain).is_some() {
            return Ok(());
        }

        let domain = normalize_domain_name(domain);
        log::info!("[{}] Adding zone for {domain}", self.provider.id());
        let zone = self.provider.create_zone(&domain).await?;
        self.zones.push(zone);
        Ok(())
    }

    /// Compute the corrections that converge the zone on `config`.
    ///
    /// Validates the desired state, reads the remote record sets, diffs them
    /// and plans the corrections. Nothing is mutated. The apex NS set is left
    /// to the provider and never appears in a plan.
    pub async fn get_corrections(&self, config: &DomainConfig) -> CoreResult<CorrectionPlan> {
        let records = validate_domain(config)?;

        let metadata = self.provider.metadata();
        if let Some(record) = records.iter().find(|r| !metadata.supports(r.record_type())) {
            return Err(CoreError::UnsupportedRecordType {
                name: record.fqdn.clone(),
                record_type: record.record_type().to_string(),
            });
        }

        let zone = self
            .find_zone(&config.name)
            .cloned()
            .ok_or_else(|| CoreError::DomainNotFound(normalize_domain_name(&config.name)))?;

        let existing: Vec<_> = self
            .provider
            .list_record_sets(&zone.name)
            .await?
            .into_iter()
            .filter(|set| !is_provider_managed(set.key(), &zone.name))
            .collect();
        let current = group_remote(&existing);
        let desired = group(records);

        let changes = changed_keys(&current, &desired);
        let corrections = plan(&zone.name, &changes, &existing, &desired)?;

        log::debug!(
            "[{}] {}: {} remote set(s), {} desired set(s), {} correction(s)",
            self.provider.id(),
            zone.name,
            current.len(),
            desired.len(),
            corrections.len()
        );

        Ok(CorrectionPlan {
            zone,
            changes,
            corrections,
        })
    }

    /// Execute a plan produced by [`get_corrections`](Self::get_corrections).
    pub async fn apply(&self, plan: &CorrectionPlan) -> ApplyReport {
        apply_corrections(
            self.provider.as_ref(),
            &plan.zone.name,
            &plan.corrections,
            self.options.action_timeout,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::*;
    use crate::test_utils::{a, cname, txt, MockZoneProvider};
    use crate::types::{ChangeKind, CorrectionAction, RecordData, RecordKey, RecordType};

    const ZONE: &str = "example.com";

    fn config(records: Value) -> DomainConfig {
        serde_json::from_value(json!({ "name": ZONE, "records": records })).unwrap()
    }

    async fn setup() -> (Arc<MockZoneProvider>, ReconcileSession) {
        let mock = Arc::new(MockZoneProvider::new());
        mock.add_zone(ZONE).await;
        let session = ReconcileSession::connect(mock.clone(), ReconcileOptions::default())
            .await
            .unwrap();
        (mock, session)
    }

    #[tokio::test]
    async fn matching_state_needs_no_corrections() {
        let (mock, session) = setup().await;
        mock.seed(ZONE, "www", 300, vec![a("192.0.2.1")]).await;
        mock.seed(ZONE, "alias", 300, vec![cname("www.example.com.")]).await;

        let plan = session
            .get_corrections(&config(json!([
                { "name": "www", "type": "A", "address": "192.0.2.1" },
                { "name": "alias", "type": "CNAME", "target": "WWW.example.com" }
            ])))
            .await
            .unwrap();

        assert!(plan.is_empty());
        assert!(plan.changes.is_empty());
    }

    #[tokio::test]
    async fn pure_create() {
        let (mock, session) = setup().await;

        let plan = session
            .get_corrections(&config(json!([
                { "name": "www", "type": "A", "address": "192.0.2.1" },
                { "name": "www", "type": "A", "address": "192.0.2.2" }
            ])))
            .await
            .unwrap();

        assert_eq!(plan.corrections.len(), 1);
        assert_eq!(plan.changes[0].kind, ChangeKind::Create);
        let CorrectionAction::Upsert { record_set } = &plan.corrections[0].action else {
            panic!("expected upsert");
        };
        assert_eq!(record_set.records.len(), 2);

        let report = session.apply(&plan).await;
        assert!(report.is_success());
        assert_eq!(mock.records(ZONE).await.len(), 2);
    }

    #[tokio::test]
    async fn pure_delete() {
        let (mock, session) = setup().await;
        mock.seed(ZONE, "old", 300, vec![a("192.0.2.9")]).await;

        let plan = session.get_corrections(&config(json!([]))).await.unwrap();
        assert_eq!(plan.corrections.len(), 1);
        assert!(plan.corrections[0].is_delete());

        assert!(session.apply(&plan).await.is_success());
        assert_eq!(
            mock.ops().await,
            vec!["DELETE /zones/example.com/A/old".to_string()]
        );
        assert!(mock.records(ZONE).await.is_empty());
    }

    #[tokio::test]
    async fn cname_replaces_a_in_order() {
        let (mock, session) = setup().await;
        mock.seed(ZONE, "www", 300, vec![a("192.0.2.1")]).await;

        let plan = session
            .get_corrections(&config(json!([
                { "name": "www", "type": "CNAME", "target": "target.example.net." }
            ])))
            .await
            .unwrap();

        assert_eq!(plan.corrections.len(), 2);
        assert!(session.apply(&plan).await.is_success());
        assert_eq!(
            mock.ops().await,
            vec![
                "DELETE /zones/example.com/A/www".to_string(),
                "UPSERT www.example.com CNAME".to_string()
            ]
        );
        let records = mock.records(ZONE).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_type(), RecordType::Cname);
    }

    #[tokio::test]
    async fn a_replaces_cname_in_order() {
        let (mock, session) = setup().await;
        mock.seed(ZONE, "www", 300, vec![cname("target.example.net.")]).await;

        let plan = session
            .get_corrections(&config(json!([
                { "name": "www", "type": "A", "address": "192.0.2.1" },
                { "name": "www", "type": "AAAA", "address": "2001:db8::1" }
            ])))
            .await
            .unwrap();

        assert!(session.apply(&plan).await.is_success());
        let ops = mock.ops().await;
        let position = |wanted: &str| ops.iter().position(|op| op == wanted).unwrap();
        let delete = position("DELETE /zones/example.com/CNAME/www");
        assert!(delete < position("UPSERT www.example.com A"));
        assert!(delete < position("UPSERT www.example.com AAAA"));
        // both address keys clear the CNAME themselves; the repeat delete is a no-op
        assert_eq!(ops.iter().filter(|op| op.starts_with("DELETE")).count(), 2);
        assert_eq!(mock.records(ZONE).await.len(), 2);
    }

    #[tokio::test]
    async fn multi_value_order_is_irrelevant() {
        let (mock, session) = setup().await;
        mock.seed(ZONE, "@", 300, vec![txt("v=spf1 -all"), txt("site-verification=abc")])
            .await;

        let plan = session
            .get_corrections(&config(json!([
                { "name": "@", "type": "TXT", "text": "site-verification=abc" },
                { "name": "@", "type": "TXT", "text": "v=spf1 -all" }
            ])))
            .await
            .unwrap();

        assert!(plan.is_empty());
    }

    #[tokio::test]
    async fn ttl_only_change_is_single_upsert() {
        let (mock, session) = setup().await;
        mock.seed(ZONE, "www", 300, vec![a("192.0.2.1")]).await;

        let plan = session
            .get_corrections(&config(json!([
                { "name": "www", "type": "A", "ttl": 3600, "address": "192.0.2.1" }
            ])))
            .await
            .unwrap();

        assert_eq!(plan.corrections.len(), 1);
        assert_eq!(plan.changes[0].kind, ChangeKind::Update);
        let CorrectionAction::Upsert { record_set } = &plan.corrections[0].action else {
            panic!("expected upsert");
        };
        assert_eq!(record_set.ttl, 3600);
    }

    #[tokio::test]
    async fn replay_after_apply_is_empty() {
        let (mock, session) = setup().await;
        mock.seed(ZONE, "www", 300, vec![a("192.0.2.1")]).await;
        mock.seed(ZONE, "stale", 300, vec![txt("gone")]).await;

        let desired = config(json!([
            { "name": "www", "type": "CNAME", "target": "cdn.example.net" },
            { "name": "@", "type": "MX", "preference": 10, "exchange": "Mail.Example.com" },
            { "name": "_sip._tcp", "type": "SRV", "priority": 1, "weight": 2, "port": 5060, "target": "sip.example.com" },
            { "name": "@", "type": "CAA", "flags": 0, "tag": "Issue", "value": "letsencrypt.org" },
            { "name": "@", "type": "TXT", "strings": ["part one", "part two"] }
        ]));

        let plan = session.get_corrections(&desired).await.unwrap();
        assert!(!plan.is_empty());
        assert!(session.apply(&plan).await.is_success());
        let converged = mock.records(ZONE).await;

        // re-running every correction is harmless
        assert!(session.apply(&plan).await.is_success());
        assert_eq!(mock.records(ZONE).await, converged);

        let replay = session.get_corrections(&desired).await.unwrap();
        assert!(replay.is_empty(), "unexpected corrections: {:?}", replay.corrections);
    }

    #[tokio::test]
    async fn assigned_apex_ns_is_left_alone() {
        let (mock, session) = setup().await;
        mock.seed(
            ZONE,
            "@",
            172_800,
            vec![
                RecordData::NS {
                    nameserver: "ns1-01.azure-dns.com.".to_string(),
                },
                RecordData::NS {
                    nameserver: "ns2-01.azure-dns.net.".to_string(),
                },
            ],
        )
        .await;
        mock.seed(ZONE, "www", 300, vec![a("192.0.2.1")]).await;

        let desired = config(json!([
            { "name": "www", "type": "A", "address": "192.0.2.1" }
        ]));
        let plan = session.get_corrections(&desired).await.unwrap();
        assert!(plan.is_empty(), "unexpected corrections: {:?}", plan.corrections);

        // an empty desired state removes www but still keeps the apex NS set
        let plan = session.get_corrections(&config(json!([]))).await.unwrap();
        assert_eq!(plan.corrections.len(), 1);
        assert!(session.apply(&plan).await.is_success());
        assert_eq!(
            mock.ops().await,
            vec!["DELETE /zones/example.com/A/www".to_string()]
        );
        assert_eq!(mock.records(ZONE).await.len(), 2);
    }

    #[tokio::test]
    async fn unknown_zone_is_domain_not_found() {
        let (_mock, session) = setup().await;
        let result = session
            .get_corrections(
                &serde_json::from_value(json!({ "name": "other.org", "records": [] })).unwrap(),
            )
            .await;
        assert!(matches!(result, Err(CoreError::DomainNotFound(ref d)) if d == "other.org"));
        assert!(matches!(
            session.nameservers("other.org"),
            Err(CoreError::DomainNotFound(_))
        ));
    }

    #[tokio::test]
    async fn nameservers_of_known_zone() {
        let (_mock, session) = setup().await;
        let ns = session.nameservers("Example.COM.").unwrap();
        assert_eq!(ns, vec!["ns1.mock-dns.net.", "ns2.mock-dns.net."]);
    }

    #[tokio::test]
    async fn ensure_zone_exists_creates_once() {
        let (mock, mut session) = setup().await;

        session.ensure_zone_exists(ZONE).await.unwrap();
        assert!(mock.ops().await.is_empty());

        session.ensure_zone_exists("New.org.").await.unwrap();
        session.ensure_zone_exists("new.org").await.unwrap();
        assert_eq!(mock.ops().await, vec!["CREATE_ZONE new.org".to_string()]);
        assert!(session.nameservers("new.org").is_ok());
    }

    #[tokio::test]
    async fn unsupported_by_provider_is_rejected_before_listing() {
        let mock = Arc::new(MockZoneProvider::with_record_types(vec![
            RecordType::A,
            RecordType::Cname,
        ]));
        mock.add_zone(ZONE).await;
        let session = ReconcileSession::connect(mock.clone(), ReconcileOptions::default())
            .await
            .unwrap();

        let result = session
            .get_corrections(&config(json!([
                { "name": "@", "type": "CAA", "flags": 0, "tag": "issue", "value": "ca.example" }
            ])))
            .await;
        assert!(
            matches!(&result, Err(CoreError::UnsupportedRecordType { record_type, .. }) if record_type == "CAA"),
            "unexpected result: {:?}",
            result.map(|p| p.corrections)
        );
    }

    #[tokio::test]
    async fn invalid_input_never_mutates() {
        let (mock, session) = setup().await;
        mock.seed(ZONE, "www", 300, vec![a("192.0.2.1")]).await;

        let result = session
            .get_corrections(&config(json!([
                { "name": "www", "type": "A", "ttl": 60, "address": "192.0.2.1" },
                { "name": "www", "type": "A", "ttl": 120, "address": "192.0.2.2" }
            ])))
            .await;
        assert!(matches!(result, Err(CoreError::InconsistentTtl { .. })));
        assert!(mock.ops().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn action_timeout_is_reported() {
        let mock = Arc::new(MockZoneProvider::new());
        mock.add_zone(ZONE).await;
        mock.set_upsert_delay(Some(Duration::from_secs(600))).await;
        let session = ReconcileSession::connect(
            mock.clone(),
            ReconcileOptions::default().action_timeout(Duration::from_secs(10)),
        )
        .await
        .unwrap();

        let plan = session
            .get_corrections(&config(json!([
                { "name": "www", "type": "A", "address": "192.0.2.1" }
            ])))
            .await
            .unwrap();
        let report = session.apply(&plan).await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].key,
            RecordKey::new("www.example.com", RecordType::A)
        );
        assert!(matches!(
            report.failures[0].error,
            CoreError::Timeout { seconds: 10, .. }
        ));
    }

    #[tokio::test]
    async fn remote_payloads_are_compared_canonically() {
        let (mock, session) = setup().await;
        mock.seed(
            ZONE,
            "@",
            300,
            vec![RecordData::MX {
                preference: 10,
                exchange: "MAIL.example.com".to_string(),
            }],
        )
        .await;

        let plan = session
            .get_corrections(&config(json!([
                { "name": "@", "type": "MX", "preference": 10, "exchange": "mail.example.com." }
            ])))
            .await
            .unwrap();
        assert!(plan.is_empty());
    }
}
