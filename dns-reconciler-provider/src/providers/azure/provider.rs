//! Azure DNS `ZoneProvider` implementation

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::providers::common::settle;
use crate::traits::{ErrorContext, ZoneProvider};
use crate::types::{
    FieldType, ProviderCredentialField, ProviderFeatures, ProviderLimits, ProviderMetadata,
    ProviderType, ProviderZone, RecordSet, RecordType, RemoteRecordSet,
};
use crate::utils::name::normalize_domain_name;

use super::convert::{from_native, to_native};
use super::types::{CreateZoneRequest, ListPage, RecordSetRequest, RecordSetResource, Zone};
use super::{AzureProvider, PROVIDER_NAME, RECORD_SET_PAGE_SIZE, ZONE_PAGE_SIZE};

impl AzureProvider {
    /// Type-level metadata, available without an instance.
    pub fn provider_metadata() -> ProviderMetadata {
        let field = |key: &str, label: &str, field_type: FieldType, help: Option<&str>| {
            ProviderCredentialField {
                key: key.to_string(),
                label: label.to_string(),
                field_type,
                help_text: help.map(ToString::to_string),
            }
        };

        ProviderMetadata {
            id: ProviderType::Azure,
            name: "Azure DNS".to_string(),
            description: "Microsoft Azure DNS zones of one resource group".to_string(),
            required_fields: vec![
                field("tenantId", "Tenant ID", FieldType::Text, None),
                field(
                    "clientId",
                    "Client ID",
                    FieldType::Text,
                    Some("Application (client) ID of the service principal"),
                ),
                field("clientSecret", "Client Secret", FieldType::Password, None),
                field("subscriptionId", "Subscription ID", FieldType::Text, None),
                field(
                    "resourceGroup",
                    "Resource Group",
                    FieldType::Text,
                    Some("Resource group holding the DNS zones"),
                ),
            ],
            features: ProviderFeatures {
                create_zones: true,
                txt_multi: true,
                record_types: RecordType::ALL.to_vec(),
            },
            limits: ProviderLimits {
                page_size_zones: ZONE_PAGE_SIZE,
                page_size_record_sets: RECORD_SET_PAGE_SIZE,
            },
        }
    }

    /// Fetch every page of an ARM list starting at `first_url`.
    async fn list_all<T: DeserializeOwned>(
        &self,
        first_url: String,
        ctx: &ErrorContext,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        let mut pages = 0_u32;

        while let Some(url) = next {
            let page: ListPage<T> = self.get(&url, ctx.clone()).await?;
            items.extend(page.value);
            pages += 1;
            next = page.next_link.filter(|link| !link.is_empty());
        }

        log::debug!("[azure] Listed {} items in {pages} page(s)", items.len());
        Ok(items)
    }
}

fn zone_from_native(zone: Zone) -> ProviderZone {
    ProviderZone {
        id: zone.id,
        name: normalize_domain_name(&zone.name),
        name_servers: zone.properties.name_servers,
        record_set_count: zone.properties.number_of_record_sets,
    }
}

#[async_trait]
impl ZoneProvider for AzureProvider {
    fn id(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn metadata(&self) -> ProviderMetadata {
        Self::provider_metadata()
    }

    async fn list_zones(&self) -> Result<Vec<ProviderZone>> {
        let url = self.arm_url(&self.zones_path(), &[("$top", ZONE_PAGE_SIZE.to_string())]);
        let zones: Vec<Zone> = self.list_all(url, &ErrorContext::default()).await?;
        Ok(zones.into_iter().map(zone_from_native).collect())
    }

    async fn create_zone(&self, domain: &str) -> Result<ProviderZone> {
        let domain = normalize_domain_name(domain);
        let url = self.arm_url(&self.zone_path(&domain), &[]);
        let body = CreateZoneRequest {
            location: "global".to_string(),
        };
        let zone: Zone = self.put(&url, &body, ErrorContext::zone(&domain)).await?;
        log::info!("[azure] Created zone {domain}");
        Ok(zone_from_native(zone))
    }

    async fn list_record_sets(&self, zone: &str) -> Result<Vec<RemoteRecordSet>> {
        let zone = normalize_domain_name(zone);
        let url = self.arm_url(
            &format!("{}/recordsets", self.zone_path(&zone)),
            &[("$top", RECORD_SET_PAGE_SIZE.to_string())],
        );
        let resources: Vec<RecordSetResource> =
            self.list_all(url, &ErrorContext::zone(&zone)).await?;

        let mut sets = Vec::with_capacity(resources.len());
        for resource in resources {
            if let Some(set) = from_native(resource, &zone)? {
                sets.push(set);
            }
        }
        Ok(sets)
    }

    async fn upsert_record_set(&self, zone: &str, record_set: &RecordSet) -> Result<()> {
        let zone = normalize_domain_name(zone);
        let body = RecordSetRequest {
            properties: to_native(record_set)?,
        };
        let path = format!(
            "{}/{}/{}",
            self.zone_path(&zone),
            record_set.key.record_type,
            urlencoding::encode(&record_set.name)
        );
        let url = self.arm_url(&path, &[]);

        let _: RecordSetResource = self
            .put(&url, &body, ErrorContext::record(&zone, &record_set.name))
            .await?;
        settle(self.settle_delay).await;
        Ok(())
    }

    async fn delete_record_set(&self, zone: &str, remote_id: &str) -> Result<()> {
        let zone = normalize_domain_name(zone);
        let url = self.arm_url(remote_id, &[]);
        self.delete(&url, ErrorContext::zone(&zone)).await?;
        settle(self.settle_delay).await;
        Ok(())
    }
}
