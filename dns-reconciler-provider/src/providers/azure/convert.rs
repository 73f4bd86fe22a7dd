//! Translation between Azure record sets and the canonical record model.

use crate::error::{ProviderError, Result};
use crate::providers::common::parse_record_type;
use crate::types::{RecordData, RecordKey, RecordSet, RecordType, RemoteRecordSet};
use crate::utils::name::{full_name_to_relative, relative_to_full_name};

use super::PROVIDER_NAME;
use super::types::{
    AaaaRecord, ARecord, CaaRecord, CnameRecord, MxRecord, NsRecord, PtrRecord,
    RecordSetProperties, RecordSetResource, SrvRecord, TxtRecord,
};

const NATIVE_TYPE_PREFIX: &str = "Microsoft.Network/dnszones/";

/// Extracts the record type mnemonic from an ARM resource type
/// (`Microsoft.Network/dnszones/CNAME` -> `CNAME`).
pub(crate) fn native_type_suffix(resource_type: &str) -> Option<&str> {
    let (prefix, rest) = resource_type.split_at_checked(NATIVE_TYPE_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(NATIVE_TYPE_PREFIX)
        .then_some(rest)
        .filter(|s| !s.is_empty())
}

fn parse_error(detail: impl Into<String>) -> ProviderError {
    ProviderError::ParseError {
        provider: PROVIDER_NAME.to_string(),
        detail: detail.into(),
    }
}

fn narrow<T: TryFrom<i64>>(value: i64, field: &str, fqdn: &str) -> Result<T> {
    T::try_from(value).map_err(|_| parse_error(format!("{field} {value} out of range at {fqdn}")))
}

/// Converts a listed record set into canonical form.
///
/// Returns `Ok(None)` for SOA and for types the record model does not cover.
pub(crate) fn from_native(resource: RecordSetResource, zone: &str) -> Result<Option<RemoteRecordSet>> {
    let Some(suffix) = native_type_suffix(&resource.resource_type) else {
        return Err(parse_error(format!(
            "unexpected resource type '{}'",
            resource.resource_type
        )));
    };
    if suffix.eq_ignore_ascii_case("SOA") {
        return Ok(None);
    }
    let record_type = match parse_record_type(suffix, PROVIDER_NAME) {
        Ok(t) => t,
        Err(_) => {
            log::warn!("[azure] Skipping record set {} of unsupported type {suffix}", resource.id);
            return Ok(None);
        }
    };

    let props = resource.properties;
    let fqdn = props
        .fqdn
        .clone()
        .unwrap_or_else(|| relative_to_full_name(&resource.name, zone));
    let key = RecordKey::new(&fqdn, record_type);
    let ttl = props
        .ttl
        .ok_or_else(|| parse_error(format!("record set {} has no TTL", resource.id)))?;
    let ttl: u32 = narrow(ttl, "TTL", &key.fqdn)?;

    let records = records_from_native(record_type, props, &key.fqdn)?
        .into_iter()
        .map(RecordData::canonical)
        .collect();

    Ok(Some(RemoteRecordSet {
        remote_id: resource.id,
        record_set: RecordSet {
            name: full_name_to_relative(&key.fqdn, zone),
            key,
            ttl,
            records,
        },
    }))
}

fn records_from_native(
    record_type: RecordType,
    props: RecordSetProperties,
    fqdn: &str,
) -> Result<Vec<RecordData>> {
    let records = match record_type {
        RecordType::A => props
            .a_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| RecordData::A {
                address: r.ipv4_address,
            })
            .collect(),
        RecordType::Aaaa => props
            .aaaa_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| RecordData::AAAA {
                address: r.ipv6_address,
            })
            .collect(),
        RecordType::Cname => props
            .cname_record
            .into_iter()
            .map(|r| RecordData::CNAME { target: r.cname })
            .collect(),
        RecordType::Mx => props
            .mx_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| {
                Ok(RecordData::MX {
                    preference: narrow(r.preference, "MX preference", fqdn)?,
                    exchange: r.exchange,
                })
            })
            .collect::<Result<_>>()?,
        RecordType::Ns => props
            .ns_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| RecordData::NS {
                nameserver: r.nsdname,
            })
            .collect(),
        RecordType::Ptr => props
            .ptr_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| RecordData::PTR { target: r.ptrdname })
            .collect(),
        RecordType::Srv => props
            .srv_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| {
                Ok(RecordData::SRV {
                    priority: narrow(r.priority, "SRV priority", fqdn)?,
                    weight: narrow(r.weight, "SRV weight", fqdn)?,
                    port: narrow(r.port, "SRV port", fqdn)?,
                    target: r.target,
                })
            })
            .collect::<Result<_>>()?,
        RecordType::Txt => props
            .txt_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| RecordData::TXT { strings: r.value })
            .collect(),
        RecordType::Caa => props
            .caa_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| {
                Ok(RecordData::CAA {
                    flags: narrow(r.flags, "CAA flags", fqdn)?,
                    tag: r.tag,
                    value: r.value,
                })
            })
            .collect::<Result<_>>()?,
    };
    Ok(records)
}

fn invalid_set(record_set: &RecordSet, detail: impl Into<String>) -> ProviderError {
    ProviderError::InvalidParameter {
        provider: PROVIDER_NAME.to_string(),
        param: record_set.key.to_string(),
        detail: detail.into(),
    }
}

/// Builds the PUT properties for a canonical record set.
pub(crate) fn to_native(record_set: &RecordSet) -> Result<RecordSetProperties> {
    if record_set.records.is_empty() {
        return Err(invalid_set(record_set, "record set has no records"));
    }
    if record_set.key.record_type == RecordType::Cname && record_set.records.len() > 1 {
        return Err(invalid_set(record_set, "a CNAME record set holds exactly one record"));
    }

    let mut props = RecordSetProperties {
        ttl: Some(i64::from(record_set.ttl)),
        ..RecordSetProperties::default()
    };

    for data in &record_set.records {
        if data.record_type() != record_set.key.record_type {
            return Err(invalid_set(
                record_set,
                format!("{} record in a {} set", data.record_type(), record_set.key.record_type),
            ));
        }
        match data.clone() {
            RecordData::A { address } => props
                .a_records
                .get_or_insert_with(Vec::new)
                .push(ARecord {
                    ipv4_address: address,
                }),
            RecordData::AAAA { address } => props
                .aaaa_records
                .get_or_insert_with(Vec::new)
                .push(AaaaRecord {
                    ipv6_address: address,
                }),
            RecordData::CNAME { target } => {
                props.cname_record = Some(CnameRecord { cname: target });
            }
            RecordData::MX {
                preference,
                exchange,
            } => props.mx_records.get_or_insert_with(Vec::new).push(MxRecord {
                preference: i64::from(preference),
                exchange,
            }),
            RecordData::NS { nameserver } => props
                .ns_records
                .get_or_insert_with(Vec::new)
                .push(NsRecord {
                    nsdname: nameserver,
                }),
            RecordData::PTR { target } => props
                .ptr_records
                .get_or_insert_with(Vec::new)
                .push(PtrRecord { ptrdname: target }),
            RecordData::SRV {
                priority,
                weight,
                port,
                target,
            } => props.srv_records.get_or_insert_with(Vec::new).push(SrvRecord {
                priority: i64::from(priority),
                weight: i64::from(weight),
                port: i64::from(port),
                target,
            }),
            RecordData::TXT { strings } => props
                .txt_records
                .get_or_insert_with(Vec::new)
                .push(TxtRecord { value: strings }),
            RecordData::CAA { flags, tag, value } => props
                .caa_records
                .get_or_insert_with(Vec::new)
                .push(CaaRecord {
                    flags: i64::from(flags),
                    tag,
                    value,
                }),
        }
    }

    Ok(props)
}
