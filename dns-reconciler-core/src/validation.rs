//! Desired-state validation
//!
//! Turns a [`DomainConfig`] into canonical [`Record`]s, rejecting input that
//! could not be converged safely. Runs before any remote call.

use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};

use dns_reconciler_provider::name::{is_in_zone, normalize_domain_name, relative_to_full_name};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::reconcile::grouper::{group, is_provider_managed};
use crate::types::{DomainConfig, Record, RecordConfig, RecordData, RecordType, DEFAULT_TTL};

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::ValidationError(msg.into())
}

fn check_name(name: &str, what: &str) -> CoreResult<()> {
    if name.is_empty() {
        return Err(invalid(format!("{what} must not be empty")));
    }
    if !name.is_ascii() {
        return Err(invalid(format!(
            "{what} '{name}' is not ASCII; convert it to punycode first"
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid(format!("{what} '{name}' contains whitespace")));
    }
    Ok(())
}

fn check_hostname(value: &str, fqdn: &str) -> CoreResult<()> {
    check_name(value, &format!("target of {fqdn}"))
}

/// Parse the loose fields of a record into typed data.
fn record_data(config: &RecordConfig, record_type: RecordType, fqdn: &str) -> CoreResult<RecordData> {
    let mut fields = config.fields.clone();

    // A single `text` is shorthand for one-string TXT
    if record_type == RecordType::Txt && !fields.contains_key("strings") {
        if let Some(text) = fields.remove("text") {
            fields.insert("strings".to_string(), Value::Array(vec![text]));
        }
    }
    fields.insert(
        "type".to_string(),
        Value::String(record_type.as_str().to_string()),
    );

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| invalid(format!("{record_type} record at {fqdn}: {e}")))
}

fn check_data(data: &RecordData, fqdn: &str) -> CoreResult<()> {
    match data {
        RecordData::A { address } => address
            .trim()
            .parse::<Ipv4Addr>()
            .map(|_| ())
            .map_err(|_| invalid(format!("invalid IPv4 address '{address}' at {fqdn}"))),
        RecordData::AAAA { address } => address
            .trim()
            .parse::<Ipv6Addr>()
            .map(|_| ())
            .map_err(|_| invalid(format!("invalid IPv6 address '{address}' at {fqdn}"))),
        RecordData::CNAME { target } | RecordData::PTR { target } => check_hostname(target, fqdn),
        RecordData::MX { exchange, .. } => check_hostname(exchange, fqdn),
        RecordData::NS { nameserver } => check_hostname(nameserver, fqdn),
        RecordData::SRV { target, .. } => check_hostname(target, fqdn),
        RecordData::TXT { strings } => {
            if strings.is_empty() {
                Err(invalid(format!("TXT record at {fqdn} has no strings")))
            } else {
                Ok(())
            }
        }
        RecordData::CAA { tag, value, .. } => {
            if tag.trim().is_empty() || value.is_empty() {
                Err(invalid(format!("CAA record at {fqdn} needs a tag and a value")))
            } else {
                Ok(())
            }
        }
    }
}

fn to_record(config: &RecordConfig, zone: &str) -> CoreResult<Record> {
    check_name(&config.name, "record name")?;
    let fqdn = relative_to_full_name(&config.name, zone);
    if !is_in_zone(&fqdn, zone) {
        return Err(invalid(format!("record '{}' is outside zone {zone}", config.name)));
    }

    let record_type: RecordType =
        config
            .record_type
            .parse()
            .map_err(|_| CoreError::UnsupportedRecordType {
                name: fqdn.clone(),
                record_type: config.record_type.clone(),
            })?;

    let data = record_data(config, record_type, &fqdn)?;
    check_data(&data, &fqdn)?;

    Ok(Record::from_fqdn(
        &fqdn,
        zone,
        config.ttl.unwrap_or(DEFAULT_TTL),
        data,
    ))
}

/// Validate a domain's desired state and return its records in canonical form.
///
/// Per record: ASCII names inside the zone, a supported type and well-formed
/// type-specific fields. Per record set: no duplicate records and one TTL.
/// Per name: a CNAME stands alone, holds one target and is not at the apex.
pub fn validate_domain(config: &DomainConfig) -> CoreResult<Vec<Record>> {
    let zone = normalize_domain_name(&config.name).to_ascii_lowercase();
    check_name(&zone, "zone name")?;

    let records = config
        .records
        .iter()
        .map(|rc| to_record(rc, &zone))
        .collect::<CoreResult<Vec<_>>>()?;

    let grouped = group(records.iter().cloned());
    let mut cname_names = HashSet::new();
    let mut other_names = HashSet::new();

    for (key, group) in grouped.iter() {
        let mut seen = HashSet::new();
        for record in group {
            if !seen.insert(&record.data) {
                return Err(invalid(format!(
                    "duplicate record {key} {}",
                    record.data.display_value()
                )));
            }
        }

        let mut ttls: Vec<u32> = group.iter().map(|r| r.ttl).collect();
        ttls.sort_unstable();
        ttls.dedup();
        if ttls.len() > 1 {
            return Err(CoreError::InconsistentTtl {
                key: key.to_string(),
                ttls,
            });
        }

        if is_provider_managed(key, &zone) {
            return Err(invalid(format!(
                "NS records at the zone apex {zone} are managed by the provider"
            )));
        }

        if key.record_type == RecordType::Cname {
            if group.len() > 1 {
                return Err(invalid(format!("{key} has more than one target")));
            }
            if key.fqdn == zone {
                return Err(invalid(format!("CNAME not allowed at the zone apex {zone}")));
            }
            cname_names.insert(key.fqdn.as_str());
        } else {
            other_names.insert(key.fqdn.as_str());
        }
    }

    if let Some(name) = cname_names.intersection(&other_names).next() {
        return Err(invalid(format!(
            "CNAME at {name} cannot coexist with other records"
        )));
    }

    Ok(records)
}
