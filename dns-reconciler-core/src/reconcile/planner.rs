//! Correction planning

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    Correction, CorrectionAction, KeyChange, Record, RecordKey, RecordSet, RemoteRecordSet,
};

use super::grouper::RecordSetMap;

/// Remote sets at `key.fqdn` that cannot coexist with a set of `key.record_type`.
fn conflicting<'a>(
    key: &'a RecordKey,
    existing: &'a [RemoteRecordSet],
) -> impl Iterator<Item = &'a RemoteRecordSet> + 'a {
    existing.iter().filter(move |remote| {
        remote.key().fqdn == key.fqdn && key.record_type.conflicts_with(remote.key().record_type)
    })
}

/// Single TTL of a desired group, or `InconsistentTtl`.
fn uniform_ttl(key: &RecordKey, records: &[Record]) -> CoreResult<u32> {
    let mut ttls: Vec<u32> = records.iter().map(|r| r.ttl).collect();
    ttls.dedup();
    match ttls.as_slice() {
        [ttl] => Ok(*ttl),
        _ => {
            ttls.sort_unstable();
            ttls.dedup();
            Err(CoreError::InconsistentTtl {
                key: key.to_string(),
                ttls,
            })
        }
    }
}

fn delete_action(remote: &RemoteRecordSet) -> CorrectionAction {
    CorrectionAction::Delete {
        remote_id: remote.remote_id.clone(),
        record_type: remote.key().record_type,
        name: remote.record_set.name.clone(),
    }
}

/// Turn changed keys into ordered corrections.
///
/// Per key: a key with no desired records becomes one `Delete` of the matching
/// remote set; otherwise the key becomes `Delete`s for conflicting sets at the
/// same name (CNAME vs A/AAAA) followed by one `Upsert` of the whole set.
/// A remote set already removed by a conflict-clearing delete is not deleted
/// again by its own key.
///
/// Any error aborts planning; no partial plan is returned.
pub fn plan(
    zone: &str,
    changes: &[KeyChange],
    existing: &[RemoteRecordSet],
    desired: &RecordSetMap,
) -> CoreResult<Vec<Correction>> {
    let desired_of = |key: &RecordKey| desired.get(key).filter(|records| !records.is_empty());

    let cleared: HashSet<&str> = changes
        .iter()
        .filter(|change| desired_of(&change.key).is_some())
        .flat_map(|change| conflicting(&change.key, existing))
        .map(|remote| remote.remote_id.as_str())
        .collect();

    let mut corrections = Vec::new();

    for change in changes {
        let key = &change.key;
        let msg = change.messages.join("\n");

        let Some(records) = desired_of(key) else {
            let remote = existing.iter().find(|r| r.key() == key).ok_or_else(|| {
                CoreError::Inconsistency(format!(
                    "no record set found to delete: name '{}' type '{}' in zone {zone}",
                    key.fqdn, key.record_type
                ))
            })?;

            if cleared.contains(remote.remote_id.as_str()) {
                log::debug!("{key}: already removed by a conflict-clearing delete");
                continue;
            }

            corrections.push(Correction {
                key: key.clone(),
                msg,
                action: delete_action(remote),
            });
            continue;
        };

        let ttl = uniform_ttl(key, records)?;

        for remote in conflicting(key, existing) {
            corrections.push(Correction {
                key: key.clone(),
                msg: format!(
                    "DELETE {} {} (conflicts with {})",
                    remote.key().record_type,
                    remote.key().fqdn,
                    key.record_type
                ),
                action: delete_action(remote),
            });
        }

        corrections.push(Correction {
            key: key.clone(),
            msg,
            action: CorrectionAction::Upsert {
                record_set: RecordSet {
                    key: key.clone(),
                    name: records[0].name.clone(),
                    ttl,
                    records: records.iter().map(|r| r.data.clone()).collect(),
                },
            },
        });
    }

    log::debug!(
        "Planned {} correction(s) for {} changed key(s) in {zone}",
        corrections.len(),
        changes.len()
    );

    Ok(corrections)
}
