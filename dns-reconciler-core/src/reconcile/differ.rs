//! Desired vs existing comparison

use std::collections::HashMap;

use crate::types::{ChangeKind, KeyChange, Record, RecordData, RecordKey};

use super::grouper::RecordSetMap;

/// Multiset equality of `(ttl, payload)` pairs.
fn same_records(existing: &[Record], desired: &[Record]) -> bool {
    if existing.len() != desired.len() {
        return false;
    }
    let mut counts: HashMap<(u32, &RecordData), i64> = HashMap::new();
    for r in existing {
        *counts.entry((r.ttl, &r.data)).or_default() += 1;
    }
    for r in desired {
        *counts.entry((r.ttl, &r.data)).or_default() -= 1;
    }
    counts.values().all(|&n| n == 0)
}

fn describe(verb: &str, key: &RecordKey, record: &Record) -> String {
    format!(
        "{verb} {} {} {} ttl={}",
        key.record_type,
        key.fqdn,
        record.data.display_value(),
        record.ttl
    )
}

fn summarize(records: &[Record]) -> String {
    let values: Vec<String> = records.iter().map(|r| r.data.display_value()).collect();
    let ttl = records.first().map_or(0, |r| r.ttl);
    format!("[{}] ttl={ttl}", values.join(", "))
}

/// Keys whose record sets differ between `existing` and `desired`.
///
/// Order: desired keys in desired order, then existing-only keys in existing
/// order. Keys whose TTL and record multiset are equal are never reported.
pub fn changed_keys(existing: &RecordSetMap, desired: &RecordSetMap) -> Vec<KeyChange> {
    let mut changes = Vec::new();

    for (key, wanted) in desired.iter() {
        match existing.get(key) {
            None => changes.push(KeyChange {
                key: key.clone(),
                kind: ChangeKind::Create,
                messages: wanted.iter().map(|r| describe("CREATE", key, r)).collect(),
            }),
            Some(current) if !same_records(current, wanted) => changes.push(KeyChange {
                key: key.clone(),
                kind: ChangeKind::Update,
                messages: vec![format!(
                    "MODIFY {} {}: {} -> {}",
                    key.record_type,
                    key.fqdn,
                    summarize(current),
                    summarize(wanted)
                )],
            }),
            Some(_) => {}
        }
    }

    for (key, current) in existing.iter() {
        if !desired.contains_key(key) {
            changes.push(KeyChange {
                key: key.clone(),
                kind: ChangeKind::Delete,
                messages: current.iter().map(|r| describe("DELETE", key, r)).collect(),
            });
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::grouper::group;
    use crate::types::RecordType;

    fn rec(fqdn: &str, ttl: u32, data: RecordData) -> Record {
        Record {
            name: String::new(),
            fqdn: fqdn.to_string(),
            ttl,
            data,
        }
    }

    fn txt(s: &str) -> RecordData {
        RecordData::TXT {
            strings: vec![s.to_string()],
        }
    }

    fn a(address: &str) -> RecordData {
        RecordData::A {
            address: address.to_string(),
        }
    }

    #[test]
    fn identical_sets_are_not_reported() {
        let existing = group(vec![rec("example.com", 300, a("192.0.2.1"))]);
        let desired = group(vec![rec("example.com.", 300, a("192.0.2.1"))]);
        assert!(changed_keys(&existing, &desired).is_empty());
    }

    #[test]
    fn order_of_values_is_irrelevant() {
        let existing = group(vec![
            rec("example.com", 300, txt("a")),
            rec("example.com", 300, txt("b")),
        ]);
        let desired = group(vec![
            rec("example.com", 300, txt("b")),
            rec("example.com", 300, txt("a")),
        ]);
        assert!(changed_keys(&existing, &desired).is_empty());
    }

    #[test]
    fn duplicates_count_as_multiset() {
        let existing = group(vec![
            rec("example.com", 300, txt("a")),
            rec("example.com", 300, txt("a")),
        ]);
        let desired = group(vec![
            rec("example.com", 300, txt("a")),
            rec("example.com", 300, txt("b")),
        ]);
        let changes = changed_keys(&existing, &desired);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Update);
    }

    #[test]
    fn ttl_only_change_is_update() {
        let existing = group(vec![rec("www.example.com", 300, a("192.0.2.1"))]);
        let desired = group(vec![rec("www.example.com", 600, a("192.0.2.1"))]);
        let changes = changed_keys(&existing, &desired);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Update);
        assert_eq!(
            changes[0].messages,
            vec!["MODIFY A www.example.com: [192.0.2.1] ttl=300 -> [192.0.2.1] ttl=600"]
        );
    }

    #[test]
    fn create_and_delete_messages() {
        let existing = group(vec![rec("old.example.com", 300, a("192.0.2.9"))]);
        let desired = group(vec![
            rec("new.example.com", 300, a("192.0.2.1")),
            rec("new.example.com", 300, a("192.0.2.2")),
        ]);
        let changes = changed_keys(&existing, &desired);
        assert_eq!(changes.len(), 2);

        assert_eq!(changes[0].kind, ChangeKind::Create);
        assert_eq!(
            changes[0].key,
            RecordKey::new("new.example.com", RecordType::A)
        );
        assert_eq!(
            changes[0].messages,
            vec![
                "CREATE A new.example.com 192.0.2.1 ttl=300",
                "CREATE A new.example.com 192.0.2.2 ttl=300"
            ]
        );

        assert_eq!(changes[1].kind, ChangeKind::Delete);
        assert_eq!(
            changes[1].messages,
            vec!["DELETE A old.example.com 192.0.2.9 ttl=300"]
        );
    }

    #[test]
    fn output_order_is_desired_then_existing() {
        let existing = group(vec![
            rec("z.example.com", 300, a("192.0.2.1")),
            rec("b.example.com", 300, a("192.0.2.1")),
            rec("y.example.com", 300, a("192.0.2.1")),
        ]);
        let desired = group(vec![
            rec("c.example.com", 300, a("192.0.2.1")),
            rec("b.example.com", 300, a("192.0.2.2")),
        ]);
        let order: Vec<String> = changed_keys(&existing, &desired)
            .into_iter()
            .map(|c| c.key.fqdn)
            .collect();
        assert_eq!(
            order,
            vec!["c.example.com", "b.example.com", "z.example.com", "y.example.com"]
        );
    }

    #[test]
    fn ipv6_spellings_compare_equal() {
        let v6 = |address: &str| RecordData::AAAA {
            address: address.to_string(),
        };
        let existing = group(vec![rec("v6.example.com", 300, v6("2001:db8::1"))]);
        let desired = group(vec![rec("v6.example.com", 300, v6("2001:0db8:0:0::1"))]);
        assert!(changed_keys(&existing, &desired).is_empty());
    }

    #[test]
    fn target_case_and_trailing_dot_are_normalized() {
        let existing = group(vec![rec(
            "www.example.com",
            300,
            RecordData::CNAME {
                target: "target.example.net.".to_string(),
            },
        )]);
        let desired = group(vec![rec(
            "www.example.com",
            300,
            RecordData::CNAME {
                target: "Target.Example.NET".to_string(),
            },
        )]);
        assert!(changed_keys(&existing, &desired).is_empty());
    }
}
