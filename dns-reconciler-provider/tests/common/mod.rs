//! Shared test helpers

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use dns_reconciler_provider::{
    AzureCredentials, ProviderCredentials, RecordData, RecordKey, RecordSet, RecordType,
    ZoneProvider, create_provider,
};

/// Skip the test when any of the given environment variables is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert an `Option` is `Some` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Assert a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Environment variables required by the live Azure tests.
pub const AZURE_ENV: [&str; 6] = [
    "AZURE_TENANT_ID",
    "AZURE_CLIENT_ID",
    "AZURE_CLIENT_SECRET",
    "AZURE_SUBSCRIPTION_ID",
    "AZURE_RESOURCE_GROUP",
    "TEST_DOMAIN",
];

/// Unique label for a throwaway record set.
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// Two distinct payloads per type (create, then update).
pub fn get_test_record_data(record_type: RecordType) -> Option<(RecordData, RecordData)> {
    let pair = match record_type {
        RecordType::A => (
            RecordData::A {
                address: "192.0.2.1".to_string(),
            },
            RecordData::A {
                address: "192.0.2.2".to_string(),
            },
        ),
        RecordType::Aaaa => (
            RecordData::AAAA {
                address: "2001:db8::1".to_string(),
            },
            RecordData::AAAA {
                address: "2001:db8::2".to_string(),
            },
        ),
        RecordType::Cname => (
            RecordData::CNAME {
                target: "target1.example.com.".to_string(),
            },
            RecordData::CNAME {
                target: "target2.example.com.".to_string(),
            },
        ),
        RecordType::Mx => (
            RecordData::MX {
                preference: 10,
                exchange: "mail1.example.com.".to_string(),
            },
            RecordData::MX {
                preference: 20,
                exchange: "mail2.example.com.".to_string(),
            },
        ),
        RecordType::Txt => (
            RecordData::TXT {
                strings: vec!["test-value-1".to_string()],
            },
            RecordData::TXT {
                strings: vec!["test-value-2".to_string(), "second-string".to_string()],
            },
        ),
        RecordType::Srv => (
            RecordData::SRV {
                priority: 0,
                weight: 5,
                port: 443,
                target: "srv1.example.com.".to_string(),
            },
            RecordData::SRV {
                priority: 10,
                weight: 10,
                port: 8443,
                target: "srv2.example.com.".to_string(),
            },
        ),
        RecordType::Caa => (
            RecordData::CAA {
                flags: 0,
                tag: "issue".to_string(),
                value: "letsencrypt.org".to_string(),
            },
            RecordData::CAA {
                flags: 0,
                tag: "issue".to_string(),
                value: "digicert.com".to_string(),
            },
        ),
        RecordType::Ns | RecordType::Ptr => return None,
    };
    Some(pair)
}

/// Build a single-record set for `label` in `zone`.
pub fn record_set(zone: &str, label: &str, ttl: u32, data: RecordData) -> RecordSet {
    RecordSet {
        key: RecordKey::new(&format!("{label}.{zone}"), data.record_type()),
        name: label.to_string(),
        ttl,
        records: vec![data.canonical()],
    }
}

/// Test context: provider plus the zone under test.
pub struct TestContext {
    pub provider: Arc<dyn ZoneProvider>,
    pub domain: String,
}

impl TestContext {
    /// Azure context from `AZURE_*` and `TEST_DOMAIN`.
    pub fn azure() -> Option<Self> {
        let credentials = ProviderCredentials::Azure(AzureCredentials {
            tenant_id: env::var("AZURE_TENANT_ID").ok()?,
            client_id: env::var("AZURE_CLIENT_ID").ok()?,
            client_secret: env::var("AZURE_CLIENT_SECRET").ok()?,
            subscription_id: env::var("AZURE_SUBSCRIPTION_ID").ok()?,
            resource_group: env::var("AZURE_RESOURCE_GROUP").ok()?,
        });
        let domain = env::var("TEST_DOMAIN").ok()?;
        let provider = create_provider(credentials).ok()?;

        Some(Self { provider, domain })
    }
}
