use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::name::{canonical_target, full_name_to_relative, normalize_domain_name};

// ============ Record Types ============

/// DNS record type supported by the reconciler.
///
/// SOA is deliberately absent: it is read-only at every supported provider and
/// is skipped when translating remote record sets.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Reverse pointer record.
    Ptr,
    /// Service locator record.
    Srv,
    /// Text record.
    Txt,
    /// Certificate Authority Authorization record.
    Caa,
}

impl RecordType {
    /// Every supported type, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Ns,
        Self::Ptr,
        Self::Srv,
        Self::Txt,
        Self::Caa,
    ];

    /// Uppercase mnemonic (`"AAAA"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
            Self::Caa => "CAA",
        }
    }

    /// Whether a record set of this type is an address set (A or AAAA).
    pub fn is_address(self) -> bool {
        matches!(self, Self::A | Self::Aaaa)
    }

    /// Whether sets of `self` and `other` cannot coexist at the same name.
    ///
    /// Only the CNAME vs A/AAAA pair is tracked; a type never conflicts with itself.
    pub fn conflicts_with(self, other: Self) -> bool {
        (self == Self::Cname && other.is_address()) || (other == Self::Cname && self.is_address())
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown record type mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRecordTypeError(pub String);

impl fmt::Display for ParseRecordTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported record type: {}", self.0)
    }
}

impl std::error::Error for ParseRecordTypeError {}

impl FromStr for RecordType {
    type Err = ParseRecordTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "NS" => Ok(Self::Ns),
            "PTR" => Ok(Self::Ptr),
            "SRV" => Ok(Self::Srv),
            "TXT" => Ok(Self::Txt),
            "CAA" => Ok(Self::Caa),
            _ => Err(ParseRecordTypeError(s.to_string())),
        }
    }
}

/// Type-safe representation of DNS record data.
///
/// Each variant carries the fields specific to that record type. Serialized
/// internally tagged, so a record reads as `{"type": "MX", "preference": 10, "exchange": "..."}`.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecordData {
    /// A record - IPv4 address.
    A {
        /// IPv4 address (e.g., `"1.2.3.4"`).
        address: String,
    },

    /// AAAA record - IPv6 address.
    AAAA {
        /// IPv6 address (e.g., `"2001:db8::1"`).
        address: String,
    },

    /// CNAME record - alias to another name.
    CNAME {
        /// Target hostname.
        target: String,
    },

    /// MX record - mail exchange.
    MX {
        /// Preference (lower = preferred).
        preference: u16,
        /// Mail server hostname.
        exchange: String,
    },

    /// NS record - delegated name server.
    NS {
        /// Name server hostname.
        nameserver: String,
    },

    /// PTR record - reverse pointer.
    PTR {
        /// Target hostname.
        target: String,
    },

    /// SRV record - service locator.
    SRV {
        /// Priority (lower = preferred).
        priority: u16,
        /// Weight among same-priority targets.
        weight: u16,
        /// TCP/UDP port.
        port: u16,
        /// Target hostname.
        target: String,
    },

    /// TXT record - one or more character strings.
    TXT {
        /// Character strings of a single TXT record.
        strings: Vec<String>,
    },

    /// CAA record - Certificate Authority Authorization.
    CAA {
        /// Issuer critical flag (0 or 128).
        flags: u8,
        /// Property tag (`"issue"`, `"issuewild"`, `"iodef"`).
        tag: String,
        /// CA domain or reporting URI.
        value: String,
    },
}

impl RecordData {
    /// Returns the [`RecordType`] discriminant for this record data.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } => RecordType::A,
            Self::AAAA { .. } => RecordType::Aaaa,
            Self::CNAME { .. } => RecordType::Cname,
            Self::MX { .. } => RecordType::Mx,
            Self::NS { .. } => RecordType::Ns,
            Self::PTR { .. } => RecordType::Ptr,
            Self::SRV { .. } => RecordType::Srv,
            Self::TXT { .. } => RecordType::Txt,
            Self::CAA { .. } => RecordType::Caa,
        }
    }

    /// Canonical form used for comparison and for sending to providers.
    ///
    /// Hostname targets become lowercase and fully-qualified; addresses are
    /// trimmed and IPv6 addresses take their compressed form; CAA tags are
    /// lowercased. TXT strings are kept byte-exact.
    #[must_use]
    pub fn canonical(self) -> Self {
        match self {
            Self::A { address } => Self::A {
                address: address.trim().to_string(),
            },
            Self::AAAA { address } => {
                let trimmed = address.trim();
                Self::AAAA {
                    address: trimmed
                        .parse::<Ipv6Addr>()
                        .map_or_else(|_| trimmed.to_ascii_lowercase(), |a| a.to_string()),
                }
            }
            Self::CNAME { target } => Self::CNAME {
                target: canonical_target(&target),
            },
            Self::MX {
                preference,
                exchange,
            } => Self::MX {
                preference,
                exchange: canonical_target(&exchange),
            },
            Self::NS { nameserver } => Self::NS {
                nameserver: canonical_target(&nameserver),
            },
            Self::PTR { target } => Self::PTR {
                target: canonical_target(&target),
            },
            Self::SRV {
                priority,
                weight,
                port,
                target,
            } => Self::SRV {
                priority,
                weight,
                port,
                target: canonical_target(&target),
            },
            Self::TXT { strings } => Self::TXT { strings },
            Self::CAA { flags, tag, value } => Self::CAA {
                flags,
                tag: tag.trim().to_ascii_lowercase(),
                value,
            },
        }
    }

    /// Zone-file style rendering of the payload (without name, TTL and type).
    pub fn display_value(&self) -> String {
        match self {
            Self::A { address } | Self::AAAA { address } => address.clone(),
            Self::CNAME { target } | Self::PTR { target } => target.clone(),
            Self::NS { nameserver } => nameserver.clone(),
            Self::MX {
                preference,
                exchange,
            } => format!("{preference} {exchange}"),
            Self::SRV {
                priority,
                weight,
                port,
                target,
            } => format!("{priority} {weight} {port} {target}"),
            Self::TXT { strings } => strings
                .iter()
                .map(|s| format!("{s:?}"))
                .collect::<Vec<_>>()
                .join(" "),
            Self::CAA { flags, tag, value } => format!("{flags} {tag} {value:?}"),
        }
    }
}

// ============ Records, Keys, Record Sets ============

/// Identifies one record set: fully-qualified name (lowercase, no trailing
/// dot) plus record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    /// Normalized fully-qualified name.
    pub fqdn: String,
    /// Record type.
    pub record_type: RecordType,
}

impl RecordKey {
    /// Build a key, normalizing the name.
    pub fn new(fqdn: &str, record_type: RecordType) -> Self {
        Self {
            fqdn: normalize_domain_name(fqdn),
            record_type,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.fqdn, self.record_type)
    }
}

/// A single DNS record in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Label relative to the zone origin (`"@"` for the apex).
    pub name: String,
    /// Fully-qualified name, lowercase, without trailing dot.
    pub fqdn: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Type-specific payload.
    pub data: RecordData,
}

impl Record {
    /// Create a record from a full name (trailing dot optional) within `zone`.
    pub fn from_fqdn(fqdn: &str, zone: &str, ttl: u32, data: RecordData) -> Self {
        Self {
            name: full_name_to_relative(fqdn, zone),
            fqdn: normalize_domain_name(fqdn),
            ttl,
            data: data.canonical(),
        }
    }

    /// Re-apply normalization to name, FQDN and payload.
    ///
    /// Records built through [`Record::from_fqdn`] are already normalized; this is
    /// for records assembled field by field.
    #[must_use]
    pub fn normalized(self, zone: &str) -> Self {
        Self::from_fqdn(&self.fqdn, zone, self.ttl, self.data)
    }

    /// The record type of the payload.
    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// The record-set key this record belongs to.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            fqdn: self.fqdn.clone(),
            record_type: self.record_type(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.fqdn,
            self.ttl,
            self.record_type(),
            self.data.display_value()
        )
    }
}

/// A record set: every record sharing one [`RecordKey`], with one TTL.
///
/// This is the unit providers accept and return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Key shared by all records.
    pub key: RecordKey,
    /// Label relative to the zone origin (`"@"` for the apex).
    pub name: String,
    /// TTL of the whole set.
    pub ttl: u32,
    /// Payloads in order.
    pub records: Vec<RecordData>,
}

impl RecordSet {
    /// Expand the set into individual records.
    pub fn to_records(&self) -> Vec<Record> {
        self.records
            .iter()
            .map(|data| Record {
                name: self.name.clone(),
                fqdn: self.key.fqdn.clone(),
                ttl: self.ttl,
                data: data.clone(),
            })
            .collect()
    }
}

/// A record set as it exists at the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecordSet {
    /// Opaque handle used to address this set for deletion
    /// (the ARM resource id for Azure).
    pub remote_id: String,
    /// Set contents in canonical form.
    pub record_set: RecordSet,
}

impl RemoteRecordSet {
    /// The key of the contained record set.
    pub fn key(&self) -> &RecordKey {
        &self.record_set.key
    }
}

// ============ Zone Types ============

/// A DNS zone hosted by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderZone {
    /// Provider-specific zone identifier.
    pub id: String,
    /// Zone name without trailing dot (e.g., `"example.com"`).
    pub name: String,
    /// Authoritative name servers assigned by the provider, in provider order.
    pub name_servers: Vec<String>,
    /// Number of record sets in the zone, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_set_count: Option<u64>,
}

// ============ Provider Types ============

/// Identifies which DNS provider implementation to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Azure DNS. Requires feature `azure`.
    Azure,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Azure => write!(f, "azure"),
        }
    }
}

// ============ Provider Metadata Types ============

/// The input type of a credential field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single credential field required by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Machine-readable field key (e.g., `"tenantId"`).
    pub key: String,
    /// Human-readable label (e.g., `"Tenant ID"`).
    pub label: String,
    /// Input type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Optional help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Capabilities of a provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFeatures {
    /// Whether missing zones can be created through the API.
    pub create_zones: bool,
    /// Whether a single TXT record may carry several strings.
    pub txt_multi: bool,
    /// Record types the provider can manage.
    pub record_types: Vec<RecordType>,
}

/// Provider-specific paging limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLimits {
    /// Page size used when listing zones.
    pub page_size_zones: u32,
    /// Page size used when listing record sets.
    pub page_size_record_sets: u32,
}

/// Static metadata describing a DNS provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Human-readable provider name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Credential fields required to authenticate.
    pub required_fields: Vec<ProviderCredentialField>,
    /// Capabilities.
    pub features: ProviderFeatures,
    /// Paging limits.
    pub limits: ProviderLimits,
}

impl ProviderMetadata {
    /// Whether the provider can manage records of `record_type`.
    pub fn supports(&self, record_type: RecordType) -> bool {
        self.features.record_types.contains(&record_type)
    }
}

// ============ Credential Types ============

/// Validation error for provider credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Service principal credentials for Azure DNS.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    /// Entra ID tenant.
    pub tenant_id: String,
    /// Application (client) id of the service principal.
    pub client_id: String,
    /// Client secret of the service principal.
    pub client_secret: String,
    /// Subscription holding the DNS zones.
    pub subscription_id: String,
    /// Resource group holding the DNS zones.
    pub resource_group: String,
}

impl fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .finish()
    }
}

/// Type-safe credential container for all supported DNS providers.
///
/// Serialized as `{ "provider": "azure", "credentials": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Azure DNS service principal.
    #[serde(rename = "azure")]
    Azure(AzureCredentials),
}

impl ProviderCredentials {
    /// Construct credentials from a flat key-value map, validating required fields.
    pub fn from_map(
        provider: ProviderType,
        map: &std::collections::HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        match provider {
            ProviderType::Azure => Ok(Self::Azure(AzureCredentials {
                tenant_id: Self::get_required_field(provider, map, "tenantId", "Tenant ID")?,
                client_id: Self::get_required_field(provider, map, "clientId", "Client ID")?,
                client_secret: Self::get_required_field(
                    provider,
                    map,
                    "clientSecret",
                    "Client Secret",
                )?,
                subscription_id: Self::get_required_field(
                    provider,
                    map,
                    "subscriptionId",
                    "Subscription ID",
                )?,
                resource_group: Self::get_required_field(
                    provider,
                    map,
                    "resourceGroup",
                    "Resource Group",
                )?,
            })),
        }
    }

    fn get_required_field(
        provider: ProviderType,
        map: &std::collections::HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                provider,
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                provider,
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.trim().to_string()),
        }
    }

    /// Returns the [`ProviderType`] corresponding to this credential variant.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Azure(_) => ProviderType::Azure,
        }
    }
}
