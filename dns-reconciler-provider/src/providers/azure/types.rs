//! Azure Resource Manager JSON shapes for DNS zones and record sets.

use serde::{Deserialize, Serialize};

// ============ Common ============

/// One page of an ARM list operation.
#[derive(Debug, Deserialize)]
pub struct ListPage<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "nextLink")]
    pub next_link: Option<String>,
}

/// ARM error envelope.
#[derive(Debug, Deserialize)]
pub struct ArmErrorResponse {
    pub error: ArmError,
}

#[derive(Debug, Deserialize)]
pub struct ArmError {
    pub code: Option<String>,
    pub message: Option<String>,
}

// ============ OAuth ============

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

// ============ Zones ============

#[derive(Debug, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: ZoneProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneProperties {
    #[serde(default)]
    pub name_servers: Vec<String>,
    pub number_of_record_sets: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CreateZoneRequest {
    pub location: String,
}

// ============ Record sets ============

#[derive(Debug, Deserialize)]
pub struct RecordSetResource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub properties: RecordSetProperties,
}

/// Body of a record set PUT.
#[derive(Debug, Serialize)]
pub struct RecordSetRequest {
    pub properties: RecordSetProperties,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSetProperties {
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(skip_serializing)]
    pub fqdn: Option<String>,
    #[serde(rename = "ARecords", skip_serializing_if = "Option::is_none")]
    pub a_records: Option<Vec<ARecord>>,
    #[serde(rename = "AAAARecords", skip_serializing_if = "Option::is_none")]
    pub aaaa_records: Option<Vec<AaaaRecord>>,
    #[serde(rename = "CNAMERecord", skip_serializing_if = "Option::is_none")]
    pub cname_record: Option<CnameRecord>,
    #[serde(rename = "MXRecords", skip_serializing_if = "Option::is_none")]
    pub mx_records: Option<Vec<MxRecord>>,
    #[serde(rename = "NSRecords", skip_serializing_if = "Option::is_none")]
    pub ns_records: Option<Vec<NsRecord>>,
    #[serde(rename = "PTRRecords", skip_serializing_if = "Option::is_none")]
    pub ptr_records: Option<Vec<PtrRecord>>,
    #[serde(rename = "SRVRecords", skip_serializing_if = "Option::is_none")]
    pub srv_records: Option<Vec<SrvRecord>>,
    #[serde(rename = "TXTRecords", skip_serializing_if = "Option::is_none")]
    pub txt_records: Option<Vec<TxtRecord>>,
    #[serde(rename = "caaRecords", skip_serializing_if = "Option::is_none")]
    pub caa_records: Option<Vec<CaaRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ARecord {
    pub ipv4_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AaaaRecord {
    pub ipv6_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnameRecord {
    pub cname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MxRecord {
    pub preference: i64,
    pub exchange: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NsRecord {
    pub nsdname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtrRecord {
    pub ptrdname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrvRecord {
    pub priority: i64,
    pub weight: i64,
    pub port: i64,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxtRecord {
    #[serde(default)]
    pub value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaaRecord {
    pub flags: i64,
    pub tag: String,
    pub value: String,
}
