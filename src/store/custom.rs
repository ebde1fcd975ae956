//! Custom OID entries: typed text values supplied by the user.

use super::layer::{BuildReport, LayerKind};
use super::table::OidTable;
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// One configured custom OID.
///
/// ```json
/// { "oid": "1.3.6.1.4.1.99999.1.0", "type": "integer", "value": "42" }
/// ```
///
/// `value` may also be a bare JSON number or boolean; it is kept as text and
/// parsed according to `type` when the store is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOidEntry {
    pub oid: String,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(deserialize_with = "text_or_scalar")]
    pub value: String,
}

impl CustomOidEntry {
    pub fn new(
        oid: impl Into<String>,
        value_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            oid: oid.into(),
            value_type: value_type.into(),
            value: value.into(),
        }
    }

    /// Resolve the entry into its key and typed value.
    pub fn resolve(&self) -> Result<(Oid, Value)> {
        let oid = Oid::parse(&self.oid)?;
        let value = self.value_type.parse::<ValueType>()?.parse_value(&self.value)?;
        Ok((oid, value))
    }
}

/// An element of a custom source that is not a `{ "oid", "type", "value" }`
/// object at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// The element's `oid` text when it has one, otherwise `#<position>`.
    pub key: String,
    pub reason: String,
}

/// An ordered list of custom entries from one source (usually one file).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomOidList {
    /// Name used when reporting skipped entries.
    pub source: String,
    pub entries: Vec<CustomOidEntry>,
    /// Elements dropped while reading the source. They are reported with the
    /// custom layer when the store is built.
    pub rejected: Vec<RejectedEntry>,
}

impl CustomOidList {
    pub fn new(source: impl Into<String>, entries: Vec<CustomOidEntry>) -> Self {
        Self {
            source: source.into(),
            entries,
            rejected: Vec::new(),
        }
    }

    /// Convert raw JSON elements one by one, keeping the well-formed ones and
    /// recording the rest in `rejected`.
    pub fn from_json_values(source: impl Into<String>, values: Vec<serde_json::Value>) -> Self {
        let mut list = Self::new(source, Vec::with_capacity(values.len()));
        for (position, raw) in values.into_iter().enumerate() {
            let key = match raw.get("oid").and_then(serde_json::Value::as_str) {
                Some(oid) => oid.to_owned(),
                None => format!("#{}", position),
            };
            match serde_json::from_value::<CustomOidEntry>(raw) {
                Ok(entry) => list.entries.push(entry),
                Err(e) => list.rejected.push(RejectedEntry {
                    key,
                    reason: e.to_string(),
                }),
            }
        }
        list
    }
}

fn text_or_scalar<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// Supported type tags for custom values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// INTEGER (i32)
    Integer,
    /// OCTET STRING from UTF-8 text
    String,
    /// OCTET STRING from hex digits
    HexString,
    /// OBJECT IDENTIFIER
    Oid,
    /// TimeTicks (u32)
    TimeTicks,
    /// Gauge32/Unsigned32 (u32)
    Gauge32,
    /// Counter32 (u32)
    Counter32,
    /// Counter64 (u64)
    Counter64,
    /// IpAddress (dotted quad)
    IpAddress,
}

impl ValueType {
    /// Canonical tag as written in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::String => "string",
            ValueType::HexString => "hexstring",
            ValueType::Oid => "oid",
            ValueType::TimeTicks => "timeticks",
            ValueType::Gauge32 => "gauge32",
            ValueType::Counter32 => "counter32",
            ValueType::Counter64 => "counter64",
            ValueType::IpAddress => "ipaddress",
        }
    }

    /// Parse a string value into an SNMP Value according to the type tag.
    ///
    /// Numbers are decimal and must fit the target type exactly; nothing is
    /// truncated or wrapped.
    pub fn parse_value(self, s: &str) -> Result<Value> {
        let text = s.trim();
        let fail = || Error::value_parse(self.as_str(), s);

        match self {
            ValueType::Integer => text.parse().map(Value::Integer).map_err(|_| fail()),
            ValueType::String => Ok(Value::from(s)),
            ValueType::HexString => parse_hex(text).map(|b| Value::OctetString(b.into())).ok_or_else(fail),
            ValueType::Oid => Oid::parse(text)
                .map(Value::ObjectIdentifier)
                .map_err(|_| fail()),
            ValueType::TimeTicks => text.parse().map(Value::TimeTicks).map_err(|_| fail()),
            ValueType::Gauge32 => text.parse().map(Value::Gauge32).map_err(|_| fail()),
            ValueType::Counter32 => text.parse().map(Value::Counter32).map_err(|_| fail()),
            ValueType::Counter64 => text.parse().map(Value::Counter64).map_err(|_| fail()),
            ValueType::IpAddress => text
                .parse::<std::net::Ipv4Addr>()
                .map(Value::from)
                .map_err(|_| fail()),
        }
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "integer32" | "int" => Ok(ValueType::Integer),
            "string" | "octetstring" => Ok(ValueType::String),
            "hexstring" | "hex" => Ok(ValueType::HexString),
            "oid" | "objectidentifier" => Ok(ValueType::Oid),
            "timeticks" => Ok(ValueType::TimeTicks),
            "gauge32" | "gauge" | "unsigned32" => Ok(ValueType::Gauge32),
            "counter32" | "counter" => Ok(ValueType::Counter32),
            "counter64" => Ok(ValueType::Counter64),
            "ipaddress" | "ip" => Ok(ValueType::IpAddress),
            _ => Err(Error::UnsupportedValueType {
                type_tag: s.into(),
            }),
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse hex digits into bytes.
///
/// Space, colon and dash may separate byte pairs (`00:1a:2b`, `00-1A-2B`,
/// `001a2b`). Any other character, or an odd digit count, is rejected.
pub(crate) fn parse_hex(s: &str) -> Option<Vec<u8>> {
    let mut digits = Vec::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' | ':' | '-' => {}
            c => digits.push(c.to_digit(16)? as u8),
        }
    }
    if !digits.len().is_multiple_of(2) {
        return None;
    }
    Some(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

/// Build the custom layer, applying lists in order so later entries win.
pub(crate) fn custom_layer(lists: &[CustomOidList], report: &mut BuildReport) -> OidTable<Value> {
    let mut table = OidTable::new();
    for list in lists {
        for rejected in &list.rejected {
            report.skip(
                LayerKind::Custom,
                list.source.clone(),
                rejected.key.clone(),
                Error::invalid_entry(rejected.reason.clone()),
            );
        }
        for entry in &list.entries {
            match entry.resolve() {
                Ok((oid, value)) => {
                    table.insert(oid, value);
                }
                Err(e) => report.skip(LayerKind::Custom, list.source.clone(), entry.oid.clone(), e),
            }
        }
    }
    table
}
