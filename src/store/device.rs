//! Simulated device description and the system/interface layers built from it.

use super::custom::parse_hex;
use super::layer::{BuildReport, LayerKind};
use super::table::OidTable;
use crate::error::Error;
use crate::oid::Oid;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// system group, 1.3.6.1.2.1.1
const SYSTEM: [u32; 7] = [1, 3, 6, 1, 2, 1, 1];
/// ifNumber.0
const IF_NUMBER: [u32; 9] = [1, 3, 6, 1, 2, 1, 2, 1, 0];
/// ifEntry, 1.3.6.1.2.1.2.2.1
const IF_ENTRY: [u32; 9] = [1, 3, 6, 1, 2, 1, 2, 2, 1];
/// ifXEntry, 1.3.6.1.2.1.31.1.1.1
const IFX_ENTRY: [u32; 10] = [1, 3, 6, 1, 2, 1, 31, 1, 1, 1];

/// A simulated device: system scalars plus its interfaces.
///
/// Every field is optional in JSON; missing fields take the defaults of the
/// built-in test device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceDescription {
    pub description: String,
    /// sysObjectID in dotted notation.
    pub object_id: String,
    /// sysUpTime in hundredths of a second.
    pub uptime: u32,
    pub contact: String,
    pub name: String,
    pub location: String,
    pub services: i32,
    /// Interfaces keyed by their ifIndex written as decimal text.
    pub interfaces: BTreeMap<String, InterfaceDescription>,
}

impl Default for DeviceDescription {
    fn default() -> Self {
        Self {
            description: "Test System Description".into(),
            object_id: "1.3.6.1.4.1.8072.3.2.10".into(),
            uptime: 123456,
            contact: "Test Contact".into(),
            name: "Test System Name".into(),
            location: "Test Location".into(),
            services: 72,
            interfaces: BTreeMap::new(),
        }
    }
}

/// One row of ifTable/ifXTable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceDescription {
    pub description: String,
    /// IANAifType, 6 is ethernetCsmacd.
    #[serde(rename = "type")]
    pub if_type: i32,
    pub mtu: i32,
    /// Bits per second.
    pub speed: u64,
    /// MAC address as hex bytes, e.g. `00:1a:2b:3c:4d:5e`.
    pub phys_address: String,
    pub admin_status: i32,
    pub oper_status: i32,
    pub in_octets: u64,
    pub in_ucast_pkts: u32,
    pub in_discards: u32,
    pub in_errors: u32,
    pub out_octets: u64,
    pub out_ucast_pkts: u32,
    pub out_discards: u32,
    pub out_errors: u32,
}

impl Default for InterfaceDescription {
    fn default() -> Self {
        Self {
            description: String::new(),
            if_type: 6,
            mtu: 1500,
            speed: 1_000_000_000,
            phys_address: String::new(),
            admin_status: 1,
            oper_status: 1,
            in_octets: 0,
            in_ucast_pkts: 0,
            in_discards: 0,
            in_errors: 0,
            out_octets: 0,
            out_ucast_pkts: 0,
            out_discards: 0,
            out_errors: 0,
        }
    }
}

fn system_oid(column: u32) -> Oid {
    Oid::from_slice(&SYSTEM).child(column).child(0)
}

/// Build the system layer (sysDescr.0 .. sysServices.0).
///
/// An unparsable `object_id` leaves sysObjectID out and is reported.
pub(crate) fn system_layer(device: &DeviceDescription, report: &mut BuildReport) -> OidTable<Value> {
    let mut table = OidTable::with_capacity(7);
    table.insert(system_oid(1), Value::from(device.description.as_str()));
    match Oid::parse(&device.object_id) {
        Ok(oid) => {
            table.insert(system_oid(2), Value::ObjectIdentifier(oid));
        }
        Err(e) => report.skip(LayerKind::System, "device", "object_id", e),
    }
    table.insert(system_oid(3), Value::TimeTicks(device.uptime));
    table.insert(system_oid(4), Value::from(device.contact.as_str()));
    table.insert(system_oid(5), Value::from(device.name.as_str()));
    table.insert(system_oid(6), Value::from(device.location.as_str()));
    table.insert(system_oid(7), Value::Integer(device.services));
    table
}

/// Parse an interface key into an ifIndex (1..=2147483647).
fn parse_if_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>()
        .ok()
        .filter(|idx| (1..=i32::MAX as u32).contains(idx))
}

/// Build the interface layer: ifNumber.0 plus ifTable and ifXTable columns per interface.
pub(crate) fn interface_layer(
    device: &DeviceDescription,
    report: &mut BuildReport,
) -> OidTable<Value> {
    let mut table = OidTable::new();
    let mut seen = BTreeSet::new();

    for (key, iface) in &device.interfaces {
        let Some(index) = parse_if_index(key) else {
            report.skip(
                LayerKind::Interface,
                "interfaces",
                key.clone(),
                Error::value_parse("interface index", key.as_str()),
            );
            continue;
        };
        // "1" and "01" name the same row; the first key in order keeps it
        if !seen.insert(index) {
            report.skip(
                LayerKind::Interface,
                "interfaces",
                key.clone(),
                Error::invalid_entry(format!("interface index {} already used", index)),
            );
            continue;
        }

        let if_col = |column: u32| Oid::from_slice(&IF_ENTRY).child(column).child(index);
        let ifx_col = |column: u32| Oid::from_slice(&IFX_ENTRY).child(column).child(index);

        table.insert(if_col(1), Value::Integer(index as i32));
        table.insert(if_col(2), Value::from(iface.description.as_str()));
        table.insert(if_col(3), Value::Integer(iface.if_type));
        table.insert(if_col(4), Value::Integer(iface.mtu));
        table.insert(
            if_col(5),
            Value::Gauge32(u32::try_from(iface.speed).unwrap_or(u32::MAX)),
        );
        match parse_hex(iface.phys_address.trim()) {
            Some(mac) => {
                table.insert(if_col(6), Value::OctetString(mac.into()));
            }
            None => report.skip(
                LayerKind::Interface,
                format!("interface {}", index),
                "phys_address",
                Error::value_parse("phys_address", iface.phys_address.as_str()),
            ),
        }
        table.insert(if_col(7), Value::Integer(iface.admin_status));
        table.insert(if_col(8), Value::Integer(iface.oper_status));
        // Counter32 columns wrap like a real 32-bit counter would
        table.insert(if_col(10), Value::Counter32(iface.in_octets as u32));
        table.insert(if_col(11), Value::Counter32(iface.in_ucast_pkts));
        table.insert(if_col(13), Value::Counter32(iface.in_discards));
        table.insert(if_col(14), Value::Counter32(iface.in_errors));
        table.insert(if_col(16), Value::Counter32(iface.out_octets as u32));
        table.insert(if_col(17), Value::Counter32(iface.out_ucast_pkts));
        table.insert(if_col(19), Value::Counter32(iface.out_discards));
        table.insert(if_col(20), Value::Counter32(iface.out_errors));

        table.insert(ifx_col(1), Value::from(iface.description.as_str()));
        table.insert(ifx_col(6), Value::Counter64(iface.in_octets));
        table.insert(ifx_col(10), Value::Counter64(iface.out_octets));
        table.insert(
            ifx_col(15),
            Value::Gauge32(u32::try_from(iface.speed / 1_000_000).unwrap_or(u32::MAX)),
        );
    }

    table.insert(Oid::from_slice(&IF_NUMBER), Value::Integer(seen.len() as i32));
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn device_with(interfaces: &[(&str, InterfaceDescription)]) -> DeviceDescription {
        DeviceDescription {
            interfaces: interfaces
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_system_layer() {
        let mut report = BuildReport::new();
        let table = system_layer(&DeviceDescription::default(), &mut report);

        assert!(report.is_clean());
        assert_eq!(table.len(), 7);
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
            Some(&Value::from("Test System Description"))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)),
            Some(&Value::from(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)),
            Some(&Value::TimeTicks(123456))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)),
            Some(&Value::Integer(72))
        );
    }

    #[test]
    fn test_bad_object_id_skips_sys_object_id() {
        let device = DeviceDescription {
            object_id: "enterprises.8072".into(),
            ..Default::default()
        };
        let mut report = BuildReport::new();
        let table = system_layer(&device, &mut report);

        assert_eq!(table.len(), 6);
        assert!(!table.contains(&oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)));
        assert_eq!(report.skipped()[0].key, "object_id");
    }

    #[test]
    fn test_interface_columns() {
        let eth = InterfaceDescription {
            description: "eth0".into(),
            speed: 10_000_000_000,
            phys_address: "00:1a:2b:3c:4d:5e".into(),
            in_octets: 0x1_0000_0005,
            out_octets: 42,
            ..Default::default()
        };
        let mut report = BuildReport::new();
        let table = interface_layer(&device_with(&[("2", eth)]), &mut report);

        assert!(report.is_clean());
        // ifNumber + 16 ifTable columns + 4 ifXTable columns
        assert_eq!(table.len(), 21);
        assert_eq!(table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 1, 0)), Some(&Value::Integer(1)));
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, 2)),
            Some(&Value::Integer(2))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 2)),
            Some(&Value::from("eth0"))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 5, 2)),
            Some(&Value::Gauge32(u32::MAX))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 6, 2)),
            Some(&Value::OctetString(vec![0x00, 0x1A, 0x2B, 0x3C, 0x4D, 0x5E].into()))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 2)),
            Some(&Value::Counter32(5))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6, 2)),
            Some(&Value::Counter64(0x1_0000_0005))
        );
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 15, 2)),
            Some(&Value::Gauge32(10_000))
        );
    }

    #[test]
    fn test_bad_index_skips_interface() {
        let mut report = BuildReport::new();
        let device = device_with(&[
            ("1", InterfaceDescription::default()),
            ("eth0", InterfaceDescription::default()),
            ("0", InterfaceDescription::default()),
        ]);
        let table = interface_layer(&device, &mut report);

        assert_eq!(table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 1, 0)), Some(&Value::Integer(1)));
        assert_eq!(report.for_layer(LayerKind::Interface).count(), 2);
    }

    #[test]
    fn test_duplicate_index_counted_once() {
        let mut report = BuildReport::new();
        let first = InterfaceDescription {
            description: "first".into(),
            ..InterfaceDescription::default()
        };
        let second = InterfaceDescription {
            description: "second".into(),
            ..InterfaceDescription::default()
        };
        let device = device_with(&[("01", first), ("1", second)]);
        let table = interface_layer(&device, &mut report);

        assert_eq!(table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 1, 0)), Some(&Value::Integer(1)));
        assert_eq!(
            table.get(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 1)),
            Some(&Value::from("first"))
        );
        let skipped: Vec<_> = report.for_layer(LayerKind::Interface).collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].key, "1");
        assert!(matches!(skipped[0].error, Error::InvalidEntry { .. }));
    }

    #[test]
    fn test_bad_mac_skips_only_that_column() {
        let iface = InterfaceDescription {
            phys_address: "not-a-mac".into(),
            ..Default::default()
        };
        let mut report = BuildReport::new();
        let table = interface_layer(&device_with(&[("3", iface)]), &mut report);

        assert!(!table.contains(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 6, 3)));
        assert!(table.contains(&oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 3)));
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.skipped()[0].key, "phys_address");
    }

    #[test]
    fn test_device_json_defaults() {
        let device: DeviceDescription = serde_json::from_str(
            r#"{ "name": "edge-rtr", "interfaces": { "1": { "description": "ge-0/0/0", "type": 117 } } }"#,
        )
        .unwrap();
        assert_eq!(device.name, "edge-rtr");
        assert_eq!(device.contact, "Test Contact");
        let iface = &device.interfaces["1"];
        assert_eq!(iface.if_type, 117);
        assert_eq!(iface.mtu, 1500);
    }
}
