//! Common test fixtures and constants.

use std::collections::BTreeMap;

use snmp_sim::store::{CustomOidEntry, CustomOidList, DeviceDescription, InterfaceDescription};
use snmp_sim::{Oid, oid};

// =============================================================================
// Standard system MIB OIDs (1.3.6.1.2.1.1.*)
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_object_id() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_contact() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}
pub fn sys_location() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 6, 0)
}
pub fn sys_services() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)
}

// =============================================================================
// Interfaces group
// =============================================================================

/// ifNumber.0
pub fn if_number() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 1, 0)
}

/// ifTable column `column` for interface `index`.
pub fn if_column(column: u32, index: u32) -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, column, index)
}

/// ifXTable column `column` for interface `index`.
pub fn ifx_column(column: u32, index: u32) -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, column, index)
}

// =============================================================================
// Test OIDs
// =============================================================================

/// Nonexistent OID for testing missing-value handling
pub fn nonexistent_oid() -> Oid {
    oid!(1, 3, 6, 1, 99, 99, 99, 0)
}

/// Enterprise subtree used by custom OID fixtures
pub fn enterprise(arc: u32) -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 99999, arc, 0)
}

pub const COMMUNITY: &[u8] = b"public";

// =============================================================================
// Devices and custom lists
// =============================================================================

/// Default device with two interfaces, "1" and "2".
pub fn two_port_device() -> DeviceDescription {
    let mut interfaces = BTreeMap::new();
    interfaces.insert(
        "1".to_string(),
        InterfaceDescription {
            description: "eth0".into(),
            phys_address: "00:11:22:33:44:55".into(),
            in_octets: 1000,
            out_octets: 2000,
            ..InterfaceDescription::default()
        },
    );
    interfaces.insert(
        "2".to_string(),
        InterfaceDescription {
            description: "eth1".into(),
            oper_status: 2,
            ..InterfaceDescription::default()
        },
    );
    DeviceDescription {
        interfaces,
        ..DeviceDescription::default()
    }
}

pub fn custom_list(source: &str, entries: &[(&str, &str, &str)]) -> CustomOidList {
    CustomOidList::new(
        source,
        entries
            .iter()
            .map(|(oid, ty, value)| CustomOidEntry::new(*oid, *ty, *value))
            .collect(),
    )
}
