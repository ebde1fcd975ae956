//! Layered OID store.
//!
//! Values come from three layers built once at startup:
//!
//! - [`LayerKind::System`] - the system group of the simulated device
//! - [`LayerKind::Interface`] - ifNumber plus ifTable/ifXTable rows
//! - [`LayerKind::Custom`] - user supplied OIDs, merged in list order
//!
//! Lookups consult the layers in that order and the first hit wins, so a
//! custom entry can add OIDs but never shadow a system or interface value.
//!
//! An [`OidStore`] is immutable. To change what the agent serves, build a
//! new one and swap it into a [`SharedStore`].
//!
//! # Example
//!
//! ```
//! use snmp_sim::store::{CustomOidEntry, CustomOidList, DeviceDescription, build_store};
//! use snmp_sim::{Value, oid};
//!
//! let customs = vec![CustomOidList::new(
//!     "extra.json",
//!     vec![
//!         CustomOidEntry::new("1.3.6.1.4.1.99999.1.0", "integer", "abc"),
//!         CustomOidEntry::new("1.3.6.1.4.1.99999.2.0", "string", "hello"),
//!     ],
//! )];
//!
//! let (store, report) = build_store(&DeviceDescription::default(), &customs);
//! assert_eq!(
//!     store.lookup(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)),
//!     Some(&Value::from("Test System Name"))
//! );
//! assert_eq!(store.lookup_str("1.3.6.1.4.1.99999.2.0"), Some(&Value::from("hello")));
//! assert!(store.lookup_str("1.3.6.1.4.1.99999.1.0").is_none());
//! assert_eq!(report.skipped().len(), 1);
//! ```

mod custom;
mod device;
mod layer;
mod table;

pub use custom::{CustomOidEntry, CustomOidList, RejectedEntry, ValueType};
pub use device::{DeviceDescription, InterfaceDescription};
pub use layer::{BuildReport, LayerKind, SkippedEntry};
pub use table::OidTable;

use crate::oid::Oid;
use crate::value::Value;
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable, precedence-ordered view over the system, interface and custom layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OidStore {
    system: OidTable<Value>,
    interface: OidTable<Value>,
    custom: OidTable<Value>,
}

impl OidStore {
    /// Assemble a store from already-built layers.
    ///
    /// Within the interface and custom groups, tables are merged in iteration
    /// order and a later table replaces an earlier one's value for the same
    /// OID. Across layers nothing is merged: precedence is applied at lookup.
    pub fn build(
        system: OidTable<Value>,
        interfaces: impl IntoIterator<Item = OidTable<Value>>,
        customs: impl IntoIterator<Item = OidTable<Value>>,
    ) -> Self {
        Self {
            system,
            interface: merge_all(interfaces),
            custom: merge_all(customs),
        }
    }

    /// A store with no values at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Borrow one layer.
    pub fn layer(&self, kind: LayerKind) -> &OidTable<Value> {
        match kind {
            LayerKind::System => &self.system,
            LayerKind::Interface => &self.interface,
            LayerKind::Custom => &self.custom,
        }
    }

    /// Resolve an OID, returning the answering layer with the value.
    pub fn resolve(&self, oid: &Oid) -> Option<(LayerKind, &Value)> {
        LayerKind::PRECEDENCE
            .into_iter()
            .find_map(|kind| self.layer(kind).get(oid).map(|v| (kind, v)))
    }

    /// Look up a value: system, then interface, then custom.
    pub fn lookup(&self, oid: &Oid) -> Option<&Value> {
        self.resolve(oid).map(|(_, v)| v)
    }

    /// Look up by dotted text. Text that is not a valid OID finds nothing.
    pub fn lookup_str(&self, oid: &str) -> Option<&Value> {
        Oid::parse(oid).ok().and_then(|oid| self.lookup(&oid))
    }

    /// The first OID after `oid` in any layer, with its precedence-resolved value.
    pub fn get_next(&self, oid: &Oid) -> Option<(&Oid, &Value)> {
        let next = LayerKind::PRECEDENCE
            .into_iter()
            .filter_map(|kind| self.layer(kind).get_next(oid).map(|(o, _)| o))
            .min()?;
        self.lookup(next).map(|value| (next, value))
    }

    /// Number of distinct OIDs served.
    pub fn len(&self) -> usize {
        let shadowed = |table: &OidTable<Value>, above: &[&OidTable<Value>]| {
            table
                .iter()
                .filter(|&(oid, _)| above.iter().any(|t| t.contains(oid)))
                .count()
        };
        self.system.len() + self.interface.len() + self.custom.len()
            - shadowed(&self.interface, &[&self.system])
            - shadowed(&self.custom, &[&self.system, &self.interface])
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.interface.is_empty() && self.custom.is_empty()
    }
}

fn merge_all(tables: impl IntoIterator<Item = OidTable<Value>>) -> OidTable<Value> {
    let mut merged = OidTable::new();
    for table in tables {
        merged.merge(table);
    }
    merged
}

/// Build the store for a device description plus custom OID lists.
///
/// Never fails as a whole: entries that cannot be turned into values are left
/// out and listed in the returned [`BuildReport`]. Custom lists are applied in
/// slice order, so callers loading files should sort them first.
pub fn build_store(device: &DeviceDescription, customs: &[CustomOidList]) -> (OidStore, BuildReport) {
    let mut report = BuildReport::new();
    let system = device::system_layer(device, &mut report);
    let interface = device::interface_layer(device, &mut report);
    let custom = custom::custom_layer(customs, &mut report);
    (OidStore::build(system, [interface], [custom]), report)
}

/// Swappable handle to the current store.
///
/// Request handlers take a [`snapshot`](Self::snapshot) and keep it for the
/// whole request; [`replace`](Self::replace) publishes a new store for
/// requests that start afterwards.
#[derive(Debug, Clone)]
pub struct SharedStore {
    current: Arc<RwLock<Arc<OidStore>>>,
}

impl SharedStore {
    pub fn new(store: OidStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    /// The store requests should use right now.
    pub fn snapshot(&self) -> Arc<OidStore> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new store, returning the previous one.
    pub fn replace(&self, store: OidStore) -> Arc<OidStore> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(store))
    }
}

impl From<OidStore> for SharedStore {
    fn from(store: OidStore) -> Self {
        Self::new(store)
    }
}
