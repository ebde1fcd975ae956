//! Sorted OID table backing each store layer.

use crate::oid::Oid;

/// OID-keyed table kept in lexicographic order.
///
/// Exact lookups and successor lookups are both binary searches, so a layer
/// answers GET and GETNEXT without a separate index.
///
/// ```
/// use snmp_sim::store::OidTable;
/// use snmp_sim::{Value, oid};
///
/// let mut table = OidTable::new();
/// table.insert(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw-01"));
/// table.insert(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("Test System Description"));
///
/// let (next, _) = table.get_next(&oid!(1, 3, 6, 1, 2, 1, 1)).unwrap();
/// assert_eq!(next, &oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OidTable<V> {
    entries: Vec<(Oid, V)>,
}

impl<V> OidTable<V> {
    /// Create a new empty OID table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create an OID table with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert an OID-value pair, maintaining sorted order.
    ///
    /// If the OID already exists its value is replaced and the old one returned.
    pub fn insert(&mut self, oid: Oid, value: V) -> Option<V> {
        match self.entries.binary_search_by(|(o, _)| o.cmp(&oid)) {
            Ok(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            Err(idx) => {
                self.entries.insert(idx, (oid, value));
                None
            }
        }
    }

    /// Get the value for an exact OID match.
    pub fn get(&self, oid: &Oid) -> Option<&V> {
        self.entries
            .binary_search_by(|(o, _)| o.cmp(oid))
            .ok()
            .map(|idx| &self.entries[idx].1)
    }

    /// Check whether an OID has an entry.
    pub fn contains(&self, oid: &Oid) -> bool {
        self.get(oid).is_some()
    }

    /// Get the first entry strictly after the given OID.
    pub fn get_next(&self, oid: &Oid) -> Option<(&Oid, &V)> {
        let idx = match self.entries.binary_search_by(|(o, _)| o.cmp(oid)) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        };
        self.entries.get(idx).map(|(o, v)| (o, v))
    }

    /// Get the number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all OID-value pairs in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&Oid, &V)> {
        self.entries.iter().map(|(o, v)| (o, v))
    }

    /// Merge another table into this one; entries from `other` win on equal keys.
    pub fn merge(&mut self, other: OidTable<V>) {
        for (oid, value) in other.entries {
            self.insert(oid, value);
        }
    }
}

impl<V> Default for OidTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(Oid, V)> for OidTable<V> {
    fn from_iter<I: IntoIterator<Item = (Oid, V)>>(iter: I) -> Self {
        let mut table = OidTable::new();
        for (oid, value) in iter {
            table.insert(oid, value);
        }
        table
    }
}
