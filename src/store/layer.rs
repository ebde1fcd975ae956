//! Layer identities and the report of entries skipped while building them.

use crate::error::Error;
use std::fmt;

/// One of the three sources an [`OidStore`](super::OidStore) is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    /// Fixed system group scalars (sysDescr and friends).
    System,
    /// Per-interface ifTable/ifXTable instances.
    Interface,
    /// User supplied OIDs.
    Custom,
}

impl LayerKind {
    /// Lookup order: the first layer holding a key answers for it.
    pub const PRECEDENCE: [LayerKind; 3] = [LayerKind::System, LayerKind::Interface, LayerKind::Custom];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::System => "system",
            LayerKind::Interface => "interface",
            LayerKind::Custom => "custom",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration entry left out of the store.
#[derive(Debug)]
pub struct SkippedEntry {
    /// Layer the entry was meant for.
    pub layer: LayerKind,
    /// Where it came from: a custom source name, or an interface index/column.
    pub source: String,
    /// The OID text, interface key or field as written in the configuration.
    pub key: String,
    pub error: Error,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} layer, {} entry '{}': {}",
            self.layer, self.source, self.key, self.error
        )
    }
}

/// Everything [`build_store`](super::build_store) had to leave out.
///
/// A non-empty report is not a failure: every other entry made it into the
/// store.
#[derive(Debug, Default)]
pub struct BuildReport {
    skipped: Vec<SkippedEntry>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry that could not be added.
    pub fn skip(
        &mut self,
        layer: LayerKind,
        source: impl Into<String>,
        key: impl Into<String>,
        error: Error,
    ) {
        self.skipped.push(SkippedEntry {
            layer,
            source: source.into(),
            key: key.into(),
            error,
        });
    }

    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Skipped entries for one layer.
    pub fn for_layer(&self, layer: LayerKind) -> impl Iterator<Item = &SkippedEntry> {
        self.skipped.iter().filter(move |s| s.layer == layer)
    }
}
