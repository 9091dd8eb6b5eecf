use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::KNOWN_DOCUMENTS;
use crate::error::{CatalogError, Result};

/// Registry of known input documents and the manufacturer that publishes each
pub struct VendorTable {
    vendors: BTreeMap<String, String>,
}

impl VendorTable {
    /// Create a table holding only the built-in vendor documents
    pub fn builtin() -> Self {
        let vendors = KNOWN_DOCUMENTS
            .iter()
            .map(|(identity, mfg)| (identity.to_string(), mfg.to_string()))
            .collect();
        Self { vendors }
    }

    /// Built-in table plus any extra mappings (extras win on conflict)
    pub fn with_extra(extra: &BTreeMap<String, String>) -> Self {
        let mut table = Self::builtin();
        for (identity, manufacturer) in extra {
            table.register(identity.clone(), manufacturer.clone());
        }
        table
    }

    pub fn register(&mut self, identity: String, manufacturer: String) {
        self.vendors.insert(identity, manufacturer);
    }

    /// Resolve the manufacturer for a document. Unknown documents are an
    /// error; there is no default vendor.
    pub fn resolve_vendor(&self, identity: &str) -> Result<&str> {
        self.vendors
            .get(identity)
            .map(|m| m.as_str())
            .ok_or_else(|| CatalogError::UnknownVendor {
                identity: identity.to_string(),
            })
    }

    /// Resolve by path, using the file name as the document identity
    pub fn resolve_path(&self, path: &Path) -> Result<&str> {
        let identity = document_identity(path)?;
        self.resolve_vendor(identity)
    }

    /// Iterate (identity, manufacturer) pairs in identity order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vendors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

impl Default for VendorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The identity of a document is its file name.
pub fn document_identity(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CatalogError::UnknownVendor {
            identity: path.display().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_resolves_every_known_vendor() {
        let table = VendorTable::builtin();
        assert_eq!(table.len(), 10);
        assert_eq!(table.resolve_vendor("AeroTech.rse").unwrap(), "aerotech");
        assert_eq!(table.resolve_vendor("AMW.rse").unwrap(), "AMW");
        assert_eq!(table.resolve_vendor("SCR.rse").unwrap(), "SCR");
        assert_eq!(table.resolve_vendor("Quest.rse").unwrap(), "quest");
    }

    #[test]
    fn test_unknown_vendor_fails_closed() {
        let table = VendorTable::builtin();
        let err = table.resolve_vendor("Mystery.rse").unwrap_err();
        match err {
            CatalogError::UnknownVendor { identity } => assert_eq!(identity, "Mystery.rse"),
            other => panic!("unexpected error: {other}"),
        }
        // Lookup is exact, not case-insensitive
        assert!(table.resolve_vendor("aerotech.rse").is_err());
    }

    #[test]
    fn test_resolve_path_uses_file_name() {
        let table = VendorTable::builtin();
        let mfg = table
            .resolve_path(Path::new("motor-data/Cesaroni.rse"))
            .unwrap();
        assert_eq!(mfg, "cesaroni");
    }

    #[test]
    fn test_extra_mappings_extend_table() {
        let mut extra = BTreeMap::new();
        extra.insert("Hypertek.rse".to_string(), "hypertek".to_string());
        let table = VendorTable::with_extra(&extra);
        assert_eq!(table.len(), 11);
        assert_eq!(table.resolve_vendor("Hypertek.rse").unwrap(), "hypertek");
        assert_eq!(table.resolve_vendor("Estes.rse").unwrap(), "estes");
    }

    #[test]
    fn test_entries_are_sorted_by_identity() {
        let table = VendorTable::builtin();
        let ids: Vec<&str> = table.entries().map(|(id, _)| id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
