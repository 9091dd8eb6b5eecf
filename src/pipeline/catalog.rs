use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

use super::loader::parse_entries;
use super::normalize::{Motor, Normalizer};
use super::vendor::{document_identity, VendorTable};
use crate::constants::DOCUMENT_EXTENSION;
use crate::error::Result;
use crate::metrics::CatalogMetrics;

/// Knobs for a catalog build
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub strict: bool,
    pub parallel: bool,
}

/// The normalized output collection, in document-then-entry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub motors: Vec<Motor>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.motors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motors.is_empty()
    }

    /// Motor counts keyed by manufacturer
    pub fn manufacturer_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for motor in &self.motors {
            *counts.entry(motor.manufacturer.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn by_manufacturer<'a>(&'a self, manufacturer: &'a str) -> impl Iterator<Item = &'a Motor> + 'a {
        self.motors
            .iter()
            .filter(move |m| m.manufacturer == manufacturer)
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.motors)?)
    }

    /// Replace the artifact at `path` in one step. The previous file is
    /// left untouched if anything fails before the final rename.
    ///
    /// Returns the hex SHA-256 of the written bytes.
    pub fn write_atomic(&self, path: &Path) -> Result<String> {
        let bytes = self.to_json()?;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        let digest = digest(&bytes);
        info!(path = %path.display(), bytes = bytes.len(), sha256 = %digest, "wrote catalog");
        Ok(digest)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Find vendor documents in `input_dir`, sorted by file name.
pub fn discover_documents(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for dir_entry in fs::read_dir(input_dir)? {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        let is_document = path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION);
        if is_document && dir_entry.file_type()?.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %input_dir.display(), count = paths.len(), "discovered documents");
    Ok(paths)
}

/// Normalize every entry of one document's content.
pub fn normalize_document(
    identity: &str,
    content: &[u8],
    table: &VendorTable,
    normalizer: &Normalizer,
) -> Result<Vec<Motor>> {
    let manufacturer = table.resolve_vendor(identity)?;
    let entries = parse_entries(identity, content)?;
    CatalogMetrics::record_document_loaded(entries.len());

    let motors = entries
        .iter()
        .map(|entry| {
            normalizer
                .normalize(manufacturer, entry)
                .map_err(|e| e.at(identity, entry.position))
        })
        .collect::<Result<Vec<_>>>()?;

    CatalogMetrics::record_motors_normalized(motors.len());
    info!(document = identity, manufacturer, motors = motors.len(), "normalized document");
    Ok(motors)
}

/// Read and normalize one document from disk.
pub fn load_document(path: &Path, table: &VendorTable, normalizer: &Normalizer) -> Result<Vec<Motor>> {
    let identity = document_identity(path)?;
    // Resolve before touching the file so unknown documents fail without I/O
    table.resolve_vendor(identity)?;
    let content = fs::read(path)?;
    normalize_document(identity, &content, table, normalizer)
}

/// Build the catalog from the given documents. Documents are processed in
/// file-name order whatever order they are passed in; any failure aborts the
/// whole build.
pub fn build_catalog(paths: &[PathBuf], table: &VendorTable, options: BuildOptions) -> Result<Catalog> {
    let started = Instant::now();
    let normalizer = if options.strict {
        Normalizer::strict()
    } else {
        Normalizer::new()
    };

    let mut ordered: Vec<&PathBuf> = paths.iter().collect();
    ordered.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    let results: Vec<Result<Vec<Motor>>> = if options.parallel {
        ordered
            .par_iter()
            .map(|path| load_document(path, table, &normalizer))
            .collect()
    } else {
        // Sequential mode stops at the first failing document
        let mut results = Vec::with_capacity(ordered.len());
        for path in &ordered {
            let result = load_document(path, table, &normalizer);
            let failed = result.is_err();
            results.push(result);
            if failed {
                break;
            }
        }
        results
    };

    let mut catalog = Catalog::default();
    for result in results {
        match result {
            Ok(motors) => catalog.motors.extend(motors),
            Err(e) => {
                CatalogMetrics::record_failure(e.kind());
                error!("catalog build failed: {}", e);
                return Err(e);
            }
        }
    }

    CatalogMetrics::record_run_duration(started.elapsed().as_secs_f64());
    info!(documents = ordered.len(), motors = catalog.len(), "catalog built");
    Ok(catalog)
}
