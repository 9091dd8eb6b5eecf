// Normalization pipeline: vendor resolution, document loading, record normalization, catalog assembly

pub mod catalog;
pub mod loader;
pub mod normalize;
pub mod vendor;

// Re-export key types and functions from each stage
pub use catalog::{build_catalog, discover_documents, BuildOptions, Catalog};
pub use loader::{parse_entries, RawEntry, RawSample};
pub use normalize::{DelayList, FieldError, Motor, Normalizer};
pub use vendor::VendorTable;
