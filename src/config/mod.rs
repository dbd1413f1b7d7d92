pub mod manifest;

pub use manifest::{ManifestError, SeedManifest};
