//! Build manifest model.
//!
//! When `emitManifest` is set, the engine writes a machine-readable mapping
//! from logical entry name to emitted file path(s) into the output
//! directory. The engine owns writing it; this crate owns the shape so
//! serving code can resolve hashed filenames from it.

use crate::plan::OutputSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// File name of the emitted manifest, relative to the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Mapping from logical entry/asset name to its emitted record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

/// One emitted record. Non-entry assets may appear with `is_entry` unset;
/// whether they do is the engine's documented behavior, not asserted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestEntry {
    /// Emitted file path (typically hashed), relative to the output dir.
    pub file: String,

    /// Source path the record was built from.
    pub src: String,

    /// Whether this record is a declared entry point.
    pub is_entry: bool,

    /// Emitted CSS files belonging to this record.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub css: Vec<String>,

    /// Emitted static assets belonging to this record.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the manifest lives for the given output spec.
    #[must_use]
    pub fn path_in(output: &OutputSpec) -> PathBuf {
        output.out_dir.join(MANIFEST_FILE)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: ManifestEntry) {
        self.entries.insert(name.into(), entry);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.get(name)
    }

    /// Resolve a logical name to its emitted file path.
    #[must_use]
    pub fn file_for(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.file.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ManifestEntry)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse a manifest the engine wrote.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
