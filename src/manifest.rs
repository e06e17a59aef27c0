//! Manifest entries describing the per-table files a caller writes.
//!
//! The crate never touches the filesystem; this module only builds the
//! records and their JSON so that batch tools agree on one format.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::convert::ConvertedTable;
use crate::model::TableDef;

/// One table of a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Schema name, the default sentinel when none was written.
    pub schema: String,
    /// Table name.
    pub table: String,
    /// Suggested file name for the table's DDL, `SCHEMA__TABLE.sql`.
    pub path: String,
    /// File the statement was extracted from.
    pub source_file: String,
}

impl From<&TableDef> for ManifestEntry {
    fn from(table: &TableDef) -> Self {
        Self {
            schema: table.schema.clone(),
            table: table.name.clone(),
            path: format!("{}.sql", table.file_stem()),
            source_file: table.provenance.source_path().into(),
        }
    }
}

/// Manifest entries for every converted table, in order.
#[must_use]
pub fn manifest(tables: &[ConvertedTable]) -> Vec<ManifestEntry> {
    tables
        .iter()
        .map(|converted| ManifestEntry::from(&converted.table))
        .collect()
}

/// The manifest as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn manifest_json(tables: &[ConvertedTable]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&manifest(tables))
}
