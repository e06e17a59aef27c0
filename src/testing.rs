//! Property checks shared by the fuzz targets and the integration tests.
//!
//! This module is gated behind the `testing` feature. Every helper panics
//! when the property it checks does not hold.
//!
//! # Provided helpers
//!
//! - [`check_conversion`]: convert arbitrary text and check the shape of the output
//! - [`check_type_mapping`]: check that mapping a type is idempotent and issue-free the second time

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Converter;
use crate::issues::messages;
use crate::model::{Provenance, TypeDescriptor};
use crate::render::SnowflakeDdl;
use crate::split::StatementSplitter;
use crate::typemap::TypeMapper;

/// Provenance used by the checks.
///
/// # Panics
///
/// Never: the values are valid.
#[must_use]
pub fn provenance() -> Provenance {
    Provenance::new("fuzz/input.sql", "1970-01-01T00:00:00Z").unwrap()
}

/// Convert `input` and check the invariants every conversion must satisfy:
///
/// - every located statement yields either one table or one skipped-statement issue;
/// - every rendered table starts with the provenance header;
/// - every rendered table ends with its `CREATE TABLE` statement, followed by
///   the primary key statement exactly when the table has a key;
/// - every issue names a table.
///
/// # Panics
///
/// Panics if an invariant does not hold.
pub fn check_conversion(input: &str) {
    let provenance = provenance();
    let conversion = Converter::new().convert(input, &provenance);

    let statements = StatementSplitter::new(input).count();
    let skipped = conversion
        .issues
        .iter()
        .filter(|issue| issue.message() == messages::STATEMENT_SKIPPED)
        .count();
    assert_eq!(
        conversion.tables.len() + skipped,
        statements,
        "statements lost in {input:?}"
    );

    let header = format!(
        "-- Source file: {}\n-- Extracted: {}\n\n",
        provenance.source_path(),
        provenance.extracted_at()
    );
    for converted in &conversion.tables {
        assert!(converted.ddl.starts_with(&header), "{}", converted.ddl);
        let tail = match &converted.table.primary_key {
            Some(key) => format!(
                ");\nALTER TABLE {} ADD PRIMARY KEY ({});\n",
                SnowflakeDdl::new(&converted.table, false).table_name(),
                key.columns.join(", ")
            ),
            None => String::from(");\n"),
        };
        assert!(converted.ddl.ends_with(&tail), "{}", converted.ddl);
    }

    for issue in &conversion.issues {
        assert!(!issue.table().is_empty(), "{issue}");
    }
}

/// Map `ty` twice with the built-in rules and check that the second mapping
/// changes nothing and reports nothing, unless the base type has no rule.
///
/// # Panics
///
/// Panics if the mapping is not idempotent or a mapped type keeps the
/// `FOR BIT DATA` flag.
pub fn check_type_mapping(ty: &TypeDescriptor) {
    let mapper = TypeMapper::new();
    let inconsistent: Vec<(&str, &str)> = mapper.inconsistencies().collect();
    assert!(inconsistent.is_empty(), "{inconsistent:?}");

    let (once, issue) = mapper.map(ty);
    assert!(!once.is_bit_data(), "{ty} -> {once}");
    if issue == Some(messages::UNMAPPED_TYPE) {
        assert_eq!(&once, ty);
        return;
    }

    let (twice, issue) = mapper.map(&once);
    assert_eq!(once, twice, "{ty}");
    assert_eq!(issue, None, "{ty} -> {once}");
    let rendered: String = format!("{twice}");
    assert_eq!(rendered, format!("{once}"));
}
