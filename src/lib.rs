#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;
#[cfg(feature = "arbitrary")]
extern crate std;

pub mod convert;
pub mod defaults;
pub mod errors;
pub mod issues;
#[cfg(feature = "manifest")]
pub mod manifest;
pub mod model;
pub mod parser;
pub mod primary_key;
pub mod render;
pub(crate) mod scan;
pub mod split;
#[cfg(feature = "testing")]
pub mod testing;
pub mod typemap;

// Re-export main types
pub use convert::{Conversion, ConversionOptions, ConvertedTable, Converter};
pub use defaults::DefaultTranslator;
pub use issues::{Issue, IssueLog};
pub use model::{
    ColumnDef, ConstraintDef, ConstraintKind, DefaultValue, Nullability, PrimaryKey, Provenance,
    SizeUnit, TableDef, TypeDescriptor,
};
pub use parser::ParseError;
pub use primary_key::PrimaryKeyPolicy;
pub use split::{SplitError, StatementSplitter};
pub use typemap::{TypeMapper, TypeRule};

// Re-export errors
pub use errors::Error;

/// Convert a blob of DB2 DDL with the default options and rule tables.
///
/// Shorthand for [`Converter::new`] followed by [`Converter::convert`].
#[must_use]
pub fn convert(input: &str, provenance: &Provenance) -> Conversion {
    Converter::new().convert(input, provenance)
}
