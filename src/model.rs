//! Structured table model shared by the parser, the conversion stages and
//! the renderer.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use crate::errors::Error;

/// Size unit of a large-object length, as in `CLOB(1M)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum SizeUnit {
    /// Kilobytes.
    K,
    /// Megabytes.
    M,
    /// Gigabytes.
    G,
}

impl SizeUnit {
    /// Parse a unit letter, case-insensitively.
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "K" | "k" => Some(Self::K),
            "M" | "m" => Some(Self::M),
            "G" | "g" => Some(Self::G),
            _ => None,
        }
    }
}

impl Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::K => "K",
            Self::M => "M",
            Self::G => "G",
        })
    }
}

/// A column data type: base name plus optional size parameters.
///
/// Descriptors are immutable; the `with_*` methods and the type mapper build
/// new ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct TypeDescriptor {
    base: String,
    precision: Option<u32>,
    scale: Option<u32>,
    unit: Option<SizeUnit>,
    bit_data: bool,
}

impl TypeDescriptor {
    /// Create an unsized type. The base name is stored uppercase.
    #[must_use]
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().to_ascii_uppercase(),
            precision: None,
            scale: None,
            unit: None,
            bit_data: false,
        }
    }

    /// Same type with the given precision (or length).
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Same type with the given scale.
    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Same type with the given length unit.
    #[must_use]
    pub fn with_unit(mut self, unit: SizeUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Same type flagged `FOR BIT DATA`.
    #[must_use]
    pub fn with_bit_data(mut self) -> Self {
        self.bit_data = true;
        self
    }

    /// Same size parameters under another base name. The `FOR BIT DATA`
    /// flag is not carried over.
    #[must_use]
    pub fn renamed(&self, base: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().to_ascii_uppercase(),
            precision: self.precision,
            scale: self.scale,
            unit: self.unit,
            bit_data: false,
        }
    }

    /// Uppercase base name, e.g. `DECIMAL` or `TIMESTAMP WITH TIME ZONE`.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Precision or length, the first size parameter.
    #[must_use]
    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// Scale, the second size parameter.
    #[must_use]
    pub fn scale(&self) -> Option<u32> {
        self.scale
    }

    /// Length unit of a large-object size.
    #[must_use]
    pub fn unit(&self) -> Option<SizeUnit> {
        self.unit
    }

    /// Whether the column was declared `FOR BIT DATA`.
    #[must_use]
    pub fn is_bit_data(&self) -> bool {
        self.bit_data
    }

    /// Whether any size parameter is present.
    #[must_use]
    pub fn has_size(&self) -> bool {
        self.precision.is_some() || self.scale.is_some() || self.unit.is_some()
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if let Some(precision) = self.precision {
            write!(f, "({precision}")?;
            if let Some(unit) = self.unit {
                write!(f, "{unit}")?;
            }
            if let Some(scale) = self.scale {
                write!(f, ",{scale}")?;
            }
            f.write_str(")")?;
        }
        if self.bit_data {
            f.write_str(" FOR BIT DATA")?;
        }
        Ok(())
    }
}

/// Nullability as declared; DB2 treats [`Nullability::Unspecified`] as nullable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nullability {
    /// `NOT NULL`.
    NotNull,
    /// An explicit `NULL`.
    Nullable,
    /// Nothing was said.
    #[default]
    Unspecified,
}

/// A column default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefaultValue {
    /// No default clause.
    #[default]
    None,
    /// `WITH DEFAULT` with no value: DB2 picks a type-dependent default.
    Ambiguous,
    /// A numeric literal, string literal or `NULL`, as written.
    Literal(String),
    /// A special register or function keyword such as `CURRENT TIMESTAMP`.
    Function(String),
    /// Any other expression, as written.
    Expression(String),
}

impl DefaultValue {
    /// The SQL text to emit after `DEFAULT`, if any.
    #[must_use]
    pub fn as_sql(&self) -> Option<&str> {
        match self {
            Self::None | Self::Ambiguous => None,
            Self::Literal(text) | Self::Function(text) | Self::Expression(text) => Some(text),
        }
    }
}

/// A piece of the source statement kept for issue reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceFragment {
    /// The text, as written.
    pub text: String,
    /// Byte offset of the text in its statement.
    pub offset: usize,
}

impl SourceFragment {
    /// Create a fragment.
    #[must_use]
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
        }
    }
}

/// An inline `[CONSTRAINT name] PRIMARY KEY` clause on a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InlinePrimaryKey {
    /// Constraint name, if one was given.
    pub name: Option<String>,
    /// The clause as written.
    pub source: SourceFragment,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDef {
    /// Column name as written, quotes included.
    pub name: String,
    /// Declared type.
    pub data_type: TypeDescriptor,
    /// The type as written, e.g. `clob( 1 m )`.
    pub type_source: Option<SourceFragment>,
    /// Declared nullability.
    pub nullability: Nullability,
    /// Default value.
    pub default: DefaultValue,
    /// The default clause as written, e.g. `WITH DEFAULT CURRENT TIMESTAMP`.
    pub default_source: Option<SourceFragment>,
    /// Inline primary key, until the primary key extractor strips it.
    pub primary_key: Option<InlinePrimaryKey>,
    /// Clauses emitted after the default, as written (`UNIQUE`, unrecognized
    /// clauses).
    pub retained_clauses: Vec<String>,
    /// Byte offset of the definition in its statement.
    pub offset: usize,
}

impl ColumnDef {
    /// Create a column with no clauses.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            data_type,
            type_source: None,
            nullability: Nullability::Unspecified,
            default: DefaultValue::None,
            default_source: None,
            primary_key: None,
            retained_clauses: Vec::new(),
            offset: 0,
        }
    }
}

/// What a table-level constraint does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    /// `PRIMARY KEY (col, ...)`.
    PrimaryKey {
        /// Key columns in declaration order.
        columns: Vec<String>,
    },
    /// `UNIQUE`, `FOREIGN KEY`, `CHECK` and the like, passed through.
    Other,
    /// A table element that could not be decomposed, passed through.
    Unparsed,
}

/// A table-level constraint or opaque table element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintDef {
    /// What the constraint does.
    pub kind: ConstraintKind,
    /// Constraint name, if one was given.
    pub name: Option<String>,
    /// The element as written.
    pub source: SourceFragment,
}

/// The primary key of a converted table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryKey {
    /// Constraint name from the winning declaration, if any.
    pub name: Option<String>,
    /// Key columns in order.
    pub columns: Vec<String>,
}

/// Where a statement came from. Both values are opaque to the converter and
/// are copied verbatim into the rendered header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Provenance {
    source_path: String,
    extracted_at: String,
}

impl Provenance {
    /// Create provenance metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySourcePath`] for an empty path and
    /// [`Error::LineBreakInProvenance`] when either value contains a line
    /// break.
    pub fn new(
        source_path: impl Into<String>,
        extracted_at: impl Into<String>,
    ) -> Result<Self, Error> {
        let source_path = source_path.into();
        let extracted_at = extracted_at.into();
        if source_path.is_empty() {
            return Err(Error::EmptySourcePath);
        }
        if source_path.contains(['\n', '\r']) {
            return Err(Error::LineBreakInProvenance {
                field: "source path",
            });
        }
        if extracted_at.contains(['\n', '\r']) {
            return Err(Error::LineBreakInProvenance {
                field: "extraction timestamp",
            });
        }
        Ok(Self {
            source_path,
            extracted_at,
        })
    }

    /// Originating file path.
    #[must_use]
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Extraction timestamp.
    #[must_use]
    pub fn extracted_at(&self) -> &str {
        &self.extracted_at
    }
}

/// Deserialization goes through [`Provenance::new`], so a deserialized value
/// is validated the same way.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Provenance {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Fields {
            source_path: String,
            extracted_at: String,
        }

        let fields = Fields::deserialize(deserializer)?;
        Self::new(fields.source_path, fields.extracted_at).map_err(serde::de::Error::custom)
    }
}

/// A parsed `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableDef {
    /// Schema name; the configured sentinel when the source had none.
    pub schema: String,
    /// Whether the source statement qualified the table with a schema.
    pub schema_explicit: bool,
    /// Table name as written.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Table-level constraints and opaque elements in declaration order.
    pub constraints: Vec<ConstraintDef>,
    /// DB2 table options found after the column list. They are never rendered.
    pub table_options: Vec<SourceFragment>,
    /// Primary key, once extracted.
    pub primary_key: Option<PrimaryKey>,
    /// Where the statement came from.
    pub provenance: Provenance,
}

impl TableDef {
    /// `schema.name`, with the sentinel schema when none was written.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Per-table file stem, `SCHEMA__TABLE`, with quotes removed.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!(
            "{}__{}",
            self.schema.trim_matches('"'),
            self.name.trim_matches('"')
        )
    }

    /// Look a column up by name, case-insensitively for unquoted names.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        let wanted = fold_identifier(name);
        self.columns
            .iter()
            .find(|column| fold_identifier(&column.name) == wanted)
    }
}

/// Comparison key for an identifier: unquoted names fold to uppercase,
/// quoted names compare exactly (without their quotes).
#[must_use]
pub fn fold_identifier(name: &str) -> String {
    match name
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(quoted) => quoted.into(),
        None => name.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_type_descriptor_display() {
        assert_eq!(TypeDescriptor::new("integer").to_string(), "INTEGER");
        assert_eq!(
            TypeDescriptor::new("DECIMAL")
                .with_precision(18)
                .with_scale(2)
                .to_string(),
            "DECIMAL(18,2)"
        );
        assert_eq!(
            TypeDescriptor::new("CLOB")
                .with_precision(1)
                .with_unit(SizeUnit::M)
                .to_string(),
            "CLOB(1M)"
        );
        assert_eq!(
            TypeDescriptor::new("CHAR")
                .with_precision(8)
                .with_bit_data()
                .to_string(),
            "CHAR(8) FOR BIT DATA"
        );
    }

    #[test]
    fn test_renamed_keeps_size_and_drops_bit_data() {
        let original = TypeDescriptor::new("VARCHAR").with_precision(4).with_bit_data();
        let renamed = original.renamed("binary");
        assert_eq!(renamed.to_string(), "BINARY(4)");
        assert!(!renamed.is_bit_data());
        assert!(original.is_bit_data());
    }

    #[test]
    fn test_provenance_validation() {
        assert!(Provenance::new("data/input/a.sql", "2025-10-20T00:00:00Z").is_ok());
        assert_eq!(Provenance::new("", "x"), Err(Error::EmptySourcePath));
        assert!(matches!(
            Provenance::new("a\nb", "x"),
            Err(Error::LineBreakInProvenance { .. })
        ));
        assert!(matches!(
            Provenance::new("a", "x\r\n"),
            Err(Error::LineBreakInProvenance { .. })
        ));
    }

    #[cfg(feature = "manifest")]
    #[test]
    fn test_deserialized_provenance_is_validated() {
        let parsed: Provenance =
            serde_json::from_str(r#"{"source_path":"a.sql","extracted_at":"2025-10-20"}"#).unwrap();
        assert_eq!(parsed, Provenance::new("a.sql", "2025-10-20").unwrap());

        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(serde_json::from_str::<Provenance>(&json).unwrap(), parsed);

        assert!(
            serde_json::from_str::<Provenance>(r#"{"source_path":"","extracted_at":"now"}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<Provenance>(
                r#"{"source_path":"a.sql","extracted_at":"now\nDROP TABLE X;"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_fold_identifier() {
        assert_eq!(fold_identifier("account_id"), "ACCOUNT_ID");
        assert_eq!(fold_identifier("\"Mixed\""), "Mixed");
    }

    #[test]
    fn test_default_as_sql() {
        assert_eq!(DefaultValue::None.as_sql(), None);
        assert_eq!(DefaultValue::Ambiguous.as_sql(), None);
        assert_eq!(DefaultValue::Literal("0".into()).as_sql(), Some("0"));
    }
}
