//! The conversion pipeline: split, parse, map types and defaults, extract the
//! primary key, render.

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Display, Write};

use crate::defaults::DefaultTranslator;
use crate::issues::{Issue, IssueLog, messages};
use crate::model::{Provenance, TableDef};
use crate::parser::{parse_header, parse_table};
use crate::primary_key::{self, PrimaryKeyPolicy};
use crate::render::render;
use crate::split::StatementSplitter;
use crate::typemap::TypeMapper;

/// Table identifier used for a skipped statement whose name cannot be read.
pub const UNKNOWN_TABLE: &str = "<unknown>";

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionOptions {
    /// Schema recorded for tables written without one. Defaults to `DEFAULT`.
    pub default_schema: String,
    /// Which declaration wins when a table declares several primary keys.
    pub primary_key_policy: PrimaryKeyPolicy,
    /// Render tables written without a schema qualified with
    /// [`ConversionOptions::default_schema`].
    pub qualify_default_schema: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            default_schema: String::from("DEFAULT"),
            primary_key_policy: PrimaryKeyPolicy::default(),
            qualify_default_schema: false,
        }
    }
}

impl ConversionOptions {
    /// Set the schema used for tables written without one.
    #[must_use]
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }

    /// Set the duplicate primary key policy.
    #[must_use]
    pub fn with_primary_key_policy(mut self, policy: PrimaryKeyPolicy) -> Self {
        self.primary_key_policy = policy;
        self
    }

    /// Set whether schema-less tables are rendered with the default schema.
    #[must_use]
    pub fn with_qualify_default_schema(mut self, qualify: bool) -> Self {
        self.qualify_default_schema = qualify;
        self
    }
}

/// One converted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedTable {
    /// The transformed, Snowflake-typed model.
    pub table: TableDef,
    /// The rendered Snowflake DDL.
    pub ddl: String,
}

/// Result of converting a blob of DDL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    /// Converted tables, in input order.
    pub tables: Vec<ConvertedTable>,
    /// Issues in input order.
    pub issues: Vec<Issue>,
}

impl Conversion {
    /// Every issue on its own line, as `table | column | message | fragment`.
    #[must_use]
    pub fn issues_report(&self) -> String {
        let mut report = String::new();
        for issue in &self.issues {
            // Writing to a String cannot fail.
            let _ = writeln!(report, "{issue}");
        }
        report
    }

    fn append(&mut self, other: Conversion) {
        self.tables.extend(other.tables);
        self.issues.extend(other.issues);
    }
}

/// Converts DB2 `CREATE TABLE` DDL into Snowflake DDL.
///
/// A converter is immutable once built and can be shared between threads.
///
/// # Example
///
/// ```rust
/// use db2_snowflake_ddl::convert::{ConversionOptions, Converter};
/// use db2_snowflake_ddl::model::Provenance;
/// use db2_snowflake_ddl::primary_key::PrimaryKeyPolicy;
///
/// let converter = Converter::new().with_options(
///     ConversionOptions::default().with_primary_key_policy(PrimaryKeyPolicy::KeepLast),
/// );
/// let provenance = Provenance::new("db2/app.sql", "2025-10-20T10:00:00Z").unwrap();
/// let conversion = converter.convert(
///     "CREATE TABLE APP.T (ID INTEGER NOT NULL PRIMARY KEY, AMT DECIMAL(9,2));",
///     &provenance,
/// );
/// assert!(conversion.issues.is_empty());
/// assert!(conversion.tables[0].ddl.contains("  AMT NUMBER(9,2)\n"));
/// assert!(conversion.tables[0].ddl.ends_with("ALTER TABLE APP.T ADD PRIMARY KEY (ID);\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Converter {
    options: ConversionOptions,
    types: TypeMapper,
    defaults: DefaultTranslator,
}

impl Converter {
    /// Create a converter with the default options and rule tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the type mapping rules.
    #[must_use]
    pub fn with_type_mapper(mut self, types: TypeMapper) -> Self {
        self.types = types;
        self
    }

    /// Replace the default translation rules.
    #[must_use]
    pub fn with_default_translator(mut self, defaults: DefaultTranslator) -> Self {
        self.defaults = defaults;
        self
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert every `CREATE TABLE` statement in `input`.
    ///
    /// Statements that cannot be delimited or whose header cannot be parsed
    /// are skipped with one issue each; the others are still converted.
    #[must_use]
    pub fn convert(&self, input: &str, provenance: &Provenance) -> Conversion {
        let mut conversion = Conversion::default();
        for statement in StatementSplitter::new(input) {
            let converted = match statement {
                Ok(statement) => self.convert_statement(statement.text, provenance),
                Err(err) => self.skipped(err.fragment(), &err),
            };
            conversion.append(converted);
        }
        log::debug!(
            "{}: converted {} tables with {} issues",
            provenance.source_path(),
            conversion.tables.len(),
            conversion.issues.len()
        );
        conversion
    }

    /// Convert one already delimited `CREATE TABLE` statement.
    #[must_use]
    pub fn convert_statement(&self, text: &str, provenance: &Provenance) -> Conversion {
        let mut issues = IssueLog::new();
        let mut table =
            match parse_table(text, &self.options.default_schema, provenance, &mut issues) {
                Ok(table) => table,
                Err(err) => return self.skipped(text, &err),
            };

        self.map_columns(&mut table, &mut issues);
        primary_key::extract(&mut table, self.options.primary_key_policy, &mut issues);

        let ddl = render(&table, self.options.qualify_default_schema);
        log::debug!(
            "converted {} ({} columns, {} issues)",
            table.qualified_name(),
            table.columns.len(),
            issues.len()
        );
        Conversion {
            tables: vec![ConvertedTable { table, ddl }],
            issues: issues.into_ordered(),
        }
    }

    /// Apply the type and default rules to every column.
    fn map_columns(&self, table: &mut TableDef, issues: &mut IssueLog) {
        let qualified = table.qualified_name();
        for column in &mut table.columns {
            let (data_type, note) = self.types.map(&column.data_type);
            if let Some(note) = note {
                let (offset, fragment) = column.type_source.as_ref().map_or_else(
                    || (column.offset, column.data_type.to_string()),
                    |source| (source.offset, source.text.clone()),
                );
                issues.record(
                    offset,
                    Issue::column(&qualified, &column.name, note, fragment),
                );
            }
            column.data_type = data_type;

            let (default, note) = self.defaults.translate(&column.default);
            if let Some(note) = note {
                let (offset, fragment) = column
                    .default_source
                    .as_ref()
                    .map_or((column.offset, ""), |source| {
                        (source.offset, source.text.as_str())
                    });
                issues.record(
                    offset,
                    Issue::column(&qualified, &column.name, note, fragment),
                );
            }
            column.default = default;
        }
    }

    fn skipped(&self, text: &str, reason: &dyn Display) -> Conversion {
        let table = parse_header(text).map_or_else(
            |_| UNKNOWN_TABLE.to_string(),
            |header| header.qualified_name(&self.options.default_schema),
        );
        log::warn!("skipping statement for {table}: {reason}");
        Conversion {
            tables: Vec::new(),
            issues: vec![Issue::table_level(
                table,
                messages::STATEMENT_SKIPPED,
                text,
            )],
        }
    }
}
