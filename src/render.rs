//! Snowflake DDL output formatting.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt::{self, Display};

use crate::model::{ColumnDef, Nullability, TableDef};

/// One column line, without indentation or separator:
/// name, type, nullability, default, retained clauses.
impl Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        match self.nullability {
            Nullability::NotNull => f.write_str(" NOT NULL")?,
            Nullability::Nullable => f.write_str(" NULL")?,
            Nullability::Unspecified => {}
        }
        if let Some(default) = self.default.as_sql() {
            write!(f, " DEFAULT {default}")?;
        }
        for clause in &self.retained_clauses {
            write!(f, " {clause}")?;
        }
        Ok(())
    }
}

/// A converted table rendered as Snowflake DDL.
///
/// The output is the provenance header, a blank line, the `CREATE TABLE`
/// statement with one column or constraint per line in declaration order,
/// and the primary key as a trailing `ALTER TABLE` statement.
#[derive(Debug, Clone, Copy)]
pub struct SnowflakeDdl<'a> {
    table: &'a TableDef,
    qualify_default_schema: bool,
}

impl<'a> SnowflakeDdl<'a> {
    /// Wrap a table for rendering.
    ///
    /// A table whose schema was not written in the source is rendered
    /// unqualified unless `qualify_default_schema` is set.
    #[must_use]
    pub fn new(table: &'a TableDef, qualify_default_schema: bool) -> Self {
        Self {
            table,
            qualify_default_schema,
        }
    }

    /// The table name as it appears in the output.
    #[must_use]
    pub fn table_name(&self) -> Cow<'a, str> {
        if self.table.schema_explicit || self.qualify_default_schema {
            Cow::Owned(self.table.qualified_name())
        } else {
            Cow::Borrowed(&self.table.name)
        }
    }
}

impl Display for SnowflakeDdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table;
        let name = self.table_name();

        writeln!(f, "-- Source file: {}", table.provenance.source_path())?;
        writeln!(f, "-- Extracted: {}", table.provenance.extracted_at())?;
        writeln!(f)?;

        writeln!(f, "CREATE TABLE {name} (")?;
        for (i, line) in body_lines(table).enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write!(f, "  {line}")?;
        }
        if !table.columns.is_empty() || !table.constraints.is_empty() {
            writeln!(f)?;
        }
        writeln!(f, ");")?;

        if let Some(key) = &table.primary_key {
            writeln!(
                f,
                "ALTER TABLE {name} ADD PRIMARY KEY ({});",
                key.columns.join(", ")
            )?;
        }
        Ok(())
    }
}

/// One line of the `CREATE TABLE` body.
enum Line<'a> {
    Column(&'a ColumnDef),
    Verbatim(&'a str),
}

impl Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => Display::fmt(column, f),
            Self::Verbatim(text) => f.write_str(text),
        }
    }
}

/// Columns, constraints and verbatim elements in source order. A column
/// comes first when offsets tie.
fn body_lines(table: &TableDef) -> impl Iterator<Item = Line<'_>> {
    let mut columns = table.columns.iter().peekable();
    let mut elements = table.constraints.iter().peekable();
    core::iter::from_fn(move || {
        let element_first = match (columns.peek(), elements.peek()) {
            (Some(column), Some(element)) => element.source.offset < column.offset,
            (None, Some(_)) => true,
            (_, None) => false,
        };
        if element_first {
            elements
                .next()
                .map(|element| Line::Verbatim(&element.source.text))
        } else {
            columns.next().map(Line::Column)
        }
    })
}

/// Render a converted table as Snowflake DDL text.
#[must_use]
pub fn render(table: &TableDef, qualify_default_schema: bool) -> String {
    SnowflakeDdl::new(table, qualify_default_schema).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ConstraintDef, ConstraintKind, DefaultValue, PrimaryKey, Provenance, SourceFragment,
        TypeDescriptor,
    };
    use alloc::vec;
    use alloc::vec::Vec;

    fn account() -> TableDef {
        let mut id = ColumnDef::new("ID", TypeDescriptor::new("INTEGER"));
        id.nullability = Nullability::NotNull;
        let mut created = ColumnDef::new("CRT_TS", TypeDescriptor::new("TIMESTAMP_NTZ"));
        created.default = DefaultValue::Function("CURRENT_TIMESTAMP".into());
        let mut code = ColumnDef::new("CODE", TypeDescriptor::new("CHAR").with_precision(3));
        code.retained_clauses = vec!["UNIQUE".into()];
        TableDef {
            schema: "APP".into(),
            schema_explicit: true,
            name: "ACCOUNT".into(),
            columns: vec![id, created, code],
            constraints: Vec::new(),
            table_options: Vec::new(),
            primary_key: Some(PrimaryKey {
                name: None,
                columns: vec!["ID".into()],
            }),
            provenance: Provenance::new("data/input/app.sql", "2025-10-20T10:00:00Z").unwrap(),
        }
    }

    #[test]
    fn test_render_table() {
        assert_eq!(
            render(&account(), false),
            "\
-- Source file: data/input/app.sql
-- Extracted: 2025-10-20T10:00:00Z

CREATE TABLE APP.ACCOUNT (
  ID INTEGER NOT NULL,
  CRT_TS TIMESTAMP_NTZ DEFAULT CURRENT_TIMESTAMP,
  CODE CHAR(3) UNIQUE
);
ALTER TABLE APP.ACCOUNT ADD PRIMARY KEY (ID);
"
        );
    }

    #[test]
    fn test_default_schema_qualification() {
        let mut table = account();
        table.schema = "DEFAULT".into();
        table.schema_explicit = false;
        table.primary_key = None;
        table.constraints.push(ConstraintDef {
            kind: ConstraintKind::Other,
            name: None,
            source: SourceFragment::new("CHECK (ID > 0)", 0),
        });

        let unqualified = render(&table, false);
        assert!(unqualified.contains("CREATE TABLE ACCOUNT (\n"));
        assert!(unqualified.ends_with("  CODE CHAR(3) UNIQUE,\n  CHECK (ID > 0)\n);\n"));
        assert!(!unqualified.contains("ALTER TABLE"));

        let qualified = render(&table, true);
        assert!(qualified.contains("CREATE TABLE DEFAULT.ACCOUNT (\n"));
    }

    #[test]
    fn test_verbatim_elements_keep_their_position() {
        let mut table = account();
        table.primary_key = None;
        for (column, offset) in table.columns.iter_mut().zip([10, 40, 70]) {
            column.offset = offset;
        }
        table.constraints = vec![
            ConstraintDef {
                kind: ConstraintKind::Unparsed,
                name: None,
                source: SourceFragment::new("BAL DECIMAL(X)", 25),
            },
            ConstraintDef {
                kind: ConstraintKind::Other,
                name: None,
                source: SourceFragment::new("UNIQUE (CODE)", 90),
            },
        ];
        assert!(render(&table, false).ends_with(
            "\
CREATE TABLE APP.ACCOUNT (
  ID INTEGER NOT NULL,
  BAL DECIMAL(X),
  CRT_TS TIMESTAMP_NTZ DEFAULT CURRENT_TIMESTAMP,
  CODE CHAR(3) UNIQUE,
  UNIQUE (CODE)
);
"
        ));
    }

    #[test]
    fn test_render_empty_table() {
        let mut table = account();
        table.columns.clear();
        table.primary_key = None;
        assert!(render(&table, false).ends_with("CREATE TABLE APP.ACCOUNT (\n);\n"));
    }
}
