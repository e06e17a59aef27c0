//! Issue records for conversions that need a human to look at them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

/// Issue messages produced by the converter.
///
/// Callers filtering issues should compare against these constants rather
/// than hard-coding the text.
pub mod messages {
    /// A statement could not be delimited or its header could not be parsed.
    pub const STATEMENT_SKIPPED: &str = "statement skipped: unparsable";
    /// The column list was empty.
    pub const NO_COLUMNS: &str = "table has no columns";
    /// Two columns share a name, compared case-insensitively.
    pub const DUPLICATE_COLUMN: &str = "duplicate column name";
    /// A column clause the parser does not know was kept as written.
    pub const UNRECOGNIZED_CLAUSE: &str = "unrecognized clause retained verbatim";
    /// A column definition could not be decomposed.
    pub const COLUMN_NOT_UNDERSTOOD: &str = "column definition not understood, retained verbatim";
    /// A table-level constraint could not be decomposed.
    pub const CONSTRAINT_NOT_UNDERSTOOD: &str = "constraint not understood, retained verbatim";
    /// A DB2 storage or audit option after the column list was dropped.
    pub const TABLE_OPTION_REMOVED: &str = "DB2 table option removed";
    /// The base type has no mapping rule.
    pub const UNMAPPED_TYPE: &str = "unmapped type, verify manually";
    /// `CLOB` lost its size qualifier.
    pub const CLOB_SIZE_LOSS: &str = "CLOB mapped to VARCHAR (possible size loss)";
    /// `DBCLOB` lost its size qualifier.
    pub const DBCLOB_SIZE_LOSS: &str = "DBCLOB mapped to VARCHAR (possible size loss)";
    /// `BLOB` lost its size qualifier.
    pub const BLOB_SIZE_LOSS: &str = "BLOB mapped to BINARY (possible size loss)";
    /// Graphic (double-byte) strings became `VARCHAR`.
    pub const GRAPHIC_TO_VARCHAR: &str = "(VAR)GRAPHIC mapped to VARCHAR (verify unicode conversion)";
    /// `XML` became `VARIANT`.
    pub const XML_TO_VARIANT: &str = "XML mapped to VARIANT";
    /// `DECFLOAT` became binary floating point.
    pub const DECFLOAT_TO_FLOAT: &str = "DECFLOAT mapped to FLOAT (decimal precision not preserved)";
    /// A `FOR BIT DATA` character column became `BINARY`.
    pub const BIT_DATA_TO_BINARY: &str = "mapped to BINARY from FOR BIT DATA";
    /// `WITH DEFAULT` without a value was dropped.
    pub const AMBIGUOUS_DEFAULT: &str = "ambiguous default removed";
    /// A default expression was kept as written.
    pub const UNTRANSLATED_DEFAULT: &str = "default expression not translated, verify manually";
    /// A second primary key declaration was dropped.
    pub const DUPLICATE_PRIMARY_KEY: &str = "duplicate primary key declaration ignored";
    /// The primary key names a column the table does not declare.
    pub const UNKNOWN_PRIMARY_KEY_COLUMN: &str = "primary key references unknown column";
}

/// Longest fragment, in characters, shown by the textual rendering of an issue.
pub const FRAGMENT_DISPLAY_LIMIT: usize = 80;

/// A conversion that needs review.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
    table: String,
    column: Option<String>,
    message: String,
    fragment: String,
}

impl Issue {
    /// Create an issue about the table as a whole.
    #[must_use]
    pub fn table_level(
        table: impl Into<String>,
        message: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: None,
            message: message.into(),
            fragment: fragment.into(),
        }
    }

    /// Create an issue about one column.
    #[must_use]
    pub fn column(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: Some(column.into()),
            message: message.into(),
            fragment: fragment.into(),
        }
    }

    /// Schema-qualified table the issue belongs to.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column the issue belongs to, if any.
    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// What happened.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source text that triggered the issue, verbatim.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

/// `<table> | <column> | <message> | <fragment>`, with `-` for a missing
/// column. Whitespace runs in the fragment collapse to one space and the
/// fragment is cut at [`FRAGMENT_DISPLAY_LIMIT`] characters, so every issue
/// fits on one line.
impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | ",
            self.table,
            self.column.as_deref().unwrap_or("-"),
            self.message
        )?;
        let words = self.fragment.split_whitespace();
        let mut written = 0;
        for (i, word) in words.enumerate() {
            if i > 0 {
                if written == FRAGMENT_DISPLAY_LIMIT {
                    break;
                }
                f.write_str(" ")?;
                written += 1;
            }
            for c in word.chars() {
                if written == FRAGMENT_DISPLAY_LIMIT {
                    return Ok(());
                }
                write!(f, "{c}")?;
                written += 1;
            }
        }
        Ok(())
    }
}

/// Accumulator for the issues of one statement.
///
/// Each issue is recorded with the byte position of the construct that
/// raised it. Stages run one after another, so recording order differs from
/// source order; [`IssueLog::into_ordered`] restores source order, keeping
/// recording order between issues at the same position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueLog {
    entries: Vec<(usize, Issue)>,
}

impl IssueLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue raised by the construct at `position`.
    pub fn record(&mut self, position: usize, issue: Issue) {
        self.entries.push((position, issue));
    }

    /// Number of recorded issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The recorded issues in source order.
    #[must_use]
    pub fn into_ordered(mut self) -> Vec<Issue> {
        self.entries.sort_by_key(|(position, _)| *position);
        self.entries.into_iter().map(|(_, issue)| issue).collect()
    }
}
