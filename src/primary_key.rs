//! Primary key extraction.
//!
//! DB2 declares a primary key either inline on a column or as a table-level
//! constraint, and sloppy DDL sometimes does both. The extractor strips every
//! declaration from the table, keeps one according to a
//! [`PrimaryKeyPolicy`], and stores it in [`TableDef::primary_key`] so the
//! renderer can emit it as a separate `ALTER TABLE` statement.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::issues::{Issue, IssueLog, messages};
use crate::model::{ConstraintDef, ConstraintKind, PrimaryKey, SourceFragment, TableDef};

/// Which primary key declaration wins when a table has several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimaryKeyPolicy {
    /// The first declaration in parse order: inline keys in column order,
    /// then table-level constraints.
    #[default]
    KeepFirst,
    /// The last declaration in parse order.
    KeepLast,
}

struct Declaration {
    name: Option<String>,
    columns: Vec<String>,
    source: SourceFragment,
    /// Column carrying an inline declaration.
    owner: Option<String>,
}

/// Move the primary key declarations of `table` into
/// [`TableDef::primary_key`].
///
/// Every declaration but the winner is reported as a duplicate. Winner
/// columns that the table does not declare are reported too; the key is kept
/// as written.
pub fn extract(table: &mut TableDef, policy: PrimaryKeyPolicy, issues: &mut IssueLog) {
    let mut declarations = Vec::new();

    for column in &mut table.columns {
        if let Some(inline) = column.primary_key.take() {
            declarations.push(Declaration {
                name: inline.name,
                columns: vec![column.name.clone()],
                source: inline.source,
                owner: Some(column.name.clone()),
            });
        }
    }
    for constraint in core::mem::take(&mut table.constraints) {
        match constraint.kind {
            ConstraintKind::PrimaryKey { columns } => declarations.push(Declaration {
                name: constraint.name,
                columns,
                source: constraint.source,
                owner: None,
            }),
            kind => table.constraints.push(ConstraintDef { kind, ..constraint }),
        }
    }

    if declarations.is_empty() {
        return;
    }
    let winner = match policy {
        PrimaryKeyPolicy::KeepFirst => 0,
        PrimaryKeyPolicy::KeepLast => declarations.len() - 1,
    };
    let qualified = table.qualified_name();
    let winner = declarations.swap_remove(winner);

    for loser in &declarations {
        let issue = match &loser.owner {
            Some(column) => Issue::column(
                &qualified,
                column,
                messages::DUPLICATE_PRIMARY_KEY,
                &loser.source.text,
            ),
            None => Issue::table_level(
                &qualified,
                messages::DUPLICATE_PRIMARY_KEY,
                &loser.source.text,
            ),
        };
        issues.record(loser.source.offset, issue);
    }

    for column in &winner.columns {
        if table.column(column).is_none() {
            issues.record(
                winner.source.offset,
                Issue::column(
                    &qualified,
                    column,
                    messages::UNKNOWN_PRIMARY_KEY_COLUMN,
                    &winner.source.text,
                ),
            );
        }
    }

    log::trace!("{qualified}: primary key ({})", winner.columns.join(", "));
    table.primary_key = Some(PrimaryKey {
        name: winner.name,
        columns: winner.columns,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;
    use crate::parser::parse_table;

    fn table(text: &str) -> TableDef {
        let provenance = Provenance::new("t.sql", "now").unwrap();
        let mut issues = IssueLog::new();
        parse_table(text, "DEFAULT", &provenance, &mut issues).unwrap()
    }

    fn run(text: &str, policy: PrimaryKeyPolicy) -> (TableDef, Vec<Issue>) {
        let mut table = table(text);
        let mut issues = IssueLog::new();
        extract(&mut table, policy, &mut issues);
        (table, issues.into_ordered())
    }

    #[test]
    fn test_inline_key_is_stripped() {
        let (table, issues) = run(
            "CREATE TABLE T (ID INT NOT NULL PRIMARY KEY, NAME VARCHAR(5))",
            PrimaryKeyPolicy::default(),
        );
        assert!(issues.is_empty());
        assert!(table.columns.iter().all(|c| c.primary_key.is_none()));
        assert_eq!(
            table.primary_key,
            Some(PrimaryKey {
                name: None,
                columns: vec!["ID".into()]
            })
        );
    }

    #[test]
    fn test_table_level_key_keeps_other_constraints() {
        let (table, issues) = run(
            "CREATE TABLE T (A INT, B INT, CONSTRAINT PK_T PRIMARY KEY (A, B), UNIQUE (B))",
            PrimaryKeyPolicy::KeepFirst,
        );
        assert!(issues.is_empty());
        let key = table.primary_key.unwrap();
        assert_eq!(key.name.as_deref(), Some("PK_T"));
        assert_eq!(key.columns, ["A", "B"]);
        assert_eq!(table.constraints.len(), 1);
        assert_eq!(table.constraints[0].source.text, "UNIQUE (B)");
    }

    #[test]
    fn test_duplicates_keep_first() {
        let (table, issues) = run(
            "CREATE TABLE T (A INT PRIMARY KEY, B INT, PRIMARY KEY (B))",
            PrimaryKeyPolicy::KeepFirst,
        );
        assert_eq!(table.primary_key.unwrap().columns, ["A"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message(), messages::DUPLICATE_PRIMARY_KEY);
        assert_eq!(issues[0].column_name(), None);
        assert_eq!(issues[0].fragment(), "PRIMARY KEY (B)");
        assert!(table.constraints.is_empty());
    }

    #[test]
    fn test_duplicates_keep_last() {
        let (table, issues) = run(
            "CREATE TABLE T (A INT PRIMARY KEY, B INT, PRIMARY KEY (B))",
            PrimaryKeyPolicy::KeepLast,
        );
        assert_eq!(table.primary_key.unwrap().columns, ["B"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column_name(), Some("A"));
        assert_eq!(issues[0].fragment(), "PRIMARY KEY");
    }

    #[test]
    fn test_unknown_key_column() {
        let (table, issues) = run(
            "CREATE TABLE T (A INT, PRIMARY KEY (a, MISSING))",
            PrimaryKeyPolicy::KeepFirst,
        );
        assert_eq!(table.primary_key.unwrap().columns, ["a", "MISSING"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message(), messages::UNKNOWN_PRIMARY_KEY_COLUMN);
        assert_eq!(issues[0].column_name(), Some("MISSING"));
    }

    #[test]
    fn test_no_key() {
        let (table, issues) = run("CREATE TABLE T (A INT)", PrimaryKeyPolicy::KeepLast);
        assert!(issues.is_empty());
        assert_eq!(table.primary_key, None);
    }
}
