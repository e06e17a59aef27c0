//! Parser for one `CREATE TABLE` statement.
//!
//! A statement is cut into three parts around its column list: the header
//! (`CREATE TABLE [schema.]name`), the body between the outermost
//! parentheses, and the tail of DB2 table options. Only a broken header is an
//! error. Anything inside the body or the tail that the parser does not fully
//! understand is kept or dropped with an [`Issue`] instead, so one odd column
//! never costs the whole table.

pub mod lexer;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexSet as IndexSetRaw;

use self::lexer::{Lexer, LexerError, Token, TokenKind};
use crate::issues::{Issue, IssueLog, messages};
use crate::model::{
    ColumnDef, ConstraintDef, ConstraintKind, DefaultValue, InlinePrimaryKey, Nullability,
    Provenance, SizeUnit, SourceFragment, TableDef, TypeDescriptor, fold_identifier,
};
use crate::scan::{Scanner, Step};
use crate::split::split_items;

/// `IndexSet` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexSet<K> = IndexSetRaw<K, DefaultHashBuilder>;

/// Types written as two keywords.
const TWO_WORD_TYPES: &[(&str, &str)] = &[
    ("DOUBLE", "PRECISION"),
    ("LONG", "VARCHAR"),
    ("LONG", "VARGRAPHIC"),
    ("CHARACTER", "VARYING"),
    ("CHAR", "VARYING"),
];

/// Keyword sequences that open a column clause.
const COLUMN_CLAUSES: &[&[&str]] = &[
    &["NOT", "NULL"],
    &["NULL"],
    &["WITH", "DEFAULT"],
    &["DEFAULT"],
    &["CONSTRAINT"],
    &["PRIMARY", "KEY"],
    &["UNIQUE"],
];

/// Keyword sequences that open a table-level constraint item.
const CONSTRAINT_STARTS: &[&[&str]] = &[
    &["CONSTRAINT"],
    &["PRIMARY", "KEY"],
    &["FOREIGN", "KEY"],
    &["CHECK"],
    &["UNIQUE"],
];

/// Keyword sequences that open a DB2 table option after the column list.
const TABLE_OPTIONS: &[&[&str]] = &[
    &["INDEX", "IN"],
    &["LONG", "IN"],
    &["IN"],
    &["AUDIT"],
    &["DATA", "CAPTURE"],
    &["CCSID"],
    &["PARTITION", "BY"],
    &["DISTRIBUTE", "BY"],
    &["ORGANIZE", "BY"],
    &["COMPRESS"],
    &["VOLATILE"],
    &["NOT", "VOLATILE"],
    &["NOT", "LOGGED"],
    &["APPEND"],
    &["VALIDPROC"],
    &["EDITPROC"],
    &["WITH", "RESTRICT"],
    &["OPTIONS"],
];

/// Errors raised while parsing a statement header or a table element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Lexer error.
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),
    /// Unexpected token.
    #[error("Unexpected token {found:?} at position {pos}, expected {expected}")]
    UnexpectedToken {
        /// What was expected.
        expected: &'static str,
        /// What was found.
        found: TokenKind,
        /// Position in input.
        pos: usize,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: &'static str,
    },
    /// `CREATE TABLE ... LIKE` and `CREATE TABLE ... AS` copy another table
    /// and have no column list to convert.
    #[error("CREATE TABLE ... {form} at position {pos} is not supported")]
    UnsupportedForm {
        /// The keyword introducing the form.
        form: String,
        /// Position of the keyword.
        pos: usize,
    },
    /// No column list follows the table name.
    #[error("Missing column list in CREATE TABLE")]
    MissingColumnList,
    /// The column list is never closed.
    #[error("Column list opened at position {pos} is never closed")]
    UnclosedColumnList {
        /// Position of the opening parenthesis.
        pos: usize,
    },
    /// A type size parameter is not a valid unsigned integer.
    #[error("Invalid size parameter {text:?} at position {pos}")]
    InvalidSize {
        /// The parameter as written.
        text: String,
        /// Position in input.
        pos: usize,
    },
}

/// The name part of a `CREATE TABLE` header, identifiers as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Schema, when the statement qualified the table.
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
}

impl Header {
    /// `schema.name`, falling back to `default_schema`.
    #[must_use]
    pub fn qualified_name(&self, default_schema: &str) -> String {
        format!(
            "{}.{}",
            self.schema.as_deref().unwrap_or(default_schema),
            self.name
        )
    }
}

/// Read the table name of a `CREATE TABLE` statement, ignoring everything
/// after it.
///
/// Useful to name a statement that cannot be parsed as a whole.
///
/// # Errors
///
/// Returns an error if the text does not start with
/// `CREATE TABLE [IF NOT EXISTS] [schema.]name`.
pub fn parse_header(text: &str) -> Result<Header, ParseError> {
    let end = column_list(text).map_or(text.len(), |(open, _)| open);
    let mut cursor = Cursor::new(&text[..end])?;
    read_name(&mut cursor)
}

/// Parse one `CREATE TABLE` statement into a [`TableDef`].
///
/// Issues found in the column list and the table options are recorded in
/// `issues` at their byte position in `text`.
///
/// # Errors
///
/// Returns an error if the header cannot be parsed: no table name, no column
/// list, or the `LIKE`/`AS` forms. Nothing is recorded in `issues` then.
///
/// # Example
///
/// ```rust
/// use db2_snowflake_ddl::issues::IssueLog;
/// use db2_snowflake_ddl::model::Provenance;
/// use db2_snowflake_ddl::parser::parse_table;
///
/// let provenance = Provenance::new("app.sql", "2025-01-01").unwrap();
/// let mut issues = IssueLog::new();
/// let table = parse_table(
///     "CREATE TABLE APP.T (ID INTEGER NOT NULL, NOTE CLOB(1M)) IN TS1;",
///     "DEFAULT",
///     &provenance,
///     &mut issues,
/// )
/// .unwrap();
/// assert_eq!(table.qualified_name(), "APP.T");
/// assert_eq!(table.columns.len(), 2);
/// assert_eq!(table.columns[1].data_type.to_string(), "CLOB(1M)");
/// // `IN TS1` is removed and reported.
/// assert_eq!(issues.len(), 1);
/// ```
pub fn parse_table(
    text: &str,
    default_schema: &str,
    provenance: &Provenance,
    issues: &mut IssueLog,
) -> Result<TableDef, ParseError> {
    let list = column_list(text);
    let mut cursor = Cursor::new(&text[..list.map_or(text.len(), |(open, _)| open)])?;
    let header = read_name(&mut cursor)?;

    if let Some(form @ ("LIKE" | "AS")) = cursor.word_at(0) {
        return Err(ParseError::UnsupportedForm {
            form: form.into(),
            pos: cursor.peek().start,
        });
    }
    let (open, close) = list.ok_or(ParseError::MissingColumnList)?;
    if !cursor.is_eof() {
        return Err(cursor.unexpected("column list"));
    }
    let close = close.ok_or(ParseError::UnclosedColumnList { pos: open })?;

    let mut table = TableDef {
        schema_explicit: header.schema.is_some(),
        schema: header.schema.unwrap_or_else(|| default_schema.into()),
        name: header.name,
        columns: Vec::new(),
        constraints: Vec::new(),
        table_options: Vec::new(),
        primary_key: None,
        provenance: provenance.clone(),
    };
    let qualified = table.qualified_name();

    let body_start = open + 1;
    let mut seen: IndexSet<String> = IndexSet::default();
    for item in split_items(&text[body_start..close]) {
        match parse_element(item.text, body_start + item.offset, &qualified, issues) {
            Element::Column(column) => {
                if !seen.insert(fold_identifier(&column.name)) {
                    issues.record(
                        column.offset,
                        Issue::column(
                            &qualified,
                            &column.name,
                            messages::DUPLICATE_COLUMN,
                            item.text,
                        ),
                    );
                }
                table.columns.push(column);
            }
            Element::Constraint(constraint) => table.constraints.push(constraint),
        }
    }

    if table.columns.is_empty() {
        issues.record(
            open,
            Issue::table_level(&qualified, messages::NO_COLUMNS, &text[open..=close]),
        );
    }

    read_table_options(&text[close + 1..], close + 1, &qualified, &mut table, issues);

    Ok(table)
}

/// Positions of the first `(` at depth zero and of its matching `)`.
fn column_list(text: &str) -> Option<(usize, Option<usize>)> {
    let mut scanner = Scanner::new(text.as_bytes(), 0);
    let mut open = None;
    while let Some((pos, step)) = scanner.next() {
        match step {
            Step::Code(b'(') if open.is_none() => open = Some(pos),
            Step::Code(b')') if scanner.depth() == 0 => {
                if let Some(open) = open {
                    return Some((open, Some(pos)));
                }
            }
            _ => {}
        }
    }
    open.map(|open| (open, None))
}

fn read_name(cursor: &mut Cursor<'_>) -> Result<Header, ParseError> {
    cursor.expect_word("CREATE")?;
    cursor.expect_word("TABLE")?;
    cursor.eat_words(&["IF", "NOT", "EXISTS"]);

    let first = cursor.expect_identifier()?;
    if cursor.peek().kind == TokenKind::Dot {
        cursor.advance();
        let name = cursor.expect_identifier()?;
        Ok(Header {
            schema: Some(first),
            name,
        })
    } else {
        Ok(Header {
            schema: None,
            name: first,
        })
    }
}

/// One top-level item of the column list.
enum Element {
    Column(ColumnDef),
    Constraint(ConstraintDef),
}

/// Parse a column-list item at statement position `offset`. Items that cannot
/// be decomposed come back as [`ConstraintKind::Unparsed`] elements.
fn parse_element(text: &str, offset: usize, table: &str, issues: &mut IssueLog) -> Element {
    let (is_constraint, parsed) = match Cursor::new(text) {
        Ok(mut cursor) => {
            if CONSTRAINT_STARTS.iter().any(|words| cursor.at_words(words)) {
                let parsed = parse_constraint(&mut cursor, text, offset).map(Element::Constraint);
                (true, parsed)
            } else {
                let parsed = parse_column(&mut cursor, offset, table, issues).map(Element::Column);
                (false, parsed)
            }
        }
        Err(err) => (starts_with_constraint_keyword(text), Err(err.into())),
    };

    parsed.unwrap_or_else(|err| {
        log::debug!("{table}: keeping table element verbatim: {err}");
        let message = if is_constraint {
            messages::CONSTRAINT_NOT_UNDERSTOOD
        } else {
            messages::COLUMN_NOT_UNDERSTOOD
        };
        issues.record(offset, Issue::table_level(table, message, text));
        Element::Constraint(ConstraintDef {
            kind: ConstraintKind::Unparsed,
            name: None,
            source: SourceFragment::new(text, offset),
        })
    })
}

/// Classification fallback for items the lexer rejected.
fn starts_with_constraint_keyword(text: &str) -> bool {
    let mut words = text
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty());
    let (Some(first), second) = (words.next(), words.next()) else {
        return false;
    };
    if text.starts_with('"') {
        return false;
    }
    match first.to_ascii_uppercase().as_str() {
        "CONSTRAINT" | "CHECK" | "UNIQUE" => true,
        "PRIMARY" | "FOREIGN" => second.is_some_and(|word| word.eq_ignore_ascii_case("KEY")),
        _ => false,
    }
}

fn parse_constraint(
    cursor: &mut Cursor<'_>,
    text: &str,
    offset: usize,
) -> Result<ConstraintDef, ParseError> {
    let name = if cursor.eat_words(&["CONSTRAINT"]) {
        Some(cursor.expect_identifier()?)
    } else {
        None
    };

    let kind = if cursor.eat_words(&["PRIMARY", "KEY"]) {
        cursor.expect(&TokenKind::LParen, "`(`")?;
        let mut columns = Vec::new();
        loop {
            columns.push(cursor.expect_identifier()?);
            if cursor.peek().kind != TokenKind::Comma {
                break;
            }
            cursor.advance();
        }
        cursor.expect(&TokenKind::RParen, "`)`")?;
        cursor.expect(&TokenKind::Eof, "end of constraint")?;
        ConstraintKind::PrimaryKey { columns }
    } else if cursor.at_words(&["FOREIGN", "KEY"])
        || cursor.at_words(&["CHECK"])
        || cursor.at_words(&["UNIQUE"])
    {
        ConstraintKind::Other
    } else {
        return Err(cursor.unexpected("constraint kind"));
    };

    Ok(ConstraintDef {
        kind,
        name,
        source: SourceFragment::new(text, offset),
    })
}

/// Parse a column definition whose item starts at statement position `base`.
fn parse_column(
    cursor: &mut Cursor<'_>,
    base: usize,
    table: &str,
    issues: &mut IssueLog,
) -> Result<ColumnDef, ParseError> {
    let name = cursor.expect_identifier()?;
    let start = cursor.peek().start;
    let data_type = parse_type(cursor)?;

    let mut column = ColumnDef::new(name, data_type);
    column.type_source = Some(SourceFragment::new(
        cursor.slice(start, cursor.consumed_end()),
        base + start,
    ));
    column.offset = base;
    while !cursor.is_eof() {
        read_column_clause(cursor, &mut column, base, table, issues);
    }
    Ok(column)
}

fn parse_type(cursor: &mut Cursor<'_>) -> Result<TypeDescriptor, ParseError> {
    if cursor.at_column_clause() {
        return Err(cursor.unexpected("data type"));
    }
    let TokenKind::Word(word) = cursor.peek().kind.clone() else {
        return Err(cursor.unexpected("data type"));
    };
    cursor.advance();

    let mut base = word;
    if let Some((first, second)) = TWO_WORD_TYPES
        .iter()
        .find(|(first, second)| base == *first && cursor.word_at(0) == Some(*second))
    {
        cursor.advance();
        base = format!("{first} {second}");
    }

    let mut descriptor = TypeDescriptor::new(&base);
    if cursor.peek().kind == TokenKind::LParen {
        cursor.advance();
        descriptor = descriptor.with_precision(cursor.expect_size()?);
        if let Some(unit) = cursor.word_at(0).and_then(SizeUnit::from_letter) {
            cursor.advance();
            descriptor = descriptor.with_unit(unit);
        }
        if cursor.peek().kind == TokenKind::Comma {
            cursor.advance();
            descriptor = descriptor.with_scale(cursor.expect_size()?);
        }
        cursor.expect(&TokenKind::RParen, "`)`")?;
    }

    if base == "TIMESTAMP" {
        if cursor.eat_words(&["WITH", "TIME", "ZONE"]) {
            descriptor = descriptor.renamed("TIMESTAMP WITH TIME ZONE");
        } else {
            cursor.eat_words(&["WITHOUT", "TIME", "ZONE"]);
        }
    }

    Ok(descriptor)
}

/// Consume one trailing clause of a column definition. Always makes progress.
fn read_column_clause(
    cursor: &mut Cursor<'_>,
    column: &mut ColumnDef,
    base: usize,
    table: &str,
    issues: &mut IssueLog,
) {
    let start = cursor.peek().start;
    if cursor.eat_words(&["NOT", "NULL"]) {
        column.nullability = Nullability::NotNull;
    } else if cursor.eat_words(&["NULL"]) {
        column.nullability = Nullability::Nullable;
    } else if cursor.eat_words(&["WITH", "DEFAULT"]) || cursor.eat_words(&["DEFAULT"]) {
        column.default = parse_default(cursor);
        column.default_source = Some(SourceFragment::new(
            cursor.slice(start, cursor.consumed_end()),
            base + start,
        ));
    } else if let Some(bit_data) = cursor.eat_data_clause() {
        if bit_data {
            column.data_type = column.data_type.clone().with_bit_data();
        }
    } else if cursor.at_words(&["CONSTRAINT"]) || cursor.at_words(&["PRIMARY", "KEY"]) {
        read_inline_constraint(cursor, column, base, table, issues);
    } else if cursor.eat_words(&["UNIQUE"]) {
        column
            .retained_clauses
            .push(cursor.slice(start, cursor.consumed_end()).into());
    } else {
        retain_unrecognized(cursor, column, base, table, issues);
    }
}

/// `[CONSTRAINT name] PRIMARY KEY` or `CONSTRAINT name UNIQUE` on a column.
/// Any other named constraint is an unrecognized clause.
fn read_inline_constraint(
    cursor: &mut Cursor<'_>,
    column: &mut ColumnDef,
    base: usize,
    table: &str,
    issues: &mut IssueLog,
) {
    let saved = cursor.pos;
    let start = cursor.peek().start;
    let name = if cursor.eat_words(&["CONSTRAINT"]) {
        let Ok(name) = cursor.expect_identifier() else {
            cursor.pos = saved;
            return retain_unrecognized(cursor, column, base, table, issues);
        };
        Some(name)
    } else {
        None
    };

    if cursor.eat_words(&["PRIMARY", "KEY"]) {
        let source = SourceFragment::new(cursor.slice(start, cursor.consumed_end()), base + start);
        if column.primary_key.is_some() {
            issues.record(
                source.offset,
                Issue::column(
                    table,
                    &column.name,
                    messages::DUPLICATE_PRIMARY_KEY,
                    &source.text,
                ),
            );
        } else {
            column.primary_key = Some(InlinePrimaryKey { name, source });
        }
    } else if cursor.eat_words(&["UNIQUE"]) {
        column
            .retained_clauses
            .push(cursor.slice(start, cursor.consumed_end()).into());
    } else {
        cursor.pos = saved;
        retain_unrecognized(cursor, column, base, table, issues);
    }
}

fn retain_unrecognized(
    cursor: &mut Cursor<'_>,
    column: &mut ColumnDef,
    base: usize,
    table: &str,
    issues: &mut IssueLog,
) {
    if let Some((start, end)) = cursor.take_span(true) {
        let text = cursor.slice(start, end);
        issues.record(
            base + start,
            Issue::column(table, &column.name, messages::UNRECOGNIZED_CLAUSE, text),
        );
        column.retained_clauses.push(text.into());
    }
}

/// Parse what follows `WITH DEFAULT` or `DEFAULT`.
fn parse_default(cursor: &mut Cursor<'_>) -> DefaultValue {
    let first = cursor.pos;
    if cursor.eat_words(&["NULL"]) {
        let token = &cursor.tokens[first];
        return DefaultValue::Literal(cursor.slice(token.start, token.end).into());
    }

    let Some((start, end)) = cursor.take_span(false) else {
        return DefaultValue::Ambiguous;
    };
    let raw: String = cursor.slice(start, end).into();
    let tokens = &cursor.tokens[first..cursor.pos];
    if is_literal(tokens) {
        DefaultValue::Literal(raw)
    } else if tokens
        .iter()
        .all(|token| matches!(token.kind, TokenKind::Word(_)))
    {
        DefaultValue::Function(raw)
    } else {
        DefaultValue::Expression(raw)
    }
}

/// A string, or a number with an optional sign.
fn is_literal(tokens: &[Token]) -> bool {
    match tokens {
        [token] => matches!(token.kind, TokenKind::StringLiteral | TokenKind::Number),
        [sign, number] => {
            matches!(sign.kind, TokenKind::Plus | TokenKind::Minus)
                && number.kind == TokenKind::Number
        }
        _ => false,
    }
}

/// Split the text after the column list into option clauses, recording each
/// as removed.
fn read_table_options(
    tail: &str,
    base: usize,
    qualified: &str,
    table: &mut TableDef,
    issues: &mut IssueLog,
) {
    let mut remove = |text: &str, offset: usize| {
        issues.record(
            offset,
            Issue::table_level(qualified, messages::TABLE_OPTION_REMOVED, text),
        );
        table.table_options.push(SourceFragment::new(text, offset));
    };

    let mut cursor = match Cursor::new(tail) {
        Ok(cursor) => cursor,
        Err(err) => {
            log::debug!("{qualified}: table options not tokenized: {err}");
            let trimmed = tail.trim_end().trim_end_matches(';').trim();
            if !trimmed.is_empty() {
                let leading = tail.len() - tail.trim_start().len();
                remove(trimmed, base + leading);
            }
            return;
        }
    };

    let mut clause_start: Option<usize> = None;
    let mut depth = 0usize;
    loop {
        let token = cursor.peek();
        let (start, boundary) = (
            token.start,
            token.kind == TokenKind::Eof || (depth == 0 && token.kind == TokenKind::Semicolon),
        );
        let delta = match token.kind {
            TokenKind::LParen => 1,
            TokenKind::RParen => -1,
            _ => 0,
        };
        let starter = if depth == 0 && !boundary {
            TABLE_OPTIONS
                .iter()
                .find(|words| cursor.at_words(words))
                .map(|words| words.len())
        } else {
            None
        };

        if boundary || starter.is_some() {
            if let Some(clause) = clause_start.take() {
                remove(cursor.slice(clause, cursor.consumed_end()), base + clause);
            }
        }
        if boundary {
            break;
        }

        clause_start.get_or_insert(start);
        if let Some(len) = starter {
            cursor.pos += len;
        } else {
            depth = depth.saturating_add_signed(delta);
            cursor.pos += 1;
        }
    }
}

/// Token cursor over one piece of a statement.
struct Cursor<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Result<Self, LexerError> {
        Ok(Self {
            source,
            tokens: Lexer::tokenize(source)?,
            pos: 0,
        })
    }

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// The `n`-th token ahead; the trailing `Eof` repeats forever.
    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn word_at(&self, n: usize) -> Option<&str> {
        match &self.peek_nth(n).kind {
            TokenKind::Word(word) => Some(word),
            _ => None,
        }
    }

    fn at_words(&self, words: &[&str]) -> bool {
        words
            .iter()
            .enumerate()
            .all(|(i, word)| self.word_at(i) == Some(*word))
    }

    fn eat_words(&mut self, words: &[&str]) -> bool {
        let found = self.at_words(words);
        if found {
            self.pos += words.len();
        }
        found
    }

    /// `FOR SBCS DATA`, `FOR MIXED DATA` or `FOR BIT DATA`; returns whether
    /// it was the bit data form.
    fn eat_data_clause(&mut self) -> Option<bool> {
        let bit_data = match (self.word_at(0), self.word_at(1), self.word_at(2)) {
            (Some("FOR"), Some(kind @ ("SBCS" | "MIXED" | "BIT")), Some("DATA")) => kind == "BIT",
            _ => return None,
        };
        self.pos += 3;
        Some(bit_data)
    }

    fn at_column_clause(&self) -> bool {
        COLUMN_CLAUSES.iter().any(|words| self.at_words(words))
            || (self.word_at(0) == Some("FOR") && self.word_at(2) == Some("DATA"))
    }

    /// Consume tokens up to the next column clause at parenthesis depth zero
    /// and return the byte span consumed, if any. With `consume_first`, the
    /// first token is taken even when it opens a clause.
    fn take_span(&mut self, consume_first: bool) -> Option<(usize, usize)> {
        let start = self.peek().start;
        let mut depth = 0usize;
        let mut taken = false;
        loop {
            let kind = &self.peek().kind;
            if *kind == TokenKind::Eof
                || (depth == 0 && (taken || !consume_first) && self.at_column_clause())
            {
                break;
            }
            match kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.pos += 1;
            taken = true;
        }
        taken.then(|| (start, self.consumed_end()))
    }

    /// End of the last consumed token.
    fn consumed_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .map_or(0, |last| self.tokens[last].end)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof { expected }
        } else {
            ParseError::UnexpectedToken {
                expected,
                found: token.kind.clone(),
                pos: token.start,
            }
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if self.peek().kind == *kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_word(&mut self, word: &'static str) -> Result<(), ParseError> {
        if self.eat_words(&[word]) {
            Ok(())
        } else {
            Err(self.unexpected(word))
        }
    }

    /// An unquoted or quoted identifier, returned as written.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.peek().kind {
            TokenKind::Word(_) | TokenKind::QuotedIdentifier => {
                let token = self.advance();
                Ok(self.slice(token.start, token.end).into())
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_size(&mut self) -> Result<u32, ParseError> {
        let token = self.expect(&TokenKind::Number, "size")?;
        let text = self.slice(token.start, token.end);
        text.parse().map_err(|_| ParseError::InvalidSize {
            text: text.into(),
            pos: token.start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn provenance() -> Provenance {
        Provenance::new("data/input/app.sql", "2025-10-20T10:00:00Z").unwrap()
    }

    fn parse(text: &str) -> (TableDef, Vec<Issue>) {
        let mut issues = IssueLog::new();
        let table = parse_table(text, "DEFAULT", &provenance(), &mut issues).unwrap();
        (table, issues.into_ordered())
    }

    fn messages_of(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(Issue::message).collect()
    }

    #[test]
    fn test_parse_header() {
        let header = parse_header("CREATE TABLE app.\"Order\" (A INT)").unwrap();
        assert_eq!(header.schema.as_deref(), Some("app"));
        assert_eq!(header.name, "\"Order\"");

        let header = parse_header("create table if not exists T (A INT)").unwrap();
        assert_eq!(header.schema, None);
        assert_eq!(header.qualified_name("DEFAULT"), "DEFAULT.T");

        assert!(parse_header("CREATE TABLE (A INT)").is_err());
    }

    #[test]
    fn test_parse_columns() {
        let (table, issues) = parse(
            "CREATE TABLE APP.ACCOUNT (
                ID INTEGER NOT NULL,
                BAL DECIMAL(18, 2),
                NOTES CLOB(1M),
                NAME CHARACTER VARYING(40) NULL,
                CRT_TS TIMESTAMP(6) WITH DEFAULT CURRENT TIMESTAMP,
                CODE CHAR(3) WITH DEFAULT
            );",
        );
        assert!(issues.is_empty());
        assert!(table.schema_explicit);
        let types: Vec<_> = table
            .columns
            .iter()
            .map(|column| column.data_type.to_string())
            .collect();
        assert_eq!(
            types,
            vec![
                "INTEGER",
                "DECIMAL(18,2)",
                "CLOB(1M)",
                "CHARACTER VARYING(40)",
                "TIMESTAMP(6)",
                "CHAR(3)"
            ]
        );
        assert_eq!(table.columns[0].nullability, Nullability::NotNull);
        assert_eq!(table.columns[1].nullability, Nullability::Unspecified);
        assert_eq!(table.columns[3].nullability, Nullability::Nullable);
        assert_eq!(
            table.columns[4].default,
            DefaultValue::Function("CURRENT TIMESTAMP".into())
        );
        assert_eq!(table.columns[5].default, DefaultValue::Ambiguous);
        assert_eq!(
            table.columns[5].default_source.as_ref().unwrap().text,
            "WITH DEFAULT"
        );
    }

    #[test]
    fn test_default_classification() {
        let (table, _) = parse(
            "CREATE TABLE T (
                A INT DEFAULT -1,
                B VARCHAR(5) WITH DEFAULT 'x y' NOT NULL,
                C INT WITH DEFAULT NULL,
                D INT DEFAULT (1 + 2),
                E VARCHAR(10) WITH DEFAULT USER
            )",
        );
        let defaults: Vec<_> = table.columns.iter().map(|c| c.default.clone()).collect();
        assert_eq!(
            defaults,
            vec![
                DefaultValue::Literal("-1".into()),
                DefaultValue::Literal("'x y'".into()),
                DefaultValue::Literal("NULL".into()),
                DefaultValue::Expression("(1 + 2)".into()),
                DefaultValue::Function("USER".into()),
            ]
        );
        assert_eq!(table.columns[1].nullability, Nullability::NotNull);
    }

    #[test]
    fn test_type_forms() {
        let (table, issues) = parse(
            "CREATE TABLE T (
                A DOUBLE PRECISION,
                B LONG VARCHAR,
                C TIMESTAMP WITH TIME ZONE,
                D TIMESTAMP WITHOUT TIME ZONE,
                E CHAR(8) FOR BIT DATA,
                F VARCHAR(20) FOR SBCS DATA,
                G BLOB(2G)
            )",
        );
        assert!(issues.is_empty());
        let types: Vec<_> = table
            .columns
            .iter()
            .map(|column| column.data_type.to_string())
            .collect();
        assert_eq!(
            types,
            vec![
                "DOUBLE PRECISION",
                "LONG VARCHAR",
                "TIMESTAMP WITH TIME ZONE",
                "TIMESTAMP",
                "CHAR(8) FOR BIT DATA",
                "VARCHAR(20)",
                "BLOB(2G)"
            ]
        );
    }

    #[test]
    fn test_type_source_is_verbatim() {
        let (table, _) = parse("CREATE TABLE T (NOTES clob( 1 m ) NOT NULL, A DOUBLE  PRECISION)");
        let notes = table.columns[0].type_source.as_ref().unwrap();
        assert_eq!(notes.text, "clob( 1 m )");
        assert_eq!(notes.offset, 22);
        assert_eq!(table.columns[0].data_type.to_string(), "CLOB(1M)");
        assert_eq!(
            table.columns[1].type_source.as_ref().unwrap().text,
            "DOUBLE  PRECISION"
        );
    }

    #[test]
    fn test_inline_and_table_constraints() {
        let (table, issues) = parse(
            "CREATE TABLE T (
                ID INT NOT NULL CONSTRAINT PK_T PRIMARY KEY,
                CODE CHAR(2) UNIQUE,
                CONSTRAINT PK2 PRIMARY KEY (ID, \"Code\"),
                CONSTRAINT FK FOREIGN KEY (CODE) REFERENCES U (CODE),
                CHECK (ID > 0)
            )",
        );
        assert!(issues.is_empty());
        let inline = table.columns[0].primary_key.as_ref().unwrap();
        assert_eq!(inline.name.as_deref(), Some("PK_T"));
        assert_eq!(inline.source.text, "CONSTRAINT PK_T PRIMARY KEY");
        assert_eq!(table.columns[1].retained_clauses, vec!["UNIQUE"]);

        assert_eq!(table.constraints.len(), 3);
        assert_eq!(
            table.constraints[0].kind,
            ConstraintKind::PrimaryKey {
                columns: vec!["ID".to_string(), "\"Code\"".to_string()]
            }
        );
        assert_eq!(table.constraints[0].name.as_deref(), Some("PK2"));
        assert_eq!(table.constraints[1].kind, ConstraintKind::Other);
        assert_eq!(table.constraints[2].source.text, "CHECK (ID > 0)");
    }

    #[test]
    fn test_unrecognized_clause_is_retained() {
        let text = "CREATE TABLE T (ID INT GENERATED ALWAYS AS IDENTITY (START WITH 1) NOT NULL)";
        let (table, issues) = parse(text);
        assert_eq!(
            table.columns[0].retained_clauses,
            vec!["GENERATED ALWAYS AS IDENTITY (START WITH 1)"]
        );
        assert_eq!(table.columns[0].nullability, Nullability::NotNull);
        assert_eq!(messages_of(&issues), vec![messages::UNRECOGNIZED_CLAUSE]);
        assert_eq!(issues[0].column_name(), Some("ID"));
    }

    #[test]
    fn test_column_not_understood() {
        let (table, issues) = parse("CREATE TABLE T (A INT, B, C VARCHAR(X))");
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.constraints.len(), 2);
        assert!(
            table
                .constraints
                .iter()
                .all(|c| c.kind == ConstraintKind::Unparsed)
        );
        assert_eq!(
            messages_of(&issues),
            vec![messages::COLUMN_NOT_UNDERSTOOD, messages::COLUMN_NOT_UNDERSTOOD]
        );
        assert_eq!(issues[1].fragment(), "C VARCHAR(X)");
    }

    #[test]
    fn test_constraint_not_understood() {
        let (table, issues) = parse("CREATE TABLE T (A INT, PRIMARY KEY A)");
        assert_eq!(table.constraints[0].kind, ConstraintKind::Unparsed);
        assert_eq!(messages_of(&issues), vec![messages::CONSTRAINT_NOT_UNDERSTOOD]);
    }

    #[test]
    fn test_duplicate_column() {
        let (table, issues) = parse("CREATE TABLE T (a INT, A INT, \"a\" INT)");
        assert_eq!(table.columns.len(), 3);
        assert_eq!(messages_of(&issues), vec![messages::DUPLICATE_COLUMN]);
        assert_eq!(issues[0].column_name(), Some("A"));
    }

    #[test]
    fn test_no_columns() {
        let (table, issues) = parse("CREATE TABLE T ( -- nothing\n )");
        assert!(table.columns.is_empty());
        assert_eq!(messages_of(&issues), vec![messages::NO_COLUMNS]);
    }

    #[test]
    fn test_table_options_removed() {
        let (table, issues) = parse(
            "CREATE TABLE T (A INT)
                IN TS_DATA INDEX IN TS_IDX
                PARTITION BY RANGE (A) (STARTING 1 ENDING 10 IN TS_P1)
                DATA CAPTURE CHANGES
                COMPRESS YES;",
        );
        let removed: Vec<_> = table
            .table_options
            .iter()
            .map(|option| option.text.as_str())
            .collect();
        assert_eq!(
            removed,
            vec![
                "IN TS_DATA",
                "INDEX IN TS_IDX",
                "PARTITION BY RANGE (A) (STARTING 1 ENDING 10 IN TS_P1)",
                "DATA CAPTURE CHANGES",
                "COMPRESS YES"
            ]
        );
        assert_eq!(issues.len(), 5);
        assert!(
            issues
                .iter()
                .all(|issue| issue.message() == messages::TABLE_OPTION_REMOVED)
        );
    }

    #[test]
    fn test_header_failures() {
        let mut issues = IssueLog::new();
        let p = provenance();
        assert!(matches!(
            parse_table("CREATE TABLE T LIKE U;", "DEFAULT", &p, &mut issues),
            Err(ParseError::UnsupportedForm { .. })
        ));
        assert!(matches!(
            parse_table("CREATE TABLE T AS (SELECT * FROM U) WITH NO DATA;", "DEFAULT", &p, &mut issues),
            Err(ParseError::UnsupportedForm { .. })
        ));
        assert_eq!(
            parse_table("CREATE TABLE T;", "DEFAULT", &p, &mut issues),
            Err(ParseError::MissingColumnList)
        );
        assert!(matches!(
            parse_table("CREATE TABLE (A INT);", "DEFAULT", &p, &mut issues),
            Err(ParseError::UnexpectedEof { .. })
        ));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_issue_positions_follow_source() {
        let text = "CREATE TABLE T (A INT FOO, B INT) IN TS1";
        let mut issues = IssueLog::new();
        parse_table(text, "S", &provenance(), &mut issues).unwrap();
        let ordered = issues.into_ordered();
        assert_eq!(
            messages_of(&ordered),
            vec![messages::UNRECOGNIZED_CLAUSE, messages::TABLE_OPTION_REMOVED]
        );
        assert_eq!(ordered[0].table(), "S.T");
    }
}
