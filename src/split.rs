//! Statement splitting and column-list tokenizing.
//!
//! [`StatementSplitter`] finds every `CREATE TABLE` statement in a blob of
//! DDL, skipping any other SQL, comments and blank lines around them.
//! [`split_items`] breaks one column-list body into its top-level
//! comma-separated items. Both run on the same byte scanner state machine, so
//! commas, semicolons and parentheses inside quotes or comments never count.

use alloc::string::String;
use alloc::vec::Vec;

use crate::scan::{Scanner, Step, is_ident_byte, word_end};

/// One `CREATE TABLE` statement located in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStatement<'a> {
    /// Statement text, from `CREATE` up to and including the terminating `;`
    /// (or end of input for a final statement without one).
    pub text: &'a str,
    /// Byte offset of `text` in the input.
    pub offset: usize,
}

/// A statement whose extent could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// Parentheses were still open at end of input.
    #[error("Unbalanced parentheses in statement starting at position {offset}")]
    UnbalancedParentheses {
        /// Position of the statement's `CREATE` keyword.
        offset: usize,
        /// Statement text up to end of input.
        fragment: String,
    },
    /// A `)` closed more parentheses than were opened.
    #[error("Unmatched ')' at position {pos} in statement starting at position {offset}")]
    UnmatchedCloseParenthesis {
        /// Position of the statement's `CREATE` keyword.
        offset: usize,
        /// Position of the unmatched parenthesis.
        pos: usize,
        /// Statement text up to and including the unmatched parenthesis.
        fragment: String,
    },
    /// A quoted span or block comment was still open at end of input.
    #[error("Unterminated quote or comment in statement starting at position {offset}")]
    Unterminated {
        /// Position of the statement's `CREATE` keyword.
        offset: usize,
        /// Statement text up to the next line opening with `CREATE TABLE`,
        /// or to end of input.
        fragment: String,
    },
}

impl SplitError {
    /// Position of the offending statement in the input.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::UnbalancedParentheses { offset, .. }
            | Self::UnmatchedCloseParenthesis { offset, .. }
            | Self::Unterminated { offset, .. } => *offset,
        }
    }

    /// The text of the offending statement.
    #[must_use]
    pub fn fragment(&self) -> &str {
        match self {
            Self::UnbalancedParentheses { fragment, .. }
            | Self::UnmatchedCloseParenthesis { fragment, .. }
            | Self::Unterminated { fragment, .. } => fragment,
        }
    }
}

/// Lazy iterator over the `CREATE TABLE` statements of a DDL blob.
///
/// Broken statements are yielded as [`SplitError`]s; scanning then resumes
/// right after the broken statement's `CREATE TABLE` keywords, or for an
/// unterminated quote or comment at the next line opening with
/// `CREATE TABLE`, so one bad statement never hides the ones after it. A
/// statement missing its `;` ends where the next `CREATE TABLE` begins.
///
/// # Example
///
/// ```rust
/// use db2_snowflake_ddl::split::StatementSplitter;
///
/// let ddl = "SET SCHEMA APP;\nCREATE TABLE A (X INT);\n-- done\nCREATE TABLE B (Y INT);";
/// let statements: Vec<_> = StatementSplitter::new(ddl).collect();
/// assert_eq!(statements.len(), 2);
/// assert_eq!(statements[1].as_ref().unwrap().text, "CREATE TABLE B (Y INT);");
/// ```
#[derive(Debug, Clone)]
pub struct StatementSplitter<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> StatementSplitter<'a> {
    /// Create a splitter over the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for StatementSplitter<'a> {
    type Item = Result<RawStatement<'a>, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.input.as_bytes();
        let (start, keyword_end) = find_create_table(bytes, self.pos)?;
        match statement_end(self.input, start, keyword_end) {
            Ok(end) => {
                self.pos = end;
                Some(Ok(RawStatement {
                    text: &self.input[start..end],
                    offset: start,
                }))
            }
            Err(err) => {
                // A fresh scan from inside an open quote would stay inside it.
                self.pos = match err {
                    SplitError::Unterminated { .. } => next_statement_line(bytes, keyword_end),
                    _ => keyword_end,
                };
                Some(Err(err))
            }
        }
    }
}

/// Find the next `CREATE TABLE` at or after `from`, outside quotes and
/// comments. Returns the start of `CREATE` and the end of `TABLE`.
fn find_create_table(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut scanner = Scanner::new(bytes, from);
    let mut in_word = false;

    while let Some((pos, step)) = scanner.next() {
        let Step::Code(b) = step else {
            in_word = false;
            continue;
        };
        if !is_ident_byte(b) {
            in_word = false;
            continue;
        }
        if in_word {
            continue;
        }

        if let Some(table_end) = create_table_at(bytes, pos) {
            return Some((pos, table_end));
        }
        scanner.seek(word_end(bytes, pos));
        in_word = true;
    }

    None
}

/// If the word starting at `pos` is `CREATE` and the next one is `TABLE`,
/// return the end of `TABLE`.
fn create_table_at(bytes: &[u8], pos: usize) -> Option<usize> {
    let end = word_end(bytes, pos);
    if bytes[pos..end].eq_ignore_ascii_case(b"CREATE") {
        keyword_after(bytes, end, b"TABLE")
    } else {
        None
    }
}

/// If the first word after `from` (skipping whitespace and comments) is
/// `keyword`, return the position right after it.
fn keyword_after(bytes: &[u8], from: usize, keyword: &[u8]) -> Option<usize> {
    let mut scanner = Scanner::new(bytes, from);
    while let Some((pos, step)) = scanner.next() {
        match step {
            Step::Skipped if scanner.in_quote() => return None,
            Step::Skipped => {}
            Step::Code(b) if b.is_ascii_whitespace() => {}
            Step::Code(_) => {
                let end = word_end(bytes, pos);
                return bytes[pos..end]
                    .eq_ignore_ascii_case(keyword)
                    .then_some(end);
            }
        }
    }
    None
}

/// Start of the first line after `from` that opens with `CREATE TABLE`, or
/// end of input. Quote and comment state is ignored.
fn next_statement_line(bytes: &[u8], from: usize) -> usize {
    let mut line = from;
    while let Some(newline) = bytes[line..].iter().position(|&b| b == b'\n') {
        line += newline + 1;
        let indent = bytes[line..]
            .iter()
            .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\r'))
            .count();
        if create_table_at(bytes, line + indent).is_some() {
            return line;
        }
    }
    bytes.len()
}

/// Scan from the keywords to the terminating `;` at depth zero. A statement
/// without `;` ends where the next `CREATE TABLE` starts at depth zero.
fn statement_end(input: &str, start: usize, keyword_end: usize) -> Result<usize, SplitError> {
    let bytes = input.as_bytes();
    let mut scanner = Scanner::new(bytes, keyword_end);
    let mut in_word = false;

    while let Some((pos, step)) = scanner.next() {
        let Step::Code(b) = step else {
            in_word = false;
            continue;
        };
        match b {
            b')' if scanner.depth() < 0 => {
                return Err(SplitError::UnmatchedCloseParenthesis {
                    offset: start,
                    pos,
                    fragment: input[start..=pos].into(),
                });
            }
            b';' if scanner.depth() == 0 => return Ok(pos + 1),
            _ if !is_ident_byte(b) => in_word = false,
            _ if in_word => {}
            _ => {
                if scanner.depth() == 0 && create_table_at(bytes, pos).is_some() {
                    return Ok(pos);
                }
                scanner.seek(word_end(bytes, pos));
                in_word = true;
            }
        }
    }

    if scanner.is_open() {
        let resume = next_statement_line(bytes, keyword_end);
        Err(SplitError::Unterminated {
            offset: start,
            fragment: input[start..resume].into(),
        })
    } else if scanner.depth() != 0 {
        Err(SplitError::UnbalancedParentheses {
            offset: start,
            fragment: input[start..].into(),
        })
    } else {
        Ok(input.len())
    }
}

/// One top-level item of a column-list body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item<'a> {
    /// Item text with surrounding whitespace and comments trimmed.
    pub text: &'a str,
    /// Byte offset of `text` in the body.
    pub offset: usize,
}

/// Split a column-list body on top-level commas.
///
/// Commas nested in parentheses, quotes or comments do not split. Each item
/// is trimmed to its SQL: whitespace and comments before the first token and
/// after the last one are dropped. Items that hold no SQL at all (a trailing
/// comma, a comment on its own) are dropped entirely.
///
/// ```rust
/// use db2_snowflake_ddl::split::split_items;
///
/// let items = split_items("BAL DECIMAL(18,2), -- balance\n NAME VARCHAR(10) WITH DEFAULT 'a,b',");
/// let texts: Vec<_> = items.iter().map(|item| item.text).collect();
/// assert_eq!(texts, ["BAL DECIMAL(18,2)", "NAME VARCHAR(10) WITH DEFAULT 'a,b'"]);
/// ```
#[must_use]
pub fn split_items(body: &str) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut scanner = Scanner::new(body.as_bytes(), 0);
    // Byte span of SQL seen so far in the current item.
    let mut span: Option<(usize, usize)> = None;

    loop {
        let quoted = scanner.in_quote();
        let Some((pos, step)) = scanner.next() else {
            break;
        };
        let is_sql = match step {
            Step::Code(b',') if scanner.depth() == 0 => {
                push_item(&mut items, body, span.take());
                continue;
            }
            Step::Code(b) => !b.is_ascii_whitespace(),
            // Quote delimiters and quoted text, but not comments.
            Step::Skipped => quoted || scanner.in_quote(),
        };
        if is_sql {
            span = Some(span.map_or((pos, pos + 1), |(start, _)| (start, pos + 1)));
        }
    }
    push_item(&mut items, body, span);

    items
}

fn push_item<'a>(items: &mut Vec<Item<'a>>, body: &'a str, span: Option<(usize, usize)>) {
    if let Some((start, end)) = span {
        items.push(Item {
            text: &body[start..end],
            offset: start,
        });
    }
}
