//! Byte-level scanner shared by the statement splitter and the item tokenizer.
//!
//! The scanner walks raw DDL one byte at a time and tracks whether it is in
//! plain SQL, inside a quoted span, or inside a comment, together with the
//! parenthesis depth of plain SQL. It never allocates and never fails: a
//! quote or comment left open at end of input is visible through
//! [`Scanner::is_open`].
//!
//! Only ASCII bytes change state, so every position where the scanner reports
//! a structural byte (`(`, `)`, `,`, `;`) is a valid `str` char boundary.

/// Lexical state of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

/// What the scanner consumed at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// A byte of plain SQL, outside quotes and comments.
    Code(u8),
    /// Bytes belonging to a quoted span or a comment, delimiters included.
    Skipped,
}

/// Iterator over `(position, step)` pairs of a byte slice.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    mode: Mode,
    depth: isize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner starting at `pos` in plain-SQL mode with depth zero.
    pub(crate) fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self {
            bytes,
            pos,
            mode: Mode::Code,
            depth: 0,
        }
    }

    /// Current parenthesis depth. Negative once a `)` closed more than was opened.
    pub(crate) fn depth(&self) -> isize {
        self.depth
    }

    /// Whether the last step left the scanner inside a quoted span.
    pub(crate) fn in_quote(&self) -> bool {
        matches!(self.mode, Mode::SingleQuote | Mode::DoubleQuote)
    }

    /// Whether a quote or a block comment is still open.
    ///
    /// A line comment running to end of input is considered closed.
    pub(crate) fn is_open(&self) -> bool {
        self.in_quote() || self.mode == Mode::BlockComment
    }

    /// Jump forward to `pos`. Only valid while in plain SQL over bytes that
    /// cannot change the state, such as the rest of an identifier.
    pub(crate) fn seek(&mut self, pos: usize) {
        debug_assert!(self.mode == Mode::Code && pos >= self.pos);
        self.pos = pos;
    }
}

impl Iterator for Scanner<'_> {
    type Item = (usize, Step);

    fn next(&mut self) -> Option<Self::Item> {
        let &b = self.bytes.get(self.pos)?;
        let start = self.pos;
        let next = self.bytes.get(self.pos + 1).copied();

        let (width, step) = match self.mode {
            Mode::Code => match (b, next) {
                (b'-', Some(b'-')) => {
                    self.mode = Mode::LineComment;
                    (2, Step::Skipped)
                }
                (b'/', Some(b'*')) => {
                    self.mode = Mode::BlockComment;
                    (2, Step::Skipped)
                }
                (b'\'', _) => {
                    self.mode = Mode::SingleQuote;
                    (1, Step::Skipped)
                }
                (b'"', _) => {
                    self.mode = Mode::DoubleQuote;
                    (1, Step::Skipped)
                }
                (b'(', _) => {
                    self.depth += 1;
                    (1, Step::Code(b))
                }
                (b')', _) => {
                    self.depth -= 1;
                    (1, Step::Code(b))
                }
                _ => (1, Step::Code(b)),
            },
            Mode::SingleQuote | Mode::DoubleQuote => {
                let quote = if self.mode == Mode::SingleQuote {
                    b'\''
                } else {
                    b'"'
                };
                if b != quote {
                    (1, Step::Skipped)
                } else if next == Some(quote) {
                    // Doubled quote is an escaped quote character.
                    (2, Step::Skipped)
                } else {
                    self.mode = Mode::Code;
                    (1, Step::Skipped)
                }
            }
            Mode::LineComment => {
                if b == b'\n' {
                    self.mode = Mode::Code;
                }
                (1, Step::Skipped)
            }
            Mode::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    self.mode = Mode::Code;
                    (2, Step::Skipped)
                } else {
                    (1, Step::Skipped)
                }
            }
        };

        self.pos += width;
        Some((start, step))
    }
}

/// Whether a byte can appear in an unquoted DB2 identifier.
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'#' | b'@')
}

/// End (exclusive) of the identifier-like word starting at `pos`.
pub(crate) fn word_end(bytes: &[u8], pos: usize) -> usize {
    bytes[pos..]
        .iter()
        .position(|&b| !is_ident_byte(b))
        .map_or(bytes.len(), |len| pos + len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn code_bytes(input: &str) -> Vec<u8> {
        Scanner::new(input.as_bytes(), 0)
            .filter_map(|(_, step)| match step {
                Step::Code(b) => Some(b),
                Step::Skipped => None,
            })
            .collect()
    }

    #[test]
    fn test_quotes_and_comments_are_skipped() {
        let code = code_bytes("a 'x,(y' \"c)d\" -- z;\nb /* ( */ c");
        assert_eq!(code, b"a   b  c");
    }

    #[test]
    fn test_doubled_quote_stays_inside_string() {
        let code = code_bytes("'it''s' x");
        assert_eq!(code, b" x");
    }

    #[test]
    fn test_depth_tracking() {
        let mut scanner = Scanner::new(b"((a)", 0);
        scanner.by_ref().for_each(drop);
        assert_eq!(scanner.depth(), 1);

        let mut scanner = Scanner::new(b"a)", 0);
        scanner.by_ref().for_each(drop);
        assert_eq!(scanner.depth(), -1);
    }

    #[test]
    fn test_open_state_at_end_of_input() {
        let mut scanner = Scanner::new(b"'abc", 0);
        scanner.by_ref().for_each(drop);
        assert!(scanner.is_open());

        let mut scanner = Scanner::new(b"/* abc", 0);
        scanner.by_ref().for_each(drop);
        assert!(scanner.is_open());

        let mut scanner = Scanner::new(b"abc -- trailing", 0);
        scanner.by_ref().for_each(drop);
        assert!(!scanner.is_open());
    }

    #[test]
    fn test_word_end() {
        assert_eq!(word_end(b"CRT_TS TIMESTAMP", 0), 6);
        assert_eq!(word_end(b"A#1$", 0), 4);
        assert_eq!(word_end(b"x(", 0), 1);
    }
}
