//! Cheap forward character iteration over a document.
//!
//! `CharCursor` walks characters (newlines included) while tracking its
//! line, index-in-line, and absolute offset. It borrows the document, so
//! the document cannot be edited while a cursor is live; callers capture
//! a [`CursorState`] to resume later.

use crate::document::Document;

/// Snapshot of a cursor's location, detached from any borrow.
///
/// Re-attach with [`CharCursor::from_state`]. If the document changed in
/// between, re-attachment clamps to valid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    pub line: usize,
    pub index_in_line: usize,
    pub offset: usize,
}

/// Forward-only character cursor over a [`Document`].
///
/// The cursor always rests on the next character to read: after consuming
/// the last character of a line it has already stepped to the start of
/// the following line. At end of document it rests past the final line's
/// last character.
#[derive(Clone)]
pub struct CharCursor<'a> {
    doc: &'a Document,
    line: usize,
    index_in_line: usize,
    offset: usize,
    /// Remaining characters of the current line.
    line_chars: std::str::Chars<'a>,
}

impl<'a> CharCursor<'a> {
    /// A cursor at the start of the document.
    pub fn new(doc: &'a Document) -> Self {
        let mut cursor = Self {
            doc,
            line: 0,
            index_in_line: 0,
            offset: 0,
            line_chars: doc.line_text(0).chars(),
        };
        cursor.normalize();
        cursor
    }

    /// A cursor at a previously captured state, clamped to the document's
    /// current extent.
    pub fn from_state(doc: &'a Document, state: CursorState) -> Self {
        let line = state.line.min(doc.num_lines() - 1);
        let line_len = doc.line_char_count(line);
        let index = if line == state.line {
            state.index_in_line.min(line_len)
        } else {
            line_len
        };
        let mut line_chars = doc.line_text(line).chars();
        for _ in 0..index {
            line_chars.next();
        }
        let mut cursor = Self {
            doc,
            line,
            index_in_line: index,
            offset: doc.line_start(line) + index,
            line_chars,
        };
        cursor.normalize();
        cursor
    }

    /// Steps onto the next non-empty line if the current one is exhausted.
    fn normalize(&mut self) {
        while self.line_chars.clone().next().is_none() && self.line + 1 < self.doc.num_lines() {
            self.line += 1;
            self.index_in_line = 0;
            self.line_chars = self.doc.line_text(self.line).chars();
        }
    }

    /// Consumes and returns the next character, or `None` at end of
    /// document.
    pub fn next(&mut self) -> Option<char> {
        let c = self.line_chars.next()?;
        self.offset += 1;
        self.index_in_line += 1;
        self.normalize();
        Some(c)
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.line_chars.clone().next()
    }

    /// Consumes up to `n` characters.
    pub fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if self.next().is_none() {
                break;
            }
        }
    }

    /// Consumes characters while `peek` is whitespace, newlines included.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next();
        }
    }

    /// Consumes the rest of the current line, its terminator included.
    pub fn skip_to_end_of_line(&mut self) {
        let line = self.line;
        while self.line == line && self.next().is_some() {}
    }

    /// Absolute character offset of the next character to read.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Line number the cursor rests on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Character index within the current line.
    pub fn index_in_line(&self) -> usize {
        self.index_in_line
    }

    /// True once every character has been consumed.
    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Detached snapshot of the current location.
    pub fn state(&self) -> CursorState {
        CursorState {
            line: self.line,
            index_in_line: self.index_in_line,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        let mut d = Document::new();
        d.insert(0, text, false);
        d
    }

    #[test]
    fn test_iterates_all_chars_including_newlines() {
        let d = doc("ab\ncd");
        let mut c = CharCursor::new(&d);
        let mut out = String::new();
        while let Some(ch) = c.next() {
            out.push(ch);
        }
        assert_eq!(out, "ab\ncd");
        assert!(c.is_eof());
        assert_eq!(c.offset(), 5);
    }

    #[test]
    fn test_crosses_line_boundary_eagerly() {
        let d = doc("ab\ncd");
        let mut c = CharCursor::new(&d);
        c.skip(3);
        assert_eq!(c.line(), 1);
        assert_eq!(c.index_in_line(), 0);
        assert_eq!(c.peek(), Some('c'));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let d = doc("xy");
        let mut c = CharCursor::new(&d);
        assert_eq!(c.peek(), Some('x'));
        assert_eq!(c.peek(), Some('x'));
        assert_eq!(c.next(), Some('x'));
        assert_eq!(c.peek(), Some('y'));
    }

    #[test]
    fn test_skip_whitespace_crosses_newlines() {
        let d = doc("  \t\n  x");
        let mut c = CharCursor::new(&d);
        c.skip_whitespace();
        assert_eq!(c.peek(), Some('x'));
        assert_eq!(c.offset(), 6);
    }

    #[test]
    fn test_skip_to_end_of_line_consumes_terminator() {
        let d = doc("abc\ndef");
        let mut c = CharCursor::new(&d);
        c.next();
        c.skip_to_end_of_line();
        assert_eq!(c.line(), 1);
        assert_eq!(c.index_in_line(), 0);
        assert_eq!(c.peek(), Some('d'));
    }

    #[test]
    fn test_state_round_trip() {
        let d = doc("one\ntwo\nthree");
        let mut c = CharCursor::new(&d);
        c.skip(6);
        let state = c.state();
        let rest: String = std::iter::from_fn(|| c.next()).collect();
        let mut c2 = CharCursor::from_state(&d, state);
        let rest2: String = std::iter::from_fn(|| c2.next()).collect();
        assert_eq!(rest, rest2);
    }

    #[test]
    fn test_from_state_clamps_to_document_end() {
        let d = doc("ab");
        let c = CharCursor::from_state(
            &d,
            CursorState {
                line: 9,
                index_in_line: 9,
                offset: 99,
            },
        );
        assert!(c.is_eof());
        assert_eq!(c.offset(), 2);
    }

    #[test]
    fn test_empty_document_is_eof() {
        let d = Document::new();
        let c = CharCursor::new(&d);
        assert!(c.is_eof());
        assert_eq!(c.peek(), None);
    }

    #[test]
    fn test_clone_for_lookahead() {
        let d = doc("ab");
        let mut c = CharCursor::new(&d);
        let mut ahead = c.clone();
        assert_eq!(ahead.next(), Some('a'));
        assert_eq!(ahead.next(), Some('b'));
        assert_eq!(c.next(), Some('a'));
    }
}
