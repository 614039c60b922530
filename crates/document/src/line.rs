//! Line storage for the document.
//!
//! A `Line` holds one physical line of text with its trailing newline
//! sequence retained, plus cached char counts and its start offset within
//! the document. The document keeps an ordered `Vec<Line>`; concatenating
//! every line's raw text reproduces the full document exactly.

/// One physical line of the document.
///
/// `text` includes the trailing newline sequence (`"\n"`, `"\r\n"`, or a
/// lone `"\r"`) when the line has one. All counts are in chars, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub(crate) text: String,
    pub(crate) start: usize,
    pub(crate) length: usize,
    pub(crate) length_without_newline: usize,
}

impl Line {
    /// Creates a line from its raw text, computing the cached char counts.
    pub(crate) fn new(text: String, start: usize) -> Self {
        let length = text.chars().count();
        let length_without_newline = if text.ends_with("\r\n") {
            length - 2
        } else if text.ends_with('\n') || text.ends_with('\r') {
            length - 1
        } else {
            length
        };
        Self {
            text,
            start,
            length,
            length_without_newline,
        }
    }

    /// The raw text of this line, including any trailing newline sequence.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Char offset of this line's first character within the document.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Total char count, including the trailing newline sequence.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the line holds no characters at all.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Char count excluding the trailing newline sequence.
    pub fn len_without_newline(&self) -> usize {
        self.length_without_newline
    }
}

/// Splits `text` into lines, keeping each terminator with its line.
///
/// `\n`, `\r\n`, and a lone `\r` all terminate a line. The final segment
/// is emitted only if non-empty; an input ending in a newline therefore
/// produces no trailing empty entry here — the document maintains its own
/// empty tail line separately.
pub(crate) fn split_into_lines(text: &str, start: usize) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut line_start = start;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        let ends_line = match ch {
            '\n' => true,
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    current.push('\n');
                    chars.next();
                }
                true
            }
            _ => false,
        };
        if ends_line {
            let line = Line::new(std::mem::take(&mut current), line_start);
            line_start += line.length;
            lines.push(line);
        }
    }

    if !current.is_empty() {
        lines.push(Line::new(current, line_start));
    }
    lines
}

/// Returns the byte index of the `index`-th char in `s`.
///
/// Indices past the end map to `s.len()`.
pub(crate) fn byte_of_char_index(s: &str, index: usize) -> usize {
    s.char_indices()
        .nth(index)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lengths_plain() {
        let line = Line::new("hello".to_string(), 0);
        assert_eq!(line.len(), 5);
        assert_eq!(line.len_without_newline(), 5);
    }

    #[test]
    fn test_line_lengths_lf() {
        let line = Line::new("hello\n".to_string(), 0);
        assert_eq!(line.len(), 6);
        assert_eq!(line.len_without_newline(), 5);
    }

    #[test]
    fn test_line_lengths_crlf() {
        let line = Line::new("hello\r\n".to_string(), 0);
        assert_eq!(line.len(), 7);
        assert_eq!(line.len_without_newline(), 5);
    }

    #[test]
    fn test_line_lengths_lone_cr() {
        let line = Line::new("hello\r".to_string(), 0);
        assert_eq!(line.len(), 6);
        assert_eq!(line.len_without_newline(), 5);
    }

    #[test]
    fn test_split_simple() {
        let lines = split_into_lines("one\ntwo\nthree", 0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text(), "one\n");
        assert_eq!(lines[1].text(), "two\n");
        assert_eq!(lines[2].text(), "three");
        assert_eq!(lines[0].start(), 0);
        assert_eq!(lines[1].start(), 4);
        assert_eq!(lines[2].start(), 8);
    }

    #[test]
    fn test_split_trailing_newline_has_no_empty_tail() {
        let lines = split_into_lines("one\n", 0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "one\n");
    }

    #[test]
    fn test_split_crlf_stays_together() {
        let lines = split_into_lines("a\r\nb", 0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "a\r\n");
        assert_eq!(lines[1].text(), "b");
        assert_eq!(lines[1].start(), 3);
    }

    #[test]
    fn test_split_lone_cr_terminates() {
        let lines = split_into_lines("a\rb", 0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "a\r");
        assert_eq!(lines[1].text(), "b");
    }

    #[test]
    fn test_split_empty() {
        assert!(split_into_lines("", 0).is_empty());
    }

    #[test]
    fn test_split_concatenation_round_trips() {
        let text = "alpha\r\nbeta\rgamma\n\ndelta";
        let joined: String = split_into_lines(text, 0)
            .iter()
            .map(|l| l.text())
            .collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_byte_of_char_index_multibyte() {
        let s = "aé\u{1F600}b";
        assert_eq!(byte_of_char_index(s, 0), 0);
        assert_eq!(byte_of_char_index(s, 1), 1);
        assert_eq!(byte_of_char_index(s, 2), 3);
        assert_eq!(byte_of_char_index(s, 3), 7);
        assert_eq!(byte_of_char_index(s, 4), 8);
        assert_eq!(byte_of_char_index(s, 99), 8);
    }
}
