/// End-of-line convention used when exporting a document.
///
/// Internally the document stores whatever line endings were inserted
/// (loading normalises to `\n`); the convention only applies when writing
/// the document back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineStyle {
    /// Unix-style `"\n"`.
    #[default]
    Lf,
    /// Windows-style `"\r\n"`.
    CrLf,
    /// Classic-Mac-style `"\r"`.
    Cr,
}

impl NewlineStyle {
    /// Returns the characters this convention writes for a line break.
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineStyle::Lf => "\n",
            NewlineStyle::CrLf => "\r\n",
            NewlineStyle::Cr => "\r",
        }
    }
}

/// Inclusive range of lines touched by an edit.
///
/// Delivered synchronously to change listeners before the mutating call
/// returns; `first` is the first affected line, `last` the last affected
/// line as numbered after the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

impl LineRange {
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first: first.min(last),
            last: first.max(last),
        }
    }

    /// Returns true if `line` falls inside the range.
    pub fn contains(&self, line: usize) -> bool {
        self.first <= line && line <= self.last
    }

    /// Expands this range to the smallest range covering both.
    pub fn merge(&mut self, other: LineRange) {
        self.first = self.first.min(other.first);
        self.last = self.last.max(other.last);
    }
}
