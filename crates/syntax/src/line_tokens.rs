//! Per-line token storage and tab-aware column conversion.
//!
//! Callers that re-render lines keep a `LineTokenCache` beside the
//! checkpoint cache: `update` reports whether a line's tokens actually
//! changed so unchanged lines skip re-layout.

/// One token clipped to a single line. `start` and `length` are char
/// positions within the line's visible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineToken {
    pub start: usize,
    pub length: usize,
    pub token_type: usize,
}

/// Cached token lists, one slot per line. `None` means the line has not
/// been tokenised since it was last invalidated.
#[derive(Debug, Default)]
pub struct LineTokenCache {
    lines: Vec<Option<Vec<LineToken>>>,
}

impl LineTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tokens for a line, if still valid.
    pub fn get(&self, line: usize) -> Option<&[LineToken]> {
        self.lines.get(line)?.as_deref()
    }

    /// Stores tokens for a line, growing the cache as needed. Returns
    /// true when they differ from what was cached.
    pub fn update(&mut self, line: usize, tokens: Vec<LineToken>) -> bool {
        if line >= self.lines.len() {
            self.lines.resize(line + 1, None);
        }
        let changed = self.lines[line].as_deref() != Some(tokens.as_slice());
        self.lines[line] = Some(tokens);
        changed
    }

    pub fn invalidate_line(&mut self, line: usize) {
        if let Some(slot) = self.lines.get_mut(line) {
            *slot = None;
        }
    }

    /// Invalidates `line` and everything after it.
    pub fn invalidate_from(&mut self, line: usize) {
        for slot in self.lines.iter_mut().skip(line) {
            *slot = None;
        }
    }

    /// Adjusts the slot count to the document's line count.
    pub fn resize(&mut self, num_lines: usize) {
        self.lines.resize(num_lines, None);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

// ==================== Tab layout ====================

/// Display column of the char at `index`, with tabs advancing to the
/// next multiple of `tab_width`.
pub fn index_to_column(text: &str, index: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut column = 0;
    for c in text.chars().take(index) {
        if c == '\t' {
            column = (column / tab_width + 1) * tab_width;
        } else {
            column += 1;
        }
    }
    column
}

/// Char index whose display column is nearest to (at or past) `column`.
/// Columns inside a tab resolve to the tab itself.
pub fn column_to_index(text: &str, column: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut current = 0;
    for (index, c) in text.chars().enumerate() {
        let next = if c == '\t' {
            (current / tab_width + 1) * tab_width
        } else {
            current + 1
        };
        if column < next {
            return index;
        }
        current = next;
    }
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(start: usize, length: usize, token_type: usize) -> LineToken {
        LineToken {
            start,
            length,
            token_type,
        }
    }

    #[test]
    fn test_update_reports_changes() {
        let mut cache = LineTokenCache::new();
        assert!(cache.update(0, vec![tok(0, 3, 2)]));
        assert!(!cache.update(0, vec![tok(0, 3, 2)]));
        assert!(cache.update(0, vec![tok(0, 3, 4)]));
        assert_eq!(cache.get(0), Some(&[tok(0, 3, 4)][..]));
    }

    #[test]
    fn test_update_grows_cache() {
        let mut cache = LineTokenCache::new();
        assert!(cache.update(5, vec![]));
        assert_eq!(cache.get(3), None);
        assert_eq!(cache.get(5), Some(&[][..]));
    }

    #[test]
    fn test_invalidate_from_drops_tail() {
        let mut cache = LineTokenCache::new();
        for line in 0..4 {
            cache.update(line, vec![tok(0, 1, line)]);
        }
        cache.invalidate_from(2);
        assert!(cache.get(1).is_some());
        assert_eq!(cache.get(2), None);
        assert_eq!(cache.get(3), None);
    }

    #[test]
    fn test_invalidate_single_line() {
        let mut cache = LineTokenCache::new();
        cache.update(0, vec![tok(0, 1, 1)]);
        cache.update(1, vec![tok(0, 1, 1)]);
        cache.invalidate_line(0);
        assert_eq!(cache.get(0), None);
        assert!(cache.get(1).is_some());
    }

    #[test]
    fn test_resize_truncates_and_extends() {
        let mut cache = LineTokenCache::new();
        cache.update(2, vec![]);
        cache.resize(1);
        assert_eq!(cache.get(2), None);
        cache.resize(4);
        assert_eq!(cache.get(3), None);
    }

    #[test]
    fn test_index_to_column_with_tabs() {
        assert_eq!(index_to_column("ab\tc", 0, 4), 0);
        assert_eq!(index_to_column("ab\tc", 2, 4), 2);
        assert_eq!(index_to_column("ab\tc", 3, 4), 4); // tab snaps to 4
        assert_eq!(index_to_column("ab\tc", 4, 4), 5);
        assert_eq!(index_to_column("\t\t", 2, 8), 16);
    }

    #[test]
    fn test_column_to_index_with_tabs() {
        assert_eq!(column_to_index("ab\tc", 0, 4), 0);
        assert_eq!(column_to_index("ab\tc", 2, 4), 2);
        assert_eq!(column_to_index("ab\tc", 3, 4), 2); // inside the tab
        assert_eq!(column_to_index("ab\tc", 4, 4), 3);
        assert_eq!(column_to_index("ab\tc", 99, 4), 4);
    }

    #[test]
    fn test_column_inside_wide_tab_resolves_to_tab() {
        for column in 0..8 {
            assert_eq!(column_to_index("\tx", column, 8), 0);
        }
        assert_eq!(column_to_index("\tx", 8, 8), 1);
    }

    #[test]
    fn test_column_round_trip_without_tabs() {
        let text = "plain text";
        for index in 0..=text.len() {
            assert_eq!(column_to_index(text, index_to_column(text, index, 4), 4), index);
        }
    }
}
