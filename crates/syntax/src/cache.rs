//! Checkpoint cache bounding re-scan cost on large documents.
//!
//! Tokenising line N from scratch costs O(N) because constructs like
//! block comments carry state across lines. The cache records cursor
//! snapshots at token boundaries every few lines while scanning forward;
//! a later request resumes from the nearest checkpoint at or before its
//! target instead of from line zero. Edits invalidate every checkpoint
//! at or after the first touched line — earlier checkpoints stay valid
//! because the scanner only ever looks forward.

use std::cell::RefCell;
use std::rc::Rc;

use quill_document::{CharCursor, CursorState, Document, ListenerId};
use tracing::trace;

use crate::line_tokens::LineToken;
use crate::tokeniser::Tokeniser;

/// Checkpoint spacing in lines.
fn checkpoint_interval(num_lines: usize) -> usize {
    (num_lines / 5000).max(10)
}

/// A cursor snapshot taken at a token boundary.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    line: usize,
    state: CursorState,
}

/// Incremental tokeniser over a [`Document`].
///
/// Holds its scanner plus the checkpoint list; the list is shared so a
/// document listener can invalidate it from inside a mutating call (see
/// [`attach_to`](TokeniserCache::attach_to)).
pub struct TokeniserCache<T> {
    tokeniser: T,
    checkpoints: Rc<RefCell<Vec<Checkpoint>>>,
}

impl<T: Tokeniser> TokeniserCache<T> {
    pub fn new(tokeniser: T) -> Self {
        Self {
            tokeniser,
            checkpoints: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn tokeniser(&self) -> &T {
        &self.tokeniser
    }

    /// Tokens overlapping `line`, clipped to the line's visible text and
    /// positioned by char index within the line.
    ///
    /// Resumes from the nearest checkpoint at or before the line,
    /// recording new checkpoints along the way.
    pub fn tokens_for_line(&self, doc: &Document, line: usize) -> Vec<LineToken> {
        let target = line.min(doc.num_lines() - 1);
        let interval = checkpoint_interval(doc.num_lines());
        let mut checkpoints = self.checkpoints.borrow_mut();

        // Strictly before the target: a boundary on line N may sit past
        // tokens that line N itself needs.
        let resume = checkpoints.partition_point(|cp| cp.line < target);
        let start_state = match resume.checked_sub(1) {
            Some(i) => checkpoints[i].state,
            None => CursorState {
                line: 0,
                index_in_line: 0,
                offset: 0,
            },
        };
        let mut cursor = CharCursor::from_state(doc, start_state);

        let line_start = doc.line(target).map(|l| l.start()).unwrap_or(0);
        let line_end = line_start
            + doc
                .line(target)
                .map(|l| l.len_without_newline())
                .unwrap_or(0);

        let mut tokens = Vec::new();
        while !cursor.is_eof() {
            let boundary = cursor.state();
            if boundary.offset >= line_end {
                break;
            }
            let eligible = match checkpoints.last() {
                Some(cp) => boundary.line >= cp.line + interval,
                None => boundary.line >= interval,
            };
            if eligible && boundary.line <= target {
                checkpoints.push(Checkpoint {
                    line: boundary.line,
                    state: boundary,
                });
            }

            let mut token_type = self.tokeniser.read_next_token(&mut cursor);
            if cursor.offset() == boundary.offset {
                // Stalled scanner: force progress, classify as error.
                cursor.skip(1);
                token_type = 0;
            }
            let token_start = boundary.offset;
            let token_end = cursor.offset();
            if token_end > line_start && token_start < line_end {
                let clipped_start = token_start.max(line_start);
                let clipped_end = token_end.min(line_end);
                if clipped_end > clipped_start {
                    tokens.push(LineToken {
                        start: clipped_start - line_start,
                        length: clipped_end - clipped_start,
                        token_type,
                    });
                }
            }
        }
        tokens
    }

    /// Drops every checkpoint at or after `line`.
    pub fn invalidate_from(&self, line: usize) {
        invalidate(&self.checkpoints, line);
    }

    /// Registers a document listener that invalidates checkpoints from
    /// the first touched line of every edit. The listener holds only a
    /// weak reference, so dropping the cache unhooks it.
    pub fn attach_to(&self, doc: &mut Document) -> ListenerId {
        let checkpoints = Rc::downgrade(&self.checkpoints);
        doc.add_listener(move |range| {
            if let Some(checkpoints) = checkpoints.upgrade() {
                invalidate(&checkpoints, range.first);
            }
        })
    }

    #[cfg(test)]
    fn checkpoint_count(&self) -> usize {
        self.checkpoints.borrow().len()
    }
}

fn invalidate(checkpoints: &RefCell<Vec<Checkpoint>>, line: usize) {
    let mut checkpoints = checkpoints.borrow_mut();
    let keep = checkpoints.partition_point(|cp| cp.line < line);
    if keep < checkpoints.len() {
        trace!(
            line,
            dropped = checkpoints.len() - keep,
            "invalidating tokeniser checkpoints"
        );
        checkpoints.truncate(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpp::CppTokeniser;

    fn doc(text: &str) -> Document {
        let mut d = Document::new();
        d.insert(0, text, false);
        d
    }

    /// Reference scan from the top of the document, no cache involved.
    fn scan_from_zero(doc: &Document, target: usize) -> Vec<LineToken> {
        let tokeniser = CppTokeniser;
        let line_start = doc.line(target).map(|l| l.start()).unwrap_or(0);
        let line_end = line_start
            + doc
                .line(target)
                .map(|l| l.len_without_newline())
                .unwrap_or(0);
        let mut cursor = CharCursor::new(doc);
        let mut tokens = Vec::new();
        while !cursor.is_eof() && cursor.offset() < line_end {
            let start = cursor.offset();
            let token_type = tokeniser.read_next_token(&mut cursor);
            let end = cursor.offset();
            if end > line_start && start < line_end {
                let s = start.max(line_start);
                let e = end.min(line_end);
                if e > s {
                    tokens.push(LineToken {
                        start: s - line_start,
                        length: e - s,
                        token_type,
                    });
                }
            }
        }
        tokens
    }

    #[test]
    fn test_tokens_for_single_line() {
        let d = doc("int x = 42;\n");
        let cache = TokeniserCache::new(CppTokeniser);
        let tokens = cache.tokens_for_line(&d, 0);
        let types: Vec<usize> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec![
                CppTokeniser::KEYWORD,
                CppTokeniser::IDENTIFIER,
                CppTokeniser::OPERATOR,
                CppTokeniser::INTEGER,
                CppTokeniser::PUNCTUATION,
            ]
        );
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[0].length, 3);
    }

    #[test]
    fn test_block_comment_clipped_per_line() {
        let d = doc("a /* first\nsecond\nthird */ b");
        let cache = TokeniserCache::new(CppTokeniser);
        let middle = cache.tokens_for_line(&d, 1);
        assert_eq!(middle.len(), 1);
        assert_eq!(middle[0].token_type, CppTokeniser::COMMENT);
        assert_eq!((middle[0].start, middle[0].length), (0, 6));
        let last = cache.tokens_for_line(&d, 2);
        assert_eq!(last.last().map(|t| t.token_type), Some(CppTokeniser::IDENTIFIER));
    }

    #[test]
    fn test_empty_line_has_no_tokens() {
        let d = doc("a\n\nb");
        let cache = TokeniserCache::new(CppTokeniser);
        assert!(cache.tokens_for_line(&d, 1).is_empty());
    }

    #[test]
    fn test_line_out_of_range_clamps() {
        let d = doc("x");
        let cache = TokeniserCache::new(CppTokeniser);
        assert_eq!(cache.tokens_for_line(&d, 99).len(), 1);
    }

    #[test]
    fn test_checkpoints_recorded_while_scanning() {
        let d = doc(&"line();\n".repeat(100));
        let cache = TokeniserCache::new(CppTokeniser);
        cache.tokens_for_line(&d, 99);
        assert!(cache.checkpoint_count() >= 5);
    }

    #[test]
    fn test_invalidate_from_drops_later_checkpoints() {
        let d = doc(&"line();\n".repeat(100));
        let cache = TokeniserCache::new(CppTokeniser);
        cache.tokens_for_line(&d, 99);
        let before = cache.checkpoint_count();
        cache.invalidate_from(50);
        let after = cache.checkpoint_count();
        assert!(after < before);
        assert!(after > 0);
        cache.invalidate_from(0);
        assert_eq!(cache.checkpoint_count(), 0);
    }

    #[test]
    fn test_cached_path_matches_scan_from_zero() {
        let mut source = String::new();
        for i in 0..5000 {
            match i % 5 {
                0 => source.push_str("int value = 0x1f; // trailing\n"),
                1 => source.push_str("/* block\n"),
                2 => source.push_str("   still inside */ float f = 2.5e1;\n"),
                3 => source.push_str("#define WIDE 1\n"),
                _ => source.push_str("call(a, b && c);\n"),
            }
        }
        let d = doc(&source);
        let cache = TokeniserCache::new(CppTokeniser);
        // Warm the checkpoint chain all the way down, then compare the
        // cached path against a cold scan across the document. Sampling
        // keeps the cold scans affordable; the stride is coprime to the
        // source pattern and the checkpoint interval so every line kind
        // and every distance-from-checkpoint gets hit.
        cache.tokens_for_line(&d, d.num_lines() - 1);
        assert!(cache.checkpoint_count() > 100);
        let last = d.num_lines() - 1;
        for line in (0..d.num_lines())
            .step_by(41)
            .chain([0, 1, last - 1, last])
        {
            assert_eq!(
                cache.tokens_for_line(&d, line),
                scan_from_zero(&d, line),
                "line {line}"
            );
        }
    }

    #[test]
    fn test_edit_through_listener_invalidates_and_rescans() {
        let mut d = doc("int a;\nint b;\nint c;\n");
        let cache = TokeniserCache::new(CppTokeniser);
        cache.attach_to(&mut d);
        let before = cache.tokens_for_line(&d, 1);
        assert_eq!(before[0].token_type, CppTokeniser::KEYWORD);
        // Open a block comment on line 0; lines below now sit inside it.
        d.insert(0, "/* ", true);
        let after = cache.tokens_for_line(&d, 1);
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].token_type, CppTokeniser::COMMENT);
    }

    #[test]
    fn test_detached_listener_lapses_with_cache() {
        let mut d = doc("x\n");
        let cache = TokeniserCache::new(CppTokeniser);
        cache.attach_to(&mut d);
        drop(cache);
        // Must not panic with the cache gone.
        d.insert(0, "y", true);
    }

    #[test]
    fn test_interval_scales_with_document() {
        assert_eq!(checkpoint_interval(100), 10);
        assert_eq!(checkpoint_interval(50_000), 10);
        assert_eq!(checkpoint_interval(100_000), 20);
    }
}
