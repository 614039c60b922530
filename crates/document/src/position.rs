//! Positions that track a point in a document across edits.
//!
//! A `Position` is a handle to shared state; the owning document keeps a
//! weak reference to each maintained position's state and shifts it when
//! text is inserted or removed. Dropping the handle is deregistration —
//! the document prunes dead weak references as it walks the registry.

use std::cell::RefCell;
use std::rc::Rc;

/// The coordinates a position caches. All three fields describe the same
/// point and are kept consistent by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PositionState {
    /// Absolute character offset from the start of the document.
    pub(crate) offset: usize,
    /// Zero-based line number.
    pub(crate) line: usize,
    /// Character index within the line. May equal the line's visible
    /// length plus its newline when the position sits on a terminator.
    pub(crate) index_in_line: usize,
}

/// A point in a document, optionally kept up to date as it changes.
///
/// Obtained from [`Document::position_at_offset`] or
/// [`Document::position_at_line_index`], which register the position for
/// maintenance. Cloning produces an independent snapshot that is *not*
/// maintained.
///
/// [`Document::position_at_offset`]: crate::Document::position_at_offset
/// [`Document::position_at_line_index`]: crate::Document::position_at_line_index
#[derive(Debug)]
pub struct Position {
    pub(crate) state: Rc<RefCell<PositionState>>,
}

impl Position {
    pub(crate) fn new(state: PositionState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Absolute character offset from the start of the document.
    pub fn offset(&self) -> usize {
        self.state.borrow().offset
    }

    /// Zero-based line number.
    pub fn line(&self) -> usize {
        self.state.borrow().line
    }

    /// Character index within the line.
    pub fn index_in_line(&self) -> usize {
        self.state.borrow().index_in_line
    }
}

impl Clone for Position {
    /// Deep copy. The clone holds its own state and is not shifted by
    /// subsequent edits.
    fn clone(&self) -> Self {
        Self::new(*self.state.borrow())
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.offset() == other.offset()
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset().cmp(&other.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_reflect_state() {
        let p = Position::new(PositionState {
            offset: 7,
            line: 1,
            index_in_line: 2,
        });
        assert_eq!(p.offset(), 7);
        assert_eq!(p.line(), 1);
        assert_eq!(p.index_in_line(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let p = Position::new(PositionState {
            offset: 3,
            line: 0,
            index_in_line: 3,
        });
        let q = p.clone();
        p.state.borrow_mut().offset = 9;
        assert_eq!(q.offset(), 3);
    }

    #[test]
    fn test_ordering_by_offset() {
        let a = Position::new(PositionState {
            offset: 1,
            line: 0,
            index_in_line: 1,
        });
        let b = Position::new(PositionState {
            offset: 5,
            line: 1,
            index_in_line: 0,
        });
        assert!(a < b);
        assert_eq!(a, a.clone());
    }
}
