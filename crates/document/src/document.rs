//! The document: line-indexed text with maintained positions, undo, and
//! synchronous change notification.
//!
//! All offsets, indices, and counts are in `char`s, and every positional
//! input clamps to the valid range rather than erroring. A document always
//! holds at least one line; a document whose text ends in a newline holds
//! an empty trailing line after it, so "the line after the last newline"
//! always exists.

use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::error::DocumentError;
use crate::line::{byte_of_char_index, split_into_lines, Line};
use crate::position::{Position, PositionState};
use crate::types::{LineRange, NewlineStyle};
use crate::undo::{EditAction, UndoLog};

/// Scan cap for word-break searches, in chars.
pub const WORD_BREAK_SCAN_LIMIT: usize = 256;

/// Handle returned by [`Document::add_listener`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    Word,
    Other,
}

fn char_class(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Other
    }
}

/// A line-indexed text document.
///
/// Mutations notify registered listeners with the inclusive range of
/// touched lines before the mutating call returns; that includes
/// mutations performed by [`undo`](Document::undo),
/// [`redo`](Document::redo), and bulk loads.
pub struct Document {
    lines: Vec<Line>,
    newline: NewlineStyle,
    /// Positions kept up to date across edits. Entries lapse when the
    /// last `Position` handle is dropped.
    maintained: RefCell<Vec<Weak<RefCell<PositionState>>>>,
    undo: UndoLog,
    listeners: Vec<(ListenerId, Box<dyn FnMut(LineRange)>)>,
    next_listener: usize,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.lines)
            .field("newline", &self.newline)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with one empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new(String::new(), 0)],
            newline: NewlineStyle::default(),
            maintained: RefCell::new(Vec::new()),
            undo: UndoLog::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // ==================== Line access ====================

    /// Number of lines, always at least 1.
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Total character count, newlines included.
    pub fn num_characters(&self) -> usize {
        match self.lines.last() {
            Some(line) => line.start() + line.len(),
            None => 0,
        }
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Index of the line containing `offset`. Offsets at or past the end
    /// resolve to the last line.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        let i = self
            .lines
            .partition_point(|l| l.start() + l.len() <= offset);
        i.min(self.lines.len() - 1)
    }

    pub(crate) fn line_text(&self, index: usize) -> &str {
        self.lines.get(index).map(Line::text).unwrap_or("")
    }

    pub(crate) fn line_char_count(&self, index: usize) -> usize {
        self.lines.get(index).map(Line::len).unwrap_or(0)
    }

    pub(crate) fn line_start(&self, index: usize) -> usize {
        self.lines.get(index).map(Line::start).unwrap_or(0)
    }

    /// The whole document as a single string.
    pub fn all_content(&self) -> String {
        let bytes = self.lines.iter().map(|l| l.text().len()).sum();
        let mut out = String::with_capacity(bytes);
        for line in &self.lines {
            out.push_str(line.text());
        }
        out
    }

    /// The text in `[start, end)`. Empty when `end <= start`. Both ends
    /// clamp to the document.
    pub fn get_text_between(&self, start: usize, end: usize) -> String {
        let total = self.num_characters();
        let start = start.min(total);
        let end = end.min(total);
        if end <= start {
            return String::new();
        }
        let l1 = self.line_at_offset(start);
        let l2 = self.line_at_offset(end.saturating_sub(1));
        let mut out = String::with_capacity((end - start) * 2);
        for line in &self.lines[l1..=l2] {
            let text = line.text();
            let lo = start.saturating_sub(line.start());
            let hi = (end - line.start()).min(line.len());
            out.push_str(&text[byte_of_char_index(text, lo)..byte_of_char_index(text, hi)]);
        }
        out
    }

    // ==================== Editing ====================

    /// Inserts `text` at `offset` (clamped). Returns the inclusive range
    /// of lines rewritten by the edit. Recorded on the undo log when
    /// `undoable`.
    pub fn insert(&mut self, offset: usize, text: &str, undoable: bool) -> LineRange {
        let offset = offset.min(self.num_characters());
        if text.is_empty() {
            let line = self.line_at_offset(offset);
            return LineRange::new(line, line);
        }
        if undoable {
            self.undo.push(EditAction::Inserted {
                offset,
                text: text.to_string(),
            });
        }
        self.insert_internal(offset, text)
    }

    /// Removes `[start, end)` (clamped). No-op when `end <= start`.
    pub fn remove(&mut self, start: usize, end: usize, undoable: bool) -> LineRange {
        let total = self.num_characters();
        let start = start.min(total);
        let end = end.min(total);
        if end <= start {
            let line = self.line_at_offset(start);
            return LineRange::new(line, line);
        }
        if undoable {
            self.undo.push(EditAction::Removed {
                offset: start,
                text: self.get_text_between(start, end),
            });
        }
        self.remove_internal(start, end)
    }

    /// Replaces the entire text as a single undo transaction.
    pub fn replace_all_content(&mut self, text: &str) {
        self.undo.begin_new_transaction();
        self.remove(0, self.num_characters(), true);
        self.insert(0, text, true);
        self.undo.begin_new_transaction();
    }

    fn insert_internal(&mut self, offset: usize, text: &str) -> LineRange {
        let li = self.line_at_offset(offset);
        let line_start = self.lines[li].start();
        let mut combined;
        {
            let old = self.lines[li].text();
            let byte = byte_of_char_index(old, offset - line_start);
            combined = String::with_capacity(old.len() + text.len());
            combined.push_str(&old[..byte]);
            combined.push_str(text);
            combined.push_str(&old[byte..]);
        }
        let new_lines = split_into_lines(&combined, line_start);
        let added = new_lines.len();
        self.lines.splice(li..=li, new_lines);
        self.reindex_from(li);
        self.ensure_trailing_line();
        self.shift_positions_for_insert(offset, text.chars().count());
        let range = LineRange::new(li, li + added - 1);
        self.notify(range);
        range
    }

    fn remove_internal(&mut self, start: usize, end: usize) -> LineRange {
        let l1 = self.line_at_offset(start);
        let l2 = self.line_at_offset(end.saturating_sub(1));
        let line_start = self.lines[l1].start();
        let mut combined = String::new();
        {
            let first = self.lines[l1].text();
            combined.push_str(&first[..byte_of_char_index(first, start - line_start)]);
        }
        {
            let last = self.lines[l2].text();
            let from = end - self.lines[l2].start();
            combined.push_str(&last[byte_of_char_index(last, from)..]);
        }
        let new_lines = split_into_lines(&combined, line_start);
        let rewritten = new_lines.len();
        self.lines.splice(l1..=l2, new_lines);
        self.reindex_from(l1);
        self.ensure_trailing_line();
        self.shift_positions_for_remove(start, end);
        // Post-edit numbering: a multi-line removal collapses onto l1.
        let last_line = self.lines.len() - 1;
        let range = LineRange::new(
            l1.min(last_line),
            (l1 + rewritten.saturating_sub(1)).min(last_line),
        );
        self.notify(range);
        range
    }

    /// Recomputes `start` for every line from `li` onward.
    fn reindex_from(&mut self, li: usize) {
        let mut start = if li == 0 {
            0
        } else {
            self.lines[li - 1].start() + self.lines[li - 1].len()
        };
        for line in self.lines.iter_mut().skip(li) {
            line.start = start;
            start += line.length;
        }
    }

    /// Restores the "empty line after a final newline" shape.
    fn ensure_trailing_line(&mut self) {
        let needs = match self.lines.last() {
            None => true,
            Some(l) => l.len() != l.len_without_newline(),
        };
        if needs {
            let total = self.num_characters();
            self.lines.push(Line::new(String::new(), total));
        }
    }

    // ==================== Undo ====================

    /// Closes the current undo transaction; the next undoable edit starts
    /// a fresh group.
    pub fn new_transaction(&mut self) {
        self.undo.begin_new_transaction();
    }

    /// Reverts the most recent transaction. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(group) = self.undo.undo_group() else {
            return false;
        };
        trace!(actions = group.len(), "undoing transaction");
        for action in group.iter().rev() {
            self.apply_action(&action.inverted());
        }
        true
    }

    /// Re-applies the most recently undone transaction. Returns false
    /// when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(group) = self.undo.redo_group() else {
            return false;
        };
        trace!(actions = group.len(), "redoing transaction");
        for action in &group {
            self.apply_action(action);
        }
        true
    }

    fn apply_action(&mut self, action: &EditAction) {
        match action {
            EditAction::Inserted { offset, text } => {
                self.insert_internal(*offset, text);
            }
            EditAction::Removed { offset, text } => {
                self.remove_internal(*offset, offset + text.chars().count());
            }
        }
    }

    /// Marks the current state as saved.
    pub fn set_save_point(&mut self) {
        self.undo.set_save_point();
    }

    /// True when the document differs from its last save point, or no
    /// save point has been set.
    pub fn has_changed_since_save_point(&self) -> bool {
        self.undo.has_changed_since_save_point()
    }

    /// Drops all undo history and the save marker.
    pub fn clear_undo_history(&mut self) {
        self.undo.clear();
    }

    // ==================== Positions ====================

    /// A maintained position at `offset` (clamped). The position tracks
    /// this point across subsequent edits until it is dropped.
    pub fn position_at_offset(&self, offset: usize) -> Position {
        let offset = offset.min(self.num_characters());
        let line = self.line_at_offset(offset);
        let position = Position::new(PositionState {
            offset,
            line,
            index_in_line: offset - self.lines[line].start(),
        });
        self.maintained
            .borrow_mut()
            .push(Rc::downgrade(&position.state));
        position
    }

    /// A maintained position at `(line, index)`. The line clamps to the
    /// document; the index clamps to the line's visible length.
    pub fn position_at_line_index(&self, line: usize, index: usize) -> Position {
        let line = line.min(self.lines.len() - 1);
        let index = index.min(self.lines[line].len_without_newline());
        self.position_at_offset(self.lines[line].start() + index)
    }

    fn shift_positions_for_insert(&self, at: usize, inserted: usize) {
        self.for_each_position(|offset| {
            if offset >= at {
                offset + inserted
            } else {
                offset
            }
        });
    }

    fn shift_positions_for_remove(&self, start: usize, end: usize) {
        self.for_each_position(|offset| {
            if offset >= end {
                offset - (end - start)
            } else if offset > start {
                start
            } else {
                offset
            }
        });
    }

    /// Rewrites every live maintained position, pruning lapsed entries.
    fn for_each_position(&self, shift: impl Fn(usize) -> usize) {
        let total = self.num_characters();
        let mut registry = self.maintained.borrow_mut();
        registry.retain(|weak| {
            let Some(cell) = weak.upgrade() else {
                return false;
            };
            let mut state = cell.borrow_mut();
            state.offset = shift(state.offset).min(total);
            state.line = self.line_at_offset(state.offset);
            state.index_in_line = state.offset - self.lines[state.line].start();
            true
        });
    }

    /// Clamps every maintained position after a bulk content swap.
    fn reclamp_positions(&self) {
        self.for_each_position(|offset| offset);
    }

    // ==================== Word breaks ====================

    /// First class transition at or after `offset`, scanning at most
    /// [`WORD_BREAK_SCAN_LIMIT`] chars. A newline ends the scan; a
    /// leading line terminator is consumed on its own.
    pub fn find_word_break_after(&self, offset: usize) -> usize {
        let offset = offset.min(self.num_characters());
        let chunk = self.get_text_between(offset, offset + WORD_BREAK_SCAN_LIMIT);
        let mut chars = chunk.chars().peekable();
        let mut pos = offset;
        let Some(&first) = chars.peek() else {
            return pos;
        };
        if first == '\n' || first == '\r' {
            chars.next();
            pos += 1;
            if first == '\r' && chars.peek() == Some(&'\n') {
                pos += 1;
            }
            return pos;
        }
        let class = char_class(first);
        while let Some(&c) = chars.peek() {
            if c == '\n' || c == '\r' || char_class(c) != class {
                break;
            }
            chars.next();
            pos += 1;
        }
        pos
    }

    /// First class transition strictly before `offset`, scanning at most
    /// [`WORD_BREAK_SCAN_LIMIT`] chars backwards.
    pub fn find_word_break_before(&self, offset: usize) -> usize {
        let offset = offset.min(self.num_characters());
        let chunk =
            self.get_text_between(offset.saturating_sub(WORD_BREAK_SCAN_LIMIT), offset);
        let mut chars = chunk.chars().rev().peekable();
        let mut pos = offset;
        let Some(&last) = chars.peek() else {
            return pos;
        };
        if last == '\n' || last == '\r' {
            chars.next();
            pos -= 1;
            if last == '\n' && chars.peek() == Some(&'\r') {
                pos -= 1;
            }
            return pos;
        }
        let class = char_class(last);
        while let Some(&c) = chars.peek() {
            if c == '\n' || c == '\r' || char_class(c) != class {
                break;
            }
            chars.next();
            pos -= 1;
        }
        pos
    }

    // ==================== Streams ====================

    /// End-of-line convention used by [`write_to_writer`].
    ///
    /// [`write_to_writer`]: Document::write_to_writer
    pub fn new_line_characters(&self) -> NewlineStyle {
        self.newline
    }

    pub fn set_new_line_characters(&mut self, style: NewlineStyle) {
        self.newline = style;
    }

    /// Replaces the document with the reader's content. The stream must
    /// be UTF-8. `\r\n` and lone `\r` are normalised to `\n` in memory,
    /// and the detected convention is kept for writing back out. Undo
    /// history and the save marker are cleared; listeners see the whole
    /// new document as changed.
    pub fn load_from_reader<R: Read>(&mut self, mut reader: R) -> Result<(), DocumentError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes)?;
        if let Some(style) = detect_newline(&text) {
            self.newline = style;
        }
        let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
        self.lines = split_into_lines(&normalised, 0);
        self.ensure_trailing_line();
        self.undo.clear();
        self.reclamp_positions();
        debug!(
            chars = self.num_characters(),
            lines = self.num_lines(),
            newline = self.newline.as_str().escape_debug().to_string(),
            "loaded document from stream"
        );
        let last = self.num_lines() - 1;
        self.notify(LineRange::new(0, last));
        Ok(())
    }

    /// Writes the document, expanding every line terminator to the
    /// configured convention.
    pub fn write_to_writer<W: Write>(&self, mut writer: W) -> Result<(), DocumentError> {
        for line in &self.lines {
            let text = line.text();
            let body_end = byte_of_char_index(text, line.len_without_newline());
            writer.write_all(text[..body_end].as_bytes())?;
            if line.len() != line.len_without_newline() {
                writer.write_all(self.newline.as_str().as_bytes())?;
            }
        }
        debug!(chars = self.num_characters(), "wrote document to stream");
        Ok(())
    }

    // ==================== Listeners ====================

    /// Registers a change listener. It runs synchronously inside every
    /// mutating call with the inclusive range of touched lines.
    pub fn add_listener(&mut self, callback: impl FnMut(LineRange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    fn notify(&mut self, range: LineRange) {
        for (_, callback) in &mut self.listeners {
            callback(range);
        }
    }
}

fn detect_newline(text: &str) -> Option<NewlineStyle> {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                return Some(if chars.next() == Some('\n') {
                    NewlineStyle::CrLf
                } else {
                    NewlineStyle::Cr
                });
            }
            '\n' => return Some(NewlineStyle::Lf),
            _ => {}
        }
    }
    None
}
