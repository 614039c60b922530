//! Invertible edit log with transaction grouping and a save marker.
//!
//! Every undoable edit is recorded as an `EditAction` storing enough to
//! replay or invert it. Actions accumulate into the currently-open
//! transaction group until `begin_new_transaction` closes it; undo/redo
//! step an integer cursor over the groups. The log belongs to exactly one
//! document — logs are never shared.

/// One invertible edit.
///
/// Both variants store the affected offset and the exact text, which is
/// all that's needed to apply the action in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditAction {
    /// `text` was inserted at `offset`.
    Inserted { offset: usize, text: String },
    /// `text` was removed from `offset`.
    Removed { offset: usize, text: String },
}

impl EditAction {
    /// Returns the action that exactly reverses this one.
    pub(crate) fn inverted(&self) -> EditAction {
        match self {
            EditAction::Inserted { offset, text } => EditAction::Removed {
                offset: *offset,
                text: text.clone(),
            },
            EditAction::Removed { offset, text } => EditAction::Inserted {
                offset: *offset,
                text: text.clone(),
            },
        }
    }
}

/// Ordered log of transaction groups with a cursor and save marker.
///
/// `groups[..cursor]` are currently applied; `groups[cursor..]` is the
/// redo tail. The save marker records the applied-action count at the
/// last save point; `None` means no save point exists (a fresh log
/// reports changed until one is set).
#[derive(Debug, Default)]
pub(crate) struct UndoLog {
    groups: Vec<Vec<EditAction>>,
    cursor: usize,
    /// True while the last applied group still accepts new actions.
    open: bool,
    /// Running count of applied actions across `groups[..cursor]`.
    applied: usize,
    saved: Option<usize>,
}

impl UndoLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records an action at the cursor, discarding any redo tail.
    ///
    /// A save marker pointing into the discarded tail can never be
    /// reached again, so it is dropped.
    pub(crate) fn push(&mut self, action: EditAction) {
        if self.cursor < self.groups.len() {
            self.groups.truncate(self.cursor);
            if self.saved.is_some_and(|s| s > self.applied) {
                self.saved = None;
            }
        }
        if !self.open || self.cursor == 0 {
            self.groups.push(Vec::new());
            self.cursor += 1;
            self.open = true;
        }
        self.groups[self.cursor - 1].push(action);
        self.applied += 1;
    }

    /// Closes the current transaction so the next edit starts a new one.
    pub(crate) fn begin_new_transaction(&mut self) {
        self.open = false;
    }

    /// Steps the cursor back one group, returning the actions to invert.
    ///
    /// Returns `None` at the start of the log.
    pub(crate) fn undo_group(&mut self) -> Option<Vec<EditAction>> {
        self.open = false;
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let group = self.groups[self.cursor].clone();
        self.applied -= group.len();
        Some(group)
    }

    /// Steps the cursor forward one group, returning the actions to replay.
    ///
    /// Returns `None` at the end of the log.
    pub(crate) fn redo_group(&mut self) -> Option<Vec<EditAction>> {
        self.open = false;
        if self.cursor == self.groups.len() {
            return None;
        }
        let group = self.groups[self.cursor].clone();
        self.applied += group.len();
        self.cursor += 1;
        Some(group)
    }

    /// Marks the current state as saved.
    pub(crate) fn set_save_point(&mut self) {
        self.saved = Some(self.applied);
    }

    /// Returns true if the cursor has moved since the last save point,
    /// or no save point was ever set.
    pub(crate) fn has_changed_since_save_point(&self) -> bool {
        self.saved != Some(self.applied)
    }

    /// Discards all history and the save marker (bulk loads).
    pub(crate) fn clear(&mut self) {
        self.groups.clear();
        self.cursor = 0;
        self.open = false;
        self.applied = 0;
        self.saved = None;
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.groups.len()
    }
}
