use brick_engine::TileGrid;
use serde::{Deserialize, Serialize};

use super::{EditorError, Result};

/// Undo/redo surface the GUI binds its menu items to.
pub trait UndoState {
    fn can_undo(&self) -> bool;

    /// # Errors
    ///
    /// Fails with [`EditorError::EmptyHistory`] when there is nothing
    /// to undo.
    fn undo(&mut self) -> Result<()>;

    fn can_redo(&self) -> bool;

    /// # Errors
    ///
    /// Fails with [`EditorError::EmptyHistory`] when there is nothing
    /// to redo.
    fn redo(&mut self) -> Result<()>;
}

/// One cell edit: a tile position and the value that occupied the cell
/// before the current stroke touched it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub x: u16,
    pub y: u16,
    pub previous_index: i32,
}

impl EditRecord {
    pub fn new(x: u16, y: u16, previous_index: i32) -> Self {
        Self { x, y, previous_index }
    }
}

/// The cell edits produced by one continuous paint/erase gesture,
/// in paint order. Undone and redone as a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBatch {
    records: Vec<EditRecord>,
}

impl EditBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditRecord> {
        self.records.iter()
    }

    fn contains(&self, x: u16, y: u16) -> bool {
        self.records.iter().any(|record| record.x == x && record.y == y)
    }

    fn push(&mut self, record: EditRecord) {
        self.records.push(record);
    }
}

/// Two stacks of edit batches plus the scratch batch of the stroke
/// currently being painted (serializable for session persistence; the
/// open scratch batch is transient and skipped).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EditHistory {
    undo_stack: Vec<EditBatch>,
    redo_stack: Vec<EditBatch>,
    #[serde(skip)]
    scratch: EditBatch,
    #[serde(skip)]
    batch_open: bool,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a batch to collect edits into. Idempotent: calling it while
    /// a batch is already open keeps collecting into the same batch.
    pub fn begin_batch(&mut self) {
        self.batch_open = true;
    }

    pub fn is_batch_open(&self) -> bool {
        self.batch_open
    }

    /// Stages one cell edit into the open batch, opening one if needed.
    ///
    /// First write wins per cell: painting twice over the same cell in
    /// one stroke keeps the value from before the stroke, so undo
    /// restores the pre-stroke state instead of an intermediate one.
    pub fn record_edit(&mut self, x: u16, y: u16, previous_index: i32) {
        self.batch_open = true;
        if self.scratch.contains(x, y) {
            return;
        }
        self.scratch.push(EditRecord::new(x, y, previous_index));
    }

    /// Closes the open batch. A non-empty batch is pushed onto the undo
    /// stack and invalidates the redo stack; an empty one is discarded.
    /// Returns whether a batch was actually committed.
    pub fn commit_batch(&mut self) -> bool {
        self.batch_open = false;
        if self.scratch.is_empty() {
            return false;
        }
        log::debug!("committing stroke of {} edits", self.scratch.len());
        self.undo_stack.push(std::mem::take(&mut self.scratch));
        self.redo_stack.clear();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Pops the most recent batch and reverts it on the grid. For every
    /// record, the grid's current value becomes part of the inverse
    /// batch pushed onto the redo stack, then the recorded previous
    /// value is written back. Returns the applied batch so the caller
    /// can repaint the touched cells.
    ///
    /// # Errors
    ///
    /// Fails with [`EditorError::EmptyHistory`] if the undo stack is
    /// empty; grid errors pass through.
    pub fn undo(&mut self, grid: &mut TileGrid) -> Result<EditBatch> {
        let batch = self.undo_stack.pop().ok_or(EditorError::EmptyHistory)?;
        let inverse = apply_batch(&batch, grid)?;
        self.redo_stack.push(inverse);
        Ok(batch)
    }

    /// The mirror of [`undo`](Self::undo): pops from the redo stack,
    /// reapplies, and pushes the inverse onto the undo stack.
    ///
    /// # Errors
    ///
    /// Fails with [`EditorError::EmptyHistory`] if the redo stack is
    /// empty; grid errors pass through.
    pub fn redo(&mut self, grid: &mut TileGrid) -> Result<EditBatch> {
        let batch = self.redo_stack.pop().ok_or(EditorError::EmptyHistory)?;
        let inverse = apply_batch(&batch, grid)?;
        self.undo_stack.push(inverse);
        Ok(batch)
    }

    /// Drops both stacks and any open scratch batch (New/Open).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.scratch = EditBatch::default();
        self.batch_open = false;
    }
}

fn apply_batch(batch: &EditBatch, grid: &mut TileGrid) -> Result<EditBatch> {
    let mut inverse = EditBatch::default();
    for record in batch.iter() {
        let current = grid.get((record.x, record.y))?;
        inverse.push(EditRecord::new(record.x, record.y, current));
        grid.set((record.x, record.y), record.previous_index)?;
    }
    Ok(inverse)
}
