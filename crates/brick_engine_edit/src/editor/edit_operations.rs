use brick_engine::{EMPTY_CELL, Position};

use super::{EditState, EditorError, Result};

impl EditState {
    /// Opens a stroke (mouse-down). Idempotent; painting outside a
    /// stroke opens one implicitly.
    pub fn begin_stroke(&mut self) {
        self.history.begin_batch();
    }

    /// Closes the current stroke (mouse-up), committing its edits as
    /// one undoable batch.
    pub fn end_stroke(&mut self) {
        self.history.commit_batch();
    }

    /// Paints a brick into a cell, staging the cell's pre-stroke value
    /// for undo. Positions are tile coordinates; the GUI converts from
    /// pixels before calling in.
    ///
    /// # Errors
    ///
    /// Fails with [`EditorError::InvalidBrickIndex`] for an index the
    /// catalog does not know, or `OutOfBounds` for a position outside
    /// the grid. The grid is untouched on failure.
    pub fn paint_brick(&mut self, pos: impl Into<Position>, index: i32) -> Result<()> {
        if index != EMPTY_CELL && self.catalog.brick_by_index(index).is_none() {
            return Err(EditorError::InvalidBrickIndex { index });
        }

        let pos = pos.into();
        let previous = self.grid.get(pos)?;
        // In-bounds coordinates always fit u16: grid dimensions are
        // capped at TileGrid::MAX_DIMENSION.
        self.history.record_edit(pos.x as u16, pos.y as u16, previous);
        self.grid.set(pos, index)?;
        self.is_dirty = true;
        Ok(())
    }

    /// Erases a cell back to empty, staged for undo like a paint.
    ///
    /// # Errors
    ///
    /// Fails with `OutOfBounds` for a position outside the grid.
    pub fn erase_brick(&mut self, pos: impl Into<Position>) -> Result<()> {
        self.paint_brick(pos, EMPTY_CELL)
    }

    /// Clears the whole board as a single undoable batch. Does nothing
    /// (and commits nothing) when the board is already empty.
    ///
    /// # Errors
    ///
    /// Grid errors pass through; cells already erased stay erased.
    pub fn clear_level(&mut self) -> Result<()> {
        let occupied: Vec<Position> = self.grid.iter().filter(|&(_, cell)| cell != EMPTY_CELL).map(|(pos, _)| pos).collect();

        self.begin_stroke();
        for pos in occupied {
            self.erase_brick(pos)?;
        }
        self.end_stroke();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UndoState;
    use brick_engine::{BrickCatalog, BrickInfo, TileGrid};
    use pretty_assertions::assert_eq;

    fn test_state() -> EditState {
        let catalog = BrickCatalog::from_bricks([BrickInfo::new("redBrick", 41, 20), BrickInfo::new("blueBrick", 41, 20)]).unwrap();
        EditState::new((5, 5), catalog).unwrap()
    }

    #[test]
    fn painting_twice_in_one_stroke_undoes_to_pre_stroke_value() {
        let mut state = test_state();

        state.begin_stroke();
        state.paint_brick((2, 2), 0).unwrap();
        state.end_stroke();

        state.begin_stroke();
        state.paint_brick((2, 2), 1).unwrap();
        state.paint_brick((2, 2), 0).unwrap();
        state.end_stroke();

        state.undo_stroke().unwrap();
        // the value from before the second stroke, not the intermediate 1
        assert_eq!(0, state.grid().get((2, 2)).unwrap());
    }

    #[test]
    fn unknown_brick_index_is_rejected_without_touching_the_grid() {
        let mut state = test_state();
        state.begin_stroke();
        let result = state.paint_brick((1, 1), 9);
        assert!(matches!(result, Err(EditorError::InvalidBrickIndex { index: 9 })));
        state.end_stroke();

        assert!(state.grid().is_empty());
        assert!(!state.can_undo());
    }

    #[test]
    fn out_of_bounds_paint_fails() {
        let mut state = test_state();
        state.begin_stroke();
        assert!(state.paint_brick((5, 0), 0).is_err());
        state.end_stroke();
        assert!(!state.can_undo());
    }

    #[test]
    fn erase_is_undoable() {
        let mut state = test_state();
        state.begin_stroke();
        state.paint_brick((1, 1), 1).unwrap();
        state.end_stroke();

        state.begin_stroke();
        state.erase_brick((1, 1)).unwrap();
        state.end_stroke();
        assert_eq!(EMPTY_CELL, state.grid().get((1, 1)).unwrap());

        state.undo_stroke().unwrap();
        assert_eq!(1, state.grid().get((1, 1)).unwrap());
    }

    #[test]
    fn clear_level_is_one_undoable_batch() {
        let mut state = test_state();
        state.begin_stroke();
        state.paint_brick((0, 0), 0).unwrap();
        state.paint_brick((4, 4), 1).unwrap();
        state.end_stroke();
        let painted: TileGrid = state.grid().clone();

        state.clear_level().unwrap();
        assert!(state.grid().is_empty());

        state.undo_stroke().unwrap();
        assert_eq!(painted, *state.grid());
    }

    #[test]
    fn undo_restores_cells_at_maximum_coordinates() {
        let catalog = BrickCatalog::from_bricks([BrickInfo::new("redBrick", 41, 20)]).unwrap();
        let mut state = EditState::new((65535, 2), catalog).unwrap();

        state.begin_stroke();
        state.paint_brick((65534, 1), 0).unwrap();
        state.end_stroke();

        state.undo_stroke().unwrap();
        assert_eq!(EMPTY_CELL, state.grid().get((65534, 1)).unwrap());
        state.redo_stroke().unwrap();
        assert_eq!(0, state.grid().get((65534, 1)).unwrap());
    }

    #[test]
    fn clearing_an_empty_board_commits_nothing() {
        let mut state = test_state();
        state.clear_level().unwrap();
        assert!(!state.can_undo());
    }
}
