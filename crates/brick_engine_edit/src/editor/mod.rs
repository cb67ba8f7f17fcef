pub mod undo_stack;
pub use undo_stack::*;

mod editor_error;
pub use editor_error::*;

mod edit_operations;

use std::path::{Path, PathBuf};

use brick_engine::{BrickCatalog, LoadData, Size, TileGrid, load_level_file, save_level_file};

/// One editing session: the grid being painted, the brick catalog it
/// refers to, and the undo/redo history. Constructed per session (or
/// per test); there is no process-wide editor state.
pub struct EditState {
    grid: TileGrid,
    catalog: BrickCatalog,
    history: EditHistory,

    file_name: Option<PathBuf>,
    is_dirty: bool,
}

impl EditState {
    /// Starts a session on a fresh, empty level.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions are invalid.
    pub fn new(size: impl Into<Size>, catalog: BrickCatalog) -> Result<Self> {
        Ok(Self::from_grid(TileGrid::new(size)?, catalog))
    }

    /// Starts a session on an existing grid (e.g. a freshly loaded level).
    pub fn from_grid(grid: TileGrid, catalog: BrickCatalog) -> Self {
        Self {
            grid,
            catalog,
            history: EditHistory::new(),
            file_name: None,
            is_dirty: false,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn catalog(&self) -> &BrickCatalog {
        &self.catalog
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Replaces the current level with a fresh empty one and drops the
    /// whole edit history.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions are invalid; the session is untouched
    /// in that case.
    pub fn new_level(&mut self, size: impl Into<Size>) -> Result<()> {
        let grid = TileGrid::new(size)?;
        self.grid = grid;
        self.history.clear();
        self.file_name = None;
        self.is_dirty = false;
        Ok(())
    }

    /// Loads a level file into the session, replacing grid and history.
    /// A failed load leaves the session exactly as it was.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or decoded.
    pub fn open_level(&mut self, path: &Path, load_data: Option<LoadData>) -> Result<()> {
        let grid = load_level_file(path, &self.catalog, load_data)?;
        self.grid = grid;
        self.history.clear();
        self.file_name = Some(path.to_path_buf());
        self.is_dirty = false;
        Ok(())
    }

    /// Saves the current grid to the given path, remembering it as the
    /// session's file.
    ///
    /// # Errors
    ///
    /// Fails if encoding or writing fails; the dirty flag is only
    /// cleared on success.
    pub fn save_level(&mut self, path: &Path) -> Result<()> {
        save_level_file(path, &self.grid, &self.catalog)?;
        self.file_name = Some(path.to_path_buf());
        self.is_dirty = false;
        Ok(())
    }

    /// Undoes the most recent stroke and returns it so the caller can
    /// repaint the touched cells.
    ///
    /// # Errors
    ///
    /// Fails with [`EditorError::EmptyHistory`] if there is nothing to
    /// undo.
    pub fn undo_stroke(&mut self) -> Result<EditBatch> {
        let batch = self.history.undo(&mut self.grid)?;
        self.is_dirty = true;
        Ok(batch)
    }

    /// Reapplies the most recently undone stroke.
    ///
    /// # Errors
    ///
    /// Fails with [`EditorError::EmptyHistory`] if there is nothing to
    /// redo.
    pub fn redo_stroke(&mut self) -> Result<EditBatch> {
        let batch = self.history.redo(&mut self.grid)?;
        self.is_dirty = true;
        Ok(batch)
    }
}

impl UndoState for EditState {
    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn undo(&mut self) -> Result<()> {
        self.undo_stroke().map(|_| ())
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn redo(&mut self) -> Result<()> {
        self.redo_stroke().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_engine::{BrickInfo, EMPTY_CELL};
    use pretty_assertions::assert_eq;

    fn test_catalog() -> BrickCatalog {
        BrickCatalog::from_bricks([BrickInfo::new("redBrick", 41, 20), BrickInfo::new("blueBrick", 41, 20)]).unwrap()
    }

    fn test_state() -> EditState {
        EditState::new((25, 23), test_catalog()).unwrap()
    }

    #[test]
    fn paint_commit_undo_redo() {
        let mut state = test_state();

        state.begin_stroke();
        state.paint_brick((1, 1), 1).unwrap();
        state.end_stroke();
        assert!(state.is_dirty());

        state.undo_stroke().unwrap();
        assert_eq!(EMPTY_CELL, state.grid().get((1, 1)).unwrap());

        state.redo_stroke().unwrap();
        assert_eq!(1, state.grid().get((1, 1)).unwrap());
    }

    #[test]
    fn new_level_resets_session() {
        let mut state = test_state();
        state.begin_stroke();
        state.paint_brick((0, 0), 0).unwrap();
        state.end_stroke();

        state.new_level((10, 10)).unwrap();
        assert!(state.grid().is_empty());
        assert_eq!(Size::new(10, 10), state.grid().size());
        assert!(!state.can_undo());
        assert!(!state.is_dirty());
        assert!(state.file_name().is_none());
    }

    #[test]
    fn save_and_open_binary_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level1.lvl");

        let mut state = test_state();
        state.begin_stroke();
        state.paint_brick((3, 3), 0).unwrap();
        state.paint_brick((4, 3), 1).unwrap();
        state.end_stroke();
        state.save_level(&path).unwrap();
        assert!(!state.is_dirty());
        assert_eq!(Some(path.as_path()), state.file_name());

        let saved_grid = state.grid().clone();
        let mut reopened = test_state();
        reopened.open_level(&path, Some(LoadData::with_grid_size((25, 23)))).unwrap();
        assert_eq!(saved_grid, *reopened.grid());
        assert!(!reopened.can_undo());
    }

    #[test]
    fn save_and_open_xml_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level1.xml");

        let mut state = test_state();
        state.begin_stroke();
        state.paint_brick((0, 0), 0).unwrap();
        state.paint_brick((24, 22), 1).unwrap();
        state.end_stroke();
        state.save_level(&path).unwrap();

        let saved_grid = state.grid().clone();
        let mut reopened = test_state();
        reopened.open_level(&path, None).unwrap();
        assert_eq!(saved_grid, *reopened.grid());
    }

    #[test]
    fn failed_open_leaves_session_untouched() {
        let mut state = test_state();
        state.begin_stroke();
        state.paint_brick((1, 1), 0).unwrap();
        state.end_stroke();
        let before = state.grid().clone();

        let result = state.open_level(Path::new("does/not/exist.lvl"), Some(LoadData::with_grid_size((25, 23))));
        assert!(result.is_err());
        assert_eq!(before, *state.grid());
        assert!(state.can_undo());
    }
}
