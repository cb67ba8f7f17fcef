use crate::{EngineError, Position, Result, Size};

/// Cell value for a blank space with no brick in it.
pub const EMPTY_CELL: i32 = -1;

/// A fixed-size 2D grid of brick indices.
///
/// Each cell holds either [`EMPTY_CELL`] or an index into the session's
/// [`BrickCatalog`](crate::BrickCatalog). The grid itself never validates
/// indices against the catalog; that stays the caller's job so the grid
/// can be used without one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    size: Size,
    // Column-at-a-time storage: cell (x, y) lives at x * height + y.
    // This matches the cell order of the binary level format.
    cells: Vec<i32>,
}

impl TileGrid {
    /// The largest supported grid dimension; positions are 16 bit.
    pub const MAX_DIMENSION: i32 = u16::MAX as i32;

    /// Creates a grid of the given dimensions with every cell empty.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimension`] if either dimension is
    /// zero, negative, or above [`Self::MAX_DIMENSION`].
    pub fn new(size: impl Into<Size>) -> Result<Self> {
        let size = size.into();
        if size.width <= 0 || size.height <= 0 || size.width > Self::MAX_DIMENSION || size.height > Self::MAX_DIMENSION {
            return Err(EngineError::InvalidDimension {
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            size,
            cells: vec![EMPTY_CELL; size.width as usize * size.height as usize],
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    fn offset(&self, pos: Position) -> Result<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.size.width || pos.y >= self.size.height {
            return Err(EngineError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.size.width,
                height: self.size.height,
            });
        }
        Ok(pos.x as usize * self.size.height as usize + pos.y as usize)
    }

    /// Returns the brick index at the given position.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutOfBounds`] if the position lies outside
    /// the grid.
    pub fn get(&self, pos: impl Into<Position>) -> Result<i32> {
        let offset = self.offset(pos.into())?;
        Ok(self.cells[offset])
    }

    /// Sets the brick index at the given position. `value` may be
    /// [`EMPTY_CELL`] or any non-negative catalog index.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutOfBounds`] if the position lies outside
    /// the grid.
    pub fn set(&mut self, pos: impl Into<Position>, value: i32) -> Result<()> {
        let offset = self.offset(pos.into())?;
        self.cells[offset] = value;
        Ok(())
    }

    /// Resets every cell to [`EMPTY_CELL`].
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == EMPTY_CELL)
    }

    /// Iterates over all cells in storage order (outer x, inner y).
    pub fn iter(&self) -> impl Iterator<Item = (Position, i32)> + '_ {
        let height = self.size.height as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (Position::new((i / height) as i32, (i % height) as i32), cell))
    }

    /// Positions of every cell holding the given brick index, in storage order.
    pub fn positions_of(&self, index: i32) -> Vec<Position> {
        self.iter().filter(|&(_, cell)| cell == index).map(|(pos, _)| pos).collect()
    }
}
