use std::collections::HashMap;

use crate::{EngineError, Result};

/// A brick type parsed from the entities file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrickInfo {
    /// Unique name of the brick, as used by the XML level format.
    pub name: String,
    /// The width of a single sprite frame. All frames are assumed equal.
    pub frame_width: i32,
    /// The height of a single sprite frame.
    pub frame_height: i32,
}

impl BrickInfo {
    pub fn new(name: impl Into<String>, frame_width: i32, frame_height: i32) -> Self {
        Self {
            name: name.into(),
            frame_width,
            frame_height,
        }
    }
}

/// The table mapping brick names to grid indices and frame dimensions.
///
/// The catalog is supplied fully formed by the asset-loading layer before
/// any grid operations happen and is treated as immutable for the length
/// of an editing session. A brick's index is its insertion position.
#[derive(Clone, Debug, Default)]
pub struct BrickCatalog {
    bricks: Vec<BrickInfo>,
    name_lookup: HashMap<String, usize>,
}

impl BrickCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from an ordered list of bricks.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateBrick`] if two entries share a name.
    pub fn from_bricks(bricks: impl IntoIterator<Item = BrickInfo>) -> Result<Self> {
        let mut catalog = Self::new();
        for brick in bricks {
            catalog.add(brick)?;
        }
        Ok(catalog)
    }

    /// Appends a brick; its index becomes the current catalog length.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateBrick`] if the name is already taken.
    pub fn add(&mut self, brick: BrickInfo) -> Result<()> {
        if self.name_lookup.contains_key(&brick.name) {
            return Err(EngineError::DuplicateBrick { name: brick.name });
        }
        self.name_lookup.insert(brick.name.clone(), self.bricks.len());
        self.bricks.push(brick);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Looks a brick up by name, returning it together with its index.
    pub fn brick_by_name(&self, name: &str) -> Option<(i32, &BrickInfo)> {
        self.name_lookup.get(name).map(|&index| (index as i32, &self.bricks[index]))
    }

    /// Looks a brick up by grid index. Negative indices (empty cells)
    /// yield `None`.
    pub fn brick_by_index(&self, index: i32) -> Option<&BrickInfo> {
        if index < 0 {
            return None;
        }
        self.bricks.get(index as usize)
    }

    /// Iterates bricks in index order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &BrickInfo)> {
        self.bricks.iter().enumerate().map(|(index, brick)| (index as i32, brick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalog() -> BrickCatalog {
        BrickCatalog::from_bricks([
            BrickInfo::new("redBrick", 41, 20),
            BrickInfo::new("blueBrick", 41, 20),
            BrickInfo::new("steelBrick", 41, 20),
        ])
        .unwrap()
    }

    #[test]
    fn index_is_insertion_order() {
        let catalog = test_catalog();
        assert_eq!(3, catalog.len());
        assert_eq!(Some(0), catalog.brick_by_name("redBrick").map(|(i, _)| i));
        assert_eq!(Some(2), catalog.brick_by_name("steelBrick").map(|(i, _)| i));
        assert_eq!("blueBrick", catalog.brick_by_index(1).unwrap().name);
    }

    #[test]
    fn unknown_names_and_empty_cells_yield_none() {
        let catalog = test_catalog();
        assert!(catalog.brick_by_name("goldBrick").is_none());
        assert!(catalog.brick_by_index(-1).is_none());
        assert!(catalog.brick_by_index(3).is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalog = test_catalog();
        let result = catalog.add(BrickInfo::new("redBrick", 41, 20));
        assert!(matches!(result, Err(EngineError::DuplicateBrick { .. })));
    }
}
