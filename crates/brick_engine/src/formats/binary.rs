use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{BrickCatalog, EngineError, Result, TileGrid};

use super::{LevelFormat, LoadData};

/// 6-byte marker at the start of every binary level file.
pub const LEVEL_MAGIC: &[u8; 6] = b"PBBLVL";

/// The only format version ever shipped.
pub const FORMAT_VERSION: i32 = 1;

const HEADER_SIZE: usize = LEVEL_MAGIC.len() + 4;

/// The original binary level format: magic, version, then width*height
/// little-endian `i32` cells with the outer loop on x.
///
/// The file carries neither dimensions nor a checksum; the reader has
/// to know the grid size out-of-band, so loading requires
/// [`LoadData::grid_size`].
#[derive(Default)]
pub struct BinaryLevel {}

impl LevelFormat for BinaryLevel {
    fn file_extension(&self) -> &str {
        "lvl"
    }

    fn name(&self) -> &str {
        "Binary"
    }

    fn to_bytes(&self, grid: &TileGrid, _catalog: &BrickCatalog) -> Result<Vec<u8>> {
        let mut result = LEVEL_MAGIC.to_vec();
        result.write_i32::<LittleEndian>(FORMAT_VERSION)?;
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                result.write_i32::<LittleEndian>(grid.get((x, y))?)?;
            }
        }
        Ok(result)
    }

    fn load_grid(&self, data: &[u8], _catalog: &BrickCatalog, load_data: Option<LoadData>) -> Result<TileGrid> {
        let Some(size) = load_data.and_then(|load_data| load_data.grid_size) else {
            return Err(EngineError::MissingDimensions);
        };

        if data.len() < HEADER_SIZE {
            return Err(EngineError::TruncatedData {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }
        if &data[..LEVEL_MAGIC.len()] != LEVEL_MAGIC {
            return Err(EngineError::BadMagic);
        }

        let mut cursor = Cursor::new(&data[LEVEL_MAGIC.len()..]);
        let version = cursor.read_i32::<LittleEndian>()?;
        if version != FORMAT_VERSION {
            return Err(EngineError::UnsupportedVersion { version });
        }

        // Validating the dimensions first keeps the size math in usize.
        let mut grid = TileGrid::new(size)?;
        let expected = HEADER_SIZE + size.width as usize * size.height as usize * 4;
        if data.len() < expected {
            return Err(EngineError::TruncatedData {
                expected,
                actual: data.len(),
            });
        }
        for x in 0..size.width {
            for y in 0..size.height {
                grid.set((x, y), cursor.read_i32::<LittleEndian>()?)?;
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size;
    use pretty_assertions::assert_eq;

    fn test_grid() -> TileGrid {
        let mut grid = TileGrid::new((25, 23)).unwrap();
        grid.set((0, 0), 0).unwrap();
        grid.set((3, 3), 2).unwrap();
        grid.set((24, 22), 7).unwrap();
        grid
    }

    #[test]
    fn round_trip() {
        let grid = test_grid();
        let format = BinaryLevel::default();
        let catalog = BrickCatalog::new();

        let bytes = format.to_bytes(&grid, &catalog).unwrap();
        assert_eq!(HEADER_SIZE + 25 * 23 * 4, bytes.len());

        let loaded = format
            .load_grid(&bytes, &catalog, Some(LoadData::with_grid_size(Size::new(25, 23))))
            .unwrap();
        assert_eq!(grid, loaded);
    }

    #[test]
    fn header_layout() {
        let grid = TileGrid::new((2, 2)).unwrap();
        let bytes = BinaryLevel::default().to_bytes(&grid, &BrickCatalog::new()).unwrap();
        assert_eq!(b"PBBLVL", &bytes[..6]);
        // version 1, little endian
        assert_eq!([1u8, 0, 0, 0], bytes[6..10]);
        // all cells -1
        assert!(bytes[10..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn corrupted_magic_is_rejected() {
        let grid = test_grid();
        let format = BinaryLevel::default();
        let catalog = BrickCatalog::new();
        let load_data = Some(LoadData::with_grid_size(Size::new(25, 23)));

        let mut bytes = format.to_bytes(&grid, &catalog).unwrap();
        bytes[0] = b'X';
        assert!(matches!(format.load_grid(&bytes, &catalog, load_data), Err(EngineError::BadMagic)));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let format = BinaryLevel::default();
        let catalog = BrickCatalog::new();
        let load_data = Some(LoadData::with_grid_size(Size::new(2, 2)));

        let mut bytes = format.to_bytes(&TileGrid::new((2, 2)).unwrap(), &catalog).unwrap();
        bytes[6] = 2;
        assert!(matches!(
            format.load_grid(&bytes, &catalog, load_data),
            Err(EngineError::UnsupportedVersion { version: 2 })
        ));
    }

    #[test]
    fn truncated_data_is_rejected() {
        let format = BinaryLevel::default();
        let catalog = BrickCatalog::new();
        let load_data = Some(LoadData::with_grid_size(Size::new(25, 23)));

        let bytes = format.to_bytes(&test_grid(), &catalog).unwrap();
        let truncated = &bytes[..bytes.len() - 8];
        assert!(matches!(
            format.load_grid(truncated, &catalog, load_data),
            Err(EngineError::TruncatedData { .. })
        ));
        assert!(matches!(
            format.load_grid(b"PBB", &catalog, load_data),
            Err(EngineError::TruncatedData { .. })
        ));
    }

    #[test]
    fn oversized_requested_dimensions_are_rejected() {
        let format = BinaryLevel::default();
        let catalog = BrickCatalog::new();
        let bytes = format.to_bytes(&TileGrid::new((2, 2)).unwrap(), &catalog).unwrap();
        let load_data = Some(LoadData::with_grid_size(Size::new(70000, 70000)));
        assert!(matches!(
            format.load_grid(&bytes, &catalog, load_data),
            Err(EngineError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn loading_without_dimensions_fails() {
        let format = BinaryLevel::default();
        let catalog = BrickCatalog::new();
        let bytes = format.to_bytes(&test_grid(), &catalog).unwrap();
        assert!(matches!(format.load_grid(&bytes, &catalog, None), Err(EngineError::MissingDimensions)));
    }
}
