mod binary;
pub use binary::*;

mod xml;
pub use xml::*;

use std::path::Path;

use crate::{BrickCatalog, EngineError, Result, Size, TileGrid};

/// Extra information a loader may need but the file itself does not carry.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadData {
    /// Grid dimensions for formats that do not persist them (the binary
    /// level format). The editor supplies its fixed level size here.
    pub grid_size: Option<Size>,
}

impl LoadData {
    pub fn with_grid_size(size: impl Into<Size>) -> Self {
        Self {
            grid_size: Some(size.into()),
        }
    }
}

/// A level (de)serializer translating between grid contents and bytes.
///
/// Codecs are pure transformations: they share no state and may be
/// invoked repeatedly on independent grids.
pub trait LevelFormat {
    fn file_extension(&self) -> &str;

    fn name(&self) -> &str;

    /// Serializes the grid to a complete in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be expressed in this format.
    fn to_bytes(&self, grid: &TileGrid, catalog: &BrickCatalog) -> Result<Vec<u8>>;

    /// Builds a fresh grid from bytes. The caller's existing grid is
    /// never touched, so a failed load leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is malformed for this format.
    fn load_grid(&self, data: &[u8], catalog: &BrickCatalog, load_data: Option<LoadData>) -> Result<TileGrid>;
}

/// Picks the codec for a path by file extension.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedExtension`] for anything that is
/// neither a binary (`.lvl`) nor an XML (`.xml`) level file.
pub fn format_for_path(path: &Path) -> Result<Box<dyn LevelFormat>> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "lvl" => Ok(Box::new(BinaryLevel::default())),
        "xml" => Ok(Box::new(XmlLevel::default())),
        _ => Err(EngineError::UnsupportedExtension { extension }),
    }
}

/// Saves the grid to the given path, choosing the codec by extension.
///
/// The whole buffer is encoded before the file is opened, so a codec
/// failure never leaves a truncated file behind.
///
/// # Errors
///
/// Returns an error if encoding or the final write fails.
pub fn save_level_file(path: &Path, grid: &TileGrid, catalog: &BrickCatalog) -> Result<()> {
    let format = format_for_path(path)?;
    let bytes = format.to_bytes(grid, catalog)?;
    log::debug!("saving {} level to {}", format.name(), path.display());
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Loads a level from the given path, choosing the codec by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_level_file(path: &Path, catalog: &BrickCatalog, load_data: Option<LoadData>) -> Result<TileGrid> {
    let format = format_for_path(path)?;
    let data = std::fs::read(path)?;
    log::debug!("loading {} level from {}", format.name(), path.display());
    format.load_grid(&data, catalog, load_data)
}
