//! Unified error types for brick_engine

use thiserror::Error;

/// Main error type for brick_engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Grid Errors ===
    #[error("Invalid grid dimensions {width}x{height}: both must be non-zero")]
    InvalidDimension { width: i32, height: i32 },

    #[error("Position ({x}, {y}) is out of bounds for a {width}x{height} grid")]
    OutOfBounds { x: i32, y: i32, width: i32, height: i32 },

    // === Catalog Errors ===
    #[error("Duplicate brick '{name}' in catalog")]
    DuplicateBrick { name: String },

    // === Loading Errors ===
    #[error("Invalid file ID or magic number mismatch")]
    BadMagic,

    #[error("Unsupported level format version: {version}")]
    UnsupportedVersion { version: i32 },

    #[error("Level data truncated: expected {expected} bytes, got {actual}")]
    TruncatedData { expected: usize, actual: usize },

    #[error("Binary level files carry no dimensions; the grid size must be supplied by the caller")]
    MissingDimensions,

    #[error("Unknown brick '{name}'. Check the entities file to see if it's present")]
    UnknownBrick { name: String },

    #[error("Missing or malformed attribute '{attribute}' on <{element}>")]
    MalformedAttribute { element: String, attribute: String },

    #[error("Invalid level file: {message}")]
    InvalidLevelFile { message: String },

    #[error("Unsupported file extension: {extension}")]
    UnsupportedExtension { extension: String },

    // === External Errors ===
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type alias for brick_engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

// === Convenience constructors ===
impl EngineError {
    pub fn malformed_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MalformedAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invalid_level_file(msg: impl Into<String>) -> Self {
        Self::InvalidLevelFile { message: msg.into() }
    }

    pub fn unknown_brick(name: impl Into<String>) -> Self {
        Self::UnknownBrick { name: name.into() }
    }
}
