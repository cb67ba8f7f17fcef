use brick_engine::EngineError;
use thiserror::Error;

/// Errors raised by the editing session itself.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Popping an undo/redo stack that holds nothing. The GUI is
    /// expected to disable the controls, but the core does not rely
    /// on that gate.
    #[error("Nothing to undo or redo: the history stack is empty")]
    EmptyHistory,

    #[error("Brick index {index} does not name a catalog entry")]
    InvalidBrickIndex { index: i32 },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type alias for brick_engine_edit operations
pub type Result<T> = std::result::Result<T, EditorError>;
