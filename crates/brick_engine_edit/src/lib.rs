#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

mod editor;
pub use editor::*;

// Re-export all necessary types from brick_engine
pub use brick_engine::{
    BrickCatalog, BrickInfo, EMPTY_CELL, EngineError, LevelFormat, LevelList, LoadData, Position, Size, TileGrid, formats, load_level_file, save_level_file,
};
