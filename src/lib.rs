//! Rules engine for the hive board game: move generation, apply/undo,
//! terminal detection and a compact move codec.

pub mod hive;
