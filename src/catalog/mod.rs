//! Static, read-only game data: level themes, trivia puzzles and companion lines

pub mod companion;
pub mod puzzles;
pub mod themes;

pub use puzzles::{PUZZLES, Puzzle};
pub use themes::{Rgb, THEMES, Theme, theme};
