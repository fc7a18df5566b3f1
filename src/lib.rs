//! Secret Snake - a terminal Snake game behind a secret gesture
//!
//! This library provides:
//! - Core game logic and the session state machine (game module)
//! - Static themes, puzzles and companion lines (catalog module)
//! - Keyboard and mouse translation, unlock gestures (input module)
//! - TUI rendering (render module) and the decorative backdrop
//! - Reactive procedural music (audio module)
//! - The interactive terminal mode (modes module)

pub mod audio;
pub mod backdrop;
pub mod catalog;
pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
