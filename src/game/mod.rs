//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Randomness is injected through the engine so every run can be replayed from a seed.

pub mod action;
pub mod config;
pub mod engine;
pub mod level;
pub mod particles;
pub mod puzzle;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use particles::{Burst, Particle, ParticleField};
pub use puzzle::{PuzzleSlot, Verdict};
pub use session::{FrameReport, GameSession, MusicCue, Phase, SessionEvent, TickClock};
pub use state::{CollisionType, Ending, GameState, Position, Snake};
