use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest grid side the terminal board is drawn for
pub const MAX_GRID: usize = 200;

/// Configuration for the game, fixed at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Canvas units per grid cell; particles live in canvas units
    pub cell_size: f32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Simulation ticks per second
    pub fps: u32,

    /// Code that unlocks the game when typed on the start screen
    pub secret_code: String,
    /// How long the unlock press must be held, in milliseconds
    pub long_press_ms: u64,

    /// Points per food eaten
    pub food_reward: u32,
    /// Points needed per level
    pub points_per_level: u32,
    /// Chance that eating opens a puzzle
    pub puzzle_chance: f64,
    /// Per-tick chance of a companion line
    pub companion_chance: f64,
    /// Delay before the restart/quit prompt, in milliseconds
    pub game_over_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            cell_size: 30.0,
            initial_snake_length: 3,
            fps: 10,
            secret_code: "NIRD".to_string(),
            long_press_ms: 2000,
            food_reward: 10,
            points_per_level: 50,
            puzzle_chance: 0.3,
            companion_chance: 0.01,
            game_over_delay_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a JSON configuration file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_snake_length == 0 {
            bail!("initial_snake_length must be at least 1");
        }
        // The snake spawns leftwards from the centre column
        if self.grid_width == 0
            || self.grid_height == 0
            || self.grid_width / 2 + 1 < self.initial_snake_length
        {
            bail!(
                "a {}x{} grid cannot hold a snake of length {}",
                self.grid_width,
                self.grid_height,
                self.initial_snake_length
            );
        }
        if self.fps == 0 {
            bail!("fps must be greater than zero");
        }
        if self.secret_code.trim().is_empty() {
            bail!("secret_code must not be empty");
        }
        if self.points_per_level == 0 {
            bail!("points_per_level must be greater than zero");
        }
        if self.grid_width > MAX_GRID || self.grid_height > MAX_GRID {
            bail!("grid sides are limited to {MAX_GRID} cells");
        }
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            bail!("cell_size must be positive");
        }
        for (name, chance) in [
            ("puzzle_chance", self.puzzle_chance),
            ("companion_chance", self.companion_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                bail!("{name} must be between 0 and 1, got {chance}");
            }
        }
        Ok(())
    }

    /// Minimum time between two simulation ticks
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / self.fps.max(1) as u64)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }

    /// Canvas size in canvas units
    pub fn canvas_size(&self) -> (f32, f32) {
        (
            self.grid_width as f32 * self.cell_size,
            self.grid_height as f32 * self.cell_size,
        )
    }
}
