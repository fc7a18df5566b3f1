//! Drifting dots behind the start screen and the board
//!
//! Purely decorative: owns its own RNG, moves on its own interval and never
//! reads or writes game state.

use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub const DOT_COUNT: usize = 50;

/// Backdrop update period
pub const STEP_INTERVAL: Duration = Duration::from_millis(50);

/// Terminal cells per step at full speed. Browser pixels are far smaller than
/// terminal cells, so the raw `[-1, 1)` velocity is scaled down.
const CELLS_PER_STEP: f32 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Brightness in `[0.2, 0.7)`
    pub opacity: f32,
}

pub struct Backdrop<R: Rng = StdRng> {
    dots: Vec<Dot>,
    width: f32,
    height: f32,
    rng: R,
}

impl Backdrop<StdRng> {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }
}

impl<R: Rng> Backdrop<R> {
    pub fn with_rng(width: u16, height: u16, mut rng: R) -> Self {
        let (width, height) = (width.max(1) as f32, height.max(1) as f32);
        let dots = (0..DOT_COUNT)
            .map(|_| Dot {
                x: rng.gen::<f32>() * width,
                y: rng.gen::<f32>() * height,
                vx: (rng.gen::<f32>() - 0.5) * 2.0 * CELLS_PER_STEP,
                vy: (rng.gen::<f32>() - 0.5) * 2.0 * CELLS_PER_STEP,
                opacity: rng.gen::<f32>() * 0.5 + 0.2,
            })
            .collect();

        Self {
            dots,
            width,
            height,
            rng,
        }
    }

    /// Move every dot one step, bouncing off the edges
    pub fn step(&mut self) {
        for dot in &mut self.dots {
            dot.x += dot.vx;
            dot.y += dot.vy;

            if dot.x < 0.0 || dot.x > self.width {
                dot.vx = -dot.vx;
                dot.x = dot.x.clamp(0.0, self.width);
            }
            if dot.y < 0.0 || dot.y > self.height {
                dot.vy = -dot.vy;
                dot.y = dot.y.clamp(0.0, self.height);
            }
        }
    }

    /// Follow a terminal resize. Dots outside the new area are scattered
    /// back inside.
    pub fn resize(&mut self, width: u16, height: u16) {
        let (width, height) = (width.max(1) as f32, height.max(1) as f32);
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;

        for dot in &mut self.dots {
            if dot.x > width {
                dot.x = self.rng.gen::<f32>() * width;
            }
            if dot.y > height {
                dot.y = self.rng.gen::<f32>() * height;
            }
        }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }
}
