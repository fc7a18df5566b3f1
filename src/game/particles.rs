//! Cosmetic particle bursts
//!
//! Particles live in canvas units (`GameConfig::cell_size` per grid cell) and
//! never influence gameplay. They are advanced once per tick and dropped once
//! their life runs out.

use rand::Rng;

use crate::catalog::Rgb;

/// Velocity multiplier applied every tick
pub const DAMPING: f32 = 0.98;
/// Life lost every tick
pub const DECAY: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// 1.0 when spawned, removed at 0.0
    pub life: f32,
    pub color: Rgb,
}

/// Effect kinds and their shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    /// Food eaten, centred on the food cell
    Food,
    /// New level, centred on the canvas
    LevelUp,
    /// Fatal collision, centred on the canvas
    GameOver,
}

impl Burst {
    pub fn count(&self) -> usize {
        match self {
            Burst::Food => 20,
            Burst::LevelUp => 50,
            Burst::GameOver => 100,
        }
    }

    /// Each velocity component is drawn from `[-spread/2, spread/2)`
    pub fn spread(&self) -> f32 {
        match self {
            Burst::Food => 5.0,
            Burst::LevelUp => 10.0,
            Burst::GameOver => 15.0,
        }
    }
}

/// Every live particle of the current game
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a burst of particles at `origin`
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        kind: Burst,
        origin: (f32, f32),
        color: Rgb,
    ) {
        let spread = kind.spread();
        self.particles.reserve(kind.count());
        for _ in 0..kind.count() {
            self.particles.push(Particle {
                x: origin.0,
                y: origin.1,
                vx: (rng.gen::<f32>() - 0.5) * spread,
                vy: (rng.gen::<f32>() - 0.5) * spread,
                life: 1.0,
                color,
            });
        }
    }

    /// Move every particle one tick forward and drop the dead ones
    pub fn advance(&mut self) {
        self.particles.retain_mut(|p| {
            p.x += p.vx;
            p.y += p.vy;
            p.vx *= DAMPING;
            p.vy *= DAMPING;
            p.life -= DECAY;
            p.life > 0.0
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
