pub mod renderer;

pub use renderer::{Renderer, Scene, UnlockView};
