use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use secret_snake::audio;
use secret_snake::game::GameConfig;
use secret_snake::logging;
use secret_snake::modes::PlayMode;

#[cfg(feature = "audio")]
const SOUND_HELP: &str = "Music plays on the default audio output; pass --mute to silence it.";

#[cfg(not(feature = "audio"))]
const SOUND_HELP: &str = "This build is silent. Sound is behind the `audio` cargo feature \
(cargo build --release --features audio), off by default because rodio links ALSA on Linux \
and needs its headers (libasound2-dev or alsa-lib-devel) to build.";

#[derive(Parser)]
#[command(name = "secret_snake")]
#[command(version, about = "Snake behind a secret, with puzzles, themes and reactive music")]
#[command(after_help = SOUND_HELP)]
struct Cli {
    /// JSON config file; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Snake moves per second
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Code that unlocks the game when typed on the start screen
    #[arg(long)]
    secret_code: Option<String>,

    /// How long the unlock press must be held, in milliseconds
    #[arg(long)]
    long_press_ms: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Play without music (builds without the `audio` feature are always silent)
    #[arg(long)]
    mute: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(code) = &self.secret_code {
            config.secret_code = code.clone();
        }
        if let Some(ms) = self.long_press_ms {
            config.long_press_ms = ms;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref())?;
    let config = cli.game_config()?;
    tracing::info!(?config, seed = ?cli.seed, "starting");

    let output = audio::open_output(cli.mute);
    let mut play_mode = PlayMode::new(config, cli.seed, output);
    play_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "secret_snake",
            "--width",
            "30",
            "--fps",
            "15",
            "--secret-code",
            "snek",
        ]);
        let config = cli.game_config().unwrap();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.fps, 15);
        assert_eq!(config.secret_code, "snek");
        assert!(!cli.mute);
    }

    #[test]
    fn test_help_explains_sound() {
        let help = Cli::command().render_help().to_string();
        let help = help.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(help.contains("--mute"));
        assert!(help.contains(SOUND_HELP));

        #[cfg(not(feature = "audio"))]
        {
            assert!(help.contains("--features audio"));
            assert!(help.contains("ALSA"));
        }
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let cli = Cli::parse_from(["secret_snake", "--fps", "0"]);
        assert!(cli.game_config().is_err());
    }
}
