//! The game loop state machine
//!
//! A [`GameSession`] owns the engine and the state of one game and moves
//! between [`Phase`]s. Input arrives as [`Command`]s that are queued and only
//! applied at the start of the next frame, so an update step always sees a
//! consistent snapshot.
//!
//! ```text
//! Idle --unlock--> Running <--toggle--> Paused
//!                     |                   | restart -> Running
//!                     |                   | quit    -> Idle
//!                     v
//!                  GameOver --resolve(true)--> Running
//!                           --resolve(false)-> Idle
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::Rng;
use rand::rngs::StdRng;

use super::action::Command;
use super::config::GameConfig;
use super::engine::GameEngine;
use super::puzzle::Verdict;
use super::state::{Ending, GameState};
use crate::catalog::Puzzle;
use crate::catalog::companion::{GREETING, PUZZLE_SOLVED, PUZZLE_WRONG};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Start screen, waiting for the secret gesture
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Something observable that happened during a frame
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Unlocked,
    Paused,
    Resumed,
    Restarted,
    /// Back on the start screen
    ReturnedToIdle,
    FoodEaten { score: u32 },
    LevelUp { level: u32, theme: &'static str },
    PuzzleOpened(&'static Puzzle),
    PuzzleSolved { reward: usize },
    PuzzleFailed,
    PuzzleClosed,
    GameOver(Ending),
    ExitRequested,
}

/// What a call to [`GameSession::frame`] did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// One update step ran and the frame should be rendered
    pub ticked: bool,
    pub events: Vec<SessionEvent>,
}

/// Gate that lets at most one tick through per frame interval
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl TickClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
        }
    }

    /// True, and the tick is recorded, when a full interval has elapsed since
    /// the previous tick. A clock that never ticked is always ready.
    pub fn ready(&mut self, now: Instant) -> bool {
        let due = match self.last_tick {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last_tick = Some(now);
        }
        due
    }

    /// Start counting from `now`; the first tick lands one interval later
    pub fn restart(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }
}

/// Inputs of the reactive music, sampled from the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicCue {
    pub score: u32,
    pub level: u32,
    /// Music is held while paused, over, or on the start screen
    pub playing: bool,
}

pub struct GameSession<R: Rng = StdRng> {
    engine: GameEngine<R>,
    state: GameState,
    phase: Phase,
    clock: TickClock,
    commands: VecDeque<Command>,
    game_over_at: Option<Instant>,
    game_over_delay: Duration,
    companion: &'static str,
}

impl GameSession<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_engine(GameEngine::new(config))
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_engine(GameEngine::with_seed(config, seed))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_engine(mut engine: GameEngine<R>) -> Self {
        let clock = TickClock::new(engine.config().frame_interval());
        let game_over_delay = engine.config().game_over_delay();
        let state = engine.reset();

        Self {
            engine,
            state,
            phase: Phase::Idle,
            clock,
            commands: VecDeque::new(),
            game_over_at: None,
            game_over_delay,
            companion: GREETING,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Latest companion line
    pub fn companion(&self) -> &'static str {
        self.companion
    }

    pub fn active_puzzle(&self) -> Option<&'static Puzzle> {
        self.state.puzzle.active()
    }

    /// Queue a command for the next frame
    pub fn submit(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// The restart/quit prompt is due
    pub fn awaiting_choice(&self, now: Instant) -> bool {
        match (self.phase, self.game_over_at) {
            (Phase::GameOver, Some(at)) => now.saturating_duration_since(at) >= self.game_over_delay,
            _ => false,
        }
    }

    pub fn music_cue(&self) -> MusicCue {
        MusicCue {
            score: self.state.score,
            level: self.state.level,
            playing: self.phase == Phase::Running,
        }
    }

    /// Run one animation frame: apply queued commands, then run at most one
    /// update step if the frame interval has elapsed.
    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let mut report = FrameReport::default();

        while let Some(command) = self.commands.pop_front() {
            self.apply(command, now, &mut report.events);
        }

        match self.phase {
            // Gameplay waits while a puzzle is on screen
            Phase::Running if !self.state.puzzle.is_pending() => {
                if self.clock.ready(now) {
                    self.tick(now, &mut report.events);
                    report.ticked = true;
                }
            }
            Phase::GameOver if !self.state.particles.is_empty() => {
                if self.clock.ready(now) {
                    self.engine.advance_particles(&mut self.state);
                    report.ticked = true;
                }
            }
            _ => {}
        }

        report
    }

    fn tick(&mut self, now: Instant, events: &mut Vec<SessionEvent>) {
        let result = self.engine.step(&mut self.state);
        let info = result.info;

        if info.ate_food {
            events.push(SessionEvent::FoodEaten {
                score: self.state.score,
            });
        }
        if let Some(level) = info.level_up {
            let theme = self.state.theme().name;
            tracing::info!(level, theme, "level up");
            events.push(SessionEvent::LevelUp { level, theme });
        }
        if let Some(puzzle) = info.puzzle_opened {
            tracing::info!(puzzle = puzzle.id, "puzzle opened");
            events.push(SessionEvent::PuzzleOpened(puzzle));
        }
        if let Some(line) = info.companion {
            self.companion = line;
        }

        if result.terminated {
            if let Some(ending) = self.state.ending {
                self.enter_game_over(ending, now, events);
            }
        }
    }

    fn enter_game_over(&mut self, ending: Ending, now: Instant, events: &mut Vec<SessionEvent>) {
        tracing::info!(
            ?ending,
            score = self.state.score,
            level = self.state.level,
            size = self.state.snake.len(),
            "game over"
        );
        self.phase = Phase::GameOver;
        self.game_over_at = Some(now);
        events.push(SessionEvent::GameOver(ending));
    }

    fn apply(&mut self, command: Command, now: Instant, events: &mut Vec<SessionEvent>) {
        if command == Command::Exit {
            events.push(SessionEvent::ExitRequested);
            return;
        }

        match (self.phase, command) {
            (Phase::Idle, Command::Unlock) => {
                tracing::info!("secret unlocked");
                self.start(now);
                events.push(SessionEvent::Unlocked);
            }

            (Phase::Running, Command::Turn(direction)) if !self.state.puzzle.is_pending() => {
                if !self.state.snake.request_turn(direction) {
                    tracing::trace!(?direction, "reversal dropped");
                }
            }
            (Phase::Running, Command::SubmitAnswer(answer)) => {
                match self.engine.submit_answer(&mut self.state, &answer) {
                    Some(Verdict::Solved { reward }) => {
                        tracing::info!(reward, size = self.state.snake.len(), "puzzle solved");
                        self.companion = PUZZLE_SOLVED;
                        events.push(SessionEvent::PuzzleSolved { reward });
                    }
                    Some(Verdict::Wrong) => {
                        tracing::debug!("wrong puzzle answer");
                        self.companion = PUZZLE_WRONG;
                        events.push(SessionEvent::PuzzleFailed);
                    }
                    None => {}
                }
            }
            (Phase::Running, Command::ClosePuzzle) => {
                if self.engine.close_puzzle(&mut self.state) {
                    events.push(SessionEvent::PuzzleClosed);
                }
            }
            (Phase::Running, Command::TogglePause) => {
                self.phase = Phase::Paused;
                events.push(SessionEvent::Paused);
            }

            (Phase::Paused, Command::TogglePause) => {
                self.phase = Phase::Running;
                events.push(SessionEvent::Resumed);
            }
            (Phase::Paused, Command::Restart) => {
                self.start(now);
                events.push(SessionEvent::Restarted);
            }
            (Phase::Paused, Command::Quit) => {
                self.go_idle(now);
                events.push(SessionEvent::ReturnedToIdle);
            }

            (Phase::GameOver, Command::ResolveGameOver(restart)) if self.awaiting_choice(now) => {
                if restart {
                    self.start(now);
                    events.push(SessionEvent::Restarted);
                } else {
                    self.go_idle(now);
                    events.push(SessionEvent::ReturnedToIdle);
                }
            }

            (phase, command) => {
                tracing::trace!(?phase, ?command, "command ignored");
            }
        }
    }

    /// Fresh game, straight into `Running`
    fn start(&mut self, now: Instant) {
        self.state = self.engine.reset();
        self.phase = Phase::Running;
        self.clock.restart(now);
        self.game_over_at = None;
        self.companion = GREETING;
    }

    fn go_idle(&mut self, now: Instant) {
        self.state = self.engine.reset();
        self.phase = Phase::Idle;
        self.clock.restart(now);
        self.game_over_at = None;
    }

    /// Direct access for tests that need a staged board
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
