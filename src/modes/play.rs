use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::time::interval;

use crate::audio::{MusicDirector, SYNC_INTERVAL, ToneOutput};
use crate::backdrop::{self, Backdrop};
use crate::game::{Command, GameConfig, GameSession, Phase, SessionEvent};
use crate::input::{
    AnswerField, InputContext, InputHandler, KEY_REPEAT_GAP, KeyAction, LongPress, SecretCode,
};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, Scene, UnlockView};

/// Animation frame period; the session decides on its own when to tick
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interactive game in the terminal
pub struct PlayMode {
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    secret: SecretCode,
    mouse_press: LongPress,
    key_press: LongPress,
    answer: AnswerField,
    music: MusicDirector,
    backdrop: Backdrop,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, seed: Option<u64>, output: Box<dyn ToneOutput>) -> Self {
        let secret = SecretCode::new(&config.secret_code);
        let hold = config.long_press();
        let session = match seed {
            Some(seed) => GameSession::with_seed(config, seed),
            None => GameSession::new(config),
        };

        Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            secret,
            mouse_press: LongPress::new(hold),
            key_press: LongPress::new(hold).with_repeat_gap(KEY_REPEAT_GAP),
            answer: AnswerField::new(),
            music: MusicDirector::new(output),
            backdrop: Backdrop::new(80, 24),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        tracing::info!("waiting for the secret");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        tracing::info!(
            games = self.metrics.games_played,
            best = self.metrics.high_score,
            "session closed"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);
        let mut music_timer = interval(SYNC_INTERVAL);
        let mut backdrop_timer = interval(backdrop::STEP_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, Instant::now());
                    }
                }

                // Game frame: gestures, queued commands, at most one tick, draw
                _ = frame_timer.tick() => {
                    self.update(Instant::now());
                    self.draw(terminal)?;
                }

                _ = music_timer.tick() => {
                    self.music.sync(self.session.music_cue());
                }

                _ = backdrop_timer.tick() => {
                    self.backdrop.step();
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn input_context(&self, now: Instant) -> InputContext {
        match self.session.phase() {
            Phase::Idle => InputContext::StartScreen,
            Phase::Running if self.session.active_puzzle().is_some() => InputContext::Puzzle,
            Phase::Running => InputContext::Playing,
            Phase::Paused => InputContext::Paused,
            Phase::GameOver if self.session.awaiting_choice(now) => InputContext::GameOverPrompt,
            Phase::GameOver => InputContext::GameOverWait,
        }
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Releases are only reported by terminals with enhanced keyboard support
        if key.kind == KeyEventKind::Release {
            if key.code == KeyCode::Enter {
                self.key_press.release();
            }
            return;
        }

        let context = self.input_context(now);
        match self.input_handler.handle_key_event(key, context) {
            KeyAction::Command(command) => self.session.submit(command),
            KeyAction::Type(c) => {
                if context == InputContext::StartScreen {
                    if self.secret.push(c) {
                        self.session.submit(Command::Unlock);
                    }
                } else {
                    self.answer.push(c);
                }
            }
            KeyAction::Erase => {
                if context == InputContext::StartScreen {
                    self.secret.erase();
                } else {
                    self.answer.erase();
                }
            }
            KeyAction::SubmitAnswer => {
                self.session.submit(Command::SubmitAnswer(self.answer.take()));
            }
            KeyAction::HoldUnlock => self.key_press.hold(now),
            KeyAction::None => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.session.phase() != Phase::Idle {
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_press.hold(now),
            MouseEventKind::Up(MouseButton::Left) => self.mouse_press.release(),
            _ => {}
        }
    }

    fn update(&mut self, now: Instant) {
        if self.session.phase() == Phase::Idle
            && (self.mouse_press.poll(now) || self.key_press.poll(now))
        {
            self.session.submit(Command::Unlock);
        }

        let report = self.session.frame(now);
        for event in report.events {
            self.on_session_event(event, now);
        }

        self.metrics.update(now);
    }

    fn on_session_event(&mut self, event: SessionEvent, now: Instant) {
        match event {
            SessionEvent::Unlocked => {
                self.secret.clear();
                self.mouse_press.release();
                self.key_press.release();
                self.metrics.on_game_start(now);
                self.music.start();
            }
            SessionEvent::Restarted => {
                self.answer.clear();
                self.metrics.on_game_start(now);
            }
            SessionEvent::ReturnedToIdle => {
                self.answer.clear();
                self.secret.clear();
                self.metrics.on_game_abandoned();
            }
            SessionEvent::GameOver(_) => {
                self.metrics.on_game_over(self.session.state().score);
            }
            SessionEvent::PuzzleOpened(_)
            | SessionEvent::PuzzleSolved { .. }
            | SessionEvent::PuzzleFailed
            | SessionEvent::PuzzleClosed => self.answer.clear(),
            SessionEvent::ExitRequested => self.should_quit = true,
            SessionEvent::Paused => self.metrics.on_game_paused(now),
            SessionEvent::Resumed => self.metrics.on_game_resumed(now),
            SessionEvent::FoodEaten { .. } | SessionEvent::LevelUp { .. } => {}
        }
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let size = terminal.size().context("Failed to read terminal size")?;
        self.backdrop.resize(size.width, size.height);

        let scene = self.scene(Instant::now());
        terminal
            .draw(|frame| self.renderer.render(frame, &scene))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn scene(&self, now: Instant) -> Scene<'_> {
        let clock = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();

        Scene {
            state: self.session.state(),
            phase: self.session.phase(),
            config: self.session.config(),
            companion: self.session.companion(),
            metrics: &self.metrics,
            backdrop: self.backdrop.dots(),
            unlock: UnlockView {
                progress: self
                    .mouse_press
                    .progress(now)
                    .max(self.key_press.progress(now)),
                typed: self.secret.typed_len(),
                code_len: self.secret.code_len(),
            },
            answer: self.answer.text(),
            prompt_ready: self.session.awaiting_choice(now),
            clock,
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
