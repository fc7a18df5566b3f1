use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

/// What the screen currently expects from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Start screen: secret code typing and the held unlock key
    StartScreen,
    Playing,
    /// Puzzle overlay: keys edit the answer field
    Puzzle,
    Paused,
    /// Game over, prompt not shown yet
    GameOverWait,
    /// Game over, restart or quit
    GameOverPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
    /// Text typed into the secret code or the answer field
    Type(char),
    /// Backspace in a text field
    Erase,
    /// Enter in the answer field
    SubmitAnswer,
    /// Unlock key held down (sent again on every key repeat)
    HoldUnlock,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, context: InputContext) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Command(Command::Exit);
        }

        match context {
            InputContext::StartScreen => match key.code {
                KeyCode::Esc => KeyAction::Command(Command::Exit),
                KeyCode::Enter => KeyAction::HoldUnlock,
                KeyCode::Backspace => KeyAction::Erase,
                KeyCode::Char(c) => KeyAction::Type(c),
                _ => KeyAction::None,
            },
            InputContext::Playing => self.play_key(key.code),
            InputContext::Puzzle => match key.code {
                KeyCode::Esc => KeyAction::Command(Command::ClosePuzzle),
                KeyCode::Enter => KeyAction::SubmitAnswer,
                KeyCode::Backspace => KeyAction::Erase,
                KeyCode::Char(c) => KeyAction::Type(c),
                _ => KeyAction::None,
            },
            InputContext::Paused => match key.code {
                KeyCode::Esc | KeyCode::Char(' ') => KeyAction::Command(Command::TogglePause),
                KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Command(Command::Restart),
                KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Command(Command::Quit),
                _ => KeyAction::None,
            },
            InputContext::GameOverWait => KeyAction::None,
            InputContext::GameOverPrompt => match key.code {
                KeyCode::Enter
                | KeyCode::Char('r')
                | KeyCode::Char('R')
                | KeyCode::Char('y')
                | KeyCode::Char('Y') => KeyAction::Command(Command::ResolveGameOver(true)),
                KeyCode::Esc
                | KeyCode::Char('q')
                | KeyCode::Char('Q')
                | KeyCode::Char('n')
                | KeyCode::Char('N') => KeyAction::Command(Command::ResolveGameOver(false)),
                _ => KeyAction::None,
            },
        }
    }

    fn play_key(&self, code: KeyCode) -> KeyAction {
        let turn = |direction| KeyAction::Command(Command::Turn(direction));

        match code {
            // Movement - Arrow keys
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(Direction::Right),

            // Controls
            KeyCode::Esc | KeyCode::Char(' ') => KeyAction::Command(Command::TogglePause),

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
