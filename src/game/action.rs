/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Player intent, queued by the input layer and applied by the session at
/// the start of the next frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request a new heading; reversals are dropped
    Turn(Direction),
    /// Secret gesture completed on the start screen
    Unlock,
    TogglePause,
    /// Start over from the pause menu
    Restart,
    /// Leave the current game and go back to the start screen
    Quit,
    /// Answer the active puzzle
    SubmitAnswer(String),
    /// Dismiss the active puzzle without answering
    ClosePuzzle,
    /// Game-over prompt: `true` restarts, `false` goes back to the start screen
    ResolveGameOver(bool),
    /// Terminate the program
    Exit,
}
