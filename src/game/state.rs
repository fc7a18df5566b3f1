use super::action::Direction;
use super::particles::ParticleField;
use super::puzzle::PuzzleSlot;
use crate::catalog::{Theme, theme};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction used by the last tick
    pub direction: Direction,
    /// Heading requested for the next tick
    pub next_direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self {
            body,
            direction,
            next_direction: direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Buffer a heading for the next tick. Reversals of the current heading
    /// are refused and leave the buffer untouched.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Make the buffered heading current; called once at the start of a tick
    pub fn commit_turn(&mut self) {
        self.direction = self.next_direction;
    }

    /// Cell the head would enter on this tick's heading
    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.direction)
    }

    /// Prepend a new head, dropping the tail unless the snake grows
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    /// Append `count` segments stacked on the current tail cell
    pub fn grow_tail(&mut self, count: usize) {
        let tail = self.tail();
        self.body.extend(std::iter::repeat(tail).take(count));
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Collision(CollisionType),
    /// The snake fills every cell; nothing left to eat
    BoardFull,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only once the board is full
    pub food: Option<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub level: u32,
    /// Catalog index of the current theme
    pub theme_index: usize,
    /// Nominal snake size, grown by puzzle rewards
    pub target_size: usize,
    pub particles: ParticleField,
    pub puzzle: PuzzleSlot,
    pub steps: u32,
    pub ending: Option<Ending>,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        let target_size = snake.len();
        Self {
            snake,
            food: Some(food),
            grid_width,
            grid_height,
            score: 0,
            level: 1,
            theme_index: 0,
            target_size,
            particles: ParticleField::new(),
            puzzle: PuzzleSlot::new(),
            steps: 0,
            ending: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.ending.is_none()
    }

    pub fn theme(&self) -> &'static Theme {
        theme(self.theme_index)
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }
}
