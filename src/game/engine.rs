use super::{
    action::Direction,
    config::GameConfig,
    level::{level_for_score, theme_index},
    particles::Burst,
    puzzle::Verdict,
    state::{CollisionType, Ending, GameState, Position, Snake},
};
use crate::catalog::Puzzle;
use crate::catalog::companion::COMPANION_LINES;
use crate::catalog::themes::GAME_OVER_RED;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Random draws tried before the spawner falls back to listing free cells
const MAX_FOOD_SAMPLES: usize = 64;

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// New level reached on this step
    pub level_up: Option<u32>,
    /// Puzzle opened by this step's meal
    pub puzzle_opened: Option<&'static Puzzle>,
    /// Companion line drawn on this step
    pub companion: Option<&'static str>,
    /// The snake now covers the whole board
    pub board_full: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine seeded from the OS
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose random sequence is fully reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        );
        state.food = self.spawn_food_avoid_snake(&state);
        if state.food.is_none() {
            state.ending = Some(Ending::BoardFull);
        }
        state
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_alive() {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        let mut info = StepInfo::default();

        // Direction changes queued since the last tick land together here
        state.snake.commit_turn();
        let new_head = state.snake.next_head();

        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.ending = Some(Ending::Collision(collision_type));
            state.steps += 1;
            let center = self.canvas_center();
            state
                .particles
                .burst(&mut self.rng, Burst::GameOver, center, GAME_OVER_RED);
            tracing::debug!(?collision_type, ?new_head, "fatal collision");

            info.collision_type = Some(collision_type);
            return StepResult {
                terminated: true,
                info,
            };
        }

        let ate_food = state.food == Some(new_head);
        state.snake.advance_to(new_head, ate_food);

        if ate_food {
            info.ate_food = true;
            self.on_food_eaten(state, new_head, &mut info);
        }

        state.particles.advance();

        if self.rng.gen_bool(self.config.companion_chance.clamp(0.0, 1.0)) {
            info.companion = COMPANION_LINES.choose(&mut self.rng).copied();
        }

        state.steps += 1;

        StepResult {
            terminated: info.board_full,
            info,
        }
    }

    fn on_food_eaten(&mut self, state: &mut GameState, eaten: Position, info: &mut StepInfo) {
        state.score += self.config.food_reward;

        let cell = self.config.cell_size;
        let origin = (
            (eaten.x as f32 + 0.5) * cell,
            (eaten.y as f32 + 0.5) * cell,
        );
        let food_color = state.theme().food;
        state
            .particles
            .burst(&mut self.rng, Burst::Food, origin, food_color);

        state.food = self.spawn_food_avoid_snake(state);
        if state.food.is_none() {
            state.ending = Some(Ending::BoardFull);
            info.board_full = true;
        }

        info.level_up = self.check_level_up(state);

        if !info.board_full
            && !state.puzzle.is_pending()
            && self.rng.gen_bool(self.config.puzzle_chance.clamp(0.0, 1.0))
        {
            info.puzzle_opened = state.puzzle.open(&mut self.rng);
        }

        tracing::trace!(score = state.score, size = state.snake.len(), "food eaten");
    }

    /// Raise the stored level when the score allows it; returns the new level
    fn check_level_up(&mut self, state: &mut GameState) -> Option<u32> {
        let level = level_for_score(state.score, self.config.points_per_level);
        if level <= state.level {
            return None;
        }

        state.level = level;
        state.theme_index = theme_index(level);
        let center = self.canvas_center();
        let snake_color = state.theme().snake;
        state
            .particles
            .burst(&mut self.rng, Burst::LevelUp, center, snake_color);
        Some(level)
    }

    /// Answer the active puzzle; a correct answer grows the snake at its tail
    pub fn submit_answer(&mut self, state: &mut GameState, answer: &str) -> Option<Verdict> {
        let verdict = state.puzzle.submit(answer)?;
        if let Verdict::Solved { reward } = verdict {
            state.target_size += reward;
            state.snake.grow_tail(reward);
        }
        Some(verdict)
    }

    /// Dismiss the active puzzle without a reward
    pub fn close_puzzle(&mut self, state: &mut GameState) -> bool {
        state.puzzle.close()
    }

    /// Advance cosmetic particles only; used while gameplay is frozen
    pub fn advance_particles(&mut self, state: &mut GameState) {
        state.particles.advance();
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        // Check wall collision
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail has not moved yet, so its cell still counts
        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random empty position, or `None` when the board is full
    fn spawn_food_avoid_snake(&mut self, state: &GameState) -> Option<Position> {
        let (width, height) = (state.grid_width as i32, state.grid_height as i32);
        if width == 0 || height == 0 {
            return None;
        }

        for _ in 0..MAX_FOOD_SAMPLES {
            let pos = Position::new(
                self.rng.gen_range(0..width),
                self.rng.gen_range(0..height),
            );
            if !state.is_occupied_by_snake(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .filter(|pos| !state.is_occupied_by_snake(*pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    fn canvas_center(&self) -> (f32, f32) {
        let (width, height) = self.config.canvas_size();
        (width / 2.0, height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PUZZLES;
    use std::collections::HashSet;

    /// Small grid, no random puzzles or companion lines
    fn quiet_config() -> GameConfig {
        GameConfig {
            puzzle_chance: 0.0,
            companion_chance: 0.0,
            ..GameConfig::small()
        }
    }

    fn feed(state: &mut GameState) {
        state.food = Some(state.snake.head().moved_in_direction(state.snake.next_direction));
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let state = engine.reset();

        assert!(state.is_alive());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
        assert!(state.is_in_bounds(food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::with_seed(quiet_config(), 2);
        let mut state = engine.reset();
        state.food = Some(Position::new(0, 0));
        let initial_head = state.snake.head();

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), initial_head.moved_by(1, 0));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = GameEngine::with_seed(quiet_config(), 3);
        let mut state = engine.reset();
        feed(&mut state);
        let initial_length = state.snake.len();

        let result = engine.step(&mut state);

        assert!(result.info.ate_food);
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert_eq!(state.particles.len(), Burst::Food.count());
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_level_progression_scenario() {
        let mut engine = GameEngine::with_seed(GameConfig::new(30, 30), 4);
        let mut state = engine.reset();
        // Keep the run deterministic regardless of puzzle draws
        engine.config.puzzle_chance = 0.0;
        engine.config.companion_chance = 0.0;

        feed(&mut state);
        engine.step(&mut state);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.score, 10);

        let mut level_ups = Vec::new();
        for _ in 0..4 {
            feed(&mut state);
            let result = engine.step(&mut state);
            assert!(result.info.ate_food);
            level_ups.extend(result.info.level_up);
        }

        assert_eq!(state.score, 50);
        assert_eq!(state.level, 2);
        assert_eq!(level_ups, vec![2]);
        assert_eq!(state.theme_index, 1);
        assert_eq!(state.theme().name, "Neon");
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GameEngine::with_seed(quiet_config(), 5);
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            Position::new(5, 5),
            10,
            10,
        );

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert!(!state.is_alive());
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(state.ending, Some(Ending::Collision(CollisionType::Wall)));
        assert_eq!(state.particles.len(), Burst::GameOver.count());
        // Frozen body
        assert_eq!(state.snake.head(), Position::new(0, 5));
    }

    #[test]
    fn test_self_collision_into_fourth_segment() {
        let mut engine = GameEngine::with_seed(quiet_config(), 6);
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
                Position::new(3, 5),
            ],
            direction: Direction::Up,
            next_direction: Direction::Up,
        };
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        assert!(state.snake.request_turn(Direction::Left));
        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_tail_cell_is_fatal() {
        let mut engine = GameEngine::with_seed(quiet_config(), 7);
        // Square loop: the head moves onto the cell the tail is about to leave
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
            ],
            direction: Direction::Up,
            next_direction: Direction::Left,
        };
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        let result = engine.step(&mut state);

        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = GameEngine::with_seed(quiet_config(), 8);
        let mut state = engine.reset();
        state.food = Some(Position::new(0, 0));

        // Try to turn 180 degrees (should be ignored)
        state.snake.request_turn(Direction::Left);
        engine.step(&mut state);

        assert_eq!(state.snake.direction, Direction::Right);
        assert!(state.is_alive());
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = GameEngine::with_seed(quiet_config(), 9);
        let mut state = engine.reset();
        state.ending = Some(Ending::Collision(CollisionType::Wall));
        let before = state.clone();

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(state, before);
    }

    #[test]
    fn test_puzzle_reward_grows_at_tail() {
        let mut engine = GameEngine::with_seed(quiet_config(), 10);
        let mut state = engine.reset();
        let tail = state.snake.tail();
        state.puzzle.force(&PUZZLES[1]); // "Taille +2"

        assert_eq!(
            engine.submit_answer(&mut state, "i"),
            Some(Verdict::Solved { reward: 2 })
        );
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.target_size, 5);
        assert_eq!(&state.snake.body[3..], &[tail, tail]);
        assert!(!state.puzzle.is_pending());
    }

    #[test]
    fn test_wrong_answer_changes_nothing() {
        let mut engine = GameEngine::with_seed(quiet_config(), 11);
        let mut state = engine.reset();
        state.puzzle.force(&PUZZLES[2]);
        let before = state.clone();

        assert_eq!(engine.submit_answer(&mut state, "64"), Some(Verdict::Wrong));
        assert_eq!(state, before);
        assert_eq!(engine.submit_answer(&mut state, ""), Some(Verdict::Wrong));
        assert!(state.puzzle.is_pending());
    }

    #[test]
    fn test_stacked_segments_unwind() {
        let mut engine = GameEngine::with_seed(quiet_config(), 12);
        let mut state = engine.reset();
        state.food = Some(Position::new(0, 0));
        state.puzzle.force(&PUZZLES[2]); // "Taille +3"
        engine.submit_answer(&mut state, "32");
        assert_eq!(state.snake.len(), 6);

        for _ in 0..3 {
            engine.step(&mut state);
        }

        let distinct: HashSet<_> = state.snake.body.iter().collect();
        assert_eq!(distinct.len(), 6);
        assert_eq!(state.snake.len(), 6);
    }

    #[test]
    fn test_puzzle_opens_on_meal() {
        let config = GameConfig {
            puzzle_chance: 1.0,
            companion_chance: 0.0,
            ..GameConfig::small()
        };
        let mut engine = GameEngine::with_seed(config, 13);
        let mut state = engine.reset();

        feed(&mut state);
        let result = engine.step(&mut state);
        let opened = result.info.puzzle_opened.unwrap();
        assert_eq!(state.puzzle.active(), Some(opened));

        // Pending puzzle blocks a second one
        feed(&mut state);
        let result = engine.step(&mut state);
        assert!(result.info.puzzle_opened.is_none());
        assert_eq!(state.puzzle.active(), Some(opened));

        // Closing re-arms activation
        assert!(engine.close_puzzle(&mut state));
        feed(&mut state);
        let result = engine.step(&mut state);
        assert!(result.info.puzzle_opened.is_some());
    }

    #[test]
    fn test_companion_lines() {
        let config = GameConfig {
            companion_chance: 1.0,
            puzzle_chance: 0.0,
            ..GameConfig::small()
        };
        let mut engine = GameEngine::with_seed(config, 14);
        let mut state = engine.reset();
        state.food = Some(Position::new(0, 0));

        let result = engine.step(&mut state);
        let line = result.info.companion.unwrap();
        assert!(COMPANION_LINES.contains(&line));
    }

    #[test]
    fn test_board_full_ends_game() {
        let mut engine = GameEngine::with_seed(quiet_config(), 15);
        // 3x1 board, snake of two facing the last free cell
        let snake = Snake {
            body: vec![Position::new(1, 0), Position::new(0, 0)],
            direction: Direction::Right,
            next_direction: Direction::Right,
        };
        let mut state = GameState::new(snake, Position::new(2, 0), 3, 1);

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert!(result.info.board_full);
        assert_eq!(state.food, None);
        assert_eq!(state.ending, Some(Ending::BoardFull));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_spawn_falls_back_to_free_cells() {
        let mut engine = GameEngine::with_seed(quiet_config(), 16);
        // Everything but (9, 9) is covered
        let body: Vec<Position> = (0..10)
            .flat_map(|y| (0..10).map(move |x| Position::new(x, y)))
            .filter(|p| *p != Position::new(9, 9))
            .collect();
        let snake = Snake {
            body,
            direction: Direction::Right,
            next_direction: Direction::Right,
        };
        let state = GameState::new(snake, Position::new(9, 9), 10, 10);

        for _ in 0..5 {
            assert_eq!(
                engine.spawn_food_avoid_snake(&state),
                Some(Position::new(9, 9))
            );
        }
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let run = |seed| {
            let mut engine = GameEngine::with_seed(GameConfig::default(), seed);
            let mut state = engine.reset();
            for _ in 0..8 {
                feed(&mut state);
                engine.step(&mut state);
            }
            state
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_random_walk_invariants() {
        let mut rng = StdRng::seed_from_u64(2024);
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        for seed in 0..20 {
            let mut engine = GameEngine::with_seed(quiet_config(), seed);
            let mut state = engine.reset();

            while state.is_alive() && state.steps < 300 {
                if rng.gen_bool(0.3) {
                    state.snake.request_turn(*directions.choose(&mut rng).unwrap());
                }
                let len_before = state.snake.len();
                let score_before = state.score;

                let result = engine.step(&mut state);
                if result.info.collision_type.is_some() {
                    break;
                }

                if result.info.ate_food {
                    assert_eq!(state.snake.len(), len_before + 1);
                    assert_eq!(state.score, score_before + 10);
                } else {
                    assert_eq!(state.snake.len(), len_before);
                    assert_eq!(state.score, score_before);
                }

                let distinct: HashSet<_> = state.snake.body.iter().collect();
                assert_eq!(distinct.len(), state.snake.len());
                assert_eq!(state.level, level_for_score(state.score, 50));
                assert_eq!(state.theme_index, theme_index(state.level));
            }
        }
    }
}
