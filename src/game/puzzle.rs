use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{PUZZLES, Puzzle};

/// Outcome of answering the active puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Correct answer; the snake grows by `reward` segments
    Solved { reward: usize },
    /// Wrong answer; the puzzle stays open
    Wrong,
}

/// The puzzle currently offered to the player, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PuzzleSlot {
    active: Option<&'static Puzzle>,
}

impl PuzzleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A puzzle is waiting for an answer; no other puzzle may open meanwhile
    pub fn is_pending(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&'static Puzzle> {
        self.active
    }

    /// Open a puzzle picked uniformly from the catalog. Does nothing and
    /// returns `None` while another puzzle is pending.
    pub fn open<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&'static Puzzle> {
        if self.is_pending() {
            return None;
        }
        let puzzle = PUZZLES.choose(rng)?;
        self.active = Some(puzzle);
        Some(puzzle)
    }

    /// Check an answer. Returns `None` when no puzzle is open.
    pub fn submit(&mut self, answer: &str) -> Option<Verdict> {
        let puzzle = self.active?;
        if puzzle.is_correct(answer) {
            self.active = None;
            Some(Verdict::Solved {
                reward: puzzle.reward_amount(),
            })
        } else {
            Some(Verdict::Wrong)
        }
    }

    /// Dismiss the open puzzle without a reward
    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    #[cfg(test)]
    pub(crate) fn force(&mut self, puzzle: &'static Puzzle) {
        self.active = Some(puzzle);
    }
}
