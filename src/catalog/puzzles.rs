/// A trivia question that rewards the player with extra length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Puzzle {
    pub id: u32,
    pub title: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
    /// Human readable reward, e.g. "Taille +2"
    pub reward: &'static str,
}

impl Puzzle {
    /// Trimmed, case-insensitive comparison against the stored answer
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.trim().to_uppercase() == self.answer.to_uppercase()
    }

    /// Number of segments granted, read from the first run of digits in the
    /// reward text. A reward without digits grants nothing.
    pub fn reward_amount(&self) -> usize {
        self.reward
            .split(|c: char| !c.is_ascii_digit())
            .find(|run| !run.is_empty())
            .and_then(|run| run.parse().ok())
            .unwrap_or(0)
    }
}

pub const PUZZLES: [Puzzle; 3] = [
    Puzzle {
        id: 1,
        title: "Puzzle Mathématique",
        question: "Quel est le résultat de 7 + 5 ?",
        answer: "12",
        reward: "Taille +1",
    },
    Puzzle {
        id: 2,
        title: "Puzzle Logique",
        question: "Quelle est la lettre suivante : A, C, E, G, ?",
        answer: "I",
        reward: "Taille +2",
    },
    Puzzle {
        id: 3,
        title: "Puzzle Séquence",
        question: "Quel nombre complète : 2, 4, 8, 16, ?",
        answer: "32",
        reward: "Taille +3",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_amounts() {
        let amounts: Vec<usize> = PUZZLES.iter().map(Puzzle::reward_amount).collect();
        assert_eq!(amounts, vec![1, 2, 3]);
    }

    #[test]
    fn test_reward_without_digits() {
        let puzzle = Puzzle {
            reward: "Bonus",
            ..PUZZLES[0]
        };
        assert_eq!(puzzle.reward_amount(), 0);
    }

    #[test]
    fn test_reward_takes_first_number() {
        let puzzle = Puzzle {
            reward: "Taille +12 (x2)",
            ..PUZZLES[0]
        };
        assert_eq!(puzzle.reward_amount(), 12);
    }

    #[test]
    fn test_answer_matching() {
        let letters = &PUZZLES[1];
        assert!(letters.is_correct("I"));
        assert!(letters.is_correct("  i \n"));
        assert!(!letters.is_correct("J"));
        assert!(!letters.is_correct(""));

        let numbers = &PUZZLES[2];
        assert!(numbers.is_correct("32"));
        assert!(!numbers.is_correct("3 2"));
    }
}
