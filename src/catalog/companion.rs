/// Lines the companion drops at random while playing
pub const COMPANION_LINES: [&str; 10] = [
    "Salut ! Je suis ton compagnon IA. Bonne chance !",
    "Excellent mouvement ! Continue comme ça !",
    "Attention au mur !",
    "Tu t'améliores !",
    "Niveau suivant bientôt !",
    "Super score !",
    "Évite de te mordre la queue !",
    "Tu es sur la bonne voie !",
    "N'oublie pas les mini-puzzles !",
    "La musique s'adapte à ton jeu !",
];

pub const GREETING: &str = COMPANION_LINES[0];
pub const PUZZLE_SOLVED: &str = "Bravo ! Puzzle résolu !";
pub const PUZZLE_WRONG: &str = "Mauvaise réponse, réessaye !";
