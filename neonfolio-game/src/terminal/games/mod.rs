//! Mini-games playable from the terminal.
//!
//! Only four games carry real logic; the rest announce themselves and return
//! to the prompt without entering game mode.

mod guess;
mod maze;
mod quiz;
mod rps;

pub use guess::GuessGame;
pub use maze::MazeGame;
pub use quiz::{QUIZ_QUESTIONS, QuizGame, QuizQuestion};
pub use rps::{RpsChoice, RpsGame, RpsResult};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TerminalLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Guess,
    Rps,
    Quiz,
    Maze,
    Hangman,
    Dice,
    Wordle,
    Blackjack,
    Memory,
    Trivia,
    Typing,
}

impl GameKind {
    pub const ALL: [Self; 11] = [
        Self::Guess,
        Self::Rps,
        Self::Quiz,
        Self::Maze,
        Self::Hangman,
        Self::Dice,
        Self::Wordle,
        Self::Blackjack,
        Self::Memory,
        Self::Trivia,
        Self::Typing,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Guess => "guess",
            Self::Rps => "rps",
            Self::Quiz => "quiz",
            Self::Maze => "maze",
            Self::Hangman => "hangman",
            Self::Dice => "dice",
            Self::Wordle => "wordle",
            Self::Blackjack => "blackjack",
            Self::Memory => "memory",
            Self::Trivia => "trivia",
            Self::Typing => "typing",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.token() == token)
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Guess => "Number guessing game (1-100)",
            Self::Rps => "Rock Paper Scissors vs AI",
            Self::Quiz => "Programming quiz challenge",
            Self::Maze => "Text-based maze adventure",
            Self::Hangman => "Classic hangman word game",
            Self::Dice => "Dice rolling competition",
            Self::Wordle => "Word guessing game (5 letters)",
            Self::Blackjack => "Card game vs dealer",
            Self::Memory => "Memory card matching game",
            Self::Trivia => "Random trivia questions",
            Self::Typing => "Typing speed test",
        }
    }

    #[must_use]
    pub const fn is_playable(self) -> bool {
        matches!(self, Self::Guess | Self::Rps | Self::Quiz | Self::Maze)
    }

    const fn placeholder_title(self) -> &'static str {
        match self {
            Self::Hangman => "Hangman game",
            Self::Dice => "Dice game",
            Self::Wordle => "Wordle game",
            Self::Blackjack => "Blackjack game",
            Self::Memory => "Memory game",
            Self::Trivia => "Trivia game",
            Self::Typing => "Typing test",
            Self::Guess | Self::Rps | Self::Quiz | Self::Maze => "Game",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Continue,
    Finished,
}

/// State of whichever game currently owns the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveGame {
    Guess(GuessGame),
    Rps(RpsGame),
    Quiz(QuizGame),
    Maze(MazeGame),
}

impl ActiveGame {
    /// Print the game's intro. Placeholder games print a "coming soon" line
    /// and return `None`.
    pub fn start<R: Rng + ?Sized>(
        kind: GameKind,
        rng: &mut R,
        out: &mut Vec<TerminalLine>,
    ) -> Option<Self> {
        let game = match kind {
            GameKind::Guess => Self::Guess(GuessGame::new(rng)),
            GameKind::Rps => Self::Rps(RpsGame),
            GameKind::Quiz => Self::Quiz(QuizGame::new()),
            GameKind::Maze => Self::Maze(MazeGame),
            _ => {
                out.push(TerminalLine::output(format!(
                    "🚧 {} coming soon!",
                    kind.placeholder_title()
                )));
                return None;
            }
        };
        game.intro(out);
        Some(game)
    }

    #[must_use]
    pub const fn kind(&self) -> GameKind {
        match self {
            Self::Guess(_) => GameKind::Guess,
            Self::Rps(_) => GameKind::Rps,
            Self::Quiz(_) => GameKind::Quiz,
            Self::Maze(_) => GameKind::Maze,
        }
    }

    fn intro(&self, out: &mut Vec<TerminalLine>) {
        match self {
            Self::Guess(game) => game.intro(out),
            Self::Rps(game) => game.intro(out),
            Self::Quiz(game) => game.intro(out),
            Self::Maze(game) => game.intro(out),
        }
    }

    /// Feed one trimmed, lower-cased input line to the game.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        input: &str,
        rng: &mut R,
        out: &mut Vec<TerminalLine>,
    ) -> GameStatus {
        match self {
            Self::Guess(game) => game.handle(input, out),
            Self::Rps(game) => game.handle(input, rng, out),
            Self::Quiz(game) => game.handle(input, out),
            Self::Maze(game) => game.handle(input, rng, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn tokens_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_token(kind.token()), Some(kind));
        }
        assert_eq!(GameKind::from_token("chess"), None);
    }

    #[test]
    fn placeholders_do_not_start() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for kind in GameKind::ALL.into_iter().filter(|k| !k.is_playable()) {
            let mut out = Vec::new();
            assert!(ActiveGame::start(kind, &mut rng, &mut out).is_none());
            assert_eq!(out.len(), 1);
            assert!(out[0].text.contains("coming soon"));
        }
    }

    #[test]
    fn playable_games_start_with_intro() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for kind in GameKind::ALL.into_iter().filter(|k| k.is_playable()) {
            let mut out = Vec::new();
            let game = ActiveGame::start(kind, &mut rng, &mut out).expect("playable");
            assert_eq!(game.kind(), kind);
            assert!(!out.is_empty());
        }
    }
}
