use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::terminal::TerminalLine;

use super::GameStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsResult {
    Win,
    Lose,
    Tie,
}

impl RpsChoice {
    pub const ALL: [Self; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "rock" => Some(Self::Rock),
            "paper" => Some(Self::Paper),
            "scissors" => Some(Self::Scissors),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    const fn beats(self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }

    #[must_use]
    pub fn against(self, other: Self) -> RpsResult {
        if self == other {
            RpsResult::Tie
        } else if self.beats() == other {
            RpsResult::Win
        } else {
            RpsResult::Lose
        }
    }
}

/// Endless best-of-one rounds; only clearing the terminal leaves the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RpsGame;

impl RpsGame {
    pub(super) fn intro(self, out: &mut Vec<TerminalLine>) {
        out.push(TerminalLine::highlight("🪨 📄 ✂️ Rock Paper Scissors!"));
        out.push(TerminalLine::output("Type: rock, paper, or scissors"));
    }

    pub(super) fn handle<R: Rng + ?Sized>(
        self,
        input: &str,
        rng: &mut R,
        out: &mut Vec<TerminalLine>,
    ) -> GameStatus {
        let Some(player) = RpsChoice::parse(input) else {
            out.push(TerminalLine::error(
                "Invalid choice! Use: rock, paper, or scissors",
            ));
            return GameStatus::Continue;
        };
        let computer = RpsChoice::ALL[rng.gen_range(0..RpsChoice::ALL.len())];
        Self::report(player, computer, out);
        GameStatus::Continue
    }

    fn report(player: RpsChoice, computer: RpsChoice, out: &mut Vec<TerminalLine>) {
        out.push(TerminalLine::output(format!("You chose: {}", player.as_str())));
        out.push(TerminalLine::output(format!(
            "Computer chose: {}",
            computer.as_str()
        )));
        out.push(match player.against(computer) {
            RpsResult::Tie => TerminalLine::output("🤝 It's a tie!"),
            RpsResult::Win => TerminalLine::success("🎉 You win!"),
            RpsResult::Lose => TerminalLine::error("💻 Computer wins!"),
        });
        out.push(TerminalLine::output(
            "Play again? Type: rock, paper, or scissors",
        ));
    }
}
