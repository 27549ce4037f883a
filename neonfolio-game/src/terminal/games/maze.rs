use rand::Rng;

use crate::constants::MAZE_TREASURE_CHANCE;
use crate::terminal::TerminalLine;

use super::GameStatus;

const DIRECTIONS: [&str; 4] = ["north", "south", "east", "west"];

/// No spatial state: every valid move is a treasure roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MazeGame;

impl MazeGame {
    pub(super) fn intro(self, out: &mut Vec<TerminalLine>) {
        out.push(TerminalLine::highlight("🧩 Maze Adventure!"));
        out.push(TerminalLine::output(
            "Navigate through the maze using: north, south, east, west",
        ));
        out.push(TerminalLine::output("Find the treasure to win!"));
        out.push(TerminalLine::output(""));
        out.push(TerminalLine::output("You are in a dark room. Exits: north, east"));
    }

    pub(super) fn handle<R: Rng + ?Sized>(
        self,
        input: &str,
        rng: &mut R,
        out: &mut Vec<TerminalLine>,
    ) -> GameStatus {
        if !DIRECTIONS.contains(&input) {
            out.push(TerminalLine::error(
                "Invalid direction! Use: north, south, east, west",
            ));
            return GameStatus::Continue;
        }

        if rng.gen_bool(MAZE_TREASURE_CHANCE) {
            out.push(TerminalLine::success("🎉 You found the treasure! You win!"));
            GameStatus::Finished
        } else {
            out.push(TerminalLine::output(format!(
                "You moved {input}. The maze continues..."
            )));
            out.push(TerminalLine::output("Exits: north, south, east, west"));
            GameStatus::Continue
        }
    }
}
