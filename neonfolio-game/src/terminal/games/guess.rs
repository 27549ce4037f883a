use rand::Rng;
use std::cmp::Ordering;

use crate::constants::{GUESS_MAX, GUESS_MIN};
use crate::terminal::TerminalLine;

use super::GameStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessGame {
    target: u32,
    attempts: u32,
}

impl GuessGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_target(rng.gen_range(GUESS_MIN..=GUESS_MAX))
    }

    #[must_use]
    pub const fn with_target(target: u32) -> Self {
        Self {
            target,
            attempts: 0,
        }
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    pub(super) fn intro(&self, out: &mut Vec<TerminalLine>) {
        out.push(TerminalLine::highlight("🎯 Number Guessing Game Started!"));
        out.push(TerminalLine::output(format!(
            "I'm thinking of a number between {GUESS_MIN} and {GUESS_MAX}."
        )));
        out.push(TerminalLine::output("Can you guess it?"));
    }

    /// Non-numeric input is rejected without spending an attempt.
    pub(super) fn handle(&mut self, input: &str, out: &mut Vec<TerminalLine>) -> GameStatus {
        let Some(guess) = input
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<i64>().ok())
        else {
            out.push(TerminalLine::error("Please enter a valid number!"));
            return GameStatus::Continue;
        };
        self.attempts += 1;

        match guess.cmp(&i64::from(self.target)) {
            Ordering::Equal => {
                out.push(TerminalLine::success(format!(
                    "🎉 Correct! The number was {}",
                    self.target
                )));
                out.push(TerminalLine::success(format!(
                    "You guessed it in {} attempts!",
                    self.attempts
                )));
                GameStatus::Finished
            }
            Ordering::Less => {
                out.push(TerminalLine::output("📈 Too low! Try a higher number."));
                GameStatus::Continue
            }
            Ordering::Greater => {
                out.push(TerminalLine::output("📉 Too high! Try a lower number."));
                GameStatus::Continue
            }
        }
    }
}
