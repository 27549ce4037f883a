use crate::terminal::TerminalLine;

use super::GameStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; 3],
    /// Correct option letter, upper-case.
    pub answer: char,
}

pub const QUIZ_QUESTIONS: [QuizQuestion; 3] = [
    QuizQuestion {
        prompt: "What does HTML stand for?",
        options: [
            "A) Hyper Text Markup Language",
            "B) High Tech Modern Language",
            "C) Hyper Transfer Markup Language",
        ],
        answer: 'A',
    },
    QuizQuestion {
        prompt: "Which language runs in a web browser?",
        options: ["A) Python", "B) JavaScript", "C) C++"],
        answer: 'B',
    },
    QuizQuestion {
        prompt: "What is the latest version of HTML?",
        options: ["A) HTML4", "B) XHTML", "C) HTML5"],
        answer: 'C',
    },
];

const OPTION_LETTERS: [char; 3] = ['A', 'B', 'C'];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizGame {
    current: usize,
    score: u32,
}

impl QuizGame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    pub(super) fn intro(&self, out: &mut Vec<TerminalLine>) {
        self.show_question(out);
    }

    fn show_question(&self, out: &mut Vec<TerminalLine>) {
        let Some(question) = QUIZ_QUESTIONS.get(self.current) else {
            return;
        };
        out.push(TerminalLine::highlight(format!(
            "Question {}: {}",
            self.current + 1,
            question.prompt
        )));
        out.extend(question.options.iter().map(|opt| TerminalLine::output(*opt)));
    }

    /// Anything other than a single option letter is rejected without
    /// advancing.
    pub(super) fn handle(&mut self, input: &str, out: &mut Vec<TerminalLine>) -> GameStatus {
        let Some(question) = QUIZ_QUESTIONS.get(self.current) else {
            return GameStatus::Finished;
        };
        let mut chars = input.chars().map(|c| c.to_ascii_uppercase());
        let letter = match (chars.next(), chars.next()) {
            (Some(letter), None) if OPTION_LETTERS.contains(&letter) => letter,
            _ => {
                out.push(TerminalLine::error("Answer with A, B or C"));
                return GameStatus::Continue;
            }
        };

        if letter == question.answer {
            self.score += 1;
            out.push(TerminalLine::success("✅ Correct!"));
        } else {
            out.push(TerminalLine::error(format!(
                "❌ Wrong! Correct answer was {}",
                question.answer
            )));
        }

        self.current += 1;
        if self.current < QUIZ_QUESTIONS.len() {
            self.show_question(out);
            GameStatus::Continue
        } else {
            out.push(TerminalLine::highlight(format!(
                "🎯 Quiz completed! Score: {}/{}",
                self.score,
                QUIZ_QUESTIONS.len()
            )));
            GameStatus::Finished
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(answers: &[&str]) -> (QuizGame, Vec<TerminalLine>, GameStatus) {
        let mut game = QuizGame::new();
        let mut out = Vec::new();
        let mut status = GameStatus::Continue;
        for answer in answers {
            status = game.handle(answer, &mut out);
        }
        (game, out, status)
    }

    #[test]
    fn perfect_run_scores_three() {
        let (game, out, status) = play(&["a", "b", "c"]);
        assert_eq!(status, GameStatus::Finished);
        assert_eq!(game.score(), 3);
        assert_eq!(
            out.last().map(|l| l.text.as_str()),
            Some("🎯 Quiz completed! Score: 3/3")
        );
    }

    #[test]
    fn wrong_answers_still_advance() {
        let (game, out, status) = play(&["c", "b", "a"]);
        assert_eq!(status, GameStatus::Finished);
        assert_eq!(game.score(), 1);
        assert!(out.iter().any(|l| l.text == "❌ Wrong! Correct answer was A"));
    }

    #[test]
    fn invalid_letter_keeps_question() {
        let (game, out, status) = play(&["d", "maybe"]);
        assert_eq!(status, GameStatus::Continue);
        assert_eq!(game.current, 0);
        assert_eq!(out.len(), 2);
    }
}
