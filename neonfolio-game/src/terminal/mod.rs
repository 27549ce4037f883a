//! Line-oriented toy terminal with a nested mini-game mode.
//!
//! The terminal owns its transcript and the active game. It knows nothing
//! about XP: anything reward-worthy is reported as a [`TerminalEvent`] for
//! the host to route.

pub mod commands;
pub mod games;
pub mod profile;

pub use commands::{Command, Invocation};
pub use games::{ActiveGame, GameKind, GameStatus};
pub use profile::{NeofetchInfo, TerminalProfile};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::action::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Command,
    Output,
    Highlight,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalLine {
    pub kind: LineKind,
    pub text: String,
}

impl TerminalLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self::new(LineKind::Output, text)
    }

    pub fn highlight(text: impl Into<String>) -> Self {
        Self::new(LineKind::Highlight, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }
}

/// Something the host may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum TerminalEvent {
    ActionCompleted(ActionKind),
    GameStarted(GameKind),
    GameFinished(GameKind),
    ThemeToggled,
    Cleared,
}

/// Transcript plus the game currently capturing input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalSession {
    lines: Vec<TerminalLine>,
    pub(crate) active_game: Option<ActiveGame>,
}

impl TerminalSession {
    #[must_use]
    pub fn lines(&self) -> &[TerminalLine] {
        &self.lines
    }

    #[must_use]
    pub fn active_game(&self) -> Option<GameKind> {
        self.active_game.as_ref().map(ActiveGame::kind)
    }
}

/// What one submitted line produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Lines appended to the transcript by this submission.
    pub lines: Vec<TerminalLine>,
    pub events: Vec<TerminalEvent>,
    /// The transcript was wiped before `lines` were appended.
    pub cleared: bool,
}

#[derive(Debug, Clone)]
pub struct CommandTerminal {
    profile: TerminalProfile,
    session: TerminalSession,
    rng: ChaCha20Rng,
}

impl CommandTerminal {
    #[must_use]
    pub fn new(profile: TerminalProfile, seed: u64) -> Self {
        Self {
            profile,
            session: TerminalSession::default(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn with_default_profile(seed: u64) -> Self {
        Self::new(TerminalProfile::default(), seed)
    }

    #[must_use]
    pub const fn session(&self) -> &TerminalSession {
        &self.session
    }

    #[must_use]
    pub const fn profile(&self) -> &TerminalProfile {
        &self.profile
    }

    #[must_use]
    pub fn active_game(&self) -> Option<GameKind> {
        self.session.active_game()
    }

    /// Process one input line.
    pub fn submit(&mut self, raw: &str, now: DateTime<Utc>) -> Response {
        let mut response = Response::default();
        let mut out = vec![TerminalLine::new(
            LineKind::Command,
            format!("{} {raw}", self.profile.prompt),
        )];

        let line = raw.trim().to_lowercase();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = tokens.split_first() else {
            self.append(out, &mut response);
            return response;
        };

        if head != Command::Help.token() && head != Command::Clear.token() {
            response
                .events
                .push(TerminalEvent::ActionCompleted(ActionKind::Terminal));
        }

        if head == Command::Clear.token() {
            self.clear(out, &mut response);
            return response;
        }

        if let Some(game) = self.session.active_game.as_mut() {
            let kind = game.kind();
            if game.handle(&line, &mut self.rng, &mut out) == GameStatus::Finished {
                self.session.active_game = None;
                response.events.push(TerminalEvent::GameFinished(kind));
            }
            self.append(out, &mut response);
            return response;
        }

        match Invocation::resolve(head) {
            Invocation::Command(cmd) => {
                commands::run(cmd, args, &self.profile, now, &mut out);
                if cmd == Command::Theme {
                    response.events.push(TerminalEvent::ThemeToggled);
                }
            }
            Invocation::Game(kind) => {
                if let Some(game) = ActiveGame::start(kind, &mut self.rng, &mut out) {
                    self.session.active_game = Some(game);
                    response.events.push(TerminalEvent::GameStarted(kind));
                }
                response
                    .events
                    .insert(0, TerminalEvent::ActionCompleted(ActionKind::Game));
            }
            Invocation::Unknown(token) => out.push(TerminalLine::error(format!(
                "Command not found: {token}. Type 'help' for available commands."
            ))),
        }

        self.append(out, &mut response);
        response
    }

    /// Wipe the transcript and leave any game. Progress lives elsewhere and
    /// is untouched. The fresh transcript starts with the echoed prompt.
    fn clear(&mut self, mut out: Vec<TerminalLine>, response: &mut Response) {
        self.session.lines.clear();
        self.session.active_game = None;
        response.cleared = true;
        response.events.push(TerminalEvent::Cleared);
        out.push(TerminalLine::output(
            "Terminal cleared. Type \"help\" for commands.",
        ));
        self.append(out, response);
    }

    fn append(&mut self, lines: Vec<TerminalLine>, response: &mut Response) {
        self.session.lines.extend(lines.iter().cloned());
        response.lines.extend(lines);
    }
}
