//! Top-level terminal commands.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::games::GameKind;
use super::profile::TerminalProfile;
use super::TerminalLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Help,
    Clear,
    About,
    Social,
    Projects,
    Skills,
    Game,
    Theme,
    Date,
    Echo,
    Sudo,
    Neofetch,
    Banner,
}

impl Command {
    pub const ALL: [Self; 13] = [
        Self::Help,
        Self::Clear,
        Self::About,
        Self::Social,
        Self::Projects,
        Self::Skills,
        Self::Game,
        Self::Theme,
        Self::Date,
        Self::Echo,
        Self::Sudo,
        Self::Neofetch,
        Self::Banner,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Clear => "clear",
            Self::About => "about",
            Self::Social => "social",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Game => "game",
            Self::Theme => "theme",
            Self::Date => "date",
            Self::Echo => "echo",
            Self::Sudo => "sudo",
            Self::Neofetch => "neofetch",
            Self::Banner => "banner",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.token() == token)
    }

    /// Help text; `None` for commands left out of the help listing.
    const fn summary(self) -> Option<&'static str> {
        match self {
            Self::Help => Some("Show this help message"),
            Self::Clear => Some("Clear terminal screen"),
            Self::About => Some("About the owner"),
            Self::Social => Some("Social media links"),
            Self::Projects => Some("Projects list"),
            Self::Skills => Some("Technical skills"),
            Self::Theme => Some("Toggle dark/light mode"),
            Self::Date => Some("Show current date"),
            Self::Neofetch => Some("System information"),
            Self::Banner => Some("Show cool banner"),
            Self::Game | Self::Echo | Self::Sudo => None,
        }
    }
}

/// Resolved first token of a top-level input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Command(Command),
    Game(GameKind),
    Unknown(String),
}

impl Invocation {
    #[must_use]
    pub fn resolve(token: &str) -> Self {
        if let Some(cmd) = Command::from_token(token) {
            Self::Command(cmd)
        } else if let Some(kind) = GameKind::from_token(token) {
            Self::Game(kind)
        } else {
            Self::Unknown(token.to_string())
        }
    }
}

/// Print the output of every command except `clear`, which the terminal
/// handles itself because it resets the session.
pub(super) fn run(
    cmd: Command,
    args: &[&str],
    profile: &TerminalProfile,
    now: DateTime<Utc>,
    out: &mut Vec<TerminalLine>,
) {
    match cmd {
        Command::Help => help(out),
        Command::Clear => {}
        Command::About => {
            out.push(TerminalLine::highlight(format!(
                "🧑‍💻 About {}:",
                profile.owner
            )));
            out.extend(profile.about.iter().map(TerminalLine::output));
        }
        Command::Social => {
            out.push(TerminalLine::highlight("🌐 Social Links:"));
            out.extend(profile.social.iter().map(TerminalLine::output));
        }
        Command::Projects => {
            out.push(TerminalLine::highlight("🚀 My Projects:"));
            out.extend(profile.projects.iter().map(TerminalLine::output));
        }
        Command::Skills => {
            out.push(TerminalLine::highlight("💻 Technical Skills:"));
            out.extend(profile.skills.iter().map(TerminalLine::output));
        }
        Command::Game => games(out),
        Command::Theme => out.push(TerminalLine::success("Theme toggled!")),
        Command::Date => out.push(TerminalLine::output(
            now.format("%a %b %d %Y %H:%M:%S UTC").to_string(),
        )),
        Command::Echo => out.push(TerminalLine::output(args.join(" "))),
        Command::Sudo => out.push(TerminalLine::error(
            "Nice try! 😄 You need root privileges for that.",
        )),
        Command::Neofetch => {
            let info = &profile.neofetch;
            out.push(TerminalLine::highlight(info.title.clone()));
            out.push(TerminalLine::output("-".repeat(info.title.chars().count().max(19))));
            out.extend(
                info.facts
                    .iter()
                    .map(|(label, value)| TerminalLine::output(format!("{label}: {value}"))),
            );
        }
        Command::Banner => out.extend(profile.banner.iter().map(TerminalLine::highlight)),
    }
}

fn help(out: &mut Vec<TerminalLine>) {
    out.push(TerminalLine::output("Available commands:"));
    for cmd in Command::ALL {
        if let Some(summary) = cmd.summary() {
            out.push(TerminalLine::output(format!(
                "  {:<10}- {summary}",
                cmd.token()
            )));
        }
    }
    out.push(TerminalLine::output(""));
    out.push(TerminalLine::highlight(
        "🎮 Mini Games (type \"game\" or specific game name):",
    ));
    for kind in GameKind::ALL {
        out.push(TerminalLine::output(format!(
            "  {:<10}- {}",
            kind.token(),
            kind.description()
        )));
    }
}

fn games(out: &mut Vec<TerminalLine>) {
    out.push(TerminalLine::highlight("🎮 Available Mini Games:"));
    out.push(TerminalLine::output("Type the game name to start playing!"));
    for kind in GameKind::ALL {
        out.push(TerminalLine::output(format!(
            "• {:<9} - {}",
            kind.token(),
            kind.description()
        )));
    }
}
