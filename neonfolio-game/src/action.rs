//! Rewardable actions and their lifetime counters.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{XP_GAME, XP_SOCIAL, XP_TERMINAL, XP_VISIT};

/// User actions that earn XP once per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Visit,
    Terminal,
    Game,
    Social,
}

impl ActionKind {
    pub const ALL: [Self; 4] = [Self::Visit, Self::Terminal, Self::Game, Self::Social];

    /// Fixed XP award for this action.
    #[must_use]
    pub const fn xp(self) -> u64 {
        match self {
            Self::Visit => XP_VISIT,
            Self::Terminal => XP_TERMINAL,
            Self::Game => XP_GAME,
            Self::Social => XP_SOCIAL,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visit => "visit",
            Self::Terminal => "terminal",
            Self::Game => "game",
            Self::Social => "social",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action `{0}` (expected visit, terminal, game or social)")]
pub struct UnknownAction(pub String);

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visit" => Ok(Self::Visit),
            "terminal" => Ok(Self::Terminal),
            "game" => Ok(Self::Game),
            "social" => Ok(Self::Social),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Lifetime number of times each action was performed, rewarded or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionCounts {
    counts: BTreeMap<ActionKind, u32>,
}

impl ActionCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the counter for `action`, returning the new total.
    pub fn increment(&mut self, action: ActionKind) -> u32 {
        let slot = self.counts.entry(action).or_insert(0);
        *slot = slot.saturating_add(1);
        *slot
    }

    #[must_use]
    pub fn get(&self, action: ActionKind) -> u32 {
        self.counts.get(&action).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.values().fold(0, |acc, n| acc.saturating_add(*n))
    }
}
