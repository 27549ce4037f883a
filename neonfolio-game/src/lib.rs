//! Neonfolio Game Core
//!
//! Platform-agnostic gamification core for the Neonfolio portfolio site:
//! XP and levels with a daily reward cooldown, achievements, visit streaks,
//! a simulated leaderboard and a toy command terminal with mini-games.
//! Rendering and storage belong to the host; this crate only needs a
//! [`ProfileStorage`] to persist its JSON blobs.

pub mod achievements;
pub mod action;
pub mod constants;
pub mod flight;
pub mod goals;
pub mod leaderboard;
pub mod numbers;
pub mod persist;
pub mod portfolio;
pub mod progress;
pub mod streak;
pub mod terminal;

// Re-export commonly used types
pub use achievements::{
    AchievementDefinition, AchievementEngine, AchievementId, AchievementRecord, DEFINITIONS,
    EvaluationContext, UnknownAchievement, Unlock, UnlockRule, Unlocks,
};
pub use action::{ActionCounts, ActionKind, UnknownAction};
pub use flight::{FlightGuard, SingleFlight};
pub use goals::{DailyGoal, daily_goals};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardWindow, country_flag};
pub use persist::{MemoryStorage, ProfileStorage};
pub use portfolio::{
    ActionReport, Dashboard, LineReport, Portfolio, RecentAchievement, SessionStart, ShareReport,
};
pub use progress::{Outcome, ProgressState, ProgressTracker, cumulative_xp, xp_threshold};
pub use streak::{StreakChange, StreakUpdate, VisitStreak};
pub use terminal::{
    ActiveGame, Command, CommandTerminal, GameKind, GameStatus, Invocation, LineKind,
    NeofetchInfo, Response, TerminalEvent, TerminalLine, TerminalProfile, TerminalSession,
};
