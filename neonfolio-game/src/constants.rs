//! Centralized tuning constants for Neonfolio progress logic.
//!
//! XP awards, the level curve, streak bonuses and storage keys.

// XP awards ----------------------------------------------------------------
pub(crate) const XP_VISIT: u64 = 10;
pub(crate) const XP_TERMINAL: u64 = 15;
pub(crate) const XP_GAME: u64 = 25;
pub(crate) const XP_SOCIAL: u64 = 30;

// Level curve --------------------------------------------------------------
pub(crate) const LEVEL_BASE_XP: f64 = 100.0;
pub(crate) const LEVEL_GROWTH: f64 = 1.5;

// Visit streaks ------------------------------------------------------------
pub(crate) const STREAK_BONUS_INTERVAL: u32 = 5;
pub(crate) const STREAK_BONUS_XP: u64 = 25;

// Dashboard ----------------------------------------------------------------
pub(crate) const RECENT_ACHIEVEMENTS: usize = 3;

// Leaderboard --------------------------------------------------------------
pub const CURRENT_USER_ID: &str = "current_user";
pub(crate) const CURRENT_USER_NAME: &str = "You";
pub(crate) const CURRENT_USER_COUNTRY: &str = "ID";
pub(crate) const CURRENT_USER_AVATAR: &str = "⭐";
pub(crate) const SIMULATED_GAIN_CHANCE: f64 = 0.3;
pub(crate) const SIMULATED_GAIN_MIN: u64 = 10;
pub(crate) const SIMULATED_GAIN_MAX: u64 = 59;
pub(crate) const SIMULATED_XP_PER_LEVEL: u64 = 100;

// Terminal games -----------------------------------------------------------
pub(crate) const GUESS_MIN: u32 = 1;
pub(crate) const GUESS_MAX: u32 = 100;
pub(crate) const MAZE_TREASURE_CHANCE: f64 = 0.3;

// Storage keys -------------------------------------------------------------
pub const KEY_PROGRESS: &str = "neonfolio.progress";
pub const KEY_ACHIEVEMENTS: &str = "neonfolio.achievements";
pub const KEY_LEADERBOARD: &str = "neonfolio.leaderboard";
pub const KEY_STREAK: &str = "neonfolio.streak";
pub const KEY_FIRST_VISIT: &str = "neonfolio.first_visit";
pub const KEY_ACTION_COUNTS: &str = "neonfolio.action_counts";
