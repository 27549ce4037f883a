//! XP, levels and the once-per-day reward rule.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::ActionKind;
use crate::constants::{KEY_PROGRESS, LEVEL_BASE_XP, LEVEL_GROWTH};
use crate::numbers::{floor_f64_to_u64, level_exponent, u64_to_f64};
use crate::persist::{self, ProfileStorage};

/// XP required to clear `level`: `floor(100 * 1.5^level)`.
#[must_use]
pub fn xp_threshold(level: u32) -> u64 {
    floor_f64_to_u64(LEVEL_BASE_XP * LEVEL_GROWTH.powi(level_exponent(level))).max(1)
}

/// Sum of every threshold below `level`, saturating at `u64::MAX`.
#[must_use]
pub fn cumulative_xp(level: u32) -> u64 {
    let mut total = 0u64;
    for lvl in 0..level {
        total = total.saturating_add(xp_threshold(lvl));
        // The curve saturates within a few hundred levels.
        if total == u64::MAX {
            break;
        }
    }
    total
}

/// Persisted progress blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub current_xp: u64,
    #[serde(default = "default_threshold")]
    pub xp_to_next_level: u64,
    #[serde(default)]
    pub level: u32,
    /// Day each action was last rewarded.
    #[serde(default)]
    pub daily_action_log: BTreeMap<ActionKind, NaiveDate>,
    #[serde(default)]
    pub last_reset_day: Option<NaiveDate>,
}

fn default_threshold() -> u64 {
    xp_threshold(0)
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            current_xp: 0,
            xp_to_next_level: default_threshold(),
            level: 0,
            daily_action_log: BTreeMap::new(),
            last_reset_day: None,
        }
    }
}

/// Result of [`ProgressTracker::record_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Awarded { points: u64, level_ups: u32 },
    AlreadyClaimedToday,
}

impl Outcome {
    #[must_use]
    pub const fn level_ups(self) -> u32 {
        match self {
            Self::Awarded { level_ups, .. } => level_ups,
            Self::AlreadyClaimedToday => 0,
        }
    }

    #[must_use]
    pub const fn is_awarded(self) -> bool {
        matches!(self, Self::Awarded { .. })
    }
}

/// Owns a [`ProgressState`] and applies every XP mutation to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    state: ProgressState,
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a previously saved state, restoring the XP invariant if the
    /// blob was hand-edited or written by an older curve.
    #[must_use]
    pub fn from_state(mut state: ProgressState) -> Self {
        let expected = xp_threshold(state.level);
        if state.xp_to_next_level != expected {
            log::warn!(
                "progress threshold {} does not match level {} curve, using {expected}",
                state.xp_to_next_level,
                state.level
            );
            state.xp_to_next_level = expected;
        }
        let mut tracker = Self { state };
        tracker.carry_levels();
        tracker
    }

    /// Load from storage; absent or malformed blobs start fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn load<S: ProfileStorage + ?Sized>(storage: &S) -> Result<Self, S::Error> {
        let state: ProgressState = persist::load_or_default(storage, KEY_PROGRESS)?;
        Ok(Self::from_state(state))
    }

    /// Write the full state through to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage rejects the write.
    pub fn persist<S: ProfileStorage + ?Sized>(&self, storage: &S) -> Result<(), S::Error> {
        persist::save(storage, KEY_PROGRESS, &self.state)
    }

    #[must_use]
    pub const fn state(&self) -> &ProgressState {
        &self.state
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.state.level
    }

    /// Clear the daily log when the calendar day changed. Returns whether a
    /// reset happened.
    pub fn day_rollover(&mut self, today: NaiveDate) -> bool {
        if self.state.last_reset_day == Some(today) {
            return false;
        }
        self.state.daily_action_log.clear();
        self.state.last_reset_day = Some(today);
        log::debug!("daily action log reset for {today}");
        true
    }

    #[must_use]
    pub fn claimed_today(&self, action: ActionKind, today: NaiveDate) -> bool {
        self.state.daily_action_log.get(&action) == Some(&today)
    }

    /// Award the action's XP unless it was already rewarded today.
    pub fn record_action(&mut self, action: ActionKind, today: NaiveDate) -> Outcome {
        if self.claimed_today(action, today) {
            log::debug!("{action} already rewarded on {today}");
            return Outcome::AlreadyClaimedToday;
        }
        let points = action.xp();
        self.state.daily_action_log.insert(action, today);
        let level_ups = self.credit(points);
        Outcome::Awarded { points, level_ups }
    }

    /// Add XP without consulting the daily log. Returns levels gained.
    pub fn credit(&mut self, points: u64) -> u32 {
        self.state.current_xp = self.state.current_xp.saturating_add(points);
        let level_ups = self.carry_levels();
        if level_ups > 0 {
            log::info!(
                "level up x{level_ups}: now level {} ({}/{} XP)",
                self.state.level,
                self.state.current_xp,
                self.state.xp_to_next_level
            );
        }
        level_ups
    }

    fn carry_levels(&mut self) -> u32 {
        let mut level_ups = 0;
        while self.state.current_xp >= self.state.xp_to_next_level {
            self.state.current_xp -= self.state.xp_to_next_level;
            self.state.level = self.state.level.saturating_add(1);
            self.state.xp_to_next_level = xp_threshold(self.state.level);
            level_ups += 1;
        }
        level_ups
    }

    /// Lifetime XP reconstructed from the level and the carried remainder.
    #[must_use]
    pub fn total_xp_earned(&self) -> u64 {
        cumulative_xp(self.state.level).saturating_add(self.state.current_xp)
    }

    /// Fill ratio of the current level bar in `[0, 1)`.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        u64_to_f64(self.state.current_xp) / u64_to_f64(self.state.xp_to_next_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn threshold_curve_matches_floor_formula() {
        let curve: Vec<u64> = (0..6).map(xp_threshold).collect();
        assert_eq!(curve, vec![100, 150, 225, 337, 506, 759]);
    }

    #[test]
    fn fresh_game_award() {
        let mut tracker = ProgressTracker::new();
        tracker.day_rollover(day(1));
        let outcome = tracker.record_action(ActionKind::Game, day(1));
        assert_eq!(
            outcome,
            Outcome::Awarded {
                points: 25,
                level_ups: 0
            }
        );
        assert_eq!(tracker.state().current_xp, 25);
        assert_eq!(tracker.state().xp_to_next_level, 100);
    }

    #[test]
    fn carry_over_on_level_up() {
        let mut tracker = ProgressTracker::from_state(ProgressState {
            current_xp: 95,
            ..ProgressState::default()
        });
        let outcome = tracker.record_action(ActionKind::Game, day(1));
        assert_eq!(outcome.level_ups(), 1);
        assert_eq!(tracker.state().current_xp, 20);
        assert_eq!(tracker.level(), 1);
        assert_eq!(tracker.state().xp_to_next_level, 150);
    }

    #[test]
    fn second_claim_same_day_is_noop() {
        let mut tracker = ProgressTracker::new();
        tracker.day_rollover(day(2));
        assert!(tracker.record_action(ActionKind::Visit, day(2)).is_awarded());
        let before = tracker.state().clone();
        for _ in 0..3 {
            assert_eq!(
                tracker.record_action(ActionKind::Visit, day(2)),
                Outcome::AlreadyClaimedToday
            );
        }
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn rollover_clears_log_once_per_day() {
        let mut tracker = ProgressTracker::new();
        assert!(tracker.day_rollover(day(3)));
        tracker.record_action(ActionKind::Social, day(3));
        assert!(!tracker.day_rollover(day(3)));
        assert!(tracker.claimed_today(ActionKind::Social, day(3)));
        assert!(tracker.day_rollover(day(4)));
        assert!(tracker.state().daily_action_log.is_empty());
        assert!(tracker.record_action(ActionKind::Social, day(4)).is_awarded());
    }

    #[test]
    fn large_credit_matches_sequential_credits() {
        let mut bulk = ProgressTracker::new();
        let bulk_ups = bulk.credit(1_000);

        let mut stepped = ProgressTracker::new();
        let stepped_ups: u32 = (0..40).map(|_| stepped.credit(25)).sum();

        assert_eq!(bulk, stepped);
        assert_eq!(bulk_ups, stepped_ups);
        // 100 + 150 + 225 + 337 = 812, remainder 188 < 506
        assert_eq!(bulk.level(), 4);
        assert_eq!(bulk.state().current_xp, 188);
        assert_eq!(bulk.total_xp_earned(), 1_000);
    }

    #[test]
    fn invariant_holds_after_every_award() {
        let mut tracker = ProgressTracker::new();
        for offset in 0..30 {
            let today = day(1) + chrono::Days::new(offset);
            tracker.day_rollover(today);
            for action in ActionKind::ALL {
                tracker.record_action(action, today);
                let state = tracker.state();
                assert!(state.current_xp < state.xp_to_next_level);
            }
        }
        assert_eq!(tracker.total_xp_earned(), 30 * 80);
    }

    #[test]
    fn load_repairs_out_of_range_blob() {
        let tracker = ProgressTracker::from_state(ProgressState {
            current_xp: 260,
            xp_to_next_level: 2_000,
            level: 0,
            ..ProgressState::default()
        });
        assert_eq!(tracker.level(), 2);
        assert_eq!(tracker.state().current_xp, 10);
        assert_eq!(tracker.state().xp_to_next_level, 225);
    }

    #[test]
    fn huge_saved_level_loads_with_saturated_totals() {
        assert_eq!(cumulative_xp(u32::MAX), u64::MAX);

        let storage = crate::persist::MemoryStorage::new();
        storage
            .save_blob(KEY_PROGRESS, r#"{"level":4000000000}"#)
            .unwrap();
        let mut tracker = ProgressTracker::load(&storage).unwrap();
        assert_eq!(tracker.level(), 4_000_000_000);
        assert_eq!(tracker.state().xp_to_next_level, u64::MAX);
        assert_eq!(tracker.total_xp_earned(), u64::MAX);
        assert!(tracker.record_action(ActionKind::Game, day(1)).is_awarded());
        assert_eq!(tracker.level(), 4_000_000_000);
    }

    #[test]
    fn state_blob_uses_iso_days() {
        let mut tracker = ProgressTracker::new();
        tracker.day_rollover(day(5));
        tracker.record_action(ActionKind::Terminal, day(5));
        let json = serde_json::to_value(tracker.state()).unwrap();
        assert_eq!(json["daily_action_log"]["terminal"], "2024-03-05");
        assert_eq!(json["last_reset_day"], "2024-03-05");
    }
}
