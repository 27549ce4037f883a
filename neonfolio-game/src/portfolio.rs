//! The host that wires progress, achievements, streaks, the leaderboard and
//! the terminal together over one [`ProfileStorage`].
//!
//! Every mutation is written through to storage before the call returns.

use chrono::{DateTime, NaiveDate, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::action::{ActionCounts, ActionKind};
use crate::achievements::{
    AchievementEngine, AchievementId, DEFINITIONS, EvaluationContext, Unlock, Unlocks,
};
use crate::constants::{
    CURRENT_USER_ID, KEY_ACTION_COUNTS, KEY_FIRST_VISIT, KEY_STREAK, RECENT_ACHIEVEMENTS,
};
use crate::flight::SingleFlight;
use crate::goals::{DailyGoal, daily_goals};
use crate::leaderboard::Leaderboard;
use crate::persist::{self, ProfileStorage};
use crate::progress::{Outcome, ProgressTracker};
use crate::streak::{StreakUpdate, VisitStreak};
use crate::terminal::{CommandTerminal, Response, TerminalEvent, TerminalProfile};

/// Result of one recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub action: ActionKind,
    pub outcome: Outcome,
    pub unlocks: Unlocks,
    /// Levels gained from the action plus any achievement XP it unlocked.
    pub level_ups: u32,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStart {
    pub first_visit: bool,
    pub day_reset: bool,
    pub streak: StreakUpdate,
    /// `None` if the visit was dropped by a call already in flight.
    pub visit: Option<ActionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    pub response: Response,
    pub actions: Vec<ActionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareReport {
    pub message: Option<String>,
    pub action: Option<ActionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentAchievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub icon: &'static str,
    pub xp: u64,
    pub unlocked_at: DateTime<Utc>,
}

/// Snapshot for status screens and reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub level: u32,
    pub current_xp: u64,
    pub xp_to_next_level: u64,
    pub total_xp: u64,
    pub progress_fraction: f64,
    pub streak: u32,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
    pub recent_achievements: Vec<RecentAchievement>,
    pub rank: Option<usize>,
    pub leaderboard_size: usize,
    pub daily_goals: Vec<DailyGoal>,
}

pub struct Portfolio<S: ProfileStorage> {
    storage: S,
    progress: ProgressTracker,
    achievements: AchievementEngine,
    leaderboard: Leaderboard,
    streak: VisitStreak,
    counts: ActionCounts,
    terminal: CommandTerminal,
    rng: ChaCha20Rng,
    flight: SingleFlight,
}

impl<S: ProfileStorage> Portfolio<S> {
    /// Load every persisted concern, apply the day rollover and rank the
    /// current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn load(storage: S, today: NaiveDate, seed: u64) -> Result<Self, S::Error> {
        Self::load_with_profile(storage, today, seed, TerminalProfile::default())
    }

    /// Same as [`Portfolio::load`] with a host-supplied terminal profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn load_with_profile(
        storage: S,
        today: NaiveDate,
        seed: u64,
        profile: TerminalProfile,
    ) -> Result<Self, S::Error> {
        let mut progress = ProgressTracker::load(&storage)?;
        let achievements = AchievementEngine::load(&storage)?;
        let leaderboard = Leaderboard::load(&storage)?;
        let streak = persist::load_or_default(&storage, KEY_STREAK)?;
        let counts = persist::load_or_default(&storage, KEY_ACTION_COUNTS)?;

        if progress.day_rollover(today) {
            progress.persist(&storage)?;
        }

        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(1);

        let mut portfolio = Self {
            storage,
            progress,
            achievements,
            leaderboard,
            streak,
            counts,
            terminal: CommandTerminal::new(profile, seed),
            rng,
            flight: SingleFlight::new(),
        };
        portfolio.sync_leaderboard()?;
        log::debug!(
            "portfolio loaded: level {}, {} achievements",
            portfolio.progress.level(),
            portfolio.achievements.unlocked_count()
        );
        Ok(portfolio)
    }

    /// Open a visit: streak check-in, first-visit marker and the daily
    /// `visit` reward.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn begin_session(
        &mut self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<SessionStart, S::Error> {
        let day_reset = self.progress.day_rollover(today);

        let first_visit = persist::load_opt::<_, bool>(&self.storage, KEY_FIRST_VISIT)?.is_none();
        if first_visit {
            persist::save(&self.storage, KEY_FIRST_VISIT, &true)?;
            log::info!("first visit recorded");
        }

        let streak = self.streak.check_in(today);
        if let Some(bonus) = streak.bonus_xp {
            log::info!("{}-day streak bonus: {bonus} XP", streak.count);
            self.progress.credit(bonus);
        }
        persist::save(&self.storage, KEY_STREAK, &self.streak)?;
        self.progress.persist(&self.storage)?;

        let visit = self.record_action(ActionKind::Visit, today, now)?;
        Ok(SessionStart {
            first_visit,
            day_reset,
            streak,
            visit,
        })
    }

    /// Record one action occurrence. Returns `Ok(None)` when another call
    /// is still in flight and this one was dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage rejects a write.
    pub fn record_action(
        &mut self,
        action: ActionKind,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Option<ActionReport>, S::Error> {
        let Some(_guard) = self.flight.try_begin() else {
            log::debug!("{action} dropped: another action is in flight");
            return Ok(None);
        };

        self.progress.day_rollover(today);
        let outcome = self.progress.record_action(action, today);
        self.counts.increment(action);

        let mut level_ups = outcome.level_ups();
        let unlocks = self.evaluate(Some(action), today, now, &mut level_ups);

        self.progress.persist(&self.storage)?;
        persist::save(&self.storage, KEY_ACTION_COUNTS, &self.counts)?;
        if !unlocks.is_empty() {
            self.achievements.persist(&self.storage)?;
        }
        self.sync_leaderboard()?;

        Ok(Some(ActionReport {
            action,
            outcome,
            unlocks,
            level_ups,
            level: self.progress.level(),
        }))
    }

    /// Run one terminal line and route the actions it reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage rejects a write.
    pub fn submit_line(
        &mut self,
        raw: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<LineReport, S::Error> {
        let response = self.terminal.submit(raw, now);
        let mut actions = Vec::new();
        for event in &response.events {
            if let TerminalEvent::ActionCompleted(action) = *event
                && let Some(report) = self.record_action(action, today, now)?
            {
                actions.push(report);
            }
        }
        Ok(LineReport { response, actions })
    }

    /// Record a `social` action and build the leaderboard brag line.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage rejects a write.
    pub fn share(&mut self, today: NaiveDate, now: DateTime<Utc>) -> Result<ShareReport, S::Error> {
        let action = self.record_action(ActionKind::Social, today, now)?;
        let message = self.leaderboard.share_message(self.progress.level());
        Ok(ShareReport { message, action })
    }

    /// Unlock an achievement tracked by the host (bug reports, code views).
    /// Level-based achievements reached through its XP come back too.
    /// Achievements earned in play are refused and yield no unlocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage rejects a write.
    pub fn unlock_external(
        &mut self,
        id: AchievementId,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Unlocks, S::Error> {
        let Some(unlock) = self.achievements.unlock(id, now) else {
            return Ok(Unlocks::new());
        };
        let mut unlocks = Unlocks::new();
        unlocks.push(unlock);
        if self.progress.credit(unlock.xp) > 0 {
            let mut ignored = 0;
            unlocks.extend(self.evaluate(None, today, now, &mut ignored));
        }
        self.achievements.persist(&self.storage)?;
        self.progress.persist(&self.storage)?;
        self.sync_leaderboard()?;
        Ok(unlocks)
    }

    /// Let the other players gain some XP. Returns how many moved.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage rejects the write.
    pub fn simulate_leaderboard(&mut self) -> Result<usize, S::Error> {
        let bumped = self.leaderboard.simulate_activity(&mut self.rng);
        self.leaderboard.persist(&self.storage)?;
        Ok(bumped)
    }

    #[must_use]
    pub fn daily_goals(&self, today: NaiveDate) -> Vec<DailyGoal> {
        daily_goals(self.progress.state(), today)
    }

    #[must_use]
    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let state = self.progress.state();
        let recent_achievements = self
            .achievements
            .recent(RECENT_ACHIEVEMENTS)
            .into_iter()
            .map(|(def, unlocked_at)| RecentAchievement {
                id: def.id,
                name: def.name,
                icon: def.icon,
                xp: def.xp,
                unlocked_at,
            })
            .collect();
        Dashboard {
            level: state.level,
            current_xp: state.current_xp,
            xp_to_next_level: state.xp_to_next_level,
            total_xp: self.progress.total_xp_earned(),
            progress_fraction: self.progress.progress_fraction(),
            streak: self.streak.current(today),
            achievements_unlocked: self.achievements.unlocked_count(),
            achievements_total: DEFINITIONS.len(),
            recent_achievements,
            rank: self.leaderboard.rank(CURRENT_USER_ID),
            leaderboard_size: self.leaderboard.len(),
            daily_goals: self.daily_goals(today),
        }
    }

    #[must_use]
    pub const fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    #[must_use]
    pub const fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    #[must_use]
    pub const fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    #[must_use]
    pub const fn streak(&self) -> &VisitStreak {
        &self.streak
    }

    #[must_use]
    pub const fn counts(&self) -> &ActionCounts {
        &self.counts
    }

    #[must_use]
    pub const fn terminal(&self) -> &CommandTerminal {
        &self.terminal
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Handle to the in-flight flag guarding [`Portfolio::record_action`].
    #[must_use]
    pub fn flight(&self) -> SingleFlight {
        self.flight.clone()
    }

    /// Evaluate achievements and credit their XP. A level gained from that
    /// XP triggers one follow-up pass.
    fn evaluate(
        &mut self,
        action: Option<ActionKind>,
        today: NaiveDate,
        now: DateTime<Utc>,
        level_ups: &mut u32,
    ) -> Unlocks {
        let streak = self.streak.current(today);
        let ctx = EvaluationContext {
            progress: self.progress.state(),
            action,
            counts: &self.counts,
            streak,
        };
        let mut unlocks = self.achievements.evaluate(&ctx, now);
        let gained = self.credit_unlocks(&unlocks);
        *level_ups += gained;

        if gained > 0 {
            let ctx = EvaluationContext {
                progress: self.progress.state(),
                action,
                counts: &self.counts,
                streak,
            };
            let follow_up = self.achievements.evaluate(&ctx, now);
            *level_ups += self.credit_unlocks(&follow_up);
            unlocks.extend(follow_up);
        }
        unlocks
    }

    fn credit_unlocks(&mut self, unlocks: &[Unlock]) -> u32 {
        unlocks
            .iter()
            .map(|unlock| self.progress.credit(unlock.xp))
            .sum()
    }

    fn sync_leaderboard(&mut self) -> Result<(), S::Error> {
        self.leaderboard
            .upsert_current_user(self.progress.level(), self.progress.total_xp_earned());
        self.leaderboard.persist(&self.storage)
    }
}
