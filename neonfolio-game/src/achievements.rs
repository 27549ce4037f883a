//! Achievement definitions and the unlock engine.
//!
//! Definitions are static; only the per-id [`AchievementRecord`] is
//! persisted. Evaluation walks the table in order, so unlocks triggered by
//! one action come back in table order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::action::{ActionCounts, ActionKind};
use crate::constants::KEY_ACHIEVEMENTS;
use crate::persist::{self, ProfileStorage};
use crate::progress::ProgressState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstVisit,
    TerminalMaster,
    #[serde(rename = "level_5")]
    Level5,
    DailyStreak,
    GameCompleted,
    SocialButterfly,
    CodeEnthusiast,
    BugHunter,
}

impl AchievementId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstVisit => "first_visit",
            Self::TerminalMaster => "terminal_master",
            Self::Level5 => "level_5",
            Self::DailyStreak => "daily_streak",
            Self::GameCompleted => "game_completed",
            Self::SocialButterfly => "social_butterfly",
            Self::CodeEnthusiast => "code_enthusiast",
            Self::BugHunter => "bug_hunter",
        }
    }

    #[must_use]
    pub fn definition(self) -> &'static AchievementDefinition {
        // The table lists every id exactly once, in declaration order.
        &DEFINITIONS[self as usize]
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown achievement `{0}`")]
pub struct UnknownAchievement(pub String);

impl FromStr for AchievementId {
    type Err = UnknownAchievement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        DEFINITIONS
            .iter()
            .map(|def| def.id)
            .find(|id| id.as_str() == needle)
            .ok_or(UnknownAchievement(needle))
    }
}

/// How an achievement becomes unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockRule {
    /// The triggering action matches.
    OnAction(ActionKind),
    /// Lifetime count of the action reaches the definition's target.
    ActionCount(ActionKind),
    LevelAtLeast(u32),
    /// Current visit streak reaches the definition's target.
    StreakAtLeast,
    /// Only unlocked by an explicit host call.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub xp: u64,
    pub target: Option<u32>,
    pub rule: UnlockRule,
}

pub static DEFINITIONS: [AchievementDefinition; 8] = [
    AchievementDefinition {
        id: AchievementId::FirstVisit,
        name: "Welcome!",
        description: "Visit the website for the first time",
        icon: "🚀",
        xp: 10,
        target: None,
        rule: UnlockRule::OnAction(ActionKind::Visit),
    },
    AchievementDefinition {
        id: AchievementId::TerminalMaster,
        name: "Terminal Master",
        description: "Use terminal 10 times",
        icon: "💻",
        xp: 50,
        target: Some(10),
        rule: UnlockRule::ActionCount(ActionKind::Terminal),
    },
    AchievementDefinition {
        id: AchievementId::Level5,
        name: "Rising Star",
        description: "Reach Level 5",
        icon: "⭐",
        xp: 100,
        target: None,
        rule: UnlockRule::LevelAtLeast(5),
    },
    AchievementDefinition {
        id: AchievementId::DailyStreak,
        name: "Consistent Coder",
        description: "Visit 5 days in a row",
        icon: "🔥",
        xp: 75,
        target: Some(5),
        rule: UnlockRule::StreakAtLeast,
    },
    AchievementDefinition {
        id: AchievementId::GameCompleted,
        name: "Game Champion",
        description: "Complete a game challenge",
        icon: "🎮",
        xp: 30,
        target: None,
        rule: UnlockRule::OnAction(ActionKind::Game),
    },
    AchievementDefinition {
        id: AchievementId::SocialButterfly,
        name: "Social Butterfly",
        description: "Share your progress 3 times",
        icon: "📱",
        xp: 40,
        target: Some(3),
        rule: UnlockRule::ActionCount(ActionKind::Social),
    },
    AchievementDefinition {
        id: AchievementId::CodeEnthusiast,
        name: "Code Enthusiast",
        description: "Write 100 lines of code",
        icon: "💻",
        xp: 60,
        target: Some(100),
        rule: UnlockRule::External,
    },
    AchievementDefinition {
        id: AchievementId::BugHunter,
        name: "Bug Hunter",
        description: "Fix 5 bugs in the terminal",
        icon: "🐛",
        xp: 45,
        target: Some(5),
        rule: UnlockRule::External,
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Inputs an unlock rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub progress: &'a ProgressState,
    /// `None` for re-checks that are not caused by an action.
    pub action: Option<ActionKind>,
    pub counts: &'a ActionCounts,
    pub streak: u32,
}

impl EvaluationContext<'_> {
    fn satisfies(&self, def: &AchievementDefinition) -> bool {
        let target = def.target.unwrap_or(1);
        match def.rule {
            UnlockRule::OnAction(action) => self.action == Some(action),
            UnlockRule::ActionCount(action) => self.counts.get(action) >= target,
            UnlockRule::LevelAtLeast(level) => self.progress.level >= level,
            UnlockRule::StreakAtLeast => self.streak >= target,
            UnlockRule::External => false,
        }
    }
}

/// A freshly unlocked achievement and the XP it grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlock {
    pub id: AchievementId,
    pub xp: u64,
}

pub type Unlocks = SmallVec<[Unlock; 4]>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementEngine {
    records: BTreeMap<AchievementId, AchievementRecord>,
}

impl AchievementEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records; unknown or malformed blobs start with nothing unlocked.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn load<S: ProfileStorage + ?Sized>(storage: &S) -> Result<Self, S::Error> {
        let records = persist::load_or_default(storage, KEY_ACHIEVEMENTS)?;
        Ok(Self { records })
    }

    /// # Errors
    ///
    /// Returns an error if the storage rejects the write.
    pub fn persist<S: ProfileStorage + ?Sized>(&self, storage: &S) -> Result<(), S::Error> {
        persist::save(storage, KEY_ACHIEVEMENTS, &self.records)
    }

    #[must_use]
    pub fn record(&self, id: AchievementId) -> Option<&AchievementRecord> {
        self.records.get(&id)
    }

    #[must_use]
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.records.get(&id).is_some_and(|r| r.unlocked)
    }

    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.records.values().filter(|r| r.unlocked).count()
    }

    /// Test every locked definition against `ctx`, unlocking the ones that pass.
    pub fn evaluate(&mut self, ctx: &EvaluationContext<'_>, now: DateTime<Utc>) -> Unlocks {
        let mut unlocks = Unlocks::new();
        for def in &DEFINITIONS {
            if self.is_unlocked(def.id) || !ctx.satisfies(def) {
                continue;
            }
            self.mark(def.id, now);
            unlocks.push(Unlock {
                id: def.id,
                xp: def.xp,
            });
        }
        unlocks
    }

    /// Unlock an achievement whose condition is tracked outside the core.
    /// Returns `None` if it was already unlocked or if its rule is not
    /// [`UnlockRule::External`]; those only unlock through [`Self::evaluate`].
    pub fn unlock(&mut self, id: AchievementId, now: DateTime<Utc>) -> Option<Unlock> {
        if id.definition().rule != UnlockRule::External {
            log::warn!("refusing external unlock of {id}: it is earned in play");
            return None;
        }
        if self.is_unlocked(id) {
            return None;
        }
        self.mark(id, now);
        Some(Unlock {
            id,
            xp: id.definition().xp,
        })
    }

    fn mark(&mut self, id: AchievementId, now: DateTime<Utc>) {
        log::info!("achievement unlocked: {id}");
        self.records.insert(
            id,
            AchievementRecord {
                unlocked: true,
                unlocked_at: Some(now),
            },
        );
    }

    /// Most recently unlocked first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<(&'static AchievementDefinition, DateTime<Utc>)> {
        let mut unlocked: Vec<_> = self
            .records
            .iter()
            .filter(|(_, r)| r.unlocked)
            .filter_map(|(id, r)| r.unlocked_at.map(|at| (id.definition(), at)))
            .collect();
        unlocked.sort_by(|a, b| b.1.cmp(&a.1));
        unlocked.truncate(limit);
        unlocked
    }

    /// `(current, target)` for counter-style achievements.
    #[must_use]
    pub fn progress(&self, id: AchievementId, ctx: &EvaluationContext<'_>) -> Option<(u32, u32)> {
        let def = id.definition();
        let target = def.target?;
        let current = match def.rule {
            UnlockRule::ActionCount(action) => ctx.counts.get(action),
            UnlockRule::StreakAtLeast => ctx.streak,
            _ => return None,
        };
        Some((current.min(target), target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn ctx<'a>(
        progress: &'a ProgressState,
        action: ActionKind,
        counts: &'a ActionCounts,
        streak: u32,
    ) -> EvaluationContext<'a> {
        EvaluationContext {
            progress,
            action: Some(action),
            counts,
            streak,
        }
    }

    #[test]
    fn table_is_indexed_by_id() {
        for (idx, def) in DEFINITIONS.iter().enumerate() {
            assert_eq!(def.id as usize, idx);
            assert_eq!(def.id.as_str().parse::<AchievementId>(), Ok(def.id));
        }
    }

    #[test]
    fn visit_unlocks_first_visit_only_once() {
        let mut engine = AchievementEngine::new();
        let progress = ProgressState::default();
        let counts = ActionCounts::new();
        let first = engine.evaluate(&ctx(&progress, ActionKind::Visit, &counts, 1), at(9));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, AchievementId::FirstVisit);
        assert_eq!(first[0].xp, 10);
        let second = engine.evaluate(&ctx(&progress, ActionKind::Visit, &counts, 1), at(10));
        assert!(second.is_empty());
        assert_eq!(
            engine.record(AchievementId::FirstVisit).unwrap().unlocked_at,
            Some(at(9))
        );
    }

    #[test]
    fn multiple_unlocks_return_in_table_order() {
        let mut engine = AchievementEngine::new();
        let progress = ProgressState {
            level: 6,
            ..ProgressState::default()
        };
        let mut counts = ActionCounts::new();
        for _ in 0..3 {
            counts.increment(ActionKind::Social);
        }
        let ids: Vec<_> = engine
            .evaluate(&ctx(&progress, ActionKind::Game, &counts, 5), at(8))
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                AchievementId::Level5,
                AchievementId::DailyStreak,
                AchievementId::GameCompleted,
                AchievementId::SocialButterfly,
            ]
        );
    }

    #[test]
    fn counter_achievement_waits_for_target() {
        let mut engine = AchievementEngine::new();
        let progress = ProgressState::default();
        let mut counts = ActionCounts::new();
        for n in 1..=10 {
            counts.increment(ActionKind::Terminal);
            let unlocks =
                engine.evaluate(&ctx(&progress, ActionKind::Terminal, &counts, 0), at(1));
            let got_master = unlocks.iter().any(|u| u.id == AchievementId::TerminalMaster);
            assert_eq!(got_master, n == 10, "unexpected unlock state at count {n}");
        }
        let context = ctx(&progress, ActionKind::Terminal, &counts, 0);
        assert_eq!(
            engine.progress(AchievementId::TerminalMaster, &context),
            Some((10, 10))
        );
        assert_eq!(engine.progress(AchievementId::Level5, &context), None);
    }

    #[test]
    fn external_achievements_never_unlock_from_actions() {
        let mut engine = AchievementEngine::new();
        let progress = ProgressState {
            level: 50,
            ..ProgressState::default()
        };
        let mut counts = ActionCounts::new();
        for _ in 0..200 {
            counts.increment(ActionKind::Terminal);
        }
        engine.evaluate(&ctx(&progress, ActionKind::Terminal, &counts, 99), at(2));
        assert!(!engine.is_unlocked(AchievementId::BugHunter));
        let unlock = engine.unlock(AchievementId::BugHunter, at(3)).unwrap();
        assert_eq!(unlock.xp, 45);
        assert!(engine.unlock(AchievementId::BugHunter, at(4)).is_none());
    }

    #[test]
    fn rule_based_achievements_refuse_direct_unlock() {
        let mut engine = AchievementEngine::new();
        for def in &DEFINITIONS {
            let unlock = engine.unlock(def.id, at(1));
            if def.rule == UnlockRule::External {
                assert_eq!(unlock.map(|u| u.id), Some(def.id));
            } else {
                assert!(unlock.is_none(), "{} unlocked directly", def.id);
                assert!(!engine.is_unlocked(def.id));
            }
        }
        assert_eq!(engine.unlocked_count(), 2);
    }

    #[test]
    fn recent_lists_newest_first() {
        let mut engine = AchievementEngine::new();
        engine.unlock(AchievementId::CodeEnthusiast, at(1));
        engine.mark(AchievementId::FirstVisit, at(5));
        engine.unlock(AchievementId::BugHunter, at(3));
        let names: Vec<_> = engine.recent(2).iter().map(|(d, _)| d.name).collect();
        assert_eq!(names, vec!["Welcome!", "Bug Hunter"]);
        assert_eq!(engine.unlocked_count(), 3);
    }

    #[test]
    fn records_serialize_by_string_id() {
        let mut engine = AchievementEngine::new();
        engine.mark(AchievementId::Level5, at(7));
        let storage = crate::persist::MemoryStorage::new();
        engine.persist(&storage).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&storage.raw(KEY_ACHIEVEMENTS).unwrap()).unwrap();
        assert_eq!(raw["level_5"]["unlocked"], true);
        let restored = AchievementEngine::load(&storage).unwrap();
        assert_eq!(restored, engine);
    }
}
