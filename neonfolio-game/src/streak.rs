//! Consecutive-day visit streaks.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{STREAK_BONUS_INTERVAL, STREAK_BONUS_XP};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitStreak {
    #[serde(default)]
    pub last_visit: Option<NaiveDate>,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    Started,
    Unchanged,
    Extended,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub change: StreakChange,
    pub count: u32,
    /// Bonus XP earned by reaching a multiple of the bonus interval.
    pub bonus_xp: Option<u64>,
}

impl VisitStreak {
    /// Register a visit on `today`.
    pub fn check_in(&mut self, today: NaiveDate) -> StreakUpdate {
        let change = match self.last_visit {
            None => StreakChange::Started,
            Some(last) if last == today => StreakChange::Unchanged,
            Some(last) if last.succ_opt() == Some(today) => StreakChange::Extended,
            Some(_) => StreakChange::Broken,
        };

        let mut bonus_xp = None;
        match change {
            StreakChange::Unchanged => {}
            StreakChange::Extended => {
                self.count = self.count.saturating_add(1);
                if self.count % STREAK_BONUS_INTERVAL == 0 {
                    bonus_xp = Some(STREAK_BONUS_XP);
                }
            }
            StreakChange::Started | StreakChange::Broken => self.count = 1,
        }
        self.last_visit = Some(today);

        StreakUpdate {
            change,
            count: self.count,
            bonus_xp,
        }
    }

    /// Streak as of `today`, without recording a visit. A gap of more than
    /// one day means the streak is already lost.
    #[must_use]
    pub fn current(&self, today: NaiveDate) -> u32 {
        match self.last_visit {
            Some(last) if last == today || last.succ_opt() == Some(today) => self.count,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn consecutive_visits_extend_and_pay_bonus_every_fifth_day() {
        let mut streak = VisitStreak::default();
        let mut bonuses = Vec::new();
        for d in 1..=10 {
            let update = streak.check_in(day(d));
            if let Some(xp) = update.bonus_xp {
                bonuses.push((update.count, xp));
            }
        }
        assert_eq!(streak.count, 10);
        assert_eq!(bonuses, vec![(5, 25), (10, 25)]);
    }

    #[test]
    fn same_day_visit_is_unchanged() {
        let mut streak = VisitStreak::default();
        assert_eq!(streak.check_in(day(3)).change, StreakChange::Started);
        let again = streak.check_in(day(3));
        assert_eq!(again.change, StreakChange::Unchanged);
        assert_eq!(again.count, 1);
    }

    #[test]
    fn gap_breaks_streak() {
        let mut streak = VisitStreak::default();
        streak.check_in(day(1));
        streak.check_in(day(2));
        assert_eq!(streak.current(day(3)), 2);
        assert_eq!(streak.current(day(4)), 0);
        let update = streak.check_in(day(4));
        assert_eq!(update.change, StreakChange::Broken);
        assert_eq!(update.count, 1);
        assert_eq!(update.bonus_xp, None);
    }
}
