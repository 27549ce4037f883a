//! Daily goals shown on the dashboard: one per action, done when today's
//! reward was claimed.
use chrono::NaiveDate;
use serde::Serialize;

use crate::action::ActionKind;
use crate::progress::ProgressState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyGoal {
    pub action: ActionKind,
    pub label: &'static str,
    pub current: u32,
    pub target: u32,
    pub xp: u64,
}

impl DailyGoal {
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.current >= self.target
    }
}

const GOAL_ORDER: [(ActionKind, &str); 4] = [
    (ActionKind::Terminal, "Use Terminal"),
    (ActionKind::Game, "Play a Game"),
    (ActionKind::Social, "Share Progress"),
    (ActionKind::Visit, "Daily Visit"),
];

#[must_use]
pub fn daily_goals(progress: &ProgressState, today: NaiveDate) -> Vec<DailyGoal> {
    GOAL_ORDER
        .iter()
        .map(|&(action, label)| DailyGoal {
            action,
            label,
            current: u32::from(progress.daily_action_log.get(&action) == Some(&today)),
            target: 1,
            xp: action.xp(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_todays_stamps_count() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let yesterday = today.pred_opt().unwrap();
        let mut progress = ProgressState::default();
        progress.daily_action_log.insert(ActionKind::Game, today);
        progress.daily_action_log.insert(ActionKind::Visit, yesterday);

        let goals = daily_goals(&progress, today);
        let done: Vec<_> = goals
            .iter()
            .filter(|g| g.completed())
            .map(|g| g.action)
            .collect();
        assert_eq!(done, vec![ActionKind::Game]);
        assert_eq!(goals.iter().map(|g| g.xp).sum::<u64>(), 80);
    }
}
