use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::io::Write;

use neonfolio_game::{
    ActionReport, Dashboard, LeaderboardEntry, LineKind, LineReport, Outcome, SessionStart,
    ShareReport, TerminalLine, Unlock, country_flag,
};

/// Everything one non-interactive run did, in the order it happened.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub session: SessionStart,
    pub lines: Vec<LineReport>,
    pub actions: Vec<ActionReport>,
    pub share: Option<ShareReport>,
    pub unlocked: Vec<Unlock>,
    pub simulated: Option<usize>,
    pub dashboard: Dashboard,
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
}

pub fn paint_line(line: &TerminalLine) -> ColoredString {
    match line.kind {
        LineKind::Command => line.text.bright_cyan(),
        LineKind::Output => line.text.normal(),
        LineKind::Highlight => line.text.yellow().bold(),
        LineKind::Success => line.text.green(),
        LineKind::Error => line.text.red(),
    }
}

/// Toast-style lines for one recorded action.
pub fn action_lines(report: &ActionReport) -> Vec<ColoredString> {
    let mut lines = Vec::new();
    match report.outcome {
        Outcome::Awarded { points, .. } => {
            lines.push(format!("✨ +{points} XP ({})", report.action).bright_magenta());
        }
        Outcome::AlreadyClaimedToday => {
            lines.push(format!("· {} already rewarded today", report.action).dimmed());
        }
    }
    for unlock in &report.unlocks {
        let def = unlock.id.definition();
        lines.push(
            format!(
                "{} Achievement unlocked: {} (+{} XP)",
                def.icon, def.name, unlock.xp
            )
            .bright_yellow()
            .bold(),
        );
    }
    if report.level_ups > 0 {
        lines.push(format!("🎉 Level up! Now level {}", report.level).green().bold());
    }
    lines
}

pub fn write_session_start(w: &mut dyn Write, start: &SessionStart) -> Result<()> {
    if start.first_visit {
        writeln!(w, "{}", "👋 Welcome to Neonfolio!".bright_cyan().bold())?;
    }
    writeln!(w, "🔥 Visit streak: {} day(s)", start.streak.count)?;
    if let Some(bonus) = start.streak.bonus_xp {
        writeln!(w, "{}", format!("🔥 Streak bonus +{bonus} XP").bright_magenta())?;
    }
    if let Some(visit) = &start.visit {
        for line in action_lines(visit) {
            writeln!(w, "{line}")?;
        }
    }
    Ok(())
}

pub fn write_dashboard(w: &mut dyn Write, dash: &Dashboard) -> Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", "📊 Progress".bright_cyan().bold())?;
    writeln!(w, "{}", "===========".cyan())?;
    writeln!(w, "Level: {}", dash.level.to_string().bold())?;
    writeln!(
        w,
        "XP: {}/{} {}",
        dash.current_xp,
        dash.xp_to_next_level,
        progress_bar(dash.progress_fraction, 20)
    )?;
    writeln!(w, "Total XP: {}", dash.total_xp)?;
    writeln!(w, "Streak: {} day(s)", dash.streak)?;
    writeln!(
        w,
        "Achievements: {}/{}",
        dash.achievements_unlocked, dash.achievements_total
    )?;
    for recent in &dash.recent_achievements {
        writeln!(
            w,
            "   {} {} ({})",
            recent.icon,
            recent.name,
            recent.unlocked_at.format("%Y-%m-%d %H:%M")
        )?;
    }
    if let Some(rank) = dash.rank {
        writeln!(w, "Rank: #{rank} of {}", dash.leaderboard_size)?;
    }

    writeln!(w)?;
    writeln!(w, "{}", "🎯 Daily Goals".bright_yellow().bold())?;
    for goal in &dash.daily_goals {
        let mark = if goal.completed() {
            "✅".green()
        } else {
            "⬜".normal()
        };
        writeln!(
            w,
            "{mark} {:<15} {}/{}  +{} XP",
            goal.label, goal.current, goal.target, goal.xp
        )?;
    }
    Ok(())
}

pub fn write_leaderboard(w: &mut dyn Write, entries: &[LeaderboardEntry]) -> Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", "🏆 Global Developer Leaderboard".bright_cyan().bold())?;
    writeln!(w, "{}", "===============================".cyan())?;
    for (idx, entry) in entries.iter().enumerate() {
        let row = format!(
            "#{:<3} {} {:<14} {} Lv {:<3} {:>6} XP",
            idx + 1,
            entry.avatar,
            entry.name,
            country_flag(&entry.country),
            entry.level,
            entry.xp
        );
        if entry.is_current_user {
            writeln!(w, "{}", row.bright_green().bold())?;
        } else {
            writeln!(w, "{row}")?;
        }
    }
    Ok(())
}

pub fn generate_console_report(w: &mut dyn Write, report: &RunReport) -> Result<()> {
    write_session_start(w, &report.session)?;

    for line in &report.lines {
        for text in &line.response.lines {
            writeln!(w, "{}", paint_line(text))?;
        }
        for action in &line.actions {
            for toast in action_lines(action) {
                writeln!(w, "{toast}")?;
            }
        }
    }
    for action in &report.actions {
        for toast in action_lines(action) {
            writeln!(w, "{toast}")?;
        }
    }
    if let Some(share) = &report.share {
        if let Some(message) = &share.message {
            writeln!(w, "📣 {message}")?;
        }
        if let Some(action) = &share.action {
            for toast in action_lines(action) {
                writeln!(w, "{toast}")?;
            }
        }
    }
    for unlock in &report.unlocked {
        let def = unlock.id.definition();
        writeln!(
            w,
            "{}",
            format!("{} Achievement unlocked: {} (+{} XP)", def.icon, def.name, unlock.xp)
                .bright_yellow()
                .bold()
        )?;
    }
    if let Some(bumped) = report.simulated {
        writeln!(w, "🎲 {bumped} player(s) gained XP")?;
    }

    write_dashboard(w, &report.dashboard)?;
    if let Some(entries) = &report.leaderboard {
        write_leaderboard(w, entries)?;
    }
    Ok(())
}

pub fn generate_json_report(w: &mut dyn Write, report: &RunReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = (0..width)
        .take_while(|&cell| {
            #[allow(clippy::cast_precision_loss)]
            let edge = (cell + 1) as f64 / width as f64;
            edge <= fraction
        })
        .count();
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "[░░░░]");
        assert_eq!(progress_bar(0.5, 4), "[██░░]");
        assert_eq!(progress_bar(0.99, 4), "[███░]");
    }

    #[test]
    fn cooldown_toast_mentions_action() {
        colored::control::set_override(false);
        let report = ActionReport {
            action: neonfolio_game::ActionKind::Game,
            outcome: Outcome::AlreadyClaimedToday,
            unlocks: neonfolio_game::Unlocks::new(),
            level_ups: 0,
            level: 3,
        };
        let lines = action_lines(&report);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "· game already rewarded today");
    }
}
