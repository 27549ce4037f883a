mod report;
mod storage;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write, stdout};
use std::path::PathBuf;

use neonfolio_game::{AchievementId, ActionKind, LineKind, Portfolio};
use report::{RunReport, action_lines, paint_line, write_dashboard, write_leaderboard};
use storage::FileStorage;

const LEADERBOARD_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored, human-readable output
    Console,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "neonfolio", version)]
#[command(about = "Neonfolio portfolio terminal with XP, achievements and a leaderboard")]
struct Args {
    /// Directory holding the saved profile
    #[arg(long, default_value = ".neonfolio")]
    data_dir: PathBuf,

    /// RNG seed for games and leaderboard simulation (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Terminal line to run; repeat for a script
    #[arg(long = "exec", value_name = "LINE")]
    exec: Vec<String>,

    /// Record an action (visit, terminal, game, social); repeatable
    #[arg(long, value_name = "ACTION")]
    action: Vec<ActionKind>,

    /// Unlock an externally tracked achievement (e.g. bug_hunter); repeatable
    #[arg(long, value_name = "ACHIEVEMENT")]
    unlock: Vec<AchievementId>,

    /// Share progress (records a social action)
    #[arg(long)]
    share: bool,

    /// Include the leaderboard in the report
    #[arg(long)]
    leaderboard: bool,

    /// Let the other leaderboard players gain some XP
    #[arg(long)]
    simulate: bool,

    /// Print the progress dashboard and exit
    #[arg(long)]
    status: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// No scripted work and no report destination: start the REPL.
    fn is_interactive(&self) -> bool {
        self.report == ReportFormat::Console
            && self.output.is_none()
            && self.exec.is_empty()
            && self.action.is_empty()
            && self.unlock.is_empty()
            && !self.share
            && !self.leaderboard
            && !self.simulate
            && !self.status
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let today = local_today();
    let storage = FileStorage::open(&args.data_dir)
        .with_context(|| format!("failed to open data dir {}", args.data_dir.display()))?;
    let mut portfolio =
        Portfolio::load(storage, today, seed).context("failed to load saved profile")?;
    if args.verbose {
        eprintln!("seed {seed}, data in {}", portfolio.storage().root().display());
    }

    let session = portfolio
        .begin_session(today, Utc::now())
        .context("failed to start session")?;

    if args.is_interactive() {
        announce_banner();
        let mut out = stdout();
        report::write_session_start(&mut out, &session)?;
        return run_repl(&mut portfolio);
    }

    let report = run_script(&args, &mut portfolio, seed, session)?;
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => report::generate_json_report(&mut output_target, &report)?,
        ReportFormat::Console => report::generate_console_report(&mut output_target, &report)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn announce_banner() {
    println!("{}", "⚡ Neonfolio Terminal".bright_cyan().bold());
    println!("{}", "=====================".cyan());
    println!("Type \"help\" for commands, \"status\" for progress, \"exit\" to quit.");
}

fn run_script(
    args: &Args,
    portfolio: &mut Portfolio<FileStorage>,
    seed: u64,
    session: neonfolio_game::SessionStart,
) -> Result<RunReport> {
    let today = local_today();

    let mut lines = Vec::with_capacity(args.exec.len());
    for line in &args.exec {
        let report = portfolio
            .submit_line(line, today, Utc::now())
            .with_context(|| format!("failed to run `{line}`"))?;
        lines.push(report);
    }

    let mut actions = Vec::new();
    for &action in &args.action {
        if let Some(report) = portfolio.record_action(action, today, Utc::now())? {
            actions.push(report);
        }
    }

    let mut unlocked = Vec::new();
    for &id in &args.unlock {
        let unlocks = portfolio.unlock_external(id, today, Utc::now())?;
        if unlocks.is_empty() {
            log::info!("{id} was already unlocked");
        }
        unlocked.extend(unlocks);
    }

    let share = if args.share {
        Some(portfolio.share(today, Utc::now())?)
    } else {
        None
    };

    let simulated = if args.simulate {
        Some(portfolio.simulate_leaderboard()?)
    } else {
        None
    };

    let leaderboard = args
        .leaderboard
        .then(|| portfolio.leaderboard().top(LEADERBOARD_ROWS).to_vec());

    Ok(RunReport {
        seed,
        session,
        lines,
        actions,
        share,
        unlocked,
        simulated,
        dashboard: portfolio.dashboard(today),
        leaderboard,
    })
}

fn run_repl(portfolio: &mut Portfolio<FileStorage>) -> Result<()> {
    let stdin = io::stdin();
    let mut out = stdout();
    let prompt = portfolio.terminal().profile().prompt.clone();

    write!(out, "{} ", prompt.bright_cyan())?;
    out.flush()?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let today = local_today();
        match line.trim() {
            "exit" | "quit" => break,
            "status" => write_dashboard(&mut out, &portfolio.dashboard(today))?,
            "leaderboard" => {
                write_leaderboard(&mut out, portfolio.leaderboard().top(LEADERBOARD_ROWS))?;
            }
            "share" => {
                let share = portfolio.share(today, Utc::now())?;
                if let Some(message) = &share.message {
                    writeln!(out, "📣 {message}")?;
                }
                if let Some(action) = &share.action {
                    for toast in action_lines(action) {
                        writeln!(out, "{toast}")?;
                    }
                }
            }
            _ => {
                let report = portfolio.submit_line(&line, today, Utc::now())?;
                if report.response.cleared {
                    // ANSI clear screen + home
                    write!(out, "\x1b[2J\x1b[H")?;
                }
                // The prompt line was already typed by the user.
                let shown = report
                    .response
                    .lines
                    .iter()
                    .filter(|line| line.kind != LineKind::Command);
                for text in shown {
                    writeln!(out, "{}", paint_line(text))?;
                }
                for action in &report.actions {
                    for toast in action_lines(action) {
                        writeln!(out, "{toast}")?;
                    }
                }
            }
        }
        write!(out, "{} ", prompt.bright_cyan())?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_switch_off_interactive_mode() {
        let args = Args::parse_from(["neonfolio"]);
        assert!(args.is_interactive());
        let args = Args::parse_from(["neonfolio", "--exec", "help", "--exec", "about"]);
        assert!(!args.is_interactive());
        assert_eq!(args.exec, vec!["help", "about"]);
    }

    #[test]
    fn report_destination_flags_skip_the_repl() {
        let args = Args::parse_from(["neonfolio", "--report", "json"]);
        assert!(!args.is_interactive());
        let args = Args::parse_from(["neonfolio", "--output", "report.txt"]);
        assert!(!args.is_interactive());
        let args = Args::parse_from(["neonfolio", "--report", "console", "--verbose"]);
        assert!(args.is_interactive());
    }

    #[test]
    fn actions_and_achievements_parse_from_names() {
        let args = Args::parse_from([
            "neonfolio",
            "--action",
            "game",
            "--action",
            "Social",
            "--unlock",
            "bug_hunter",
        ]);
        assert_eq!(args.action, vec![ActionKind::Game, ActionKind::Social]);
        assert_eq!(args.unlock, vec![AchievementId::BugHunter]);
        assert!(Args::try_parse_from(["neonfolio", "--action", "dance"]).is_err());
    }
}
