//! Ranked roster of players, with the current user upserted before each sort.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CURRENT_USER_AVATAR, CURRENT_USER_COUNTRY, CURRENT_USER_ID, CURRENT_USER_NAME, KEY_LEADERBOARD,
    SIMULATED_GAIN_CHANCE, SIMULATED_GAIN_MAX, SIMULATED_GAIN_MIN, SIMULATED_XP_PER_LEVEL,
};
use crate::persist::{self, ProfileStorage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub xp: u64,
    pub country: String,
    pub avatar: String,
    #[serde(default)]
    pub is_current_user: bool,
}

impl LeaderboardEntry {
    fn demo(id: &str, name: &str, level: u32, xp: u64, country: &str, avatar: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level,
            xp,
            country: country.to_string(),
            avatar: avatar.to_string(),
            is_current_user: false,
        }
    }
}

/// Entries surrounding one player, plus where that player sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardWindow<'a> {
    pub entries: &'a [LeaderboardEntry],
    /// Rank of `entries[0]`.
    pub first_rank: usize,
    pub rank: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::demo()
    }
}

impl Leaderboard {
    #[must_use]
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.sort();
        board
    }

    /// Seed roster used when no leaderboard has been saved yet.
    #[must_use]
    pub fn demo() -> Self {
        Self::from_entries(vec![
            LeaderboardEntry::demo("neon_dev", "NeonDev", 15, 1250, "ID", "🚀"),
            LeaderboardEntry::demo("stack_smith", "StackSmith", 12, 980, "US", "💻"),
            LeaderboardEntry::demo("pixel_monk", "PixelMonk", 11, 850, "UK", "🎯"),
            LeaderboardEntry::demo("shadow_shell", "ShadowShell", 10, 720, "JP", "🥷"),
            LeaderboardEntry::demo("css_sorcerer", "CssSorcerer", 9, 650, "CA", "🧙"),
            LeaderboardEntry::demo("merge_queen", "MergeQueen", 8, 580, "DE", "👩‍💻"),
            LeaderboardEntry::demo("bit_flipper", "BitFlipper", 7, 490, "FR", "⚡"),
            LeaderboardEntry::demo("loop_rookie", "LoopRookie", 6, 420, "BR", "🤓"),
            LeaderboardEntry::demo("stack_tracer", "StackTracer", 5, 350, "IN", "🐛"),
            LeaderboardEntry::demo("closure_kid", "ClosureKid", 4, 280, "AU", "λ"),
        ])
    }

    /// Load the saved roster, seeding and saving the demo roster when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn load<S: ProfileStorage + ?Sized>(storage: &S) -> Result<Self, S::Error> {
        if let Some(entries) = persist::load_opt::<_, Vec<LeaderboardEntry>>(storage, KEY_LEADERBOARD)? {
            return Ok(Self::from_entries(entries));
        }
        log::debug!("no saved leaderboard, seeding demo roster");
        let board = Self::demo();
        board.persist(storage)?;
        Ok(board)
    }

    /// # Errors
    ///
    /// Returns an error if the storage rejects the write.
    pub fn persist<S: ProfileStorage + ?Sized>(&self, storage: &S) -> Result<(), S::Error> {
        persist::save(storage, KEY_LEADERBOARD, &self.entries)
    }

    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable sort, highest XP first.
    fn sort(&mut self) {
        self.entries.sort_by(|a, b| b.xp.cmp(&a.xp));
    }

    /// Replace the current user's entry with fresh numbers and re-rank.
    pub fn upsert_current_user(&mut self, level: u32, total_xp: u64) {
        self.entries.retain(|entry| entry.id != CURRENT_USER_ID);
        self.entries.push(LeaderboardEntry {
            id: CURRENT_USER_ID.to_string(),
            name: CURRENT_USER_NAME.to_string(),
            level,
            xp: total_xp,
            country: CURRENT_USER_COUNTRY.to_string(),
            avatar: CURRENT_USER_AVATAR.to_string(),
            is_current_user: true,
        });
        self.sort();
    }

    #[must_use]
    pub fn top(&self, limit: usize) -> &[LeaderboardEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// 1-based rank of `id`.
    #[must_use]
    pub fn rank(&self, id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .map(|idx| idx + 1)
    }

    /// Up to `context` entries either side of `id`.
    #[must_use]
    pub fn position(&self, id: &str, context: usize) -> Option<LeaderboardWindow<'_>> {
        let idx = self.entries.iter().position(|entry| entry.id == id)?;
        let start = idx.saturating_sub(context);
        let end = (idx + context + 1).min(self.entries.len());
        Some(LeaderboardWindow {
            entries: &self.entries[start..end],
            first_rank: start + 1,
            rank: idx + 1,
            total: self.entries.len(),
        })
    }

    /// Randomly bump other players so the board feels alive.
    pub fn simulate_activity<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut bumped = 0;
        for entry in self.entries.iter_mut().filter(|e| !e.is_current_user) {
            if rng.gen_bool(SIMULATED_GAIN_CHANCE) {
                entry.xp = entry
                    .xp
                    .saturating_add(rng.gen_range(SIMULATED_GAIN_MIN..=SIMULATED_GAIN_MAX));
                entry.level =
                    u32::try_from(entry.xp / SIMULATED_XP_PER_LEVEL + 1).unwrap_or(u32::MAX);
                bumped += 1;
            }
        }
        self.sort();
        bumped
    }

    #[must_use]
    pub fn highest_level(&self) -> u32 {
        self.entries.iter().map(|e| e.level).max().unwrap_or(0)
    }

    #[must_use]
    pub fn max_xp(&self) -> u64 {
        self.entries.iter().map(|e| e.xp).max().unwrap_or(0)
    }

    /// Brag line for the share button; `None` if the user is not ranked yet.
    #[must_use]
    pub fn share_message(&self, level: u32) -> Option<String> {
        let rank = self.rank(CURRENT_USER_ID)?;
        let xp = self
            .entries
            .get(rank - 1)
            .map_or(0, |entry| entry.xp);
        Some(format!(
            "🏆 I'm ranked #{rank} on the Global Developer Leaderboard! Level {level} with {xp} XP. Can you beat me?"
        ))
    }
}

/// Flag emoji for a two-letter country code, globe for anything else.
#[must_use]
pub fn country_flag(code: &str) -> String {
    let code = match code.to_ascii_uppercase().as_str() {
        "UK" => String::from("GB"),
        other => other.to_string(),
    };
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return String::from("🌐");
    }
    code.chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (u32::from(c) - u32::from('A'))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn assert_sorted(board: &Leaderboard) {
        assert!(board.entries().windows(2).all(|w| w[0].xp >= w[1].xp));
    }

    #[test]
    fn upsert_keeps_single_current_user() {
        let mut board = Leaderboard::demo();
        board.upsert_current_user(2, 300);
        board.upsert_current_user(3, 700);
        let mine: Vec<_> = board
            .entries()
            .iter()
            .filter(|e| e.id == CURRENT_USER_ID)
            .collect();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].xp, 700);
        assert!(mine[0].is_current_user);
        assert_eq!(board.len(), 11);
        assert_sorted(&board);
        assert_eq!(board.rank(CURRENT_USER_ID), Some(5));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut board = Leaderboard::demo();
        board.upsert_current_user(9, 650);
        let ids: Vec<_> = board.entries()[4..6].iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["css_sorcerer", CURRENT_USER_ID]);
    }

    #[test]
    fn position_window_clamps_at_edges() {
        let mut board = Leaderboard::demo();
        board.upsert_current_user(20, 5_000);
        let window = board.position(CURRENT_USER_ID, 2).unwrap();
        assert_eq!(window.rank, 1);
        assert_eq!(window.first_rank, 1);
        assert_eq!(window.entries.len(), 3);
        assert_eq!(window.total, 11);
        assert!(board.position("nobody", 2).is_none());
        assert_eq!(board.top(3).len(), 3);
        assert_eq!(board.top(50).len(), 11);
    }

    #[test]
    fn simulation_only_moves_other_players() {
        let mut board = Leaderboard::demo();
        board.upsert_current_user(1, 120);
        let before_xp: u64 = board.entries().iter().map(|e| e.xp).sum();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut bumped = 0;
        for _ in 0..20 {
            bumped += board.simulate_activity(&mut rng);
        }
        assert!(bumped > 0);
        let after_xp: u64 = board.entries().iter().map(|e| e.xp).sum();
        assert!(after_xp > before_xp);
        let me = &board.entries()[board.rank(CURRENT_USER_ID).unwrap() - 1];
        assert_eq!(me.xp, 120);
        assert_sorted(&board);
    }

    #[test]
    fn load_seeds_and_saves_demo_roster() {
        let storage = MemoryStorage::new();
        let board = Leaderboard::load(&storage).unwrap();
        assert_eq!(board, Leaderboard::demo());
        assert!(storage.raw(KEY_LEADERBOARD).is_some());
        assert_eq!(board.highest_level(), 15);
        assert_eq!(board.max_xp(), 1250);
    }

    #[test]
    fn flags_and_share_message() {
        assert_eq!(country_flag("id"), "🇮🇩");
        assert_eq!(country_flag("UK"), "🇬🇧");
        assert_eq!(country_flag("XYZ"), "🌐");
        let mut board = Leaderboard::demo();
        assert!(board.share_message(1).is_none());
        board.upsert_current_user(1, 2_000);
        let msg = board.share_message(4).unwrap();
        assert!(msg.contains("#1"));
        assert!(msg.contains("Level 4 with 2000 XP"));
    }
}
