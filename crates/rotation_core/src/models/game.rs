use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle status of a tracked game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

/// Per-quarter count-up clock with a cumulative game counter.
///
/// Stint and quintet math keys off `total_elapsed`, which never resets, so
/// quarter boundaries cannot corrupt interval timing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GameClock {
    /// Seconds elapsed in the current quarter.
    pub quarter_elapsed: u32,
    /// Seconds elapsed across the whole game.
    pub total_elapsed: u32,
    pub running: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes the per-quarter counter and starts ticking.
    pub fn start_quarter(&mut self) {
        self.quarter_elapsed = 0;
        self.running = true;
    }

    /// Advances the clock. Ticking while paused is a no-op.
    pub fn tick(&mut self, delta_seconds: u32) {
        if !self.running {
            return;
        }
        self.quarter_elapsed += delta_seconds;
        self.total_elapsed += delta_seconds;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn remaining_in_quarter(&self, quarter_length_secs: u32) -> u32 {
        quarter_length_secs.saturating_sub(self.quarter_elapsed)
    }

    /// Resets the per-quarter counter; the cumulative counter keeps going.
    pub(crate) fn reset_quarter(&mut self) {
        self.quarter_elapsed = 0;
    }
}

/// Team-level running state for one game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub our_score: u16,
    pub rival_score: u16,
    /// 1-based quarter number.
    pub current_quarter: u8,
    pub clock: GameClock,
    pub is_home_team: bool,
    pub home_team_name: String,
    pub away_team_name: String,
    pub status: GameStatus,
    /// Substitution events per quarter. Includes the five synthetic lineup
    /// events that establish the opening quintet (see the report layer for
    /// the user-facing count).
    #[serde(default)]
    pub substitutions_by_quarter: BTreeMap<u8, u32>,
}

impl GameState {
    pub fn new(
        home_team_name: impl Into<String>,
        away_team_name: impl Into<String>,
        is_home_team: bool,
    ) -> Self {
        Self {
            our_score: 0,
            rival_score: 0,
            current_quarter: 1,
            clock: GameClock::new(),
            is_home_team,
            home_team_name: home_team_name.into(),
            away_team_name: away_team_name.into(),
            status: GameStatus::NotStarted,
            substitutions_by_quarter: BTreeMap::new(),
        }
    }

    /// Our team's display name.
    pub fn our_team_name(&self) -> &str {
        if self.is_home_team {
            &self.home_team_name
        } else {
            &self.away_team_name
        }
    }

    /// Raw substitution count across all quarters (synthetic events included).
    pub fn total_substitutions(&self) -> u32 {
        self.substitutions_by_quarter.values().sum()
    }

    pub(crate) fn count_substitution(&mut self) {
        *self.substitutions_by_quarter.entry(self.current_quarter).or_insert(0) += 1;
    }

    pub(crate) fn uncount_substitution(&mut self, quarter: u8) {
        if let Some(count) = self.substitutions_by_quarter.get_mut(&quarter) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.substitutions_by_quarter.remove(&quarter);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_while_paused_is_a_no_op() {
        let mut clock = GameClock::new();
        clock.tick(30);
        assert_eq!(clock.quarter_elapsed, 0);
        assert_eq!(clock.total_elapsed, 0);

        clock.start_quarter();
        clock.tick(30);
        clock.pause();
        clock.tick(15);
        assert_eq!(clock.quarter_elapsed, 30);
        assert_eq!(clock.total_elapsed, 30);

        clock.resume();
        clock.tick(15);
        assert_eq!(clock.quarter_elapsed, 45);
        assert_eq!(clock.total_elapsed, 45);
    }

    #[test]
    fn quarter_reset_keeps_cumulative_counter() {
        let mut clock = GameClock::new();
        clock.start_quarter();
        clock.tick(600);
        clock.reset_quarter();
        assert_eq!(clock.quarter_elapsed, 0);
        assert_eq!(clock.total_elapsed, 600);

        clock.tick(100);
        assert_eq!(clock.quarter_elapsed, 100);
        assert_eq!(clock.total_elapsed, 700);
    }

    #[test]
    fn remaining_in_quarter_saturates_at_zero() {
        let mut clock = GameClock::new();
        clock.start_quarter();
        clock.tick(650);
        assert_eq!(clock.remaining_in_quarter(600), 0);
        assert_eq!(clock.remaining_in_quarter(700), 50);
    }

    #[test]
    fn substitution_counter_tracks_per_quarter() {
        let mut game = GameState::new("Home", "Away", true);
        game.count_substitution();
        game.count_substitution();
        game.current_quarter = 2;
        game.count_substitution();

        assert_eq!(game.substitutions_by_quarter.get(&1), Some(&2));
        assert_eq!(game.substitutions_by_quarter.get(&2), Some(&1));
        assert_eq!(game.total_substitutions(), 3);

        game.uncount_substitution(2);
        assert_eq!(game.substitutions_by_quarter.get(&2), None);
        assert_eq!(game.total_substitutions(), 2);
    }

    #[test]
    fn our_team_name_follows_home_flag() {
        let home = GameState::new("Lions", "Bears", true);
        let away = GameState::new("Lions", "Bears", false);
        assert_eq!(home.our_team_name(), "Lions");
        assert_eq!(away.our_team_name(), "Bears");
    }
}
