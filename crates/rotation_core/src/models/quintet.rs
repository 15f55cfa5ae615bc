use serde::{Deserialize, Serialize};

use super::player::{Player, StintStart};

/// Canonical identity of a five-player unit: the ids sorted ascending, so the
/// same five players map to the same key regardless of the order in which
/// substitutions produced them.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct QuintetKey([u32; 5]);

impl QuintetKey {
    pub fn new(mut ids: [u32; 5]) -> Self {
        ids.sort_unstable();
        Self(ids)
    }

    /// Key for the current on-court five. `None` unless exactly five players
    /// are on court.
    pub fn from_on_court(players: &[Player]) -> Option<Self> {
        let mut ids = [0u32; 5];
        let mut count = 0;
        for player in players {
            if player.on_court {
                if count == 5 {
                    return None;
                }
                ids[count] = player.id;
                count += 1;
            }
        }
        if count == 5 {
            Some(Self::new(ids))
        } else {
            None
        }
    }

    pub fn player_ids(&self) -> [u32; 5] {
        self.0
    }

    pub fn contains(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    /// Stable string form (`"3-7-9-11-14"`) used by external stores and
    /// report output.
    pub fn join(&self) -> String {
        self.0.map(|id| id.to_string()).join("-")
    }
}

/// One closed interval during which a specific five held the court.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuintetInterval {
    pub key: QuintetKey,
    pub duration_secs: u32,
    pub points_scored: u16,
    pub points_allowed: u16,
}

impl QuintetInterval {
    pub fn differential(&self) -> i32 {
        self.points_scored as i32 - self.points_allowed as i32
    }
}

/// The interval currently accruing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenQuintet {
    pub key: QuintetKey,
    pub start: StintStart,
}

/// Closed quintet intervals in court order, plus the one currently accruing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QuintetLedger {
    pub closed: Vec<QuintetInterval>,
    pub open: Option<OpenQuintet>,
}

impl QuintetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of closed durations plus the open interval's elapsed time.
    ///
    /// Equals the total game clock seconds since the first quintet was
    /// established, for any sequence of substitutions and quarter advances.
    pub fn accounted_seconds(&self, clock_seconds: u32) -> u32 {
        let closed: u32 = self.closed.iter().map(|i| i.duration_secs).sum();
        let open = self
            .open
            .map(|o| clock_seconds.saturating_sub(o.start.clock_seconds))
            .unwrap_or(0);
        closed + open
    }

    /// Closes the open interval (if any) against the current score and clock
    /// and appends it to the ledger.
    pub(crate) fn close_open(&mut self, our_score: u16, rival_score: u16, clock_seconds: u32) {
        if let Some(open) = self.open.take() {
            self.closed.push(QuintetInterval {
                key: open.key,
                duration_secs: clock_seconds.saturating_sub(open.start.clock_seconds),
                points_scored: our_score.saturating_sub(open.start.our_score),
                points_allowed: rival_score.saturating_sub(open.start.rival_score),
            });
        }
    }

    /// Opens a fresh interval starting now with zero accrued time and points.
    pub(crate) fn open_interval(
        &mut self,
        key: QuintetKey,
        our_score: u16,
        rival_score: u16,
        clock_seconds: u32,
    ) {
        self.open = Some(OpenQuintet {
            key,
            start: StintStart { our_score, rival_score, clock_seconds },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{Player, PlayerSeed, Position};

    fn player(id: u32, on_court: bool) -> Player {
        let mut p = Player::new(
            id,
            PlayerSeed {
                name: format!("P{}", id),
                number: id as u8,
                position: Position::PG,
                secondary_positions: vec![],
            },
        );
        p.on_court = on_court;
        p
    }

    #[test]
    fn key_is_order_independent() {
        let a = QuintetKey::new([9, 3, 14, 7, 11]);
        let b = QuintetKey::new([14, 11, 9, 7, 3]);
        assert_eq!(a, b);
        assert_eq!(a.join(), "3-7-9-11-14");
        assert!(a.contains(11));
        assert!(!a.contains(4));
    }

    #[test]
    fn from_on_court_requires_exactly_five() {
        let mut players: Vec<Player> = (0..6).map(|id| player(id, id < 4)).collect();
        assert_eq!(QuintetKey::from_on_court(&players), None);

        players[4].on_court = true;
        assert_eq!(
            QuintetKey::from_on_court(&players),
            Some(QuintetKey::new([0, 1, 2, 3, 4]))
        );

        players[5].on_court = true;
        assert_eq!(QuintetKey::from_on_court(&players), None);
    }

    #[test]
    fn close_open_diffs_score_and_clock_against_start() {
        let mut ledger = QuintetLedger::new();
        let key = QuintetKey::new([1, 2, 3, 4, 5]);
        ledger.open_interval(key, 10, 8, 100);

        ledger.close_open(16, 11, 160);
        assert!(ledger.open.is_none());
        assert_eq!(ledger.closed.len(), 1);

        let interval = ledger.closed[0];
        assert_eq!(interval.key, key);
        assert_eq!(interval.duration_secs, 60);
        assert_eq!(interval.points_scored, 6);
        assert_eq!(interval.points_allowed, 3);
        assert_eq!(interval.differential(), 3);
    }

    #[test]
    fn close_open_without_open_interval_is_a_no_op() {
        let mut ledger = QuintetLedger::new();
        ledger.close_open(5, 5, 50);
        assert!(ledger.closed.is_empty());
        assert!(ledger.open.is_none());
    }

    #[test]
    fn accounted_seconds_includes_the_open_interval() {
        let mut ledger = QuintetLedger::new();
        let key = QuintetKey::new([1, 2, 3, 4, 5]);
        ledger.open_interval(key, 0, 0, 0);
        ledger.close_open(0, 0, 120);
        ledger.open_interval(key, 0, 0, 120);

        assert_eq!(ledger.accounted_seconds(200), 200);
    }
}
