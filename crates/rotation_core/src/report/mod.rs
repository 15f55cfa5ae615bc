//! Post-game report aggregation.
//!
//! Pure functions over a [`Snapshot`]: nothing here mutates a live engine.
//! Open intervals are finalized against the snapshot's own clock and scores,
//! so a report can be produced mid-game without disturbing the ledgers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::game::GameStatus;
use crate::models::quintet::{QuintetInterval, QuintetKey};
use crate::save::Snapshot;

/// Substitution events injected at game start to establish the opening
/// quintet. Raw per-quarter counters include them so quintet bookkeeping is
/// uniform; user-facing totals subtract this offset so only bench changes
/// are reported.
pub const INITIAL_LINEUP_EVENTS: u32 = 5;

/// One five-player unit, accumulated across every interval it held the court.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuintetSummary {
    /// Canonical key string (`"3-7-9-11-14"`).
    pub key: String,
    pub player_ids: [u32; 5],
    /// Number of intervals this five appeared in.
    pub appearances: u32,
    pub total_seconds: u32,
    pub points_scored: u32,
    pub points_allowed: u32,
    pub differential: i32,
}

/// Stint summary for one player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSummary {
    pub player_id: u32,
    pub name: String,
    pub number: u8,
    pub stint_count: u32,
    /// Stint durations in court order, the open stint (finalized as of the
    /// snapshot clock) last.
    pub stint_durations: Vec<u32>,
    pub average_stint_secs: u32,
    pub total_seconds: u32,
    pub plus_minus: i32,
}

/// Everything a formatting collaborator needs to render a shareable summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameReport {
    pub home_team_name: String,
    pub away_team_name: String,
    pub our_score: u16,
    pub rival_score: u16,
    pub status: GameStatus,
    /// Quintets ordered by total shared time, descending.
    pub quintets_by_time: Vec<QuintetSummary>,
    /// The same quintets ordered by net differential, descending.
    pub quintets_by_differential: Vec<QuintetSummary>,
    /// Players with at least one stint and a selected position, ordered by
    /// total time on court, descending.
    pub players: Vec<PlayerSummary>,
    /// Substitution count shown to users: raw events minus the initial
    /// lineup offset.
    pub real_substitutions: u32,
}

/// Builds the full report from a finalized (or in-progress) snapshot.
pub fn build_report(snapshot: &Snapshot) -> GameReport {
    let quintets = aggregate_quintets(snapshot);

    let mut by_time = quintets.clone();
    by_time.sort_by(|a, b| b.total_seconds.cmp(&a.total_seconds));
    let mut by_differential = quintets;
    by_differential.sort_by(|a, b| b.differential.cmp(&a.differential));

    GameReport {
        home_team_name: snapshot.game.home_team_name.clone(),
        away_team_name: snapshot.game.away_team_name.clone(),
        our_score: snapshot.game.our_score,
        rival_score: snapshot.game.rival_score,
        status: snapshot.game.status,
        quintets_by_time: by_time,
        quintets_by_differential: by_differential,
        players: summarize_players(snapshot),
        real_substitutions: snapshot
            .game
            .total_substitutions()
            .saturating_sub(INITIAL_LINEUP_EVENTS),
    }
}

/// Groups intervals by canonical key: a quintet that leaves and returns to
/// the court accumulates across all its intervals rather than producing
/// separate rows.
fn aggregate_quintets(snapshot: &Snapshot) -> Vec<QuintetSummary> {
    let mut grouped: BTreeMap<QuintetKey, QuintetSummary> = BTreeMap::new();

    let open_finalized = snapshot.quintets.open.map(|open| QuintetInterval {
        key: open.key,
        duration_secs: snapshot
            .game
            .clock
            .total_elapsed
            .saturating_sub(open.start.clock_seconds),
        points_scored: snapshot.game.our_score.saturating_sub(open.start.our_score),
        points_allowed: snapshot.game.rival_score.saturating_sub(open.start.rival_score),
    });

    for interval in snapshot.quintets.closed.iter().chain(open_finalized.iter()) {
        let entry = grouped.entry(interval.key).or_insert_with(|| QuintetSummary {
            key: interval.key.join(),
            player_ids: interval.key.player_ids(),
            appearances: 0,
            total_seconds: 0,
            points_scored: 0,
            points_allowed: 0,
            differential: 0,
        });
        entry.appearances += 1;
        entry.total_seconds += interval.duration_secs;
        entry.points_scored += interval.points_scored as u32;
        entry.points_allowed += interval.points_allowed as u32;
        entry.differential = entry.points_scored as i32 - entry.points_allowed as i32;
    }

    grouped.into_values().collect()
}

fn summarize_players(snapshot: &Snapshot) -> Vec<PlayerSummary> {
    let mut players: Vec<PlayerSummary> = snapshot
        .players
        .iter()
        .filter(|p| p.position.is_set())
        .filter(|p| !p.stints.is_empty() || p.current_stint.is_some())
        .map(|p| {
            let mut durations = p.stints.clone();
            let mut plus_minus: i32 = p.stint_plus_minus.iter().sum();

            // Finalize the open stint as of the snapshot clock, without
            // touching the live ledgers.
            if let Some(start) = p.current_stint {
                durations.push(
                    snapshot.game.clock.total_elapsed.saturating_sub(start.clock_seconds),
                );
                plus_minus += (snapshot.game.our_score as i32 - start.our_score as i32)
                    - (snapshot.game.rival_score as i32 - start.rival_score as i32);
            }

            let total_seconds: u32 = durations.iter().sum();
            let stint_count = durations.len() as u32;
            PlayerSummary {
                player_id: p.id,
                name: p.name.clone(),
                number: p.number,
                stint_count,
                average_stint_secs: if stint_count > 0 { total_seconds / stint_count } else { 0 },
                stint_durations: durations,
                total_seconds,
                plus_minus,
            }
        })
        .collect();

    players.sort_by(|a, b| {
        b.total_seconds.cmp(&a.total_seconds).then(a.player_id.cmp(&b.player_id))
    });
    players
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{fresh_engine, started_engine};
    use crate::engine::Side;
    use crate::models::player::Position;

    #[test]
    fn report_accumulates_recurring_quintets() {
        let mut engine = started_engine();

        // {0,1,2,3,4} and {0,1,2,3,5} alternate twice each.
        engine.tick(60);
        engine.substitute(4, 5).unwrap();
        engine.tick(40);
        engine.substitute(5, 4).unwrap();
        engine.tick(30);
        engine.substitute(4, 5).unwrap();
        engine.tick(20);
        engine.substitute(5, 4).unwrap();
        engine.tick(10);

        let report = build_report(&engine.to_snapshot());

        // Two rows, not four.
        assert_eq!(report.quintets_by_time.len(), 2);
        let starters = &report.quintets_by_time[0];
        assert_eq!(starters.key, "0-1-2-3-4");
        assert_eq!(starters.appearances, 3);
        assert_eq!(starters.total_seconds, 60 + 30 + 10);
        let bench_unit = &report.quintets_by_time[1];
        assert_eq!(bench_unit.key, "0-1-2-3-5");
        assert_eq!(bench_unit.appearances, 2);
        assert_eq!(bench_unit.total_seconds, 40 + 20);
    }

    #[test]
    fn differential_ordering_is_independent_of_time_ordering() {
        let mut engine = started_engine();

        // Starters concede 5 in 100s, the second unit scores 4 in 10s.
        engine.tick(100);
        engine.add_points(Side::Rival, 5, None).unwrap();
        engine.substitute(0, 5).unwrap();
        engine.tick(10);
        engine.add_points(Side::Us, 4, None).unwrap();
        engine.finish_game().unwrap();

        let report = build_report(&engine.to_snapshot());

        assert_eq!(report.quintets_by_time[0].key, "0-1-2-3-4");
        assert_eq!(report.quintets_by_time[0].differential, -5);
        assert_eq!(report.quintets_by_differential[0].key, "1-2-3-4-5");
        assert_eq!(report.quintets_by_differential[0].differential, 4);
    }

    #[test]
    fn open_stints_are_finalized_without_mutation() {
        let mut engine = started_engine();
        engine.tick(75);
        engine.add_points(Side::Us, 2, None).unwrap();

        let snapshot = engine.to_snapshot();
        let report = build_report(&snapshot);

        let p0 = report.players.iter().find(|p| p.player_id == 0).unwrap();
        assert_eq!(p0.stint_count, 1);
        assert_eq!(p0.stint_durations, vec![75]);
        assert_eq!(p0.total_seconds, 75);
        assert_eq!(p0.plus_minus, 2);

        // The snapshot (and engine) still carry the stint as open.
        assert!(snapshot.players[0].current_stint.is_some());
        assert!(snapshot.players[0].stints.is_empty());
    }

    #[test]
    fn players_without_a_selected_position_are_skipped() {
        let mut engine = fresh_engine();
        engine.players[3].position = Position::Unset;
        engine.start_game([0, 1, 2, 3, 4]).unwrap();
        engine.tick(50);

        let report = build_report(&engine.to_snapshot());
        assert!(report.players.iter().all(|p| p.player_id != 3));
        assert_eq!(report.players.len(), 4);
    }

    #[test]
    fn bench_players_never_appear_in_the_report() {
        let mut engine = started_engine();
        engine.tick(10);
        let report = build_report(&engine.to_snapshot());
        assert_eq!(report.players.len(), 5);
    }

    #[test]
    fn real_substitutions_subtract_the_lineup_offset() {
        let mut engine = started_engine();
        engine.substitute(0, 5).unwrap();
        engine.substitute(1, 6).unwrap();
        engine.advance_quarter().unwrap();
        engine.substitute(2, 7).unwrap();

        let report = build_report(&engine.to_snapshot());
        assert_eq!(engine.game().total_substitutions(), 8);
        assert_eq!(report.real_substitutions, 3);
    }

    #[test]
    fn average_stint_length_is_total_over_count() {
        let mut engine = started_engine();
        engine.tick(60);
        engine.substitute(0, 5).unwrap();
        engine.tick(100);
        engine.substitute(5, 0).unwrap();
        engine.tick(20);

        let report = build_report(&engine.to_snapshot());
        let p0 = report.players.iter().find(|p| p.player_id == 0).unwrap();
        // Closed 60s stint plus the open 20s one.
        assert_eq!(p0.stint_durations, vec![60, 20]);
        assert_eq!(p0.average_stint_secs, 40);
    }
}
