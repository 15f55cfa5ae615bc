//! Sequence invariants checked over randomized action streams.

use proptest::prelude::*;
use rotation_core::{
    EngineConfig, GameEngine, GameSetup, PlayerSeed, Position, Side, Snapshot,
};

const ROSTER_SIZE: usize = 10;

#[derive(Debug, Clone)]
enum Cmd {
    Tick(u32),
    Substitute(usize, usize),
    AddPointsUs(u16, usize),
    AddPointsRival(u16),
    AddFoul(usize),
    AdvanceQuarter,
    EditScore(u16, u16),
    Undo,
}

fn arb_cmd() -> impl Strategy<Value = Cmd> {
    prop_oneof![
        (1u32..180).prop_map(Cmd::Tick),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Cmd::Substitute(a, b)),
        ((1u16..=3), any::<usize>()).prop_map(|(pts, scorer)| Cmd::AddPointsUs(pts, scorer)),
        (1u16..=3).prop_map(Cmd::AddPointsRival),
        (any::<usize>()).prop_map(Cmd::AddFoul),
        Just(Cmd::AdvanceQuarter),
        ((0u16..150), (0u16..150)).prop_map(|(a, b)| Cmd::EditScore(a, b)),
        Just(Cmd::Undo),
    ]
}

fn started_engine() -> GameEngine {
    let roster = (0..ROSTER_SIZE)
        .map(|i| PlayerSeed {
            name: format!("Player {}", i),
            number: i as u8,
            position: Position::SG,
            secondary_positions: vec![],
        })
        .collect();
    let mut engine = GameEngine::new(GameSetup {
        roster,
        home_team_name: "Lions".to_string(),
        away_team_name: "Bears".to_string(),
        is_home_team: true,
        config: EngineConfig::default(),
    });
    engine.start_game([0, 1, 2, 3, 4]).unwrap();
    engine
}

/// Drives one command into the engine. Commands that the engine legitimately
/// rejects (bad quarter advance, exhausted bench) are simply dropped; the
/// properties under test are about applied actions.
fn apply_cmd(engine: &mut GameEngine, cmd: &Cmd) {
    match cmd {
        Cmd::Tick(secs) => engine.tick(*secs),
        Cmd::Substitute(out_pick, in_pick) => {
            let on: Vec<u32> =
                engine.players().iter().filter(|p| p.on_court).map(|p| p.id).collect();
            let bench: Vec<u32> =
                engine.players().iter().filter(|p| !p.on_court).map(|p| p.id).collect();
            if on.is_empty() || bench.is_empty() {
                return;
            }
            let outgoing = on[out_pick % on.len()];
            let incoming = bench[in_pick % bench.len()];
            engine.substitute(outgoing, incoming).unwrap();
        }
        Cmd::AddPointsUs(points, scorer_pick) => {
            let scorer = (scorer_pick % ROSTER_SIZE) as u32;
            engine.add_points(Side::Us, *points, Some(scorer)).unwrap();
        }
        Cmd::AddPointsRival(points) => {
            engine.add_points(Side::Rival, *points, None).unwrap();
        }
        Cmd::AddFoul(pick) => {
            engine.add_foul((pick % ROSTER_SIZE) as u32).unwrap();
        }
        Cmd::AdvanceQuarter => {
            if engine.advance_quarter().is_ok() {
                engine.start_quarter().unwrap();
            }
        }
        Cmd::EditScore(our, rival) => {
            engine.edit_score(*our, *rival).unwrap();
        }
        Cmd::Undo => {
            engine.undo_last();
        }
    }
}

fn normalized(engine: &GameEngine) -> Snapshot {
    let mut snapshot = engine.to_snapshot();
    snapshot.timestamp = 0;
    snapshot
}

proptest! {
    /// Exactly five players are on court after any action sequence, each with
    /// an open stint, and the snapshot invariant checks agree.
    #[test]
    fn five_on_court_for_all_sequences(cmds in prop::collection::vec(arb_cmd(), 0..60)) {
        let mut engine = started_engine();
        for cmd in &cmds {
            apply_cmd(&mut engine, cmd);

            let on_court = engine.players().iter().filter(|p| p.on_court).count();
            prop_assert_eq!(on_court, 5);
            for player in engine.players() {
                prop_assert_eq!(player.current_stint.is_some(), player.on_court);
            }
            engine.to_snapshot().validate().unwrap();
        }
    }

    /// Closed quintet durations plus the open interval's elapsed time always
    /// equal the cumulative clock, whatever the substitution/undo pattern.
    #[test]
    fn quintet_time_is_conserved(cmds in prop::collection::vec(arb_cmd(), 0..60)) {
        let mut engine = started_engine();
        for cmd in &cmds {
            apply_cmd(&mut engine, cmd);
            let total = engine.game().clock.total_elapsed;
            prop_assert_eq!(engine.quintets().accounted_seconds(total), total);
        }
    }

    /// Applying any single action and undoing it restores every ledger field.
    #[test]
    fn undo_restores_exact_prestate(
        prefix in prop::collection::vec(arb_cmd(), 0..30),
        action in arb_cmd(),
    ) {
        // Ticks and undos are not themselves undoable actions.
        prop_assume!(!matches!(action, Cmd::Tick(_) | Cmd::Undo));

        let mut engine = started_engine();
        for cmd in &prefix {
            apply_cmd(&mut engine, cmd);
        }

        let before = normalized(&engine);
        let history_before = engine.history_len();
        apply_cmd(&mut engine, &action);

        if engine.history_len() > history_before {
            engine.undo_last();
            prop_assert_eq!(normalized(&engine), before);
        }
    }

    /// Binary snapshot round-trips reproduce the engine exactly.
    #[test]
    fn snapshot_roundtrip_is_lossless(cmds in prop::collection::vec(arb_cmd(), 0..40)) {
        let mut engine = started_engine();
        for cmd in &cmds {
            apply_cmd(&mut engine, cmd);
        }

        let snapshot = engine.to_snapshot();
        let bytes = rotation_core::save::serialize_and_compress(&snapshot).unwrap();
        let restored = rotation_core::save::decompress_and_deserialize(&bytes).unwrap();
        prop_assert_eq!(&restored, &snapshot);

        let revived = GameEngine::from_snapshot(&restored).unwrap();
        prop_assert_eq!(normalized(&revived), normalized(&engine));
    }
}
