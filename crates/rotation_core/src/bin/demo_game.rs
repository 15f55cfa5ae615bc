use rotation_core::{
    build_report, EngineConfig, GameEngine, GameSetup, PlayerSeed, Position, Side,
    SnapshotStore, UndoOutcome,
};

fn roster() -> Vec<PlayerSeed> {
    let positions = [
        Position::PG,
        Position::SG,
        Position::SF,
        Position::PF,
        Position::C,
        Position::PG,
        Position::SG,
        Position::SF,
        Position::PF,
        Position::C,
        Position::SG,
        Position::SF,
    ];
    positions
        .iter()
        .enumerate()
        .map(|(i, &position)| PlayerSeed {
            name: format!("Player {}", i + 1),
            number: (i + 4) as u8,
            position,
            secondary_positions: vec![],
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Running a demo game through the rotation engine...");

    let mut engine = GameEngine::new(GameSetup {
        roster: roster(),
        home_team_name: "Lions".to_string(),
        away_team_name: "Bears".to_string(),
        is_home_team: true,
        config: EngineConfig::default(),
    });
    let store = SnapshotStore::new("saves");

    engine.start_game([0, 1, 2, 3, 4])?;
    println!("Game {} started with players 0-4", engine.game_id());

    // First quarter: a basket each way, one rotation.
    engine.tick(180);
    engine.add_points(Side::Us, 2, Some(1))?;
    engine.add_points(Side::Rival, 3, None)?;
    engine.tick(120);
    engine.substitute(4, 5)?;
    store.persist(&engine.to_snapshot())?;
    println!("Q1 rotation done, score {}-{}", engine.game().our_score, engine.game().rival_score);

    // A fat-fingered foul, undone.
    engine.add_foul(2)?;
    match engine.undo_last() {
        UndoOutcome::Undone => println!("Mistaken foul undone"),
        UndoOutcome::NothingToUndo => return Err("expected an undoable action".into()),
    }

    engine.advance_quarter()?;
    engine.start_quarter()?;
    engine.tick(240);
    engine.add_points(Side::Us, 3, Some(5))?;
    engine.substitute(5, 4)?;
    engine.finish_game()?;

    // Save, reload, and prove the round-trip is lossless.
    let snapshot = engine.to_snapshot();
    store.persist(&snapshot)?;
    let revived = GameEngine::from_snapshot(&store.load(engine.game_id())?)?;
    if revived.to_snapshot().quintets != snapshot.quintets {
        return Err("snapshot round-trip lost quintet state".into());
    }
    println!("Snapshot round-trip verified");

    let report = build_report(&snapshot);
    println!(
        "Final {}-{} | {} real substitutions",
        report.our_score, report.rival_score, report.real_substitutions
    );
    for quintet in &report.quintets_by_time {
        println!(
            "  quintet [{}] {}s, {:+} differential over {} intervals",
            quintet.key, quintet.total_seconds, quintet.differential, quintet.appearances
        );
    }
    for player in &report.players {
        println!(
            "  #{} {}: {} stints, {}s total, {:+}",
            player.number, player.name, player.stint_count, player.total_seconds,
            player.plus_minus
        );
    }

    Ok(())
}
