//! Best records persisted to a JSON file survive a restart.

use tui_memory::engine::{ControllerConfig, GameController};
use tui_memory::records::{BestRecords, JsonFileStore, KeyValueStore};
use tui_memory::types::{BestRecord, GameAction, GridSize, COMPLETION_NOTICE_MS, MATCH_RESOLVE_MS};

fn solve(game: &mut GameController<JsonFileStore>) {
    let snap = game.snapshot();
    let mut slots = vec![Vec::new(); snap.pairs_total as usize];
    for (i, card) in snap.cards.iter().enumerate() {
        slots[card.face.id as usize].push(i);
    }
    for slot in slots {
        game.apply_action(GameAction::Flip(slot[0]));
        game.tick(100);
        game.apply_action(GameAction::Flip(slot[1]));
        game.tick(MATCH_RESOLVE_MS);
    }
    game.tick(COMPLETION_NOTICE_MS);
}

#[test]
fn record_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    let config = ControllerConfig {
        grid_size: GridSize::try_from(2u8).unwrap(),
        ..ControllerConfig::default()
    };

    let mut first = GameController::with_seed(config, BestRecords::new(JsonFileStore::open(&path)), 1);
    solve(&mut first);
    let notice = first.take_notice().unwrap();
    assert!(notice.improved);

    let raw = std::fs::read_to_string(&path).unwrap();
    let file: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let stored: serde_json::Value =
        serde_json::from_str(file["memory_best_2"].as_str().unwrap()).unwrap();
    assert_eq!(stored["moves"], serde_json::json!(2));

    let second = GameController::with_seed(config, BestRecords::new(JsonFileStore::open(&path)), 2);
    assert_eq!(
        second.best(),
        Some(BestRecord::new(notice.time_tenths, notice.moves))
    );
    assert!(second.records().store().get("memory_best_4").is_none());
}

#[test]
fn corrupt_file_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(&path, "{ not json").unwrap();

    let config = ControllerConfig {
        grid_size: GridSize::try_from(2u8).unwrap(),
        ..ControllerConfig::default()
    };
    let mut game = GameController::with_seed(config, BestRecords::new(JsonFileStore::open(&path)), 3);
    assert_eq!(game.best(), None);

    solve(&mut game);
    assert!(game.take_notice().unwrap().improved);
    assert!(JsonFileStore::open(&path).get("memory_best_2").is_some());
}
