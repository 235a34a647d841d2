//! Command/snapshot protocol integration tests.
//!
//! Covers what an external driver sees: redacted snapshots, the JSON
//! shape of those snapshots, event history, and replay logs.

use gostop::core::{GameRng, PlayerId, RuleConfig};
use gostop::game::{Command, Game, GameEvent, HandView, Phase, Replay};
use serde_json::json;

fn p0() -> PlayerId {
    PlayerId::new(0)
}

fn p1() -> PlayerId {
    PlayerId::new(1)
}

/// Drive a game with commands picked by a separate seeded RNG.
fn play_out(seed: u64, rounds: u32) -> Game {
    let mut game = Game::new(RuleConfig::default(), seed).unwrap();
    let mut picker = GameRng::new(seed ^ 0x5eed);

    while game.round() < rounds || game.phase().in_round() {
        let commands: Vec<Command> = game
            .next_commands()
            .into_iter()
            .filter(|c| *c != Command::EndGame)
            .collect();
        let Some(&command) = picker.choose(&commands) else {
            break;
        };
        game.apply(command).unwrap();
    }
    game
}

// =============================================================================
// Snapshot Tests
// =============================================================================

#[test]
fn test_snapshot_redacts_opponent_hand() {
    let mut game = Game::new(RuleConfig::default(), 8).unwrap();
    game.deal().unwrap();

    let mine = game.snapshot(p0());
    assert_eq!(
        mine.player(p0()).unwrap().hand,
        HandView::Visible(game.zones().hand(p0()).to_vec())
    );
    assert_eq!(mine.player(p1()).unwrap().hand, HandView::Hidden { count: 10 });

    let theirs = game.snapshot(p1());
    assert_eq!(theirs.player(p0()).unwrap().hand, HandView::Hidden { count: 10 });
    assert_eq!(theirs.table, mine.table);
}

#[test]
fn test_snapshot_json_shape() {
    let mut game = Game::new(RuleConfig::default(), 8).unwrap();
    game.deal().unwrap();

    let value = serde_json::to_value(game.snapshot(p0())).unwrap();

    assert_eq!(value["phase"], json!({ "AwaitingPlay": 0 }));
    assert_eq!(value["current_player"], json!(0));
    assert_eq!(value["deck_count"], json!(20));
    assert_eq!(value["players"][1]["hand"], json!({ "Hidden": { "count": 10 } }));
    assert_eq!(value["players"][0]["hand"]["Visible"].as_array().unwrap().len(), 10);
    assert_eq!(value["table"].as_array().unwrap().len(), 8);
    assert_eq!(value["pending"], json!(null));
    assert_eq!(value["stakes"], json!(1));

    // Opponent card identities never appear.
    let hidden: Vec<u8> = game.zones().hand(p1()).iter().map(|c| c.id.raw()).collect();
    let visible: Vec<u64> = value["players"][0]["hand"]["Visible"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert!(hidden.iter().all(|id| !visible.contains(&u64::from(*id))));
}

#[test]
fn test_transition_snapshot_is_actor_view() {
    let mut game = Game::new(RuleConfig::default(), 12).unwrap();
    game.deal().unwrap();
    let card = game.zones().hand(p0())[0].id;

    let transition = game.play(p0(), card).unwrap();

    assert_eq!(transition.snapshot.viewer, p0());
    assert!(matches!(transition.snapshot.player(p1()).unwrap().hand, HandView::Hidden { .. }));
    assert_eq!(transition.snapshot.card_count(), 48);
    assert_eq!(transition.snapshot.turn, 1);
}

// =============================================================================
// History Tests
// =============================================================================

#[test]
fn test_history_matches_transitions() {
    let mut game = Game::new(RuleConfig::default(), 21).unwrap();
    let mut emitted: Vec<GameEvent> = Vec::new();

    emitted.extend(game.deal().unwrap().events);
    for _ in 0..4 {
        if !game.phase().in_round() {
            break;
        }
        let command = game.next_commands()[0];
        emitted.extend(game.apply(command).unwrap().events);
    }

    let recorded: Vec<GameEvent> = game.history().iter().map(|r| r.event.clone()).collect();
    assert_eq!(recorded, emitted);

    for (i, record) in game.history().iter().enumerate() {
        assert_eq!(record.seq as usize, i);
        assert_eq!(record.round, 1);
    }
}

#[test]
fn test_games_are_independent() {
    let mut a = Game::new(RuleConfig::default(), 1).unwrap();
    let mut b = a.clone();
    a.deal().unwrap();

    assert_eq!(b.phase(), Phase::Ready);
    b.deal().unwrap();
    assert_eq!(a.zones().table(), b.zones().table());
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_same_seed_same_deal() {
    let mut a = Game::new(RuleConfig::default(), 404).unwrap();
    let mut b = Game::new(RuleConfig::default(), 404).unwrap();
    let mut c = Game::new(RuleConfig::default(), 405).unwrap();
    a.deal().unwrap();
    b.deal().unwrap();
    c.deal().unwrap();

    assert_eq!(a.snapshot(p0()), b.snapshot(p0()));
    assert_ne!(a.zones().hand(p0()), c.zones().hand(p0()));
}

#[test]
fn test_replay_rebuilds_game() {
    let game = play_out(2718, 3);
    assert!(game.round() >= 3);

    let rebuilt = game.replay().run().unwrap();

    assert_eq!(rebuilt.history(), game.history());
    assert_eq!(rebuilt.snapshot(p1()), game.snapshot(p1()));
    assert_eq!(rebuilt.player(p0()).total_score, game.player(p0()).total_score);
}

#[test]
fn test_replay_bytes_roundtrip() {
    let game = play_out(99, 2);
    let replay = game.replay();

    let bytes = replay.to_bytes().unwrap();
    let decoded = Replay::from_bytes(&bytes).unwrap();

    assert_eq!(decoded, replay);
    assert_eq!(decoded.run().unwrap().history(), game.history());
}

#[test]
fn test_replay_of_scripted_game() {
    use gostop::cards::{catalogue, Month};
    use gostop::game::RoundLayout;

    let jan = catalogue::month(Month::January);
    let layout = RoundLayout::new()
        .hand(p0(), [jan[0], jan[2]])
        .hand(p1(), [jan[3]])
        .rest_in_deck()
        .seed(5);
    let mut game = Game::from_layout(RuleConfig::default(), layout).unwrap();
    game.play(p0(), jan[0].id).unwrap();
    game.play(p1(), jan[3].id).unwrap();

    let rebuilt = game.replay().run().unwrap();
    assert_eq!(rebuilt.snapshot(p0()), game.snapshot(p0()));
    assert_eq!(rebuilt.seed(), 5);
}

#[test]
fn test_config_from_toml_drives_game() {
    let config = RuleConfig::from_toml_str(
        r#"
        hand_size = 7
        table_size = 6
        win_threshold = 3
        "#,
    )
    .unwrap();
    let mut game = Game::new(config, 3).unwrap();
    let transition = game.deal().unwrap();

    assert_eq!(transition.snapshot.deck_count, 48 - 7 * 2 - 6);
    assert_eq!(game.zones().hand(p1()).len(), 7);
}
