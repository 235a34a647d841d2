//! Go/Stop gate and settlement integration tests.

use gostop::cards::{catalogue, Card, CardKind, Month};
use gostop::core::{DecisionViolation, GameError, PlayerId, RuleConfig, SettlementRules};
use gostop::game::{
    Command, Game, GameEvent, GoStopDecision, NagariReason, PendingDecision, Phase, RoundLayout,
    RoundLimit, RoundOutcome,
};
use gostop::rules::Penalty;

fn p0() -> PlayerId {
    PlayerId::new(0)
}

fn p1() -> PlayerId {
    PlayerId::new(1)
}

fn month(m: Month) -> [Card; 4] {
    let cards = catalogue::month(m);
    [cards[0], cards[1], cards[2], cards[3]]
}

fn ribbon(m: Month) -> Card {
    catalogue::find(m, CardKind::Ribbon).next().unwrap()
}

fn animal(m: Month) -> Card {
    catalogue::find(m, CardKind::Animal).next().unwrap()
}

fn junk(m: Month) -> Vec<Card> {
    catalogue::find(m, CardKind::Junk).collect()
}

/// Player 0 sits on 4 points (five ribbons with the red-poem set) and two
/// brights. Capturing the November bright makes three brights: 7 points.
///
/// Player 1 holds five animals including the February and April birds.
/// Capturing the August bird adds a sixth animal and Godori: 7 points.
fn race_layout() -> RoundLayout {
    let [jan_bright, ..] = month(Month::January);
    let [mar_bright, ..] = month(Month::March);
    let [_, aug_bird, aug_junk, _] = month(Month::August);
    let [nov_bright, _, nov_junk, _] = month(Month::November);
    let [_, _, dec_ribbon, _] = month(Month::December);
    let [_, _, sep_junk, _] = month(Month::September);

    RoundLayout::new()
        .captured(
            p0(),
            [
                jan_bright,
                mar_bright,
                ribbon(Month::January),
                ribbon(Month::February),
                ribbon(Month::March),
                ribbon(Month::April),
                ribbon(Month::May),
            ],
        )
        .captured(
            p1(),
            [
                animal(Month::February),
                animal(Month::April),
                animal(Month::May),
                animal(Month::June),
                animal(Month::July),
            ],
        )
        .hand(p0(), [nov_bright, sep_junk])
        .hand(p1(), [aug_bird])
        .table([nov_junk, aug_junk])
        .deck([dec_ribbon, ribbon(Month::October)])
        .rest_in_deck()
}

fn nov_bright() -> Card {
    month(Month::November)[0]
}

fn race() -> Game {
    Game::from_layout(RuleConfig::default(), race_layout()).unwrap()
}

// =============================================================================
// Gate Tests
// =============================================================================

#[test]
fn test_gate_opens_at_threshold() {
    let mut game = race();
    assert_eq!(game.player(p0()).round_score, 4);

    let transition = game.play(p0(), nov_bright().id).unwrap();

    assert_eq!(game.player(p0()).round_score, 7);
    assert_eq!(game.phase(), Phase::AwaitingGoStop(p0()));
    assert_eq!(
        transition.events.last(),
        Some(&GameEvent::GoStopRequired { player: p0(), score: 7 })
    );
    assert_eq!(
        game.pending_decision(),
        Some(PendingDecision::GoStop { player: p0(), score: 7 })
    );

    let snapshot = transition.snapshot;
    assert!(snapshot.player(p0()).unwrap().decision_pending);
    assert!(!snapshot.player(p1()).unwrap().decision_pending);
}

#[test]
fn test_gate_blocks_play_and_other_player() {
    let mut game = race();
    game.play(p0(), nov_bright().id).unwrap();

    let sep_junk = month(Month::September)[2];
    assert!(matches!(
        game.play(p0(), sep_junk.id),
        Err(GameError::InvalidPhase { action: "play", .. })
    ));
    let err = game.declare_go_stop(p1(), GoStopDecision::Stop).unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidDecision(DecisionViolation::NotDecider {
            player: p1(),
            expected: p0(),
        })
    );
    assert_eq!(
        game.legal_commands(p0()),
        vec![
            Command::DeclareGoStop { player: p0(), decision: GoStopDecision::Go },
            Command::DeclareGoStop { player: p0(), decision: GoStopDecision::Stop },
        ]
    );
    assert!(game.legal_commands(p1()).is_empty());
}

// =============================================================================
// Settlement Tests
// =============================================================================

/// Stop at 7 with three brights against a loser holding none.
#[test]
fn test_stop_banks_with_gwangbak() {
    let mut game = race();
    game.play(p0(), nov_bright().id).unwrap();

    let transition = game.declare_go_stop(p0(), GoStopDecision::Stop).unwrap();

    let Some(RoundOutcome::Stopped(settlement)) = game.last_outcome() else {
        panic!("Expected a stopped round, got {:?}", game.last_outcome());
    };
    assert_eq!(settlement.winner, p0());
    assert_eq!(settlement.base, 7);
    assert_eq!(settlement.penalties.as_slice(), &[Penalty::Gwangbak]);
    assert_eq!(settlement.formula(), "7 x Gwangbak(x2)");
    assert_eq!(settlement.points, 14);

    assert_eq!(game.player(p0()).total_score, 14);
    assert_eq!(game.player(p0()).rounds_won, 1);
    assert_eq!(game.phase(), Phase::RoundOver);
    assert!(matches!(transition.events[0], GameEvent::Stopped { score: 7, .. }));
    assert!(matches!(transition.events.last(), Some(GameEvent::RoundEnded { round: 1, .. })));
}

#[test]
fn test_stop_without_penalties() {
    let config = RuleConfig::default().with_settlement(SettlementRules {
        penalties: false,
        ..SettlementRules::default()
    });
    let mut game = Game::from_layout(config, race_layout()).unwrap();
    game.play(p0(), nov_bright().id).unwrap();
    game.declare_go_stop(p0(), GoStopDecision::Stop).unwrap();

    assert_eq!(game.player(p0()).total_score, 7);
}

/// A loser who scored 7 on their own escapes gwangbak.
#[test]
fn test_loser_with_seven_points_is_jabak() {
    let mut pile: Vec<Card> = [
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::October,
    ]
    .into_iter()
    .flat_map(junk)
    .collect();
    pile.push(month(Month::November)[1]);
    pile.extend(
        [Month::February, Month::April, Month::May, Month::June, Month::July].map(animal),
    );
    let layout = race_layout().captured(p1(), pile);
    let mut game = Game::from_layout(RuleConfig::default(), layout).unwrap();
    // 16 junk units and five animals
    assert_eq!(game.player(p1()).round_score, 8);

    game.play(p0(), nov_bright().id).unwrap();
    game.declare_go_stop(p0(), GoStopDecision::Stop).unwrap();

    let Some(RoundOutcome::Stopped(settlement)) = game.last_outcome() else {
        panic!("Expected a stopped round");
    };
    assert!(settlement.is_jabak);
    assert!(settlement.penalties.is_empty());
    assert_eq!(settlement.points, 7);
}

/// Player 0 goes, player 1 overtakes and stops: player 0 is gobak.
#[test]
fn test_go_then_overtaken_is_gobak() {
    let mut game = race();
    game.play(p0(), nov_bright().id).unwrap();

    let transition = game.declare_go_stop(p0(), GoStopDecision::Go).unwrap();
    assert_eq!(
        transition.events[0],
        GameEvent::WentGo { player: p0(), go_count: 1, score: 7 }
    );
    assert_eq!(game.phase(), Phase::AwaitingPlay(p1()));

    game.play(p1(), month(Month::August)[1].id).unwrap();
    assert_eq!(game.player(p1()).round_score, 7);
    assert_eq!(game.phase(), Phase::AwaitingGoStop(p1()));

    game.declare_go_stop(p1(), GoStopDecision::Stop).unwrap();

    let Some(RoundOutcome::Stopped(settlement)) = game.last_outcome() else {
        panic!("Expected a stopped round");
    };
    assert_eq!(settlement.winner, p1());
    assert_eq!(settlement.penalties.as_slice(), &[Penalty::Gobak]);
    assert_eq!(settlement.points, 14);
    assert_eq!(game.player(p0()).total_score, 0);
}

/// The next round is led by the previous winner.
#[test]
fn test_winner_leads_next_round() {
    let mut game = race();
    game.play(p0(), nov_bright().id).unwrap();
    game.declare_go_stop(p0(), GoStopDecision::Go).unwrap();
    game.play(p1(), month(Month::August)[1].id).unwrap();
    game.declare_go_stop(p1(), GoStopDecision::Stop).unwrap();

    game.deal().unwrap();

    assert_eq!(game.round(), 2);
    assert_eq!(game.leader(), p1());
    assert_eq!(game.phase(), Phase::AwaitingPlay(p1()));
    assert_eq!(game.player(p0()).go_count, 0);
    assert_eq!(game.player(p1()).total_score, 14);
    assert_eq!(game.stakes(), 1);
}

// =============================================================================
// Nagari Tests
// =============================================================================

fn nagari_game(config: RuleConfig) -> Game {
    let [jan_bright, ..] = month(Month::January);
    Game::from_layout(config, RoundLayout::new().hand(p0(), [jan_bright]).rest_in_deck()).unwrap()
}

#[test]
fn test_nagari_doubles_stakes() {
    let mut game = nagari_game(RuleConfig::default());
    game.play(p0(), month(Month::January)[0].id).unwrap();

    assert_eq!(game.stakes(), 2);
    assert_eq!(
        game.last_outcome(),
        Some(&RoundOutcome::Nagari { reason: NagariReason::HandsExhausted, stakes: 2 })
    );
    assert_eq!(game.player(p0()).total_score, 0);

    game.deal().unwrap();
    assert_eq!(game.leader(), p0());
    assert_eq!(game.stakes(), 2);
}

#[test]
fn test_nagari_without_doubling() {
    let config = RuleConfig::default().with_settlement(SettlementRules {
        nagari_doubles_stakes: false,
        ..SettlementRules::default()
    });
    let mut game = nagari_game(config);
    game.play(p0(), month(Month::January)[0].id).unwrap();

    assert_eq!(game.stakes(), 1);
}

// =============================================================================
// Match Length Tests
// =============================================================================

#[test]
fn test_end_game_reports_totals() {
    let mut game = race();
    game.play(p0(), nov_bright().id).unwrap();
    game.declare_go_stop(p0(), GoStopDecision::Stop).unwrap();

    let transition = game.conclude_round(&RoundLimit(1)).unwrap();

    assert_eq!(game.phase(), Phase::GameOver);
    let GameEvent::GameEnded { totals } = &transition.events[0] else {
        panic!("Expected GameEnded");
    };
    assert_eq!(totals[p0()], 14);
    assert_eq!(totals[p1()], 0);
    assert!(game.next_commands().is_empty());
    assert!(matches!(game.deal(), Err(GameError::InvalidPhase { .. })));
}
