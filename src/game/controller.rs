//! Turn controller.
//!
//! `Game` owns one match: the players, the four card zones, the phase,
//! and the RNG that shuffles every round. It is an ordinary value. Many
//! games can run side by side, in sequence or on separate threads.
//!
//! ## Turn pipeline
//!
//! A `play` runs these steps as one unit. Callers only see the state
//! before and after:
//!
//! 1. the played card leaves the hand and is resolved against the table,
//!    and the table-clear bonus is checked if it captured,
//! 2. the top card of the deck is drawn and resolved the same way,
//! 3. the table-clear bonus is checked again (at most one per turn),
//! 4. both players' scores are recomputed and the Go/Stop gate is tested,
//! 5. the turn passes, or the round ends.
//!
//! Special moves replace steps 1 and 2 when they apply:
//!
//! - **bomb**: three of a month in hand and one on the table. All three
//!   are played and take the fourth, then the turn draws as usual.
//! - **seolsa**: the played card pairs with the table and the draw is the
//!   same month. All three stay on the table as a stack.
//! - **ttadak**: the played card meets a table pair and the draw is the
//!   same month. All four are captured.
//! - **jjok**: the played card lands on the table and the draw takes it.
//!
//! A capture choice (with `MultiMatch::PlayerChooses`) suspends the
//! pipeline after step 1 or 2. `choose_capture` resumes it.
//!
//! ## Failure semantics
//!
//! Every command checks its preconditions before touching state. A
//! command that returns `Err` leaves the game exactly as it was.

use im::Vector;
use smallvec::SmallVec;

use super::command::{Command, GoStopDecision};
use super::event::{EventRecord, GameEvent, NagariReason, RoundOutcome};
use super::layout::RoundLayout;
use super::phase::{Phase, Step};
use super::policy::MatchPolicy;
use super::replay::Replay;
use super::snapshot::{GameSnapshot, HandView, PendingDecision, PlayerView};
use crate::cards::{Card, CardId, Deck, Month};
use crate::core::{
    ConfigError, DecisionViolation, GameError, GameRng, MoveViolation, PlayerId, PlayerMap,
    RuleConfig, PLAYER_COUNT,
};
use crate::rules::{
    breakdown, settle, CaptureKind, MatchEngine, Resolution, ScoreBreakdown, Settlement,
    StopContext, Tally,
};
use crate::zones::ZoneManager;

/// Per-player state that outlives a single command.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerState {
    pub name: String,
    /// Score of the captured pile this round.
    pub round_score: u32,
    /// Points banked across rounds.
    pub total_score: u32,
    /// Gos declared this round.
    pub go_count: u32,
    /// Round score at the last Go (0 if none). The gate reopens only above it.
    pub last_go_score: u32,
    /// Triple, quad, and bomb captures this round.
    pub bonus_captures: u32,
    /// Table clears this round.
    pub clears: u32,
    /// Months shaken this round.
    pub shaken: Vec<Month>,
    pub bombs: u32,
    /// Draw-only turns left from bombs.
    pub dummies: u32,
    pub seolsas: u32,
    pub jjoks: u32,
    pub ttadaks: u32,
    pub rounds_won: u32,
}

impl PlayerState {
    fn new(name: String) -> Self {
        Self {
            name,
            round_score: 0,
            total_score: 0,
            go_count: 0,
            last_go_score: 0,
            bonus_captures: 0,
            clears: 0,
            shaken: Vec::new(),
            bombs: 0,
            dummies: 0,
            seolsas: 0,
            jjoks: 0,
            ttadaks: 0,
            rounds_won: 0,
        }
    }

    /// Shakes plus bombs, each adding one to the settlement multiplier.
    #[must_use]
    pub fn shakes(&self) -> u32 {
        (self.shaken.len() as u32).saturating_add(self.bombs)
    }

    fn reset_round(&mut self) {
        self.round_score = 0;
        self.go_count = 0;
        self.last_go_score = 0;
        self.bonus_captures = 0;
        self.clears = 0;
        self.shaken.clear();
        self.bombs = 0;
        self.dummies = 0;
        self.seolsas = 0;
        self.jjoks = 0;
        self.ttadaks = 0;
    }
}

/// Where the card waiting on a capture choice came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Played,
    Drawn,
}

#[derive(Clone, Debug)]
struct PendingChoice {
    source: Source,
    incoming: Card,
    options: SmallVec<[Card; 2]>,
}

/// Three cards of one month left together on the table.
///
/// `owner` is the player whose seolsa made it, `None` if it was dealt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Stack {
    month: Month,
    owner: Option<PlayerId>,
}

/// Result of a successful command.
#[derive(Clone, Debug)]
pub struct Transition {
    /// Events in the order they happened.
    pub events: Vec<GameEvent>,
    /// State after the command, seen by the acting player.
    pub snapshot: GameSnapshot,
}

/// One two-player match.
///
/// ```
/// use gostop::core::RuleConfig;
/// use gostop::game::{Command, Game, Phase};
///
/// let mut game = Game::new(RuleConfig::default(), 7).unwrap();
/// game.deal().unwrap();
///
/// let Phase::AwaitingPlay(leader) = game.phase() else { unreachable!() };
/// let Some(&play) = game.legal_commands(leader).first() else { unreachable!() };
/// assert!(matches!(play, Command::Play { .. }));
///
/// let transition = game.apply(play).unwrap();
/// assert!(!transition.events.is_empty());
/// assert_eq!(transition.snapshot.card_count(), 48);
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    config: RuleConfig,
    engine: MatchEngine,
    rng: GameRng,
    zones: ZoneManager,
    players: PlayerMap<PlayerState>,
    phase: Phase,
    current: PlayerId,
    leader: PlayerId,
    round: u32,
    turn: u32,
    stakes: u32,
    deck_exhausted: bool,
    /// A table clear was already counted this turn.
    turn_cleared: bool,
    stacks: SmallVec<[Stack; 4]>,
    pending_choice: Option<PendingChoice>,
    last_outcome: Option<RoundOutcome>,
    layout: Option<RoundLayout>,
    history: Vector<EventRecord>,
    commands: Vector<Command>,
}

impl Game {
    /// A game in `Ready`, all cards in an unshuffled deck.
    pub fn new(config: RuleConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, GameRng::new(seed), ZoneManager::new(Deck::canonical())))
    }

    /// A game whose first round starts from an explicit layout.
    ///
    /// Later rounds are shuffled from `layout.seed`.
    pub fn from_layout(config: RuleConfig, layout: RoundLayout) -> Result<Self, ConfigError> {
        config.validate()?;
        let zones = layout.build()?;
        if zones.hand(layout.leader).is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{} leads with an empty hand",
                layout.leader
            )));
        }

        let mut game = Self::assemble(config, GameRng::new(layout.seed), zones);
        game.leader = layout.leader;
        game.current = layout.leader;
        game.round = 1;
        game.phase = Phase::AwaitingPlay(layout.leader);
        for player in PlayerId::all(PLAYER_COUNT) {
            game.players[player].round_score = game.score_breakdown(player).total;
        }
        let table = game.zones.table().to_vec();
        let mut events = vec![GameEvent::RoundDealt {
            round: 1,
            leader: layout.leader,
            table,
        }];
        game.open_round(&mut events);
        game.record(events);
        game.layout = Some(layout);
        Ok(game)
    }

    fn assemble(config: RuleConfig, rng: GameRng, zones: ZoneManager) -> Self {
        Self {
            engine: MatchEngine::new(config.multi_match),
            config,
            rng,
            zones,
            players: PlayerMap::new(PLAYER_COUNT, |p| PlayerState::new(p.to_string())),
            phase: Phase::Ready,
            current: PlayerId::new(0),
            leader: PlayerId::new(0),
            round: 0,
            turn: 0,
            stakes: 1,
            deck_exhausted: false,
            turn_cleared: false,
            stacks: SmallVec::new(),
            pending_choice: None,
            last_outcome: None,
            layout: None,
            history: Vector::new(),
            commands: Vector::new(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Player whose turn it is (the last one to act once a round ends).
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Player who led the current round.
    #[must_use]
    pub fn leader(&self) -> PlayerId {
        self.leader
    }

    /// Rounds dealt so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Plays made this round.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Settlement multiplier carried from rounds without a Stop.
    #[must_use]
    pub fn stakes(&self) -> u32 {
        self.stakes
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub fn zones(&self) -> &ZoneManager {
        &self.zones
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerState> {
        &self.players
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Months currently stacked on the table by a seolsa or the deal.
    #[must_use]
    pub fn stacked_months(&self) -> Vec<Month> {
        self.stacks.iter().map(|s| s.month).collect()
    }

    /// Every event since construction.
    #[must_use]
    pub fn history(&self) -> &Vector<EventRecord> {
        &self.history
    }

    /// Every successful command since construction.
    #[must_use]
    pub fn commands(&self) -> &Vector<Command> {
        &self.commands
    }

    /// Score of a player's captured pile with every scoring line.
    #[must_use]
    pub fn score_breakdown(&self, player: PlayerId) -> ScoreBreakdown {
        breakdown(self.zones.captured(player), &self.config.scoring)
    }

    /// Replay log that rebuilds this game.
    #[must_use]
    pub fn replay(&self) -> Replay {
        Replay {
            config: self.config.clone(),
            seed: self.rng.seed(),
            layout: self.layout.clone(),
            commands: self.commands.iter().copied().collect(),
        }
    }

    // === Commands ===

    /// Apply any command.
    pub fn apply(&mut self, command: Command) -> Result<Transition, GameError> {
        match command {
            Command::Deal => self.deal(),
            Command::Play { player, card } => self.play(player, card),
            Command::Shake { player, month } => self.shake(player, month),
            Command::PlayDummy { player } => self.play_dummy(player),
            Command::DeclareGoStop { player, decision } => self.declare_go_stop(player, decision),
            Command::ChooseCapture { player, card } => self.choose_capture(player, card),
            Command::EndGame => self.end_game(),
        }
    }

    /// Shuffle a fresh deck and deal a round.
    ///
    /// The previous round's winner leads; after a round without a Stop
    /// the previous leader leads again.
    pub fn deal(&mut self) -> Result<Transition, GameError> {
        if !matches!(self.phase, Phase::Ready | Phase::RoundOver) {
            return Err(GameError::InvalidPhase {
                action: "deal",
                phase: self.phase,
            });
        }

        let mut rng = self.rng.clone();
        let mut zones = ZoneManager::new(Deck::generate(&mut rng));
        zones.deal(self.config.hand_size, self.config.table_size)?;

        let leader = self
            .last_outcome
            .as_ref()
            .and_then(RoundOutcome::winner)
            .unwrap_or(self.leader);

        self.rng = rng;
        self.zones = zones;
        self.leader = leader;
        self.current = leader;
        self.round += 1;
        self.turn = 0;
        self.deck_exhausted = false;
        self.turn_cleared = false;
        self.pending_choice = None;
        for (_, state) in self.players.iter_mut() {
            state.reset_round();
        }
        self.phase = Phase::AwaitingPlay(leader);

        log::info!("round {} dealt, {} leads", self.round, leader);
        let mut events = vec![GameEvent::RoundDealt {
            round: self.round,
            leader,
            table: self.zones.table().to_vec(),
        }];
        self.open_round(&mut events);
        Ok(self.commit(Command::Deal, events))
    }

    /// Play a hand card, then draw, then score.
    pub fn play(&mut self, player: PlayerId, card: CardId) -> Result<Transition, GameError> {
        self.check_turn(player, "play")?;
        let played = self
            .zones
            .hand(player)
            .iter()
            .copied()
            .find(|c| c.id == card)
            .ok_or(MoveViolation::CardNotInHand { player, card })?;

        let month = played.month;
        let on_table = self.zones.table_matches(month).count();
        let in_hand = self.month_in_hand(player, month);
        let draw_matches = self.zones.deck().peek().is_some_and(|c| c.month == month);
        let special = &self.config.special;
        let bomb = special.bomb && in_hand == 3 && on_table == 1;
        let seolsa = special.seolsa && draw_matches && on_table == 1;
        let ttadak = special.ttadak && draw_matches && on_table == 2;

        self.turn += 1;
        self.turn_cleared = false;
        let mut events = vec![GameEvent::CardPlayed { player, card: played }];

        if bomb {
            self.bomb(player, month, &mut events);
        } else if seolsa || ttadak {
            self.zones.take_from_hand(player, card);
            let drawn = self.zones.draw()?;
            events.push(GameEvent::CardDrawn { player, card: drawn });
            if seolsa {
                self.seolsa(player, played, drawn, &mut events);
            } else {
                self.ttadak(player, played, drawn, &mut events);
            }
            self.finish_turn(player, &mut events);
        } else {
            self.zones.take_from_hand(player, card);
            log::trace!("{}: {}", player, Step::ResolvingCapture);
            match self.resolve(player, played, Source::Played, &mut events) {
                Resolution::ChoiceRequired { .. } => {}
                Resolution::Placed(placed) => self.draw_step(player, Some(placed), &mut events),
                Resolution::Captured { .. } => {
                    self.check_table_clear(player, &mut events);
                    self.draw_step(player, None, &mut events);
                }
            }
        }
        Ok(self.commit(Command::Play { player, card }, events))
    }

    /// Reveal three cards of a month that has no card on the table.
    ///
    /// The turn does not pass; the player still plays a card afterwards.
    pub fn shake(&mut self, player: PlayerId, month: Month) -> Result<Transition, GameError> {
        self.check_turn(player, "shake")?;
        if !self.can_shake(player, month) {
            return Err(MoveViolation::CannotShake { player, month }.into());
        }

        let cards: Vec<Card> = self
            .zones
            .hand(player)
            .iter()
            .filter(|c| c.month == month)
            .copied()
            .collect();
        self.players[player].shaken.push(month);
        log::debug!("{} shakes {}", player, month);
        let events = vec![GameEvent::Shaken { player, month, cards }];
        Ok(self.commit(Command::Shake { player, month }, events))
    }

    /// Spend a dummy card from a bomb: draw and resolve without playing.
    pub fn play_dummy(&mut self, player: PlayerId) -> Result<Transition, GameError> {
        self.check_turn(player, "play dummy")?;
        if self.players[player].dummies == 0 {
            return Err(MoveViolation::NoDummies { player }.into());
        }

        self.players[player].dummies -= 1;
        self.turn += 1;
        self.turn_cleared = false;
        let mut events = vec![GameEvent::DummyPlayed { player }];
        self.draw_step(player, None, &mut events);
        Ok(self.commit(Command::PlayDummy { player }, events))
    }

    /// Pick one of the two offered capture candidates.
    pub fn choose_capture(
        &mut self,
        player: PlayerId,
        card: CardId,
    ) -> Result<Transition, GameError> {
        let phase = self.phase;
        let expected = match phase {
            Phase::AwaitingCaptureChoice(p) => p,
            _ => return Err(GameError::InvalidPhase { action: "choose capture", phase }),
        };
        if player != expected {
            return Err(DecisionViolation::NotDecider { player, expected }.into());
        }
        let Some(pending) = self.pending_choice.clone() else {
            return Err(GameError::InvalidPhase { action: "choose capture", phase });
        };

        let (table, pile) = self.zones.table_and_pile(player);
        let resolution = self
            .engine
            .complete_choice(pending.incoming, &pending.options, card, table, pile)?;
        self.pending_choice = None;

        let mut events = Vec::new();
        if let Resolution::Captured { kind, cards } = resolution {
            self.record_capture(player, kind, &cards, &mut events);
        }
        match pending.source {
            Source::Played => {
                self.check_table_clear(player, &mut events);
                self.draw_step(player, None, &mut events);
            }
            Source::Drawn => self.finish_turn(player, &mut events),
        }
        Ok(self.commit(Command::ChooseCapture { player, card }, events))
    }

    /// Answer the Go/Stop gate.
    pub fn declare_go_stop(
        &mut self,
        player: PlayerId,
        decision: GoStopDecision,
    ) -> Result<Transition, GameError> {
        let expected = match self.phase {
            Phase::AwaitingGoStop(p) => p,
            phase => return Err(GameError::InvalidPhase { action: "declare go/stop", phase }),
        };
        if player != expected {
            return Err(DecisionViolation::NotDecider { player, expected }.into());
        }

        let mut events = Vec::new();
        match decision {
            GoStopDecision::Go => {
                let state = &mut self.players[player];
                state.go_count += 1;
                state.last_go_score = state.round_score;
                log::info!("{} goes ({}) at {}", player, state.go_count, state.round_score);
                events.push(GameEvent::WentGo {
                    player,
                    go_count: state.go_count,
                    score: state.round_score,
                });
                self.hand_off(player, &mut events);
            }
            GoStopDecision::Stop => {
                events.push(GameEvent::Stopped {
                    player,
                    score: self.players[player].round_score,
                });
                let settlement = self.settlement_for(player);
                let state = &mut self.players[player];
                state.total_score = state.total_score.saturating_add(settlement.points);
                state.rounds_won += 1;
                self.stakes = 1;
                self.end_round(RoundOutcome::Stopped(settlement), &mut events);
            }
        }
        Ok(self.commit(Command::DeclareGoStop { player, decision }, events))
    }

    /// Finish the game after a round.
    pub fn end_game(&mut self) -> Result<Transition, GameError> {
        if self.phase != Phase::RoundOver {
            return Err(GameError::InvalidPhase {
                action: "end game",
                phase: self.phase,
            });
        }
        self.phase = Phase::GameOver;

        let totals = PlayerMap::new(PLAYER_COUNT, |p| self.players[p].total_score);
        log::info!("game over after {} rounds", self.round);
        Ok(self.commit(Command::EndGame, vec![GameEvent::GameEnded { totals }]))
    }

    /// Deal the next round or end the game, as `policy` decides.
    pub fn conclude_round<P: MatchPolicy + ?Sized>(
        &mut self,
        policy: &P,
    ) -> Result<Transition, GameError> {
        if self.phase != Phase::RoundOver {
            return Err(GameError::InvalidPhase {
                action: "conclude round",
                phase: self.phase,
            });
        }
        if policy.is_over(self) {
            self.end_game()
        } else {
            self.deal()
        }
    }

    // === Queries ===

    /// Every command `player` may issue now.
    ///
    /// Plays come first, then shakes, then a dummy play. `Deal` and
    /// `EndGame` are not bound to a player and are listed for anyone.
    #[must_use]
    pub fn legal_commands(&self, player: PlayerId) -> Vec<Command> {
        match self.phase {
            Phase::Ready => vec![Command::Deal],
            Phase::RoundOver => vec![Command::Deal, Command::EndGame],
            Phase::AwaitingPlay(p) if p == player => {
                let plays = self
                    .zones
                    .hand(player)
                    .iter()
                    .map(|c| Command::Play { player, card: c.id });
                let shakes = Month::ALL
                    .into_iter()
                    .filter(|&month| self.can_shake(player, month))
                    .map(|month| Command::Shake { player, month });
                let dummy = (self.players[player].dummies > 0)
                    .then_some(Command::PlayDummy { player });
                plays.chain(shakes).chain(dummy).collect()
            }
            Phase::AwaitingCaptureChoice(p) if p == player => self
                .pending_choice
                .iter()
                .flat_map(|choice| choice.options.iter())
                .map(|c| Command::ChooseCapture { player, card: c.id })
                .collect(),
            Phase::AwaitingGoStop(p) if p == player => [GoStopDecision::Go, GoStopDecision::Stop]
                .into_iter()
                .map(|decision| Command::DeclareGoStop { player, decision })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Commands available to whoever must act next.
    #[must_use]
    pub fn next_commands(&self) -> Vec<Command> {
        self.legal_commands(self.phase.actor().unwrap_or(self.current))
    }

    /// The open decision gate, if any.
    #[must_use]
    pub fn pending_decision(&self) -> Option<PendingDecision> {
        match self.phase {
            Phase::AwaitingGoStop(player) => Some(PendingDecision::GoStop {
                player,
                score: self.players[player].round_score,
            }),
            Phase::AwaitingCaptureChoice(player) => {
                self.pending_choice
                    .as_ref()
                    .map(|choice| PendingDecision::CaptureChoice {
                        player,
                        incoming: choice.incoming,
                        options: choice.options.to_vec(),
                    })
            }
            _ => None,
        }
    }

    /// State as seen by `viewer`. The other player's hand is a count.
    #[must_use]
    pub fn snapshot(&self, viewer: PlayerId) -> GameSnapshot {
        let deciding = if self.phase.is_decision() { self.phase.actor() } else { None };
        let players = PlayerId::all(PLAYER_COUNT)
            .map(|id| {
                let state = &self.players[id];
                let hand = self.zones.hand(id);
                PlayerView {
                    id,
                    name: state.name.clone(),
                    hand: if id == viewer {
                        HandView::Visible(hand.to_vec())
                    } else {
                        HandView::Hidden { count: hand.len() }
                    },
                    captured: self.zones.captured(id).to_vec(),
                    round_score: state.round_score,
                    total_score: state.total_score,
                    go_count: state.go_count,
                    shakes: state.shakes(),
                    dummies: state.dummies,
                    decision_pending: deciding == Some(id),
                }
            })
            .collect();

        GameSnapshot {
            viewer,
            phase: self.phase,
            current_player: self.current,
            round: self.round,
            turn: self.turn,
            table: self.zones.table().to_vec(),
            deck_count: self.zones.deck().len(),
            players,
            pending: self.pending_decision(),
            stakes: self.stakes,
            last_outcome: self.last_outcome.clone(),
        }
    }

    // === Turn pipeline ===

    fn check_turn(&self, player: PlayerId, action: &'static str) -> Result<(), GameError> {
        let current = match self.phase {
            Phase::AwaitingPlay(p) => p,
            phase => return Err(GameError::InvalidPhase { action, phase }),
        };
        if player != current {
            return Err(MoveViolation::NotYourTurn { player, current }.into());
        }
        Ok(())
    }

    fn month_in_hand(&self, player: PlayerId, month: Month) -> usize {
        self.zones.hand(player).iter().filter(|c| c.month == month).count()
    }

    fn can_shake(&self, player: PlayerId, month: Month) -> bool {
        self.config.special.shake
            && self.month_in_hand(player, month) >= 3
            && self.zones.table_matches(month).next().is_none()
            && !self.players[player].shaken.contains(&month)
    }

    /// Stacks, chongtong, and four-on-table checks right after a deal.
    fn open_round(&mut self, events: &mut Vec<GameEvent>) {
        self.stacks.clear();
        if self.config.special.seolsa {
            for month in Month::ALL {
                if self.zones.table_matches(month).count() == 3 {
                    self.stacks.push(Stack { month, owner: None });
                }
            }
        }

        if self.config.special.chongtong {
            for player in [self.leader, self.leader.opponent()] {
                let full = Month::ALL
                    .into_iter()
                    .find(|&month| self.month_in_hand(player, month) == 4);
                if let Some(month) = full {
                    self.chongtong(player, month, events);
                    return;
                }
            }
        }

        if self.config.special.four_on_table_nagari
            && Month::ALL
                .into_iter()
                .any(|month| self.zones.table_matches(month).count() == 4)
        {
            self.nagari(NagariReason::FourOfAMonthOnTable, events);
        }
    }

    fn chongtong(&mut self, player: PlayerId, month: Month, events: &mut Vec<GameEvent>) {
        let points = self.config.special.chongtong_points.saturating_mul(self.stakes);
        let state = &mut self.players[player];
        state.total_score = state.total_score.saturating_add(points);
        state.rounds_won += 1;
        self.stakes = 1;
        events.push(GameEvent::Chongtong { player, month });
        self.end_round(RoundOutcome::Chongtong { player, month, points }, events);
    }

    fn bomb(&mut self, player: PlayerId, month: Month, events: &mut Vec<GameEvent>) {
        let bombed = self.zones.take_month_from_hand(player, month);
        let (table, pile) = self.zones.table_and_pile(player);
        let resolution = MatchEngine::capture_together(&bombed, CaptureKind::Bomb, table, pile);
        if let Resolution::Captured { kind, cards } = resolution {
            self.record_capture(player, kind, &cards, events);
        }

        let state = &mut self.players[player];
        state.bombs += 1;
        state.dummies = state.dummies.saturating_add(self.config.special.bomb_dummies);
        log::debug!("{} bombs {}", player, month);
        self.steal(player.opponent(), player, events);

        self.check_table_clear(player, events);
        self.draw_step(player, None, events);
    }

    fn seolsa(&mut self, player: PlayerId, played: Card, drawn: Card, events: &mut Vec<GameEvent>) {
        for card in [played, drawn] {
            self.zones.place_on_table(card);
            events.push(GameEvent::PlacedOnTable { player, card });
        }
        self.stacks.push(Stack {
            month: played.month,
            owner: Some(player),
        });
        self.players[player].seolsas += 1;
        log::debug!("{} stacked {}", player, played.month);
        events.push(GameEvent::Seolsa {
            player,
            month: played.month,
        });
        self.steal(player, player.opponent(), events);
    }

    fn ttadak(&mut self, player: PlayerId, played: Card, drawn: Card, events: &mut Vec<GameEvent>) {
        let (table, pile) = self.zones.table_and_pile(player);
        let resolution =
            MatchEngine::capture_together(&[played, drawn], CaptureKind::Quad, table, pile);
        if let Resolution::Captured { kind, cards } = resolution {
            self.record_capture(player, kind, &cards, events);
        }
        self.players[player].ttadaks += 1;
        events.push(GameEvent::Ttadak { player });
        self.steal(player.opponent(), player, events);
    }

    /// Resolve one incoming card and report what happened.
    fn resolve(
        &mut self,
        player: PlayerId,
        incoming: Card,
        source: Source,
        events: &mut Vec<GameEvent>,
    ) -> Resolution {
        let (table, pile) = self.zones.table_and_pile(player);
        let resolution = self.engine.resolve(incoming, table, pile);
        match &resolution {
            Resolution::Placed(card) => {
                events.push(GameEvent::PlacedOnTable { player, card: *card });
            }
            Resolution::Captured { kind, cards } => {
                self.record_capture(player, *kind, cards, events);
            }
            Resolution::ChoiceRequired { incoming, options } => {
                events.push(GameEvent::CaptureChoiceRequired {
                    player,
                    incoming: *incoming,
                    options: options.to_vec(),
                });
                self.pending_choice = Some(PendingChoice {
                    source,
                    incoming: *incoming,
                    options: options.clone(),
                });
                self.phase = Phase::AwaitingCaptureChoice(player);
            }
        }
        resolution
    }

    fn record_capture(
        &mut self,
        player: PlayerId,
        kind: CaptureKind,
        cards: &[Card],
        events: &mut Vec<GameEvent>,
    ) {
        if kind.is_bonus() {
            self.players[player].bonus_captures += 1;
        }
        events.push(GameEvent::Captured {
            player,
            kind,
            cards: cards.to_vec(),
        });

        let Some(month) = cards.first().map(|c| c.month) else {
            return;
        };
        let Some(pos) = self.stacks.iter().position(|s| s.month == month) else {
            return;
        };
        if self.zones.table_matches(month).next().is_some() {
            return;
        }
        let stack = self.stacks.remove(pos);
        let own = stack.owner == Some(player);
        log::debug!("{} ate the {} stack", player, month);
        events.push(GameEvent::SeolsaEaten { player, month, own });
        let steals = if own { 2 } else { 1 };
        for _ in 0..steals {
            self.steal(player.opponent(), player, events);
        }
    }

    /// Draw and resolve the top card. `placed` is the card this turn put
    /// on the table, if any, so a draw that takes it counts as jjok.
    fn draw_step(&mut self, player: PlayerId, placed: Option<Card>, events: &mut Vec<GameEvent>) {
        log::trace!("{}: {}", player, Step::AwaitingDraw);
        match self.zones.draw() {
            Ok(card) => {
                events.push(GameEvent::CardDrawn { player, card });
                log::trace!("{}: {}", player, Step::ResolvingDraw);
                let resolution = self.resolve(player, card, Source::Drawn, events);
                if matches!(resolution, Resolution::ChoiceRequired { .. }) {
                    return;
                }
                let jjok = placed.is_some_and(|p| resolution.captured().contains(&p));
                if jjok && self.config.special.jjok {
                    self.players[player].jjoks += 1;
                    events.push(GameEvent::Jjok { player });
                    self.steal(player.opponent(), player, events);
                }
            }
            Err(err) => {
                log::debug!("{} could not draw: {}", player, err);
                self.deck_exhausted = true;
                events.push(GameEvent::DeckExhausted);
            }
        }
        self.finish_turn(player, events);
    }

    fn finish_turn(&mut self, player: PlayerId, events: &mut Vec<GameEvent>) {
        self.check_table_clear(player, events);

        log::trace!("{}: {}", player, Step::ScoreCheck);
        self.refresh_scores(events);

        let state = &self.players[player];
        let score = state.round_score;
        if score >= self.config.win_threshold && score > state.last_go_score {
            log::debug!("{} reached {} and must declare go or stop", player, score);
            events.push(GameEvent::GoStopRequired { player, score });
            self.phase = Phase::AwaitingGoStop(player);
            return;
        }
        self.hand_off(player, events);
    }

    fn check_table_clear(&mut self, player: PlayerId, events: &mut Vec<GameEvent>) {
        if self.turn_cleared || !self.zones.table().is_empty() {
            return;
        }
        let cards_left = !self.zones.deck().is_empty()
            || PlayerId::all(PLAYER_COUNT).any(|p| !self.zones.hand(p).is_empty());
        if !cards_left {
            return;
        }

        self.turn_cleared = true;
        self.players[player].clears += 1;
        log::debug!("{} cleared the table", player);
        events.push(GameEvent::TableCleared { player });

        if self.config.steal_junk_on_clear {
            self.steal(player.opponent(), player, events);
        }
    }

    /// Move one junk between piles if `from` has any.
    fn steal(&mut self, from: PlayerId, to: PlayerId, events: &mut Vec<GameEvent>) {
        if let Some(card) = self.zones.steal_junk(from, to) {
            log::debug!("{} moved from {} to {}", card, from, to);
            events.push(GameEvent::JunkStolen { from, to, card });
        }
    }

    fn refresh_scores(&mut self, events: &mut Vec<GameEvent>) {
        for player in PlayerId::all(PLAYER_COUNT) {
            let score = self.score_breakdown(player).total;
            if score != self.players[player].round_score {
                self.players[player].round_score = score;
                events.push(GameEvent::ScoreChanged { player, score });
            }
        }
    }

    fn hand_off(&mut self, player: PlayerId, events: &mut Vec<GameEvent>) {
        let next = player.opponent();
        if self.deck_exhausted {
            self.nagari(NagariReason::DeckExhausted, events);
        } else if self.zones.hand(next).is_empty() && self.players[next].dummies == 0 {
            self.nagari(NagariReason::HandsExhausted, events);
        } else {
            log::debug!("turn passes to {}", next);
            self.current = next;
            self.phase = Phase::AwaitingPlay(next);
        }
    }

    /// Penalty checks read the loser's pile with the cup as an animal,
    /// not the reading that maximizes their own score.
    fn settlement_for(&self, winner: PlayerId) -> Settlement {
        let loser = winner.opponent();
        let winner_score = self.score_breakdown(winner);
        let ctx = StopContext {
            winner,
            winner_score: &winner_score,
            go_count: self.players[winner].go_count,
            loser_tally: Tally::of(self.zones.captured(loser)),
            loser_score: self.score_breakdown(loser).total,
            loser_went_go: self.players[loser].go_count > 0,
            shakes: self.players[winner].shakes(),
            stakes: self.stakes,
        };
        settle(&ctx, &self.config.settlement)
    }

    fn nagari(&mut self, reason: NagariReason, events: &mut Vec<GameEvent>) {
        if self.config.settlement.nagari_doubles_stakes {
            self.stakes = self.stakes.saturating_mul(2);
        }
        self.end_round(
            RoundOutcome::Nagari {
                reason,
                stakes: self.stakes,
            },
            events,
        );
    }

    fn end_round(&mut self, outcome: RoundOutcome, events: &mut Vec<GameEvent>) {
        self.phase = Phase::RoundOver;
        self.pending_choice = None;
        match &outcome {
            RoundOutcome::Stopped(settlement) => {
                log::info!("round {} won by {}: {}", self.round, settlement.winner, settlement)
            }
            RoundOutcome::Chongtong { player, month, points } => log::info!(
                "round {} won by {} with chongtong in {}: {}",
                self.round,
                player,
                month,
                points
            ),
            RoundOutcome::Nagari { reason, stakes } => {
                log::info!("round {} is nagari ({:?}), stakes now x{}", self.round, reason, stakes)
            }
        }
        events.push(GameEvent::RoundEnded {
            round: self.round,
            outcome: outcome.clone(),
        });
        self.last_outcome = Some(outcome);
    }

    // === Bookkeeping ===

    fn record(&mut self, events: Vec<GameEvent>) -> Vec<GameEvent> {
        for event in &events {
            let seq = self.history.len() as u32;
            self.history.push_back(EventRecord {
                round: self.round,
                turn: self.turn,
                seq,
                event: event.clone(),
            });
        }
        events
    }

    fn commit(&mut self, command: Command, events: Vec<GameEvent>) -> Transition {
        self.commands.push_back(command);
        let events = self.record(events);
        self.zones.audit();

        let viewer = command
            .player()
            .or_else(|| self.phase.actor())
            .unwrap_or(self.current);
        Transition {
            events,
            snapshot: self.snapshot(viewer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{catalogue, CardKind, Month};
    use crate::core::MultiMatch;

    fn p0() -> PlayerId {
        PlayerId::new(0)
    }

    fn p1() -> PlayerId {
        PlayerId::new(1)
    }

    fn cards(month: Month) -> [Card; 4] {
        let m = catalogue::month(month);
        [m[0], m[1], m[2], m[3]]
    }

    #[test]
    fn test_new_game_is_ready() {
        let game = Game::new(RuleConfig::default(), 1).unwrap();
        assert_eq!(game.phase(), Phase::Ready);
        assert_eq!(game.zones().counts().deck, 48);
        assert_eq!(game.legal_commands(p0()), vec![Command::Deal]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RuleConfig::default().with_deal(25, 0);
        assert!(Game::new(config, 1).is_err());
    }

    #[test]
    fn test_deal_starts_round() {
        let mut game = Game::new(RuleConfig::default(), 1).unwrap();
        let transition = game.deal().unwrap();

        assert_eq!(game.phase(), Phase::AwaitingPlay(p0()));
        assert_eq!(game.round(), 1);
        assert!(matches!(transition.events[0], GameEvent::RoundDealt { round: 1, .. }));
        assert_eq!(transition.snapshot.deck_count, 20);
        assert_eq!(transition.snapshot.table.len(), 8);
    }

    #[test]
    fn test_deal_rejected_mid_round() {
        let mut game = Game::new(RuleConfig::default(), 1).unwrap();
        game.deal().unwrap();
        let err = game.deal().unwrap_err();
        assert!(matches!(err, GameError::InvalidPhase { action: "deal", .. }));
    }

    #[test]
    fn test_wrong_player_rejected() {
        let mut game = Game::new(RuleConfig::default(), 1).unwrap();
        game.deal().unwrap();
        let card = game.zones().hand(p1())[0].id;

        let err = game.play(p1(), card).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidMove(MoveViolation::NotYourTurn { player: p1(), current: p0() })
        );
        assert_eq!(game.turn(), 0);
    }

    #[test]
    fn test_choice_on_played_card_then_draw() {
        let [nov_bright, nov_double, nov_junk, nov_junk_b] = cards(Month::November);
        let [jan_bright, jan_ribbon, ..] = cards(Month::January);
        let [mar_bright, ..] = cards(Month::March);

        let layout = RoundLayout::new()
            .hand(p0(), [nov_bright, jan_bright])
            .hand(p1(), [mar_bright])
            .table([nov_double, nov_junk])
            .deck([jan_ribbon])
            .rest_in_deck();
        let config = RuleConfig::default().with_multi_match(MultiMatch::PlayerChooses);
        let mut game = Game::from_layout(config, layout).unwrap();

        let transition = game.play(p0(), nov_bright.id).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingCaptureChoice(p0()));
        assert!(matches!(
            transition.events.last(),
            Some(GameEvent::CaptureChoiceRequired { .. })
        ));
        assert_eq!(game.zones().table().len(), 3);
        assert_eq!(
            game.legal_commands(p0()),
            vec![
                Command::ChooseCapture { player: p0(), card: nov_double.id },
                Command::ChooseCapture { player: p0(), card: nov_junk.id },
            ]
        );

        let err = game.choose_capture(p0(), nov_junk_b.id).unwrap_err();
        assert!(matches!(err, GameError::InvalidDecision(DecisionViolation::NotAnOption { .. })));

        game.choose_capture(p0(), nov_double.id).unwrap();

        assert_eq!(game.zones().captured(p0()), &[nov_bright, nov_double]);
        // The drawn January ribbon went to the table.
        assert_eq!(game.zones().table(), &[nov_junk, jan_ribbon]);
        assert_eq!(game.phase(), Phase::AwaitingPlay(p1()));
    }

    #[test]
    fn test_go_raises_the_gate() {
        // Player 0 holds 6 points of ribbons; one more ribbon capture makes 7.
        let ribbons: Vec<Card> = [
            Month::January,
            Month::April,
            Month::May,
            Month::June,
            Month::September,
        ]
        .into_iter()
        .flat_map(|m| catalogue::find(m, CardKind::Ribbon))
        .collect();
        let [_, oct_ribbon, oct_junk, _] = cards(Month::October);
        let [dec_bright, ..] = cards(Month::December);
        let [mar_bright, ..] = cards(Month::March);
        let [aug_bright, ..] = cards(Month::August);

        let layout = RoundLayout::new()
            .captured(p0(), ribbons)
            .hand(p0(), [oct_ribbon, dec_bright])
            .hand(p1(), [mar_bright])
            .table([oct_junk])
            .deck([aug_bright])
            .rest_in_deck();
        let mut game = Game::from_layout(RuleConfig::default(), layout).unwrap();
        assert_eq!(game.player(p0()).round_score, 1);

        game.play(p0(), oct_ribbon.id).unwrap();
        // 6 ribbons = 2 plus the blue set = 3
        assert_eq!(game.player(p0()).round_score, 5);
        assert_eq!(game.phase(), Phase::AwaitingPlay(p1()));

        let config = RuleConfig::default().with_win_threshold(5);
        let layout = game.layout.clone().unwrap();
        let mut game = Game::from_layout(config, layout).unwrap();
        game.play(p0(), oct_ribbon.id).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingGoStop(p0()));

        game.declare_go_stop(p0(), GoStopDecision::Go).unwrap();
        assert_eq!(game.player(p0()).go_count, 1);
        assert_eq!(game.player(p0()).last_go_score, 5);
        assert_eq!(game.phase(), Phase::AwaitingPlay(p1()));
    }

    #[test]
    fn test_replay_log_matches_commands() {
        let mut game = Game::new(RuleConfig::default(), 3).unwrap();
        game.deal().unwrap();
        let play = game.next_commands()[0];
        game.apply(play).unwrap();

        let replay = game.replay();
        assert_eq!(replay.commands, vec![Command::Deal, play]);
        assert_eq!(replay.seed, 3);
    }

    #[test]
    fn test_loser_cup_counts_as_animal_for_pibak() {
        use crate::core::SettlementRules;

        let junk = |months: &[Month]| -> Vec<Card> {
            months
                .iter()
                .flat_map(|&m| catalogue::find(m, CardKind::Junk))
                .collect()
        };
        let winner_pile = junk(&[
            Month::January,
            Month::February,
            Month::March,
            Month::April,
            Month::May,
        ]);
        let mut loser_pile = junk(&[Month::June, Month::July, Month::August, Month::October]);
        let [sep_cup, ..] = cards(Month::September);
        loser_pile.push(sep_cup);
        let [nov_bright, ..] = cards(Month::November);

        let layout = RoundLayout::new()
            .captured(p0(), winner_pile)
            .captured(p1(), loser_pile)
            .hand(p0(), [nov_bright])
            .rest_in_deck();
        let config = RuleConfig::default().with_settlement(SettlementRules {
            pibak_max_junk: 9,
            ..SettlementRules::default()
        });
        let game = Game::from_layout(config, layout).unwrap();
        // Read as double junk the cup scores the loser a point.
        assert!(game.score_breakdown(p1()).cup_as_junk);

        let settlement = game.settlement_for(p0());

        assert_eq!(settlement.penalties.as_slice(), &[crate::rules::Penalty::Pibak]);
        assert_eq!(settlement.points, 2);
    }
}
