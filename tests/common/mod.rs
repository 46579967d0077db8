#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use frontier::{
    Board, CardType, Game, IntersectionId, PlayerAgent, PlayerHandle, PlayerId, Resource,
    ResourceSet, TileId, TradeOffer,
};

/// One observed agent callback, tagged with the player it went to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FirstSettlement,
    SecondSettlement,
    Robber,
    ReturnCards(u32),
    ConsiderTrade(TradeOffer),
    Error(String),
    Message(String),
}

/// Shared call log so tests can assert on cross-player ordering.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<(PlayerId, Call)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(PlayerId, Call)> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, player: PlayerId, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(id, call)| *id == player && matches(call))
            .count()
    }

    fn record(&self, player: PlayerId, call: Call) {
        self.calls.borrow_mut().push((player, call));
    }
}

/// Agent that replays queued decisions and records every callback. Running
/// out of script panics, which fails the test instead of livelocking the
/// orchestrator's retry loop.
pub struct ScriptedAgent {
    id: PlayerId,
    recorder: Recorder,
    first: VecDeque<(IntersectionId, IntersectionId)>,
    second: VecDeque<(IntersectionId, IntersectionId)>,
    robber: VecDeque<TileId>,
    discards: VecDeque<ResourceSet>,
    trades: VecDeque<bool>,
}

impl ScriptedAgent {
    pub fn new(id: PlayerId, recorder: &Recorder) -> Self {
        Self {
            id,
            recorder: recorder.clone(),
            first: VecDeque::new(),
            second: VecDeque::new(),
            robber: VecDeque::new(),
            discards: VecDeque::new(),
            trades: VecDeque::new(),
        }
    }

    pub fn first(mut self, site: IntersectionId, road_end: IntersectionId) -> Self {
        self.first.push_back((site, road_end));
        self
    }

    pub fn second(mut self, site: IntersectionId, road_end: IntersectionId) -> Self {
        self.second.push_back((site, road_end));
        self
    }

    pub fn robber(mut self, tile: TileId) -> Self {
        self.robber.push_back(tile);
        self
    }

    pub fn discard(mut self, selection: ResourceSet) -> Self {
        self.discards.push_back(selection);
        self
    }

    pub fn trade(mut self, accept: bool) -> Self {
        self.trades.push_back(accept);
        self
    }

    pub fn handle(self) -> PlayerHandle {
        let id = self.id;
        PlayerHandle::new(id, self)
    }
}

impl PlayerAgent for ScriptedAgent {
    fn place_first_settlement(&mut self) -> (IntersectionId, IntersectionId) {
        self.recorder.record(self.id, Call::FirstSettlement);
        self.first
            .pop_front()
            .unwrap_or_else(|| panic!("player {} has no scripted first settlement left", self.id))
    }

    fn place_second_settlement(&mut self) -> (IntersectionId, IntersectionId) {
        self.recorder.record(self.id, Call::SecondSettlement);
        self.second
            .pop_front()
            .unwrap_or_else(|| panic!("player {} has no scripted second settlement left", self.id))
    }

    fn place_robber(&mut self) -> TileId {
        self.recorder.record(self.id, Call::Robber);
        self.robber
            .pop_front()
            .unwrap_or_else(|| panic!("player {} has no scripted robber tile left", self.id))
    }

    fn return_cards(&mut self, amount: u32) -> ResourceSet {
        self.recorder.record(self.id, Call::ReturnCards(amount));
        self.discards
            .pop_front()
            .unwrap_or_else(|| panic!("player {} has no scripted discard left", self.id))
    }

    fn consider_trade(&mut self, offer: &TradeOffer) -> bool {
        self.recorder.record(self.id, Call::ConsiderTrade(*offer));
        self.trades
            .pop_front()
            .unwrap_or_else(|| panic!("player {} has no scripted trade reply left", self.id))
    }

    fn error(&mut self, message: &str) {
        self.recorder.record(self.id, Call::Error(message.to_string()));
    }

    fn message(&mut self, text: &str) {
        self.recorder.record(self.id, Call::Message(text.to_string()));
    }
}

pub fn game_with(players: Vec<PlayerHandle>) -> Game {
    Game::with_seed(Board::beginner_tiles(), players, 42).expect("valid game")
}

/// Three players on the beginner board with non-conflicting setup picks:
/// first settlements 0/1/2, second settlements 14/13/12.
pub fn three_player_game(recorder: &Recorder) -> Game {
    game_with(vec![
        ScriptedAgent::new(0, recorder).first(0, 6).second(14, 20).handle(),
        ScriptedAgent::new(1, recorder).first(1, 7).second(13, 19).handle(),
        ScriptedAgent::new(2, recorder).first(2, 8).second(12, 18).handle(),
    ])
}

pub fn started_three_player_game(recorder: &Recorder) -> Game {
    let mut game = three_player_game(recorder);
    game.start().expect("setup completes");
    game
}

pub fn roll_and_end(game: &mut Game, player: PlayerId, number: u8) {
    game.roll(player, number).expect("roll accepted");
    game.end_turn(player).expect("end turn accepted");
}

pub fn set(pairs: &[(Resource, u32)]) -> ResourceSet {
    let mut set = ResourceSet::zero();
    for &(resource, amount) in pairs {
        set.add(resource, amount);
    }
    set
}

pub fn cards_of(game: &Game, player: PlayerId) -> BTreeMap<CardType, u32> {
    game.players()
        .into_iter()
        .find(|summary| summary.id == player)
        .expect("player in roster")
        .cards
}
