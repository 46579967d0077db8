use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::board::{Board, BoardError, BoardSnapshot, Building, Tile};
use crate::game::agent::{PlayerAgent, PlayerHandle, TradeOffer};
use crate::game::ledger::{Ledger, LedgerError};
use crate::game::resources::{
    COST_CITY, COST_DEVELOPMENT, COST_ROAD, COST_SETTLEMENT, ResourceSet,
};
use crate::types::{CardType, DevelopmentCard, IntersectionId, PieceKind, PlayerId, Resource};

/// Lifecycle of a game, doubling as the status snapshot callers observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    PreSetup,
    Setup,
    Active { whose_turn: PlayerId, rolled: bool },
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("a game needs 3 or 4 players, got {0}")]
    RosterSize(usize),
    #[error("duplicate player id {0}")]
    DuplicatePlayer(PlayerId),
    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),
    #[error("the game has already started")]
    AlreadyStarted,
    #[error("the game is not in its active phase")]
    NotActive,
    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("this turn's dice have already been rolled")]
    AlreadyRolled,
    #[error("a roll must be between 2 and 12, got {0}")]
    RollOutOfRange(u8),
    #[error("maritime trades exchange exactly 4 cards, got {0}")]
    InvalidRate(u32),
    #[error("an offer must name a counterparty other than yourself and some cards")]
    InvalidOffer,
    #[error("discard selection must total exactly {required} cards")]
    InvalidDiscard { required: u32 },
    #[error("intersection {0} is already occupied")]
    IntersectionOccupied(IntersectionId),
    #[error("intersection {0} has an occupied neighbor")]
    AdjacentIntersectionOccupied(IntersectionId),
    #[error("intersections {a} and {b} are not adjacent")]
    NotAdjacent { a: IntersectionId, b: IntersectionId },
    #[error("the edge {a}-{b} already carries a road")]
    EdgeOccupied { a: IntersectionId, b: IntersectionId },
    #[error("the edge {a}-{b} does not touch your network")]
    NotConnected { a: IntersectionId, b: IntersectionId },
    #[error("you have no settlement at intersection {0}")]
    NotYourSettlement(IntersectionId),
    #[error("no {0} pieces left")]
    OutOfPieces(PieceKind),
    #[error("the bank has no development cards left")]
    NoDevelopmentCards,
}

struct PlayerSlot {
    id: PlayerId,
    ledger: Ledger,
    agent: Box<dyn PlayerAgent>,
}

/// Per-player snapshot: the identifier plus a copy of their card counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub cards: BTreeMap<CardType, u32>,
}

/// Aggregate serializable snapshot, the persistence/transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub board: BoardSnapshot,
    pub bank: BTreeMap<CardType, u32>,
    pub players: Vec<PlayerSummary>,
}

/// The rules-enforcing orchestrator: owns the board, the bank, one ledger
/// per player, and the phase/turn state machine, and mediates every mutation
/// through rule checks. All checks precede all mutations, so a failed call
/// leaves state untouched.
pub struct Game {
    pub id: Uuid,
    board: Board,
    bank: Ledger,
    players: Vec<PlayerSlot>,
    status: GameStatus,
    rng: StdRng,
}

impl Game {
    pub fn new(tiles: Vec<Tile>, players: Vec<PlayerHandle>) -> Result<Self, GameError> {
        Self::with_seed(tiles, players, rand::thread_rng().r#gen())
    }

    /// Like [`Game::new`] with a fixed seed for the internal randomness
    /// (development-card draws), for reproducible games.
    pub fn with_seed(
        tiles: Vec<Tile>,
        players: Vec<PlayerHandle>,
        seed: u64,
    ) -> Result<Self, GameError> {
        if !(3..=4).contains(&players.len()) {
            return Err(GameError::RosterSize(players.len()));
        }
        for (index, player) in players.iter().enumerate() {
            if players[..index].iter().any(|other| other.id == player.id) {
                return Err(GameError::DuplicatePlayer(player.id));
            }
        }
        let board = Board::new(tiles)?;
        let players = players
            .into_iter()
            .map(|handle| PlayerSlot {
                id: handle.id,
                ledger: Ledger::player(),
                agent: handle.agent,
            })
            .collect();
        Ok(Self {
            id: Uuid::new_v4(),
            board,
            bank: Ledger::bank(),
            players,
            status: GameStatus::PreSetup,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// A uniform two-die sum, for callers that drive [`Game::roll`] with
    /// real dice.
    pub fn dice_roll() -> u8 {
        let mut rng = rand::thread_rng();
        rng.gen_range(1..=6) + rng.gen_range(1..=6)
    }

    /// Runs the setup protocol: a first settlement and road per player in
    /// roster order, then a second pass in reverse order, each decision
    /// validated and re-requested through the agent's `error` hook until it
    /// is legal. Second settlements collect one card per adjacent producing
    /// tile. Completes into the active phase with the first player to move.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::PreSetup {
            return Err(GameError::AlreadyStarted);
        }
        self.status = GameStatus::Setup;
        info!(game = %self.id, players = self.players.len(), "setup started");
        for index in 0..self.players.len() {
            self.setup_place(index, false)?;
        }
        for index in (0..self.players.len()).rev() {
            self.setup_place(index, true)?;
        }
        let first = self.players[0].id;
        self.status = GameStatus::Active {
            whose_turn: first,
            rolled: false,
        };
        info!(game = %self.id, whose_turn = first, "setup complete");
        Ok(())
    }

    fn setup_place(&mut self, index: usize, second: bool) -> Result<(), GameError> {
        let player = self.players[index].id;
        loop {
            let (site, road_end) = {
                let agent = &mut self.players[index].agent;
                if second {
                    agent.place_second_settlement()
                } else {
                    agent.place_first_settlement()
                }
            };
            match self.check_setup_pair(site, road_end) {
                Ok(()) => {
                    self.board.place_settlement(site, player)?;
                    self.board.place_road(site, road_end, player)?;
                    self.players[index].ledger.remove(CardType::Settlement, 1)?;
                    self.players[index].ledger.remove(CardType::Road, 1)?;
                    debug!(player, site, road_end, second, "setup placement");
                    if second {
                        self.award_starting_resources(index, site)?;
                    }
                    return Ok(());
                }
                Err(err) => {
                    warn!(player, site, road_end, %err, "setup placement rejected");
                    self.players[index].agent.error(&err.to_string());
                }
            }
        }
    }

    fn check_setup_pair(
        &self,
        site: IntersectionId,
        road_end: IntersectionId,
    ) -> Result<(), GameError> {
        let neighbors = Board::intersection_neighbors(site)?;
        Board::intersection_neighbors(road_end)?;
        if !neighbors.contains(&road_end) {
            return Err(GameError::NotAdjacent {
                a: site,
                b: road_end,
            });
        }
        if self.board.get_intersection(site)?.is_some() {
            return Err(GameError::IntersectionOccupied(site));
        }
        for neighbor in neighbors {
            if self.board.get_intersection(neighbor)?.is_some() {
                return Err(GameError::AdjacentIntersectionOccupied(site));
            }
        }
        Ok(())
    }

    fn award_starting_resources(
        &mut self,
        index: usize,
        site: IntersectionId,
    ) -> Result<(), GameError> {
        let produced: Vec<Resource> = self
            .board
            .tiles()
            .iter()
            .filter(|tile| {
                Board::tile_neighbors(tile.id)
                    .map(|ring| ring.contains(&site))
                    .unwrap_or(false)
            })
            .filter_map(|tile| tile.resource)
            .collect();
        for resource in produced {
            let card = CardType::from(resource);
            if self.bank.get(card)? >= 1 {
                self.bank.remove(card, 1)?;
                self.players[index].ledger.add(card, 1)?;
            } else {
                debug!(player = self.players[index].id, %card, "bank empty, starting card skipped");
            }
        }
        Ok(())
    }

    /// Records a dice roll for the active player and applies its effects:
    /// anything but a 7 distributes resources from producing tiles, a 7
    /// moves the robber and collects discards from oversized hands.
    ///
    /// The number is supplied rather than generated so that callers control
    /// the dice; see [`Game::dice_roll`].
    pub fn roll(&mut self, player: PlayerId, number: u8) -> Result<(), GameError> {
        let index = self.player_index(player)?;
        let (whose_turn, rolled) = self.require_active()?;
        if player != whose_turn {
            return Err(GameError::NotYourTurn(player));
        }
        if rolled {
            return Err(GameError::AlreadyRolled);
        }
        if !(2..=12).contains(&number) {
            return Err(GameError::RollOutOfRange(number));
        }
        self.status = GameStatus::Active {
            whose_turn,
            rolled: true,
        };
        debug!(player, number, "roll");
        if number == 7 {
            self.run_robber(index);
            self.run_discards()?;
        } else {
            self.distribute(number)?;
        }
        Ok(())
    }

    fn distribute(&mut self, number: u8) -> Result<(), GameError> {
        let robber = self.board.robber();
        let tiles: Vec<Tile> = self
            .board
            .tiles()
            .iter()
            .filter(|tile| tile.number == Some(number) && tile.id != robber)
            .copied()
            .collect();
        for tile in tiles {
            let Some(resource) = tile.resource else {
                continue;
            };
            let mut payouts: Vec<(usize, u32)> = Vec::new();
            for corner in Board::tile_neighbors(tile.id)? {
                if let Some(building) = self.board.get_intersection(corner)? {
                    let amount = match building {
                        Building::Settlement { .. } => 1,
                        Building::City { .. } => 2,
                    };
                    let owner = self.player_index(building.owner())?;
                    payouts.push((owner, amount));
                }
            }
            let demand: u32 = payouts.iter().map(|(_, amount)| amount).sum();
            if demand == 0 {
                continue;
            }
            let card = CardType::from(resource);
            if self.bank.get(card)? < demand {
                // All-or-nothing per tile: an oversubscribed resource is
                // withheld from everyone and announced.
                let text = format!(
                    "the bank cannot cover {demand} {resource} for this roll; \
                     tile {} produces nothing",
                    tile.id
                );
                warn!(tile = tile.id, %resource, demand, "oversubscribed roll");
                self.broadcast(&text);
                continue;
            }
            for (owner, amount) in payouts {
                self.bank.remove(card, amount)?;
                self.players[owner].ledger.add(card, amount)?;
                debug!(player = self.players[owner].id, %resource, amount, "distributed");
            }
        }
        Ok(())
    }

    fn run_robber(&mut self, index: usize) {
        let player = self.players[index].id;
        loop {
            let tile = self.players[index].agent.place_robber();
            match self.board.place_robber(tile) {
                Ok(()) => {
                    debug!(player, tile, "robber moved");
                    return;
                }
                Err(err) => {
                    warn!(player, tile, %err, "robber placement rejected");
                    self.players[index].agent.error(&err.to_string());
                }
            }
        }
    }

    fn run_discards(&mut self) -> Result<(), GameError> {
        for index in 0..self.players.len() {
            let held = self.players[index].ledger.resource_total();
            if held <= 7 {
                continue;
            }
            let required = held / 2;
            loop {
                let selection = self.players[index].agent.return_cards(required);
                match self.check_discard(index, required, &selection) {
                    Ok(()) => {
                        self.players[index].ledger.debit(&selection)?;
                        self.bank.credit(&selection)?;
                        debug!(player = self.players[index].id, %selection, "discarded");
                        break;
                    }
                    Err(err) => {
                        warn!(player = self.players[index].id, %err, "discard rejected");
                        self.players[index].agent.error(&err.to_string());
                    }
                }
            }
        }
        Ok(())
    }

    fn check_discard(
        &self,
        index: usize,
        required: u32,
        selection: &ResourceSet,
    ) -> Result<(), GameError> {
        if selection.total() != required {
            return Err(GameError::InvalidDiscard { required });
        }
        self.players[index].ledger.check_covers(selection)?;
        Ok(())
    }

    /// Proposes a trade to another player and blocks on their decision.
    /// Resolves `false` on decline; an accept the offeree cannot fund is
    /// rejected back to them and re-requested.
    pub fn offer_trade(
        &mut self,
        offerer: PlayerId,
        offeree: PlayerId,
        offer: TradeOffer,
    ) -> Result<bool, GameError> {
        let offerer_index = self.player_index(offerer)?;
        let offeree_index = self.player_index(offeree)?;
        let (whose_turn, _) = self.require_active()?;
        if offerer != whose_turn && offeree != whose_turn {
            return Err(GameError::NotYourTurn(offerer));
        }
        if offerer == offeree || (offer.offer.is_empty() && offer.ask.is_empty()) {
            return Err(GameError::InvalidOffer);
        }
        self.players[offerer_index].ledger.check_covers(&offer.offer)?;
        loop {
            let accepted = self.players[offeree_index].agent.consider_trade(&offer);
            if !accepted {
                debug!(offerer, offeree, "trade declined");
                return Ok(false);
            }
            if let Err(err) = self.players[offeree_index].ledger.check_covers(&offer.ask) {
                warn!(offerer, offeree, %err, "acceptance unfunded");
                self.players[offeree_index].agent.error(&err.to_string());
                continue;
            }
            self.players[offerer_index].ledger.debit(&offer.offer)?;
            self.players[offeree_index].ledger.debit(&offer.ask)?;
            self.players[offerer_index].ledger.credit(&offer.ask)?;
            self.players[offeree_index].ledger.credit(&offer.offer)?;
            debug!(offerer, offeree, give = %offer.offer, ask = %offer.ask, "trade settled");
            return Ok(true);
        }
    }

    /// Trades `give_amount` cards of one type against one card of another
    /// with the bank. Only the flat 4:1 rate is supported.
    pub fn maritime_trade(
        &mut self,
        player: PlayerId,
        give_amount: u32,
        give: Resource,
        get: Resource,
    ) -> Result<(), GameError> {
        let index = self.player_index(player)?;
        self.require_turn(player)?;
        if give_amount != 4 {
            return Err(GameError::InvalidRate(give_amount));
        }
        let give_set = ResourceSet::zero().with(give, give_amount);
        self.players[index].ledger.check_covers(&give_set)?;
        let get_card = CardType::from(get);
        // Checked explicitly so nothing moves if the bank is out of stock.
        if self.bank.get(get_card)? < 1 {
            return Err(LedgerError::InsufficientSupply {
                card: get_card,
                available: 0,
                requested: 1,
            }
            .into());
        }
        self.players[index].ledger.debit(&give_set)?;
        self.bank.credit(&give_set)?;
        self.bank.remove(get_card, 1)?;
        self.players[index].ledger.add(get_card, 1)?;
        debug!(player, %give, %get, "maritime trade");
        Ok(())
    }

    /// Builds a settlement for the active player: costs 1 Brick, 1 Lumber,
    /// 1 Wool, 1 Wheat; the target must be empty with no occupied neighbor.
    pub fn place_settlement(
        &mut self,
        player: PlayerId,
        site: IntersectionId,
    ) -> Result<(), GameError> {
        let index = self.player_index(player)?;
        self.require_turn(player)?;
        self.players[index].ledger.check_covers(&COST_SETTLEMENT)?;
        self.check_piece(index, PieceKind::Settlement)?;
        let neighbors = Board::intersection_neighbors(site)?;
        if self.board.get_intersection(site)?.is_some() {
            return Err(GameError::IntersectionOccupied(site));
        }
        for neighbor in neighbors {
            if self.board.get_intersection(neighbor)?.is_some() {
                return Err(GameError::AdjacentIntersectionOccupied(site));
            }
        }
        self.pay(index, &COST_SETTLEMENT)?;
        self.players[index].ledger.remove(CardType::Settlement, 1)?;
        self.board.place_settlement(site, player)?;
        debug!(player, site, "settlement built");
        Ok(())
    }

    /// Upgrades the active player's own settlement to a city: costs 3 Ore,
    /// 2 Wheat. The replaced settlement piece returns to their supply.
    pub fn place_city(&mut self, player: PlayerId, site: IntersectionId) -> Result<(), GameError> {
        let index = self.player_index(player)?;
        self.require_turn(player)?;
        self.players[index].ledger.check_covers(&COST_CITY)?;
        self.check_piece(index, PieceKind::City)?;
        match self.board.get_intersection(site)? {
            Some(Building::Settlement { owner }) if owner == player => {}
            _ => return Err(GameError::NotYourSettlement(site)),
        }
        self.pay(index, &COST_CITY)?;
        self.players[index].ledger.remove(CardType::City, 1)?;
        self.players[index].ledger.add(CardType::Settlement, 1)?;
        self.board.place_city(site, player)?;
        debug!(player, site, "city built");
        Ok(())
    }

    /// Builds a road for the active player: costs 1 Brick, 1 Lumber; the
    /// edge must be empty and touch the player's existing network.
    pub fn place_road(
        &mut self,
        player: PlayerId,
        a: IntersectionId,
        b: IntersectionId,
    ) -> Result<(), GameError> {
        let index = self.player_index(player)?;
        self.require_turn(player)?;
        self.players[index].ledger.check_covers(&COST_ROAD)?;
        self.check_piece(index, PieceKind::Road)?;
        Board::intersection_neighbors(b)?;
        if !Board::intersection_neighbors(a)?.contains(&b) {
            return Err(GameError::NotAdjacent { a, b });
        }
        if self.board.get_edge(a, b)?.is_some() {
            return Err(GameError::EdgeOccupied { a, b });
        }
        if !self.touches_network(player, a)? && !self.touches_network(player, b)? {
            return Err(GameError::NotConnected { a, b });
        }
        self.pay(index, &COST_ROAD)?;
        self.players[index].ledger.remove(CardType::Road, 1)?;
        self.board.place_road(a, b, player)?;
        debug!(player, a, b, "road built");
        Ok(())
    }

    /// Buys a development card: costs 1 Ore, 1 Wheat, 1 Wool; draws
    /// uniformly from the bank's remaining cards. Returns the draw.
    pub fn buy_development_card(&mut self, player: PlayerId) -> Result<DevelopmentCard, GameError> {
        let index = self.player_index(player)?;
        self.require_turn(player)?;
        self.players[index].ledger.check_covers(&COST_DEVELOPMENT)?;
        let mut remaining: Vec<(DevelopmentCard, u32)> = Vec::new();
        let mut total = 0;
        for card in DevelopmentCard::ALL {
            let count = self.bank.get(card.into())?;
            total += count;
            remaining.push((card, count));
        }
        if total == 0 {
            return Err(GameError::NoDevelopmentCards);
        }
        let mut draw = self.rng.gen_range(0..total);
        let mut drawn = DevelopmentCard::Knight;
        for (card, count) in remaining {
            if draw < count {
                drawn = card;
                break;
            }
            draw -= count;
        }
        self.pay(index, &COST_DEVELOPMENT)?;
        self.bank.remove(drawn.into(), 1)?;
        self.players[index].ledger.add(drawn.into(), 1)?;
        debug!(player, card = %drawn, "development card bought");
        Ok(drawn)
    }

    /// Passes the turn to the next player in roster order.
    pub fn end_turn(&mut self, player: PlayerId) -> Result<(), GameError> {
        let index = self.player_index(player)?;
        self.require_turn(player)?;
        let next = self.players[(index + 1) % self.players.len()].id;
        self.status = GameStatus::Active {
            whose_turn: next,
            rolled: false,
        };
        debug!(player, next, "turn ended");
        Ok(())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn bank(&self) -> BTreeMap<CardType, u32> {
        self.bank.snapshot()
    }

    pub fn players(&self) -> Vec<PlayerSummary> {
        self.players
            .iter()
            .map(|slot| PlayerSummary {
                id: slot.id,
                cards: slot.ledger.snapshot(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status(),
            board: self.board(),
            bank: self.bank(),
            players: self.players(),
        }
    }

    fn broadcast(&mut self, text: &str) {
        for slot in &mut self.players {
            slot.agent.message(text);
        }
    }

    fn player_index(&self, player: PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|slot| slot.id == player)
            .ok_or(GameError::UnknownPlayer(player))
    }

    fn require_active(&self) -> Result<(PlayerId, bool), GameError> {
        match self.status {
            GameStatus::Active { whose_turn, rolled } => Ok((whose_turn, rolled)),
            _ => Err(GameError::NotActive),
        }
    }

    fn require_turn(&self, player: PlayerId) -> Result<(), GameError> {
        let (whose_turn, _) = self.require_active()?;
        if player == whose_turn {
            Ok(())
        } else {
            Err(GameError::NotYourTurn(player))
        }
    }

    fn check_piece(&self, index: usize, piece: PieceKind) -> Result<(), GameError> {
        if self.players[index].ledger.get(piece.into())? == 0 {
            return Err(GameError::OutOfPieces(piece));
        }
        Ok(())
    }

    fn touches_network(&self, player: PlayerId, site: IntersectionId) -> Result<bool, GameError> {
        if let Some(building) = self.board.get_intersection(site)? {
            if building.owner() == player {
                return Ok(true);
            }
        }
        for neighbor in Board::intersection_neighbors(site)? {
            if self.board.get_edge(site, neighbor)? == Some(player) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn pay(&mut self, index: usize, cost: &ResourceSet) -> Result<(), GameError> {
        self.players[index].ledger.debit(cost)?;
        self.bank.credit(cost)?;
        Ok(())
    }
}
