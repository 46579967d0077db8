#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod game;
pub mod types;

pub use board::{Board, BoardError, BoardSnapshot, Building, RoadPlacement, Tile};
pub use game::{
    COST_CITY, COST_DEVELOPMENT, COST_ROAD, COST_SETTLEMENT, Game, GameError, GameSnapshot,
    GameStatus, Ledger, LedgerError, PlayerAgent, PlayerHandle, PlayerSummary, ResourceSet,
    TradeOffer,
};
pub use types::{
    CardType, DevelopmentCard, EdgeKey, IntersectionId, PieceKind, PlayerId, Resource, TileId,
};
