pub mod agent;
pub mod game;
pub mod ledger;
pub mod resources;

pub use agent::{PlayerAgent, PlayerHandle, TradeOffer};
pub use game::{Game, GameError, GameSnapshot, GameStatus, PlayerSummary};
pub use ledger::{Ledger, LedgerError};
pub use resources::{COST_CITY, COST_DEVELOPMENT, COST_ROAD, COST_SETTLEMENT, ResourceSet};
