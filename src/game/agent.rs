use serde::{Deserialize, Serialize};

use crate::game::resources::ResourceSet;
use crate::types::{IntersectionId, PlayerId, TileId};

/// A proposed exchange: `offer` is what the offerer gives up, `ask` what
/// they want back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub offer: ResourceSet,
    pub ask: ResourceSet,
}

/// The capability interface an external player hands the orchestrator.
///
/// Decision methods block the orchestrator thread until they return; a
/// structurally or rule-invalid reply is reported through [`error`] and the
/// same decision is requested again, indefinitely. An agent can therefore
/// never halt the game by replying incorrectly, only by not replying.
///
/// [`error`]: PlayerAgent::error
pub trait PlayerAgent {
    /// First setup decision: a settlement intersection and the adjacent
    /// intersection its road runs to.
    fn place_first_settlement(&mut self) -> (IntersectionId, IntersectionId);

    /// Second setup decision, same shape as the first.
    fn place_second_settlement(&mut self) -> (IntersectionId, IntersectionId);

    /// Where to move the robber after this player rolled a 7.
    fn place_robber(&mut self) -> TileId;

    /// Which cards to give up when caught over the hand limit. The
    /// selection must total exactly `amount` and stay within held counts.
    fn return_cards(&mut self, amount: u32) -> ResourceSet;

    /// Accept or decline a trade offered to this player.
    fn consider_trade(&mut self, offer: &TradeOffer) -> bool;

    /// Notification that the previous reply was rejected; the same decision
    /// request follows.
    fn error(&mut self, message: &str) {
        let _ = message;
    }

    /// Broadcast notification, e.g. an oversubscribed resource roll.
    fn message(&mut self, text: &str) {
        let _ = text;
    }
}

/// A roster entry: the player's self-chosen identifier plus their agent.
pub struct PlayerHandle {
    pub id: PlayerId,
    pub agent: Box<dyn PlayerAgent>,
}

impl PlayerHandle {
    pub fn new(id: PlayerId, agent: impl PlayerAgent + 'static) -> Self {
        Self {
            id,
            agent: Box::new(agent),
        }
    }
}
