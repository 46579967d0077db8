use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Stable identifier of a board tile. Tile IDs share the intersection
/// numbering: a tile's ID is its north-west corner intersection.
pub type TileId = u8;

/// Stable identifier of a board intersection (0..=71, with gaps).
pub type IntersectionId = u8;

/// An undirected edge between two adjacent intersections, stored with the
/// smaller ID first.
pub type EdgeKey = (IntersectionId, IntersectionId);

/// Opaque identifier a roster entry supplies for itself.
pub type PlayerId = u32;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Resource {
    Brick,
    Lumber,
    Ore,
    Wheat,
    Wool,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Wheat,
        Resource::Wool,
    ];
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DevelopmentCard {
    Knight,
    VictoryPoint,
    RoadBuilding,
    Monopoly,
    YearOfPlenty,
}

impl DevelopmentCard {
    pub const ALL: [DevelopmentCard; 5] = [
        DevelopmentCard::Knight,
        DevelopmentCard::VictoryPoint,
        DevelopmentCard::RoadBuilding,
        DevelopmentCard::Monopoly,
        DevelopmentCard::YearOfPlenty,
    ];
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceKind {
    Road,
    Settlement,
    City,
}

impl PieceKind {
    pub const ALL: [PieceKind; 3] = [PieceKind::Road, PieceKind::Settlement, PieceKind::City];
}

/// Key space of a [`crate::game::Ledger`]: every kind of card or piece a
/// counter may track. Bank ledgers carry resources and development cards;
/// player ledgers additionally carry the remaining-piece counters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Brick,
    Lumber,
    Ore,
    Wheat,
    Wool,
    Knight,
    VictoryPoint,
    RoadBuilding,
    Monopoly,
    YearOfPlenty,
    Road,
    Settlement,
    City,
}

impl From<Resource> for CardType {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::Brick => CardType::Brick,
            Resource::Lumber => CardType::Lumber,
            Resource::Ore => CardType::Ore,
            Resource::Wheat => CardType::Wheat,
            Resource::Wool => CardType::Wool,
        }
    }
}

impl From<DevelopmentCard> for CardType {
    fn from(card: DevelopmentCard) -> Self {
        match card {
            DevelopmentCard::Knight => CardType::Knight,
            DevelopmentCard::VictoryPoint => CardType::VictoryPoint,
            DevelopmentCard::RoadBuilding => CardType::RoadBuilding,
            DevelopmentCard::Monopoly => CardType::Monopoly,
            DevelopmentCard::YearOfPlenty => CardType::YearOfPlenty,
        }
    }
}

impl From<PieceKind> for CardType {
    fn from(piece: PieceKind) -> Self {
        match piece {
            PieceKind::Road => CardType::Road,
            PieceKind::Settlement => CardType::Settlement,
            PieceKind::City => CardType::City,
        }
    }
}
