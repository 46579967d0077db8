use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::types::{IntersectionId, Resource, TileId};

/// The 19 tile IDs, spiraling inward from the coast. A tile's ID doubles as
/// its north-west corner intersection ID.
pub(crate) const TILE_IDS: [TileId; 19] = [
    50, 51, 52, 40, 28, 15, 2, 1, 0, 12, 24, 37, 38, 39, 27, 14, 13, 25, 26,
];

/// The 54 intersection IDs. The numbering leaves gaps so that the
/// closed-form neighbor offsets work without per-row tables.
pub(crate) const INTERSECTION_IDS: [IntersectionId; 54] = [
    0, 1, 2, 6, 7, 8, 9, 12, 13, 14, 15, 18, 19, 20, 21, 22, 24, 25, 26, 27, 28, 30, 31, 32, 33,
    34, 35, 36, 37, 38, 39, 40, 41, 43, 44, 45, 46, 47, 49, 50, 51, 52, 53, 56, 57, 58, 59, 62,
    63, 64, 65, 69, 70, 71,
];

/// Resource of each tile in the beginner arrangement, in [`TILE_IDS`] order.
/// `None` is the Desert. Doubles as the fixed resource multiset every
/// arrangement must carry.
pub(crate) const TILE_RESOURCES: [Option<Resource>; 19] = [
    Some(Resource::Brick),
    Some(Resource::Brick),
    Some(Resource::Brick),
    Some(Resource::Lumber),
    Some(Resource::Lumber),
    Some(Resource::Lumber),
    Some(Resource::Lumber),
    Some(Resource::Ore),
    Some(Resource::Ore),
    Some(Resource::Ore),
    Some(Resource::Wheat),
    Some(Resource::Wheat),
    Some(Resource::Wheat),
    Some(Resource::Wheat),
    Some(Resource::Wool),
    Some(Resource::Wool),
    Some(Resource::Wool),
    Some(Resource::Wool),
    None,
];

/// Dice number of each tile in the beginner arrangement, in [`TILE_IDS`]
/// order. The Desert carries none.
pub(crate) const TILE_NUMBERS: [Option<u8>; 19] = [
    Some(5),
    Some(2),
    Some(6),
    Some(3),
    Some(8),
    Some(10),
    Some(9),
    Some(12),
    Some(11),
    Some(4),
    Some(8),
    Some(10),
    Some(9),
    Some(4),
    Some(5),
    Some(6),
    Some(3),
    Some(11),
    None,
];

pub(crate) static TILE_ID_SET: Lazy<HashSet<TileId>> =
    Lazy::new(|| TILE_IDS.iter().copied().collect());

pub(crate) static INTERSECTION_ID_SET: Lazy<HashSet<IntersectionId>> =
    Lazy::new(|| INTERSECTION_IDS.iter().copied().collect());
