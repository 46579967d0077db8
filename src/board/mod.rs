use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::{EdgeKey, IntersectionId, PlayerId, Resource, TileId};

mod topology;

use topology::{INTERSECTION_IDS, INTERSECTION_ID_SET, TILE_IDS, TILE_NUMBERS, TILE_RESOURCES,
    TILE_ID_SET};

/// One of the 19 board cells. `resource: None` is the Desert, which carries
/// no dice number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub resource: Option<Resource>,
    pub number: Option<u8>,
}

/// Occupancy of an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Building {
    Settlement { owner: PlayerId },
    City { owner: PlayerId },
}

impl Building {
    pub fn owner(&self) -> PlayerId {
        match self {
            Building::Settlement { owner } | Building::City { owner } => *owner,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("impossible tile id arrangement")]
    InvalidTileIds,
    #[error("impossible tile resource arrangement")]
    InvalidTileResources,
    #[error("impossible tile number arrangement")]
    InvalidTileNumbers,
    #[error("the desert tile cannot carry a dice number")]
    DesertNumbered,
    #[error("{0} is not a valid intersection id")]
    InvalidIntersection(IntersectionId),
    #[error("{0} is not a valid tile id")]
    InvalidTile(TileId),
}

/// Fixed 19-tile / 54-intersection topology with settlement, road, and
/// robber occupancy. The board validates raw IDs only; game rules
/// (distance, cost, connectivity) are the orchestrator's job.
#[derive(Debug, Clone)]
pub struct Board {
    tiles: Vec<Tile>,
    intersections: HashMap<IntersectionId, Building>,
    edges: HashMap<EdgeKey, PlayerId>,
    robber: TileId,
}

impl Board {
    /// Builds a board from a tile arrangement, rejecting any arrangement
    /// whose ID, resource, or number multisets differ from the fixed ones,
    /// or whose Desert carries a dice number.
    pub fn new(tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if !tiles
            .iter()
            .map(|tile| tile.id)
            .sorted()
            .eq(TILE_IDS.iter().copied().sorted())
        {
            return Err(BoardError::InvalidTileIds);
        }
        if !tiles
            .iter()
            .map(|tile| tile.resource)
            .sorted()
            .eq(TILE_RESOURCES.iter().copied().sorted())
        {
            return Err(BoardError::InvalidTileResources);
        }
        if !tiles
            .iter()
            .map(|tile| tile.number)
            .sorted()
            .eq(TILE_NUMBERS.iter().copied().sorted())
        {
            return Err(BoardError::InvalidTileNumbers);
        }
        let desert = tiles
            .iter()
            .find(|tile| tile.resource.is_none())
            .ok_or(BoardError::InvalidTileResources)?;
        if desert.number.is_some() {
            return Err(BoardError::DesertNumbered);
        }
        let robber = desert.id;
        Ok(Self {
            tiles,
            intersections: HashMap::new(),
            edges: HashMap::new(),
            robber,
        })
    }

    /// The fixed beginner arrangement (tile 0 is Ore/11, tile 1 Ore/12, ...).
    pub fn beginner_tiles() -> Vec<Tile> {
        TILE_IDS
            .iter()
            .zip(TILE_RESOURCES.iter())
            .zip(TILE_NUMBERS.iter())
            .map(|((&id, &resource), &number)| Tile {
                id,
                resource,
                number,
            })
            .collect()
    }

    /// A random arrangement: the resource multiset is shuffled over the
    /// fixed IDs and the number sequence slots around wherever the Desert
    /// lands.
    pub fn shuffled_tiles(rng: &mut impl rand::Rng) -> Vec<Tile> {
        let mut resources = TILE_RESOURCES;
        resources.shuffle(rng);
        let mut numbers = TILE_NUMBERS.iter().copied().flatten();
        TILE_IDS
            .iter()
            .zip(resources.iter())
            .map(|(&id, &resource)| Tile {
                id,
                resource,
                number: resource.and_then(|_| numbers.next()),
            })
            .collect()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get_intersection(
        &self,
        id: IntersectionId,
    ) -> Result<Option<Building>, BoardError> {
        check_intersection(id)?;
        Ok(self.intersections.get(&id).copied())
    }

    /// Road ownership of the edge between two intersections, symmetric in
    /// its arguments.
    pub fn get_edge(
        &self,
        a: IntersectionId,
        b: IntersectionId,
    ) -> Result<Option<PlayerId>, BoardError> {
        check_intersection(a)?;
        check_intersection(b)?;
        Ok(self.edges.get(&normalize_edge(a, b)).copied())
    }

    pub fn place_settlement(
        &mut self,
        id: IntersectionId,
        owner: PlayerId,
    ) -> Result<(), BoardError> {
        check_intersection(id)?;
        self.intersections.insert(id, Building::Settlement { owner });
        Ok(())
    }

    pub fn place_city(&mut self, id: IntersectionId, owner: PlayerId) -> Result<(), BoardError> {
        check_intersection(id)?;
        self.intersections.insert(id, Building::City { owner });
        Ok(())
    }

    pub fn place_road(
        &mut self,
        a: IntersectionId,
        b: IntersectionId,
        owner: PlayerId,
    ) -> Result<(), BoardError> {
        check_intersection(a)?;
        check_intersection(b)?;
        self.edges.insert(normalize_edge(a, b), owner);
        Ok(())
    }

    pub fn robber(&self) -> TileId {
        self.robber
    }

    pub fn place_robber(&mut self, tile: TileId) -> Result<(), BoardError> {
        if !TILE_ID_SET.contains(&tile) {
            return Err(BoardError::InvalidTile(tile));
        }
        self.robber = tile;
        Ok(())
    }

    /// All 54 intersection IDs.
    pub fn intersection_ids() -> &'static [IntersectionId] {
        &INTERSECTION_IDS
    }

    /// The six intersections ringing a tile, derived from the shared
    /// tile/intersection numbering rather than traversal.
    pub fn tile_neighbors(tile: TileId) -> Result<[IntersectionId; 6], BoardError> {
        if !TILE_ID_SET.contains(&tile) {
            return Err(BoardError::InvalidTile(tile));
        }
        Ok([
            tile,
            tile + 6,
            tile + 7,
            tile + 12,
            tile + 13,
            tile + 19,
        ])
    }

    /// The two or three intersections adjacent to an intersection. The
    /// third offset alternates direction every half-row of the numbering.
    pub fn intersection_neighbors(
        id: IntersectionId,
    ) -> Result<SmallVec<[IntersectionId; 3]>, BoardError> {
        check_intersection(id)?;
        let lateral = if (id % 12) / 6 == 0 {
            Some(id + 7)
        } else {
            id.checked_sub(7)
        };
        let candidates = [id.checked_sub(6), Some(id + 6), lateral];
        Ok(candidates
            .into_iter()
            .flatten()
            .filter(|candidate| INTERSECTION_ID_SET.contains(candidate))
            .collect())
    }

    /// Owned deep copy of the full board state.
    pub fn snapshot(&self) -> BoardSnapshot {
        let roads = self
            .edges
            .iter()
            .map(|(&edge, &owner)| RoadPlacement { edge, owner })
            .sorted_by_key(|road| road.edge)
            .collect();
        BoardSnapshot {
            tiles: self.tiles.clone(),
            intersections: self.intersections.iter().map(|(&id, &b)| (id, b)).collect(),
            roads,
            robber: self.robber,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadPlacement {
    pub edge: EdgeKey,
    pub owner: PlayerId,
}

/// Plain value-type copy of a [`Board`], the serialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub tiles: Vec<Tile>,
    pub intersections: BTreeMap<IntersectionId, Building>,
    pub roads: Vec<RoadPlacement>,
    pub robber: TileId,
}

fn check_intersection(id: IntersectionId) -> Result<(), BoardError> {
    if INTERSECTION_ID_SET.contains(&id) {
        Ok(())
    } else {
        Err(BoardError::InvalidIntersection(id))
    }
}

fn normalize_edge(a: IntersectionId, b: IntersectionId) -> EdgeKey {
    if a <= b { (a, b) } else { (b, a) }
}
