//! Tile definitions and tile maps

use serde::{Deserialize, Serialize};

use crate::{Direction, PhysicsError};

/// Tile identifier. `0` is the empty tile, registered tiles start at 1.
pub type TileId = u32;

/// The empty tile
pub const EMPTY_TILE: TileId = 0;

/// Which faces of a tile block movement
///
/// An entity moving east hits the `west` face of the tile in front of it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionMap {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl CollisionMap {
    /// Blocks from every side
    pub const SOLID: Self = Self::new(true, true, true, true);
    /// Blocks nothing (decoration)
    pub const PASSABLE: Self = Self::new(false, false, false, false);
    /// One-way platform: only blocks entities falling onto it
    pub const PLATFORM: Self = Self::new(true, false, false, false);

    pub const fn new(north: bool, east: bool, south: bool, west: bool) -> Self {
        Self { north, east, south, west }
    }

    /// Whether an entity travelling in `travel` is stopped by this tile
    pub fn blocks(&self, travel: Direction) -> bool {
        match travel {
            Direction::North => self.south,
            Direction::East => self.west,
            Direction::South => self.north,
            Direction::West => self.east,
        }
    }
}

/// Registry of collision maps and tiles
///
/// A tile is a (collision map, texture) pair. Ids are handed out in
/// registration order starting at 1.
#[derive(Clone, Debug)]
pub struct TileManager {
    tile_size: i32,
    collision_maps: Vec<CollisionMap>,
    tiles: Vec<(usize, usize)>,
}

impl TileManager {
    /// Create an empty registry for square tiles of `tile_size` world units
    pub fn new(tile_size: i32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            collision_maps: Vec::new(),
            tiles: Vec::new(),
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Register a collision map and return its id
    pub fn register_collision_map(&mut self, collision_map: CollisionMap) -> usize {
        self.collision_maps.push(collision_map);
        self.collision_maps.len() - 1
    }

    /// Register a tile made of a collision map and a texture, returning its id
    pub fn register_tile(&mut self, collision_map: usize, texture: usize) -> Result<TileId, PhysicsError> {
        if collision_map >= self.collision_maps.len() {
            return Err(PhysicsError::UnknownCollisionMap(collision_map));
        }
        self.tiles.push((collision_map, texture));
        Ok(self.tiles.len() as TileId)
    }

    /// Collision map of a registered tile
    pub fn collision_map(&self, tile: TileId) -> Result<&CollisionMap, PhysicsError> {
        let (collision_map, _) = self.tile(tile)?;
        self.collision_maps
            .get(collision_map)
            .ok_or(PhysicsError::UnknownCollisionMap(collision_map))
    }

    /// Texture index of a registered tile
    pub fn texture_id(&self, tile: TileId) -> Result<usize, PhysicsError> {
        self.tile(tile).map(|(_, texture)| texture)
    }

    /// Number of registered tiles
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn tile(&self, tile: TileId) -> Result<(usize, usize), PhysicsError> {
        if tile == EMPTY_TILE {
            return Err(PhysicsError::UnknownTile(tile));
        }
        self.tiles
            .get(tile as usize - 1)
            .copied()
            .ok_or(PhysicsError::UnknownTile(tile))
    }
}

impl AsRef<TileManager> for TileManager {
    fn as_ref(&self) -> &TileManager {
        self
    }
}

impl AsMut<TileManager> for TileManager {
    fn as_mut(&mut self) -> &mut TileManager {
        self
    }
}

/// Grid of tile ids indexed by `(x, y)`, with `y = 0` the southmost row
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<TileId>,
}

impl TileMap {
    /// Map of `width × height` empty tiles
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![EMPTY_TILE; width * height],
        }
    }

    /// Build a map from rows written top (north) to bottom (south)
    ///
    /// Short rows are padded with empty tiles.
    pub fn from_rows(rows: &[Vec<TileId>]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut map = Self::new(width, height);
        for (row_index, row) in rows.iter().enumerate() {
            let y = height - 1 - row_index;
            for (x, tile) in row.iter().enumerate() {
                map.tiles[y * width + x] = *tile;
            }
        }
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at `(x, y)`, `None` outside the map
    pub fn get(&self, x: i64, y: i64) -> Option<TileId> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.tiles[y as usize * self.width + x as usize])
    }

    /// Non-empty tile at `(x, y)`
    pub fn solid_at(&self, x: i64, y: i64) -> Option<TileId> {
        self.get(x, y).filter(|tile| *tile != EMPTY_TILE)
    }

    /// Replace the tile at `(x, y)`; returns false outside the map
    pub fn set(&mut self, x: usize, y: usize, tile: TileId) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.tiles[y * self.width + x] = tile;
        true
    }

    /// Rows from north to south, the inverse of [`TileMap::from_rows`]
    pub fn to_rows(&self) -> Vec<Vec<TileId>> {
        (0..self.height)
            .rev()
            .map(|y| self.tiles[y * self.width..(y + 1) * self.width].to_vec())
            .collect()
    }

    /// Every distinct non-empty tile id used by the map
    pub fn used_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        let mut seen = std::collections::BTreeSet::new();
        self.tiles.iter().copied().filter(move |t| *t != EMPTY_TILE && seen.insert(*t))
    }
}
