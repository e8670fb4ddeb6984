//! Level files
//!
//! Levels are stored as RON. A level lists its collision maps, the tiles
//! built from them, the tile grid (north row first, `0` for empty, `k` for
//! the `k`-th tile of the level) and the entities to spawn.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tilekit_math::IVec2;
use tilekit_physics::{
    Aabb, Body, CollisionFilter, CollisionMap, Sprite, TileId, TileManager, TileMap, World, WorldObject, EMPTY_TILE,
};

/// A tile of the level: a collision map and a texture of the tile set
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    /// Index into the level collision maps
    pub collision_map: usize,
    /// Index into the tile set
    pub texture: usize,
}

/// Sprite of a spawned entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteDef {
    pub sprite_set: String,
    #[serde(default)]
    pub animation: usize,
    /// Drawn area relative to the entity position; defaults to its bounding box
    #[serde(default)]
    pub texture_bounds: Option<Aabb>,
}

/// An entity placed in the level
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    pub bounding_box: Aabb,
    #[serde(default)]
    pub speed: IVec2,
    /// Collide with every other solid entity; tiles only when false
    #[serde(default)]
    pub solid: bool,
    #[serde(default)]
    pub sprite: Option<SpriteDef>,
}

/// A level as stored on disk
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub collision_maps: Vec<CollisionMap>,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
    /// Tile grid, north row first
    pub rows: Vec<Vec<TileId>>,
    /// Area over which collisions are computed; the whole level when absent
    #[serde(default)]
    pub logic_area: Option<Aabb>,
    #[serde(default)]
    pub entities: Vec<EntityDef>,
}

impl Level {
    /// Load and validate a level file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse and validate a level
    pub fn from_ron(contents: &str) -> Result<Self, LevelError> {
        let level: Level = ron::from_str(contents)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_ron(&self) -> Result<String, LevelError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Save the level to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LevelError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Check the grid is rectangular and every reference resolves
    pub fn validate(&self) -> Result<(), LevelError> {
        let width = self.rows.first().map_or(0, Vec::len);
        if let Some(row) = self.rows.iter().position(|r| r.len() != width) {
            return Err(LevelError::Invalid(format!(
                "row {} has {} tiles, expected {}",
                row,
                self.rows[row].len(),
                width
            )));
        }

        for (index, tile) in self.tiles.iter().enumerate() {
            if tile.collision_map >= self.collision_maps.len() {
                return Err(LevelError::Invalid(format!(
                    "tile {} uses collision map {} but only {} are defined",
                    index + 1,
                    tile.collision_map,
                    self.collision_maps.len()
                )));
            }
        }

        let tile_count = self.tiles.len() as TileId;
        if let Some(tile) = self.rows.iter().flatten().find(|t| **t > tile_count) {
            return Err(LevelError::Invalid(format!(
                "tile {} is used but only {} are defined",
                tile, tile_count
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Register the level tiles and build its tile map with the registered ids
    pub fn install(&self, tile_manager: &mut TileManager) -> Result<TileMap, LevelError> {
        self.validate()?;

        let collision_maps: Vec<usize> = self
            .collision_maps
            .iter()
            .map(|map| tile_manager.register_collision_map(*map))
            .collect();

        let mut ids = vec![EMPTY_TILE];
        for tile in &self.tiles {
            let collision_map = collision_maps.get(tile.collision_map).copied().ok_or_else(|| {
                LevelError::Invalid(format!("unknown collision map {}", tile.collision_map))
            })?;
            ids.push(tile_manager.register_tile(collision_map, tile.texture)?);
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|t| {
                        ids.get(*t as usize).copied().ok_or_else(|| {
                            LevelError::Invalid(format!("tile {} is used but only {} are defined", t, self.tiles.len()))
                        })
                    })
                    .collect::<Result<Vec<TileId>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "Installed level '{}': {}x{} tiles, {} tile types",
            self.name,
            self.width(),
            self.height(),
            self.tiles.len()
        );
        Ok(TileMap::from_rows(&rows))
    }

    /// Spawn the level entities into `world`
    pub fn spawn_entities(&self, world: &mut World) {
        for entity in &self.entities {
            let mut body = Body::new(entity.speed);
            if entity.solid {
                body = body.with_filter(CollisionFilter::solid());
            }
            let mut object = WorldObject::entity(entity.bounding_box, body);
            if let Some(sprite) = &entity.sprite {
                let texture_bounds = sprite
                    .texture_bounds
                    .unwrap_or(Aabb::new(IVec2::ZERO, entity.bounding_box.bounds));
                object = object.with_sprite(Sprite::new(texture_bounds, sprite.sprite_set.clone(), sprite.animation));
            }
            world.spawn(object);
        }
    }
}

/// Error loading, saving or installing a level
#[derive(Debug)]
pub enum LevelError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
    /// The level references tiles or collision maps it does not define
    Invalid(String),
    /// Tile registration failed
    Physics(tilekit_physics::PhysicsError),
}

impl From<io::Error> for LevelError {
    fn from(e: io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::Parse(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::Serialize(e)
    }
}

impl From<tilekit_physics::PhysicsError> for LevelError {
    fn from(e: tilekit_physics::PhysicsError) -> Self {
        LevelError::Physics(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "IO error: {}", e),
            LevelError::Parse(e) => write!(f, "Parse error: {}", e),
            LevelError::Serialize(e) => write!(f, "Serialize error: {}", e),
            LevelError::Invalid(message) => write!(f, "Invalid level: {}", message),
            LevelError::Physics(e) => write!(f, "Tile registration failed: {}", e),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Parse(e) => Some(e),
            LevelError::Serialize(e) => Some(e),
            LevelError::Physics(e) => Some(e),
            LevelError::Invalid(_) => None,
        }
    }
}
