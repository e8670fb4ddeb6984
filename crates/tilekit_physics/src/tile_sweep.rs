//! Swept test between a moving entity and the tile grid
//!
//! Coordinates are truncated to whole world units. Straight moves scan the
//! tile rows or columns entered by the leading edge. Diagonal moves
//! rasterize the hexagon swept by the box and look for the earliest solid
//! face among the covered tiles.

use tilekit_math::IVec2;

use crate::sweep::CollisionObject;
use crate::{Direction, PhysicsError, TileId, TileManager, TileMap};

/// First solid tile face met by an entity
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileHit {
    /// Absolute time within the tick
    pub time_of_impact: f64,
    pub tile: TileId,
    /// Tile coordinates
    pub position: IVec2,
    pub direction: Direction,
}

/// Tile grid seen by the narrow phase
#[derive(Clone, Copy)]
pub struct TileSweep<'a> {
    tiles: &'a TileMap,
    manager: &'a TileManager,
    tile_size: i64,
}

impl<'a> TileSweep<'a> {
    pub fn new(tiles: &'a TileMap, manager: &'a TileManager) -> Self {
        Self {
            tiles,
            manager,
            tile_size: manager.tile_size() as i64,
        }
    }

    fn min_tile(&self, coordinate: i64) -> i64 {
        coordinate.div_euclid(self.tile_size)
    }

    // An upper edge lying on a tile boundary does not reach into the next tile
    fn max_tile(&self, coordinate: i64) -> i64 {
        let tile = coordinate.div_euclid(self.tile_size);
        if coordinate.rem_euclid(self.tile_size) == 0 {
            tile - 1
        } else {
            tile
        }
    }

    /// Solid tile at `(x, y)` blocking movement in `travel`
    fn blocking_tile(&self, x: i64, y: i64, travel: Direction) -> Result<Option<TileId>, PhysicsError> {
        match self.tiles.solid_at(x, y) {
            Some(tile) if self.manager.collision_map(tile)?.blocks(travel) => Ok(Some(tile)),
            _ => Ok(None),
        }
    }

    /// Earliest tile face `collider` runs into before the end of the tick
    pub fn time_of_impact(&self, collider: &CollisionObject) -> Result<Option<TileHit>, PhysicsError> {
        let ts = self.tile_size;
        let local_time = collider.local_time;
        let remaining = 1.0 - local_time;
        let speed = collider.speed;
        let position = collider.bounding_box.position;
        let bounds = collider.bounding_box.bounds;

        let pre_min = [position[0].trunc() as i64, position[1].trunc() as i64];
        let pre_max = [
            (position[0] + bounds[0]).trunc() as i64,
            (position[1] + bounds[1]).trunc() as i64,
        ];
        let post_min = [
            (pre_min[0] as f64 + speed[0] * remaining).trunc() as i64,
            (pre_min[1] as f64 + speed[1] * remaining).trunc() as i64,
        ];
        let post_max = [
            (pre_max[0] as f64 + speed[0] * remaining).trunc() as i64,
            (pre_max[1] as f64 + speed[1] * remaining).trunc() as i64,
        ];

        let pre_min_tile = [self.min_tile(pre_min[0]), self.min_tile(pre_min[1])];
        let pre_max_tile = [self.max_tile(pre_max[0]), self.max_tile(pre_max[1])];
        let post_min_tile = [self.min_tile(post_min[0]), self.min_tile(post_min[1])];
        let post_max_tile = [self.max_tile(post_max[0]), self.max_tile(post_max[1])];

        if pre_min_tile == post_min_tile && pre_max_tile == post_max_tile {
            return Ok(None);
        }

        // Straight moves: the box stays within the same rows (or columns)
        for axis in 0..2 {
            let other = 1 - axis;
            if post_min_tile[other] != pre_min_tile[other] || post_max_tile[other] != pre_max_tile[other] {
                continue;
            }
            let cell = |a: i64, b: i64| if axis == 0 { (a, b) } else { (b, a) };

            if post_max_tile[axis] > pre_max_tile[axis] {
                let travel = if axis == 0 { Direction::East } else { Direction::North };
                for a in pre_max_tile[axis] + 1..=post_max_tile[axis] {
                    for b in pre_min_tile[other]..=pre_max_tile[other] {
                        let (x, y) = cell(a, b);
                        if let Some(tile) = self.blocking_tile(x, y, travel)? {
                            let time = (a * ts - pre_max[axis]) as f64 / speed[axis];
                            return Ok(Some(TileHit {
                                time_of_impact: time + local_time,
                                tile,
                                position: IVec2::new(x as i32, y as i32),
                                direction: travel,
                            }));
                        }
                    }
                }
                return Ok(None);
            } else if post_min_tile[axis] < pre_min_tile[axis] {
                let travel = if axis == 0 { Direction::West } else { Direction::South };
                for a in (post_min_tile[axis]..pre_min_tile[axis]).rev() {
                    for b in pre_min_tile[other]..=pre_max_tile[other] {
                        let (x, y) = cell(a, b);
                        if let Some(tile) = self.blocking_tile(x, y, travel)? {
                            let time = ((a + 1) * ts - pre_min[axis]) as f64 / speed[axis];
                            return Ok(Some(TileHit {
                                time_of_impact: time + local_time,
                                tile,
                                position: IVec2::new(x as i32, y as i32),
                                direction: travel,
                            }));
                        }
                    }
                }
                return Ok(None);
            }
            break;
        }

        self.diagonal_time_of_impact(collider, [pre_min, pre_max, post_min, post_max], [
            pre_min_tile,
            pre_max_tile,
            post_min_tile,
            post_max_tile,
        ])
    }

    fn diagonal_time_of_impact(
        &self,
        collider: &CollisionObject,
        [pre_min, pre_max, post_min, post_max]: [[i64; 2]; 4],
        [pre_min_tile, pre_max_tile, post_min_tile, post_max_tile]: [[i64; 2]; 4],
    ) -> Result<Option<TileHit>, PhysicsError> {
        let ts = self.tile_size;
        let speed = collider.speed;
        let local_time = collider.local_time;

        let vertices = swept_hexagon(speed, pre_min, pre_max, post_min, post_max);

        let min_tile = [pre_min_tile[0].min(post_min_tile[0]), pre_min_tile[1].min(post_min_tile[1])];
        let max_tile = [pre_max_tile[0].max(post_max_tile[0]), pre_max_tile[1].max(post_max_tile[1])];
        let raster = Raster::new(&vertices, min_tile, max_tile, ts, collider.bounding_box.bounds);

        let forward = [speed[0] > 0.0, speed[1] > 0.0];
        let travel_x = if forward[0] { Direction::East } else { Direction::West };
        let travel_y = if forward[1] { Direction::North } else { Direction::South };
        let xs = scan_range(pre_min_tile[0], pre_max_tile[0], post_min_tile[0], post_max_tile[0], forward[0]);
        let ys = scan_range(pre_min_tile[1], pre_max_tile[1], post_min_tile[1], post_max_tile[1], forward[1]);

        let mut time_of_impact = 1.0 - local_time;
        let mut hit = None;
        let mut found_x = false;
        let mut found_y = false;

        for &x in &xs {
            for &y in &ys {
                let inside_start = (pre_min_tile[0]..=pre_max_tile[0]).contains(&x)
                    && (pre_min_tile[1]..=pre_max_tile[1]).contains(&y);
                if inside_start || !raster.covers(x, y) {
                    continue;
                }
                let Some(tile) = self.tiles.solid_at(x, y) else {
                    continue;
                };
                let collision_map = self.manager.collision_map(tile)?;

                let time_x = if forward[0] {
                    (x * ts - pre_max[0]) as f64 / speed[0]
                } else {
                    ((x + 1) * ts - pre_min[0]) as f64 / speed[0]
                };
                let time_y = if forward[1] {
                    (y * ts - pre_max[1]) as f64 / speed[1]
                } else {
                    ((y + 1) * ts - pre_min[1]) as f64 / speed[1]
                };

                let (time, travel, found_other) = if time_x >= time_y {
                    (time_x, travel_x, found_y)
                } else {
                    (time_y, travel_y, found_x)
                };
                if !collision_map.blocks(travel) || time >= time_of_impact {
                    continue;
                }

                time_of_impact = time;
                let candidate = TileHit {
                    time_of_impact: time + local_time,
                    tile,
                    position: IVec2::new(x as i32, y as i32),
                    direction: travel,
                };
                if found_other {
                    return Ok(Some(candidate));
                }
                hit = Some(candidate);
                if travel == travel_x {
                    found_x = true;
                } else {
                    found_y = true;
                }
            }
        }

        Ok(hit)
    }
}

/// Tile coordinates visited in order of travel
fn scan_range(pre_min: i64, pre_max: i64, post_min: i64, post_max: i64, forward: bool) -> Vec<i64> {
    if forward {
        (pre_min..=post_max).collect()
    } else {
        (post_min..=pre_max).rev().collect()
    }
}

/// Outline of the area swept by a box moving diagonally
fn swept_hexagon(speed: [f64; 2], pre_min: [i64; 2], pre_max: [i64; 2], post_min: [i64; 2], post_max: [i64; 2]) -> [[i64; 2]; 6] {
    match (speed[0] > 0.0, speed[1] > 0.0) {
        (true, true) => [
            [pre_min[0], pre_min[1]],
            [pre_max[0] + 1, pre_min[1]],
            [post_max[0] + 1, post_min[1]],
            [post_max[0] + 1, post_max[1] + 1],
            [post_min[0], post_max[1] + 1],
            [pre_min[0], pre_max[1] + 1],
        ],
        (true, false) => [
            [pre_min[0], pre_max[1] + 1],
            [pre_min[0], pre_min[1]],
            [post_min[0], post_min[1]],
            [post_max[0] + 1, post_min[1]],
            [post_max[0] + 1, post_max[1] + 1],
            [pre_max[0] + 1, pre_max[1] + 1],
        ],
        (false, true) => [
            [pre_max[0] + 1, pre_min[1]],
            [pre_max[0] + 1, pre_max[1] + 1],
            [post_max[0] + 1, post_max[1] + 1],
            [post_min[0], post_max[1] + 1],
            [post_min[0], post_min[1]],
            [pre_min[0], pre_min[1]],
        ],
        (false, false) => [
            [pre_max[0] + 1, pre_max[1] + 1],
            [pre_min[0], pre_max[1] + 1],
            [post_min[0], post_max[1] + 1],
            [post_min[0], post_min[1]],
            [post_max[0] + 1, post_min[1]],
            [pre_max[0] + 1, pre_min[1]],
        ],
    }
}

/// Tiles touched by the swept hexagon
struct Raster {
    min_tile: [i64; 2],
    size: [i64; 2],
    cells: Vec<bool>,
}

impl Raster {
    fn new(vertices: &[[i64; 2]], min_tile: [i64; 2], max_tile: [i64; 2], tile_size: i64, bounds: [f64; 2]) -> Self {
        let size = [max_tile[0] - min_tile[0] + 1, max_tile[1] - min_tile[1] + 1];
        let offsets = |bound: f64| {
            let step = (bound as i64).max(1) as usize;
            let mut offsets: Vec<i64> = (0..tile_size).step_by(step).collect();
            if !offsets.contains(&(tile_size - 1)) {
                offsets.push(tile_size - 1);
            }
            offsets
        };
        let offsets_x = offsets(bounds[0]);
        let offsets_y = offsets(bounds[1]);

        let mut cells = vec![false; (size[0] * size[1]).max(0) as usize];
        for tile_x in 0..size[0] {
            for tile_y in 0..size[1] {
                let x = (tile_x + min_tile[0]) * tile_size;
                let y = (tile_y + min_tile[1]) * tile_size;
                let covered = offsets_x.iter().any(|offset| {
                    inner_polygon_test(vertices, x + offset, y) || inner_polygon_test(vertices, x + offset, y + tile_size)
                }) || offsets_y.iter().any(|offset| {
                    inner_polygon_test(vertices, x + tile_size, y + offset) || inner_polygon_test(vertices, x, y + offset)
                });
                cells[(tile_x * size[1] + tile_y) as usize] = covered;
            }
        }

        Self { min_tile, size, cells }
    }

    fn covers(&self, x: i64, y: i64) -> bool {
        let tile_x = x - self.min_tile[0];
        let tile_y = y - self.min_tile[1];
        if tile_x < 0 || tile_y < 0 || tile_x >= self.size[0] || tile_y >= self.size[1] {
            return false;
        }
        self.cells[(tile_x * self.size[1] + tile_y) as usize]
    }
}

/// Whether the unit cell at `(x, y)` lies inside the polygon
///
/// Runs the even-odd crossing test twice, once on the lower-left corner and
/// once mirrored on the upper-right corner, so that cells on either side of
/// an edge are caught.
pub fn inner_polygon_test(vertices: &[[i64; 2]], x: i64, y: i64) -> bool {
    let (x, y) = (x as f64, y as f64);
    let mut positive = false;
    let mut negative = false;

    for (index, vertex) in vertices.iter().enumerate() {
        let previous = vertices[(index + vertices.len() - 1) % vertices.len()];
        let (vx, vy) = (vertex[0] as f64, vertex[1] as f64);
        let (px, py) = (previous[0] as f64, previous[1] as f64);

        if (vy > y) != (py > y) && x < vx + (px - vx) * (y - vy) / (py - vy) {
            positive = !positive;
        }
        if (vy < y + 1.0) != (py < y + 1.0) && -x - 1.0 < -vx + (vx - px) * (-y - 1.0 + vy) / (vy - py) {
            negative = !negative;
        }
    }

    positive || negative
}
