//! Swept separating-axis test between two moving entities
//!
//! Entities move at constant speed within a tick. Each entity carries a local
//! time in `[0, 1]` telling how much of the tick it has already consumed; the
//! test runs in the frame of the entity furthest along.

use crate::{Body, CollisionFilter, Direction, WorldObject};

/// Box with double precision coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatBox {
    pub position: [f64; 2],
    pub bounds: [f64; 2],
}

impl FloatBox {
    pub fn new(position: [f64; 2], bounds: [f64; 2]) -> Self {
        Self { position, bounds }
    }

    pub fn max(&self, axis: usize) -> f64 {
        self.position[axis] + self.bounds[axis]
    }

    /// Smallest box covering this box and the box moved by `displacement`
    pub fn expand(&self, displacement: [f64; 2]) -> Self {
        Self::new(
            [
                self.position[0] + displacement[0].min(0.0),
                self.position[1] + displacement[1].min(0.0),
            ],
            [
                self.bounds[0] + displacement[0].abs(),
                self.bounds[1] + displacement[1].abs(),
            ],
        )
    }

    /// Strict overlap, shared edges do not count
    pub fn intersects(&self, other: &FloatBox) -> bool {
        !(0..2).any(|axis| self.position[axis] >= other.max(axis) || self.max(axis) <= other.position[axis])
    }

    /// Whether `point` is inside, edges included
    pub fn contains_point(&self, point: [f64; 2]) -> bool {
        (0..2).all(|axis| {
            let local = point[axis] - self.position[axis];
            local >= 0.0 && local <= self.bounds[axis]
        })
    }
}

/// Projection of a box on one axis, moving at constant speed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovableSegment {
    pub low: f64,
    pub high: f64,
    pub speed: f64,
}

impl MovableSegment {
    pub fn new(low: f64, high: f64, speed: f64) -> Self {
        Self { low, high, speed }
    }

    /// Overlapping or touching
    pub fn overlaps(&self, other: &Self) -> bool {
        self.high >= other.low && self.low <= other.high
    }

    /// Sharing exactly one end point
    pub fn touches(&self, other: &Self) -> bool {
        self.high == other.low || self.low == other.high
    }

    /// Separated segments closing in on each other
    pub fn should_impact(&self, other: &Self) -> bool {
        (self.high < other.low && self.speed > other.speed) || (self.low > other.high && self.speed < other.speed)
    }

    pub fn should_separate(&self, other: &Self) -> bool {
        self.speed != other.speed
    }

    /// Time until the segments first touch
    pub fn time_of_impact(&self, other: &Self) -> f64 {
        if self.high < other.low {
            (other.low - self.high) / (self.speed - other.speed)
        } else {
            (self.low - other.high) / (other.speed - self.speed)
        }
    }

    /// Time until the segments stop overlapping
    pub fn time_of_separation(&self, other: &Self) -> f64 {
        if self.speed > other.speed {
            (other.high - self.low) / (self.speed - other.speed)
        } else {
            (self.high - other.low) / (other.speed - self.speed)
        }
    }
}

/// Immutable snapshot of an entity for one collision pass
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionObject {
    /// Position of the entity in the tick's entity list
    pub index: usize,
    pub bounding_box: FloatBox,
    /// Area swept over the rest of the tick
    pub swept_box: FloatBox,
    pub speed: [f64; 2],
    pub filter: CollisionFilter,
    pub collides_with_tiles: bool,
    pub local_time: f64,
}

impl CollisionObject {
    pub fn new(index: usize, object: &WorldObject, body: &Body, local_time: f64) -> Self {
        let bounding_box = FloatBox::new(object.position().as_f64(), object.bounds().as_f64());
        let speed = body.speed.as_f64();
        let remaining = 1.0 - local_time;
        Self {
            index,
            bounding_box,
            swept_box: bounding_box.expand([speed[0] * remaining, speed[1] * remaining]),
            speed,
            filter: body.filter,
            collides_with_tiles: body.collides_with_tiles,
            local_time,
        }
    }

    /// Both filters accept each other
    pub fn should_collide_with(&self, other: &CollisionObject) -> bool {
        self.filter.collides_with(&other.filter)
    }
}

/// Time of impact of `collider` against `collided` within the current tick
///
/// Returns the absolute tick time of the impact and the direction relative
/// to `collider`, or `None` when they do not meet before the tick ends.
pub fn entity_time_of_impact(collider: &CollisionObject, collided: &CollisionObject) -> Option<(f64, Direction)> {
    if collider.local_time < collided.local_time {
        return entity_time_of_impact(collided, collider).map(|(time, direction)| (time, direction.opposite()));
    }

    let mut collided_position = collided.bounding_box.position;
    for (axis, position) in collided_position.iter_mut().enumerate() {
        *position += collided.speed[axis] * (collider.local_time - collided.local_time);
    }

    let mut max_time_of_impact = 0.0;
    let mut min_time_of_separation = 1.0 - collider.local_time;
    let mut direction = None;

    for axis in 0..2 {
        let relative_speed = collider.speed[axis] - collided.speed[axis];
        let a = MovableSegment::new(
            collider.bounding_box.position[axis],
            collider.bounding_box.max(axis),
            collider.speed[axis],
        );
        let b = MovableSegment::new(
            collided_position[axis],
            collided_position[axis] + collided.bounding_box.bounds[axis],
            collided.speed[axis],
        );

        if !a.overlaps(&b) {
            if !a.should_impact(&b) {
                return None;
            }
            let time_of_impact = a.time_of_impact(&b);
            if time_of_impact > max_time_of_impact {
                max_time_of_impact = time_of_impact;
                match Direction::along_axis(axis, relative_speed) {
                    Some(d) => direction = Some(d),
                    None => continue,
                }
            }
            if a.should_separate(&b) {
                min_time_of_separation = f64::min(min_time_of_separation, a.time_of_separation(&b));
            }
        }

        if a.touches(&b) && a.should_separate(&b) && max_time_of_impact == 0.0 {
            match Direction::along_axis(axis, relative_speed) {
                Some(d) => direction = Some(d),
                None => continue,
            }
            min_time_of_separation = f64::min(min_time_of_separation, a.time_of_separation(&b));
        }
    }

    if min_time_of_separation > max_time_of_impact && max_time_of_impact < 1.0 - collider.local_time {
        return direction.map(|d| (collider.local_time + max_time_of_impact, d));
    }
    None
}
