//! Quadtree over the swept boxes of a collision pass
//!
//! Items are indices into the slice of [`CollisionObject`]s the tree was
//! filled from; that slice must be passed back to every call.

use crate::sweep::{CollisionObject, FloatBox};
use crate::Aabb;

pub const DEFAULT_NODE_CAPACITY: usize = 32;
pub const DEFAULT_MAX_DEPTH: usize = 5;

// Child order
const LOWER_LEFT: usize = 0;
const UPPER_LEFT: usize = 1;
const UPPER_RIGHT: usize = 2;
const LOWER_RIGHT: usize = 3;

#[derive(Debug, Clone)]
pub struct QuadTree {
    bounds: Aabb,
    center: [f64; 2],
    node_capacity: usize,
    max_depth: usize,
    items: Vec<usize>,
    children: Vec<QuadTree>,
}

impl QuadTree {
    pub fn new(bounds: Aabb, node_capacity: usize, max_depth: usize) -> Self {
        let position = bounds.position.as_f64();
        let size = bounds.bounds.as_f64();
        Self {
            bounds,
            center: [position[0] + size[0] / 2.0, position[1] + size[1] / 2.0],
            node_capacity,
            max_depth,
            items: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Insert `objects[index]`
    pub fn insert(&mut self, index: usize, objects: &[CollisionObject]) {
        if self.is_leaf() {
            self.items.push(index);
            if self.items.len() > self.node_capacity && self.max_depth > 0 {
                self.split(objects);
            }
        } else {
            self.insert_into_children(index, objects);
        }
    }

    fn split(&mut self, objects: &[CollisionObject]) {
        let position = self.bounds.position;
        let (width, height) = (self.bounds.bounds.x, self.bounds.bounds.y);
        let (width_low, height_low) = (width / 2, height / 2);
        let (width_high, height_high) = (width - width_low, height - height_low);

        let (node_capacity, max_depth) = (self.node_capacity, self.max_depth - 1);
        let child = |x: i32, y: i32, w: i32, h: i32| {
            QuadTree::new(Aabb::from_coords(position.x + x, position.y + y, w, h), node_capacity, max_depth)
        };
        self.children = vec![
            child(0, 0, width_low, height_low),
            child(0, height_low, width_low, height_high),
            child(width_low, height_low, width_high, height_high),
            child(width_low, 0, width_high, height_low),
        ];

        for index in std::mem::take(&mut self.items) {
            self.insert_into_children(index, objects);
        }
    }

    fn insert_into_children(&mut self, index: usize, objects: &[CollisionObject]) {
        let swept = objects[index].swept_box;
        if swept.contains_point(self.center) {
            self.items.push(index);
            return;
        }
        for child in self.children_overlapping(&swept, false) {
            self.children[child].insert(index, objects);
        }
    }

    /// Children a box reaches into. Queries also visit right-hand children
    /// whose edge the box only touches.
    fn children_overlapping(&self, area: &FloatBox, touching_right: bool) -> Vec<usize> {
        let [cx, cy] = self.center;
        let left = area.position[0] <= cx;
        let right = if touching_right { area.max(0) >= cx } else { area.max(0) > cx };
        let low = area.position[1] <= cy;
        let high = area.max(1) >= cy;

        let mut children = Vec::with_capacity(4);
        if left && low {
            children.push(LOWER_LEFT);
        }
        if left && high {
            children.push(UPPER_LEFT);
        }
        if right && low {
            children.push(LOWER_RIGHT);
        }
        if right && high {
            children.push(UPPER_RIGHT);
        }
        children
    }

    /// Indices of the objects whose swept box strictly intersects `area`,
    /// each reported once, in ascending order
    pub fn intersect(&self, area: &FloatBox, objects: &[CollisionObject]) -> Vec<usize> {
        let mut results = Vec::new();
        self.intersect_into(area, objects, &mut results);
        // objects spanning several children are found once per child
        results.sort_unstable();
        results.dedup();
        results
    }

    fn intersect_into(&self, area: &FloatBox, objects: &[CollisionObject], results: &mut Vec<usize>) {
        if !self.is_leaf() {
            for child in self.children_overlapping(area, true) {
                self.children[child].intersect_into(area, objects, results);
            }
        }
        results.extend(
            self.items
                .iter()
                .copied()
                .filter(|&index| area.intersects(&objects[index].swept_box)),
        );
    }

    /// Number of items stored in this node and below, duplicates included
    pub fn len(&self) -> usize {
        self.items.len() + self.children.iter().map(QuadTree::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Body, WorldObject};
    use tilekit_math::IVec2;

    fn objects(boxes: &[(i32, i32, i32, i32)]) -> Vec<CollisionObject> {
        boxes
            .iter()
            .enumerate()
            .map(|(index, &(x, y, w, h))| {
                let body = Body::new(IVec2::ZERO);
                let object = WorldObject::entity(Aabb::from_coords(x, y, w, h), body.clone());
                CollisionObject::new(index, &object, &body, 0.0)
            })
            .collect()
    }

    fn tree(objects: &[CollisionObject], capacity: usize) -> QuadTree {
        let mut tree = QuadTree::new(Aabb::from_coords(0, 0, 128, 128), capacity, DEFAULT_MAX_DEPTH);
        for index in 0..objects.len() {
            tree.insert(index, objects);
        }
        tree
    }

    #[test]
    fn test_leaf_splits_over_capacity() {
        let objects = objects(&[(0, 0, 4, 4), (100, 0, 4, 4), (0, 100, 4, 4)]);
        let tree = tree(&objects, 2);
        assert!(!tree.is_leaf());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_query_each_quadrant() {
        let boxes = [(2, 2, 4, 4), (2, 100, 4, 4), (100, 100, 4, 4), (100, 2, 4, 4), (60, 60, 8, 8)];
        let objects = objects(&boxes);
        let tree = tree(&objects, 1);

        for (index, &(x, y, w, h)) in boxes.iter().enumerate() {
            let area = FloatBox::new([x as f64, y as f64], [w as f64, h as f64]);
            assert_eq!(tree.intersect(&area, &objects), vec![index], "object {}", index);
        }
    }

    #[test]
    fn test_object_across_children_reported_once() {
        let objects = objects(&[(0, 0, 4, 4), (10, 10, 4, 4), (20, 20, 4, 4), (30, 50, 80, 4)]);
        let tree = tree(&objects, 1);
        let area = FloatBox::new([0.0, 0.0], [128.0, 128.0]);
        assert!(tree.len() > objects.len());
        assert_eq!(tree.intersect(&area, &objects), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_touching_is_not_intersecting() {
        let objects = objects(&[(0, 0, 4, 4)]);
        let tree = tree(&objects, DEFAULT_NODE_CAPACITY);
        let area = FloatBox::new([4.0, 0.0], [4.0, 4.0]);
        assert!(tree.intersect(&area, &objects).is_empty());
    }
}
