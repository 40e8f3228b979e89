//! Broad-phase spatial index
//!
//! A uniform grid of square cells. Each collider is registered in every cell
//! its bounding box touches. Queries gather candidates from the cells around
//! the query region (one extra ring of cells) and run the exact shape test
//! only on those.
//!
//! Cells are keyed by integer coordinates rather than stored in a fixed
//! array: meteors and aliens spawn well outside the visible arena and still
//! need to be indexed.
//!
//! Queries never mutate the index and enumeration returns an owned `Vec`, so
//! callers can freely add or remove colliders after reading the results.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, Key};
use super::shape::Shape;
use super::tags::Tags;
use crate::consts::CELL_SIZE;

/// Handle to a registered collider
pub type ShapeId = Key;

/// Which collection an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Meteor,
    Alien,
    Laser,
    AlienLaser,
    Shield,
}

/// Back-reference from a collider to its owning entity slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectData {
    pub kind: EntityKind,
    pub id: Key,
}

#[derive(Debug, Clone)]
pub struct Collider {
    pub shape: Shape,
    pub tags: Tags,
    pub data: ObjectData,
}

type Cell = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min: Cell,
    max: Cell,
}

impl CellRange {
    fn of(shape: &Shape, cell_size: f32) -> Self {
        let (min, max) = shape.bounds();
        Self {
            min: cell_of(min, cell_size),
            max: cell_of(max, cell_size),
        }
    }

    fn grow(self, rings: i32) -> Self {
        Self {
            min: (self.min.0 - rings, self.min.1 - rings),
            max: (self.max.0 + rings, self.max.1 + rings),
        }
    }

    fn cells(self) -> impl Iterator<Item = Cell> {
        (self.min.1..=self.max.1)
            .flat_map(move |cy| (self.min.0..=self.max.0).map(move |cx| (cx, cy)))
    }
}

#[inline]
fn cell_of(p: Vec2, cell_size: f32) -> Cell {
    (
        (p.x / cell_size).floor() as i32,
        (p.y / cell_size).floor() as i32,
    )
}

#[derive(Debug, Clone)]
struct Entry {
    collider: Collider,
    cells: CellRange,
}

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f32,
    entries: Arena<Entry>,
    cells: HashMap<Cell, Vec<ShapeId>>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(CELL_SIZE)
    }
}

impl SpatialIndex {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            entries: Arena::new(),
            cells: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.entries.contains(id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Collider> {
        self.entries.get(id).map(|e| &e.collider)
    }

    /// Every registered collider, in handle order
    pub fn colliders(&self) -> impl Iterator<Item = (ShapeId, &Collider)> {
        self.entries.iter().map(|(id, e)| (id, &e.collider))
    }

    pub fn add(&mut self, collider: Collider) -> ShapeId {
        let cells = CellRange::of(&collider.shape, self.cell_size);
        let id = self.entries.insert(Entry { collider, cells });
        self.link(id, cells);
        id
    }

    /// Register a collider whose back-reference is its own handle (player,
    /// shield)
    pub fn add_standalone(&mut self, shape: Shape, tags: Tags, kind: EntityKind) -> ShapeId {
        let cells = CellRange::of(&shape, self.cell_size);
        let id = self.entries.insert_with(|id| Entry {
            collider: Collider {
                shape,
                tags,
                data: ObjectData { kind, id },
            },
            cells,
        });
        self.link(id, cells);
        id
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Collider> {
        let entry = self.entries.remove(id)?;
        self.unlink(id, entry.cells);
        Some(entry.collider)
    }

    /// Move a collider so its centre is `pos`, re-bucketing if it changed cells
    pub fn set_position(&mut self, id: ShapeId, pos: Vec2) {
        let cell_size = self.cell_size;
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        entry.collider.shape = entry.collider.shape.at(pos);
        let new_cells = CellRange::of(&entry.collider.shape, cell_size);
        let old_cells = entry.cells;
        if new_cells != old_cells {
            entry.cells = new_cells;
            self.unlink(id, old_cells);
            self.link(id, new_cells);
        }
    }

    /// Drop every collider. Handles already issued stay dead.
    pub fn clear(&mut self) {
        self.entries.drain();
        self.cells.clear();
    }

    /// Exact test between two registered colliders
    pub fn intersects(&self, a: ShapeId, b: ShapeId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.shape.intersects(&b.shape),
            _ => false,
        }
    }

    /// Broad query: does `probe` overlap anything in its own neighbourhood?
    ///
    /// Stops at the first overlap. Colliders listed in `exclude` are skipped.
    pub fn any_overlap(&self, probe: &Shape, exclude: &[ShapeId]) -> bool {
        let region = CellRange::of(probe, self.cell_size).grow(1);
        self.any_in_region(probe, region, exclude)
    }

    /// Narrow query: test `probe` only against colliders near `target`.
    ///
    /// Returns false if `target` is not registered.
    pub fn any_overlap_near(&self, probe: &Shape, target: ShapeId, exclude: &[ShapeId]) -> bool {
        let Some(entry) = self.entries.get(target) else {
            return false;
        };
        let region = entry.cells.grow(1);
        self.any_in_region(probe, region, exclude)
    }

    /// Every collider carrying any of `filter`'s tags that overlaps `id`.
    ///
    /// Results are sorted by handle so callers see a stable order.
    pub fn overlapping(&self, id: ShapeId, filter: Tags) -> Vec<(ShapeId, ObjectData)> {
        let Some(entry) = self.entries.get(id) else {
            return Vec::new();
        };
        let shape = entry.collider.shape;
        let mut hits: Vec<(ShapeId, ObjectData)> = self
            .candidates(entry.cells.grow(1))
            .into_iter()
            .filter(|&other| other != id)
            .filter_map(|other| {
                let c = &self.entries.get(other)?.collider;
                (c.tags.intersects(filter) && c.shape.intersects(&shape)).then_some((other, c.data))
            })
            .collect();
        hits.sort_by_key(|(other, _)| *other);
        hits
    }

    fn any_in_region(&self, probe: &Shape, region: CellRange, exclude: &[ShapeId]) -> bool {
        region.cells().any(|cell| {
            self.cells.get(&cell).is_some_and(|ids| {
                ids.iter().any(|id| {
                    !exclude.contains(id)
                        && self
                            .entries
                            .get(*id)
                            .is_some_and(|e| e.collider.shape.intersects(probe))
                })
            })
        })
    }

    /// Unique colliders registered in `region`
    fn candidates(&self, region: CellRange) -> Vec<ShapeId> {
        let mut out: Vec<ShapeId> = region
            .cells()
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .collect();
        out.sort();
        out.dedup();
        out
    }

    fn link(&mut self, id: ShapeId, range: CellRange) {
        for cell in range.cells() {
            self.cells.entry(cell).or_default().push(id);
        }
    }

    fn unlink(&mut self, id: ShapeId, range: CellRange) {
        for cell in range.cells() {
            if let Some(ids) = self.cells.get_mut(&cell) {
                ids.retain(|&other| other != id);
                if ids.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(kind: EntityKind) -> ObjectData {
        ObjectData {
            kind,
            id: Arena::<()>::new().insert(()),
        }
    }

    fn circle_at(index: &mut SpatialIndex, pos: Vec2, radius: f32, tags: Tags) -> ShapeId {
        index.add(Collider {
            shape: Shape::circle(pos, radius),
            tags,
            data: data(EntityKind::Meteor),
        })
    }

    #[test]
    fn test_add_remove() {
        let mut index = SpatialIndex::default();
        let id = circle_at(&mut index, Vec2::new(100.0, 100.0), 10.0, Tags::METEOR);
        assert_eq!(index.len(), 1);
        assert!(index.any_overlap(&Shape::circle(Vec2::new(105.0, 100.0), 2.0), &[]));

        assert!(index.remove(id).is_some());
        assert!(index.is_empty());
        assert!(!index.any_overlap(&Shape::circle(Vec2::new(105.0, 100.0), 2.0), &[]));
        assert!(index.cells.is_empty());
    }

    #[test]
    fn test_broad_query_respects_exclude() {
        let mut index = SpatialIndex::default();
        let id = circle_at(&mut index, Vec2::new(50.0, 50.0), 10.0, Tags::PLAYER);
        let probe = Shape::circle(Vec2::new(50.0, 50.0), 10.0);
        assert!(index.any_overlap(&probe, &[]));
        assert!(!index.any_overlap(&probe, &[id]));
    }

    #[test]
    fn test_set_position_rebuckets() {
        let mut index = SpatialIndex::default();
        let id = circle_at(&mut index, Vec2::new(10.0, 10.0), 4.0, Tags::METEOR);
        index.set_position(id, Vec2::new(500.0, 400.0));

        assert!(!index.any_overlap(&Shape::circle(Vec2::new(10.0, 10.0), 4.0), &[]));
        assert!(index.any_overlap(&Shape::circle(Vec2::new(500.0, 400.0), 4.0), &[]));
        assert_eq!(index.get(id).map(|c| c.shape.center()), Some(Vec2::new(500.0, 400.0)));
    }

    #[test]
    fn test_offscreen_colliders_are_indexed() {
        let mut index = SpatialIndex::default();
        circle_at(&mut index, Vec2::new(-300.0, 1500.0), 20.0, Tags::METEOR);
        assert!(index.any_overlap(&Shape::circle(Vec2::new(-290.0, 1500.0), 5.0), &[]));
    }

    #[test]
    fn test_narrow_query_only_looks_near_target() {
        let mut index = SpatialIndex::default();
        let target = circle_at(&mut index, Vec2::new(100.0, 100.0), 8.0, Tags::PLAYER);
        circle_at(&mut index, Vec2::new(900.0, 600.0), 8.0, Tags::METEOR);

        // Probe sits on the far meteor but the search is bounded to the target
        let probe = Shape::circle(Vec2::new(900.0, 600.0), 8.0);
        assert!(index.any_overlap(&probe, &[]));
        assert!(!index.any_overlap_near(&probe, target, &[]));

        let near_probe = Shape::circle(Vec2::new(104.0, 100.0), 2.0);
        assert!(index.any_overlap_near(&near_probe, target, &[]));
    }

    #[test]
    fn test_overlapping_filters_by_tag_and_sorts() {
        let mut index = SpatialIndex::default();
        let meteor = circle_at(&mut index, Vec2::new(200.0, 200.0), 30.0, Tags::METEOR);
        let laser_a = index.add(Collider {
            shape: Shape::rect(Vec2::new(210.0, 200.0), Vec2::new(4.0, 20.0)),
            tags: Tags::LASER,
            data: data(EntityKind::Laser),
        });
        let hostile = index.add(Collider {
            shape: Shape::rect(Vec2::new(190.0, 200.0), Vec2::new(4.0, 20.0)),
            tags: Tags::LASER | Tags::HOSTILE,
            data: data(EntityKind::AlienLaser),
        });
        let laser_b = index.add(Collider {
            shape: Shape::rect(Vec2::new(200.0, 215.0), Vec2::new(4.0, 20.0)),
            tags: Tags::LASER,
            data: data(EntityKind::Laser),
        });

        let hits = index.overlapping(meteor, Tags::LASER);
        let ids: Vec<_> = hits.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![laser_a, hostile, laser_b]);

        let hostile_hits = index.overlapping(meteor, Tags::HOSTILE);
        assert_eq!(hostile_hits.len(), 1);
        assert_eq!(hostile_hits[0].1.kind, EntityKind::AlienLaser);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut index = SpatialIndex::default();
        let old = circle_at(&mut index, Vec2::new(40.0, 40.0), 5.0, Tags::METEOR);
        index.clear();
        assert!(index.is_empty());
        assert!(index.cells.is_empty());
        let new = circle_at(&mut index, Vec2::new(40.0, 40.0), 5.0, Tags::METEOR);
        assert_ne!(old, new);
        assert!(index.get(old).is_none());
    }

    #[test]
    fn test_large_collider_spans_many_cells() {
        let mut index = SpatialIndex::default();
        let id = circle_at(&mut index, Vec2::new(100.0, 100.0), 60.0, Tags::SHIELD);
        assert!(index.any_overlap(&Shape::circle(Vec2::new(150.0, 100.0), 2.0), &[]));
        index.remove(id);
        assert!(index.cells.is_empty());
    }
}
