//! Per-kind entity collections plus the spatial index they share
//!
//! Every insert registers the entity's collider and every removal drops it,
//! so the two can only change together. Structural changes discovered while
//! scanning (collisions, splits) go through a [`Commit`] buffer and are
//! applied after the scan.

use glam::Vec2;

use super::arena::{Arena, Key};
use super::entities::{Alien, AlienLaser, AlienSpawn, Bolt, Laser, Meteor, Rock};
use super::spatial::{Collider, EntityKind, ObjectData, ShapeId, SpatialIndex};
use super::tags::Tags;

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub index: SpatialIndex,
    pub meteors: Arena<Meteor>,
    pub aliens: Arena<Alien>,
    pub lasers: Arena<Laser>,
    pub alien_lasers: Arena<AlienLaser>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_meteor(&mut self, rock: Rock) -> Key {
        let index = &mut self.index;
        self.meteors.insert_with(|id| {
            let collider = index.add(Collider {
                shape: rock.shape(),
                tags: rock.size.tags(),
                data: ObjectData {
                    kind: EntityKind::Meteor,
                    id,
                },
            });
            Meteor::new(rock, collider)
        })
    }

    pub fn add_alien(&mut self, spawn: AlienSpawn) -> Key {
        let index = &mut self.index;
        self.aliens.insert_with(|id| {
            let collider = index.add(Collider {
                shape: spawn.shape(),
                tags: Tags::ALIEN,
                data: ObjectData {
                    kind: EntityKind::Alien,
                    id,
                },
            });
            Alien::new(spawn, collider)
        })
    }

    pub fn add_laser(&mut self, pos: Vec2, rotation: f32) -> Key {
        Self::add_bolt(&mut self.index, &mut self.lasers, pos, rotation, EntityKind::Laser)
    }

    pub fn add_alien_laser(&mut self, pos: Vec2, rotation: f32) -> Key {
        Self::add_bolt(
            &mut self.index,
            &mut self.alien_lasers,
            pos,
            rotation,
            EntityKind::AlienLaser,
        )
    }

    fn add_bolt(
        index: &mut SpatialIndex,
        arena: &mut Arena<Bolt>,
        pos: Vec2,
        rotation: f32,
        kind: EntityKind,
    ) -> Key {
        let tags = match kind {
            EntityKind::AlienLaser => Tags::LASER | Tags::HOSTILE,
            _ => Tags::LASER,
        };
        arena.insert_with(|id| {
            let collider = index.add(Collider {
                shape: Bolt::shape(pos),
                tags,
                data: ObjectData { kind, id },
            });
            Bolt {
                pos,
                rotation,
                collider,
            }
        })
    }

    /// Remove an entity and its collider. Returns false if it was already gone.
    pub fn despawn(&mut self, data: ObjectData) -> bool {
        let collider = match data.kind {
            EntityKind::Meteor => self.meteors.remove(data.id).map(|m| m.collider),
            EntityKind::Alien => self.aliens.remove(data.id).map(|a| a.collider),
            EntityKind::Laser => self.lasers.remove(data.id).map(|l| l.collider),
            EntityKind::AlienLaser => self.alien_lasers.remove(data.id).map(|l| l.collider),
            // Standalone colliders are their own handle
            EntityKind::Player | EntityKind::Shield => Some(data.id),
        };
        match collider {
            Some(id) => {
                self.index.remove(id);
                log::debug!("despawned {:?}", data);
                true
            }
            None => false,
        }
    }

    /// Remove every player laser
    pub fn clear_lasers(&mut self) {
        for (_, laser) in self.lasers.drain() {
            self.index.remove(laser.collider);
        }
    }

    /// Remove every meteor, alien and laser. Standalone colliders stay.
    pub fn clear_entities(&mut self) {
        for (_, m) in self.meteors.drain() {
            self.index.remove(m.collider);
        }
        for (_, a) in self.aliens.drain() {
            self.index.remove(a.collider);
        }
        self.clear_lasers();
        for (_, l) in self.alien_lasers.drain() {
            self.index.remove(l.collider);
        }
    }

    /// Move a collider to follow its entity
    pub fn sync(&mut self, collider: ShapeId, pos: Vec2) {
        self.index.set_position(collider, pos);
    }

    /// Number of entities with a collider, standalone ones excluded
    pub fn entity_count(&self) -> usize {
        self.meteors.len() + self.aliens.len() + self.lasers.len() + self.alien_lasers.len()
    }

    /// Entities and colliders match one-to-one.
    ///
    /// `standalone` lists colliders owned outside the arenas (player, shield).
    pub fn is_consistent(&self, standalone: &[ShapeId]) -> bool {
        if self.index.len() != self.entity_count() + standalone.len() {
            return false;
        }
        let owned = |data: ObjectData, collider: ShapeId| match data.kind {
            EntityKind::Meteor => self.meteors.get(data.id).is_some_and(|m| m.collider == collider),
            EntityKind::Alien => self.aliens.get(data.id).is_some_and(|a| a.collider == collider),
            EntityKind::Laser => self.lasers.get(data.id).is_some_and(|l| l.collider == collider),
            EntityKind::AlienLaser => self
                .alien_lasers
                .get(data.id)
                .is_some_and(|l| l.collider == collider),
            EntityKind::Player | EntityKind::Shield => {
                data.id == collider && standalone.contains(&collider)
            }
        };
        self.index.colliders().all(|(id, c)| owned(c.data, id))
    }
}

/// Buffered structural changes for one resolver stage
#[derive(Debug, Default)]
pub struct Commit {
    despawns: Vec<ObjectData>,
    meteors: Vec<Rock>,
}

impl Commit {
    pub fn despawn(&mut self, data: ObjectData) {
        if !self.despawns.contains(&data) {
            self.despawns.push(data);
        }
    }

    /// Already queued for removal this stage
    pub fn is_despawning(&self, data: ObjectData) -> bool {
        self.despawns.contains(&data)
    }

    pub fn spawn_meteor(&mut self, rock: Rock) {
        self.meteors.push(rock);
    }

    pub fn is_empty(&self) -> bool {
        self.despawns.is_empty() && self.meteors.is_empty()
    }

    /// Apply removals, then additions. Returns the number of meteors added.
    pub fn apply(self, store: &mut EntityStore) -> usize {
        for data in self.despawns {
            store.despawn(data);
        }
        let spawned = self.meteors.len();
        for rock in self.meteors {
            store.add_meteor(rock);
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{AlienPattern, MeteorSize};
    use crate::sim::shape::Shape;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn populated() -> (EntityStore, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut store = EntityStore::new();
        for _ in 0..5 {
            store.add_meteor(Rock::on_ring(&mut rng, MeteorSize::Large, 0.25));
        }
        store.add_alien(AlienSpawn::new(&mut rng, AlienPattern::SweepLeft, 0.5, Vec2::ZERO));
        store.add_laser(Vec2::new(100.0, 100.0), 0.0);
        store.add_alien_laser(Vec2::new(300.0, 100.0), 1.0);
        (store, rng)
    }

    #[test]
    fn test_insert_registers_collider_with_back_reference() {
        let (store, _) = populated();
        assert_eq!(store.index.len(), 8);
        assert!(store.is_consistent(&[]));

        for (key, meteor) in store.meteors.iter() {
            let collider = store.index.get(meteor.collider).unwrap();
            assert_eq!(collider.data.id, key);
            assert!(collider.tags.contains(Tags::METEOR | Tags::LARGE));
        }
        let (_, hostile) = store.alien_lasers.iter().next().unwrap();
        assert!(store.index.get(hostile.collider).unwrap().tags.contains(Tags::HOSTILE));
    }

    #[test]
    fn test_despawn_leaves_no_orphans() {
        let (mut store, _) = populated();
        let victims: Vec<Key> = store.meteors.keys().into_iter().take(3).collect();
        for id in &victims {
            assert!(store.despawn(ObjectData {
                kind: EntityKind::Meteor,
                id: *id,
            }));
        }
        assert!(!store.despawn(ObjectData {
            kind: EntityKind::Meteor,
            id: victims[0],
        }));
        assert_eq!(store.meteors.len(), 2);
        assert_eq!(store.index.len(), 5);
        assert!(store.is_consistent(&[]));
    }

    #[test]
    fn test_commit_defers_and_dedups() {
        let (mut store, mut rng) = populated();
        let id = store.meteors.keys()[0];
        let data = ObjectData {
            kind: EntityKind::Meteor,
            id,
        };

        let mut commit = Commit::default();
        commit.despawn(data);
        commit.despawn(data);
        commit.spawn_meteor(Rock::on_ring(&mut rng, MeteorSize::Small, 0.25));
        assert!(commit.is_despawning(data));
        // Nothing changes until applied
        assert_eq!(store.meteors.len(), 5);

        assert_eq!(commit.apply(&mut store), 1);
        assert_eq!(store.meteors.len(), 5);
        assert!(!store.meteors.contains(id));
        assert!(store.is_consistent(&[]));
    }

    #[test]
    fn test_standalone_colliders() {
        let (mut store, _) = populated();
        let player = store.index.add_standalone(
            Shape::circle(Vec2::new(640.0, 360.0), 10.0),
            Tags::PLAYER,
            EntityKind::Player,
        );
        assert!(store.is_consistent(&[player]));
        assert!(!store.is_consistent(&[]));

        store.clear_entities();
        assert_eq!(store.entity_count(), 0);
        assert_eq!(store.index.len(), 1);
        assert!(store.is_consistent(&[player]));

        assert!(store.despawn(ObjectData {
            kind: EntityKind::Player,
            id: player,
        }));
        assert!(store.index.is_empty());
    }

    #[test]
    fn test_handles_not_reissued() {
        let (mut store, mut rng) = populated();
        let old: Vec<Key> = store.meteors.keys();
        store.clear_entities();
        let fresh = store.add_meteor(Rock::on_ring(&mut rng, MeteorSize::Large, 0.25));
        assert!(!old.contains(&fresh));
        assert_eq!(store.meteors.inserted(), 6);
    }
}
