//! Collision resolution
//!
//! Five stages run once per tick in a fixed order. Each stage reads the
//! spatial index, mutates entity state in place (explosions, bounces, score)
//! and buffers structural changes in a [`Commit`] that is applied when the
//! stage ends. Exploded meteors and aliens are debris and take no part.

use glam::Vec2;
use rand::Rng;

use super::entities::{MeteorSize, Rock};
use super::spatial::EntityKind;
use super::store::Commit;
use super::tags::Tags;
use super::world::GameWorld;
use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;
use crate::screen_center;
use crate::session::Services;

impl GameWorld {
    /// Run every stage in order
    pub(crate) fn resolve_collisions(&mut self, services: &mut Services) {
        self.player_hits_meteor(&mut services.audio);
        self.lasers_hit_meteors(services);
        self.player_hits_alien(&mut services.audio);
        self.alien_lasers_hit_player(&mut services.audio);
        self.lasers_hit_aliens(&mut services.audio);
    }

    /// Unshielded contact kills the player (first hit only). The shield
    /// pushes meteors away from the arena centre instead.
    fn player_hits_meteor(&mut self, audio: &mut AudioManager) {
        let shielded = self.player.is_shielded();
        let bounce_speed = self.spawner.base_speed * SHIELD_BOUNCE_FACTOR;

        for (_, data) in self.store.index.overlapping(self.player.collider, Tags::METEOR) {
            let Some(meteor) = self.store.meteors.get_mut(data.id) else {
                continue;
            };
            if meteor.exploded {
                continue;
            }
            if shielded {
                let away = (meteor.pos() - screen_center()).normalize_or_zero();
                meteor.rock.movement = away * bounce_speed;
            } else {
                self.kill_player(audio);
                break;
            }
        }
    }

    /// Lasers explode meteors; large ones leave a handful of small ones
    fn lasers_hit_meteors(&mut self, services: &mut Services) {
        let mut commit = Commit::default();

        for id in self.store.meteors.keys() {
            let Some(meteor) = self.store.meteors.get(id) else {
                continue;
            };
            if meteor.exploded {
                continue;
            }
            let laser = self
                .store
                .index
                .overlapping(meteor.collider, Tags::LASER)
                .into_iter()
                .map(|(_, data)| data)
                .find(|data| data.kind == EntityKind::Laser && !commit.is_despawning(*data));
            let Some(laser) = laser else {
                continue;
            };

            commit.despawn(laser);
            self.score += METEOR_POINTS;
            services.audio.play(SoundEffect::Explosion);

            let Some(meteor) = self.store.meteors.get_mut(id) else {
                continue;
            };
            meteor.exploded = true;
            if meteor.is_small() {
                continue;
            }

            let origin = meteor.pos();
            let children = services.rng.random_range(0..SPLIT_CHILDREN_MAX);
            for _ in 0..children {
                commit.spawn_meteor(split_child(&mut services.rng, origin));
            }
            log::debug!("meteor split into {} at {:?}", children, origin);
        }

        let spawned = commit.apply(&mut self.store);
        self.spawner.meteors_spawned += spawned as u32;
    }

    fn player_hits_alien(&mut self, audio: &mut AudioManager) {
        if self.player.is_shielded() {
            return;
        }
        let hit = self
            .store
            .index
            .overlapping(self.player.collider, Tags::ALIEN)
            .into_iter()
            .any(|(_, data)| self.store.aliens.get(data.id).is_some_and(|a| !a.exploded));
        if hit {
            self.kill_player(audio);
        }
    }

    /// Alien shots are used up on contact even when the shield absorbs them
    fn alien_lasers_hit_player(&mut self, audio: &mut AudioManager) {
        let mut commit = Commit::default();
        let shielded = self.player.is_shielded();

        for (_, data) in self.store.index.overlapping(self.player.collider, Tags::HOSTILE) {
            if !shielded {
                self.kill_player(audio);
            }
            commit.despawn(data);
        }
        commit.apply(&mut self.store);
    }

    fn lasers_hit_aliens(&mut self, audio: &mut AudioManager) {
        let mut commit = Commit::default();

        for id in self.store.aliens.keys() {
            let Some(alien) = self.store.aliens.get(id) else {
                continue;
            };
            if alien.exploded {
                continue;
            }
            let laser = self
                .store
                .index
                .overlapping(alien.collider, Tags::LASER)
                .into_iter()
                .map(|(_, data)| data)
                .find(|data| data.kind == EntityKind::Laser && !commit.is_despawning(*data));
            let Some(laser) = laser else {
                continue;
            };

            commit.despawn(laser);
            if let Some(alien) = self.store.aliens.get_mut(id) {
                alien.exploded = true;
            }
            self.score += ALIEN_POINTS;
            audio.play(SoundEffect::Explosion);
            log::debug!("alien destroyed, score {}", self.score);
        }
        commit.apply(&mut self.store);
    }

    /// Start the death animation. The explosion only sounds on the first hit.
    pub(crate) fn kill_player(&mut self, audio: &mut AudioManager) {
        if self.player.kill() {
            audio.play(SoundEffect::Explosion);
            audio.pause(SoundEffect::Thrust);
            self.exhaust = None;
            log::info!("player hit, {} lives left", self.player.lives);
        }
    }
}

/// Small meteor thrown off a large one at `origin`. It keeps the inward
/// heading it was rolled with on the ring.
fn split_child(rng: &mut impl Rng, origin: Vec2) -> Rock {
    let mut rock = Rock::on_ring(rng, MeteorSize::Small, BASE_METEOR_SPEED);
    let offset = || SPLIT_OFFSET_MIN as u32..SPLIT_OFFSET_MAX as u32;
    rock.pos = origin
        + Vec2::new(
            rng.random_range(offset()) as f32,
            rng.random_range(offset()) as f32,
        );
    rock
}
