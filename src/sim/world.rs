//! The gameplay world and its fixed-order tick
//!
//! One [`GameWorld`] exists per run. It owns the entity store, the player and
//! its attachments, the spawn controller and the starfield. Scenes reach it
//! through the session and hand in the shared services (RNG, audio) each
//! call.

use glam::Vec2;
use rand::Rng;

use super::entities::{Exhaust, Shield};
use super::input::TickInput;
use super::player::Player;
use super::spatial::{EntityKind, ObjectData, ShapeId};
use super::spawner::SpawnController;
use super::stars::Starfield;
use super::store::EntityStore;
use super::tags::Tags;
use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;
use crate::renderer::hud::{self, HudState};
use crate::renderer::{Frame, Sprite};
use crate::session::Services;
use crate::{heading, is_outside, screen_center};

/// What the scene should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSignal {
    Continue,
    /// Level finished; the world is ready for the level-start interstitial
    LevelComplete,
    /// Last life lost
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameWorld {
    pub store: EntityStore,
    pub player: Player,
    pub shield: Option<Shield>,
    pub exhaust: Option<Exhaust>,
    pub spawner: SpawnController,
    pub stars: Starfield,
    pub score: u32,
    pub level: u32,
    tps: u32,
}

impl GameWorld {
    /// Fresh run: level 1, full lives, new starfield
    pub fn new(services: &mut Services) -> Self {
        let tps = services.tps;
        let mut store = EntityStore::new();
        let collider = Self::register_player(&mut store);
        Self {
            store,
            player: Player::new(collider, tps),
            shield: None,
            exhaust: None,
            spawner: SpawnController::new(tps),
            stars: Starfield::generate(&mut services.rng, services.star_count),
            score: 0,
            level: 1,
            tps,
        }
    }

    fn register_player(store: &mut EntityStore) -> ShapeId {
        store
            .index
            .add_standalone(Player::shape_at(screen_center()), Tags::PLAYER, EntityKind::Player)
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &TickInput, services: &mut Services) -> TickSignal {
        self.update_player(input, services);
        self.update_attachments();

        self.player.update_dying();
        if self.player.is_dead() {
            self.player.lives = self.player.lives.saturating_sub(1);
            if self.player.lives == 0 {
                log::info!("game over at level {} with {} points", self.level, self.score);
                services.audio.pause(SoundEffect::AlienPresence);
                return TickSignal::GameOver;
            }
            self.reset_for_new_life(&mut services.audio);
        }

        let player_pos = self.player.pos;
        self.spawner.spawn_meteors(&mut self.store, &mut services.rng);
        self.spawner.spawn_aliens(&mut self.store, &mut services.rng, player_pos);
        self.move_aliens();
        self.spawner.alien_attack(
            &mut self.store,
            &mut services.rng,
            &mut services.audio,
            player_pos,
        );
        self.move_projectiles_and_meteors();
        self.spawner.speed_up_meteors();

        self.resolve_collisions(services);

        self.spawner.clean_up(&mut self.store);
        self.spawner.heartbeat.update(&mut services.audio);

        if self.spawner.level_cleared(&self.store) {
            self.complete_level();
            return TickSignal::LevelComplete;
        }

        self.prune_offscreen();
        TickSignal::Continue
    }

    /// Steering, weapons, shield and hyperspace. Input is ignored while the
    /// ship is dying or dead.
    fn update_player(&mut self, input: &TickInput, services: &mut Services) {
        if !self.player.is_alive() {
            self.player.cut_engine();
            self.exhaust = None;
            return;
        }

        let steering = self.player.steer(input);
        if steering.engine_on {
            services.audio.play(SoundEffect::Thrust);
        } else if steering.engine_released {
            services.audio.pause(SoundEffect::Thrust);
        }
        self.exhaust = steering.exhaust;

        if let Some(shot) = self.player.weapon.update(input.fire) {
            let rotation = self.player.rotation;
            let muzzle = self.player.pos + heading(rotation) * LASER_SPAWN_OFFSET;
            self.store.add_laser(muzzle, rotation);
            if let Some(sound) = SoundEffect::for_shot(shot) {
                services.audio.play(sound);
            }
        }

        if input.shield {
            self.raise_shield(&mut services.audio);
        }
        if self.player.update_shield() {
            self.lower_shield();
        }

        self.player.update_hyperspace();
        if input.hyperspace && self.player.hyperspace_ready() {
            let target = self.hyperspace_target(&mut services.rng);
            self.player.jump_to(target);
            log::debug!("hyperspace jump to {:?}", target);
        }

        self.store.sync(self.player.collider, self.player.pos);
    }

    /// Spend a charge and attach the shield. Returns false with no charge
    /// left or a shield already up.
    pub fn raise_shield(&mut self, audio: &mut AudioManager) -> bool {
        if !self.player.raise_shield() {
            return false;
        }
        let collider = self.store.index.add_standalone(
            Shield::shape(self.player.pos),
            Tags::SHIELD,
            EntityKind::Shield,
        );
        self.shield = Some(Shield {
            pos: self.player.pos,
            rotation: self.player.rotation,
            collider,
        });
        audio.play(SoundEffect::ShieldUp);
        true
    }

    fn lower_shield(&mut self) {
        self.player.drop_shield();
        if let Some(shield) = self.shield.take() {
            self.store.despawn(ObjectData {
                kind: EntityKind::Shield,
                id: shield.collider,
            });
        }
    }

    /// Random free spot for a player-sized probe, clear of the ship's
    /// current neighbourhood. Gives up after a fixed number of samples and
    /// takes the last one.
    fn hyperspace_target(&self, rng: &mut impl Rng) -> Vec2 {
        let mut exclude = vec![self.player.collider];
        exclude.extend(self.shield.as_ref().map(|s| s.collider));

        let index = &self.store.index;
        let mut candidate = self.player.pos;
        for _ in 0..HYPERSPACE_MAX_ATTEMPTS {
            candidate = Vec2::new(
                rng.random_range(0..SCREEN_WIDTH as u32) as f32,
                rng.random_range(0..SCREEN_HEIGHT as u32) as f32,
            );
            let probe = Player::shape_at(candidate);
            if !index.any_overlap(&probe, &exclude)
                && !index.any_overlap_near(&probe, self.player.collider, &[])
            {
                return candidate;
            }
        }
        log::debug!("no free hyperspace spot, using {:?}", candidate);
        candidate
    }

    /// Shield tracks the ship; the flame drifts off
    fn update_attachments(&mut self) {
        if let Some(exhaust) = self.exhaust.as_mut() {
            exhaust.step(self.tps);
        }
        if let Some(shield) = self.shield.as_mut() {
            shield.pos = self.player.pos;
            shield.rotation = self.player.rotation;
            let collider = shield.collider;
            self.store.sync(collider, self.player.pos);
        }
    }

    fn move_aliens(&mut self) {
        for (_, alien) in self.store.aliens.iter_mut() {
            alien.step();
            self.store.index.set_position(alien.collider, alien.pos);
        }
    }

    fn move_projectiles_and_meteors(&mut self) {
        let index = &mut self.store.index;
        for (_, bolt) in self.store.alien_lasers.iter_mut() {
            bolt.step(ALIEN_LASER_SPEED, self.tps);
            index.set_position(bolt.collider, bolt.pos);
        }
        for (_, meteor) in self.store.meteors.iter_mut() {
            meteor.rock.step();
            index.set_position(meteor.collider, meteor.rock.pos);
        }
        for (_, bolt) in self.store.lasers.iter_mut() {
            bolt.step(LASER_SPEED, self.tps);
            index.set_position(bolt.collider, bolt.pos);
        }
    }

    fn prune_offscreen(&mut self) {
        let mut gone: Vec<ObjectData> = Vec::new();
        gone.extend(
            self.store
                .aliens
                .iter()
                .filter(|(_, a)| a.has_left(ALIEN_OFFSCREEN_MARGIN))
                .map(|(id, _)| ObjectData {
                    kind: EntityKind::Alien,
                    id,
                }),
        );
        gone.extend(
            self.store
                .lasers
                .iter()
                .filter(|(_, l)| is_outside(l.pos, LASER_OFFSCREEN_MARGIN))
                .map(|(id, _)| ObjectData {
                    kind: EntityKind::Laser,
                    id,
                }),
        );
        gone.extend(
            self.store
                .alien_lasers
                .iter()
                .filter(|(_, l)| is_outside(l.pos, LASER_OFFSCREEN_MARGIN))
                .map(|(id, _)| ObjectData {
                    kind: EntityKind::AlienLaser,
                    id,
                }),
        );
        for data in gone {
            self.store.despawn(data);
        }
    }

    /// New ship at the centre and an empty field. Score, lives, shield
    /// charges, level, quota and stars carry over.
    fn reset_for_new_life(&mut self, audio: &mut AudioManager) {
        self.store.clear_entities();
        self.lower_shield();
        self.exhaust = None;

        self.store.index.remove(self.player.collider);
        let collider = Self::register_player(&mut self.store);
        self.player = self.player.respawn(collider);
        self.spawner.reset_for_new_life();

        audio.pause(SoundEffect::Thrust);
        audio.pause(SoundEffect::AlienPresence);
        log::info!("respawned, {} lives left", self.player.lives);
    }

    fn complete_level(&mut self) {
        self.spawner.base_speed = BASE_METEOR_SPEED;
        self.level += 1;
        if self.level % EXTRA_LIFE_EVERY_LEVELS == 0 && self.player.lives < MAX_LIVES {
            self.player.lives += 1;
            log::info!("extra life, now {}", self.player.lives);
        }
        self.spawner.heartbeat.reset_tempo();
        self.store.clear_lasers();
        log::info!("level complete, next is {}", self.level);
    }

    /// Called when the level-start interstitial hands back to gameplay
    pub fn begin_level(&mut self) {
        self.spawner.begin_level();
        self.store.clear_lasers();
    }

    /// Colliders owned outside the arenas
    pub fn standalone_colliders(&self) -> Vec<ShapeId> {
        let mut ids = vec![self.player.collider];
        ids.extend(self.shield.as_ref().map(|s| s.collider));
        ids
    }

    pub fn is_consistent(&self) -> bool {
        self.store.is_consistent(&self.standalone_colliders())
    }

    /// Stars, entities, then the HUD on top
    pub fn draw(&self, frame: &mut Frame, high_score: u32) {
        self.stars.draw(frame);

        if !self.player.is_dead() {
            frame.sprite(self.player.sprite(), self.player.pos, self.player.rotation);
        }
        if let Some(exhaust) = &self.exhaust {
            frame.sprite(Sprite::Exhaust, exhaust.pos, exhaust.rotation);
        }
        if let Some(shield) = &self.shield {
            frame.sprite(Sprite::Shield, shield.pos, shield.rotation);
        }

        for meteor in self.store.meteors.values() {
            frame.sprite(meteor.sprite(), meteor.pos(), meteor.rock.rotation);
        }
        for laser in self.store.lasers.values() {
            frame.sprite(Sprite::Laser, laser.pos, laser.rotation);
        }
        for alien in self.store.aliens.values() {
            frame.sprite(alien.sprite(), alien.pos, 0.0);
        }
        for laser in self.store.alien_lasers.values() {
            frame.sprite(Sprite::AlienLaser, laser.pos, laser.rotation);
        }

        hud::draw(
            frame,
            &HudState {
                score: self.score,
                high_score,
                level: self.level,
                lives: self.player.lives,
                shields: self.player.shields_remaining,
                hyperspace_ready: self.player.hyperspace_ready(),
            },
        );
    }
}
