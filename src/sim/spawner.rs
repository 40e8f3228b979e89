//! Population and pacing
//!
//! Owns every gameplay cadence that is not tied to the player: meteor and
//! alien spawning, alien volleys, the meteor speed ramp, the explosion sweep
//! and the heartbeat.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{AlienPattern, AlienSpawn, MeteorSize, Rock};
use super::spatial::{EntityKind, ObjectData};
use super::store::EntityStore;
use super::timer::Timer;
use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;
use crate::heading;
use crate::renderer::Sprite;

/// Alternating two-tone beat that speeds up as the level goes on
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Heartbeat {
    timer: Timer,
    wait_ms: u64,
    play_beat_one: bool,
    tps: u32,
}

impl Heartbeat {
    pub fn new(tps: u32) -> Self {
        Self {
            timer: Timer::new(BEAT_START, tps),
            wait_ms: BEAT_BASE_WAIT_MS,
            play_beat_one: false,
            tps,
        }
    }

    /// Returns the beat played this tick, if any
    pub fn update(&mut self, audio: &mut AudioManager) -> Option<SoundEffect> {
        self.timer.update();
        if !self.timer.is_ready() {
            return None;
        }
        self.timer.reset();

        let beat = if self.play_beat_one {
            SoundEffect::BeatOne
        } else {
            SoundEffect::BeatTwo
        };
        audio.restart(beat);
        self.play_beat_one = !self.play_beat_one;

        if self.wait_ms > BEAT_MIN_WAIT_MS {
            self.wait_ms -= BEAT_STEP_MS;
            self.timer = Timer::new(Duration::from_millis(self.wait_ms), self.tps);
        }
        Some(beat)
    }

    /// Back to the slow tempo; takes effect after the pending beat
    pub fn reset_tempo(&mut self) {
        self.wait_ms = BEAT_BASE_WAIT_MS;
    }

    pub fn wait_ms(&self) -> u64 {
        self.wait_ms
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnController {
    meteor_spawn: Timer,
    speed_up: Timer,
    alien_spawn: Timer,
    alien_attack: Timer,
    cleanup: Timer,
    pub heartbeat: Heartbeat,
    /// Current large-meteor speed before jitter
    pub base_speed: f32,
    /// Spawn quota for this level
    pub meteors_for_level: u32,
    /// Meteors spawned toward the quota (split children included)
    pub meteors_spawned: u32,
}

impl SpawnController {
    pub fn new(tps: u32) -> Self {
        Self {
            meteor_spawn: Timer::new(METEOR_SPAWN_TIME, tps),
            speed_up: Timer::new(METEOR_SPEED_UP_TIME, tps),
            alien_spawn: Timer::new(ALIEN_SPAWN_TIME, tps),
            alien_attack: Timer::new(ALIEN_ATTACK_TIME, tps),
            cleanup: Timer::new(CLEANUP_TIME, tps),
            heartbeat: Heartbeat::new(tps),
            base_speed: BASE_METEOR_SPEED,
            meteors_for_level: METEORS_FIRST_LEVEL,
            meteors_spawned: 0,
        }
    }

    /// One large meteor per interval while under the level quota
    pub fn spawn_meteors(&mut self, store: &mut EntityStore, rng: &mut impl Rng) {
        self.meteor_spawn.update();
        if !self.meteor_spawn.is_ready() {
            return;
        }
        self.meteor_spawn.reset();

        let cap = self.meteors_for_level as usize;
        if store.meteors.len() < cap && self.meteors_spawned < self.meteors_for_level {
            store.add_meteor(Rock::on_ring(rng, MeteorSize::Large, self.base_speed));
            self.meteors_spawned += 1;
            log::debug!(
                "meteor spawned ({}/{})",
                self.meteors_spawned,
                self.meteors_for_level
            );
        }
    }

    /// Coin-flip spawn attempt per interval while no alien is around
    pub fn spawn_aliens(&mut self, store: &mut EntityStore, rng: &mut impl Rng, player_pos: Vec2) {
        self.alien_spawn.update();
        if !store.aliens.is_empty() || !self.alien_spawn.is_ready() {
            return;
        }
        self.alien_spawn.reset();

        if rng.random_range(1..100) > 50 {
            let pattern = AlienPattern::random(rng);
            store.add_alien(AlienSpawn::new(rng, pattern, BASE_ALIEN_SPEED, player_pos));
            log::debug!("alien spawned: {:?}", pattern);
        }
    }

    /// Ambient loop while aliens are present; every live alien fires on the
    /// attack cadence
    pub fn alien_attack(
        &mut self,
        store: &mut EntityStore,
        rng: &mut impl Rng,
        audio: &mut AudioManager,
        player_pos: Vec2,
    ) {
        if store.aliens.is_empty() {
            audio.pause(SoundEffect::AlienPresence);
            return;
        }
        audio.play(SoundEffect::AlienPresence);

        self.alien_attack.update();
        if !self.alien_attack.is_ready() {
            return;
        }
        self.alien_attack.reset();

        let shots: Vec<(Vec2, f32)> = store
            .aliens
            .values()
            .filter(|a| !a.exploded)
            .map(|alien| {
                let r = alien.aim(rng, player_pos);
                let muzzle = alien.pos + heading(r) * Sprite::Alien(alien.variant).half_width();
                (muzzle, r)
            })
            .collect();
        for (pos, rotation) in shots {
            store.add_alien_laser(pos, rotation);
            audio.play(SoundEffect::AlienLaser);
        }
    }

    pub fn speed_up_meteors(&mut self) {
        self.speed_up.update();
        if self.speed_up.is_ready() {
            self.speed_up.reset();
            self.base_speed += METEOR_SPEED_UP_AMOUNT;
        }
    }

    /// Periodically remove exploded meteors and aliens
    pub fn clean_up(&mut self, store: &mut EntityStore) {
        self.cleanup.update();
        if !self.cleanup.is_ready() {
            return;
        }
        self.cleanup.reset();

        let mut debris: Vec<ObjectData> = store
            .meteors
            .iter()
            .filter(|(_, m)| m.exploded)
            .map(|(id, _)| ObjectData {
                kind: EntityKind::Meteor,
                id,
            })
            .collect();
        debris.extend(store.aliens.iter().filter(|(_, a)| a.exploded).map(|(id, _)| {
            ObjectData {
                kind: EntityKind::Alien,
                id,
            }
        }));
        for data in debris {
            store.despawn(data);
        }
    }

    /// Quota met and the field is clear
    pub fn level_cleared(&self, store: &EntityStore) -> bool {
        store.meteors.is_empty() && self.meteors_spawned >= self.meteors_for_level
    }

    /// Timers and speed back to the start of the level, keeping the quota
    pub fn reset_for_new_life(&mut self) {
        self.meteor_spawn.reset();
        self.speed_up.reset();
        self.base_speed = BASE_METEOR_SPEED;
        self.meteors_spawned = 0;
    }

    /// Raise the quota for the next level and start counting again
    pub fn begin_level(&mut self) {
        self.meteors_for_level += METEORS_PER_LEVEL_INCREMENT;
        self.meteors_spawned = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_meteor_quota() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut store = EntityStore::new();
        let mut spawner = SpawnController::new(60);

        // 100 ms at 60 tps is 6 ticks
        for _ in 0..600 {
            spawner.spawn_meteors(&mut store, &mut rng);
        }
        assert_eq!(store.meteors.len(), METEORS_FIRST_LEVEL as usize);
        assert_eq!(spawner.meteors_spawned, METEORS_FIRST_LEVEL);
        assert!(!spawner.level_cleared(&store));

        store.clear_entities();
        assert!(spawner.level_cleared(&store));

        spawner.begin_level();
        assert_eq!(spawner.meteors_for_level, 4);
        assert!(!spawner.level_cleared(&store));
    }

    #[test]
    fn test_speed_ramp_and_reset() {
        let mut spawner = SpawnController::new(10);
        for _ in 0..30 {
            spawner.speed_up_meteors();
        }
        assert!((spawner.base_speed - (BASE_METEOR_SPEED + 0.3)).abs() < 1e-5);
        spawner.reset_for_new_life();
        assert_eq!(spawner.base_speed, BASE_METEOR_SPEED);
    }

    #[test]
    fn test_at_most_one_alien() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut store = EntityStore::new();
        let mut spawner = SpawnController::new(10);
        for _ in 0..500 {
            spawner.spawn_aliens(&mut store, &mut rng, Vec2::new(640.0, 360.0));
            assert!(store.aliens.len() <= 1);
        }
        assert_eq!(store.aliens.len(), 1);
    }

    #[test]
    fn test_aliens_fire_on_cadence() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut audio = AudioManager::default();
        let mut store = EntityStore::new();
        let mut spawner = SpawnController::new(10);
        store.add_alien(AlienSpawn::new(
            &mut rng,
            AlienPattern::Seeker,
            BASE_ALIEN_SPEED,
            Vec2::new(640.0, 360.0),
        ));

        // 3 s at 10 tps
        for _ in 0..29 {
            spawner.alien_attack(&mut store, &mut rng, &mut audio, Vec2::new(640.0, 360.0));
        }
        assert!(store.alien_lasers.is_empty());
        assert!(audio.is_playing(SoundEffect::AlienPresence));
        spawner.alien_attack(&mut store, &mut rng, &mut audio, Vec2::new(640.0, 360.0));
        assert_eq!(store.alien_lasers.len(), 1);
        assert!(store.is_consistent(&[]));

        store.clear_entities();
        spawner.alien_attack(&mut store, &mut rng, &mut audio, Vec2::ZERO);
        assert!(!audio.is_playing(SoundEffect::AlienPresence));
    }

    #[test]
    fn test_cleanup_sweeps_only_exploded() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut store = EntityStore::new();
        let mut spawner = SpawnController::new(10);
        let a = store.add_meteor(Rock::on_ring(&mut rng, MeteorSize::Large, 0.25));
        let b = store.add_meteor(Rock::on_ring(&mut rng, MeteorSize::Small, 0.25));
        if let Some(m) = store.meteors.get_mut(a) {
            m.exploded = true;
        }

        // 200 ms at 10 tps is 2 ticks
        spawner.clean_up(&mut store);
        assert_eq!(store.meteors.len(), 2);
        spawner.clean_up(&mut store);
        assert!(!store.meteors.contains(a));
        assert!(store.meteors.contains(b));
        assert!(store.is_consistent(&[]));
    }

    #[test]
    fn test_heartbeat_tempo() {
        let mut audio = AudioManager::default();
        let mut beat = Heartbeat::new(1000);

        let mut played = Vec::new();
        for _ in 0..2000 {
            if let Some(b) = beat.update(&mut audio) {
                played.push(b);
            }
        }
        assert_eq!(played, vec![SoundEffect::BeatTwo]);
        assert_eq!(beat.wait_ms(), BEAT_BASE_WAIT_MS - BEAT_STEP_MS);

        for _ in 0..200_000 {
            beat.update(&mut audio);
        }
        assert_eq!(beat.wait_ms(), BEAT_MIN_WAIT_MS);
        beat.reset_tempo();
        assert_eq!(beat.wait_ms(), BEAT_BASE_WAIT_MS);
    }
}
