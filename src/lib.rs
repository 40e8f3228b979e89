//! Meteor Storm - a fixed-tick arcade simulation
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (timers, entities, spatial index, collisions, spawning)
//! - `scene`: Title / gameplay / level-start / game-over state machine with cross-fades
//! - `renderer`: Display-list frames handed to the host renderer
//! - `audio`: Sound effect handles and playback bookkeeping
//! - `platform`: Collaborator traits (render, audio device, asset loading)
//! - `persistence`: High-score file storage
//! - `settings`: Data-driven configuration

pub mod assets;
pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use game::{Game, UpdateOutcome};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Default fixed tick rate
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Logical arena dimensions
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Broad-phase grid cell size
    pub const CELL_SIZE: f32 = 16.0;

    /// Cross-fade length between scenes (ticks, independent of tick rate)
    pub const TRANSITION_TICKS: u32 = 25;

    // Player ship
    pub const ROTATION_PER_SECOND: f32 = std::f32::consts::PI;
    pub const MAX_ACCELERATION: f32 = 8.0;
    pub const REVERSE_SPEED: f32 = 3.0;
    pub const SHOT_COOLDOWN: Duration = Duration::from_millis(150);
    pub const BURST_COOLDOWN: Duration = Duration::from_millis(500);
    pub const MAX_SHOTS_PER_BURST: u32 = 3;
    pub const LASER_SPAWN_OFFSET: f32 = 50.0;
    pub const EXHAUST_SPAWN_OFFSET: f32 = 50.0;
    pub const DYING_FRAME_TIME: Duration = Duration::from_millis(50);
    pub const DYING_FRAMES: u32 = 12;
    pub const STARTING_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 6;
    pub const EXTRA_LIFE_EVERY_LEVELS: u32 = 5;
    pub const STARTING_SHIELDS: u32 = 3;
    pub const SHIELD_DURATION: Duration = Duration::from_secs(6);
    pub const HYPERSPACE_COOLDOWN: Duration = Duration::from_secs(10);
    pub const HYPERSPACE_MAX_ATTEMPTS: u32 = 64;
    pub const DRIFT_DURATION: Duration = Duration::from_secs(30);

    // Projectiles (units per second)
    pub const LASER_SPEED: f32 = 1000.0;
    pub const ALIEN_LASER_SPEED: f32 = 1000.0;
    pub const LASER_OFFSCREEN_MARGIN: f32 = 50.0;

    // Meteors
    pub const BASE_METEOR_SPEED: f32 = 0.25;
    pub const METEOR_SPEED_JITTER: f32 = 1.5;
    pub const METEOR_SPEED_UP_AMOUNT: f32 = 0.1;
    pub const METEOR_SPEED_UP_TIME: Duration = Duration::from_millis(1000);
    pub const METEOR_SPAWN_TIME: Duration = Duration::from_millis(100);
    pub const METEOR_RING_PADDING: f32 = 500.0;
    pub const METEOR_SPIN_MIN: f32 = -0.02;
    pub const METEOR_SPIN_MAX: f32 = 0.02;
    pub const SHIELD_BOUNCE_FACTOR: f32 = 1.5;
    /// Children spawned by a large meteor are drawn from `0..SPLIT_CHILDREN_MAX`
    pub const SPLIT_CHILDREN_MAX: u32 = 4;
    pub const SPLIT_OFFSET_MIN: f32 = 50.0;
    pub const SPLIT_OFFSET_MAX: f32 = 100.0;
    pub const METEORS_FIRST_LEVEL: u32 = 2;
    pub const METEORS_PER_LEVEL_INCREMENT: u32 = 2;
    pub const CLEANUP_TIME: Duration = Duration::from_millis(200);

    // Aliens
    pub const BASE_ALIEN_SPEED: f32 = 0.5;
    pub const ALIEN_SWEEP_JITTER: f32 = 2.5;
    pub const ALIEN_SEEK_JITTER: f32 = 1.5;
    pub const ALIEN_SPAWN_TIME: Duration = Duration::from_secs(1);
    pub const ALIEN_ATTACK_TIME: Duration = Duration::from_secs(3);
    pub const ALIEN_OFFSCREEN_MARGIN: f32 = 200.0;
    pub const ALIEN_EDGE_OFFSET: f32 = 100.0;
    pub const ALIEN_AMBIENT_VOLUME: f32 = 0.5;
    pub const ALIEN_RING_RADIUS: f32 = SCREEN_WIDTH / 2.0;

    // Scoring
    pub const METEOR_POINTS: u32 = 1;
    pub const ALIEN_POINTS: u32 = 50;

    // Heartbeat pacing (milliseconds)
    pub const BEAT_START: Duration = Duration::from_secs(2);
    pub const BEAT_BASE_WAIT_MS: u64 = 1600;
    pub const BEAT_MIN_WAIT_MS: u64 = 400;
    pub const BEAT_STEP_MS: u64 = 25;

    // Interstitials
    pub const LEVEL_START_TIME: Duration = Duration::from_secs(3);
    pub const BACKDROP_METEORS: usize = 10;
    pub const NUMBER_OF_STARS: usize = 1000;
}

/// Centre of the arena
#[inline]
pub fn screen_center() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH / 2.0, consts::SCREEN_HEIGHT / 2.0)
}

/// Unit vector a ship with the given rotation is facing (rotation 0 = up)
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    Vec2::new(rotation.sin(), -rotation.cos())
}

/// Point on a circle of `radius` around `center` at `angle` radians
#[inline]
pub fn ring_point(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Wrap a position around the arena edges.
///
/// Each axis is handled independently: reaching or passing the far edge wraps
/// to 0, going negative wraps to the far edge.
#[inline]
pub fn wrap_position(mut pos: Vec2, width: f32, height: f32) -> Vec2 {
    if pos.x >= width {
        pos.x = 0.0;
    } else if pos.x < 0.0 {
        pos.x = width;
    }
    if pos.y >= height {
        pos.y = 0.0;
    } else if pos.y < 0.0 {
        pos.y = height;
    }
    pos
}

/// True if `pos` lies further than `margin` outside the arena
#[inline]
pub fn is_outside(pos: Vec2, margin: f32) -> bool {
    pos.x < -margin
        || pos.x > consts::SCREEN_WIDTH + margin
        || pos.y < -margin
        || pos.y > consts::SCREEN_HEIGHT + margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heading_zero_is_up() {
        let h = heading(0.0);
        assert!(h.x.abs() < 1e-6);
        assert!((h.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_right_edge() {
        let p = wrap_position(Vec2::new(1280.0, 300.0), 1280.0, 720.0);
        assert_eq!(p, Vec2::new(0.0, 300.0));
        let p = wrap_position(Vec2::new(-0.5, 300.0), 1280.0, 720.0);
        assert_eq!(p, Vec2::new(1280.0, 300.0));
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn wrap_only_touches_the_crossing_axis(x in 1280.0f32..5000.0, y in 0.0f32..719.0) {
            let p = wrap_position(Vec2::new(x, y), 1280.0, 720.0);
            prop_assert_eq!(p.x, 0.0);
            prop_assert_eq!(p.y, y);
        }

        #[test]
        fn wrap_is_identity_inside(x in 0.0f32..1279.0, y in 0.0f32..719.0) {
            let p = wrap_position(Vec2::new(x, y), 1280.0, 720.0);
            prop_assert_eq!(p, Vec2::new(x, y));
        }
    }
}
