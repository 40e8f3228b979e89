//! Entity types
//!
//! Positions are sprite centres. Collidable entities carry the handle of
//! their collider; the collider's `ObjectData` points back at the entity's
//! slot in its [`EntityStore`](super::store::EntityStore) arena.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shape::Shape;
use super::spatial::ShapeId;
use super::tags::Tags;
use crate::consts::*;
use crate::renderer::{ALIEN_VARIANTS, METEOR_VARIANTS, SMALL_METEOR_VARIANTS, Sprite};
use crate::{heading, is_outside, ring_point, screen_center, wrap_position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeteorSize {
    Large,
    Small,
}

impl MeteorSize {
    pub fn tags(self) -> Tags {
        match self {
            MeteorSize::Large => Tags::METEOR | Tags::LARGE,
            MeteorSize::Small => Tags::METEOR | Tags::SMALL,
        }
    }

    fn variants(self) -> u8 {
        match self {
            MeteorSize::Large => METEOR_VARIANTS,
            MeteorSize::Small => SMALL_METEOR_VARIANTS,
        }
    }
}

/// Free-floating rock: motion and look, no collider.
///
/// Live meteors wrap one of these; title and game-over backdrops use them
/// bare.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    pub size: MeteorSize,
    pub variant: u8,
    pub pos: Vec2,
    /// Displacement per tick
    pub movement: Vec2,
    pub rotation: f32,
    /// Radians per tick
    pub spin: f32,
}

impl Rock {
    /// Spawn on the ring around the arena, heading for the centre at
    /// `base_speed + rand * 1.5` units per tick
    pub fn on_ring(rng: &mut impl Rng, size: MeteorSize, base_speed: f32) -> Self {
        let center = screen_center();
        let angle = rng.random::<f32>() * TAU;
        let pos = ring_point(center, SCREEN_WIDTH / 2.0 + METEOR_RING_PADDING, angle);
        let speed = base_speed + rng.random::<f32>() * METEOR_SPEED_JITTER;

        Self {
            size,
            variant: rng.random_range(0..size.variants()),
            pos,
            movement: (center - pos).normalize_or_zero() * speed,
            rotation: rng.random::<f32>() * TAU,
            spin: METEOR_SPIN_MIN + rng.random::<f32>() * (METEOR_SPIN_MAX - METEOR_SPIN_MIN),
        }
    }

    /// Move, spin and wrap around the arena edges
    pub fn step(&mut self) {
        self.pos = wrap_position(self.pos + self.movement, SCREEN_WIDTH, SCREEN_HEIGHT);
        self.rotation += self.spin;
    }

    pub fn sprite(&self) -> Sprite {
        match self.size {
            MeteorSize::Large => Sprite::Meteor(self.variant),
            MeteorSize::Small => Sprite::MeteorSmall(self.variant),
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::circle(self.pos, self.sprite().half_width())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub rock: Rock,
    /// Hit and showing its explosion; removed by the next cleanup pass
    pub exploded: bool,
    pub collider: ShapeId,
}

impl Meteor {
    pub fn new(rock: Rock, collider: ShapeId) -> Self {
        Self {
            rock,
            exploded: false,
            collider,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.rock.pos
    }

    pub fn is_small(&self) -> bool {
        self.rock.size == MeteorSize::Small
    }

    pub fn sprite(&self) -> Sprite {
        match (self.exploded, self.rock.size) {
            (true, MeteorSize::Large) => Sprite::Explosion,
            (true, MeteorSize::Small) => Sprite::ExplosionSmall,
            (false, _) => self.rock.sprite(),
        }
    }
}

/// How an alien enters the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlienPattern {
    /// Enters past the right edge, moving left
    SweepLeft,
    /// Enters past the left edge, moving right
    SweepRight,
    /// Enters from the ring and heads at the player; fires aimed shots
    Seeker,
}

impl AlienPattern {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..3) {
            0 => AlienPattern::SweepLeft,
            1 => AlienPattern::SweepRight,
            _ => AlienPattern::Seeker,
        }
    }
}

/// Alien before it has a collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlienSpawn {
    pub pattern: AlienPattern,
    pub variant: u8,
    pub pos: Vec2,
    pub movement: Vec2,
}

impl AlienSpawn {
    pub fn new(rng: &mut impl Rng, pattern: AlienPattern, base_speed: f32, player_pos: Vec2) -> Self {
        let variant = rng.random_range(0..ALIEN_VARIANTS);

        let (pos, movement) = match pattern {
            AlienPattern::SweepLeft => {
                let pos = Vec2::new(SCREEN_WIDTH + ALIEN_EDGE_OFFSET, lane_y(rng));
                let speed = base_speed + rng.random::<f32>() * ALIEN_SWEEP_JITTER;
                (pos, Vec2::new(-speed, 0.0))
            }
            AlienPattern::SweepRight => {
                let pos = Vec2::new(-ALIEN_EDGE_OFFSET, lane_y(rng));
                let speed = base_speed + rng.random::<f32>() * ALIEN_SWEEP_JITTER;
                (pos, Vec2::new(speed, 0.0))
            }
            AlienPattern::Seeker => {
                let angle = rng.random::<f32>() * TAU;
                let pos = ring_point(screen_center(), ALIEN_RING_RADIUS, angle);
                let speed = base_speed + rng.random::<f32>() * ALIEN_SEEK_JITTER;
                (pos, (player_pos - pos).normalize_or_zero() * speed)
            }
        };

        Self {
            pattern,
            variant,
            pos,
            movement,
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::circle(self.pos, Sprite::Alien(self.variant).half_width())
    }
}

/// Random horizontal lane for sweeping aliens
fn lane_y(rng: &mut impl Rng) -> f32 {
    rng.random_range(ALIEN_EDGE_OFFSET as u32..SCREEN_HEIGHT as u32) as f32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub pos: Vec2,
    pub movement: Vec2,
    pub variant: u8,
    pub intelligent: bool,
    pub exploded: bool,
    pub collider: ShapeId,
}

impl Alien {
    pub fn new(spawn: AlienSpawn, collider: ShapeId) -> Self {
        Self {
            pos: spawn.pos,
            movement: spawn.movement,
            variant: spawn.variant,
            intelligent: spawn.pattern == AlienPattern::Seeker,
            exploded: false,
            collider,
        }
    }

    pub fn step(&mut self) {
        self.pos += self.movement;
    }

    /// Past `margin` and not heading back in. Seekers start on a ring
    /// outside the margin, so position alone is not enough.
    pub fn has_left(&self, margin: f32) -> bool {
        is_outside(self.pos, margin) && self.movement.dot(self.pos - screen_center()) >= 0.0
    }

    pub fn sprite(&self) -> Sprite {
        if self.exploded {
            Sprite::ExplosionSmall
        } else {
            Sprite::Alien(self.variant)
        }
    }

    /// Direction of the next shot. Seekers aim at `target`; the rest pick a
    /// random direction.
    pub fn aim(&self, rng: &mut impl Rng, target: Vec2) -> f32 {
        if self.intelligent {
            let d = target - self.pos;
            // Rotation 0 points up, so atan2's angle is a quarter turn behind
            d.y.atan2(d.x) + PI / 2.0
        } else {
            rng.random::<f32>() * TAU
        }
    }
}

/// Laser bolt. Player and alien shots share this; only their tags differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bolt {
    pub pos: Vec2,
    pub rotation: f32,
    pub collider: ShapeId,
}

impl Bolt {
    pub fn shape(pos: Vec2) -> Shape {
        Shape::rect(pos, Sprite::Laser.size())
    }

    /// Advance along the heading at `speed` units per second
    pub fn step(&mut self, speed: f32, tps: u32) {
        self.pos += heading(self.rotation) * (speed / tps as f32);
    }
}

pub type Laser = Bolt;
pub type AlienLaser = Bolt;

/// Shield bubble that follows the player while active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub pos: Vec2,
    pub rotation: f32,
    pub collider: ShapeId,
}

impl Shield {
    pub fn shape(pos: Vec2) -> Shape {
        Shape::circle(pos, Sprite::Shield.half_width())
    }
}

/// Engine flame behind the ship, purely visual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exhaust {
    pub pos: Vec2,
    pub rotation: f32,
}

impl Exhaust {
    /// Flame at `offset` units along `ship_rotation` from `ship_pos`, pointing
    /// away from the nose
    pub fn behind(ship_pos: Vec2, ship_rotation: f32, offset: f32) -> Self {
        Self {
            pos: ship_pos + heading(ship_rotation) * offset,
            rotation: ship_rotation + PI,
        }
    }

    pub fn step(&mut self, tps: u32) {
        self.pos += heading(self.rotation) * (MAX_ACCELERATION / tps as f32);
    }
}
