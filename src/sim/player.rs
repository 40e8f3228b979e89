//! Player ship and its ability state machines
//!
//! Everything here is plain state driven by [`TickInput`]. The world owns the
//! player's collider, spawns the lasers/shield/exhaust these methods ask for,
//! and plays the sounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Exhaust;
use super::input::TickInput;
use super::shape::Shape;
use super::spatial::ShapeId;
use super::timer::Timer;
use crate::consts::*;
use crate::renderer::Sprite;
use crate::{heading, wrap_position};

/// Burst-fire gate: up to three shots spaced by the shot cooldown, then the
/// burst cooldown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weapon {
    shot_cooldown: Timer,
    burst_cooldown: Timer,
    shots_fired: u32,
}

impl Weapon {
    pub fn new(tps: u32) -> Self {
        Self {
            shot_cooldown: Timer::new(SHOT_COOLDOWN, tps),
            burst_cooldown: Timer::new(BURST_COOLDOWN, tps),
            shots_fired: 0,
        }
    }

    /// Advance both cooldowns and evaluate the trigger.
    ///
    /// Returns the 1-based shot number within the burst when a laser should
    /// be spawned. The trigger after the last shot of a burst spawns nothing
    /// and starts the burst cooldown instead.
    pub fn update(&mut self, fire: bool) -> Option<u32> {
        self.burst_cooldown.update();
        self.shot_cooldown.update();

        if !(fire && self.burst_cooldown.is_ready() && self.shot_cooldown.is_ready()) {
            return None;
        }

        self.shot_cooldown.reset();
        self.shots_fired += 1;
        if self.shots_fired <= MAX_SHOTS_PER_BURST {
            Some(self.shots_fired)
        } else {
            self.burst_cooldown.reset();
            self.shots_fired = 0;
            None
        }
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }
}

/// Coasting after thrust is released
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Drift {
    timer: Timer,
    angle: f32,
    speed: f32,
}

impl Drift {
    /// Displacement for this tick; fades linearly to zero over the timer
    fn step(&mut self, tps: u32) -> Vec2 {
        self.timer.update();
        let per_tick = self.speed / tps as f32 * 4.0 * (1.0 - self.timer.progress());
        heading(self.angle) * per_tick
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    /// Death animation, one frame per `DYING_FRAME_TIME`
    Dying { frame: u8, timer: Timer },
    /// Animation finished; the world consumes a life next
    Dead,
}

/// What steering produced this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    pub exhaust: Option<Exhaust>,
    /// Thrust or reverse is held
    pub engine_on: bool,
    /// Thrust or reverse was released this tick
    pub engine_released: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Radians, 0 = facing up
    pub rotation: f32,
    velocity: f32,
    acceleration: f32,
    drift: Option<Drift>,
    was_thrusting: bool,
    was_reversing: bool,

    pub weapon: Weapon,
    shield_timer: Option<Timer>,
    pub shields_remaining: u32,
    /// `None` until the first jump
    hyperspace_cooldown: Option<Timer>,

    pub life: LifeState,
    pub lives: u32,
    pub collider: ShapeId,
    tps: u32,
}

impl Player {
    /// Fresh ship at the arena centre with full lives and shields
    pub fn new(collider: ShapeId, tps: u32) -> Self {
        Self {
            pos: crate::screen_center(),
            rotation: 0.0,
            velocity: 0.0,
            acceleration: 0.0,
            drift: None,
            was_thrusting: false,
            was_reversing: false,
            weapon: Weapon::new(tps),
            shield_timer: None,
            shields_remaining: STARTING_SHIELDS,
            hyperspace_cooldown: None,
            life: LifeState::Alive,
            lives: STARTING_LIVES,
            collider,
            tps,
        }
    }

    /// New ship for the next life: keeps lives and shield charges only
    pub fn respawn(&self, collider: ShapeId) -> Self {
        Self {
            lives: self.lives,
            shields_remaining: self.shields_remaining,
            ..Self::new(collider, self.tps)
        }
    }

    pub fn shape_at(pos: Vec2) -> Shape {
        Shape::circle(pos, Sprite::Player.half_width())
    }

    pub fn shape(&self) -> Shape {
        Self::shape_at(self.pos)
    }

    pub fn sprite(&self) -> Sprite {
        match self.life {
            LifeState::Dying { frame, .. } => Sprite::DeathFrame(frame),
            _ => Sprite::Player,
        }
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_drifting(&self) -> bool {
        self.drift.is_some()
    }

    /// Rotation, thrust, reverse and drift for one tick
    pub fn steer(&mut self, input: &TickInput) -> Steering {
        let tps = self.tps;
        let turn = ROTATION_PER_SECOND / tps as f32;
        if input.rotate_left {
            self.rotation -= turn;
        }
        if input.rotate_right {
            self.rotation += turn;
        }

        let mut out = Steering::default();

        if input.thrust {
            self.drift = None;
            if self.acceleration < MAX_ACCELERATION {
                self.acceleration = self.velocity + 4.0;
            }
            self.acceleration = self.acceleration.min(MAX_ACCELERATION);
            self.velocity = self.acceleration;
            self.pos += heading(self.rotation) * self.acceleration;
            out.exhaust = Some(Exhaust::behind(self.pos, self.rotation, -EXHAUST_SPAWN_OFFSET));
            out.engine_on = true;
        } else if self.was_thrusting {
            let seeded = self.acceleration * 10.0;
            if self.velocity < seeded {
                self.velocity = seeded - 5.0;
            }
            self.velocity = self.velocity.max(0.0);
            self.acceleration = 0.0;
            self.drift = Some(Drift {
                timer: Timer::new(DRIFT_DURATION, tps),
                angle: self.rotation,
                speed: self.velocity,
            });
            out.engine_released = true;
        }

        if input.reverse {
            self.drift = None;
            self.pos -= heading(self.rotation) * REVERSE_SPEED;
            out.exhaust = Some(Exhaust::behind(self.pos, self.rotation, EXHAUST_SPAWN_OFFSET));
            out.engine_on = true;
        } else if self.was_reversing {
            out.engine_released = true;
        }

        if let Some(drift) = self.drift.as_mut() {
            self.pos += drift.step(tps);
            if drift.timer.is_ready() {
                self.drift = None;
                self.velocity = 0.0;
            }
        }

        self.pos = wrap_position(self.pos, SCREEN_WIDTH, SCREEN_HEIGHT);
        self.was_thrusting = input.thrust;
        self.was_reversing = input.reverse;
        out
    }

    /// Silence the engine bookkeeping when input stops being processed
    pub fn cut_engine(&mut self) {
        self.was_thrusting = false;
        self.was_reversing = false;
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_timer.is_some()
    }

    /// Spend a charge and start the shield timer. Returns true if raised.
    pub fn raise_shield(&mut self) -> bool {
        if self.shields_remaining == 0 || self.is_shielded() {
            return false;
        }
        self.shields_remaining -= 1;
        self.shield_timer = Some(Timer::new(SHIELD_DURATION, self.tps));
        true
    }

    /// Advance the active shield. Returns true on the tick it expires.
    pub fn update_shield(&mut self) -> bool {
        let Some(timer) = self.shield_timer.as_mut() else {
            return false;
        };
        timer.update();
        if timer.is_ready() {
            self.shield_timer = None;
            true
        } else {
            false
        }
    }

    pub fn drop_shield(&mut self) {
        self.shield_timer = None;
    }

    pub fn hyperspace_ready(&self) -> bool {
        self.hyperspace_cooldown.as_ref().is_none_or(Timer::is_ready)
    }

    /// Teleport and (re)start the cooldown
    pub fn jump_to(&mut self, pos: Vec2) {
        let tps = self.tps;
        self.pos = pos;
        self.hyperspace_cooldown
            .get_or_insert_with(|| Timer::new(HYPERSPACE_COOLDOWN, tps))
            .reset();
    }

    pub fn update_hyperspace(&mut self) {
        if let Some(timer) = self.hyperspace_cooldown.as_mut() {
            timer.update();
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.life, LifeState::Alive)
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.life, LifeState::Dead)
    }

    /// Start the death animation. Returns false if already dying or dead.
    pub fn kill(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.life = LifeState::Dying {
            frame: 0,
            timer: Timer::new(DYING_FRAME_TIME, self.tps),
        };
        self.cut_engine();
        self.drift = None;
        true
    }

    /// Step the death animation; flips to `Dead` after the last frame
    pub fn update_dying(&mut self) {
        if let LifeState::Dying { frame, timer } = &mut self.life {
            timer.update();
            if timer.is_ready() {
                timer.reset();
                *frame += 1;
                if u32::from(*frame) >= DYING_FRAMES {
                    self.life = LifeState::Dead;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::Arena;

    fn player(tps: u32) -> Player {
        Player::new(Arena::<()>::new().insert(()), tps)
    }

    fn held(f: impl FnOnce(&mut TickInput)) -> TickInput {
        let mut input = TickInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_burst_sequence() {
        let mut weapon = Weapon::new(60);
        let shots: Vec<(u32, u32)> = (1..=100)
            .filter_map(|tick| weapon.update(true).map(|n| (tick, n)))
            .collect();
        assert_eq!(shots, vec![(30, 1), (39, 2), (48, 3), (87, 1), (96, 2)]);
    }

    #[test]
    fn test_no_fire_no_shots() {
        let mut weapon = Weapon::new(60);
        for _ in 0..200 {
            assert_eq!(weapon.update(false), None);
        }
        assert_eq!(weapon.shots_fired(), 0);
    }

    #[test]
    fn test_thrust_ramps_to_cap() {
        let mut p = player(60);
        let start = p.pos;
        let thrust = held(|i| i.thrust = true);

        let out = p.steer(&thrust);
        assert!(out.engine_on);
        assert!(out.exhaust.is_some());
        assert_eq!(p.velocity(), 4.0);
        assert!((p.pos - (start + Vec2::new(0.0, -4.0))).length() < 1e-4);

        p.steer(&thrust);
        assert_eq!(p.velocity(), MAX_ACCELERATION);
        p.steer(&thrust);
        assert_eq!(p.velocity(), MAX_ACCELERATION);
    }

    #[test]
    fn test_release_starts_drift_that_decays() {
        let mut p = player(10);
        let thrust = held(|i| i.thrust = true);
        p.steer(&thrust);
        p.steer(&thrust);

        let out = p.steer(&TickInput::default());
        assert!(out.engine_released);
        assert!(p.is_drifting());
        assert_eq!(p.velocity(), MAX_ACCELERATION * 10.0 - 5.0);

        let mut last = p.pos;
        let mut prev_step = f32::MAX;
        // 30 s at 10 tps
        for _ in 0..299 {
            p.steer(&TickInput::default());
            let moved = (p.pos - last).length();
            if moved < 100.0 {
                assert!(moved <= prev_step + 1e-3);
                prev_step = moved;
            }
            last = p.pos;
        }
        assert!(!p.is_drifting());
        assert_eq!(p.velocity(), 0.0);
    }

    #[test]
    fn test_reverse_moves_backwards() {
        let mut p = player(60);
        let start = p.pos;
        let out = p.steer(&held(|i| i.reverse = true));
        assert!(out.engine_on);
        assert!((p.pos - (start + Vec2::new(0.0, REVERSE_SPEED))).length() < 1e-4);
        assert!(p.steer(&TickInput::default()).engine_released);
    }

    #[test]
    fn test_shield_charges_and_expiry() {
        let mut p = player(10);
        assert!(p.raise_shield());
        assert!(!p.raise_shield());
        assert_eq!(p.shields_remaining, STARTING_SHIELDS - 1);

        // 6 s at 10 tps
        for _ in 0..59 {
            assert!(!p.update_shield());
        }
        assert!(p.update_shield());
        assert!(!p.is_shielded());

        assert!(p.raise_shield());
        p.drop_shield();
        assert!(p.raise_shield());
        p.drop_shield();
        assert_eq!(p.shields_remaining, 0);
        assert!(!p.raise_shield());
    }

    #[test]
    fn test_hyperspace_cooldown() {
        let mut p = player(10);
        assert!(p.hyperspace_ready());
        p.jump_to(Vec2::new(10.0, 20.0));
        assert_eq!(p.pos, Vec2::new(10.0, 20.0));
        assert!(!p.hyperspace_ready());
        for _ in 0..100 {
            p.update_hyperspace();
        }
        assert!(p.hyperspace_ready());
    }

    #[test]
    fn test_death_animation() {
        let mut p = player(60);
        assert!(p.kill());
        assert!(!p.kill());
        assert_eq!(p.sprite(), Sprite::DeathFrame(0));

        // 12 frames of 3 ticks at 60 tps
        for _ in 0..35 {
            p.update_dying();
        }
        assert!(!p.is_dead());
        p.update_dying();
        assert!(p.is_dead());
    }

    #[test]
    fn test_respawn_keeps_lives_and_shields() {
        let mut p = player(60);
        p.lives = 2;
        p.raise_shield();
        p.kill();
        let fresh = p.respawn(p.collider);
        assert_eq!(fresh.lives, 2);
        assert_eq!(fresh.shields_remaining, STARTING_SHIELDS - 1);
        assert!(fresh.is_alive());
        assert!(!fresh.is_shielded());
        assert_eq!(fresh.pos, crate::screen_center());
    }
}
