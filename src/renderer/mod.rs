//! Display-list rendering
//!
//! The core never touches pixels. Scenes describe what to show by pushing
//! draw commands into a [`Frame`]; the host walks the finished frame and hands
//! each command to its own renderer (see [`crate::platform::Renderer`]).
//! Cross-fades are done by compositing one frame into another with an alpha.

pub mod hud;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::platform::Renderer;

pub const METEOR_VARIANTS: u8 = 4;
pub const SMALL_METEOR_VARIANTS: u8 = 4;
pub const ALIEN_VARIANTS: u8 = 3;
pub const DEATH_FRAME_COUNT: u8 = 12;

/// Opaque visual handle. The asset collaborator maps each to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Player,
    Meteor(u8),
    MeteorSmall(u8),
    Laser,
    AlienLaser,
    Explosion,
    ExplosionSmall,
    /// Player death animation frame
    DeathFrame(u8),
    Exhaust,
    Shield,
    Alien(u8),
    LifeIndicator,
    ShieldIndicator,
    HyperspaceIndicator,
}

impl Sprite {
    /// Pixel size of the image behind this handle
    pub fn size(&self) -> Vec2 {
        match self {
            Sprite::Player | Sprite::DeathFrame(_) => Vec2::new(99.0, 75.0),
            Sprite::Meteor(_) => Vec2::new(101.0, 84.0),
            Sprite::MeteorSmall(_) => Vec2::new(28.0, 28.0),
            Sprite::Laser | Sprite::AlienLaser => Vec2::new(9.0, 54.0),
            Sprite::Explosion => Vec2::new(101.0, 101.0),
            Sprite::ExplosionSmall => Vec2::new(48.0, 48.0),
            Sprite::Exhaust => Vec2::new(14.0, 31.0),
            Sprite::Shield => Vec2::new(144.0, 137.0),
            Sprite::Alien(_) => Vec2::new(91.0, 91.0),
            Sprite::LifeIndicator => Vec2::new(37.0, 26.0),
            Sprite::ShieldIndicator => Vec2::new(30.0, 30.0),
            Sprite::HyperspaceIndicator => Vec2::new(34.0, 33.0),
        }
    }

    pub fn half_width(&self) -> f32 {
        self.size().x / 2.0
    }

    pub fn is_explosion(&self) -> bool {
        matches!(self, Sprite::Explosion | Sprite::ExplosionSmall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Font {
    Title,
    Score,
    Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Sprite {
        sprite: Sprite,
        /// Centre of the sprite
        pos: Vec2,
        rotation: f32,
        alpha: f32,
    },
    Star {
        pos: Vec2,
        radius: f32,
        /// 0-255
        brightness: f32,
        alpha: f32,
    },
    Text {
        text: String,
        /// Centre of the text's baseline
        pos: Vec2,
        font: Font,
        size: f32,
        color: [u8; 4],
        alpha: f32,
    },
}

impl DrawCommand {
    pub fn alpha(&self) -> f32 {
        match self {
            DrawCommand::Sprite { alpha, .. }
            | DrawCommand::Star { alpha, .. }
            | DrawCommand::Text { alpha, .. } => *alpha,
        }
    }

    fn scale_alpha(&mut self, factor: f32) {
        match self {
            DrawCommand::Sprite { alpha, .. }
            | DrawCommand::Star { alpha, .. }
            | DrawCommand::Text { alpha, .. } => *alpha *= factor,
        }
    }
}

/// Ordered list of draw commands for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn sprite(&mut self, sprite: Sprite, pos: Vec2, rotation: f32) {
        self.sprite_faded(sprite, pos, rotation, 1.0);
    }

    pub fn sprite_faded(&mut self, sprite: Sprite, pos: Vec2, rotation: f32, alpha: f32) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            pos,
            rotation,
            alpha,
        });
    }

    pub fn star(&mut self, pos: Vec2, radius: f32, brightness: f32) {
        self.commands.push(DrawCommand::Star {
            pos,
            radius,
            brightness,
            alpha: 1.0,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, font: Font, size: f32, color: [u8; 4]) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            pos,
            font,
            size,
            color,
            alpha: 1.0,
        });
    }

    /// Append `layer` on top of this frame with its opacity scaled by `alpha`
    pub fn composite(&mut self, layer: Frame, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        self.commands.extend(layer.commands.into_iter().map(|mut cmd| {
            cmd.scale_alpha(alpha);
            cmd
        }));
    }

    /// Hand every command to the host renderer, back to front
    pub fn present(&self, renderer: &mut dyn Renderer) {
        for cmd in &self.commands {
            renderer.render(cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_scales_alpha() {
        let mut base = Frame::new();
        base.sprite(Sprite::Player, Vec2::ZERO, 0.0);

        let mut overlay = Frame::new();
        overlay.sprite_faded(Sprite::Laser, Vec2::ZERO, 0.0, 0.5);
        overlay.star(Vec2::ONE, 1.0, 200.0);

        base.composite(overlay, 0.4);
        let alphas: Vec<f32> = base.commands().iter().map(DrawCommand::alpha).collect();
        assert_eq!(alphas.len(), 3);
        assert_eq!(alphas[0], 1.0);
        assert!((alphas[1] - 0.2).abs() < 1e-6);
        assert!((alphas[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_explosion_sprites() {
        assert!(Sprite::Explosion.is_explosion());
        assert!(Sprite::ExplosionSmall.is_explosion());
        assert!(!Sprite::Meteor(0).is_explosion());
        assert!(!Sprite::DeathFrame(3).is_explosion());
    }

    #[derive(Default)]
    struct Counting(usize);

    impl Renderer for Counting {
        fn render(&mut self, _cmd: &DrawCommand) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_present_visits_every_command() {
        let mut frame = Frame::new();
        frame.sprite(Sprite::Player, Vec2::ZERO, 0.0);
        frame.text("hi", Vec2::ZERO, Font::Score, 16.0, [255; 4]);
        let mut renderer = Counting::default();
        frame.present(&mut renderer);
        assert_eq!(renderer.0, 2);
    }
}
