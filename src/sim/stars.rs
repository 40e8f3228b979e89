//! Background starfield

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// 0-255
    pub brightness: f32,
}

impl Star {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * SCREEN_WIDTH,
                rng.random::<f32>() * SCREEN_HEIGHT,
            ),
            radius: rng.random::<f32>() * 2.0,
            brightness: rng.random::<f32>() * 255.0,
        }
    }
}

/// Static set of stars, generated once and drawn every frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn generate(rng: &mut impl Rng, count: usize) -> Self {
        Self {
            stars: (0..count).map(|_| Star::random(rng)).collect(),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn draw(&self, frame: &mut Frame) {
        for star in &self.stars {
            frame.star(star.pos, star.radius, star.brightness);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_stars_stay_on_screen() {
        let mut rng = Pcg32::seed_from_u64(3);
        let field = Starfield::generate(&mut rng, 500);
        assert_eq!(field.len(), 500);
        for s in field.stars() {
            assert!((0.0..SCREEN_WIDTH).contains(&s.pos.x));
            assert!((0.0..SCREEN_HEIGHT).contains(&s.pos.y));
            assert!((0.0..2.0).contains(&s.radius));
            assert!((0.0..255.0).contains(&s.brightness));
        }
    }

    #[test]
    fn test_draw_emits_one_command_per_star() {
        let mut rng = Pcg32::seed_from_u64(3);
        let field = Starfield::generate(&mut rng, 12);
        let mut frame = Frame::new();
        field.draw(&mut frame);
        assert_eq!(frame.len(), 12);
    }
}
