//! Starfield with a few idle meteors, behind the title and game-over text

use rand::Rng;

use crate::consts::{BACKDROP_METEORS, BASE_METEOR_SPEED};
use crate::renderer::Frame;
use crate::sim::{MeteorSize, Rock, Starfield};

#[derive(Debug, Clone, Default)]
pub struct Backdrop {
    stars: Starfield,
    rocks: Vec<Rock>,
}

impl Backdrop {
    pub fn new(rng: &mut impl Rng, star_count: usize) -> Self {
        Self {
            stars: Starfield::generate(rng, star_count),
            rocks: Vec::with_capacity(BACKDROP_METEORS),
        }
    }

    /// Adds one rock per tick until the pool is full, then drifts them
    pub fn update(&mut self, rng: &mut impl Rng) {
        if self.rocks.len() < BACKDROP_METEORS {
            self.rocks
                .push(Rock::on_ring(rng, MeteorSize::Large, BASE_METEOR_SPEED));
        }
        for rock in &mut self.rocks {
            rock.step();
        }
    }

    pub fn rock_count(&self) -> usize {
        self.rocks.len()
    }

    pub fn draw_stars(&self, frame: &mut Frame) {
        self.stars.draw(frame);
    }

    pub fn draw_rocks(&self, frame: &mut Frame) {
        for rock in &self.rocks {
            frame.sprite(rock.sprite(), rock.pos, rock.rotation);
        }
    }
}
