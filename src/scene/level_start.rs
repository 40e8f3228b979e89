use super::gameplay::GameScene;
use super::{Scene, Transition};
use crate::consts::LEVEL_START_TIME;
use crate::renderer::{Frame, hud};
use crate::session::{Services, Session};
use crate::sim::{Starfield, TickInput, Timer};

/// "LEVEL N" card between levels. Leaves after a few seconds or on start.
#[derive(Debug, Clone)]
pub struct LevelStartScene {
    timer: Timer,
    stars: Starfield,
}

impl LevelStartScene {
    pub fn new(services: &mut Services) -> Self {
        Self {
            timer: Timer::new(LEVEL_START_TIME, services.tps),
            stars: Starfield::generate(&mut services.rng, services.star_count),
        }
    }

    pub fn update(&mut self, session: &mut Session, input: &TickInput) -> Transition {
        self.timer.update();
        if !(self.timer.is_ready() || input.start) {
            return Transition::Stay;
        }
        if let Some(world) = session.world.as_mut() {
            world.begin_level();
            log::info!("level {} begins", world.level);
        }
        Transition::Switch(Scene::Game(GameScene::continuing()))
    }

    pub fn draw(&self, session: &Session, frame: &mut Frame) {
        self.stars.draw(frame);
        let level = session.world.as_ref().map_or(1, |w| w.level);
        hud::title(frame, format!("LEVEL {}", level));
    }
}
