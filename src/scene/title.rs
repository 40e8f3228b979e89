use super::gameplay::GameScene;
use super::{Backdrop, Scene, Transition};
use crate::renderer::{Frame, hud};
use crate::session::{Services, Session};
use crate::sim::TickInput;

pub const TITLE_TEXT: &str = "METEOR STORM";

#[derive(Debug, Clone)]
pub struct TitleScene {
    backdrop: Backdrop,
}

impl TitleScene {
    pub fn new(services: &mut Services) -> Self {
        Self {
            backdrop: Backdrop::new(&mut services.rng, services.star_count),
        }
    }

    pub fn update(&mut self, session: &mut Session, input: &TickInput) -> Transition {
        if input.start {
            session.start_run();
            return Transition::Switch(Scene::Game(GameScene::continuing()));
        }
        self.backdrop.update(&mut session.services.rng);
        Transition::Stay
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.backdrop.draw_stars(frame);
        hud::title(frame, TITLE_TEXT);
        self.backdrop.draw_rocks(frame);
    }
}
