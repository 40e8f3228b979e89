use glam::Vec2;

use super::gameplay::GameScene;
use super::{Backdrop, Scene, Transition};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::{Font, Frame, hud};
use crate::session::{Services, Session};
use crate::sim::TickInput;

pub const GAME_OVER_TEXT: &str = "GAME OVER";
pub const NEW_HIGH_SCORE_TEXT: &str = "New High Score!";

#[derive(Debug, Clone)]
pub struct GameOverScene {
    backdrop: Backdrop,
}

impl GameOverScene {
    pub fn new(services: &mut Services) -> Self {
        Self {
            backdrop: Backdrop::new(&mut services.rng, services.star_count),
        }
    }

    /// Start begins a brand new run once the fade completes. Quit is
    /// handled by the host loop.
    pub fn update(&mut self, session: &mut Session, input: &TickInput) -> Transition {
        self.backdrop.update(&mut session.services.rng);
        if input.start {
            return Transition::Switch(Scene::Game(GameScene::fresh_run()));
        }
        Transition::Stay
    }

    pub fn draw(&self, session: &Session, frame: &mut Frame) {
        self.backdrop.draw_stars(frame);
        self.backdrop.draw_rocks(frame);
        hud::title(frame, GAME_OVER_TEXT);

        if session.scores.is_new_high(session.score()) {
            frame.text(
                NEW_HIGH_SCORE_TEXT,
                Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 + 80.0),
                Font::Title,
                48.0,
                hud::GOLD,
            );
        }
    }
}
