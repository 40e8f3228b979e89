//! Gameplay scene: drives the session's world one tick at a time

use super::game_over::GameOverScene;
use super::level_start::LevelStartScene;
use super::{Scene, Transition};
use crate::renderer::Frame;
use crate::session::Session;
use crate::sim::{TickInput, TickSignal};

/// The world itself lives in the session so the interstitials can reach it
#[derive(Debug, Clone, Copy, Default)]
pub struct GameScene {
    /// Replace the session's world once this scene takes over
    fresh_run: bool,
}

impl GameScene {
    /// Keep playing the session's current world
    pub fn continuing() -> Self {
        Self { fresh_run: false }
    }

    /// Start a new run when the scene becomes active. Until then the
    /// previous run stays in the session for the outgoing scene to show.
    pub fn fresh_run() -> Self {
        Self { fresh_run: true }
    }

    pub fn enter(&mut self, session: &mut Session) {
        if self.fresh_run {
            self.fresh_run = false;
            session.start_run();
        }
    }

    pub fn update(&mut self, session: &mut Session, input: &TickInput) -> Transition {
        self.enter(session);
        let Some(world) = session.world.as_mut() else {
            return Transition::Stay;
        };
        let signal = world.tick(input, &mut session.services);
        session.scores.observe(world.score);

        match signal {
            TickSignal::Continue => Transition::Stay,
            TickSignal::LevelComplete => {
                Transition::Switch(Scene::LevelStart(LevelStartScene::new(&mut session.services)))
            }
            TickSignal::GameOver => {
                session.finish_run();
                Transition::Switch(Scene::GameOver(GameOverScene::new(&mut session.services)))
            }
        }
    }

    pub fn draw(&self, session: &Session, frame: &mut Frame) {
        if self.fresh_run {
            return;
        }
        if let Some(world) = &session.world {
            world.draw(frame, session.scores.best);
        }
    }
}
