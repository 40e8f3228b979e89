//! Host-facing entry point
//!
//! The host owns the loop: once per fixed tick it samples input, calls
//! [`Game::update`], then [`Game::draw`] into a fresh [`Frame`] and presents it.

use crate::audio::AudioManager;
use crate::persistence::ScoreStore;
use crate::platform::AudioBackend;
use crate::renderer::Frame;
use crate::scene::{Scene, SceneManager, TitleScene};
use crate::session::{Services, Session};
use crate::settings::Settings;
use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Continue,
    /// The player asked to leave
    Quit,
}

#[derive(Debug)]
pub struct Game {
    manager: SceneManager,
    session: Session,
}

impl Game {
    pub fn new(settings: &Settings, backend: Box<dyn AudioBackend>, store: Box<dyn ScoreStore>) -> Self {
        let mut audio = AudioManager::new(backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let seed = settings.seed.unwrap_or_else(rand::random);
        let tps = settings.tps();
        let services = Services::new(seed, tps, settings.quality.star_count(), audio);
        let mut session = Session::new(services, store);

        let mut manager = SceneManager::new();
        manager.go_to(Scene::Title(TitleScene::new(&mut session.services)));
        log::info!(
            "Meteor Storm ready: seed {}, {} tps, quality {}",
            seed,
            tps,
            settings.quality.as_str()
        );

        Self { manager, session }
    }

    /// Advance one fixed tick
    pub fn update(&mut self, input: &TickInput) -> UpdateOutcome {
        if input.quit {
            log::info!("Quit requested");
            return UpdateOutcome::Quit;
        }
        self.manager.update(&mut self.session, input);
        UpdateOutcome::Continue
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.manager.draw(&self.session, frame);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.manager.current()
    }

    pub fn is_transitioning(&self) -> bool {
        self.manager.is_transitioning()
    }
}
