//! Scene state machine
//!
//! Title → Game ⇄ LevelStart, Game → GameOver → Game. A scene switch
//! cross-fades over a fixed number of ticks; during the fade neither scene
//! is updated.

mod backdrop;
pub mod game_over;
pub mod gameplay;
pub mod level_start;
pub mod title;

pub use backdrop::Backdrop;
pub use game_over::GameOverScene;
pub use gameplay::GameScene;
pub use level_start::LevelStartScene;
pub use title::TitleScene;

use crate::consts::TRANSITION_TICKS;
use crate::renderer::Frame;
use crate::session::Session;
use crate::sim::TickInput;

#[derive(Debug, Clone)]
pub enum Scene {
    Title(TitleScene),
    Game(GameScene),
    LevelStart(LevelStartScene),
    GameOver(GameOverScene),
}

/// What a scene asks for after its update
#[derive(Debug)]
pub enum Transition {
    Stay,
    Switch(Scene),
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Title(_) => "title",
            Scene::Game(_) => "game",
            Scene::LevelStart(_) => "level-start",
            Scene::GameOver(_) => "game-over",
        }
    }

    pub fn update(&mut self, session: &mut Session, input: &TickInput) -> Transition {
        match self {
            Scene::Title(s) => s.update(session, input),
            Scene::Game(s) => s.update(session, input),
            Scene::LevelStart(s) => s.update(session, input),
            Scene::GameOver(s) => s.update(session, input),
        }
    }

    /// Called when the scene becomes current after a fade
    pub fn enter(&mut self, session: &mut Session) {
        if let Scene::Game(s) = self {
            s.enter(session);
        }
    }

    pub fn draw(&self, session: &Session, frame: &mut Frame) {
        match self {
            Scene::Title(s) => s.draw(frame),
            Scene::Game(s) => s.draw(session, frame),
            Scene::LevelStart(s) => s.draw(session, frame),
            Scene::GameOver(s) => s.draw(session, frame),
        }
    }
}

/// Owns the active scene and any pending one.
///
/// `next` is set exactly while `transition_remaining > 0`.
#[derive(Debug, Default)]
pub struct SceneManager {
    current: Option<Scene>,
    next: Option<Scene>,
    transition_remaining: u32,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt `scene` at once if nothing is showing, otherwise fade to it.
    /// A request made mid-fade replaces the pending scene and restarts the
    /// fade.
    pub fn go_to(&mut self, scene: Scene) {
        if self.current.is_none() {
            log::info!("scene: {}", scene.name());
            self.current = Some(scene);
        } else {
            log::debug!("fading to {}", scene.name());
            self.next = Some(scene);
            self.transition_remaining = TRANSITION_TICKS;
        }
    }

    pub fn update(&mut self, session: &mut Session, input: &TickInput) {
        if self.transition_remaining == 0 {
            if let Some(current) = self.current.as_mut() {
                if let Transition::Switch(scene) = current.update(session, input) {
                    self.go_to(scene);
                }
            }
            return;
        }

        self.transition_remaining -= 1;
        if self.transition_remaining == 0 {
            if let Some(mut next) = self.next.take() {
                log::info!("scene: {}", next.name());
                next.enter(session);
                self.current = Some(next);
            }
        }
    }

    /// Current scene at full opacity, the pending one faded in on top
    pub fn draw(&self, session: &Session, frame: &mut Frame) {
        if let Some(current) = &self.current {
            current.draw(session, frame);
        }
        if let Some(next) = &self.next {
            let mut layer = Frame::new();
            next.draw(session, &mut layer);
            frame.composite(layer, self.fade_alpha());
        }
    }

    /// Opacity of the incoming scene
    pub fn fade_alpha(&self) -> f32 {
        1.0 - self.transition_remaining as f32 / TRANSITION_TICKS as f32
    }

    pub fn current(&self) -> Option<&Scene> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Scene> {
        self.next.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition_remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::persistence::MemoryScoreStore;
    use crate::renderer::DrawCommand;
    use crate::session::Services;

    fn session() -> Session {
        Session::new(
            Services::new(11, 60, 0, AudioManager::default()),
            Box::new(MemoryScoreStore::default()),
        )
    }

    fn title(session: &mut Session) -> Scene {
        Scene::Title(TitleScene::new(&mut session.services))
    }

    #[test]
    fn test_first_scene_adopted_immediately() {
        let mut session = session();
        let mut manager = SceneManager::new();
        manager.go_to(title(&mut session));
        assert_eq!(manager.current().map(Scene::name), Some("title"));
        assert!(!manager.is_transitioning());
        assert!(manager.next().is_none());
    }

    #[test]
    fn test_switch_takes_transition_ticks() {
        let mut session = session();
        let mut manager = SceneManager::new();
        manager.go_to(title(&mut session));

        manager.update(&mut session, &TickInput::start());
        assert!(manager.is_transitioning());
        assert_eq!(manager.next().map(Scene::name), Some("game"));

        for _ in 0..TRANSITION_TICKS - 1 {
            manager.update(&mut session, &TickInput::default());
            assert_eq!(manager.current().map(Scene::name), Some("title"));
        }
        manager.update(&mut session, &TickInput::default());
        assert_eq!(manager.current().map(Scene::name), Some("game"));
        assert!(!manager.is_transitioning());
        assert!(manager.next().is_none());
    }

    #[test]
    fn test_scenes_frozen_during_fade() {
        let mut session = session();
        let mut manager = SceneManager::new();
        manager.go_to(title(&mut session));
        manager.update(&mut session, &TickInput::start());

        let score_before = session.score();
        for _ in 0..10 {
            manager.update(&mut session, &TickInput::start());
        }
        // The game scene has not ticked yet
        assert_eq!(session.score(), score_before);
        assert!(session.world.as_ref().is_some_and(|w| w.store.meteors.is_empty()));
    }

    #[test]
    fn test_last_request_wins() {
        let mut session = session();
        let mut manager = SceneManager::new();
        manager.go_to(title(&mut session));
        manager.go_to(Scene::Game(GameScene::continuing()));
        for _ in 0..5 {
            manager.update(&mut session, &TickInput::default());
        }
        manager.go_to(Scene::LevelStart(LevelStartScene::new(&mut session.services)));
        assert!((manager.fade_alpha() - 0.0).abs() < 1e-6);

        for _ in 0..TRANSITION_TICKS {
            manager.update(&mut session, &TickInput::default());
        }
        assert_eq!(manager.current().map(Scene::name), Some("level-start"));
    }

    #[test]
    fn test_cross_fade_alpha() {
        let mut session = session();
        let mut manager = SceneManager::new();
        manager.go_to(title(&mut session));
        manager.go_to(Scene::GameOver(GameOverScene::new(&mut session.services)));
        for _ in 0..5 {
            manager.update(&mut session, &TickInput::default());
        }
        assert!((manager.fade_alpha() - 0.2).abs() < 1e-6);

        let mut frame = Frame::new();
        manager.draw(&session, &mut frame);
        let alpha_of = |wanted: &str| {
            frame.commands().iter().find_map(|c| match c {
                DrawCommand::Text { text, alpha, .. } if text == wanted => Some(*alpha),
                _ => None,
            })
        };
        assert_eq!(alpha_of(title::TITLE_TEXT), Some(1.0));
        let faded = alpha_of(game_over::GAME_OVER_TEXT).unwrap();
        assert!((faded - 0.2).abs() < 1e-6);
    }
}
