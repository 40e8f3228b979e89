//! Per-process session state shared by every scene
//!
//! The session outlives individual runs: it keeps the high-score record, the
//! score store, the RNG and the audio manager, and holds the current
//! gameplay world while a run is in progress or just ended.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::ALIEN_AMBIENT_VOLUME;
use crate::highscores::HighScores;
use crate::persistence::ScoreStore;
use crate::sim::GameWorld;

/// Shared collaborators handed to the world and scenes each call
#[derive(Debug)]
pub struct Services {
    pub rng: Pcg32,
    pub audio: AudioManager,
    pub tps: u32,
    /// Stars per generated starfield
    pub star_count: usize,
}

impl Services {
    pub fn new(seed: u64, tps: u32, star_count: usize, mut audio: AudioManager) -> Self {
        audio.set_effect_volume(SoundEffect::AlienPresence, ALIEN_AMBIENT_VOLUME);
        Self {
            rng: Pcg32::seed_from_u64(seed),
            audio,
            tps: tps.max(1),
            star_count,
        }
    }
}

pub struct Session {
    pub services: Services,
    pub scores: HighScores,
    store: Box<dyn ScoreStore>,
    /// Current run. Still present on the game-over screen.
    pub world: Option<GameWorld>,
}

impl Session {
    /// Load the stored high score. A failed read starts the session at 0.
    pub fn new(services: Services, mut store: Box<dyn ScoreStore>) -> Self {
        let loaded = store.read().unwrap_or_else(|e| {
            log::warn!("Could not read high score: {}", e);
            0
        });
        log::info!("High score on record: {}", loaded);
        Self {
            services,
            scores: HighScores::new(loaded),
            store,
            world: None,
        }
    }

    /// Replace any previous run with a fresh one
    pub fn start_run(&mut self) {
        self.world = Some(GameWorld::new(&mut self.services));
        log::info!("New run started");
    }

    /// Score of the current (or just finished) run
    pub fn score(&self) -> u32 {
        self.world.as_ref().map_or(0, |w| w.score)
    }

    /// Record the final score and persist it if it beats the stored one.
    /// Write failures are logged and the old record is kept.
    pub fn finish_run(&mut self) {
        let score = self.score();
        self.scores.observe(score);
        if !self.scores.should_persist(score) {
            return;
        }
        match self.store.write(score) {
            Ok(()) => self.scores.record_written(score),
            Err(e) => log::warn!("Could not save high score {}: {}", score, e),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("scores", &self.scores)
            .field("in_run", &self.world.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryScoreStore;

    fn session(store: MemoryScoreStore) -> Session {
        Session::new(
            Services::new(7, 60, 0, AudioManager::default()),
            Box::new(store),
        )
    }

    #[test]
    fn test_broken_store_starts_at_zero() {
        let mut store = MemoryScoreStore::with_value(500);
        store.broken = true;
        let mut session = session(store);
        assert_eq!(session.scores, HighScores::new(0));

        // Write failure keeps the old record
        session.start_run();
        if let Some(world) = session.world.as_mut() {
            world.score = 10;
        }
        session.finish_run();
        assert_eq!(session.scores.recorded, 0);
        assert_eq!(session.scores.best, 10);
    }

    #[test]
    fn test_finish_run_records_only_better_scores() {
        let mut session = session(MemoryScoreStore::with_value(100));
        session.start_run();
        if let Some(world) = session.world.as_mut() {
            world.score = 80;
        }
        session.finish_run();
        assert_eq!(session.scores.recorded, 100);

        session.start_run();
        assert_eq!(session.score(), 0);
        if let Some(world) = session.world.as_mut() {
            world.score = 150;
        }
        session.finish_run();
        assert_eq!(session.scores.recorded, 150);
        assert_eq!(session.scores.best, 150);
        assert!(session.scores.is_new_high(150));
    }
}
