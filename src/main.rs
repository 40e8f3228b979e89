//! Meteor Storm headless host
//!
//! Runs the simulation at its fixed tick with a scripted autopilot standing in
//! for the keyboard, and a renderer that only counts what it is handed.
//!
//! Usage: `meteor-storm [settings.json] [--ticks N] [--seed N]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::f32::consts::{PI, TAU};
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;

    use meteor_storm::assets::verify_assets;
    use meteor_storm::audio::SilentBackend;
    use meteor_storm::persistence::{MemoryScoreStore, ScoreFile, ScoreStore};
    use meteor_storm::platform::{DirAssetLoader, Renderer};
    use meteor_storm::renderer::{DrawCommand, Frame};
    use meteor_storm::scene::Scene;
    use meteor_storm::sim::{GameWorld, TickInput};
    use meteor_storm::{Game, GameError, Result, Settings, UpdateOutcome};

    const DEFAULT_SETTINGS: &str = "meteor-storm.json";
    /// Ticks between start presses on the title and game-over screens
    const START_INTERVAL: u64 = 90;
    const SHIELD_DISTANCE: f32 = 160.0;
    const HYPERSPACE_DISTANCE: f32 = 150.0;
    const AIM_TOLERANCE: f32 = 0.15;

    #[derive(Parser, Debug)]
    #[command(name = "meteor-storm")]
    #[command(about = "Run the Meteor Storm simulation headless under a scripted autopilot")]
    pub struct Args {
        /// Settings file (JSON); defaults are used when it does not exist
        #[arg(default_value = DEFAULT_SETTINGS)]
        settings: PathBuf,
        /// Ticks to run, overriding `headless_ticks`
        #[arg(long)]
        ticks: Option<u64>,
        /// RNG seed, overriding the settings file
        #[arg(long)]
        seed: Option<u64>,
    }

    impl Args {
        fn settings(&self) -> Result<Settings> {
            let mut settings = Settings::load(&self.settings)?;
            if let Some(ticks) = self.ticks {
                settings.headless_ticks = ticks;
            }
            if self.seed.is_some() {
                settings.seed = self.seed;
            }
            Ok(settings)
        }
    }

    #[derive(Debug, Default)]
    struct CountingRenderer {
        sprites: u64,
        stars: u64,
        texts: u64,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, cmd: &DrawCommand) {
            match cmd {
                DrawCommand::Sprite { .. } => self.sprites += 1,
                DrawCommand::Star { .. } => self.stars += 1,
                DrawCommand::Text { .. } => self.texts += 1,
            }
        }
    }

    pub fn run(args: &Args) -> Result<()> {
        let settings = args.settings()?;

        if let Some(dir) = &settings.asset_dir {
            verify_assets(&DirAssetLoader::new(dir))?;
        }

        let mut game = Game::new(
            &settings,
            Box::new(SilentBackend::default()),
            score_store(&settings),
        );
        let mut renderer = CountingRenderer::default();
        let mut frame = Frame::new();

        let mut ticks = 0;
        while ticks < settings.headless_ticks {
            let input = autopilot(&game, ticks);
            ticks += 1;
            if game.update(&input) == UpdateOutcome::Quit {
                break;
            }
            frame.clear();
            game.draw(&mut frame);
            frame.present(&mut renderer);
        }

        let session = game.session();
        log::info!(
            "Ran {} ticks: score {}, best {}, scene {}",
            ticks,
            session.score(),
            session.scores.best,
            game.scene().map_or("none", Scene::name)
        );
        log::info!(
            "Rendered {} sprites, {} stars, {} text lines",
            renderer.sprites,
            renderer.stars,
            renderer.texts
        );
        Ok(())
    }

    fn score_store(settings: &Settings) -> Box<dyn ScoreStore> {
        if let Some(path) = &settings.high_score_path {
            return Box::new(ScoreFile::new(path));
        }
        match ScoreFile::in_data_dir() {
            Ok(file) => Box::new(file),
            Err(GameError::NoDataDir) => {
                log::warn!("No user data directory; high score kept in memory");
                Box::new(MemoryScoreStore::default())
            }
            Err(e) => {
                log::warn!("High score storage unavailable ({}); kept in memory", e);
                Box::new(MemoryScoreStore::default())
            }
        }
    }

    /// Scripted input: press start on the menus, otherwise turn toward the
    /// nearest meteor and shoot, shielding or jumping when things get close.
    fn autopilot(game: &Game, tick: u64) -> TickInput {
        let mut input = TickInput::default();
        match game.scene() {
            Some(Scene::Title(_)) | Some(Scene::GameOver(_)) => {
                input.start = tick % START_INTERVAL == START_INTERVAL - 1;
            }
            Some(Scene::Game(_)) => {
                if let Some(world) = &game.session().world {
                    steer(world, &mut input);
                }
            }
            _ => {}
        }
        input
    }

    fn steer(world: &GameWorld, input: &mut TickInput) {
        let ship = world.player.pos;
        let nearest_meteor = world
            .store
            .meteors
            .values()
            .filter(|m| !m.exploded)
            .map(|m| m.pos())
            .min_by(|a, b| a.distance(ship).total_cmp(&b.distance(ship)));
        let nearest_alien = world
            .store
            .aliens
            .values()
            .filter(|a| !a.exploded)
            .map(|a| a.pos.distance(ship))
            .min_by(f32::total_cmp);

        if nearest_alien.is_some_and(|d| d < HYPERSPACE_DISTANCE) {
            input.hyperspace = true;
        }

        let Some(target) = nearest_meteor else {
            return;
        };
        if target.distance(ship) < SHIELD_DISTANCE && !world.player.is_shielded() {
            input.shield = true;
        }

        let off = angle_between(world.player.rotation, aim_at(ship, target));
        if off > AIM_TOLERANCE {
            input.rotate_right = true;
        } else if off < -AIM_TOLERANCE {
            input.rotate_left = true;
        } else {
            input.fire = true;
        }
    }

    /// Rotation that points the nose from `from` at `to` (0 = up)
    fn aim_at(from: Vec2, to: Vec2) -> f32 {
        let d = to - from;
        d.y.atan2(d.x) + PI / 2.0
    }

    /// Signed shortest turn from `current` to `wanted`, in `(-PI, PI]`
    fn angle_between(current: f32, wanted: f32) -> f32 {
        let diff = (wanted - current).rem_euclid(TAU);
        if diff > PI { diff - TAU } else { diff }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let args = headless::Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Meteor Storm (headless) starting...");

    if let Err(e) = headless::run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Game` directly; there is no binary entry point
}
