//! Asset manifest
//!
//! Maps every opaque sprite, sound and font handle to its path inside the
//! asset pack. The host decodes the files; the core only checks at startup
//! that each one can be loaded.

use std::collections::BTreeSet;

use crate::audio::SoundEffect;
use crate::error::{GameError, Result};
use crate::platform::AssetLoader;
use crate::renderer::{
    ALIEN_VARIANTS, DEATH_FRAME_COUNT, Font, METEOR_VARIANTS, SMALL_METEOR_VARIANTS, Sprite,
};

/// Image path for a sprite handle. Variant and frame numbers are 1-based on
/// disk.
pub fn sprite_path(sprite: Sprite) -> String {
    match sprite {
        Sprite::Player => "images/player.png".into(),
        Sprite::Meteor(n) => format!("images/meteors/{}.png", n + 1),
        Sprite::MeteorSmall(n) => format!("images/meteors-small/{}.png", n + 1),
        Sprite::Laser => "images/laser.png".into(),
        Sprite::AlienLaser => "images/red-laser.png".into(),
        Sprite::Explosion => "images/explosion.png".into(),
        Sprite::ExplosionSmall => "images/explosion-small.png".into(),
        Sprite::DeathFrame(n) => format!("images/explosion/{}.png", n + 1),
        Sprite::Exhaust => "images/fire.png".into(),
        Sprite::Shield => "images/shield.png".into(),
        Sprite::Alien(n) => format!("images/aliens/{}.png", n + 1),
        Sprite::LifeIndicator => "images/life-indicator.png".into(),
        Sprite::ShieldIndicator => "images/shield-indicator.png".into(),
        Sprite::HyperspaceIndicator => "images/hyperspace.png".into(),
    }
}

pub fn sound_path(effect: SoundEffect) -> &'static str {
    match effect {
        SoundEffect::Thrust => "audio/thrust.ogg",
        // One sample for all three burst shots
        SoundEffect::LaserOne | SoundEffect::LaserTwo | SoundEffect::LaserThree => "audio/fire.ogg",
        SoundEffect::Explosion => "audio/explosion.ogg",
        SoundEffect::BeatOne => "audio/beat1.ogg",
        SoundEffect::BeatTwo => "audio/beat2.ogg",
        SoundEffect::ShieldUp => "audio/shield.ogg",
        SoundEffect::AlienLaser => "audio/alien-laser.ogg",
        SoundEffect::AlienPresence => "audio/alien-sound.ogg",
    }
}

pub fn font_path(font: Font) -> &'static str {
    match font {
        Font::Title => "fonts/title.ttf",
        Font::Score | Font::Level => "fonts/score.ttf",
    }
}

/// Every sprite handle the game can emit
pub fn all_sprites() -> Vec<Sprite> {
    let mut sprites = vec![
        Sprite::Player,
        Sprite::Laser,
        Sprite::AlienLaser,
        Sprite::Explosion,
        Sprite::ExplosionSmall,
        Sprite::Exhaust,
        Sprite::Shield,
        Sprite::LifeIndicator,
        Sprite::ShieldIndicator,
        Sprite::HyperspaceIndicator,
    ];
    sprites.extend((0..METEOR_VARIANTS).map(Sprite::Meteor));
    sprites.extend((0..SMALL_METEOR_VARIANTS).map(Sprite::MeteorSmall));
    sprites.extend((0..ALIEN_VARIANTS).map(Sprite::Alien));
    sprites.extend((0..DEATH_FRAME_COUNT).map(Sprite::DeathFrame));
    sprites
}

/// Unique asset paths, sorted
pub fn manifest() -> Vec<String> {
    let mut paths: BTreeSet<String> = all_sprites().into_iter().map(sprite_path).collect();
    paths.extend(SoundEffect::ALL.iter().map(|e| sound_path(*e).to_string()));
    paths.extend(
        [Font::Title, Font::Score, Font::Level]
            .iter()
            .map(|f| font_path(*f).to_string()),
    );
    paths.into_iter().collect()
}

/// Load every manifest entry through `loader`. Fails on the first missing or
/// empty file; returns the number of files checked.
pub fn verify_assets(loader: &dyn AssetLoader) -> Result<usize> {
    let paths = manifest();
    for path in &paths {
        let bytes = loader.load_asset(path)?;
        if bytes.is_empty() {
            return Err(GameError::Asset {
                path: path.clone(),
                reason: "file is empty".into(),
            });
        }
    }
    log::info!("Verified {} assets", paths.len());
    Ok(paths.len())
}
