//! Sound effect bookkeeping
//!
//! The device itself is a collaborator (`platform::AudioBackend`). This module
//! owns volume/mute state and the "play unless already playing" policy every
//! effect in the game uses.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::platform::AudioBackend;

/// Sound effect handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Engine loop while thrusting or reversing
    Thrust,
    /// Burst shot 1
    LaserOne,
    /// Burst shot 2
    LaserTwo,
    /// Burst shot 3
    LaserThree,
    /// Ship, meteor or alien destroyed
    Explosion,
    /// Heartbeat, low
    BeatOne,
    /// Heartbeat, high
    BeatTwo,
    /// Shield raised
    ShieldUp,
    /// Alien fired
    AlienLaser,
    /// Ambient loop while aliens are on screen
    AlienPresence,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 10] = [
        SoundEffect::Thrust,
        SoundEffect::LaserOne,
        SoundEffect::LaserTwo,
        SoundEffect::LaserThree,
        SoundEffect::Explosion,
        SoundEffect::BeatOne,
        SoundEffect::BeatTwo,
        SoundEffect::ShieldUp,
        SoundEffect::AlienLaser,
        SoundEffect::AlienPresence,
    ];

    /// Fire sound for the given shot within a burst (1-based)
    pub fn for_shot(shot: u32) -> Option<SoundEffect> {
        match shot {
            1 => Some(SoundEffect::LaserOne),
            2 => Some(SoundEffect::LaserTwo),
            3 => Some(SoundEffect::LaserThree),
            _ => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    master_volume: f32,
    sfx_volume: f32,
    /// Per-effect gain on top of master * sfx
    effect_volume: HashMap<SoundEffect, f32>,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(SilentBackend::default()))
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            effect_volume: HashMap::new(),
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_effect_volume(&mut self, effect: SoundEffect, vol: f32) {
        self.effect_volume.insert(effect, vol.clamp(0.0, 1.0));
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume * self.effect_volume.get(&effect).copied().unwrap_or(1.0)
        }
    }

    /// Start an effect from the beginning unless it is already playing
    pub fn play(&mut self, effect: SoundEffect) {
        if self.backend.is_playing(effect) {
            return;
        }
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        self.backend.rewind(effect);
        self.backend.play(effect, vol);
    }

    /// Restart an effect even if it is mid-play
    pub fn restart(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        self.backend.rewind(effect);
        self.backend.play(effect, vol);
    }

    pub fn pause(&mut self, effect: SoundEffect) {
        if self.backend.is_playing(effect) {
            self.backend.pause(effect);
        }
    }

    pub fn is_playing(&self, effect: SoundEffect) -> bool {
        self.backend.is_playing(effect)
    }
}

/// Backend without a device.
///
/// Keeps "playing" state until paused so the play-once policy behaves the same
/// as with real players, and records every start for inspection.
#[derive(Debug, Default)]
pub struct SilentBackend {
    playing: HashSet<SoundEffect>,
    started: Vec<SoundEffect>,
}

impl SilentBackend {
    pub fn started(&self) -> &[SoundEffect] {
        &self.started
    }

    /// Mark every effect as finished
    pub fn finish_all(&mut self) {
        self.playing.clear();
    }
}

impl AudioBackend for SilentBackend {
    fn play(&mut self, sound: SoundEffect, _volume: f32) {
        self.playing.insert(sound);
        self.started.push(sound);
    }

    fn is_playing(&self, sound: SoundEffect) -> bool {
        self.playing.contains(&sound)
    }

    fn rewind(&mut self, _sound: SoundEffect) {}

    fn pause(&mut self, sound: SoundEffect) {
        self.playing.remove(&sound);
    }
}
