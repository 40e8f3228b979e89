//! Platform abstraction layer
//!
//! The simulation core only talks to the outside world through these traits:
//! - `Renderer`: draws one display-list command
//! - `AudioBackend`: plays/pauses opaque sound handles
//! - `AssetLoader`: resolves an asset path to bytes
//!
//! Window/OS bootstrap, decoding and the audio device itself live with the host.

use std::path::PathBuf;

use crate::audio::SoundEffect;
use crate::error::{GameError, Result};
use crate::renderer::DrawCommand;

pub trait Renderer {
    fn render(&mut self, cmd: &DrawCommand);
}

/// Audio device collaborator, one player per sound handle
pub trait AudioBackend {
    fn play(&mut self, sound: SoundEffect, volume: f32);
    fn is_playing(&self, sound: SoundEffect) -> bool;
    fn rewind(&mut self, sound: SoundEffect);
    fn pause(&mut self, sound: SoundEffect);
}

pub trait AssetLoader {
    fn load_asset(&self, path: &str) -> Result<Vec<u8>>;
}

/// Loads assets from a directory on disk
#[derive(Debug, Clone)]
pub struct DirAssetLoader {
    root: PathBuf,
}

impl DirAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetLoader for DirAssetLoader {
    fn load_asset(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|e| GameError::Asset {
            path: full.display().to_string(),
            reason: e.to_string(),
        })
    }
}
