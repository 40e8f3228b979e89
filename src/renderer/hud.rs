//! Heads-up display: score lines and the ability indicators

use glam::Vec2;

use super::{Font, Frame, Sprite};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const WHITE: [u8; 4] = [255; 4];
pub const GOLD: [u8; 4] = [255, 215, 0, 255];

const INDICATOR_ALPHA: f32 = 0.2;
const INDICATOR_SPACING: f32 = 50.0;

/// Values the HUD shows for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudState {
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub lives: u32,
    pub shields: u32,
    pub hyperspace_ready: bool,
}

/// Zero-padded to six digits
pub fn format_score(score: u32) -> String {
    format!("{:06}", score)
}

pub fn draw(frame: &mut Frame, hud: &HudState) {
    let mid = SCREEN_WIDTH / 2.0;
    frame.text(
        format!("Score: {}", format_score(hud.score)),
        Vec2::new(mid, 40.0),
        Font::Score,
        24.0,
        WHITE,
    );
    frame.text(
        format!("High Score: {}", format_score(hud.high_score)),
        Vec2::new(mid, 80.0),
        Font::Score,
        16.0,
        WHITE,
    );
    frame.text(
        format!("Current Level: {}", hud.level),
        Vec2::new(mid, SCREEN_HEIGHT - 40.0),
        Font::Level,
        16.0,
        WHITE,
    );

    for i in 0..hud.lives {
        let x = 20.0 + INDICATOR_SPACING * i as f32;
        indicator(frame, Sprite::LifeIndicator, Vec2::new(x, 20.0));
    }
    for i in 0..hud.shields {
        let x = 45.0 + INDICATOR_SPACING * i as f32;
        indicator(frame, Sprite::ShieldIndicator, Vec2::new(x, 60.0));
    }
    if hud.hyperspace_ready {
        indicator(frame, Sprite::HyperspaceIndicator, Vec2::new(37.0, 95.0));
    }
}

fn indicator(frame: &mut Frame, sprite: Sprite, pos: Vec2) {
    frame.sprite_faded(sprite, pos, 0.0, INDICATOR_ALPHA);
}

/// Large centred line used by the interstitial scenes
pub fn title(frame: &mut Frame, text: impl Into<String>) {
    frame.text(
        text,
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
        Font::Title,
        72.0,
        WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawCommand;

    fn sprites(frame: &Frame, wanted: Sprite) -> Vec<(Vec2, f32)> {
        frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite {
                    sprite, pos, alpha, ..
                } if *sprite == wanted => Some((*pos, *alpha)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "000000");
        assert_eq!(format_score(1234), "001234");
        assert_eq!(format_score(1_234_567), "1234567");
    }

    #[test]
    fn test_indicator_rows() {
        let mut frame = Frame::new();
        draw(
            &mut frame,
            &HudState {
                lives: 3,
                shields: 2,
                hyperspace_ready: false,
                ..Default::default()
            },
        );

        let lives = sprites(&frame, Sprite::LifeIndicator);
        assert_eq!(
            lives.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            vec![Vec2::new(20.0, 20.0), Vec2::new(70.0, 20.0), Vec2::new(120.0, 20.0)]
        );
        assert!(lives.iter().all(|(_, a)| *a == INDICATOR_ALPHA));
        assert_eq!(sprites(&frame, Sprite::ShieldIndicator).len(), 2);
        assert!(sprites(&frame, Sprite::HyperspaceIndicator).is_empty());
    }

    #[test]
    fn test_hyperspace_indicator_when_ready() {
        let mut frame = Frame::new();
        draw(
            &mut frame,
            &HudState {
                hyperspace_ready: true,
                ..Default::default()
            },
        );
        assert_eq!(
            sprites(&frame, Sprite::HyperspaceIndicator),
            vec![(Vec2::new(37.0, 95.0), INDICATOR_ALPHA)]
        );
    }
}
