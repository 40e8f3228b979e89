use serde::{Deserialize, Serialize};

/// Input snapshot for a single tick
///
/// Movement and ability fields are "held" states. `start` and `quit` are
/// edge-triggered: the host sets them only on the tick the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    pub reverse: bool,
    pub fire: bool,
    pub shield: bool,
    pub hyperspace: bool,
    /// Start / continue (title, level interstitial, game over)
    pub start: bool,
    pub quit: bool,
}

impl TickInput {
    pub fn start() -> Self {
        Self {
            start: true,
            ..Self::default()
        }
    }

    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }
}
