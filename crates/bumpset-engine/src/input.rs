//! Per-tick input handed to every behaviour.
//!
//! Gesture recognition and the session state machine live outside this
//! crate. Whatever owns them samples once per tick and builds an
//! [`InputFrame`].

use bumpset_world::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// A recognised touch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    /// Swipe; `delta` is the drag in screen pixels (up is negative y).
    Flick { delta: Vec2, position: Vec2 },
    Tap { position: Vec2 },
}

/// Where the wider game session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Playing,
    /// The rally ended; `new_best` when the score beat the stored best.
    GameOver { new_best: bool },
    GameOverLoss,
}

/// Input sampled for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Cleared while menus or cut-scenes own the screen.
    pub input_enabled: bool,
    pub gestures: Vec<Gesture>,
    /// Scripted swipe that replaces any flick delta (tutorial).
    pub swipe_override: Option<Vec2>,
    pub phase: SessionPhase,
}

impl Default for InputFrame {
    fn default() -> Self {
        Self {
            input_enabled: true,
            gestures: Vec::new(),
            swipe_override: None,
            phase: SessionPhase::Playing,
        }
    }
}

impl InputFrame {
    /// Input enabled, no gestures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Input disabled, no gestures.
    pub fn disabled() -> Self {
        Self {
            input_enabled: false,
            ..Self::default()
        }
    }

    pub fn with_flick(mut self, delta: Vec2) -> Self {
        self.gestures.push(Gesture::Flick {
            delta,
            position: Vec2::ZERO,
        });
        self
    }

    pub fn with_tap(mut self) -> Self {
        self.gestures.push(Gesture::Tap {
            position: Vec2::ZERO,
        });
        self
    }

    pub fn with_swipe_override(mut self, delta: Vec2) -> Self {
        self.swipe_override = Some(delta);
        self
    }

    pub fn with_phase(mut self, phase: SessionPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn has_tap(&self) -> bool {
        self.gestures.iter().any(|g| matches!(g, Gesture::Tap { .. }))
    }

    /// Delta of the first flick this tick, replaced by the override if set.
    pub fn flick_delta(&self) -> Option<Vec2> {
        let delta = self.gestures.iter().find_map(|g| match g {
            Gesture::Flick { delta, .. } => Some(*delta),
            Gesture::Tap { .. } => None,
        })?;
        Some(self.swipe_override.unwrap_or(delta))
    }
}
