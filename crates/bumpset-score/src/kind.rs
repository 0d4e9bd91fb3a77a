//! The named score events a rally can produce.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One kind of scoring trigger.
///
/// Every jump and every spike scores on its own; the remaining kinds are
/// style bonuses evaluated at the moment of a spike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreKind {
    /// Leaving the ground.
    Jump,
    /// Base score for connecting with a spike.
    Spike,
    /// Ball nearly motionless vertically at contact (near the top of its arc).
    HighPoint,
    /// Ball touched just above the top of the player's collision box.
    FingerTips,
    /// Ball struck close to the ground.
    LowPoint,
    /// Player had been airborne for a long time.
    HangTime,
    /// Player drifting backwards at contact.
    FadeAway,
    /// Ball still rising at contact.
    Upward,
    /// Player moving very fast at contact.
    Speedy,
}

impl ScoreKind {
    /// Every kind, in declaration order.
    pub const ALL: [ScoreKind; 9] = [
        ScoreKind::Jump,
        ScoreKind::Spike,
        ScoreKind::HighPoint,
        ScoreKind::FingerTips,
        ScoreKind::LowPoint,
        ScoreKind::HangTime,
        ScoreKind::FadeAway,
        ScoreKind::Upward,
        ScoreKind::Speedy,
    ];

    /// The label shown to the player.
    pub fn label(self) -> &'static str {
        match self {
            ScoreKind::Jump => "Jump",
            ScoreKind::Spike => "Spike",
            ScoreKind::HighPoint => "High Point",
            ScoreKind::FingerTips => "Finger Tips",
            ScoreKind::LowPoint => "Low Point",
            ScoreKind::HangTime => "Hang Time",
            ScoreKind::FadeAway => "Fade Away",
            ScoreKind::Upward => "Upward",
            ScoreKind::Speedy => "Speedy",
        }
    }

    /// `true` for the style bonuses that only fire alongside a spike.
    pub fn is_bonus(self) -> bool {
        !matches!(self, ScoreKind::Jump | ScoreKind::Spike)
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
