//! The message set actors exchange.
//!
//! Messages are delivered synchronously through
//! [`Scene::send`](crate::tick::Scene::send) or
//! [`TickContext::send`](crate::tick::TickContext::send). Request variants
//! carry an `Option` the receiver fills in; the sender reads it back after
//! the call returns.

use bumpset_world::geometry::Vec2;

use crate::player::PlayerState;

/// Everything one actor can tell or ask another.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The partner is about to serve toward `destination`.
    ServeDestination { destination: Vec2 },
    GetCurrentState { state: Option<PlayerState> },
    /// Draw above everything else (`true`) or at the normal priority.
    Highlight { enable: bool },
    MatchRestart,
    GameRestart,
    /// The rally is over.
    PlayOver,
    /// The free-trial jump allowance is used up.
    TrialLimitReached,
    TrialModeChanged,
    GetMultipleHitsBeforePartner { value: Option<bool> },
    /// Hits the receiver has made this rally.
    GetHitCount { count: Option<u32> },
    GetDebugInfo { lines: Vec<String> },
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Message::ServeDestination { .. } => "ServeDestination",
            Message::GetCurrentState { .. } => "GetCurrentState",
            Message::Highlight { .. } => "Highlight",
            Message::MatchRestart => "MatchRestart",
            Message::GameRestart => "GameRestart",
            Message::PlayOver => "PlayOver",
            Message::TrialLimitReached => "TrialLimitReached",
            Message::TrialModeChanged => "TrialModeChanged",
            Message::GetMultipleHitsBeforePartner { .. } => "GetMultipleHitsBeforePartner",
            Message::GetHitCount { .. } => "GetHitCount",
            Message::GetDebugInfo { .. } => "GetDebugInfo",
        }
    }

    pub fn get_current_state() -> Self {
        Message::GetCurrentState { state: None }
    }

    pub fn get_hit_count() -> Self {
        Message::GetHitCount { count: None }
    }

    pub fn get_multiple_hits_before_partner() -> Self {
        Message::GetMultipleHitsBeforePartner { value: None }
    }

    pub fn get_debug_info() -> Self {
        Message::GetDebugInfo { lines: Vec::new() }
    }
}

/// Whether a receiver acted on a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Handled,
    Ignored,
}

impl Delivery {
    pub fn is_handled(self) -> bool {
        self == Delivery::Handled
    }
}
