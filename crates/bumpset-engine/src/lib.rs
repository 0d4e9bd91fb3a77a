//! bumpset engine -- the player character, its physics and the scene that
//! ticks it.
//!
//! This crate builds on [`bumpset_world`] (actors and spatial queries) and
//! [`bumpset_score`] (score events) to provide a fixed 30 Hz simulation: a
//! [`Scene`](tick::Scene) runs every [`Behaviour`](tick::Behaviour) in two
//! passes per tick, and the [`PlayerActor`](player::PlayerActor) turns
//! gestures into jumps, spikes and serve receives.
//!
//! Rendering, audio playback, camera and particle spawning are external.
//! Behaviours reach them through the [`Services`](services::Services)
//! traits; [`HeadlessServices`](services::HeadlessServices) records every
//! request instead.
//!
//! # Quick Start
//!
//! ```
//! use bumpset_engine::prelude::*;
//!
//! let mut world = ActorWorld::new();
//! let player = world.spawn(PlayerActor::record(Vec2::new(-40.0, 0.0)));
//!
//! let mut scene = Scene::new(world, TickConfig::default());
//! let actor = PlayerActor::new(PlayerTuning::default()).unwrap();
//! scene.add_behaviour(player, Box::new(actor)).unwrap();
//!
//! let mut services = HeadlessServices::default();
//! scene.tick(&InputFrame::new(), &mut services);
//! scene.tick(&InputFrame::new().with_flick(Vec2::new(0.0, -1920.0)), &mut services);
//!
//! let mut query = Message::get_current_state();
//! scene.send(player, &mut query, &mut services).unwrap();
//! assert_eq!(query, Message::GetCurrentState { state: Some(PlayerState::Jumping) });
//! assert_eq!(services.scores().count_of(ScoreKind::Jump), 1);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod input;
pub mod logging;
pub mod message;
pub mod physics;
pub mod player;
pub mod services;
pub mod snapshot;
pub mod tick;

use bumpset_world::actor_id::ActorId;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the world crate for convenience.
pub use bumpset_world;

/// Re-export the score crate for convenience.
pub use bumpset_score;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from synchronous message dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("actor {actor:?} does not exist")]
    NoSuchActor { actor: ActorId },

    #[error("actor {actor:?} has no behaviour to receive messages")]
    NoBehaviour { actor: ActorId },

    /// The target is the behaviour currently running.
    #[error("actor {actor:?} is mid-update and cannot receive a message")]
    Reentrant { actor: ActorId },
}

/// Errors loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use bumpset_score::prelude::*;
    pub use bumpset_world::prelude::*;

    pub use crate::config::{PlayerTuning, TickConfig};
    pub use crate::input::{Gesture, InputFrame, SessionPhase};
    pub use crate::logging::init_logging;
    pub use crate::message::{Delivery, Message};
    pub use crate::player::{PlayerActor, PlayerState};
    pub use crate::services::{
        AnimationClip, AnimationDriver, AudioDriver, CameraDriver, Effect, HeadlessServices,
        RestartPolicy, Services, SoundCue, SpawnHandle, Spawner, Template,
    };
    pub use crate::snapshot::{PlayerSnapshot, SceneSnapshot};
    pub use crate::tick::{Behaviour, MessageContext, Scene, TickContext, TickDiagnostics};
    pub use crate::{ConfigError, DispatchError};
}
