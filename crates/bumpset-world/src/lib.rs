//! bumpset world -- actors, court geometry and spatial queries.
//!
//! Every object on the court (the player, the partner, the ball, the net,
//! spawned effects) is an actor with an [`ActorRecord`](actor::ActorRecord)
//! stored in the [`ActorWorld`](world::ActorWorld). Behaviours in
//! `bumpset-engine` read and write these records and use the world's
//! queries to find each other.
//!
//! # Quick Start
//!
//! ```
//! use bumpset_world::prelude::*;
//!
//! let mut world = ActorWorld::new();
//! let player = world.spawn(
//!     ActorRecord::new("player")
//!         .with_position(Vec2::new(-40.0, 0.0))
//!         .with_half_extents(Vec2::new(4.0, 8.0))
//!         .with_class(Classification::Player),
//! );
//! let ball = world.spawn(
//!     ActorRecord::new("ball")
//!         .with_position(Vec2::new(-38.0, -6.0))
//!         .with_class(Classification::VolleyBall),
//! );
//!
//! let mut hits = Vec::new();
//! world.query_in_range(player, Classification::VolleyBall.into(), &mut hits).unwrap();
//! assert_eq!(hits, vec![ball]);
//! ```

#![deny(unsafe_code)]

pub mod actor;
pub mod actor_id;
pub mod geometry;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The handle's generation no longer matches its slot, or it was never
    /// allocated.
    #[error("actor {actor:?} does not exist (stale or never allocated)")]
    StaleActor { actor: actor_id::ActorId },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::actor::{ActorRecord, ClassSet, Classification};
    pub use crate::actor_id::ActorId;
    pub use crate::geometry::{Rect, Vec2};
    pub use crate::world::ActorWorld;
    pub use crate::WorldError;
}
