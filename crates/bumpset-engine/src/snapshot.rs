//! Serializable views of the scene and the player for debugging.
//!
//! [`SceneSnapshot`] copies every actor record at a tick boundary.
//! [`PlayerSnapshot`] adds the player's private state machine fields. Both
//! serialize to JSON for logs and test fixtures. Neither is used to restore
//! a running scene: mid-match state is not persisted.
//!
//! ```
//! use bumpset_engine::prelude::*;
//!
//! let mut world = ActorWorld::new();
//! world.spawn(ActorRecord::new("ball").with_class(Classification::VolleyBall));
//! let scene = Scene::new(world, TickConfig::default());
//!
//! let snapshot = scene.capture_snapshot();
//! assert_eq!(snapshot.tick_counter, 0);
//! assert_eq!(snapshot.actors.len(), 1);
//! let json = snapshot.to_json().unwrap();
//! assert!(json.contains("\"ball\""));
//! ```

use bumpset_world::actor::ActorRecord;
use bumpset_world::actor_id::ActorId;
use bumpset_world::geometry::Vec2;
use bumpset_world::world::ActorWorld;
use serde::{Deserialize, Serialize};

use crate::player::PlayerState;

// ---------------------------------------------------------------------------
// SceneSnapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub tick_counter: u64,
    pub fixed_dt: f64,
    /// Live actors in slot order.
    pub actors: Vec<(ActorId, ActorRecord)>,
}

impl SceneSnapshot {
    pub fn capture(tick_counter: u64, fixed_dt: f64, world: &ActorWorld) -> Self {
        Self {
            tick_counter,
            fixed_dt,
            actors: world
                .iter()
                .map(|(id, record)| (id, record.clone()))
                .collect(),
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorRecord> {
        self.actors
            .iter()
            .find(|(actor, _)| *actor == id)
            .map(|(_, record)| record)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// PlayerSnapshot
// ---------------------------------------------------------------------------

/// The player's state machine plus its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub position: Vec2,
    pub velocity: Vec2,
    pub frames_in_air: u32,
    pub walk_destination: Vec2,
    pub trial_limit_reached: bool,
    pub multiple_hits_before_partner: bool,
    pub motion_trail: bool,
}

impl PlayerSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Human-readable lines, one field each.
    pub fn debug_lines(&self) -> Vec<String> {
        vec![
            format!("State: {:?}", self.state),
            format!("Position: ({:.2}, {:.2})", self.position.x, self.position.y),
            format!("Velocity: ({:.2}, {:.2})", self.velocity.x, self.velocity.y),
            format!("Frames in air: {}", self.frames_in_air),
            format!(
                "Walk destination: ({:.2}, {:.2})",
                self.walk_destination.x, self.walk_destination.y
            ),
            format!("Trial limit reached: {}", self.trial_limit_reached),
            format!(
                "Multiple hits before partner: {}",
                self.multiple_hits_before_partner
            ),
        ]
    }
}
