//! bumpset score -- named score events and the journal that tallies them.
//!
//! Behaviours report scoring moments through the [`ScoreEmitter`] trait.
//! The combo display and summary screen are external; [`journal`] provides
//! the recording implementation they (and the tests) read from.
//!
//! # Modules
//!
//! - [`kind`]: the [`ScoreKind`](kind::ScoreKind) enum and its labels.
//! - [`journal`]: [`ScoreJournal`](journal::ScoreJournal), an in-memory
//!   emitter with per-kind queries and a combo tally.

#![deny(unsafe_code)]

pub mod journal;
pub mod kind;

use bumpset_world::geometry::Vec2;

/// Receives score events. Fire-and-forget.
pub trait ScoreEmitter {
    /// Record one event of `kind`, to be displayed at `position`.
    fn emit(&mut self, kind: kind::ScoreKind, position: Vec2);
}

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::journal::{ComboTally, ScoreEvent, ScoreJournal};
    pub use crate::kind::ScoreKind;
    pub use crate::ScoreEmitter;
}
