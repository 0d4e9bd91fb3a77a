//! Score journal: an in-memory [`ScoreEmitter`] that records every event.
//!
//! The [`ScoreJournal`] keeps each [`ScoreEvent`] in emission order, stamped
//! with the tick it happened on, and folds them into a [`ComboTally`] on
//! demand. The combo display and the score-summary screen read from it.
//!
//! # Example
//!
//! ```
//! use bumpset_score::prelude::*;
//! use bumpset_world::geometry::Vec2;
//!
//! let mut journal = ScoreJournal::new();
//! journal.begin_tick(12);
//! journal.emit(ScoreKind::Jump, Vec2::new(-40.0, 0.0));
//! journal.emit(ScoreKind::Spike, Vec2::new(-38.0, -30.0));
//!
//! assert_eq!(journal.len(), 2);
//! assert_eq!(journal.count_of(ScoreKind::Spike), 1);
//! assert_eq!(journal.tally().total, 2);
//! ```

use std::collections::BTreeMap;

use bumpset_world::geometry::Vec2;
use serde::{Deserialize, Serialize};

use crate::kind::ScoreKind;
use crate::ScoreEmitter;

// ---------------------------------------------------------------------------
// ScoreEvent
// ---------------------------------------------------------------------------

/// A single recorded score event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub kind: ScoreKind,
    /// Where the UI should place the popup.
    pub position: Vec2,
    /// Tick during which the event was emitted.
    pub tick: u64,
}

// ---------------------------------------------------------------------------
// ComboTally
// ---------------------------------------------------------------------------

/// Aggregate view of a journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTally {
    /// Number of events of every kind.
    pub total: usize,
    /// Number of bonus events (everything except jumps and spikes).
    pub bonuses: usize,
    pub by_kind: BTreeMap<ScoreKind, usize>,
}

// ---------------------------------------------------------------------------
// ScoreJournal
// ---------------------------------------------------------------------------

/// Accumulates [`ScoreEvent`]s for the current rally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreJournal {
    events: Vec<ScoreEvent>,
    current_tick: u64,
}

impl ScoreJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp subsequent events with `tick`.
    pub fn begin_tick(&mut self, tick: u64) {
        self.current_tick = tick;
    }

    /// Drop every recorded event, e.g. when a rally ends.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in emission order.
    pub fn events(&self) -> &[ScoreEvent] {
        &self.events
    }

    pub fn events_of_kind(&self, kind: ScoreKind) -> impl Iterator<Item = &ScoreEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn events_at_tick(&self, tick: u64) -> impl Iterator<Item = &ScoreEvent> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    pub fn count_of(&self, kind: ScoreKind) -> usize {
        self.events_of_kind(kind).count()
    }

    /// Kinds in emission order.
    pub fn kinds(&self) -> Vec<ScoreKind> {
        self.events.iter().map(|e| e.kind).collect()
    }

    pub fn tally(&self) -> ComboTally {
        let mut tally = ComboTally::default();
        for event in &self.events {
            tally.total += 1;
            if event.kind.is_bonus() {
                tally.bonuses += 1;
            }
            *tally.by_kind.entry(event.kind).or_insert(0) += 1;
        }
        tally
    }
}

impl ScoreEmitter for ScoreJournal {
    fn emit(&mut self, kind: ScoreKind, position: Vec2) {
        tracing::trace!(kind = %kind, x = position.x, y = position.y, "score event");
        self.events.push(ScoreEvent {
            kind,
            position,
            tick: self.current_tick,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn spike_with_bonuses(journal: &mut ScoreJournal, tick: u64) {
        journal.begin_tick(tick);
        journal.emit(ScoreKind::HighPoint, Vec2::new(-30.0, -40.0));
        journal.emit(ScoreKind::HangTime, Vec2::new(-30.0, -40.0));
        journal.emit(ScoreKind::Spike, Vec2::new(-28.0, -50.0));
    }

    #[test]
    fn empty_journal() {
        let journal = ScoreJournal::new();
        assert!(journal.is_empty());
        assert_eq!(journal.len(), 0);
        assert_eq!(journal.tally(), ComboTally::default());
    }

    #[test]
    fn events_keep_emission_order_and_tick() {
        let mut journal = ScoreJournal::new();
        journal.begin_tick(3);
        journal.emit(ScoreKind::Jump, Vec2::new(-40.0, 0.0));
        spike_with_bonuses(&mut journal, 25);

        assert_eq!(
            journal.kinds(),
            vec![
                ScoreKind::Jump,
                ScoreKind::HighPoint,
                ScoreKind::HangTime,
                ScoreKind::Spike
            ]
        );
        assert_eq!(journal.events()[0].tick, 3);
        assert_eq!(journal.events_at_tick(25).count(), 3);
    }

    #[test]
    fn tally_counts_bonuses_separately() {
        let mut journal = ScoreJournal::new();
        journal.emit(ScoreKind::Jump, Vec2::ZERO);
        spike_with_bonuses(&mut journal, 10);
        spike_with_bonuses(&mut journal, 40);

        let tally = journal.tally();
        assert_eq!(tally.total, 7);
        assert_eq!(tally.bonuses, 4);
        assert_eq!(tally.by_kind.get(&ScoreKind::Spike), Some(&2));
        assert_eq!(tally.by_kind.get(&ScoreKind::Jump), Some(&1));
        assert_eq!(tally.by_kind.get(&ScoreKind::Speedy), None);
    }

    #[test]
    fn clear_between_rallies() {
        let mut journal = ScoreJournal::new();
        spike_with_bonuses(&mut journal, 10);
        journal.clear();
        assert!(journal.is_empty());
        journal.emit(ScoreKind::Jump, Vec2::ZERO);
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.events()[0].tick, 10, "tick stamp survives clear");
    }

    #[test]
    fn serialization_roundtrip() {
        let mut journal = ScoreJournal::new();
        spike_with_bonuses(&mut journal, 7);
        let json = serde_json::to_string(&journal).unwrap();
        let back: ScoreJournal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.events(), journal.events());
    }
}
