//! Per-actor game-object data: kinematics, collision box, classification
//! tags, draw order and named attachment points.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Vec2};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Tags used by spatial queries to find actors of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Classification {
    /// The controllable character.
    Player = 0,
    /// The computer-controlled teammate.
    Ally = 1,
    VolleyBall = 2,
    /// Static blockers; the net is the only wall on the court.
    Wall = 3,
}

impl Classification {
    #[inline]
    fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// A small bitmask of [`Classification`] tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassSet {
    bits: u8,
}

impl ClassSet {
    pub const EMPTY: ClassSet = ClassSet { bits: 0 };

    pub fn of(tags: &[Classification]) -> Self {
        let mut set = Self::EMPTY;
        for &tag in tags {
            set.insert(tag);
        }
        set
    }

    pub fn insert(&mut self, tag: Classification) {
        self.bits |= tag.mask();
    }

    pub fn remove(&mut self, tag: Classification) {
        self.bits &= !tag.mask();
    }

    pub fn contains(&self, tag: Classification) -> bool {
        self.bits & tag.mask() != 0
    }

    /// `true` if at least one tag is shared with `other`.
    pub fn intersects(&self, other: ClassSet) -> bool {
        self.bits & other.bits != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl From<Classification> for ClassSet {
    fn from(tag: Classification) -> Self {
        ClassSet { bits: tag.mask() }
    }
}

// ---------------------------------------------------------------------------
// ActorRecord
// ---------------------------------------------------------------------------

/// The data every actor in the world carries.
///
/// Behaviours own their private state; anything another actor may read or
/// nudge (position, velocity, draw order) lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub name: String,
    /// Centre of the collision box.
    pub position: Vec2,
    /// Displacement applied per tick.
    pub velocity: Vec2,
    pub half_extents: Vec2,
    pub classes: ClassSet,
    pub render_priority: i32,
    /// Named points relative to `position`.
    pub attachments: Vec<(String, Vec2)>,
}

impl ActorRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            half_extents: Vec2::new(1.0, 1.0),
            classes: ClassSet::EMPTY,
            render_priority: 0,
            attachments: Vec::new(),
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_half_extents(mut self, half_extents: Vec2) -> Self {
        self.half_extents = half_extents;
        self
    }

    pub fn with_class(mut self, tag: Classification) -> Self {
        self.classes.insert(tag);
        self
    }

    pub fn with_render_priority(mut self, priority: i32) -> Self {
        self.render_priority = priority;
        self
    }

    pub fn with_attachment(mut self, name: impl Into<String>, offset: Vec2) -> Self {
        self.attachments.push((name.into(), offset));
        self
    }

    /// The world-space collision box.
    pub fn collision_rect(&self) -> Rect {
        Rect::from_center(self.position, self.half_extents)
    }

    /// World-space position of a named attachment point.
    pub fn attachment(&self, name: &str) -> Option<Vec2> {
        self.attachments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, offset)| self.position + *offset)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_set_membership() {
        let mut set = ClassSet::of(&[Classification::VolleyBall, Classification::Wall]);
        assert!(set.contains(Classification::VolleyBall));
        assert!(set.contains(Classification::Wall));
        assert!(!set.contains(Classification::Ally));

        set.remove(Classification::Wall);
        assert!(!set.contains(Classification::Wall));
        assert!(set.intersects(Classification::VolleyBall.into()));
        assert!(!set.intersects(ClassSet::of(&[Classification::Player])));
        assert!(ClassSet::EMPTY.is_empty());
    }

    #[test]
    fn attachment_is_relative_to_position() {
        let net = ActorRecord::new("net")
            .with_position(Vec2::new(0.0, -20.0))
            .with_attachment("SpikePoint", Vec2::new(0.0, -6.0));
        assert_eq!(net.attachment("SpikePoint"), Some(Vec2::new(0.0, -26.0)));
        assert_eq!(net.attachment("Missing"), None);
    }

    #[test]
    fn collision_rect_is_centred() {
        let ball = ActorRecord::new("ball")
            .with_position(Vec2::new(5.0, 5.0))
            .with_half_extents(Vec2::new(2.0, 3.0));
        let rect = ball.collision_rect();
        assert_eq!(rect.top(), 2.0);
        assert_eq!(rect.bottom(), 8.0);
        assert_eq!(rect.left(), 3.0);
        assert_eq!(rect.right(), 7.0);
    }
}
