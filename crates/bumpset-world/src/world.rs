//! The [`ActorWorld`]: every actor on the court and the queries behaviours
//! run against it.
//!
//! Actors are stored in a slot vector indexed by [`ActorId::index`]. Iteration
//! is always in slot order, so "first match" in a query is stable for a given
//! spawn history.

use tracing::debug;

use crate::actor::{ActorRecord, ClassSet, Classification};
use crate::actor_id::{ActorAllocator, ActorId};
use crate::geometry::Vec2;
use crate::WorldError;

/// Owns all [`ActorRecord`]s.
#[derive(Debug, Default)]
pub struct ActorWorld {
    allocator: ActorAllocator,
    slots: Vec<Option<ActorRecord>>,
}

impl ActorWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor and return its handle.
    pub fn spawn(&mut self, record: ActorRecord) -> ActorId {
        let id = self.allocator.allocate();
        let idx = id.index() as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        debug!(actor = %id, name = %record.name, "spawned actor");
        self.slots[idx] = Some(record);
        id
    }

    /// Remove an actor, returning its final record.
    pub fn despawn(&mut self, id: ActorId) -> Result<ActorRecord, WorldError> {
        if !self.allocator.release(id) {
            return Err(WorldError::StaleActor { actor: id });
        }
        let record = self.slots[id.index() as usize]
            .take()
            .ok_or(WorldError::StaleActor { actor: id })?;
        debug!(actor = %id, name = %record.name, "despawned actor");
        Ok(record)
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.allocator.is_alive(id)
    }

    pub fn actor_count(&self) -> usize {
        self.allocator.alive_count()
    }

    pub fn get(&self, id: ActorId) -> Option<&ActorRecord> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get(id.index() as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut ActorRecord> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get_mut(id.index() as usize)?.as_mut()
    }

    /// Like [`get`](Self::get) but reports stale handles as an error.
    pub fn try_get(&self, id: ActorId) -> Result<&ActorRecord, WorldError> {
        self.get(id).ok_or(WorldError::StaleActor { actor: id })
    }

    /// Like [`get_mut`](Self::get_mut) but reports stale handles as an error.
    pub fn try_get_mut(&mut self, id: ActorId) -> Result<&mut ActorRecord, WorldError> {
        self.get_mut(id).ok_or(WorldError::StaleActor { actor: id })
    }

    /// All live actors in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &ActorRecord)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(idx, slot)| {
            let record = slot.as_ref()?;
            let id = self.id_for_slot(idx)?;
            Some((id, record))
        })
    }

    /// Live actors carrying `tag`, in slot order.
    pub fn of_class(&self, tag: Classification) -> impl Iterator<Item = ActorId> + '_ {
        self.iter()
            .filter(move |(_, record)| record.classes.contains(tag))
            .map(|(id, _)| id)
    }

    pub fn first_of_class(&self, tag: Classification) -> Option<ActorId> {
        self.of_class(tag).next()
    }

    /// Collect every actor whose collision box overlaps `origin`'s and whose
    /// tags intersect `classes`. The origin itself is never returned.
    ///
    /// `out` is cleared first so a caller can reuse one buffer every tick.
    /// Returns the number of matches.
    pub fn query_in_range(
        &self,
        origin: ActorId,
        classes: ClassSet,
        out: &mut Vec<ActorId>,
    ) -> Result<usize, WorldError> {
        out.clear();
        let origin_rect = self.try_get(origin)?.collision_rect();
        for (id, record) in self.iter() {
            if id == origin || !record.classes.intersects(classes) {
                continue;
            }
            if record.collision_rect().intersects(&origin_rect) {
                out.push(id);
            }
        }
        Ok(out.len())
    }

    /// World-space position of `name` on `id`, if both exist.
    pub fn attachment_point(&self, id: ActorId, name: &str) -> Option<Vec2> {
        self.get(id)?.attachment(name)
    }

    fn id_for_slot(&self, idx: usize) -> Option<ActorId> {
        self.allocator.current(idx as u32)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn court() -> (ActorWorld, ActorId, ActorId, ActorId) {
        let mut world = ActorWorld::new();
        let player = world.spawn(
            ActorRecord::new("player")
                .with_position(Vec2::new(-40.0, -20.0))
                .with_half_extents(Vec2::new(4.0, 8.0))
                .with_class(Classification::Player),
        );
        let ball = world.spawn(
            ActorRecord::new("ball")
                .with_position(Vec2::new(-40.0, -26.0))
                .with_half_extents(Vec2::new(2.0, 2.0))
                .with_class(Classification::VolleyBall),
        );
        let net = world.spawn(
            ActorRecord::new("net")
                .with_position(Vec2::new(0.0, -16.0))
                .with_half_extents(Vec2::new(1.0, 16.0))
                .with_class(Classification::Wall)
                .with_attachment("SpikePoint", Vec2::new(0.0, -12.0)),
        );
        (world, player, ball, net)
    }

    #[test]
    fn spawn_and_get() {
        let (world, player, ball, _) = court();
        assert_eq!(world.actor_count(), 3);
        assert_eq!(world.get(player).map(|r| r.name.as_str()), Some("player"));
        assert_eq!(world.get(ball).map(|r| r.position), Some(Vec2::new(-40.0, -26.0)));
    }

    #[test]
    fn despawn_makes_handle_stale() {
        let (mut world, _, ball, _) = court();
        let record = world.despawn(ball).unwrap();
        assert_eq!(record.name, "ball");
        assert!(!world.is_alive(ball));
        assert!(world.get(ball).is_none());
        assert!(matches!(
            world.despawn(ball),
            Err(WorldError::StaleActor { .. })
        ));
    }

    #[test]
    fn recycled_slot_does_not_alias_old_handle() {
        let (mut world, _, ball, _) = court();
        world.despawn(ball).unwrap();
        let spark = world.spawn(ActorRecord::new("spark"));
        assert_eq!(spark.index(), ball.index());
        assert!(world.get(ball).is_none());
        assert_eq!(world.get(spark).map(|r| r.name.as_str()), Some("spark"));
    }

    #[test]
    fn query_in_range_finds_overlapping_ball() {
        let (world, player, ball, _) = court();
        let mut hits = Vec::new();
        let n = world
            .query_in_range(player, Classification::VolleyBall.into(), &mut hits)
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(hits, vec![ball]);
    }

    #[test]
    fn query_in_range_clears_stale_results() {
        let (mut world, player, ball, _) = court();
        let mut hits = vec![ball, ball];
        world.get_mut(ball).unwrap().position = Vec2::new(60.0, -70.0);
        let n = world
            .query_in_range(player, Classification::VolleyBall.into(), &mut hits)
            .unwrap();
        assert_eq!(n, 0);
        assert!(hits.is_empty());
    }

    #[test]
    fn query_in_range_filters_by_class() {
        let (world, player, _, _) = court();
        let mut hits = Vec::new();
        world
            .query_in_range(player, Classification::Ally.into(), &mut hits)
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn query_from_stale_origin_errors() {
        let (mut world, player, _, _) = court();
        world.despawn(player).unwrap();
        let mut hits = Vec::new();
        assert!(world
            .query_in_range(player, Classification::VolleyBall.into(), &mut hits)
            .is_err());
    }

    #[test]
    fn first_of_class_and_attachment() {
        let (world, _, _, net) = court();
        assert_eq!(world.first_of_class(Classification::Wall), Some(net));
        assert_eq!(world.first_of_class(Classification::Ally), None);
        assert_eq!(
            world.attachment_point(net, "SpikePoint"),
            Some(Vec2::new(0.0, -28.0))
        );
    }
}
