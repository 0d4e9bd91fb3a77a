//! Fixed-timestep scene: behaviours, the two-pass tick and message dispatch.
//!
//! A [`Scene`] owns the [`ActorWorld`] and the behaviours attached to its
//! actors. Each [`tick`](Scene::tick):
//!
//! 1. [`Services::begin_tick`] is called with the new tick number.
//! 2. Every behaviour's [`update`](Behaviour::update) runs, in registration
//!    order.
//! 3. Every behaviour's [`post_update`](Behaviour::post_update) runs, in the
//!    same order. Corrections that must see every actor's final position
//!    for the tick (the player's net clamp) go here.
//! 4. The tick counter advances.
//!
//! Messages are synchronous. While a behaviour is running it is taken out of
//! its slot, so a message addressed to its own actor fails with
//! [`DispatchError::Reentrant`] instead of aliasing `&mut self`. Message
//! handlers get a [`MessageContext`], which has no way to send, so handler
//! chains cannot recurse.
//!
//! # Example
//!
//! ```
//! use bumpset_engine::prelude::*;
//!
//! struct Drift;
//!
//! impl Behaviour for Drift {
//!     fn name(&self) -> &'static str {
//!         "drift"
//!     }
//!
//!     fn update(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
//!         if let Some(record) = ctx.world.get_mut(me) {
//!             record.position.x += 1.0;
//!         }
//!     }
//! }
//!
//! let mut world = ActorWorld::new();
//! let id = world.spawn(ActorRecord::new("crate"));
//! let mut scene = Scene::new(world, TickConfig::default());
//! scene.add_behaviour(id, Box::new(Drift)).unwrap();
//!
//! let mut services = HeadlessServices::default();
//! scene.run_ticks(10, &InputFrame::new(), &mut services);
//! assert_eq!(scene.tick_count(), 10);
//! assert_eq!(scene.world().get(id).unwrap().position.x, 10.0);
//! ```

use std::time::{Duration, Instant};

use bumpset_world::actor::ActorRecord;
use bumpset_world::actor_id::ActorId;
use bumpset_world::world::ActorWorld;
use bumpset_world::WorldError;
use tracing::{debug, trace};

use crate::config::TickConfig;
use crate::input::InputFrame;
use crate::message::{Delivery, Message};
use crate::services::Services;
use crate::snapshot::SceneSnapshot;
use crate::DispatchError;

// ---------------------------------------------------------------------------
// Behaviour
// ---------------------------------------------------------------------------

/// Per-actor logic driven by the [`Scene`].
pub trait Behaviour {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// First pass.
    fn update(&mut self, me: ActorId, ctx: &mut TickContext<'_>);

    /// Second pass, after every behaviour's `update` for this tick.
    fn post_update(&mut self, _me: ActorId, _ctx: &mut TickContext<'_>) {}

    fn on_message(
        &mut self,
        _me: ActorId,
        _message: &mut Message,
        _ctx: &mut MessageContext<'_>,
    ) -> Delivery {
        Delivery::Ignored
    }
}

/// What a behaviour can reach during `update` / `post_update`.
pub struct TickContext<'a> {
    /// Number of the tick being run (0 for the first).
    pub tick: u64,
    pub world: &'a mut ActorWorld,
    pub services: &'a mut dyn Services,
    pub input: &'a InputFrame,
    slots: &'a mut [BehaviourSlot],
}

impl TickContext<'_> {
    /// Deliver `message` to every behaviour on `to` and wait for them.
    pub fn send(&mut self, to: ActorId, message: &mut Message) -> Result<Delivery, DispatchError> {
        let mut ctx = MessageContext {
            world: &mut *self.world,
            services: &mut *self.services,
        };
        deliver(&mut *self.slots, to, message, &mut ctx)
    }
}

/// What a behaviour can reach while handling a message.
pub struct MessageContext<'a> {
    pub world: &'a mut ActorWorld,
    pub services: &'a mut dyn Services,
}

struct BehaviourSlot {
    actor: ActorId,
    behaviour: Option<Box<dyn Behaviour>>,
}

fn deliver(
    slots: &mut [BehaviourSlot],
    to: ActorId,
    message: &mut Message,
    ctx: &mut MessageContext<'_>,
) -> Result<Delivery, DispatchError> {
    if !ctx.world.is_alive(to) {
        return Err(DispatchError::NoSuchActor { actor: to });
    }
    let mut found = false;
    for slot in slots.iter().filter(|s| s.actor == to) {
        found = true;
        if slot.behaviour.is_none() {
            return Err(DispatchError::Reentrant { actor: to });
        }
    }
    if !found {
        return Err(DispatchError::NoBehaviour { actor: to });
    }

    let mut delivery = Delivery::Ignored;
    for slot in slots.iter_mut().filter(|s| s.actor == to) {
        if let Some(behaviour) = slot.behaviour.as_mut() {
            if behaviour.on_message(to, message, ctx).is_handled() {
                delivery = Delivery::Handled;
            }
        }
    }
    trace!(actor = %to, message = message.name(), ?delivery, "delivered message");
    Ok(delivery)
}

// ---------------------------------------------------------------------------
// TickDiagnostics
// ---------------------------------------------------------------------------

/// Wall-clock timing of the last tick.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    pub update_time: Duration,
    pub post_update_time: Duration,
    pub total_time: Duration,
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Pass {
    Update,
    PostUpdate,
}

/// The actor world plus the behaviours that drive it.
pub struct Scene {
    world: ActorWorld,
    slots: Vec<BehaviourSlot>,
    tick_counter: u64,
    config: TickConfig,
    last_diagnostics: TickDiagnostics,
}

impl Scene {
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn new(world: ActorWorld, config: TickConfig) -> Self {
        assert!(
            config.validate().is_ok(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        Self {
            world,
            slots: Vec::new(),
            tick_counter: 0,
            config,
            last_diagnostics: TickDiagnostics::default(),
        }
    }

    pub fn world(&self) -> &ActorWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ActorWorld {
        &mut self.world
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Attach `behaviour` to `actor`. An actor may carry several; they run
    /// in the order they were added.
    pub fn add_behaviour(
        &mut self,
        actor: ActorId,
        behaviour: Box<dyn Behaviour>,
    ) -> Result<(), DispatchError> {
        if !self.world.is_alive(actor) {
            return Err(DispatchError::NoSuchActor { actor });
        }
        debug!(actor = %actor, behaviour = behaviour.name(), "attached behaviour");
        self.slots.push(BehaviourSlot {
            actor,
            behaviour: Some(behaviour),
        });
        Ok(())
    }

    /// Remove `actor` and every behaviour attached to it.
    pub fn despawn(&mut self, actor: ActorId) -> Result<ActorRecord, WorldError> {
        let record = self.world.despawn(actor)?;
        self.slots.retain(|slot| slot.actor != actor);
        Ok(record)
    }

    /// Names of the behaviours on `actor`, in run order.
    pub fn behaviour_names(&self, actor: ActorId) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|s| s.actor == actor)
            .filter_map(|s| s.behaviour.as_ref().map(|b| b.name()))
            .collect()
    }

    pub fn behaviour_count(&self) -> usize {
        self.slots.len()
    }

    /// Run one tick: the update pass, then the post-update pass.
    pub fn tick(&mut self, input: &InputFrame, services: &mut dyn Services) {
        let start = Instant::now();
        services.begin_tick(self.tick_counter);

        self.run_pass(Pass::Update, input, services);
        let update_time = start.elapsed();

        let post_start = Instant::now();
        self.run_pass(Pass::PostUpdate, input, services);
        let post_update_time = post_start.elapsed();

        self.tick_counter += 1;
        self.last_diagnostics = TickDiagnostics {
            update_time,
            post_update_time,
            total_time: start.elapsed(),
        };
    }

    /// Run `n` ticks with the same input.
    pub fn run_ticks(&mut self, n: u64, input: &InputFrame, services: &mut dyn Services) {
        for _ in 0..n {
            self.tick(input, services);
        }
    }

    /// Send `message` to `to` from outside the tick (UI, session code).
    pub fn send(
        &mut self,
        to: ActorId,
        message: &mut Message,
        services: &mut dyn Services,
    ) -> Result<Delivery, DispatchError> {
        let mut ctx = MessageContext {
            world: &mut self.world,
            services,
        };
        deliver(&mut self.slots, to, message, &mut ctx)
    }

    /// Send a copy of `message` to every actor that has a behaviour.
    /// Returns how many actors handled it.
    pub fn broadcast(&mut self, message: &Message, services: &mut dyn Services) -> usize {
        let mut targets: Vec<ActorId> = Vec::new();
        for slot in &self.slots {
            if !targets.contains(&slot.actor) {
                targets.push(slot.actor);
            }
        }
        let mut handled = 0;
        for actor in targets {
            let mut copy = message.clone();
            if let Ok(Delivery::Handled) = self.send(actor, &mut copy, services) {
                handled += 1;
            }
        }
        handled
    }

    /// Number of ticks completed.
    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// Simulated seconds, computed from the tick count.
    pub fn elapsed_time(&self) -> f64 {
        self.tick_counter as f64 * self.config.fixed_dt
    }

    pub fn last_diagnostics(&self) -> &TickDiagnostics {
        &self.last_diagnostics
    }

    /// Copy the world's records for inspection or logging.
    pub fn capture_snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(self.tick_counter, self.config.fixed_dt, &self.world)
    }

    fn run_pass(&mut self, pass: Pass, input: &InputFrame, services: &mut dyn Services) {
        for idx in 0..self.slots.len() {
            let actor = self.slots[idx].actor;
            if !self.world.is_alive(actor) {
                continue;
            }
            let Some(mut behaviour) = self.slots[idx].behaviour.take() else {
                continue;
            };
            {
                let mut ctx = TickContext {
                    tick: self.tick_counter,
                    world: &mut self.world,
                    services: &mut *services,
                    input,
                    slots: &mut self.slots,
                };
                match pass {
                    Pass::Update => behaviour.update(actor, &mut ctx),
                    Pass::PostUpdate => behaviour.post_update(actor, &mut ctx),
                }
            }
            // A behaviour may have despawned actors; find our slot again.
            if let Some(slot) = self.slots.get_mut(idx) {
                if slot.actor == actor && slot.behaviour.is_none() {
                    slot.behaviour = Some(behaviour);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use bumpset_world::geometry::Vec2;

    use super::*;
    use crate::services::HeadlessServices;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        label: &'static str,
        log: Log,
    }

    impl Behaviour for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        fn update(&mut self, _me: ActorId, _ctx: &mut TickContext<'_>) {
            self.log.borrow_mut().push(format!("update:{}", self.label));
        }

        fn post_update(&mut self, _me: ActorId, _ctx: &mut TickContext<'_>) {
            self.log.borrow_mut().push(format!("post:{}", self.label));
        }

        fn on_message(
            &mut self,
            _me: ActorId,
            message: &mut Message,
            _ctx: &mut MessageContext<'_>,
        ) -> Delivery {
            match message {
                Message::GetHitCount { count } => {
                    *count = Some(3);
                    Delivery::Handled
                }
                _ => Delivery::Ignored,
            }
        }
    }

    struct SelfSender {
        result: Rc<RefCell<Option<Result<Delivery, DispatchError>>>>,
        peer: Option<ActorId>,
        peer_count: Rc<RefCell<Option<u32>>>,
    }

    impl Behaviour for SelfSender {
        fn name(&self) -> &'static str {
            "self-sender"
        }

        fn update(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
            let mut msg = Message::get_hit_count();
            *self.result.borrow_mut() = Some(ctx.send(me, &mut msg));
            if let Some(peer) = self.peer {
                let mut msg = Message::get_hit_count();
                if ctx.send(peer, &mut msg).is_ok() {
                    if let Message::GetHitCount { count } = msg {
                        *self.peer_count.borrow_mut() = count;
                    }
                }
            }
        }
    }

    fn two_actor_scene(log: &Log) -> (Scene, ActorId, ActorId) {
        let mut world = ActorWorld::new();
        let a = world.spawn(ActorRecord::new("a"));
        let b = world.spawn(ActorRecord::new("b"));
        let mut scene = Scene::new(world, TickConfig::default());
        scene
            .add_behaviour(a, Box::new(Recorder { label: "a", log: log.clone() }))
            .unwrap();
        scene
            .add_behaviour(b, Box::new(Recorder { label: "b", log: log.clone() }))
            .unwrap();
        (scene, a, b)
    }

    #[test]
    fn update_pass_completes_before_post_update() {
        let log: Log = Rc::default();
        let (mut scene, _, _) = two_actor_scene(&log);
        let mut services = HeadlessServices::default();
        scene.tick(&InputFrame::new(), &mut services);
        assert_eq!(
            *log.borrow(),
            vec!["update:a", "update:b", "post:a", "post:b"]
        );
        assert_eq!(scene.tick_count(), 1);
    }

    #[test]
    fn send_reaches_receiver_and_fills_reply() {
        let log: Log = Rc::default();
        let (mut scene, a, _) = two_actor_scene(&log);
        let mut services = HeadlessServices::default();
        let mut msg = Message::get_hit_count();
        let delivery = scene.send(a, &mut msg, &mut services).unwrap();
        assert_eq!(delivery, Delivery::Handled);
        assert_eq!(msg, Message::GetHitCount { count: Some(3) });

        let mut msg = Message::PlayOver;
        assert_eq!(
            scene.send(a, &mut msg, &mut services).unwrap(),
            Delivery::Ignored
        );
    }

    #[test]
    fn self_dispatch_is_reentrant_error() {
        let log: Log = Rc::default();
        let (mut scene, _, b) = two_actor_scene(&log);
        let sender = scene.world_mut().spawn(ActorRecord::new("sender"));
        let result = Rc::new(RefCell::new(None));
        let peer_count = Rc::new(RefCell::new(None));
        scene
            .add_behaviour(
                sender,
                Box::new(SelfSender {
                    result: result.clone(),
                    peer: Some(b),
                    peer_count: peer_count.clone(),
                }),
            )
            .unwrap();

        let mut services = HeadlessServices::default();
        scene.tick(&InputFrame::new(), &mut services);

        assert!(matches!(
            *result.borrow(),
            Some(Err(DispatchError::Reentrant { actor })) if actor == sender
        ));
        assert_eq!(*peer_count.borrow(), Some(3));
        // The sender's behaviour is back in its slot afterwards.
        assert_eq!(scene.behaviour_names(sender), vec!["self-sender"]);
    }

    #[test]
    fn send_errors() {
        let log: Log = Rc::default();
        let (mut scene, a, _) = two_actor_scene(&log);
        let bare = scene.world_mut().spawn(ActorRecord::new("bare"));
        let mut services = HeadlessServices::default();

        let mut msg = Message::PlayOver;
        assert!(matches!(
            scene.send(bare, &mut msg, &mut services),
            Err(DispatchError::NoBehaviour { .. })
        ));

        scene.despawn(a).unwrap();
        assert!(matches!(
            scene.send(a, &mut msg, &mut services),
            Err(DispatchError::NoSuchActor { .. })
        ));
        assert_eq!(scene.behaviour_count(), 1);
    }

    #[test]
    fn broadcast_counts_handlers() {
        let log: Log = Rc::default();
        let (mut scene, _, _) = two_actor_scene(&log);
        let mut services = HeadlessServices::default();
        assert_eq!(scene.broadcast(&Message::get_hit_count(), &mut services), 2);
        assert_eq!(scene.broadcast(&Message::MatchRestart, &mut services), 0);
    }

    #[test]
    fn add_behaviour_to_missing_actor_fails() {
        let mut world = ActorWorld::new();
        let id = world.spawn(ActorRecord::new("gone").with_position(Vec2::new(1.0, 1.0)));
        world.despawn(id).unwrap();
        let mut scene = Scene::new(world, TickConfig::default());
        let log: Log = Rc::default();
        let err = scene
            .add_behaviour(id, Box::new(Recorder { label: "x", log }))
            .unwrap_err();
        assert!(matches!(err, DispatchError::NoSuchActor { .. }));
    }

    #[test]
    fn elapsed_time_uses_fixed_dt() {
        let mut scene = Scene::new(ActorWorld::new(), TickConfig::default());
        let mut services = HeadlessServices::default();
        scene.run_ticks(30, &InputFrame::new(), &mut services);
        assert!((scene.elapsed_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive and finite")]
    fn zero_dt_panics() {
        Scene::new(ActorWorld::new(), TickConfig { fixed_dt: 0.0 });
    }
}
