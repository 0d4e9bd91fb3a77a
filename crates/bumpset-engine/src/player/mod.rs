//! The player character: a gesture-driven state machine on top of the
//! per-tick physics.
//!
//! # Tick order
//!
//! Each [`update`](Behaviour::update):
//!
//! 1. Advance the spike timer if a spike attempt is in progress.
//! 2. Input: a tap while jumping starts a spike attempt, then a flick while
//!    idle launches a jump.
//! 3. Physics: gravity, movement, bounds. Touching the floor lands the
//!    player.
//! 4. State work: spike resolution ([`spike`]), the air-time counter, or
//!    walking to a serve ([`receive`]).
//! 5. Motion trail on/off.
//!
//! [`post_update`](Behaviour::post_update) keeps the player on its side of
//! the net once every actor has moved. Inbound messages are handled in
//! [`messages`].

mod messages;
mod receive;
mod spike;

pub use spike::{style_bonuses, StrikeSample};

use bumpset_score::kind::ScoreKind;
use bumpset_world::actor::{ActorRecord, Classification};
use bumpset_world::actor_id::ActorId;
use bumpset_world::geometry::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::PlayerTuning;
use crate::input::SessionPhase;
use crate::message::{Delivery, Message};
use crate::physics;
use crate::services::{AnimationClip, RestartPolicy, Services, SoundCue, Template};
use crate::snapshot::PlayerSnapshot;
use crate::tick::{Behaviour, MessageContext, TickContext};
use crate::ConfigError;

/// Collision half-size of the player sprite.
pub const PLAYER_HALF_EXTENTS: Vec2 = Vec2::new(6.0, 10.0);

// ---------------------------------------------------------------------------
// PlayerState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Before the first tick of a session.
    #[default]
    WaitingForMenu,
    Idle,
    /// Walking to where the partner's serve will land.
    Receiving,
    Jumping,
    /// Tapped mid-jump; looking for a ball to hit.
    SpikeAttempt,
    Falling,
}

impl PlayerState {
    pub const ALL: [PlayerState; 6] = [
        PlayerState::WaitingForMenu,
        PlayerState::Idle,
        PlayerState::Receiving,
        PlayerState::Jumping,
        PlayerState::SpikeAttempt,
        PlayerState::Falling,
    ];

    /// States that show the motion trail.
    pub fn is_airborne(self) -> bool {
        matches!(
            self,
            PlayerState::Jumping | PlayerState::SpikeAttempt | PlayerState::Falling
        )
    }
}

// ---------------------------------------------------------------------------
// StateTimer
// ---------------------------------------------------------------------------

/// Counts ticks since it was armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateTimer {
    lifetime: u32,
    elapsed: u32,
}

impl StateTimer {
    pub fn arm(&mut self, lifetime: u32) {
        self.lifetime = lifetime;
        self.elapsed = 0;
    }

    pub fn advance(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.lifetime
    }

    pub fn remaining(&self) -> u32 {
        self.lifetime.saturating_sub(self.elapsed)
    }
}

// ---------------------------------------------------------------------------
// PlayerActor
// ---------------------------------------------------------------------------

/// Behaviour for the controllable player.
///
/// Position and velocity live on the actor's [`ActorRecord`]; everything
/// else is private to the behaviour.
#[derive(Debug)]
pub struct PlayerActor {
    tuning: PlayerTuning,
    state: PlayerState,
    frames_in_air: u32,
    state_timer: StateTimer,
    walk_destination: Vec2,
    trial_limit_reached: bool,
    multiple_hits_before_partner: bool,
    starting_render_priority: Option<i32>,
    active_clip: Option<AnimationClip>,
    motion_trail: bool,
    rng: Pcg32,
    strike_results: Vec<ActorId>,
}

impl PlayerActor {
    /// Validate `tuning` and build a player waiting for the menu.
    pub fn new(tuning: PlayerTuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            rng: Pcg32::seed_from_u64(tuning.rng_seed),
            tuning,
            state: PlayerState::WaitingForMenu,
            frames_in_air: 0,
            state_timer: StateTimer::default(),
            walk_destination: Vec2::ZERO,
            trial_limit_reached: false,
            multiple_hits_before_partner: false,
            starting_render_priority: None,
            active_clip: None,
            motion_trail: false,
            strike_results: Vec::new(),
        })
    }

    /// A record for the player's actor, standing at `position`.
    pub fn record(position: Vec2) -> ActorRecord {
        ActorRecord::new("player")
            .with_position(position)
            .with_half_extents(PLAYER_HALF_EXTENTS)
            .with_class(Classification::Player)
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    pub fn frames_in_air(&self) -> u32 {
        self.frames_in_air
    }

    pub fn walk_destination(&self) -> Vec2 {
        self.walk_destination
    }

    pub fn trial_limit_reached(&self) -> bool {
        self.trial_limit_reached
    }

    pub fn multiple_hits_before_partner(&self) -> bool {
        self.multiple_hits_before_partner
    }

    pub fn motion_trail_enabled(&self) -> bool {
        self.motion_trail
    }

    pub fn active_clip(&self) -> Option<AnimationClip> {
        self.active_clip
    }

    pub fn state_timer(&self) -> &StateTimer {
        &self.state_timer
    }

    pub fn snapshot(&self, record: &ActorRecord) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state,
            position: record.position,
            velocity: record.velocity,
            frames_in_air: self.frames_in_air,
            walk_destination: self.walk_destination,
            trial_limit_reached: self.trial_limit_reached,
            multiple_hits_before_partner: self.multiple_hits_before_partner,
            motion_trail: self.motion_trail,
        }
    }

    fn set_state(&mut self, next: PlayerState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "player state");
            self.state = next;
        }
    }

    /// Request `clip` unless it is already the active one.
    fn play_clip(
        &mut self,
        me: ActorId,
        clip: AnimationClip,
        policy: RestartPolicy,
        services: &mut dyn Services,
    ) {
        if self.active_clip == Some(clip) {
            return;
        }
        self.active_clip = Some(clip);
        services.set_animation(me, clip, policy);
    }

    fn restore_zoom(&self, services: &mut dyn Services) {
        let zoom = services.default_zoom();
        services.set_zoom_target(zoom, self.tuning.restore_zoom_frames);
    }

    fn handle_input(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
        let input = ctx.input;
        if !input.input_enabled {
            return;
        }
        if self.state == PlayerState::Jumping && input.has_tap() {
            self.begin_spike(ctx.services);
        }
        if self.state == PlayerState::Idle && !self.trial_limit_reached {
            if let Some(delta) = input.flick_delta() {
                self.jump(me, delta, ctx);
            }
        }
    }

    fn begin_spike(&mut self, services: &mut dyn Services) {
        // The hit cue replaces this one if the spike connects.
        services.play_sound(SoundCue::SpikeMiss);
        self.state_timer.arm(self.tuning.spike_grace_ticks);
        self.set_state(PlayerState::SpikeAttempt);
    }

    fn jump(&mut self, me: ActorId, delta: Vec2, ctx: &mut TickContext<'_>) {
        let Some(record) = ctx.world.get_mut(me) else {
            return;
        };
        let zoom = ctx.services.default_zoom() * self.tuning.jump_zoom_factor;
        ctx.services.set_zoom_target(zoom, self.tuning.jump_zoom_frames);
        ctx.services.spawn_template(Template::Dust, record.position);
        record.velocity = delta / self.tuning.flick_divisor;
        ctx.services.emit(ScoreKind::Jump, record.position);
        ctx.services.play_sound(SoundCue::Jump);
        debug!(vx = record.velocity.x, vy = record.velocity.y, "jump");
        self.play_clip(me, AnimationClip::JumpUp, RestartPolicy::Restart, ctx.services);
        self.set_state(PlayerState::Jumping);
    }

    fn integrate(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
        let floor = self.tuning.floor();
        let Some(record) = ctx.world.get_mut(me) else {
            return;
        };
        let was_airborne = record.position.y < floor;
        let contact = physics::step(
            &mut record.position,
            &mut record.velocity,
            self.tuning.gravity,
            &self.tuning.bounds,
        );
        trace!(
            x = record.position.x,
            y = record.position.y,
            vx = record.velocity.x,
            vy = record.velocity.y,
            "player integrated"
        );
        if !contact.floor {
            return;
        }

        // A flick that never leaves the floor still zoomed in this tick.
        if was_airborne || self.state.is_airborne() {
            self.restore_zoom(ctx.services);
        }
        self.frames_in_air = 0;
        if self.state == PlayerState::Receiving {
            // Keep walking; `step` already stopped the fall.
            return;
        }
        record.velocity = Vec2::ZERO;
        let clip = landing_clip(ctx.input.phase);
        self.play_clip(me, clip, RestartPolicy::Restart, ctx.services);
        self.set_state(PlayerState::Idle);
    }

    fn sync_motion_trail(&mut self, me: ActorId, services: &mut dyn Services) {
        let wanted = self.state.is_airborne();
        if wanted != self.motion_trail {
            self.motion_trail = wanted;
            services.set_motion_trail(me, wanted);
        }
    }
}

/// Clip to show after touching down outside of a receive.
fn landing_clip(phase: SessionPhase) -> AnimationClip {
    match phase {
        SessionPhase::Playing => AnimationClip::Idle,
        SessionPhase::GameOver { new_best: true } => AnimationClip::Happy,
        SessionPhase::GameOver { new_best: false } | SessionPhase::GameOverLoss => {
            AnimationClip::Sad
        }
    }
}

impl Behaviour for PlayerActor {
    fn name(&self) -> &'static str {
        "player"
    }

    fn update(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
        let Some(record) = ctx.world.get(me) else {
            warn!(actor = %me, "player behaviour has no actor record");
            return;
        };
        if self.starting_render_priority.is_none() {
            self.starting_render_priority = Some(record.render_priority);
        }

        if self.state == PlayerState::SpikeAttempt {
            self.state_timer.advance();
        }

        self.handle_input(me, ctx);
        self.integrate(me, ctx);

        match self.state {
            PlayerState::SpikeAttempt => self.attempt_spike(me, ctx),
            PlayerState::Jumping => self.frames_in_air += 1,
            PlayerState::Receiving => self.resolve_receive(me, ctx),
            PlayerState::WaitingForMenu | PlayerState::Idle | PlayerState::Falling => {}
        }

        self.sync_motion_trail(me, ctx.services);
    }

    fn post_update(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
        if let Some(record) = ctx.world.get_mut(me) {
            record.position.x = record.position.x.min(self.tuning.net_offset);
        }
    }

    fn on_message(
        &mut self,
        me: ActorId,
        message: &mut Message,
        ctx: &mut MessageContext<'_>,
    ) -> Delivery {
        self.handle_message(me, message, ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
