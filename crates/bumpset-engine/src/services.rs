//! Presentation-side collaborators: animation, audio, camera and spawning.
//!
//! Behaviours never own these. The caller of [`Scene::tick`](crate::tick::Scene::tick)
//! passes a `&mut dyn Services` that bundles every capability, so a real
//! frontend and the [`HeadlessServices`] recorder are interchangeable.

use bumpset_score::journal::ScoreJournal;
use bumpset_score::kind::ScoreKind;
use bumpset_score::ScoreEmitter;
use bumpset_world::actor_id::ActorId;
use bumpset_world::geometry::Vec2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Named animation clips on the player sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationClip {
    Idle,
    JumpUp,
    Spike,
    Walk,
    Bump,
    Happy,
    Sad,
}

impl AnimationClip {
    pub fn name(self) -> &'static str {
        match self {
            AnimationClip::Idle => "Idle",
            AnimationClip::JumpUp => "JumpUp",
            AnimationClip::Spike => "Spike",
            AnimationClip::Walk => "Walk",
            AnimationClip::Bump => "Bump",
            AnimationClip::Happy => "Happy",
            AnimationClip::Sad => "Sad",
        }
    }
}

/// What to do when the requested clip is already playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    Restart,
    /// Leave a finished one-shot clip on its last frame.
    DoNotRestartIfCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    SpikeHit,
    SpikeMiss,
    Bump,
}

/// Prefabs a behaviour can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Template {
    /// Dust puff at the player's feet on take-off.
    Dust,
    /// Particle burst on a connected spike.
    SparkEmitter,
}

/// Opaque handle to something a [`Spawner`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnHandle(pub u64);

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

pub trait AnimationDriver {
    fn set_animation(&mut self, actor: ActorId, clip: AnimationClip, policy: RestartPolicy);
    fn set_motion_trail(&mut self, actor: ActorId, enabled: bool);
}

pub trait AudioDriver {
    fn play_sound(&mut self, cue: SoundCue);
}

pub trait CameraDriver {
    fn default_zoom(&self) -> f32;
    /// Blend the camera zoom toward `scale` over `blend_frames` frames.
    fn set_zoom_target(&mut self, scale: f32, blend_frames: u32);
}

pub trait Spawner {
    fn spawn_template(&mut self, template: Template, position: Vec2) -> SpawnHandle;
    fn destroy(&mut self, handle: SpawnHandle);
}

/// Everything a behaviour may call out to during a tick.
pub trait Services: AnimationDriver + AudioDriver + CameraDriver + ScoreEmitter + Spawner {
    /// Called by the scene before the update pass of `tick`.
    fn begin_tick(&mut self, _tick: u64) {}
}

// ---------------------------------------------------------------------------
// HeadlessServices
// ---------------------------------------------------------------------------

/// One side effect requested by a behaviour.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Animation {
        actor: ActorId,
        clip: AnimationClip,
        policy: RestartPolicy,
    },
    MotionTrail {
        actor: ActorId,
        enabled: bool,
    },
    Sound(SoundCue),
    Zoom {
        scale: f32,
        blend_frames: u32,
    },
    Spawn {
        handle: SpawnHandle,
        template: Template,
        position: Vec2,
    },
    Destroy(SpawnHandle),
}

/// An [`Effect`] and the tick it was requested on.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRecord {
    pub tick: u64,
    pub effect: Effect,
}

/// [`Services`] implementation that records everything and renders nothing.
///
/// Score events go to an owned [`ScoreJournal`]; every other call is
/// appended to an effect log.
#[derive(Debug, Clone)]
pub struct HeadlessServices {
    effects: Vec<EffectRecord>,
    scores: ScoreJournal,
    default_zoom: f32,
    next_handle: u64,
    live_spawns: usize,
    current_tick: u64,
}

impl Default for HeadlessServices {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl HeadlessServices {
    pub fn new(default_zoom: f32) -> Self {
        Self {
            effects: Vec::new(),
            scores: ScoreJournal::new(),
            default_zoom,
            next_handle: 1,
            live_spawns: 0,
            current_tick: 0,
        }
    }

    pub fn effects(&self) -> &[EffectRecord] {
        &self.effects
    }

    /// Remove and return the effect log.
    pub fn take_effects(&mut self) -> Vec<EffectRecord> {
        std::mem::take(&mut self.effects)
    }

    pub fn effects_at_tick(&self, tick: u64) -> impl Iterator<Item = &Effect> {
        self.effects
            .iter()
            .filter(move |r| r.tick == tick)
            .map(|r| &r.effect)
    }

    pub fn scores(&self) -> &ScoreJournal {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreJournal {
        &mut self.scores
    }

    /// Every sound cue in request order.
    pub fn sounds(&self) -> Vec<SoundCue> {
        self.effects
            .iter()
            .filter_map(|r| match r.effect {
                Effect::Sound(cue) => Some(cue),
                _ => None,
            })
            .collect()
    }

    /// Every clip requested for `actor`, in order.
    pub fn animations_for(&self, actor: ActorId) -> Vec<AnimationClip> {
        self.effects
            .iter()
            .filter_map(|r| match r.effect {
                Effect::Animation { actor: a, clip, .. } if a == actor => Some(clip),
                _ => None,
            })
            .collect()
    }

    /// Every template spawned, in order.
    pub fn spawned(&self) -> Vec<Template> {
        self.effects
            .iter()
            .filter_map(|r| match r.effect {
                Effect::Spawn { template, .. } => Some(template),
                _ => None,
            })
            .collect()
    }

    pub fn zoom_requests(&self) -> Vec<(f32, u32)> {
        self.effects
            .iter()
            .filter_map(|r| match r.effect {
                Effect::Zoom {
                    scale,
                    blend_frames,
                } => Some((scale, blend_frames)),
                _ => None,
            })
            .collect()
    }

    /// Spawns not yet destroyed.
    pub fn live_spawns(&self) -> usize {
        self.live_spawns
    }

    /// Forget effects and scores, keeping the spawn counter.
    pub fn clear(&mut self) {
        self.effects.clear();
        self.scores.clear();
    }

    fn record(&mut self, effect: Effect) {
        self.effects.push(EffectRecord {
            tick: self.current_tick,
            effect,
        });
    }
}

impl AnimationDriver for HeadlessServices {
    fn set_animation(&mut self, actor: ActorId, clip: AnimationClip, policy: RestartPolicy) {
        self.record(Effect::Animation {
            actor,
            clip,
            policy,
        });
    }

    fn set_motion_trail(&mut self, actor: ActorId, enabled: bool) {
        self.record(Effect::MotionTrail { actor, enabled });
    }
}

impl AudioDriver for HeadlessServices {
    fn play_sound(&mut self, cue: SoundCue) {
        self.record(Effect::Sound(cue));
    }
}

impl CameraDriver for HeadlessServices {
    fn default_zoom(&self) -> f32 {
        self.default_zoom
    }

    fn set_zoom_target(&mut self, scale: f32, blend_frames: u32) {
        self.record(Effect::Zoom {
            scale,
            blend_frames,
        });
    }
}

impl Spawner for HeadlessServices {
    fn spawn_template(&mut self, template: Template, position: Vec2) -> SpawnHandle {
        let handle = SpawnHandle(self.next_handle);
        self.next_handle += 1;
        self.live_spawns += 1;
        self.record(Effect::Spawn {
            handle,
            template,
            position,
        });
        handle
    }

    fn destroy(&mut self, handle: SpawnHandle) {
        self.live_spawns = self.live_spawns.saturating_sub(1);
        self.record(Effect::Destroy(handle));
    }
}

impl ScoreEmitter for HeadlessServices {
    fn emit(&mut self, kind: ScoreKind, position: Vec2) {
        self.scores.emit(kind, position);
    }
}

impl Services for HeadlessServices {
    fn begin_tick(&mut self, tick: u64) {
        self.current_tick = tick;
        self.scores.begin_tick(tick);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_effects_with_tick() {
        let mut services = HeadlessServices::new(2.0);
        let actor = ActorId::new(0, 0);
        services.begin_tick(4);
        services.play_sound(SoundCue::Jump);
        services.set_animation(actor, AnimationClip::JumpUp, RestartPolicy::Restart);
        services.begin_tick(5);
        services.set_zoom_target(services.default_zoom() * 1.1, 10);

        assert_eq!(services.effects().len(), 3);
        assert_eq!(services.effects_at_tick(4).count(), 2);
        assert_eq!(services.sounds(), vec![SoundCue::Jump]);
        assert_eq!(services.animations_for(actor), vec![AnimationClip::JumpUp]);
        let zooms = services.zoom_requests();
        assert!((zooms[0].0 - 2.2).abs() < 1e-6);
    }

    #[test]
    fn spawn_handles_are_unique() {
        let mut services = HeadlessServices::default();
        let a = services.spawn_template(Template::Dust, Vec2::ZERO);
        let b = services.spawn_template(Template::SparkEmitter, Vec2::ZERO);
        assert_ne!(a, b);
        assert_eq!(services.live_spawns(), 2);
        services.destroy(a);
        assert_eq!(services.live_spawns(), 1);
        assert_eq!(services.spawned(), vec![Template::Dust, Template::SparkEmitter]);
    }

    #[test]
    fn scores_are_stamped_through_begin_tick() {
        let mut services = HeadlessServices::default();
        services.begin_tick(9);
        services.emit(ScoreKind::Jump, Vec2::ZERO);
        assert_eq!(services.scores().events()[0].tick, 9);
        services.clear();
        assert!(services.scores().is_empty());
        assert!(services.effects().is_empty());
    }
}
