//! Spike attempts: finding the ball, scoring the hit, sending it over.

use bumpset_score::kind::ScoreKind;
use bumpset_world::actor::{ActorRecord, Classification};
use bumpset_world::actor_id::ActorId;
use bumpset_world::geometry::{Rect, Vec2};
use tracing::{debug, warn};

use super::{PlayerActor, PlayerState};
use crate::config::PlayerTuning;
use crate::message::Message;
use crate::services::{AnimationClip, RestartPolicy, SoundCue, Template};
use crate::tick::TickContext;

/// Player and ball at the moment of contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeSample {
    pub actor_velocity: Vec2,
    pub actor_rect: Rect,
    pub ball_velocity: Vec2,
    pub ball_rect: Rect,
    pub frames_in_air: u32,
}

impl StrikeSample {
    pub fn new(actor: &ActorRecord, ball: &ActorRecord, frames_in_air: u32) -> Self {
        Self {
            actor_velocity: actor.velocity,
            actor_rect: actor.collision_rect(),
            ball_velocity: ball.velocity,
            ball_rect: ball.collision_rect(),
            frames_in_air,
        }
    }

    pub fn actor_position(&self) -> Vec2 {
        self.actor_rect.center()
    }

    pub fn ball_position(&self) -> Vec2 {
        self.ball_rect.center()
    }
}

/// Style bonuses earned by a spike, in display order, each with the point
/// its popup belongs at. The base [`ScoreKind::Spike`] is not included.
pub fn style_bonuses(tuning: &PlayerTuning, strike: &StrikeSample) -> Vec<(ScoreKind, Vec2)> {
    let actor = &strike.actor_rect;
    let mut bonuses = Vec::new();

    if strike.ball_velocity.y.abs() < tuning.high_point_max_ball_speed_y {
        bonuses.push((ScoreKind::HighPoint, strike.actor_position()));
    }
    if strike.ball_rect.bottom() - actor.top() < tuning.finger_tips_margin {
        bonuses.push((ScoreKind::FingerTips, actor.center()));
    }
    if strike.ball_position().y >= tuning.low_point_min_ball_y {
        bonuses.push((ScoreKind::LowPoint, actor.center()));
    }
    if strike.frames_in_air >= tuning.hang_time_min_frames {
        bonuses.push((ScoreKind::HangTime, strike.actor_position()));
    }
    if strike.actor_velocity.x < 0.0 {
        bonuses.push((ScoreKind::FadeAway, actor.center_left()));
    }
    if strike.ball_velocity.y < tuning.upward_max_ball_velocity_y {
        bonuses.push((ScoreKind::Upward, actor.bottom_right()));
    }
    if strike.actor_velocity.length() > tuning.speedy_min_speed {
        bonuses.push((ScoreKind::Speedy, actor.bottom_left()));
    }
    bonuses
}

impl PlayerActor {
    pub(super) fn attempt_spike(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
        self.play_clip(me, AnimationClip::Spike, RestartPolicy::Restart, ctx.services);

        let found = match ctx.world.query_in_range(
            me,
            Classification::VolleyBall.into(),
            &mut self.strike_results,
        ) {
            Ok(found) => found,
            Err(err) => {
                warn!(%err, "spike query failed");
                0
            }
        };
        if found > 1 {
            warn!(found, "more than one ball in strike range; using the first");
        }

        let connected = match self.strike_results.first().copied() {
            Some(ball) => self.strike(me, ball, ctx),
            None => false,
        };
        if !connected && self.state_timer.is_expired() {
            debug!("spike attempt found no ball");
            self.set_state(PlayerState::Falling);
        }
    }

    /// Hit `ball` toward the net. Returns `false` if the hit could not be
    /// resolved this tick.
    fn strike(&mut self, me: ActorId, ball: ActorId, ctx: &mut TickContext<'_>) -> bool {
        let Some(net) = ctx.world.first_of_class(Classification::Wall) else {
            warn!("no net in the scene; spike skipped");
            return false;
        };
        let Some(spike_point) = ctx.world.attachment_point(net, &self.tuning.spike_point) else {
            warn!(point = %self.tuning.spike_point, "net has no spike point; spike skipped");
            return false;
        };
        let (Some(actor), Some(ball_record)) = (ctx.world.get(me), ctx.world.get(ball)) else {
            return false;
        };
        let strike = StrikeSample::new(actor, ball_record, self.frames_in_air);
        let ball_position = strike.ball_position();

        ctx.services.play_sound(SoundCue::SpikeHit);
        self.check_partner_hits(ctx);
        self.restore_zoom(ctx.services);

        let direction = (spike_point - ball_position).normalize_or_zero();
        for (kind, position) in style_bonuses(&self.tuning, &strike) {
            ctx.services.emit(kind, position);
        }
        if let Some(ball_record) = ctx.world.get_mut(ball) {
            ball_record.velocity = direction * self.tuning.spike_speed;
        }

        self.set_state(PlayerState::Falling);
        ctx.services.spawn_template(Template::SparkEmitter, ball_position);
        if let Some(actor) = ctx.world.get_mut(me) {
            actor.velocity = self.tuning.knockback;
        }
        self.state_timer.arm(0);
        ctx.services.emit(ScoreKind::Spike, ball_position);
        debug!(ball = %ball, frames_in_air = self.frames_in_air, "spike connected");
        true
    }

    /// Flag a second touch in a row on our side before the partner's.
    fn check_partner_hits(&mut self, ctx: &mut TickContext<'_>) {
        let Some(partner) = ctx.world.first_of_class(Classification::Ally) else {
            return;
        };
        let mut request = Message::get_hit_count();
        match ctx.send(partner, &mut request) {
            Ok(_) => {
                if let Message::GetHitCount { count: Some(0) } = request {
                    self.multiple_hits_before_partner = true;
                }
            }
            Err(err) => warn!(%err, "partner hit count unavailable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
