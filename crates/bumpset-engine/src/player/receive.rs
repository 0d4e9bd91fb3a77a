//! Receiving a serve: walk to the landing spot, bump the ball to the partner.

use bumpset_world::actor::Classification;
use bumpset_world::actor_id::ActorId;
use bumpset_world::geometry::Vec2;
use rand::Rng;
use tracing::{debug, warn};

use super::{PlayerActor, PlayerState};
use crate::physics;
use crate::services::{AnimationClip, RestartPolicy, SoundCue};
use crate::tick::TickContext;

impl PlayerActor {
    pub(super) fn resolve_receive(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
        let (ball, crowded) = {
            let mut balls = ctx.world.of_class(Classification::VolleyBall);
            (balls.next(), balls.next().is_some())
        };
        if crowded {
            warn!("more than one ball in play; receiving the first");
        }

        if let Some(ball) = ball {
            self.return_serve(ball, ctx);
        }

        let Some(position) = ctx.world.get(me).map(|r| r.position) else {
            return;
        };
        let ball_position = ball.and_then(|b| ctx.world.get(b)).map(|r| r.position);
        if let Some(ball_position) = ball_position {
            if ball_position.distance(position) <= self.tuning.receive_radius {
                if let Some(record) = ctx.world.get_mut(me) {
                    record.velocity.x = 0.0;
                }
                self.play_clip(
                    me,
                    AnimationClip::Bump,
                    RestartPolicy::DoNotRestartIfCompleted,
                    ctx.services,
                );
                return;
            }
        }

        self.walk_toward_destination(me, ctx);
    }

    /// Send a low ball on our side back over to the partner.
    fn return_serve(&mut self, ball: ActorId, ctx: &mut TickContext<'_>) {
        let Some(ball_position) = ctx.world.get(ball).map(|r| r.position) else {
            return;
        };
        if ball_position.y < self.tuning.receive_min_ball_y || ball_position.x > self.tuning.net_x {
            return;
        }
        let Some(partner_x) = ctx
            .world
            .first_of_class(Classification::Ally)
            .and_then(|p| ctx.world.get(p))
            .map(|r| r.position.x)
        else {
            return;
        };

        let speed = self
            .rng
            .gen_range(self.tuning.arc_speed_min..self.tuning.arc_speed_max);
        let destination = Vec2::new(partner_x - self.tuning.receive_offset_x, ball_position.y);
        let velocity =
            physics::arc_velocity(ball_position, destination, speed, self.tuning.gravity);
        if let Some(record) = ctx.world.get_mut(ball) {
            record.velocity = velocity;
        }
        ctx.services.play_sound(SoundCue::Bump);
        debug!(speed, dest_x = destination.x, "returned serve");
        self.set_state(PlayerState::Idle);
    }

    fn walk_toward_destination(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
        let floor = self.tuning.floor();
        let walk_speed = self.tuning.walk_speed;
        let destination = self.walk_destination;
        let Some(record) = ctx.world.get_mut(me) else {
            return;
        };

        if record.position.distance_squared(destination) < walk_speed * walk_speed {
            record.position = destination;
            record.velocity.x = 0.0;
            self.play_clip(me, AnimationClip::Idle, RestartPolicy::Restart, ctx.services);
        } else if record.position.y >= floor {
            record.velocity.x = if destination.x < record.position.x {
                -walk_speed
            } else {
                walk_speed
            };
            self.play_clip(me, AnimationClip::Walk, RestartPolicy::Restart, ctx.services);
        }
    }
}
