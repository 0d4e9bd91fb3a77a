//! Inbound messages for the player.

use bumpset_world::actor_id::ActorId;
use bumpset_world::geometry::Vec2;
use tracing::debug;

use super::{PlayerActor, PlayerState, StateTimer};
use crate::message::{Delivery, Message};
use crate::tick::MessageContext;

impl PlayerActor {
    pub(super) fn handle_message(
        &mut self,
        me: ActorId,
        message: &mut Message,
        ctx: &mut MessageContext<'_>,
    ) -> Delivery {
        match message {
            Message::ServeDestination { destination } => {
                let target = Vec2::new(
                    destination.x - self.tuning.receive_offset_x,
                    self.tuning.floor(),
                );
                self.walk_destination = self.tuning.bounds.clamp_point(target);
                debug!(x = self.walk_destination.x, "receiving serve");
                self.set_state(PlayerState::Receiving);
            }
            Message::GetCurrentState { state } => *state = Some(self.state),
            Message::Highlight { enable } => {
                let Some(record) = ctx.world.get_mut(me) else {
                    return Delivery::Ignored;
                };
                let starting = *self
                    .starting_render_priority
                    .get_or_insert(record.render_priority);
                record.render_priority = if *enable {
                    self.tuning.highlight_priority
                } else {
                    starting
                };
            }
            Message::MatchRestart => self.restart(me, false, ctx),
            Message::GameRestart => self.restart(me, true, ctx),
            Message::PlayOver => self.restore_zoom(ctx.services),
            Message::TrialLimitReached => self.trial_limit_reached = true,
            Message::TrialModeChanged => self.trial_limit_reached = false,
            Message::GetMultipleHitsBeforePartner { value } => {
                *value = Some(self.multiple_hits_before_partner);
            }
            Message::GetDebugInfo { lines } => {
                let Some(record) = ctx.world.get(me) else {
                    return Delivery::Ignored;
                };
                lines.extend(self.snapshot(record).debug_lines());
            }
            Message::GetHitCount { .. } => return Delivery::Ignored,
        }
        Delivery::Handled
    }

    fn restart(&mut self, me: ActorId, new_game: bool, ctx: &mut MessageContext<'_>) {
        self.multiple_hits_before_partner = false;
        if new_game {
            self.trial_limit_reached = false;
        }
        if let Some(record) = ctx.world.get_mut(me) {
            if record.position.x > self.tuning.net_x {
                record.position = Vec2::new(self.tuning.bounds.left(), self.tuning.floor());
                record.velocity = Vec2::ZERO;
            }
        }
        self.restore_zoom(ctx.services);
        self.state_timer = StateTimer::default();
        self.set_state(PlayerState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputFrame;
    use crate::player::tests::scene_with_player;
    use crate::services::HeadlessServices;

    #[test]
    fn serve_destination_is_offset_clamped_and_idempotent() {
        let (mut scene, player) = scene_with_player(Vec2::new(-40.0, 0.0));
        let mut services = HeadlessServices::default();
        for _ in 0..2 {
            let mut msg = Message::ServeDestination {
                destination: Vec2::new(-200.0, -30.0),
            };
            assert_eq!(
                scene.send(player, &mut msg, &mut services).unwrap(),
                Delivery::Handled
            );
            let mut info = Message::get_debug_info();
            scene.send(player, &mut info, &mut services).unwrap();
            let Message::GetDebugInfo { lines } = info else {
                unreachable!()
            };
            assert!(lines.contains(&"Walk destination: (-90.00, 0.00)".to_owned()));
            assert!(lines.contains(&"State: Receiving".to_owned()));
        }
    }

    #[test]
    fn highlight_toggles_render_priority() {
        let (mut scene, player) = scene_with_player(Vec2::new(-40.0, 0.0));
        scene.world_mut().get_mut(player).unwrap().render_priority = 7;
        let mut services = HeadlessServices::default();

        let mut on = Message::Highlight { enable: true };
        scene.send(player, &mut on, &mut services).unwrap();
        assert_eq!(scene.world().get(player).unwrap().render_priority, 100);

        let mut off = Message::Highlight { enable: false };
        scene.send(player, &mut off, &mut services).unwrap();
        assert_eq!(scene.world().get(player).unwrap().render_priority, 7);
    }

    #[test]
    fn trial_limit_blocks_jumps_until_mode_changes() {
        let (mut scene, player) = scene_with_player(Vec2::new(-40.0, 0.0));
        let mut services = HeadlessServices::default();
        scene.tick(&InputFrame::new(), &mut services);

        scene
            .send(player, &mut Message::TrialLimitReached, &mut services)
            .unwrap();
        let flick = InputFrame::new().with_flick(Vec2::new(0.0, -2000.0));
        scene.tick(&flick, &mut services);
        assert_eq!(scene.world().get(player).unwrap().position.y, 0.0);

        scene
            .send(player, &mut Message::TrialModeChanged, &mut services)
            .unwrap();
        scene.tick(&flick, &mut services);
        assert!(scene.world().get(player).unwrap().position.y < 0.0);
    }

    #[test]
    fn game_restart_clears_trial_limit_but_match_restart_does_not() {
        let (mut scene, player) = scene_with_player(Vec2::new(-40.0, 0.0));
        let mut services = HeadlessServices::default();
        scene.tick(&InputFrame::new(), &mut services);
        let flick = InputFrame::new().with_flick(Vec2::new(0.0, -2000.0));

        scene
            .send(player, &mut Message::TrialLimitReached, &mut services)
            .unwrap();
        scene
            .send(player, &mut Message::MatchRestart, &mut services)
            .unwrap();
        scene.tick(&flick, &mut services);
        assert_eq!(scene.world().get(player).unwrap().position.y, 0.0);

        scene
            .send(player, &mut Message::GameRestart, &mut services)
            .unwrap();
        scene.tick(&flick, &mut services);
        assert!(scene.world().get(player).unwrap().position.y < 0.0);
    }

    #[test]
    fn play_over_only_restores_zoom() {
        let (mut scene, player) = scene_with_player(Vec2::new(-40.0, 0.0));
        let mut services = HeadlessServices::new(1.5);
        let delivery = scene
            .send(player, &mut Message::PlayOver, &mut services)
            .unwrap();
        assert!(delivery.is_handled());
        assert_eq!(services.zoom_requests(), vec![(1.5, 5)]);
        let mut state = Message::get_current_state();
        scene.send(player, &mut state, &mut services).unwrap();
        assert_eq!(
            state,
            Message::GetCurrentState {
                state: Some(PlayerState::WaitingForMenu)
            }
        );
    }

    #[test]
    fn hit_count_request_is_not_for_the_player() {
        let (mut scene, player) = scene_with_player(Vec2::new(-40.0, 0.0));
        let mut services = HeadlessServices::default();
        let mut msg = Message::get_hit_count();
        assert_eq!(
            scene.send(player, &mut msg, &mut services).unwrap(),
            Delivery::Ignored
        );
        assert_eq!(msg, Message::GetHitCount { count: None });
    }
}
