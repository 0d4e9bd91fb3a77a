//! Property tests: random gesture and message sequences never push the
//! player out of bounds or past the net.

use bumpset_engine::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Idle,
    Flick(f32, f32),
    Tap,
    Serve(f32),
    Restart,
    Disabled,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => Just(Step::Idle),
        2 => (-2000i32..2000, -4000i32..400)
            .prop_map(|(x, y)| Step::Flick(x as f32, y as f32)),
        2 => Just(Step::Tap),
        1 => (-200i32..200).prop_map(|x| Step::Serve(x as f32)),
        1 => Just(Step::Restart),
        1 => Just(Step::Disabled),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn player_stays_in_bounds(steps in prop::collection::vec(step_strategy(), 1..120)) {
        let tuning = PlayerTuning::default();
        let mut world = ActorWorld::new();
        let player = world.spawn(PlayerActor::record(Vec2::new(-40.0, 0.0)));
        world.spawn(
            ActorRecord::new("ball")
                .with_position(Vec2::new(-30.0, -30.0))
                .with_class(Classification::VolleyBall),
        );
        world.spawn(
            ActorRecord::new("net")
                .with_position(Vec2::new(0.0, -20.0))
                .with_class(Classification::Wall)
                .with_attachment("SpikePoint", Vec2::new(5.0, -20.0)),
        );
        let mut scene = Scene::new(world, TickConfig::default());
        scene
            .add_behaviour(player, Box::new(PlayerActor::new(tuning.clone()).unwrap()))
            .unwrap();
        let mut services = HeadlessServices::default();

        for step in steps {
            let input = match step {
                Step::Idle => InputFrame::new(),
                Step::Flick(x, y) => InputFrame::new().with_flick(Vec2::new(x, y)),
                Step::Tap => InputFrame::new().with_tap(),
                Step::Serve(x) => {
                    let mut msg = Message::ServeDestination { destination: Vec2::new(x, -40.0) };
                    scene.send(player, &mut msg, &mut services).unwrap();
                    InputFrame::new()
                }
                Step::Restart => {
                    scene.send(player, &mut Message::MatchRestart, &mut services).unwrap();
                    InputFrame::new()
                }
                Step::Disabled => InputFrame::disabled().with_tap(),
            };
            scene.tick(&input, &mut services);

            let record = scene.world().get(player).unwrap();
            prop_assert!(tuning.bounds.contains(record.position), "{:?}", record.position);
            prop_assert!(record.position.x <= tuning.net_offset);

            let mut query = Message::get_current_state();
            scene.send(player, &mut query, &mut services).unwrap();
            let reported = match query {
                Message::GetCurrentState { state } => state,
                _ => None,
            };
            prop_assert!(reported.map_or(false, |s| PlayerState::ALL.contains(&s)));
        }
    }

    #[test]
    fn flick_velocity_is_delta_over_divisor(dx in -500i32..500, dy in -3000i32..-400) {
        let mut world = ActorWorld::new();
        let player = world.spawn(PlayerActor::record(Vec2::new(-40.0, 0.0)));
        let mut scene = Scene::new(world, TickConfig::default());
        scene
            .add_behaviour(player, Box::new(PlayerActor::new(PlayerTuning::default()).unwrap()))
            .unwrap();
        let mut services = HeadlessServices::default();
        scene.tick(&InputFrame::new(), &mut services);

        let delta = Vec2::new(dx as f32, dy as f32);
        scene.tick(&InputFrame::new().with_flick(delta), &mut services);

        let mut expected = delta / 384.0;
        expected.y += 0.2;
        let v = scene.world().get(player).unwrap().velocity;
        prop_assert!((v.x - expected.x).abs() < 1e-5);
        prop_assert!((v.y - expected.y).abs() < 1e-5);
        prop_assert!(v.length() > 0.0);
    }
}
