//! Headless rally: receive a serve, then jump and spike, and print the score
//! journal.
//!
//! Run with: `cargo run --example headless_rally -- [tuning.json]`
//!
//! Set `RUST_LOG=debug` to see every state transition.

use anyhow::Context;
use bumpset_engine::prelude::*;
use tracing::info;

/// Ball with gravity and a dead floor.
struct BallActor {
    gravity: f32,
    floor: f32,
}

impl Behaviour for BallActor {
    fn name(&self) -> &'static str {
        "ball"
    }

    fn update(&mut self, me: ActorId, ctx: &mut TickContext<'_>) {
        if let Some(record) = ctx.world.get_mut(me) {
            record.velocity.y += self.gravity;
            let velocity = record.velocity;
            record.position += velocity;
            if record.position.y > self.floor {
                record.position.y = self.floor;
                record.velocity = Vec2::ZERO;
            }
        }
    }
}

/// Partner that only counts its own touches.
struct PartnerActor {
    hits: u32,
}

impl Behaviour for PartnerActor {
    fn name(&self) -> &'static str {
        "partner"
    }

    fn update(&mut self, _me: ActorId, _ctx: &mut TickContext<'_>) {}

    fn on_message(
        &mut self,
        _me: ActorId,
        message: &mut Message,
        _ctx: &mut MessageContext<'_>,
    ) -> Delivery {
        match message {
            Message::GetHitCount { count } => {
                *count = Some(self.hits);
                Delivery::Handled
            }
            Message::MatchRestart | Message::GameRestart => {
                self.hits = 0;
                Delivery::Handled
            }
            _ => Delivery::Ignored,
        }
    }
}

fn player_state(
    scene: &mut Scene,
    player: ActorId,
    services: &mut HeadlessServices,
) -> anyhow::Result<Option<PlayerState>> {
    let mut query = Message::get_current_state();
    scene.send(player, &mut query, services)?;
    Ok(match query {
        Message::GetCurrentState { state } => state,
        _ => None,
    })
}

fn main() -> anyhow::Result<()> {
    init_logging("info");

    let tuning = match std::env::args().nth(1) {
        Some(path) => PlayerTuning::from_file(&path)
            .with_context(|| format!("loading tuning from {path}"))?,
        None => PlayerTuning::default(),
    };

    let mut world = ActorWorld::new();
    let player = world.spawn(PlayerActor::record(Vec2::new(-60.0, tuning.floor())));
    let partner = world.spawn(
        ActorRecord::new("partner")
            .with_position(Vec2::new(-25.0, tuning.floor()))
            .with_half_extents(Vec2::new(6.0, 10.0))
            .with_class(Classification::Ally),
    );
    world.spawn(
        ActorRecord::new("net")
            .with_position(Vec2::new(0.0, -20.0))
            .with_half_extents(Vec2::new(1.0, 20.0))
            .with_class(Classification::Wall)
            .with_attachment("SpikePoint", Vec2::new(10.0, -25.0)),
    );
    let ball = world.spawn(
        ActorRecord::new("ball")
            .with_position(Vec2::new(40.0, -60.0))
            .with_velocity(Vec2::new(-2.5, -1.0))
            .with_half_extents(Vec2::new(2.0, 2.0))
            .with_class(Classification::VolleyBall),
    );

    let mut scene = Scene::new(world, TickConfig::default());
    scene.add_behaviour(player, Box::new(PlayerActor::new(tuning.clone())?))?;
    scene.add_behaviour(partner, Box::new(PartnerActor { hits: 0 }))?;
    scene.add_behaviour(
        ball,
        Box::new(BallActor {
            gravity: tuning.gravity,
            floor: tuning.floor(),
        }),
    )?;

    let mut services = HeadlessServices::default();
    let idle = InputFrame::new();
    scene.tick(&idle, &mut services);

    // -- Serve receive ------------------------------------------------------
    let mut serve = Message::ServeDestination {
        destination: Vec2::new(-50.0, -10.0),
    };
    scene.send(player, &mut serve, &mut services)?;
    for _ in 0..90 {
        scene.tick(&idle, &mut services);
        if player_state(&mut scene, player, &mut services)? != Some(PlayerState::Receiving) {
            break;
        }
    }
    info!(
        tick = scene.tick_count(),
        state = ?player_state(&mut scene, player, &mut services)?,
        "serve phase over"
    );

    // -- Jump and spike -----------------------------------------------------
    scene.tick(&InputFrame::new().with_flick(Vec2::new(0.0, -2112.0)), &mut services);
    for _ in 0..34 {
        scene.tick(&idle, &mut services);
    }
    let (position, velocity) = {
        let record = scene.world().try_get(player)?;
        (record.position, record.velocity)
    };
    if let Some(record) = scene.world_mut().get_mut(ball) {
        record.position = position + velocity + Vec2::new(0.0, tuning.gravity);
        record.velocity = Vec2::new(0.0, 0.5);
    }
    scene.tick(&InputFrame::new().with_tap(), &mut services);
    for _ in 0..60 {
        scene.tick(&idle, &mut services);
    }

    // -- Report -------------------------------------------------------------
    let tally = services.scores().tally();
    println!("ticks: {} ({:.1}s)", scene.tick_count(), scene.elapsed_time());
    for event in services.scores().events() {
        println!(
            "  tick {:>4}  {:<12} at ({:.1}, {:.1})",
            event.tick, event.kind, event.position.x, event.position.y
        );
    }
    println!("total {} events, {} bonuses", tally.total, tally.bonuses);

    let mut debug = Message::get_debug_info();
    scene.send(player, &mut debug, &mut services)?;
    if let Message::GetDebugInfo { lines } = debug {
        for line in lines {
            println!("  {line}");
        }
    }
    println!("{}", scene.capture_snapshot().to_json()?);
    Ok(())
}
