//! Mutation Dash headless runner
//!
//! Plays one round with a simple autopilot at a fixed 60 Hz frame rate and
//! prints the outcome. Useful for smoke-testing tuning files.
//!
//! Usage: `mutation-dash [seed] [level] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use mutation_dash::consts::SIM_DT;
    use mutation_dash::session::Session;
    use mutation_dash::sim::{FrameClock, TickInput};
    use mutation_dash::{Progress, Settings, Tuning};

    env_logger::init();
    log::info!("Mutation Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1);
    let level: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1);
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    // Every level unlocked so any level can be smoke-tested
    let progress = Progress {
        max_available_level: mutation_dash::consts::MAX_LEVELS,
        ..Progress::default()
    };
    let max_frames = ((tuning.round_duration + 2.0) / SIM_DT).ceil() as u64;
    let mut session = Session::new(tuning, Settings::default(), progress, level, seed);
    session.start();

    // Synthetic 60 Hz host timestamps
    let mut clock = FrameClock::new();
    let mut frames = 0u64;
    while session.overlay().is_none() && frames < max_frames {
        let dt = clock.advance(frames as f64 * SIM_DT as f64);
        let input = TickInput {
            player_y: Some(autopilot::steer(&session)),
        };
        session.frame(dt, &input);
        autopilot::shop(&mut session);
        for event in session.drain_events() {
            log::debug!("{:?}", event);
        }
        frames += 1;
    }

    let snapshot = session.snapshot();
    println!(
        "level {} seed {}: {:?} after {:.1}s, score {}, mutations {}, spent {}",
        snapshot.level,
        seed,
        snapshot.state,
        snapshot.time,
        snapshot.score,
        snapshot.mutation_count,
        snapshot.total_spent
    );
    println!("{}", serde_json::to_string_pretty(&session.progress())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No web entry point; the library is embedded by the host app
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use mutation_dash::session::Session;

    /// How far ahead of the fish obstacles are considered
    const LOOKAHEAD: f32 = 260.0;

    /// Chase the nearest particle ahead, dodging obstacles in the way
    pub fn steer(session: &Session) -> f32 {
        let round = session.round();
        let player = &round.player;
        let screen_h = round.config.screen.y;

        let ahead = |x: f32| x + 20.0 > player.pos.x;
        let mut target = round
            .spawner
            .particles()
            .filter(|p| ahead(p.pos.x))
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map_or(player.pos.y, |p| p.pos.y);

        let clearance = player.size.y;
        for obstacle in round.spawner.obstacles() {
            let dx = obstacle.pos.x - player.pos.x;
            if !(0.0..LOOKAHEAD).contains(&(dx + obstacle.size.x / 2.0)) {
                continue;
            }
            let top = obstacle.pos.y - obstacle.size.y / 2.0 - clearance;
            let bottom = obstacle.pos.y + obstacle.size.y / 2.0 + clearance;
            if (top..bottom).contains(&target) {
                // Dodge to whichever side is closer and still on screen
                let prefer_top = target - top < bottom - target && top > clearance;
                target = if prefer_top || bottom > screen_h - clearance {
                    top
                } else {
                    bottom
                };
            }
        }
        target
    }

    /// Buy draws whenever affordable; keep only the target mutation
    pub fn shop(session: &mut Session) {
        let target = session.round().economy().target();
        while session.round().economy().can_afford() {
            let Some(mutation) = session.perform_mutation() else {
                break;
            };
            if mutation.kind == target {
                session.accept_mutation();
                break;
            }
            session.reject_mutation();
        }
    }
}
