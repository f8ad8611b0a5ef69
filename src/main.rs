//! Bottle Climb native entry point
//!
//! Runs a fixed-seed session headless for two minutes of game time with a
//! simple autopilot and logs what happens. `RUST_LOG=debug` shows every
//! spawn, cull, landing and aiming guide. A `bottle-climb-tuning.json` next
//! in the working directory overrides the default tuning.

use std::path::Path;

use glam::Vec2;

use bottle_climb::persistence::JsonFileStore;
use bottle_climb::physics::{ArcadeWorld, PhysicsWorld};
use bottle_climb::session::{Release, Session};
use bottle_climb::sim::{GameEvent, GameState, ScoringPhase};
use bottle_climb::{GameResult, Tuning};

/// Where the autopilot's drags start, in screen space
const DRAG_ORIGIN: Vec2 = Vec2::new(350.0, 700.0);
/// Extra height the autopilot aims above the next platform top
const APEX_MARGIN: f32 = 60.0;
/// Frames to wait at rest before jumping again
const AIM_DELAY: u32 = 30;
const SEED: u64 = 1;
const FRAMES: u64 = 60 * 120;
const TUNING_FILE: &str = "bottle-climb-tuning.json";
const SCORES_FILE: &str = "bottle-climb-scores.json";

/// Drag that should carry the player onto the next platform up
fn aim(state: &GameState, gravity: f32) -> Option<(Vec2, Vec2)> {
    let player = &state.player;
    let target = state
        .platforms()
        .iter()
        .filter(|p| p.collidable && p.top() > player.pos.y)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

    let tuning = &state.tuning;
    let rise = target.top() - player.pos.y + player.size.y / 2.0;
    let vy = (2.0 * gravity * (rise + APEX_MARGIN)).sqrt().min(tuning.max_launch_speed);
    let descent = (vy * vy - 2.0 * gravity * rise).max(0.0).sqrt();
    let flight = (vy + descent) / gravity;
    let vx = (target.pos.x - player.pos.x) / flight;

    let drag = Vec2::new(-vx / tuning.launch_scale_x, -vy / tuning.launch_scale_y);
    Some((DRAG_ORIGIN, DRAG_ORIGIN + drag))
}

fn main() -> GameResult<()> {
    env_logger::init();
    log::info!("Bottle Climb (native) starting...");

    let tuning = if Path::new(TUNING_FILE).exists() {
        Tuning::load_or_default(TUNING_FILE)
    } else {
        Tuning::default()
    };
    let store = JsonFileStore::open(SCORES_FILE)?;
    let world = ArcadeWorld::new(&tuning);
    let gravity = world.gravity().y.abs();
    let mut session = Session::new(tuning, SEED, world, store);

    let mut resting = 0;
    let mut runs = 1;
    for _ in 0..FRAMES {
        for event in session.frame() {
            match event {
                GameEvent::Landed { style, points, .. } => {
                    log::info!("{:?} landing: +{} (score {})", style, points, session.state().score.score)
                }
                GameEvent::GameOver { score } => log::info!("Run {} over with {} points", runs, score),
                _ => {}
            }
        }

        let state = session.state();
        if state.is_game_over() {
            let button = session.restart_button();
            let tap = (button.min + button.max) / 2.0;
            if session.release(tap, tap) == Release::Restarted {
                runs += 1;
            }
            resting = 0;
            continue;
        }

        let ready = state.player.is_settled(state.tuning.settle_epsilon)
            && state.score.phase() == ScoringPhase::Idle;
        resting = if ready { resting + 1 } else { 0 };
        if resting >= AIM_DELAY {
            if let Some((start, end)) = aim(state, gravity) {
                let guide = session.aiming_guide(start, end);
                if let (Some(first), Some(last)) = (guide.first(), guide.last()) {
                    log::debug!("Aiming from {} towards {}", first.pos, last.pos);
                }
                session.release(start, end);
            }
            resting = 0;
        }
    }

    let state = session.state();
    println!(
        "Played {} run(s): current score {}, best {}",
        runs, state.score.score, state.score.best_score
    );
    Ok(())
}
