//! Run lifecycle
//!
//! A session owns the physics world, the score store and the current run.
//! Frontends feed it drag releases and call [`Session::frame`] once per
//! rendered frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::persistence::{self, BestScoreStore};
use crate::physics::PhysicsWorld;
use crate::sim::trajectory::{self, TrajectoryPoint};
use crate::sim::{GameEvent, GameState, Gesture, TickInput, tick};
use crate::tuning::Tuning;

/// Axis-aligned rectangle in screen space (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            max: center + size / 2.0,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Restart label, left of center and a little below mid-screen
pub fn default_restart_button(tuning: &Tuning) -> Rect {
    Rect::from_center_size(
        Vec2::new(tuning.mid_x() - 100.0, tuning.viewport_height / 2.0 - 100.0),
        Vec2::new(120.0, 40.0),
    )
}

/// What a released drag turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Restarted,
    /// Queued for the next frame
    Gesture,
    /// Run is over and the tap missed the restart button
    Ignored,
}

pub struct Session<W: PhysicsWorld, S: BestScoreStore> {
    tuning: Tuning,
    world: W,
    store: S,
    state: GameState,
    base_seed: u64,
    run: u64,
    restart_button: Rect,
    pending: Option<Gesture>,
    saved_game_over: bool,
}

impl<W: PhysicsWorld, S: BestScoreStore> Session<W, S> {
    pub fn new(tuning: Tuning, seed: u64, mut world: W, store: S) -> Self {
        let best = persistence::load_best(&store);
        let state = GameState::new(seed, tuning.clone(), best, &mut world);
        Self {
            restart_button: default_restart_button(&tuning),
            tuning,
            world,
            store,
            state,
            base_seed: seed,
            run: 0,
            pending: None,
            saved_game_over: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn restart_button(&self) -> Rect {
        self.restart_button
    }

    /// Convert a world point to screen space for the current camera
    pub fn to_screen(&self, world_point: Vec2) -> Vec2 {
        world_point - Vec2::new(0.0, self.state.viewport.bottom())
    }

    /// Aiming guide for a drag in progress, in screen space
    ///
    /// Empty unless the player is idle, since only then would the drag launch.
    pub fn aiming_guide(&self, start: Vec2, end: Vec2) -> Vec<TrajectoryPoint> {
        let player = &self.state.player;
        if self.state.is_game_over() || !player.is_idle(self.tuning.idle_speed_threshold) {
            return Vec::new();
        }
        let mut guide = trajectory::predict(
            player.pos,
            start,
            end,
            Vec2::from(self.tuning.gravity),
            self.tuning.frame_min_x,
            self.tuning.frame_max_x,
        );
        for point in &mut guide {
            point.pos = self.to_screen(point.pos);
        }
        guide
    }

    /// Handle a drag released at `end` (screen space)
    pub fn release(&mut self, start: Vec2, end: Vec2) -> Release {
        if self.restart_button.contains(end) {
            self.restart();
            return Release::Restarted;
        }
        if self.state.is_game_over() {
            return Release::Ignored;
        }
        self.pending = Some(Gesture { start, end });
        Release::Gesture
    }

    /// Advance one frame and return what happened
    pub fn frame(&mut self) -> Vec<GameEvent> {
        let input = TickInput {
            gesture: self.pending.take(),
        };
        tick(&mut self.state, &input, &mut self.world, SIM_DT);

        if self.state.is_game_over() && !self.saved_game_over {
            self.persist_best();
            self.saved_game_over = true;
        }
        self.state.drain_events()
    }

    /// Throw the run away and start a fresh one with a new seed
    pub fn restart(&mut self) {
        self.persist_best();
        self.world.clear();
        self.run += 1;
        let seed = self.base_seed.wrapping_add(self.run);
        let best = self.state.score.best_score;
        self.state = GameState::new(seed, self.tuning.clone(), best, &mut self.world);
        self.pending = None;
        self.saved_game_over = false;
        log::info!("Restarted (run {})", self.run);
    }

    fn persist_best(&mut self) {
        if let Err(err) = persistence::save_best(&mut self.store, self.state.score.best_score) {
            log::warn!("Failed to save best score: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BEST_SCORE_KEY;
    use crate::persistence::MemoryStore;
    use crate::physics::ArcadeWorld;
    use crate::sim::GamePhase;

    fn session(best: Option<u64>) -> Session<ArcadeWorld, MemoryStore> {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        if let Some(best) = best {
            store.set(BEST_SCORE_KEY, best).unwrap();
        }
        Session::new(tuning.clone(), 42, ArcadeWorld::new(&tuning), store)
    }

    fn settle(session: &mut Session<ArcadeWorld, MemoryStore>) {
        for _ in 0..60 {
            session.frame();
        }
    }

    #[test]
    fn test_restart_button_hit_test() {
        let rect = default_restart_button(&Tuning::default());
        assert!(rect.contains(Vec2::new(100.0, 300.0)));
        assert!(rect.contains(rect.min));
        assert!(!rect.contains(Vec2::new(200.0, 300.0)));
        assert!(!rect.contains(Vec2::new(100.0, 400.0)));
    }

    #[test]
    fn test_best_score_loaded_from_store() {
        let s = session(Some(11));
        assert_eq!(s.state().score.best_score, 11);
        assert_eq!(s.state().score.score, 0);
    }

    #[test]
    fn test_game_over_persists_best() {
        let mut s = session(None);
        settle(&mut s);
        assert_eq!(s.state().score.score, 2);
        assert_eq!(s.store().get(BEST_SCORE_KEY).unwrap(), None);

        s.state.player.pos.y = -5000.0;
        let events = s.frame();
        assert!(events.contains(&GameEvent::GameOver { score: 2 }));
        assert_eq!(s.state().phase, GamePhase::GameOver);
        assert_eq!(s.store().get(BEST_SCORE_KEY).unwrap(), Some(2));

        // Gestures are dropped once the run is over
        assert_eq!(s.release(Vec2::ZERO, Vec2::new(300.0, 700.0)), Release::Ignored);
    }

    #[test]
    fn test_restart_starts_fresh_run() {
        let mut s = session(Some(1));
        settle(&mut s);
        let first_seed = s.state().seed;

        let tap = default_restart_button(&Tuning::default()).min + Vec2::ONE;
        assert_eq!(s.release(tap, tap), Release::Restarted);

        assert_eq!(s.store().get(BEST_SCORE_KEY).unwrap(), Some(2));
        let state = s.state();
        assert_ne!(state.seed, first_seed);
        assert_eq!(state.score.score, 0);
        assert_eq!(state.score.best_score, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.generator.early_count(), 10);
        assert_eq!(state.platforms()[0].pos.y, 50.0);
        assert!(state.platforms().iter().all(|p| !p.has_been_landed_on));
        assert_eq!(s.world().body_count(), state.platforms().len() + state.field.walls.len());
    }

    #[test]
    fn test_release_queues_gesture_for_next_frame() {
        let mut s = session(None);
        settle(&mut s);
        assert_eq!(
            s.release(Vec2::new(300.0, 700.0), Vec2::new(300.0, 600.0)),
            Release::Gesture
        );
        let events = s.frame();
        assert!(matches!(events[0], GameEvent::Launched { .. }));
        assert!(s.state().player.vel.y > 0.0);
    }

    #[test]
    fn test_aiming_guide_in_screen_space() {
        let mut s = session(None);
        settle(&mut s);
        let player = s.state().player.pos;
        let start = Vec2::new(300.0, 700.0);
        let end = Vec2::new(300.0, 600.0);

        let guide = s.aiming_guide(start, end);
        assert_eq!(guide.len(), trajectory::TRAJECTORY_POINTS);
        assert_eq!(guide[0].pos, s.to_screen(player));
        // Pulled straight down, so the arc starts upward
        assert!(guide[1].pos.y > guide[0].pos.y);

        // Mid-air the same drag would spin, so there is nothing to aim
        s.release(start, end);
        s.frame();
        assert!(s.aiming_guide(start, end).is_empty());
    }

    #[test]
    fn test_to_screen_follows_camera() {
        let mut s = session(None);
        let bottom = s.state().viewport.bottom();
        assert_eq!(s.to_screen(Vec2::new(10.0, bottom)), Vec2::new(10.0, 0.0));

        s.state.viewport.camera_y += 250.0;
        assert_eq!(s.to_screen(Vec2::new(10.0, bottom + 250.0)), Vec2::new(10.0, 0.0));
    }
}
