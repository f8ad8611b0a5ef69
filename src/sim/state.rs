//! Game state and per-frame reactions
//!
//! Everything a run needs lives here: the player, the live field, the score
//! machine, the camera, the generator and the collapse timers. The physics
//! world is passed in by the caller and never stored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::{self, Viewport};
use super::entity::{Appearance, EntityId, Platform, PlatformKind, Player};
use super::field::Field;
use super::generator::Generator;
use super::landing::{self, LandingRules, PlatformFrame};
use super::scoring::{Evaluation, LandingStyle, ScoreState};
use super::timers::{CollapseStep, TimerQueue};
use crate::physics::{BodyHandle, Contact, PhysicsWorld};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Climbing
    Playing,
    /// Fell out of view; waiting for a restart
    GameOver,
}

/// A drag released on the screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub start: Vec2,
    pub end: Vec2,
}

/// Things that happened during a tick, for UI, audio and logs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { velocity: Vec2 },
    Spun { angular_vel: f32 },
    /// Player came down on top of a platform
    TouchedDown { platform: EntityId },
    Landed {
        platform: EntityId,
        style: LandingStyle,
        points: u64,
    },
    /// Settled on a platform that already paid out
    RepeatLanding { platform: EntityId },
    CollapseStarted { platform: EntityId },
    PlatformVanished { platform: EntityId },
    PlatformRespawned { platform: EntityId },
    GameOver { score: u64 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub field: Field,
    pub score: ScoreState,
    pub viewport: Viewport,
    pub generator: Generator,
    pub timers: TimerQueue,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run: fresh generator, initial platforms, player above the first one
    pub fn new<W: PhysicsWorld + ?Sized>(seed: u64, tuning: Tuning, best_score: u64, world: &mut W) -> Self {
        let player = Player::new(Vec2::new(tuning.mid_x(), tuning.player_start_y));
        let mut state = Self {
            seed,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player,
            field: Field::new(),
            score: ScoreState::new(best_score),
            viewport: Viewport::new(&tuning),
            generator: Generator::new(seed, &tuning),
            timers: TimerQueue::new(),
            events: Vec::new(),
            tuning,
        };

        let report = state
            .generator
            .top_up(&mut state.field, &state.viewport, &state.tuning, world);
        log::info!(
            "New game (seed {}) with {} platforms, best score {}",
            seed,
            report.spawned_platforms,
            best_score
        );

        state
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Read-only view of the live platforms, lowest first
    pub fn platforms(&self) -> &[Platform] {
        &self.field.platforms
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn platform_frame(&self, handle: BodyHandle) -> Option<PlatformFrame> {
        self.field.platform_by_body(handle).map(|p| PlatformFrame {
            center: p.pos,
            height: p.height,
        })
    }

    /// Launch when idle, otherwise spin
    pub fn apply_gesture(&mut self, gesture: Gesture) {
        if self.player.is_idle(self.tuning.idle_speed_threshold) {
            self.player.launch(gesture.start, gesture.end, &self.tuning);
            self.score.on_launch();
            self.events.push(GameEvent::Launched {
                velocity: self.player.vel,
            });
        } else {
            self.player.spin(gesture.start, gesture.end, self.tuning.spin_boost);
            self.events.push(GameEvent::Spun {
                angular_vel: self.player.angular_vel,
            });
        }
    }

    /// Advance moving platforms and sync their bodies
    pub fn patrol_platforms<W: PhysicsWorld + ?Sized>(&mut self, dt: f32, world: &mut W) {
        for platform in &mut self.field.platforms {
            if platform.patrol(dt) {
                if let Some(handle) = platform.body {
                    world.set_position(handle, platform.pos);
                }
            }
        }
    }

    /// React to a new contact. Returns the platform landed on, if any.
    pub fn handle_contact_begin(&mut self, contact: &Contact) -> Option<EntityId> {
        let rules = LandingRules::from_tuning(&self.tuning);
        let landing = landing::classify(contact, |h| self.platform_frame(h), &rules)?;
        let platform = self.field.platform_by_body_mut(landing.platform)?;

        self.player.dampen(self.tuning.landing_damping);
        self.score.arm(platform.id);
        self.events.push(GameEvent::TouchedDown {
            platform: platform.id,
        });

        match platform.kind {
            PlatformKind::Normal => {}
            PlatformKind::Moving { .. } => platform.set_stopped(true),
            PlatformKind::Collapsed { .. } => {
                if platform.start_collapse() {
                    self.timers
                        .schedule_collapse(self.time_ticks, platform, &self.tuning);
                    self.events.push(GameEvent::CollapseStarted {
                        platform: platform.id,
                    });
                    log::debug!("Platform {} collapsing", platform.id);
                }
            }
        }

        Some(platform.id)
    }

    /// React to a contact ending: release any moving platform involved
    pub fn handle_contact_end(&mut self, contact: &Contact) {
        for handle in landing::platform_bodies(contact) {
            if let Some(platform) = self.field.platform_by_body_mut(handle) {
                platform.set_stopped(false);
            }
        }
    }

    /// Run the pending score evaluation if the player has settled
    pub fn evaluate_score(&mut self) -> Option<Evaluation> {
        let evaluation = self.score.evaluate(
            &self.player,
            &mut self.field.platforms,
            self.tuning.settle_epsilon,
            self.tuning.trick_angle_tolerance_deg,
        )?;

        match evaluation {
            Evaluation::Awarded {
                platform,
                style,
                points,
            } => self.events.push(GameEvent::Landed {
                platform,
                style,
                points,
            }),
            Evaluation::Repeat { platform } => {
                self.events.push(GameEvent::RepeatLanding { platform })
            }
            Evaluation::NoCandidate => {}
        }
        Some(evaluation)
    }

    pub fn follow_camera(&mut self) {
        self.viewport.camera_y = camera::follow(
            self.viewport.camera_y,
            self.player.pos.y,
            self.field.lowest_platform_y(),
            self.tuning.camera_floor_offset,
        );
    }

    /// Cull and regenerate around the current camera
    pub fn top_up<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W) {
        self.generator
            .top_up(&mut self.field, &self.viewport, &self.tuning, world);
    }

    /// Fire every collapse step that has come due
    pub fn run_timers<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W) {
        for event in self.timers.drain_due(self.time_ticks) {
            let Some(platform) = self.field.platform_mut(event.platform_id) else {
                continue;
            };
            if !event.targets(platform) {
                continue;
            }

            match event.step {
                CollapseStep::Shake => platform.appearance = Appearance::Shaking,
                CollapseStep::Fade => platform.appearance = Appearance::Fading,
                CollapseStep::Vanish => {
                    platform.collidable = false;
                    platform.appearance = Appearance::Hidden;
                    if let Some(handle) = platform.body {
                        world.set_collidable(handle, false);
                    }
                    self.events.push(GameEvent::PlatformVanished {
                        platform: platform.id,
                    });
                }
                CollapseStep::Respawn => {
                    platform.reset_after_collapse();
                    if let Some(handle) = platform.body {
                        world.set_collidable(handle, true);
                    }
                    self.events.push(GameEvent::PlatformRespawned {
                        platform: platform.id,
                    });
                }
            }
        }
    }

    /// End the run once the player has dropped a full screen below the camera
    pub fn check_game_over(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return true;
        }
        if self.player.pos.y < self.viewport.camera_y - self.viewport.height {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver {
                score: self.score.score,
            });
            log::info!(
                "Game over at tick {} with score {} (best {})",
                self.time_ticks,
                self.score.score,
                self.score.best_score
            );
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ArcadeWorld, BodyRef};
    use crate::sim::category::Category;

    fn new_game() -> (GameState, ArcadeWorld) {
        let tuning = Tuning::default();
        let mut world = ArcadeWorld::new(&tuning);
        let state = GameState::new(7, tuning, 0, &mut world);
        (state, world)
    }

    /// Player landing squarely on top of `platform`
    fn top_contact(platform: &Platform) -> Contact {
        Contact {
            body_a: BodyRef {
                handle: BodyHandle::PLAYER,
                category: Category::PLAYER,
            },
            body_b: BodyRef {
                handle: platform.body.unwrap(),
                category: Category::PLATFORM,
            },
            point: Vec2::new(platform.pos.x, platform.top()),
            normal: Vec2::NEG_Y,
        }
    }

    #[test]
    fn test_initial_layout() {
        let (state, world) = new_game();
        assert_eq!(state.field.platforms.len(), 10);
        assert_eq!(state.platforms()[0].pos, Vec2::new(200.0, 50.0));
        for (i, p) in state.platforms().iter().enumerate() {
            assert_eq!(p.pos.y, 50.0 + 200.0 * i as f32);
        }
        assert_eq!(state.player.pos, Vec2::new(200.0, 100.0));
        assert_eq!(state.viewport.camera_y, 400.0);
        assert_eq!(world.body_count(), 10);
    }

    #[test]
    fn test_top_landing_arms_scoring() {
        let (mut state, _world) = new_game();
        let target = state.field.platforms[1].clone();
        state.player.vel = Vec2::new(50.0, -300.0);

        let landed = state.handle_contact_begin(&top_contact(&target));
        assert_eq!(landed, Some(target.id));
        assert_eq!(state.score.candidate, Some(target.id));
        assert!(state.score.check_multiplier);
        assert_eq!(state.player.vel, Vec2::new(5.0, -30.0));
    }

    #[test]
    fn test_side_contact_is_ignored() {
        let (mut state, _world) = new_game();
        let target = state.field.platforms[1].clone();
        let mut contact = top_contact(&target);
        contact.point = Vec2::new(target.left(), target.pos.y - 5.0);
        contact.normal = Vec2::X;

        assert_eq!(state.handle_contact_begin(&contact), None);
        assert!(!state.score.check_multiplier);
    }

    #[test]
    fn test_collapse_sequence() {
        let (mut state, mut world) = new_game();
        let idx = 3;
        state.field.platforms[idx].kind = PlatformKind::Collapsed { started: false };
        state.field.platforms[idx].has_been_landed_on = true;
        let target = state.field.platforms[idx].clone();
        let handle = target.body.unwrap();

        state.handle_contact_begin(&top_contact(&target));
        assert!(state.field.platforms[idx].collapse_started());
        assert_eq!(state.timers.len(), 4);

        // Landing again mid-collapse schedules nothing new
        state.handle_contact_begin(&top_contact(&target));
        assert_eq!(state.timers.len(), 4);

        state.time_ticks += 120;
        state.run_timers(&mut world);
        let p = &state.field.platforms[idx];
        assert!(!p.collidable);
        assert_eq!(p.appearance, Appearance::Hidden);
        assert_eq!(world.is_collidable(handle), Some(false));

        state.time_ticks += 180;
        state.run_timers(&mut world);
        let p = &state.field.platforms[idx];
        assert!(p.collidable);
        assert!(!p.collapse_started());
        assert!(!p.has_been_landed_on);
        assert_eq!(p.appearance, Appearance::Solid);
        assert_eq!(world.is_collidable(handle), Some(true));
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_timer_for_culled_platform_is_dropped() {
        let (mut state, mut world) = new_game();
        state.field.platforms[2].kind = PlatformKind::Collapsed { started: false };
        let target = state.field.platforms[2].clone();
        state.handle_contact_begin(&top_contact(&target));

        state.field.platforms.remove(2);
        state.time_ticks += 1000;
        state.run_timers(&mut world);
        assert!(state.timers.is_empty());
        assert!(state.field.platforms.iter().all(|p| p.collidable));
    }

    #[test]
    fn test_moving_platform_holds_during_contact() {
        let (mut state, mut world) = new_game();
        let idx = 4;
        let x = state.field.platforms[idx].pos.x;
        state.field.platforms[idx].kind = PlatformKind::Moving {
            direction: 1.0,
            speed: 50.0,
            left_limit: x - 50.0,
            right_limit: x + 50.0,
            is_stopped: false,
        };
        let target = state.field.platforms[idx].clone();
        let contact = top_contact(&target);

        state.handle_contact_begin(&contact);
        state.patrol_platforms(0.1, &mut world);
        assert_eq!(state.field.platforms[idx].pos.x, x);

        state.handle_contact_end(&contact);
        assert!(!state.field.platforms[idx].is_stopped());
        state.patrol_platforms(0.1, &mut world);
        let moved = state.field.platforms[idx].pos;
        assert_eq!(moved.x, x + 5.0);
        assert_eq!(world.body(target.body.unwrap()).map(|b| b.center), Some(moved));
    }

    fn stopped_moving_platform(state: &mut GameState, idx: usize) -> Platform {
        let x = state.field.platforms[idx].pos.x;
        state.field.platforms[idx].kind = PlatformKind::Moving {
            direction: 1.0,
            speed: 50.0,
            left_limit: x - 50.0,
            right_limit: x + 50.0,
            is_stopped: false,
        };
        let target = state.field.platforms[idx].clone();
        state.handle_contact_begin(&top_contact(&target));
        assert!(state.field.platforms[idx].is_stopped());
        target
    }

    #[test]
    fn test_contact_end_without_that_platform_keeps_it_stopped() {
        let (mut state, _world) = new_game();
        let target = stopped_moving_platform(&mut state, 4);

        // Player leaving a wall
        let mut wall_end = top_contact(&target);
        wall_end.body_b = BodyRef {
            handle: BodyHandle(9_999),
            category: Category::WALL,
        };
        state.handle_contact_end(&wall_end);
        assert!(state.field.platforms[4].is_stopped());

        // Player leaving a different platform
        let other = state.field.platforms[5].clone();
        state.handle_contact_end(&top_contact(&other));
        assert!(state.field.platforms[4].is_stopped());
    }

    #[test]
    fn test_player_contact_end_releases_platform() {
        let (mut state, _world) = new_game();
        let target = stopped_moving_platform(&mut state, 4);

        // Reported in either body order
        state.handle_contact_end(&top_contact(&target).swapped());
        assert!(!state.field.platforms[4].is_stopped());
    }

    #[test]
    fn test_sensor_contact_end_releases_platform() {
        let (mut state, _world) = new_game();
        let target = stopped_moving_platform(&mut state, 4);

        let mut sensor_end = top_contact(&target);
        sensor_end.body_a.category = Category::BOTTOM_SENSOR;
        state.handle_contact_end(&sensor_end);
        assert!(!state.field.platforms[4].is_stopped());
    }

    #[test]
    fn test_gesture_launches_or_spins() {
        let (mut state, _world) = new_game();
        let gesture = Gesture {
            start: Vec2::new(200.0, 300.0),
            end: Vec2::new(220.0, 200.0),
        };
        state.apply_gesture(gesture);
        assert_eq!(state.player.vel, Vec2::new(-80.0, 800.0));
        assert!(!state.score.keep_score_multiplier);

        let spin_before = state.player.angular_vel;
        state.apply_gesture(gesture);
        assert_eq!(state.player.angular_vel, spin_before - 5.0);
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::Launched { .. }));
        assert!(matches!(events[1], GameEvent::Spun { .. }));
    }

    #[test]
    fn test_game_over_below_screen() {
        let (mut state, _world) = new_game();
        state.player.pos.y = -401.0;
        assert!(state.check_game_over());
        assert!(state.is_game_over());
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { score: 0 }]);
        // Only reported once
        assert!(state.check_game_over());
        assert!(state.events.is_empty());
    }
}
