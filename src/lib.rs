//! Bottle Climb - an endless bottle-flip climber
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, landing, scoring, camera)
//! - `physics`: Physics world seam and a headless reference integrator
//! - `persistence`: Best-score key/value store
//! - `tuning`: Data-driven game balance
//! - `session`: Run lifecycle (restart, game over, best score)

pub mod error;
pub mod persistence;
pub mod physics;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants
///
/// These are the authoritative defaults behind [`Tuning::default`].
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second, used to convert timer durations
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Playfield (portrait phone frame)
    pub const FRAME_MIN_X: f32 = 0.0;
    pub const FRAME_MAX_X: f32 = 400.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;

    /// Platforms
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const PLATFORM_WIDTHS: [f32; 3] = [100.0, 120.0, 140.0];
    pub const PLATFORM_WIDTH_WEIGHTS: [f32; 3] = [0.25, 0.5, 0.25];
    /// Live platform count the generator keeps topped up
    pub const TARGET_PLATFORM_COUNT: usize = 10;
    /// Vertical distance between consecutive platforms
    pub const VERTICAL_GAP: f32 = 200.0;
    /// y of the first platform in a fresh game
    pub const FIRST_PLATFORM_Y: f32 = 50.0;
    /// Minimum horizontal separation between consecutive platforms
    pub const SAFE_GAP: f32 = 100.0;
    /// Clearance kept between platforms and the frame edges
    pub const WALL_MARGIN: f32 = 20.0;
    /// Extra distance below the viewport before a platform is culled
    pub const CULL_MARGIN: f32 = 200.0;
    /// Platforms generated as Normal at the start of every game
    pub const EARLY_SAFE_PLATFORMS: u32 = 10;

    /// Moving platform patrol
    pub const MOVING_SPEED: f32 = 50.0;
    pub const MOVING_RANGE: f32 = 50.0;

    /// Difficulty ramps from 0 to 1 over this height
    pub const DIFFICULTY_MAX_HEIGHT: f32 = 2500.0;

    /// Wall obstacle
    pub const WALL_BASE_CHANCE: f32 = 0.15;
    pub const WALL_CHANCE_PER_DIFFICULTY: f32 = 0.05;
    pub const WALL_WIDTH: f32 = 20.0;
    pub const WALL_HEIGHT: f32 = 100.0;
    pub const WALL_RESTITUTION: f32 = 0.8;

    /// Player (bottle) body
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_START_Y: f32 = 100.0;
    /// |vy| below this counts as idle (launch allowed)
    pub const IDLE_SPEED_THRESHOLD: f32 = 1.0;
    /// Both velocity axes below this count as settled for scoring
    pub const SETTLE_EPSILON: f32 = 1e-4;

    /// Launch mapping from drag vector
    pub const LAUNCH_SCALE_X: f32 = 4.0;
    pub const LAUNCH_SCALE_Y: f32 = 8.0;
    pub const MAX_LAUNCH_SPEED: f32 = 1400.0;
    pub const LAUNCH_SPIN_PER_UNIT: f32 = 0.15;
    /// Angular velocity added by a mid-air drag
    pub const SPIN_BOOST: f32 = 5.0;

    /// Landing
    pub const LANDING_DAMPING: f32 = 0.1;
    pub const LANDING_NORMAL_THRESHOLD: f32 = -0.5;
    pub const LANDING_TOP_TOLERANCE: f32 = 10.0;
    pub const TRICK_ANGLE_TOLERANCE_DEG: f32 = 10.0;

    /// Camera floor sits this far above the lowest live platform
    pub const CAMERA_FLOOR_OFFSET: f32 = 200.0;

    /// Collapse sequence (seconds)
    pub const COLLAPSE_DELAY_SECS: f32 = 0.7;
    pub const COLLAPSE_SHAKE_SECS: f32 = 0.8;
    pub const COLLAPSE_FADE_SECS: f32 = 0.5;
    pub const COLLAPSE_RESPAWN_SECS: f32 = 3.0;

    /// Physics world
    pub const GRAVITY: [f32; 2] = [0.0, -9.8];
    pub const PIXELS_PER_METER: f32 = 150.0;
    pub const EDGE_RESTITUTION: f32 = 1.0;

    /// Best-score storage key
    pub const BEST_SCORE_KEY: &str = "highscore";
}

/// Convert radians to degrees folded into [0, 360)
#[inline]
pub fn folded_degrees(radians: f32) -> f32 {
    (radians.to_degrees() % 360.0).abs()
}

/// Convert a duration in seconds to whole simulation ticks (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    ((secs * consts::TICKS_PER_SECOND as f32).round() as u64).max(1)
}
