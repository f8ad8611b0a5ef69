//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one generator per run)
//! - Stable iteration order (spawn order, which is also height order)
//! - No rendering or platform dependencies; physics arrives through a trait

pub mod camera;
pub mod category;
pub mod difficulty;
pub mod entity;
pub mod field;
pub mod generator;
pub mod landing;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod timers;
pub mod trajectory;

pub use camera::Viewport;
pub use category::{Category, Masks};
pub use difficulty::{TypeWeights, difficulty, weighted_type_for_difficulty};
pub use entity::{Appearance, EntityId, Platform, PlatformKind, PlatformType, Player, Side, Wall};
pub use field::Field;
pub use generator::{Generator, Spawn, TopUpReport};
pub use landing::{Landing, LandingRules, classify};
pub use scoring::{Evaluation, LandingStyle, ScoreState, ScoringPhase};
pub use state::{GameEvent, GamePhase, GameState, Gesture};
pub use tick::{TickInput, tick};
pub use timers::{CollapseStep, TimerQueue};
pub use trajectory::{TrajectoryPoint, predict};
