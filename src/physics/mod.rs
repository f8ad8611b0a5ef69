//! Physics world seam
//!
//! The game never integrates motion itself. It hands static bodies to a
//! [`PhysicsWorld`], lets the world move the player each frame, and reacts to
//! the begin/end contact events the world reports back.
//!
//! [`ArcadeWorld`] is a small axis-aligned implementation used by the native
//! binary and by tests, so the whole loop runs headless.

pub mod arcade;

pub use arcade::ArcadeWorld;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::category::{Category, Masks};
use crate::sim::entity::Player;

/// Opaque handle to a body owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    /// The player's body is always handle 0
    pub const PLAYER: BodyHandle = BodyHandle(0);
}

/// Description of a non-dynamic rectangular body (platform or wall)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticBody {
    pub masks: Masks,
    pub center: Vec2,
    pub size: Vec2,
    pub restitution: f32,
    pub friction: f32,
}

impl StaticBody {
    pub fn platform(center: Vec2, size: Vec2) -> Self {
        Self {
            masks: Masks::platform(),
            center,
            size,
            restitution: 0.0,
            friction: 1.0,
        }
    }

    pub fn wall(center: Vec2, size: Vec2, restitution: f32) -> Self {
        Self {
            masks: Masks::wall(),
            center,
            size,
            restitution,
            friction: 0.0,
        }
    }
}

/// One side of a contact pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRef {
    pub handle: BodyHandle,
    pub category: Category,
}

/// A contact between two bodies
///
/// `normal` points from `body_a` toward `body_b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub body_a: BodyRef,
    pub body_b: BodyRef,
    pub point: Vec2,
    pub normal: Vec2,
}

impl Contact {
    /// The same contact seen from the other body
    pub fn swapped(&self) -> Contact {
        Contact {
            body_a: self.body_b,
            body_b: self.body_a,
            point: self.point,
            normal: -self.normal,
        }
    }

    /// Iterate over both bodies
    pub fn bodies(&self) -> [BodyRef; 2] {
        [self.body_a, self.body_b]
    }
}

/// Contact lifecycle event delivered by the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContactEvent {
    Begin(Contact),
    End(Contact),
}

/// What the game needs from a 2D rigid-body simulator
pub trait PhysicsWorld {
    /// Gravity in world units per second squared
    fn gravity(&self) -> Vec2;

    /// Add a static body and return its handle
    fn insert_static(&mut self, body: StaticBody) -> BodyHandle;

    /// Detach a body; no further contacts are reported for it
    fn remove_body(&mut self, handle: BodyHandle);

    /// Move a static body (moving platforms)
    fn set_position(&mut self, handle: BodyHandle, center: Vec2);

    /// Enable or disable collision for a body (collapsing platforms)
    fn set_collidable(&mut self, handle: BodyHandle, collidable: bool);

    /// Drop every static body (new game)
    fn clear(&mut self);

    /// Integrate the player for `dt` seconds and append contact events
    fn step(&mut self, player: &mut Player, dt: f32, events: &mut Vec<ContactEvent>);
}
