//! Aiming guide prediction
//!
//! While the player drags, the renderer shows a dotted arc. The arc is a cheap
//! ballistic estimate from the raw drag vector, not the launch velocity the
//! physics world will actually see.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Dots in the guide
pub const TRAJECTORY_POINTS: usize = 20;
/// Seconds between dots
pub const TRAJECTORY_STEP: f32 = 0.1;
/// Cap on the upward component of the guide velocity
pub const TRAJECTORY_MAX_RISE: f32 = 200.0;
/// Velocity kept after the single edge bounce
pub const TRAJECTORY_RESTITUTION: f32 = 0.3;

/// One dot of the guide
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub pos: Vec2,
    /// Fades from 1 toward 0 along the arc
    pub alpha: f32,
}

/// Predict the guide arc for a drag from `drag_start` to `drag_end`
///
/// `gravity` is the world's gravity; `min_x`/`max_x` are the frame edges the
/// arc may bounce off once.
pub fn predict(
    origin: Vec2,
    drag_start: Vec2,
    drag_end: Vec2,
    gravity: Vec2,
    min_x: f32,
    max_x: f32,
) -> Vec<TrajectoryPoint> {
    let pull = drag_start - drag_end;
    let mut vel = Vec2::new(pull.x, pull.y.min(TRAJECTORY_MAX_RISE));
    let mut pos = origin;
    let mut bounced = false;

    let mut points = Vec::with_capacity(TRAJECTORY_POINTS);
    for i in 0..TRAJECTORY_POINTS {
        points.push(TrajectoryPoint {
            pos,
            alpha: 1.0 - i as f32 / TRAJECTORY_POINTS as f32,
        });

        vel += gravity * TRAJECTORY_STEP;
        let mut next = pos + vel * TRAJECTORY_STEP;

        if !bounced && (next.x <= min_x || next.x >= max_x) {
            next.x = next.x.clamp(min_x, max_x);
            vel.x *= -TRAJECTORY_RESTITUTION;
            vel.y *= TRAJECTORY_RESTITUTION;
            bounced = true;
        }
        pos = next;
    }
    points
}
