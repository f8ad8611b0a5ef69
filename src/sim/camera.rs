//! Camera / viewport policy
//!
//! The camera only climbs with the player. When the player drops, it may
//! follow down to a floor tied to the lowest surviving platform, so the
//! culled region below is never exposed.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Vertical window the generator and cull sweep work against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Camera center y
    pub camera_y: f32,
    pub height: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl Viewport {
    /// Camera starts centered on the first screen
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            camera_y: tuning.viewport_height / 2.0,
            height: tuning.viewport_height,
            min_x: tuning.frame_min_x,
            max_x: tuning.frame_max_x,
        }
    }

    /// Entities at or below this y are removed
    pub fn cull_line(&self, margin: f32) -> f32 {
        self.camera_y - self.height - margin
    }

    pub fn top(&self) -> f32 {
        self.camera_y + self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.camera_y - self.height / 2.0
    }
}

/// Next camera y given the player height and the lowest live platform
pub fn follow(camera_y: f32, player_y: f32, lowest_platform_y: Option<f32>, floor_offset: f32) -> f32 {
    if player_y > camera_y {
        return player_y;
    }
    match lowest_platform_y {
        Some(lowest) => player_y.max(lowest + floor_offset),
        None => player_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rises_with_player() {
        assert_eq!(follow(400.0, 650.0, Some(50.0), 200.0), 650.0);
    }

    #[test]
    fn test_floor_clamps_descent() {
        // Lowest platform at 500, player dropping through 300
        let cam = follow(900.0, 300.0, Some(500.0), 200.0);
        assert_eq!(cam, 700.0);
        // Keeps holding the floor as the player keeps falling
        assert_eq!(follow(cam, 100.0, Some(500.0), 200.0), 700.0);
    }

    #[test]
    fn test_follows_down_to_floor() {
        assert_eq!(follow(1000.0, 800.0, Some(500.0), 200.0), 800.0);
    }

    #[test]
    fn test_no_platforms_tracks_player() {
        assert_eq!(follow(400.0, 100.0, None, 200.0), 100.0);
    }

    #[test]
    fn test_cull_line() {
        let vp = Viewport {
            camera_y: 2000.0,
            height: 800.0,
            min_x: 0.0,
            max_x: 400.0,
        };
        assert_eq!(vp.cull_line(200.0), 1000.0);
        assert_eq!(vp.top(), 2400.0);
        assert_eq!(vp.bottom(), 1600.0);
    }
}
