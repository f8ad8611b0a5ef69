//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`]. A JSON
//! file can override any subset of them; missing keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Runtime-tunable gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub frame_min_x: f32,
    pub frame_max_x: f32,
    pub viewport_height: f32,

    // === Generation ===
    pub platform_height: f32,
    pub platform_widths: [f32; 3],
    pub platform_width_weights: [f32; 3],
    pub target_platform_count: usize,
    pub vertical_gap: f32,
    pub first_platform_y: f32,
    pub safe_gap: f32,
    pub wall_margin: f32,
    pub cull_margin: f32,
    pub early_safe_platforms: u32,
    pub difficulty_max_height: f32,
    pub moving_speed: f32,
    pub moving_range: f32,

    // === Wall obstacle ===
    pub wall_base_chance: f32,
    pub wall_chance_per_difficulty: f32,
    pub wall_width: f32,
    pub wall_height: f32,
    pub wall_restitution: f32,

    // === Player & input ===
    pub player_start_y: f32,
    pub idle_speed_threshold: f32,
    pub settle_epsilon: f32,
    pub launch_scale_x: f32,
    pub launch_scale_y: f32,
    pub max_launch_speed: f32,
    pub launch_spin_per_unit: f32,
    pub spin_boost: f32,

    // === Landing & scoring ===
    pub landing_damping: f32,
    pub landing_normal_threshold: f32,
    pub landing_top_tolerance: f32,
    pub trick_angle_tolerance_deg: f32,

    // === Camera ===
    pub camera_floor_offset: f32,

    // === Collapse sequence (seconds) ===
    pub collapse_delay_secs: f32,
    pub collapse_shake_secs: f32,
    pub collapse_fade_secs: f32,
    pub collapse_respawn_secs: f32,

    // === Physics ===
    pub gravity: [f32; 2],
    pub pixels_per_meter: f32,
    pub edge_restitution: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            frame_min_x: FRAME_MIN_X,
            frame_max_x: FRAME_MAX_X,
            viewport_height: VIEWPORT_HEIGHT,

            platform_height: PLATFORM_HEIGHT,
            platform_widths: PLATFORM_WIDTHS,
            platform_width_weights: PLATFORM_WIDTH_WEIGHTS,
            target_platform_count: TARGET_PLATFORM_COUNT,
            vertical_gap: VERTICAL_GAP,
            first_platform_y: FIRST_PLATFORM_Y,
            safe_gap: SAFE_GAP,
            wall_margin: WALL_MARGIN,
            cull_margin: CULL_MARGIN,
            early_safe_platforms: EARLY_SAFE_PLATFORMS,
            difficulty_max_height: DIFFICULTY_MAX_HEIGHT,
            moving_speed: MOVING_SPEED,
            moving_range: MOVING_RANGE,

            wall_base_chance: WALL_BASE_CHANCE,
            wall_chance_per_difficulty: WALL_CHANCE_PER_DIFFICULTY,
            wall_width: WALL_WIDTH,
            wall_height: WALL_HEIGHT,
            wall_restitution: WALL_RESTITUTION,

            player_start_y: PLAYER_START_Y,
            idle_speed_threshold: IDLE_SPEED_THRESHOLD,
            settle_epsilon: SETTLE_EPSILON,
            launch_scale_x: LAUNCH_SCALE_X,
            launch_scale_y: LAUNCH_SCALE_Y,
            max_launch_speed: MAX_LAUNCH_SPEED,
            launch_spin_per_unit: LAUNCH_SPIN_PER_UNIT,
            spin_boost: SPIN_BOOST,

            landing_damping: LANDING_DAMPING,
            landing_normal_threshold: LANDING_NORMAL_THRESHOLD,
            landing_top_tolerance: LANDING_TOP_TOLERANCE,
            trick_angle_tolerance_deg: TRICK_ANGLE_TOLERANCE_DEG,

            camera_floor_offset: CAMERA_FLOOR_OFFSET,

            collapse_delay_secs: COLLAPSE_DELAY_SECS,
            collapse_shake_secs: COLLAPSE_SHAKE_SECS,
            collapse_fade_secs: COLLAPSE_FADE_SECS,
            collapse_respawn_secs: COLLAPSE_RESPAWN_SECS,

            gravity: GRAVITY,
            pixels_per_meter: PIXELS_PER_METER,
            edge_restitution: EDGE_RESTITUTION,
        }
    }
}

impl Tuning {
    /// Horizontal midpoint of the playfield
    pub fn mid_x(&self) -> f32 {
        (self.frame_min_x + self.frame_max_x) * 0.5
    }

    /// Gravity in world units per second squared
    pub fn gravity_px(&self) -> glam::Vec2 {
        glam::Vec2::from(self.gravity) * self.pixels_per_meter
    }

    /// Parse tuning from a JSON string and validate it
    pub fn from_json(json: &str) -> GameResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning from a JSON file and validate it
    pub fn from_path(path: impl AsRef<Path>) -> GameResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning from a file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Check every value the simulation relies on being in range
    pub fn validate(&self) -> GameResult<()> {
        fn positive(name: &'static str, value: f32) -> GameResult<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(GameError::InvalidTuning {
                    name,
                    value,
                    expected: "(0, ∞)",
                })
            }
        }
        fn non_negative(name: &'static str, value: f32) -> GameResult<()> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(GameError::InvalidTuning {
                    name,
                    value,
                    expected: "[0, ∞)",
                })
            }
        }
        fn unit(name: &'static str, value: f32) -> GameResult<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(GameError::InvalidTuning {
                    name,
                    value,
                    expected: "[0, 1]",
                })
            }
        }

        positive("frame_width", self.frame_max_x - self.frame_min_x)?;
        positive("viewport_height", self.viewport_height)?;
        positive("platform_height", self.platform_height)?;
        for width in self.platform_widths {
            positive("platform_widths", width)?;
        }
        for weight in self.platform_width_weights {
            non_negative("platform_width_weights", weight)?;
        }
        positive(
            "platform_width_weights (sum)",
            self.platform_width_weights.iter().sum(),
        )?;
        positive("target_platform_count", self.target_platform_count as f32)?;
        positive("vertical_gap", self.vertical_gap)?;
        non_negative("safe_gap", self.safe_gap)?;
        non_negative("wall_margin", self.wall_margin)?;
        non_negative("cull_margin", self.cull_margin)?;
        positive("difficulty_max_height", self.difficulty_max_height)?;
        non_negative("moving_speed", self.moving_speed)?;
        non_negative("moving_range", self.moving_range)?;
        unit("wall_base_chance", self.wall_base_chance)?;
        unit(
            "wall_chance (max)",
            self.wall_base_chance + self.wall_chance_per_difficulty,
        )?;
        positive("wall_width", self.wall_width)?;
        positive("wall_height", self.wall_height)?;
        unit("landing_damping", self.landing_damping)?;
        positive("settle_epsilon", self.settle_epsilon)?;
        positive("max_launch_speed", self.max_launch_speed)?;
        non_negative("collapse_delay_secs", self.collapse_delay_secs)?;
        non_negative("collapse_shake_secs", self.collapse_shake_secs)?;
        non_negative("collapse_fade_secs", self.collapse_fade_secs)?;
        non_negative("collapse_respawn_secs", self.collapse_respawn_secs)?;
        positive("pixels_per_meter", self.pixels_per_meter)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "safe_gap": 80.0, "frame_max_x": 600.0 }"#).unwrap();
        assert_eq!(tuning.safe_gap, 80.0);
        assert_eq!(tuning.frame_max_x, 600.0);
        assert_eq!(tuning.vertical_gap, VERTICAL_GAP);
        assert_eq!(tuning.platform_widths, PLATFORM_WIDTHS);
    }

    #[test]
    fn test_rejects_negative_gap() {
        let err = Tuning::from_json(r#"{ "safe_gap": -5.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTuning {
                name: "safe_gap",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_weights() {
        let err = Tuning::from_json(r#"{ "platform_width_weights": [0.0, 0.0, 0.0] }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning { .. }));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/definitely/not/here/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_mid_x() {
        let tuning = Tuning::default();
        assert_eq!(tuning.mid_x(), 200.0);
    }
}
