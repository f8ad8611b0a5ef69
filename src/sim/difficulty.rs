//! Height-driven difficulty curve
//!
//! Difficulty is a plain function of height. It shifts weight from Normal
//! platforms toward Moving and Collapsed ones and raises the wall chance.

use rand::Rng;

use super::entity::PlatformType;
use crate::tuning::Tuning;

/// Normalized difficulty in [0, 1] for a given height
#[inline]
pub fn difficulty(y: f32, max_height: f32) -> f32 {
    (y / max_height).clamp(0.0, 1.0)
}

/// Probability of spawning a wall beside a Normal platform
pub fn wall_chance(difficulty: f32, tuning: &Tuning) -> f32 {
    (tuning.wall_base_chance + tuning.wall_chance_per_difficulty * difficulty).clamp(0.0, 1.0)
}

/// Selection weights for the three platform types
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeWeights {
    pub normal: f32,
    pub moving: f32,
    pub collapsed: f32,
}

impl TypeWeights {
    /// Linearly interpolated weights before normalization
    pub fn raw(difficulty: f32) -> Self {
        Self {
            normal: 0.75 - 0.05 * difficulty,
            moving: 0.15 + 0.05 * difficulty,
            collapsed: 0.05 + 0.05 * difficulty,
        }
    }

    /// Normalized weights for a difficulty
    pub fn for_difficulty(difficulty: f32) -> Self {
        Self::raw(difficulty).normalized()
    }

    pub fn sum(&self) -> f32 {
        self.normal + self.moving + self.collapsed
    }

    /// Scale so the weights sum to 1
    pub fn normalized(self) -> Self {
        let sum = self.sum();
        if sum <= 0.0 {
            return Self {
                normal: 1.0,
                moving: 0.0,
                collapsed: 0.0,
            };
        }
        Self {
            normal: self.normal / sum,
            moving: self.moving / sum,
            collapsed: self.collapsed / sum,
        }
    }

    /// Select by cumulative thresholds in the order Normal, Moving, Collapsed
    pub fn pick(&self, roll: f32) -> PlatformType {
        if roll < self.normal {
            PlatformType::Normal
        } else if roll < self.normal + self.moving {
            PlatformType::Moving
        } else {
            PlatformType::Collapsed
        }
    }
}

/// Draw a platform type for a platform spawned at height `y`
pub fn weighted_type_for_difficulty<R: Rng + ?Sized>(
    y: f32,
    max_height: f32,
    rng: &mut R,
) -> PlatformType {
    let weights = TypeWeights::for_difficulty(difficulty(y, max_height));
    let roll: f32 = rng.random();
    weights.pick(roll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_difficulty_saturates() {
        assert_eq!(difficulty(0.0, 2500.0), 0.0);
        assert_eq!(difficulty(1250.0, 2500.0), 0.5);
        assert_eq!(difficulty(2500.0, 2500.0), 1.0);
        assert_eq!(difficulty(10_000.0, 2500.0), 1.0);
    }

    #[test]
    fn test_ground_level_weights() {
        let raw = TypeWeights::raw(0.0);
        assert!((raw.normal - 0.75).abs() < 1e-6);
        assert!((raw.moving - 0.15).abs() < 1e-6);
        assert!((raw.collapsed - 0.05).abs() < 1e-6);
        assert!((raw.sum() - 0.95).abs() < 1e-6);

        let w = raw.normalized();
        assert!((w.normal - 0.789).abs() < 1e-3);
        assert!((w.moving - 0.158).abs() < 1e-3);
        assert!((w.collapsed - 0.053).abs() < 1e-3);
    }

    #[test]
    fn test_pick_thresholds() {
        let w = TypeWeights::for_difficulty(0.0);
        assert_eq!(w.pick(0.0), PlatformType::Normal);
        assert_eq!(w.pick(0.78), PlatformType::Normal);
        assert_eq!(w.pick(0.80), PlatformType::Moving);
        assert_eq!(w.pick(0.95), PlatformType::Collapsed);
        assert_eq!(w.pick(0.999), PlatformType::Collapsed);
    }

    #[test]
    fn test_wall_chance_ramps() {
        let tuning = Tuning::default();
        assert!((wall_chance(0.0, &tuning) - 0.15).abs() < 1e-6);
        assert!((wall_chance(1.0, &tuning) - 0.20).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_draw_is_mostly_normal_at_ground() {
        let mut rng = Pcg32::seed_from_u64(7);
        let normals = (0..2000)
            .filter(|_| weighted_type_for_difficulty(0.0, 2500.0, &mut rng) == PlatformType::Normal)
            .count();
        // Expected ~1579
        assert!((1450..1700).contains(&normals), "normals = {}", normals);
    }

    proptest! {
        #[test]
        fn prop_weights_sum_to_one(d in 0.0f32..=1.0) {
            let w = TypeWeights::for_difficulty(d);
            prop_assert!((w.sum() - 1.0).abs() < 1e-5);
            prop_assert!(w.normal > 0.0 && w.moving > 0.0 && w.collapsed > 0.0);
        }

        #[test]
        fn prop_harder_means_fewer_normals(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                TypeWeights::for_difficulty(hi).normal <= TypeWeights::for_difficulty(lo).normal + 1e-6
            );
        }
    }
}
