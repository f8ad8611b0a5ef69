//! Procedural platform generation
//!
//! Each frame the generator culls entities that fell far below the camera and
//! tops the field back up to the target platform count. Every new platform
//! gets a width, an x outside the safe gap around its predecessor, a fixed
//! vertical step, a type from the difficulty curve, and maybe a wall.

use glam::Vec2;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Viewport;
use super::difficulty::{difficulty, wall_chance, weighted_type_for_difficulty};
use super::entity::{EntityId, Platform, PlatformKind, PlatformType, Side, Wall};
use super::field::Field;
use crate::physics::PhysicsWorld;
use crate::tuning::Tuning;

/// The most recently generated platform
#[derive(Debug, Clone, Copy, PartialEq)]
struct Previous {
    x: f32,
    y: f32,
    kind: PlatformType,
}

/// One synthesized platform and its optional wall
#[derive(Debug, Clone)]
pub struct Spawn {
    pub platform: Platform,
    pub wall: Option<Wall>,
}

/// What a top-up pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopUpReport {
    pub culled_platforms: usize,
    pub culled_walls: usize,
    pub spawned_platforms: usize,
    pub spawned_walls: usize,
}

/// Legal center range for a platform of `width`
pub fn placement_bounds(width: f32, tuning: &Tuning) -> (f32, f32) {
    let half = width / 2.0;
    (
        tuning.frame_min_x + tuning.wall_margin + half,
        tuning.frame_max_x - tuning.wall_margin - half,
    )
}

/// The two sub-intervals of `[lo, hi]` outside `(prev_x - gap, prev_x + gap)`
pub fn allowed_intervals(lo: f32, hi: f32, prev_x: f32, gap: f32) -> [Option<(f32, f32)>; 2] {
    let left = (lo, hi.min(prev_x - gap));
    let right = (lo.max(prev_x + gap), hi);
    let valid = |(a, b): (f32, f32)| if a <= b { Some((a, b)) } else { None };
    [valid(left), valid(right)]
}

/// Seeded platform generator, one per game
#[derive(Debug, Clone)]
pub struct Generator {
    rng: Pcg32,
    /// Platforms generated so far inside the safe start zone
    early_count: u32,
    previous: Option<Previous>,
    next_id: EntityId,
    widths: Option<WeightedIndex<f32>>,
}

impl Generator {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let widths = match WeightedIndex::new(tuning.platform_width_weights) {
            Ok(dist) => Some(dist),
            Err(err) => {
                log::warn!("Bad platform width weights ({}), using first width only", err);
                None
            }
        };
        Self {
            rng: Pcg32::seed_from_u64(seed),
            early_count: 0,
            previous: None,
            next_id: 1,
            widths,
        }
    }

    pub fn early_count(&self) -> u32 {
        self.early_count
    }

    /// x of the last generated platform
    pub fn previous_x(&self) -> Option<f32> {
        self.previous.map(|p| p.x)
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Cull below the viewport, then refill the field to the target count
    pub fn top_up<W: PhysicsWorld + ?Sized>(
        &mut self,
        field: &mut Field,
        viewport: &Viewport,
        tuning: &Tuning,
        world: &mut W,
    ) -> TopUpReport {
        let (culled_platforms, culled_walls) =
            field.cull_below(viewport.cull_line(tuning.cull_margin), world);

        let mut report = TopUpReport {
            culled_platforms,
            culled_walls,
            ..Default::default()
        };

        while field.platforms.len() < tuning.target_platform_count {
            let spawn = self.next_spawn(tuning);
            field.attach_platform(spawn.platform, world);
            report.spawned_platforms += 1;
            if let Some(wall) = spawn.wall {
                field.attach_wall(wall, world);
                report.spawned_walls += 1;
            }
        }

        report
    }

    /// Synthesize the next platform above the previous one
    pub fn next_spawn(&mut self, tuning: &Tuning) -> Spawn {
        let width = self.pick_width(tuning);
        let prev = self.previous;
        let x = self.pick_x(width, prev.map(|p| p.x), tuning);
        let y = match prev {
            Some(p) => p.y + tuning.vertical_gap,
            None => tuning.first_platform_y,
        };

        let (kind, in_safe_zone) = self.pick_type(y, tuning);
        let id = self.next_entity_id();
        let platform = Platform::new(
            id,
            Vec2::new(x, y),
            width,
            tuning.platform_height,
            Self::build_kind(kind, x, width, tuning),
        );

        let mut wall = None;
        if kind == PlatformType::Normal && !in_safe_zone {
            let chance = wall_chance(difficulty(y, tuning.difficulty_max_height), tuning);
            if self.rng.random::<f32>() < chance {
                // Away from the incoming trajectory
                let prev_x = prev.map_or(tuning.mid_x(), |p| p.x);
                let side = if x >= prev_x { Side::Right } else { Side::Left };
                let wall_id = self.next_entity_id();
                wall = Some(Wall::beside(wall_id, &platform, side, tuning));
            }
        }

        log::debug!(
            "Spawned {:?} platform {} at ({:.1}, {:.1}) w={} wall={}",
            kind,
            id,
            x,
            y,
            width,
            wall.is_some()
        );

        self.previous = Some(Previous { x, y, kind });
        Spawn { platform, wall }
    }

    fn pick_width(&mut self, tuning: &Tuning) -> f32 {
        match &self.widths {
            Some(dist) => tuning.platform_widths[dist.sample(&mut self.rng)],
            None => tuning.platform_widths[0],
        }
    }

    /// Pick an x inside the frame and outside the safe gap around `prev_x`
    ///
    /// Draws uniformly over the union of the two allowed sub-intervals; falls
    /// back to the frame midpoint when neither exists.
    pub fn pick_x(&mut self, width: f32, prev_x: Option<f32>, tuning: &Tuning) -> f32 {
        let mid = tuning.mid_x();
        let Some(prev_x) = prev_x else {
            return mid;
        };
        let (lo, hi) = placement_bounds(width, tuning);
        if lo > hi {
            return mid;
        }

        let intervals = allowed_intervals(lo, hi, prev_x, tuning.safe_gap);
        let lengths = intervals.map(|i| i.map_or(0.0, |(a, b)| b - a));
        let total: f32 = lengths.iter().sum();

        match intervals {
            [None, None] => mid,
            _ if total <= 0.0 => intervals
                .iter()
                .flatten()
                .map(|&(a, _)| a)
                .next()
                .unwrap_or(mid),
            _ => {
                let mut roll = self.rng.random::<f32>() * total;
                for (interval, len) in intervals.iter().zip(lengths) {
                    if let Some((a, b)) = *interval {
                        if roll <= len {
                            return (a + roll).clamp(a, b);
                        }
                        roll -= len;
                    }
                }
                // Rounding left the roll past the last interval
                intervals
                    .iter()
                    .flatten()
                    .map(|&(_, b)| b)
                    .last()
                    .unwrap_or(mid)
            }
        }
    }

    /// Returns the type and whether it was forced by the safe start zone
    fn pick_type(&mut self, y: f32, tuning: &Tuning) -> (PlatformType, bool) {
        if self.early_count < tuning.early_safe_platforms {
            self.early_count += 1;
            return (PlatformType::Normal, true);
        }

        let kind = weighted_type_for_difficulty(y, tuning.difficulty_max_height, &mut self.rng);
        match self.previous {
            Some(prev) if prev.kind.is_special() => (PlatformType::Normal, false),
            _ => (kind, false),
        }
    }

    fn build_kind(kind: PlatformType, x: f32, width: f32, tuning: &Tuning) -> PlatformKind {
        match kind {
            PlatformType::Normal => PlatformKind::Normal,
            PlatformType::Collapsed => PlatformKind::Collapsed { started: false },
            PlatformType::Moving => {
                let (lo, hi) = placement_bounds(width, tuning);
                PlatformKind::Moving {
                    direction: 1.0,
                    speed: tuning.moving_speed,
                    left_limit: (x - tuning.moving_range).max(lo).min(x),
                    right_limit: (x + tuning.moving_range).min(hi).max(x),
                    is_stopped: false,
                }
            }
        }
    }
}
