//! Entity catalog: player, platforms and wall obstacles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::physics::{BodyHandle, StaticBody};
use crate::tuning::Tuning;

/// Stable identity of a platform or wall within one game
pub type EntityId = u32;

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    Normal,
    Moving,
    Collapsed,
}

impl PlatformType {
    /// Moving and Collapsed platforms may never follow each other
    pub fn is_special(self) -> bool {
        matches!(self, PlatformType::Moving | PlatformType::Collapsed)
    }
}

/// Per-variant platform state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    /// Patrols between `left_limit` and `right_limit`
    Moving {
        direction: f32,
        speed: f32,
        left_limit: f32,
        right_limit: f32,
        is_stopped: bool,
    },
    /// Falls away after being landed on
    Collapsed { started: bool },
}

impl PlatformKind {
    pub fn platform_type(&self) -> PlatformType {
        match self {
            PlatformKind::Normal => PlatformType::Normal,
            PlatformKind::Moving { .. } => PlatformType::Moving,
            PlatformKind::Collapsed { .. } => PlatformType::Collapsed,
        }
    }
}

/// Visual stage of a platform, read by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Appearance {
    #[default]
    Solid,
    Shaking,
    Fading,
    Hidden,
}

/// A platform entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    /// Bumped whenever the platform is reset; timers keyed to an older value are stale
    pub generation: u32,
    /// Center position
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
    /// One-shot scoring flag
    pub has_been_landed_on: bool,
    pub collidable: bool,
    pub appearance: Appearance,
    #[serde(skip)]
    pub body: Option<BodyHandle>,
}

impl Platform {
    pub fn new(id: EntityId, pos: Vec2, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            id,
            generation: 0,
            pos,
            width,
            height,
            kind,
            has_been_landed_on: false,
            collidable: true,
            appearance: Appearance::Solid,
            body: None,
        }
    }

    pub fn platform_type(&self) -> PlatformType {
        self.kind.platform_type()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Convert a world point into this platform's local frame
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        point - self.pos
    }

    /// Physics body description for this platform
    pub fn static_body(&self) -> StaticBody {
        StaticBody::platform(self.pos, Vec2::new(self.width, self.height))
    }

    /// Advance a moving platform's patrol. Returns true if it moved.
    pub fn patrol(&mut self, dt: f32) -> bool {
        let PlatformKind::Moving {
            direction,
            speed,
            left_limit,
            right_limit,
            is_stopped,
        } = &mut self.kind
        else {
            return false;
        };
        if *is_stopped || *speed == 0.0 {
            return false;
        }

        let mut x = self.pos.x + *direction * *speed * dt;
        if x >= *right_limit {
            x = *right_limit;
            *direction = -1.0;
        } else if x <= *left_limit {
            x = *left_limit;
            *direction = 1.0;
        }
        self.pos.x = x;
        true
    }

    /// Hold or release a moving platform. No-op for other variants.
    pub fn set_stopped(&mut self, stopped: bool) {
        if let PlatformKind::Moving { is_stopped, .. } = &mut self.kind {
            *is_stopped = stopped;
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.kind, PlatformKind::Moving { is_stopped: true, .. })
    }

    /// Mark the collapse as started. Returns false if it already was.
    pub fn start_collapse(&mut self) -> bool {
        match &mut self.kind {
            PlatformKind::Collapsed { started } if !*started => {
                *started = true;
                true
            }
            _ => false,
        }
    }

    pub fn collapse_started(&self) -> bool {
        matches!(self.kind, PlatformKind::Collapsed { started: true })
    }

    /// Bring a collapsed platform back for reuse
    ///
    /// Clears both one-shot flags so the platform can collapse and score again.
    pub fn reset_after_collapse(&mut self) {
        if let PlatformKind::Collapsed { started } = &mut self.kind {
            *started = false;
        }
        self.has_been_landed_on = false;
        self.collidable = true;
        self.appearance = Appearance::Solid;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Which side of its platform a wall stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// A wall obstacle standing on one end of a Normal platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: EntityId,
    /// Platform the wall was spawned with
    pub anchor: EntityId,
    pub side: Side,
    pub pos: Vec2,
    pub size: Vec2,
    pub restitution: f32,
    #[serde(skip)]
    pub body: Option<BodyHandle>,
}

impl Wall {
    /// Place a wall at the `side` end of `platform`, standing on its top
    pub fn beside(id: EntityId, platform: &Platform, side: Side, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.wall_width, tuning.wall_height);
        let inset = platform.width / 2.0 - size.x / 2.0;
        let x = match side {
            Side::Left => platform.pos.x - inset,
            Side::Right => platform.pos.x + inset,
        };
        let y = platform.top() + size.y / 2.0;
        Self {
            id,
            anchor: platform.id,
            side,
            pos: Vec2::new(x, y),
            size,
            restitution: tuning.wall_restitution,
            body: None,
        }
    }

    pub fn static_body(&self) -> StaticBody {
        StaticBody::wall(self.pos, self.size, self.restitution)
    }
}

/// The bottle
///
/// Built only through [`Player::new`]; there is no way to restore one from
/// serialized data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rotation in radians (counter-clockwise, 0 = upright)
    pub rotation: f32,
    pub angular_vel: f32,
    pub size: Vec2,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    /// Vertical speed below the threshold: a new launch is allowed
    pub fn is_idle(&self, threshold: f32) -> bool {
        self.vel.y.abs() < threshold
    }

    /// Both axes at rest: a pending landing can be scored
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.vel.x.abs() < epsilon && self.vel.y.abs() < epsilon
    }

    /// Launch from a drag gesture. Pulling down-left throws up-right.
    pub fn launch(&mut self, drag_start: Vec2, drag_end: Vec2, tuning: &Tuning) {
        let drag = drag_end - drag_start;
        self.vel = Vec2::new(
            -drag.x * tuning.launch_scale_x,
            (-drag.y * tuning.launch_scale_y).min(tuning.max_launch_speed),
        );
        self.angular_vel = drag.x * tuning.launch_spin_per_unit;
    }

    /// Mid-air flick: a leftward drag spins counter-clockwise
    pub fn spin(&mut self, drag_start: Vec2, drag_end: Vec2, boost: f32) {
        if drag_end.x < drag_start.x {
            self.angular_vel += boost;
        } else {
            self.angular_vel -= boost;
        }
    }

    /// Kill most of the velocity so landings stick instead of bouncing
    pub fn dampen(&mut self, factor: f32) {
        self.vel *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(x: f32) -> Platform {
        Platform::new(
            1,
            Vec2::new(x, 0.0),
            100.0,
            20.0,
            PlatformKind::Moving {
                direction: 1.0,
                speed: 50.0,
                left_limit: x - 50.0,
                right_limit: x + 50.0,
                is_stopped: false,
            },
        )
    }

    #[test]
    fn test_patrol_reverses_at_limits() {
        let mut p = moving(200.0);
        for _ in 0..70 {
            p.patrol(1.0 / 60.0);
        }
        // 70 ticks at 50/s = 58 units, clamped at the right limit then heading back
        assert!(p.pos.x <= 250.0);
        assert!(matches!(p.kind, PlatformKind::Moving { direction, .. } if direction < 0.0));
    }

    #[test]
    fn test_stopped_platform_does_not_move() {
        let mut p = moving(200.0);
        p.set_stopped(true);
        assert!(!p.patrol(0.5));
        assert_eq!(p.pos.x, 200.0);
        p.set_stopped(false);
        assert!(p.patrol(0.5));
        assert_eq!(p.pos.x, 225.0);
    }

    #[test]
    fn test_collapse_is_one_shot() {
        let mut p = Platform::new(
            2,
            Vec2::ZERO,
            100.0,
            20.0,
            PlatformKind::Collapsed { started: false },
        );
        assert!(p.start_collapse());
        assert!(!p.start_collapse());
        p.has_been_landed_on = true;
        p.collidable = false;

        p.reset_after_collapse();
        assert!(!p.collapse_started());
        assert!(!p.has_been_landed_on);
        assert!(p.collidable);
        assert_eq!(p.generation, 1);
    }

    #[test]
    fn test_normal_platform_ignores_variant_calls() {
        let mut p = Platform::new(3, Vec2::ZERO, 100.0, 20.0, PlatformKind::Normal);
        p.set_stopped(true);
        assert!(!p.is_stopped());
        assert!(!p.start_collapse());
        assert!(!p.patrol(1.0));
    }

    #[test]
    fn test_launch_mapping_caps_vertical_speed() {
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::ZERO);
        // Drag 50 left and 300 down
        player.launch(Vec2::new(100.0, 400.0), Vec2::new(50.0, 100.0), &tuning);
        assert_eq!(player.vel.x, 200.0);
        assert_eq!(player.vel.y, 1400.0);
        assert!((player.angular_vel - (-7.5)).abs() < 1e-5);
    }

    #[test]
    fn test_spin_direction() {
        let mut player = Player::new(Vec2::ZERO);
        player.spin(Vec2::new(100.0, 0.0), Vec2::new(50.0, 0.0), 5.0);
        assert_eq!(player.angular_vel, 5.0);
        player.spin(Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), 5.0);
        assert_eq!(player.angular_vel, 0.0);
    }

    #[test]
    fn test_wall_stands_on_far_end() {
        let tuning = Tuning::default();
        let platform = Platform::new(7, Vec2::new(200.0, 400.0), 120.0, 20.0, PlatformKind::Normal);
        let wall = Wall::beside(8, &platform, Side::Right, &tuning);
        assert_eq!(wall.anchor, 7);
        assert_eq!(wall.pos.x, 200.0 + 60.0 - 10.0);
        assert_eq!(wall.pos.y, 410.0 + 50.0);
        let wall = Wall::beside(9, &platform, Side::Left, &tuning);
        assert_eq!(wall.pos.x, 200.0 - 50.0);
    }

    #[test]
    fn test_idle_and_settled() {
        let mut player = Player::new(Vec2::ZERO);
        player.vel = Vec2::new(30.0, 0.5);
        assert!(player.is_idle(1.0));
        assert!(!player.is_settled(1e-4));
        player.dampen(0.0);
        assert!(player.is_settled(1e-4));
    }
}
