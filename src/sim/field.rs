//! Live entity lists
//!
//! The field exclusively owns every platform and wall in play. Entities are
//! kept in spawn order, so the last platform is always the highest.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Platform, Wall};
use crate::physics::{BodyHandle, PhysicsWorld};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Field {
    pub platforms: Vec<Platform>,
    pub walls: Vec<Wall>,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(&self, id: EntityId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn platform_mut(&mut self, id: EntityId) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.id == id)
    }

    pub fn platform_by_body(&self, handle: BodyHandle) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.body == Some(handle))
    }

    pub fn platform_by_body_mut(&mut self, handle: BodyHandle) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.body == Some(handle))
    }

    /// y of the lowest live platform
    pub fn lowest_platform_y(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.pos.y).reduce(f32::min)
    }

    /// Register a new platform and give it a physics body
    pub fn attach_platform<W: PhysicsWorld + ?Sized>(&mut self, mut platform: Platform, world: &mut W) {
        platform.body = Some(world.insert_static(platform.static_body()));
        self.platforms.push(platform);
    }

    pub fn attach_wall<W: PhysicsWorld + ?Sized>(&mut self, mut wall: Wall, world: &mut W) {
        wall.body = Some(world.insert_static(wall.static_body()));
        self.walls.push(wall);
    }

    /// Remove every entity at or below `cull_y`, detaching their bodies.
    /// Returns (platforms, walls) removed.
    pub fn cull_below<W: PhysicsWorld + ?Sized>(&mut self, cull_y: f32, world: &mut W) -> (usize, usize) {
        let before = (self.platforms.len(), self.walls.len());

        self.platforms.retain(|p| {
            if p.pos.y > cull_y {
                return true;
            }
            if let Some(handle) = p.body {
                world.remove_body(handle);
            }
            log::debug!("Culled platform {} at y={}", p.id, p.pos.y);
            false
        });
        self.walls.retain(|w| {
            if w.pos.y > cull_y {
                return true;
            }
            if let Some(handle) = w.body {
                world.remove_body(handle);
            }
            false
        });

        (
            before.0 - self.platforms.len(),
            before.1 - self.walls.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::physics::ArcadeWorld;
    use crate::sim::entity::{PlatformKind, Side};
    use crate::tuning::Tuning;

    #[test]
    fn test_cull_removes_walls_with_their_bodies() {
        let tuning = Tuning::default();
        let mut world = ArcadeWorld::new(&tuning);
        let mut field = Field::new();
        for (id, y) in [(1, 100.0), (3, 500.0)] {
            let platform = Platform::new(id, Vec2::new(200.0, y), 120.0, 20.0, PlatformKind::Normal);
            let wall = Wall::beside(id + 1, &platform, Side::Left, &tuning);
            field.attach_platform(platform, &mut world);
            field.attach_wall(wall, &mut world);
        }
        let low_wall = field.walls[0].body;
        assert_eq!(world.body_count(), 4);

        // Between the low wall and the high platform
        assert_eq!(field.cull_below(300.0, &mut world), (1, 1));
        assert_eq!(field.platforms[0].id, 3);
        assert_eq!(field.walls[0].anchor, 3);
        assert_eq!(world.body_count(), 2);
        assert!(low_wall.is_some_and(|h| world.body(h).is_none()));
    }
}
