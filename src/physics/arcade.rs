//! Axis-aligned reference physics
//!
//! Treats the bottle as an upright box and every platform and wall as a
//! static box. Good enough to drive the game loop headless: gravity,
//! restitution, resting contacts, frame-edge bounces and begin/end contact
//! events. Rotation is integrated but never affects collision.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{BodyHandle, BodyRef, Contact, ContactEvent, PhysicsWorld, StaticBody};
use crate::sim::category::{Category, Masks};
use crate::sim::entity::Player;
use crate::tuning::Tuning;

/// Vertical speed below which a bounce off a surface is killed outright
pub const REST_SPEED: f32 = 30.0;

#[derive(Debug, Clone)]
struct Slot {
    body: StaticBody,
    collidable: bool,
}

/// Headless [`PhysicsWorld`] implementation
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    gravity: Vec2,
    min_x: f32,
    max_x: f32,
    edge_restitution: f32,
    bodies: BTreeMap<BodyHandle, Slot>,
    next_handle: u32,
    /// Bodies the player touched at the end of the previous step
    touching: BTreeMap<BodyHandle, Contact>,
}

impl ArcadeWorld {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            gravity: tuning.gravity_px(),
            min_x: tuning.frame_min_x,
            max_x: tuning.frame_max_x,
            edge_restitution: tuning.edge_restitution,
            bodies: BTreeMap::new(),
            next_handle: BodyHandle::PLAYER.0 + 1,
            touching: BTreeMap::new(),
        }
    }

    /// Number of static bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&StaticBody> {
        self.bodies.get(&handle).map(|s| &s.body)
    }

    pub fn is_collidable(&self, handle: BodyHandle) -> Option<bool> {
        self.bodies.get(&handle).map(|s| s.collidable)
    }

    /// True if the player ended the last step touching `handle`
    pub fn is_touching(&self, handle: BodyHandle) -> bool {
        self.touching.contains_key(&handle)
    }

    fn bounce_off_edges(&self, player: &mut Player) {
        let half = player.size.x / 2.0;
        if player.pos.x - half < self.min_x {
            player.pos.x = self.min_x + half;
            player.vel.x = player.vel.x.abs() * self.edge_restitution;
        } else if player.pos.x + half > self.max_x {
            player.pos.x = self.max_x - half;
            player.vel.x = -player.vel.x.abs() * self.edge_restitution;
        }
    }
}

/// Push the player out of `body` along the shallow axis
///
/// Returns the contact (player → body) if the boxes overlap.
fn resolve(player: &mut Player, handle: BodyHandle, body: &StaticBody) -> Option<Contact> {
    let half_p = player.size / 2.0;
    let half_b = body.size / 2.0;
    let delta = player.pos - body.center;
    let overlap = half_p + half_b - delta.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return None;
    }

    let point;
    let normal;
    if overlap.y <= overlap.x {
        let clamped_x = player.pos.x.clamp(body.center.x - half_b.x, body.center.x + half_b.x);
        if delta.y > 0.0 {
            // On top
            player.pos.y += overlap.y;
            if player.vel.y < 0.0 {
                player.vel.y = -player.vel.y * body.restitution;
            }
            if player.vel.y.abs() < REST_SPEED {
                player.vel.y = 0.0;
                player.vel.x *= 1.0 - body.friction.clamp(0.0, 1.0);
                if player.vel.x.abs() < f32::EPSILON {
                    player.vel.x = 0.0;
                }
                player.angular_vel = 0.0;
            }
            point = Vec2::new(clamped_x, body.center.y + half_b.y);
            normal = Vec2::NEG_Y;
        } else {
            player.pos.y -= overlap.y;
            if player.vel.y > 0.0 {
                player.vel.y = -player.vel.y * body.restitution;
            }
            point = Vec2::new(clamped_x, body.center.y - half_b.y);
            normal = Vec2::Y;
        }
    } else {
        let clamped_y = player.pos.y.clamp(body.center.y - half_b.y, body.center.y + half_b.y);
        if delta.x > 0.0 {
            player.pos.x += overlap.x;
            if player.vel.x < 0.0 {
                player.vel.x = -player.vel.x * body.restitution;
            }
            point = Vec2::new(body.center.x + half_b.x, clamped_y);
            normal = Vec2::NEG_X;
        } else {
            player.pos.x -= overlap.x;
            if player.vel.x > 0.0 {
                player.vel.x = -player.vel.x * body.restitution;
            }
            point = Vec2::new(body.center.x - half_b.x, clamped_y);
            normal = Vec2::X;
        }
    }

    Some(Contact {
        body_a: BodyRef {
            handle: BodyHandle::PLAYER,
            category: Category::PLAYER,
        },
        body_b: BodyRef {
            handle,
            category: body.masks.category,
        },
        point,
        normal,
    })
}

impl PhysicsWorld for ArcadeWorld {
    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn insert_static(&mut self, body: StaticBody) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            Slot {
                body,
                collidable: true,
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle);
        self.touching.remove(&handle);
    }

    fn set_position(&mut self, handle: BodyHandle, center: Vec2) {
        if let Some(slot) = self.bodies.get_mut(&handle) {
            slot.body.center = center;
        }
    }

    fn set_collidable(&mut self, handle: BodyHandle, collidable: bool) {
        if let Some(slot) = self.bodies.get_mut(&handle) {
            slot.collidable = collidable;
        }
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.touching.clear();
    }

    fn step(&mut self, player: &mut Player, dt: f32, events: &mut Vec<ContactEvent>) {
        player.vel += self.gravity * dt;
        player.pos += player.vel * dt;
        player.rotation += player.angular_vel * dt;
        self.bounce_off_edges(player);

        let player_masks = Masks::player();
        let mut now = BTreeMap::new();
        for (&handle, slot) in &self.bodies {
            if !slot.collidable || !player_masks.collides_with(&slot.body.masks) {
                continue;
            }
            if let Some(contact) = resolve(player, handle, &slot.body) {
                if player_masks.reports_contact_with(&slot.body.masks) {
                    now.insert(handle, contact);
                }
            }
        }

        for (handle, contact) in &now {
            if !self.touching.contains_key(handle) {
                events.push(ContactEvent::Begin(*contact));
            }
        }
        for (handle, contact) in &self.touching {
            if !now.contains_key(handle) {
                events.push(ContactEvent::End(*contact));
            }
        }
        self.touching = now;
    }
}
