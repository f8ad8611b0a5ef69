//! Physics interaction categories
//!
//! Five power-of-two flags, combined with `|` into category, contact-test and
//! collision masks the same way the physics engine expects them.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// A set of physics categories
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Category: u32 {
        const PLAYER = 1 << 0;
        const PLATFORM = 1 << 1;
        const BOTTOM_SENSOR = 1 << 2;
        const TOP_SENSOR = 1 << 3;
        const WALL = 1 << 4;
    }
}

/// What the bottle and both sensors look for
const SOLIDS: Category = Category::PLATFORM.union(Category::WALL);

/// Category plus the masks deciding what a body reports and collides with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Masks {
    pub category: Category,
    pub contact_test: Category,
    pub collision: Category,
}

impl Masks {
    /// Bottle body: collides with platforms and walls
    pub const fn player() -> Self {
        Self {
            category: Category::PLAYER,
            contact_test: SOLIDS,
            collision: SOLIDS,
        }
    }

    pub const fn platform() -> Self {
        Self {
            category: Category::PLATFORM,
            contact_test: Category::PLAYER,
            collision: Category::PLAYER,
        }
    }

    pub const fn wall() -> Self {
        Self {
            category: Category::WALL,
            contact_test: Category::PLAYER,
            collision: Category::PLAYER,
        }
    }

    /// Sensors report contacts but never push anything
    pub const fn bottom_sensor() -> Self {
        Self {
            category: Category::BOTTOM_SENSOR,
            contact_test: SOLIDS,
            collision: Category::empty(),
        }
    }

    pub const fn top_sensor() -> Self {
        Self {
            category: Category::TOP_SENSOR,
            contact_test: SOLIDS,
            collision: Category::empty(),
        }
    }

    /// Either body's collision mask selects the other's category
    pub fn collides_with(&self, other: &Masks) -> bool {
        self.collision.intersects(other.category) || other.collision.intersects(self.category)
    }

    /// Either body asks to be told about touching the other
    pub fn reports_contact_with(&self, other: &Masks) -> bool {
        self.contact_test.intersects(other.category) || other.contact_test.intersects(self.category)
    }
}
