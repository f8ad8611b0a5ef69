//! Landing detection from raw contacts
//!
//! Physics contacts are noisy: the bottle brushes platform sides, sensors
//! graze the underside, resting contacts flicker. [`classify`] reduces a
//! single contact to "the player came down on top of this platform" or
//! nothing. It is pure so it can be tested without a running world.

use glam::Vec2;

use super::category::Category;
use crate::physics::{BodyHandle, Contact};
use crate::tuning::Tuning;

/// Geometry of a platform, as needed to classify a contact against it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformFrame {
    pub center: Vec2,
    pub height: f32,
}

/// A confirmed top landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub platform: BodyHandle,
    pub point: Vec2,
}

/// Thresholds used by [`classify`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingRules {
    /// Normal (player → platform) y must be below this
    pub normal_threshold: f32,
    /// Or the contact must be this close to the platform's top edge
    pub top_tolerance: f32,
}

impl LandingRules {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            normal_threshold: tuning.landing_normal_threshold,
            top_tolerance: tuning.landing_top_tolerance,
        }
    }
}

impl Default for LandingRules {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

/// Orient a contact so `body_a` is the player's main body
///
/// Sensor bodies do not count as the player here.
pub fn player_side(contact: &Contact) -> Option<Contact> {
    if contact.body_a.category.contains(Category::PLAYER) {
        Some(*contact)
    } else if contact.body_b.category.contains(Category::PLAYER) {
        Some(contact.swapped())
    } else {
        None
    }
}

/// Decide whether `contact` is the player landing on a platform top
///
/// `lookup` resolves a platform body to its current geometry; bodies it does
/// not know are ignored. Either signal is enough: a steep normal, or a
/// contact point near the platform's top edge in its local frame.
pub fn classify<F>(contact: &Contact, lookup: F, rules: &LandingRules) -> Option<Landing>
where
    F: Fn(BodyHandle) -> Option<PlatformFrame>,
{
    let oriented = player_side(contact)?;
    let other = oriented.body_b;
    if !other.category.contains(Category::PLATFORM) {
        return None;
    }
    let frame = lookup(other.handle)?;

    let steep = oriented.normal.y < rules.normal_threshold;
    let local = oriented.point - frame.center;
    let near_top = local.y >= frame.height / 2.0 - rules.top_tolerance;

    if steep || near_top {
        Some(Landing {
            platform: other.handle,
            point: oriented.point,
        })
    } else {
        None
    }
}

/// Platform bodies involved in a contact, regardless of what touched them
pub fn platform_bodies(contact: &Contact) -> impl Iterator<Item = BodyHandle> {
    contact
        .bodies()
        .into_iter()
        .filter(|b| b.category.contains(Category::PLATFORM))
        .map(|b| b.handle)
}
