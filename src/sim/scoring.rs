//! Landing score state machine
//!
//! A landing arms the machine. The first tick the bottle comes fully to rest
//! runs exactly one evaluation: a platform pays out once, ever, with a bonus
//! for landing upright or on the cap.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Platform, Player};
use crate::folded_degrees;

/// How the bottle came to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingStyle {
    /// Tipped over
    Normal,
    /// Upright, after a flip
    Standing,
    /// Upside down on its cap
    BottleCap,
}

impl LandingStyle {
    /// Classify a rotation (radians) against 0° and 180° within `tolerance_deg`
    pub fn from_rotation(radians: f32, tolerance_deg: f32) -> Self {
        let angle = folded_degrees(radians);
        if angle <= tolerance_deg || angle >= 360.0 - tolerance_deg {
            LandingStyle::Standing
        } else if (angle - 180.0).abs() <= tolerance_deg {
            LandingStyle::BottleCap
        } else {
            LandingStyle::Normal
        }
    }

    pub fn base_points(self) -> u64 {
        match self {
            LandingStyle::Normal => 1,
            LandingStyle::Standing => 2,
            LandingStyle::BottleCap => 3,
        }
    }
}

/// Whether a landing is waiting to be scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringPhase {
    Armed,
    Idle,
}

/// Result of the single evaluation that ends a landing episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    Awarded {
        platform: EntityId,
        style: LandingStyle,
        points: u64,
    },
    /// Platform already paid out
    Repeat { platform: EntityId },
    /// The candidate is gone (culled) or was never set
    NoCandidate,
}

/// Running score and landing bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub best_score: u64,
    /// Always 1 for now; reset/preserve hooks exist for a future combo system
    pub score_multiplier: u64,
    pub keep_score_multiplier: bool,
    /// Armed flag: one evaluation pending
    pub check_multiplier: bool,
    /// Platform being evaluated; an id, never an owning reference
    pub candidate: Option<EntityId>,
}

impl ScoreState {
    pub fn new(best_score: u64) -> Self {
        Self {
            score: 0,
            best_score,
            score_multiplier: 1,
            keep_score_multiplier: true,
            check_multiplier: false,
            candidate: None,
        }
    }

    pub fn phase(&self) -> ScoringPhase {
        if self.check_multiplier {
            ScoringPhase::Armed
        } else {
            ScoringPhase::Idle
        }
    }

    /// A top landing happened on `platform`
    pub fn arm(&mut self, platform: EntityId) {
        self.candidate = Some(platform);
        self.check_multiplier = true;
    }

    /// A fresh jump started
    pub fn on_launch(&mut self) {
        self.keep_score_multiplier = false;
    }

    /// Run the pending evaluation if the player has settled
    ///
    /// Returns `None` while idle or while the player is still moving.
    pub fn evaluate(
        &mut self,
        player: &Player,
        platforms: &mut [Platform],
        settle_epsilon: f32,
        tolerance_deg: f32,
    ) -> Option<Evaluation> {
        if !self.check_multiplier || !player.is_settled(settle_epsilon) {
            return None;
        }
        self.check_multiplier = false;

        let candidate = self
            .candidate
            .take()
            .and_then(|id| platforms.iter_mut().find(|p| p.id == id));

        let Some(platform) = candidate else {
            return Some(Evaluation::NoCandidate);
        };

        if platform.has_been_landed_on {
            if !self.keep_score_multiplier {
                self.score_multiplier = 1;
            }
            self.keep_score_multiplier = true;
            return Some(Evaluation::Repeat {
                platform: platform.id,
            });
        }

        platform.has_been_landed_on = true;
        let style = LandingStyle::from_rotation(player.rotation, tolerance_deg);
        let points = style.base_points() * self.score_multiplier;
        self.add_points(points);
        self.keep_score_multiplier = true;

        log::debug!(
            "Landed {:?} on platform {} for {} (score {})",
            style,
            platform.id,
            points,
            self.score
        );

        Some(Evaluation::Awarded {
            platform: platform.id,
            style,
            points,
        })
    }

    fn add_points(&mut self, points: u64) {
        self.score += points;
        if self.score > self.best_score {
            self.best_score = self.score;
        }
    }

    /// True if this run beat the best score it started with
    pub fn is_new_best(&self, previous_best: u64) -> bool {
        self.score > previous_best
    }
}
