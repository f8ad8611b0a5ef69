//! Tick-keyed deferred effects
//!
//! The collapse sequence is the only delayed behavior in the game. Each step
//! is queued against the platform's id and generation; when it fires, the
//! caller checks the platform is still live and unchanged before acting.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Platform};
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Stages of a collapsing platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollapseStep {
    Shake,
    Fade,
    /// Stop colliding
    Vanish,
    /// Come back for reuse
    Respawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub due_tick: u64,
    pub platform_id: EntityId,
    pub generation: u32,
    pub step: CollapseStep,
}

impl ScheduledEvent {
    /// True if `platform` is the same incarnation this event was queued for
    pub fn targets(&self, platform: &Platform) -> bool {
        platform.id == self.platform_id && platform.generation == self.generation
    }
}

/// Pending events in firing order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    events: Vec<ScheduledEvent>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn schedule(&mut self, event: ScheduledEvent) {
        // Stable: events due on the same tick fire in scheduling order
        let pos = self.events.partition_point(|e| e.due_tick <= event.due_tick);
        self.events.insert(pos, event);
    }

    /// Queue the full collapse sequence starting at `now`
    pub fn schedule_collapse(&mut self, now: u64, platform: &Platform, tuning: &Tuning) {
        let shake_at = now + secs_to_ticks(tuning.collapse_delay_secs);
        let fade_at = shake_at + secs_to_ticks(tuning.collapse_shake_secs);
        let vanish_at = fade_at + secs_to_ticks(tuning.collapse_fade_secs);
        let respawn_at = vanish_at + secs_to_ticks(tuning.collapse_respawn_secs);

        for (due_tick, step) in [
            (shake_at, CollapseStep::Shake),
            (fade_at, CollapseStep::Fade),
            (vanish_at, CollapseStep::Vanish),
            (respawn_at, CollapseStep::Respawn),
        ] {
            self.schedule(ScheduledEvent {
                due_tick,
                platform_id: platform.id,
                generation: platform.generation,
                step,
            });
        }
    }

    /// Remove and return every event due at or before `now`
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledEvent> {
        let split = self.events.partition_point(|e| e.due_tick <= now);
        self.events.drain(..split).collect()
    }

    /// Next tick at which something fires
    pub fn next_due(&self) -> Option<u64> {
        self.events.first().map(|e| e.due_tick)
    }
}
