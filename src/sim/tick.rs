//! Fixed timestep simulation tick
//!
//! One call per rendered frame. The order matters:
//! input, platform patrol, physics, contact reactions, scoring, camera,
//! generation, collapse timers, then the game over check.

use super::state::{GameState, Gesture};
use crate::physics::{ContactEvent, PhysicsWorld};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Drag released this frame
    pub gesture: Option<Gesture>,
}

/// Advance the game by one frame
pub fn tick<W: PhysicsWorld + ?Sized>(state: &mut GameState, input: &TickInput, world: &mut W, dt: f32) {
    if state.is_game_over() {
        return;
    }
    state.time_ticks += 1;

    if let Some(gesture) = input.gesture {
        state.apply_gesture(gesture);
    }

    // Platforms released by a contact end last frame start moving again here
    state.patrol_platforms(dt, world);

    let mut contacts = Vec::new();
    world.step(&mut state.player, dt, &mut contacts);
    for event in &contacts {
        match event {
            ContactEvent::Begin(contact) => {
                state.handle_contact_begin(contact);
            }
            ContactEvent::End(contact) => state.handle_contact_end(contact),
        }
    }

    state.evaluate_score();
    state.follow_camera();
    state.top_up(world);
    state.run_timers(world);
    state.check_game_over();
}
