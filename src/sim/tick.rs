//! Fixed timestep simulation tick
//!
//! One call advances the run by exactly one frame. Order within a frame:
//! command, physics, track scroll and scoring, collision, rate guard,
//! particles. The rate guard runs even on a collision frame so an injected
//! score can't hide behind a crash.

use glam::Vec2;
use rand::Rng;

use super::collision::first_hit;
use super::state::{
    JumpKind, Particle, RunPhase, RunState, TickEvent, MAX_PARTICLES, PARTICLE_GRAVITY,
};
use super::track::Difficulty;
use crate::consts::*;

/// Player intent for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Jump - or, after game over, acknowledge the result
    Jump,
    /// Raise the shield if a charge is available
    ActivateShield,
    /// Close out the day; handled by the session layer, a no-op here
    EndDay,
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut RunState, cmd: Option<Command>) -> Vec<TickEvent> {
    let mut events = Vec::new();

    // After game over only the cosmetics keep moving
    if state.phase == RunPhase::GameOver {
        update_particles(state);
        return events;
    }

    state.ticks += 1;

    // Difficulty is read once at frame top; a point earned this frame takes
    // effect next frame
    let diff = Difficulty::for_score(state.score);

    match cmd {
        Some(Command::Jump) => {
            if let Some(kind) = state.player.jump() {
                events.push(TickEvent::Jumped { double: kind == JumpKind::Air });
                spawn_jump_burst(state, kind);
            }
        }
        Some(Command::ActivateShield) => {
            if state.activate_shield() {
                events.push(TickEvent::ShieldActivated);
            }
        }
        Some(Command::EndDay) | None => {}
    }

    state.player.apply_physics();
    state.player.record_trail();

    let passed = state.track.advance(diff, &mut state.rng);
    state.score += passed;
    for _ in 0..passed {
        events.push(TickEvent::ObstaclePassed);
    }

    if !state.player.shield_active() {
        if let Some(idx) = first_hit(&state.player.bounds(), &state.track.obstacles) {
            state.phase = RunPhase::GameOver;
            events.push(TickEvent::Collided);
            log::info!(
                "run over: hit obstacle {} at score {} after {} ticks",
                idx,
                state.score,
                state.ticks
            );
        }
    }

    // Checked even when the collision above already ended the run; a flagged
    // score must not settle as a normal result
    if !state.cheated && state.guard.exceeded(state.score, state.elapsed_secs()) {
        state.cheated = true;
        state.phase = RunPhase::GameOver;
        events.push(TickEvent::CheatFlagged);
        log::warn!(
            "cheat flagged: score {} in {:.2}s exceeds {} pts/s",
            state.score,
            state.elapsed_secs(),
            state.guard.threshold
        );
    }

    update_particles(state);
    events
}

/// Burst of particles for a jump. Ground jumps kick up gray dust at the feet,
/// air jumps pop blue at the midriff.
fn spawn_jump_burst(state: &mut RunState, kind: JumpKind) {
    let (count, color, origin_y) = match kind {
        JumpKind::Ground => (10, [150, 150, 150], state.player.y + PLAYER_H),
        JumpKind::Air => (8, [100, 150, 255], state.player.y + PLAYER_H / 2.0),
    };
    let origin = Vec2::new(PLAYER_X + PLAYER_W / 2.0, origin_y);

    for _ in 0..count {
        let particle = Particle {
            pos: origin,
            vel: Vec2::new(
                state.rng.random_range(-3.0..3.0),
                state.rng.random_range(-6.0..-1.0),
            ),
            color,
            life: state.rng.random_range(20..=60),
            size: state.rng.random_range(2..=8) as f32,
        };
        if state.particles.len() >= MAX_PARTICLES {
            state.particles.remove(0);
        }
        state.particles.push(particle);
    }
}

fn update_particles(state: &mut RunState) {
    for p in &mut state.particles {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life = p.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}
