//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No storage, clock, or presentation dependencies
//!
//! The same seed and command script always replay to the same run.

pub mod anticheat;
pub mod collision;
pub mod state;
pub mod tick;
pub mod track;

pub use anticheat::RateGuard;
pub use collision::{first_hit, Rect};
pub use state::{
    backdrop_phase, JumpKind, Particle, Player, RunPhase, RunState, TickEvent, MAX_PARTICLES,
    TRAIL_LENGTH,
};
pub use tick::{tick, Command};
pub use track::{Difficulty, Obstacle, Track};
