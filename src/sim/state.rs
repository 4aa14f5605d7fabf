//! Run state and core simulation types
//!
//! Everything a tick reads or writes lives here. A `RunState` plus a command
//! script fully determines a run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::anticheat::RateGuard;
use super::collision::Rect;
use super::track::Track;
use crate::consts::*;

/// Trail points kept per player, newest first
pub const TRAIL_LENGTH: usize = 20;
/// Hard cap on live particles; oldest are dropped past this
pub const MAX_PARTICLES: usize = 256;
/// Downward pull on particles, px per tick squared
pub const PARTICLE_GRAVITY: f32 = 0.2;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Run ended, awaiting acknowledgement
    GameOver,
}

/// Things a tick can report back to the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// A jump happened; `double` marks the mid-air variety
    Jumped { double: bool },
    ShieldActivated,
    /// An obstacle retired off the left edge and scored a point
    ObstaclePassed,
    Collided,
    /// Score rate tripped the plausibility guard
    CheatFlagged,
}

/// Which kind of jump a press produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Air,
}

/// The runner: fixed x, simulated y
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top edge
    pub y: f32,
    pub vel_y: f32,
    pub grounded: bool,
    /// Mid-air jumps left before the next landing
    pub extra_jumps: u8,
    /// Ticks of shield remaining, 0 = down
    pub shield_ticks: u32,
    /// Recent positions, newest first
    pub trail: Vec<Vec2>,
}

impl Player {
    /// Standing at rest on the ground
    pub fn new() -> Self {
        Self {
            y: GROUND_Y - PLAYER_H,
            vel_y: 0.0,
            grounded: true,
            extra_jumps: 1,
            shield_ticks: 0,
            trail: Vec::new(),
        }
    }

    /// Collision box
    pub fn bounds(&self) -> Rect {
        Rect::new(PLAYER_X, self.y, PLAYER_W, PLAYER_H)
    }

    #[inline]
    pub fn shield_active(&self) -> bool {
        self.shield_ticks > 0
    }

    /// Try to jump. Grounded jumps are free; a mid-air jump consumes one
    /// charge and launches weaker. Returns what happened, `None` if nothing.
    pub fn jump(&mut self) -> Option<JumpKind> {
        if self.grounded {
            self.vel_y = BASE_JUMP_POWER;
            self.grounded = false;
            Some(JumpKind::Ground)
        } else if self.extra_jumps > 0 {
            self.vel_y = BASE_JUMP_POWER * AIR_JUMP_FACTOR;
            self.extra_jumps -= 1;
            Some(JumpKind::Air)
        } else {
            None
        }
    }

    /// One tick of gravity and landing. Landing restores the air-jump charge
    /// and zeroes velocity. Also counts down the shield.
    pub fn apply_physics(&mut self) {
        self.vel_y += GRAVITY;
        self.y += self.vel_y;

        let rest = GROUND_Y - PLAYER_H;
        if self.y >= rest {
            self.y = rest;
            self.vel_y = 0.0;
            self.grounded = true;
            self.extra_jumps = 1;
        }

        self.shield_ticks = self.shield_ticks.saturating_sub(1);
    }

    /// Push the current position onto the trail, newest first
    pub fn record_trail(&mut self) {
        self.trail.insert(0, Vec2::new(PLAYER_X, self.y));
        self.trail.truncate(TRAIL_LENGTH);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// A cosmetic burst particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    /// Ticks until removal
    pub life: u32,
    pub size: f32,
}

/// Complete state of one run. Never persisted mid-run; a run either finishes
/// and settles through the stores or it never happened.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Seed this run was created from
    pub seed: u64,
    /// Session RNG; all randomness flows through here
    pub rng: Pcg32,
    pub phase: RunPhase,
    pub score: u32,
    /// Ticks simulated so far
    pub ticks: u64,
    pub player: Player,
    pub track: Track,
    /// Shield activations left this run
    pub shield_charges: u32,
    /// Latched once the rate guard trips
    pub cheated: bool,
    pub guard: RateGuard,
    pub particles: Vec<Particle>,
}

impl RunState {
    pub fn new(seed: u64, shield_charges: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Running,
            score: 0,
            ticks: 0,
            player: Player::new(),
            track: Track::new(),
            shield_charges,
            cheated: false,
            guard: RateGuard::default(),
            particles: Vec::new(),
        }
    }

    /// Logical run time in seconds, derived from the tick counter
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        crate::ticks_to_secs(self.ticks)
    }

    /// Spend a shield charge. Refuses while one is already up.
    pub fn activate_shield(&mut self) -> bool {
        if self.shield_charges == 0 || self.player.shield_active() {
            return false;
        }
        self.shield_charges -= 1;
        self.player.shield_ticks = SHIELD_DURATION_TICKS;
        true
    }
}

/// Backdrop variant for a score, cycling through ten looks every 100 points
pub fn backdrop_phase(score: u32) -> u32 {
    (score / 10) % 10 + 1
}
