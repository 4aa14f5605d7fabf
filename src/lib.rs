//! Tap Dash - wager-backed side-scrolling runner core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, track, collision, rate guard)
//! - `session`: Session lifecycle and the fixed-step loop driver
//! - `economy`: Daily pot, daily winner, settlement
//! - `shop`: Power-up purchases
//! - `store`: Account and score-history persistence
//! - `tuning`: Data-driven economy balance

pub mod economy;
pub mod session;
pub mod shop;
pub mod sim;
pub mod store;
pub mod tuning;

pub use economy::EconomyLedger;
pub use session::{Driver, SessionOutcome};
pub use sim::{Command, RunState};
pub use store::Account;
pub use tuning::Tuning;

/// Engine constants
///
/// These values define the feel of the game and the shape of persisted data;
/// changing them changes scoring and difficulty for everyone, so they live
/// here rather than in [`tuning::Tuning`].
pub mod consts {
    /// Fixed simulation rate (classic 60 FPS arcade cadence)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// View dimensions (obstacles spawn at the right edge)
    pub const VIEW_W: f32 = 800.0;
    pub const VIEW_H: f32 = 600.0;
    /// Height of the ground band at the bottom of the view
    pub const GROUND_MARGIN: f32 = 50.0;
    /// The ground line - player feet and obstacle bases rest here
    pub const GROUND_Y: f32 = VIEW_H - GROUND_MARGIN;

    /// Player box (x never changes; the world scrolls past)
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_W: f32 = 50.0;
    pub const PLAYER_H: f32 = 50.0;

    /// Gravity per tick (y grows downward, so positive pulls to the ground)
    pub const GRAVITY: f32 = 0.6;
    /// Ground jump impulse (negative = up)
    pub const BASE_JUMP_POWER: f32 = -12.0;
    /// Mid-air jump impulse as a fraction of the ground jump
    pub const AIR_JUMP_FACTOR: f32 = 0.8;
    /// Shield immunity window after activation (2 s)
    pub const SHIELD_DURATION_TICKS: u32 = 120;

    /// Obstacle scroll speed at score 0 (px per tick)
    pub const BASE_OBSTACLE_SPEED: f32 = 5.0;
    /// Speed ramp per point scored
    pub const SPEED_PER_POINT: f32 = 0.05;
    /// Spawn interval at score 0 (ticks); tightens by one tick per two points
    pub const SPAWN_BASE_INTERVAL: u32 = 90;
    /// Spawn interval floor (ticks)
    pub const SPAWN_MIN_INTERVAL: u32 = 60;
    /// Obstacle dimension ranges (inclusive, px)
    pub const OBSTACLE_W_MIN: u32 = 20;
    pub const OBSTACLE_W_MAX: u32 = 50;
    pub const OBSTACLE_H_MIN: u32 = 20;
    pub const OBSTACLE_H_MAX: u32 = 70;

    /// Sustained points-per-second above this voids the run.
    /// Legitimate play tops out near one pass per second, so the margin is
    /// generous; the guard exists to catch injected score, not sharp play.
    pub const CHEAT_RATE_THRESHOLD: f64 = 5.0;
}

/// Logical seconds elapsed after `ticks` fixed-step frames
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f64 {
    ticks as f64 / consts::TICKS_PER_SECOND as f64
}
