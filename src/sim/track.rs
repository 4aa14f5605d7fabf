//! Obstacle track: spawn cadence, scroll, retirement
//!
//! Obstacles enter at the right edge, scroll left at a score-scaled speed and
//! retire once fully past the left edge. Each retirement is the one and only
//! way a run earns a point.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;

/// A ground-aligned obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    pub w: f32,
    pub h: f32,
}

impl Obstacle {
    /// Spawn at the right edge with dimensions drawn from the session RNG
    pub fn spawn(rng: &mut Pcg32) -> Self {
        let w = rng.random_range(OBSTACLE_W_MIN..=OBSTACLE_W_MAX) as f32;
        let h = rng.random_range(OBSTACLE_H_MIN..=OBSTACLE_H_MAX) as f32;
        Self { x: VIEW_W, w, h }
    }

    /// Top edge (the base sits on the ground line)
    #[inline]
    pub fn y(&self) -> f32 {
        GROUND_Y - self.h
    }

    /// Collision box
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y(), self.w, self.h)
    }
}

/// Derived difficulty values. A pure function of score - never stored, so it
/// can't drift from the score that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Leftward scroll speed, px per tick
    pub speed: f32,
    /// Ticks between spawns
    pub spawn_interval: u32,
}

impl Difficulty {
    pub fn for_score(score: u32) -> Self {
        Self {
            speed: BASE_OBSTACLE_SPEED + score as f32 * SPEED_PER_POINT,
            spawn_interval: SPAWN_MIN_INTERVAL.max(SPAWN_BASE_INTERVAL.saturating_sub(score / 2)),
        }
    }
}

/// The scrolling obstacle field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub obstacles: Vec<Obstacle>,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// One frame of track motion: maybe spawn, scroll everything left,
    /// retire what's off-screen. Returns the number of retirements (points).
    /// A freshly spawned obstacle scrolls on its spawn frame like the rest.
    pub fn advance(&mut self, diff: Difficulty, rng: &mut Pcg32) -> u32 {
        self.spawn_timer += 1;
        if self.spawn_timer > diff.spawn_interval {
            self.obstacles.push(Obstacle::spawn(rng));
            self.spawn_timer = 0;
        }

        for ob in &mut self.obstacles {
            ob.x -= diff.speed;
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|ob| ob.x + ob.w >= 0.0);
        (before - self.obstacles.len()) as u32
    }
}
