//! Axis-aligned collision detection
//!
//! The runner and every obstacle are plain boxes, so the whole resolver is
//! one AABB overlap test swept across the obstacle list.

use super::track::Obstacle;

/// An axis-aligned box. Origin at the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB overlap. Boxes that merely share an edge do not collide.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Index of the first obstacle overlapping the player box, if any.
/// One hit is enough to end a run, so the sweep stops at the first.
pub fn first_hit(player: &Rect, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|ob| ob.bounds().overlaps(player))
}
