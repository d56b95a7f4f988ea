//! Axis-aligned rectangle geometry for bricks, paddle, pickups and lasers
//!
//! Screen space: x grows right, y grows down. A rectangle is defined by its
//! top-left corner and its size:
//! - x, y: top-left corner
//! - w, h: extent to the right and downward

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    /// Bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::from_center(center, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Grow (or shrink, with negative deltas) around the center.
    /// `dw` and `dh` are total changes, split evenly between both sides.
    pub fn inflate(&self, dw: f32, dh: f32) -> Rect {
        Rect::new(
            self.x - dw / 2.0,
            self.y - dh / 2.0,
            (self.w + dw).max(0.0),
            (self.h + dh).max(0.0),
        )
    }

    /// Center-to-center Euclidean distance
    pub fn center_distance(&self, other: &Rect) -> f32 {
        self.center().distance(other.center())
    }
}
