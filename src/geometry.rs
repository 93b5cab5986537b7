//! Integer rectangles and the few geometric queries the game is built on:
//! overlap, point containment, segment clipping and headings.
//!
//! World space is in pixels with the origin at the top-left of the level and
//! Y growing downward, matching tile coordinates.

use bevy::math::{IVec2, Vec2};

/// Axis-aligned rectangle in level pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// A `w`×`h` rectangle whose centre lands on `center`.
    pub fn centered_on(center: IVec2, w: i32, h: i32) -> Self {
        Self::new(center.x - w / 2, center.y - h / 2, w, h)
    }

    /// Centre point, using integer halving.
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Positive-area overlap. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }

    /// Whether any part of the segment `start..=end` lies inside the rectangle.
    ///
    /// Pixels are inclusive on both ends, so the rectangle spans
    /// `x..=x + w - 1`. Implemented as a Liang-Barsky clip.
    pub fn intersects_segment(&self, start: IVec2, end: IVec2) -> bool {
        if self.is_empty() {
            return false;
        }

        let min = Vec2::new(self.x as f32, self.y as f32);
        let max = Vec2::new((self.x + self.w - 1) as f32, (self.y + self.h - 1) as f32);
        let origin = start.as_vec2();
        let delta = (end - start).as_vec2();

        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;
        let edges = [
            (-delta.x, origin.x - min.x),
            (delta.x, max.x - origin.x),
            (-delta.y, origin.y - min.y),
            (delta.y, max.y - origin.y),
        ];

        for (p, q) in edges {
            if p == 0.0 {
                // Parallel to this edge: either fully outside or irrelevant.
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                if t > t_exit {
                    return false;
                }
                t_enter = t_enter.max(t);
            } else {
                if t < t_enter {
                    return false;
                }
                t_exit = t_exit.min(t);
            }
        }

        t_enter <= t_exit
    }
}

/// Heading from `from` toward `to` in degrees, 0 along +X, 90 along +Y (down).
pub fn heading_degrees(from: IVec2, to: IVec2) -> f32 {
    let delta = (to - from).as_vec2();
    delta.y.atan2(delta.x).to_degrees()
}

/// Unit vector for a heading in degrees.
pub fn heading_vector(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin()).normalize_or_zero()
}
