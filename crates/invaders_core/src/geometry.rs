//! # Geometry
//!
//! Screen coordinates and axis-aligned bounding boxes.

/// Integer screen coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coord {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position (grows downwards).
    pub y: i32,
}

impl Coord {
    /// Creates a coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Floating screen coordinate.
///
/// Used where movement per tick is smaller than one pixel and has to
/// accumulate (alien drift).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordF {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl CoordF {
    /// Creates a coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Rounds to the nearest pixel.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_pixel(self) -> Coord {
        Coord::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// Axis-aligned rectangle (top-left corner plus size).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a rectangle of the given size centred on `center`.
    #[inline]
    #[must_use]
    pub const fn centered(center: Coord, w: i32, h: i32) -> Self {
        Self::new(center.x - w / 2, center.y - h / 2, w, h)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Returns true if the two rectangles overlap by at least one pixel.
    #[inline]
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
