//! # Draw Commands
//!
//! Backend-neutral description of one primitive to draw.

use invaders_core::entities::ImageHandle;
use invaders_core::{Coord, Rect};

/// Approximate glyph advance used to size text without a font.
pub const TEXT_GLYPH_WIDTH: i32 = 8;

/// Approximate line height used to size text without a font.
pub const TEXT_HEIGHT: i32 = 16;

/// 24-bit RGB colour, `0xRRGGBB`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

#[allow(clippy::cast_possible_truncation)]
impl Color {
    /// `#FF0000`
    pub const RED: Self = Self(0x00FF_0000);
    /// `#00FF00`
    pub const GREEN: Self = Self(0x0000_FF00);
    /// `#0000FF`
    pub const BLUE: Self = Self(0x0000_00FF);
    /// `#FFFF00`
    pub const YELLOW: Self = Self(0x00FF_FF00);
    /// `#00FFFF`
    pub const AQUA: Self = Self(0x0000_FFFF);
    /// `#FF00FF`
    pub const FUCHSIA: Self = Self(0x00FF_00FF);
    /// `#FFFFFF`
    pub const WHITE: Self = Self(0x00FF_FFFF);
    /// `#000000`
    pub const BLACK: Self = Self(0);

    /// Red channel.
    #[inline]
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[inline]
    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[inline]
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }
}

/// Geometry of a draw command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Solid rectangle.
    FilledBox(Rect),
    /// Rectangle outline.
    Box(Rect),
    /// Filled circle.
    Circle {
        /// Centre.
        center: Coord,
        /// Radius in pixels.
        radius: i32,
    },
    /// Straight line.
    Line {
        /// Start point.
        from: Coord,
        /// End point.
        to: Coord,
        /// Stroke width.
        thickness: u8,
    },
    /// Filled triangle.
    Triangle([Coord; 3]),
    /// Closed polygon outline.
    Polygon(Vec<Coord>),
    /// Text with its top-left corner at `at`.
    Text {
        /// Top-left corner.
        at: Coord,
        /// Content.
        text: String,
    },
    /// Sprite with its top-left corner at `at`.
    Image {
        /// Top-left corner.
        at: Coord,
        /// Sprite loaded by the backend.
        image: ImageHandle,
        /// Drawn width.
        width: i32,
        /// Drawn height.
        height: i32,
    },
}

/// One primitive plus the colour to draw it in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    /// What to draw.
    pub shape: Shape,
    /// Colour to draw it in. Ignored by images.
    pub color: Color,
}

impl DrawCommand {
    /// Solid rectangle.
    #[must_use]
    pub const fn filled_box(rect: Rect, color: Color) -> Self {
        Self { shape: Shape::FilledBox(rect), color }
    }

    /// Rectangle outline.
    #[must_use]
    pub const fn outline(rect: Rect, color: Color) -> Self {
        Self { shape: Shape::Box(rect), color }
    }

    /// Filled circle.
    #[must_use]
    pub const fn circle(center: Coord, radius: i32, color: Color) -> Self {
        Self { shape: Shape::Circle { center, radius }, color }
    }

    /// Straight line.
    #[must_use]
    pub const fn line(from: Coord, to: Coord, thickness: u8, color: Color) -> Self {
        Self { shape: Shape::Line { from, to, thickness }, color }
    }

    /// Text at `at`.
    #[must_use]
    pub fn text(at: Coord, text: impl Into<String>, color: Color) -> Self {
        Self { shape: Shape::Text { at, text: text.into() }, color }
    }

    /// Sprite covering `rect`.
    #[must_use]
    pub const fn image(rect: Rect, image: ImageHandle) -> Self {
        Self {
            shape: Shape::Image {
                at: Coord::new(rect.x, rect.y),
                image,
                width: rect.w,
                height: rect.h,
            },
            color: Color::WHITE,
        }
    }

    /// Bounding box of whatever the command draws.
    ///
    /// Text is sized with a fixed glyph advance, lines and polygons by
    /// their points. Returns an empty box at the origin for a polygon with
    /// no points.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn bounds(&self) -> Rect {
        match &self.shape {
            Shape::FilledBox(rect) | Shape::Box(rect) => *rect,
            Shape::Circle { center, radius } => {
                Rect::new(center.x - radius, center.y - radius, 2 * radius, 2 * radius)
            }
            Shape::Line { from, to, .. } => points_bounds(&[*from, *to]),
            Shape::Triangle(points) => points_bounds(points),
            Shape::Polygon(points) => points_bounds(points),
            Shape::Text { at, text } => Rect::new(
                at.x,
                at.y,
                text.chars().count() as i32 * TEXT_GLYPH_WIDTH,
                TEXT_HEIGHT,
            ),
            Shape::Image { at, width, height, .. } => Rect::new(at.x, at.y, *width, *height),
        }
    }
}

fn points_bounds(points: &[Coord]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let (mut min, mut max) = (*first, *first);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}
