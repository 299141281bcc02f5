#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

/// A point in surface coordinates (CSS pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`.
    #[must_use]
    pub fn offset_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned geometry of an image or frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether `p` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Whether `p` lies in the `handle`-sized square at the bottom-right corner.
    #[must_use]
    pub fn in_corner_handle(&self, p: Point, handle: f64) -> bool {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        p.x >= right - handle && p.x <= right && p.y >= bottom - handle && p.y <= bottom
    }

    /// Same size, top-left moved to `origin`.
    #[must_use]
    pub fn moved_to(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// Grow or shrink from the bottom-right corner by `delta`, never below the
    /// given minimum size. The top-left corner stays fixed.
    #[must_use]
    pub fn resized_by(&self, delta: Point, min_width: f64, min_height: f64) -> Rect {
        Rect::new(
            self.x,
            self.y,
            (self.width + delta.x).max(min_width),
            (self.height + delta.y).max(min_height),
        )
    }
}
