//! Geometric primitives for page layout.
//!
//! All coordinates here use the page's top-left corner as origin with y
//! growing downwards, the convention the header layout is expressed in.
//! The writer flips them into PDF user space when emitting operators.

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_shell::geometry::Point;
    ///
    /// let point = Point::new(95.0, 70.0);
    /// assert_eq!(point.x, 95.0);
    /// assert_eq!(point.y, 70.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page space.
///
/// Width and height may come out non-positive when a page is too small for
/// the layout; such rectangles are [degenerate](Rect::is_degenerate) and the
/// element placed in them is skipped rather than drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its top-left `(x0, y0)` and bottom-right
    /// `(x1, y1)` corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_shell::geometry::Rect;
    ///
    /// let rect = Rect::from_points(40.0, 120.0, 560.0, 170.0);
    /// assert_eq!(rect.width, 520.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// True when the rectangle has no positive area (or is not finite).
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_shell::geometry::Rect;
    ///
    /// assert!(Rect::from_points(40.0, 0.0, 30.0, 50.0).is_degenerate());
    /// assert!(Rect::new(0.0, 0.0, 10.0, 0.0).is_degenerate());
    /// assert!(!Rect::new(0.0, 0.0, 10.0, 1.0).is_degenerate());
    /// ```
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
    }

    /// The largest rectangle with the aspect ratio of `width`×`height` that
    /// fits inside `self`, centered.
    ///
    /// Returns `None` when either side is degenerate.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_shell::geometry::Rect;
    ///
    /// let frame = Rect::new(0.0, 0.0, 100.0, 40.0);
    /// let fitted = frame.fit_centered(20.0, 20.0).unwrap();
    /// assert_eq!(fitted, Rect::new(30.0, 0.0, 40.0, 40.0));
    /// ```
    pub fn fit_centered(&self, width: f32, height: f32) -> Option<Rect> {
        if self.is_degenerate() || Rect::new(0.0, 0.0, width, height).is_degenerate() {
            return None;
        }
        let scale = (self.width / width).min(self.height / height);
        let fitted_w = width * scale;
        let fitted_h = height * scale;
        Some(Rect::new(
            self.x + (self.width - fitted_w) / 2.0,
            self.y + (self.height - fitted_h) / 2.0,
            fitted_w,
            fitted_h,
        ))
    }
}
