//! Rectangle and point primitives shared by all layout math.
//!
//! These are plain value types; the coordinate convention a value is measured
//! in (Cocoa bottom-left-up vs. AX top-left-down) is context the caller
//! carries, not part of the value. See [`crate::sys::screen::CoordinateConverter`].

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point { Point { x, y } }
}

#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Size { Size { width, height } }
}

#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn min_x(&self) -> f64 { self.origin.x }

    pub fn min_y(&self) -> f64 { self.origin.y }

    pub fn max_x(&self) -> f64 { self.origin.x + self.size.width }

    pub fn max_y(&self) -> f64 { self.origin.y + self.size.height }

    /// Half-open containment: the min edges are inside, the max edges are not.
    pub fn contains(&self, point: Point) -> bool {
        self.min_x() <= point.x
            && point.x < self.max_x()
            && self.min_y() <= point.y
            && point.y < self.max_y()
    }
}

/// Floor-division half of a dimension. Both halves of an odd dimension get
/// `floor(v/2)`, so a 1921-wide area splits into two 960-wide halves; the
/// leftover unit is intentionally uncovered.
pub fn floor_half(v: f64) -> f64 { (v / 2.0).floor() }

/// Floored scaling, used for proportional layouts.
pub fn floor_scale(v: f64, factor: f64) -> f64 { (v * factor).floor() }

#[cfg(target_os = "macos")]
mod convert {
    use objc2_core_foundation::{CGPoint, CGRect, CGSize};

    use super::{Point, Rect, Size};

    impl From<CGPoint> for Point {
        fn from(p: CGPoint) -> Point { Point::new(p.x, p.y) }
    }

    impl From<Point> for CGPoint {
        fn from(p: Point) -> CGPoint { CGPoint::new(p.x, p.y) }
    }

    impl From<CGSize> for Size {
        fn from(s: CGSize) -> Size { Size::new(s.width, s.height) }
    }

    impl From<Size> for CGSize {
        fn from(s: Size) -> CGSize { CGSize::new(s.width, s.height) }
    }

    impl From<CGRect> for Rect {
        fn from(r: CGRect) -> Rect {
            Rect::new(r.origin.x, r.origin.y, r.size.width, r.size.height)
        }
    }

    impl From<Rect> for CGRect {
        fn from(r: Rect) -> CGRect {
            CGRect::new(r.origin.into(), r.size.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn containment_is_half_open() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(109.0, 69.0)));
        assert!(!rect.contains(Point::new(110.0, 20.0)));
        assert!(!rect.contains(Point::new(10.0, 70.0)));
        assert!(!rect.contains(Point::new(9.0, 20.0)));
    }

    #[test]
    fn floor_half_puts_the_extra_unit_nowhere() {
        assert_eq!(floor_half(1920.0), 960.0);
        assert_eq!(floor_half(1921.0), 960.0);
        assert_eq!(floor_half(0.0), 0.0);
    }

    #[test]
    fn floor_scale_rounds_down() {
        assert_eq!(floor_scale(1024.0, 0.75), 768.0);
        assert_eq!(floor_scale(1023.0, 0.75), 767.0);
    }

    #[test]
    fn rects_compare_by_value() {
        assert_eq!(Rect::new(1.0, 2.0, 3.0, 4.0), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_ne!(Rect::new(1.0, 2.0, 3.0, 4.0), Rect::new(1.0, 2.0, 3.0, 5.0));
    }
}
