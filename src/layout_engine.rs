//! Maps a named layout and a screen's usable area to a target rectangle.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::sys::geometry::{Rect, floor_half, floor_scale};

/// The closed set of window layouts. Adding a layout means adding a variant
/// here and a match arm in [`compute_frame`]; there is no other dispatch.
#[derive(
    Serialize, Deserialize, ValueEnum, EnumIter, Debug, Default, Copy, Clone, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    LeftHalf,
    RightHalf,
    TopHalf,
    BottomHalf,
    FullScreen,
    Center75,
}

impl Layout {
    pub fn title(&self) -> &'static str {
        match self {
            Layout::LeftHalf => "Left Half",
            Layout::RightHalf => "Right Half",
            Layout::TopHalf => "Top Half",
            Layout::BottomHalf => "Bottom Half",
            Layout::FullScreen => "Full Screen",
            Layout::Center75 => "Center (75%)",
        }
    }

    /// SF Symbol name used by presentation surfaces.
    pub fn symbol(&self) -> &'static str {
        match self {
            Layout::LeftHalf => "rectangle.lefthalf.filled",
            Layout::RightHalf => "rectangle.righthalf.filled",
            Layout::TopHalf => "rectangle.tophalf.filled",
            Layout::BottomHalf => "rectangle.bottomhalf.filled",
            Layout::FullScreen => "rectangle.inset.filled",
            Layout::Center75 => "rectangle.center.inset.filled",
        }
    }
}

/// Computes the target frame for `layout` within `usable`.
///
/// Both rectangles are in top-left-down (AX) coordinates; "top" is the
/// smaller y. Screen frames arrive in Cocoa bottom-left-up coordinates and
/// must be converted before calling this.
///
/// Total over all inputs: a zero-size area yields a zero-size frame. Half
/// layouts give both halves `floor(w/2)` (resp. `floor(h/2)`), so for odd
/// dimensions the two halves cover one unit less than the full area.
pub fn compute_frame(layout: Layout, usable: Rect) -> Rect {
    let (x, y) = (usable.origin.x, usable.origin.y);
    let (w, h) = (usable.size.width, usable.size.height);
    match layout {
        Layout::LeftHalf => Rect::new(x, y, floor_half(w), h),
        Layout::RightHalf => Rect::new(x + floor_half(w), y, floor_half(w), h),
        Layout::TopHalf => Rect::new(x, y, w, floor_half(h)),
        Layout::BottomHalf => Rect::new(x, y + floor_half(h), w, floor_half(h)),
        Layout::FullScreen => usable,
        Layout::Center75 => {
            let cw = floor_scale(w, 0.75);
            let ch = floor_scale(h, 0.75);
            Rect::new(x + floor_half(w - cw), y + floor_half(h - ch), cw, ch)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn full_screen_is_the_identity() {
        let area = Rect::new(13.0, 7.0, 1234.0, 567.0);
        assert_eq!(compute_frame(Layout::FullScreen, area), area);
    }

    #[test]
    fn left_half_of_a_1080p_screen() {
        let area = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(
            compute_frame(Layout::LeftHalf, area),
            Rect::new(0.0, 0.0, 960.0, 1080.0)
        );
    }

    #[test]
    fn odd_widths_leave_one_unit_uncovered() {
        // Both halves are floor(1921/2) = 960 wide; together they span
        // [0, 1920), one unit short of the area.
        let area = Rect::new(0.0, 0.0, 1921.0, 1080.0);
        let left = compute_frame(Layout::LeftHalf, area);
        let right = compute_frame(Layout::RightHalf, area);
        assert_eq!(right, Rect::new(960.0, 0.0, 960.0, 1080.0));
        assert_eq!(left.size.width, right.size.width);
        assert_eq!(left.max_x(), right.min_x());
        assert_eq!(right.max_x(), 1920.0);
    }

    #[test]
    fn half_widths_match_for_any_area() {
        let area = Rect::new(100.0, 50.0, 2555.0, 1440.0);
        let left = compute_frame(Layout::LeftHalf, area);
        let right = compute_frame(Layout::RightHalf, area);
        assert_eq!(left.size.width, floor_half(area.size.width));
        assert_eq!(right.size.width, floor_half(area.size.width));
        assert_eq!(right.origin.x, area.origin.x + floor_half(area.size.width));
    }

    #[test]
    fn top_and_bottom_split_on_the_y_axis() {
        let area = Rect::new(0.0, 25.0, 1920.0, 1055.0);
        let top = compute_frame(Layout::TopHalf, area);
        let bottom = compute_frame(Layout::BottomHalf, area);
        // Top-left-down space: "top" keeps the smaller y.
        assert_eq!(top, Rect::new(0.0, 25.0, 1920.0, 527.0));
        assert_eq!(bottom, Rect::new(0.0, 552.0, 1920.0, 527.0));
    }

    #[test]
    fn center75_is_centered_in_a_1024x768_area() {
        let area = Rect::new(0.0, 0.0, 1024.0, 768.0);
        assert_eq!(
            compute_frame(Layout::Center75, area),
            Rect::new(128.0, 96.0, 768.0, 576.0)
        );
    }

    #[test]
    fn center75_centering_offsets_are_floored() {
        let area = Rect::new(10.0, 20.0, 1111.0, 777.0);
        let frame = compute_frame(Layout::Center75, area);
        let cw = floor_scale(1111.0, 0.75);
        let ch = floor_scale(777.0, 0.75);
        assert_eq!(frame.size, crate::sys::geometry::Size::new(cw, ch));
        assert_eq!(frame.origin.x - area.origin.x, floor_half(1111.0 - cw));
        assert_eq!(frame.origin.y - area.origin.y, floor_half(777.0 - ch));
    }

    #[test]
    fn every_layout_stays_within_the_usable_area() {
        let area = Rect::new(3840.0, 98.0, 1512.0, 950.0);
        for layout in Layout::iter() {
            let frame = compute_frame(layout, area);
            assert!(frame.min_x() >= area.min_x(), "{layout:?} exceeds left edge");
            assert!(frame.min_y() >= area.min_y(), "{layout:?} exceeds top edge");
            assert!(frame.max_x() <= area.max_x(), "{layout:?} exceeds right edge");
            assert!(frame.max_y() <= area.max_y(), "{layout:?} exceeds bottom edge");
        }
    }

    #[test]
    fn zero_size_area_yields_zero_size_frames() {
        let area = Rect::new(5.0, 5.0, 0.0, 0.0);
        for layout in Layout::iter() {
            let frame = compute_frame(layout, area);
            assert_eq!(frame.size.width, 0.0, "{layout:?}");
            assert_eq!(frame.size.height, 0.0, "{layout:?}");
        }
    }
}
