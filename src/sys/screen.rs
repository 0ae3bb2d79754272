//! Display enumeration, coordinate conversion, and display topology.
//!
//! Screen frames are stored in Cocoa (bottom-left-up) coordinates with a
//! shared global origin. Window mutation happens through the Accessibility
//! API, which measures from the top-left with y growing downward; the
//! primary screen's full-frame height is the single constant that converts
//! between the two.

use std::cmp::Ordering;
use std::f64;

use serde::{Deserialize, Serialize};

use crate::sys::geometry::{Point, Rect};

#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
#[repr(transparent)]
pub struct ScreenId(u32);

impl ScreenId {
    pub fn new(id: u32) -> ScreenId { ScreenId(id) }

    pub fn get(&self) -> u32 { self.0 }
}

/// One attached display as reported by the enumeration collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScreenInfo {
    pub id: ScreenId,
    /// Full frame, bottom-left-up, origin relative to the shared global origin.
    pub frame: Rect,
    /// Frame minus menu bar and Dock, bottom-left-up.
    pub visible_frame: Rect,
    pub name: String,
}

/// Source of the current display configuration. Enumeration order matters:
/// the first screen is the primary screen. Implementations must report a
/// fresh snapshot on every call.
pub trait ScreenSource {
    fn screens(&self) -> Vec<ScreenInfo>;

    /// The screen the user is currently working on, if the platform knows.
    fn active_screen(&self) -> Option<ScreenId>;
}

/// Converts between Cocoa and AX coordinate systems.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateConverter {
    /// The y offset of the Cocoa origin in the AX coordinate system, and
    /// vice versa. This is the full-frame height of the primary screen. The
    /// origins are the bottom left and top left of that screen, respectively.
    screen_height: f64,
}

/// Creates a `CoordinateConverter` that returns None for any conversion.
impl Default for CoordinateConverter {
    fn default() -> Self { Self { screen_height: f64::NAN } }
}

impl CoordinateConverter {
    pub fn new(screen_height: f64) -> Self { Self { screen_height } }

    pub fn convert_point(&self, point: Point) -> Option<Point> {
        if self.screen_height.is_nan() {
            return None;
        }
        Some(Point::new(point.x, self.screen_height - point.y))
    }

    /// Flips a rect between the two conventions: `y' = H - y - height`.
    /// The mapping is its own inverse, so the same call converts both ways
    /// and round-trips exactly.
    pub fn convert_rect(&self, rect: Rect) -> Option<Rect> {
        if self.screen_height.is_nan() {
            return None;
        }
        Some(Rect {
            origin: Point::new(rect.origin.x, self.screen_height - rect.max_y()),
            size: rect.size,
        })
    }
}

/// Ordinal position of a display within the current arrangement, for
/// presentation purposes. Recomputed whenever the display set changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PositionLabel {
    Primary,
    Leading,
    Trailing,
    Center,
}

impl PositionLabel {
    pub fn title(&self) -> &'static str {
        match self {
            PositionLabel::Primary => "Primary",
            PositionLabel::Leading => "Leading",
            PositionLabel::Trailing => "Trailing",
            PositionLabel::Center => "Center",
        }
    }

    /// SF Symbol name used by presentation surfaces.
    pub fn symbol(&self) -> &'static str {
        match self {
            PositionLabel::Primary => "display",
            PositionLabel::Leading => "inset.filled.leadinghalf.arrow.leading.rectangle",
            PositionLabel::Trailing => "inset.filled.trailinghalf.arrow.trailing.rectangle",
            PositionLabel::Center => "inset.filled.center.rectangle",
        }
    }
}

/// A snapshot of the attached displays, taken at the start of an operation.
/// Owns the conversion constant (primary full-frame height) for that
/// operation.
#[derive(Debug, Clone)]
pub struct DisplayTopology {
    screens: Vec<ScreenInfo>,
    converter: CoordinateConverter,
}

impl DisplayTopology {
    pub fn new(screens: Vec<ScreenInfo>) -> DisplayTopology {
        let converter = match screens.first() {
            Some(primary) => CoordinateConverter::new(primary.frame.size.height),
            None => CoordinateConverter::default(),
        };
        DisplayTopology { screens, converter }
    }

    pub fn is_empty(&self) -> bool { self.screens.is_empty() }

    pub fn len(&self) -> usize { self.screens.len() }

    pub fn screens(&self) -> &[ScreenInfo] { &self.screens }

    pub fn converter(&self) -> CoordinateConverter { self.converter }

    pub fn primary(&self) -> Option<&ScreenInfo> { self.screens.first() }

    pub fn get(&self, index: usize) -> Option<&ScreenInfo> { self.screens.get(index) }

    pub fn by_id(&self, id: ScreenId) -> Option<&ScreenInfo> {
        self.screens.iter().find(|s| s.id == id)
    }

    /// Finds the screen containing `point` (top-left-down coordinates).
    /// Each screen's full frame is converted with the shared primary height
    /// and tested half-open; the first match in enumeration order wins.
    /// Fallback on a miss is the caller's policy, not decided here.
    pub fn screen_containing(&self, point: Point) -> Option<&ScreenInfo> {
        self.screens.iter().find(|screen| {
            self.converter
                .convert_rect(screen.frame)
                .is_some_and(|frame| frame.contains(point))
        })
    }

    /// Assigns a position label to each screen, in enumeration order.
    ///
    /// A single screen is Primary. Otherwise screens are ranked by ascending
    /// x origin (stable, so ties keep enumeration order): lowest is Leading,
    /// highest is Trailing, the rest are Center. Only the horizontal axis is
    /// considered; vertical arrangements still rank by x.
    pub fn position_labels(&self) -> Vec<PositionLabel> {
        if self.screens.len() <= 1 {
            return self.screens.iter().map(|_| PositionLabel::Primary).collect();
        }

        let mut order: Vec<usize> = (0..self.screens.len()).collect();
        order.sort_by(|&a, &b| {
            self.screens[a]
                .frame
                .origin
                .x
                .partial_cmp(&self.screens[b].frame.origin.x)
                .unwrap_or(Ordering::Equal)
        });

        let mut labels = vec![PositionLabel::Center; self.screens.len()];
        labels[order[0]] = PositionLabel::Leading;
        labels[*order.last().unwrap()] = PositionLabel::Trailing;
        labels
    }
}

#[cfg(target_os = "macos")]
pub use macos::NSScreenSource;

#[cfg(target_os = "macos")]
mod macos {
    use objc2::{ClassType, MainThreadMarker, msg_send};
    use objc2_app_kit::NSScreen;
    use objc2_foundation::{NSNumber, ns_string};
    use tracing::warn;

    use super::{ScreenId, ScreenInfo, ScreenSource};

    /// Live screen enumeration backed by `NSScreen`. `NSScreen.screens`
    /// reports the primary screen first, matching the enumeration contract.
    pub struct NSScreenSource {
        mtm: MainThreadMarker,
    }

    impl NSScreenSource {
        pub fn new(mtm: MainThreadMarker) -> Self { Self { mtm } }
    }

    impl ScreenSource for NSScreenSource {
        fn screens(&self) -> Vec<ScreenInfo> {
            NSScreen::screens(self.mtm)
                .iter()
                .flat_map(|screen| {
                    Some(ScreenInfo {
                        id: screen.screen_id().ok()?,
                        frame: screen.frame().into(),
                        visible_frame: screen.visibleFrame().into(),
                        name: screen.localizedName().to_string(),
                    })
                })
                .collect()
        }

        fn active_screen(&self) -> Option<ScreenId> {
            NSScreen::mainScreen(self.mtm).and_then(|s| s.screen_id().ok())
        }
    }

    pub trait NSScreenExt {
        fn screen_id(&self) -> Result<ScreenId, ()>;
    }

    impl NSScreenExt for NSScreen {
        fn screen_id(&self) -> Result<ScreenId, ()> {
            let desc = self.deviceDescription();
            match desc.objectForKey(ns_string!("NSScreenNumber")) {
                Some(val) if unsafe { msg_send![&*val, isKindOfClass: NSNumber::class()] } => {
                    let number: &NSNumber = unsafe { std::mem::transmute(val) };
                    Ok(ScreenId::new(number.as_u32()))
                }
                val => {
                    warn!(
                        "Could not get NSScreenNumber for screen with name {:?}: {:?}",
                        self.localizedName(),
                        val,
                    );
                    Err(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sys::geometry::Rect;

    fn screen(id: u32, frame: Rect, visible_frame: Rect) -> ScreenInfo {
        ScreenInfo {
            id: ScreenId::new(id),
            frame,
            visible_frame,
            name: format!("Display {id}"),
        }
    }

    fn side_by_side() -> Vec<ScreenInfo> {
        vec![
            screen(
                1,
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
                Rect::new(0.0, 0.0, 1920.0, 1055.0),
            ),
            screen(
                2,
                Rect::new(1920.0, 0.0, 1920.0, 1080.0),
                Rect::new(1920.0, 0.0, 1920.0, 1080.0),
            ),
        ]
    }

    #[test]
    fn conversion_round_trips_exactly() {
        let converter = CoordinateConverter::new(2160.0);
        let rects = [
            Rect::new(0.0, 76.0, 3840.0, 2059.0),
            Rect::new(3840.0, 98.0, 1512.0, 950.0),
            Rect::new(-1920.0, -217.5, 1920.0, 1080.0),
        ];
        for rect in rects {
            let converted = converter.convert_rect(rect).unwrap();
            assert_eq!(converter.convert_rect(converted).unwrap(), rect);
        }
    }

    #[test]
    fn conversion_flips_the_y_origin() {
        let converter = CoordinateConverter::new(2160.0);
        assert_eq!(
            converter.convert_rect(Rect::new(0.0, 76.0, 3840.0, 2059.0)).unwrap(),
            Rect::new(0.0, 25.0, 3840.0, 2059.0)
        );
        assert_eq!(
            converter.convert_point(Point::new(10.0, 2000.0)).unwrap(),
            Point::new(10.0, 160.0)
        );
    }

    #[test]
    fn default_converter_converts_nothing() {
        let converter = CoordinateConverter::default();
        assert_eq!(converter.convert_point(Point::new(0.0, 0.0)), None);
        assert_eq!(converter.convert_rect(Rect::new(0.0, 0.0, 1.0, 1.0)), None);
    }

    #[test]
    fn containment_finds_the_owning_screen() {
        let topology = DisplayTopology::new(side_by_side());
        // Frames are at y=0 with the primary 1080 high, so the converted
        // frames cover y in [0, 1080) on both screens.
        let on_first = topology.screen_containing(Point::new(500.0, 500.0)).unwrap();
        assert_eq!(on_first.id, ScreenId::new(1));
        let on_second = topology.screen_containing(Point::new(1920.0, 10.0)).unwrap();
        assert_eq!(on_second.id, ScreenId::new(2));
        assert_eq!(topology.screen_containing(Point::new(4000.0, 10.0)), None);
        assert_eq!(topology.screen_containing(Point::new(10.0, 1080.0)), None);
    }

    #[test]
    fn containment_uses_the_primary_height_for_all_screens() {
        // Side display sits higher than the primary; its converted frame
        // must still be measured against the primary height (2160).
        let topology = DisplayTopology::new(vec![
            screen(
                3,
                Rect::new(0.0, 0.0, 3840.0, 2160.0),
                Rect::new(0.0, 76.0, 3840.0, 2059.0),
            ),
            screen(
                1,
                Rect::new(3840.0, 1080.0, 1512.0, 982.0),
                Rect::new(3840.0, 1080.0, 1512.0, 950.0),
            ),
        ]);
        // Converted side frame: y = 2160 - 1080 - 982 = 98.
        let hit = topology.screen_containing(Point::new(3900.0, 98.0)).unwrap();
        assert_eq!(hit.id, ScreenId::new(1));
        assert_eq!(topology.screen_containing(Point::new(3900.0, 97.0)), None);
    }

    #[test]
    fn overlapping_frames_resolve_to_the_first_match() {
        let frame = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let topology =
            DisplayTopology::new(vec![screen(7, frame, frame), screen(8, frame, frame)]);
        let hit = topology.screen_containing(Point::new(100.0, 100.0)).unwrap();
        assert_eq!(hit.id, ScreenId::new(7));
    }

    #[test]
    fn single_screen_is_labelled_primary() {
        let frame = Rect::new(0.0, 0.0, 1440.0, 900.0);
        let topology = DisplayTopology::new(vec![screen(1, frame, frame)]);
        assert_eq!(topology.position_labels(), vec![PositionLabel::Primary]);
    }

    #[test]
    fn two_screens_are_leading_and_trailing() {
        let topology = DisplayTopology::new(side_by_side());
        assert_eq!(
            topology.position_labels(),
            vec![PositionLabel::Leading, PositionLabel::Trailing]
        );
    }

    #[test]
    fn middle_screen_of_three_is_center() {
        // Enumeration order deliberately differs from spatial order.
        let topology = DisplayTopology::new(vec![
            screen(
                1,
                Rect::new(1920.0, 0.0, 1920.0, 1080.0),
                Rect::new(1920.0, 0.0, 1920.0, 1080.0),
            ),
            screen(
                2,
                Rect::new(3840.0, 0.0, 1920.0, 1080.0),
                Rect::new(3840.0, 0.0, 1920.0, 1080.0),
            ),
            screen(
                3,
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
            ),
        ]);
        assert_eq!(
            topology.position_labels(),
            vec![
                PositionLabel::Center,
                PositionLabel::Trailing,
                PositionLabel::Leading,
            ]
        );
    }

    #[test]
    fn equal_x_origins_keep_enumeration_order() {
        // Stacked vertically: same x. The stable sort keeps enumeration
        // order, so the first enumerated is Leading.
        let topology = DisplayTopology::new(vec![
            screen(
                1,
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
            ),
            screen(
                2,
                Rect::new(0.0, 1080.0, 1920.0, 1080.0),
                Rect::new(0.0, 1080.0, 1920.0, 1080.0),
            ),
        ]);
        assert_eq!(
            topology.position_labels(),
            vec![PositionLabel::Leading, PositionLabel::Trailing]
        );
    }

    #[test]
    fn label_titles_and_symbols_are_stable() {
        // Presentation surfaces key on these names; changing one silently
        // breaks every menu icon, so pin them.
        assert_eq!(PositionLabel::Primary.title(), "Primary");
        assert_eq!(PositionLabel::Leading.title(), "Leading");
        assert_eq!(PositionLabel::Trailing.title(), "Trailing");
        assert_eq!(PositionLabel::Center.title(), "Center");

        assert_eq!(PositionLabel::Primary.symbol(), "display");
        assert_eq!(
            PositionLabel::Leading.symbol(),
            "inset.filled.leadinghalf.arrow.leading.rectangle"
        );
        assert_eq!(
            PositionLabel::Trailing.symbol(),
            "inset.filled.trailinghalf.arrow.trailing.rectangle"
        );
        assert_eq!(PositionLabel::Center.symbol(), "inset.filled.center.rectangle");
    }

    #[test]
    fn empty_topology_has_no_primary_and_converts_nothing() {
        let topology = DisplayTopology::new(vec![]);
        assert!(topology.is_empty());
        assert_eq!(topology.primary(), None);
        assert_eq!(topology.converter().convert_point(Point::new(0.0, 0.0)), None);
        assert_eq!(topology.position_labels(), Vec::<PositionLabel>::new());
    }
}
