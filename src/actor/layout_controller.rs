//! Orchestrates one layout operation: resolve the target app's windows,
//! pick a screen for each, compute the target frame, and request the
//! mutations.
//!
//! Operations are synchronous and best-effort: a window that cannot be read
//! is skipped, never aborting the batch, and the result is an aggregate
//! report. Display configuration is re-enumerated at the start of every
//! operation so topology decisions always match the current arrangement.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::common::config::Config;
use crate::layout_engine::{self, Layout};
use crate::sys::app::{self, TargetApp};
use crate::sys::geometry::Rect;
use crate::sys::screen::{CoordinateConverter, DisplayTopology, ScreenInfo, ScreenSource};
use crate::sys::window::WindowControl;

/// A user-initiated request, bound to the current target app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    ApplyLayout(Layout),
    /// Index into the current screen enumeration. The invocation surface
    /// validates the index against the live screen count first.
    MoveToDisplay(usize),
}

/// Per-window result of an operation. Only `Mutated` windows count as
/// affected; the skip reasons exist so the policy stays testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOutcome {
    Mutated,
    SkippedNonStandard,
    SkippedUnreadable,
}

#[derive(Debug, Default)]
pub struct OperationReport {
    pub outcomes: Vec<WindowOutcome>,
}

impl OperationReport {
    /// Number of windows successfully mutated.
    pub fn affected(&self) -> usize {
        self.outcomes.iter().filter(|o| **o == WindowOutcome::Mutated).count()
    }
}

/// Holds the app a layout operation will affect. Updated from the outside by
/// whoever observes activation changes; read by the controller. Excluded
/// bundle ids (including our own) never become the target.
#[derive(Debug, Default)]
pub struct TargetTracker {
    current: Option<TargetApp>,
    exclude: Vec<String>,
}

impl TargetTracker {
    pub fn new(exclude: Vec<String>) -> TargetTracker {
        TargetTracker { current: None, exclude }
    }

    pub fn update(&mut self, app: TargetApp) {
        if let Some(id) = app.bundle_id.as_deref() {
            if self.exclude.iter().any(|excluded| excluded == id) {
                debug!(bundle_id = id, "ignoring excluded app activation");
                return;
            }
        }
        self.current = Some(app);
    }

    pub fn current(&self) -> Option<&TargetApp> { self.current.as_ref() }

    pub fn clear(&mut self) { self.current = None; }
}

pub struct LayoutController<W: WindowControl, S: ScreenSource> {
    config: Arc<Config>,
    windows: W,
    screens: S,
    target: TargetTracker,
}

impl<W: WindowControl, S: ScreenSource> LayoutController<W, S> {
    pub fn new(config: Arc<Config>, windows: W, screens: S) -> Self {
        let mut exclude = config.settings.exclude_apps.clone();
        exclude.push(app::BUNDLE_ID.to_string());
        let target = TargetTracker::new(exclude);
        Self { config, windows, screens, target }
    }

    pub fn target(&self) -> &TargetTracker { &self.target }

    pub fn target_mut(&mut self) -> &mut TargetTracker { &mut self.target }

    /// Runs one operation to completion and reports what happened. With no
    /// target app, no screens, or no windows the result is an empty report;
    /// none of those are errors.
    pub fn handle(&mut self, request: Request) -> OperationReport {
        let Some(app) = self.target.current().cloned() else {
            debug!("no target app; nothing to do");
            return OperationReport::default();
        };

        let topology = DisplayTopology::new(self.screens.screens());
        if topology.is_empty() {
            warn!("no screens attached; nothing to do");
            return OperationReport::default();
        }

        let report = match request {
            Request::ApplyLayout(layout) => self.apply_layout(&app, layout, &topology),
            Request::MoveToDisplay(index) => self.move_to_display(&app, index, &topology),
        };
        debug!(
            app = app.display_name(),
            affected = report.affected(),
            windows = report.outcomes.len(),
            "operation complete"
        );
        report
    }

    /// Applies `layout` to each standard window on the screen it currently
    /// occupies. A window whose position misses every screen falls back to
    /// the active screen, then the primary screen.
    fn apply_layout(
        &self,
        app: &TargetApp,
        layout: Layout,
        topology: &DisplayTopology,
    ) -> OperationReport {
        let mut report = OperationReport::default();
        for window in self.windows.list_windows(app) {
            if !self.windows.is_standard(&window) {
                report.outcomes.push(WindowOutcome::SkippedNonStandard);
                continue;
            }
            let Some(position) = self.windows.position(&window) else {
                report.outcomes.push(WindowOutcome::SkippedUnreadable);
                continue;
            };
            let screen = topology
                .screen_containing(position)
                .or_else(|| self.screens.active_screen().and_then(|id| topology.by_id(id)))
                .or_else(|| topology.primary());
            // The topology is non-empty, so the primary fallback always hits.
            let Some(screen) = screen else {
                report.outcomes.push(WindowOutcome::SkippedUnreadable);
                continue;
            };
            let Some(target) = target_frame(layout, screen, topology.converter()) else {
                report.outcomes.push(WindowOutcome::SkippedUnreadable);
                continue;
            };
            self.windows.set_position(&window, target.origin);
            self.windows.set_size(&window, target.size);
            report.outcomes.push(WindowOutcome::Mutated);
        }
        report
    }

    /// Moves every standard window onto the screen at `index`, applying the
    /// configured move layout there. The target frame is the same for all
    /// windows, so current positions are not read.
    fn move_to_display(
        &self,
        app: &TargetApp,
        index: usize,
        topology: &DisplayTopology,
    ) -> OperationReport {
        let Some(screen) = topology.get(index) else {
            warn!(index, screens = topology.len(), "display index out of range");
            return OperationReport::default();
        };
        let Some(target) =
            target_frame(self.config.settings.move_layout, screen, topology.converter())
        else {
            return OperationReport::default();
        };

        let mut report = OperationReport::default();
        for window in self.windows.list_windows(app) {
            if !self.windows.is_standard(&window) {
                report.outcomes.push(WindowOutcome::SkippedNonStandard);
                continue;
            }
            self.windows.set_position(&window, target.origin);
            self.windows.set_size(&window, target.size);
            report.outcomes.push(WindowOutcome::Mutated);
        }
        report
    }
}

/// The target frame for `layout` on `screen`, in AX coordinates: the
/// screen's usable area is flipped into top-left-down space first, because
/// the layout formulas read "top" as the smaller y.
fn target_frame(layout: Layout, screen: &ScreenInfo, converter: CoordinateConverter) -> Option<Rect> {
    let usable = converter.convert_rect(screen.visible_frame)?;
    Some(layout_engine::compute_frame(layout, usable))
}
