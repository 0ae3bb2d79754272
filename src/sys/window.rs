//! The window-control collaborator: list, classify, read, and mutate the
//! windows of a target application.
//!
//! Failures never cross into the orchestration layer as errors. A failed
//! list is an empty list, a failed read is `None`, and mutations are
//! fire-and-forget; the per-window skip policy lives in the controller.

use thiserror::Error;

use crate::sys::app::TargetApp;
use crate::sys::geometry::{Point, Size};

#[derive(Debug, Error)]
pub enum Error {
    #[error("accessibility call failed with code {0}")]
    Ax(i32),
    #[error("accessibility permission not granted")]
    NotTrusted,
}

pub trait WindowControl {
    /// Opaque reference to a live window; never held past one operation.
    type Handle;

    /// The target app's windows. Failure reads as an empty list; an app
    /// without windows is a normal outcome, not an error.
    fn list_windows(&self, app: &TargetApp) -> Vec<Self::Handle>;

    /// Whether this is a normal user-facing window (excludes panels and
    /// utility windows).
    fn is_standard(&self, window: &Self::Handle) -> bool;

    /// Current position in top-left-down (AX) coordinates.
    fn position(&self, window: &Self::Handle) -> Option<Point>;

    fn set_position(&self, window: &Self::Handle, position: Point);

    fn set_size(&self, window: &Self::Handle, size: Size);
}

#[cfg(target_os = "macos")]
pub use macos::{AxWindow, AxWindowControl};

#[cfg(target_os = "macos")]
mod macos {
    use std::ffi::c_void;
    use std::ptr;

    use objc2_core_foundation::{CFRetained, CFString, CGPoint, CGSize};
    use tracing::{debug, warn};

    use super::WindowControl;
    use crate::sys::app::{Pid, TargetApp};
    use crate::sys::geometry::{Point, Size};

    const AX_SUCCESS: i32 = 0;
    const AX_VALUE_CGPOINT: u32 = 1;
    const AX_VALUE_CGSIZE: u32 = 2;
    const AX_STANDARD_WINDOW_SUBROLE: &str = "AXStandardWindow";

    #[link(name = "ApplicationServices", kind = "framework")]
    unsafe extern "C" {
        fn AXIsProcessTrusted() -> bool;
        fn AXUIElementCreateApplication(pid: Pid) -> *const c_void;
        fn AXUIElementCopyAttributeValue(
            element: *const c_void,
            attribute: *const c_void,
            value: *mut *const c_void,
        ) -> i32;
        fn AXUIElementSetAttributeValue(
            element: *const c_void,
            attribute: *const c_void,
            value: *const c_void,
        ) -> i32;
        fn AXValueCreate(value_type: u32, value: *const c_void) -> *const c_void;
        fn AXValueGetValue(value: *const c_void, value_type: u32, out: *mut c_void) -> bool;
    }

    #[link(name = "CoreFoundation", kind = "framework")]
    unsafe extern "C" {
        fn CFArrayGetCount(array: *const c_void) -> isize;
        fn CFArrayGetValueAtIndex(array: *const c_void, index: isize) -> *const c_void;
        fn CFRetain(cf: *const c_void) -> *const c_void;
        fn CFRelease(cf: *const c_void);
    }

    /// Owned CFTypeRef, released on drop.
    struct CfRef(*const c_void);

    impl Drop for CfRef {
        fn drop(&mut self) {
            if !self.0.is_null() {
                unsafe { CFRelease(self.0) }
            }
        }
    }

    /// An AXUIElement for one window of the target application.
    pub struct AxWindow(CfRef);

    fn attr(name: &'static str) -> CFRetained<CFString> { CFString::from_static_str(name) }

    fn attr_ptr(s: &CFRetained<CFString>) -> *const c_void {
        CFRetained::<CFString>::as_ptr(s).as_ptr() as *const c_void
    }

    fn copy_attribute(element: *const c_void, name: &'static str) -> Option<CfRef> {
        let attribute = attr(name);
        let mut value: *const c_void = ptr::null();
        let err =
            unsafe { AXUIElementCopyAttributeValue(element, attr_ptr(&attribute), &mut value) };
        if err != AX_SUCCESS || value.is_null() {
            return None;
        }
        Some(CfRef(value))
    }

    fn set_attribute(element: *const c_void, name: &'static str, value: &CfRef) {
        let attribute = attr(name);
        let err = unsafe { AXUIElementSetAttributeValue(element, attr_ptr(&attribute), value.0) };
        if err != AX_SUCCESS {
            debug!(name, error = %super::Error::Ax(err), "window mutation failed");
        }
    }

    /// Window control over the Accessibility API.
    pub struct AxWindowControl;

    impl AxWindowControl {
        pub fn new() -> Self { Self }

        pub fn is_trusted() -> bool { unsafe { AXIsProcessTrusted() } }
    }

    impl WindowControl for AxWindowControl {
        type Handle = AxWindow;

        fn list_windows(&self, app: &TargetApp) -> Vec<AxWindow> {
            let app_ref = CfRef(unsafe { AXUIElementCreateApplication(app.pid) });
            let Some(windows) = copy_attribute(app_ref.0, "AXWindows") else {
                warn!(pid = app.pid, "could not read the window list");
                return Vec::new();
            };
            let count = unsafe { CFArrayGetCount(windows.0) };
            (0..count)
                .map(|i| {
                    AxWindow(CfRef(unsafe {
                        CFRetain(CFArrayGetValueAtIndex(windows.0, i))
                    }))
                })
                .collect()
        }

        fn is_standard(&self, window: &AxWindow) -> bool {
            let Some(subrole) = copy_attribute(window.0.0, "AXSubrole") else {
                return false;
            };
            let subrole = unsafe { &*(subrole.0 as *const CFString) };
            subrole.to_string() == AX_STANDARD_WINDOW_SUBROLE
        }

        fn position(&self, window: &AxWindow) -> Option<Point> {
            let value = copy_attribute(window.0.0, "AXPosition")?;
            let mut point = CGPoint::ZERO;
            let ok = unsafe {
                AXValueGetValue(
                    value.0,
                    AX_VALUE_CGPOINT,
                    (&mut point as *mut CGPoint).cast(),
                )
            };
            ok.then(|| point.into())
        }

        fn set_position(&self, window: &AxWindow, position: Point) {
            let point: CGPoint = position.into();
            let value = unsafe { AXValueCreate(AX_VALUE_CGPOINT, (&point as *const CGPoint).cast()) };
            if value.is_null() {
                return;
            }
            set_attribute(window.0.0, "AXPosition", &CfRef(value));
        }

        fn set_size(&self, window: &AxWindow, size: Size) {
            let size: CGSize = size.into();
            let value = unsafe { AXValueCreate(AX_VALUE_CGSIZE, (&size as *const CGSize).cast()) };
            if value.is_null() {
                return;
            }
            set_attribute(window.0.0, "AXSize", &CfRef(value));
        }
    }
}
