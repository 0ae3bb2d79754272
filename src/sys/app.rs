//! The target application: the app whose windows an operation affects.
//!
//! The target is tracked externally (the frontmost application changes as
//! the user works); the core only ever reads a snapshot of it.

use serde::{Deserialize, Serialize};

pub type Pid = i32;

/// Our own bundle identifier. Never a valid target: snapping our own
/// windows while handling a request would fight the user's focus.
pub const BUNDLE_ID: &str = "com.winsnap.winsnap";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TargetApp {
    pub pid: Pid,
    pub bundle_id: Option<String>,
    pub localized_name: Option<String>,
}

impl TargetApp {
    pub fn display_name(&self) -> &str {
        self.localized_name
            .as_deref()
            .or(self.bundle_id.as_deref())
            .unwrap_or("unknown application")
    }
}

#[cfg(target_os = "macos")]
pub use macos::{activate, frontmost_app, running_app_matching};

#[cfg(target_os = "macos")]
mod macos {
    use objc2::rc::Retained;
    use objc2::{class, msg_send};
    use objc2_app_kit::{NSApplicationActivationOptions, NSRunningApplication, NSWorkspace};
    use objc2_foundation::NSString;

    use super::{Pid, TargetApp};

    pub trait NSRunningApplicationExt {
        fn with_process_id(pid: Pid) -> Option<Retained<Self>>;
        fn pid(&self) -> Pid;
        fn bundle_id(&self) -> Option<Retained<NSString>>;
        fn localized_name(&self) -> Option<Retained<NSString>>;
    }

    impl NSRunningApplicationExt for NSRunningApplication {
        fn with_process_id(pid: Pid) -> Option<Retained<Self>> {
            unsafe {
                // For some reason this binding isn't generated in icrate.
                msg_send![class!(NSRunningApplication), runningApplicationWithProcessIdentifier:pid]
            }
        }

        fn pid(&self) -> Pid { unsafe { msg_send![self, processIdentifier] } }

        fn bundle_id(&self) -> Option<Retained<NSString>> { self.bundleIdentifier() }

        fn localized_name(&self) -> Option<Retained<NSString>> { self.localizedName() }
    }

    impl From<&NSRunningApplication> for TargetApp {
        fn from(app: &NSRunningApplication) -> Self {
            TargetApp {
                pid: app.pid(),
                bundle_id: app.bundle_id().as_deref().map(ToString::to_string),
                localized_name: app.localized_name().as_deref().map(ToString::to_string),
            }
        }
    }

    /// The currently frontmost application.
    pub fn frontmost_app() -> Option<TargetApp> {
        let app = unsafe { NSWorkspace::sharedWorkspace().frontmostApplication() }?;
        Some(TargetApp::from(&*app))
    }

    /// The first running application whose bundle id contains `filter`.
    pub fn running_app_matching(filter: &str) -> Option<TargetApp> {
        unsafe { NSWorkspace::sharedWorkspace().runningApplications() }
            .into_iter()
            .find(|app| {
                app.bundle_id().is_some_and(|id| id.to_string().contains(filter))
            })
            .map(|app| TargetApp::from(&*app))
    }

    /// Returns focus to the target app after its windows were moved.
    pub fn activate(app: &TargetApp) {
        if let Some(running) = NSRunningApplication::with_process_id(app.pid) {
            unsafe {
                running.activateWithOptions(NSApplicationActivationOptions::empty());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_the_localized_name() {
        let app = TargetApp {
            pid: 42,
            bundle_id: Some("com.apple.Safari".into()),
            localized_name: Some("Safari".into()),
        };
        assert_eq!(app.display_name(), "Safari");

        let nameless = TargetApp {
            pid: 43,
            bundle_id: Some("com.apple.Terminal".into()),
            localized_name: None,
        };
        assert_eq!(nameless.display_name(), "com.apple.Terminal");

        let bare = TargetApp { pid: 44, bundle_id: None, localized_name: None };
        assert_eq!(bare.display_name(), "unknown application");
    }
}
