use std::fmt;

use crate::scheduler::Pacing;

/// Execution environment the runtime is built for.
///
/// Resolved from the compilation target rather than detected at run time, and
/// handed explicitly to whatever needs it (see
/// [`SchedulerConfig::for_platform`](crate::scheduler::SchedulerConfig::for_platform)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Bare-metal microcontroller driving an LED matrix.
    Embedded,
    /// Desktop process with an OS window.
    Desktop,
    /// Browser sandbox with a cooperative, single-threaded event loop.
    Browser,
}

impl Platform {
    pub const fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Platform::Browser
        } else if cfg!(target_os = "none") {
            Platform::Embedded
        } else {
            Platform::Desktop
        }
    }

    /// Lowercase identifier for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Platform::Embedded => "embedded",
            Platform::Desktop => "desktop",
            Platform::Browser => "browser",
        }
    }

    /// Blocking sleep wherever nothing else needs the thread; a cooperative
    /// yield in the browser, where sleeping would freeze the page.
    pub const fn default_pacing(self) -> Pacing {
        match self {
            Platform::Browser => Pacing::Yield,
            Platform::Embedded | Platform::Desktop => Pacing::Sleep,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
