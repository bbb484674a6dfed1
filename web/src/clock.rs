use std::future::Future;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use pixelbox_core::scheduler::Clock;
use web_sys::Performance;

/// `performance.now()` clock. Both suspension points are timer futures, so
/// every await returns control to the browser event loop.
pub struct BrowserClock {
    performance: Performance,
    origin_ms: f64,
}

impl BrowserClock {
    pub fn new(performance: Performance) -> Self {
        let origin_ms = performance.now();
        Self {
            performance,
            origin_ms,
        }
    }
}

impl Clock for BrowserClock {
    fn now(&self) -> Duration {
        let ms = (self.performance.now() - self.origin_ms).max(0.0);
        Duration::from_secs_f64(ms / 1000.0)
    }

    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
        let ms = duration.as_millis().min(u32::MAX as u128) as u32;
        TimeoutFuture::new(ms)
    }

    fn yield_now(&mut self) -> impl Future<Output = ()> {
        TimeoutFuture::new(0)
    }
}
