use std::future::Future;
use std::time::{Duration, Instant};

/// Time source and suspension primitives for the frame scheduler.
///
/// Blocking targets implement `sleep` by parking the thread; cooperative
/// targets return futures that hand control back to the host event loop.
/// The scheduler only ever calls one of `sleep` or `yield_now`, chosen by
/// its [`Pacing`](super::Pacing) setting.
pub trait Clock {
    /// Monotonic time since an arbitrary, fixed epoch.
    fn now(&self) -> Duration;

    /// Suspend for at least `duration`.
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()>;

    /// Give the host one chance to run, without waiting for wall-clock time.
    fn yield_now(&mut self) -> impl Future<Output = ()>;
}

/// `std::time` clock for hosted blocking targets.
///
/// `sleep` blocks the calling thread; `yield_now` completes immediately
/// since there is no host loop to return to.
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    epoch: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
        async move { std::thread::sleep(duration) }
    }

    fn yield_now(&mut self) -> impl Future<Output = ()> {
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_clock_is_monotonic() {
        let clock = StdClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn std_clock_sleep_blocks() {
        let mut clock = StdClock::new();
        let before = clock.now();
        pollster::block_on(clock.sleep(Duration::from_millis(5)));
        assert!(clock.now() - before >= Duration::from_millis(5));
    }
}
