//! Monotonic time source

use core::time::Duration;

/// Monotonic clock
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Host timer backed by `std::time::Instant` and `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdTimer {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdTimer {
    /// Create a timer whose origin is now
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdTimer {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(feature = "std")]
impl embedded_hal::blocking::delay::DelayMs<u32> for StdTimer {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// Sleep for `duration` through a millisecond delay provider
pub(crate) fn sleep<T>(timer: &mut T, duration: Duration)
where
    T: embedded_hal::blocking::delay::DelayMs<u32>,
{
    let ms = duration.as_millis().min(u32::MAX as u128) as u32;
    if ms > 0 {
        timer.delay_ms(ms);
    }
}
