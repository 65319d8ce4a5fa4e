use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use embedded_hal::blocking::delay::DelayMs;
use log::{info, warn};

use crate::config::beacon::TimingParams;
use crate::display::{Status, StatusDisplay};
use crate::input::AckButton;
use crate::radio::traits::RadioLink;
use crate::time::{self, Clock};

use super::Station;

/// Result of the clearance check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Clearance {
    /// A full timeout passed without traffic
    Clear,
    /// Stop was requested before the channel was found clear
    Cancelled,
}

/// Startup check that the channel is quiet
///
/// Traffic heard during the check blocks the beacon until the operator
/// presses the button, after which the check starts over. There is no
/// retry limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelClearance {
    button_poll: Duration,
}

impl ChannelClearance {
    /// Create a check sampling the button every `button_poll`
    pub fn new(button_poll: Duration) -> Self {
        Self { button_poll }
    }

    /// Create a check from the protocol timing
    pub fn from_timing(timing: &TimingParams) -> Self {
        Self::new(timing.button_poll)
    }

    /// Block until no transmission is heard for `timeout`
    pub fn ensure_clear<L, D, B, T>(
        &self,
        station: &mut Station<L, D, B, T>,
        title: &str,
        timeout: Duration,
        stop: &AtomicBool,
    ) -> Clearance
    where
        L: RadioLink,
        D: StatusDisplay,
        B: AckButton,
        T: Clock + DelayMs<u32>,
    {
        loop {
            if stop.load(Ordering::Relaxed) {
                return Clearance::Cancelled;
            }

            station.render(title, Status::ClearingFrequency);
            info!("Clearing frequency...");

            if station.io.link.receive(Some(timeout)).is_none() {
                info!("frequency clear");
                return Clearance::Clear;
            }

            station.stats.busy_readings = station.stats.busy_readings.wrapping_add(1);
            station.render(title, Status::FrequencyNotClear);
            warn!("Frequency was not clear. Beacon not starting");

            if !self.wait_for_press(station, stop) {
                return Clearance::Cancelled;
            }
        }
    }

    /// Poll the button until pressed; `false` when stopped instead
    fn wait_for_press<L, D, B, T>(&self, station: &mut Station<L, D, B, T>, stop: &AtomicBool) -> bool
    where
        B: AckButton,
        T: DelayMs<u32>,
    {
        while !station.io.button.is_pressed() {
            if stop.load(Ordering::Relaxed) {
                return false;
            }
            time::sleep(&mut station.io.timer, self.button_poll);
        }
        true
    }
}
