//! Beacon protocol
//!
//! The beacon checks once that the channel is quiet, then repeats a
//! transmit sweep followed by a listen window for as long as it runs:
//! - [`clearance`]: startup channel clearance check
//! - [`cycle`]: transmit sweep and listen window
//! - [`controller`]: state machine tying the phases together

/// Channel clearance check
pub mod clearance;

/// Transmit sweep and listen window
pub mod cycle;

/// Beacon state machine
pub mod controller;

pub use clearance::{ChannelClearance, Clearance};
pub use controller::{BeaconController, BeaconState};
pub use cycle::{BeaconCycle, CycleOutcome, ListenReport};

use crate::display::{Status, StatusDisplay};

/// Hardware the beacon drives
pub struct Peripherals<L, D, B, T> {
    /// Packet radio link
    pub link: L,
    /// Status display
    pub display: D,
    /// Acknowledgment button
    pub button: B,
    /// Clock and delay provider
    pub timer: T,
}

/// "New message" flag
///
/// Set when a readable reply is heard, cleared when the operator
/// acknowledges it with the button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NotificationFlag(bool);

impl NotificationFlag {
    /// Whether an unacknowledged reply is pending
    pub fn is_set(self) -> bool {
        self.0
    }

    fn set(&mut self) {
        self.0 = true;
    }

    /// Clear the flag, returning whether it was set
    fn acknowledge(&mut self) -> bool {
        core::mem::replace(&mut self.0, false)
    }
}

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeaconStats {
    /// Completed transmit/listen cycles
    pub cycles: u32,
    /// Beacon packets sent
    pub pings_sent: u32,
    /// Sweeps aborted by a failed send
    pub failed_sweeps: u32,
    /// Readable replies heard
    pub replies: u32,
    /// Unreadable packets heard
    pub noise: u32,
    /// Clearance readings that found traffic
    pub busy_readings: u32,
}

/// Peripherals plus the mutable protocol state shared by all phases
pub struct Station<L, D, B, T> {
    io: Peripherals<L, D, B, T>,
    flag: NotificationFlag,
    stats: BeaconStats,
}

impl<L, D, B, T> Station<L, D, B, T>
where
    D: StatusDisplay,
{
    /// Create a station with a clear flag and zeroed counters
    pub fn new(io: Peripherals<L, D, B, T>) -> Self {
        Self {
            io,
            flag: NotificationFlag::default(),
            stats: BeaconStats::default(),
        }
    }

    /// Current notification flag
    pub fn flag(&self) -> NotificationFlag {
        self.flag
    }

    /// Running counters
    pub fn stats(&self) -> &BeaconStats {
        &self.stats
    }

    /// Driven hardware
    pub fn peripherals(&self) -> &Peripherals<L, D, B, T> {
        &self.io
    }

    /// Driven hardware, mutable
    pub fn peripherals_mut(&mut self) -> &mut Peripherals<L, D, B, T> {
        &mut self.io
    }

    /// Release the hardware
    pub fn release(self) -> Peripherals<L, D, B, T> {
        self.io
    }

    /// Show `status` under `title`, with the indicator following the flag
    fn render(&mut self, title: &str, status: Status) {
        self.io
            .display
            .show(title, status.text(), self.flag.is_set());
    }
}
