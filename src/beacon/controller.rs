use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::blocking::delay::DelayMs;
use log::{debug, info, warn};

use crate::config::beacon::BeaconConfig;
use crate::display::{Status, StatusDisplay};
use crate::input::AckButton;
use crate::radio::traits::RadioLink;
use crate::time::{self, Clock};

use super::clearance::{ChannelClearance, Clearance};
use super::cycle::{BeaconCycle, CycleOutcome};
use super::{BeaconStats, NotificationFlag, Peripherals, Station};

/// Beacon state machine states
///
/// `Clearing` runs once at startup; afterwards the beacon alternates between
/// `Transmitting` and `Listening` without a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeaconState {
    /// Waiting for a quiet channel
    Clearing,
    /// Running the transmit sweep
    Transmitting,
    /// Running the listen window
    Listening,
}

/// Beacon controller
pub struct BeaconController<L, D, B, T> {
    config: BeaconConfig,
    station: Station<L, D, B, T>,
    state: BeaconState,
    clearance: ChannelClearance,
    cycle: BeaconCycle,
}

impl<L, D, B, T> BeaconController<L, D, B, T>
where
    L: RadioLink,
    D: StatusDisplay,
    B: AckButton,
    T: Clock + DelayMs<u32>,
{
    /// Create a controller in the `Clearing` state
    pub fn new(config: BeaconConfig, io: Peripherals<L, D, B, T>) -> Self {
        Self {
            clearance: ChannelClearance::from_timing(&config.timing),
            cycle: BeaconCycle::from_timing(&config.timing),
            config,
            station: Station::new(io),
            state: BeaconState::Clearing,
        }
    }

    /// Current state
    pub fn state(&self) -> BeaconState {
        self.state
    }

    /// Whether an unacknowledged reply is pending
    pub fn notification(&self) -> NotificationFlag {
        self.station.flag()
    }

    /// Running counters
    pub fn stats(&self) -> &BeaconStats {
        self.station.stats()
    }

    /// Active configuration
    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    /// Driven hardware
    pub fn peripherals(&self) -> &Peripherals<L, D, B, T> {
        self.station.peripherals()
    }

    /// Release the hardware
    pub fn release(self) -> Peripherals<L, D, B, T> {
        self.station.release()
    }

    /// Run the current state's phase and move to the next state
    ///
    /// A cancelled clearance check leaves the state at `Clearing`.
    pub fn step(&mut self, stop: &AtomicBool) -> BeaconState {
        let title = self.config.identity.label();
        let timing = self.config.timing;

        let next = match self.state {
            BeaconState::Clearing => {
                match self.clearance.ensure_clear(
                    &mut self.station,
                    title,
                    timing.clearance_timeout,
                    stop,
                ) {
                    Clearance::Clear => {
                        info!("--- {} Ready ---", title);
                        BeaconState::Transmitting
                    }
                    Clearance::Cancelled => BeaconState::Clearing,
                }
            }
            BeaconState::Transmitting => {
                let outcome = self.cycle.transmit_sweep(
                    &mut self.station,
                    &self.config.identity,
                    &self.config.sweep,
                );
                if let CycleOutcome::SendFailed(level) = outcome {
                    warn!("error sending pings (at {} dBm)", level);
                    self.station.stats.failed_sweeps =
                        self.station.stats.failed_sweeps.wrapping_add(1);
                    self.station.render(title, Status::SendError);
                    time::sleep(&mut self.station.io.timer, timing.failure_pause);
                }
                BeaconState::Listening
            }
            BeaconState::Listening => {
                let report = self
                    .cycle
                    .listen_window(&mut self.station, title, timing.listen_window);
                debug!(
                    "listen window closed: {} replies, {} noise",
                    report.replies, report.noise
                );
                self.station.stats.cycles = self.station.stats.cycles.wrapping_add(1);
                BeaconState::Transmitting
            }
        };

        if next != self.state {
            debug!("{:?} -> {:?}", self.state, next);
        }
        self.state = next;
        next
    }

    /// Run until `stop` is raised
    ///
    /// `stop` is checked between phases and while waiting for the operator
    /// during the clearance check; a running listen window always completes.
    pub fn run(&mut self, stop: &AtomicBool) {
        info!("Starting {}", self.config.identity.label());
        while !stop.load(Ordering::Relaxed) {
            self.step(stop);
        }
        info!("beacon stopped");
    }

    /// Run until the process is terminated
    pub fn run_forever(&mut self) -> ! {
        let never = AtomicBool::new(false);
        info!("Starting {}", self.config.identity.label());
        loop {
            self.step(&never);
        }
    }
}
