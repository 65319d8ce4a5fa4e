use core::time::Duration;

use embedded_hal::blocking::delay::DelayMs;
use log::{info, warn};

use crate::config::beacon::{BeaconIdentity, PowerLevel, PowerSweep, TimingParams};
use crate::display::{Status, StatusDisplay};
use crate::input::AckButton;
use crate::message::Classification;
use crate::radio::traits::RadioLink;
use crate::time::{self, Clock};

use super::Station;

/// Result of one transmit sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Every level of the sweep was sent
    AllSent,
    /// Sending failed at this level; lower levels were skipped
    SendFailed(PowerLevel),
}

/// Packets heard during one listen window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ListenReport {
    /// Readable replies
    pub replies: u32,
    /// Unreadable packets
    pub noise: u32,
}

/// Transmit sweep and listen window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconCycle {
    tx_interval: Duration,
    rx_poll: Duration,
}

impl BeaconCycle {
    /// Create a cycle waiting `tx_interval` between sends and receiving in
    /// slices of at most `rx_poll` while listening
    pub fn new(tx_interval: Duration, rx_poll: Duration) -> Self {
        Self {
            tx_interval,
            rx_poll,
        }
    }

    /// Create a cycle from the protocol timing
    pub fn from_timing(timing: &TimingParams) -> Self {
        Self::new(timing.tx_interval, timing.rx_poll)
    }

    /// Announce the beacon once per sweep level, highest power first
    ///
    /// Stops at the first failed send.
    pub fn transmit_sweep<L, D, B, T>(
        &self,
        station: &mut Station<L, D, B, T>,
        identity: &BeaconIdentity,
        sweep: &PowerSweep,
    ) -> CycleOutcome
    where
        L: RadioLink,
        D: StatusDisplay,
        T: DelayMs<u32>,
    {
        station.render(identity.label(), Status::SendingPings);

        for &level in sweep.levels() {
            station.io.link.set_power(level);

            let payload = match identity.payload(level) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("cannot build beacon payload: {}", e);
                    return CycleOutcome::SendFailed(level);
                }
            };
            if !station.io.link.send(&payload) {
                return CycleOutcome::SendFailed(level);
            }

            station.stats.pings_sent = station.stats.pings_sent.wrapping_add(1);
            info!("{}", identity.announcement(level));
            time::sleep(&mut station.io.timer, self.tx_interval);
        }

        CycleOutcome::AllSent
    }

    /// Listen for replies until `duration` has elapsed
    ///
    /// The window always runs to its end; replies do not cut it short.
    pub fn listen_window<L, D, B, T>(
        &self,
        station: &mut Station<L, D, B, T>,
        title: &str,
        duration: Duration,
    ) -> ListenReport
    where
        L: RadioLink,
        D: StatusDisplay,
        B: AckButton,
        T: Clock,
    {
        let mut report = ListenReport::default();
        station.render(title, Status::Listening);

        let deadline = station.io.timer.now() + duration;
        loop {
            let now = station.io.timer.now();
            if now >= deadline {
                break;
            }

            if station.io.button.is_pressed() && station.flag.acknowledge() {
                info!("new message acknowledged");
                station.render(title, Status::Listening);
            }

            let timeout = self.rx_poll.min(deadline - now);
            let message = match station.io.link.receive(Some(timeout)) {
                Some(message) => message,
                None => continue,
            };

            match message.classify() {
                Classification::Valid(text) => {
                    match message.rssi() {
                        Some(rssi) => info!("> {} (RSSI {} dBm)", text, rssi),
                        None => info!("> {}", text),
                    }
                    report.replies += 1;
                    station.stats.replies = station.stats.replies.wrapping_add(1);
                    station.flag.set();
                    station.render(title, Status::HeardReply);
                }
                Classification::Unintelligible => {
                    info!("got packet, but it was not valid. noise?");
                    report.noise += 1;
                    station.stats.noise = station.stats.noise.wrapping_add(1);
                    station.render(title, Status::Noise);
                }
            }
        }

        report
    }
}
