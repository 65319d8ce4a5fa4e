//! Packet link over a transceiver driver
//!
//! Frames each payload with the four byte header, filters incoming packets
//! by destination and turns the driver's non-blocking receive into a
//! receive with timeout.

use core::time::Duration;

use embedded_hal::blocking::delay::DelayMs;
use heapless::Vec;
use log::{debug, warn};

use crate::config::beacon::{PowerLevel, MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};
use crate::config::radio::RadioSettings;
use crate::error::{ConfigError, LinkError};
use crate::message::ReceivedMessage;
use crate::time::Clock;

use super::header::{Header, MAX_PACKET_SIZE, MAX_PAYLOAD_SIZE};
use super::traits::{Radio, RadioLink, RxConfig, TxConfig};

/// Interval between two receive polls in milliseconds
const RX_POLL_INTERVAL_MS: u32 = 5;

/// `RadioLink` implementation over a `Radio` driver
pub struct PacketRadio<R: Radio, T> {
    radio: R,
    timer: T,
    settings: RadioSettings,
    frequency: u32,
    identifier: u8,
}

impl<R, T> PacketRadio<R, T>
where
    R: Radio,
    T: Clock + DelayMs<u32>,
{
    /// Initialize the radio and tune it to `frequency` at full power
    pub fn new(
        mut radio: R,
        timer: T,
        frequency: u32,
        settings: RadioSettings,
    ) -> Result<Self, LinkError<R::Error>> {
        if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&frequency) {
            return Err(ConfigError::FrequencyOutOfRange(frequency).into());
        }

        radio.init().map_err(LinkError::Radio)?;
        radio
            .configure_tx(TxConfig {
                power: PowerLevel::MAX.dbm(),
                frequency,
                modulation: settings.modulation,
            })
            .map_err(LinkError::Radio)?;
        radio.standby().map_err(LinkError::Radio)?;

        Ok(Self {
            radio,
            timer,
            settings,
            frequency,
            identifier: 0,
        })
    }

    /// Underlying radio driver
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Underlying radio driver, mutable
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Release the driver and timer
    pub fn release(self) -> (R, T) {
        (self.radio, self.timer)
    }

    fn frame(&self, payload: &[u8]) -> Option<Vec<u8, MAX_PACKET_SIZE>> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return None;
        }
        let header = Header {
            destination: self.settings.destination,
            node: self.settings.node,
            identifier: self.identifier,
            flags: 0,
        };
        let mut packet = Vec::new();
        packet.extend_from_slice(&header.to_bytes()).ok()?;
        packet.extend_from_slice(payload).ok()?;
        Some(packet)
    }

    fn accept(&mut self, packet: &[u8]) -> Option<ReceivedMessage> {
        match Header::parse(packet) {
            Some((header, payload)) if header.is_for(self.settings.node) => {
                let message = ReceivedMessage::new(payload);
                Some(match self.radio.get_rssi() {
                    Ok(rssi) => message.with_rssi(rssi),
                    Err(_) => message,
                })
            }
            Some((header, _)) => {
                debug!(
                    "ignoring packet from {:#04x} to {:#04x}",
                    header.node, header.destination
                );
                None
            }
            None => {
                debug!("ignoring {} byte packet without payload", packet.len());
                None
            }
        }
    }
}

impl<R, T> RadioLink for PacketRadio<R, T>
where
    R: Radio,
    T: Clock + DelayMs<u32>,
{
    fn set_power(&mut self, level: PowerLevel) {
        if let Err(e) = self.radio.set_tx_power(level.dbm()) {
            warn!("failed to set tx power {} dBm: {:?}", level, e);
        }
    }

    fn send(&mut self, payload: &[u8]) -> bool {
        let packet = match self.frame(payload) {
            Some(packet) => packet,
            None => {
                warn!(
                    "payload of {} bytes exceeds {} byte limit",
                    payload.len(),
                    MAX_PAYLOAD_SIZE
                );
                return false;
            }
        };

        match self.radio.transmit(&packet) {
            Ok(()) => {
                self.identifier = self.identifier.wrapping_add(1);
                true
            }
            Err(e) => {
                warn!("transmit failed: {:?}", e);
                false
            }
        }
    }

    fn receive(&mut self, timeout: Option<Duration>) -> Option<ReceivedMessage> {
        let deadline = timeout.map(|t| self.timer.now() + t);
        let config = RxConfig {
            frequency: self.frequency,
            modulation: self.settings.modulation,
            timeout_ms: timeout.map_or(0, |t| t.as_millis().min(u32::MAX as u128) as u32),
        };
        if let Err(e) = self.radio.configure_rx(config) {
            warn!("failed to start reception: {:?}", e);
            return None;
        }

        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let message = loop {
            match self.radio.receive(&mut buffer) {
                Ok(len) => {
                    let len = len.min(buffer.len());
                    if let Some(message) = self.accept(&buffer[..len]) {
                        break Some(message);
                    }
                }
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => {
                    warn!("receive failed: {:?}", e);
                    break None;
                }
            }
            if deadline.map_or(false, |deadline| self.timer.now() >= deadline) {
                break None;
            }
            self.timer.delay_ms(RX_POLL_INTERVAL_MS);
        };

        if let Err(e) = self.radio.standby() {
            warn!("failed to return to standby: {:?}", e);
        }
        message
    }
}
