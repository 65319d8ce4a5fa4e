use core::time::Duration;

use crate::config::beacon::PowerLevel;
use crate::message::ReceivedMessage;

/// Radio modulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModulationParams {
    /// Spreading factor (SF6-SF12)
    pub spreading_factor: u8,
    /// Bandwidth in Hz
    pub bandwidth: u32,
    /// Coding rate denominator (4/5 to 4/8)
    pub coding_rate: u8,
}

/// Radio transmission parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxConfig {
    /// Transmission power in dBm
    pub power: i8,
    /// Frequency in Hz
    pub frequency: u32,
    /// Modulation parameters
    pub modulation: ModulationParams,
}

/// Radio receive parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxConfig {
    /// Frequency in Hz
    pub frequency: u32,
    /// Modulation parameters
    pub modulation: ModulationParams,
    /// Receive timeout in milliseconds, 0 for continuous reception
    pub timeout_ms: u32,
}

/// Transceiver driver interface
///
/// Implemented by chip drivers. All operations are fallible and report the
/// driver's own error type.
pub trait Radio {
    /// Error type for radio operations
    type Error: core::fmt::Debug;

    /// Initialize the radio
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Set the radio's transmission power
    fn set_tx_power(&mut self, power: i8) -> Result<(), Self::Error>;

    /// Configure the radio for transmission
    fn configure_tx(&mut self, config: TxConfig) -> Result<(), Self::Error>;

    /// Configure the radio for reception and start listening
    fn configure_rx(&mut self, config: RxConfig) -> Result<(), Self::Error>;

    /// Transmit data, blocking until the packet has left the radio
    fn transmit(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;

    /// Copy a completed packet into `buffer`
    ///
    /// Returns `WouldBlock` while no packet has been received.
    fn receive(&mut self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error>;

    /// Get the last packet's RSSI (Received Signal Strength Indicator)
    fn get_rssi(&mut self) -> Result<i16, Self::Error>;

    /// Put the radio into standby mode
    fn standby(&mut self) -> Result<(), Self::Error>;
}

/// Packet link used by the beacon protocol
///
/// Operations never fail from the caller's point of view: a failed
/// transmission is `false` and a failed or empty reception is `None`.
pub trait RadioLink {
    /// Set the transmit power for following sends
    fn set_power(&mut self, level: PowerLevel);

    /// Send one payload, returning `true` when the transmission completed
    fn send(&mut self, payload: &[u8]) -> bool;

    /// Wait for the next payload
    ///
    /// Returns `None` when `timeout` elapses first. `None` as timeout waits
    /// without limit.
    fn receive(&mut self, timeout: Option<Duration>) -> Option<ReceivedMessage>;
}
