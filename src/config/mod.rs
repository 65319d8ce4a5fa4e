//! Beacon and radio configuration
//!
//! This module contains the process-start configuration of the beacon:
//! - Beacon identity (label, frequency)
//! - Transmit power sweep
//! - Protocol timing
//! - Radio link settings

/// Beacon identity, power sweep and timing
pub mod beacon;

/// Radio link settings
pub mod radio;

pub use beacon::{BeaconConfig, BeaconIdentity, PowerLevel, PowerSweep, TimingParams};
pub use radio::RadioSettings;
