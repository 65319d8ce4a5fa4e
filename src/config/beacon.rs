use core::fmt::Write;
use core::time::Duration;

use heapless::{String, Vec};

use crate::error::ConfigError;
use crate::radio::header::MAX_PAYLOAD_SIZE;

/// Maximum beacon label length in bytes
pub const MAX_LABEL_LEN: usize = 32;

/// Maximum announcement length: label plus ` p=NN`
pub const MAX_ANNOUNCEMENT_LEN: usize = MAX_LABEL_LEN + 8;

/// Maximum number of levels in one sweep
pub const MAX_SWEEP_LEVELS: usize = 16;

/// Lowest supported transmit power in dBm
pub const MIN_POWER_DBM: i8 = 4;

/// Highest supported transmit power in dBm
pub const MAX_POWER_DBM: i8 = 23;

/// Lowest supported operating frequency in Hz
pub const MIN_FREQUENCY_HZ: u32 = 137_000_000;

/// Highest supported operating frequency in Hz
pub const MAX_FREQUENCY_HZ: u32 = 1_020_000_000;

/// Beacon payload buffer
pub type BeaconPayload = Vec<u8, MAX_PAYLOAD_SIZE>;

/// Transmit power in dBm
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerLevel(i8);

impl PowerLevel {
    /// Highest power level
    pub const MAX: PowerLevel = PowerLevel(MAX_POWER_DBM);

    /// Create a power level, rejecting values outside the supported range
    pub fn new(dbm: i8) -> Result<Self, ConfigError> {
        if !(MIN_POWER_DBM..=MAX_POWER_DBM).contains(&dbm) {
            return Err(ConfigError::PowerOutOfRange(dbm, MIN_POWER_DBM, MAX_POWER_DBM));
        }
        Ok(Self(dbm))
    }

    /// Power in dBm
    pub fn dbm(self) -> i8 {
        self.0
    }
}

impl core::fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered power levels visited by one transmit sweep
///
/// Levels are strictly descending, so the first level is always the
/// highest power of the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSweep {
    levels: Vec<PowerLevel, MAX_SWEEP_LEVELS>,
}

impl PowerSweep {
    /// Build a sweep starting at `max` and stepping down by `step` while
    /// the level stays at or above `min`
    pub fn stepped(max: i8, min: i8, step: u8) -> Result<Self, ConfigError> {
        if step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        PowerLevel::new(max)?;
        PowerLevel::new(min)?;

        let mut levels = Vec::new();
        let mut dbm = max as i16;
        while dbm >= min as i16 {
            levels
                .push(PowerLevel(dbm as i8))
                .map_err(|_| ConfigError::SweepTooLong(MAX_SWEEP_LEVELS))?;
            dbm -= step as i16;
        }
        if levels.is_empty() {
            return Err(ConfigError::EmptySweep);
        }
        Ok(Self { levels })
    }

    /// Build a sweep from an explicit list of levels in dBm
    pub fn from_levels(dbm: &[i8]) -> Result<Self, ConfigError> {
        if dbm.is_empty() {
            return Err(ConfigError::EmptySweep);
        }
        let mut levels: Vec<PowerLevel, MAX_SWEEP_LEVELS> = Vec::new();
        for &value in dbm {
            let level = PowerLevel::new(value)?;
            if let Some(prev) = levels.last() {
                if level >= *prev {
                    return Err(ConfigError::NotDescending(prev.dbm(), value));
                }
            }
            levels
                .push(level)
                .map_err(|_| ConfigError::SweepTooLong(MAX_SWEEP_LEVELS))?;
        }
        Ok(Self { levels })
    }

    /// Levels in transmit order
    pub fn levels(&self) -> &[PowerLevel] {
        &self.levels
    }

    /// Highest (first) level of the sweep
    pub fn max(&self) -> PowerLevel {
        self.levels[0]
    }

    /// Lowest (last) level of the sweep
    pub fn min(&self) -> PowerLevel {
        self.levels[self.levels.len() - 1]
    }
}

impl Default for PowerSweep {
    fn default() -> Self {
        Self {
            levels: [23, 17, 11, 5].iter().map(|&dbm| PowerLevel(dbm)).collect(),
        }
    }
}

/// Beacon label and operating frequency, fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconIdentity {
    label: String<MAX_LABEL_LEN>,
    frequency_hz: u32,
}

impl BeaconIdentity {
    /// Create a new identity
    pub fn new(label: &str, frequency_hz: u32) -> Result<Self, ConfigError> {
        if label.is_empty() {
            return Err(ConfigError::EmptyLabel);
        }
        if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&frequency_hz) {
            return Err(ConfigError::FrequencyOutOfRange(frequency_hz));
        }
        let mut text = String::new();
        text.push_str(label)
            .map_err(|_| ConfigError::LabelTooLong(MAX_LABEL_LEN))?;
        Ok(Self {
            label: text,
            frequency_hz,
        })
    }

    /// Beacon label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Operating frequency in Hz
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Announcement text for one power level, e.g. `LoRa Beacon p=23`
    pub fn announcement(&self, level: PowerLevel) -> String<MAX_ANNOUNCEMENT_LEN> {
        let mut text = String::new();
        // label is at most MAX_LABEL_LEN and " p=NN" fits in the remaining bytes
        let _ = write!(text, "{} p={}", self.label, level);
        text
    }

    /// Announcement text followed by a single NUL terminator, as sent on air
    pub fn payload(&self, level: PowerLevel) -> Result<BeaconPayload, ConfigError> {
        let text = self.announcement(level);
        let len = text.len() + 1;
        let mut payload = Vec::new();
        payload
            .extend_from_slice(text.as_bytes())
            .and_then(|_| payload.push(0).map_err(|_| ()))
            .map_err(|_| ConfigError::PayloadTooLarge(len, MAX_PAYLOAD_SIZE))?;
        Ok(payload)
    }
}

impl Default for BeaconIdentity {
    fn default() -> Self {
        let mut label = String::new();
        let _ = label.push_str("LoRa Beacon");
        Self {
            label,
            frequency_hz: 915_000_000,
        }
    }
}

/// Protocol timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingParams {
    /// Delay between two transmissions of a sweep
    pub tx_interval: Duration,
    /// Pause after a failed sweep before listening
    pub failure_pause: Duration,
    /// Length of each listen window
    pub listen_window: Duration,
    /// Longest single receive attempt inside a listen window
    pub rx_poll: Duration,
    /// Quiet time required by the clearance check
    pub clearance_timeout: Duration,
    /// Button sampling interval while waiting for an acknowledgment
    pub button_poll: Duration,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            tx_interval: Duration::from_millis(500),
            failure_pause: Duration::from_secs(5),
            listen_window: Duration::from_secs(20),
            rx_poll: Duration::from_millis(500),
            clearance_timeout: Duration::from_secs(30),
            button_poll: Duration::from_millis(100),
        }
    }
}

/// Complete beacon configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BeaconConfig {
    /// Label and frequency
    pub identity: BeaconIdentity,
    /// Transmit power sweep
    pub sweep: PowerSweep,
    /// Protocol timing
    pub timing: TimingParams,
}

impl BeaconConfig {
    /// Create a configuration with the default sweep and timing
    pub fn new(identity: BeaconIdentity) -> Self {
        Self {
            identity,
            sweep: PowerSweep::default(),
            timing: TimingParams::default(),
        }
    }

    /// Replace the power sweep
    pub fn with_sweep(mut self, sweep: PowerSweep) -> Self {
        self.sweep = sweep;
        self
    }

    /// Replace the protocol timing
    pub fn with_timing(mut self, timing: TimingParams) -> Self {
        self.timing = timing;
        self
    }
}
