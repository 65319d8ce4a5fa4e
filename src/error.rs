//! Error types shared across the crate

use thiserror::Error;

/// Configuration validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Beacon label is empty
    #[error("beacon label is empty")]
    EmptyLabel,
    /// Beacon label does not fit the label buffer
    #[error("beacon label longer than {0} bytes")]
    LabelTooLong(usize),
    /// Power level outside the supported range
    #[error("power level {0} dBm outside {1}..={2} dBm")]
    PowerOutOfRange(i8, i8, i8),
    /// Sweep step of zero
    #[error("power sweep step must be positive")]
    ZeroStep,
    /// Sweep without any level
    #[error("power sweep is empty")]
    EmptySweep,
    /// Sweep with more levels than the sweep buffer holds
    #[error("power sweep holds at most {0} levels")]
    SweepTooLong(usize),
    /// Sweep levels are not strictly descending
    #[error("power sweep must be strictly descending ({0} dBm followed by {1} dBm)")]
    NotDescending(i8, i8),
    /// Operating frequency outside the LoRa bands
    #[error("frequency {0} Hz outside 137-1020 MHz")]
    FrequencyOutOfRange(u32),
    /// Beacon payload would not fit into a single packet
    #[error("beacon payload of {0} bytes exceeds the {1} byte packet limit")]
    PayloadTooLarge(usize, usize),
}

/// Error raised while bringing up a packet link
#[derive(Debug, Error)]
pub enum LinkError<E> {
    /// Radio driver reported an error
    #[error("radio driver error: {0:?}")]
    Radio(E),
    /// Radio settings rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}
