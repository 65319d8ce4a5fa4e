//! LoRa beacon controller
//!
//! This crate implements a single-node radio beacon. The beacon waits until
//! its channel is quiet, then repeatedly announces itself with a sweep of
//! decreasing transmit power and listens for replies. Channel and reply state
//! is shown on a small status display, and the operator acknowledges new
//! replies with a push button.
//!
//! # Features
//! - Channel clearance check before the first transmission
//! - Power-stepped transmit sweep with abort on failure
//! - Timed listen window with reply/noise classification
//! - Hardware abstraction for radio, display, button and clock
//! - `no_std` by default; `std` adds a host timer and the simulator binary
//!
//! # Example
//! ```no_run
//! use core::sync::atomic::AtomicBool;
//! use lora_beacon::{
//!     beacon::{BeaconController, Peripherals},
//!     config::BeaconConfig,
//! };
//!
//! # fn demo<L, D, B, T>(link: L, display: D, button: B, timer: T)
//! # where
//! #     L: lora_beacon::radio::RadioLink,
//! #     D: lora_beacon::display::StatusDisplay,
//! #     B: lora_beacon::input::AckButton,
//! #     T: lora_beacon::time::Clock + embedded_hal::blocking::delay::DelayMs<u32>,
//! # {
//! let io = Peripherals { link, display, button, timer };
//! let mut beacon = BeaconController::new(BeaconConfig::default(), io);
//!
//! let stop = AtomicBool::new(false);
//! beacon.run(&stop);
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

/// Beacon protocol: clearance check, transmit sweep, listen window
pub mod beacon;

/// Beacon and radio configuration
pub mod config;

/// Status display abstraction and layout
pub mod display;

/// Error types
pub mod error;

/// Acknowledgment button
pub mod input;

/// Received payload classification
pub mod message;

/// Radio hardware abstraction layer
pub mod radio;

/// Host simulation of the beacon hardware
#[cfg(feature = "std")]
pub mod sim;

/// Monotonic time
pub mod time;
