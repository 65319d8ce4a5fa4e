//! Simulated beacon hardware for running on a host
//!
//! The simulated channel carries packets between the beacon and a scripted
//! peer that answers some announcements and occasionally produces noise.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::display::TextCanvas;
use crate::input::AckButton;
use crate::radio::header::{Header, BROADCAST_ADDRESS};
use crate::radio::traits::{Radio, RxConfig, TxConfig};

/// Simulator error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorError {
    /// Radio used before `init`
    NotInitialized,
    /// Packet larger than the receive buffer
    BufferTooSmall,
}

/// Shared channel delivering packets after a delay
#[derive(Clone, Default)]
pub struct SimChannel {
    packets: Arc<Mutex<VecDeque<(Instant, Vec<u8>)>>>,
}

impl SimChannel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a packet that becomes receivable after `delay`
    pub fn push_after(&self, delay: Duration, packet: &[u8]) {
        if let Ok(mut packets) = self.packets.lock() {
            let due = Instant::now() + delay;
            let pos = packets.iter().position(|(at, _)| *at > due).unwrap_or(packets.len());
            packets.insert(pos, (due, packet.to_vec()));
        }
    }

    fn pop_due(&self) -> Option<Vec<u8>> {
        let mut packets = self.packets.lock().ok()?;
        match packets.front() {
            Some((due, _)) if *due <= Instant::now() => packets.pop_front().map(|(_, p)| p),
            _ => None,
        }
    }
}

/// Behaviour of the scripted peer
#[derive(Debug, Clone, Copy)]
pub struct PeerScript {
    /// Peer address used in reply headers
    pub address: u8,
    /// Answer every n-th announcement, 0 to stay silent
    pub reply_every: u32,
    /// Emit a noise burst after every n-th announcement, 0 to disable
    pub noise_every: u32,
    /// Delay between an announcement and the peer's answer
    pub reply_delay: Duration,
}

impl Default for PeerScript {
    fn default() -> Self {
        Self {
            address: 0x01,
            reply_every: 6,
            noise_every: 10,
            reply_delay: Duration::from_secs(3),
        }
    }
}

/// `Radio` implementation over a `SimChannel`
pub struct SimRadio {
    channel: SimChannel,
    script: PeerScript,
    initialized: bool,
    power: i8,
    frequency: u32,
    heard: u32,
}

impl SimRadio {
    /// Create a radio attached to `channel`
    pub fn new(channel: SimChannel, script: PeerScript) -> Self {
        Self {
            channel,
            script,
            initialized: false,
            power: 0,
            frequency: 0,
            heard: 0,
        }
    }

    fn peer_hears(&mut self, packet: &[u8]) {
        let Some((_, payload)) = Header::parse(packet) else {
            return;
        };
        self.heard += 1;
        debug!(
            "peer heard {:?} at {} dBm on {} Hz",
            String::from_utf8_lossy(payload),
            self.power,
            self.frequency
        );

        let header = Header {
            destination: BROADCAST_ADDRESS,
            node: self.script.address,
            identifier: self.heard as u8,
            flags: 0,
        };
        if self.script.reply_every > 0 && self.heard % self.script.reply_every == 0 {
            let mut reply = header.to_bytes().to_vec();
            reply.extend_from_slice(b"PONG");
            self.channel.push_after(self.script.reply_delay, &reply);
        }
        if self.script.noise_every > 0 && self.heard % self.script.noise_every == 0 {
            let mut noise = header.to_bytes().to_vec();
            noise.extend_from_slice(&[0xA5, 0xFE, 0x80, 0x13]);
            self.channel.push_after(self.script.reply_delay * 2, &noise);
        }
    }
}

impl Radio for SimRadio {
    type Error = SimulatorError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.initialized = true;
        Ok(())
    }

    fn set_tx_power(&mut self, power: i8) -> Result<(), Self::Error> {
        self.power = power;
        Ok(())
    }

    fn configure_tx(&mut self, config: TxConfig) -> Result<(), Self::Error> {
        self.power = config.power;
        self.frequency = config.frequency;
        info!(
            "sim radio tuned to {} Hz, SF{}, CR 4/{}",
            config.frequency, config.modulation.spreading_factor, config.modulation.coding_rate
        );
        Ok(())
    }

    fn configure_rx(&mut self, config: RxConfig) -> Result<(), Self::Error> {
        self.frequency = config.frequency;
        Ok(())
    }

    fn transmit(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        if !self.initialized {
            return Err(SimulatorError::NotInitialized);
        }
        self.peer_hears(buffer);
        Ok(())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error> {
        let packet = self.channel.pop_due().ok_or(nb::Error::WouldBlock)?;
        if packet.len() > buffer.len() {
            return Err(nb::Error::Other(SimulatorError::BufferTooSmall));
        }
        buffer[..packet.len()].copy_from_slice(&packet);
        Ok(packet.len())
    }

    fn get_rssi(&mut self) -> Result<i16, Self::Error> {
        Ok(-60 - (self.heard % 40) as i16)
    }

    fn standby(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// `TextCanvas` printing each frame through the logger
#[derive(Debug, Default)]
pub struct ConsoleCanvas {
    lines: Vec<String>,
}

impl TextCanvas for ConsoleCanvas {
    type Error = core::convert::Infallible;

    fn width(&self) -> u32 {
        128
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.lines.clear();
        Ok(())
    }

    fn draw_text(&mut self, text: &str, _x: i32, _y: i32) -> Result<(), Self::Error> {
        self.lines.push(text.to_owned());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        info!("[display] {}", self.lines.join(" | "));
        Ok(())
    }
}

/// Button pressed from another thread
///
/// Each press is latched until it has been sampled once.
#[derive(Debug, Clone, Default)]
pub struct SharedButton {
    pressed: Arc<AtomicBool>,
}

impl SharedButton {
    /// Create a released button
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press
    pub fn press(&self) {
        self.pressed.store(true, Ordering::Release);
    }
}

impl AckButton for SharedButton {
    fn is_pressed(&mut self) -> bool {
        self.pressed.swap(false, Ordering::AcqRel)
    }
}
