#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use embedded_hal::blocking::delay::DelayMs;
use lora_beacon::{
    beacon::Peripherals,
    config::PowerLevel,
    display::StatusDisplay,
    input::AckButton,
    message::ReceivedMessage,
    radio::traits::{Radio, RxConfig, TxConfig},
    radio::RadioLink,
    time::Clock,
};

/// Simulated time shared by every mock
#[derive(Clone, Default)]
pub struct SimTime(Rc<Cell<Duration>>);

impl SimTime {
    pub fn now(&self) -> Duration {
        self.0.get()
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, at: Duration) {
        self.0.set(at);
    }
}

pub fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Timer whose delays advance simulated time
pub struct MockTimer {
    time: SimTime,
}

impl Clock for MockTimer {
    fn now(&self) -> Duration {
        self.time.now()
    }
}

impl DelayMs<u32> for MockTimer {
    fn delay_ms(&mut self, ms: u32) {
        self.time.advance(millis(ms as u64));
    }
}

/// One send attempt
#[derive(Debug, Clone, PartialEq)]
pub struct SendAttempt {
    pub at: Duration,
    pub power: i8,
    pub payload: Vec<u8>,
    pub ok: bool,
}

#[derive(Debug, Default)]
pub struct LinkLog {
    pub powers: Vec<i8>,
    pub sends: Vec<SendAttempt>,
    pub receives: Vec<(Duration, Option<Duration>)>,
}

impl LinkLog {
    pub fn attempted_powers(&self) -> Vec<i8> {
        self.sends.iter().map(|send| send.power).collect()
    }
}

/// Scripted radio link
///
/// Sends succeed unless the current power equals `fail_at`. Scheduled
/// arrivals are handed out by `receive` once simulated time reaches them.
pub struct MockLink {
    time: SimTime,
    power: i8,
    fail_at: Option<i8>,
    arrivals: VecDeque<(Duration, Vec<u8>)>,
    stop_after_sends: Option<(usize, Arc<AtomicBool>)>,
    log: Rc<RefCell<LinkLog>>,
}

impl MockLink {
    pub fn fail_at(&mut self, dbm: i8) {
        self.fail_at = Some(dbm);
    }

    pub fn arrive(&mut self, at: Duration, payload: &[u8]) {
        let pos = self
            .arrivals
            .iter()
            .position(|(due, _)| *due > at)
            .unwrap_or(self.arrivals.len());
        self.arrivals.insert(pos, (at, payload.to_vec()));
    }

    pub fn stop_after_sends(&mut self, sends: usize, stop: Arc<AtomicBool>) {
        self.stop_after_sends = Some((sends, stop));
    }
}

impl RadioLink for MockLink {
    fn set_power(&mut self, level: PowerLevel) {
        self.power = level.dbm();
        self.log.borrow_mut().powers.push(level.dbm());
    }

    fn send(&mut self, payload: &[u8]) -> bool {
        let ok = self.fail_at != Some(self.power);
        let mut log = self.log.borrow_mut();
        log.sends.push(SendAttempt {
            at: self.time.now(),
            power: self.power,
            payload: payload.to_vec(),
            ok,
        });
        if let Some((limit, stop)) = &self.stop_after_sends {
            if log.sends.len() >= *limit {
                stop.store(true, Ordering::Relaxed);
            }
        }
        ok
    }

    fn receive(&mut self, timeout: Option<Duration>) -> Option<ReceivedMessage> {
        let now = self.time.now();
        self.log.borrow_mut().receives.push((now, timeout));

        let due = self.arrivals.front().map(|(at, _)| *at);
        match (due, timeout) {
            (Some(at), _) if at <= now => {}
            (Some(at), Some(timeout)) if at <= now + timeout => self.time.set(at),
            (Some(at), None) => self.time.set(at),
            (_, Some(timeout)) => {
                self.time.advance(timeout);
                return None;
            }
            (None, None) => panic!("blocking receive with no traffic scheduled"),
        }
        self.arrivals
            .pop_front()
            .map(|(_, payload)| ReceivedMessage::new(&payload))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRadioError {
    TxFailed,
}

#[derive(Debug, Default)]
pub struct RadioLog {
    pub tx_config: Option<TxConfig>,
    pub rx_configs: Vec<RxConfig>,
    pub transmitted: Vec<(i8, Vec<u8>)>,
    pub standby_calls: usize,
}

/// Transceiver driver with packets scheduled on simulated time
pub struct MockRadio {
    time: SimTime,
    power: i8,
    fail_tx: bool,
    air: VecDeque<(Duration, Vec<u8>)>,
    log: Rc<RefCell<RadioLog>>,
}

impl MockRadio {
    pub fn new(time: SimTime) -> (Self, Rc<RefCell<RadioLog>>) {
        let log = Rc::new(RefCell::new(RadioLog::default()));
        let radio = Self {
            time,
            power: 0,
            fail_tx: false,
            air: VecDeque::new(),
            log: Rc::clone(&log),
        };
        (radio, log)
    }

    pub fn fail_tx(&mut self) {
        self.fail_tx = true;
    }

    /// Schedule a raw packet, header included
    pub fn on_air(&mut self, at: Duration, packet: &[u8]) {
        let pos = self
            .air
            .iter()
            .position(|(due, _)| *due > at)
            .unwrap_or(self.air.len());
        self.air.insert(pos, (at, packet.to_vec()));
    }
}

impl Radio for MockRadio {
    type Error = MockRadioError;

    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_tx_power(&mut self, power: i8) -> Result<(), Self::Error> {
        self.power = power;
        Ok(())
    }

    fn configure_tx(&mut self, config: TxConfig) -> Result<(), Self::Error> {
        self.power = config.power;
        self.log.borrow_mut().tx_config = Some(config);
        Ok(())
    }

    fn configure_rx(&mut self, config: RxConfig) -> Result<(), Self::Error> {
        self.log.borrow_mut().rx_configs.push(config);
        Ok(())
    }

    fn transmit(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        if self.fail_tx {
            return Err(MockRadioError::TxFailed);
        }
        self.log
            .borrow_mut()
            .transmitted
            .push((self.power, buffer.to_vec()));
        Ok(())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error> {
        match self.air.front() {
            Some((due, _)) if *due <= self.time.now() => {}
            _ => return Err(nb::Error::WouldBlock),
        }
        let (_, packet) = self.air.pop_front().ok_or(nb::Error::WouldBlock)?;
        let len = packet.len().min(buffer.len());
        buffer[..len].copy_from_slice(&packet[..len]);
        Ok(len)
    }

    fn get_rssi(&mut self) -> Result<i16, Self::Error> {
        Ok(-87)
    }

    fn standby(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().standby_calls += 1;
        Ok(())
    }
}

/// One rendered screen
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub at: Duration,
    pub title: String,
    pub body: String,
    pub indicator: bool,
}

/// Display recording every frame with its timestamp
pub struct MockDisplay {
    time: SimTime,
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl StatusDisplay for MockDisplay {
    fn show(&mut self, title: &str, body: &str, show_indicator: bool) {
        self.frames.borrow_mut().push(Frame {
            at: self.time.now(),
            title: title.to_owned(),
            body: body.to_owned(),
            indicator: show_indicator,
        });
    }
}

/// Button held down during scheduled intervals
pub struct MockButton {
    time: SimTime,
    presses: Vec<(Duration, Duration)>,
}

impl MockButton {
    pub fn press_between(&mut self, from: Duration, until: Duration) {
        self.presses.push((from, until));
    }
}

impl AckButton for MockButton {
    fn is_pressed(&mut self) -> bool {
        let now = self.time.now();
        self.presses
            .iter()
            .any(|(from, until)| *from <= now && now < *until)
    }
}

pub type MockPeripherals = Peripherals<MockLink, MockDisplay, MockButton, MockTimer>;

/// Handles kept by a test after the peripherals move into the beacon
pub struct Probe {
    pub time: SimTime,
    pub link: Rc<RefCell<LinkLog>>,
    pub frames: Rc<RefCell<Vec<Frame>>>,
}

impl Probe {
    /// Another timer on the same simulated clock
    pub fn timer(&self) -> MockTimer {
        MockTimer {
            time: self.time.clone(),
        }
    }

    pub fn bodies(&self) -> Vec<String> {
        self.frames.borrow().iter().map(|f| f.body.clone()).collect()
    }

    pub fn frames_with(&self, body: &str) -> Vec<Frame> {
        self.frames
            .borrow()
            .iter()
            .filter(|f| f.body == body)
            .cloned()
            .collect()
    }
}

/// Fresh peripherals sharing one simulated clock
pub fn rig() -> (MockPeripherals, Probe) {
    let time = SimTime::default();
    let link_log = Rc::new(RefCell::new(LinkLog::default()));
    let frames = Rc::new(RefCell::new(Vec::new()));

    let io = Peripherals {
        link: MockLink {
            time: time.clone(),
            power: 0,
            fail_at: None,
            arrivals: VecDeque::new(),
            stop_after_sends: None,
            log: Rc::clone(&link_log),
        },
        display: MockDisplay {
            time: time.clone(),
            frames: Rc::clone(&frames),
        },
        button: MockButton {
            time: time.clone(),
            presses: Vec::new(),
        },
        timer: MockTimer { time: time.clone() },
    };

    (
        io,
        Probe {
            time,
            link: link_log,
            frames,
        },
    )
}
