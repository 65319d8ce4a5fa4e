//! LoRa beacon on simulated hardware
//!
//! Runs the beacon against a simulated channel with a scripted peer. Press
//! Enter to acknowledge a new message; type `q` or close stdin to stop.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use log::{error, info};

use lora_beacon::{
    beacon::{BeaconController, Peripherals},
    config::{BeaconConfig, BeaconIdentity, RadioSettings},
    display::TextScreen,
    radio::PacketRadio,
    sim::{ConsoleCanvas, PeerScript, SharedButton, SimChannel, SimRadio},
    time::StdTimer,
};

const BEACON_TEXT: &str = "LoRa Beacon";
const BEACON_FREQ_HZ: u32 = 915_000_000;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let identity = match BeaconIdentity::new(BEACON_TEXT, BEACON_FREQ_HZ) {
        Ok(identity) => identity,
        Err(e) => {
            error!("invalid beacon identity: {}", e);
            std::process::exit(1);
        }
    };
    let config = BeaconConfig::new(identity);

    let timer = StdTimer::new();
    let radio = SimRadio::new(SimChannel::new(), PeerScript::default());
    let link = match PacketRadio::new(
        radio,
        timer,
        config.identity.frequency_hz(),
        RadioSettings::default(),
    ) {
        Ok(link) => link,
        Err(e) => {
            error!("radio bring-up failed: {}", e);
            std::process::exit(1);
        }
    };

    let button = SharedButton::new();
    let stop = Arc::new(AtomicBool::new(false));
    spawn_operator_input(button.clone(), Arc::clone(&stop));

    let io = Peripherals {
        link,
        display: TextScreen::new(ConsoleCanvas::default()),
        button,
        timer,
    };
    let mut beacon = BeaconController::new(config, io);
    beacon.run(&stop);

    let stats = beacon.stats();
    info!(
        "{} cycles, {} pings, {} failed sweeps, {} replies, {} noise",
        stats.cycles, stats.pings_sent, stats.failed_sweeps, stats.replies, stats.noise
    );
}

/// Turn stdin lines into button presses until `q` or end of input
fn spawn_operator_input(button: SharedButton, stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim() == "q" => break,
                Ok(_) => button.press(),
                Err(_) => break,
            }
        }
        info!("stop requested, finishing current phase");
        stop.store(true, Ordering::Relaxed);
    });
}
