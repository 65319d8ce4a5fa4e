use std::time::Duration;

use lora_beacon::{
    config::{BeaconConfig, BeaconIdentity, PowerLevel, PowerSweep, RadioSettings, TimingParams},
    display::{Status, INDICATOR_TEXT},
    error::ConfigError,
    message::{Classification, ReceivedMessage},
    radio::header::{Header, BROADCAST_ADDRESS},
};

#[test]
fn test_default_config() {
    let config = BeaconConfig::default();

    assert_eq!(config.identity.label(), "LoRa Beacon");
    assert_eq!(config.identity.frequency_hz(), 915_000_000);

    let levels: Vec<i8> = config.sweep.levels().iter().map(|l| l.dbm()).collect();
    assert_eq!(levels, vec![23, 17, 11, 5]);
    assert_eq!(config.sweep.max(), PowerLevel::MAX);
    assert_eq!(config.sweep.min().dbm(), 5);
}

#[test]
fn test_default_timing() {
    let timing = TimingParams::default();

    assert_eq!(timing.tx_interval, Duration::from_millis(500));
    assert_eq!(timing.failure_pause, Duration::from_secs(5));
    assert_eq!(timing.listen_window, Duration::from_secs(20));
    assert_eq!(timing.rx_poll, Duration::from_millis(500));
    assert_eq!(timing.clearance_timeout, Duration::from_secs(30));
    assert_eq!(timing.button_poll, Duration::from_millis(100));
}

#[test]
fn test_default_radio_settings() {
    let settings = RadioSettings::default();

    assert_eq!(settings.modulation.spreading_factor, 12);
    assert_eq!(settings.modulation.bandwidth, 125_000);
    assert_eq!(settings.modulation.coding_rate, 8);
    assert_eq!(settings.node, BROADCAST_ADDRESS);
    assert_eq!(settings.destination, BROADCAST_ADDRESS);
}

#[test]
fn test_config_errors_are_readable() {
    assert_eq!(
        PowerLevel::new(30).unwrap_err().to_string(),
        "power level 30 dBm outside 4..=23 dBm"
    );
    assert_eq!(
        PowerSweep::from_levels(&[11, 17]).unwrap_err().to_string(),
        "power sweep must be strictly descending (11 dBm followed by 17 dBm)"
    );
    assert_eq!(
        BeaconIdentity::new("", 915_000_000).unwrap_err(),
        ConfigError::EmptyLabel
    );
    assert_eq!(
        BeaconIdentity::new("x", 2_400_000_000).unwrap_err(),
        ConfigError::FrequencyOutOfRange(2_400_000_000)
    );
}

#[test]
fn test_announcement_text() {
    let identity = BeaconIdentity::new("Hilltop", 868_100_000).unwrap();
    let level = PowerLevel::new(11).unwrap();

    assert_eq!(identity.announcement(level).as_str(), "Hilltop p=11");
    assert_eq!(&identity.payload(level).unwrap()[..], b"Hilltop p=11\0");
}

#[test]
fn test_classification() {
    let reply = ReceivedMessage::new(b"hello there\0\0").with_rssi(-101);
    assert_eq!(reply.classify(), Classification::Valid("hello there"));
    assert_eq!(reply.rssi(), Some(-101));

    let noise = ReceivedMessage::new(&[0x48, 0x49, 0xC3, 0x28]);
    assert_eq!(noise.classify(), Classification::Unintelligible);

    let empty = ReceivedMessage::new(&[]);
    assert_eq!(empty.classify(), Classification::Valid(""));
}

#[test]
fn test_header_filtering() {
    let (header, payload) = Header::parse(&[0x05, 0x01, 0x2A, 0x00, b'o', b'k']).unwrap();

    assert_eq!(header.destination, 0x05);
    assert_eq!(header.identifier, 0x2A);
    assert_eq!(payload, b"ok");
    assert!(header.is_for(0x05));
    assert!(!header.is_for(0x06));
    assert!(header.is_for(BROADCAST_ADDRESS));
    assert!(Header::parse(&[0xFF, 0x01, 0x00, 0x00]).is_none());
}

#[test]
fn test_status_texts_fit_the_screen() {
    let statuses = [
        Status::ClearingFrequency,
        Status::FrequencyNotClear,
        Status::SendingPings,
        Status::SendError,
        Status::Listening,
        Status::HeardReply,
        Status::Noise,
    ];

    // 128 px wide screen, 5 px glyphs
    for status in statuses {
        assert!(status.text().len() <= 25, "{:?}", status);
    }
    assert!(INDICATOR_TEXT.len() <= 25);
}
