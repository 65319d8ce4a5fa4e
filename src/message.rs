//! Received payloads and their classification

use heapless::Vec;

use crate::radio::header::MAX_PAYLOAD_SIZE;

/// Result of decoding a received payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Classification<'a> {
    /// Payload is readable text
    Valid(&'a str),
    /// Payload is not text, treated as channel noise
    Unintelligible,
}

/// Payload handed up by the radio link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    bytes: Vec<u8, MAX_PAYLOAD_SIZE>,
    rssi: Option<i16>,
}

impl ReceivedMessage {
    /// Wrap received bytes, truncating anything beyond the payload limit
    pub fn new(bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_PAYLOAD_SIZE);
        let mut buffer = Vec::new();
        // cannot fail, len is capped at capacity
        let _ = buffer.extend_from_slice(&bytes[..len]);
        Self {
            bytes: buffer,
            rssi: None,
        }
    }

    /// Attach the RSSI the radio reported for this packet
    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }

    /// Raw payload bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// RSSI in dBm, when known
    pub fn rssi(&self) -> Option<i16> {
        self.rssi
    }

    /// Decode the payload as ASCII text
    ///
    /// Trailing NUL terminators are not part of the text. Any byte outside
    /// the ASCII range makes the payload unintelligible.
    pub fn classify(&self) -> Classification<'_> {
        if !self.bytes.is_ascii() {
            return Classification::Unintelligible;
        }
        let end = self
            .bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |pos| pos + 1);
        match core::str::from_utf8(&self.bytes[..end]) {
            Ok(text) => Classification::Valid(text),
            Err(_) => Classification::Unintelligible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_valid() {
        let message = ReceivedMessage::new(b"PONG");
        assert_eq!(message.classify(), Classification::Valid("PONG"));
    }

    #[test]
    fn test_trailing_nul_is_stripped() {
        let message = ReceivedMessage::new(b"LoRa Beacon p=23\0");
        assert_eq!(message.classify(), Classification::Valid("LoRa Beacon p=23"));
    }

    #[test]
    fn test_high_bytes_are_noise() {
        let message = ReceivedMessage::new(&[0x50, 0xC3, 0xA9, 0xFF]);
        assert_eq!(message.classify(), Classification::Unintelligible);
    }

    #[test]
    fn test_rssi_and_truncation() {
        let message = ReceivedMessage::new(&[b'a'; 300]).with_rssi(-97);
        assert_eq!(message.bytes().len(), MAX_PAYLOAD_SIZE);
        assert_eq!(message.rssi(), Some(-97));
    }
}
