/// Transceiver driver and packet link traits
pub mod traits;

/// Packet header codec
pub mod header;

/// Packet link over a transceiver driver
pub mod link;

pub use link::PacketRadio;
pub use traits::{Radio, RadioLink};
