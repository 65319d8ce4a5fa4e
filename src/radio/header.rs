//! Four byte packet header carried in front of every payload
//!
//! Layout: destination, node (sender), identifier, flags.

/// Address accepted by every node
pub const BROADCAST_ADDRESS: u8 = 0xFF;

/// Header length in bytes
pub const HEADER_LEN: usize = 4;

/// Largest packet the radio FIFO holds
pub const MAX_PACKET_SIZE: usize = 255;

/// Largest payload after the header
pub const MAX_PAYLOAD_SIZE: usize = MAX_PACKET_SIZE - HEADER_LEN;

/// Packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    /// Destination address
    pub destination: u8,
    /// Sender address
    pub node: u8,
    /// Sequence identifier
    pub identifier: u8,
    /// Application flags
    pub flags: u8,
}

impl Header {
    /// Header bytes in wire order
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        [self.destination, self.node, self.identifier, self.flags]
    }

    /// Split a packet into header and payload
    ///
    /// Packets without at least one payload byte are rejected.
    pub fn parse(packet: &[u8]) -> Option<(Header, &[u8])> {
        if packet.len() <= HEADER_LEN {
            return None;
        }
        let header = Header {
            destination: packet[0],
            node: packet[1],
            identifier: packet[2],
            flags: packet[3],
        };
        Some((header, &packet[HEADER_LEN..]))
    }

    /// Whether a node with address `node` should accept this packet
    pub fn is_for(&self, node: u8) -> bool {
        node == BROADCAST_ADDRESS
            || self.destination == node
            || self.destination == BROADCAST_ADDRESS
    }
}
