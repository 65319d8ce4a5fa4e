use crate::radio::header::BROADCAST_ADDRESS;
use crate::radio::traits::ModulationParams;

/// Radio link settings applied when the packet link is brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioSettings {
    /// Modulation used for both directions
    pub modulation: ModulationParams,
    /// This node's header address
    pub node: u8,
    /// Header destination of outgoing packets
    pub destination: u8,
}

impl Default for RadioSettings {
    fn default() -> Self {
        Self {
            modulation: ModulationParams {
                spreading_factor: 12,
                bandwidth: 125_000,
                coding_rate: 8,
            },
            node: BROADCAST_ADDRESS,
            destination: BROADCAST_ADDRESS,
        }
    }
}
