use super::presence::DetectLevel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusWidth {
    One = 1,
    Four = 4,
    Eight = 8,
}

/// Board-level settings for a card slot.
#[derive(Clone, Copy, Debug)]
pub struct SdConfig {
    /// Data bus width negotiated right after controller init
    pub bus_width: BusWidth,
    /// Level the detect pin reads while a card is inserted
    pub detect_level: DetectLevel,
}

impl Default for SdConfig {
    fn default() -> Self {
        SdConfig {
            bus_width: BusWidth::Four,
            detect_level: DetectLevel::Low,
        }
    }
}
