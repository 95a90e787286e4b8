use super::{
    SdCard,
    SdController,
    SdError,
    SdResult,
};
use embedded_hal::digital::v2::InputPin;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardType {
    Sdsc,
    Sdhc,
    Sdxc,
    Mmc,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardInfo {
    card_type: CardType,
    version: u8,
    rca: u16,
    capacity_blocks: u32,
    block_size: u32,
}

impl CardInfo {
    pub const fn new(card_type: CardType, version: u8, rca: u16, capacity_blocks: u32, block_size: u32) -> Self {
        CardInfo {
            card_type,
            version,
            rca,
            capacity_blocks,
            block_size,
        }
    }

    #[inline(always)]
    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    #[inline(always)]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Relative card address assigned during identification
    #[inline(always)]
    pub fn rca(&self) -> u16 {
        self.rca
    }

    #[inline(always)]
    pub fn capacity_blocks(&self) -> u32 {
        self.capacity_blocks
    }

    #[inline(always)]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn capacity_mib(&self) -> u32 {
        ((self.capacity_blocks as u64 * self.block_size as u64) >> 20) as u32
    }
}

impl<C: SdController, P: InputPin> SdCard<C, P> {
    /// Snapshot of the card metadata. Safe to call mid-transfer since it does
    /// not issue a command; fails with `Busy` only if the other context is
    /// holding the controller right now.
    pub fn card_info(&self) -> SdResult<CardInfo> {
        match self.controller.try_lock() {
            Some(controller) => Ok(controller.card_info()),
            None => Err(SdError::Busy),
        }
    }
}
