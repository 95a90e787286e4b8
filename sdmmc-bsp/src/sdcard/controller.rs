use super::{
    config::BusWidth,
    CardInfo,
};
use core::fmt::Debug;

/// Card state as reported by the controller (the card status register's
/// CURRENT_STATE field).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState {
    Ready = 1,
    Identification,
    Standby,
    Transfer,
    Sending,
    Receiving,
    Programming,
    Disconnected,
    Error,
}

/// Host controller primitives the driver is built on. Command framing, clocking
/// and CRCs all live behind this trait.
///
/// DMA variants only start the transfer. The board's interrupt handler reports
/// the end of it through [`SdCard::on_event`](super::SdCard::on_event).
pub trait SdController {
    type Error: Debug;

    fn init(&mut self) -> Result<(), Self::Error>;

    fn configure_bus(&mut self, width: BusWidth) -> Result<(), Self::Error>;

    fn read_blocks(&mut self, buf: &mut [u8], addr: u32, count: u32, timeout_ms: u32) -> Result<(), Self::Error>;

    fn write_blocks(&mut self, buf: &[u8], addr: u32, count: u32, timeout_ms: u32) -> Result<(), Self::Error>;

    /// Point the DMA engine at `len` bytes from `buf` and start the read.
    ///
    /// # Safety
    ///
    /// `buf` must be valid for writes of `len` bytes. The driver keeps the
    /// buffer untouched until the completion event; the implementation must
    /// not keep the pointer past it.
    unsafe fn read_blocks_dma(&mut self, buf: *mut u8, len: usize, addr: u32, count: u32) -> Result<(), Self::Error>;

    /// # Safety
    ///
    /// `buf` must be valid for reads of `len` bytes until the completion event.
    unsafe fn write_blocks_dma(&mut self, buf: *const u8, len: usize, addr: u32, count: u32)
        -> Result<(), Self::Error>;

    /// Erase blocks `start..=end`.
    fn erase(&mut self, start: u32, end: u32) -> Result<(), Self::Error>;

    fn card_state(&mut self) -> Result<CardState, Self::Error>;

    fn card_info(&self) -> CardInfo;
}
