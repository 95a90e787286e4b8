use super::{
    constants::{
        BLOCK_SIZE,
        DMA_ALIGNMENT,
    },
    state::{
        BusyGuard,
        Direction,
    },
    status::translate,
    SdCard,
    SdController,
    SdError,
    SdResult,
    TransferState,
};
use embedded_hal::digital::v2::InputPin;
use log::{
    debug,
    warn,
};

/// One block of card storage, aligned for the DMA engine.
#[repr(C, align(4))]
#[derive(Clone, Copy)]
pub struct Block(pub [u8; BLOCK_SIZE]);

impl Block {
    pub const fn zeroed() -> Self {
        Block([0; BLOCK_SIZE])
    }

    pub fn as_bytes(blocks: &[Block]) -> &[u8] {
        // Block is a transparent, padding-free run of BLOCK_SIZE bytes
        unsafe { core::slice::from_raw_parts(blocks.as_ptr() as *const u8, blocks.len() * BLOCK_SIZE) }
    }

    pub fn as_bytes_mut(blocks: &mut [Block]) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(blocks.as_mut_ptr() as *mut u8, blocks.len() * BLOCK_SIZE) }
    }
}

/// Outcome of [`SdCard::read_blocks_dma`]. A rejected read returns its buffer.
pub type DmaReadResult = Result<(), (SdError, &'static mut [u8])>;

/// A DMA read buffer the driver holds while the engine owns its contents.
pub(crate) struct ParkedBuffer {
    ptr: *mut u8,
    len: usize,
}

// Only the SdCard that parked it turns it back into a slice.
unsafe impl Send for ParkedBuffer {}

impl ParkedBuffer {
    fn park(buf: &'static mut [u8]) -> Self {
        ParkedBuffer {
            ptr: buf.as_mut_ptr(),
            len: buf.len(),
        }
    }

    /// Safety: the transfer that wrote through this buffer has ended.
    unsafe fn unpark(self) -> &'static mut [u8] {
        core::slice::from_raw_parts_mut(self.ptr, self.len)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferMode {
    Blocking { timeout_ms: u32 },
    Dma,
}

/// A block transfer as the state machine sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    pub direction: Direction,
    pub addr: u32,
    pub count: u32,
    pub mode: TransferMode,
}

impl Request {
    /// Reject requests that can only be caller bugs: empty, running off the end
    /// of the address space, a buffer too short for `count` blocks, or a DMA
    /// buffer the engine cannot address.
    pub fn validate(&self, buf: &[u8]) -> SdResult<()> {
        if self.count == 0 || self.addr.checked_add(self.count - 1).is_none() {
            return Err(SdError::Generic);
        }
        let len = (self.count as usize).checked_mul(BLOCK_SIZE).ok_or(SdError::Generic)?;
        if buf.len() < len {
            return Err(SdError::Generic);
        }
        if self.mode == TransferMode::Dma && buf.as_ptr() as usize % DMA_ALIGNMENT != 0 {
            return Err(SdError::Generic);
        }
        Ok(())
    }
}

impl<C: SdController, P: InputPin> SdCard<C, P> {
    fn gate(&self, req: &Request, buf: &[u8]) -> SdResult<()> {
        match self.state.get() {
            TransferState::Busy(_) => return Err(SdError::Busy),
            TransferState::Error => return Err(SdError::Generic),
            TransferState::Idle => (),
        }
        req.validate(buf)
    }

    /// Read `count` blocks starting at block `addr`, waiting up to `timeout_ms`.
    pub fn read_blocks(&self, buf: &mut [u8], addr: u32, count: u32, timeout_ms: u32) -> SdResult<()> {
        let req = Request {
            direction: Direction::Read,
            addr,
            count,
            mode: TransferMode::Blocking { timeout_ms },
        };
        self.gate(&req, buf)?;
        let _busy = BusyGuard::acquire(&self.state, Direction::Read).ok_or(SdError::Busy)?;
        let mut controller = self.controller.try_lock().ok_or(SdError::Busy)?;
        translate("read_blocks", controller.read_blocks(buf, addr, count, timeout_ms))
    }

    pub fn write_blocks(&self, buf: &[u8], addr: u32, count: u32, timeout_ms: u32) -> SdResult<()> {
        let req = Request {
            direction: Direction::Write,
            addr,
            count,
            mode: TransferMode::Blocking { timeout_ms },
        };
        self.gate(&req, buf)?;
        let _busy = BusyGuard::acquire(&self.state, Direction::Write).ok_or(SdError::Busy)?;
        let mut controller = self.controller.try_lock().ok_or(SdError::Busy)?;
        translate("write_blocks", controller.write_blocks(buf, addr, count, timeout_ms))
    }

    /// Start a DMA read and return as soon as the controller accepts it. `Ok`
    /// means in flight, not done: completion arrives as
    /// [`TransferEvent::RxComplete`](super::TransferEvent) or `Abort`.
    ///
    /// The driver holds on to the buffer until then; get it back with
    /// [`take_read_buffer`](Self::take_read_buffer). A rejected request hands
    /// the buffer straight back with the error. A buffer still parked from an
    /// earlier read that was never taken is dropped from the slot.
    pub fn read_blocks_dma(&self, buf: &'static mut [u8], addr: u32, count: u32) -> DmaReadResult {
        let req = Request {
            direction: Direction::Read,
            addr,
            count,
            mode: TransferMode::Dma,
        };
        if let Err(e) = self.gate(&req, buf) {
            return Err((e, buf));
        }
        if !self.state.try_begin(Direction::Read, true) {
            return Err((SdError::Busy, buf));
        }
        let mut controller = match self.controller.try_lock() {
            Some(c) => c,
            None => {
                self.state.cancel(Direction::Read, true);
                return Err((SdError::Busy, buf));
            },
        };

        let parked = ParkedBuffer::park(buf);
        let (ptr, len) = (parked.ptr, parked.len);
        *self.read_buffer.lock() = Some(parked);
        let res = unsafe { controller.read_blocks_dma(ptr, len, addr, count) };
        drop(controller);

        match translate("read_blocks_dma", res) {
            Ok(()) => {
                debug!("{:?} of {} blocks at {} in flight", req.direction, req.count, req.addr);
                Ok(())
            },
            Err(e) => {
                let mut slot = self.read_buffer.lock();
                if self.state.cancel(Direction::Read, true) {
                    if let Some(parked) = slot.take() {
                        return Err((e, unsafe { parked.unpark() }));
                    }
                }
                // a completion event already ended the transfer; the buffer
                // is waiting in the slot or with whoever took it
                warn!("read_blocks_dma: start failed after completion");
                Ok(())
            },
        }
    }

    /// Hand back the buffer of the last DMA read once it has ended, by
    /// completion or abort. `None` while the read is in flight, or if the
    /// buffer was already taken.
    pub fn take_read_buffer(&self) -> Option<&'static mut [u8]> {
        let mut slot = self.read_buffer.try_lock()?;
        if self.state.dma_in_flight(Direction::Read) {
            return None;
        }
        let parked = slot.take()?;
        Some(unsafe { parked.unpark() })
    }

    /// DMA counterpart of [`write_blocks`](Self::write_blocks). The engine
    /// reads from `buf` until the
    /// [`TransferEvent::TxComplete`](super::TransferEvent) or `Abort` event.
    pub fn write_blocks_dma(&self, buf: &'static [u8], addr: u32, count: u32) -> SdResult<()> {
        let req = Request {
            direction: Direction::Write,
            addr,
            count,
            mode: TransferMode::Dma,
        };
        self.gate(&req, buf)?;
        if !self.state.try_begin(Direction::Write, true) {
            return Err(SdError::Busy);
        }
        let mut controller = match self.controller.try_lock() {
            Some(c) => c,
            None => {
                self.state.cancel(Direction::Write, true);
                return Err(SdError::Busy);
            },
        };
        let res = unsafe { controller.write_blocks_dma(buf.as_ptr(), buf.len(), addr, count) };
        drop(controller);
        self.started(&req, translate("write_blocks_dma", res))
    }

    fn started(&self, req: &Request, res: SdResult<()>) -> SdResult<()> {
        match res {
            Ok(()) => {
                debug!("{:?} of {} blocks at {} in flight", req.direction, req.count, req.addr);
                Ok(())
            },
            Err(e) => {
                // Nothing was started, so no completion event will come.
                self.state.cancel(req.direction, true);
                Err(e)
            },
        }
    }

    /// Erase blocks `start..=end`. Blocking, and `start` must be below `end`.
    pub fn erase(&self, start: u32, end: u32) -> SdResult<()> {
        match self.state.get() {
            TransferState::Busy(_) => return Err(SdError::Busy),
            TransferState::Error => return Err(SdError::Generic),
            TransferState::Idle => (),
        }
        if start >= end {
            return Err(SdError::Generic);
        }
        let _busy = BusyGuard::acquire(&self.state, Direction::Write).ok_or(SdError::Busy)?;
        let mut controller = self.controller.try_lock().ok_or(SdError::Busy)?;
        translate("erase", controller.erase(start, end))
    }
}
