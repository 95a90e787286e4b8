use core::sync::atomic::{
    AtomicU8,
    Ordering,
};
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferState {
    Idle,
    Busy(Direction),
    /// Not initialized, or the last init failed. Cleared by a successful init.
    Error,
}

/// Answer to "can the card take a new data command right now".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    Ok,
    Busy,
}

const IDLE: u8 = 0;
const BUSY_READ: u8 = 1;
const BUSY_WRITE: u8 = 2;
const BUSY_READ_DMA: u8 = 3;
const BUSY_WRITE_DMA: u8 = 4;
const ERROR: u8 = 5;
const INIT: u8 = 6;

const fn busy_code(direction: Direction, dma: bool) -> u8 {
    match (direction, dma) {
        (Direction::Read, false) => BUSY_READ,
        (Direction::Write, false) => BUSY_WRITE,
        (Direction::Read, true) => BUSY_READ_DMA,
        (Direction::Write, true) => BUSY_WRITE_DMA,
    }
}

fn decode(code: u8) -> TransferState {
    match code {
        IDLE => TransferState::Idle,
        BUSY_READ | BUSY_READ_DMA => TransferState::Busy(Direction::Read),
        // init holds the channel like a write
        BUSY_WRITE | BUSY_WRITE_DMA | INIT => TransferState::Busy(Direction::Write),
        _ => TransferState::Error,
    }
}

/// Transfer state shared between the caller and the completion context.
///
/// Every Idle -> Busy transition is a compare-exchange, so of two racing
/// requests exactly one wins. Busy -> Idle is a release store, so anything
/// that observes Idle also observes the effects of the finished transfer.
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) const fn new() -> Self {
        StateCell(AtomicU8::new(ERROR))
    }

    pub(crate) fn get(&self) -> TransferState {
        decode(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn is_busy(&self) -> bool {
        matches!(self.get(), TransferState::Busy(_))
    }

    pub(crate) fn try_begin(&self, direction: Direction, dma: bool) -> bool {
        let code = busy_code(direction, dma);
        let won = self
            .0
            .compare_exchange(IDLE, code, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            trace!("transfer state: idle -> {:?} (dma: {})", direction, dma);
        }
        won
    }

    /// Retire an in-flight DMA transfer. Returns its direction, or `None` if no
    /// DMA transfer was in flight (blocking transfers are never retired here).
    pub(crate) fn finish_dma(&self) -> Option<Direction> {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            let direction = match current {
                BUSY_READ_DMA => Direction::Read,
                BUSY_WRITE_DMA => Direction::Write,
                _ => return None,
            };
            match self
                .0
                .compare_exchange_weak(current, IDLE, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    trace!("transfer state: {:?} dma -> idle", direction);
                    return Some(direction);
                },
                Err(actual) => current = actual,
            }
        }
    }

    /// Give back a channel this caller claimed with `try_begin` but never
    /// started. Only succeeds if the state is still exactly that claim, so a
    /// completion that already retired it is left alone.
    pub(crate) fn cancel(&self, direction: Direction, dma: bool) -> bool {
        let code = busy_code(direction, dma);
        let undone = self
            .0
            .compare_exchange(code, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if undone {
            trace!("transfer state: {:?} (dma: {}) cancelled -> idle", direction, dma);
        }
        undone
    }

    pub(crate) fn dma_in_flight(&self, direction: Direction) -> bool {
        self.0.load(Ordering::Acquire) == busy_code(direction, true)
    }

    /// Claim the channel for init from `Idle` or `Error`. Returns the code to
    /// hand to [`restore`](Self::restore) if init gives up before touching
    /// the controller.
    pub(crate) fn try_begin_init(&self) -> Option<u8> {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            if current != IDLE && current != ERROR {
                return None;
            }
            match self
                .0
                .compare_exchange_weak(current, INIT, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    trace!("transfer state: {:?} -> init", decode(current));
                    return Some(current);
                },
                Err(actual) => current = actual,
            }
        }
    }

    pub(crate) fn restore(&self, code: u8) {
        self.0.store(code, Ordering::Release);
    }

    pub(crate) fn set_idle(&self) {
        trace!("transfer state: -> idle");
        self.0.store(IDLE, Ordering::Release);
    }

    pub(crate) fn set_error(&self) {
        trace!("transfer state: -> error");
        self.0.store(ERROR, Ordering::Release);
    }
}

/// Holds the channel for a blocking operation and hands it back on drop, so no
/// return path can leave the state Busy.
pub(crate) struct BusyGuard<'s>(&'s StateCell);

impl<'s> BusyGuard<'s> {
    pub(crate) fn acquire(cell: &'s StateCell, direction: Direction) -> Option<Self> {
        if cell.try_begin(direction, false) {
            Some(BusyGuard(cell))
        } else {
            None
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set_idle();
    }
}
