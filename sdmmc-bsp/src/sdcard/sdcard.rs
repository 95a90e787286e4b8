use super::{
    notify::Hooks,
    presence::CardDetect,
    rwdata::ParkedBuffer,
    state::StateCell,
    CardState,
    SdConfig,
    SdController,
    SdError,
    SdResult,
    TransferState,
    TransferStatus,
};
use embedded_hal::digital::v2::InputPin;
use spin::Mutex;

/// The one card on the one transfer channel.
///
/// Every method takes `&self`: the handle is meant to be shared between the
/// code issuing requests and the interrupt handler that calls
/// [`on_event`](Self::on_event).
pub struct SdCard<C: SdController, P: InputPin> {
    pub(crate) config: SdConfig,
    pub(crate) millis: fn() -> u32,
    pub(crate) controller: Mutex<C>,
    pub(crate) state: StateCell,
    pub(crate) hooks: Mutex<Hooks>,
    pub(crate) read_buffer: Mutex<Option<ParkedBuffer>>,
    detect: CardDetect<P>,
}

impl<C: SdController, P: InputPin> SdCard<C, P> {
    pub fn new(controller: C, detect_pin: P, millis: fn() -> u32) -> SdCard<C, P> {
        SdCard::with_config(controller, detect_pin, millis, SdConfig::default())
    }

    pub fn with_config(controller: C, detect_pin: P, millis: fn() -> u32, config: SdConfig) -> SdCard<C, P> {
        SdCard {
            detect: CardDetect::new(detect_pin, config.detect_level),
            config,
            millis,
            controller: Mutex::new(controller),
            state: StateCell::new(),
            hooks: Mutex::new(Hooks::new()),
            read_buffer: Mutex::new(None),
        }
    }

    #[inline(always)]
    pub fn is_present(&self) -> bool {
        self.detect.is_present()
    }

    #[inline(always)]
    pub fn transfer_state(&self) -> TransferState {
        self.state.get()
    }

    /// `Ok` once the card can take a new data command.
    ///
    /// With the channel `Idle` the controller lock is only held by a caller
    /// on its way out of a DMA start whose completion already fired, or by a
    /// `card_info` read. Neither keeps the card busy, so that counts as `Ok`.
    pub fn state(&self) -> TransferStatus {
        if self.state.get() != TransferState::Idle {
            return TransferStatus::Busy;
        }
        let mut controller = match self.controller.try_lock() {
            Some(c) => c,
            None => return TransferStatus::Ok,
        };
        match controller.card_state() {
            Ok(CardState::Transfer) => TransferStatus::Ok,
            _ => TransferStatus::Busy,
        }
    }

    /// Non-blocking form of [`wait_ready`](Self::wait_ready), for use with
    /// `nb::block!`. Only a missing init is reported as an error.
    pub fn poll(&self) -> nb::Result<(), SdError> {
        if self.state.get() == TransferState::Error {
            return Err(nb::Error::Other(SdError::Generic));
        }
        match self.state() {
            TransferStatus::Ok => Ok(()),
            TransferStatus::Busy => Err(nb::Error::WouldBlock),
        }
    }

    /// Spin until the card is back in the transfer state or `timeout_ms`
    /// elapses.
    pub fn wait_ready(&self, timeout_ms: u32) -> SdResult<()> {
        let start_time_ms = (self.millis)();
        loop {
            match self.poll() {
                Ok(()) => return Ok(()),
                Err(nb::Error::Other(e)) => return Err(e),
                Err(nb::Error::WouldBlock) => (),
            }
            if (self.millis)().wrapping_sub(start_time_ms) >= timeout_ms {
                return Err(SdError::Busy);
            }
        }
    }

    /// Give the controller and detect pin back.
    pub fn release(self) -> (C, P) {
        (self.controller.into_inner(), self.detect.release())
    }
}

pub type SdCardRef<'s, C, P> = &'s SdCard<C, P>;
