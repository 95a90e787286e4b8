use super::{
    state::Direction,
    SdCard,
    SdController,
    SdError,
    SdResult,
};
use embedded_hal::digital::v2::InputPin;
use log::warn;

/// Terminal events of a DMA transfer, as delivered by the board's interrupt
/// handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferEvent {
    TxComplete,
    RxComplete,
    Abort,
}

pub type Hook = fn();

#[derive(Clone, Copy)]
pub(crate) struct Hooks {
    write_complete: Option<Hook>,
    read_complete: Option<Hook>,
    abort: Option<Hook>,
}

impl Hooks {
    pub(crate) const fn new() -> Self {
        Hooks {
            write_complete: None,
            read_complete: None,
            abort: None,
        }
    }

    fn slot(&mut self, event: TransferEvent) -> &mut Option<Hook> {
        match event {
            TransferEvent::TxComplete => &mut self.write_complete,
            TransferEvent::RxComplete => &mut self.read_complete,
            TransferEvent::Abort => &mut self.abort,
        }
    }

    fn get(&self, event: TransferEvent) -> Option<Hook> {
        match event {
            TransferEvent::TxComplete => self.write_complete,
            TransferEvent::RxComplete => self.read_complete,
            TransferEvent::Abort => self.abort,
        }
    }
}

impl<C: SdController, P: InputPin> SdCard<C, P> {
    /// Register `hook` to run after `event`. Hooks can only be swapped while no
    /// transfer is in flight.
    ///
    /// Hooks run in the completion context with the channel already `Idle`.
    /// A request issued from a hook gets `Busy` if the event interrupted the
    /// caller inside the driver; a hook must not spin waiting for it.
    pub fn set_hook(&self, event: TransferEvent, hook: Hook) -> SdResult<()> {
        self.replace_hook(event, Some(hook))
    }

    pub fn clear_hook(&self, event: TransferEvent) -> SdResult<()> {
        self.replace_hook(event, None)
    }

    fn replace_hook(&self, event: TransferEvent, hook: Option<Hook>) -> SdResult<()> {
        if self.state.is_busy() {
            return Err(SdError::Busy);
        }
        *self.hooks.lock().slot(event) = hook;
        Ok(())
    }

    /// Entry point for the completion context. Frees the channel first, then
    /// runs the registered hook, so a hook that polls [`state`](Self::state)
    /// already sees the channel idle.
    pub fn on_event(&self, event: TransferEvent) {
        let direction = match self.state.finish_dma() {
            Some(d) => d,
            None => {
                warn!("{:?} with no DMA transfer in flight, ignored", event);
                return;
            },
        };

        match (event, direction) {
            (TransferEvent::TxComplete, Direction::Read) | (TransferEvent::RxComplete, Direction::Write) => {
                warn!("{:?} reported for a {:?} transfer", event, direction);
            },
            _ => (),
        }

        // Copy the hook out so it never runs under the lock
        let hook = self.hooks.lock().get(event);
        if let Some(hook) = hook {
            hook();
        }
    }
}
