use super::{
    status::translate,
    SdCard,
    SdController,
    SdError,
    SdResult,
};
use embedded_hal::digital::v2::InputPin;
use log::{
    debug,
    warn,
};

impl<C: SdController, P: InputPin> SdCard<C, P> {
    /// Bring the card up: presence check, controller init, then bus width.
    /// Stops at the first failure and leaves the channel in `Error` until the
    /// next successful init. No retries.
    ///
    /// The channel reads as `Busy` while init runs, so requests racing it are
    /// turned away instead of reaching a half-configured controller.
    pub fn init(&self) -> SdResult<()> {
        if !self.is_present() {
            debug!("init: no card in slot");
            return Err(SdError::NotPresent);
        }
        let prior = self.state.try_begin_init().ok_or(SdError::Busy)?;
        let mut controller = match self.controller.try_lock() {
            Some(c) => c,
            None => {
                self.state.restore(prior);
                return Err(SdError::Busy);
            },
        };

        if let Err(e) = translate("init", controller.init()) {
            warn!("init: controller init failed");
            self.state.set_error();
            return Err(e);
        }

        let width = self.config.bus_width;
        if let Err(e) = translate("configure_bus", controller.configure_bus(width)) {
            warn!("init: {:?} bus configuration failed", width);
            self.state.set_error();
            return Err(e);
        }

        self.state.set_idle();
        debug!("init: card ready on {:?} bus", width);
        Ok(())
    }
}
