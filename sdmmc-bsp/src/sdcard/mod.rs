mod cardinfo;
mod config;
mod constants;
mod controller;
mod debug;
mod init;
mod notify;
mod presence;
mod rwdata;
mod sdcard;
mod state;
mod status;

pub use cardinfo::{
    CardInfo,
    CardType,
};
pub use config::{
    BusWidth,
    SdConfig,
};
pub use constants::{
    BLOCK_SIZE,
    DMA_ALIGNMENT,
    SD_DEFAULT_TIMEOUT_MS,
};
pub use controller::{
    CardState,
    SdController,
};
pub use notify::{
    Hook,
    TransferEvent,
};
pub use presence::{
    AlwaysPresent,
    CardDetect,
    DetectLevel,
};
pub use rwdata::{
    Block,
    DmaReadResult,
    Request,
    TransferMode,
};
pub use sdcard::{
    SdCard,
    SdCardRef,
};
pub use state::{
    Direction,
    TransferState,
    TransferStatus,
};
pub use status::SdStatus;

/// Errors reported by the driver. Controller faults never pass through as-is;
/// they all collapse into `Generic`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdError {
    /// Controller or transport fault, or a malformed request
    Generic = 1,
    /// No card in the slot
    NotPresent,
    /// The transfer channel is occupied; retry later
    Busy,
}

pub type SdResult<T> = Result<T, SdError>;
