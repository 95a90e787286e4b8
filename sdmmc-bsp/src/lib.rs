#![cfg_attr(not(test), no_std)]

pub mod sdcard;

pub use sdcard::{
    Block,
    CardInfo,
    CardType,
    SdCard,
    SdCardRef,
    SdConfig,
    SdController,
    SdError,
    SdResult,
    SdStatus,
    TransferEvent,
    TransferState,
    TransferStatus,
    BLOCK_SIZE,
};
