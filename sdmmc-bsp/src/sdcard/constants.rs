pub const BLOCK_SIZE: usize = 512;

// Word alignment required by the controller's DMA engine
pub const DMA_ALIGNMENT: usize = 4;

// Upper bound a filesystem layer waits for the card to return to the
// transfer state before giving up on a command
pub const SD_DEFAULT_TIMEOUT_MS: u32 = 30_000;
