use super::{
    cardinfo::{
        CardInfo,
        CardType,
    },
    SdError,
    TransferStatus,
};
use ufmt::{
    uDebug,
    uWrite,
    uwrite,
    Formatter,
};

impl uDebug for CardType {
    fn fmt<W>(&self, out: &mut Formatter<W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        out.write_str(match self {
            CardType::Sdsc => "SDSC",
            CardType::Sdhc => "SDHC",
            CardType::Sdxc => "SDXC",
            CardType::Mmc => "MMC",
            CardType::Unknown => "Unknown",
        })
    }
}

impl uDebug for CardInfo {
    fn fmt<W>(&self, out: &mut Formatter<W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(out, "  Card type:      {:?}\n", self.card_type())?;
        uwrite!(out, "  Card version:   {}\n", self.version())?;
        uwrite!(out, "  RCA:            {}\n", self.rca())?;
        uwrite!(out, "  Block size:     {}\n", self.block_size())?;
        uwrite!(out, "  Capacity:       {} blocks ({} MiB)\n", self.capacity_blocks(), self.capacity_mib())?;
        Ok(())
    }
}

impl uDebug for SdError {
    fn fmt<W>(&self, out: &mut Formatter<W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let name = match self {
            SdError::Generic => "Generic",
            SdError::NotPresent => "NotPresent",
            SdError::Busy => "Busy",
        };
        uwrite!(out, "{} ({})", name, *self as u8)
    }
}

impl uDebug for TransferStatus {
    fn fmt<W>(&self, out: &mut Formatter<W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        out.write_str(match self {
            TransferStatus::Ok => "Ok",
            TransferStatus::Busy => "Busy",
        })
    }
}
