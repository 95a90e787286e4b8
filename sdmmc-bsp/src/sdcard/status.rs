use super::{
    SdError,
    SdResult,
};
use core::fmt::Debug;
use log::debug;

/// Flat status code for glue layers that want a `u8` (disk-io shims and the
/// like). Codes 0..=2 match the classic BSP `MSD_*` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdStatus {
    Ok = 0,
    Error = 1,
    NotPresent = 2,
    Busy = 3,
}

impl SdStatus {
    #[inline(always)]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<SdError> for SdStatus {
    fn from(e: SdError) -> SdStatus {
        match e {
            SdError::Generic => SdStatus::Error,
            SdError::NotPresent => SdStatus::NotPresent,
            SdError::Busy => SdStatus::Busy,
        }
    }
}

impl<T> From<SdResult<T>> for SdStatus {
    fn from(res: SdResult<T>) -> SdStatus {
        match res {
            Ok(_) => SdStatus::Ok,
            Err(e) => e.into(),
        }
    }
}

/// Collapse a controller result into the driver's vocabulary. Every controller
/// error becomes `Generic`; its details only reach the log.
pub(crate) fn translate<T, E: Debug>(op: &'static str, res: Result<T, E>) -> SdResult<T> {
    res.map_err(|e| {
        debug!("controller {} failed: {:?}", op, e);
        SdError::Generic
    })
}
