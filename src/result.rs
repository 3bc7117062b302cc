use core::fmt::Debug;

/// Error type
#[derive(Debug, thiserror::Error)]
pub enum Error<E: Sized + Debug> {
    /// No presence on wire
    #[error("no presence pulse after bus reset")]
    NoPresence,
    /// Scratchpad checksum (computed, received)
    #[error("scratchpad crc mismatch: computed {0:#04x}, received {1:#04x}")]
    CrcMismatch(u8, u8),
    #[error("bus line error: {0:?}")]
    PortError(E),
}

impl<E: Sized + Debug> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::PortError(e)
    }
}
