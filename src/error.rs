//! Unified error type for hack420.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! Nothing in the dispatch or menu core treats these as fatal: callers
//! log them and carry on with the in-memory state.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The storage backend failed to read, write or remove a file.
    Storage,

    /// The requested file does not exist.
    NotFound,

    /// Buffer too small for the requested operation.
    BufferOverflow,

    /// A line could not be parsed.
    Format,

    /// The action queue is full; the action was dropped.
    QueueFull,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::Storage => "storage failure",
            Error::NotFound => "file not found",
            Error::BufferOverflow => "buffer overflow",
            Error::Format => "malformed line",
            Error::QueueFull => "action queue full",
        };
        f.write_str(msg)
    }
}

// Convenience conversions

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::BufferOverflow
    }
}

pub type Result<T> = core::result::Result<T, Error>;
