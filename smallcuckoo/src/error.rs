use std::fmt::Display;
use std::io;
use std::panic::Location;

use thiserror::Error;

/// Errors that can occur when working with a small cuckoo table
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors when reading/writing a table image
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input ended before the declared number of bytes
    #[error("truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Every 16-bit entry index is already in use
    #[error("entry index space exhausted ({} live entries)", crate::MAX_ENTRIES)]
    EntryOverflow,

    /// A persisted image failed validation
    #[error("corrupt table image: {0}")]
    Corrupt(String),

    /// Slot table doubling went past the slot limit
    #[error("slot table cannot grow beyond {0} slots")]
    TableSizeLimit(usize),

    /// A cursor was advanced with no occupied slot left
    #[error("cursor advanced past the last occupied slot")]
    Exhausted,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reports an unrecoverable fault and unwinds.
///
/// The table is crash-only: invariant violations, allocation failures and
/// short reads or writes end up here rather than in a caller's `Result`.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: impl Display) -> ! {
    let location = Location::caller();
    tracing::error!(
        file = location.file(),
        line = location.line(),
        error = %err,
        "fatal fault"
    );
    panic!("{location}: fatal: {err}");
}

/// Unwraps `result`, routing any error through [`fatal`].
#[track_caller]
pub(crate) fn ensure<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => fatal(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_message() {
        let err = Error::Truncated {
            expected: 16,
            actual: 3,
        };
        assert_eq!(err.to_string(), "truncated input: expected 16 bytes, got 3");
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::WriteZero, "disk full").into();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::WriteZero));
    }

    #[test]
    fn test_ensure_passes_values_through() {
        assert_eq!(ensure(Ok::<_, Error>(7u16)), 7);
    }

    #[test]
    #[should_panic(expected = "fatal: corrupt table image: bad magic")]
    fn test_ensure_is_fatal_on_error() {
        ensure::<()>(Err(Error::Corrupt("bad magic".to_string())));
    }
}
