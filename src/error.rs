//! Library-wide error and result types.

use std::fmt;
use std::io;

/// Result alias used throughout nup20.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Error messages are kept intentionally terse; callers that need richer
/// context should wrap `Error` in their own type.
#[derive(Debug)]
pub enum Error {
    /// The file header magic was not `"NU20"`.
    BadMagic,
    /// The stream ended before all expected bytes could be read.
    UnexpectedEof,
    /// An offset field points outside the stream extent.
    OutOfBounds,
    /// A model entry has a strip or vertex-block count the mesh assembler
    /// does not support.
    UnsupportedTopology {
        /// Number of strip records on the entry.
        strips: usize,
        /// Number of vertex-block ids on the entry.
        blocks: usize,
    },
    /// A structural constraint was violated (message describes which one).
    Parse(&'static str),
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadMagic => write!(f, "bad magic value"),
            Error::UnexpectedEof => write!(f, "unexpected end of file"),
            Error::OutOfBounds => write!(f, "offset outside stream extent"),
            Error::UnsupportedTopology { strips, blocks } => write!(
                f,
                "unsupported topology: {strips} strip(s), {blocks} vertex block(s)"
            ),
            Error::Parse(s) => write!(f, "parse error: {s}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Error::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        // read_exact reports a short read as UnexpectedEof; that case is a
        // truncated record, not an environment failure.
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(e)
        }
    }
}
