use core::fmt;

use crate::session::{SessionMode, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Frame delimiters missing or payload of unexpected length.
    CorruptFrame,
    /// Reply shorter than the status field.
    TruncatedResponse,
    /// The transport timed out before a frame tail was seen.
    Timeout,
    /// The session is not in a state that allows this transition.
    InvalidStateTransition {
        from: SessionMode,
        transition: Transition,
    },
    /// The radar replied with a status code that is not accepted.
    CommandFailed(u16),
    /// Frame does not fit in the buffer it is written to.
    BufferOverflow,
    ReadFailure,
    WriteFailure,
    /// The serial connection was closed.
    Disconnected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CorruptFrame => write!(f, "corrupt frame"),
            Error::TruncatedResponse => write!(f, "truncated response"),
            Error::Timeout => write!(f, "timed out waiting for frame tail"),
            Error::InvalidStateTransition { from, transition } => {
                write!(f, "{:?} is not allowed while {:?}", transition, from)
            }
            Error::CommandFailed(code) => write!(f, "command failed with status {:#06X}", code),
            Error::BufferOverflow => write!(f, "buffer overflow"),
            Error::ReadFailure => write!(f, "serial read failure"),
            Error::WriteFailure => write!(f, "serial write failure"),
            Error::Disconnected => write!(f, "serial connection closed"),
        }
    }
}
