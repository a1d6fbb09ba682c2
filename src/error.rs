//! OPC UA status codes and the domain error built from them.

use core::fmt;
use std::error::Error;
use std::sync::Arc;

/// A 32-bit OPC UA status code.
///
/// The two most significant bits hold the severity: `00` is good, `01` is
/// uncertain and `10` is bad.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StatusCode(u32);

const SEVERITY_MASK: u32 = 0xC000_0000;
const SEVERITY_UNCERTAIN: u32 = 0x4000_0000;
const SEVERITY_BAD: u32 = 0x8000_0000;

impl StatusCode {
    /// The operation succeeded.
    pub const GOOD: Self = Self(0x0000_0000);
    /// The operation was uncertain.
    pub const UNCERTAIN: Self = Self(0x4000_0000);
    /// The operation failed.
    pub const BAD: Self = Self(0x8000_0000);
    /// An unexpected error occurred.
    pub const BAD_UNEXPECTED_ERROR: Self = Self(0x8001_0000);
    /// An internal error occurred as a result of a programming or configuration error.
    pub const BAD_INTERNAL_ERROR: Self = Self(0x8002_0000);
    /// Not enough memory to complete the operation.
    pub const BAD_OUT_OF_MEMORY: Self = Self(0x8003_0000);
    /// A low level communication error occurred.
    pub const BAD_COMMUNICATION_ERROR: Self = Self(0x8005_0000);
    /// The operation timed out.
    pub const BAD_TIMEOUT: Self = Self(0x800A_0000);
    /// The operation was cancelled because the application is shutting down.
    pub const BAD_SHUTDOWN: Self = Self(0x800C_0000);

    const NAMES: [(Self, &'static str); 9] = [
        (Self::GOOD, "Good"),
        (Self::UNCERTAIN, "Uncertain"),
        (Self::BAD, "Bad"),
        (Self::BAD_UNEXPECTED_ERROR, "Bad_UnexpectedError"),
        (Self::BAD_INTERNAL_ERROR, "Bad_InternalError"),
        (Self::BAD_OUT_OF_MEMORY, "Bad_OutOfMemory"),
        (Self::BAD_COMMUNICATION_ERROR, "Bad_CommunicationError"),
        (Self::BAD_TIMEOUT, "Bad_Timeout"),
        (Self::BAD_SHUTDOWN, "Bad_Shutdown"),
    ];

    /// Create a status code from its raw value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw value of the status code.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether the severity bits are `00`.
    pub const fn is_good(self) -> bool {
        self.0 & SEVERITY_MASK == 0
    }

    /// Whether the severity bits are `01`.
    pub const fn is_uncertain(self) -> bool {
        self.0 & SEVERITY_MASK == SEVERITY_UNCERTAIN
    }

    /// Whether the severity bits are `10`.
    pub const fn is_bad(self) -> bool {
        self.0 & SEVERITY_MASK == SEVERITY_BAD
    }

    /// The symbolic name of a well-known status code.
    pub fn name(self) -> Option<&'static str> {
        Self::NAMES
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, name)| *name)
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<StatusCode> for u32 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode({self})")
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:08X})", self.0),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

/// An error carrying an OPC UA [`StatusCode`], optionally chaining the error
/// that caused it.
///
/// Cloning is cheap: the cause is reference counted, so one failure can be
/// handed to every consumer of a future.
#[derive(Clone)]
pub struct UaError {
    status: StatusCode,
    cause: Option<Arc<dyn Error + Send + Sync + 'static>>,
}

impl UaError {
    /// Create an error from a status code.
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            cause: None,
        }
    }

    /// Create an error from a status code and the error that caused it.
    pub fn with_cause<C>(status: impl Into<StatusCode>, cause: C) -> Self
    where
        C: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        Self {
            status: status.into(),
            cause: Some(Arc::from(cause.into())),
        }
    }

    /// The status code of this error.
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// The error that caused this error, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl From<StatusCode> for UaError {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

impl fmt::Debug for UaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UaError")
            .field("status", &self.status)
            .field("cause", &self.cause)
            .finish()
    }
}

impl fmt::Display for UaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status code {}", self.status)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl Error for UaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}
