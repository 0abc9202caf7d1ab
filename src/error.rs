//! Error type shared by every drvfs operation.

use alloc::string::String;
use core::fmt;

/// Classification of a drvfs failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrvFsErrorKind {
    /// Bad handle, bad argument, or a context that is not (or no longer) valid.
    Invalid,
    /// Path, driver or entry is absent, or a required driver capability is missing.
    /// Also signals the end of a directory listing.
    NotFound,
    /// A computed path does not fit the path bound.
    NoSpace,
    /// Anything else: the driver reported failure, parsing failed, unsupported operation.
    General,
}

pub struct DrvFsError {
    pub kind: DrvFsErrorKind,
    pub message: String,
}

impl DrvFsError {
    pub fn new(kind: DrvFsErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> DrvFsErrorKind {
        self.kind
    }
}

impl fmt::Debug for DrvFsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrvFsError {{ kind: {:?}, message: {} }}", self.kind, self.message)
    }
}

impl fmt::Display for DrvFsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Result type for drvfs operations
pub type Result<T> = core::result::Result<T, DrvFsError>;
