//! # Driver interface
//!
//! Contract between drvfs and the driver modules it exposes. A driver module is
//! loaded and activated by the host [`ModuleLoader`](crate::module::ModuleLoader);
//! drvfs only talks to it through [`DriverModule`].
//!
//! Every entry point is optional. A driver advertises the ones it implements
//! through [`DriverModule::capabilities`], and drvfs never calls an entry point
//! whose capability bit is clear. The default method bodies exist only so that
//! drivers do not have to spell out the ones they do not support.

pub mod devnum;

use alloc::boxed::Box;
use core::any::Any;

use bitflags::bitflags;

use crate::ini::ConfigDocument;

pub use devnum::DeviceNumber;

bitflags! {
    /// Entry points a driver module implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DriverCaps: u32 {
        const CREATE = 1 << 0;
        const FREE = 1 << 1;
        const OPEN = 1 << 2;
        const CLOSE = 1 << 3;
        const READ = 1 << 4;
        const WRITE = 1 << 5;
        const FLUSH = 1 << 6;
        const STAT = 1 << 7;
    }
}

bitflags! {
    /// Mode requested when opening a device file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const APPEND = 1 << 2;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

bitflags! {
    /// Attributes reported for namespace entries.
    ///
    /// For device files the bits come straight from the driver's `stat` mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileAttributes: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const EXECUTE = 1 << 2;
        const HIDDEN = 1 << 3;
        const DIRECTORY = 1 << 4;
    }
}

/// State a driver returns from `create`. Owned by the driver node.
pub type DriverContext = Box<dyn Any + Send + Sync>;

/// State a driver returns from `open`. Owned by the file handle.
pub type DeviceHandle = Box<dyn Any + Send + Sync>;

/// Failure code reported by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverError(pub i32);

/// Result of a driver `stat` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceStat {
    pub size: u64,
    pub mode: u32,
}

/// A loaded driver module.
pub trait DriverModule: Send + Sync {
    /// Module name, as known to the loader.
    fn name(&self) -> &str;

    /// Entry points this module implements.
    fn capabilities(&self) -> DriverCaps;

    /// Create a driver instance from its configuration document.
    ///
    /// The driver decides the shape of its device number here: singletons
    /// report [`DeviceNumber::None`], numbered instances report a major or a
    /// major/minor pair.
    fn create(&self, _config: &dyn ConfigDocument) -> Option<(DriverContext, DeviceNumber)> {
        None
    }

    /// Release a context returned by `create`.
    fn free(&self, _context: DriverContext) {}

    fn open(&self, _context: &DriverContext, _flags: OpenFlags) -> Option<DeviceHandle> {
        None
    }

    fn close(&self, _context: &DriverContext, _handle: DeviceHandle) {}

    /// Returns the number of bytes placed in `buffer`.
    fn read(&self, _context: &DriverContext, _handle: &mut DeviceHandle, _buffer: &mut [u8]) -> usize {
        0
    }

    /// Returns the number of bytes consumed from `buffer`.
    fn write(&self, _context: &DriverContext, _handle: &mut DeviceHandle, _buffer: &[u8]) -> usize {
        0
    }

    fn flush(&self, _context: &DriverContext, _handle: &mut DeviceHandle) -> Result<(), DriverError> {
        Ok(())
    }

    fn stat(&self, _context: &DriverContext, _path: &str) -> Result<DeviceStat, DriverError> {
        Err(DriverError(-1))
    }
}
