//! File handles and forwarding of file operations to drivers.
//!
//! Device files are non-seekable streams: `read` and `write` return whatever
//! byte count the driver reports, and zero bytes is not an error.

use alloc::format;
use alloc::string::{String, ToString};

use log::error;

use super::DriverFs;
use super::node::DriverNode;
use crate::device::{DeviceHandle, DriverCaps, FileAttributes, OpenFlags};
use crate::error::{DrvFsError, DrvFsErrorKind, Result};

pub enum SeekFrom {
    Start(u64),
    Current(i64),
    End(i64),
}

/// An open device file.
///
/// The handle borrows its node from the [`DriverFs`] that opened it, so the
/// instance cannot be torn down while files are open. Dropping the handle
/// closes the device; [`DriverFs::close`] does the same after validating the
/// instance.
///
/// ```compile_fail
/// use drvfs::{DriverFs, FileAttributes, OpenFlags};
///
/// fn teardown(fs: &mut DriverFs) {
///     let file = fs.open("/dmclk", OpenFlags::READ, FileAttributes::empty());
///     fs.deinit().ok();
///     drop(file);
/// }
/// ```
pub struct FileHandle<'fs> {
    node: &'fs DriverNode,
    device: Option<DeviceHandle>,
    path: String,
    flags: OpenFlags,
    attributes: FileAttributes,
}

impl<'fs> FileHandle<'fs> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    pub fn attributes(&self) -> FileAttributes {
        self.attributes
    }

    fn release(&mut self) {
        if let Some(device) = self.device.take() {
            if self.node.supports(DriverCaps::CLOSE) {
                self.node.module().close(self.node.context(), device);
            }
        }
    }

    fn parts(&mut self) -> Result<(&'fs DriverNode, &mut DeviceHandle)> {
        let device = self
            .device
            .as_mut()
            .ok_or_else(|| DrvFsError::new(DrvFsErrorKind::Invalid, "file handle is closed"))?;
        Ok((self.node, device))
    }
}

impl Drop for FileHandle<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

impl DriverFs {
    pub fn open(&self, path: &str, flags: OpenFlags, attributes: FileAttributes) -> Result<FileHandle<'_>> {
        self.check("open")?;
        let node = self.find_node(path).map_err(|e| {
            error!("File not found: {}", path);
            e
        })?;

        if !node.supports(DriverCaps::OPEN) {
            error!("Driver does not implement open: {}", node.driver_name());
            return Err(DrvFsError::new(
                DrvFsErrorKind::NotFound,
                format!("driver '{}' has no open entry point", node.driver_name()),
            ));
        }

        let device = node.module().open(node.context(), flags).ok_or_else(|| {
            error!("Driver failed to open device: {}", path);
            DrvFsError::new(DrvFsErrorKind::General, format!("driver refused to open '{}'", path))
        })?;

        Ok(FileHandle {
            node,
            device: Some(device),
            path: path.to_string(),
            flags,
            attributes,
        })
    }

    pub fn close(&self, mut file: FileHandle<'_>) -> Result<()> {
        self.check("close")?;
        file.release();
        Ok(())
    }

    pub fn read(&self, file: &mut FileHandle<'_>, buffer: &mut [u8]) -> Result<usize> {
        self.check("read")?;
        let (node, device) = file.parts()?;
        require(node, DriverCaps::READ, "read")?;
        Ok(node.module().read(node.context(), device, buffer))
    }

    pub fn write(&self, file: &mut FileHandle<'_>, buffer: &[u8]) -> Result<usize> {
        self.check("write")?;
        let (node, device) = file.parts()?;
        require(node, DriverCaps::WRITE, "write")?;
        Ok(node.module().write(node.context(), device, buffer))
    }

    /// Read one byte. Fails when the driver produced nothing.
    pub fn getc(&self, file: &mut FileHandle<'_>) -> Result<u8> {
        let mut byte = [0u8; 1];
        match self.read(file, &mut byte)? {
            1 => Ok(byte[0]),
            _ => Err(DrvFsError::new(DrvFsErrorKind::General, "no data available")),
        }
    }

    /// Write one byte and return it. Fails when the driver accepted nothing.
    pub fn putc(&self, file: &mut FileHandle<'_>, byte: u8) -> Result<u8> {
        match self.write(file, &[byte])? {
            1 => Ok(byte),
            _ => Err(DrvFsError::new(DrvFsErrorKind::General, "device accepted no data")),
        }
    }

    /// Drivers without a flush entry point have nothing to flush.
    pub fn flush(&self, file: &mut FileHandle<'_>) -> Result<()> {
        self.check("flush")?;
        let (node, device) = file.parts()?;
        if !node.supports(DriverCaps::FLUSH) {
            return Ok(());
        }
        node.module().flush(node.context(), device).map_err(|e| {
            DrvFsError::new(
                DrvFsErrorKind::General,
                format!("flush failed with code {}", e.0),
            )
        })
    }

    /// Same as [`flush`](Self::flush); devices have no separate backing store.
    pub fn sync(&self, file: &mut FileHandle<'_>) -> Result<()> {
        self.flush(file)
    }

    /// Size reported by the driver's `stat` for the path the handle was opened with.
    pub fn size(&self, file: &FileHandle<'_>) -> Result<u64> {
        self.check("size")?;
        Ok(file.node.stat(file.path())?.size)
    }

    pub fn lseek(&self, _file: &mut FileHandle<'_>, _pos: SeekFrom) -> Result<u64> {
        self.check("lseek")?;
        error!("lseek not supported for device drivers");
        Err(DrvFsError::new(DrvFsErrorKind::General, "lseek is not supported"))
    }

    pub fn tell(&self, _file: &FileHandle<'_>) -> Result<u64> {
        self.check("tell")?;
        Err(DrvFsError::new(DrvFsErrorKind::General, "tell is not supported"))
    }

    /// Streams never run dry from drvfs' point of view; only an invalid
    /// instance reports end of file.
    pub fn eof(&self, _file: &FileHandle<'_>) -> bool {
        !self.is_valid()
    }
}

fn require(node: &DriverNode, caps: DriverCaps, operation: &str) -> Result<()> {
    if node.supports(caps) {
        return Ok(());
    }
    error!("Driver does not implement {}: {}", operation, node.driver_name());
    Err(DrvFsError::new(
        DrvFsErrorKind::NotFound,
        format!("driver '{}' has no {} entry point", node.driver_name(), operation),
    ))
}
