//! # Driver filesystem
//!
//! [`DriverFs`] is the filesystem instance handed to the host VFS. It owns the
//! registry built from the configuration tree and implements the path-based
//! operations on top of it:
//!
//! - [`file`]: open/read/write/flush/close forwarding to the driver
//! - [`dir`]: opendir/readdir/closedir over the flat, two-level namespace
//! - this module: init/deinit, stat and the unsupported mutations
//!
//! The instance carries a validity tag. It is set only after the configuration
//! scan completed and cleared by [`DriverFs::deinit`]; every operation on an
//! instance without the tag fails with [`DrvFsErrorKind::Invalid`].

pub mod dir;
pub mod file;
pub mod node;
pub mod path;
pub mod registry;
pub mod scanner;


use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

use log::{debug, error, info};

use crate::config::CONTEXT_MAGIC;
use crate::device::FileAttributes;
use crate::error::{DrvFsError, DrvFsErrorKind, Result};
use crate::module::ModuleLoader;
use crate::source::ConfigSource;

pub use dir::{DirEntry, DirectoryHandle};
pub use file::{FileHandle, SeekFrom};
use node::DriverNode;
use registry::DriverRegistry;
use scanner::ConfigScanner;

/// Size and attributes of a device file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub attributes: FileAttributes,
}

pub struct DriverFs {
    magic: u32,
    config_path: String,
    registry: DriverRegistry,
}

impl DriverFs {
    /// Build the namespace from the configuration tree at `config_path`.
    ///
    /// Individual configuration entries that fail are skipped. If the tree
    /// itself cannot be read, every node created so far is torn down and the
    /// error is returned.
    pub fn init(
        config_path: &str,
        loader: Arc<dyn ModuleLoader>,
        source: &dyn ConfigSource,
    ) -> Result<Self> {
        if config_path.is_empty() {
            error!("Config path is empty");
            return Err(DrvFsError::new(DrvFsErrorKind::Invalid, "config path is empty"));
        }

        let mut registry = DriverRegistry::new();
        let scanner = ConfigScanner::new(&loader, source);
        match scanner.scan(&mut registry, config_path) {
            Ok(count) => info!("Configured {} drivers from {}", count, config_path),
            Err(e) => {
                error!("Failed to configure drivers: {}", e);
                registry.clear();
                return Err(e);
            }
        }

        Ok(Self {
            magic: CONTEXT_MAGIC,
            config_path: config_path.to_string(),
            registry,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.magic == CONTEXT_MAGIC
    }

    /// Tear down every driver node and invalidate the instance.
    pub fn deinit(&mut self) -> Result<()> {
        self.check("deinit")?;
        self.registry.clear();
        self.magic = 0;
        Ok(())
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    /// Canonical paths of all registered nodes, in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.registry.iter().map(|node| node.path())
    }

    pub fn stat(&self, path: &str) -> Result<FileStat> {
        self.check("stat")?;
        let node = self.find_node(path)?;
        let stat = node.stat(path)?;
        Ok(FileStat {
            size: stat.size,
            attributes: FileAttributes::from_bits_retain(stat.mode),
        })
    }

    pub fn direxists(&self, path: &str) -> bool {
        if self.check("direxists").is_err() {
            return false;
        }
        self.registry.is_directory(&path::directory_key(path))
    }

    /// Devices cannot be created through the namespace.
    pub fn mkdir(&self, _path: &str) -> Result<()> {
        self.check("mkdir")?;
        Err(DrvFsError::new(DrvFsErrorKind::Invalid, "mkdir is not supported"))
    }

    pub fn unlink(&self, path: &str) -> Result<()> {
        self.check("unlink")?;
        error!("unlink not supported for device drivers: {}", path);
        Err(DrvFsError::new(DrvFsErrorKind::General, "unlink is not supported"))
    }

    pub fn rename(&self, old_path: &str, new_path: &str) -> Result<()> {
        self.check("rename")?;
        error!("rename not supported for device drivers: {} -> {}", old_path, new_path);
        Err(DrvFsError::new(DrvFsErrorKind::General, "rename is not supported"))
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        error!("Invalid context in {}", operation);
        Err(DrvFsError::new(
            DrvFsErrorKind::Invalid,
            format!("{} on an invalid drvfs instance", operation),
        ))
    }

    fn find_node(&self, path: &str) -> Result<&DriverNode> {
        let key = path::node_key(path);
        self.registry.find_by_path(key).ok_or_else(|| {
            debug!("No driver node at {}", path);
            DrvFsError::new(DrvFsErrorKind::NotFound, format!("'{}' not found", path))
        })
    }
}
