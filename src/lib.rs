//! # drvfs - Driver File System
//!
//! drvfs exposes device drivers as files in a shallow namespace so that generic
//! file-oriented code can reach heterogeneous hardware through uniform paths.
//!
//! ## Overview
//!
//! At initialization the configuration tree is scanned depth-first. Every
//! configuration file names a driver module (explicitly, through its parent
//! directory, or through its own file name). The module is activated through the
//! host [`ModuleLoader`], asked to create a driver context, and the resulting
//! node is published under a path derived from its [`DeviceNumber`]:
//!
//! | Device number   | Path           | Parent directory |
//! |-----------------|----------------|------------------|
//! | none            | `dmclk`        | `/`              |
//! | major           | `dmuart0`      | `/`              |
//! | major + minor   | `dmspi0/1`     | `dmspi0/`        |
//!
//! All later calls (`open`, `read`, `readdir`, `stat`, ...) resolve paths against
//! that registry and forward to the driver's callbacks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let loader: Arc<dyn ModuleLoader> = Arc::new(StaticModuleLoader::new());
//! let fs = DriverFs::init("/etc/drivers", loader, &StdConfigSource)?;
//!
//! let mut file = fs.open("/dmclk", OpenFlags::READ, FileAttributes::empty())?;
//! let mut buffer = [0u8; 16];
//! let read = fs.read(&mut file, &mut buffer)?;
//! fs.close(file)?;
//! ```

#![no_std]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod config;
pub mod device;
pub mod error;
pub mod fs;
pub mod ini;
pub mod module;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use device::{
    DeviceHandle, DeviceNumber, DeviceStat, DriverCaps, DriverContext, DriverError, DriverModule,
    FileAttributes, OpenFlags,
};
pub use error::{DrvFsError, DrvFsErrorKind, Result};
pub use fs::{DirEntry, DirectoryHandle, DriverFs, FileHandle, FileStat, SeekFrom};
pub use ini::{ConfigDocument, IniDocument};
pub use module::{ModuleLoader, static_loader::StaticModuleLoader};
pub use source::ConfigSource;
#[cfg(feature = "std")]
pub use source::StdConfigSource;
