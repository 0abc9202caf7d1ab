//! Access to the configuration tree.
//!
//! The scanner never touches the host filesystem directly; it goes through a
//! [`ConfigSource`]. With the `std` feature, [`StdConfigSource`] reads a real
//! directory tree.

use alloc::boxed::Box;
use alloc::vec::Vec;
use alloc::string::String;

use crate::error::Result;
use crate::ini::ConfigDocument;

pub trait ConfigSource: Send + Sync {
    /// Names of the entries of directory `path`, in host order.
    ///
    /// Returns `None` when `path` cannot be opened as a directory.
    fn read_dir(&self, path: &str) -> Option<Vec<String>>;

    fn exists(&self, path: &str) -> bool;

    /// Parse the configuration file at `path`.
    fn load_document(&self, path: &str) -> Result<Box<dyn ConfigDocument>>;

    /// A path is a file when it exists and cannot be opened as a directory.
    fn is_file(&self, path: &str) -> bool {
        self.exists(path) && self.read_dir(path).is_none()
    }
}

#[cfg(feature = "std")]
pub use host::StdConfigSource;

#[cfg(feature = "std")]
mod host {
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::ConfigSource;
    use crate::error::{DrvFsError, DrvFsErrorKind, Result};
    use crate::ini::{ConfigDocument, IniDocument};

    /// Reads configuration from the host filesystem.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StdConfigSource;

    impl ConfigSource for StdConfigSource {
        fn read_dir(&self, path: &str) -> Option<Vec<String>> {
            let entries = std::fs::read_dir(path).ok()?;
            Some(
                entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect(),
            )
        }

        fn exists(&self, path: &str) -> bool {
            std::path::Path::new(path).exists()
        }

        fn load_document(&self, path: &str) -> Result<Box<dyn ConfigDocument>> {
            let text = std::fs::read_to_string(path).map_err(|e| {
                DrvFsError::new(DrvFsErrorKind::General, format!("cannot read {}: {}", path, e))
            })?;
            Ok(Box::new(IniDocument::parse(&text)?))
        }
    }
}
