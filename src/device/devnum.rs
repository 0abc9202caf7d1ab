//! Device numbers and the paths derived from them.
//!
//! A driver picks the shape of its device number when it is created. The shape
//! decides where the node lives in the namespace:
//!
//! - [`DeviceNumber::None`]: `<name>` directly under the root
//! - [`DeviceNumber::Major`]: `<name><major>` directly under the root
//! - [`DeviceNumber::MajorMinor`]: `<minor>` inside the directory `<name><major>/`

use alloc::format;
use alloc::string::{String, ToString};

use crate::config::{MAX_PATH_LENGTH, ROOT_DIRECTORY};
use crate::error::{DrvFsError, DrvFsErrorKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceNumber {
    /// Singleton device, addressed by the driver name alone.
    None,
    Major(u32),
    MajorMinor { major: u32, minor: u32 },
}

impl DeviceNumber {
    /// Directory that contains the node of driver `driver_name`.
    pub fn parent_directory(&self, driver_name: &str) -> Result<String> {
        match self {
            DeviceNumber::MajorMinor { major, .. } => bounded(format!("{}{}/", driver_name, major)),
            DeviceNumber::None | DeviceNumber::Major(_) => Ok(ROOT_DIRECTORY.to_string()),
        }
    }

    /// Canonical path of the node of driver `driver_name`.
    pub fn node_path(&self, driver_name: &str) -> Result<String> {
        match self {
            DeviceNumber::None => bounded(driver_name.to_string()),
            DeviceNumber::Major(major) => bounded(format!("{}{}", driver_name, major)),
            DeviceNumber::MajorMinor { minor, .. } => {
                let mut path = self.parent_directory(driver_name)?;
                path.push_str(&minor.to_string());
                bounded(path)
            }
        }
    }
}

fn bounded(path: String) -> Result<String> {
    if path.len() >= MAX_PATH_LENGTH {
        return Err(DrvFsError::new(
            DrvFsErrorKind::NoSpace,
            format!("path '{}' exceeds {} bytes", path, MAX_PATH_LENGTH - 1),
        ));
    }
    Ok(path)
}
