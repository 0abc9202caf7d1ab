//! Compile-time limits and well-known names.

/// Upper bound (exclusive) on the length of a driver module name.
pub const MAX_MODULE_NAME_LENGTH: usize = 32;

/// Upper bound (exclusive) on the length of a namespace path.
pub const MAX_PATH_LENGTH: usize = MAX_MODULE_NAME_LENGTH + 20;

/// Tag stored in a live [`DriverFs`](crate::fs::DriverFs) ('DMDV').
pub const CONTEXT_MAGIC: u32 = 0x444D_4456;

/// Name of the namespace root.
pub const ROOT_DIRECTORY: &str = "/";

/// INI section holding the driver selection.
pub const MAIN_SECTION: &str = "main";

/// INI key naming the driver module for a configuration file.
pub const DRIVER_NAME_KEY: &str = "driver_name";

/// Extension stripped from a configuration file name when it names the driver.
pub const CONFIG_EXTENSION: &str = ".ini";
