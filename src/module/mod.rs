//! # Module loader interface
//!
//! drvfs does not own driver code. Modules are looked up, loaded and enabled by
//! the host through a [`ModuleLoader`]; drvfs only records what state each module
//! was in before it touched it (see [`lifecycle`]) so teardown can put it back.

pub mod lifecycle;
pub mod static_loader;

use alloc::sync::Arc;

use crate::device::DriverModule;

/// Host module registry.
///
/// Loading a module that is already loaded must hand back the existing module.
pub trait ModuleLoader: Send + Sync {
    fn is_loaded(&self, name: &str) -> bool;

    fn is_enabled(&self, name: &str) -> bool;

    /// Load the module `name`, or return it if it is already loaded.
    fn load(&self, name: &str) -> Option<Arc<dyn DriverModule>>;

    /// Returns `false` when the module refused to start.
    fn enable(&self, name: &str) -> bool;

    fn disable(&self, name: &str);

    fn unload(&self, name: &str);

    /// Whether `name` identifies a driver module known to the host.
    fn is_driver(&self, name: &str) -> bool;
}
