//! Driver module activation with exact state restore.
//!
//! [`ModuleLease::prepare`] captures whether a module was already loaded and
//! enabled *before* touching it, then loads and enables it as needed. Dropping
//! the lease undoes only the steps the lease performed, so a module the host had
//! already activated stays active after drvfs lets go of it.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

use log::{error, info};

use super::ModuleLoader;
use crate::config::MAX_MODULE_NAME_LENGTH;
use crate::device::DriverModule;
use crate::error::{DrvFsError, DrvFsErrorKind, Result};

/// An activated driver module together with its pre-activation state.
pub struct ModuleLease {
    loader: Arc<dyn ModuleLoader>,
    module: Arc<dyn DriverModule>,
    name: String,
    was_loaded: bool,
    was_enabled: bool,
}

impl ModuleLease {
    /// Load and enable the module `name`.
    ///
    /// If enabling fails the module is unloaded again, but only when this call
    /// was the one that loaded it. Names that are empty or too long are
    /// rejected before the loader is consulted.
    pub fn prepare(loader: &Arc<dyn ModuleLoader>, name: &str) -> Result<Self> {
        if name.is_empty() || name.len() >= MAX_MODULE_NAME_LENGTH {
            error!("Invalid driver module name: '{}'", name);
            return Err(DrvFsError::new(
                DrvFsErrorKind::Invalid,
                format!("driver module name '{}' is empty or too long", name),
            ));
        }

        let was_loaded = loader.is_loaded(name);
        let was_enabled = loader.is_enabled(name);

        let module = loader.load(name).ok_or_else(|| {
            error!("Failed to load driver module: {}", name);
            DrvFsError::new(
                DrvFsErrorKind::NotFound,
                format!("driver module '{}' cannot be loaded", name),
            )
        })?;

        if !was_enabled && !loader.enable(name) {
            error!("Failed to enable driver module: {}", name);
            if !was_loaded {
                loader.unload(name);
            }
            return Err(DrvFsError::new(
                DrvFsErrorKind::General,
                format!("driver module '{}' cannot be enabled", name),
            ));
        }

        info!(
            "Prepared driver module: {} (was_loaded: {}, was_enabled: {})",
            name, was_loaded, was_enabled
        );

        Ok(Self {
            loader: Arc::clone(loader),
            module,
            name: name.to_string(),
            was_loaded,
            was_enabled,
        })
    }

    pub fn module(&self) -> &Arc<dyn DriverModule> {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn was_loaded(&self) -> bool {
        self.was_loaded
    }

    pub fn was_enabled(&self) -> bool {
        self.was_enabled
    }
}

impl Drop for ModuleLease {
    fn drop(&mut self) {
        cleanup(&*self.loader, &self.name, self.was_loaded, self.was_enabled);
    }
}

/// Return module `name` to the state recorded by `prepare`.
pub fn cleanup(loader: &dyn ModuleLoader, name: &str, was_loaded: bool, was_enabled: bool) {
    if !was_enabled {
        loader.disable(name);
    }
    if !was_loaded {
        loader.unload(name);
    }
}
