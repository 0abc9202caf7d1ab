//! Driver nodes: one activated driver instance bound to its namespace path.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::boxed::Box;

use log::{error, info};

use crate::device::{DeviceStat, DriverCaps, DriverContext, DriverModule};
use crate::error::{DrvFsError, DrvFsErrorKind, Result};
use crate::ini::ConfigDocument;
use crate::module::ModuleLoader;
use crate::module::lifecycle::ModuleLease;

/// An instantiated driver.
///
/// Field order matters: the context is freed in `Drop` before the lease
/// restores the module's activation state.
pub struct DriverNode {
    context: DriverContext,
    path: String,
    parent: String,
    lease: ModuleLease,
}

impl DriverNode {
    /// Activate `driver_name`, create an instance from `config` and compute its path.
    ///
    /// Every failure leaves the module in the state it was found in; a context
    /// that was already created is handed back to the driver's `free`.
    pub fn configure(
        loader: &Arc<dyn ModuleLoader>,
        driver_name: &str,
        config: &dyn ConfigDocument,
    ) -> Result<Self> {
        let lease = ModuleLease::prepare(loader, driver_name)?;
        let module = Arc::clone(lease.module());

        if !module.capabilities().contains(DriverCaps::CREATE) {
            error!("Driver module does not implement create: {}", driver_name);
            return Err(DrvFsError::new(
                DrvFsErrorKind::NotFound,
                format!("driver '{}' has no create entry point", driver_name),
            ));
        }

        let (context, device_number) = module.create(config).ok_or_else(|| {
            error!("Failed to create driver context: {}", driver_name);
            DrvFsError::new(
                DrvFsErrorKind::General,
                format!("driver '{}' failed to create a context", driver_name),
            )
        })?;

        let mut node = DriverNode {
            context,
            path: String::new(),
            parent: String::new(),
            lease,
        };
        node.parent = device_number.parent_directory(driver_name)?;
        node.path = device_number.node_path(driver_name)?;

        info!("Configured driver: {} (path: {})", driver_name, node.path);
        Ok(node)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent_directory(&self) -> &str {
        &self.parent
    }

    pub fn driver_name(&self) -> &str {
        self.lease.name()
    }

    pub fn module(&self) -> &Arc<dyn DriverModule> {
        self.lease.module()
    }

    pub fn context(&self) -> &DriverContext {
        &self.context
    }

    pub fn supports(&self, caps: DriverCaps) -> bool {
        self.module().capabilities().contains(caps)
    }

    /// Ask the driver for the size and mode of `path`.
    pub fn stat(&self, path: &str) -> Result<DeviceStat> {
        if !self.supports(DriverCaps::STAT) {
            error!("Driver module does not implement stat: {}", self.driver_name());
            return Err(DrvFsError::new(
                DrvFsErrorKind::NotFound,
                format!("driver '{}' has no stat entry point", self.driver_name()),
            ));
        }
        self.module().stat(&self.context, path).map_err(|e| {
            DrvFsError::new(
                DrvFsErrorKind::General,
                format!("stat of '{}' failed with code {}", path, e.0),
            )
        })
    }
}

impl Drop for DriverNode {
    fn drop(&mut self) {
        let context = core::mem::replace(&mut self.context, Box::new(()));
        if self.supports(DriverCaps::FREE) {
            self.module().free(context);
            info!("Freed driver context for: {}", self.driver_name());
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::sync::atomic::Ordering;

    use super::*;
    use crate::device::DriverCaps;
    use crate::ini::IniDocument;
    use crate::module::static_loader::StaticModuleLoader;
    use crate::testing::{MockDriver, device_config};

    #[test]
    fn test_configure_and_drop_restores_module() {
        let loader = Arc::new(StaticModuleLoader::new());
        let driver = MockDriver::new("dmspi");
        loader.register(driver.clone());
        let dyn_loader: Arc<dyn ModuleLoader> = loader.clone();

        let config = device_config(Some(0), Some(1), "abc");
        let node = DriverNode::configure(&dyn_loader, "dmspi", &config).unwrap();
        assert_eq!(node.path(), "dmspi0/1");
        assert_eq!(node.parent_directory(), "dmspi0/");
        assert_eq!(node.driver_name(), "dmspi");
        assert_eq!(node.stat(node.path()).unwrap().size, 3);
        assert!(loader.is_enabled("dmspi"));

        drop(node);
        assert_eq!(driver.frees.load(Ordering::SeqCst), 1);
        assert!(!loader.is_loaded("dmspi"));
    }

    #[test]
    fn test_missing_create_is_not_found() {
        let loader = Arc::new(StaticModuleLoader::new());
        loader.register(MockDriver::with_caps("dmnull", DriverCaps::OPEN | DriverCaps::READ));
        let dyn_loader: Arc<dyn ModuleLoader> = loader.clone();

        let err = DriverNode::configure(&dyn_loader, "dmnull", &IniDocument::new())
            .err()
            .unwrap();
        assert_eq!(err.kind, DrvFsErrorKind::NotFound);
        assert!(!loader.is_loaded("dmnull"));
    }

    #[test]
    fn test_overlong_path_frees_context() {
        let name: String = core::iter::repeat('n')
            .take(crate::config::MAX_MODULE_NAME_LENGTH - 1)
            .collect();
        let loader = Arc::new(StaticModuleLoader::new());
        let driver = MockDriver::new(&name);
        loader.register(driver.clone());
        let dyn_loader: Arc<dyn ModuleLoader> = loader.clone();

        let config = device_config(Some(u32::MAX), Some(u32::MAX), "");
        let err = DriverNode::configure(&dyn_loader, &name, &config)
            .err()
            .unwrap();
        assert_eq!(err.kind, DrvFsErrorKind::NoSpace);
        assert_eq!(driver.creates.load(Ordering::SeqCst), 1);
        assert_eq!(driver.frees.load(Ordering::SeqCst), 1);
        assert!(!loader.is_loaded(&name));
    }

    #[test]
    fn test_stat_without_capability() {
        let loader = Arc::new(StaticModuleLoader::new());
        loader.register(MockDriver::with_caps("dmled", DriverCaps::CREATE));
        let dyn_loader: Arc<dyn ModuleLoader> = loader.clone();

        let node = DriverNode::configure(&dyn_loader, "dmled", &IniDocument::new()).unwrap();
        assert_eq!(node.path(), "dmled");
        assert_eq!(node.stat("dmled").unwrap_err().kind, DrvFsErrorKind::NotFound);
    }
}
