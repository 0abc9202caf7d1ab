//! Module loader for drivers linked into the image.
//!
//! Modules are registered up front; "loading" and "enabling" only flip state
//! flags, which is enough for hosts that have no dynamic loader and for tests
//! that need to observe what drvfs did to each module.

use alloc::string::{String, ToString};
use alloc::sync::Arc;

use hashbrown::HashMap;
use spin::Mutex;

use super::ModuleLoader;
use crate::device::DriverModule;

struct ModuleEntry {
    module: Arc<dyn DriverModule>,
    loaded: bool,
    enabled: bool,
    fail_enable: bool,
    load_count: usize,
}

pub struct StaticModuleLoader {
    modules: Mutex<HashMap<String, ModuleEntry>>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        Self {
            modules: Mutex::new(HashMap::new()),
        }
    }

    /// Make `module` available under its own name. Re-registering a name
    /// replaces the module and resets its state.
    pub fn register(&self, module: Arc<dyn DriverModule>) {
        let name = module.name().to_string();
        self.modules.lock().insert(
            name,
            ModuleEntry {
                module,
                loaded: false,
                enabled: false,
                fail_enable: false,
                load_count: 0,
            },
        );
    }

    /// Make every later `enable` of `name` fail (or succeed again).
    pub fn set_enable_failure(&self, name: &str, fail: bool) {
        if let Some(entry) = self.modules.lock().get_mut(name) {
            entry.fail_enable = fail;
        }
    }

    /// How many times `name` went from unloaded to loaded.
    pub fn load_count(&self, name: &str) -> usize {
        self.modules.lock().get(name).map_or(0, |entry| entry.load_count)
    }

    pub fn module_count(&self) -> usize {
        self.modules.lock().len()
    }
}

impl Default for StaticModuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn is_loaded(&self, name: &str) -> bool {
        self.modules.lock().get(name).is_some_and(|entry| entry.loaded)
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.modules.lock().get(name).is_some_and(|entry| entry.enabled)
    }

    fn load(&self, name: &str) -> Option<Arc<dyn DriverModule>> {
        let mut modules = self.modules.lock();
        let entry = modules.get_mut(name)?;
        if !entry.loaded {
            entry.loaded = true;
            entry.load_count += 1;
        }
        Some(Arc::clone(&entry.module))
    }

    fn enable(&self, name: &str) -> bool {
        match self.modules.lock().get_mut(name) {
            Some(entry) if entry.loaded && !entry.fail_enable => {
                entry.enabled = true;
                true
            }
            _ => false,
        }
    }

    fn disable(&self, name: &str) {
        if let Some(entry) = self.modules.lock().get_mut(name) {
            entry.enabled = false;
        }
    }

    fn unload(&self, name: &str) {
        if let Some(entry) = self.modules.lock().get_mut(name) {
            entry.enabled = false;
            entry.loaded = false;
        }
    }

    fn is_driver(&self, name: &str) -> bool {
        self.modules.lock().contains_key(name)
    }
}
