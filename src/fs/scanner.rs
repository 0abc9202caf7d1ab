//! Configuration tree scanner.
//!
//! Walks the configuration tree depth-first, in the order the host lists
//! directory entries. Every regular file becomes one driver node; the driver it
//! instantiates is picked by [`resolve_driver_name`]. A directory whose name is a
//! known driver passes that name down to everything below it, so a tree like
//!
//! ```text
//! drivers/
//!   clk.ini          [main] driver_name=dmclk
//!   dmspi/
//!     0.ini
//!     1.ini
//! ```
//!
//! configures one `dmclk` and two `dmspi` instances. A broken entry is logged
//! and skipped; it never stops the rest of the scan.

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, error};

use super::node::DriverNode;
use super::path;
use super::registry::DriverRegistry;
use crate::config::{DRIVER_NAME_KEY, MAIN_SECTION};
use crate::error::{DrvFsError, DrvFsErrorKind, Result};
use crate::ini::ConfigDocument;
use crate::module::ModuleLoader;
use crate::source::ConfigSource;

/// Driver a configuration file instantiates: the explicit `[main] driver_name`,
/// else the name inherited from an enclosing driver directory, else the file
/// name without its `.ini` extension.
pub fn resolve_driver_name<'a>(
    document: &'a dyn ConfigDocument,
    inherited: Option<&'a str>,
    config_path: &'a str,
) -> &'a str {
    document
        .get_string(MAIN_SECTION, DRIVER_NAME_KEY)
        .filter(|name| !name.is_empty())
        .or(inherited)
        .unwrap_or_else(|| path::config_stem(config_path))
}

struct Frame {
    dir: String,
    inherited: Option<String>,
    entries: vec::IntoIter<String>,
}

pub struct ConfigScanner<'a> {
    loader: &'a Arc<dyn ModuleLoader>,
    source: &'a dyn ConfigSource,
}

impl<'a> ConfigScanner<'a> {
    pub fn new(loader: &'a Arc<dyn ModuleLoader>, source: &'a dyn ConfigSource) -> Self {
        Self { loader, source }
    }

    /// Configure every driver described below `root` into `registry`.
    ///
    /// Fails only if `root` itself cannot be listed. Returns the number of
    /// nodes added.
    pub fn scan(&self, registry: &mut DriverRegistry, root: &str) -> Result<usize> {
        let entries = self.source.read_dir(root).ok_or_else(|| {
            error!("Failed to open config directory: {}", root);
            DrvFsError::new(
                DrvFsErrorKind::NotFound,
                alloc::format!("cannot open config directory '{}'", root),
            )
        })?;

        let mut configured = 0;
        let mut stack: Vec<Frame> = vec![Frame {
            dir: root.to_string(),
            inherited: None,
            entries: entries.into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };
            let full_path = path::join(&frame.dir, &entry);

            if self.source.is_file(&full_path) {
                match self.configure_file(registry, &full_path, frame.inherited.as_deref()) {
                    Ok(()) => configured += 1,
                    Err(e) => error!("Skipping config {}: {}", full_path, e),
                }
                continue;
            }

            let base = path::base_name(&entry);
            let inherited = if self.loader.is_driver(base) {
                Some(base.to_string())
            } else {
                frame.inherited.clone()
            };
            match self.source.read_dir(&full_path) {
                Some(children) => {
                    debug!("Scanning {} (driver: {:?})", full_path, inherited);
                    stack.push(Frame {
                        dir: full_path,
                        inherited,
                        entries: children.into_iter(),
                    });
                }
                None => error!("Failed to open config directory: {}", full_path),
            }
        }

        Ok(configured)
    }

    fn configure_file(
        &self,
        registry: &mut DriverRegistry,
        config_path: &str,
        inherited: Option<&str>,
    ) -> Result<()> {
        let document = self.source.load_document(config_path)?;
        let driver_name = resolve_driver_name(document.as_ref(), inherited, config_path);
        let node = DriverNode::configure(self.loader, driver_name, document.as_ref())?;
        registry.push(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::IniDocument;

    #[test]
    fn test_explicit_name_wins() {
        let doc = IniDocument::parse("[main]\ndriver_name=dmclk\n").unwrap();
        assert_eq!(resolve_driver_name(&doc, Some("dmspi"), "/cfg/dmspi/0.ini"), "dmclk");
    }

    #[test]
    fn test_inherited_name_before_file_name() {
        let doc = IniDocument::parse("[dmspi]\nbaud=1000000\n").unwrap();
        assert_eq!(resolve_driver_name(&doc, Some("dmspi"), "/cfg/dmspi/0.ini"), "dmspi");
    }

    #[test]
    fn test_file_name_fallback() {
        let doc = IniDocument::parse("[main]\ndriver_name=\n").unwrap();
        assert_eq!(resolve_driver_name(&doc, None, "/cfg/dmuart.ini"), "dmuart");
        assert_eq!(resolve_driver_name(&doc, None, "/cfg/dmuart"), "dmuart");
    }
}
