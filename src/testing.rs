//! Test fixtures: a deterministic stub driver and an in-memory config tree.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use spin::Mutex;

use crate::device::{
    DeviceHandle, DeviceNumber, DeviceStat, DriverCaps, DriverContext, DriverError, DriverModule,
    FileAttributes, OpenFlags,
};
use crate::error::{DrvFsError, DrvFsErrorKind, Result};
use crate::ini::{ConfigDocument, IniDocument};
use crate::module::ModuleLoader;
use crate::module::static_loader::StaticModuleLoader;
use crate::source::ConfigSource;

/// Section of a mock device's configuration.
pub const DEVICE_SECTION: &str = "device";

/// Fixed-content stub driver.
///
/// Reads `[device] major`, `minor` and `data` from its configuration. `data` is
/// the device content returned by `read` and reported by `stat`. Setting
/// `[device] open = refuse` makes `open` fail and `flush = fail` makes `flush` fail.
pub struct MockDriver {
    name: String,
    caps: DriverCaps,
    pub creates: AtomicUsize,
    pub frees: AtomicUsize,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub flushes: AtomicUsize,
    /// Every path handed to `stat`, in call order.
    pub stat_paths: Mutex<Vec<String>>,
}

pub struct MockContext {
    data: Vec<u8>,
    refuse_open: bool,
    fail_flush: bool,
    pub written: Mutex<Vec<u8>>,
}

struct MockHandle {
    position: usize,
}

impl MockDriver {
    pub fn new(name: &str) -> Arc<Self> {
        Self::with_caps(name, DriverCaps::all())
    }

    pub fn with_caps(name: &str, caps: DriverCaps) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            caps,
            creates: AtomicUsize::new(0),
            frees: AtomicUsize::new(0),
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            flushes: AtomicUsize::new(0),
            stat_paths: Mutex::new(Vec::new()),
        })
    }
}

fn mock_context(context: &DriverContext) -> Option<&MockContext> {
    context.downcast_ref::<MockContext>()
}

impl DriverModule for MockDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> DriverCaps {
        self.caps
    }

    fn create(&self, config: &dyn ConfigDocument) -> Option<(DriverContext, DeviceNumber)> {
        if config.get_string(DEVICE_SECTION, "create") == Some("fail") {
            return None;
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        let number = match (
            config.get_u32(DEVICE_SECTION, "major"),
            config.get_u32(DEVICE_SECTION, "minor"),
        ) {
            (Some(major), Some(minor)) => DeviceNumber::MajorMinor { major, minor },
            (Some(major), None) => DeviceNumber::Major(major),
            _ => DeviceNumber::None,
        };
        let context = MockContext {
            data: config
                .get_string(DEVICE_SECTION, "data")
                .unwrap_or("")
                .as_bytes()
                .to_vec(),
            refuse_open: config.get_string(DEVICE_SECTION, "open") == Some("refuse"),
            fail_flush: config.get_string(DEVICE_SECTION, "flush") == Some("fail"),
            written: Mutex::new(Vec::new()),
        };
        Some((Box::new(context), number))
    }

    fn free(&self, _context: DriverContext) {
        self.frees.fetch_add(1, Ordering::SeqCst);
    }

    fn open(&self, context: &DriverContext, _flags: OpenFlags) -> Option<DeviceHandle> {
        if mock_context(context)?.refuse_open {
            return None;
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(MockHandle { position: 0 }))
    }

    fn close(&self, _context: &DriverContext, _handle: DeviceHandle) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn read(&self, context: &DriverContext, handle: &mut DeviceHandle, buffer: &mut [u8]) -> usize {
        let (Some(context), Some(handle)) =
            (mock_context(context), handle.downcast_mut::<MockHandle>())
        else {
            return 0;
        };
        let remaining = &context.data[handle.position.min(context.data.len())..];
        let count = remaining.len().min(buffer.len());
        buffer[..count].copy_from_slice(&remaining[..count]);
        handle.position += count;
        count
    }

    fn write(&self, context: &DriverContext, _handle: &mut DeviceHandle, buffer: &[u8]) -> usize {
        match mock_context(context) {
            Some(context) => {
                context.written.lock().extend_from_slice(buffer);
                buffer.len()
            }
            None => 0,
        }
    }

    fn flush(&self, context: &DriverContext, _handle: &mut DeviceHandle) -> core::result::Result<(), DriverError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        match mock_context(context) {
            Some(context) if context.fail_flush => Err(DriverError(-5)),
            _ => Ok(()),
        }
    }

    fn stat(&self, context: &DriverContext, path: &str) -> core::result::Result<DeviceStat, DriverError> {
        self.stat_paths.lock().push(path.to_string());
        let context = mock_context(context).ok_or(DriverError(-22))?;
        Ok(DeviceStat {
            size: context.data.len() as u64,
            mode: (FileAttributes::READ | FileAttributes::WRITE).bits(),
        })
    }
}

/// Configuration document for a mock device.
pub fn device_config(major: Option<u32>, minor: Option<u32>, data: &str) -> IniDocument {
    let mut doc = IniDocument::new();
    if let Some(major) = major {
        doc.set(DEVICE_SECTION, "major", &major.to_string());
    }
    if let Some(minor) = minor {
        doc.set(DEVICE_SECTION, "minor", &minor.to_string());
    }
    doc.set(DEVICE_SECTION, "data", data);
    doc
}

/// Loader with every driver in `drivers` registered, plus its `dyn` view.
pub fn loader_with(drivers: &[&Arc<MockDriver>]) -> (Arc<StaticModuleLoader>, Arc<dyn ModuleLoader>) {
    let loader = Arc::new(StaticModuleLoader::new());
    for driver in drivers {
        loader.register(Arc::clone(*driver) as Arc<dyn DriverModule>);
    }
    let dyn_loader: Arc<dyn ModuleLoader> = loader.clone();
    (loader, dyn_loader)
}

enum MemoryEntry {
    Directory,
    File(String),
}

/// In-memory configuration tree. Directory listings follow insertion order.
pub struct MemoryConfigSource {
    entries: Vec<(String, MemoryEntry)>,
}

impl MemoryConfigSource {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.entries.push((path.to_string(), MemoryEntry::Directory));
        self
    }

    pub fn file(mut self, path: &str, text: &str) -> Self {
        self.entries
            .push((path.to_string(), MemoryEntry::File(text.to_string())));
        self
    }

    fn lookup(&self, path: &str) -> Option<&MemoryEntry> {
        let path = path.trim_end_matches('/');
        self.entries
            .iter()
            .find(|(entry_path, _)| entry_path == path)
            .map(|(_, entry)| entry)
    }
}

impl ConfigSource for MemoryConfigSource {
    fn read_dir(&self, path: &str) -> Option<Vec<String>> {
        let MemoryEntry::Directory = self.lookup(path)? else {
            return None;
        };
        let dir = path.trim_end_matches('/');
        Some(
            self.entries
                .iter()
                .filter_map(|(entry_path, _)| {
                    let (parent, name) = entry_path.rsplit_once('/')?;
                    (parent == dir).then(|| name.to_string())
                })
                .collect(),
        )
    }

    fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    fn load_document(&self, path: &str) -> Result<Box<dyn ConfigDocument>> {
        match self.lookup(path) {
            Some(MemoryEntry::File(text)) => Ok(Box::new(IniDocument::parse(text)?)),
            _ => Err(DrvFsError::new(
                DrvFsErrorKind::General,
                format!("'{}' is not a file", path),
            )),
        }
    }
}
