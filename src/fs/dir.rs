//! Directory iteration over the driver namespace.
//!
//! Listing the root yields every singleton and major-numbered device as a file
//! plus one directory entry per major group; listing a group directory yields
//! its minor-numbered devices. Entries come out in discovery order.

use alloc::string::{String, ToString};

use log::error;

use super::DriverFs;
use super::path;
use super::registry::Listing;
use crate::device::FileAttributes;
use crate::error::{DrvFsError, DrvFsErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub size: u64,
    pub attributes: FileAttributes,
}

impl DirEntry {
    pub fn is_directory(&self) -> bool {
        self.attributes.contains(FileAttributes::DIRECTORY)
    }
}

/// Cursor over the entries of one directory.
#[derive(Debug)]
pub struct DirectoryHandle {
    path: String,
    cursor: Option<usize>,
}

impl DirectoryHandle {
    /// Normalized path of the directory being listed.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_none()
    }
}

impl DriverFs {
    pub fn opendir(&self, path: &str) -> Result<DirectoryHandle> {
        self.check("opendir")?;
        let dir = path::directory_key(path);
        if !self.registry.is_directory(&dir) {
            error!("Directory not found: {}", path);
            return Err(DrvFsError::new(
                DrvFsErrorKind::NotFound,
                alloc::format!("directory '{}' not found", path),
            ));
        }
        let cursor = self.registry.find_first_under(&dir);
        Ok(DirectoryHandle { path: dir, cursor })
    }

    /// Next entry of `dir`, or `NotFound` once the listing is exhausted.
    ///
    /// The cursor advances even when the entry's `stat` fails, so a single
    /// broken driver cannot stall the listing.
    pub fn readdir(&self, dir: &mut DirectoryHandle) -> Result<DirEntry> {
        self.check("readdir")?;
        let end = || DrvFsError::new(DrvFsErrorKind::NotFound, "no more entries");

        let index = dir.cursor.ok_or_else(end)?;
        let (Some(node), Some(listing)) = (
            self.registry.get(index),
            self.registry.listing(index, &dir.path),
        ) else {
            dir.cursor = None;
            return Err(end());
        };
        dir.cursor = self.registry.find_next_under(index, &dir.path);

        match listing {
            Listing::File => {
                let stat = node.stat(node.path()).map_err(|e| {
                    error!("Failed to get file stats for: {}", node.path());
                    DrvFsError::new(DrvFsErrorKind::General, e.message)
                })?;
                Ok(DirEntry {
                    name: path::final_segment(node.path()).to_string(),
                    size: stat.size,
                    attributes: FileAttributes::from_bits_retain(stat.mode),
                })
            }
            Listing::Group => Ok(DirEntry {
                name: path::final_segment(node.parent_directory()).to_string(),
                size: 0,
                attributes: FileAttributes::DIRECTORY,
            }),
        }
    }

    pub fn closedir(&self, dir: DirectoryHandle) -> Result<()> {
        self.check("closedir")?;
        drop(dir);
        Ok(())
    }
}
