//! Ordered collection of driver nodes.
//!
//! Nodes are kept in discovery order and every lookup is a linear scan, which is
//! plenty for the tens of drivers a configuration tree describes.

use alloc::format;
use alloc::vec::Vec;

use log::{info, warn};

use super::node::DriverNode;
use crate::config::ROOT_DIRECTORY;
use crate::error::{DrvFsError, DrvFsErrorKind, Result};

/// How a node shows up when a directory is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// The node lives directly in the listed directory.
    File,
    /// The node lives in a group directory below the listed one; the group is
    /// reported once, at its first member.
    Group,
}

pub struct DriverRegistry {
    nodes: Vec<DriverNode>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `node`. A node whose path is already taken, or whose path and a
    /// group directory would share one name, is rejected and torn down.
    pub fn push(&mut self, node: DriverNode) -> Result<()> {
        if let Some(existing) = self.find_clash(&node) {
            warn!(
                "Device path '{}' from driver {} clashes with '{}', ignoring",
                node.path(),
                node.driver_name(),
                existing.path()
            );
            return Err(DrvFsError::new(
                DrvFsErrorKind::General,
                format!(
                    "device path '{}' clashes with registered '{}'",
                    node.path(),
                    existing.path()
                ),
            ));
        }
        self.nodes.push(node);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&DriverNode> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DriverNode> {
        self.nodes.iter()
    }

    /// Node whose canonical path equals `path` (already normalized).
    pub fn find_by_path(&self, path: &str) -> Option<&DriverNode> {
        self.nodes.iter().find(|node| node.path() == path)
    }

    /// Whether `dir` (already normalized) is the root or some node's parent.
    pub fn is_directory(&self, dir: &str) -> bool {
        dir == ROOT_DIRECTORY || self.nodes.iter().any(|node| node.parent_directory() == dir)
    }

    pub fn find_first_under(&self, dir: &str) -> Option<usize> {
        self.scan_under(0, dir)
    }

    pub fn find_next_under(&self, current: usize, dir: &str) -> Option<usize> {
        self.scan_under(current + 1, dir)
    }

    /// How the node at `index` appears in a listing of `dir`, if at all.
    pub fn listing(&self, index: usize, dir: &str) -> Option<Listing> {
        let node = self.nodes.get(index)?;
        let parent = node.parent_directory();
        if parent == dir {
            return Some(Listing::File);
        }
        if dir != ROOT_DIRECTORY || parent == ROOT_DIRECTORY {
            return None;
        }
        let first_of_group = !self.nodes[..index]
            .iter()
            .any(|earlier| earlier.parent_directory() == parent);
        first_of_group.then_some(Listing::Group)
    }

    /// Drop every node, newest first, restoring their modules.
    ///
    /// Nodes sharing a module are released in reverse activation order, so the
    /// node that originally loaded the module is the last one to let go of it.
    pub fn clear(&mut self) {
        let count = self.nodes.len();
        while let Some(node) = self.nodes.pop() {
            drop(node);
        }
        if count > 0 {
            info!("Unconfigured {} drivers", count);
        }
    }

    fn find_clash(&self, node: &DriverNode) -> Option<&DriverNode> {
        self.nodes.iter().find(|other| {
            other.path() == node.path()
                || names_group(other.parent_directory(), node.path())
                || names_group(node.parent_directory(), other.path())
        })
    }

    fn scan_under(&self, start: usize, dir: &str) -> Option<usize> {
        (start..self.nodes.len()).find(|&index| self.listing(index, dir).is_some())
    }
}

/// Whether group directory `dir` (`dmspi0/`) is spelled like file `path` (`dmspi0`).
fn names_group(dir: &str, path: &str) -> bool {
    dir != ROOT_DIRECTORY && dir.strip_suffix('/') == Some(path)
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DriverRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}
