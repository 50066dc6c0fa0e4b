//! Directory listing and file access behind a narrow trait, so the scanner and
//! cache never touch the host filesystem directly.
//!
//! Catalog paths are `/`-separated and relative to the storage root: the root
//! itself is `""`, an album might be `"/Artist/Album"`.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::metadata::MediaFile;

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

pub trait Storage {
    /// Whether the medium is present at all. Nothing is scanned when it is not.
    fn is_mounted(&self) -> bool;

    /// Immediate children of `dir`, in a stable order.
    fn entries(&self, dir: &str) -> io::Result<Vec<Entry>>;

    fn open(&self, path: &str) -> io::Result<Box<dyn MediaFile>>;
}

/// Storage rooted at a host directory.
pub struct FsStorage {
    root: PathBuf,
    follow_links: bool,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, follow_links: bool) -> Self {
        Self {
            root: root.into(),
            follow_links,
        }
    }

    /// Host path for a catalog path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

impl Storage for FsStorage {
    fn is_mounted(&self) -> bool {
        self.root.is_dir()
    }

    fn entries(&self, dir: &str) -> io::Result<Vec<Entry>> {
        let walker = WalkDir::new(self.resolve(dir))
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    entries.push(if entry.file_type().is_dir() {
                        Entry::dir(name)
                    } else {
                        Entry::file(name)
                    });
                }
                // the directory itself could not be read
                Err(e) if e.depth() == 0 => return Err(e.into()),
                // a single broken child (dangling link, permissions)
                Err(_) => continue,
            }
        }
        Ok(entries)
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn MediaFile>> {
        Ok(Box::new(File::open(self.resolve(path))?))
    }
}

#[cfg(test)]
pub(crate) use mem::MemStorage;
