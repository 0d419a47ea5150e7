//! Backend location: mapping logical names and folders to physical places.

use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::PathBuf;

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{ResourceError, Result};
use crate::location::Location;

/// Resolves logical names and folders against an ordered set of backends.
///
/// The engine consults exactly one locator. The first backend holding a
/// name wins resolution, and folder enumeration merges locations in the
/// order returned here. Faults must surface as errors, never be swallowed:
/// `Ok(None)` and an empty vector mean genuine absence.
pub trait Locator: Send + Sync {
    /// Opens the first physical stream bound to `name`, if any backend
    /// holds it.
    fn open_resource(&self, name: &str) -> io::Result<Option<Box<dyn Read + Send>>>;

    /// Returns every location that may hold `folder`'s contents, highest
    /// priority first.
    fn locate_folder(&self, folder: &str) -> io::Result<Vec<Location>>;
}

#[derive(Debug, Clone)]
enum PathEntry {
    Dir(PathBuf),
    Archive(PathBuf),
}

/// Ordered search path of directory-tree and archive backends.
///
/// The built-in [`Locator`]. Entries are consulted in insertion order, so
/// earlier entries shadow later ones. Nothing is cached between calls;
/// backends are re-read every time, and changes on disk are visible to the
/// next call.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    entries: Vec<PathEntry>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a directory-tree backend rooted at `root`.
    pub fn dir(mut self, root: impl Into<PathBuf>) -> Self {
        self.entries.push(PathEntry::Dir(root.into()));
        self
    }

    /// Appends a zip/jar archive backend.
    pub fn archive(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.push(PathEntry::Archive(path.into()));
        self
    }

    /// Builds a search path by classifying each entry from filesystem
    /// metadata: directories become tree backends, regular files archive
    /// backends. Anything else fails with [`ResourceError::Configuration`].
    pub fn detect<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut path = Self::new();
        for entry in paths {
            let entry = entry.into();
            let meta = fs::metadata(&entry).map_err(|e| {
                ResourceError::Configuration(format!("{}: {e}", entry.display()))
            })?;
            if meta.is_dir() {
                path.entries.push(PathEntry::Dir(entry));
            } else if meta.is_file() {
                path.entries.push(PathEntry::Archive(entry));
            } else {
                return Err(ResourceError::Configuration(format!(
                    "{}: not a directory or archive file",
                    entry.display()
                )));
            }
        }
        debug!("Detected search path with {} entries", path.entries.len());
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Locator for SearchPath {
    fn open_resource(&self, name: &str) -> io::Result<Option<Box<dyn Read + Send>>> {
        for entry in &self.entries {
            match entry {
                PathEntry::Dir(root) => {
                    let candidate = root.join(name);
                    if candidate.is_file() {
                        return Ok(Some(Box::new(File::open(candidate)?)));
                    }
                }
                PathEntry::Archive(path) => {
                    let mut archive =
                        ZipArchive::new(File::open(path)?).map_err(io::Error::other)?;
                    match archive.by_name(name) {
                        Ok(mut entry) => {
                            // Entry readers borrow the archive, so hand the
                            // caller an owned in-memory copy.
                            let mut buf = Vec::new();
                            entry.read_to_end(&mut buf)?;
                            return Ok(Some(Box::new(Cursor::new(buf))));
                        }
                        Err(ZipError::FileNotFound) => {}
                        Err(e) => return Err(io::Error::other(e)),
                    }
                }
            }
        }
        Ok(None)
    }

    fn locate_folder(&self, folder: &str) -> io::Result<Vec<Location>> {
        let mut locations = Vec::new();
        for entry in &self.entries {
            match entry {
                PathEntry::Dir(base) => {
                    let root = if folder.is_empty() {
                        base.clone()
                    } else {
                        base.join(folder)
                    };
                    // Absent folders must enumerate as empty, so only
                    // existing directories are offered.
                    match fs::metadata(&root) {
                        Ok(meta) if meta.is_dir() => locations.push(Location::Tree {
                            prefix: folder.to_string(),
                            root,
                        }),
                        Ok(_) => {}
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => return Err(e),
                    }
                }
                // Archives are always offered; the lister's prefix filter
                // decides membership, so the catalog is read once per call.
                PathEntry::Archive(path) => locations.push(Location::Archive {
                    prefix: folder.to_string(),
                    archive: path.clone(),
                }),
            }
        }
        Ok(locations)
    }
}
