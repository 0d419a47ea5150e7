//! Lazy traversal of directory-tree locations.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ResourceError, Result};

/// Lazy entry stream over one directory-tree location.
///
/// Yields the logical name of every regular file under the root, depth
/// first; directories are traversed but never emitted. A symlink counts as
/// a file when its target is one; symlinked directories are not descended
/// into. Names join the logical prefix and the root-relative path with
/// forward slashes on every platform. Directory reads happen as the
/// iterator is pulled, so a consumer that stops early never touches the
/// rest of the tree.
#[derive(Debug)]
pub struct TreeEntries {
    prefix: String,
    root: PathBuf,
    walker: walkdir::IntoIter,
}

impl TreeEntries {
    /// Opens the tree rooted at `root` for the logical folder `prefix`.
    ///
    /// Fails with [`ResourceError::FolderRead`] when the root itself cannot
    /// be read; faults hit mid-traversal surface as `Err` items instead.
    pub fn open(prefix: String, root: PathBuf) -> Result<Self> {
        if let Err(e) = std::fs::metadata(&root) {
            return Err(ResourceError::FolderRead {
                folder: prefix,
                source: e,
            });
        }
        debug!("Walking tree location: {}", root.display());
        let walker = WalkDir::new(&root).into_iter();
        Ok(Self {
            prefix,
            root,
            walker,
        })
    }

    /// Releases the directory walk. Present for parity with archive
    /// streams; releasing a walk cannot fault.
    pub fn close(self) -> Result<()> {
        Ok(())
    }

    /// Logical name for a file under the root, or `None` for the root
    /// itself and for paths outside it.
    fn logical_name(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        if rel.as_os_str().is_empty() {
            return None;
        }
        let mut name = String::new();
        for part in rel.components() {
            if !name.is_empty() {
                name.push('/');
            }
            name.push_str(&part.as_os_str().to_string_lossy());
        }
        if self.prefix.is_empty() {
            Some(name)
        } else if self.prefix.ends_with('/') {
            Some(format!("{}{}", self.prefix, name))
        } else {
            Some(format!("{}/{}", self.prefix, name))
        }
    }
}

impl Iterator for TreeEntries {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(ResourceError::FolderRead {
                        folder: self.prefix.clone(),
                        source: io::Error::other(e),
                    }));
                }
            };
            // Symlinked files resolve, so they enumerate too.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            if let Some(name) = self.logical_name(entry.path()) {
                return Some(Ok(name));
            }
        }
    }
}
