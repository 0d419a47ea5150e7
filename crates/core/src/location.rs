//! Physical locations a logical folder maps to.
//!
//! A [`Locator`](crate::Locator) answers folder queries with an ordered
//! list of locations, each tagged with the backend kind that knows how to
//! enumerate it: a plain directory tree or a zip/jar archive. Locations are
//! produced fresh per call and consumed by the enumeration engine; nothing
//! is retained across calls.

use std::io;
use std::path::PathBuf;

use url::Url;

use crate::error::{ResourceError, Result};

/// Scheme marking a plain directory-tree location descriptor.
const TREE_SCHEME: &str = "file";
/// Scheme marking an archive location descriptor.
const ARCHIVE_SCHEME: &str = "jar";

/// One physical location that may hold a logical folder's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// An on-disk directory holding the folder's contents directly.
    Tree {
        /// Logical folder this location maps to.
        prefix: String,
        /// Directory whose files are the folder's entries.
        root: PathBuf,
    },
    /// A zip/jar archive whose entries under `prefix` belong to the folder.
    Archive {
        /// Logical folder this location maps to.
        prefix: String,
        /// Archive file on disk.
        archive: PathBuf,
    },
}

impl Location {
    /// Decodes a URL-style location descriptor for `folder`.
    ///
    /// `file:` descriptors name a directory tree rooted at the URL path.
    /// `jar:` descriptors name an archive plus an inner folder prefix,
    /// separated by `!/` (`jar:file:///app/lib.jar!/io/app`). An
    /// unparseable descriptor or any other scheme is a
    /// [`ResourceError::FolderRead`] fault.
    pub fn from_url(folder: &str, descriptor: &str) -> Result<Self> {
        let url = Url::parse(descriptor).map_err(|e| fault(folder, io::Error::other(e)))?;
        match url.scheme() {
            TREE_SCHEME => {
                let root = url.to_file_path().map_err(|_| {
                    fault(
                        folder,
                        io::Error::other(format!("not a local path: {descriptor}")),
                    )
                })?;
                Ok(Location::Tree {
                    prefix: folder.to_string(),
                    root,
                })
            }
            ARCHIVE_SCHEME => {
                let inner = url.path();
                let (file_part, prefix) = inner.split_once("!/").ok_or_else(|| {
                    fault(
                        folder,
                        io::Error::other(format!("missing `!/` separator: {descriptor}")),
                    )
                })?;
                let archive = archive_path(file_part).ok_or_else(|| {
                    fault(
                        folder,
                        io::Error::other(format!("unusable archive reference: {file_part}")),
                    )
                })?;
                Ok(Location::Archive {
                    prefix: prefix.to_string(),
                    archive,
                })
            }
            other => Err(fault(
                folder,
                io::Error::other(format!("unsupported location scheme `{other}`")),
            )),
        }
    }

    /// Logical folder prefix this location belongs to.
    pub fn prefix(&self) -> &str {
        match self {
            Location::Tree { prefix, .. } | Location::Archive { prefix, .. } => prefix,
        }
    }
}

/// Resolves the archive part of a `jar:` descriptor to a filesystem path.
///
/// Accepts both nested-URL form (`file:///app/lib.jar`) and bare-path form
/// (`/app/lib.jar`).
fn archive_path(file_part: &str) -> Option<PathBuf> {
    match Url::parse(file_part) {
        Ok(inner) if inner.scheme() == TREE_SCHEME => inner.to_file_path().ok(),
        Ok(_) => None,
        Err(_) => Some(PathBuf::from(file_part)),
    }
}

fn fault(folder: &str, source: io::Error) -> ResourceError {
    ResourceError::FolderRead {
        folder: folder.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_file_descriptor_as_tree() {
        let location = Location::from_url("io/app", "file:///srv/classes/io/app").unwrap();
        assert_eq!(
            location,
            Location::Tree {
                prefix: "io/app".to_string(),
                root: PathBuf::from("/srv/classes/io/app"),
            }
        );
    }

    #[test]
    fn decodes_jar_descriptor_with_nested_url() {
        let location = Location::from_url("io/app", "jar:file:///srv/lib.jar!/io/app").unwrap();
        assert_eq!(
            location,
            Location::Archive {
                prefix: "io/app".to_string(),
                archive: PathBuf::from("/srv/lib.jar"),
            }
        );
    }

    #[test]
    fn decodes_jar_descriptor_with_single_slash_form() {
        let location = Location::from_url("io/app", "jar:file:/srv/lib.jar!/io/app").unwrap();
        assert_eq!(
            location,
            Location::Archive {
                prefix: "io/app".to_string(),
                archive: PathBuf::from("/srv/lib.jar"),
            }
        );
    }

    #[test]
    fn empty_inner_prefix_lists_whole_archive() {
        let location = Location::from_url("", "jar:file:///srv/lib.jar!/").unwrap();
        assert_eq!(location.prefix(), "");
    }

    #[test]
    fn rejects_jar_descriptor_without_separator() {
        let err = Location::from_url("io/app", "jar:file:///srv/lib.jar").unwrap_err();
        assert!(matches!(err, ResourceError::FolderRead { folder, .. } if folder == "io/app"));
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = Location::from_url("io/app", "http://example.com/io/app").unwrap_err();
        assert!(matches!(err, ResourceError::FolderRead { .. }));
    }

    #[test]
    fn rejects_garbage_descriptor() {
        let err = Location::from_url("io/app", "not a url at all").unwrap_err();
        assert!(matches!(err, ResourceError::FolderRead { .. }));
    }
}
