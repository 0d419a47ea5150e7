//! Lazy listing of zip/jar archive locations.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{ResourceError, Result};

/// Lazy entry stream over one archive location.
///
/// Walks the archive's entry catalog in central-directory order, yielding
/// every entry name that starts with the logical prefix. The test is a
/// plain prefix match with no implied separator, so `io/app` also admits
/// `io/application.txt`. Directory marker entries (trailing `/`) are
/// skipped. The archive handle stays open for the life of the stream and
/// is released on drop or [`close`](Self::close).
///
/// Each location gets its own stream: a folder spread over several archives
/// enumerates all of them, in locator order.
#[derive(Debug)]
pub struct ArchiveEntries {
    prefix: String,
    archive: ZipArchive<File>,
    index: usize,
}

impl ArchiveEntries {
    /// Opens `path` and reads its entry catalog for the folder `prefix`.
    ///
    /// Opening the file or parsing the catalog fails with
    /// [`ResourceError::FolderRead`].
    pub fn open(prefix: String, path: PathBuf) -> Result<Self> {
        let file = File::open(&path).map_err(|e| ResourceError::FolderRead {
            folder: prefix.clone(),
            source: e,
        })?;
        let archive = ZipArchive::new(file).map_err(|e| ResourceError::FolderRead {
            folder: prefix.clone(),
            source: io::Error::other(e),
        })?;
        debug!(
            "Opened archive location: {} ({} entries)",
            path.display(),
            archive.len()
        );
        Ok(Self {
            prefix,
            archive,
            index: 0,
        })
    }

    /// Releases the archive handle, reporting release faults as
    /// [`ResourceError::Close`]. File-backed archives release without
    /// faulting; the variant is the reporting surface for handle types
    /// that can.
    pub fn close(self) -> Result<()> {
        drop(self.archive);
        Ok(())
    }
}

impl Iterator for ArchiveEntries {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.archive.len() {
            let i = self.index;
            self.index += 1;
            let entry = match self.archive.by_index(i) {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(ResourceError::FolderRead {
                        folder: self.prefix.clone(),
                        source: io::Error::other(e),
                    }));
                }
            };
            let name = entry.name();
            if name.starts_with(&self.prefix) && !name.ends_with('/') {
                return Some(Ok(name.to_string()));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    fn create_test_jar(path: &Path, entries: &[&str]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        for entry in entries {
            if entry.ends_with('/') {
                zip.add_directory(entry.trim_end_matches('/'), options)
                    .unwrap();
            } else {
                zip.start_file(*entry, options).unwrap();
                zip.write_all(b"payload").unwrap();
            }
        }

        zip.finish().unwrap();
    }

    #[test]
    fn yields_entries_under_prefix() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("test.jar");
        create_test_jar(
            &jar,
            &[
                "io/app/readme.txt",
                "io/app/sub/nested.txt",
                "io/other/skip.txt",
            ],
        );

        let names: Vec<String> = ArchiveEntries::open("io/app".to_string(), jar)
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(names, vec!["io/app/readme.txt", "io/app/sub/nested.txt"]);
    }

    #[test]
    fn prefix_match_has_no_implied_separator() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("test.jar");
        create_test_jar(&jar, &["io/application.txt", "io/app/readme.txt"]);

        let names: Vec<String> = ArchiveEntries::open("io/app".to_string(), jar)
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(names, vec!["io/application.txt", "io/app/readme.txt"]);
    }

    #[test]
    fn skips_directory_markers() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("test.jar");
        create_test_jar(&jar, &["io/app/", "io/app/readme.txt"]);

        let names: Vec<String> = ArchiveEntries::open("io/app".to_string(), jar)
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(names, vec!["io/app/readme.txt"]);
    }

    #[test]
    fn empty_prefix_lists_everything() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("test.jar");
        create_test_jar(&jar, &["root.txt", "io/app/readme.txt"]);

        let names: Vec<String> = ArchiveEntries::open(String::new(), jar)
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(names, vec!["root.txt", "io/app/readme.txt"]);
    }

    #[test]
    fn missing_archive_fails_at_open() {
        let dir = tempdir().unwrap();
        let err =
            ArchiveEntries::open("io/app".to_string(), dir.path().join("absent.jar")).unwrap_err();
        assert!(matches!(err, ResourceError::FolderRead { folder, .. } if folder == "io/app"));
    }

    #[test]
    fn garbage_archive_fails_at_open() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("bogus.jar");
        std::fs::write(&bogus, b"this is not a zip file").unwrap();

        let err = ArchiveEntries::open("io/app".to_string(), bogus).unwrap_err();
        assert!(matches!(err, ResourceError::FolderRead { .. }));
    }

    #[test]
    fn close_releases_without_fault() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("test.jar");
        create_test_jar(&jar, &["io/app/readme.txt"]);

        let entries = ArchiveEntries::open("io/app".to_string(), jar).unwrap();
        entries.close().unwrap();
    }
}
