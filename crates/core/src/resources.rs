//! Resource resolution and folder enumeration over one locator.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use regex::Regex;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::entries::{Entries, LocationEntries};
use crate::error::{ResourceError, Result};
use crate::locator::Locator;

/// Buffered byte stream bound to one resolved resource.
///
/// Created by [`Resources::open`]. The caller owns it; the backend handle
/// is released on drop. Reads go through [`io::Read`] with plain
/// [`io::Error`] faults; the draining operations on [`Resources`] wrap
/// those into [`ResourceError::Read`].
pub struct ResourceReader {
    name: String,
    inner: BufReader<Box<dyn Read + Send>>,
}

impl ResourceReader {
    fn new(name: String, stream: Box<dyn Read + Send>) -> Self {
        Self {
            name,
            inner: BufReader::new(stream),
        }
    }

    /// Logical name this reader resolved.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ResourceReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceReader")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Read for ResourceReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for ResourceReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

/// Uniform read access to resources across an ordered set of backends.
///
/// One engine wraps one [`Locator`]; independent engines with different
/// backend chains coexist freely. All operations are synchronous and
/// blocking, hold no cross-call state, and re-consult the locator every
/// time.
pub struct Resources<L> {
    locator: L,
}

impl<L: Locator> Resources<L> {
    pub fn new(locator: L) -> Self {
        Self { locator }
    }

    /// Borrow of the locator backing this engine.
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Opens the named resource from the first backend that holds it.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] when no backend holds `name`;
    /// [`ResourceError::Read`] when a backend faults during the lookup.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty. Empty names are programmer error, caught
    /// before any I/O; environmental failures always come back as
    /// [`ResourceError`].
    pub fn open(&self, name: &str) -> Result<ResourceReader> {
        assert!(!name.is_empty(), "resource name must not be empty");
        match self.locator.open_resource(name) {
            Ok(Some(stream)) => {
                debug!("Resolved resource: {}", name);
                Ok(ResourceReader::new(name.to_string(), stream))
            }
            Ok(None) => Err(ResourceError::NotFound(name.to_string())),
            Err(e) => Err(ResourceError::Read {
                name: name.to_string(),
                source: e,
            }),
        }
    }

    /// Reads the named resource fully into memory.
    ///
    /// Panics if `name` is empty, like [`open`](Self::open).
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let mut reader = self.open(name)?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(|e| ResourceError::Read {
            name: name.to_string(),
            source: e,
        })?;
        Ok(buf)
    }

    /// Reads the named resource and decodes it with the named encoding.
    ///
    /// The label goes through the WHATWG encoding registry (`"utf-8"`,
    /// `"iso-8859-1"`, ...); an unrecognized label is
    /// [`ResourceError::Encoding`]. Malformed sequences decode to
    /// replacement characters rather than failing, and byte-order marks are
    /// not stripped.
    pub fn read_to_string(&self, name: &str, encoding: &str) -> Result<String> {
        let bytes = self.read(name)?;
        let Some(enc) = encoding_rs::Encoding::for_label(encoding.as_bytes()) else {
            return Err(ResourceError::Encoding {
                name: name.to_string(),
                encoding: encoding.to_string(),
            });
        };
        let (text, _had_errors) = enc.decode_without_bom_handling(&bytes);
        Ok(text.into_owned())
    }

    /// Copies the named resource into a fresh temporary file and returns
    /// its path.
    ///
    /// Every call produces a distinct file. The file is persisted, not
    /// cleaned up on drop; deleting it is the caller's business.
    ///
    /// # Errors
    ///
    /// Resolution failures as in [`open`](Self::open);
    /// [`ResourceError::Materialize`] when creating, filling, or persisting
    /// the temporary file faults.
    pub fn extract(&self, name: &str) -> Result<PathBuf> {
        let mut reader = self.open(name)?;
        let mut file = NamedTempFile::new().map_err(|e| materialize(name, e))?;
        io::copy(&mut reader, file.as_file_mut()).map_err(|e| materialize(name, e))?;
        let (_file, path) = file.keep().map_err(|e| materialize(name, e.error))?;
        debug!("Materialized {} to {}", name, path.display());
        Ok(path)
    }

    /// Lazily enumerates the resources under a logical folder.
    ///
    /// Asks the locator for the folder's locations and opens each eagerly,
    /// in order; an open fault fails the whole call and releases whatever
    /// was already opened. The returned [`Entries`] merges the location
    /// streams lazily, drops `.class` names, and dedups first-seen-wins.
    /// Zero locations yield an empty stream, not an error. An empty
    /// `folder` enumerates the whole namespace.
    pub fn stream(&self, folder: &str) -> Result<Entries> {
        let locations = self
            .locator
            .locate_folder(folder)
            .map_err(|e| ResourceError::FolderRead {
                folder: folder.to_string(),
                source: e,
            })?;
        debug!(
            "Enumerating folder {:?} across {} locations",
            folder,
            locations.len()
        );
        let mut streams = Vec::with_capacity(locations.len());
        for location in locations {
            streams.push(LocationEntries::open(location)?);
        }
        Ok(Entries::new(streams))
    }

    /// Eagerly enumerates the resources under a logical folder, in
    /// first-encountered order.
    pub fn list(&self, folder: &str) -> Result<Vec<String>> {
        self.stream(folder)?.collect()
    }

    /// Like [`list`](Self::list), keeping only names the pattern matches in
    /// full.
    ///
    /// The pattern source is compiled anchored to the whole name, so a
    /// match never spans a mere substring; flags go inline (`(?i)` for
    /// case-insensitive). Filtering happens on the lazy stream, before
    /// collection.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression. Like empty
    /// resource names, a malformed pattern is programmer error, caught
    /// before any I/O.
    pub fn list_matching(&self, folder: &str, pattern: &str) -> Result<Vec<String>> {
        let anchored = anchor(pattern);
        self.stream(folder)?
            .filter(|item| match item {
                Ok(name) => anchored.is_match(name),
                Err(_) => true,
            })
            .collect()
    }
}

/// Compiles `pattern` anchored to whole names, never substrings.
fn anchor(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$"))
        .expect("name pattern must be a valid regular expression")
}

fn materialize(name: &str, source: io::Error) -> ResourceError {
    ResourceError::Materialize {
        name: name.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    struct EmptyLocator;

    impl Locator for EmptyLocator {
        fn open_resource(&self, _name: &str) -> io::Result<Option<Box<dyn Read + Send>>> {
            Ok(None)
        }

        fn locate_folder(&self, _folder: &str) -> io::Result<Vec<Location>> {
            Ok(Vec::new())
        }
    }

    struct FaultyLocator;

    impl Locator for FaultyLocator {
        fn open_resource(&self, _name: &str) -> io::Result<Option<Box<dyn Read + Send>>> {
            Err(io::Error::other("backend down"))
        }

        fn locate_folder(&self, _folder: &str) -> io::Result<Vec<Location>> {
            Err(io::Error::other("backend down"))
        }
    }

    #[test]
    fn absent_resource_is_not_found() {
        let resources = Resources::new(EmptyLocator);
        let err = resources.open("io/app/readme.txt").unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(name) if name == "io/app/readme.txt"));
    }

    #[test]
    fn locator_fault_is_read_error() {
        let resources = Resources::new(FaultyLocator);
        let err = resources.open("io/app/readme.txt").unwrap_err();
        assert!(matches!(err, ResourceError::Read { .. }));
    }

    #[test]
    fn locator_fault_fails_enumeration() {
        let resources = Resources::new(FaultyLocator);
        let err = resources.stream("io/app").unwrap_err();
        assert!(matches!(err, ResourceError::FolderRead { folder, .. } if folder == "io/app"));
    }

    #[test]
    fn zero_locations_stream_empty() {
        let resources = Resources::new(EmptyLocator);
        assert_eq!(resources.stream("io/app").unwrap().count(), 0);
    }

    #[test]
    #[should_panic(expected = "resource name must not be empty")]
    fn empty_name_is_programmer_error() {
        let resources = Resources::new(EmptyLocator);
        let _ = resources.open("");
    }

    #[test]
    fn anchored_pattern_requires_whole_name() {
        let pattern = anchor(r"io/.+\.txt");
        assert!(pattern.is_match("io/app/readme.txt"));
        assert!(!pattern.is_match("prefix/io/app/readme.txt"));
        assert!(!pattern.is_match("io/app/readme.txt.bak"));
    }

    #[test]
    fn anchoring_keeps_prefix_shadowed_alternatives() {
        let pattern = anchor("a|ab");
        assert!(pattern.is_match("ab"));
        assert!(!pattern.is_match("abc"));
    }

    #[test]
    fn anchored_pattern_honors_inline_flags() {
        let pattern = anchor(r"(?i)io/app/readme\.txt");
        assert!(pattern.is_match("io/app/README.TXT"));
        assert!(!pattern.is_match("io/app/README.TXT.bak"));
    }

    #[test]
    #[should_panic(expected = "name pattern must be a valid regular expression")]
    fn malformed_pattern_is_programmer_error() {
        let resources = Resources::new(EmptyLocator);
        let _ = resources.list_matching("io/app", "(unclosed");
    }

    #[test]
    fn resolution_fault_precedes_encoding_check() {
        let resources = Resources::new(FaultyLocator);
        let err = resources.read_to_string("a.txt", "no-such-encoding").unwrap_err();
        assert!(matches!(err, ResourceError::Read { .. }));
    }
}
