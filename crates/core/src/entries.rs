//! Merged entry streams over every location of a logical folder.

use std::collections::{HashSet, VecDeque};

use crate::archive::ArchiveEntries;
use crate::error::Result;
use crate::location::Location;
use crate::walk::TreeEntries;

/// Compiled class files are build output mixed into classpath folders, not
/// resources; enumeration drops them unconditionally.
const COMPILED_SUFFIX: &str = ".class";

/// Entry stream for one location, dispatched on the backend kind.
#[derive(Debug)]
pub(crate) enum LocationEntries {
    Tree(TreeEntries),
    Archive(ArchiveEntries),
}

impl LocationEntries {
    /// Opens the stream matching the location's backend kind.
    pub(crate) fn open(location: Location) -> Result<Self> {
        match location {
            Location::Tree { prefix, root } => TreeEntries::open(prefix, root).map(Self::Tree),
            Location::Archive { prefix, archive } => {
                ArchiveEntries::open(prefix, archive).map(Self::Archive)
            }
        }
    }

    fn close(self) -> Result<()> {
        match self {
            Self::Tree(tree) => tree.close(),
            Self::Archive(archive) => archive.close(),
        }
    }
}

impl Iterator for LocationEntries {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Tree(tree) => tree.next(),
            Self::Archive(archive) => archive.next(),
        }
    }
}

/// Lazy merged stream of resource names under one logical folder.
///
/// Location streams are drained in locator order; names ending in `.class`
/// are dropped and the rest deduplicated first-seen-wins, so a name
/// shadowed by an earlier backend is reported exactly once. Each location's
/// handle is released as soon as its stream is exhausted.
///
/// The stream is fused by its first error: the failing item is yielded,
/// every remaining handle is released, and iteration ends. There is no
/// partial enumeration past a bad location.
#[derive(Debug)]
pub struct Entries {
    streams: VecDeque<LocationEntries>,
    seen: HashSet<String>,
}

impl Entries {
    pub(crate) fn new(streams: Vec<LocationEntries>) -> Self {
        Self {
            streams: streams.into(),
            seen: HashSet::new(),
        }
    }

    /// Drops every remaining backend handle, reporting release faults as
    /// [`ResourceError::Close`](crate::ResourceError::Close).
    ///
    /// Dropping the stream releases the same handles; `close` exists for
    /// callers that want the fault report.
    pub fn close(mut self) -> Result<()> {
        while let Some(stream) = self.streams.pop_front() {
            stream.close()?;
        }
        Ok(())
    }
}

impl Iterator for Entries {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(stream) = self.streams.front_mut() {
            match stream.next() {
                Some(Ok(name)) => {
                    if name.ends_with(COMPILED_SUFFIX) {
                        continue;
                    }
                    if !self.seen.insert(name.clone()) {
                        continue;
                    }
                    return Some(Ok(name));
                }
                Some(Err(e)) => {
                    // One bad location fails the whole enumeration.
                    self.streams.clear();
                    return Some(Err(e));
                }
                None => {
                    // Exhausted; release this location before the next.
                    self.streams.pop_front();
                }
            }
        }
        None
    }
}
