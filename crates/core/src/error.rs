use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fault taxonomy for resource resolution and folder enumeration.
///
/// Absence of a resource is [`NotFound`](ResourceError::NotFound); every
/// other variant wraps an environmental fault and is propagated as-is, never
/// retried or silently recovered. Programmer errors (empty resource names)
/// panic instead; see the operation docs on
/// [`Resources`](crate::Resources).
#[derive(Error, Debug)]
pub enum ResourceError {
    /// No backend on the search path holds the requested name.
    #[error("resource not found: {0}")]
    NotFound(String),
    /// A backend faulted while opening or draining a resource stream.
    #[error("resource could not be read: {name}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
    /// A folder's locations could not be determined, opened, or traversed.
    #[error("resource folder could not be read: {folder}")]
    FolderRead {
        folder: String,
        #[source]
        source: io::Error,
    },
    /// A resource could not be copied out to a temporary file.
    #[error("resource could not be written to a temporary file: {name}")]
    Materialize {
        name: String,
        #[source]
        source: io::Error,
    },
    /// The encoding label named no known character encoding.
    #[error("unsupported encoding `{encoding}` for resource: {name}")]
    Encoding { name: String, encoding: String },
    /// A backend handle faulted while being released.
    #[error("archive could not be closed: {}", .archive.display())]
    Close {
        archive: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A search path was built from an entry that is neither a directory
    /// nor an archive file.
    #[error("invalid search path entry: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ResourceError>;
