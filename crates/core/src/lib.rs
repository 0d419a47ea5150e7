//! Classpath-style resource access: uniform reads over directory trees and
//! zip/jar archives arranged on an ordered search path.

pub mod archive;
pub mod entries;
pub mod error;
pub mod location;
pub mod locator;
pub mod resources;
pub mod walk;

pub use archive::ArchiveEntries;
pub use entries::Entries;
pub use error::{ResourceError, Result};
pub use location::Location;
pub use locator::{Locator, SearchPath};
pub use resources::{ResourceReader, Resources};
pub use walk::TreeEntries;
