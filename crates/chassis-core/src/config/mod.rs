//! # Chassis Core Configuration
//!
//! The `config` module owns the application's configuration tree.
//!
//! One namespace is loaded per `<namespace>.config.<ext>` file discovered
//! under the configuration directory. Loading is fail-fast: the first file
//! that cannot be read or parsed aborts the whole load and no partial
//! namespace map is ever committed. Values are addressed with dotted paths
//! (`"db.ports.1"`), resolved by the [`ConfigLoader`](loader::ConfigLoader)
//! through an explicit traversal over the tagged value tree.
//!
//! Directory discovery goes through the [`FileLister`](lister::FileLister)
//! seam so tests can substitute a fake listing.
pub mod error;
pub mod lister;
pub mod loader;

pub use error::ConfigError;
pub use lister::{FileEntry, FileLister, RecursiveFileLister};
pub use loader::{ConfigFormat, ConfigLoader, LoadState};
