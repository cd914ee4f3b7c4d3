// odm-common/src/lib.rs
pub mod config;
pub mod dependency;
pub mod error;
pub mod model;

// Re-export key types
pub use config::{Config, HookPriority, RemoteLocation, TransportStrategy};
pub use dependency::{DependencyTable, DependencyTarget};
pub use error::{OdmError, Result};
pub use model::{ListingEntry, RelativePath};
