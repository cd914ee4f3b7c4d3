// odm-core/src/lib.rs

// Declare the top-level modules within the library crate
pub mod hook;
pub mod loader;
pub mod materializer;
pub mod mirror;
pub mod patch;
pub mod resolver;

// Re-export key types for easier use by the CLI crate
pub use hook::{Hook, HookChain};
pub use loader::{Autoloader, ClassNameResolver, LoadedModule, Loader, ModuleResolver};
pub use materializer::Materializer;
pub use odm_net::transport::Transport;
pub use patch::{neutralize, ContentPatcher};
