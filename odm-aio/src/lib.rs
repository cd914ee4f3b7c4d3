// odm-aio/src/lib.rs
//! Local filesystem operations for odm (existence checks, staged and atomic
//! writes, directory listings).

pub mod fs;
pub mod store;

pub use fs::{atomic_write_file, create_dir_all, list_directory_entries};
pub use store::{LocalStore, StagedFile};
