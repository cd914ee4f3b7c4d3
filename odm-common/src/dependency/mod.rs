pub mod definition;
pub mod table;

pub use definition::DependencyTarget;
pub use table::DependencyTable;
