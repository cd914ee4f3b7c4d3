// odm-net/src/lib.rs
pub mod listing;
pub mod transport;

pub use listing::parse_index;
pub use odm_common::error::{OdmError, Result};
pub use transport::{transport_for, BasicTransport, HttpClientTransport, Transport};
