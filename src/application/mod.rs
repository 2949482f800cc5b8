// Application layer - use cases over the ledger file.
// Each operation loads the file, works on the in-memory ledger and
// writes it back when something changed.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
