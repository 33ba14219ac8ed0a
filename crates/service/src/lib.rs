//! Service layer: the file-backed services catalog.
//! - `storage` holds the generic JSON document store.
//! - `file` adapts it to service listings.
//! - `catalog` is the trait the HTTP layer depends on.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod file;
pub mod catalog;
