//! Storage abstractions for service layer
//!
//! Contains the reusable file-backed JSON document store.

pub mod json_doc_store;
