//! Entity definitions shared by the store and the HTTP layer.

pub mod service;
