pub mod service_store;
