//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep the server crate importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the data directory exists; warn on a missing static directory.
pub async fn ensure_env(services_file: &str, static_dir: Option<&str>) -> anyhow::Result<()> {
    common::env::ensure_env(services_file, static_dir).await
}
