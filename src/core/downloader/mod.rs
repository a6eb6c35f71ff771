pub mod client;

use std::path::Path;

use async_trait::async_trait;

use crate::core::error::BundlerResult;

pub use client::{sha1_file, validate_sha1, Downloader};

/// Network side of the bundle pipeline.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the body as text.
    async fn fetch_text(&self, url: &str) -> BundlerResult<String>;

    /// Make sure `dest` holds the artifact at `url` with SHA-1 `expected_sha1`.
    ///
    /// A cached file with the right hash is reused. Returns `false` when no
    /// verified copy could be obtained; a mismatching file is never left at
    /// `dest`.
    async fn download_and_verify(&self, url: &str, dest: &Path, expected_sha1: &str) -> bool;
}
