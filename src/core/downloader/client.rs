use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::core::error::{BundlerError, BundlerResult};
use crate::core::http::build_http_client;

use super::Fetcher;

const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Sequential, SHA-1 validated downloader.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> BundlerResult<Self> {
        Ok(Self::with_client(build_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    // ── Single file download ────────────────────────────

    /// Download `url` to `dest`, optionally validating SHA-1.
    ///
    /// The body is streamed to disk and hashed on the way. On a hash
    /// mismatch the written file is removed before the error is returned.
    /// Creates parent directories as needed.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> BundlerResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BundlerError::io(parent))?;
        }

        info!("Downloading {} to {:?}", url, dest);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BundlerError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut hasher = Sha1::new();
        // Scoped so the handle is closed before a possible removal below.
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(BundlerError::io(dest))?;
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                hasher.update(&chunk);
                file.write_all(&chunk).await.map_err(BundlerError::io(dest))?;
            }
            file.flush().await.map_err(BundlerError::io(dest))?;
        }

        let actual = hex::encode(hasher.finalize());
        if let Some(expected) = sha1_expected {
            if !actual.eq_ignore_ascii_case(expected) {
                remove_invalid(dest).await;
                return Err(BundlerError::Sha1Mismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
            debug!("SHA-1 verified for {:?}", dest);
        }

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }

    /// Fetch `url` as text.
    pub async fn get_text(&self, url: &str) -> BundlerResult<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BundlerError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Hex SHA-1 of a file on disk, read in chunks.
pub async fn sha1_file(path: &Path) -> BundlerResult<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(BundlerError::io(path))?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buffer).await.map_err(BundlerError::io(path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Validate an existing file's SHA-1 (case-insensitive hex compare).
pub async fn validate_sha1(path: &Path, expected: &str) -> BundlerResult<bool> {
    let actual = sha1_file(path).await?;
    Ok(actual.eq_ignore_ascii_case(expected))
}

async fn remove_invalid(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("Removed invalid file: {:?}", path),
        Err(e) => warn!("Could not remove invalid file {:?}: {}", path, e),
    }
}

#[async_trait]
impl Fetcher for Downloader {
    async fn fetch_text(&self, url: &str) -> BundlerResult<String> {
        self.get_text(url).await
    }

    async fn download_and_verify(&self, url: &str, dest: &Path, expected_sha1: &str) -> bool {
        if dest.exists() {
            debug!("File {:?} already exists, checking SHA-1", dest);
            match validate_sha1(dest, expected_sha1).await {
                Ok(true) => {
                    debug!("Cached file {:?} verified", dest);
                    return true;
                }
                Ok(false) => {
                    warn!("Cached file {:?} has a stale SHA-1, downloading again", dest);
                    remove_invalid(dest).await;
                }
                Err(e) => warn!("Could not hash cached file {:?}: {}", dest, e),
            }
        }

        match self.download_file(url, dest, Some(expected_sha1)).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Error downloading {}: {}", url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sha1_hex(bytes: &[u8]) -> String {
        hex::encode(Sha1::digest(bytes))
    }

    async fn serve(server: &MockServer, route: &str, body: &'static [u8]) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn download_and_verify_accepts_matching_hash() {
        let server = MockServer::start().await;
        serve(&server, "/lib.jar", b"library bytes").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("lib.jar");

        let downloader = Downloader::new().unwrap();
        let ok = downloader
            .download_and_verify(
                &format!("{}/lib.jar", server.uri()),
                &dest,
                &sha1_hex(b"library bytes").to_uppercase(),
            )
            .await;

        assert!(ok);
        assert_eq!(std::fs::read(&dest).unwrap(), b"library bytes");
    }

    #[tokio::test]
    async fn download_and_verify_removes_file_on_mismatch() {
        let server = MockServer::start().await;
        serve(&server, "/lib.jar", b"tampered").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("lib.jar");

        let downloader = Downloader::new().unwrap();
        let ok = downloader
            .download_and_verify(
                &format!("{}/lib.jar", server.uri()),
                &dest,
                &sha1_hex(b"original"),
            )
            .await;

        assert!(!ok);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn cached_file_with_matching_hash_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("client.jar");
        std::fs::write(&dest, b"cached").unwrap();

        let downloader = Downloader::new().unwrap();
        let ok = downloader
            .download_and_verify(
                &format!("{}/client.jar", server.uri()),
                &dest,
                &sha1_hex(b"cached"),
            )
            .await;

        assert!(ok);
    }

    #[tokio::test]
    async fn stale_cached_file_is_replaced() {
        let server = MockServer::start().await;
        serve(&server, "/client.jar", b"fresh").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("client.jar");
        std::fs::write(&dest, b"stale").unwrap();

        let downloader = Downloader::new().unwrap();
        let ok = downloader
            .download_and_verify(
                &format!("{}/client.jar", server.uri()),
                &dest,
                &sha1_hex(b"fresh"),
            )
            .await;

        assert!(ok);
        assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn http_errors_surface_as_download_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.jar");

        let downloader = Downloader::new().unwrap();
        let err = downloader
            .download_file(&format!("{}/missing.jar", server.uri()), &dest, None)
            .await
            .unwrap_err();

        assert!(matches!(err, BundlerError::DownloadFailed { status: 404, .. }));
        assert!(!downloader
            .download_and_verify(&format!("{}/missing.jar", server.uri()), &dest, "00")
            .await);
    }

    #[tokio::test]
    async fn sha1_file_hashes_in_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("big.bin");
        let data = vec![7u8; HASH_CHUNK_SIZE * 2 + 13];
        std::fs::write(&file, &data).unwrap();

        assert_eq!(sha1_file(&file).await.unwrap(), sha1_hex(&data));
    }
}
