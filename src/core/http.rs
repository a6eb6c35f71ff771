use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

const APP_USER_AGENT: &str = concat!("mc-bundler/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for manifest and artifact requests.
///
/// `Accept-Encoding: identity` keeps response bodies byte-identical to what
/// the manifest hashes describe.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}
