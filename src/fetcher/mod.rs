pub mod http;

use async_trait::async_trait;

use crate::app::Result;

/// Transport over which page HTML and image bytes are fetched.
///
/// Extraction strategies only see URLs; the transport owns the HTTP
/// client. Tests substitute a canned implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a URL and return the response body as text.
    ///
    /// A non-success HTTP status is an error.
    async fn get_text(&self, url: &str) -> Result<String>;

    /// GET a URL and return the raw response bytes.
    ///
    /// A non-success HTTP status is an error.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
