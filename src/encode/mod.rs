//! Image fetching and base64 encoding.
//!
//! The chosen candidate URL lives on a retailer CDN that usually rejects
//! cross-origin requests, so bytes are pulled through the same proxy
//! chain before being base64-encoded for the generation call.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;

use crate::app::{FitroomError, Result};
use crate::fetcher::Transport;
use crate::proxy;

/// Error when every access method for an image URL is exhausted.
pub const FETCH_FAILED_MESSAGE: &str =
    "Unable to fetch the product image data. Please upload it manually.";

/// A base64 payload plus its MIME type, ready for the generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub mime_type: String,
    pub data: String,
}

/// Fetch an image's raw bytes, trying each access method in order.
pub async fn fetch_image_bytes(transport: &dyn Transport, url: &str) -> Result<Vec<u8>> {
    for access_url in proxy::binary_access_urls(url) {
        match transport.get_bytes(&access_url).await {
            Ok(bytes) if !bytes.is_empty() => return Ok(bytes),
            Ok(_) => tracing::debug!(url = %access_url, "empty image payload"),
            Err(e) => tracing::debug!(url = %access_url, error = %e, "image fetch failed"),
        }
    }

    Err(FitroomError::ImageFetch(FETCH_FAILED_MESSAGE.to_string()))
}

/// Fetch an image and return its bytes base64-encoded.
pub async fn image_to_base64(transport: &dyn Transport, url: &str) -> Result<String> {
    let bytes = fetch_image_bytes(transport, url).await?;
    Ok(BASE64.encode(&bytes))
}

static DATA_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:([^;]+);base64,(.+)$").expect("valid regex"));

/// Split a `data:` URL into MIME type and base64 payload.
///
/// A bare base64 string is accepted as-is with an `image/png` MIME type.
pub fn parse_data_url(input: &str) -> ImagePart {
    match DATA_URL_RE.captures(input) {
        Some(caps) => ImagePart {
            mime_type: caps[1].to_string(),
            data: caps[2].to_string(),
        },
        None => ImagePart {
            mime_type: "image/png".to_string(),
            data: input.to_string(),
        },
    }
}

/// Assemble a `data:` URL from a MIME type and base64 payload.
pub fn to_data_url(mime_type: &str, data: &str) -> String {
    format!("data:{};base64,{}", mime_type, data)
}
