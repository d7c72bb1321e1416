//! Public CORS-bypass proxies used to reach retailer pages.
//!
//! Retailer CDNs and product pages reject cross-origin fetches, so every
//! page load goes through one of a fixed, ordered list of third-party
//! proxies. Each proxy has its own request URL shape and its own response
//! envelope; a [`Strategy`] bundles both. Order is priority: the
//! extractor walks the list and stops at the first proxy that produces a
//! usable page.

use chrono::Utc;

use crate::app::{FitroomError, Result};

/// How a proxy wraps the fetched page in its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// JSON wrapper with the page HTML under a `contents` field.
    JsonContents,
    /// The body is the page itself.
    Raw,
}

impl Envelope {
    /// Unwrap a proxy response body into the fetched page's HTML.
    pub fn decode(&self, body: &str) -> Result<String> {
        match self {
            Envelope::Raw => Ok(body.to_string()),
            Envelope::JsonContents => {
                let value: serde_json::Value = serde_json::from_str(body)
                    .map_err(|e| FitroomError::Envelope(format!("invalid JSON wrapper: {}", e)))?;
                value
                    .get("contents")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        FitroomError::Envelope("wrapper has no string `contents` field".into())
                    })
            }
        }
    }
}

/// One proxy service: a request-URL builder plus its response envelope.
pub struct Strategy {
    pub name: &'static str,
    pub build_url: fn(&str) -> String,
    pub envelope: Envelope,
}

/// Page-fetch strategies in priority order.
pub fn page_strategies() -> Vec<Strategy> {
    vec![
        // High reliability but sometimes throttled
        Strategy {
            name: "allorigins",
            build_url: allorigins_get,
            envelope: Envelope::JsonContents,
        },
        // Direct passthrough fallback
        Strategy {
            name: "corsproxy",
            build_url: corsproxy,
            envelope: Envelope::Raw,
        },
        // Alternative proxy for better coverage
        Strategy {
            name: "codetabs",
            build_url: codetabs,
            envelope: Envelope::Raw,
        },
    ]
}

/// Access URLs for fetching image bytes, in priority order.
///
/// The first two are binary-capable proxies; the direct URL is the last
/// resort since retailer CDNs often allow plain GETs for images.
pub fn binary_access_urls(target: &str) -> Vec<String> {
    vec![
        allorigins_raw(target),
        corsproxy(target),
        target.to_string(),
    ]
}

fn allorigins_get(target: &str) -> String {
    // Cache-busting param: allorigins caches aggressively
    format!(
        "https://api.allorigins.win/get?url={}&_={}",
        urlencoding::encode(target),
        Utc::now().timestamp_millis()
    )
}

fn allorigins_raw(target: &str) -> String {
    format!(
        "https://api.allorigins.win/raw?url={}",
        urlencoding::encode(target)
    )
}

fn corsproxy(target: &str) -> String {
    format!("https://corsproxy.io/?{}", urlencoding::encode(target))
}

fn codetabs(target: &str) -> String {
    format!(
        "https://api.codetabs.com/v1/proxy?quest={}",
        urlencoding::encode(target)
    )
}
