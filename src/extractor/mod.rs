//! Product-image extraction pipeline.
//!
//! # Architecture
//!
//! ```text
//! page URL → proxy strategies → candidate scan → normalize → best image
//! ```
//!
//! Strategies run strictly sequentially: success on an early,
//! higher-trust proxy short-circuits the remaining network calls, and the
//! proxies rate-limit concurrent use. A strategy fails on transport
//! errors, undecodable envelopes, or bot-protection interstitials; the
//! loop then advances and keeps the most specific error seen for the
//! exhausted case.

pub mod candidates;
pub mod normalize;
pub mod retailer;

pub use candidates::PageScan;

use std::sync::Arc;

use crate::config::ExtractorConfig;
use crate::fetcher::Transport;
use crate::proxy::{self, Strategy};

/// Fallback error when no strategy produced anything more specific.
pub const NOT_FOUND_MESSAGE: &str = "Product image could not be found automatically.";

/// Error recorded when a retailer serves a bot-protection interstitial.
pub const BOT_BLOCK_MESSAGE: &str =
    "The retailer is blocking the automated fetch. Please use manual upload.";

/// Terminal result of one extraction call.
///
/// Exactly one of `image_url` and `error` is present; `title` is
/// best-effort and only accompanies a success.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExtractionResult {
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub error: Option<String>,
}

impl ExtractionResult {
    fn found(image_url: String, title: Option<String>) -> Self {
        Self {
            image_url: Some(image_url),
            title,
            error: None,
        }
    }

    fn not_found(error: String) -> Self {
        Self {
            image_url: None,
            title: None,
            error: Some(error),
        }
    }

    pub fn is_found(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Extracts the best product image from a retail page by walking the
/// proxy strategy list.
pub struct ProductExtractor {
    transport: Arc<dyn Transport>,
    strategies: Vec<Strategy>,
    config: ExtractorConfig,
}

impl ProductExtractor {
    pub fn new(transport: Arc<dyn Transport>, config: ExtractorConfig) -> Self {
        Self::with_strategies(transport, config, proxy::page_strategies())
    }

    pub fn with_strategies(
        transport: Arc<dyn Transport>,
        config: ExtractorConfig,
        strategies: Vec<Strategy>,
    ) -> Self {
        Self {
            transport,
            strategies,
            config,
        }
    }

    /// Run the extraction pipeline for one product page URL.
    ///
    /// Never fails: expected failure modes resolve into the result's
    /// error string.
    pub async fn extract(&self, url: &str) -> ExtractionResult {
        let mut last_error = NOT_FOUND_MESSAGE.to_string();

        for strategy in &self.strategies {
            let proxy_url = (strategy.build_url)(url);
            tracing::debug!(strategy = strategy.name, "trying extraction strategy");

            let body = match self.transport.get_text(&proxy_url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(strategy = strategy.name, error = %e, "strategy fetch failed");
                    continue;
                }
            };

            let html = match strategy.envelope.decode(&body) {
                Ok(html) => html,
                Err(e) => {
                    tracing::debug!(strategy = strategy.name, error = %e, "envelope decode failed");
                    continue;
                }
            };

            if is_bot_blocked(&html) {
                tracing::warn!(strategy = strategy.name, "bot-protection interstitial detected");
                last_error = BOT_BLOCK_MESSAGE.to_string();
                continue;
            }

            let scan = candidates::scan(&html, &self.config);
            if let Some(best) =
                normalize::select_best(&scan.candidates, url, &self.config.blacklist)
            {
                tracing::info!(strategy = strategy.name, image = %best, "product image extracted");
                return ExtractionResult::found(best, scan.title);
            }

            tracing::debug!(strategy = strategy.name, "page yielded no usable candidate");
        }

        ExtractionResult::not_found(last_error)
    }
}

/// Detect retailer anti-scraping interstitials served instead of content.
fn is_bot_blocked(html: &str) -> bool {
    let lower = html.to_lowercase();
    lower.contains("robot check") || lower.contains("captcha")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::app::{FitroomError, Result};
    use crate::proxy::Envelope;

    /// Transport serving canned pages; unknown URLs act like HTTP 500.
    #[derive(Default)]
    struct MockTransport {
        pages: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockTransport {
        fn with_pages(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get_text(&self, url: &str) -> Result<String> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FitroomError::Other("HTTP status server error (500)".into()))
        }

        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
            self.get_text(url).await.map(String::into_bytes)
        }
    }

    fn proxy_one(target: &str) -> String {
        format!("https://proxy-one.test/{target}")
    }

    fn proxy_two(target: &str) -> String {
        format!("https://proxy-two.test/{target}")
    }

    fn proxy_three(target: &str) -> String {
        format!("https://proxy-three.test/{target}")
    }

    fn test_strategies() -> Vec<Strategy> {
        vec![
            Strategy {
                name: "one",
                build_url: proxy_one,
                envelope: Envelope::Raw,
            },
            Strategy {
                name: "two",
                build_url: proxy_two,
                envelope: Envelope::Raw,
            },
            Strategy {
                name: "three",
                build_url: proxy_three,
                envelope: Envelope::Raw,
            },
        ]
    }

    fn extractor(transport: Arc<MockTransport>) -> ProductExtractor {
        ProductExtractor::with_strategies(
            transport,
            ExtractorConfig::default(),
            test_strategies(),
        )
    }

    const PAGE_URL: &str = "https://example.com/product";

    const OG_PAGE: &str = r#"<html>
        <head>
            <title>Linen Shirt - Example Store</title>
            <meta property="og:image" content="/img/shirt.jpg">
        </head>
        <body></body>
    </html>"#;

    #[tokio::test]
    async fn test_og_image_resolved_with_title() {
        let transport = Arc::new(MockTransport::with_pages(&[(
            "https://proxy-one.test/https://example.com/product",
            OG_PAGE,
        )]));
        let result = extractor(transport).extract(PAGE_URL).await;

        assert_eq!(
            result.image_url.as_deref(),
            Some("https://example.com/img/shirt.jpg")
        );
        assert_eq!(result.title.as_deref(), Some("Linen Shirt - Example Store"));
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_later_strategies() {
        let transport = Arc::new(MockTransport::with_pages(&[
            ("https://proxy-two.test/https://example.com/product", OG_PAGE),
            ("https://proxy-three.test/https://example.com/product", OG_PAGE),
        ]));
        let result = extractor(transport.clone()).extract(PAGE_URL).await;

        assert!(result.is_found());
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls
            .iter()
            .any(|c| c.starts_with("https://proxy-three.test/")));
    }

    #[tokio::test]
    async fn test_all_strategies_fail_with_default_message() {
        let transport = Arc::new(MockTransport::default());
        let result = extractor(transport.clone()).extract(PAGE_URL).await;

        assert_eq!(result.image_url, None);
        assert_eq!(result.title, None);
        assert_eq!(result.error.as_deref(), Some(NOT_FOUND_MESSAGE));
        // Exhaustion means every strategy was attempted
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_bot_block_message_retained() {
        let transport = Arc::new(MockTransport::with_pages(&[(
            "https://proxy-one.test/https://example.com/product",
            "<html><body><h1>Robot Check</h1></body></html>",
        )]));
        let result = extractor(transport.clone()).extract(PAGE_URL).await;

        assert_eq!(result.image_url, None);
        assert_eq!(result.error.as_deref(), Some(BOT_BLOCK_MESSAGE));
        // The loop kept trying the remaining strategies
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_bot_block_then_success_on_next_strategy() {
        let transport = Arc::new(MockTransport::with_pages(&[
            (
                "https://proxy-one.test/https://example.com/product",
                "<html><body>please solve this CAPTCHA</body></html>",
            ),
            ("https://proxy-two.test/https://example.com/product", OG_PAGE),
        ]));
        let result = extractor(transport).extract(PAGE_URL).await;

        assert_eq!(
            result.image_url.as_deref(),
            Some("https://example.com/img/shirt.jpg")
        );
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_candidateless_page_falls_through() {
        let transport = Arc::new(MockTransport::with_pages(&[
            (
                "https://proxy-one.test/https://example.com/product",
                "<html><body><p>nothing here</p></body></html>",
            ),
            ("https://proxy-two.test/https://example.com/product", OG_PAGE),
        ]));
        let result = extractor(transport).extract(PAGE_URL).await;

        assert!(result.is_found());
    }

    #[tokio::test]
    async fn test_json_envelope_strategy() {
        let wrapped = serde_json::json!({ "contents": OG_PAGE }).to_string();
        let transport = Arc::new(MockTransport::with_pages(&[(
            "https://proxy-one.test/https://example.com/product",
            wrapped.as_str(),
        )]));
        let strategies = vec![Strategy {
            name: "one",
            build_url: proxy_one,
            envelope: Envelope::JsonContents,
        }];
        let extractor = ProductExtractor::with_strategies(
            transport,
            ExtractorConfig::default(),
            strategies,
        );
        let result = extractor.extract(PAGE_URL).await;

        assert_eq!(
            result.image_url.as_deref(),
            Some("https://example.com/img/shirt.jpg")
        );
    }

    #[test]
    fn test_bot_detection_is_case_insensitive() {
        assert!(is_bot_blocked("<html>ROBOT CHECK</html>"));
        assert!(is_bot_blocked("<html>Captcha required</html>"));
        assert!(!is_bot_blocked("<html>a perfectly normal page</html>"));
    }
}
