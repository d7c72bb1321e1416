//! # Fitroom
//!
//! A virtual try-on pipeline: extract the product image from a retail
//! page, fetch it, and render the garment onto a person photo via a
//! hosted generation model.
//!
//! ## Architecture
//!
//! ```text
//! page URL → proxy strategies → candidate scan → normalize → image URL
//!                                                               ↓
//! person photo + garment image → encode → try-on client → composite
//! ```
//!
//! Retail pages block cross-origin scraping, so every page and image
//! fetch goes through an ordered list of public CORS proxies, falling
//! back across providers until one yields usable content.
//!
//! ## Quick Start
//!
//! ```bash
//! # Extract the product image URL from a retail page
//! fitroom extract https://www.example.com/product/42
//!
//! # Download the product image
//! fitroom fetch https://cdn.example.com/shirt.jpg -o shirt.jpg
//!
//! # Render the garment onto a photo
//! fitroom tryon --person me.jpg --garment https://www.example.com/product/42
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Selector tables, blacklist, and endpoint configuration
//! - [`fetcher`]: HTTP transport trait and reqwest implementation
//! - [`proxy`]: CORS-proxy strategy list and response envelopes
//! - [`extractor`]: Candidate extraction, normalization, orchestration
//! - [`encode`]: Image fetching and base64/data-URL handling
//! - [`tryon`]: Client for the hosted generation model

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all
/// components: config, transport, extractor.
pub mod app;

/// Command-line interface using clap.
///
/// - `extract <url>` - Extract the product image URL from a retail page
/// - `fetch <url> -o <path>` - Download a product image
/// - `tryon --person <file> --garment <file|url>` - Render the composite
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/fitroom/config.toml`: extraction selector
/// tables, candidate blacklist, and generation endpoint settings.
pub mod config;

/// Image fetching and encoding.
///
/// Pulls image bytes through the binary proxy chain and converts between
/// raw bytes, base64, and `data:` URLs.
pub mod encode;

/// Product-image extraction pipeline.
///
/// - [`ProductExtractor`](extractor::ProductExtractor): strategy loop with short-circuit
/// - [`ExtractionResult`](extractor::ExtractionResult): image URL + title, or an error string
pub mod extractor;

/// HTTP transport.
///
/// - [`Transport`](fetcher::Transport): async trait over text/byte GETs
/// - [`HttpTransport`](fetcher::http::HttpTransport): reqwest-based implementation
pub mod fetcher;

/// CORS-proxy strategies.
///
/// Ordered (URL builder, response envelope) pairs for page fetches, plus
/// the binary access chain for image bytes.
pub mod proxy;

/// Client for the hosted try-on generation model.
///
/// Sends two inline images and a fixed prompt; receives a composite
/// image or a textual refusal.
pub mod tryon;
