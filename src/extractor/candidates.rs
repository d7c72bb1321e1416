use scraper::{Html, Selector};

use crate::config::ExtractorConfig;
use crate::extractor::retailer;

/// Everything one pass over a fetched page yields: candidate image URLs
/// in priority order, plus the page title.
#[derive(Debug, Default)]
pub struct PageScan {
    pub candidates: Vec<String>,
    pub title: Option<String>,
}

/// Collect candidate product-image URLs from raw HTML.
///
/// Candidates are appended in provenance order: retailer-specific probe,
/// then meta tags, then generic product selectors, then a heuristic scan
/// of every `<img>` on the page. Earlier candidates are preferred by the
/// normalizer unless filtered out. URLs may still be relative or
/// protocol-relative at this stage.
pub fn scan(html: &str, config: &ExtractorConfig) -> PageScan {
    let doc = Html::parse_document(html);
    let mut candidates = Vec::new();

    // 1. Specialized retailer logic
    if let Some(url) = retailer::probe(&doc, &config.retailer_selectors) {
        candidates.push(url);
    }

    // 2. Open Graph / Twitter-card / generic image meta tags
    for name in &config.meta_names {
        let selector = format!(
            r#"meta[property="{name}"], meta[name="{name}"], meta[property="og:image:secure_url"]"#
        );
        let Ok(sel) = Selector::parse(&selector) else {
            continue;
        };
        if let Some(content) = doc
            .select(&sel)
            .next()
            .and_then(|meta| meta.value().attr("content"))
        {
            if !content.is_empty() {
                candidates.push(content.to_string());
            }
        }
    }

    // 3. Generic product selectors
    for selector in &config.product_selectors {
        let Ok(sel) = Selector::parse(selector) else {
            tracing::warn!(%selector, "skipping unparseable product selector");
            continue;
        };
        if let Some(src) = doc.select(&sel).next().and_then(|el| el.value().attr("src")) {
            if !src.is_empty() {
                candidates.push(src.to_string());
            }
        }
    }

    // 4. Heuristic: every image that is declared large, or declares no
    //    dimensions at all (unknown but possibly large)
    if let Ok(img_sel) = Selector::parse("img") {
        for img in doc.select(&img_sel) {
            let width = dimension(img.value().attr("width"));
            let height = dimension(img.value().attr("height"));
            let min = config.min_dimension;

            let eligible = (width > min && height > min) || (width == 0 && height == 0);
            if !eligible {
                continue;
            }

            let src = img
                .value()
                .attr("src")
                .or_else(|| img.value().attr("data-src"))
                .or_else(|| img.value().attr("data-lazy-src"));

            if let Some(src) = src {
                if !src.is_empty() {
                    candidates.push(src.to_string());
                }
            }
        }
    }

    PageScan {
        candidates,
        title: page_title(&doc),
    }
}

/// Declared dimension of an image, 0 when absent or unparseable.
fn dimension(attr: Option<&str>) -> u32 {
    let digits: String = attr
        .unwrap_or("")
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn page_title(doc: &Html) -> Option<String> {
    let sel = Selector::parse("title").ok()?;
    let title = doc.select(&sel).next()?.text().collect::<String>();
    let title = html_escape::decode_html_entities(title.trim()).to_string();
    (!title.is_empty()).then_some(title)
}
