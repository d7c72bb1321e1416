use scraper::{ElementRef, Html, Selector};

/// Probe retailer-specific selectors for the primary product image.
///
/// Amazon-style product pages carry the high-resolution image in a
/// `data-a-dynamic-image` JSON attribute whose keys are image URLs, or in
/// explicit hi-res attributes. The first selector that yields a value
/// wins; a matched element that yields nothing falls through to the next
/// selector.
pub fn probe(doc: &Html, selectors: &[String]) -> Option<String> {
    for selector in selectors {
        let Ok(sel) = Selector::parse(selector) else {
            tracing::warn!(%selector, "skipping unparseable retailer selector");
            continue;
        };
        let Some(img) = doc.select(&sel).next() else {
            continue;
        };

        // 1. Responsive-image JSON: keys are URLs, longest key is the
        //    highest-resolution variant.
        if let Some(url) = dynamic_image_url(&img) {
            return Some(url);
        }

        // 2. Explicit high-res attributes
        if let Some(hi_res) = img
            .value()
            .attr("data-old-hires")
            .or_else(|| img.value().attr("data-zoom-image"))
        {
            if !hi_res.is_empty() {
                return Some(hi_res.to_string());
            }
        }

        // 3. Plain src, unless it's inline image data
        if let Some(src) = img.value().attr("src") {
            if !src.is_empty() && !src.contains("base64") {
                return Some(src.to_string());
            }
        }
    }

    None
}

fn dynamic_image_url(img: &ElementRef) -> Option<String> {
    let attr = img.value().attr("data-a-dynamic-image")?;
    let data: serde_json::Value = serde_json::from_str(attr).ok()?;
    data.as_object()?
        .keys()
        .max_by_key(|url| url.len())
        .map(String::from)
}
