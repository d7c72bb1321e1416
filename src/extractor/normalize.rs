use url::Url;

/// Resolve a raw candidate against the page it was found on.
///
/// Protocol-relative URLs get `https:`; root-relative paths resolve
/// against the page's scheme and host; everything else passes through
/// unchanged (already absolute, or unusable and caught by validation).
pub fn resolve(candidate: &str, page_url: &str) -> String {
    if let Some(rest) = candidate.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    if candidate.starts_with('/') {
        return match Url::parse(page_url).and_then(|base| base.join(candidate)) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => candidate.to_string(),
        };
    }
    candidate.to_string()
}

/// A candidate survives when it parses as an http(s) URL and its path
/// avoids every blacklisted substring.
fn is_valid(candidate: &str, blacklist: &[String]) -> bool {
    let Ok(url) = Url::parse(candidate) else {
        return false;
    };
    if !url.scheme().starts_with("http") {
        return false;
    }
    let path = url.path().to_lowercase();
    !blacklist.iter().any(|entry| path.contains(entry.as_str()))
}

/// Pick the best product image from raw candidates.
///
/// Candidates are resolved, invalid and blacklisted ones dropped, and the
/// first survivor that doesn't look like a tracking pixel or an animated
/// placeholder wins; failing that, the first survivor.
pub fn select_best(candidates: &[String], page_url: &str, blacklist: &[String]) -> Option<String> {
    let valid: Vec<String> = candidates
        .iter()
        .map(|c| resolve(c, page_url))
        .filter(|c| is_valid(c, blacklist))
        .collect();

    valid
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            !lower.contains("pixel") && !lower.contains(".gif")
        })
        .or_else(|| valid.first())
        .cloned()
}
