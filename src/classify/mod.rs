//! HTML Classifier
//!
//! A pure function over response headers and a parsed DOM that assigns a
//! [`ContentType`]. No network access, no async: the same `(headers, dom)`
//! pair always yields the same classification (property 8).

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use scraper::{Html, Selector};

/// Output of [`classify`]; the Processor Registry dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Article,
    Page,
    Video,
    Image,
    Job,
    Html,
}

/// Classify a fetched document. Rules are tried in order; the first match
/// wins.
#[must_use]
pub fn classify(url: &str, headers: &HeaderMap, dom: &Html) -> ContentType {
    if let Some(by_header) = classify_by_content_type(headers) {
        return by_header;
    }

    if is_auth_path(url) {
        return ContentType::Page;
    }

    if has_article_signals(dom) {
        return ContentType::Article;
    }

    if has_video_signals(dom) {
        return ContentType::Video;
    }

    if has_job_signals(dom) {
        return ContentType::Job;
    }

    if has_image_gallery_signals(dom) {
        return ContentType::Image;
    }

    ContentType::Page
}

fn classify_by_content_type(headers: &HeaderMap) -> Option<ContentType> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = content_type.split(';').next().unwrap_or(content_type).trim();

    if essence.starts_with("image/") {
        return Some(ContentType::Image);
    }
    if essence.starts_with("video/") {
        return Some(ContentType::Video);
    }
    if essence == "application/pdf" {
        return Some(ContentType::Page);
    }
    if !essence.starts_with("text/html") {
        return Some(ContentType::Page);
    }
    None
}

fn is_auth_path(url: &str) -> bool {
    ["/login", "/signin", "/register"]
        .iter()
        .any(|needle| url.contains(needle))
}

fn select_first(dom: &Html, selector: &str) -> bool {
    Selector::parse(selector)
        .map(|sel| dom.select(&sel).next().is_some())
        .unwrap_or(false)
}

fn has_article_signals(dom: &Html) -> bool {
    let has_article_container = select_first(dom, "article") || select_first(dom, ".article");
    if !has_article_container {
        return false;
    }

    let has_date = select_first(dom, "time")
        || select_first(dom, "[datetime]")
        || select_first(dom, ".published-date")
        || select_first(dom, ".date");
    let has_author = select_first(dom, ".author") || select_first(dom, ".byline");
    let has_og_article = Selector::parse(r#"meta[property="og:type"]"#)
        .ok()
        .and_then(|sel| dom.select(&sel).next().map(|el| el.value().attr("content") == Some("article")))
        .unwrap_or(false);

    has_date || has_author || has_og_article
}

fn has_video_signals(dom: &Html) -> bool {
    select_first(dom, "video")
        || select_first(dom, ".video-player")
        || select_first(dom, ".video-container")
        || select_first(dom, "iframe[src*='youtube']")
        || select_first(dom, "iframe[src*='vimeo']")
}

fn has_job_signals(dom: &Html) -> bool {
    select_first(dom, ".job-listing")
        || select_first(dom, ".job-posting")
        || select_first(dom, ".job-description")
        || select_first(dom, ".job-title")
}

fn has_image_gallery_signals(dom: &Html) -> bool {
    select_first(dom, ".gallery") || select_first(dom, ".image-gallery")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, content_type.parse().unwrap());
        headers
    }

    #[test]
    fn image_content_type_wins_outright() {
        let dom = Html::parse_document("<html><article>x</article></html>");
        assert_eq!(
            classify("https://x.test/a", &headers_with("image/png"), &dom),
            ContentType::Image
        );
    }

    #[test]
    fn article_requires_container_and_a_signal() {
        let dom = Html::parse_document(
            "<html><body><article><h1>t</h1><time datetime=\"2024-01-01\"></time></article></body></html>",
        );
        assert_eq!(
            classify("https://x.test/a", &headers_with("text/html"), &dom),
            ContentType::Article
        );
    }

    #[test]
    fn article_container_without_signal_falls_through() {
        let dom = Html::parse_document("<html><body><article><p>no signals</p></article></body></html>");
        assert_eq!(
            classify("https://x.test/a", &headers_with("text/html"), &dom),
            ContentType::Page
        );
    }

    #[test]
    fn login_paths_are_pages() {
        let dom = Html::parse_document("<html><article><time datetime=\"x\"></time></article></html>");
        assert_eq!(
            classify("https://x.test/login", &headers_with("text/html"), &dom),
            ContentType::Page
        );
    }

    #[test]
    fn classify_is_deterministic() {
        let dom = Html::parse_document("<html><body><video></video></body></html>");
        let headers = headers_with("text/html");
        assert_eq!(classify("https://x.test/v", &headers, &dom), classify("https://x.test/v", &headers, &dom));
    }

    #[test]
    fn default_is_page() {
        let dom = Html::parse_document("<html><body><p>hello</p></body></html>");
        assert_eq!(
            classify("https://x.test/", &headers_with("text/html"), &dom),
            ContentType::Page
        );
    }
}
