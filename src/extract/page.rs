//! Generic page extraction — the simpler counterpart to `extract_article`
//! used for classified content that isn't an article.

use chrono::Utc;
use scraper::Html;

use crate::classify::ContentType;
use crate::model::{ContentTypeLabel, Page};

use super::dom::title_tag;

/// Build a [`Page`] record for `url`. Unlike article extraction there is no
/// drop rule: every classified non-article document yields exactly one
/// page.
#[must_use]
pub fn extract_page(dom: &Html, url: &str, content_type: ContentType) -> Page {
    let title = title_tag(dom).unwrap_or_default();
    let body: String = dom.root_element().text().collect::<String>();

    Page {
        url: url.to_string(),
        title,
        body: body.trim().to_string(),
        content_type: ContentTypeLabel::from(content_type),
        discovered_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_body_text() {
        let dom = Html::parse_document("<html><head><title>T</title></head><body><p>hi</p></body></html>");
        let page = extract_page(&dom, "https://x.test/", ContentType::Page);
        assert_eq!(page.title, "T");
        assert!(page.body.contains("hi"));
        assert_eq!(page.content_type, ContentTypeLabel::Page);
    }
}
