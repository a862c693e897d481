//! Article extraction
//!
//! `extract_article` is a pure function: given a parsed document and a
//! source's [`ArticleSelectors`], it produces an [`Article`] with a fresh
//! ID, cleaned fields, a parsed date, and deduplicated tags, or `None` if
//! both `Title` and `Body` end up empty (the drop-empty rule).

use chrono::Utc;
use scraper::Html;
use uuid::Uuid;

use crate::config::ArticleSelectors;
use crate::model::Article;

use super::dates::first_parseable;
use super::dom::{attr_of, body_text_excluding, meta_content, text_of, title_tag};
use super::jsonld::JsonLd;

const DEFAULT_BODY_SELECTOR: &str = "article, .article";

/// Extract a structured article from `dom` using `selectors`, attributing
/// `source_url` as its `Source`. Returns `None` under the drop-empty rule.
#[must_use]
pub fn extract_article(dom: &Html, selectors: &ArticleSelectors, source_url: &str) -> Option<Article> {
    let jsonld = JsonLd::extract(dom);

    let og_title = meta_content(dom, "og:title").unwrap_or_default();
    let og_description = meta_content(dom, "og:description").unwrap_or_default();
    let og_image = meta_content(dom, "og:image").unwrap_or_default();
    let og_url = meta_content(dom, "og:url").unwrap_or_default();

    let title = non_empty(&og_title)
        .or_else(|| selectors.title.as_deref().and_then(|s| text_of(dom, s)))
        .or_else(|| jsonld.headline())
        .or_else(|| jsonld.name())
        .or_else(|| title_tag(dom))
        .unwrap_or_default();

    let description = non_empty(&og_description)
        .or_else(|| selectors.description.as_deref().and_then(|s| meta_content(dom, s)))
        .or_else(|| jsonld.description())
        .unwrap_or_default();

    let intro = selectors
        .intro
        .as_deref()
        .and_then(|s| text_of(dom, s))
        .or_else(|| non_empty(&description))
        .or_else(|| jsonld.description())
        .unwrap_or_default();

    let body_selector = selectors.body.as_deref().unwrap_or(DEFAULT_BODY_SELECTOR);
    let extracted_body = body_text_excluding(dom, body_selector, &selectors.exclude)
        .or_else(|| jsonld.article_body());
    let body = match (intro.is_empty(), extracted_body) {
        (true, Some(b)) => b,
        (false, Some(b)) => format!("{intro}\n\n{b}"),
        (true, None) => String::new(),
        (false, None) => intro.clone(),
    };

    if title.trim().is_empty() && body.trim().is_empty() {
        return None;
    }

    let byline_raw = selectors
        .byline
        .as_deref()
        .and_then(|s| text_of(dom, s))
        .or_else(|| selectors.author.as_deref().and_then(|s| text_of(dom, s)))
        .or_else(|| jsonld.author())
        .unwrap_or_default();
    let author = clean_author(&byline_raw);

    let tags = extract_tags(dom, selectors, &jsonld, source_url);

    let published_date = first_parseable(&[
        jsonld.date_published(),
        jsonld.date_modified(),
        jsonld.date_created(),
        selectors.published_time.as_deref().and_then(|s| meta_content(dom, s)),
        selectors
            .time_ago
            .as_deref()
            .and_then(|s| attr_of(dom, s, "datetime")),
        selectors.time_ago.as_deref().and_then(|s| text_of(dom, s)),
    ]);

    let word_count = selectors
        .word_count
        .as_deref()
        .and_then(|s| text_of(dom, s))
        .and_then(|s| s.trim().parse::<usize>().ok())
        .or_else(|| jsonld.word_count())
        .unwrap_or_else(|| body.split_whitespace().count());

    let canonical_url = attr_of(dom, r#"link[rel="canonical"]"#, "href")
        .or_else(|| jsonld.url())
        .or_else(|| jsonld.main_entity_of_page_id())
        .unwrap_or_default();

    let section = selectors
        .section
        .as_deref()
        .and_then(|s| meta_content(dom, s))
        .or_else(|| jsonld.article_section())
        .unwrap_or_default();

    let keywords = selectors
        .keywords
        .as_deref()
        .and_then(|s| meta_content(dom, s))
        .or_else(|| jsonld.keywords())
        .unwrap_or_default();

    let now = Utc::now();

    Some(Article {
        id: Uuid::new_v4(),
        title: title.trim().to_string(),
        body: body.trim().to_string(),
        author,
        byline_name: byline_raw.trim().to_string(),
        published_date,
        source: source_url.to_string(),
        tags,
        intro: intro.trim().to_string(),
        description: description.trim().to_string(),
        og_title,
        og_description,
        og_image,
        og_url,
        canonical_url,
        word_count,
        category: String::new(),
        section,
        keywords,
        created_at: now,
        updated_at: now,
    })
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Trim, then truncate at the first run of four or more spaces — authors
/// sometimes carry trailing boilerplate separated this way.
fn clean_author(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.find("    ") {
        Some(idx) => trimmed[..idx].trim().to_string(),
        None => trimmed.to_string(),
    }
}

fn extract_tags(dom: &Html, selectors: &ArticleSelectors, jsonld: &JsonLd, source_url: &str) -> Vec<String> {
    let mut tags = Vec::new();

    if let Some(keywords) = jsonld.keywords() {
        tags.extend(keywords.split('|').map(|t| t.trim().to_string()));
    }
    if let Some(section) = jsonld.article_section() {
        tags.push(section.trim().to_string());
    }
    if let Some(section_selector) = &selectors.section
        && let Some(content) = meta_content(dom, section_selector)
    {
        tags.push(content.trim().to_string());
    }
    if let Some(keywords_selector) = &selectors.keywords
        && let Some(content) = meta_content(dom, keywords_selector)
    {
        tags.extend(content.split('|').map(|t| t.trim().to_string()));
    }
    if source_url.contains("/opp-beat/") {
        tags.push("OPP Beat".to_string());
    }

    dedupe_preserving_order(tags)
}

fn dedupe_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> ArticleSelectors {
        ArticleSelectors::default()
    }

    #[test]
    fn happy_path_extracts_title_and_date() {
        let html = r#"<html><body><article><h1>Hello</h1><time datetime="2025-02-11T17:37:42Z">Feb 11</time><p>Body text here.</p></article></body></html>"#;
        let dom = Html::parse_document(html);
        let mut sel = selectors();
        sel.title = Some("h1".to_string());
        sel.time_ago = Some("time".to_string());
        let article = extract_article(&dom, &sel, "https://example.com/a").unwrap();
        assert_eq!(article.title, "Hello");
        assert_eq!(article.published_date.to_rfc3339(), "2025-02-11T17:37:42+00:00");
    }

    #[test]
    fn empty_title_and_body_drops_the_article() {
        let dom = Html::parse_document("<html><body><p>just a page</p></body></html>");
        assert!(extract_article(&dom, &selectors(), "https://example.com/x").is_none());
    }

    #[test]
    fn tags_are_deduplicated_preserving_first_occurrence() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type":"Article","headline":"T","keywords":"rust|rust|crawler"}
        </script></head><body><article><p>body</p></article></body></html>"#;
        let dom = Html::parse_document(html);
        let article = extract_article(&dom, &selectors(), "https://example.com/a").unwrap();
        assert_eq!(article.tags, vec!["rust".to_string(), "crawler".to_string()]);
    }

    #[test]
    fn opp_beat_urls_get_the_literal_tag() {
        let html = "<html><body><article><p>body text</p></article></body></html>";
        let dom = Html::parse_document(html);
        let article = extract_article(&dom, &selectors(), "https://example.com/opp-beat/news").unwrap();
        assert!(article.tags.contains(&"OPP Beat".to_string()));
    }

    #[test]
    fn author_is_truncated_at_a_run_of_spaces() {
        assert_eq!(clean_author("Jane Doe    Staff Writer"), "Jane Doe");
        assert_eq!(clean_author("  Jane Doe  "), "Jane Doe");
    }
}
