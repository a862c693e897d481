//! JSON-LD metadata reader
//!
//! Extracts the first `Article`/`NewsArticle` object embedded in a page's
//! `<script type="application/ld+json">` blocks, including objects nested
//! under a top-level `@graph` array. Pure, no I/O.

use scraper::{Html, Selector};
use serde_json::Value;

/// A located JSON-LD article object, if any.
pub struct JsonLd {
    value: Option<Value>,
}

impl JsonLd {
    pub fn extract(dom: &Html) -> Self {
        let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
            return Self { value: None };
        };

        for el in dom.select(&selector) {
            let text: String = el.text().collect();
            let Ok(parsed) = serde_json::from_str::<Value>(text.trim()) else {
                continue;
            };
            if let Some(article) = find_article(&parsed) {
                return Self {
                    value: Some(article),
                };
            }
        }

        Self { value: None }
    }

    fn str_field(&self, key: &str) -> Option<String> {
        self.value
            .as_ref()?
            .get(key)?
            .as_str()
            .map(str::to_string)
            .filter(|s| !s.is_empty())
    }

    pub fn headline(&self) -> Option<String> {
        self.str_field("headline")
    }

    pub fn name(&self) -> Option<String> {
        self.str_field("name")
    }

    pub fn description(&self) -> Option<String> {
        self.str_field("description")
    }

    pub fn article_body(&self) -> Option<String> {
        self.str_field("articleBody")
    }

    pub fn author(&self) -> Option<String> {
        let author = self.value.as_ref()?.get("author")?;
        match author {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(_) => author
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            Value::Array(items) => items.iter().find_map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .or_else(|| item.get("name").and_then(Value::as_str).map(str::to_string))
            }),
            _ => None,
        }
    }

    pub fn keywords(&self) -> Option<String> {
        let value = self.value.as_ref()?.get("keywords")?;
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let joined: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                (!joined.is_empty()).then(|| joined.join("|"))
            }
            _ => None,
        }
    }

    pub fn article_section(&self) -> Option<String> {
        self.str_field("articleSection")
    }

    pub fn date_published(&self) -> Option<String> {
        self.str_field("datePublished")
    }

    pub fn date_modified(&self) -> Option<String> {
        self.str_field("dateModified")
    }

    pub fn date_created(&self) -> Option<String> {
        self.str_field("dateCreated")
    }

    pub fn word_count(&self) -> Option<usize> {
        let value = self.value.as_ref()?.get("wordCount")?;
        value
            .as_u64()
            .map(|n| n as usize)
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
    }

    pub fn url(&self) -> Option<String> {
        self.str_field("url")
    }

    pub fn main_entity_of_page_id(&self) -> Option<String> {
        let meop = self.value.as_ref()?.get("mainEntityOfPage")?;
        match meop {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(_) => meop.get("@id").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }
}

fn find_article(value: &Value) -> Option<Value> {
    if is_article_type(value) {
        return Some(value.clone());
    }

    if let Some(graph) = value.get("@graph").and_then(Value::as_array) {
        for entry in graph {
            if is_article_type(entry) {
                return Some(entry.clone());
            }
        }
    }

    if let Value::Array(items) = value {
        for item in items {
            if is_article_type(item) {
                return Some(item.clone());
            }
        }
    }

    None
}

fn is_article_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "Article" || t == "NewsArticle",
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| t.as_str() == Some("Article") || t.as_str() == Some("NewsArticle")),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_top_level_article() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type":"NewsArticle","headline":"Hello","wordCount":42}
        </script></head></html>"#;
        let dom = Html::parse_document(html);
        let jsonld = JsonLd::extract(&dom);
        assert_eq!(jsonld.headline().as_deref(), Some("Hello"));
        assert_eq!(jsonld.word_count(), Some(42));
    }

    #[test]
    fn finds_article_nested_under_graph() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@graph":[{"@type":"WebSite"},{"@type":"Article","headline":"Nested"}]}
        </script></head></html>"#;
        let dom = Html::parse_document(html);
        let jsonld = JsonLd::extract(&dom);
        assert_eq!(jsonld.headline().as_deref(), Some("Nested"));
    }

    #[test]
    fn missing_script_yields_empty_reader() {
        let dom = Html::parse_document("<html></html>");
        let jsonld = JsonLd::extract(&dom);
        assert_eq!(jsonld.headline(), None);
    }
}
