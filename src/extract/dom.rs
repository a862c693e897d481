//! Small DOM-query helpers shared by the article and page extractors.

use scraper::{ElementRef, Html, Selector};

pub fn text_of(dom: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let text: String = dom.select(&sel).next()?.text().collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn attr_of(dom: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let value = dom.select(&sel).next()?.value().attr(attr)?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Content of `<meta name="{key}">` or `<meta property="{key}">`, whichever
/// is present.
pub fn meta_content(dom: &Html, key: &str) -> Option<String> {
    attr_of(dom, &format!(r#"meta[name="{key}"]"#), "content")
        .or_else(|| attr_of(dom, &format!(r#"meta[property="{key}"]"#), "content"))
}

pub fn title_tag(dom: &Html) -> Option<String> {
    text_of(dom, "title")
}

/// Text of the element matching `container`, with `excludes` and the
/// always-excluded boilerplate tags stripped first.
pub fn body_text_excluding(dom: &Html, container: &str, excludes: &[String]) -> Option<String> {
    let container_sel = Selector::parse(container).ok()?;
    let root = dom.select(&container_sel).next()?;

    let mut exclude_selectors: Vec<Selector> = vec![
        Selector::parse("script").unwrap(),
        Selector::parse("style").unwrap(),
        Selector::parse("noscript").unwrap(),
        Selector::parse("iframe").unwrap(),
        Selector::parse("form").unwrap(),
    ];
    for pattern in excludes {
        if let Ok(sel) = Selector::parse(pattern) {
            exclude_selectors.push(sel);
        }
    }

    let excluded_ids: std::collections::HashSet<_> = exclude_selectors
        .iter()
        .flat_map(|sel| root.select(sel))
        .map(|el| el.id())
        .collect();

    let text = collect_text_excluding(root, &excluded_ids);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn collect_text_excluding(root: ElementRef, excluded: &std::collections::HashSet<ego_tree::NodeId>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        if let Some(text) = node.value().as_text() {
            let ancestor_excluded = node
                .ancestors()
                .any(|a| excluded.contains(&a.id()));
            if !ancestor_excluded {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_text_drops_scripts() {
        let html = "<html><body><article>Hello <script>evil()</script>World</article></body></html>";
        let dom = Html::parse_document(html);
        let body = body_text_excluding(&dom, "article", &[]).unwrap();
        assert!(body.contains("Hello"));
        assert!(body.contains("World"));
        assert!(!body.contains("evil"));
    }

    #[test]
    fn body_text_drops_explicit_excludes() {
        let html = "<html><body><article>Keep <aside class=\"ad\">Drop</aside></article></body></html>";
        let dom = Html::parse_document(html);
        let body = body_text_excluding(&dom, "article", &[".ad".to_string()]).unwrap();
        assert!(body.contains("Keep"));
        assert!(!body.contains("Drop"));
    }

    #[test]
    fn meta_content_checks_name_then_property() {
        let html = r#"<html><head><meta property="og:title" content="OG Title"></head></html>"#;
        let dom = Html::parse_document(html);
        assert_eq!(meta_content(&dom, "og:title").as_deref(), Some("OG Title"));
    }
}
