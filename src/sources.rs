//! Sources provider
//!
//! Loads named [`SourceConfig`] values for the Crawler Runtime to resolve
//! at `Start`. Out of core scope per the purpose & scope section: this is
//! ambient glue, not crawl-engine logic.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::config::{ArticleSelectors, SourceConfig};
use crate::error::{CrawlCoreError, CrawlResult};

pub trait Sources: Send + Sync {
    fn get(&self, name: &str) -> Option<SourceConfig>;
}

/// An in-memory `Sources` provider, used by tests and by callers that build
/// `SourceConfig` values programmatically.
#[derive(Default)]
pub struct InMemorySources {
    sources: HashMap<String, SourceConfig>,
}

impl InMemorySources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, source: SourceConfig) -> Self {
        self.sources.insert(source.name().to_string(), source);
        self
    }
}

impl Sources for InMemorySources {
    fn get(&self, name: &str) -> Option<SourceConfig> {
        self.sources.get(name).cloned()
    }
}

/// On-disk shape of one entry in a YAML sources file.
#[derive(Debug, Deserialize)]
struct SourceFileEntry {
    name: String,
    url: String,
    #[serde(default)]
    allowed_domains: Vec<String>,
    #[serde(default = "default_max_depth")]
    max_depth: u32,
    #[serde(default)]
    rate_limit_ms: u64,
    #[serde(default)]
    random_delay_ms: u64,
    #[serde(default = "default_parallelism")]
    parallelism: usize,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    article_index: String,
    #[serde(default)]
    page_index: String,
    #[serde(default)]
    selectors: ArticleSelectorsFile,
}

fn default_max_depth() -> u32 {
    2
}

fn default_parallelism() -> usize {
    1
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSelectorsFile {
    container: Option<String>,
    title: Option<String>,
    body: Option<String>,
    intro: Option<String>,
    byline: Option<String>,
    author: Option<String>,
    published_time: Option<String>,
    time_ago: Option<String>,
    json_ld: Option<String>,
    section: Option<String>,
    keywords: Option<String>,
    description: Option<String>,
    og_title: Option<String>,
    og_description: Option<String>,
    og_image: Option<String>,
    og_url: Option<String>,
    canonical: Option<String>,
    word_count: Option<String>,
    #[serde(default)]
    exclude: Vec<String>,
    tags: Option<String>,
}

impl From<ArticleSelectorsFile> for ArticleSelectors {
    fn from(f: ArticleSelectorsFile) -> Self {
        ArticleSelectors {
            container: f.container,
            title: f.title,
            body: f.body,
            intro: f.intro,
            byline: f.byline,
            author: f.author,
            published_time: f.published_time,
            time_ago: f.time_ago,
            json_ld: f.json_ld,
            section: f.section,
            keywords: f.keywords,
            description: f.description,
            og_title: f.og_title,
            og_description: f.og_description,
            og_image: f.og_image,
            og_url: f.og_url,
            canonical: f.canonical,
            word_count: f.word_count,
            exclude: f.exclude,
            tags: f.tags,
        }
    }
}

impl TryFrom<SourceFileEntry> for SourceConfig {
    type Error = CrawlCoreError;

    fn try_from(entry: SourceFileEntry) -> CrawlResult<Self> {
        let mut builder = SourceConfig::builder()
            .name(entry.name)
            .url(entry.url)
            .allowed_domains(entry.allowed_domains)
            .max_depth(entry.max_depth)
            .rate_limit(Duration::from_millis(entry.rate_limit_ms))
            .random_delay(Duration::from_millis(entry.random_delay_ms))
            .parallelism(entry.parallelism)
            .article_index(entry.article_index)
            .page_index(entry.page_index)
            .selectors(entry.selectors.into());

        if let Some(ua) = entry.user_agent {
            builder = builder.user_agent(ua);
        }

        builder.build()
    }
}

/// A `Sources` provider backed by a YAML file of named source entries.
pub struct YamlSources {
    sources: HashMap<String, SourceConfig>,
}

impl YamlSources {
    pub fn load(path: impl AsRef<Path>) -> CrawlResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!("failed to read sources file: {e}")))?;
        Self::parse(&text)
    }

    pub fn parse(yaml: &str) -> CrawlResult<Self> {
        let entries: Vec<SourceFileEntry> = serde_yaml::from_str(yaml)
            .map_err(|e| CrawlCoreError::InvalidConfig(format!("invalid sources file: {e}")))?;

        let mut sources = HashMap::new();
        for entry in entries {
            let config = SourceConfig::try_from(entry)?;
            sources.insert(config.name().to_string(), config);
        }
        Ok(Self { sources })
    }
}

impl Sources for YamlSources {
    fn get(&self, name: &str) -> Option<SourceConfig> {
        self.sources.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_source_is_none() {
        let sources = InMemorySources::new();
        assert!(sources.get("missing").is_none());
    }

    #[test]
    fn parses_a_minimal_yaml_source() {
        let yaml = r#"
- name: demo
  url: https://example.com
  article_index: demo-articles
  page_index: demo-pages
"#;
        let sources = YamlSources::parse(yaml).unwrap();
        let demo = sources.get("demo").unwrap();
        assert_eq!(demo.url(), "https://example.com");
        assert_eq!(demo.max_depth(), 2);
    }

    #[test]
    fn rejects_a_blank_name() {
        let yaml = r#"
- name: ""
  url: https://example.com
"#;
        assert!(YamlSources::parse(yaml).is_err());
    }
}
