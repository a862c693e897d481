//! Core record types produced by extraction and carried through the rest of
//! the pipeline: [`Article`], [`Page`], and the [`Content`] event payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::ContentType;

/// A structured article record.
///
/// Invariant: either `title` or `body` is non-empty — an extraction that
/// produces neither is dropped before an `Article` is ever constructed.
/// `tags` never contains a duplicate string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: String,
    pub byline_name: String,
    pub published_date: DateTime<Utc>,
    pub source: String,
    pub tags: Vec<String>,
    pub intro: String,
    pub description: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub og_url: String,
    pub canonical_url: String,
    pub word_count: usize,
    pub category: String,
    pub section: String,
    pub keywords: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A generic page record, used for non-article HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub body: String,
    pub content_type: ContentTypeLabel,
    pub discovered_at: DateTime<Utc>,
}

/// Serializable mirror of [`ContentType`] (the classifier's type is not
/// itself `Serialize` since it never leaves process memory unconverted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentTypeLabel {
    Article,
    Page,
    Video,
    Image,
    Job,
    Html,
}

impl From<ContentType> for ContentTypeLabel {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Article => ContentTypeLabel::Article,
            ContentType::Page => ContentTypeLabel::Page,
            ContentType::Video => ContentTypeLabel::Video,
            ContentType::Image => ContentTypeLabel::Image,
            ContentType::Job => ContentTypeLabel::Job,
            ContentType::Html => ContentTypeLabel::Html,
        }
    }
}

/// Event-bus payload: a tagged record fanned out to subscribed handlers.
#[derive(Debug, Clone)]
pub struct Content {
    pub url: String,
    pub content_type: ContentTypeLabel,
    pub title: String,
    pub description: String,
    pub raw_content: String,
    pub metadata: std::collections::HashMap<String, String>,
}
