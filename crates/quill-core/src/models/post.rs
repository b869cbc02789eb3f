//! Post resource and the inputs used to query, create and edit posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub slug: Option<String>,
    /// Username of the author.
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Category slug.
    #[serde(default)]
    pub category: Option<String>,
    /// Tag slugs.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Server-generated summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Server-suggested tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags_suggested: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Filters for listing posts. Unset and empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub search: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Comma-separated tag slugs.
    pub tags: Option<String>,
    /// Ordering field, e.g. `-created_at`.
    pub ordering: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl PostQuery {
    /// The query string pairs to send, in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text = [
            ("search", &self.search),
            ("category", &self.category),
            ("tags", &self.tags),
            ("ordering", &self.ordering),
        ];
        for (name, value) in text {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((name, value.to_string()));
            }
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    /// Category slug.
    pub category: Option<String>,
    /// Comma-separated tags as typed by a user, e.g. `"rust, jwt,"`.
    pub tags: Option<String>,
}

impl NewPost {
    /// Create a post input with a title and content.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the category slug.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the comma-separated tag list.
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// The trimmed category, if non-empty.
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// The tag list, if the raw input is non-blank.
    ///
    /// Entries are trimmed and blank entries dropped, so `" , "` yields an
    /// empty list rather than no list.
    fn tag_list(&self) -> Option<Vec<String>> {
        let raw = self.tags.as_deref().filter(|t| !t.trim().is_empty())?;
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// The JSON body for the create endpoint.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("title".into(), Value::String(self.title.trim().to_string()));
        body.insert(
            "content".into(),
            Value::String(self.content.trim().to_string()),
        );
        if let Some(category) = self.category() {
            body.insert("category".into(), Value::String(category.to_string()));
        }
        if let Some(tags) = self.tag_list() {
            body.insert(
                "tags".into(),
                Value::Array(tags.into_iter().map(Value::String).collect()),
            );
        }
        Value::Object(body)
    }

    /// The text fields for a multipart create request. Tags repeat the
    /// `tags` field once per tag.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("title".to_string(), self.title.trim().to_string()),
            ("content".to_string(), self.content.trim().to_string()),
        ];
        if let Some(category) = self.category() {
            fields.push(("category".to_string(), category.to_string()));
        }
        for tag in self.tag_list().unwrap_or_default() {
            fields.push(("tags".to_string(), tag));
        }
        fields
    }
}

/// A partial update to a post. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    /// Returns true if nothing would be changed.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// The JSON body for the update endpoint.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        if let Some(title) = &self.title {
            body.insert("title".into(), Value::String(title.trim().to_string()));
        }
        if let Some(content) = &self.content {
            body.insert("content".into(), Value::String(content.trim().to_string()));
        }
        Value::Object(body)
    }
}
