use serde::{Deserialize, Serialize};

use super::{ensure_row, remove_row};
use crate::document::{require, CreatePolicy, Record};
use crate::error::ValidationError;

/// Tags an operator can attach to a blog post.
pub const AVAILABLE_TAGS: [&str; 8] = [
    "Tech",
    "SaaS",
    "Fashion",
    "Lifestyle",
    "Business",
    "Health",
    "Travel",
    "Food",
];

/// A named outbound link on a blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.url.trim().is_empty()
    }
}

/// A blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Blog {
    pub title: String,
    pub content: String,
    pub links: Vec<Link>,
    pub image_url: String,
    pub tags: Vec<String>,
}

impl Blog {
    /// Add `tag` if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(index) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(index);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn add_link_row(&mut self) {
        self.links.push(Link::default());
    }

    pub fn remove_link_row(&mut self, index: usize) {
        remove_row(&mut self.links, index);
    }
}

impl Record for Blog {
    const COLLECTION: &'static str = "blogs";
    const CREATE_POLICY: CreatePolicy = CreatePolicy::Refetch;

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("content", &self.content)
    }

    fn strip_empty(&mut self) {
        self.links.retain(|link| !link.is_blank());
        self.tags.retain(|tag| !tag.trim().is_empty());
    }

    fn fill_placeholders(&mut self) {
        ensure_row(&mut self.links);
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}
