//! Categories and listing order

use std::cmp::Ordering;

use serde::Serialize;

use super::ResultNode;
use crate::config::SortCriteria;

/// A named category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Entry of a `getCategories` list; `None` without a `category_id`
    pub fn from_item(item: &ResultNode) -> Option<Self> {
        Some(Self {
            id: item.field_owned("category_id")?,
            name: item.field("name").unwrap_or_default().to_string(),
        })
    }
}

/// A video in a category listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
}

/// Anything listed with an id and a display label
pub trait Listed {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
}

impl Listed for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Listed for VideoSummary {
    fn id(&self) -> &str {
        &self.video_id
    }

    fn label(&self) -> &str {
        &self.title
    }
}

/// Numeric ids first in numeric order, then the rest lexically
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Sort a listing in place
pub fn sort_listing<T: Listed>(items: &mut [T], criteria: SortCriteria) {
    match criteria {
        SortCriteria::Index => items.sort_by(|a, b| compare_ids(a.id(), b.id())),
        SortCriteria::Alpha => items.sort_by(|a, b| {
            a.label()
                .to_lowercase()
                .cmp(&b.label().to_lowercase())
                .then_with(|| compare_ids(a.id(), b.id()))
        }),
    }
}
