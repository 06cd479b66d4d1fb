//! API response envelope
//!
//! Every Core Catalyst response wraps its payload in a node named after the
//! API method:
//!
//! ```xml
//! <response>
//!   <getStatus>
//!     <result><video_id>762</video_id>...</result>
//!     <error></error>
//!     <status>success</status>
//!     <count>1</count>
//!   </getStatus>
//! </response>
//! ```

use std::collections::BTreeMap;

use roxmltree::{Document, Node};
use serde::Serialize;

use crate::batch::Payload;
use crate::error::ParseError;
use crate::{Error, Result};

/// One `result` region or list entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultNode {
    /// Leaf children by tag name, trimmed text
    pub fields: BTreeMap<String, String>,
    /// Children that have children of their own
    pub items: Vec<ResultNode>,
}

impl ResultNode {
    fn from_node(node: Node<'_, '_>) -> Self {
        let mut result = Self::default();
        for child in node.children().filter(Node::is_element) {
            if child.children().any(|c| c.is_element()) {
                result.items.push(Self::from_node(child));
            } else {
                result
                    .fields
                    .entry(child.tag_name().name().to_string())
                    .or_insert_with(|| child.text().unwrap_or_default().trim().to_string());
            }
        }
        result
    }

    /// Non-empty field value
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Owned copy of a non-empty field
    pub fn field_owned(&self, name: &str) -> Option<String> {
        self.field(name).map(str::to_owned)
    }
}

/// Parsed API response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// Name of the method node
    pub method: String,
    /// Embedded API error, `None` when absent or empty
    pub error: Option<String>,
    pub status: Option<String>,
    pub count: Option<u32>,
    /// Every `result` region, in document order
    pub results: Vec<ResultNode>,
}

impl Envelope {
    /// Parse a response body
    pub fn parse(body: &[u8]) -> std::result::Result<Self, ParseError> {
        let text = std::str::from_utf8(body)
            .map_err(|e| ParseError::Xml(format!("body is not UTF-8: {}", e)))?;
        let document = Document::parse(text.trim())?;

        let method_node = document
            .root_element()
            .children()
            .find(Node::is_element)
            .ok_or_else(|| ParseError::missing("method"))?;

        let leaf_text = |name: &str| {
            method_node
                .children()
                .find(|n| n.has_tag_name(name))
                .and_then(|n| n.text())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
        };

        let count = leaf_text("count")
            .map(|raw| {
                raw.parse::<u32>().map_err(|_| ParseError::InvalidField {
                    field: "count".to_string(),
                    value: raw.clone(),
                })
            })
            .transpose()?;

        let results = method_node
            .children()
            .filter(|n| n.has_tag_name("result"))
            .map(ResultNode::from_node)
            .collect();

        Ok(Self {
            method: method_node.tag_name().name().to_string(),
            error: leaf_text("error"),
            status: leaf_text("status"),
            count,
            results,
        })
    }

    /// First result region
    pub fn result(&self) -> Option<&ResultNode> {
        self.results.first()
    }

    /// First result region, or a parse error naming it
    pub fn require_result(&self) -> std::result::Result<&ResultNode, ParseError> {
        self.result().ok_or_else(|| ParseError::missing("result"))
    }

    /// List entries of a list-bearing response
    pub fn items(&self) -> Vec<&ResultNode> {
        match self.results.first() {
            Some(first) if !first.items.is_empty() => first.items.iter().collect(),
            _ => self.results.iter().collect(),
        }
    }

    /// Leaf field of the first result region
    pub fn field(&self, name: &str) -> Option<&str> {
        self.result().and_then(|r| r.field(name))
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Fail when the API reported an error
    pub fn ensure_ok(&self) -> Result<()> {
        match &self.error {
            Some(message) => Err(Error::envelope(self.method.clone(), message.clone())),
            None => Ok(()),
        }
    }

    /// `count` when positive
    pub fn positive_count(&self) -> Option<u32> {
        self.count.filter(|c| *c > 0)
    }
}

impl Payload for Envelope {
    fn embedded_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
