//! HAL document decoding.
//!
//! A document is a JSON object whose plain keys are attributes, whose
//! `_links` object maps relation names to `{href, ...}` and whose
//! `_embedded` object maps relation names to an object or an array of
//! objects. [`apply`] loads a document into a node in one step.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::node::{LoadState, ResourceNode};
use crate::schema::GENERIC_RESOURCE;

/// Key of the links object.
pub const LINKS_KEY: &str = "_links";

/// Key of the embedded resources object.
pub const EMBEDDED_KEY: &str = "_embedded";

/// Link relation naming the document itself.
pub const SELF_LINK: &str = "self";

/// Link relation naming the next page of a collection.
pub const NEXT_LINK: &str = "next";

/// A link to another resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkDescriptor {
    href: String,
    base_href: Option<String>,
}

impl LinkDescriptor {
    /// A link to `href`. A templated href (`/accounts{?page}`) gets a base
    /// href with the template removed.
    pub fn new(href: impl Into<String>) -> Self {
        let href = href.into();
        let base_href = href.find('{').map(|at| href[..at].to_string());
        Self { href, base_href }
    }

    /// Decode a link object, or the first entry of a link array.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = match value {
            Value::Array(items) => items.first()?,
            other => other,
        };
        let href = object.get("href")?.as_str()?;
        Some(Self::new(href))
    }

    /// The href as sent by the server.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The href with any URI template removed.
    pub fn base_href(&self) -> Option<&str> {
        self.base_href.as_deref()
    }

    /// Where pagination of this link starts.
    pub fn pagination_root(&self) -> &str {
        self.base_href.as_deref().unwrap_or(&self.href)
    }
}

/// Resources carried inline in a document.
#[derive(Clone, Debug)]
pub enum Embedded {
    /// A single embedded resource.
    One(Box<ResourceNode>),
    /// An ordered list of embedded resources.
    Many(Vec<ResourceNode>),
}

impl Embedded {
    /// All carried resources, in order.
    pub fn nodes(&self) -> &[ResourceNode] {
        match self {
            Self::One(node) => std::slice::from_ref(node.as_ref()),
            Self::Many(nodes) => nodes,
        }
    }
}

/// Load `body` into `node`.
///
/// Attributes, links and embedded resources are replaced together, the
/// relation cache is cleared, the node is marked loaded and rebound to the
/// type its hint resolves to.
///
/// A success without a body carries no document: loaded content is kept,
/// and a node that was never loaded stays unloaded so the next access
/// fetches it.
pub(crate) fn apply(node: &mut ResourceNode, body: Option<Value>) {
    let Some(body) = body else {
        node.changed.clear();
        if node.state == LoadState::Failed {
            node.state = LoadState::Unloaded;
        }
        return;
    };
    let resolved = node.client().registry().resolve(&body, node.namespace());
    let mut attributes = match body {
        Value::Object(object) => object,
        _ => Map::new(),
    };

    let links = attributes
        .remove(LINKS_KEY)
        .map(|value| decode_links(&value))
        .unwrap_or_default();
    let embedded = attributes
        .remove(EMBEDDED_KEY)
        .map(|value| decode_embedded(node, value))
        .unwrap_or_default();

    if let Some(resolved) = resolved {
        node.resource_type = resolved;
    }
    if let Some(self_link) = links.get(SELF_LINK) {
        node.href = node.relative_href(self_link.href());
    }
    node.attributes = attributes;
    node.links = links;
    node.embedded = embedded;
    node.changed.clear();
    node.relations.clear();
    node.state = LoadState::Loaded;
}

fn decode_links(value: &Value) -> BTreeMap<String, LinkDescriptor> {
    let Some(object) = value.as_object() else {
        return BTreeMap::new();
    };
    object
        .iter()
        .filter_map(|(name, link)| Some((name.clone(), LinkDescriptor::from_value(link)?)))
        .collect()
}

fn decode_embedded(parent: &ResourceNode, value: Value) -> BTreeMap<String, Embedded> {
    let Value::Object(object) = value else {
        return BTreeMap::new();
    };
    object
        .into_iter()
        .filter_map(|(name, value)| {
            let embedded = match value {
                Value::Array(items) => Embedded::Many(
                    items
                        .into_iter()
                        .map(|item| embedded_node(parent, item))
                        .collect(),
                ),
                Value::Object(_) => Embedded::One(Box::new(embedded_node(parent, value))),
                _ => return None,
            };
            Some((name, embedded))
        })
        .collect()
}

fn embedded_node(parent: &ResourceNode, document: Value) -> ResourceNode {
    let mut child = parent.child(&GENERIC_RESOURCE, "");
    apply(&mut child, Some(document));
    child
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn templated_link_has_base_href() {
        let link = LinkDescriptor::new("/accounts/1/mainframes{?page,per_page}");
        assert_eq!(link.base_href(), Some("/accounts/1/mainframes"));
        assert_eq!(link.pagination_root(), "/accounts/1/mainframes");

        let plain = LinkDescriptor::new("/accounts/1");
        assert_eq!(plain.base_href(), None);
        assert_eq!(plain.pagination_root(), "/accounts/1");
    }

    #[test]
    fn link_arrays_use_first_entry() {
        let link = LinkDescriptor::from_value(&json!([{"href": "/a"}, {"href": "/b"}])).unwrap();
        assert_eq!(link.href(), "/a");
        assert!(LinkDescriptor::from_value(&json!({"name": "x"})).is_none());
        assert!(LinkDescriptor::from_value(&json!([])).is_none());
    }
}
