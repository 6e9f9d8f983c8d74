//! Collection pagination.
//!
//! A collection page is a document embedding its entries under a key and
//! linking to the following page through `next`. [`Paginator`] follows those
//! links either eagerly ([`Paginator::depaginate`]) or lazily as a stream
//! ([`Paginator::entries`]). A lazy consumer that stops early never causes
//! the remaining pages to be fetched.

use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};

use crate::document::{Embedded, LinkDescriptor, NEXT_LINK};
use crate::error::Result;
use crate::logging::targets;
use crate::node::ResourceNode;
use crate::params::Params;
use crate::schema::{GENERIC_RESOURCE, ResourceType};

/// A lazy stream of pages.
pub type PageStream = BoxStream<'static, Result<Page>>;

/// A lazy stream of entries, page after page.
pub type EntryStream = BoxStream<'static, Result<ResourceNode>>;

/// One page of a collection.
#[derive(Clone, Debug)]
pub struct Page {
    /// Entries on this page, in order.
    pub entries: Vec<ResourceNode>,
    /// Link to the next page, if there is one.
    pub next: Option<LinkDescriptor>,
}

impl Page {
    /// Read a loaded page document.
    ///
    /// Entries come from the embedded list named `key`, or from the first
    /// embedded list if there is none by that name. Entries whose type was
    /// not resolved from a hint become `entry_type`.
    pub fn from_node(
        mut node: ResourceNode,
        key: &str,
        entry_type: &'static ResourceType,
    ) -> Self {
        let next = node.link(NEXT_LINK).cloned();

        let embedded = match node.embedded.remove(key) {
            Some(embedded) => Some(embedded),
            None => {
                let first_list = node
                    .embedded
                    .iter()
                    .find(|(_, embedded)| matches!(embedded, Embedded::Many(_)))
                    .map(|(name, _)| name.clone());
                first_list.and_then(|name| node.embedded.remove(&name))
            }
        };

        let mut entries = match embedded {
            Some(Embedded::Many(entries)) => entries,
            Some(Embedded::One(entry)) => vec![*entry],
            None => Vec::new(),
        };
        for entry in &mut entries {
            entry.rebind_if_generic(entry_type);
        }

        Self { entries, next }
    }
}

/// Walks a collection page by page.
#[derive(Clone, Debug)]
pub struct Paginator {
    seed: ResourceNode,
    start: String,
    key: String,
    entry_type: &'static ResourceType,
}

impl Paginator {
    /// Paginate from `start`, reading entries embedded under `key`.
    ///
    /// Page requests inherit the root, namespace, headers and credential of
    /// `seed`.
    pub fn new(seed: &ResourceNode, start: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            seed: seed.child(&GENERIC_RESOURCE, ""),
            start: start.into(),
            key: key.into(),
            entry_type: &GENERIC_RESOURCE,
        }
    }

    /// Declare the type of entries that carry no type hint.
    pub fn entry_type(mut self, entry_type: &'static ResourceType) -> Self {
        self.entry_type = entry_type;
        self
    }

    /// Add the non-reserved keys of `params` to the first page's query.
    pub fn params(mut self, params: &Params) -> Self {
        self.start = params.apply_to(&self.start);
        self
    }

    /// Fetch a single page.
    ///
    /// A not-found response is treated as the end of the collection and
    /// yields `None`.
    pub async fn fetch_page(&self, href: &str) -> Result<Option<Page>> {
        let mut node = self.seed.child(&GENERIC_RESOURCE, href);
        tracing::trace!(target: targets::PAGINATOR, href, "fetching page");

        match node.get().await {
            Ok(()) => Ok(Some(Page::from_node(node, &self.key, self.entry_type))),
            Err(err) if err.is_not_found() => {
                tracing::warn!(
                    target: targets::PAGINATOR,
                    href,
                    "page not found, ending pagination"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Stream pages, fetching each only when it is polled for.
    ///
    /// The stream ends after the first error.
    pub fn pages(self) -> PageStream {
        Box::pin(async_stream::stream! {
            let mut next = Some(self.start.clone());
            while let Some(href) = next.take() {
                match self.fetch_page(&href).await {
                    Ok(Some(page)) => {
                        next = page.next.as_ref().map(|link| link.href().to_string());
                        yield Ok(page);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        yield Err(err);
                    }
                }
            }
        })
    }

    /// Stream entries across all pages.
    pub fn entries(self) -> EntryStream {
        Box::pin(async_stream::stream! {
            let mut pages = self.pages();
            while let Some(page) = pages.next().await {
                match page {
                    Ok(page) => {
                        for entry in page.entries {
                            yield Ok(entry);
                        }
                    }
                    Err(err) => {
                        yield Err(err);
                    }
                }
            }
        })
    }

    /// Fetch every page and concatenate the entries.
    pub async fn depaginate(self) -> Result<Vec<ResourceNode>> {
        self.entries().try_collect().await
    }
}
