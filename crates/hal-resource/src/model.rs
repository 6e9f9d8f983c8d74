//! Collection-level operations on a resource type.
//!
//! Every resource type has a top-level collection at
//! [`ResourceType::collection_href`]. These operations find, list and create
//! resources there. The reserved keys of [`Params`] (`credential`, `root`,
//! `namespace`, `headers`) configure the request; the other keys are sent
//! as the query or body.

use std::fmt;

use crate::client::ResourceClient;
use crate::error::Result;
use crate::error_record::ErrorRecord;
use crate::node::ResourceNode;
use crate::paginator::{EntryStream, PageStream, Paginator};
use crate::params::Params;
use crate::schema::ResourceType;

impl ResourceClient {
    /// Fetch `collection_href/id`.
    ///
    /// Returns `None` if the server answers not found.
    pub async fn find(
        &self,
        resource_type: &'static ResourceType,
        id: impl fmt::Display,
        params: &Params,
    ) -> Result<Option<ResourceNode>> {
        let href = format!("{}/{id}", resource_type.collection_href());
        self.find_by_url(resource_type, &href, params).await
    }

    /// Fetch an absolute URL or an href relative to the root.
    ///
    /// Returns `None` if the server answers not found.
    pub async fn find_by_url(
        &self,
        resource_type: &'static ResourceType,
        url_or_href: &str,
        params: &Params,
    ) -> Result<Option<ResourceNode>> {
        let mut node = self.scoped_node(resource_type, url_or_href, params);
        node.href = params.apply_to(&node.href);

        match node.get().await {
            Ok(()) => Ok(Some(node)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Every resource in the collection, across all pages.
    ///
    /// A missing collection is empty.
    pub async fn all(
        &self,
        resource_type: &'static ResourceType,
        params: &Params,
    ) -> Result<Vec<ResourceNode>> {
        self.collection(resource_type, params).depaginate().await
    }

    /// Stream the collection one page at a time.
    pub fn each_page(&self, resource_type: &'static ResourceType, params: &Params) -> PageStream {
        self.collection(resource_type, params).pages()
    }

    /// Stream the collection one resource at a time.
    pub fn stream_all(&self, resource_type: &'static ResourceType, params: &Params) -> EntryStream {
        self.collection(resource_type, params).entries()
    }

    /// POST `params` to the collection and return the created resource.
    ///
    /// Resource values in `params` are sent as their hrefs.
    pub async fn create(
        &self,
        resource_type: &'static ResourceType,
        params: &Params,
    ) -> Result<ResourceNode> {
        let mut node = self.scoped_node(resource_type, &resource_type.collection_href(), params);
        node.post(Some(params)).await?;
        Ok(node)
    }

    /// Like [`ResourceClient::create`], but a rejected response yields an
    /// unloaded node whose [`errors`](ResourceNode::errors) describe it.
    pub async fn try_create(
        &self,
        resource_type: &'static ResourceType,
        params: &Params,
    ) -> Result<ResourceNode> {
        let mut node = self.scoped_node(resource_type, &resource_type.collection_href(), params);
        match node.post(Some(params)).await {
            Ok(()) => Ok(node),
            Err(err) => match err.response() {
                Some(response) => {
                    let mut empty =
                        self.scoped_node(resource_type, &resource_type.collection_href(), params);
                    empty.errors = ErrorRecord::from_response_error(response);
                    Ok(empty)
                }
                None => Err(err),
            },
        }
    }

    fn scoped_node(
        &self,
        resource_type: &'static ResourceType,
        url_or_href: &str,
        params: &Params,
    ) -> ResourceNode {
        let node = self.node_of(resource_type, "").with_overrides(params);
        node.child(resource_type, url_or_href)
    }

    fn collection(&self, resource_type: &'static ResourceType, params: &Params) -> Paginator {
        let seed = self.scoped_node(resource_type, "", params);
        Paginator::new(&seed, resource_type.collection_href(), resource_type.basename())
            .entry_type(resource_type)
            .params(params)
    }
}
