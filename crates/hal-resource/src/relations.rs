//! Lazy relation accessors.
//!
//! Relations are declared on a [`ResourceType`] and interpreted here for any
//! node. Every accessor loads the node first if needed. Linked relations are
//! fetched once and memoized on the node until it is loaded again; embedded
//! relations never touch the network.

use crate::document::Embedded;
use crate::error::{ResourceError, Result};
use crate::error_record::ErrorRecord;
use crate::logging::targets;
use crate::node::{CachedRelation, ResourceNode};
use crate::paginator::{EntryStream, Paginator};
use crate::params::Params;
use crate::schema::{GENERIC_RESOURCE, Relation, RelationKind, ResourceType};

impl ResourceNode {
    /// The single resource behind a `belongs_to` or `has_one` relation.
    ///
    /// Returns `None` when the document has no link for it.
    pub async fn related(&mut self, name: &str) -> Result<Option<&ResourceNode>> {
        let relation = self.declared(name, &[RelationKind::BelongsTo, RelationKind::HasOne])?;
        self.ensure_loaded().await?;

        let key = relation.name();
        if !self.relations.contains_key(key) {
            let target_type = self.target_type(relation);
            let fetched = match self.links.get(key) {
                Some(link) => {
                    let mut target = self.child(target_type, link.href());
                    tracing::debug!(
                        target: targets::RELATIONS,
                        relation = key,
                        href = %target.href(),
                        "loading related resource"
                    );
                    target.get().await?;
                    Some(Box::new(target))
                }
                None => None,
            };
            self.relations.insert(key, CachedRelation::One(fetched));
        }

        match self.relations.get(key) {
            Some(CachedRelation::One(node)) => Ok(node.as_deref()),
            _ => Ok(None),
        }
    }

    /// Every entry of a `has_many` relation, across all pages.
    ///
    /// Returns `None` when the document has no link for it.
    pub async fn related_many(&mut self, name: &str) -> Result<Option<&[ResourceNode]>> {
        let relation = self.declared(name, &[RelationKind::HasMany])?;
        self.ensure_loaded().await?;

        let key = relation.name();
        if !self.relations.contains_key(key) {
            let Some(paginator) = self.paginator(relation) else {
                return Ok(None);
            };
            tracing::debug!(target: targets::RELATIONS, relation = key, "loading collection");
            let entries = paginator.depaginate().await?;
            self.relations.insert(key, CachedRelation::Many(entries));
        }

        match self.relations.get(key) {
            Some(CachedRelation::Many(entries)) => Ok(Some(entries.as_slice())),
            _ => Ok(None),
        }
    }

    /// Stream the entries of a `has_many` relation page by page.
    ///
    /// Nothing is memoized. Returns `None` when the document has no link for
    /// the relation.
    pub async fn related_stream(&mut self, name: &str) -> Result<Option<EntryStream>> {
        let relation = self.declared(name, &[RelationKind::HasMany])?;
        self.ensure_loaded().await?;
        Ok(self.paginator(relation).map(Paginator::entries))
    }

    /// The resource embedded under an `embeds_one` relation.
    pub async fn embedded_one(&mut self, name: &str) -> Result<Option<&ResourceNode>> {
        let relation = self.declared(name, &[RelationKind::EmbedsOne])?;
        self.ensure_loaded().await?;

        let target_type = self.target_type(relation);
        if let Some(Embedded::One(node)) = self.embedded.get_mut(relation.name()) {
            node.rebind_if_generic(target_type);
        }

        match self.embedded.get(relation.name()) {
            Some(Embedded::One(node)) => Ok(Some(node.as_ref())),
            _ => Ok(None),
        }
    }

    /// The resources embedded under an `embeds_many` relation.
    pub async fn embedded_many(&mut self, name: &str) -> Result<Option<&[ResourceNode]>> {
        let relation = self.declared(name, &[RelationKind::EmbedsMany])?;
        self.ensure_loaded().await?;

        let target_type = self.target_type(relation);
        if let Some(Embedded::Many(nodes)) = self.embedded.get_mut(relation.name()) {
            for node in nodes.iter_mut() {
                node.rebind_if_generic(target_type);
            }
        }

        match self.embedded.get(relation.name()) {
            Some(Embedded::Many(nodes)) => Ok(Some(nodes.as_slice())),
            _ => Ok(None),
        }
    }

    /// POST `params` to the link of a `has_many` relation and return the
    /// created resource.
    ///
    /// Resource values in `params` are sent as their hrefs.
    pub async fn create_related(&mut self, name: &str, params: &Params) -> Result<ResourceNode> {
        let mut target = self.creation_target(name).await?;
        target.post(Some(params)).await?;
        Ok(target)
    }

    /// Like [`ResourceNode::create_related`], but a rejected response yields
    /// an empty node whose [`errors`](ResourceNode::errors) describe it.
    pub async fn try_create_related(
        &mut self,
        name: &str,
        params: &Params,
    ) -> Result<ResourceNode> {
        let mut target = self.creation_target(name).await?;
        match target.post(Some(params)).await {
            Ok(()) => Ok(target),
            Err(err) => match err.response() {
                Some(response) => {
                    let mut empty = self.child(target.resource_type(), target.href());
                    empty.errors = ErrorRecord::from_response_error(response);
                    Ok(empty)
                }
                None => Err(err),
            },
        }
    }

    async fn creation_target(&mut self, name: &str) -> Result<ResourceNode> {
        let relation = self.declared(name, &[RelationKind::HasMany])?;
        self.ensure_loaded().await?;

        let link = self
            .links
            .get(relation.name())
            .ok_or_else(|| ResourceError::MissingLink {
                resource: self.resource_type.to_string(),
                relation: relation.name().to_string(),
            })?;
        let href = link.pagination_root().to_string();
        Ok(self.child(self.target_type(relation), &href))
    }

    fn declared(&self, name: &str, kinds: &[RelationKind]) -> Result<&'static Relation> {
        self.resource_type
            .relation(name)
            .filter(|relation| kinds.contains(&relation.kind()))
            .ok_or_else(|| ResourceError::UndeclaredRelation {
                resource: self.resource_type.name(),
                relation: name.to_string(),
                expected: kinds[0],
            })
    }

    /// The declared target type of `relation`, if it is registered in this
    /// node's namespace.
    fn target_type(&self, relation: &Relation) -> &'static ResourceType {
        relation
            .target()
            .and_then(|target| self.client().registry().lookup(self.namespace(), target))
            .unwrap_or(&GENERIC_RESOURCE)
    }

    fn paginator(&self, relation: &Relation) -> Option<Paginator> {
        let link = self.links.get(relation.name())?;
        Some(
            Paginator::new(self, link.pagination_root(), relation.name())
                .entry_type(self.target_type(relation)),
        )
    }
}
