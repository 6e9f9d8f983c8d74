//! Resource type descriptors and relation declarations.
//!
//! A resource type is plain data: a name, the namespace it is registered
//! under, and the list of relations it declares. One generic
//! [`ResourceNode`](crate::ResourceNode) implementation interprets the
//! declarations at runtime.
//!
//! ```ignore
//! use hal_resource::{Relation, ResourceType};
//!
//! pub static ACCOUNT: ResourceType = ResourceType::new("Api", "Account")
//!     .with_relations(&[
//!         Relation::has_many("mainframes").of("Mainframe"),
//!         Relation::belongs_to("owner").of("User"),
//!         Relation::embeds_one("billing_detail"),
//!     ]);
//! ```

use std::fmt;

use crate::inflect;
use crate::node::ResourceNode;

/// How a relation is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// A single related resource behind a link.
    BelongsTo,
    /// Same resolution as [`RelationKind::BelongsTo`].
    HasOne,
    /// A paginated collection behind a link.
    HasMany,
    /// A single resource carried inline in `_embedded`.
    EmbedsOne,
    /// A list of resources carried inline in `_embedded`.
    EmbedsMany,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelongsTo => write!(f, "belongs_to"),
            Self::HasOne => write!(f, "has_one"),
            Self::HasMany => write!(f, "has_many"),
            Self::EmbedsOne => write!(f, "embeds_one"),
            Self::EmbedsMany => write!(f, "embeds_many"),
        }
    }
}

/// A relation declared on a resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relation {
    name: &'static str,
    kind: RelationKind,
    target: Option<&'static str>,
}

impl Relation {
    const fn new(name: &'static str, kind: RelationKind) -> Self {
        Self {
            name,
            kind,
            target: None,
        }
    }

    /// Declare a single linked resource.
    pub const fn belongs_to(name: &'static str) -> Self {
        Self::new(name, RelationKind::BelongsTo)
    }

    /// Declare a single linked resource.
    pub const fn has_one(name: &'static str) -> Self {
        Self::new(name, RelationKind::HasOne)
    }

    /// Declare a linked, paginated collection.
    pub const fn has_many(name: &'static str) -> Self {
        Self::new(name, RelationKind::HasMany)
    }

    /// Declare a single embedded resource.
    pub const fn embeds_one(name: &'static str) -> Self {
        Self::new(name, RelationKind::EmbedsOne)
    }

    /// Declare a list of embedded resources.
    pub const fn embeds_many(name: &'static str) -> Self {
        Self::new(name, RelationKind::EmbedsMany)
    }

    /// Name the type the related resources are declared as.
    ///
    /// A type hint in the fetched document still takes precedence.
    pub const fn of(mut self, type_name: &'static str) -> Self {
        self.target = Some(type_name);
        self
    }

    /// The relation name, which is also its link and embedded key.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The relation kind.
    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    /// The declared target type name, if any.
    pub fn target(&self) -> Option<&'static str> {
        self.target
    }
}

/// Static description of a client-side resource variant.
#[derive(Debug)]
pub struct ResourceType {
    namespace: &'static str,
    name: &'static str,
    relations: &'static [Relation],
    collection: Option<&'static str>,
}

/// The type a node has when nothing more specific is known.
pub static GENERIC_RESOURCE: ResourceType = ResourceType::new("", "Resource");

impl ResourceType {
    /// Describe a type named `name` within `namespace`.
    pub const fn new(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace,
            name,
            relations: &[],
            collection: None,
        }
    }

    /// Attach the relation declarations.
    pub const fn with_relations(mut self, relations: &'static [Relation]) -> Self {
        self.relations = relations;
        self
    }

    /// Override the collection basename derived from the type name.
    pub const fn with_collection(mut self, basename: &'static str) -> Self {
        self.collection = Some(basename);
        self
    }

    /// The namespace the type is registered under.
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// The type name, as produced by camel-casing a type hint.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All declared relations.
    pub fn relations(&self) -> &'static [Relation] {
        self.relations
    }

    /// Look up a declared relation by name.
    pub fn relation(&self, name: &str) -> Option<&'static Relation> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    /// Whether this is [`GENERIC_RESOURCE`].
    pub fn is_generic(&self) -> bool {
        self == &GENERIC_RESOURCE
    }

    /// Collection basename: the override, or the lower-cased plural name.
    pub fn basename(&self) -> String {
        match self.collection {
            Some(basename) => basename.to_string(),
            None => inflect::pluralize(self.name),
        }
    }

    /// Path of the top-level collection of this type.
    pub fn collection_href(&self) -> String {
        format!("/{}", self.basename())
    }
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }
}

impl Eq for ResourceType {}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace, self.name)
        }
    }
}

/// A typed view over a [`ResourceNode`].
///
/// Implement this for application structs that wrap a node of one
/// registered type, then convert with
/// [`ResourceNode::into_typed`](crate::ResourceNode::into_typed).
pub trait Resource: Sized {
    /// The descriptor this view corresponds to.
    fn resource_type() -> &'static ResourceType;

    /// Wrap a node already known to be of [`Resource::resource_type`].
    fn from_node(node: ResourceNode) -> Self;

    /// The wrapped node.
    fn node(&self) -> &ResourceNode;

    /// The wrapped node, mutably.
    fn node_mut(&mut self) -> &mut ResourceNode;
}

#[cfg(test)]
mod tests {
    use super::*;

    static MAINFRAME: ResourceType = ResourceType::new("Api", "Mainframe").with_relations(&[
        Relation::belongs_to("account").of("Account"),
        Relation::has_many("operations"),
        Relation::embeds_one("best_operation"),
    ]);

    static POLICY: ResourceType = ResourceType::new("Api", "Policy");

    static LOG_DRAIN: ResourceType = ResourceType::new("Api", "LogDrain").with_collection("log_drains");

    #[test]
    fn collection_href_is_pluralized() {
        assert_eq!(MAINFRAME.collection_href(), "/mainframes");
        assert_eq!(POLICY.collection_href(), "/policies");
        assert_eq!(LOG_DRAIN.collection_href(), "/log_drains");
    }

    #[test]
    fn relation_lookup() {
        let account = MAINFRAME.relation("account").unwrap();
        assert_eq!(account.kind(), RelationKind::BelongsTo);
        assert_eq!(account.target(), Some("Account"));
        assert!(MAINFRAME.relation("nope").is_none());
    }

    #[test]
    fn identity_is_namespace_and_name() {
        static OTHER_MAINFRAME: ResourceType = ResourceType::new("Api", "Mainframe");
        assert_eq!(MAINFRAME, OTHER_MAINFRAME);
        assert_ne!(MAINFRAME, POLICY);
        assert!(!MAINFRAME.is_generic());
        assert!(GENERIC_RESOURCE.is_generic());
        assert_eq!(MAINFRAME.to_string(), "Api::Mainframe");
    }
}
