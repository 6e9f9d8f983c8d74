//! Type-hint driven resolution of concrete resource variants.
//!
//! A fetched document may carry a `_type` string (or the legacy `type`
//! key). The hint is camel-cased and looked up in the [`TypeRegistry`]
//! under the node's namespace; a match rebinds the node to that variant.
//! Without a hint, or without a registered match, the node keeps the type
//! its call site declared.

use std::collections::HashMap;

use serde_json::Value;

use crate::inflect;
use crate::logging::targets;
use crate::schema::ResourceType;

/// Primary type hint key.
pub const TYPE_HINT_KEY: &str = "_type";

/// Legacy type hint key, consulted when [`TYPE_HINT_KEY`] is absent.
pub const LEGACY_TYPE_HINT_KEY: &str = "type";

/// Extract and normalize the type hint of a document.
pub fn type_hint(document: &Value) -> Option<String> {
    let object = document.as_object()?;
    let hint = object
        .get(TYPE_HINT_KEY)
        .or_else(|| object.get(LEGACY_TYPE_HINT_KEY))?
        .as_str()?;

    if hint.is_empty() {
        return None;
    }
    Some(inflect::camelize(hint))
}

/// Registered resource variants, keyed by namespace and type name.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    namespaces: HashMap<&'static str, HashMap<&'static str, &'static ResourceType>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variant. A later registration with the same namespace and
    /// name replaces the earlier one.
    pub fn register(&mut self, resource_type: &'static ResourceType) {
        self.namespaces
            .entry(resource_type.namespace())
            .or_default()
            .insert(resource_type.name(), resource_type);
    }

    /// Builder-style [`TypeRegistry::register`].
    pub fn with(mut self, resource_type: &'static ResourceType) -> Self {
        self.register(resource_type);
        self
    }

    /// Find a registered variant.
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<&'static ResourceType> {
        self.namespaces.get(namespace)?.get(name).copied()
    }

    /// Resolve the variant a document should become, if its hint names a
    /// registered type in `namespace`.
    pub fn resolve(&self, document: &Value, namespace: &str) -> Option<&'static ResourceType> {
        let hint = type_hint(document)?;
        let resolved = self.lookup(namespace, &hint);

        match resolved {
            Some(resource_type) => tracing::trace!(
                target: targets::RESOLVER,
                %hint,
                resolved = %resource_type,
                "resolved type hint"
            ),
            None => tracing::debug!(
                target: targets::RESOLVER,
                %hint,
                namespace,
                "no registered type for hint"
            ),
        }

        resolved
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(HashMap::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
