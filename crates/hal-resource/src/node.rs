//! In-memory hypermedia documents.
//!
//! A [`ResourceNode`] starts out unloaded, holding only an href and the
//! context needed to fetch it. The first successful request loads
//! attributes, links and embedded resources together; a failed one leaves
//! the node [`LoadState::Failed`] and the next access tries again.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use hal_resource_net::HttpMethod;
use serde_json::{Map, Value};

use crate::client::ResourceClient;
use crate::credential::Credential;
use crate::document::{Embedded, LinkDescriptor};
use crate::error::{ResourceError, Result};
use crate::error_record::ErrorRecord;
use crate::executor;
use crate::params::Params;
use crate::schema::{Resource, ResourceType};

/// Load state of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// Never fetched.
    #[default]
    Unloaded,
    /// Content reflects a successful response.
    Loaded,
    /// The last fetch failed before the node was ever loaded.
    Failed,
}

/// Memoized relation values.
#[derive(Clone, Debug)]
pub(crate) enum CachedRelation {
    One(Option<Box<ResourceNode>>),
    Many(Vec<ResourceNode>),
}

/// One hypermedia document.
#[derive(Clone)]
pub struct ResourceNode {
    client: ResourceClient,
    pub(crate) resource_type: &'static ResourceType,
    root: String,
    pub(crate) href: String,
    namespace: String,
    headers: http::HeaderMap,
    pub(crate) attributes: Map<String, Value>,
    pub(crate) links: BTreeMap<String, LinkDescriptor>,
    pub(crate) embedded: BTreeMap<String, Embedded>,
    pub(crate) changed: BTreeSet<String>,
    pub(crate) state: LoadState,
    credential: Option<Credential>,
    pub(crate) errors: ErrorRecord,
    pub(crate) relations: HashMap<&'static str, CachedRelation>,
}

impl ResourceNode {
    pub(crate) fn new(
        client: ResourceClient,
        resource_type: &'static ResourceType,
        href: String,
    ) -> Self {
        let root = client.root().to_string();
        let namespace = client.namespace().to_string();
        let headers = client.default_headers().clone();
        let credential = client.credential().cloned();

        let mut node = Self {
            client,
            resource_type,
            root,
            href: String::new(),
            namespace,
            headers,
            attributes: Map::new(),
            links: BTreeMap::new(),
            embedded: BTreeMap::new(),
            changed: BTreeSet::new(),
            state: LoadState::Unloaded,
            credential,
            errors: ErrorRecord::default(),
            relations: HashMap::new(),
        };
        node.href = node.relative_href(&href);
        node
    }

    /// An unloaded node sharing this node's root, namespace, headers and
    /// credential.
    pub(crate) fn child(&self, resource_type: &'static ResourceType, href: &str) -> Self {
        Self {
            client: self.client.clone(),
            resource_type,
            root: self.root.clone(),
            href: self.relative_href(href),
            namespace: self.namespace.clone(),
            headers: self.headers.clone(),
            attributes: Map::new(),
            links: BTreeMap::new(),
            embedded: BTreeMap::new(),
            changed: BTreeSet::new(),
            state: LoadState::Unloaded,
            credential: self.credential.clone(),
            errors: ErrorRecord::default(),
            relations: HashMap::new(),
        }
    }

    /// `href` with this node's root removed from the front.
    ///
    /// The root is only stripped at a path boundary, so a URL on a host that
    /// merely shares the root as a prefix stays absolute.
    pub(crate) fn relative_href(&self, href: &str) -> String {
        match href.strip_prefix(self.root.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '?']) => rest.to_string(),
            _ => href.to_string(),
        }
    }

    /// Adopt `resource_type` if nothing more specific is known yet.
    pub(crate) fn rebind_if_generic(&mut self, resource_type: &'static ResourceType) {
        if self.resource_type.is_generic() {
            self.resource_type = resource_type;
        }
    }

    /// Use a different API root.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a different namespace for type hint lookups.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Use a different credential.
    pub fn with_credential(mut self, credential: impl Into<Credential>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Add a header to every request made for this node.
    ///
    /// Invalid names or values are ignored.
    pub fn with_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Apply the reserved keys of `params`: `credential`, `root`,
    /// `namespace` and `headers`.
    pub fn with_overrides(mut self, params: &Params) -> Self {
        if let Some(root) = params.root() {
            self = self.with_root(root);
        }
        if let Some(namespace) = params.namespace() {
            self = self.with_namespace(namespace);
        }
        if let Some(credential) = params.credential() {
            self = self.with_credential(credential);
        }
        for (name, value) in params.headers() {
            self = self.with_header(name.as_str(), value.as_str());
        }
        self
    }

    /// The client this node was created from.
    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    /// The resolved type.
    pub fn resource_type(&self) -> &'static ResourceType {
        self.resource_type
    }

    /// The API root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Path of the document, relative to [`ResourceNode::root`] when possible.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Namespace for type hint lookups.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Extra request headers.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// The credential sent with requests.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub(crate) fn credential_mut(&mut self) -> Option<&mut Credential> {
        self.credential.as_mut()
    }

    /// Document attributes, in document order.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// A single attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Change an attribute locally. Changed attributes are what
    /// [`ResourceNode::patch`] sends when given no parameters.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.changed.insert(name.clone());
        self.attributes.insert(name, value.into());
    }

    /// Attributes changed since the last load.
    pub fn changed_attributes(&self) -> Map<String, Value> {
        self.changed
            .iter()
            .filter_map(|name| Some((name.clone(), self.attributes.get(name)?.clone())))
            .collect()
    }

    /// Links by relation name.
    pub fn links(&self) -> &BTreeMap<String, LinkDescriptor> {
        &self.links
    }

    /// A single link.
    pub fn link(&self, name: &str) -> Option<&LinkDescriptor> {
        self.links.get(name)
    }

    /// An unloaded node for the target of a link, whether or not the
    /// relation is declared.
    pub fn link_target(&self, name: &str) -> Option<ResourceNode> {
        let link = self.links.get(name)?;
        Some(self.child(&crate::schema::GENERIC_RESOURCE, link.href()))
    }

    /// Embedded resources by relation name.
    pub fn embedded(&self) -> &BTreeMap<String, Embedded> {
        &self.embedded
    }

    /// The load state.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Whether the node holds a loaded document.
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Errors recorded by a tolerant call.
    pub fn errors(&self) -> &ErrorRecord {
        &self.errors
    }

    /// Absolute URL of the document.
    pub fn url(&self) -> Result<String> {
        let candidate = if url::Url::parse(&self.href).is_ok() {
            self.href.clone()
        } else if self.href.is_empty() || self.href.starts_with(['/', '?']) {
            format!("{}{}", self.root, self.href)
        } else {
            format!("{}/{}", self.root, self.href)
        };

        url::Url::parse(&candidate)
            .map(String::from)
            .map_err(|err| ResourceError::InvalidUrl {
                href: candidate,
                message: err.to_string(),
            })
    }

    /// Fetch the document unless it is already loaded.
    pub async fn ensure_loaded(&mut self) -> Result<()> {
        if self.state != LoadState::Loaded {
            self.get().await?;
        }
        Ok(())
    }

    /// GET the document and load the response.
    pub async fn get(&mut self) -> Result<()> {
        executor::execute(self, HttpMethod::Get, None).await
    }

    /// POST `params`, or the current attributes, and load the response.
    pub async fn post(&mut self, params: Option<&Params>) -> Result<()> {
        let body = self.body_or_attributes(params);
        executor::execute(self, HttpMethod::Post, Some(body)).await
    }

    /// PUT `params`, or the current attributes, and load the response.
    pub async fn put(&mut self, params: Option<&Params>) -> Result<()> {
        let body = self.body_or_attributes(params);
        executor::execute(self, HttpMethod::Put, Some(body)).await
    }

    /// PATCH `params`, or the changed attributes, and load the response.
    pub async fn patch(&mut self, params: Option<&Params>) -> Result<()> {
        let body = match params {
            Some(params) => params.normalize(),
            None => Value::Object(self.changed_attributes()),
        };
        executor::execute(self, HttpMethod::Patch, Some(body)).await
    }

    /// DELETE the document.
    ///
    /// A successful status whose body does not parse still counts as
    /// success.
    pub async fn delete(&mut self) -> Result<()> {
        match executor::execute(self, HttpMethod::Delete, None).await {
            Err(ResourceError::Response(err)) if (200..300).contains(&err.status()) => {
                tracing::debug!(
                    target: crate::logging::targets::EXECUTOR,
                    href = %self.href,
                    status = err.status(),
                    "ignoring unparseable delete response"
                );
                Ok(())
            }
            other => other,
        }
    }

    /// PUT `params` with resource values replaced by their hrefs.
    pub async fn update(&mut self, params: &Params) -> Result<()> {
        self.put(Some(params)).await
    }

    /// Like [`ResourceNode::update`], but a rejected response is recorded in
    /// [`ResourceNode::errors`] instead of being returned.
    pub async fn try_update(&mut self, params: &Params) -> Result<()> {
        match self.update(params).await {
            Err(err) => match err.response() {
                Some(response) => {
                    self.errors = ErrorRecord::from_response_error(response);
                    Ok(())
                }
                None => Err(err),
            },
            Ok(()) => {
                self.errors = ErrorRecord::default();
                Ok(())
            }
        }
    }

    /// Fetch the document again into a new node. This node is untouched.
    ///
    /// Returns `None` if the document no longer exists.
    pub async fn reload(&self) -> Result<Option<ResourceNode>> {
        let mut fresh = self.child(self.resource_type, &self.href);
        match fresh.get().await {
            Ok(()) => Ok(Some(fresh)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Convert into a typed view if the resolved type matches.
    pub fn into_typed<T: Resource>(self) -> std::result::Result<T, ResourceNode> {
        if self.resource_type == T::resource_type() {
            Ok(T::from_node(self))
        } else {
            Err(self)
        }
    }

    fn body_or_attributes(&self, params: Option<&Params>) -> Value {
        match params {
            Some(params) => params.normalize(),
            None => Value::Object(self.attributes.clone()),
        }
    }
}

impl fmt::Debug for ResourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceNode")
            .field("type", &format_args!("{}", self.resource_type))
            .field("root", &self.root)
            .field("href", &self.href)
            .field("state", &self.state)
            .field("attributes", &self.attributes)
            .field("links", &self.links.keys().collect::<Vec<_>>())
            .field("embedded", &self.embedded.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
