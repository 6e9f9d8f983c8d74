//! The client handle shared by every node.

use std::fmt;
use std::sync::Arc;

use hal_resource_net::{HttpClient, Transport};

use crate::config::configuration;
use crate::credential::Credential;
use crate::error::{ResourceError, Result};
use crate::node::ResourceNode;
use crate::resolver::TypeRegistry;
use crate::schema::{GENERIC_RESOURCE, ResourceType};

/// Builder for a [`ResourceClient`].
pub struct ResourceClientBuilder {
    root: String,
    namespace: String,
    credential: Option<Credential>,
    transport: Option<Arc<dyn Transport>>,
    registry: TypeRegistry,
    default_headers: http::HeaderMap,
}

impl ResourceClientBuilder {
    /// Create a builder for the API served at `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            namespace: String::new(),
            credential: None,
            transport: None,
            registry: TypeRegistry::new(),
            default_headers: http::HeaderMap::new(),
        }
    }

    /// Namespace used for type hint lookups.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Credential sent with every request, unless a node overrides it.
    pub fn credential(mut self, credential: impl Into<Credential>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Send requests through a custom transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Send requests through an existing HTTP client.
    pub fn http_client(self, client: HttpClient) -> Self {
        self.transport(Arc::new(client))
    }

    /// Register a resource variant for type hint resolution.
    pub fn register(mut self, resource_type: &'static ResourceType) -> Self {
        self.registry.register(resource_type);
        self
    }

    /// Add a header sent with every request.
    ///
    /// Invalid names or values are ignored.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.default_headers.insert(name, value);
        }
        self
    }

    /// Build the client.
    ///
    /// Without an explicit transport, an [`HttpClient`] is created with the
    /// configured request timeout.
    pub fn build(self) -> Result<ResourceClient> {
        let root = self.root.trim_end_matches('/').to_string();
        url::Url::parse(&root).map_err(|err| ResourceError::InvalidUrl {
            href: root.clone(),
            message: err.to_string(),
        })?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let client = HttpClient::builder()
                    .timeout(configuration().request_timeout)
                    .build()
                    .map_err(ResourceError::Transport)?;
                Arc::new(client) as Arc<dyn Transport>
            }
        };

        Ok(ResourceClient {
            inner: Arc::new(ClientInner {
                root,
                namespace: self.namespace,
                credential: self.credential,
                transport,
                registry: self.registry,
                default_headers: self.default_headers,
            }),
        })
    }
}

struct ClientInner {
    root: String,
    namespace: String,
    credential: Option<Credential>,
    transport: Arc<dyn Transport>,
    registry: TypeRegistry,
    default_headers: http::HeaderMap,
}

/// Entry point to a hypermedia API.
///
/// Cheap to clone; clones share the transport and the type registry.
///
/// ```ignore
/// let client = ResourceClient::builder("https://api.example.com")
///     .namespace("Api")
///     .credential("token")
///     .register(&MAINFRAME)
///     .build()?;
///
/// let mainframe = client.find(&MAINFRAME, "42", &Params::new()).await?;
/// ```
#[derive(Clone)]
pub struct ResourceClient {
    inner: Arc<ClientInner>,
}

impl ResourceClient {
    /// Create a builder.
    pub fn builder(root: impl Into<String>) -> ResourceClientBuilder {
        ResourceClientBuilder::new(root)
    }

    /// The API root, without a trailing slash.
    pub fn root(&self) -> &str {
        &self.inner.root
    }

    /// The default namespace.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// The default credential.
    pub fn credential(&self) -> Option<&Credential> {
        self.inner.credential.as_ref()
    }

    /// Headers sent with every request.
    pub fn default_headers(&self) -> &http::HeaderMap {
        &self.inner.default_headers
    }

    /// Registered resource variants.
    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    /// An unloaded generic node for `href`.
    pub fn node(&self, href: impl Into<String>) -> ResourceNode {
        self.node_of(&GENERIC_RESOURCE, href)
    }

    /// An unloaded node for `href`, declared as `resource_type`.
    pub fn node_of(
        &self,
        resource_type: &'static ResourceType,
        href: impl Into<String>,
    ) -> ResourceNode {
        ResourceNode::new(self.clone(), resource_type, href.into())
    }
}

impl fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("root", &self.inner.root)
            .field("namespace", &self.inner.namespace)
            .field("registered_types", &self.inner.registry.len())
            .finish_non_exhaustive()
    }
}
