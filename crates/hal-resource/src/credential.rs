//! Bearer credentials.

use std::fmt;
use std::sync::Arc;

use crate::node::ResourceNode;

/// Attribute read from a token resource to obtain its bearer value.
pub const ACCESS_TOKEN_ATTRIBUTE: &str = "access_token";

/// An opaque token whose string form is the bearer value.
pub trait AccessToken: fmt::Display + fmt::Debug + Send + Sync {}

/// Credential sent as `Authorization: Bearer <token>`.
#[derive(Clone, Debug)]
pub enum Credential {
    /// A plain token string, used as-is.
    Bearer(String),
    /// An opaque token, resolved through its `Display` form.
    Token(Arc<dyn AccessToken>),
    /// A token resource, resolved through its `access_token` attribute.
    Resource(Box<ResourceNode>),
}

impl Credential {
    /// Resolve the bearer value, if there is one.
    pub fn bearer_token(&self) -> Option<String> {
        match self {
            Self::Bearer(token) => Some(token.clone()),
            Self::Token(token) => Some(token.to_string()),
            Self::Resource(node) => node
                .attribute(ACCESS_TOKEN_ATTRIBUTE)
                .and_then(|value| value.as_str())
                .map(str::to_string),
        }
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::Bearer(token.to_string())
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self::Bearer(token)
    }
}

impl From<ResourceNode> for Credential {
    fn from(node: ResourceNode) -> Self {
        Self::Resource(Box::new(node))
    }
}

impl<T: AccessToken + 'static> From<Arc<T>> for Credential {
    fn from(token: Arc<T>) -> Self {
        Self::Token(token)
    }
}
