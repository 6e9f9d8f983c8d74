//! Request parameters: body normalization and query encoding.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::credential::Credential;
use crate::node::ResourceNode;

/// Parameter keys that configure the request instead of being sent.
pub const RESERVED_KEYS: [&str; 4] = ["credential", "root", "namespace", "headers"];

/// A single parameter value.
#[derive(Clone, Debug)]
pub enum ParamValue {
    /// A JSON value, sent as-is.
    Value(Value),
    /// A resource, sent as its href.
    Resource(Box<ResourceNode>),
}

impl ParamValue {
    /// The JSON value sent on the wire.
    pub fn normalize(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Resource(node) => Value::String(node.href().to_string()),
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<ResourceNode> for ParamValue {
    fn from(node: ResourceNode) -> Self {
        Self::Resource(Box::new(node))
    }
}

impl From<&ResourceNode> for ParamValue {
    fn from(node: &ResourceNode) -> Self {
        Self::Resource(Box::new(node.clone()))
    }
}

/// An ordered parameter map.
///
/// Keys are kept sorted so encodings are deterministic.
#[derive(Clone, Debug, Default)]
pub struct Params {
    entries: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Body form: every resource value replaced by its href.
    pub fn normalize(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, value)| (key.clone(), value.normalize()))
            .collect();
        Value::Object(map)
    }

    /// Query form: reserved keys dropped, remaining pairs form-encoded in
    /// key order. Empty when nothing remains.
    pub fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            if is_reserved(key) {
                continue;
            }
            match value.normalize() {
                Value::Null => {}
                Value::String(s) => {
                    serializer.append_pair(key, &s);
                }
                Value::Array(items) => {
                    for item in items {
                        serializer.append_pair(&format!("{key}[]"), &scalar(&item));
                    }
                }
                other => {
                    serializer.append_pair(key, &scalar(&other));
                }
            }
        }
        serializer.finish()
    }

    /// Append [`Params::to_query`] to an href.
    pub fn apply_to(&self, href: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            href.to_string()
        } else if href.contains('?') {
            format!("{href}&{query}")
        } else {
            format!("{href}?{query}")
        }
    }

    /// The `credential` reserved key, if it holds a token.
    pub fn credential(&self) -> Option<Credential> {
        match self.entries.get("credential")? {
            ParamValue::Value(Value::String(token)) => Some(Credential::Bearer(token.clone())),
            ParamValue::Resource(node) => Some(Credential::Resource(node.clone())),
            ParamValue::Value(_) => None,
        }
    }

    /// The `root` reserved key.
    pub fn root(&self) -> Option<&str> {
        self.reserved_str("root")
    }

    /// The `namespace` reserved key.
    pub fn namespace(&self) -> Option<&str> {
        self.reserved_str("namespace")
    }

    /// The `headers` reserved key, as name/value pairs.
    pub fn headers(&self) -> Vec<(String, String)> {
        match self.entries.get("headers") {
            Some(ParamValue::Value(Value::Object(headers))) => headers
                .iter()
                .filter_map(|(name, value)| Some((name.clone(), value.as_str()?.to_string())))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn reserved_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            ParamValue::Value(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_is_sorted_and_excludes_reserved_keys() {
        let params = Params::new()
            .with("page", 2)
            .with("credential", "secret")
            .with("handle", "my app")
            .with("root", "https://other.example.com")
            .with("active", true);

        assert_eq!(params.to_query(), "active=true&handle=my+app&page=2");
    }

    #[test]
    fn arrays_repeat_the_key() {
        let params = Params::new().with("id", json!([1, 2]));
        assert_eq!(params.to_query(), "id%5B%5D=1&id%5B%5D=2");
    }

    #[test]
    fn apply_to_href() {
        let params = Params::new().with("test", 123);
        assert_eq!(params.apply_to("/mainframes/42"), "/mainframes/42?test=123");
        assert_eq!(params.apply_to("/mainframes?page=1"), "/mainframes?page=1&test=123");
        assert_eq!(Params::new().apply_to("/mainframes"), "/mainframes");
    }

    #[test]
    fn reserved_accessors() {
        let params = Params::new()
            .with("credential", "token")
            .with("namespace", "Billing")
            .with("headers", json!({"X-Request-Id": "abc", "X-Bad": 1}));

        assert_eq!(
            params.credential().and_then(|c| c.bearer_token()).as_deref(),
            Some("token")
        );
        assert_eq!(params.namespace(), Some("Billing"));
        assert_eq!(params.root(), None);
        assert_eq!(
            params.headers(),
            vec![("X-Request-Id".to_string(), "abc".to_string())]
        );
        assert_eq!(params.normalize(), json!({}));
    }
}
