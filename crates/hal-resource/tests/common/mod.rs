//! Shared fixtures: a scripted transport and a small resource schema.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use hal_resource::{
    HttpMethod, HttpRequest, HttpResponse, NetworkError, Relation, ResourceClient, ResourceType,
    Transport,
};
use parking_lot::Mutex;
use serde_json::Value;

pub const ROOT: &str = "https://api.example.com";

pub static ACCOUNT: ResourceType = ResourceType::new("Api", "Account").with_relations(&[
    Relation::has_many("mainframes").of("Mainframe"),
    Relation::belongs_to("owner"),
    Relation::embeds_one("billing_detail").of("BillingDetail"),
    Relation::embeds_many("tags"),
]);

pub static MAINFRAME: ResourceType = ResourceType::new("Api", "Mainframe").with_relations(&[
    Relation::belongs_to("account").of("Account"),
    Relation::has_one("image"),
    Relation::has_many("operations"),
]);

pub static BILLING_DETAIL: ResourceType = ResourceType::new("Api", "BillingDetail");

pub static OPERATION: ResourceType = ResourceType::new("Api", "Operation");

/// One scripted outcome.
#[derive(Clone, Debug)]
pub enum Reply {
    Json(u16, Value),
    Raw(u16, &'static str),
    Fail(NetworkError),
}

/// A request as the transport saw it.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: HttpMethod,
    pub url: String,
    pub headers: http::HeaderMap,
    pub body: Option<Value>,
}

/// Replies per (method, path). The last reply of a script repeats.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: HttpMethod, path: &str, replies: impl IntoIterator<Item = Reply>) {
        self.scripts
            .lock()
            .insert((method, path.to_string()), replies.into_iter().collect());
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method && path_of(&call.url) == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> hal_resource_net::Result<HttpResponse> {
        self.calls.lock().push(Recorded {
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request
                .body
                .as_ref()
                .and_then(|body| serde_json::from_slice(body).ok()),
        });

        let key = (request.method, path_of(&request.url));
        let reply = {
            let mut scripts = self.scripts.lock();
            match scripts.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply.unwrap_or(Reply::Raw(404, "")) {
            Reply::Json(status, body) => Ok(HttpResponse::new(
                status,
                http::HeaderMap::new(),
                body.to_string(),
            )),
            Reply::Raw(status, body) => Ok(HttpResponse::new(status, http::HeaderMap::new(), body)),
            Reply::Fail(err) => Err(err),
        }
    }
}

/// Path and query of an absolute URL.
pub fn path_of(url: &str) -> String {
    url.strip_prefix(ROOT).unwrap_or(url).to_string()
}

pub fn client(transport: Arc<ScriptedTransport>) -> ResourceClient {
    ResourceClient::builder(ROOT)
        .namespace("Api")
        .transport(transport)
        .register(&ACCOUNT)
        .register(&MAINFRAME)
        .register(&BILLING_DETAIL)
        .register(&OPERATION)
        .build()
        .unwrap()
}
