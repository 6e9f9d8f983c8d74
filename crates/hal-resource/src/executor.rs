//! Request execution and the retry loop.

use bytes::Bytes;
use futures_util::future::BoxFuture;
use hal_resource_net::{HttpMethod, HttpRequest};
use http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;

use crate::config::{Configuration, configuration, current_retry_coordinator};
use crate::credential::Credential;
use crate::document;
use crate::error::{ResourceError, Result, classify_response, classify_transport};
use crate::logging::targets;
use crate::node::{LoadState, ResourceNode};

/// Hard ceiling on attempts per logical request, whatever the coordinator
/// decides.
pub const MAX_ATTEMPTS: u32 = 16;

/// Run one logical request against `node` and load the response into it.
///
/// Every attempt rebuilds the URL and headers from the node. Failed
/// attempts are offered to a coordinator created for this call only.
///
/// Boxed because loading a token resource credential runs a request of its
/// own through here.
pub(crate) fn execute(
    node: &mut ResourceNode,
    method: HttpMethod,
    body: Option<Value>,
) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        load_token_resource(node).await?;
        send_with_retry(node, method, body).await
    })
}

/// Fetch a token resource credential that has no bearer value yet.
async fn load_token_resource(node: &mut ResourceNode) -> Result<()> {
    let Some(credential) = node.credential_mut() else {
        return Ok(());
    };
    if credential.bearer_token().is_some() {
        return Ok(());
    }
    if let Credential::Resource(token) = credential
        && !token.is_loaded()
    {
        tracing::debug!(
            target: targets::EXECUTOR,
            href = %token.href(),
            "loading token resource"
        );
        token.get().await?;
    }
    Ok(())
}

async fn send_with_retry(
    node: &mut ResourceNode,
    method: HttpMethod,
    body: Option<Value>,
) -> Result<()> {
    let config = configuration();
    let factory = current_retry_coordinator();
    let mut coordinator = factory(node);

    let payload = body
        .map(|body| serde_json::to_vec(&body).map(Bytes::from))
        .transpose()
        .map_err(ResourceError::Serialize)?;

    let mut attempts = 0;
    loop {
        let request = build_request(node, method, payload.as_ref(), &config)?;
        let url = request.url.clone();

        tracing::debug!(
            target: targets::EXECUTOR,
            %method,
            %url,
            attempt = attempts + 1,
            "sending request"
        );

        let outcome = match node.client().transport().send(request).await {
            Ok(response) => classify_response(&response),
            Err(err) => Err(classify_transport(method, &url, err)),
        };

        let error = match outcome {
            Ok(body) => {
                document::apply(node, body);
                return Ok(());
            }
            Err(error) => error,
        };

        attempts += 1;
        if node.state != LoadState::Loaded {
            node.state = LoadState::Failed;
        }

        if attempts >= MAX_ATTEMPTS {
            tracing::warn!(
                target: targets::EXECUTOR,
                %method,
                %url,
                attempts,
                "giving up after maximum attempts"
            );
            return Err(error);
        }

        if !coordinator.should_retry(method, &error).await {
            tracing::debug!(
                target: targets::EXECUTOR,
                %method,
                %url,
                attempts,
                error = %error,
                "request failed"
            );
            return Err(error);
        }
    }
}

fn build_request(
    node: &ResourceNode,
    method: HttpMethod,
    payload: Option<&Bytes>,
    config: &Configuration,
) -> Result<HttpRequest> {
    let mut request = HttpRequest::new(method, node.url()?)
        .header(CONTENT_TYPE, "application/json")
        .timeout(config.request_timeout);

    for (name, value) in node.headers() {
        request.headers.insert(name.clone(), value.clone());
    }
    request = request.header(USER_AGENT, config.user_agent.as_str());

    if let Some(credential) = node.credential() {
        let token = credential
            .bearer_token()
            .ok_or_else(|| ResourceError::MissingCredential {
                href: node.href().to_string(),
            })?;
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(payload) = payload {
        request = request.body(payload.clone());
    }

    Ok(request)
}
