//! Lazy relation loading, embedded relations and type hint resolution.

mod common;

use common::{ACCOUNT, BILLING_DETAIL, MAINFRAME, OPERATION, Reply, ScriptedTransport, client};
use futures_util::TryStreamExt;
use hal_resource::{
    HttpMethod, LoadState, Params, RelationKind, Resource, ResourceError, ResourceNode,
    ResourceType,
};
use serde_json::{Value, json};

fn account_document() -> Value {
    json!({
        "_type": "account",
        "id": 1,
        "handle": "acme",
        "_links": {
            "self": {"href": "/accounts/1"},
            "mainframes": {"href": "/accounts/1/mainframes{?page}"},
            "owner": {"href": "https://api.example.com/users/9"}
        },
        "_embedded": {
            "billing_detail": {"id": 3, "plan": "production"},
            "tags": [{"name": "a"}, {"name": "b"}]
        }
    })
}

fn mainframes_page() -> Value {
    json!({
        "_embedded": {
            "mainframes": [
                {"_type": "mainframe", "id": 10},
                {"id": 11}
            ]
        }
    })
}

fn scripted() -> std::sync::Arc<ScriptedTransport> {
    let transport = ScriptedTransport::new();
    transport.on(HttpMethod::Get, "/accounts/1", [Reply::Json(200, account_document())]);
    transport.on(
        HttpMethod::Get,
        "/accounts/1/mainframes",
        [Reply::Json(200, mainframes_page())],
    );
    transport.on(
        HttpMethod::Get,
        "/users/9",
        [Reply::Json(200, json!({"id": 9, "email": "ops@acme.test"}))],
    );
    transport
}

#[tokio::test]
async fn accessing_a_relation_loads_the_node_first() {
    let transport = scripted();
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");
    assert_eq!(account.state(), LoadState::Unloaded);

    let owner = account.related("owner").await.unwrap().unwrap();
    assert_eq!(owner.attribute("email"), Some(&json!("ops@acme.test")));
    assert_eq!(owner.href(), "/users/9");

    assert!(account.is_loaded());
    assert_eq!(account.attribute("handle"), Some(&json!("acme")));
    assert_eq!(transport.count(HttpMethod::Get, "/accounts/1"), 1);
    assert_eq!(transport.count(HttpMethod::Get, "/users/9"), 1);
}

#[tokio::test]
async fn single_relations_are_memoized_per_node() {
    let transport = scripted();
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");

    account.related("owner").await.unwrap();
    account.related("owner").await.unwrap();
    assert_eq!(transport.count(HttpMethod::Get, "/users/9"), 1);

    let mut other = client.node_of(&ACCOUNT, "/accounts/1");
    other.related("owner").await.unwrap();
    assert_eq!(transport.count(HttpMethod::Get, "/users/9"), 2);
}

#[tokio::test]
async fn missing_link_yields_nothing() {
    let transport = ScriptedTransport::new();
    transport.on(
        HttpMethod::Get,
        "/mainframes/10",
        [Reply::Json(200, json!({"_type": "mainframe", "id": 10}))],
    );
    let client = client(transport.clone());
    let mut mainframe = client.node_of(&MAINFRAME, "/mainframes/10");

    assert!(mainframe.related("account").await.unwrap().is_none());
    assert!(mainframe.related("image").await.unwrap().is_none());
    assert!(mainframe.related_many("operations").await.unwrap().is_none());
}

#[tokio::test]
async fn has_many_depaginates_from_the_base_href() {
    let transport = scripted();
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");

    let mainframes = account.related_many("mainframes").await.unwrap().unwrap();
    assert_eq!(mainframes.len(), 2);
    assert!(mainframes.iter().all(|node| node.resource_type() == &MAINFRAME));

    account.related_many("mainframes").await.unwrap();
    assert_eq!(transport.count(HttpMethod::Get, "/accounts/1/mainframes"), 1);
}

#[tokio::test]
async fn has_many_stream_is_not_memoized() {
    let transport = scripted();
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");

    for _ in 0..2 {
        let entries: Vec<_> = account
            .related_stream("mainframes")
            .await
            .unwrap()
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }
    assert_eq!(transport.count(HttpMethod::Get, "/accounts/1/mainframes"), 2);
}

#[tokio::test]
async fn embedded_relations_need_no_fetch() {
    let transport = scripted();
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");

    let detail = account.embedded_one("billing_detail").await.unwrap().unwrap();
    assert_eq!(detail.resource_type(), &BILLING_DETAIL);
    assert_eq!(detail.attribute("plan"), Some(&json!("production")));
    assert!(detail.is_loaded());

    let tags = account.embedded_many("tags").await.unwrap().unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags[0].resource_type().is_generic());

    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn generic_relation_resolves_through_type_hint() {
    static HOST: ResourceType = ResourceType::new("Api", "Host")
        .with_relations(&[hal_resource::Relation::belongs_to("mainframe")]);

    let transport = ScriptedTransport::new();
    transport.on(
        HttpMethod::Get,
        "/hosts/1",
        [Reply::Json(200, json!({"_links": {"mainframe": {"href": "/mainframes/1"}}}))],
    );
    transport.on(
        HttpMethod::Get,
        "/mainframes/1",
        [Reply::Json(200, json!({"_type": "mainframe", "id": 1}))],
    );
    let client = client(transport.clone());
    let mut host = client.node_of(&HOST, "/hosts/1");

    let mainframe = host.related("mainframe").await.unwrap().unwrap();
    assert_eq!(mainframe.resource_type(), &MAINFRAME);
    assert!(!mainframe.resource_type().is_generic());
}

#[tokio::test]
async fn unregistered_hint_keeps_the_declared_type() {
    let transport = ScriptedTransport::new();
    transport.on(
        HttpMethod::Get,
        "/operations/5",
        [Reply::Json(200, json!({"_type": "toaster", "id": 5}))],
    );
    let client = client(transport.clone());

    let operation = client
        .find(&OPERATION, 5, &Params::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(operation.resource_type(), &OPERATION);
}

#[tokio::test]
async fn undeclared_relations_are_rejected() {
    let transport = scripted();
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");

    let err = account.related("mainframes").await.unwrap_err();
    assert!(matches!(
        err,
        ResourceError::UndeclaredRelation {
            expected: RelationKind::BelongsTo,
            ..
        }
    ));
    assert!(account.related_many("nope").await.is_err());
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn failed_load_can_be_retried_by_a_later_access() {
    let transport = ScriptedTransport::new();
    transport.on(
        HttpMethod::Get,
        "/accounts/1",
        [Reply::Json(403, json!({"error": "forbidden"})), Reply::Json(200, account_document())],
    );
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");

    assert!(account.embedded_one("billing_detail").await.is_err());
    assert_eq!(account.state(), LoadState::Failed);

    assert!(account.embedded_one("billing_detail").await.unwrap().is_some());
    assert_eq!(account.state(), LoadState::Loaded);
}

#[tokio::test]
async fn create_related_posts_hrefs_of_resource_params() {
    let transport = scripted();
    transport.on(
        HttpMethod::Post,
        "/accounts/1/mainframes",
        [Reply::Json(
            201,
            json!({"_type": "mainframe", "id": 12, "_links": {"self": {"href": "/mainframes/12"}}}),
        )],
    );
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");
    let owner = client.node("/users/9");

    let created = account
        .create_related("mainframes", &Params::new().with("handle", "new").with("owner", &owner))
        .await
        .unwrap();

    assert_eq!(created.href(), "/mainframes/12");
    assert_eq!(created.resource_type(), &MAINFRAME);
    let post = transport
        .calls()
        .into_iter()
        .find(|call| call.method == HttpMethod::Post)
        .unwrap();
    assert_eq!(post.body, Some(json!({"handle": "new", "owner": "/users/9"})));
}

#[tokio::test]
async fn try_create_related_records_rejections() {
    let transport = scripted();
    transport.on(
        HttpMethod::Post,
        "/accounts/1/mainframes",
        [Reply::Json(
            422,
            json!({"error": "unprocessable_entity", "message": "Handle is taken"}),
        )],
    );
    let client = client(transport.clone());
    let mut account = client.node_of(&ACCOUNT, "/accounts/1");

    let created = account
        .try_create_related("mainframes", &Params::new().with("handle", "dup"))
        .await
        .unwrap();

    assert!(!created.is_loaded());
    assert!(created.errors().any());
    assert_eq!(created.errors().status_code, Some(422));
    assert_eq!(created.errors().base(), Some("Handle is taken"));
}

struct Mainframe(ResourceNode);

impl Resource for Mainframe {
    fn resource_type() -> &'static ResourceType {
        &MAINFRAME
    }
    fn from_node(node: ResourceNode) -> Self {
        Self(node)
    }
    fn node(&self) -> &ResourceNode {
        &self.0
    }
    fn node_mut(&mut self) -> &mut ResourceNode {
        &mut self.0
    }
}

#[tokio::test]
async fn resolved_nodes_convert_to_typed_views() {
    let transport = scripted();
    let client = client(transport.clone());

    let mut account = client.node_of(&ACCOUNT, "/accounts/1");
    let first = account.related_many("mainframes").await.unwrap().unwrap()[0].clone();

    let typed = first.into_typed::<Mainframe>().unwrap();
    assert_eq!(typed.node().attribute("id"), Some(&json!(10)));
}

#[tokio::test]
async fn bodiless_update_keeps_links_for_later_relations() {
    let transport = scripted();
    transport.on(HttpMethod::Put, "/accounts/1", [Reply::Raw(204, "")]);
    let client = client(transport.clone());

    let mut account = client.node_of(&ACCOUNT, "/accounts/1");
    account.get().await.unwrap();
    account
        .update(&Params::new().with("handle", "renamed"))
        .await
        .unwrap();

    assert!(account.is_loaded());
    assert_eq!(account.attribute("handle"), Some(&json!("acme")));
    let owner = account.related("owner").await.unwrap().unwrap();
    assert_eq!(owner.href(), "/users/9");
    assert_eq!(transport.count(HttpMethod::Get, "/users/9"), 1);
}

#[tokio::test]
async fn bodiless_reply_leaves_an_unloaded_node_unloaded() {
    let transport = scripted();
    transport.on(HttpMethod::Put, "/accounts/1", [Reply::Raw(204, "")]);
    let client = client(transport.clone());

    let mut account = client.node_of(&ACCOUNT, "/accounts/1");
    account
        .update(&Params::new().with("handle", "renamed"))
        .await
        .unwrap();
    assert_eq!(account.state(), LoadState::Unloaded);

    account.related("owner").await.unwrap().unwrap();
    assert_eq!(transport.count(HttpMethod::Get, "/accounts/1"), 1);
}
