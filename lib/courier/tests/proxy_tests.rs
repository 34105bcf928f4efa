//! Integration tests for the contract proxy using wiremock.
//!
//! A `PetApi` trait plays the decorated interface; `PetApiClient` is the one
//! concrete implementing type delegating every method to the proxy.

use courier::prelude::*;
use courier::{InvocationFns, MessageAwareErrorDecoder, Param};
use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Pet {
    id: u64,
    name: String,
}

/// The decorated interface: deferred single values and lazy streams.
trait PetApi {
    fn get_pet(&self, id: u64) -> BoxFuture<'_, courier::Result<Pet>>;
    fn find_pets(
        &self,
        tag: String,
        limit: Option<u32>,
    ) -> BoxFuture<'_, courier::Result<Vec<Pet>>>;
    fn create_pet(&self, pet: Pet) -> BoxFuture<'_, courier::Result<Pet>>;
    fn delete_pet(&self, id: u64) -> BoxFuture<'_, courier::Result<()>>;
    fn watch_pets(&self) -> BoxFuture<'_, courier::Result<BoxStream<'static, courier::Result<Pet>>>>;
}

fn pet_contract() -> courier::Result<Contract> {
    Contract::builder::<dyn PetApi>()
        .base_path("/v2")
        .method(
            MethodContract::get("get_pet", "/pets/{id}")
                .param(Param::path("id", "u64"))
                .produces(ContentType::Json),
        )
        .method(
            MethodContract::get("find_pets", "/pets")
                .param(Param::query("tag", "String"))
                .param(Param::query("limit", "Option<u32>"))
                .produces(ContentType::Json),
        )
        .method(
            MethodContract::post("create_pet", "/pets")
                .param(Param::body("pet", "Pet"))
                .consumes(ContentType::Json)
                .produces(ContentType::Json),
        )
        .method(
            MethodContract::delete("delete_pet", "/pets/{id}")
                .param(Param::path("id", "u64"))
                .returns(ReturnKind::Unit),
        )
        .method(
            MethodContract::get("watch_pets", "/pets/feed")
                .produces(ContentType::JsonLines)
                .returns(ReturnKind::Many),
        )
        .build()
}

/// One concrete implementing type per decorated interface.
struct PetApiClient {
    proxy: Proxy<HyperClient>,
    get_pet: MethodDescriptor,
    find_pets: MethodDescriptor,
    create_pet: MethodDescriptor,
    delete_pet: MethodDescriptor,
    watch_pets: MethodDescriptor,
}

impl PetApiClient {
    fn new(base_url: &str) -> courier::Result<Self> {
        let proxy = ProxyBuilder::new()
            .client(HyperClient::new())
            .base_url(base_url)
            .common_fns(InvocationFns::standard())
            .build(pet_contract()?)?;

        Ok(Self {
            proxy,
            get_pet: MethodDescriptor::new("get_pet", ["u64"]),
            find_pets: MethodDescriptor::new("find_pets", ["String", "Option<u32>"]),
            create_pet: MethodDescriptor::new("create_pet", ["Pet"]),
            delete_pet: MethodDescriptor::new("delete_pet", ["u64"]),
            watch_pets: MethodDescriptor::new("watch_pets", Vec::<String>::new()),
        })
    }
}

impl PetApi for PetApiClient {
    fn get_pet(&self, id: u64) -> BoxFuture<'_, courier::Result<Pet>> {
        Box::pin(async move { self.proxy.invoke(&self.get_pet, vec![id.into()]).await })
    }

    fn find_pets(
        &self,
        tag: String,
        limit: Option<u32>,
    ) -> BoxFuture<'_, courier::Result<Vec<Pet>>> {
        Box::pin(async move {
            self.proxy
                .invoke(&self.find_pets, vec![tag.into(), limit.into()])
                .await
        })
    }

    fn create_pet(&self, pet: Pet) -> BoxFuture<'_, courier::Result<Pet>> {
        Box::pin(async move {
            let body = ArgValue::json(&pet)?;
            self.proxy.invoke(&self.create_pet, vec![body]).await
        })
    }

    fn delete_pet(&self, id: u64) -> BoxFuture<'_, courier::Result<()>> {
        Box::pin(async move { self.proxy.invoke_unit(&self.delete_pet, vec![id.into()]).await })
    }

    fn watch_pets(
        &self,
    ) -> BoxFuture<'_, courier::Result<BoxStream<'static, courier::Result<Pet>>>> {
        Box::pin(async move { self.proxy.invoke_stream(&self.watch_pets, vec![]).await })
    }
}

#[tokio::test]
async fn get_resolves_path_and_accept_header() {
    let server = MockServer::start().await;
    let pet = Pet {
        id: 7,
        name: "Rex".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/v2/pets/7"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&pet))
        .mount(&server)
        .await;

    let client = PetApiClient::new(&server.uri()).expect("client");
    let fetched = client.get_pet(7).await.expect("pet");
    assert_eq!(fetched, pet);
}

#[tokio::test]
async fn query_parameters_skip_absent_optionals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/pets"))
        .and(query_param("tag", "small"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![Pet {
            id: 1,
            name: "Mia".to_string(),
        }]))
        .mount(&server)
        .await;

    let client = PetApiClient::new(&server.uri()).expect("client");
    let pets = client.find_pets("small".to_string(), None).await.expect("pets");
    assert_eq!(pets.len(), 1);
}

#[tokio::test]
async fn post_serializes_json_body() {
    let server = MockServer::start().await;
    let pet = Pet {
        id: 0,
        name: "Blue".to_string(),
    };
    let created = Pet {
        id: 99,
        name: "Blue".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/v2/pets"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&pet))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&server)
        .await;

    let client = PetApiClient::new(&server.uri()).expect("client");
    let result = client.create_pet(pet).await.expect("created");
    assert_eq!(result, created);
}

#[tokio::test]
async fn delete_discards_payload() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/pets/5"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = PetApiClient::new(&server.uri()).expect("client");
    client.delete_pet(5).await.expect("deleted");
}

#[tokio::test]
async fn rejected_status_decodes_domain_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/pets/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "no such pet",
            "errorCode": "PET404",
        })))
        .mount(&server)
        .await;

    let client = PetApiClient::new(&server.uri()).expect("client");
    let err = client.get_pet(404).await.expect_err("rejected");

    assert_eq!(err.status(), Some(404));
    assert!(err.is_client_error());
    let rest = err.rest_error().expect("rest error");
    assert_eq!(rest.message.as_deref(), Some("no such pet"));
    assert_eq!(rest.error_code.as_deref(), Some("PET404"));
}

#[tokio::test]
async fn streaming_method_yields_lazy_records() {
    let server = MockServer::start().await;
    let feed = "{\"id\":1,\"name\":\"Rex\"}\n{\"id\":2,\"name\":\"Mia\"}\n{\"id\":3,\"name\":\"Blue\"}\n";

    Mock::given(method("GET"))
        .and(path("/v2/pets/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(feed, "application/x-ndjson"))
        .mount(&server)
        .await;

    let client = PetApiClient::new(&server.uri()).expect("client");
    let stream = client.watch_pets().await.expect("stream");
    let pets: Vec<Pet> = stream
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .map(|r| r.expect("record"))
        .collect();

    assert_eq!(pets.len(), 3);
    assert_eq!(pets.first().map(|p| p.name.as_str()), Some("Rex"));
    assert_eq!(pets.last().map(|p| p.id), Some(3));
}

#[tokio::test]
async fn method_fns_override_common_decoder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/pets/1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&server)
        .await;

    let proxy = ProxyBuilder::new()
        .client(HyperClient::new())
        .base_url(server.uri())
        .common_fns(InvocationFns::standard())
        .method_fns(
            MethodDescriptor::new("get_pet", ["u64"]),
            InvocationFns::builder()
                .error_decoder(MessageAwareErrorDecoder::with_error_code("UNAVAILABLE"))
                .build(),
        )
        .build(pet_contract().expect("contract"))
        .expect("proxy");

    let err = proxy
        .invoke::<Pet>(&MethodDescriptor::new("get_pet", ["u64"]), vec![1_u64.into()])
        .await
        .expect_err("rejected");

    assert_eq!(err.status(), Some(503));
    let rest = err.rest_error().expect("rest error");
    assert_eq!(rest.message.as_deref(), Some("maintenance window"));
    assert_eq!(rest.error_code.as_deref(), Some("UNAVAILABLE"));
}

#[tokio::test]
async fn header_and_cookie_bindings_reach_the_wire() {
    trait SessionApi {}

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("X-Request-Id", "req-42"))
        .and(header("Cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let contract = Contract::builder::<dyn SessionApi>()
        .method(
            MethodContract::get("profile", "/profile")
                .param(Param::header("X-Request-Id", "String"))
                .param(Param::cookie("session", "String")),
        )
        .build()
        .expect("contract");

    let proxy = ProxyBuilder::new()
        .client(HyperClient::new())
        .base_url(server.uri())
        .common_fns(InvocationFns::standard())
        .build(contract)
        .expect("proxy");

    let value: serde_json::Value = proxy
        .invoke(
            &MethodDescriptor::new("profile", ["String", "String"]),
            vec!["req-42".into(), "abc123".into()],
        )
        .await
        .expect("profile");
    assert_eq!(value, serde_json::json!({"ok": true}));
}

#[tokio::test]
async fn form_bodies_follow_declared_content_type() {
    trait LoginApi {}

    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t"})))
        .mount(&server)
        .await;

    let contract = Contract::builder::<dyn LoginApi>()
        .method(
            MethodContract::post("login", "/login")
                .consumes(ContentType::FormUrlEncoded)
                .param(Param::body("credentials", "Credentials")),
        )
        .build()
        .expect("contract");

    let proxy = ProxyBuilder::new()
        .client(HyperClient::new())
        .base_url(server.uri())
        .common_fns(InvocationFns::standard())
        .build(contract)
        .expect("proxy");

    let response: serde_json::Value = proxy
        .invoke(
            &MethodDescriptor::new("login", ["Credentials"]),
            vec![ArgValue::Json(serde_json::json!({
                "username": "alice",
                "password": "secret",
            }))],
        )
        .await
        .expect("login");
    assert_eq!(response, serde_json::json!({"token": "t"}));
}

#[tokio::test]
async fn incomplete_bundle_fails_at_proxy_build() {
    let err = ProxyBuilder::new()
        .client(HyperClient::new())
        .base_url("http://localhost:9")
        .common_fns(InvocationFns::builder().build())
        .build(pet_contract().expect("contract"))
        .expect_err("incomplete bundle");

    assert!(err.is_contract());
    assert!(err.to_string().contains("no uri builder configured"));
}
