use httpmock::{Method::GET, MockServer};
use hypixel_client::quota::UNKNOWN_REMAINING;
use hypixel_client::{
    GuildQuery, HypixelClient, HypixelError, RateGate, Request, RequestHooks, RequestOutcome,
    ResourceKind, Response,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

fn client_for(server: &MockServer) -> HypixelClient {
    HypixelClient::new("test-key").with_base_url(server.base_url())
}

#[tokio::test]
async fn authed_request_sends_key_and_learns_quota() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/player")
                .query_param("uuid", "abc")
                .header("api-key", "test-key");
            then.status(200)
                .header("RateLimit-Remaining", "119")
                .header("RateLimit-Reset", "42")
                .json_body(serde_json::json!({"success": true, "player": null}));
        })
        .await;

    let client = client_for(&server);
    let response = client.player("abc").await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 200);
    assert!(response.path.ends_with("/player?uuid=abc"));

    let gate = client.rate_gate().unwrap();
    assert_eq!(gate.quota().remaining, 119);
    assert!(gate.status().reset_at.is_some());
}

#[tokio::test]
async fn requests_carry_configured_user_agent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/counts")
                .header("user-agent", format!("hypixel-client/{}", env!("CARGO_PKG_VERSION")));
            then.status(200).json_body(serde_json::json!({"success": true}));
        })
        .await;

    let client = client_for(&server);
    let response = client.counts().await.unwrap();
    mock.assert_async().await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn throttled_response_forces_unknown_quota() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/counts");
            then.status(429)
                .header("RateLimit-Remaining", "5")
                .header("RateLimit-Reset", "30")
                .json_body(serde_json::json!({
                    "success": false,
                    "cause": "Too many requests in the last second",
                    "throttle": true
                }));
        })
        .await;

    let client = client_for(&server);
    let response = client.counts().await.unwrap();
    assert_eq!(response.status, 429);

    let gate = client.rate_gate().unwrap();
    assert_eq!(gate.quota().remaining, UNKNOWN_REMAINING);
    assert!(matches!(
        response.error_for_status(),
        Err(HypixelError::RateLimited {
            retry_after: Some(d)
        }) if d == Duration::from_secs(30)
    ));
}

#[tokio::test]
async fn zero_remaining_on_ok_response_is_not_stored_literally() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/guild").query_param("name", "Sirius");
            then.status(200)
                .header("RateLimit-Remaining", "0")
                .json_body(serde_json::json!({"success": false, "cause": "You have already looked up this name recently"}));
        })
        .await;

    let client = client_for(&server);
    client.guild(GuildQuery::Name("Sirius")).await.unwrap();
    assert_eq!(client.rate_gate().unwrap().quota().remaining, UNKNOWN_REMAINING);
}

#[tokio::test]
async fn public_resource_skips_key_and_decrements_locally() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/resources/skyblock/items");
            then.status(200)
                .json_body(serde_json::json!({"success": true, "items": []}));
        })
        .await;

    let client = client_for(&server);
    let gate = client.rate_gate().unwrap().clone();
    gate.update(&RequestOutcome::new(200).with_remaining("3")).unwrap();

    let response = client.resource(ResourceKind::SkyblockItems).await.unwrap();
    assert!(response.is_success());
    mock.assert_async().await;
    assert_eq!(gate.quota().remaining, 2);
}

#[tokio::test]
async fn malformed_header_does_not_fail_request() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/boosters");
            then.status(200)
                .header("RateLimit-Remaining", "plenty")
                .header("RateLimit-Reset", "10")
                .json_body(serde_json::json!({"success": true}));
        })
        .await;

    let client = client_for(&server);
    let gate = client.rate_gate().unwrap().clone();
    gate.update(&RequestOutcome::new(200).with_remaining("50")).unwrap();

    let response = client.boosters().await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(gate.quota().remaining, 50);
    assert!(gate.quota().reset_at.is_some());
}

#[tokio::test]
async fn exhausted_quota_delays_next_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/skyblock/bazaar");
            then.status(200)
                .header("RateLimit-Remaining", "0")
                .header("RateLimit-Reset", "1")
                .json_body(serde_json::json!({"success": true}));
        })
        .await;

    let client = client_for(&server);
    client.skyblock_bazaar().await.unwrap();

    let start = Instant::now();
    client.skyblock_bazaar().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(900));
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn shared_gate_is_visible_to_both_clients() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/leaderboards");
            then.status(200)
                .header("RateLimit-Remaining", "77")
                .json_body(serde_json::json!({"success": true}));
        })
        .await;

    let gate = RateGate::new();
    let a = client_for(&server).with_rate_gate(gate.clone());
    let b = client_for(&server).with_rate_gate(gate.clone());

    a.leaderboards().await.unwrap();
    assert_eq!(b.rate_gate().unwrap().quota().remaining, 77);

    let independent = client_for(&server);
    assert!(independent.rate_gate().unwrap().quota().is_unknown());
}

#[tokio::test]
async fn without_gate_nothing_is_tracked() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/punishmentstats");
            then.status(200)
                .header("RateLimit-Remaining", "10")
                .json_body(serde_json::json!({"success": true}));
        })
        .await;

    let client = client_for(&server).without_rate_gate();
    let response = client.punishment_stats().await.unwrap();
    assert!(response.is_success());
    assert!(client.rate_gate().is_none());
}

struct Canned;

impl RequestHooks for Canned {
    fn before_request(&self, _request: &Request, url: &Url) -> Option<Response> {
        Some(Response::new(url.as_str(), 200, br#"{"cached":true}"#.to_vec()))
    }
}

#[tokio::test]
async fn before_request_hook_short_circuits() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/skyblock/firesales");
            then.status(200).json_body(serde_json::json!({"success": true}));
        })
        .await;

    let client = client_for(&server).with_hooks(Arc::new(Canned));
    let response = client.skyblock_firesales().await.unwrap();

    assert_eq!(response.text(), r#"{"cached":true}"#);
    mock.assert_hits_async(0).await;
    assert_eq!(client.rate_gate().unwrap().timers_started(), 0);
}

#[derive(Default)]
struct Counting {
    seen: AtomicUsize,
}

impl RequestHooks for Counting {
    fn after_response(&self, request: &Request, mut response: Response) -> Response {
        self.seen.fetch_add(1, Ordering::SeqCst);
        if request.path == "housing/active" {
            response.content = b"[]".to_vec();
        }
        response
    }
}

#[tokio::test]
async fn after_response_hook_sees_network_responses() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/housing/active");
            then.status(200).json_body(serde_json::json!([{"uuid": "h1"}]));
        })
        .await;

    let hooks = Arc::new(Counting::default());
    let client = client_for(&server).with_hooks(hooks.clone());
    let response = client.housing_active().await.unwrap();

    assert_eq!(hooks.seen.load(Ordering::SeqCst), 1);
    assert_eq!(response.text(), "[]");
}

#[tokio::test]
async fn skyblock_auctions_sends_page() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/skyblock/auctions")
                .query_param("page", "3");
            then.status(200).json_body(serde_json::json!({"success": true, "page": 3}));
        })
        .await;

    let client = client_for(&server);
    let response = client.skyblock_auctions(3).await.unwrap();
    mock.assert_async().await;

    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["page"], 3);
}
