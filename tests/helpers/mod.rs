#![allow(dead_code)]

//! In-process stand-in for the broker's management API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use parking_lot::Mutex;
use rabbit_mgmt::{ClientConfig, ManagementClient};
use serde_json::{json, Value};

pub const USER: &str = "guest";
pub const PASSWORD: &str = "guest";
/// `Basic base64("guest:guest")`
const EXPECTED_AUTH: &str = "Basic Z3Vlc3Q6Z3Vlc3Q=";

pub const NODE_1: &str = "rabbit@node-1";
pub const NODE_2: &str = "rabbit@node-2";
/// Node name the mock answers with a 503.
pub const CRASHING_NODE: &str = "rabbit@crashing";

// ========================================
// STATE
// ========================================

pub struct BrokerState {
    pub nodes: Mutex<Vec<Value>>,
    pub connections: Mutex<Vec<Value>>,
    pub channels: Mutex<Vec<Value>>,
    pub close_requests: Mutex<Vec<(String, Option<String>)>>,
    /// How long a connection lingers after its close was accepted.
    pub close_delay: Duration,
    pub overview_delay: Mutex<Duration>,
}

impl BrokerState {
    fn new(close_delay: Duration) -> Self {
        Self {
            nodes: Mutex::new(vec![node_fixture(NODE_1, "disc"), node_fixture(NODE_2, "ram")]),
            connections: Mutex::new(Vec::new()),
            channels: Mutex::new(Vec::new()),
            close_requests: Mutex::new(Vec::new()),
            close_delay,
            overview_delay: Mutex::new(Duration::ZERO),
        }
    }

    /// Registers a connection and `channels` channels on it, returning the
    /// connection name.
    pub fn open_connection(&self, peer_port: u16, channels: u64) -> String {
        let name = format!("127.0.0.1:{} -> 127.0.0.1:5672", peer_port);
        self.connections
            .lock()
            .push(connection_fixture(&name, peer_port, channels));
        let mut all = self.channels.lock();
        for number in 1..=channels {
            all.push(channel_fixture(&name, number));
        }
        name
    }
}

pub struct TestBroker {
    pub base_url: String,
    pub state: Arc<BrokerState>,
}

impl TestBroker {
    pub fn client(&self) -> ManagementClient {
        self.client_as(USER, PASSWORD)
    }

    pub fn client_as(&self, user: &str, password: &str) -> ManagementClient {
        ManagementClient::new(ClientConfig::new(&self.base_url, user, password)).unwrap()
    }
}

pub async fn spawn_broker() -> TestBroker {
    spawn_broker_with_close_delay(Duration::from_millis(150)).await
}

pub async fn spawn_broker_with_close_delay(close_delay: Duration) -> TestBroker {
    let state = Arc::new(BrokerState::new(close_delay));

    let app = Router::new()
        .route("/api/overview", get(overview))
        .route("/api/whoami", get(whoami))
        .route("/api/aliveness-test/{vhost}", get(aliveness))
        .route("/api/nodes", get(nodes))
        .route("/api/nodes/{name}", get(node))
        .route("/api/connections", get(connections))
        .route("/api/connections/{name}", get(connection).delete(close_connection))
        .route("/api/connections/{name}/channels", get(connection_channels))
        .route("/api/channels", get(channels))
        .route("/api/channels/{name}", get(channel))
        .route("/api/vhosts", get(vhosts))
        .route("/api/vhosts/{name}", get(vhost))
        .route("/api/queues", get(queues))
        .route("/api/queues/{vhost}", get(queues_in))
        .route("/api/queues/{vhost}/{name}", get(queue))
        .layer(middleware::from_fn(require_auth))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBroker {
        base_url: format!("http://{}/api/", addr),
        state,
    }
}

/// An address nothing listens on.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/", addr)
}

/// Polls `check` until it holds or `within` elapses.
pub async fn eventually<F, Fut>(within: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}

// ========================================
// HANDLERS
// ========================================

type Shared = State<Arc<BrokerState>>;

async fn require_auth(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(EXPECTED_AUTH);
    if !authorized {
        return error_response(StatusCode::UNAUTHORIZED, "not_authorised", "Login failed");
    }
    next.run(request).await
}

fn error_response(status: StatusCode, error: &str, reason: &str) -> Response {
    (status, Json(json!({ "error": error, "reason": reason }))).into_response()
}

fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Object Not Found", "Not Found")
}

fn find_by_name(items: &[Value], name: &str) -> Option<Value> {
    items.iter().find(|v| v["name"] == name).cloned()
}

async fn overview(State(state): Shared) -> Response {
    let delay = *state.overview_delay.lock();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let connections = state.connections.lock().len();
    let channels = state.channels.lock().len();
    Json(overview_fixture(connections as u64, channels as u64)).into_response()
}

async fn whoami() -> Response {
    Json(json!({ "name": USER, "tags": "administrator" })).into_response()
}

async fn aliveness(Path(vhost): Path<String>) -> Response {
    match vhost.as_str() {
        "/" | "staging" => Json(json!({ "status": "ok" })).into_response(),
        "degraded" => Json(json!({ "status": "failed", "reason": "queue timeout" })).into_response(),
        "broken" => error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal", "vhost supervisor down"),
        _ => not_found(),
    }
}

async fn nodes(State(state): Shared) -> Response {
    Json(Value::Array(state.nodes.lock().clone())).into_response()
}

async fn node(State(state): Shared, Path(name): Path<String>) -> Response {
    if name == CRASHING_NODE {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "unavailable", "node is down");
    }
    match find_by_name(&state.nodes.lock(), &name) {
        Some(node) => Json(node).into_response(),
        None => not_found(),
    }
}

async fn connections(State(state): Shared) -> Response {
    Json(Value::Array(state.connections.lock().clone())).into_response()
}

async fn connection(State(state): Shared, Path(name): Path<String>) -> Response {
    match find_by_name(&state.connections.lock(), &name) {
        Some(conn) => Json(conn).into_response(),
        None => not_found(),
    }
}

async fn close_connection(
    State(state): Shared,
    Path(name): Path<String>,
    headers: axum::http::HeaderMap,
) -> Response {
    if find_by_name(&state.connections.lock(), &name).is_none() {
        return not_found();
    }
    let reason = headers
        .get("x-reason")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.close_requests.lock().push((name.clone(), reason));

    // The broker acknowledges first and tears the connection down later.
    let lingering = state.clone();
    tokio::spawn(async move {
        tokio::time::sleep(lingering.close_delay).await;
        lingering.connections.lock().retain(|c| c["name"] != name.as_str());
        lingering
            .channels
            .lock()
            .retain(|c| c["connection_details"]["name"] != name.as_str());
    });

    StatusCode::NO_CONTENT.into_response()
}

async fn connection_channels(State(state): Shared, Path(name): Path<String>) -> Response {
    if find_by_name(&state.connections.lock(), &name).is_none() {
        return not_found();
    }
    let owned: Vec<Value> = state
        .channels
        .lock()
        .iter()
        .filter(|c| c["connection_details"]["name"] == name.as_str())
        .cloned()
        .collect();
    Json(Value::Array(owned)).into_response()
}

async fn channels(State(state): Shared) -> Response {
    Json(Value::Array(state.channels.lock().clone())).into_response()
}

async fn channel(State(state): Shared, Path(name): Path<String>) -> Response {
    match find_by_name(&state.channels.lock(), &name) {
        Some(ch) => Json(ch).into_response(),
        None => not_found(),
    }
}

async fn vhosts() -> Response {
    Json(json!([vhost_fixture("/"), vhost_fixture("staging")])).into_response()
}

async fn vhost(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "/" | "staging" => Json(vhost_fixture(&name)).into_response(),
        _ => not_found(),
    }
}

async fn queues() -> Response {
    Json(Value::Array(queue_fixtures())).into_response()
}

async fn queues_in(Path(vhost): Path<String>) -> Response {
    let scoped: Vec<Value> = queue_fixtures()
        .into_iter()
        .filter(|q| q["vhost"] == vhost.as_str())
        .collect();
    Json(Value::Array(scoped)).into_response()
}

async fn queue(Path((vhost, name)): Path<(String, String)>) -> Response {
    match queue_fixtures()
        .into_iter()
        .find(|q| q["vhost"] == vhost.as_str() && q["name"] == name.as_str())
    {
        Some(q) => Json(q).into_response(),
        None => not_found(),
    }
}

// ========================================
// FIXTURES
// ========================================

pub fn overview_fixture(connections: u64, channels: u64) -> Value {
    json!({
        "management_version": "3.12.4",
        "rabbitmq_version": "3.12.4",
        "cluster_name": "rabbit@node-1",
        "erlang_version": "26.0.2",
        "erlang_full_version": "Erlang/OTP 26 [erts-14.0.2] [64-bit]",
        "statistics_db_node": NODE_1,
        "node": NODE_1,
        "message_stats": {
            "publish": 1042,
            "publish_details": { "rate": 3.2 },
            "deliver_get": 1000,
            "deliver_get_details": { "rate": 3.0 },
            "confirm": 1042,
            "confirm_details": { "rate": 3.2 },
            "return_unroutable": 0,
            "return_unroutable_details": { "rate": 0.0 }
        },
        "queue_totals": {
            "messages": 42,
            "messages_ready": 40,
            "messages_unacknowledged": 2
        },
        "object_totals": {
            "connections": connections,
            "channels": channels,
            "exchanges": 8,
            "queues": 3,
            "consumers": 0
        },
        "listeners": [
            { "node": NODE_1, "protocol": "amqp", "ip_address": "::", "port": 5672 },
            { "node": NODE_1, "protocol": "clustering", "ip_address": "::", "port": 25672 },
            { "node": NODE_1, "protocol": "http", "ip_address": "::", "port": 15672 }
        ],
        "contexts": [
            { "node": NODE_1, "description": "RabbitMQ Management", "path": "/", "port": "15672" }
        ],
        "exchange_types": [
            { "name": "direct", "description": "AMQP direct exchange, as per the AMQP specification", "enabled": true },
            { "name": "fanout", "description": "AMQP fanout exchange, as per the AMQP specification", "enabled": true },
            { "name": "headers", "description": "AMQP headers exchange, as per the AMQP specification", "enabled": true },
            { "name": "topic", "description": "AMQP topic exchange, as per the AMQP specification", "enabled": true }
        ]
    })
}

pub fn node_fixture(name: &str, node_type: &str) -> Value {
    json!({
        "name": name,
        "type": node_type,
        "running": true,
        "fd_used": 38,
        "fd_total": 1048576,
        "sockets_used": 2,
        "sockets_total": 943629,
        "proc_used": 431,
        "proc_total": 1048576,
        "run_queue": 1,
        "processors": 8,
        "mem_used": 142_000_000u64,
        "mem_limit": 6_586_819_379u64,
        "mem_alarm": false,
        "disk_free": 210_000_000_000u64,
        "disk_free_limit": 50_000_000,
        "disk_free_alarm": false,
        "uptime": 7_200_000,
        "auth_mechanisms": [
            { "name": "PLAIN", "description": "SASL PLAIN authentication mechanism", "enabled": true },
            { "name": "AMQPLAIN", "description": "QPid AMQPLAIN mechanism", "enabled": true },
            { "name": "RABBIT-CR-DEMO", "description": "RabbitMQ Demo challenge-response authentication mechanism", "enabled": false }
        ],
        "applications": [
            { "name": "rabbit", "description": "RabbitMQ", "version": "3.12.4" },
            { "name": "rabbitmq_management", "description": "RabbitMQ Management Console", "version": "3.12.4" },
            { "name": "mnesia", "description": "MNESIA  CXC 138 12", "version": "4.22" }
        ]
    })
}

pub fn connection_fixture(name: &str, peer_port: u16, channels: u64) -> Value {
    json!({
        "name": name,
        "node": NODE_1,
        "host": "127.0.0.1",
        "port": 5672,
        "peer_host": "127.0.0.1",
        "peer_port": peer_port,
        "ssl": false,
        "protocol": "AMQP 0-9-1",
        "user": USER,
        "vhost": "/",
        "state": "running",
        "channels": channels,
        "auth_mechanism": "PLAIN",
        "connected_at": 1_700_000_000_000u64
    })
}

pub fn channel_fixture(connection: &str, number: u64) -> Value {
    json!({
        "name": format!("{} ({})", connection, number),
        "number": number,
        "node": NODE_1,
        "state": "running",
        "consumer_count": 0,
        "transactional": false,
        "confirm": false,
        "user": USER,
        "vhost": "/",
        "prefetch_count": 0,
        "messages_unacknowledged": 0,
        "messages_unconfirmed": 0,
        "connection_details": { "name": connection, "peer_host": "127.0.0.1" }
    })
}

pub fn vhost_fixture(name: &str) -> Value {
    let description = if name == "/" { "Default virtual host" } else { "" };
    json!({
        "name": name,
        "description": description,
        "tracing": false,
        "messages": 21,
        "messages_ready": 20,
        "messages_unacknowledged": 1
    })
}

pub fn queue_fixtures() -> Vec<Value> {
    vec![
        json!({ "name": "orders", "vhost": "/", "node": NODE_1, "state": "running",
                "durable": true, "auto_delete": false, "exclusive": false,
                "messages": 40, "messages_ready": 38, "messages_unacknowledged": 2,
                "consumers": 1, "memory": 55_872 }),
        json!({ "name": "amq.gen-Xy1", "vhost": "/", "node": NODE_2, "state": "running",
                "durable": false, "auto_delete": true, "exclusive": true,
                "messages": 0, "consumers": 0, "memory": 10_104 }),
        json!({ "name": "orders", "vhost": "staging", "node": NODE_1, "state": "idle",
                "durable": true, "messages": 2, "messages_ready": 2 }),
    ]
}
