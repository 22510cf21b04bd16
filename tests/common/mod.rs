// Shared test helpers: an in-memory billing API served on an ephemeral port

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use billing_dashboard::api::BillingApi;
use billing_dashboard::config::AppConfig;
use billing_dashboard::dashboard::Dashboard;
use serde_json::{Value, json};

pub const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[api]
base_url = "http://127.0.0.1:9"
timeout_secs = 5

[dashboard]
default_user_id = "u1"
currency = "usd"
refresh_broadcast_capacity = 8
"#;

pub const PRICE_VERSION: &str = "2024-01-01_v1";

#[derive(Debug, Clone)]
pub struct FakeWallet {
    pub balance: f64,
    pub currency: String,
    pub auto_recharge: bool,
    pub allow_negative: bool,
}

/// One recorded call: method, path below the API prefix, JSON body (null when none).
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub wallets: HashMap<String, FakeWallet>,
    pub transactions: HashMap<String, Vec<Value>>,
    pub computes: Vec<Value>,
    pub disks: Vec<Value>,
    pub floating_ips: Vec<Value>,
    pub bills: Vec<Value>,
    /// `None` makes `/prices/` answer 404 like an unconfigured deployment.
    pub prices: Option<Value>,
    pub wallet_creates: usize,
    /// When set, `GET /wallets/{id}` answers with this status and detail.
    pub wallet_failure: Option<(u16, String)>,
    /// When set, `GET /resources/computes/user/{id}` answers 500.
    pub fail_compute_listing: bool,
    pub no_usage: bool,
    /// Held before answering `POST /resources/computes` and `POST /wallets/{id}/credit`.
    pub mutation_delay: Option<Duration>,
    pub calls: Vec<Recorded>,
}

impl FakeState {
    fn record(&mut self, method: &'static str, path: String, body: Value) {
        self.calls.push(Recorded { method, path, body });
    }

    fn wallet_json(&self, user_id: &str) -> Option<Value> {
        self.wallets.get(user_id).map(|w| {
            json!({
                "user_id": user_id,
                "balance": format!("{:.2}", w.balance),
                "currency": w.currency,
                "wallet": {
                    "auto_recharge": w.auto_recharge,
                    "allow_negative": w.allow_negative,
                    "last_deducted_at": null,
                }
            })
        })
    }
}

pub type Shared = Arc<Mutex<FakeState>>;

pub struct FakeBillingApi {
    pub state: Shared,
    pub base_url: String,
}

impl FakeBillingApi {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState {
            prices: Some(default_prices()),
            ..FakeState::default()
        }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn config(&self) -> AppConfig {
        let toml = TEST_CONFIG.replace("http://127.0.0.1:9", &self.base_url);
        AppConfig::load_from_str(&toml).unwrap()
    }

    pub fn client(&self) -> Arc<BillingApi> {
        Arc::new(BillingApi::new(&self.config()).unwrap())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.config()).unwrap()
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.with_state(|s| s.calls.clone())
    }

    pub fn wallet_creates(&self) -> usize {
        self.with_state(|s| s.wallet_creates)
    }

    pub fn add_wallet(&self, user_id: &str, balance: f64) {
        self.with_state(|s| {
            s.wallets.insert(
                user_id.to_string(),
                FakeWallet {
                    balance,
                    currency: "USD".into(),
                    auto_recharge: false,
                    allow_negative: false,
                },
            );
            s.transactions.entry(user_id.to_string()).or_default();
        });
    }

    pub fn add_compute(&self, resource: Value) {
        self.with_state(|s| s.computes.push(resource));
    }

    pub fn add_disk(&self, resource: Value) {
        self.with_state(|s| s.disks.push(resource));
    }

    pub fn add_floating_ip(&self, resource: Value) {
        self.with_state(|s| s.floating_ips.push(resource));
    }

    pub fn add_bill(&self, bill: Value) {
        self.with_state(|s| s.bills.push(bill));
    }
}

pub fn default_prices() -> Value {
    json!({
        "price_version": PRICE_VERSION,
        "pricing": [
            {
                "currency": "USD",
                "compute": {
                    "small": { "per_hour": "0.05" },
                    "medium": { "per_hour": "0.10" },
                    "large": { "per_hour": "0.20" }
                },
                "disk": { "per_gb_hour": "0.0002" },
                "floating_ip": { "per_hour": "0.004" }
            },
            {
                "currency": "INR",
                "compute": { "small": { "per_hour": "4.00" } },
                "disk": { "per_gb_hour": "0.02" },
                "floating_ip": { "per_hour": "0.30" }
            }
        ]
    })
}

/// Compute in the API's wire shape (`current_flavor`, string timestamps).
pub fn compute_json(resource_id: &str, user_id: &str, state: &str, flavor: &str) -> Value {
    json!({
        "resource_id": resource_id,
        "user_id": user_id,
        "state": state,
        "current_flavor": flavor,
        "created_at": "2024-01-01T00:00:00Z",
        "deleted_at": null,
        "last_state_change": "2024-01-01T00:00:00Z",
        "last_billed_until": null,
        "events": [
            { "event_id": format!("{}-e0", resource_id), "type": "created", "time": "2024-01-01T00:00:00Z", "meta": { "flavor": flavor } }
        ]
    })
}

pub fn disk_json(resource_id: &str, user_id: &str, state: &str, size_gb: u64) -> Value {
    json!({
        "resource_id": resource_id,
        "user_id": user_id,
        "state": state,
        "size_gb": size_gb,
        "attached_to": null,
        "created_at": "2024-01-01T00:00:00Z",
        "events": []
    })
}

pub fn floating_ip_json(resource_id: &str, user_id: &str, ip: &str) -> Value {
    json!({
        "resource_id": resource_id,
        "user_id": user_id,
        "ip_address": ip,
        "attached_to": null,
        "created_at": "2024-01-01T00:00:00Z",
        "released_at": null,
        "events": []
    })
}

pub fn bill_json(bill_id: &str, user_id: &str, period_end: &str, total: &str) -> Value {
    json!({
        "bill_id": bill_id,
        "user_id": user_id,
        "status": "paid",
        "total": total,
        "period_start": "2024-01-01T00:00:00Z",
        "period_end": period_end,
        "charges": [ { "type": "compute", "amount": total, "resource_id": "compute_1" } ],
        "paid": true,
        "price_version": PRICE_VERSION
    })
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/wallets/", post(create_wallet))
        .route("/wallets/{user_id}", get(get_wallet))
        .route("/wallets/{user_id}/transactions", get(list_transactions))
        .route("/wallets/{user_id}/credit", post(add_credit))
        .route("/resources/computes", post(create_compute))
        .route("/resources/computes/user/{user_id}", get(list_computes))
        .route(
            "/resources/computes/{id}",
            patch(update_compute).delete(delete_compute),
        )
        .route("/resources/disks", post(create_disk))
        .route("/resources/disks/user/{user_id}", get(list_disks))
        .route(
            "/resources/disks/{id}",
            patch(update_disk).delete(delete_disk),
        )
        .route("/resources/floating-ips", post(create_floating_ip))
        .route("/resources/floating-ips/user/{user_id}", get(list_floating_ips))
        .route("/resources/floating-ips/{id}", delete(release_floating_ip))
        .route("/billing/compute", post(compute_bill))
        .route("/billing/user/{user_id}", get(list_bills))
        .route("/billing/{bill_id}", get(get_bill))
        .route("/billing/{bill_id}/retry", post(retry_bill))
        .route("/prices/", get(latest_prices))
        .route("/prices/history", get(price_history))
        .route("/prices/currency/{currency}", get(prices_for_currency))
        .route("/prices/version/{version}", get(price_version));
    Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .nest("/api/v1", api)
        .with_state(state)
}

// ---- wallets ----

async fn create_wallet(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST", "/wallets/".into(), body.clone());
    s.wallet_creates += 1;
    let user_id = body["user_id"].as_str().unwrap_or_default().to_string();
    if s.wallets.contains_key(&user_id) {
        return detail(StatusCode::CONFLICT, "Wallet already exists for this user");
    }
    s.wallets.insert(
        user_id.clone(),
        FakeWallet {
            balance: body["balance"].as_f64().unwrap_or_default(),
            currency: body["currency"].as_str().unwrap_or("USD").to_string(),
            auto_recharge: body["auto_recharge"].as_bool().unwrap_or_default(),
            allow_negative: body["allow_negative"].as_bool().unwrap_or_default(),
        },
    );
    s.transactions.entry(user_id.clone()).or_default();
    let wallet = s.wallet_json(&user_id);
    (StatusCode::CREATED, Json(wallet)).into_response()
}

async fn get_wallet(State(state): State<Shared>, Path(user_id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET", format!("/wallets/{}", user_id), Value::Null);
    if let Some((status, message)) = s.wallet_failure.clone() {
        let status = StatusCode::from_u16(status).unwrap();
        return detail(status, &message);
    }
    match s.wallet_json(&user_id) {
        Some(wallet) => Json(wallet).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Wallet not found"),
    }
}

async fn list_transactions(State(state): State<Shared>, Path(user_id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET", format!("/wallets/{}/transactions", user_id), Value::Null);
    if !s.wallets.contains_key(&user_id) {
        return detail(StatusCode::NOT_FOUND, "Wallet not found");
    }
    let transactions = s.transactions.get(&user_id).cloned().unwrap_or_default();
    Json(json!({ "user_id": user_id, "transactions": transactions })).into_response()
}

async fn add_credit(
    State(state): State<Shared>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    hold_mutation(&state).await;
    let mut s = state.lock().unwrap();
    s.record("POST", format!("/wallets/{}/credit", user_id), body.clone());
    let Some(amount) = body["amount"].as_f64() else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "amount must be a number");
    };
    if amount <= 0.0 {
        return detail(StatusCode::BAD_REQUEST, "Amount must be positive");
    }
    let Some(wallet) = s.wallets.get_mut(&user_id) else {
        return detail(StatusCode::NOT_FOUND, "Wallet not found");
    };
    wallet.balance += amount;
    let balance_after = wallet.balance;
    let ledger = s.transactions.entry(user_id.clone()).or_default();
    let tx = json!({
        "tx_id": format!("tx-{}", ledger.len() + 1),
        "type": "credit",
        "amount": format!("{:.2}", amount),
        "reason": body["reason"],
        "time": now(),
        "balance_after": format!("{:.2}", balance_after),
    });
    ledger.push(tx.clone());
    Json(tx).into_response()
}

// ---- resources ----

async fn hold_mutation(state: &Shared) {
    let delay = state.lock().unwrap().mutation_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

/// The user's rows; terminal ones only when the caller asked for them,
/// as the server's listing routes default to hiding them.
fn listed(resources: &[Value], user_id: &str, terminal_field: &str, include: bool) -> Vec<Value> {
    resources
        .iter()
        .filter(|r| r["user_id"] == user_id)
        .filter(|r| include || r[terminal_field].is_null())
        .cloned()
        .collect()
}

fn owned_by(resources: &[Value], user_id: &str) -> Vec<Value> {
    resources
        .iter()
        .filter(|r| r["user_id"] == user_id)
        .cloned()
        .collect()
}

fn flag(query: &HashMap<String, String>, name: &str) -> bool {
    query.get(name).is_some_and(|v| v == "true")
}

fn find<'a>(resources: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    resources.iter_mut().find(|r| r["resource_id"] == id)
}

fn push_event(resource: &mut Value, kind: &str, meta: Value) {
    if let Some(events) = resource["events"].as_array_mut() {
        let n = events.len();
        events.push(json!({
            "event_id": format!("e{}", n),
            "type": kind,
            "time": now(),
            "meta": meta,
        }));
    }
}

async fn list_computes(
    State(state): State<Shared>,
    Path(user_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET", format!("/resources/computes/user/{}", user_id), Value::Null);
    if s.fail_compute_listing {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    let rows = listed(&s.computes, &user_id, "deleted_at", flag(&query, "include_deleted"));
    Json(rows).into_response()
}

async fn create_compute(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    hold_mutation(&state).await;
    let mut s = state.lock().unwrap();
    s.record("POST", "/resources/computes".into(), body.clone());
    let resource = compute_json(
        body["resource_id"].as_str().unwrap_or_default(),
        body["user_id"].as_str().unwrap_or_default(),
        "running",
        body["flavor"].as_str().unwrap_or_default(),
    );
    s.computes.push(resource.clone());
    (StatusCode::CREATED, Json(resource)).into_response()
}

async fn update_compute(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("PATCH", format!("/resources/computes/{}", id), body.clone());
    let Some(compute) = find(&mut s.computes, &id) else {
        return detail(StatusCode::NOT_FOUND, "Compute not found");
    };
    if let Some(state) = body.get("state") {
        compute["state"] = state.clone();
        push_event(compute, "state_change", json!({ "state": state }));
    }
    if let Some(flavor) = body.get("flavor") {
        compute["current_flavor"] = flavor.clone();
        push_event(compute, "flavor_change", json!({ "flavor": flavor }));
    }
    Json(compute.clone()).into_response()
}

async fn delete_compute(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("DELETE", format!("/resources/computes/{}", id), Value::Null);
    let Some(compute) = find(&mut s.computes, &id) else {
        return detail(StatusCode::NOT_FOUND, "Compute not found");
    };
    compute["state"] = json!("deleted");
    compute["deleted_at"] = json!(now());
    push_event(compute, "deleted", json!({}));
    Json(json!({ "message": "Compute deleted" })).into_response()
}

async fn list_disks(
    State(state): State<Shared>,
    Path(user_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET", format!("/resources/disks/user/{}", user_id), Value::Null);
    let rows = listed(&s.disks, &user_id, "deleted_at", flag(&query, "include_deleted"));
    Json(rows).into_response()
}

async fn create_disk(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST", "/resources/disks".into(), body.clone());
    let attached = body["attached_to"].as_str().is_some();
    let mut resource = disk_json(
        body["resource_id"].as_str().unwrap_or_default(),
        body["user_id"].as_str().unwrap_or_default(),
        if attached { "attached" } else { "detached" },
        body["size_gb"].as_u64().unwrap_or_default(),
    );
    resource["attached_to"] = body["attached_to"].clone();
    s.disks.push(resource.clone());
    (StatusCode::CREATED, Json(resource)).into_response()
}

async fn update_disk(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("PATCH", format!("/resources/disks/{}", id), body.clone());
    let Some(disk) = find(&mut s.disks, &id) else {
        return detail(StatusCode::NOT_FOUND, "Disk not found");
    };
    if let Some(size) = body.get("size_gb") {
        disk["size_gb"] = size.clone();
        push_event(disk, "resized", json!({ "size_gb": size }));
    }
    Json(disk.clone()).into_response()
}

async fn delete_disk(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("DELETE", format!("/resources/disks/{}", id), Value::Null);
    let Some(disk) = find(&mut s.disks, &id) else {
        return detail(StatusCode::NOT_FOUND, "Disk not found");
    };
    disk["state"] = json!("deleted");
    disk["deleted_at"] = json!(now());
    Json(json!({ "message": "Disk deleted" })).into_response()
}

async fn list_floating_ips(
    State(state): State<Shared>,
    Path(user_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET", format!("/resources/floating-ips/user/{}", user_id), Value::Null);
    let rows = listed(
        &s.floating_ips,
        &user_id,
        "released_at",
        flag(&query, "include_released"),
    );
    Json(rows).into_response()
}

async fn create_floating_ip(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST", "/resources/floating-ips".into(), body.clone());
    let mut resource = floating_ip_json(
        body["resource_id"].as_str().unwrap_or_default(),
        body["user_id"].as_str().unwrap_or_default(),
        body["ip_address"].as_str().unwrap_or_default(),
    );
    resource["attached_to"] = body["attached_to"].clone();
    s.floating_ips.push(resource.clone());
    (StatusCode::CREATED, Json(resource)).into_response()
}

async fn release_floating_ip(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("DELETE", format!("/resources/floating-ips/{}", id), Value::Null);
    let Some(ip) = find(&mut s.floating_ips, &id) else {
        return detail(StatusCode::NOT_FOUND, "Floating IP not found");
    };
    ip["released_at"] = json!(now());
    Json(json!({ "message": "Floating IP released" })).into_response()
}

// ---- billing ----

async fn compute_bill(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST", "/billing/compute".into(), body.clone());
    let user_id = body["user_id"].as_str().unwrap_or_default().to_string();
    let period_end = body["period_end"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(now);
    if s.no_usage {
        return Json(json!({
            "message": "No billable usage found",
            "period_start": "2024-01-01T00:00:00Z",
            "period_end": period_end,
        }))
        .into_response();
    }
    let bill_id = format!("bill-{}", s.bills.len() + 1);
    let bill = bill_json(&bill_id, &user_id, &period_end, "1.20");
    s.bills.push(bill.clone());
    Json(bill).into_response()
}

async fn list_bills(State(state): State<Shared>, Path(user_id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET", format!("/billing/user/{}", user_id), Value::Null);
    Json(owned_by(&s.bills, &user_id)).into_response()
}

async fn get_bill(State(state): State<Shared>, Path(bill_id): Path<String>) -> Response {
    let s = state.lock().unwrap();
    match s.bills.iter().find(|b| b["bill_id"] == bill_id.as_str()) {
        Some(bill) => Json(bill.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Bill not found"),
    }
}

async fn retry_bill(State(state): State<Shared>, Path(bill_id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST", format!("/billing/{}/retry", bill_id), Value::Null);
    let Some(bill) = s.bills.iter_mut().find(|b| b["bill_id"] == bill_id.as_str()) else {
        return detail(StatusCode::NOT_FOUND, "Bill not found");
    };
    if bill["status"] == "paid" {
        return detail(StatusCode::BAD_REQUEST, "Bill is already paid");
    }
    bill["status"] = json!("paid");
    bill["paid"] = json!(true);
    Json(bill.clone()).into_response()
}

// ---- prices ----

async fn latest_prices(State(state): State<Shared>) -> Response {
    let s = state.lock().unwrap();
    match &s.prices {
        Some(prices) => Json(prices.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "No pricing configured"),
    }
}

async fn price_history(State(state): State<Shared>) -> Response {
    let s = state.lock().unwrap();
    match &s.prices {
        Some(prices) => Json(json!({
            "latest": prices["price_version"],
            "price_history": [prices],
        }))
        .into_response(),
        None => detail(StatusCode::NOT_FOUND, "No pricing configured"),
    }
}

async fn prices_for_currency(
    State(state): State<Shared>,
    Path(currency): Path<String>,
) -> Response {
    let s = state.lock().unwrap();
    let found = s.prices.as_ref().and_then(|p| {
        p["pricing"]
            .as_array()?
            .iter()
            .find(|c| c["currency"] == currency.as_str())
            .cloned()
    });
    match found {
        Some(pricing) => Json(pricing).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Currency not priced"),
    }
}

async fn price_version(State(state): State<Shared>, Path(version): Path<String>) -> Response {
    let s = state.lock().unwrap();
    match &s.prices {
        Some(prices) if prices["price_version"] == version.as_str() => {
            Json(prices.clone()).into_response()
        }
        _ => detail(StatusCode::NOT_FOUND, "Price version not found"),
    }
}
