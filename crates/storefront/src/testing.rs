//! In-process stand-in for the bakery backend.
//!
//! Serves the backend endpoints on `127.0.0.1:0` with canned data and counts
//! every request it receives, so tests can assert that a code path never
//! reached the network.

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get, post},
};
use serde_json::{Value, json};

use dulces_momentos_core::{Email, UserId};

use crate::api::{AuthUser, BackendClient};
use crate::config::ApiConfig;

#[derive(Clone, Default)]
struct Recorder {
    hits: Arc<AtomicUsize>,
    orders: Arc<Mutex<Vec<Value>>>,
    contact_messages: Arc<Mutex<Vec<Value>>>,
}

/// A running fake backend. The server stops when the value is dropped.
pub struct FakeBackend {
    addr: SocketAddr,
    recorder: Recorder,
    task: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Token issued for the known account.
    pub const TOKEN: &'static str = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";
    /// Email of the known account.
    pub const EMAIL: &'static str = "ana@email.com";
    /// Password of the known account.
    pub const PASSWORD: &'static str = "pastel-de-chocolate";

    /// Bind to an ephemeral loopback port and start serving.
    pub async fn start() -> Self {
        let recorder = Recorder::default();
        let api = Router::new()
            .route("/auth/login/", post(login))
            .route("/auth/register/", post(register))
            .route("/products/", get(products))
            .route("/orders/", get(list_orders).post(create_order))
            .route("/contact/", post(contact))
            .route("/echo/", any(echo))
            .route("/empty/", get(|| async { StatusCode::NO_CONTENT }))
            .layer(middleware::from_fn_with_state(recorder.clone(), count))
            .with_state(recorder.clone());
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake backend stopped");
            }
        });

        Self {
            addr,
            recorder,
            task,
        }
    }

    /// API base, e.g. `http://127.0.0.1:41234/api`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Backend configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: Some(self.base_url()),
            public_origin: None,
        }
    }

    /// A client pointed at this server.
    #[must_use]
    pub fn client(&self) -> BackendClient {
        BackendClient::new(&self.config())
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.recorder.hits.load(Ordering::SeqCst)
    }

    /// Bodies of every accepted `POST /orders/`.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.recorder.orders).clone()
    }

    /// Bodies of every `POST /contact/`.
    #[must_use]
    pub fn contact_messages(&self) -> Vec<Value> {
        lock(&self.recorder.contact_messages).clone()
    }

    /// Profile of the known account.
    #[must_use]
    pub fn user() -> AuthUser {
        AuthUser {
            id: UserId::new(1),
            email: Email::parse(Self::EMAIL).expect("valid email"),
            username: Self::EMAIL.to_string(),
            first_name: Some("Ana".to_string()),
            last_name: Some("Lopez".to_string()),
            role: Some("customer".to_string()),
        }
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Handlers
// =============================================================================

async fn count(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Token {}", FakeBackend::TOKEN))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Token invalido."})),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == FakeBackend::EMAIL && body["password"] == FakeBackend::PASSWORD {
        Json(json!({"token": FakeBackend::TOKEN, "user": FakeBackend::user()})).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"non_field_errors": ["Credenciales invalidas."]})),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == FakeBackend::EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"email": ["Ya existe un usuario con este correo."]})),
        )
            .into_response();
    }
    if body["password"] != body["confirm_password"] {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"confirm_password": ["Las contrasenas no coinciden."]})),
        )
            .into_response();
    }

    let user = json!({
        "id": 2,
        "email": body["email"],
        "username": body["username"],
        "first_name": body["first_name"],
        "last_name": body["last_name"],
        "role": "customer",
    });
    (
        StatusCode::CREATED,
        Json(json!({"token": FakeBackend::TOKEN, "user": user})),
    )
        .into_response()
}

fn product_json(id: i32) -> Value {
    match id {
        1 => json!({
            "id": 1,
            "name": "Pastel de Chocolate",
            "description": "Delicioso pastel de chocolate con ganache",
            "price": "450.00",
            "stock": 5,
            "image": "https://cdn.example.com/chocolate.png",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
        }),
        _ => json!({
            "id": id,
            "name": "Pastel de Vainilla",
            "description": "Suave pastel de vainilla con crema",
            "price": "400.00",
            "stock": 3,
            "image": "",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
        }),
    }
}

async fn products() -> Json<Value> {
    Json(json!([product_json(1), product_json(2)]))
}

async fn list_orders(headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    Json(json!([{
        "id": 7,
        "customer": FakeBackend::user(),
        "status": "in_process",
        "order_date": "2025-03-01T10:30:00.123456-06:00",
        "delivery_date": "2025-03-05",
        "notes": "Nombre: Ana | Tamano: mediano",
        "total": "450.00",
        "items": [{
            "id": 11,
            "product": 1,
            "product_detail": product_json(1),
            "quantity": 1,
            "personalization": "Feliz cumpleanos",
            "subtotal": "450.00",
        }],
    }]))
    .into_response()
}

async fn create_order(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    let items: Vec<Value> = body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let product = item["product"].as_i64().unwrap_or_default();
                    json!({
                        "id": index + 1,
                        "product": product,
                        "product_detail": product_json(i32::try_from(product).unwrap_or_default()),
                        "quantity": item["quantity"],
                        "personalization": item.get("personalization").cloned().unwrap_or(Value::Null),
                        "subtotal": "450.00",
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if items.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"items": ["Debe incluir al menos un producto en el pedido."]})),
        )
            .into_response();
    }

    lock(&recorder.orders).push(body.clone());

    (
        StatusCode::CREATED,
        Json(json!({
            "id": 8,
            "status": "new",
            "order_date": "2025-03-01T11:00:00Z",
            "delivery_date": body["delivery_date"],
            "notes": body["notes"],
            "total": "450.00",
            "items": items,
        })),
    )
        .into_response()
}

async fn contact(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Response {
    if body["message"].as_str().is_none_or(str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": ["Este campo no puede estar en blanco."]})),
        )
            .into_response();
    }

    lock(&recorder.contact_messages).push(body.clone());

    (
        StatusCode::CREATED,
        Json(json!({
            "id": 1,
            "message": body["message"],
            "created_at": "2025-03-01T11:00:00Z",
        })),
    )
        .into_response()
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    Json(json!({
        "method": method.as_str(),
        "authorization": text(header::AUTHORIZATION),
        "content_type": text(header::CONTENT_TYPE),
        "body": serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null),
    }))
}
