//! In-memory fake of the Xsolla login and store APIs.
//!
//! Both APIs are served from one router so tests can point every base URL
//! at the same address. State lives for as long as the `Router` returned by
//! `app()`; each call to `app()` starts from the same seeded data.

pub mod catalog;
pub mod login;
pub mod store;

use std::{collections::HashMap, sync::Arc};

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

/// Raw query string of a catalog request, echoed back for assertions.
pub const MOCK_QUERY_HEADER: &str = "x-mock-query";

/// Token of the seeded `demo` user.
pub const DEMO_TOKEN: &str = "demo-token";
pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo-password";

/// Code accepted by passwordless confirmation.
pub const PASSWORDLESS_CODE: &str = "0000";

/// Id the current cart reports.
pub const CURRENT_CART_ID: &str = "1001";

#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
}

impl StoredUser {
    fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            nickname: None,
            first_name: None,
            last_name: None,
            birthday: None,
            gender: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    /// Keyed by username.
    pub users: HashMap<String, StoredUser>,
    /// Issued token to username.
    pub tokens: HashMap<String, String>,
    /// Pending passwordless operation id to the email or phone it was sent to.
    pub operations: HashMap<String, String>,
    /// Cart id to (sku, quantity) lines, in insertion order.
    pub carts: HashMap<String, Vec<(String, u32)>>,
    /// Owned sku to quantity.
    pub inventory: Vec<(String, u64)>,
}

impl MockState {
    pub fn seeded() -> Self {
        let mut demo = StoredUser::new(DEMO_USERNAME, "demo@example.com", DEMO_PASSWORD);
        demo.nickname = Some("Demo".to_string());
        let mut hero = StoredUser::new("hero", "hero@example.com", "hero-password");
        hero.nickname = Some("Hero".to_string());

        let mut state = Self::default();
        state.tokens.insert(DEMO_TOKEN.to_string(), demo.username.clone());
        state.users.insert(demo.username.clone(), demo);
        state.users.insert(hero.username.clone(), hero);
        state.inventory = vec![("potion".to_string(), 5), ("sword".to_string(), 1)];
        state
    }
}

pub type Db = Arc<RwLock<MockState>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(MockState::seeded()));
    Router::new()
        .nest("/api/v2/project/{project_id}", store_routes())
        .merge(login_routes())
        .fallback(not_found)
        .with_state(db)
}

fn store_routes() -> Router<Db> {
    Router::new()
        .route("/items/virtual_items", get(store::virtual_items))
        .route(
            "/items/virtual_items/group/{external_id}",
            get(store::items_by_group),
        )
        .route("/items/virtual_currency", get(store::virtual_currency))
        .route(
            "/items/virtual_currency/package",
            get(store::virtual_currency_packages),
        )
        .route("/items/physical_good", get(store::physical_items))
        .route("/cart", get(store::current_cart))
        .route("/cart/clear", put(store::clear_current_cart))
        .route("/cart/fill", put(store::fill_current_cart))
        .route(
            "/cart/item/{item_sku}",
            put(store::update_current_cart_item).delete(store::delete_current_cart_item),
        )
        .route("/cart/{cart_id}", get(store::cart_by_id))
        .route("/cart/{cart_id}/clear", put(store::clear_cart_by_id))
        .route(
            "/cart/{cart_id}/item/{item_sku}",
            put(store::update_cart_item).delete(store::delete_cart_item),
        )
        .route("/order/{order_id}", get(store::order))
        .route("/user/inventory/items", get(store::inventory))
        .route("/user/inventory/item/consume", post(store::consume_item))
        .route(
            "/user/virtual_currency_balance",
            get(store::virtual_balance),
        )
        .route("/coupon/redeem", post(store::redeem_coupon))
}

fn login_routes() -> Router<Db> {
    Router::new()
        .route("/api/user", post(login::register))
        .route("/api/login", post(login::login))
        .route("/api/social/{provider}/login_url", get(login::social_login_url))
        .route("/api/password/reset/request", post(login::reset_password))
        .route("/api/login/email/request", post(login::start_passwordless))
        .route("/api/login/email/confirm", post(login::confirm_email))
        .route("/api/login/phone/request", post(login::start_passwordless))
        .route("/api/login/phone/confirm", post(login::confirm_phone))
        .route(
            "/api/users/me",
            get(login::current_user).patch(login::update_current_user),
        )
        .route("/api/users/search/by_nickname", get(login::search_users))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn not_found() -> Response {
    login_error(StatusCode::NOT_FOUND, "404", "not found")
}

/// Error in the login API's envelope.
pub fn login_error(status: StatusCode, code: &str, description: &str) -> Response {
    (
        status,
        Json(json!({"error": {"code": code, "description": description}})),
    )
        .into_response()
}

/// Error in the store API's envelope.
pub fn store_error(status: StatusCode, error_code: u32, message: &str) -> Response {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "errorCode": error_code,
            "errorMessage": format!("[{:04}-{error_code}]: {message}", status.as_u16()),
        })),
    )
        .into_response()
}

/// Token from an `Authorization: Bearer` header.
pub fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}
