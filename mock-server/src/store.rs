//! Store route handlers.

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::{self, CatalogItem, Page, Price};
use crate::{bearer, store_error, Db, CURRENT_CART_ID, MOCK_QUERY_HEADER};

type Params = Vec<(String, String)>;

struct Paging {
    offset: usize,
    limit: usize,
}

impl Paging {
    fn parse(params: &Params) -> Result<Self, Response> {
        Ok(Self {
            offset: number(params, "offset")?.unwrap_or(0),
            limit: number(params, "limit")?.unwrap_or(usize::MAX),
        })
    }
}

fn number(params: &Params, name: &str) -> Result<Option<usize>, Response> {
    match params.iter().find(|(key, _)| key == name) {
        None => Ok(None),
        Some((_, raw)) => raw.parse().map(Some).map_err(|_| {
            store_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                1102,
                &format!("Unprocessable Entity. The property `{name}` should be integer"),
            )
        }),
    }
}

fn listing(raw: Option<String>, params: &Params, items: Vec<CatalogItem>) -> Response {
    let paging = match Paging::parse(params) {
        Ok(paging) => paging,
        Err(response) => return response,
    };
    let items = items
        .into_iter()
        .skip(paging.offset)
        .take(paging.limit)
        .collect();
    let mut response = Json(Page { items }).into_response();
    if let Some(value) = raw.and_then(|raw| HeaderValue::from_str(&raw).ok()) {
        response.headers_mut().insert(MOCK_QUERY_HEADER, value);
    }
    response
}

pub async fn virtual_items(
    Path(_project_id): Path<u32>,
    RawQuery(raw): RawQuery,
    Query(params): Query<Params>,
) -> Response {
    listing(raw, &params, catalog::virtual_items())
}

pub async fn items_by_group(
    Path((_project_id, external_id)): Path<(u32, String)>,
    RawQuery(raw): RawQuery,
    Query(params): Query<Params>,
) -> Response {
    let items: Vec<_> = catalog::virtual_items()
        .into_iter()
        .filter(|item| item.groups.iter().any(|g| g.external_id == external_id))
        .collect();
    if items.is_empty() {
        return store_error(StatusCode::NOT_FOUND, 4001, "Group not found");
    }
    listing(raw, &params, items)
}

pub async fn virtual_currency(
    Path(_project_id): Path<u32>,
    RawQuery(raw): RawQuery,
    Query(params): Query<Params>,
) -> Response {
    listing(raw, &params, catalog::virtual_currency())
}

pub async fn virtual_currency_packages(
    Path(_project_id): Path<u32>,
    RawQuery(raw): RawQuery,
    Query(params): Query<Params>,
) -> Response {
    listing(raw, &params, catalog::virtual_currency_packages())
}

pub async fn physical_items(
    Path(_project_id): Path<u32>,
    RawQuery(raw): RawQuery,
    Query(params): Query<Params>,
) -> Response {
    listing(raw, &params, catalog::physical_items())
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub is_free: bool,
    pub is_bonus: bool,
    pub price: Option<Price>,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Cart {
    pub cart_id: String,
    pub is_free: bool,
    pub price: Option<Price>,
    pub items: Vec<CartItem>,
}

#[derive(Deserialize)]
pub struct FillCart {
    pub items: Vec<FillLine>,
}

#[derive(Deserialize)]
pub struct FillLine {
    pub sku: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct Quantity {
    pub quantity: u32,
}

fn unauthorized() -> Response {
    store_error(StatusCode::UNAUTHORIZED, 1501, "Authorization failed")
}

fn cart_key(cart_id: &str) -> Result<String, Response> {
    cart_id
        .parse::<u64>()
        .map(|id| id.to_string())
        .map_err(|_| store_error(StatusCode::NOT_FOUND, 4001, "Cart not found"))
}

fn render_cart(cart_id: &str, lines: &[(String, u32)]) -> Cart {
    let mut total = 0.0_f64;
    let items = lines
        .iter()
        .filter_map(|(sku, quantity)| {
            let item = catalog::find(sku)?;
            if let Some(price) = &item.price {
                total += price.amount.parse::<f64>().unwrap_or(0.0) * f64::from(*quantity);
            }
            Some(CartItem {
                sku: item.sku,
                name: item.name,
                item_type: item.item_type,
                is_free: item.is_free,
                is_bonus: false,
                price: item.price,
                quantity: *quantity,
            })
        })
        .collect();
    let amount = format!("{total:.2}");
    Cart {
        cart_id: cart_id.to_string(),
        is_free: false,
        price: Some(Price {
            amount: amount.clone(),
            amount_without_discount: amount,
            currency: "USD".to_string(),
        }),
        items,
    }
}

async fn show_cart(db: &Db, headers: &HeaderMap, cart_id: &str) -> Response {
    if bearer(headers).is_none() {
        return unauthorized();
    }
    let key = match cart_key(cart_id) {
        Ok(key) => key,
        Err(response) => return response,
    };
    let state = db.read().await;
    let lines = state.carts.get(&key).map(Vec::as_slice).unwrap_or_default();
    Json(render_cart(&key, lines)).into_response()
}

async fn clear_cart(db: &Db, headers: &HeaderMap, cart_id: &str) -> Response {
    if bearer(headers).is_none() {
        return unauthorized();
    }
    let key = match cart_key(cart_id) {
        Ok(key) => key,
        Err(response) => return response,
    };
    db.write().await.carts.remove(&key);
    StatusCode::NO_CONTENT.into_response()
}

async fn put_item(db: &Db, headers: &HeaderMap, cart_id: &str, sku: &str, quantity: u32) -> Response {
    if bearer(headers).is_none() {
        return unauthorized();
    }
    let key = match cart_key(cart_id) {
        Ok(key) => key,
        Err(response) => return response,
    };
    if catalog::find(sku).is_none() {
        return store_error(StatusCode::NOT_FOUND, 4001, "Item not found");
    }
    let mut state = db.write().await;
    let lines = state.carts.entry(key).or_default();
    match lines.iter_mut().find(|(line_sku, _)| line_sku == sku) {
        Some(line) => line.1 = quantity,
        None => lines.push((sku.to_string(), quantity)),
    }
    lines.retain(|(_, quantity)| *quantity > 0);
    StatusCode::NO_CONTENT.into_response()
}

async fn remove_item(db: &Db, headers: &HeaderMap, cart_id: &str, sku: &str) -> Response {
    if bearer(headers).is_none() {
        return unauthorized();
    }
    let key = match cart_key(cart_id) {
        Ok(key) => key,
        Err(response) => return response,
    };
    let mut state = db.write().await;
    let lines = state.carts.entry(key).or_default();
    let before = lines.len();
    lines.retain(|(line_sku, _)| line_sku != sku);
    if lines.len() == before {
        return store_error(StatusCode::NOT_FOUND, 4001, "Item not found in cart");
    }
    StatusCode::NO_CONTENT.into_response()
}

pub async fn current_cart(
    State(db): State<Db>,
    Path(_project_id): Path<u32>,
    headers: HeaderMap,
) -> Response {
    show_cart(&db, &headers, CURRENT_CART_ID).await
}

pub async fn cart_by_id(
    State(db): State<Db>,
    Path((_project_id, cart_id)): Path<(u32, String)>,
    headers: HeaderMap,
) -> Response {
    show_cart(&db, &headers, &cart_id).await
}

pub async fn clear_current_cart(
    State(db): State<Db>,
    Path(_project_id): Path<u32>,
    headers: HeaderMap,
) -> Response {
    clear_cart(&db, &headers, CURRENT_CART_ID).await
}

pub async fn clear_cart_by_id(
    State(db): State<Db>,
    Path((_project_id, cart_id)): Path<(u32, String)>,
    headers: HeaderMap,
) -> Response {
    clear_cart(&db, &headers, &cart_id).await
}

pub async fn fill_current_cart(
    State(db): State<Db>,
    Path(_project_id): Path<u32>,
    headers: HeaderMap,
    Json(input): Json<FillCart>,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    if let Some(line) = input.items.iter().find(|line| catalog::find(&line.sku).is_none()) {
        return store_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            4001,
            &format!("Item not found: {}", line.sku),
        );
    }
    let lines = input
        .items
        .into_iter()
        .filter(|line| line.quantity > 0)
        .map(|line| (line.sku, line.quantity))
        .collect();
    db.write().await.carts.insert(CURRENT_CART_ID.to_string(), lines);
    StatusCode::NO_CONTENT.into_response()
}

pub async fn update_current_cart_item(
    State(db): State<Db>,
    Path((_project_id, item_sku)): Path<(u32, String)>,
    headers: HeaderMap,
    Json(input): Json<Quantity>,
) -> Response {
    put_item(&db, &headers, CURRENT_CART_ID, &item_sku, input.quantity).await
}

pub async fn update_cart_item(
    State(db): State<Db>,
    Path((_project_id, cart_id, item_sku)): Path<(u32, String, String)>,
    headers: HeaderMap,
    Json(input): Json<Quantity>,
) -> Response {
    put_item(&db, &headers, &cart_id, &item_sku, input.quantity).await
}

pub async fn delete_current_cart_item(
    State(db): State<Db>,
    Path((_project_id, item_sku)): Path<(u32, String)>,
    headers: HeaderMap,
) -> Response {
    remove_item(&db, &headers, CURRENT_CART_ID, &item_sku).await
}

pub async fn delete_cart_item(
    State(db): State<Db>,
    Path((_project_id, cart_id, item_sku)): Path<(u32, String, String)>,
    headers: HeaderMap,
) -> Response {
    remove_item(&db, &headers, &cart_id, &item_sku).await
}

// ---------------------------------------------------------------------------
// Orders, inventory, balance, coupons
// ---------------------------------------------------------------------------

/// Order `1` exists, order `0` makes the server fail without an envelope.
pub async fn order(
    Path((_project_id, order_id)): Path<(u32, String)>,
    headers: HeaderMap,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    match order_id.as_str() {
        "0" => (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response(),
        "1" => Json(json!({
            "order_id": 1,
            "status": "done",
            "content": {
                "price": {"amount": "1.99", "amount_without_discount": "1.99", "currency": "USD"},
                "is_free": false,
                "items": [{"sku": "sword", "quantity": 1, "is_free": false,
                           "price": {"amount": "1.99", "amount_without_discount": "1.99", "currency": "USD"}}]
            }
        }))
        .into_response(),
        _ => store_error(StatusCode::NOT_FOUND, 4001, "Order not found"),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InventoryItem {
    pub sku: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub virtual_item_type: Option<String>,
    pub quantity: u64,
}

pub async fn inventory(
    State(db): State<Db>,
    Path(_project_id): Path<u32>,
    headers: HeaderMap,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    let state = db.read().await;
    let items: Vec<InventoryItem> = state
        .inventory
        .iter()
        .filter_map(|(sku, quantity)| {
            let item = catalog::find(sku)?;
            Some(InventoryItem {
                sku: item.sku,
                name: item.name,
                item_type: item.item_type,
                virtual_item_type: item.virtual_item_type,
                quantity: *quantity,
            })
        })
        .collect();
    Json(Page { items }).into_response()
}

#[derive(Deserialize)]
pub struct Consume {
    pub sku: String,
    pub quantity: Option<u64>,
}

pub async fn consume_item(
    State(db): State<Db>,
    Path(_project_id): Path<u32>,
    headers: HeaderMap,
    Json(input): Json<Consume>,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    let wanted = input.quantity.unwrap_or(1);
    let mut state = db.write().await;
    let Some(owned) = state.inventory.iter_mut().find(|(sku, _)| *sku == input.sku) else {
        return store_error(StatusCode::NOT_FOUND, 4001, "Item not found in inventory");
    };
    if owned.1 < wanted {
        return store_error(StatusCode::UNPROCESSABLE_ENTITY, 4002, "Not enough items");
    }
    owned.1 -= wanted;
    state.inventory.retain(|(_, quantity)| *quantity > 0);
    StatusCode::NO_CONTENT.into_response()
}

pub async fn virtual_balance(Path(_project_id): Path<u32>, headers: HeaderMap) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({
        "items": [
            {"sku": "gold", "type": "virtual_currency", "name": "Gold", "amount": 100},
            {"sku": "crystals", "type": "virtual_currency", "name": "Crystals", "amount": 5}
        ]
    }))
    .into_response()
}

#[derive(Deserialize)]
pub struct Redeem {
    pub coupon_code: String,
}

/// Only `WINTER2021` is a valid coupon.
pub async fn redeem_coupon(
    Path(_project_id): Path<u32>,
    headers: HeaderMap,
    Json(input): Json<Redeem>,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    if input.coupon_code != "WINTER2021" {
        return store_error(StatusCode::NOT_FOUND, 9701, "Coupon not found");
    }
    Json(json!({
        "items": [{"sku": "gold_100", "name": "100 Gold", "type": "bundle", "quantity": 1}]
    }))
    .into_response()
}
