//! Stateless request builder and response parser for the store API.
//!
//! # Design
//! `StoreClient` holds only the base URL, the project id and, when the
//! user is signed in, their token. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the `TransportResult`. The round-trip in between belongs
//! to the caller, so the client itself does no I/O.

use serde::Serialize;

use crate::adapter::{parse_empty, parse_json};
use crate::endpoint::{store, Endpoint, Query};
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpRequest, TransportResult};
use crate::options::{CartRequestOptions, ItemsRequestOptions};
use crate::store::types::*;

#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    project_id: String,
    token: Option<String>,
}

impl StoreClient {
    pub fn new(base_url: &str, project_id: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    pub fn build_get_virtual_items(&self, options: &ItemsRequestOptions) -> ApiResult<HttpRequest> {
        self.request(&store::GET_VIRTUAL_ITEMS, &[], options.to_query(), None::<&()>)
    }

    pub fn build_get_virtual_currency(&self, options: &ItemsRequestOptions) -> ApiResult<HttpRequest> {
        self.request(&store::GET_VIRTUAL_CURRENCY, &[], options.to_query(), None::<&()>)
    }

    pub fn build_get_virtual_currency_packages(
        &self,
        options: &ItemsRequestOptions,
    ) -> ApiResult<HttpRequest> {
        self.request(
            &store::GET_VIRTUAL_CURRENCY_PACKAGES,
            &[],
            options.to_query(),
            None::<&()>,
        )
    }

    /// The group comes from `options.external_id`, which is required here.
    pub fn build_get_items_by_group(&self, options: &ItemsRequestOptions) -> ApiResult<HttpRequest> {
        let external_id = options
            .external_id
            .as_deref()
            .ok_or_else(|| ApiError::missing("external_id"))?;
        self.request(
            &store::GET_ITEMS_BY_GROUP,
            &[("external_id", external_id)],
            options.to_query(),
            None::<&()>,
        )
    }

    pub fn build_get_physical_items(&self, options: &ItemsRequestOptions) -> ApiResult<HttpRequest> {
        self.request(&store::GET_PHYSICAL_ITEMS, &[], options.to_query(), None::<&()>)
    }

    pub fn parse_get_virtual_items(&self, result: TransportResult) -> ApiResult<VirtualItemsResponse> {
        parse_json(result)
    }

    pub fn parse_get_virtual_currency(
        &self,
        result: TransportResult,
    ) -> ApiResult<VirtualCurrencyResponse> {
        parse_json(result)
    }

    pub fn parse_get_virtual_currency_packages(
        &self,
        result: TransportResult,
    ) -> ApiResult<VirtualCurrencyPackageResponse> {
        parse_json(result)
    }

    pub fn parse_get_items_by_group(&self, result: TransportResult) -> ApiResult<VirtualItemsResponse> {
        parse_json(result)
    }

    pub fn parse_get_physical_items(&self, result: TransportResult) -> ApiResult<PhysicalItemsResponse> {
        parse_json(result)
    }

    // -----------------------------------------------------------------------
    // Cart
    // -----------------------------------------------------------------------

    pub fn build_get_current_cart(&self, options: &CartRequestOptions) -> ApiResult<HttpRequest> {
        self.request(&store::GET_CURRENT_CART, &[], options.to_query(), None::<&()>)
    }

    pub fn build_get_cart_by_id(
        &self,
        cart_id: &str,
        options: &CartRequestOptions,
    ) -> ApiResult<HttpRequest> {
        self.request(
            &store::GET_CART_BY_ID,
            &[("cart_id", cart_id)],
            options.to_query(),
            None::<&()>,
        )
    }

    pub fn build_clear_current_cart(&self) -> ApiResult<HttpRequest> {
        self.request(&store::CLEAR_CURRENT_CART, &[], Query::new(), None::<&()>)
    }

    pub fn build_clear_cart_by_id(&self, cart_id: &str) -> ApiResult<HttpRequest> {
        self.request(
            &store::CLEAR_CART_BY_ID,
            &[("cart_id", cart_id)],
            Query::new(),
            None::<&()>,
        )
    }

    pub fn build_fill_current_cart(&self, items: &[FillCartItem]) -> ApiResult<HttpRequest> {
        let body = FillCartBody {
            items: items.to_vec(),
        };
        self.request(&store::FILL_CURRENT_CART, &[], Query::new(), Some(&body))
    }

    pub fn build_update_item_in_current_cart(
        &self,
        item_sku: &str,
        quantity: u32,
    ) -> ApiResult<HttpRequest> {
        self.request(
            &store::UPDATE_ITEM_IN_CURRENT_CART,
            &[("item_sku", item_sku)],
            Query::new(),
            Some(&UpdateCartItemBody { quantity }),
        )
    }

    pub fn build_update_item_in_cart(
        &self,
        cart_id: &str,
        item_sku: &str,
        quantity: u32,
    ) -> ApiResult<HttpRequest> {
        self.request(
            &store::UPDATE_ITEM_IN_CART,
            &[("cart_id", cart_id), ("item_sku", item_sku)],
            Query::new(),
            Some(&UpdateCartItemBody { quantity }),
        )
    }

    pub fn build_delete_item_from_current_cart(&self, item_sku: &str) -> ApiResult<HttpRequest> {
        self.request(
            &store::DELETE_ITEM_FROM_CURRENT_CART,
            &[("item_sku", item_sku)],
            Query::new(),
            None::<&()>,
        )
    }

    pub fn build_delete_item_from_cart(&self, cart_id: &str, item_sku: &str) -> ApiResult<HttpRequest> {
        self.request(
            &store::DELETE_ITEM_FROM_CART,
            &[("cart_id", cart_id), ("item_sku", item_sku)],
            Query::new(),
            None::<&()>,
        )
    }

    pub fn parse_cart(&self, result: TransportResult) -> ApiResult<Cart> {
        parse_json(result)
    }

    /// Clear, fill, update and delete all answer 204 with no body.
    pub fn parse_cart_update(&self, result: TransportResult) -> ApiResult<()> {
        parse_empty(result)
    }

    // -----------------------------------------------------------------------
    // Orders, inventory, balance, coupons
    // -----------------------------------------------------------------------

    pub fn build_get_order(&self, order_id: &str) -> ApiResult<HttpRequest> {
        self.request(
            &store::GET_ORDER,
            &[("order_id", order_id)],
            Query::new(),
            None::<&()>,
        )
    }

    pub fn parse_get_order(&self, result: TransportResult) -> ApiResult<Order> {
        parse_json(result)
    }

    pub fn build_get_inventory(&self) -> ApiResult<HttpRequest> {
        self.request(&store::GET_INVENTORY, &[], Query::new(), None::<&()>)
    }

    pub fn parse_get_inventory(&self, result: TransportResult) -> ApiResult<InventoryResponse> {
        parse_json(result)
    }

    pub fn build_consume_item(&self, body: &ConsumeItemBody) -> ApiResult<HttpRequest> {
        self.request(&store::CONSUME_ITEM, &[], Query::new(), Some(body))
    }

    pub fn parse_consume_item(&self, result: TransportResult) -> ApiResult<()> {
        parse_empty(result)
    }

    pub fn build_get_virtual_balance(&self) -> ApiResult<HttpRequest> {
        self.request(&store::GET_VIRTUAL_BALANCE, &[], Query::new(), None::<&()>)
    }

    pub fn parse_get_virtual_balance(&self, result: TransportResult) -> ApiResult<VirtualBalanceResponse> {
        parse_json(result)
    }

    pub fn build_redeem_coupon(&self, body: &RedeemCouponBody) -> ApiResult<HttpRequest> {
        self.request(&store::REDEEM_COUPON, &[], Query::new(), Some(body))
    }

    pub fn parse_redeem_coupon(&self, result: TransportResult) -> ApiResult<RedeemCouponResponse> {
        parse_json(result)
    }

    // -----------------------------------------------------------------------

    fn request<B: Serialize>(
        &self,
        endpoint: &Endpoint,
        slots: &[(&str, &str)],
        query: Query,
        body: Option<&B>,
    ) -> ApiResult<HttpRequest> {
        let mut params = Vec::with_capacity(slots.len() + 1);
        params.push(("project_id", self.project_id.as_str()));
        params.extend_from_slice(slots);
        endpoint.request(&self.base_url, &params, query, self.token.as_deref(), body)
    }
}
