//! Endpoint descriptors.
//!
//! Every remote operation is one `Endpoint` constant: its name, method,
//! path template and whether it needs the user's bearer token. Templates use
//! `{slot}` segments; `Endpoint::url` fills them, percent-encoding each value
//! as a single path segment.
//!
//! `Query` collects query parameters. Absent values are never pushed, so a
//! request only carries the parameters the caller actually set.

use serde::Serialize;
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest};

/// Whether an operation is called on behalf of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    None,
    User,
}

/// Declarative shape of one remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub auth: Auth,
}

impl Endpoint {
    const fn new(name: &'static str, method: HttpMethod, path: &'static str, auth: Auth) -> Self {
        Self {
            name,
            method,
            path,
            auth,
        }
    }

    /// Names of the `{slot}` segments in the path template, in order.
    pub fn slots(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter_map(slot_name)
    }

    /// Resolve the template against `base_url`, filling slots from `params`.
    pub fn url(&self, base_url: &str, params: &[(&str, &str)]) -> ApiResult<String> {
        let mut url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(base_url.to_string()))?;
            segments.pop_if_empty();
            for segment in self.path.split('/').filter(|s| !s.is_empty()) {
                match slot_name(segment) {
                    Some(slot) => {
                        let value = params
                            .iter()
                            .find(|(key, _)| *key == slot)
                            .map(|(_, value)| *value)
                            .filter(|value| !value.is_empty())
                            .ok_or_else(|| ApiError::missing(slot))?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url.to_string())
    }

    /// Assemble the full request.
    ///
    /// A `User` endpoint sends `authorization: Bearer <token>` and fails
    /// with `ApiError::Config` when `token` is absent. A body is sent as
    /// JSON with `content-type: application/json`.
    pub fn request<B: Serialize>(
        &self,
        base_url: &str,
        params: &[(&str, &str)],
        query: Query,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResult<HttpRequest> {
        let path = self.url(base_url, params)?;

        let mut headers = Vec::new();
        if self.auth == Auth::User {
            let token = token
                .ok_or_else(|| ApiError::config(format!("{} requires a user token", self.name)))?;
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        let body = match body {
            Some(body) => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?)
            }
            None => None,
        };

        Ok(HttpRequest {
            method: self.method,
            path,
            query: query.into_pairs(),
            headers,
            body,
        })
    }
}

fn slot_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{').and_then(|s| s.strip_suffix('}'))
}

/// Query parameters for one request. Only present values are recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Push `key` once per value; nothing when `values` is empty.
    #[must_use]
    pub fn with_all<V: ToString>(mut self, key: &str, values: &[V]) -> Self {
        for value in values {
            self.0.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub mod store {
    use super::{Auth, Endpoint};
    use crate::http::HttpMethod::{Delete, Get, Post, Put};

    pub const GET_VIRTUAL_ITEMS: Endpoint = Endpoint::new(
        "get_virtual_items",
        Get,
        "/api/v2/project/{project_id}/items/virtual_items",
        Auth::None,
    );
    pub const GET_VIRTUAL_CURRENCY: Endpoint = Endpoint::new(
        "get_virtual_currency",
        Get,
        "/api/v2/project/{project_id}/items/virtual_currency",
        Auth::None,
    );
    pub const GET_VIRTUAL_CURRENCY_PACKAGES: Endpoint = Endpoint::new(
        "get_virtual_currency_packages",
        Get,
        "/api/v2/project/{project_id}/items/virtual_currency/package",
        Auth::None,
    );
    pub const GET_ITEMS_BY_GROUP: Endpoint = Endpoint::new(
        "get_items_by_group",
        Get,
        "/api/v2/project/{project_id}/items/virtual_items/group/{external_id}",
        Auth::None,
    );
    pub const GET_PHYSICAL_ITEMS: Endpoint = Endpoint::new(
        "get_physical_items",
        Get,
        "/api/v2/project/{project_id}/items/physical_good",
        Auth::None,
    );
    pub const GET_CURRENT_CART: Endpoint = Endpoint::new(
        "get_current_cart",
        Get,
        "/api/v2/project/{project_id}/cart",
        Auth::User,
    );
    pub const GET_CART_BY_ID: Endpoint = Endpoint::new(
        "get_cart_by_id",
        Get,
        "/api/v2/project/{project_id}/cart/{cart_id}",
        Auth::User,
    );
    pub const CLEAR_CURRENT_CART: Endpoint = Endpoint::new(
        "clear_current_cart",
        Put,
        "/api/v2/project/{project_id}/cart/clear",
        Auth::User,
    );
    pub const CLEAR_CART_BY_ID: Endpoint = Endpoint::new(
        "clear_cart_by_id",
        Put,
        "/api/v2/project/{project_id}/cart/{cart_id}/clear",
        Auth::User,
    );
    pub const FILL_CURRENT_CART: Endpoint = Endpoint::new(
        "fill_current_cart",
        Put,
        "/api/v2/project/{project_id}/cart/fill",
        Auth::User,
    );
    pub const UPDATE_ITEM_IN_CURRENT_CART: Endpoint = Endpoint::new(
        "update_item_in_current_cart",
        Put,
        "/api/v2/project/{project_id}/cart/item/{item_sku}",
        Auth::User,
    );
    pub const UPDATE_ITEM_IN_CART: Endpoint = Endpoint::new(
        "update_item_in_cart",
        Put,
        "/api/v2/project/{project_id}/cart/{cart_id}/item/{item_sku}",
        Auth::User,
    );
    pub const DELETE_ITEM_FROM_CURRENT_CART: Endpoint = Endpoint::new(
        "delete_item_from_current_cart",
        Delete,
        "/api/v2/project/{project_id}/cart/item/{item_sku}",
        Auth::User,
    );
    pub const DELETE_ITEM_FROM_CART: Endpoint = Endpoint::new(
        "delete_item_from_cart",
        Delete,
        "/api/v2/project/{project_id}/cart/{cart_id}/item/{item_sku}",
        Auth::User,
    );
    pub const GET_ORDER: Endpoint = Endpoint::new(
        "get_order",
        Get,
        "/api/v2/project/{project_id}/order/{order_id}",
        Auth::User,
    );
    pub const GET_INVENTORY: Endpoint = Endpoint::new(
        "get_inventory",
        Get,
        "/api/v2/project/{project_id}/user/inventory/items",
        Auth::User,
    );
    pub const CONSUME_ITEM: Endpoint = Endpoint::new(
        "consume_item",
        Post,
        "/api/v2/project/{project_id}/user/inventory/item/consume",
        Auth::User,
    );
    pub const GET_VIRTUAL_BALANCE: Endpoint = Endpoint::new(
        "get_virtual_balance",
        Get,
        "/api/v2/project/{project_id}/user/virtual_currency_balance",
        Auth::User,
    );
    pub const REDEEM_COUPON: Endpoint = Endpoint::new(
        "redeem_coupon",
        Post,
        "/api/v2/project/{project_id}/coupon/redeem",
        Auth::User,
    );

    pub const ALL: &[Endpoint] = &[
        GET_VIRTUAL_ITEMS,
        GET_VIRTUAL_CURRENCY,
        GET_VIRTUAL_CURRENCY_PACKAGES,
        GET_ITEMS_BY_GROUP,
        GET_PHYSICAL_ITEMS,
        GET_CURRENT_CART,
        GET_CART_BY_ID,
        CLEAR_CURRENT_CART,
        CLEAR_CART_BY_ID,
        FILL_CURRENT_CART,
        UPDATE_ITEM_IN_CURRENT_CART,
        UPDATE_ITEM_IN_CART,
        DELETE_ITEM_FROM_CURRENT_CART,
        DELETE_ITEM_FROM_CART,
        GET_ORDER,
        GET_INVENTORY,
        CONSUME_ITEM,
        GET_VIRTUAL_BALANCE,
        REDEEM_COUPON,
    ];
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

pub mod login {
    use super::{Auth, Endpoint};
    use crate::http::HttpMethod::{Get, Patch, Post};

    pub const REGISTER_USER: Endpoint = Endpoint::new("register_user", Post, "/api/user", Auth::None);
    pub const LOGIN: Endpoint = Endpoint::new("login", Post, "/api/login", Auth::None);
    pub const GET_SOCIAL_AUTH_URL: Endpoint = Endpoint::new(
        "get_social_auth_url",
        Get,
        "/api/social/{provider}/login_url",
        Auth::None,
    );
    pub const RESET_PASSWORD: Endpoint = Endpoint::new(
        "reset_password",
        Post,
        "/api/password/reset/request",
        Auth::None,
    );
    pub const START_AUTH_BY_EMAIL: Endpoint = Endpoint::new(
        "start_auth_by_email",
        Post,
        "/api/login/email/request",
        Auth::None,
    );
    pub const COMPLETE_AUTH_BY_EMAIL: Endpoint = Endpoint::new(
        "complete_auth_by_email",
        Post,
        "/api/login/email/confirm",
        Auth::None,
    );
    pub const START_AUTH_BY_PHONE: Endpoint = Endpoint::new(
        "start_auth_by_phone",
        Post,
        "/api/login/phone/request",
        Auth::None,
    );
    pub const COMPLETE_AUTH_BY_PHONE: Endpoint = Endpoint::new(
        "complete_auth_by_phone",
        Post,
        "/api/login/phone/confirm",
        Auth::None,
    );
    pub const GET_CURRENT_USER_DETAILS: Endpoint = Endpoint::new(
        "get_current_user_details",
        Get,
        "/api/users/me",
        Auth::User,
    );
    pub const UPDATE_CURRENT_USER_DETAILS: Endpoint = Endpoint::new(
        "update_current_user_details",
        Patch,
        "/api/users/me",
        Auth::User,
    );
    pub const SEARCH_USERS_BY_NICKNAME: Endpoint = Endpoint::new(
        "search_users_by_nickname",
        Get,
        "/api/users/search/by_nickname",
        Auth::User,
    );

    pub const ALL: &[Endpoint] = &[
        REGISTER_USER,
        LOGIN,
        GET_SOCIAL_AUTH_URL,
        RESET_PASSWORD,
        START_AUTH_BY_EMAIL,
        COMPLETE_AUTH_BY_EMAIL,
        START_AUTH_BY_PHONE,
        COMPLETE_AUTH_BY_PHONE,
        GET_CURRENT_USER_DETAILS,
        UPDATE_CURRENT_USER_DETAILS,
        SEARCH_USERS_BY_NICKNAME,
    ];
}
