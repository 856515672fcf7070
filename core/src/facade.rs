//! Async entry points.
//!
//! # Design
//! `XsollaSdk` is built once from an explicit `SdkConfig` and a
//! `Transport`. `store()` and `login()` hand out cheap facades that pair a
//! stateless client with the shared transport: build the request, issue
//! it once, classify the result. Nothing is cached between calls.
//!
//! Defaults from the configuration (the locale) are applied only when the
//! caller passes no options at all. A supplied options value is sent as is.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::SdkConfig;
use crate::endpoint::{login, store, Endpoint};
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpRequest, TransportResult};
use crate::login::types::*;
use crate::login::LoginClient;
use crate::options::{CartRequestOptions, ItemsRequestOptions};
use crate::social::{run_web_flow, WebAuthFlow};
use crate::store::types::*;
use crate::store::StoreClient;
use crate::transport::{ReqwestTransport, Transport};

/// Configured SDK: one configuration, one transport.
pub struct XsollaSdk<T> {
    config: Arc<SdkConfig>,
    transport: Arc<T>,
    web_auth: Option<Arc<dyn WebAuthFlow>>,
}

impl<T> Clone for XsollaSdk<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            web_auth: self.web_auth.clone(),
        }
    }
}

impl XsollaSdk<ReqwestTransport> {
    /// SDK backed by `reqwest`, using the configured request timeout.
    pub fn from_config(config: SdkConfig) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::new(config, transport)
    }
}

impl<T: Transport> XsollaSdk<T> {
    pub fn new(config: SdkConfig, transport: T) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
            web_auth: None,
        })
    }

    /// Install the browser flow used to finish social sign-ins.
    #[must_use]
    pub fn with_web_auth(mut self, flow: Arc<dyn WebAuthFlow>) -> Self {
        self.web_auth = Some(flow);
        self
    }

    /// Same SDK acting for the user identified by `token`.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        let config = SdkConfig::clone(&self.config).with_token(token);
        Self {
            config: Arc::new(config),
            transport: Arc::clone(&self.transport),
            web_auth: self.web_auth.clone(),
        }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Store facade, or `ApiError::Config` when no store project is set.
    pub fn store(&self) -> ApiResult<StoreApi<T>> {
        let project_id = self
            .config
            .store_project_id
            .ok_or_else(|| ApiError::config("store project id is not set"))?;
        let mut client = StoreClient::new(&self.config.store_base_url, project_id);
        if let Some(token) = &self.config.token {
            client = client.with_token(token.as_str());
        }
        Ok(StoreApi {
            client,
            transport: Arc::clone(&self.transport),
            locale: self.config.locale.clone(),
        })
    }

    /// Login facade, or `ApiError::Config` when no login project is set.
    pub fn login(&self) -> ApiResult<LoginApi<T>> {
        let project_id = self
            .config
            .login_project_id
            .as_deref()
            .ok_or_else(|| ApiError::config("login project id is not set"))?;
        let mut client = LoginClient::new(
            &self.config.login_base_url,
            project_id,
            &self.config.callback_url,
        );
        if let Some(token) = &self.config.token {
            client = client.with_token(token.as_str());
        }
        Ok(LoginApi {
            client,
            transport: Arc::clone(&self.transport),
            web_auth: self.web_auth.clone(),
            social_auth_timeout: self.config.social_auth_timeout,
        })
    }
}

async fn dispatch<T: Transport>(
    transport: &T,
    endpoint: &Endpoint,
    request: HttpRequest,
) -> TransportResult {
    debug!(
        operation = endpoint.name,
        method = request.method.as_str(),
        url = %request.url(),
        "dispatching request"
    );
    let result = transport.issue(request).await;
    match &result {
        Ok(response) if !response.is_success() => {
            warn!(operation = endpoint.name, status = response.status, "request rejected");
        }
        Err(e) => warn!(operation = endpoint.name, error = %e, "request failed"),
        Ok(_) => {}
    }
    result
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Store operations for one configured project.
pub struct StoreApi<T> {
    client: StoreClient,
    transport: Arc<T>,
    locale: Option<String>,
}

impl<T: Transport> StoreApi<T> {
    fn items_options(&self, options: Option<ItemsRequestOptions>) -> ItemsRequestOptions {
        options.unwrap_or_else(|| ItemsRequestOptions {
            locale: self.locale.clone(),
            ..Default::default()
        })
    }

    fn cart_options(&self, options: Option<CartRequestOptions>) -> CartRequestOptions {
        options.unwrap_or_else(|| CartRequestOptions {
            locale: self.locale.clone(),
            ..Default::default()
        })
    }

    pub async fn get_virtual_items(
        &self,
        options: Option<ItemsRequestOptions>,
    ) -> ApiResult<VirtualItemsResponse> {
        let request = self.client.build_get_virtual_items(&self.items_options(options))?;
        let result = dispatch(&*self.transport, &store::GET_VIRTUAL_ITEMS, request).await;
        self.client.parse_get_virtual_items(result)
    }

    pub async fn get_virtual_currency(
        &self,
        options: Option<ItemsRequestOptions>,
    ) -> ApiResult<VirtualCurrencyResponse> {
        let request = self.client.build_get_virtual_currency(&self.items_options(options))?;
        let result = dispatch(&*self.transport, &store::GET_VIRTUAL_CURRENCY, request).await;
        self.client.parse_get_virtual_currency(result)
    }

    pub async fn get_virtual_currency_packages(
        &self,
        options: Option<ItemsRequestOptions>,
    ) -> ApiResult<VirtualCurrencyPackageResponse> {
        let request = self
            .client
            .build_get_virtual_currency_packages(&self.items_options(options))?;
        let result =
            dispatch(&*self.transport, &store::GET_VIRTUAL_CURRENCY_PACKAGES, request).await;
        self.client.parse_get_virtual_currency_packages(result)
    }

    pub async fn get_items_by_group(
        &self,
        external_id: &str,
        options: Option<ItemsRequestOptions>,
    ) -> ApiResult<VirtualItemsResponse> {
        let mut options = self.items_options(options);
        options.external_id = Some(external_id.to_string());
        let request = self.client.build_get_items_by_group(&options)?;
        let result = dispatch(&*self.transport, &store::GET_ITEMS_BY_GROUP, request).await;
        self.client.parse_get_items_by_group(result)
    }

    pub async fn get_physical_items(
        &self,
        options: Option<ItemsRequestOptions>,
    ) -> ApiResult<PhysicalItemsResponse> {
        let request = self.client.build_get_physical_items(&self.items_options(options))?;
        let result = dispatch(&*self.transport, &store::GET_PHYSICAL_ITEMS, request).await;
        self.client.parse_get_physical_items(result)
    }

    pub async fn get_current_cart(&self, options: Option<CartRequestOptions>) -> ApiResult<Cart> {
        let request = self.client.build_get_current_cart(&self.cart_options(options))?;
        let result = dispatch(&*self.transport, &store::GET_CURRENT_CART, request).await;
        self.client.parse_cart(result)
    }

    pub async fn get_cart_by_id(
        &self,
        cart_id: &str,
        options: Option<CartRequestOptions>,
    ) -> ApiResult<Cart> {
        let request = self
            .client
            .build_get_cart_by_id(cart_id, &self.cart_options(options))?;
        let result = dispatch(&*self.transport, &store::GET_CART_BY_ID, request).await;
        self.client.parse_cart(result)
    }

    pub async fn clear_current_cart(&self) -> ApiResult<()> {
        let request = self.client.build_clear_current_cart()?;
        let result = dispatch(&*self.transport, &store::CLEAR_CURRENT_CART, request).await;
        self.client.parse_cart_update(result)
    }

    pub async fn clear_cart_by_id(&self, cart_id: &str) -> ApiResult<()> {
        let request = self.client.build_clear_cart_by_id(cart_id)?;
        let result = dispatch(&*self.transport, &store::CLEAR_CART_BY_ID, request).await;
        self.client.parse_cart_update(result)
    }

    pub async fn fill_current_cart(&self, items: &[FillCartItem]) -> ApiResult<()> {
        let request = self.client.build_fill_current_cart(items)?;
        let result = dispatch(&*self.transport, &store::FILL_CURRENT_CART, request).await;
        self.client.parse_cart_update(result)
    }

    pub async fn update_item_in_current_cart(&self, item_sku: &str, quantity: u32) -> ApiResult<()> {
        let request = self.client.build_update_item_in_current_cart(item_sku, quantity)?;
        let result =
            dispatch(&*self.transport, &store::UPDATE_ITEM_IN_CURRENT_CART, request).await;
        self.client.parse_cart_update(result)
    }

    pub async fn update_item_in_cart(
        &self,
        cart_id: &str,
        item_sku: &str,
        quantity: u32,
    ) -> ApiResult<()> {
        let request = self.client.build_update_item_in_cart(cart_id, item_sku, quantity)?;
        let result = dispatch(&*self.transport, &store::UPDATE_ITEM_IN_CART, request).await;
        self.client.parse_cart_update(result)
    }

    pub async fn delete_item_from_current_cart(&self, item_sku: &str) -> ApiResult<()> {
        let request = self.client.build_delete_item_from_current_cart(item_sku)?;
        let result =
            dispatch(&*self.transport, &store::DELETE_ITEM_FROM_CURRENT_CART, request).await;
        self.client.parse_cart_update(result)
    }

    pub async fn delete_item_from_cart(&self, cart_id: &str, item_sku: &str) -> ApiResult<()> {
        let request = self.client.build_delete_item_from_cart(cart_id, item_sku)?;
        let result = dispatch(&*self.transport, &store::DELETE_ITEM_FROM_CART, request).await;
        self.client.parse_cart_update(result)
    }

    pub async fn get_order(&self, order_id: &str) -> ApiResult<Order> {
        let request = self.client.build_get_order(order_id)?;
        let result = dispatch(&*self.transport, &store::GET_ORDER, request).await;
        self.client.parse_get_order(result)
    }

    pub async fn get_inventory(&self) -> ApiResult<InventoryResponse> {
        let request = self.client.build_get_inventory()?;
        let result = dispatch(&*self.transport, &store::GET_INVENTORY, request).await;
        self.client.parse_get_inventory(result)
    }

    pub async fn consume_item(&self, body: &ConsumeItemBody) -> ApiResult<()> {
        let request = self.client.build_consume_item(body)?;
        let result = dispatch(&*self.transport, &store::CONSUME_ITEM, request).await;
        self.client.parse_consume_item(result)
    }

    pub async fn get_virtual_balance(&self) -> ApiResult<VirtualBalanceResponse> {
        let request = self.client.build_get_virtual_balance()?;
        let result = dispatch(&*self.transport, &store::GET_VIRTUAL_BALANCE, request).await;
        self.client.parse_get_virtual_balance(result)
    }

    pub async fn redeem_coupon(&self, body: &RedeemCouponBody) -> ApiResult<RedeemCouponResponse> {
        let request = self.client.build_redeem_coupon(body)?;
        let result = dispatch(&*self.transport, &store::REDEEM_COUPON, request).await;
        self.client.parse_redeem_coupon(result)
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Login operations for one configured project.
pub struct LoginApi<T> {
    client: LoginClient,
    transport: Arc<T>,
    web_auth: Option<Arc<dyn WebAuthFlow>>,
    social_auth_timeout: Option<Duration>,
}

impl<T: Transport> LoginApi<T> {
    pub async fn register_user(&self, user: &NewUser) -> ApiResult<()> {
        let request = self.client.build_register_user(user)?;
        let result = dispatch(&*self.transport, &login::REGISTER_USER, request).await;
        self.client.parse_register_user(result)
    }

    /// Sign in with username and password.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthToken> {
        let body = LoginBody {
            username: username.to_string(),
            password: password.to_string(),
            remember_me: false,
        };
        let request = self.client.build_login(&body)?;
        let result = dispatch(&*self.transport, &login::LOGIN, request).await;
        let outcome = self.client.parse_login(result)?;
        self.resolve(outcome).await
    }

    /// Provider URL the user must visit to sign in with `network`.
    ///
    /// When the server authenticates directly instead of redirecting, this
    /// is the callback URL, already carrying the token in its `token`
    /// query parameter; `start_social_auth` finishes such a sign-in
    /// without opening a browser.
    pub async fn get_social_auth_url(&self, network: SocialNetwork) -> ApiResult<String> {
        match self.fetch_social(network).await? {
            AuthResult::SocialRedirect(social) => Ok(social.url),
            AuthResult::Authenticated(auth) => Ok(auth.login_url),
        }
    }

    /// Sign in with `network` through the installed `WebAuthFlow`. Resolves
    /// once the flow reports the token.
    pub async fn start_social_auth(&self, network: SocialNetwork) -> ApiResult<AuthToken> {
        let outcome = self.fetch_social(network).await?;
        self.resolve(outcome).await
    }

    pub async fn reset_password(&self, username: &str) -> ApiResult<()> {
        let request = self.client.build_reset_password(username)?;
        let result = dispatch(&*self.transport, &login::RESET_PASSWORD, request).await;
        self.client.parse_reset_password(result)
    }

    pub async fn start_auth_by_email(
        &self,
        body: &StartAuthByEmailBody,
    ) -> ApiResult<OperationResponse> {
        let request = self.client.build_start_auth_by_email(body)?;
        let result = dispatch(&*self.transport, &login::START_AUTH_BY_EMAIL, request).await;
        self.client.parse_start_passwordless(result)
    }

    pub async fn complete_auth_by_email(
        &self,
        body: &CompleteAuthByEmailBody,
    ) -> ApiResult<AuthToken> {
        let request = self.client.build_complete_auth_by_email(body)?;
        let result = dispatch(&*self.transport, &login::COMPLETE_AUTH_BY_EMAIL, request).await;
        let outcome = self.client.parse_complete_passwordless(result)?;
        self.resolve(outcome).await
    }

    pub async fn start_auth_by_phone(
        &self,
        body: &StartAuthByPhoneBody,
    ) -> ApiResult<OperationResponse> {
        let request = self.client.build_start_auth_by_phone(body)?;
        let result = dispatch(&*self.transport, &login::START_AUTH_BY_PHONE, request).await;
        self.client.parse_start_passwordless(result)
    }

    pub async fn complete_auth_by_phone(
        &self,
        body: &CompleteAuthByPhoneBody,
    ) -> ApiResult<AuthToken> {
        let request = self.client.build_complete_auth_by_phone(body)?;
        let result = dispatch(&*self.transport, &login::COMPLETE_AUTH_BY_PHONE, request).await;
        let outcome = self.client.parse_complete_passwordless(result)?;
        self.resolve(outcome).await
    }

    pub async fn get_current_user_details(&self) -> ApiResult<UserDetails> {
        let request = self.client.build_get_current_user_details()?;
        let result = dispatch(&*self.transport, &login::GET_CURRENT_USER_DETAILS, request).await;
        self.client.parse_user_details(result)
    }

    pub async fn update_current_user_details(
        &self,
        body: &UpdateUserDetailsBody,
    ) -> ApiResult<UserDetails> {
        let request = self.client.build_update_current_user_details(body)?;
        let result =
            dispatch(&*self.transport, &login::UPDATE_CURRENT_USER_DETAILS, request).await;
        self.client.parse_user_details(result)
    }

    pub async fn search_users_by_nickname(
        &self,
        nickname: &str,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> ApiResult<SearchUsersResponse> {
        let request = self
            .client
            .build_search_users_by_nickname(nickname, offset, limit)?;
        let result = dispatch(&*self.transport, &login::SEARCH_USERS_BY_NICKNAME, request).await;
        self.client.parse_search_users_by_nickname(result)
    }

    async fn fetch_social(&self, network: SocialNetwork) -> ApiResult<AuthResult> {
        let request = self.client.build_get_social_auth_url(network)?;
        let result = dispatch(&*self.transport, &login::GET_SOCIAL_AUTH_URL, request).await;
        self.client.parse_get_social_auth_url(result)
    }

    async fn resolve(&self, outcome: AuthResult) -> ApiResult<AuthToken> {
        match outcome {
            AuthResult::Authenticated(auth) => auth
                .token()
                .map(|token| AuthToken { token })
                .ok_or_else(|| ApiError::Deserialization("login_url carries no token".to_string())),
            AuthResult::SocialRedirect(social) => {
                let flow = self
                    .web_auth
                    .as_deref()
                    .ok_or_else(|| ApiError::config("social sign-in needs a web auth flow"))?;
                run_web_flow(
                    flow,
                    &social.url,
                    self.client.callback_url(),
                    self.social_auth_timeout,
                )
                .await
            }
        }
    }
}
