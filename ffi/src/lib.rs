//! C-ABI wrapper around `xsolla-core`.
//!
//! # Overview
//! Exposes the store and login APIs through `extern "C"` functions for
//! hosts that cannot drive a Rust future. The host calls `xsolla_init`
//! once with a JSON `SdkConfig`; every other entry point starts the call on
//! the library's own tokio runtime and returns immediately. The result
//! arrives later, exactly once, through the callback passed to that entry
//! point, on a runtime worker thread.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One process-wide `Registry`, set once. Calls made before it exists
//!   report `Config` synchronously through their callback.
//! - Structured arguments (options, request bodies) travel as JSON strings;
//!   a null pointer means "not given" for optional ones.
//! - Results carry their payload as JSON in a borrowed `FfiResult`.
//! - Successful sign-ins store the token in the registry; later store and
//!   user calls send it.

pub mod types;

use std::ffi::{c_void, CStr};
use std::future::Future;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};
use xsolla_core::login::types::*;
use xsolla_core::store::types::{ConsumeItemBody, FillCartItem, RedeemCouponBody};
use xsolla_core::{
    ApiError, ApiResult, CartRequestOptions, ItemsRequestOptions, ReqwestTransport, SdkConfig,
    SocialCompletion, SocialNetwork, WebAuthFlow, XsollaSdk,
};

use types::*;

type Sdk = XsollaSdk<ReqwestTransport>;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static REGISTRY: OnceLock<Registry> = OnceLock::new();

struct Registry {
    runtime: Runtime,
    sdk: Sdk,
    token: RwLock<Option<String>>,
    web_flow: Option<Arc<HostWebFlow>>,
}

impl Registry {
    fn build(config: SdkConfig, open_url: Option<FfiOpenUrl>, user_data: *mut c_void) -> ApiResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("xsolla-ffi")
            .build()
            .map_err(|e| ApiError::config(format!("cannot start runtime: {e}")))?;
        let token = config.token.clone();
        let mut sdk = XsollaSdk::from_config(config)?;
        let web_flow = open_url.map(|open_url| Arc::new(HostWebFlow::new(open_url, user_data)));
        if let Some(flow) = &web_flow {
            sdk = sdk.with_web_auth(flow.clone());
        }
        Ok(Registry {
            runtime,
            sdk,
            token: RwLock::new(token),
            web_flow,
        })
    }

    /// SDK acting for the signed-in user, if any.
    fn sdk(&self) -> Sdk {
        match self.token.read().unwrap_or_else(PoisonError::into_inner).as_deref() {
            Some(token) => self.sdk.with_token(token),
            None => self.sdk.clone(),
        }
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Remember the token of a successful sign-in.
    fn signed_in(&self, result: ApiResult<AuthToken>) -> ApiResult<AuthToken> {
        if let Ok(token) = &result {
            self.set_token(Some(token.token.clone()));
        }
        result
    }
}

fn not_initialized() -> ApiError {
    ApiError::config("xsolla_init has not been called")
}

/// Start one asynchronous call.
///
/// `start` runs synchronously: it reads the arguments and returns the
/// future to spawn. Any error it returns, and a missing registry, is
/// delivered before this function returns.
fn entry<T, F>(callback: FfiCallback, user_data: *mut c_void, name: &str, start: F)
where
    T: Serialize + Send + 'static,
    F: FnOnce(&'static Registry) -> ApiResult<std::pin::Pin<Box<dyn Future<Output = ApiResult<T>> + Send>>>,
{
    let reply = Reply::new(callback, user_data);
    let outcome = catch_unwind(AssertUnwindSafe(move || {
        let Some(registry) = REGISTRY.get() else {
            reply.send(Outcome::from_error(&not_initialized()));
            return;
        };
        match start(registry) {
            Ok(call) => {
                debug!(operation = name, "call started");
                registry.runtime.spawn(async move {
                    let result = call.await;
                    reply.send(Outcome::from_result(result));
                });
            }
            Err(e) => reply.send(Outcome::from_error(&e)),
        }
    }));
    if outcome.is_err() {
        warn!(operation = name, "panic while starting call");
    }
}

/// Box a call for `entry`.
fn call<T, Fut>(fut: Fut) -> ApiResult<std::pin::Pin<Box<dyn Future<Output = ApiResult<T>> + Send>>>
where
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    Ok(Box::pin(fut))
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Borrow a required C string argument.
fn required<'a>(ptr: *const c_char, name: &str) -> ApiResult<&'a str> {
    if ptr.is_null() {
        return Err(ApiError::missing(name));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| ApiError::missing(format!("{name} (not UTF-8)")))
}

/// Owned copy of a required C string argument.
fn required_string(ptr: *const c_char, name: &str) -> ApiResult<String> {
    required(ptr, name).map(str::to_string)
}

/// Parse a required JSON argument.
fn required_json<T: DeserializeOwned>(ptr: *const c_char, name: &str) -> ApiResult<T> {
    let raw = required(ptr, name)?;
    serde_json::from_str(raw).map_err(|e| ApiError::Deserialization(format!("{name}: {e}")))
}

/// Parse an optional JSON argument; null means not given.
fn optional_json<T: DeserializeOwned>(ptr: *const c_char, name: &str) -> ApiResult<Option<T>> {
    if ptr.is_null() {
        return Ok(None);
    }
    required_json(ptr, name).map(Some)
}

fn network(ptr: *const c_char) -> ApiResult<SocialNetwork> {
    let name = required(ptr, "provider")?;
    SocialNetwork::from_provider_name(name)
        .ok_or_else(|| ApiError::missing(format!("provider (unknown: {name})")))
}

/// Negative means not given.
fn optional_count(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Initialize the library. Must be called exactly once per process.
///
/// `config_json` is a JSON `SdkConfig`; absent fields take their defaults.
/// `open_url` may be null, in which case social sign-in is unavailable and
/// only `xsolla_login_get_social_auth_url` works. `user_data` is passed back
/// to every `open_url` call.
///
/// Returns `Config` when already initialized or when the configuration is
/// invalid, `InvalidArgument` when `config_json` is null.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_init(
    config_json: *const c_char,
    open_url: Option<FfiOpenUrl>,
    user_data: *mut c_void,
) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if REGISTRY.get().is_some() {
            warn!("xsolla_init called twice");
            return FfiErrorCode::Config;
        }
        let config = match required(config_json, "config_json").and_then(SdkConfig::from_json) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "rejected configuration");
                return e.kind().into();
            }
        };
        let registry = match Registry::build(config, open_url, user_data) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(error = %e, "initialization failed");
                return e.kind().into();
            }
        };
        match REGISTRY.set(registry) {
            Ok(()) => {
                info!("xsolla initialized");
                FfiErrorCode::Ok
            }
            Err(_) => FfiErrorCode::Config,
        }
    }))
    .unwrap_or(FfiErrorCode::Internal)
}

/// Replace the user token sent by store and user calls. Null signs out.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_set_token(token: *const c_char) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        let Some(registry) = REGISTRY.get() else {
            return FfiErrorCode::Config;
        };
        if token.is_null() {
            registry.set_token(None);
            return FfiErrorCode::Ok;
        }
        match required_string(token, "token") {
            Ok(token) => {
                registry.set_token(Some(token));
                FfiErrorCode::Ok
            }
            Err(e) => e.kind().into(),
        }
    }))
    .unwrap_or(FfiErrorCode::Internal)
}

// ---------------------------------------------------------------------------
// Social sign-in
// ---------------------------------------------------------------------------

/// `WebAuthFlow` that asks the host to open the URL and waits for it to
/// report the redirect.
struct HostWebFlow {
    open_url: FfiOpenUrl,
    user_data: UserData,
    pending: Mutex<Option<SocialCompletion>>,
}

impl HostWebFlow {
    fn new(open_url: FfiOpenUrl, user_data: *mut c_void) -> Self {
        HostWebFlow {
            open_url,
            user_data: UserData(user_data),
            pending: Mutex::new(None),
        }
    }

    /// The pending completion, unless its waiter is already gone (the wait
    /// timed out or the call was torn down).
    fn take(&self) -> Option<SocialCompletion> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .filter(|completion| !completion.is_abandoned())
    }

    fn put(&self, completion: SocialCompletion) -> Option<SocialCompletion> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(completion)
    }

    /// Finish the pending sign-in from a redirect. A redirect that is not
    /// the callback leaves it pending.
    fn complete(&self, redirect_url: &str) -> FfiErrorCode {
        let Some(completion) = self.take() else {
            return FfiErrorCode::Social;
        };
        match completion.complete_with_redirect(redirect_url) {
            Ok(()) => FfiErrorCode::Ok,
            Err(completion) => {
                self.put(completion);
                FfiErrorCode::InvalidArgument
            }
        }
    }

    fn cancel(&self) -> FfiErrorCode {
        match self.take() {
            Some(completion) => {
                drop(completion);
                FfiErrorCode::Ok
            }
            None => FfiErrorCode::Social,
        }
    }
}

impl WebAuthFlow for HostWebFlow {
    fn start(&self, url: &str, callback_url: &str, completion: SocialCompletion) {
        // A newer sign-in replaces an older one, which ends as cancelled.
        if self.put(completion).is_some() {
            debug!("previous social sign-in superseded");
        }
        let url = c_string(url.to_string());
        let callback_url = c_string(callback_url.to_string());
        (self.open_url)(self.user_data.0, url.as_ptr(), callback_url.as_ptr());
    }
}

/// Report the URL the host's browser was redirected to. Completes the
/// pending social sign-in when it is the callback URL carrying a token.
///
/// Returns `InvalidArgument` for any other URL (the sign-in stays pending),
/// `Social` when no sign-in is pending, `Config` before init or when init
/// was given no `open_url`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_social_auth_complete(redirect_url: *const c_char) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        let Some(flow) = REGISTRY.get().and_then(|r| r.web_flow.as_ref()) else {
            return FfiErrorCode::Config;
        };
        match required(redirect_url, "redirect_url") {
            Ok(url) => flow.complete(url),
            Err(e) => e.kind().into(),
        }
    }))
    .unwrap_or(FfiErrorCode::Internal)
}

/// Abandon the pending social sign-in; its callback reports `Social`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_social_auth_cancel() -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        match REGISTRY.get().and_then(|r| r.web_flow.as_ref()) {
            Some(flow) => flow.cancel(),
            None => FfiErrorCode::Config,
        }
    }))
    .unwrap_or(FfiErrorCode::Internal)
}

// ---------------------------------------------------------------------------
// Store: catalog
// ---------------------------------------------------------------------------

/// List virtual items. `options_json` is an optional `ItemsRequestOptions`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_virtual_items(
    options_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_virtual_items", |r| {
        let options = optional_json::<ItemsRequestOptions>(options_json, "options_json")?;
        let store = r.sdk().store()?;
        call(async move { store.get_virtual_items(options).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_virtual_currency(
    options_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_virtual_currency", |r| {
        let options = optional_json::<ItemsRequestOptions>(options_json, "options_json")?;
        let store = r.sdk().store()?;
        call(async move { store.get_virtual_currency(options).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_virtual_currency_packages(
    options_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_virtual_currency_packages", |r| {
        let options = optional_json::<ItemsRequestOptions>(options_json, "options_json")?;
        let store = r.sdk().store()?;
        call(async move { store.get_virtual_currency_packages(options).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_items_by_group(
    external_id: *const c_char,
    options_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_items_by_group", |r| {
        let external_id = required_string(external_id, "external_id")?;
        let options = optional_json::<ItemsRequestOptions>(options_json, "options_json")?;
        let store = r.sdk().store()?;
        call(async move { store.get_items_by_group(&external_id, options).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_physical_items(
    options_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_physical_items", |r| {
        let options = optional_json::<ItemsRequestOptions>(options_json, "options_json")?;
        let store = r.sdk().store()?;
        call(async move { store.get_physical_items(options).await })
    })
}

// ---------------------------------------------------------------------------
// Store: cart
// ---------------------------------------------------------------------------

/// Read the current cart. `options_json` is an optional `CartRequestOptions`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_current_cart(
    options_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_current_cart", |r| {
        let options = optional_json::<CartRequestOptions>(options_json, "options_json")?;
        let store = r.sdk().store()?;
        call(async move { store.get_current_cart(options).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_cart_by_id(
    cart_id: *const c_char,
    options_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_cart_by_id", |r| {
        let cart_id = required_string(cart_id, "cart_id")?;
        let options = optional_json::<CartRequestOptions>(options_json, "options_json")?;
        let store = r.sdk().store()?;
        call(async move { store.get_cart_by_id(&cart_id, options).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_clear_current_cart(callback: FfiCallback, user_data: *mut c_void) {
    entry(callback, user_data, "clear_current_cart", |r| {
        let store = r.sdk().store()?;
        call(async move { store.clear_current_cart().await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_clear_cart_by_id(
    cart_id: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "clear_cart_by_id", |r| {
        let cart_id = required_string(cart_id, "cart_id")?;
        let store = r.sdk().store()?;
        call(async move { store.clear_cart_by_id(&cart_id).await })
    })
}

/// Replace the current cart's content. `items_json` is an array of
/// `{"sku", "quantity"}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_fill_current_cart(
    items_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "fill_current_cart", |r| {
        let items: Vec<FillCartItem> = required_json(items_json, "items_json")?;
        let store = r.sdk().store()?;
        call(async move { store.fill_current_cart(&items).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_update_item_in_current_cart(
    item_sku: *const c_char,
    quantity: u32,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "update_item_in_current_cart", |r| {
        let sku = required_string(item_sku, "item_sku")?;
        let store = r.sdk().store()?;
        call(async move { store.update_item_in_current_cart(&sku, quantity).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_update_item_in_cart(
    cart_id: *const c_char,
    item_sku: *const c_char,
    quantity: u32,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "update_item_in_cart", |r| {
        let cart_id = required_string(cart_id, "cart_id")?;
        let sku = required_string(item_sku, "item_sku")?;
        let store = r.sdk().store()?;
        call(async move { store.update_item_in_cart(&cart_id, &sku, quantity).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_delete_item_from_current_cart(
    item_sku: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "delete_item_from_current_cart", |r| {
        let sku = required_string(item_sku, "item_sku")?;
        let store = r.sdk().store()?;
        call(async move { store.delete_item_from_current_cart(&sku).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_delete_item_from_cart(
    cart_id: *const c_char,
    item_sku: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "delete_item_from_cart", |r| {
        let cart_id = required_string(cart_id, "cart_id")?;
        let sku = required_string(item_sku, "item_sku")?;
        let store = r.sdk().store()?;
        call(async move { store.delete_item_from_cart(&cart_id, &sku).await })
    })
}

// ---------------------------------------------------------------------------
// Store: orders, inventory, balance, coupons
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_order(
    order_id: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_order", |r| {
        let order_id = required_string(order_id, "order_id")?;
        let store = r.sdk().store()?;
        call(async move { store.get_order(&order_id).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_inventory(callback: FfiCallback, user_data: *mut c_void) {
    entry(callback, user_data, "get_inventory", |r| {
        let store = r.sdk().store()?;
        call(async move { store.get_inventory().await })
    })
}

/// `body_json` is `{"sku", "quantity"?, "instance_id"?}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_consume_item(
    body_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "consume_item", |r| {
        let body: ConsumeItemBody = required_json(body_json, "body_json")?;
        let store = r.sdk().store()?;
        call(async move { store.consume_item(&body).await })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_get_virtual_balance(callback: FfiCallback, user_data: *mut c_void) {
    entry(callback, user_data, "get_virtual_balance", |r| {
        let store = r.sdk().store()?;
        call(async move { store.get_virtual_balance().await })
    })
}

/// `body_json` is `{"coupon_code", "selected_unit_items"?}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_store_redeem_coupon(
    body_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "redeem_coupon", |r| {
        let body: RedeemCouponBody = required_json(body_json, "body_json")?;
        let store = r.sdk().store()?;
        call(async move { store.redeem_coupon(&body).await })
    })
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// `user_json` is `{"username", "email", "password", "accept_consent"?}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_register_user(
    user_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "register_user", |r| {
        let user: NewUser = required_json(user_json, "user_json")?;
        let login = r.sdk().login()?;
        call(async move { login.register_user(&user).await })
    })
}

/// Sign in with username and password. The payload is `{"token"}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_login(
    username: *const c_char,
    password: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "login", |r| {
        let username = required_string(username, "username")?;
        let password = required_string(password, "password")?;
        let login = r.sdk().login()?;
        call(async move { r.signed_in(login.login(&username, &password).await) })
    })
}

/// Provider URL for `provider` (`google`, `facebook`, ...). The payload is a
/// JSON string.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_get_social_auth_url(
    provider: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_social_auth_url", |r| {
        let network = network(provider)?;
        let login = r.sdk().login()?;
        call(async move { login.get_social_auth_url(network).await })
    })
}

/// Sign in with `provider` through the host's `open_url`. The callback
/// fires once the host completes or cancels the sign-in.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_start_social_auth(
    provider: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "start_social_auth", |r| {
        let network = network(provider)?;
        let login = r.sdk().login()?;
        call(async move { r.signed_in(login.start_social_auth(network).await) })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_reset_password(
    username: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "reset_password", |r| {
        let username = required_string(username, "username")?;
        let login = r.sdk().login()?;
        call(async move { login.reset_password(&username).await })
    })
}

/// `body_json` is `{"email", "link_url"?, "send_link"?}`. The payload is
/// `{"operation_id"}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_start_auth_by_email(
    body_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "start_auth_by_email", |r| {
        let body: StartAuthByEmailBody = required_json(body_json, "body_json")?;
        let login = r.sdk().login()?;
        call(async move { login.start_auth_by_email(&body).await })
    })
}

/// `body_json` is `{"code", "operation_id", "email"}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_complete_auth_by_email(
    body_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "complete_auth_by_email", |r| {
        let body: CompleteAuthByEmailBody = required_json(body_json, "body_json")?;
        let login = r.sdk().login()?;
        call(async move { r.signed_in(login.complete_auth_by_email(&body).await) })
    })
}

/// `body_json` is `{"phone_number", "link_url"?, "send_link"?}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_start_auth_by_phone(
    body_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "start_auth_by_phone", |r| {
        let body: StartAuthByPhoneBody = required_json(body_json, "body_json")?;
        let login = r.sdk().login()?;
        call(async move { login.start_auth_by_phone(&body).await })
    })
}

/// `body_json` is `{"code", "operation_id", "phone_number"}`.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_complete_auth_by_phone(
    body_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "complete_auth_by_phone", |r| {
        let body: CompleteAuthByPhoneBody = required_json(body_json, "body_json")?;
        let login = r.sdk().login()?;
        call(async move { r.signed_in(login.complete_auth_by_phone(&body).await) })
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_get_current_user_details(
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "get_current_user_details", |r| {
        let login = r.sdk().login()?;
        call(async move { login.get_current_user_details().await })
    })
}

/// `body_json` holds the profile fields to change.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_update_current_user_details(
    body_json: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "update_current_user_details", |r| {
        let body: UpdateUserDetailsBody = required_json(body_json, "body_json")?;
        let login = r.sdk().login()?;
        call(async move { login.update_current_user_details(&body).await })
    })
}

/// `offset` and `limit` are omitted when negative.
#[unsafe(no_mangle)]
pub extern "C" fn xsolla_login_search_users_by_nickname(
    nickname: *const c_char,
    offset: i64,
    limit: i64,
    callback: FfiCallback,
    user_data: *mut c_void,
) {
    entry(callback, user_data, "search_users_by_nickname", |r| {
        let nickname = required_string(nickname, "nickname")?;
        let login = r.sdk().login()?;
        call(async move {
            login
                .search_users_by_nickname(&nickname, optional_count(offset), optional_count(limit))
                .await
        })
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
