//! `XsollaSdk` over `reqwest` against the live mock server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mock_server::{DEMO_PASSWORD, DEMO_TOKEN, DEMO_USERNAME};
use xsolla_core::error::SERVER_IS_NOT_RESPONDING;
use xsolla_core::login::types::{CompleteAuthByPhoneBody, StartAuthByPhoneBody};
use xsolla_core::store::types::FillCartItem;
use xsolla_core::{
    ApiError, ErrorKind, ItemsRequestOptions, SdkConfig, SocialCompletion, SocialNetwork,
    WebAuthFlow, XsollaSdk,
};

const STORE_PROJECT: u32 = 44056;
const LOGIN_PROJECT: &str = "753ec123-3245-11ea-b687-42010aa80004";

async fn start_mock() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    addr
}

fn config(addr: SocketAddr) -> SdkConfig {
    SdkConfig::default()
        .with_base_url(format!("http://{addr}"))
        .with_store_project_id(STORE_PROJECT)
        .with_login_project_id(LOGIN_PROJECT)
}

/// Pretends the browser followed the provider page straight to the callback.
struct RedirectingBrowser {
    token: &'static str,
    opened: Mutex<Vec<String>>,
}

impl WebAuthFlow for RedirectingBrowser {
    fn start(&self, url: &str, callback_url: &str, completion: SocialCompletion) {
        self.opened.lock().unwrap().push(url.to_string());
        let completion = completion
            .complete_with_redirect("https://social.mock.test/consent")
            .unwrap_err();
        completion
            .complete_with_redirect(&format!("{callback_url}?token={}", self.token))
            .unwrap();
    }
}

/// Closes the window without signing in.
struct ClosedBrowser;

impl WebAuthFlow for ClosedBrowser {
    fn start(&self, _url: &str, _callback_url: &str, completion: SocialCompletion) {
        drop(completion);
    }
}

#[tokio::test]
async fn catalog_keeps_server_order() {
    let addr = start_mock().await;
    let sdk = XsollaSdk::from_config(config(addr).with_locale("en")).unwrap();
    let store = sdk.store().unwrap();

    let items = store.get_virtual_items(None).await.unwrap().items;
    let skus: Vec<_> = items.iter().map(|i| i.sku.as_str()).collect();
    assert_eq!(skus, ["sword", "shield", "potion"]);

    let page = store
        .get_virtual_items(Some(ItemsRequestOptions::default().with_offset(2)))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].sku, "potion");

    let group = store
        .get_items_by_group("weapons", None)
        .await
        .unwrap();
    assert_eq!(group.items.len(), 2);
}

#[tokio::test]
async fn envelope_message_reaches_the_caller() {
    let addr = start_mock().await;
    let sdk = XsollaSdk::from_config(config(addr)).unwrap();

    let err = sdk
        .store()
        .unwrap()
        .get_items_by_group("armor", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Client);
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().ends_with("Group not found"));

    let err = sdk
        .login()
        .unwrap()
        .login(DEMO_USERNAME, "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid username or password.");
}

#[tokio::test]
async fn unreachable_server_is_reported_as_not_responding() {
    // Bind and release a port so nothing is listening on it.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let sdk = XsollaSdk::from_config(config(addr).with_timeout(Duration::from_secs(2))).unwrap();

    let err = sdk
        .store()
        .unwrap()
        .get_physical_items(None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.to_string(), SERVER_IS_NOT_RESPONDING);
}

#[tokio::test]
async fn unconfigured_subsystem_is_a_config_error() {
    let addr = start_mock().await;
    let sdk = XsollaSdk::from_config(
        SdkConfig::default()
            .with_base_url(format!("http://{addr}"))
            .with_store_project_id(STORE_PROJECT),
    )
    .unwrap();

    assert!(sdk.store().is_ok());
    assert!(matches!(sdk.login().err(), Some(ApiError::Config(_))));
}

#[tokio::test]
async fn signed_in_user_shops_with_their_token() {
    let addr = start_mock().await;
    let sdk = XsollaSdk::from_config(config(addr)).unwrap();

    let token = sdk
        .login()
        .unwrap()
        .login(DEMO_USERNAME, DEMO_PASSWORD)
        .await
        .unwrap();
    assert!(!token.token.is_empty());

    let user = sdk.with_token(token.token.as_str());
    let me = user.login().unwrap().get_current_user_details().await.unwrap();
    assert_eq!(me.username.as_deref(), Some(DEMO_USERNAME));

    let store = user.store().unwrap();
    store
        .fill_current_cart(&[FillCartItem {
            sku: "sword".to_string(),
            quantity: 2,
        }])
        .await
        .unwrap();
    let cart = store.get_current_cart(None).await.unwrap();
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.price.unwrap().amount, "3.98");

    // The anonymous SDK is untouched.
    assert!(matches!(
        sdk.store().unwrap().get_current_cart(None).await,
        Err(ApiError::Config(_))
    ));
}

#[tokio::test]
async fn passwordless_phone_sign_in() {
    let addr = start_mock().await;
    let login = XsollaSdk::from_config(config(addr)).unwrap().login().unwrap();

    let operation = login
        .start_auth_by_phone(&StartAuthByPhoneBody {
            phone_number: "+15550100".to_string(),
            link_url: None,
            send_link: false,
        })
        .await
        .unwrap();
    let token = login
        .complete_auth_by_phone(&CompleteAuthByPhoneBody {
            code: mock_server::PASSWORDLESS_CODE.to_string(),
            operation_id: operation.operation_id,
            phone_number: "+15550100".to_string(),
        })
        .await
        .unwrap();
    assert!(!token.token.is_empty());
}

#[tokio::test]
async fn social_sign_in_completes_through_the_web_flow() {
    let addr = start_mock().await;
    let browser = Arc::new(RedirectingBrowser {
        token: "social-token",
        opened: Mutex::new(Vec::new()),
    });
    let sdk = XsollaSdk::from_config(config(addr))
        .unwrap()
        .with_web_auth(browser.clone());

    let token = sdk
        .login()
        .unwrap()
        .start_social_auth(SocialNetwork::Google)
        .await
        .unwrap();
    assert_eq!(token.token, "social-token");

    let opened = browser.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with("https://social.mock.test/google/"));
}

#[tokio::test]
async fn social_sign_in_without_flow_or_with_closed_window() {
    let addr = start_mock().await;
    let sdk = XsollaSdk::from_config(config(addr)).unwrap();

    let url = sdk
        .login()
        .unwrap()
        .get_social_auth_url(SocialNetwork::Twitter)
        .await
        .unwrap();
    assert!(url.contains("/twitter/"));

    let err = sdk
        .login()
        .unwrap()
        .start_social_auth(SocialNetwork::Twitter)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = sdk
        .with_web_auth(Arc::new(ClosedBrowser))
        .login()
        .unwrap()
        .start_social_auth(SocialNetwork::Twitter)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::SocialAuthCancelled));
}

#[tokio::test]
async fn demo_token_reads_inventory() {
    let addr = start_mock().await;
    let sdk = XsollaSdk::from_config(config(addr).with_token(DEMO_TOKEN)).unwrap();
    let inventory = sdk.store().unwrap().get_inventory().await.unwrap();
    let skus: Vec<_> = inventory.items.iter().map(|i| i.sku.as_str()).collect();
    assert_eq!(skus, ["potion", "sword"]);
}
