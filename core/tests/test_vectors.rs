//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use xsolla_core::login::types::LoginBody;
use xsolla_core::store::types::{
    Cart, FillCartItem, VirtualCurrencyPackageResponse, VirtualItemsResponse,
};
use xsolla_core::{
    ApiError, AuthResult, CartRequestOptions, ErrorKind, HttpMethod, HttpRequest, HttpResponse,
    ItemsRequestOptions, LoginClient, StoreClient, TransportError, TransportErrorKind,
    TransportResult,
};

const BASE_URL: &str = "http://localhost:3000";
const STORE_PROJECT: u32 = 44056;
const LOGIN_PROJECT: &str = "753ec123-3245-11ea-b687-42010aa80004";
const CALLBACK: &str = "https://login.xsolla.com/api/blank";

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (
                arr[0].as_str().unwrap().to_string(),
                arr[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    assert_eq!(req.query, pairs(&expected["query"]), "{name}: query");
    assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated(case: &Value) -> TransportResult {
    if let Some(message) = case.get("transport_error") {
        return Err(TransportError::new(
            TransportErrorKind::Connect,
            message.as_str().unwrap(),
        ));
    }
    let sim = &case["simulated_response"];
    Ok(HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    })
}

fn assert_error(name: &str, err: &ApiError, expected: &Value) {
    let kind = match expected["kind"].as_str().unwrap() {
        "Client" => ErrorKind::Client,
        "ClientUnknown" => ErrorKind::ClientUnknown,
        "Transport" => ErrorKind::Transport,
        "Invalid" => ErrorKind::Invalid,
        other => panic!("{name}: unknown expected kind: {other}"),
    };
    assert_eq!(err.kind(), kind, "{name}: kind");
    assert_eq!(
        err.status(),
        expected["status"].as_u64().map(|s| s as u16),
        "{name}: status"
    );
    if let Some(message) = expected.get("message") {
        assert_eq!(err.to_string(), message.as_str().unwrap(), "{name}: message");
    }
    if let (ApiError::Client { code, .. }, Some(expected_code)) = (err, expected.get("code")) {
        assert_eq!(code.as_deref(), expected_code.as_str(), "{name}: code");
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[test]
fn catalog_test_vectors() {
    let raw = include_str!("../../test-vectors/catalog.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = StoreClient::new(BASE_URL, STORE_PROJECT);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let options: ItemsRequestOptions = serde_json::from_value(case["options"].clone()).unwrap();
        let expected = case["expected_result"].clone();

        match case["operation"].as_str().unwrap() {
            "virtual_items" => {
                let req = c.build_get_virtual_items(&options).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                let parsed = c.parse_get_virtual_items(simulated(case)).unwrap();
                let expected: VirtualItemsResponse = serde_json::from_value(expected).unwrap();
                assert_eq!(parsed, expected, "{name}: parsed result");
            }
            "items_by_group" => {
                let req = c.build_get_items_by_group(&options).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                let parsed = c.parse_get_items_by_group(simulated(case)).unwrap();
                let expected: VirtualItemsResponse = serde_json::from_value(expected).unwrap();
                assert_eq!(parsed, expected, "{name}: parsed result");
            }
            "virtual_currency_packages" => {
                let req = c.build_get_virtual_currency_packages(&options).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                let parsed = c.parse_get_virtual_currency_packages(simulated(case)).unwrap();
                let expected: VirtualCurrencyPackageResponse =
                    serde_json::from_value(expected).unwrap();
                assert_eq!(parsed, expected, "{name}: parsed result");
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[test]
fn cart_test_vectors() {
    let raw = include_str!("../../test-vectors/cart.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = StoreClient::new(BASE_URL, STORE_PROJECT).with_token(vectors["token"].as_str().unwrap());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sku = case["sku"].as_str().unwrap_or_default();

        let req = match case["operation"].as_str().unwrap() {
            "fill_current_cart" => {
                let items: Vec<FillCartItem> = serde_json::from_value(case["input"].clone()).unwrap();
                c.build_fill_current_cart(&items).unwrap()
            }
            "update_item_in_cart" => {
                let quantity = case["quantity"].as_u64().unwrap() as u32;
                c.build_update_item_in_cart(case["cart_id"].as_str().unwrap(), sku, quantity)
                    .unwrap()
            }
            "delete_item_from_current_cart" => c.build_delete_item_from_current_cart(sku).unwrap(),
            "get_current_cart" => {
                let options: CartRequestOptions =
                    serde_json::from_value(case["options"].clone()).unwrap();
                c.build_get_current_cart(&options).unwrap()
            }
            other => panic!("{name}: unknown operation: {other}"),
        };
        assert_request(name, &req, &case["expected_request"]);

        match case.get("expected_result") {
            Some(expected) => {
                let cart = c.parse_cart(simulated(case)).unwrap();
                let expected: Cart = serde_json::from_value(expected.clone()).unwrap();
                assert_eq!(cart, expected, "{name}: parsed result");
            }
            None => assert!(c.parse_cart_update(simulated(case)).is_ok(), "{name}: expected success"),
        }
    }
}

#[test]
fn cart_calls_without_token_are_rejected_before_sending() {
    let c = StoreClient::new(BASE_URL, STORE_PROJECT);
    let err = c.build_get_current_cart(&CartRequestOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn login_test_vectors() {
    let raw = include_str!("../../test-vectors/login.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = LoginClient::new(BASE_URL, LOGIN_PROJECT, CALLBACK);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: LoginBody = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_login(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_login(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &result.unwrap_err(), expected_error);
            continue;
        }
        let outcome = result.unwrap();
        let expected: AuthResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(outcome, expected, "{name}: parsed result");

        if let Some(token) = case.get("expected_token") {
            let AuthResult::Authenticated(auth) = &outcome else {
                panic!("{name}: expected an authenticated result");
            };
            assert_eq!(auth.token().as_deref(), token.as_str(), "{name}: token");
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = StoreClient::new(BASE_URL, STORE_PROJECT);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let err = c.parse_get_virtual_items(simulated(case)).unwrap_err();
        assert_error(name, &err, &case["expected_error"]);
    }
}
