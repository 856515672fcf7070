//! Response classification.
//!
//! Every exchange ends in exactly one `ApiResult`: a 2xx response is a
//! success (its body parsed as the expected type), anything else is a
//! failure whose message comes from the error envelope when there is one.
//!
//! Two envelope shapes exist on the wire:
//! - login: `{"error": {"code": "003-007", "description": "..."}}`
//! - store: `{"statusCode": 404, "errorCode": 4001, "errorMessage": "..."}`
//!
//! A body that matches neither is not an error in itself; it yields
//! `ApiError::ClientUnknown` so the original failure is still reported.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::http::{HttpResponse, TransportResult};

#[derive(Deserialize)]
struct LoginEnvelope {
    error: LoginErrorBody,
}

#[derive(Deserialize)]
struct LoginErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreEnvelope {
    #[serde(default)]
    error_code: Option<serde_json::Value>,
    error_message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Login(LoginEnvelope),
    Store(StoreEnvelope),
}

/// Code and description from an error body, if it is an envelope.
pub fn error_envelope(body: &str) -> Option<(Option<String>, String)> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let (code, description) = match envelope {
        ErrorEnvelope::Login(login) => (login.error.code, login.error.description),
        ErrorEnvelope::Store(store) => (store.error_code, store.error_message),
    };
    Some((code.map(code_to_string), description))
}

fn code_to_string(code: serde_json::Value) -> String {
    match code {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Keep 2xx responses, turn everything else into the matching failure.
pub fn check_status(result: TransportResult) -> ApiResult<HttpResponse> {
    let response = result.map_err(ApiError::Transport)?;
    if response.is_success() {
        return Ok(response);
    }
    match error_envelope(&response.body) {
        Some((code, description)) => Err(ApiError::Client {
            status: response.status,
            code,
            description,
        }),
        None => Err(ApiError::ClientUnknown {
            status: response.status,
            body: response.body,
        }),
    }
}

/// Classify and parse the 2xx body as `T`.
pub fn parse_json<T: DeserializeOwned>(result: TransportResult) -> ApiResult<T> {
    let response = check_status(result)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Classify a call whose success carries no payload; the body is ignored.
pub fn parse_empty(result: TransportResult) -> ApiResult<()> {
    check_status(result).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SERVER_IS_NOT_RESPONDING, UNKNOWN_ERROR};
    use crate::transport::{TransportError, TransportErrorKind};
    use proptest::prelude::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn response(status: u16, body: &str) -> TransportResult {
        Ok(HttpResponse::new(status, body))
    }

    #[test]
    fn success_parses_body() {
        let named: Named = parse_json(response(200, r#"{"name":"sword","extra":1}"#)).unwrap();
        assert_eq!(named.name, "sword");
    }

    #[test]
    fn any_2xx_is_success() {
        assert!(parse_empty(response(204, "")).is_ok());
        assert!(parse_empty(response(201, "ignored")).is_ok());
    }

    #[test]
    fn success_with_bad_body_is_deserialization_error() {
        let err = parse_json::<Named>(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn login_envelope_description_is_the_message() {
        let err = parse_json::<Named>(response(
            404,
            r#"{"error":{"description":"not found"}}"#,
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "not found");
        assert!(matches!(err, ApiError::Client { status: 404, code: None, .. }));
    }

    #[test]
    fn login_envelope_code_is_kept() {
        let err = parse_empty(response(
            422,
            r#"{"error":{"code":"003-003","description":"The username is already taken."}}"#,
        ))
        .unwrap_err();
        match err {
            ApiError::Client { code, description, .. } => {
                assert_eq!(code.as_deref(), Some("003-003"));
                assert_eq!(description, "The username is already taken.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn store_envelope_message_is_the_message() {
        let err = parse_empty(response(
            401,
            r#"{"statusCode":401,"errorCode":1501,"errorMessage":"[0401-1501]: Authorization failed"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "[0401-1501]: Authorization failed");
        assert!(matches!(err, ApiError::Client { ref code, .. } if code.as_deref() == Some("1501")));
    }

    #[test]
    fn non_envelope_error_body_is_unknown() {
        for body in ["", "internal error", r#"{"error":"flat"}"#, r#"{"message":"nope"}"#] {
            let err = parse_empty(response(500, body)).unwrap_err();
            assert_eq!(err.to_string(), UNKNOWN_ERROR, "body: {body}");
            assert!(matches!(err, ApiError::ClientUnknown { status: 500, .. }));
        }
    }

    #[test]
    fn transport_failure_has_fixed_message() {
        let err = parse_json::<Named>(Err(TransportError::new(
            TransportErrorKind::Timeout,
            "operation timed out",
        )))
        .unwrap_err();
        assert_eq!(err.to_string(), SERVER_IS_NOT_RESPONDING);
    }

    #[test]
    fn redirect_status_is_a_failure() {
        assert!(parse_empty(response(302, "")).is_err());
    }

    proptest! {
        #[test]
        fn exactly_one_outcome_per_status(status in 100u16..600, body in ".{0,40}") {
            let outcome = parse_empty(response(status, &body));
            prop_assert_eq!(outcome.is_ok(), (200..300).contains(&status));
            if let Err(err) = outcome {
                prop_assert_eq!(err.status(), Some(status));
            }
        }
    }
}
