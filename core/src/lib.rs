//! Client core for the Xsolla login and store APIs.
//!
//! # Overview
//! Two layers. The lower one builds `HttpRequest` values and classifies
//! `TransportResult` values without touching the network (`StoreClient`,
//! `LoginClient`), so a native host can run the HTTP round-trip with its
//! own stack. The upper one (`XsollaSdk`) pairs those clients with a
//! `Transport` and exposes one `async fn` per remote operation.
//!
//! # Design
//! - Every remote operation is an `Endpoint` constant in `endpoint`.
//! - Every exchange resolves to exactly one `ApiResult`; `adapter` decides
//!   which, from the status and the error envelope.
//! - Configuration is an explicit `SdkConfig`; there is no global state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod adapter;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod facade;
pub mod http;
pub mod login;
pub mod options;
pub mod paystation;
pub mod social;
pub mod store;
pub mod transport;
mod wire;

pub use config::SdkConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use facade::{LoginApi, StoreApi, XsollaSdk};
pub use http::{HttpMethod, HttpRequest, HttpResponse, TransportResult};
pub use login::types::{AuthResult, AuthToken, SocialNetwork};
pub use login::LoginClient;
pub use options::{CartRequestOptions, ItemsRequestOptions};
pub use social::{SocialCompletion, WebAuthFlow};
pub use store::StoreClient;
pub use transport::{ReqwestTransport, Transport, TransportError, TransportErrorKind};
