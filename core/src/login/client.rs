//! Stateless request builder and response parser for the login API.
//!
//! # Design
//! Mirrors `StoreClient`: `build_*` produces an `HttpRequest`, `parse_*`
//! classifies the `TransportResult`. The project id travels as the
//! `projectId` query parameter of every call. Calls that end in a redirect
//! to the game also carry `login_url`, set to the configured callback URL.

use serde::Serialize;

use crate::adapter::{parse_empty, parse_json};
use crate::endpoint::{login, Endpoint, Query};
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpRequest, TransportResult};
use crate::login::types::*;

#[derive(Debug, Clone)]
pub struct LoginClient {
    base_url: String,
    project_id: String,
    callback_url: String,
    token: Option<String>,
}

impl LoginClient {
    pub fn new(base_url: &str, project_id: &str, callback_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            callback_url: callback_url.to_string(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    pub fn build_register_user(&self, user: &NewUser) -> ApiResult<HttpRequest> {
        self.request(&login::REGISTER_USER, &[], self.redirecting(), Some(user))
    }

    /// Registration answers 204 on success.
    pub fn parse_register_user(&self, result: TransportResult) -> ApiResult<()> {
        parse_empty(result)
    }

    pub fn build_login(&self, body: &LoginBody) -> ApiResult<HttpRequest> {
        self.request(&login::LOGIN, &[], self.redirecting(), Some(body))
    }

    pub fn parse_login(&self, result: TransportResult) -> ApiResult<AuthResult> {
        parse_json(result)
    }

    pub fn build_get_social_auth_url(&self, network: SocialNetwork) -> ApiResult<HttpRequest> {
        self.request(
            &login::GET_SOCIAL_AUTH_URL,
            &[("provider", network.provider_name())],
            self.redirecting(),
            None::<&()>,
        )
    }

    pub fn parse_get_social_auth_url(&self, result: TransportResult) -> ApiResult<AuthResult> {
        parse_json(result)
    }

    pub fn build_reset_password(&self, username: &str) -> ApiResult<HttpRequest> {
        let body = ResetPasswordBody {
            username: username.to_string(),
        };
        self.request(&login::RESET_PASSWORD, &[], self.redirecting(), Some(&body))
    }

    pub fn parse_reset_password(&self, result: TransportResult) -> ApiResult<()> {
        parse_empty(result)
    }

    pub fn build_start_auth_by_email(&self, body: &StartAuthByEmailBody) -> ApiResult<HttpRequest> {
        self.request(&login::START_AUTH_BY_EMAIL, &[], self.redirecting(), Some(body))
    }

    pub fn build_complete_auth_by_email(
        &self,
        body: &CompleteAuthByEmailBody,
    ) -> ApiResult<HttpRequest> {
        self.request(&login::COMPLETE_AUTH_BY_EMAIL, &[], self.project(), Some(body))
    }

    pub fn build_start_auth_by_phone(&self, body: &StartAuthByPhoneBody) -> ApiResult<HttpRequest> {
        self.request(&login::START_AUTH_BY_PHONE, &[], self.redirecting(), Some(body))
    }

    pub fn build_complete_auth_by_phone(
        &self,
        body: &CompleteAuthByPhoneBody,
    ) -> ApiResult<HttpRequest> {
        self.request(&login::COMPLETE_AUTH_BY_PHONE, &[], self.project(), Some(body))
    }

    pub fn parse_start_passwordless(&self, result: TransportResult) -> ApiResult<OperationResponse> {
        parse_json(result)
    }

    pub fn parse_complete_passwordless(&self, result: TransportResult) -> ApiResult<AuthResult> {
        parse_json(result)
    }

    pub fn build_get_current_user_details(&self) -> ApiResult<HttpRequest> {
        self.request(&login::GET_CURRENT_USER_DETAILS, &[], self.project(), None::<&()>)
    }

    pub fn build_update_current_user_details(
        &self,
        body: &UpdateUserDetailsBody,
    ) -> ApiResult<HttpRequest> {
        self.request(&login::UPDATE_CURRENT_USER_DETAILS, &[], self.project(), Some(body))
    }

    pub fn parse_user_details(&self, result: TransportResult) -> ApiResult<UserDetails> {
        parse_json(result)
    }

    pub fn build_search_users_by_nickname(
        &self,
        nickname: &str,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> ApiResult<HttpRequest> {
        if nickname.is_empty() {
            return Err(ApiError::missing("nickname"));
        }
        let query = self
            .project()
            .with("nickname", nickname)
            .with_opt("offset", offset)
            .with_opt("limit", limit);
        self.request(&login::SEARCH_USERS_BY_NICKNAME, &[], query, None::<&()>)
    }

    pub fn parse_search_users_by_nickname(
        &self,
        result: TransportResult,
    ) -> ApiResult<SearchUsersResponse> {
        parse_json(result)
    }

    // -----------------------------------------------------------------------

    fn project(&self) -> Query {
        Query::new().with("projectId", &self.project_id)
    }

    fn redirecting(&self) -> Query {
        self.project().with("login_url", &self.callback_url)
    }

    fn request<B: Serialize>(
        &self,
        endpoint: &Endpoint,
        slots: &[(&str, &str)],
        query: Query,
        body: Option<&B>,
    ) -> ApiResult<HttpRequest> {
        endpoint.request(&self.base_url, slots, query, self.token.as_deref(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse};

    const PROJECT: &str = "753ec123-3245-11ea-b687-42010aa80004";
    const CALLBACK: &str = "https://login.xsolla.com/api/blank";

    fn client() -> LoginClient {
        LoginClient::new("http://localhost:3000", PROJECT, CALLBACK)
    }

    fn ok(status: u16, body: &str) -> TransportResult {
        Ok(HttpResponse::new(status, body))
    }

    #[test]
    fn build_login_carries_project_and_callback() {
        let req = client()
            .build_login(&LoginBody {
                username: "john".to_string(),
                password: "secret".to_string(),
                remember_me: false,
            })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/login");
        assert_eq!(req.query_values("projectId"), vec![PROJECT]);
        assert_eq!(req.query_values("login_url"), vec![CALLBACK]);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.header("authorization").is_none());
    }

    #[test]
    fn build_social_auth_url_fills_provider() {
        let req = client().build_get_social_auth_url(SocialNetwork::Naver).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/social/naver/login_url");
        assert!(req.body.is_none());
    }

    #[test]
    fn complete_passwordless_has_no_login_url() {
        let req = client()
            .build_complete_auth_by_email(&CompleteAuthByEmailBody {
                code: "0000".to_string(),
                operation_id: "op".to_string(),
                email: "a@b.c".to_string(),
            })
            .unwrap();
        assert!(req.query_values("login_url").is_empty());
        assert_eq!(req.query_values("projectId"), vec![PROJECT]);
    }

    #[test]
    fn user_calls_need_a_token() {
        let err = client().build_get_current_user_details().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        let req = client()
            .with_token("jwt")
            .build_update_current_user_details(&UpdateUserDetailsBody::default())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.header("authorization"), Some("Bearer jwt"));
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn search_by_nickname_query() {
        let req = client()
            .with_token("jwt")
            .build_search_users_by_nickname("hero", None, Some(20))
            .unwrap();
        assert_eq!(req.query_values("nickname"), vec!["hero"]);
        assert_eq!(req.query_values("limit"), vec!["20"]);
        assert!(req.query_values("offset").is_empty());

        let err = client()
            .with_token("jwt")
            .build_search_users_by_nickname("", None, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter(_)));
    }

    #[test]
    fn parse_register_taken_username() {
        let err = client()
            .parse_register_user(ok(
                422,
                r#"{"error":{"code":"003-003","description":"The username is already taken."}}"#,
            ))
            .unwrap_err();
        assert_eq!(err.to_string(), "The username is already taken.");
    }

    #[test]
    fn parse_login_either_shape() {
        let direct = client()
            .parse_login(ok(200, r#"{"login_url":"https://cb.test/?token=t1"}"#))
            .unwrap();
        match direct {
            AuthResult::Authenticated(auth) => assert_eq!(auth.token().as_deref(), Some("t1")),
            other => panic!("unexpected: {other:?}"),
        }

        let social = client()
            .parse_get_social_auth_url(ok(200, r#"{"url":"https://provider.test/auth"}"#))
            .unwrap();
        assert!(matches!(social, AuthResult::SocialRedirect(_)));
    }
}
