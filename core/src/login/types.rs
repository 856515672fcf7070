//! Login DTOs.
//!
//! Request bodies omit absent optional fields when serialized; response
//! models tolerate missing optionals and ignore unknown fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::wire::null_default;

/// Registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_consent: Option<bool>,
}

/// Username/password sign-in payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
    #[serde(default, deserialize_with = "null_default")]
    pub remember_me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordBody {
    pub username: String,
}

/// Successful sign-in: the token travels as the `token` query parameter of
/// `login_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub login_url: String,
}

impl AuthResponse {
    pub fn token(&self) -> Option<String> {
        token_from_url(&self.login_url)
    }
}

/// The sign-in must continue in a browser at `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialAuthResponse {
    pub url: String,
}

/// What a sign-in call produced, decided by the shape of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthResult {
    Authenticated(AuthResponse),
    SocialRedirect(SocialAuthResponse),
}

/// Token of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// Value of the `token` query parameter, if `url` parses and carries one.
pub fn token_from_url(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

// ---------------------------------------------------------------------------
// Passwordless
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartAuthByEmailBody {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub send_link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteAuthByEmailBody {
    pub code: String,
    pub operation_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartAuthByPhoneBody {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub send_link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteAuthByPhoneBody {
    pub code: String,
    pub operation_id: String,
    pub phone_number: String,
}

/// Handle of a started passwordless sign-in, needed to complete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResponse {
    pub operation_id: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub registered: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_anonymous: bool,
}

/// Profile fields to change; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserDetailsBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchedUser {
    pub user_id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_me: bool,
    #[serde(default)]
    pub registered: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchUsersResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub users: Vec<SearchedUser>,
    #[serde(default, deserialize_with = "null_default")]
    pub offset: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub total_count: u32,
}

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

/// Social network a user can sign in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialNetwork {
    Google,
    Facebook,
    Twitter,
    Naver,
    Linkedin,
    Baidu,
}

impl SocialNetwork {
    pub const ALL: [SocialNetwork; 6] = [
        SocialNetwork::Google,
        SocialNetwork::Facebook,
        SocialNetwork::Twitter,
        SocialNetwork::Naver,
        SocialNetwork::Linkedin,
        SocialNetwork::Baidu,
    ];

    /// Provider name as it appears in the URL path.
    pub fn provider_name(self) -> &'static str {
        match self {
            SocialNetwork::Google => "google",
            SocialNetwork::Facebook => "facebook",
            SocialNetwork::Twitter => "twitter",
            SocialNetwork::Naver => "naver",
            SocialNetwork::Linkedin => "linkedin",
            SocialNetwork::Baidu => "baidu",
        }
    }

    pub fn from_provider_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|network| network.provider_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SocialNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_name())
    }
}
