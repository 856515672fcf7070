//! Login route handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::{bearer, login_error, Db, MockState, StoredUser, PASSWORDLESS_CODE};

const DEFAULT_LOGIN_URL: &str = "https://login.xsolla.com/api/blank";
const PROVIDERS: [&str; 6] = ["google", "facebook", "twitter", "naver", "linkedin", "baidu"];

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
    pub login_url: Option<String>,
}

impl LoginQuery {
    fn require_project(&self) -> Result<(), Response> {
        match self.project_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(()),
            _ => Err(login_error(
                StatusCode::BAD_REQUEST,
                "003-061",
                "Project ID is required.",
            )),
        }
    }

    fn login_url(&self) -> &str {
        self.login_url.as_deref().unwrap_or(DEFAULT_LOGIN_URL)
    }
}

#[derive(Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ResetPassword {
    pub username: String,
}

#[derive(Deserialize)]
pub struct StartPasswordless {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmEmail {
    pub code: String,
    pub operation_id: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct ConfirmPhone {
    pub code: String,
    pub operation_id: String,
    pub phone_number: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: String,
    pub username: String,
    pub email: String,
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub is_anonymous: bool,
}

impl From<&StoredUser> for UserDetails {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            birthday: user.birthday.clone(),
            gender: user.gender.clone(),
            is_anonymous: false,
        }
    }
}

#[derive(Deserialize)]
pub struct UserUpdate {
    pub birthday: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub nickname: String,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// Issue a session for `username` and answer with the redirect URL.
fn sign_in(state: &mut MockState, username: &str, login_url: &str) -> Response {
    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), username.to_string());
    debug!(username, "session issued");
    let separator = if login_url.contains('?') { '&' } else { '?' };
    Json(json!({"login_url": format!("{login_url}{separator}token={token}")})).into_response()
}

fn invalid_token() -> Response {
    login_error(StatusCode::UNAUTHORIZED, "000-003", "Invalid token.")
}

pub async fn register(
    State(db): State<Db>,
    Query(query): Query<LoginQuery>,
    Json(input): Json<NewUser>,
) -> Response {
    if let Err(response) = query.require_project() {
        return response;
    }
    let mut state = db.write().await;
    if state.users.contains_key(&input.username) {
        return login_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "003-003",
            "The username is already taken.",
        );
    }
    let user = StoredUser::new(&input.username, &input.email, &input.password);
    state.users.insert(input.username, user);
    StatusCode::NO_CONTENT.into_response()
}

pub async fn login(
    State(db): State<Db>,
    Query(query): Query<LoginQuery>,
    Json(input): Json<Credentials>,
) -> Response {
    if let Err(response) = query.require_project() {
        return response;
    }
    let mut state = db.write().await;
    let valid = state
        .users
        .get(&input.username)
        .is_some_and(|user| user.password == input.password);
    if !valid {
        return login_error(
            StatusCode::UNAUTHORIZED,
            "003-007",
            "Invalid username or password.",
        );
    }
    sign_in(&mut state, &input.username, query.login_url())
}

pub async fn social_login_url(
    Path(provider): Path<String>,
    Query(query): Query<LoginQuery>,
) -> Response {
    if let Err(response) = query.require_project() {
        return response;
    }
    if !PROVIDERS.contains(&provider.as_str()) {
        return login_error(StatusCode::NOT_FOUND, "003-010", "Social provider not found.");
    }
    Json(json!({
        "url": format!("https://social.mock.test/{provider}/auth?redirect_uri={}", query.login_url())
    }))
    .into_response()
}

pub async fn reset_password(
    State(db): State<Db>,
    Query(query): Query<LoginQuery>,
    Json(input): Json<ResetPassword>,
) -> Response {
    if let Err(response) = query.require_project() {
        return response;
    }
    if !db.read().await.users.contains_key(&input.username) {
        return login_error(StatusCode::NOT_FOUND, "003-024", "User not found.");
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Shared by the email and phone request routes.
pub async fn start_passwordless(
    State(db): State<Db>,
    Query(query): Query<LoginQuery>,
    Json(input): Json<StartPasswordless>,
) -> Response {
    if let Err(response) = query.require_project() {
        return response;
    }
    let Some(address) = input.email.or(input.phone_number) else {
        return login_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "010-003",
            "Email or phone number is required.",
        );
    };
    let operation_id = Uuid::new_v4().to_string();
    db.write()
        .await
        .operations
        .insert(operation_id.clone(), address);
    Json(json!({"operation_id": operation_id})).into_response()
}

async fn confirm(
    db: &Db,
    query: &LoginQuery,
    code: &str,
    operation_id: &str,
    address: &str,
) -> Response {
    if let Err(response) = query.require_project() {
        return response;
    }
    let mut state = db.write().await;
    let matches = state.operations.get(operation_id).map(String::as_str) == Some(address);
    if !matches || code != PASSWORDLESS_CODE {
        return login_error(StatusCode::UNPROCESSABLE_ENTITY, "003-025", "Invalid code.");
    }
    state.operations.remove(operation_id);
    if !state.users.contains_key(address) {
        let user = StoredUser::new(address, address, "");
        state.users.insert(address.to_string(), user);
    }
    sign_in(&mut state, address, query.login_url())
}

pub async fn confirm_email(
    State(db): State<Db>,
    Query(query): Query<LoginQuery>,
    Json(input): Json<ConfirmEmail>,
) -> Response {
    confirm(&db, &query, &input.code, &input.operation_id, &input.email).await
}

pub async fn confirm_phone(
    State(db): State<Db>,
    Query(query): Query<LoginQuery>,
    Json(input): Json<ConfirmPhone>,
) -> Response {
    confirm(&db, &query, &input.code, &input.operation_id, &input.phone_number).await
}

pub async fn current_user(State(db): State<Db>, headers: HeaderMap) -> Response {
    let state = db.read().await;
    let user = bearer(&headers)
        .and_then(|token| state.tokens.get(token))
        .and_then(|username| state.users.get(username));
    match user {
        Some(user) => Json(UserDetails::from(user)).into_response(),
        None => invalid_token(),
    }
}

pub async fn update_current_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UserUpdate>,
) -> Response {
    let mut state = db.write().await;
    let Some(username) = bearer(&headers).and_then(|token| state.tokens.get(token)).cloned() else {
        return invalid_token();
    };
    let Some(user) = state.users.get_mut(&username) else {
        return invalid_token();
    };
    if input.birthday.is_some() {
        user.birthday = input.birthday;
    }
    if input.first_name.is_some() {
        user.first_name = input.first_name;
    }
    if input.last_name.is_some() {
        user.last_name = input.last_name;
    }
    if input.nickname.is_some() {
        user.nickname = input.nickname;
    }
    if input.gender.is_some() {
        user.gender = input.gender;
    }
    Json(UserDetails::from(&*user)).into_response()
}

pub async fn search_users(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let state = db.read().await;
    let Some(me) = bearer(&headers).and_then(|token| state.tokens.get(token)) else {
        return invalid_token();
    };
    let needle = query.nickname.to_lowercase();
    let mut found: Vec<&StoredUser> = state
        .users
        .values()
        .filter(|user| {
            user.nickname
                .as_deref()
                .is_some_and(|nick| nick.to_lowercase().contains(&needle))
        })
        .collect();
    found.sort_by(|a, b| a.username.cmp(&b.username));

    let total_count = found.len();
    let offset = query.offset.unwrap_or(0);
    let users: Vec<_> = found
        .into_iter()
        .skip(offset)
        .take(query.limit.unwrap_or(usize::MAX))
        .map(|user| {
            json!({
                "user_id": user.id,
                "nickname": user.nickname,
                "is_me": &user.username == me,
            })
        })
        .collect();
    Json(json!({"users": users, "offset": offset, "total_count": total_count})).into_response()
}
