use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo_types::NewUser,
};
use crate::{
    error::{db_error_code, AppError, AppResult, UNIQUE_VIOLATION},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 6;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;
// users.email is VARCHAR(100)
const MAX_EMAIL_LEN: usize = 100;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub async fn register(st: &AppState, mut req: RegisterRequest) -> AppResult<AuthResponse> {
    req.username = req.username.trim().to_string();
    req.email = req.email.trim().to_lowercase();

    if !USERNAME_LEN.contains(&req.username.chars().count()) {
        return Err(AppError::Validation("username must be 3-50 characters".into()));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation("invalid email".into()));
    }
    if req.email.chars().count() > MAX_EMAIL_LEN {
        return Err(AppError::Validation(format!(
            "email must be at most {MAX_EMAIL_LEN} characters"
        )));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("password too short".into()));
    }

    if st.users.exists_by_username(&req.username).await? {
        return Err(AppError::Conflict("username is already taken".into()));
    }
    if st.users.exists_by_email(&req.email).await? {
        return Err(AppError::Conflict("email is already in use".into()));
    }

    let hash = hash_password(&req.password)?;
    let user = st
        .users
        .create(NewUser {
            username: &req.username,
            email: &req.email,
            password_hash: &hash,
        })
        .await
        .map_err(|e| match db_error_code(&e).as_deref() {
            // lost a race with a concurrent registration
            Some(UNIQUE_VIOLATION) => AppError::Conflict("username or email already registered".into()),
            _ => AppError::Unexpected(e),
        })?;

    let token = JwtKeys::from_ref(st).sign(user.id, &user.username)?;
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn login(st: &AppState, req: LoginRequest) -> AppResult<AuthResponse> {
    let username = req.username.trim();
    let user = match st.users.find_by_username(username).await? {
        Some(u) => u,
        None => {
            warn!(%username, "login unknown username");
            return Err(AppError::Unauthenticated("invalid credentials".into()));
        }
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(%username, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthenticated("invalid credentials".into()));
    }

    let token = JwtKeys::from_ref(st).sign(user.id, &user.username)?;
    info!(user_id = user.id, %username, "user logged in");
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn current_user(st: &AppState, caller: &AuthUser) -> AppResult<PublicUser> {
    st.users
        .find_by_id(caller.id)
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| AppError::Unauthenticated(format!("user {} no longer exists", caller.id)))
}
