// ABOUTME: Account endpoints: registration, password login, logout, profile and password change
// ABOUTME: Passwords are stored as argon2 PHC strings and hashed off the async runtime

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_extra::extract::cookie::CookieJar;

use crate::auth_helpers::CurrentUser;
use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::types::*;
use crate::{AppState, session};

fn hash_password_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password_blocking(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is malformed: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

pub async fn verify_password(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Missing fields".to_string()));
    }

    if state.storage.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(req.password).await?;
    let user = state
        .storage
        .create_user(&req.name, &req.email, &password_hash)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user: UserSummary {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<ProfileResponse>)> {
    let user = state
        .storage
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown email: {}", req.email)))?;

    if !verify_password(req.password, user.password_hash.clone()).await? {
        return Err(AppError::Unauthorized(format!(
            "Wrong password for user {}",
            user.id
        )));
    }

    state.sessions.cleanup_expired_sessions();
    let session_id = state
        .sessions
        .create_session(user.id, user.name.clone(), user.email.clone());
    let cookie = session::create_session_cookie(
        session_id,
        state.settings.secure_cookies,
        state.sessions.max_age_seconds(),
    );

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((jar.add(cookie), Json(ProfileResponse::from(user))))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(session_cookie) = jar.get(session::SESSION_COOKIE_NAME) {
        state.sessions.remove_session(session_cookie.value());
    }

    let jar = jar.add(session::create_logout_cookie(state.settings.secure_cookies));
    (jar, Json(MessageResponse::new("Logged out")))
}

pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProfileResponse>> {
    let user = state.storage.get_user(user.id).await?;
    Ok(Json(ProfileResponse::from(user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>> {
    let updated = state.storage.update_user_name(user.id, &req.name).await?;
    state.sessions.rename_user(user.id, &updated.name);
    Ok(Json(MessageResponse::new("Profile updated")))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    if req.new_password.is_empty() {
        return Err(AppError::Validation("New password is required".to_string()));
    }

    let stored = state.storage.get_user(user.id).await?;
    if !verify_password(req.current, stored.password_hash).await? {
        return Err(AppError::Validation(
            "Incorrect current password".to_string(),
        ));
    }

    let password_hash = hash_password(req.new_password).await?;
    state.storage.set_password_hash(user.id, &password_hash).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Password changed");
    Ok(Json(MessageResponse::new("Password updated")))
}
