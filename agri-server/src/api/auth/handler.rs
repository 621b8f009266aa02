//! Authentication Handlers
//!
//! Handles registration, login and profile

use std::time::Duration;

use axum::{Json, extract::State};
use shared::models::{LoginRequest, LoginResponse, Role, UserPublic, UserRegister};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::user as user_repo;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MIN_PASSWORD_LEN, validate_email,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Atraso fixo na autenticação para mitigar timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/register - registo de cliente (papel inicial: CUSTOMER)
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<UserRegister>,
) -> AppResult<Json<LoginResponse>> {
    validate_required_text(&req.nome, "nome", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_optional_text(&req.telefone, "telefone", MAX_SHORT_TEXT_LEN)?;

    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if req.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation("password is too long"));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = user_repo::create(
        &state.db,
        req.nome.trim(),
        req.email.trim(),
        req.telefone.as_deref(),
        &password_hash,
        Role::Customer,
    )
    .await?;

    tracing::info!(user_id = user.id, "New customer registered");

    // Auto-login após registo
    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(user.id, &user.nome, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt_service.config.expiration_minutes * 60,
        user: user.into(),
    }))
}

/// POST /api/auth/login - autenticação por e-mail e password
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = user_repo::find_by_email(&state.db, req.email.trim()).await?;

    // Atraso fixo antes de inspeccionar o resultado (timing attacks)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Mensagem unificada: nunca revelar se o e-mail existe
    let user = match user {
        Some(u) => {
            if !password::verify_password(&req.password, &u.password_hash) {
                crate::security_log!(
                    "WARN",
                    "login_failed",
                    email = req.email.clone(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::invalid_credentials());
            }
            if !u.is_active {
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }
            u
        }
        None => {
            crate::security_log!(
                "WARN",
                "login_failed",
                email = req.email.clone(),
                reason = "unknown_email"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(user.id, &user.nome, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = user.id, role = %user.role, "Login successful");

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt_service.config.expiration_minutes * 60,
        user: user.into(),
    }))
}

/// GET /api/auth/me - perfil do utilizador autenticado
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserPublic>> {
    let user = user_repo::find_by_id(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user.into()))
}
