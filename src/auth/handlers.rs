use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::db::models::AccountSummary;
use crate::error::AppError;
use crate::AppState;

// Fields are optional so a missing field reaches the validation step and
// gets the documented JSON error shape instead of a deserializer error.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: AccountSummary,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!(username = ?req.username, "received registration request");

    let result = state
        .auth
        .register(
            req.username.as_deref().unwrap_or(""),
            req.email.as_deref().unwrap_or(""),
            req.password.as_deref().unwrap_or(""),
        )
        .await;

    match result {
        Ok(user) => Ok(HttpResponse::Created().json(RegisterResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user,
        })),
        Err(e @ (AppError::ValidationError(_) | AppError::AlreadyExists)) => {
            warn!(username = ?req.username, "registration rejected: {}", e);
            Err(e)
        }
        Err(e) => {
            error!(username = ?req.username, "registration failed: {}", e);
            Err(AppError::InternalError("Register failed".to_string()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!(username = ?req.username, "received login request");

    let result = state
        .auth
        .login(
            req.username.as_deref(),
            req.email.as_deref(),
            req.password.as_deref().unwrap_or(""),
        )
        .await;

    match result {
        Ok(access_token) => Ok(HttpResponse::Ok().json(LoginResponse {
            success: true,
            message: "User logged in successfully".to_string(),
            access_token,
        })),
        Err(e @ (AppError::ValidationError(_) | AppError::InvalidCredentials)) => {
            warn!(username = ?req.username, "login rejected: {}", e);
            Err(e)
        }
        Err(e) => {
            error!(username = ?req.username, "login failed: {}", e);
            Err(AppError::InternalError("Login failed".to_string()))
        }
    }
}

/// Bearer-token introspection: verifies the presented token and echoes the
/// identity claims it carries. Verification is stateless, no store lookup.
pub async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidToken)?;

    let claims = state.auth.verify_token(token)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": {
            "id": claims.sub,
            "username": claims.username,
            "role": claims.role,
        }
    })))
}
