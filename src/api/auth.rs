//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        registration::Registration,
        user::{RegisterUser, User},
    },
    AppState,
};

use super::{AuthenticatedUser, MessageResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    pub user_id: i64,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "Subject must be 1-255 characters"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Register a new account (role USER)
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Username or email already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    request.validate()?;
    let user = state.services.users.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.services.users.token_lifetime(),
        user,
    }))
}

/// Logout (tokens are stateless; the client drops its token)
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}

/// Current user profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}

/// Registrations of the current user
#[utoipa::path(
    get,
    path = "/auth/me/registrations",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Registrations", body = Vec<Registration>))
)]
pub async fn my_registrations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Registration>>> {
    let registrations = state.services.registrations.for_user(claims.user_id).await?;
    Ok(Json(registrations))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/auth/password",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Current password incorrect", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    request.validate()?;
    state
        .services
        .users
        .change_password(claims.user_id, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Set another user's password (administrators)
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    claims.require_admin()?;
    request.validate()?;
    state
        .services
        .users
        .set_password(request.user_id, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

/// Email a temporary password
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Temporary password sent", body = MessageResponse),
        (status = 404, description = "Unknown email", body = crate::error::ErrorResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    request.validate()?;
    state.services.users.forgot_password(&request.email).await?;
    Ok(Json(MessageResponse::new(
        "A temporary password has been sent to your email",
    )))
}

/// Public contact form
#[utoipa::path(
    post,
    path = "/auth/contact",
    tag = "auth",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message sent", body = MessageResponse),
        (status = 500, description = "Delivery failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> AppResult<Json<MessageResponse>> {
    request.validate()?;
    state
        .services
        .notifications
        .contact(
            &state.config.email.contact_recipients,
            &request.name,
            &request.email,
            &request.subject,
            &request.message,
        )
        .await
        .map_err(|e| AppError::Internal(format!("Failed to send message: {}", e)))?;
    Ok(Json(MessageResponse::new("Your message has been sent")))
}
