use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{LoginRequest, Profile, RegisterRequest, UpdateProfileRequest, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::handlers::comments::CommentDto;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

const REGISTERED_DETAIL: &str = "You have created an account!";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) password: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) password_confirmation: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateProfileDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: Option<String>,
    #[validate(email)]
    pub(crate) email: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub(crate) password: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub(crate) password_confirmation: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DetailDto {
    pub(crate) detail: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) user: UserDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileDto {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) comments: Vec<CommentDto>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.user.id,
            email: profile.user.email,
            username: profile.user.username,
            comments: profile.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

impl From<UpdateProfileDto> for UpdateProfileRequest {
    fn from(dto: UpdateProfileDto) -> Self {
        Self {
            username: dto.username,
            email: dto.email,
            password: dto.password,
            password_confirmation: dto.password_confirmation,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = DetailDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> AppResult<(StatusCode, Json<DetailDto>)> {
    dto.validate()?;

    let req = RegisterRequest {
        username: dto.username,
        email: dto.email,
        password: dto.password,
        password_confirmation: dto.password_confirmation,
    };

    state.account_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(DetailDto {
            detail: REGISTERED_DETAIL.to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = LoginRequest {
        username: dto.username,
        password: dto.password,
    };

    let result = state.account_service.login(req).await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponseDto {
            access_token: result.access_token,
            user: result.user.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Own profile", body = ProfileDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_own_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<(StatusCode, Json<ProfileDto>)> {
    let profile = state.account_service.get_profile(auth.user_id).await?;
    Ok((StatusCode::OK, Json(ProfileDto::from(profile))))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ProfileDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username or email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<(StatusCode, Json<ProfileDto>)> {
    dto.validate()?;

    let profile = state
        .account_service
        .update_profile(auth.user_id, auth.user_id, dto.into())
        .await?;
    Ok((StatusCode::OK, Json(ProfileDto::from(profile))))
}

#[utoipa::path(
    delete,
    path = "/api/users/profile",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_own_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    state
        .account_service
        .delete_account(auth.user_id, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/users/profile/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Public profile", body = ProfileDto),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ProfileDto>)> {
    let profile = state.account_service.get_profile(id).await?;
    Ok((StatusCode::OK, Json(ProfileDto::from(profile))))
}

#[utoipa::path(
    put,
    path = "/api/users/profile/{id}",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ProfileDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the profile owner"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<(StatusCode, Json<ProfileDto>)> {
    dto.validate()?;

    let profile = state
        .account_service
        .update_profile(auth.user_id, id, dto.into())
        .await?;
    Ok((StatusCode::OK, Json(ProfileDto::from(profile))))
}

#[utoipa::path(
    delete,
    path = "/api/users/profile/{id}",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the profile owner"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .account_service
        .delete_account(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
