use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::comment::{Comment, CommentFilter, CreateCommentRequest, UpdateCommentRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

/// Unknown fields (including `author`) are ignored: the author is the caller.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateCommentDto {
    #[validate(length(min = 1, max = 2000))]
    pub(crate) content: String,
    pub(crate) event: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateCommentDto {
    #[validate(length(min = 1, max = 2000))]
    pub(crate) content: String,
    pub(crate) event: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct CommentsQuery {
    /// ReliefWeb event id; blank is treated as absent.
    pub(crate) event: Option<String>,
    /// Author user id; blank is treated as absent.
    pub(crate) user: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) author: i64,
    pub(crate) author_username: String,
    pub(crate) event: i64,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            author: comment.author_id,
            author_username: comment.author_username,
            event: comment.event,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/comments",
    tag = "comments",
    params(CommentsQuery),
    responses(
        (status = 200, description = "Comments, newest first", body = [CommentDto]),
        (status = 400, description = "Neither event nor user supplied, or not an integer"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> AppResult<(StatusCode, Json<Vec<CommentDto>>)> {
    let filter = CommentFilter::from_params(query.event.as_deref(), query.user.as_deref())?;

    let comments = state.comment_service.list_comments(filter).await?;

    Ok((
        StatusCode::OK,
        Json(comments.into_iter().map(CommentDto::from).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment found", body = CommentDto),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    let comment = state.comment_service.get_comment(id).await?;

    Ok((StatusCode::OK, Json(CommentDto::from(comment))))
}

#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreateCommentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    dto.validate()?;
    debug!(username = %auth.username, event = dto.event, "creating comment");

    let req = CreateCommentRequest {
        content: dto.content,
        event: dto.event,
    };

    let comment = state
        .comment_service
        .create_comment(auth.user_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentDto::from(comment))))
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Comment id")
    ),
    request_body = UpdateCommentDto,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateCommentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    dto.validate()?;
    let req = UpdateCommentRequest {
        content: dto.content,
        event: dto.event,
    };

    let comment = state
        .comment_service
        .update_comment(auth.user_id, id, req)
        .await?;
    Ok((StatusCode::OK, Json(CommentDto::from(comment))))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .comment_service
        .delete_comment(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
