/*
 * Responsibility
 * - /post CRUD handlers
 * - the access middleware has already verified the caller; AuthCtx is only used for logging
 * - unknown ids become 404, store failures 500 (via AppError)
 */
use axum::{extract::State, http::StatusCode};

use crate::{
    api::{
        dto::posts::{CreatePostRequest, PostResponse, UpdatePostRequest},
        extractors::{AuthCtx, Json, PostId},
    },
    error::AppError,
    state::AppState,
};

const RESOURCE: &str = "post";

pub async fn list_posts(
    State(state): State<AppState>,
    AuthCtx(caller): AuthCtx,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = state.store.list().await?;

    tracing::debug!(subject = %caller.subject, count = rows.len(), "listed posts");
    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtx(caller): AuthCtx,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let row = state.store.create(req.into()).await?;

    tracing::info!(subject = %caller.subject, post_id = row.id, "created post");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_post(
    State(state): State<AppState>,
    AuthCtx(_caller): AuthCtx,
    PostId(id): PostId,
) -> Result<Json<PostResponse>, AppError> {
    let row = state
        .store
        .get(id)
        .await?
        .ok_or(AppError::not_found(RESOURCE))?;

    Ok(Json(row.into()))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthCtx(caller): AuthCtx,
    PostId(id): PostId,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let row = state
        .store
        .update(id, req.into())
        .await?
        .ok_or(AppError::not_found(RESOURCE))?;

    tracing::info!(subject = %caller.subject, post_id = id, "updated post");
    Ok(Json(row.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtx(caller): AuthCtx,
    PostId(id): PostId,
) -> Result<StatusCode, AppError> {
    if !state.store.delete(id).await? {
        return Err(AppError::not_found(RESOURCE));
    }

    tracing::info!(subject = %caller.subject, post_id = id, "deleted post");
    Ok(StatusCode::NO_CONTENT)
}
