//! Post handlers

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use board_core::{BoardError, Post};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Board(e) = self;
        let (status, code) = if e.is_client_error() {
            (StatusCode::BAD_REQUEST, "invalid_input")
        } else {
            error!("Post store failure: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
        };

        let body = Json(json!({
            "error": e.to_string(),
            "code": code,
        }));
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: Post,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<PostListResponse>, ApiError> {
    info!("[GET ] [/api/posts]");
    let posts = state.posts.list_recent().await?;
    Ok(Json(PostListResponse { posts }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req_body): Json<CreatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    info!("[POST] [/api/posts] Param : [{:?}]", req_body.text);
    let post = state.posts.create_post(req_body.text.as_deref()).await?;
    Ok(Json(PostResponse { post }))
}
