use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::comment::Comment;
use crate::context::RequestContext;
use crate::http::response::{ApiError, Message};

pub const GREETING: &str = "Hello World";
pub const DELETED: &str = "Successfully deleted";

/// Body of `POST /api/v1/comment`. Every field is required and non-empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostCommentRequest {
    #[serde(alias = "Slug")]
    pub slug: Option<String>,
    #[serde(rename = "Author", alias = "author")]
    pub author: Option<String>,
    #[serde(rename = "Body", alias = "body")]
    pub body: Option<String>,
}

impl PostCommentRequest {
    fn into_comment(self) -> Result<Comment, ApiError> {
        Ok(Comment {
            id: String::new(),
            slug: required("slug", self.slug)?,
            author: required("author", self.author)?,
            body: required("body", self.body)?,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Invalid(format!("{field} is required"))),
    }
}

fn require_id(id: &str) -> Result<&str, ApiError> {
    if id.is_empty() {
        return Err(ApiError::MissingParam("id"));
    }
    Ok(id)
}

pub async fn hello() -> &'static str {
    GREETING
}

pub async fn post_comment(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Bytes,
) -> Result<Json<Comment>, ApiError> {
    let request: PostCommentRequest = serde_json::from_slice(&body)?;
    let comment = request.into_comment()?;

    let created = state.comments.post_comment(&ctx, comment).await?;
    Ok(Json(created))
}

pub async fn get_comment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Comment>, ApiError> {
    let id = require_id(&id)?;
    let comment = state.comments.get_comment(&ctx, id).await?;
    Ok(Json(comment))
}

pub async fn update_comment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Comment>, ApiError> {
    let id = require_id(&id)?;
    let comment: Comment = serde_json::from_slice(&body)?;

    let updated = state.comments.update_comment(&ctx, id, comment).await?;
    Ok(Json(updated))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Message, ApiError> {
    let id = require_id(&id)?;
    state.comments.delete_comment(&ctx, id).await?;
    Ok(Message::new(DELETED))
}

/// Target of the id-less `/api/v1/comment/` routes.
pub async fn missing_id() -> ApiError {
    ApiError::MissingParam("id")
}
