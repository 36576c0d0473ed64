//! Comment handlers.
//!
//! Commenting requires the post to be visible to the caller. Editing and
//! deleting check that the comment belongs to the addressed post and that
//! the caller wrote it; the post's own visibility is not re-checked, so an
//! author keeps control of their comments even under a since-hidden post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::domain::Comment;
use blogicum_core::ports::CommentRecord;
use blogicum_core::validation::validate_comment_input;
use blogicum_shared::dto::{AuthorResponse, CommentRequest, CommentResponse};

use super::posts::visible_record;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn comment_response(record: CommentRecord) -> CommentResponse {
    CommentResponse {
        id: record.comment.id,
        post_id: record.comment.post_id,
        author: AuthorResponse {
            id: record.comment.author_id,
            username: record.author_username,
        },
        text: record.comment.text,
        created_at: record.comment.created_at,
    }
}

/// Fetch a comment under `post_id` and check it belongs to the caller.
/// A comment filed under a different post is reported as missing.
async fn owned_comment(
    state: &AppState,
    post_id: Uuid,
    comment_id: Uuid,
    identity: &Identity,
) -> Result<Comment, AppError> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|comment| comment.post_id == post_id)
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.author_id != identity.user_id {
        return Err(AppError::Forbidden(
            "Only the author may modify this comment".to_string(),
        ));
    }

    Ok(comment)
}

/// POST /api/posts/{post_id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    visible_record(&state, post_id, &identity.viewer()).await?;
    validate_comment_input(&req.text)?;

    let comment = Comment::new(post_id, identity.user_id, req.text);
    let saved = state.comments.insert(comment).await?;

    tracing::info!(comment_id = %saved.id, post_id = %post_id, "Comment created");

    Ok(HttpResponse::Created().json(comment_response(CommentRecord {
        comment: saved,
        author_username: identity.username,
    })))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let req = body.into_inner();

    let mut comment = owned_comment(&state, post_id, comment_id, &identity).await?;
    validate_comment_input(&req.text)?;

    comment.text = req.text;
    let saved = state.comments.update(comment).await?;

    tracing::info!(comment_id = %saved.id, "Comment updated");

    Ok(HttpResponse::Ok().json(comment_response(CommentRecord {
        comment: saved,
        author_username: identity.username,
    })))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    owned_comment(&state, post_id, comment_id, &identity).await?;
    state.comments.delete(comment_id).await?;

    tracing::info!(comment_id = %comment_id, "Comment deleted");

    Ok(HttpResponse::NoContent().finish())
}
