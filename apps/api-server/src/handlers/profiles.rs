//! Profile handlers: public profiles and the caller's own account.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::domain::User;
use blogicum_core::page::PageRequest;
use blogicum_core::validation::validate_profile_update;
use blogicum_shared::dto::{PageQuery, ProfileResponse, UpdateProfileRequest};

use super::auth::account_response;
use super::posts::page_response;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn profile_response(user: User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}

/// GET /api/profiles/{username}
pub async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(profile_response(user)))
}

/// GET /api/profiles/{username}/posts
///
/// The owner (and staff) see the profile's drafts and scheduled posts in
/// here; everyone else only gets what is publicly live.
pub async fn profile_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let page = state
        .posts
        .list_by_author(
            user.id,
            &identity.viewer(),
            PageRequest::new(query.page_number()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// PUT /api/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_profile_update(req.username.as_deref(), req.email.as_deref())?;

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if let Some(username) = req.username {
        user.username = username;
    }
    if let Some(email) = req.email {
        user.email = email;
    }
    if let Some(first_name) = req.first_name {
        user.first_name = Some(first_name);
    }
    if let Some(last_name) = req.last_name {
        user.last_name = Some(last_name);
    }
    user.updated_at = Utc::now();

    // A clash with another account's username or email surfaces as a
    // unique-constraint conflict
    let saved = state.users.update(user).await?;

    tracing::info!(user_id = %saved.id, "Profile updated");

    Ok(HttpResponse::Ok().json(account_response(saved)))
}
