//! Category handlers.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::Category;
use blogicum_core::page::PageRequest;
use blogicum_shared::dto::{CategoryPostsResponse, CategoryResponse, PageQuery};

use super::posts::page_response;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
    }
}

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list_published().await?;

    Ok(HttpResponse::Ok().json(
        categories
            .into_iter()
            .map(category_response)
            .collect::<Vec<_>>(),
    ))
}

/// GET /api/categories/{slug}/posts
///
/// An unpublished category is a 404 for everyone, staff included; only
/// its posts obey the per-viewer rule.
pub async fn category_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let category = state
        .categories
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let page = state
        .posts
        .list_by_category(
            category.id,
            &identity.viewer(),
            PageRequest::new(query.page_number()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: category_response(category),
        posts: page_response(page),
    }))
}
