//! Post handlers: the index, the detail page and the author's CRUD.
//!
//! Every read goes through [`visible_record`] or a viewer-scoped listing,
//! so a post the caller may not see is reported as missing rather than
//! forbidden. Ownership is only checked after that, which keeps hidden
//! posts from leaking their existence through a 403.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::domain::{Category, Location, Post, Viewer};
use blogicum_core::page::{Page, PageRequest};
use blogicum_core::ports::PostRecord;
use blogicum_core::validation::validate_post_input;
use blogicum_shared::dto::{
    AuthorResponse, CreatePostRequest, PageQuery, PageResponse, PostDetailResponse, PostResponse,
    UpdatePostRequest,
};

use super::categories::category_response;
use super::comments::comment_response;
use super::locations::location_response;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn post_response(record: PostRecord) -> PostResponse {
    PostResponse {
        id: record.post.id,
        title: record.post.title,
        text: record.post.text,
        pub_date: record.post.pub_date,
        author: AuthorResponse {
            id: record.post.author_id,
            username: record.author_username,
        },
        category: record.category.map(category_response),
        location: record.location.map(location_response),
        image_url: record.post.image_url,
        is_published: record.post.is_published,
        comment_count: record.comment_count,
        created_at: record.post.created_at,
    }
}

pub(crate) fn page_response(page: Page<PostRecord>) -> PageResponse<PostResponse> {
    let page = page.map(post_response);
    PageResponse {
        items: page.items,
        page: page.page,
        total_pages: page.total_pages,
        total_items: page.total_items,
    }
}

/// Fetch a post and apply the visibility rule for this viewer. A post the
/// viewer may not see answers exactly like a post that does not exist.
pub(crate) async fn visible_record(
    state: &AppState,
    post_id: Uuid,
    viewer: &Viewer,
) -> Result<PostRecord, AppError> {
    let record = state
        .posts
        .find_record(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if !record.post.is_visible_to(viewer, record.category.as_ref()) {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    Ok(record)
}

async fn resolve_category(state: &AppState, id: Uuid) -> Result<Category, AppError> {
    state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Validation(vec!["category does not exist".to_string()]))
}

async fn resolve_location(state: &AppState, id: Uuid) -> Result<Location, AppError> {
    state
        .locations
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Validation(vec!["location does not exist".to_string()]))
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list_visible(&identity.viewer(), PageRequest::new(query.page_number()))
        .await?;

    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_post_input(&req.title, &req.text)?;

    let category = match req.category_id {
        Some(id) => Some(resolve_category(&state, id).await?),
        None => None,
    };
    let location = match req.location_id {
        Some(id) => Some(resolve_location(&state, id).await?),
        None => None,
    };

    let mut post = Post::new(identity.user_id, req.title, req.text);
    post.category_id = req.category_id;
    post.location_id = req.location_id;
    post.image_url = req.image_url;
    if let Some(pub_date) = req.pub_date {
        post.pub_date = pub_date;
    }

    let saved = state.posts.insert(post).await?;

    tracing::info!(post_id = %saved.id, author = %identity.username, "Post created");

    let record = PostRecord {
        post: saved,
        author_username: identity.username,
        category,
        location,
        comment_count: 0,
    };

    Ok(HttpResponse::Created().json(post_response(record)))
}

/// GET /api/posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let record = visible_record(&state, post_id, &identity.viewer()).await?;
    let comments = state.comments.list_published_for_post(post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(record),
        comments: comments.into_iter().map(comment_response).collect(),
    }))
}

/// PUT /api/posts/{post_id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    let record = visible_record(&state, post_id, &identity.viewer()).await?;
    if record.post.author_id != identity.user_id {
        return Err(AppError::Forbidden(
            "Only the author may edit this post".to_string(),
        ));
    }

    let PostRecord {
        mut post,
        author_username,
        mut category,
        mut location,
        comment_count,
    } = record;

    if let Some(title) = req.title {
        post.title = title;
    }
    if let Some(text) = req.text {
        post.text = text;
    }
    if let Some(pub_date) = req.pub_date {
        post.pub_date = pub_date;
    }
    if let Some(image_url) = req.image_url {
        post.image_url = Some(image_url);
    }
    if let Some(category_id) = req.category_id {
        category = Some(resolve_category(&state, category_id).await?);
        post.category_id = Some(category_id);
    }
    if let Some(location_id) = req.location_id {
        location = Some(resolve_location(&state, location_id).await?);
        post.location_id = Some(location_id);
    }

    validate_post_input(&post.title, &post.text)?;

    let saved = state.posts.update(post).await?;

    tracing::info!(post_id = %saved.id, "Post updated");

    let record = PostRecord {
        post: saved,
        author_username,
        category,
        location,
        comment_count,
    };

    Ok(HttpResponse::Ok().json(post_response(record)))
}

/// DELETE /api/posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let record = visible_record(&state, post_id, &identity.viewer()).await?;
    if record.post.author_id != identity.user_id {
        return Err(AppError::Forbidden(
            "Only the author may delete this post".to_string(),
        ));
    }

    state.posts.delete(post_id).await?;

    tracing::info!(post_id = %post_id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use uuid::Uuid;

    use crate::handlers::testing;

    #[actix_web::test]
    async fn hidden_post_detail_is_not_found_for_anonymous() {
        let author = testing::user_model("gogol", "hash");
        let mut post = testing::post_model(author.id, None);
        post.is_published = false;

        let state = testing::state_builder()
            .posts(testing::post_record_conn(&post, None, &author, 0))
            .build();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(testing::token_service()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn author_sees_own_draft() {
        let author = testing::user_model("gogol", "hash");
        let mut post = testing::post_model(author.id, None);
        post.is_published = false;

        let comments = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<BTreeMap<String, Value>>::new()])
            .into_connection();

        let state = testing::state_builder()
            .posts(testing::post_record_conn(&post, None, &author, 0))
            .comments(comments)
            .build();
        let tokens = testing::token_service();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(tokens.clone()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header((
                "Authorization",
                testing::bearer(&tokens, author.id, "gogol", vec!["user".to_string()]),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["is_published"], false);
        assert_eq!(body["author"]["username"], "gogol");
        assert!(body["comments"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn index_lists_visible_posts() {
        let author = testing::user_model("pushkin", "hash");
        let category = testing::category_model("letters", true);
        let post = testing::post_model(author.id, Some(category.id));

        let posts = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![testing::num_items_row(1)]])
            .append_query_results(vec![vec![testing::post_join_row(&post, Some(&category))]])
            .append_query_results(vec![vec![author.clone()]])
            .append_query_results(vec![vec![testing::count_row(post.id, 2)]])
            .into_connection();

        let state = testing::state_builder().posts(posts).build();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(testing::token_service()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total_items"], 1);
        assert_eq!(body["page"], 1);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["author"]["username"], "pushkin");
        assert_eq!(items[0]["category"]["slug"], "letters");
        assert_eq!(items[0]["comment_count"], 2);
    }

    #[actix_web::test]
    async fn foreign_edit_is_forbidden() {
        let author = testing::user_model("pushkin", "hash");
        let category = testing::category_model("letters", true);
        let post = testing::post_model(author.id, Some(category.id));

        let state = testing::state_builder()
            .posts(testing::post_record_conn(&post, Some(&category), &author, 0))
            .build();
        let tokens = testing::token_service();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(tokens.clone()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header((
                "Authorization",
                testing::bearer(&tokens, Uuid::new_v4(), "gogol", vec!["user".to_string()]),
            ))
            .set_json(serde_json::json!({ "title": "Hijacked" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn hidden_post_edit_by_stranger_is_not_found() {
        let author = testing::user_model("pushkin", "hash");
        let mut post = testing::post_model(author.id, None);
        post.is_published = false;

        let state = testing::state_builder()
            .posts(testing::post_record_conn(&post, None, &author, 0))
            .build();
        let tokens = testing::token_service();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(tokens.clone()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header((
                "Authorization",
                testing::bearer(&tokens, Uuid::new_v4(), "gogol", vec!["user".to_string()]),
            ))
            .set_json(serde_json::json!({ "title": "Hijacked" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        // The post exists but must not reveal itself through a 403
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_post_returns_created() {
        let author = testing::user_model("pushkin", "hash");
        let saved = testing::post_model(author.id, None);

        let posts = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![saved]])
            .into_connection();

        let state = testing::state_builder().posts(posts).build();
        let tokens = testing::token_service();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(tokens.clone()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((
                "Authorization",
                testing::bearer(&tokens, author.id, "pushkin", vec!["user".to_string()]),
            ))
            .set_json(serde_json::json!({
                "title": "Evening in the garden",
                "text": "A long walk past the orangery.",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Evening in the garden");
        assert_eq!(body["author"]["username"], "pushkin");
        assert_eq!(body["comment_count"], 0);
    }

    #[actix_web::test]
    async fn create_post_with_blank_title_is_rejected() {
        let state = testing::state_builder().build();
        let tokens = testing::token_service();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(tokens.clone()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((
                "Authorization",
                testing::bearer(&tokens, Uuid::new_v4(), "pushkin", vec!["user".to_string()]),
            ))
            .set_json(serde_json::json!({ "title": "", "text": "body" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
