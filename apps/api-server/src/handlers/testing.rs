//! Shared fixtures for handler tests: mock-backed state and token helpers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use uuid::Uuid;

use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use blogicum_infra::database::entity::{category, comment, location, post, user};
use blogicum_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

use crate::state::AppState;

pub(crate) fn empty_conn() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// Builds an [`AppState`] over mock connections; repositories that a test
/// does not override answer from an empty buffer.
pub(crate) struct StateBuilder {
    users: DatabaseConnection,
    posts: DatabaseConnection,
    categories: DatabaseConnection,
    locations: DatabaseConnection,
    comments: DatabaseConnection,
}

pub(crate) fn state_builder() -> StateBuilder {
    StateBuilder {
        users: empty_conn(),
        posts: empty_conn(),
        categories: empty_conn(),
        locations: empty_conn(),
        comments: empty_conn(),
    }
}

impl StateBuilder {
    pub fn users(mut self, conn: DatabaseConnection) -> Self {
        self.users = conn;
        self
    }

    pub fn posts(mut self, conn: DatabaseConnection) -> Self {
        self.posts = conn;
        self
    }

    pub fn categories(mut self, conn: DatabaseConnection) -> Self {
        self.categories = conn;
        self
    }

    pub fn locations(mut self, conn: DatabaseConnection) -> Self {
        self.locations = conn;
        self
    }

    pub fn comments(mut self, conn: DatabaseConnection) -> Self {
        self.comments = conn;
        self
    }

    pub fn build(self) -> AppState {
        AppState {
            users: Arc::new(PostgresUserRepository::new(self.users)),
            posts: Arc::new(PostgresPostRepository::new(self.posts)),
            categories: Arc::new(PostgresCategoryRepository::new(self.categories)),
            locations: Arc::new(PostgresLocationRepository::new(self.locations)),
            comments: Arc::new(PostgresCommentRepository::new(self.comments)),
        }
    }
}

pub(crate) fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "handler-tests".to_string(),
    }))
}

pub(crate) fn password_service() -> Arc<dyn PasswordService> {
    Arc::new(Argon2PasswordService::new())
}

pub(crate) fn bearer(
    tokens: &Arc<dyn TokenService>,
    user_id: Uuid,
    username: &str,
    roles: Vec<String>,
) -> String {
    let token = tokens.generate_token(user_id, username, roles).unwrap();
    format!("Bearer {token}")
}

pub(crate) fn user_model(username: &str, password_hash: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: password_hash.to_owned(),
        first_name: None,
        last_name: None,
        is_staff: false,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

pub(crate) fn category_model(slug: &str, is_published: bool) -> category::Model {
    category::Model {
        id: Uuid::new_v4(),
        title: "Letters".to_owned(),
        description: "Correspondence of all kinds".to_owned(),
        slug: slug.to_owned(),
        is_published,
        created_at: Utc::now().into(),
    }
}

pub(crate) fn post_model(author_id: Uuid, category_id: Option<Uuid>) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        author_id,
        title: "Evening in the garden".to_owned(),
        text: "A long walk past the orangery.".to_owned(),
        pub_date: now.into(),
        category_id,
        location_id: None,
        is_published: true,
        image_url: None,
        created_at: now.into(),
    }
}

pub(crate) fn location_model(name: &str) -> location::Model {
    location::Model {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        is_published: true,
        created_at: Utc::now().into(),
    }
}

pub(crate) fn comment_model(post_id: Uuid, author_id: Uuid, text: &str) -> comment::Model {
    comment::Model {
        id: Uuid::new_v4(),
        post_id,
        author_id,
        text: text.to_owned(),
        is_published: true,
        created_at: Utc::now().into(),
    }
}

/// Mock row for a `find_also_related` select over posts and categories.
/// The combined query aliases the left columns `A_*` and the right `B_*`.
pub(crate) fn post_join_row(
    p: &post::Model,
    c: Option<&category::Model>,
) -> BTreeMap<String, Value> {
    let mut row = BTreeMap::new();
    row.insert("A_id".to_owned(), p.id.into());
    row.insert("A_author_id".to_owned(), p.author_id.into());
    row.insert("A_title".to_owned(), p.title.clone().into());
    row.insert("A_text".to_owned(), p.text.clone().into());
    row.insert("A_pub_date".to_owned(), p.pub_date.into());
    row.insert("A_category_id".to_owned(), p.category_id.into());
    row.insert("A_location_id".to_owned(), p.location_id.into());
    row.insert("A_is_published".to_owned(), p.is_published.into());
    row.insert("A_image_url".to_owned(), p.image_url.clone().into());
    row.insert("A_created_at".to_owned(), p.created_at.into());

    if let Some(c) = c {
        row.insert("B_id".to_owned(), c.id.into());
        row.insert("B_title".to_owned(), c.title.clone().into());
        row.insert("B_description".to_owned(), c.description.clone().into());
        row.insert("B_slug".to_owned(), c.slug.clone().into());
        row.insert("B_is_published".to_owned(), c.is_published.into());
        row.insert("B_created_at".to_owned(), c.created_at.into());
    }

    row
}

/// Mock row for the grouped published-comment count query.
pub(crate) fn count_row(post_id: Uuid, count: i64) -> BTreeMap<String, Value> {
    BTreeMap::from([
        ("post_id".to_owned(), Value::from(post_id)),
        ("published_count".to_owned(), Value::BigInt(Some(count))),
    ])
}

/// Mock row for a paginator's total-count query.
pub(crate) fn num_items_row(total: i64) -> BTreeMap<String, Value> {
    BTreeMap::from([("num_items".to_owned(), Value::BigInt(Some(total)))])
}

/// Mock connection that serves one post-with-category row for `find_record`,
/// including the author and comment-count follow-up queries.
pub(crate) fn post_record_conn(
    p: &post::Model,
    c: Option<&category::Model>,
    author: &user::Model,
    comment_count: i64,
) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_join_row(p, c)]])
        .append_query_results(vec![vec![author.clone()]])
        .append_query_results(vec![vec![count_row(p.id, comment_count)]])
        .into_connection()
}
