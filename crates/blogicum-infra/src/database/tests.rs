use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{
    DatabaseBackend, DbErr, MockDatabase, MockExecResult, QueryFilter, QueryTrait, RuntimeErr,
    Value,
};
use uuid::Uuid;

use blogicum_core::domain::Viewer;
use blogicum_core::error::RepoError;
use blogicum_core::page::PageRequest;
use blogicum_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::{category, comment, post, user};
use super::map_db_err;
use super::{PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository};

fn user_model(username: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$stub".to_owned(),
        first_name: None,
        last_name: None,
        is_staff: false,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn category_model(slug: &str) -> category::Model {
    category::Model {
        id: Uuid::new_v4(),
        title: "Travel notes".to_owned(),
        description: "Places and roads".to_owned(),
        slug: slug.to_owned(),
        is_published: true,
        created_at: Utc::now().into(),
    }
}

fn post_model(author_id: Uuid, category_id: Option<Uuid>) -> post::Model {
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

/// Mock row for a `find_also_related` select over posts and categories.
/// The combined query aliases the left columns `A_*` and the right `B_*`.
fn post_join_row(p: &post::Model, c: Option<&category::Model>) -> BTreeMap<String, Value> {
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

/// Mock row for a comment joined with its author.
fn comment_join_row(m: &comment::Model, author: &user::Model) -> BTreeMap<String, Value> {
    let mut row = BTreeMap::new();
    row.insert("A_id".to_owned(), m.id.into());
    row.insert("A_post_id".to_owned(), m.post_id.into());
    row.insert("A_author_id".to_owned(), m.author_id.into());
    row.insert("A_text".to_owned(), m.text.clone().into());
    row.insert("A_is_published".to_owned(), m.is_published.into());
    row.insert("A_created_at".to_owned(), m.created_at.into());

    row.insert("B_id".to_owned(), author.id.into());
    row.insert("B_username".to_owned(), author.username.clone().into());
    row.insert("B_email".to_owned(), author.email.clone().into());
    row.insert("B_password_hash".to_owned(), author.password_hash.clone().into());
    row.insert("B_first_name".to_owned(), author.first_name.clone().into());
    row.insert("B_last_name".to_owned(), author.last_name.clone().into());
    row.insert("B_is_staff".to_owned(), author.is_staff.into());
    row.insert("B_created_at".to_owned(), author.created_at.into());
    row.insert("B_updated_at".to_owned(), author.updated_at.into());

    row
}

/// Mock row for the grouped published-comment count query. Keys are chosen
/// so their alphabetical order matches the tuple's column order.
fn count_row(post_id: Uuid, count: i64) -> BTreeMap<String, Value> {
    BTreeMap::from([
        ("post_id".to_owned(), Value::from(post_id)),
        ("published_count".to_owned(), Value::BigInt(Some(count))),
    ])
}

fn num_items_row(count: i64) -> BTreeMap<String, Value> {
    BTreeMap::from([("num_items".to_owned(), Value::BigInt(Some(count)))])
}

#[tokio::test]
async fn find_user_by_username_maps_row() {
    let expected = user_model("karamzin");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![expected.clone()]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let found = repo.find_by_username("karamzin").await.unwrap().unwrap();

    assert_eq!(found.id, expected.id);
    assert_eq!(found.username, "karamzin");
    assert!(!found.is_staff);
}

#[tokio::test]
async fn find_record_assembles_joins_and_count() {
    let author = user_model("gogol");
    let cat = category_model("roads");
    let p = post_model(author.id, Some(cat.id));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_join_row(&p, Some(&cat))]])
        .append_query_results(vec![vec![author.clone()]])
        .append_query_results(vec![vec![count_row(p.id, 3)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let record = repo.find_record(p.id).await.unwrap().unwrap();

    assert_eq!(record.post.id, p.id);
    assert_eq!(record.author_username, "gogol");
    assert_eq!(record.comment_count, 3);
    assert_eq!(record.category.as_ref().map(|c| c.slug.as_str()), Some("roads"));
    assert!(record.location.is_none());
}

#[tokio::test]
async fn find_record_missing_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<BTreeMap<String, Value>>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let record = repo.find_record(Uuid::new_v4()).await.unwrap();

    assert!(record.is_none());
}

#[tokio::test]
async fn list_page_past_end_serves_last_page() {
    let author = user_model("pushkin");
    let cat = category_model("letters");
    let p = post_model(author.id, Some(cat.id));

    // 25 items at 10 per page puts the last page at 3; page 99 is clamped.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![num_items_row(25)]])
        .append_query_results(vec![vec![post_join_row(&p, Some(&cat))]])
        .append_query_results(vec![vec![author.clone()]])
        .append_query_results(vec![Vec::<BTreeMap<String, Value>>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo
        .list_visible(&Viewer::Anonymous, PageRequest::new(99))
        .await
        .unwrap();

    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_items, 25);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].comment_count, 0);
}

#[tokio::test]
async fn empty_listing_reports_one_page() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![num_items_row(0)]])
        .append_query_results(vec![Vec::<BTreeMap<String, Value>>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo
        .list_visible(&Viewer::Anonymous, PageRequest::new(1))
        .await
        .unwrap();

    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_items, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.delete(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn published_comments_listed_with_authors() {
    let author = user_model("gogol");
    let m = comment::Model {
        id: Uuid::new_v4(),
        post_id: Uuid::new_v4(),
        author_id: author.id,
        text: "Wonderful evening.".to_owned(),
        is_published: true,
        created_at: Utc::now().into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment_join_row(&m, &author)]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let records = repo.list_published_for_post(m.post_id).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].comment.id, m.id);
    assert_eq!(records[0].author_username, "gogol");
}

fn scope_sql(viewer: &Viewer) -> String {
    let scope = PostgresPostRepository::visible_scope(viewer, Utc::now())
        .expect("viewer should be restricted");

    post::Entity::find()
        .find_also_related(category::Entity)
        .filter(scope)
        .build(DatabaseBackend::Postgres)
        .to_string()
}

#[test]
fn anonymous_scope_requires_flags_and_category() {
    let sql = scope_sql(&Viewer::Anonymous);

    assert!(sql.contains(r#""posts"."is_published" = TRUE"#));
    assert!(sql.contains(r#""posts"."pub_date" <="#));
    assert!(sql.contains(r#""categories"."is_published" = TRUE"#));
    assert!(!sql.contains(r#""posts"."author_id" ="#));
}

#[test]
fn user_scope_adds_author_exception() {
    let user_id = Uuid::new_v4();
    let sql = scope_sql(&Viewer::User(user_id));

    assert!(sql.contains(r#""posts"."is_published" = TRUE"#));
    assert!(sql.contains(&format!(r#""posts"."author_id" = '{user_id}'"#)));
}

#[test]
fn staff_scope_is_unrestricted() {
    let scope = PostgresPostRepository::visible_scope(&Viewer::Staff(Uuid::new_v4()), Utc::now());
    assert!(scope.is_none());
}

#[test]
fn record_not_updated_maps_to_not_found() {
    assert!(matches!(map_db_err(DbErr::RecordNotUpdated), RepoError::NotFound));
}

#[test]
fn connection_failures_map_to_connection() {
    let err = map_db_err(DbErr::Conn(RuntimeErr::Internal("refused".to_owned())));
    assert!(matches!(err, RepoError::Connection(_)));
}

#[test]
fn other_failures_map_to_query() {
    let err = map_db_err(DbErr::Custom("boom".to_owned()));
    assert!(matches!(err, RepoError::Query(_)));
}
