//! PostgreSQL post repository.
//!
//! Listing queries join the category so the publication restriction can be
//! evaluated in SQL; authors, locations and comment counts are then loaded
//! in batches for the page at hand.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SelectTwo,
};
use uuid::Uuid;

use blogicum_core::domain::{Location, Post, Viewer};
use blogicum_core::error::RepoError;
use blogicum_core::page::{Page, PageRequest};
use blogicum_core::ports::{PostRecord, PostRepository};

use super::entity::{category, comment, location, post, user};
use super::map_db_err;

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// SQL restriction equivalent to [`Post::visible_at`] for this viewer.
    /// `None` means the viewer is unrestricted.
    ///
    /// The public arm requires the category join row, so a post without a
    /// category never matches it.
    pub(crate) fn visible_scope(viewer: &Viewer, now: DateTime<Utc>) -> Option<Condition> {
        if viewer.is_staff() {
            return None;
        }

        let public = Condition::all()
            .add(post::Column::IsPublished.eq(true))
            .add(post::Column::PubDate.lte(now))
            .add(category::Column::IsPublished.eq(true));

        Some(match viewer.user_id() {
            Some(user_id) => Condition::any()
                .add(public)
                .add(post::Column::AuthorId.eq(user_id)),
            None => Condition::any().add(public),
        })
    }

    /// Base listing query: posts with their category, newest first.
    fn scoped(viewer: &Viewer) -> SelectTwo<post::Entity, category::Entity> {
        let mut query = post::Entity::find()
            .find_also_related(category::Entity)
            .order_by_desc(post::Column::PubDate);

        if let Some(scope) = Self::visible_scope(viewer, Utc::now()) {
            query = query.filter(scope);
        }

        query
    }

    /// Run one page of a listing query and join in the per-page extras.
    ///
    /// The requested page is clamped to the last existing page, so asking
    /// for a page past the end serves the final page instead of nothing.
    async fn page_records(
        &self,
        query: SelectTwo<post::Entity, category::Entity>,
        request: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        let paginator = query.paginate(&self.db, request.per_page);
        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(map_db_err)?;

        let total_pages = totals.number_of_pages.max(1);
        let current = request.page.min(total_pages);

        let rows = paginator
            .fetch_page(current - 1)
            .await
            .map_err(map_db_err)?;
        let items = self.enrich(rows).await?;

        Ok(Page {
            items,
            page: current,
            total_pages,
            total_items: totals.number_of_items,
        })
    }

    /// Attach author usernames, locations and published-comment counts to a
    /// page of rows, one batched query per concern.
    async fn enrich(
        &self,
        rows: Vec<(post::Model, Option<category::Model>)>,
    ) -> Result<Vec<PostRecord>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = rows.iter().map(|(p, _)| p.id).collect();

        let mut author_ids: Vec<Uuid> = rows.iter().map(|(p, _)| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut location_ids: Vec<Uuid> = rows.iter().filter_map(|(p, _)| p.location_id).collect();
        location_ids.sort_unstable();
        location_ids.dedup();

        let authors: HashMap<Uuid, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let locations: HashMap<Uuid, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            location::Entity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|l| (l.id, l.into()))
                .collect()
        };

        let counts: HashMap<Uuid, i64> = comment::Entity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "published_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .filter(comment::Column::IsPublished.eq(true))
            .group_by(comment::Column::PostId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .collect();

        let mut records = Vec::with_capacity(rows.len());
        for (model, category) in rows {
            let author_username = authors.get(&model.author_id).cloned().ok_or_else(|| {
                RepoError::Query(format!("author row missing for post {}", model.id))
            })?;
            let location = model.location_id.and_then(|id| locations.get(&id).cloned());
            let comment_count = counts.get(&model.id).copied().unwrap_or(0) as u64;

            records.push(PostRecord {
                post: model.into(),
                author_username,
                category: category.map(Into::into),
                location,
                comment_count,
            });
        }

        Ok(records)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_record(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let row = post::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match row {
            Some(row) => Ok(self.enrich(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_visible(
        &self,
        viewer: &Viewer,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        self.page_records(Self::scoped(viewer), page).await
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        viewer: &Viewer,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        let query = Self::scoped(viewer).filter(post::Column::CategoryId.eq(category_id));
        self.page_records(query, page).await
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        viewer: &Viewer,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        let query = Self::scoped(viewer).filter(post::Column::AuthorId.eq(author_id));
        self.page_records(query, page).await
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .update(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
