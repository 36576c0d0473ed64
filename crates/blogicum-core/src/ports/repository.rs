use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Post, User, Viewer};
use crate::error::RepoError;
use crate::page::{Page, PageRequest};

/// A post joined with the display data every listing needs.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub post: Post,
    pub author_username: String,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author_username: String,
}

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user.
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    /// Update an existing user.
    async fn update(&self, user: User) -> Result<User, RepoError>;
}

/// Post repository.
///
/// Listing methods take the requesting [`Viewer`] so that the publication
/// rule is enforced inside the query rather than after the fact.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch one post with its joined author, category, location and
    /// published comment count. Visibility is not checked here.
    async fn find_record(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    /// Page through every post the viewer may see, newest first.
    async fn list_visible(
        &self,
        viewer: &Viewer,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError>;

    /// Page through the viewer-visible posts of one category.
    async fn list_by_category(
        &self,
        category_id: Uuid,
        viewer: &Viewer,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError>;

    /// Page through the viewer-visible posts of one author.
    async fn list_by_author(
        &self,
        author_id: Uuid,
        viewer: &Viewer,
        page: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError>;

    /// Insert a new post.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Update an existing post.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete a post by its ID.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find a category by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    /// Find a published category by its slug. Unpublished categories are
    /// treated as absent.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// List all published categories, alphabetically.
    async fn list_published(&self) -> Result<Vec<Category>, RepoError>;
}

/// Location repository.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Find a location by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError>;

    /// List all published locations, alphabetically.
    async fn list_published(&self) -> Result<Vec<Location>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find a comment by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    /// List the published comments of a post, newest first.
    async fn list_published_for_post(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentRecord>, RepoError>;

    /// Insert a new comment.
    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError>;

    /// Update an existing comment.
    async fn update(&self, comment: Comment) -> Result<Comment, RepoError>;

    /// Delete a comment by its ID.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
