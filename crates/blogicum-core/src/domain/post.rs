use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog entry with scheduled publication.
///
/// `pub_date` may lie in the future: the post then stays hidden from
/// everyone but its author (and staff) until that instant passes.
/// `is_published` is flipped by moderators, not by the author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_published: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a post published as of now. Callers override `pub_date`
    /// to schedule publication, and attach category/location/image as
    /// needed.
    pub fn new(author_id: Uuid, title: String, text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            text,
            pub_date: now,
            category_id: None,
            location_id: None,
            is_published: true,
            image_url: None,
            created_at: now,
        }
    }
}
