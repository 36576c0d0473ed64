//! The post-visibility rule.
//!
//! A post is visible to a viewer iff it is publicly live (published,
//! publication time reached, filed under a published category), or the
//! viewer wrote it, or the viewer is staff. Every read path - the index,
//! category and profile listings, and the detail page - answers through
//! this one rule; the listings apply its SQL projection, the detail page
//! applies [`Post::is_visible_to`]. A viewer who fails the rule gets a
//! not-found outcome, never a permission error, so hidden posts do not
//! leak their existence.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};

/// Role claim that grants the staff visibility override.
pub const STAFF_ROLE: &str = "staff";

/// The principal a request is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// No credentials presented.
    Anonymous,
    /// A regular authenticated account.
    User(Uuid),
    /// An account with the staff override: sees every post.
    Staff(Uuid),
}

impl Viewer {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) | Viewer::Staff(id) => Some(*id),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Viewer::Staff(_))
    }
}

impl Post {
    /// Whether `viewer` may see this post right now.
    ///
    /// `category` is the post's category if it has one. A post without a
    /// category (or whose category record was not found) is never publicly
    /// visible; only its author and staff can open it.
    pub fn is_visible_to(&self, viewer: &Viewer, category: Option<&Category>) -> bool {
        self.visible_at(viewer, category, Utc::now())
    }

    /// Visibility at an explicit instant.
    ///
    /// `now` must be the wall clock taken at request time; production
    /// callers go through [`Post::is_visible_to`], tests pin the clock.
    pub fn visible_at(
        &self,
        viewer: &Viewer,
        category: Option<&Category>,
        now: DateTime<Utc>,
    ) -> bool {
        if viewer.is_staff() {
            return true;
        }
        if viewer.user_id() == Some(self.author_id) {
            return true;
        }
        self.is_published
            && self.pub_date <= now
            && category.map(|c| c.is_published).unwrap_or(false)
    }
}
