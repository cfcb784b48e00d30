mod engagement;
mod posts;
mod users;

use super::models::{CommentRecord, FeedPostRecord, PostRecord, UserRecord};
use crate::error::DomainResult;
use rusqlite::Connection;

pub trait UserRepository {
    /// Fails with `DuplicateUsername` when the UNIQUE constraint rejects the row.
    fn create(&self, record: &UserRecord) -> DomainResult<()>;
    fn get(&self, id: &str) -> DomainResult<Option<UserRecord>>;
    fn get_by_username(&self, username: &str) -> DomainResult<Option<UserRecord>>;
}

pub trait PostRepository {
    fn create(&self, record: &PostRecord) -> DomainResult<()>;
    fn get(&self, id: &str) -> DomainResult<Option<PostRecord>>;
    /// All posts (or one owner's posts) newest first, joined with the owner
    /// username and live counts in the same pass. `viewer_id` drives the
    /// `liked` flag; `None` marks an anonymous viewer.
    fn list_feed(
        &self,
        viewer_id: Option<&str>,
        owner_id: Option<&str>,
    ) -> DomainResult<Vec<FeedPostRecord>>;
}

pub trait EngagementRepository {
    /// Flips the like for (user, post): deletes the row when present,
    /// inserts one otherwise. Runs in one transaction under the UNIQUE pair
    /// constraint so concurrent toggles cannot duplicate the row.
    fn toggle_like(&self, user_id: &str, post_id: &str) -> DomainResult<()>;
    fn count_likes(&self, post_id: &str) -> DomainResult<i64>;
    fn has_liked(&self, user_id: &str, post_id: &str) -> DomainResult<bool>;
    fn add_comment(&self, record: &CommentRecord) -> DomainResult<()>;
    fn count_comments(&self, post_id: &str) -> DomainResult<i64>;
    /// Comments for a post newest first, each paired with the author username.
    fn list_comments(&self, post_id: &str) -> DomainResult<Vec<(CommentRecord, String)>>;
}

pub struct SqliteRepositories<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRepositories<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn users(&self) -> impl UserRepository + '_ {
        users::SqliteUserRepository { conn: self.conn }
    }

    pub fn posts(&self) -> impl PostRepository + '_ {
        posts::SqlitePostRepository { conn: self.conn }
    }

    pub fn engagement(&self) -> impl EngagementRepository + '_ {
        engagement::SqliteEngagementRepository { conn: self.conn }
    }
}
