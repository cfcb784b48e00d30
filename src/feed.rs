use crate::database::models::{FeedPostRecord, PostRecord};
use crate::database::repositories::{PostRepository, UserRepository};
use crate::database::Database;
use crate::error::{DomainError, DomainResult};
use crate::utils::now_utc_iso;
use uuid::Uuid;

/// Joins the content store with the engagement store to produce posts
/// annotated with live counts and the viewer's like state, all in one read
/// pass. Consistency holds per row; concurrent writes landing mid-scan may
/// be visible across the sequence.
#[derive(Clone)]
pub struct FeedService {
    database: Database,
}

impl FeedService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn build_feed(&self, viewer_id: Option<&str>) -> DomainResult<Vec<FeedPostRecord>> {
        self.database
            .with_repositories(|repos| repos.posts().list_feed(viewer_id, None))
    }

    pub fn build_feed_for_owner(
        &self,
        viewer_id: Option<&str>,
        owner_id: &str,
    ) -> DomainResult<Vec<FeedPostRecord>> {
        self.database
            .with_repositories(|repos| repos.posts().list_feed(viewer_id, Some(owner_id)))
    }

    /// Inserts a new post and returns it in feed shape with zeroed counts.
    pub fn create_post(
        &self,
        owner_id: &str,
        owner_username: &str,
        image_path: &str,
        caption: Option<String>,
    ) -> DomainResult<FeedPostRecord> {
        let record = PostRecord {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            image_path: image_path.to_string(),
            caption,
            created_at: now_utc_iso(),
        };
        self.database.with_repositories(|repos| {
            if repos.users().get(owner_id)?.is_none() {
                return Err(DomainError::NotFound("User not found".into()));
            }
            repos.posts().create(&record)
        })?;

        Ok(FeedPostRecord {
            id: record.id,
            user_id: record.user_id,
            username: owner_username.to_string(),
            image_path: record.image_path,
            caption: record.caption,
            created_at: record.created_at,
            likes_count: 0,
            comments_count: 0,
            liked: false,
        })
    }
}
