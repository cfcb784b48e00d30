use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// bcrypt hash, never serialized out of the API layer.
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub user_id: String,
    pub image_path: String,
    pub caption: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub text: String,
    pub created_at: String,
}

/// A post joined with its owner's username and live engagement counts,
/// produced in a single read pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPostRecord {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub image_path: String,
    pub caption: Option<String>,
    pub created_at: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub liked: bool,
}
