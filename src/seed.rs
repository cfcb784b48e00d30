use crate::auth::CredentialService;
use crate::database::models::PostRecord;
use crate::database::repositories::{PostRepository, UserRepository};
use crate::database::Database;
use crate::error::DomainError;
use crate::utils::now_utc_iso;
use anyhow::Result;
use uuid::Uuid;

const DEMO_USERNAME: &str = "jasper";
const DEMO_PASSWORD: &str = "password123";

const SAMPLE_POSTS: &[(&str, &str)] = &[
    ("https://picsum.photos/800/800?random=1", "Beautiful sunset at the beach! 🌅"),
    ("https://picsum.photos/800/800?random=2", "City lights at night ✨"),
    ("https://picsum.photos/800/800?random=3", "Mountain view from my hike 🏔️"),
    ("https://picsum.photos/800/800?random=4", "Coffee and coding ☕"),
    ("https://picsum.photos/800/800?random=5", "New art exhibition 🎨"),
];

/// Seeds a demo account with sample posts. Safe to run repeatedly: an
/// existing demo user is reused and posts are only added once.
pub fn run(database: &Database) -> Result<()> {
    let credentials = CredentialService::new(database.clone());
    let demo_user_id = match credentials.register(DEMO_USERNAME, DEMO_PASSWORD) {
        Ok(user) => user.id,
        Err(DomainError::DuplicateUsername) => database
            .with_repositories(|repos| repos.users().get_by_username(DEMO_USERNAME))?
            .map(|user| user.id)
            .ok_or_else(|| anyhow::anyhow!("demo user vanished between insert and lookup"))?,
        Err(err) => return Err(err.into()),
    };

    let existing = database
        .with_repositories(|repos| repos.posts().list_feed(None, Some(&demo_user_id)))?;
    if !existing.is_empty() {
        tracing::info!(username = DEMO_USERNAME, "seed data already present");
        return Ok(());
    }

    database.with_repositories(|repos| {
        for (image_path, caption) in SAMPLE_POSTS {
            repos.posts().create(&PostRecord {
                id: Uuid::new_v4().to_string(),
                user_id: demo_user_id.clone(),
                image_path: (*image_path).to_string(),
                caption: Some((*caption).to_string()),
                created_at: now_utc_iso(),
            })?;
        }
        Ok(())
    })?;

    tracing::info!(
        username = DEMO_USERNAME,
        posts = SAMPLE_POSTS.len(),
        "seeded demo data"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn seeding_is_idempotent() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let db = Database::from_connection(conn, true);
        db.ensure_migrations().expect("migrations");

        run(&db).unwrap();
        run(&db).unwrap();

        let user = db
            .with_repositories(|repos| repos.users().get_by_username(DEMO_USERNAME))
            .unwrap()
            .expect("demo user");
        let posts = db
            .with_repositories(|repos| repos.posts().list_feed(None, Some(&user.id)))
            .unwrap();
        assert_eq!(posts.len(), SAMPLE_POSTS.len());
    }
}
