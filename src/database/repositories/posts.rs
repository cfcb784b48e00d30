use crate::database::models::{FeedPostRecord, PostRecord};
use crate::error::DomainResult;
use rusqlite::{params, Connection, OptionalExtension};

pub(super) struct SqlitePostRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::PostRepository for SqlitePostRepository<'conn> {
    fn create(&self, record: &PostRecord) -> DomainResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO posts (id, user_id, image_path, caption, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.id,
                record.user_id,
                record.image_path,
                record.caption,
                record.created_at
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> DomainResult<Option<PostRecord>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, user_id, image_path, caption, created_at
                FROM posts
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(PostRecord {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        image_path: row.get(2)?,
                        caption: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?)
    }

    fn list_feed(
        &self,
        viewer_id: Option<&str>,
        owner_id: Option<&str>,
    ) -> DomainResult<Vec<FeedPostRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                p.id,
                p.user_id,
                u.username,
                p.image_path,
                p.caption,
                p.created_at,
                (SELECT COUNT(*) FROM likes WHERE post_id = p.id) AS likes_count,
                (SELECT COUNT(*) FROM comments WHERE post_id = p.id) AS comments_count,
                EXISTS(SELECT 1 FROM likes WHERE post_id = p.id AND user_id = ?1) AS liked
            FROM posts p
            INNER JOIN users u ON p.user_id = u.id
            WHERE ?2 IS NULL OR p.user_id = ?2
            ORDER BY datetime(p.created_at) DESC, p.rowid DESC
            "#,
        )?;
        let rows = stmt.query_map(params![viewer_id, owner_id], |row| {
            Ok(FeedPostRecord {
                id: row.get(0)?,
                user_id: row.get(1)?,
                username: row.get(2)?,
                image_path: row.get(3)?,
                caption: row.get(4)?,
                created_at: row.get(5)?,
                likes_count: row.get(6)?,
                comments_count: row.get(7)?,
                liked: row.get(8)?,
            })
        })?;
        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }
}
