use crate::database::models::CommentRecord;
use crate::error::{DomainError, DomainResult};
use rusqlite::{params, Connection};
use uuid::Uuid;

pub(super) struct SqliteEngagementRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::EngagementRepository for SqliteEngagementRepository<'conn> {
    fn toggle_like(&self, user_id: &str, post_id: &str) -> DomainResult<()> {
        // Delete-first flip inside one transaction. The UNIQUE(user_id,
        // post_id) constraint plus OR IGNORE keeps concurrent toggles from
        // ever inserting a duplicate pair.
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            r#"
            DELETE FROM likes
            WHERE user_id = ?1 AND post_id = ?2
            "#,
            params![user_id, post_id],
        )?;
        if removed == 0 {
            tx.execute(
                r#"
                INSERT OR IGNORE INTO likes (id, user_id, post_id)
                VALUES (?1, ?2, ?3)
                "#,
                params![Uuid::new_v4().to_string(), user_id, post_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn count_likes(&self, post_id: &str) -> DomainResult<i64> {
        let count: i64 = self.conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM likes
            WHERE post_id = ?1
            "#,
            params![post_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn has_liked(&self, user_id: &str, post_id: &str) -> DomainResult<bool> {
        let exists: bool = self.conn.query_row(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = ?1 AND post_id = ?2
            )
            "#,
            params![user_id, post_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn add_comment(&self, record: &CommentRecord) -> DomainResult<()> {
        if record.text.trim().is_empty() {
            return Err(DomainError::Validation("Comment text is required".into()));
        }
        self.conn.execute(
            r#"
            INSERT INTO comments (id, user_id, post_id, text, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.id,
                record.user_id,
                record.post_id,
                record.text,
                record.created_at
            ],
        )?;
        Ok(())
    }

    fn count_comments(&self, post_id: &str) -> DomainResult<i64> {
        let count: i64 = self.conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM comments
            WHERE post_id = ?1
            "#,
            params![post_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_comments(&self, post_id: &str) -> DomainResult<Vec<(CommentRecord, String)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT c.id, c.user_id, c.post_id, c.text, c.created_at, u.username
            FROM comments c
            INNER JOIN users u ON c.user_id = u.id
            WHERE c.post_id = ?1
            ORDER BY datetime(c.created_at) DESC, c.rowid DESC
            "#,
        )?;
        let rows = stmt.query_map(params![post_id], |row| {
            Ok((
                CommentRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    post_id: row.get(2)?,
                    text: row.get(3)?,
                    created_at: row.get(4)?,
                },
                row.get::<_, String>(5)?,
            ))
        })?;
        let mut comments = Vec::new();
        for row in rows {
            comments.push(row?);
        }
        Ok(comments)
    }
}
