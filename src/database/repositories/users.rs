use crate::database::models::UserRecord;
use crate::error::{DomainError, DomainResult};
use rusqlite::{params, Connection, OptionalExtension};

pub(super) struct SqliteUserRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> super::UserRepository for SqliteUserRepository<'conn> {
    fn create(&self, record: &UserRecord) -> DomainResult<()> {
        let result = self.conn.execute(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES (?1, ?2, ?3)
            "#,
            params![record.id, record.username, record.password_hash],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(DomainError::DuplicateUsername)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get(&self, id: &str) -> DomainResult<Option<UserRecord>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, username, password_hash
                FROM users
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }

    fn get_by_username(&self, username: &str) -> DomainResult<Option<UserRecord>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, username, password_hash
                FROM users
                WHERE username = ?1
                "#,
                params![username],
                |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }
}
