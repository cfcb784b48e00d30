use crate::database::models::UserRecord;
use crate::database::repositories::UserRepository;
use crate::database::Database;
use crate::error::{DomainError, DomainResult};
use serde::Serialize;
use uuid::Uuid;

/// A user as returned to callers: id and username, never the hash.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
}

/// Credential store over the users table. Passwords are bcrypt-hashed on
/// write and compared on read; the plaintext is never persisted.
#[derive(Clone)]
pub struct CredentialService {
    database: Database,
}

impl CredentialService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn register(&self, username: &str, password: &str) -> DomainResult<AuthenticatedUser> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::Validation("Username is required".into()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("Password is required".into()));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|err| DomainError::Storage(anyhow::Error::new(err)))?;
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash,
        };
        self.database
            .with_repositories(|repos| repos.users().create(&record))?;

        tracing::info!(username = %record.username, "registered user");
        Ok(AuthenticatedUser {
            id: record.id,
            username: record.username,
        })
    }

    pub fn verify(&self, username: &str, password: &str) -> DomainResult<AuthenticatedUser> {
        let record = self
            .database
            .with_repositories(|repos| repos.users().get_by_username(username))?
            .ok_or_else(|| DomainError::NotFound("User not found".into()))?;

        let valid = bcrypt::verify(password, &record.password_hash)
            .map_err(|err| DomainError::Storage(anyhow::Error::new(err)))?;
        if !valid {
            return Err(DomainError::InvalidCredential);
        }

        Ok(AuthenticatedUser {
            id: record.id,
            username: record.username,
        })
    }
}
