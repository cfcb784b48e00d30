use crate::auth::AuthenticatedUser;
use crate::error::{DomainError, DomainResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Identity claims carried by every session token: just enough to resolve
/// the caller without a database read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub username: String,
}

/// Issues and verifies HMAC-signed session tokens.
///
/// Tokens carry no `exp` claim and there is no revocation list: a minted
/// token stays valid until the client discards it. Existing clients rely
/// on logins never expiring.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user: &AuthenticatedUser) -> DomainResult<String> {
        let claims = Claims {
            id: user.id.clone(),
            username: user.username.clone(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| DomainError::Storage(anyhow::Error::new(err)))
    }

    pub fn verify(&self, token: &str) -> DomainResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::InvalidToken)
    }
}
