//! Registration, login, and bearer-token primitives.
//!
//! Passwords travel through [`zeroize::Zeroizing`] buffers and are stored
//! only as bcrypt hashes. Tokens are HS256-signed JWTs binding the user's id
//! and e-mail with a seven-day expiry.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::UserRepository;
use crate::domain::user::{EmailAddress, PublicUser, User};
use crate::domain::{DomainError, ErrorCode};

/// Login failures never reveal whether the e-mail or the password was wrong.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Claims embedded in issued bearer tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's identifier.
    pub sub: Uuid,
    /// The user's normalized e-mail at issue time.
    pub email: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    /// Token lifetime issued by registration and login.
    pub const DEFAULT_TTL_DAYS: i64 = 7;

    /// Create a signer with the default seven-day lifetime.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::days(Self::DEFAULT_TTL_DAYS))
    }

    /// Create a signer with an explicit lifetime.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a signed token binding the user's id and e-mail.
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| DomainError::internal(format!("failed to sign token: {err}")))
    }

    /// Verify a presented token, rejecting expired or tampered credentials.
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "bearer token rejected");
                DomainError::unauthorized("Invalid or expired token")
            })
    }
}

/// One-way password hashing with a configurable bcrypt work factor.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Default bcrypt cost, matching the deployment default.
    pub const DEFAULT_COST: u32 = 10;

    /// Create a hasher with the given work factor.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password.
    pub fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|err| DomainError::internal(format!("password hashing failed: {err}")))
    }

    /// Compare a plaintext password against a stored hash.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, DomainError> {
        bcrypt::verify(plaintext, hash)
            .map_err(|err| DomainError::internal(format!("password verification failed: {err}")))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

/// A sanitized user plus their freshly issued bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedSession {
    /// Sanitized user record.
    pub user: PublicUser,
    /// Signed bearer token.
    pub token: String,
}

/// Registration and login over the user repository.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    signer: TokenSigner,
}

impl AuthService {
    /// Create an auth service from its collaborators.
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher, signer: TokenSigner) -> Self {
        Self {
            users,
            hasher,
            signer,
        }
    }

    /// Register a new account, failing with a conflict when the normalized
    /// e-mail is already taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_request("Name must not be empty"));
        }
        let email = EmailAddress::parse(email)
            .map_err(|err| DomainError::invalid_request(err.to_string()))?;
        let password = Zeroizing::new(password.to_owned());
        if password.is_empty() {
            return Err(DomainError::invalid_request("Password must not be empty"));
        }

        if self.users.find_by_email(email.as_str()).await?.is_some() {
            return Err(DomainError::conflict("Email already exists"));
        }

        let password_hash = self.hasher.hash(&password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: email.into_string(),
            password_hash,
            age: None,
            weight: None,
            height: None,
            activity_level: None,
            goal: None,
            target_protein: None,
            target_carbs: None,
            target_fats: None,
            created_at: now,
            updated_at: now,
        };

        // A concurrent register with the same e-mail can slip past the
        // lookup; the unique index surfaces it as a conflict here.
        self.users.create(&user).await.map_err(|err| match err {
            crate::domain::ports::RepositoryError::Conflict { .. } => {
                DomainError::conflict("Email already exists")
            }
            other => DomainError::from(other),
        })?;

        let token = self.signer.issue(user.id, &user.email)?;
        Ok(AuthenticatedSession {
            user: user.to_public(),
            token,
        })
    }

    /// Authenticate an existing account. Unknown e-mail and wrong password
    /// produce the identical error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, DomainError> {
        let email = EmailAddress::parse(email)
            .map_err(|_| DomainError::unauthorized(INVALID_CREDENTIALS))?;
        let password = Zeroizing::new(password.to_owned());

        let user = self
            .users
            .find_by_email(email.as_str())
            .await?
            .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(&password, &user.password_hash)? {
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.signer.issue(user.id, &user.email)?;
        Ok(AuthenticatedSession {
            user: user.to_public(),
            token,
        })
    }
}
