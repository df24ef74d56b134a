//! Authentication: registration, login and bearer-token resolution.
//!
//! Passwords are hashed with Argon2id. Access tokens are opaque random
//! strings stored server-side with an expiry.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ErrorCode, LearnSyncError, LearnSyncResult};
use crate::store::SqliteStore;
use crate::types::{Language, NewUser, Token, User};

const INVALID_LOGIN: &str = "Incorrect username or password";

/// Issues and verifies access tokens over the user store.
#[derive(Clone)]
pub struct Authenticator {
    store: SqliteStore,
    session_ttl: Duration,
}

impl Authenticator {
    pub fn new(store: SqliteStore, session_ttl_hours: i64) -> Self {
        Self {
            store,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    /// Register a new user. Preferred language defaults to Arabic.
    pub async fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
        preferred_language: Option<Language>,
    ) -> LearnSyncResult<User> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(LearnSyncError::validation("A valid email address is required"));
        }
        if password.is_empty() {
            return Err(LearnSyncError::missing_field("password"));
        }

        let password_hash = hash_password(password.to_string()).await?;
        let user = self.store.create_user(&NewUser {
            email: email.to_string(),
            full_name: full_name.to_string(),
            password_hash,
            preferred_language: preferred_language.unwrap_or(Language::Ar),
        })?;

        info!(user_id = user.id, "Registered user");
        Ok(user)
    }

    /// Exchange email and password for a bearer token.
    ///
    /// Unknown email and wrong password fail with the same message.
    pub async fn login(&self, email: &str, password: &str) -> LearnSyncResult<Token> {
        let (user, hash) = self
            .store
            .get_user_credentials(email.trim())?
            .ok_or_else(|| LearnSyncError::authentication(INVALID_LOGIN))?;

        if !verify_password(password.to_string(), hash).await? {
            return Err(LearnSyncError::authentication(INVALID_LOGIN));
        }
        if !user.is_active {
            return Err(inactive_user());
        }

        let token = Uuid::new_v4().simple().to_string();
        self.store
            .create_session(&token, user.id, Utc::now() + self.session_ttl)?;

        debug!(user_id = user.id, "Issued access token");
        Ok(Token::bearer(token))
    }

    /// Resolve a bearer token to the id of an active user.
    pub fn authenticate(&self, token: &str) -> LearnSyncResult<i64> {
        Ok(self.current_user(token)?.id)
    }

    /// Resolve a bearer token to an active user.
    pub fn current_user(&self, token: &str) -> LearnSyncResult<User> {
        let (user_id, expires_at) = self
            .store
            .get_session(token)?
            .ok_or_else(LearnSyncError::invalid_token)?;

        if expires_at <= Utc::now() {
            return Err(LearnSyncError::invalid_token());
        }

        let user = self
            .store
            .get_user(user_id)?
            .ok_or_else(LearnSyncError::invalid_token)?;
        if !user.is_active {
            return Err(inactive_user());
        }
        Ok(user)
    }
}

fn inactive_user() -> LearnSyncError {
    LearnSyncError::Authentication {
        message: "Inactive user".to_string(),
        code: ErrorCode::AuthInactiveUser,
    }
}

async fn hash_password(password: String) -> LearnSyncResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| LearnSyncError::Internal(format!("Password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| LearnSyncError::Internal(e.to_string()))?
}

async fn verify_password(password: String, hash: String) -> LearnSyncResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| LearnSyncError::Internal(format!("Invalid password hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(LearnSyncError::Internal(e.to_string())),
        }
    })
    .await
    .map_err(|e| LearnSyncError::Internal(e.to_string()))?
}
