//! User and session rows.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{is_constraint_violation, parse_text, SqliteStore};
use crate::error::{LearnSyncError, LearnSyncResult};
use crate::types::{NewUser, User};

const USER_COLUMNS: &str = "id, email, full_name, is_active, preferred_language";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let language: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        is_active: row.get::<_, i64>(3)? != 0,
        preferred_language: parse_text(4, &language)?,
    })
}

fn parse_unix_seconds(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

impl SqliteStore {
    /// Insert a user. Duplicate emails (case-insensitive) are a conflict.
    pub fn create_user(&self, user: &NewUser) -> LearnSyncResult<User> {
        let conn = self.conn()?;
        let language: &'static str = user.preferred_language.into();

        conn.execute(
            "INSERT INTO users (email, full_name, hashed_password, is_active, preferred_language, created_at)
             VALUES (?1, ?2, ?3, 1, ?4, ?5)",
            params![
                user.email,
                user.full_name,
                user.password_hash,
                language,
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                LearnSyncError::conflict("Email already registered")
            } else {
                e.into()
            }
        })?;

        Ok(User {
            id: conn.last_insert_rowid(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: true,
            preferred_language: user.preferred_language,
        })
    }

    /// Get a user by id.
    pub fn get_user(&self, id: i64) -> LearnSyncResult<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user and their password hash by email (case-insensitive).
    pub fn get_user_credentials(&self, email: &str) -> LearnSyncResult<Option<(User, String)>> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                &format!(
                    "SELECT {}, hashed_password FROM users WHERE email = ?1",
                    USER_COLUMNS
                ),
                params![email],
                |row| Ok((row_to_user(row)?, row.get::<_, String>(5)?)),
            )
            .optional()?;
        Ok(found)
    }

    /// Mark a user active or inactive.
    pub fn set_user_active(&self, id: i64, active: bool) -> LearnSyncResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE users SET is_active = ?1 WHERE id = ?2",
            params![active as i64, id],
        )?;
        if changed == 0 {
            return Err(LearnSyncError::user_not_found());
        }
        Ok(())
    }

    /// Record an issued access token.
    pub fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> LearnSyncResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                token,
                user_id,
                expires_at.timestamp(),
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Resolve a token to its user id and expiry.
    pub fn get_session(&self, token: &str) -> LearnSyncResult<Option<(i64, DateTime<Utc>)>> {
        let conn = self.conn()?;
        let session = conn
            .query_row(
                "SELECT user_id, expires_at FROM sessions WHERE token = ?1",
                params![token],
                |row| {
                    let expires_at: i64 = row.get(1)?;
                    Ok((row.get(0)?, parse_unix_seconds(1, expires_at)?))
                },
            )
            .optional()?;
        Ok(session)
    }

    /// Delete sessions that expired before `now`. Returns how many were removed.
    pub fn delete_expired_sessions(&self, now: DateTime<Utc>) -> LearnSyncResult<usize> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM sessions WHERE expires_at < ?1",
            params![now.timestamp()],
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;
    use chrono::Duration;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            password_hash: "hash".to_string(),
            preferred_language: Language::Ar,
        }
    }

    #[test]
    fn test_create_and_lookup_user() {
        let store = SqliteStore::in_memory().unwrap();
        let user = store.create_user(&new_user("a@example.com")).unwrap();

        assert_eq!(store.get_user(user.id).unwrap().unwrap(), user);
        let (found, hash) = store
            .get_user_credentials("A@Example.com")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(hash, "hash");
        assert_eq!(found.preferred_language, Language::Ar);
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let store = SqliteStore::in_memory().unwrap();
        store.create_user(&new_user("a@example.com")).unwrap();
        let err = store.create_user(&new_user("A@EXAMPLE.COM")).unwrap_err();
        assert!(matches!(err, LearnSyncError::Conflict { .. }));
    }

    #[test]
    fn test_sessions() {
        let store = SqliteStore::in_memory().unwrap();
        let user = store.create_user(&new_user("a@example.com")).unwrap();
        let now = Utc::now();

        store
            .create_session("live", user.id, now + Duration::hours(1))
            .unwrap();
        store
            .create_session("stale", user.id, now - Duration::hours(1))
            .unwrap();

        assert_eq!(store.get_session("live").unwrap().unwrap().0, user.id);
        assert!(store.get_session("missing").unwrap().is_none());
        assert_eq!(store.delete_expired_sessions(now).unwrap(), 1);
        assert!(store.get_session("stale").unwrap().is_none());
    }
}
