//! Session store operations
//!
//! Sessions are only ever created by a successful login and removed by an
//! explicit logout. Nothing here mutates a session in place.

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::Session;
use crate::repository::Database;

impl Database {
    /// Insert a new session binding a token to a username.
    ///
    /// Token collisions are not expected in practice, but the UNIQUE
    /// constraint on the token column enforces the invariant regardless
    /// and surfaces as `Duplicate`.
    pub async fn insert_session(&self, username: &str, token: &str) -> Result<Session, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO sessions (username, token, login_time)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(token)
        .bind(now.to_rfc3339())
        .fetch_one(self.pool())
        .await
        .map_err(|e| DbError::on_insert(e, "Session token already exists".to_string()))?;

        let id: i64 = result.get("id");

        Ok(Session {
            id,
            username: username.to_string(),
            token: token.to_string(),
            login_time: now,
        })
    }

    /// Get a session by token
    pub async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, token, login_time
            FROM sessions
            WHERE token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool())
        .await?;

        result
            .map(|row| Session::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Delete a session by token, returning the number of rows removed (0 or 1)
    pub async fn delete_session_by_token(&self, token: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let db = Database::new_in_memory().await.unwrap();

        let session = db.insert_session("admin", "tok-1").await.unwrap();
        assert_eq!(session.username, "admin");

        let found = db.get_session_by_token("tok-1").await.unwrap().unwrap();
        assert_eq!(found.username, "admin");
        assert_eq!(found.token, "tok-1");

        assert_eq!(db.delete_session_by_token("tok-1").await.unwrap(), 1);
        assert!(db.get_session_by_token("tok-1").await.unwrap().is_none());

        // Second delete removes nothing
        assert_eq!(db.delete_session_by_token("tok-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_token_rejected() {
        let db = Database::new_in_memory().await.unwrap();

        db.insert_session("admin", "tok-1").await.unwrap();
        let err = db.insert_session("superadmin", "tok-1").await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_one_user_many_sessions() {
        let db = Database::new_in_memory().await.unwrap();

        db.insert_session("admin", "tok-1").await.unwrap();
        db.insert_session("admin", "tok-2").await.unwrap();

        // Each session is independently revocable
        assert_eq!(db.delete_session_by_token("tok-1").await.unwrap(), 1);
        assert!(db.get_session_by_token("tok-2").await.unwrap().is_some());
    }
}
