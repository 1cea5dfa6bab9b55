//! Administrator credential operations

use chrono::Utc;
use sqlx::Row;
use tracing::info;

use crate::error::DbError;
use crate::models::{Administrator, NewAdministrator};
use crate::repository::Database;

impl Database {
    /// Insert a new administrator
    ///
    /// Uniqueness is enforced by the UNIQUE column constraint rather than
    /// a separate existence check, so a concurrent insert for the same
    /// username cannot race past it.
    pub async fn insert_administrator(
        &self,
        admin: NewAdministrator,
    ) -> Result<Administrator, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO administrators (username, salt, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&admin.username)
        .bind(&admin.salt)
        .bind(&admin.password_hash)
        .bind(now.to_rfc3339())
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            DbError::on_insert(e, format!("Administrator '{}' already exists", admin.username))
        })?;

        let id: i64 = result.get("id");

        Ok(Administrator {
            id,
            username: admin.username,
            salt: admin.salt,
            password_hash: admin.password_hash,
            created_at: now,
        })
    }

    /// Get an administrator by username
    pub async fn get_administrator_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Administrator>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, salt, password_hash, created_at
            FROM administrators
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        result
            .map(|row| Administrator::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Check if any administrators exist
    pub async fn has_administrators(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM administrators")
            .fetch_one(self.pool())
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }

    /// Seed bootstrap administrators from precomputed credentials.
    ///
    /// Idempotent: `INSERT OR IGNORE` leaves existing usernames untouched,
    /// so re-running at every startup neither duplicates nor errors.
    pub async fn seed_administrators(
        &self,
        fixtures: &[(&str, &str, &str)],
    ) -> Result<(), DbError> {
        for (username, salt, password_hash) in fixtures {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO administrators (username, salt, password_hash, created_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(username)
            .bind(salt)
            .bind(password_hash)
            .bind(Utc::now().to_rfc3339())
            .execute(self.pool())
            .await?;
        }

        info!("Seeded {} bootstrap administrator(s)", fixtures.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_admin(username: &str) -> NewAdministrator {
        NewAdministrator {
            username: username.to_string(),
            salt: "salt123".to_string(),
            password_hash: "digest".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::new_in_memory().await.unwrap();

        let created = db.insert_administrator(new_admin("admin")).await.unwrap();
        assert_eq!(created.username, "admin");

        let found = db
            .get_administrator_by_username("admin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.salt, "salt123");

        assert!(db.get_administrator_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::new_in_memory().await.unwrap();

        db.insert_administrator(new_admin("admin")).await.unwrap();

        let mut second = new_admin("admin");
        second.password_hash = "other".to_string();
        let err = db.insert_administrator(second).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));

        // Storage retains only the first registration
        let found = db
            .get_administrator_by_username("admin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.password_hash, "digest");
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::new_in_memory().await.unwrap();
        let fixtures = [("admin", "salt123", "hash1"), ("superadmin", "salt456", "hash2")];

        db.seed_administrators(&fixtures).await.unwrap();
        db.seed_administrators(&fixtures).await.unwrap();

        assert!(db.has_administrators().await.unwrap());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM administrators")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
