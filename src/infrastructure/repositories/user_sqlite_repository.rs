use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::user::User;
use crate::domain::repositories::user_repository::{
    UserRepository, UserRepositoryError, UserRepositoryResult,
};

/// Códigos de SQLite para violación de unicidad (columna y clave primaria)
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";

pub struct UserSqliteRepository {
    pool: Arc<SqlitePool>,
}

impl UserSqliteRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    // Método auxiliar para mapear errores SQL a errores de repositorio
    fn map_sqlx_error(err: sqlx::Error) -> UserRepositoryError {
        match err {
            sqlx::Error::RowNotFound => {
                UserRepositoryError::NotFound("user row not found".to_string())
            }
            sqlx::Error::Database(db_err) => {
                let unique_violation = db_err.code().map_or(false, |code| {
                    code == SQLITE_CONSTRAINT_UNIQUE || code == SQLITE_CONSTRAINT_PRIMARYKEY
                });
                if unique_violation {
                    UserRepositoryError::AlreadyExists("user id already exists".to_string())
                } else {
                    UserRepositoryError::DatabaseError(format!("database error: {}", db_err))
                }
            }
            _ => UserRepositoryError::DatabaseError(format!("database error: {}", err)),
        }
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> User {
        User::from_data(
            row.get("user_id"),
            row.get("username"),
            row.get("email"),
            row.get("profile_picture_path"),
            row.get("profile_picture_url"),
            row.get("created_at"),
            row.get("updated_at"),
        )
    }
}

#[async_trait]
impl UserRepository for UserSqliteRepository {
    /// Inserta o reemplaza la fila completa del usuario.
    ///
    /// El reemplazo no fusiona nada: los campos de foto llegan ya
    /// arrastrados por el llamante. `created_at` se conserva en el
    /// conflicto para no perder la fecha de alta original.
    async fn upsert_user(&self, user: User) -> UserRepositoryResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, username, email,
                profile_picture_path, profile_picture_url,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                email = excluded.email,
                profile_picture_path = excluded.profile_picture_path,
                profile_picture_url = excluded.profile_picture_url,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user.id())
        .bind(user.username())
        .bind(user.email())
        .bind(user.profile_picture_path())
        .bind(user.profile_picture_url())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(user)
    }

    /// Obtiene un usuario por su identificador
    async fn get_user_by_id(&self, id: &str) -> UserRepositoryResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT
                user_id, username, email,
                profile_picture_path, profile_picture_url,
                created_at, updated_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(row.as_ref().map(Self::map_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::db::create_memory_pool;

    async fn repository() -> UserSqliteRepository {
        let pool = create_memory_pool().await.unwrap();
        UserSqliteRepository::new(Arc::new(pool))
    }

    #[tokio::test]
    async fn test_upsert_inserts_and_reads_back() {
        let repo = repository().await;

        let user = User::new(
            "alice".to_string(),
            Some("Alice".to_string()),
            Some("alice@example.com".to_string()),
        )
        .unwrap();
        repo.upsert_user(user).await.unwrap();

        let found = repo.get_user_by_id("alice").await.unwrap().unwrap();
        assert_eq!(found.id(), "alice");
        assert_eq!(found.username(), Some("Alice"));
        assert_eq!(found.email(), Some("alice@example.com"));
        assert!(!found.has_profile_picture());
    }

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        let repo = repository().await;
        assert!(repo.get_user_by_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let repo = repository().await;

        let user = User::new("alice".to_string(), Some("Alice".to_string()), None).unwrap();
        repo.upsert_user(user.clone()).await.unwrap();

        let replacement = user.with_profile(
            Some("Alice L.".to_string()),
            Some("alice@example.com".to_string()),
        );
        repo.upsert_user(replacement).await.unwrap();

        let found = repo.get_user_by_id("alice").await.unwrap().unwrap();
        assert_eq!(found.username(), Some("Alice L."));
        assert_eq!(found.email(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_picture_fields_round_trip_through_upsert() {
        let repo = repository().await;

        let user = User::new("alice".to_string(), None, None)
            .unwrap()
            .with_profile_picture(
                "profiles/a.png".to_string(),
                "/uploads/profiles/a.png".to_string(),
            )
            .unwrap();
        repo.upsert_user(user.clone()).await.unwrap();

        // Un reemplazo que arrastra los campos de foto los conserva
        let synced = user.with_profile(Some("Alice".to_string()), None);
        repo.upsert_user(synced).await.unwrap();

        let found = repo.get_user_by_id("alice").await.unwrap().unwrap();
        assert_eq!(found.profile_picture_path(), "profiles/a.png");
        assert_eq!(found.profile_picture_url(), "/uploads/profiles/a.png");
        assert_eq!(found.username(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_upsert_clears_picture_fields_together() {
        let repo = repository().await;

        let user = User::new("alice".to_string(), None, None)
            .unwrap()
            .with_profile_picture(
                "profiles/a.png".to_string(),
                "/uploads/profiles/a.png".to_string(),
            )
            .unwrap();
        repo.upsert_user(user.clone()).await.unwrap();

        repo.upsert_user(user.without_profile_picture()).await.unwrap();

        let found = repo.get_user_by_id("alice").await.unwrap().unwrap();
        assert_eq!(found.profile_picture_path(), "");
        assert_eq!(found.profile_picture_url(), "");
    }
}
