use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::domain::entities::shared_file::SharedFile;
use crate::domain::repositories::shared_file_repository::{
    OwnerStats, SharedFileRepository, SharedFileRepositoryError, SharedFileRepositoryResult,
    SEARCH_RESULT_LIMIT,
};
use crate::domain::services::classification::FileCategory;

/// Códigos de SQLite para violación de unicidad (columna y clave primaria)
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";

const SELECT_COLUMNS: &str = r#"
    file_id, owner_id, original_name, stored_name, stored_path, public_url,
    size_bytes, mime_type, category, description, download_count,
    created_at, last_accessed_at
"#;

pub struct SharedFileSqliteRepository {
    pool: Arc<SqlitePool>,
}

impl SharedFileSqliteRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    // Método auxiliar para mapear errores SQL a errores de repositorio
    fn map_sqlx_error(err: sqlx::Error) -> SharedFileRepositoryError {
        match err {
            sqlx::Error::RowNotFound => {
                SharedFileRepositoryError::NotFound("file row not found".to_string())
            }
            sqlx::Error::Database(db_err) => {
                let unique_violation = db_err.code().map_or(false, |code| {
                    code == SQLITE_CONSTRAINT_UNIQUE || code == SQLITE_CONSTRAINT_PRIMARYKEY
                });
                if unique_violation {
                    SharedFileRepositoryError::AlreadyExists("file id already exists".to_string())
                } else {
                    SharedFileRepositoryError::DatabaseError(format!("database error: {}", db_err))
                }
            }
            _ => SharedFileRepositoryError::DatabaseError(format!("database error: {}", err)),
        }
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> SharedFile {
        let size_bytes: i64 = row.get("size_bytes");
        let download_count: i64 = row.get("download_count");
        let category: String = row.get("category");

        SharedFile::from_data(
            row.get("file_id"),
            row.get("owner_id"),
            row.get("original_name"),
            row.get("stored_name"),
            row.get("stored_path"),
            row.get("public_url"),
            size_bytes.max(0) as u64,
            row.get("mime_type"),
            FileCategory::from_tag(&category),
            row.get("description"),
            download_count.max(0) as u64,
            row.get("created_at"),
            row.get("last_accessed_at"),
        )
    }
}

#[async_trait]
impl SharedFileRepository for SharedFileSqliteRepository {
    async fn create_file(&self, file: SharedFile) -> SharedFileRepositoryResult<SharedFile> {
        sqlx::query(
            r#"
            INSERT INTO shared_files (
                file_id, owner_id, original_name, stored_name, stored_path,
                public_url, size_bytes, mime_type, category, description,
                download_count, created_at, last_accessed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(file.id())
        .bind(file.owner_id())
        .bind(file.original_name())
        .bind(file.stored_name())
        .bind(file.stored_path())
        .bind(file.public_url())
        .bind(file.size_bytes() as i64)
        .bind(file.mime_type())
        .bind(file.category().as_str())
        .bind(file.description())
        .bind(file.download_count() as i64)
        .bind(file.created_at())
        .bind(file.last_accessed_at())
        .execute(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(file)
    }

    async fn get_file_by_id(&self, id: &str) -> SharedFileRepositoryResult<Option<SharedFile>> {
        let query = format!(
            "SELECT {} FROM shared_files WHERE file_id = ?",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(Self::map_sqlx_error)?;

        Ok(row.as_ref().map(Self::map_row))
    }

    /// Lista paginada por propietario, más recientes primero; los empates
    /// de fecha se resuelven por orden de inserción (id autoincremental)
    async fn list_by_owner(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> SharedFileRepositoryResult<Vec<SharedFile>> {
        let query = format!(
            r#"
            SELECT {}
            FROM shared_files
            WHERE owner_id = ?
            ORDER BY created_at DESC, id ASC
            LIMIT ? OFFSET ?
            "#,
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&*self.pool)
            .await
            .map_err(Self::map_sqlx_error)?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    /// Búsqueda por subcadena sin distinguir mayúsculas sobre nombre,
    /// descripción y categoría, acotada al tope fijo
    async fn search_by_owner(
        &self,
        owner_id: &str,
        term: &str,
    ) -> SharedFileRepositoryResult<Vec<SharedFile>> {
        let pattern = format!("%{}%", term);
        let query = format!(
            r#"
            SELECT {}
            FROM shared_files
            WHERE owner_id = ?
              AND (original_name LIKE ? OR description LIKE ? OR category LIKE ?)
            ORDER BY created_at DESC, id ASC
            LIMIT ?
            "#,
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(owner_id)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(SEARCH_RESULT_LIMIT)
            .fetch_all(&*self.pool)
            .await
            .map_err(Self::map_sqlx_error)?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    async fn stats_by_owner(&self, owner_id: &str) -> SharedFileRepositoryResult<OwnerStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS file_count,
                COALESCE(SUM(size_bytes), 0) AS total_bytes,
                COALESCE(SUM(download_count), 0) AS total_downloads
            FROM shared_files
            WHERE owner_id = ?
            "#,
        )
        .bind(owner_id)
        .fetch_one(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        let file_count: i64 = row.get("file_count");
        let total_bytes: i64 = row.get("total_bytes");
        let total_downloads: i64 = row.get("total_downloads");

        Ok(OwnerStats {
            file_count: file_count.max(0) as u64,
            total_bytes: total_bytes.max(0) as u64,
            total_downloads: total_downloads.max(0) as u64,
        })
    }

    /// Incremento y marca de acceso en un único UPDATE; afecta 0 o 1 filas
    async fn increment_download(&self, file_id: &str) -> SharedFileRepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE shared_files
            SET download_count = download_count + 1,
                last_accessed_at = ?
            WHERE file_id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(file_id)
        .execute(&*self.pool)
        .await
        .map_err(Self::map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_file(&self, file_id: &str) -> SharedFileRepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM shared_files WHERE file_id = ?")
            .bind(file_id)
            .execute(&*self.pool)
            .await
            .map_err(Self::map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::db::create_memory_pool;
    use crate::domain::services::classification::category_of;
    use chrono::Duration;

    async fn repository() -> SharedFileSqliteRepository {
        let pool = create_memory_pool().await.unwrap();
        SharedFileSqliteRepository::new(Arc::new(pool))
    }

    /// Construye un archivo con marca de tiempo controlada para poder
    /// probar el orden de listado
    fn file_at(
        id: &str,
        owner: &str,
        name: &str,
        mime: &str,
        description: Option<&str>,
        size: u64,
        minutes_ago: i64,
    ) -> SharedFile {
        let created = Utc::now() - Duration::minutes(minutes_ago);
        SharedFile::from_data(
            id.to_string(),
            owner.to_string(),
            name.to_string(),
            format!("{}.bin", id),
            format!("shared/{}.bin", id),
            format!("/uploads/shared/{}.bin", id),
            size,
            mime.to_string(),
            category_of(mime),
            description.map(|d| d.to_string()),
            0,
            created,
            created,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let repo = repository().await;

        let file = file_at(
            "f-1",
            "alice",
            "Informe Anual.pdf",
            "application/pdf",
            Some("cierre de año"),
            2048,
            0,
        );
        repo.create_file(file.clone()).await.unwrap();

        let found = repo.get_file_by_id("f-1").await.unwrap().unwrap();
        assert_eq!(found.owner_id(), "alice");
        assert_eq!(found.original_name(), "Informe Anual.pdf");
        assert_eq!(found.stored_path(), "shared/f-1.bin");
        assert_eq!(found.size_bytes(), 2048);
        assert_eq!(found.category(), FileCategory::Pdf);
        assert_eq!(found.description(), Some("cierre de año"));
        assert_eq!(found.download_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_file_id_is_a_conflict() {
        let repo = repository().await;

        let file = file_at("f-1", "alice", "a.txt", "text/plain", None, 1, 0);
        repo.create_file(file.clone()).await.unwrap();

        let err = repo.create_file(file).await.unwrap_err();
        assert!(matches!(err, SharedFileRepositoryError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_stable_ties() {
        let repo = repository().await;

        // Dos con la misma marca y uno más reciente
        let tied = Utc::now() - Duration::minutes(10);
        for (id, created) in [
            ("f-old-a", tied),
            ("f-old-b", tied),
            ("f-new", Utc::now()),
        ] {
            let mut file = file_at(id, "alice", "a.txt", "text/plain", None, 0, 0);
            file = SharedFile::from_data(
                file.id().to_string(),
                file.owner_id().to_string(),
                file.original_name().to_string(),
                file.stored_name().to_string(),
                file.stored_path().to_string(),
                file.public_url().to_string(),
                file.size_bytes(),
                file.mime_type().to_string(),
                file.category(),
                None,
                0,
                created,
                created,
            );
            repo.create_file(file).await.unwrap();
        }

        let files = repo.list_by_owner("alice", 10, 0).await.unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.id()).collect();

        // Más reciente primero; el empate conserva el orden de inserción
        assert_eq!(ids, vec!["f-new", "f-old-a", "f-old-b"]);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let repo = repository().await;

        for i in 0..5 {
            let file = file_at(
                &format!("f-{}", i),
                "alice",
                "a.txt",
                "text/plain",
                None,
                1,
                10 - i,
            );
            repo.create_file(file).await.unwrap();
        }

        let page = repo.list_by_owner("alice", 2, 1).await.unwrap();
        assert_eq!(page.len(), 2);
        // f-4 es el más reciente; el offset 1 lo salta
        assert_eq!(page[0].id(), "f-3");
        assert_eq!(page[1].id(), "f-2");
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner() {
        let repo = repository().await;

        repo.create_file(file_at("f-a", "alice", "a.txt", "text/plain", None, 1, 1))
            .await
            .unwrap();
        repo.create_file(file_at("f-b", "bob", "b.txt", "text/plain", None, 1, 1))
            .await
            .unwrap();

        let files = repo.list_by_owner("alice", 10, 0).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id(), "f-a");
    }

    #[tokio::test]
    async fn test_search_matches_name_description_and_category() {
        let repo = repository().await;

        repo.create_file(file_at(
            "f-1",
            "alice",
            "REPORT-final.pdf",
            "application/pdf",
            None,
            1,
            3,
        ))
        .await
        .unwrap();
        repo.create_file(file_at(
            "f-2",
            "alice",
            "vacaciones.jpg",
            "image/jpeg",
            Some("weekly report shots"),
            1,
            2,
        ))
        .await
        .unwrap();
        repo.create_file(file_at(
            "f-3",
            "alice",
            "cancion.mp3",
            "audio/mpeg",
            None,
            1,
            1,
        ))
        .await
        .unwrap();
        // Mismo término en otro propietario: fuera del alcance
        repo.create_file(file_at(
            "f-4",
            "bob",
            "report.pdf",
            "application/pdf",
            None,
            1,
            1,
        ))
        .await
        .unwrap();

        let by_term = repo.search_by_owner("alice", "report").await.unwrap();
        let ids: Vec<&str> = by_term.iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["f-2", "f-1"]);

        // La categoría también es buscable
        let by_category = repo.search_by_owner("alice", "audio").await.unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].id(), "f-3");
    }

    #[tokio::test]
    async fn test_search_is_hard_capped() {
        let repo = repository().await;

        for i in 0..25 {
            repo.create_file(file_at(
                &format!("f-{}", i),
                "alice",
                &format!("report-{}.txt", i),
                "text/plain",
                None,
                1,
                30 - i,
            ))
            .await
            .unwrap();
        }

        let results = repo.search_by_owner("alice", "report").await.unwrap();
        assert_eq!(results.len(), SEARCH_RESULT_LIMIT as usize);
        // Y dentro del tope, siguen saliendo los más recientes
        assert_eq!(results[0].id(), "f-24");
    }

    #[tokio::test]
    async fn test_stats_are_zero_for_unknown_owner() {
        let repo = repository().await;

        let stats = repo.stats_by_owner("nobody").await.unwrap();
        assert_eq!(stats, OwnerStats::default());
    }

    #[tokio::test]
    async fn test_stats_aggregate_sizes_and_downloads() {
        let repo = repository().await;

        repo.create_file(file_at("f-1", "alice", "a.txt", "text/plain", None, 100, 2))
            .await
            .unwrap();
        repo.create_file(file_at("f-2", "alice", "b.txt", "text/plain", None, 250, 1))
            .await
            .unwrap();

        repo.increment_download("f-1").await.unwrap();
        repo.increment_download("f-1").await.unwrap();
        repo.increment_download("f-2").await.unwrap();

        let stats = repo.stats_by_owner("alice").await.unwrap();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_bytes, 350);
        assert_eq!(stats.total_downloads, 3);
    }

    #[tokio::test]
    async fn test_increment_download_is_monotonic() {
        let repo = repository().await;

        repo.create_file(file_at("f-1", "alice", "a.txt", "text/plain", None, 1, 5))
            .await
            .unwrap();

        let mut last_access = repo
            .get_file_by_id("f-1")
            .await
            .unwrap()
            .unwrap()
            .last_accessed_at();

        for expected in 1..=3u64 {
            assert!(repo.increment_download("f-1").await.unwrap());

            let file = repo.get_file_by_id("f-1").await.unwrap().unwrap();
            assert_eq!(file.download_count(), expected);
            assert!(file.last_accessed_at() >= last_access);
            last_access = file.last_accessed_at();
        }
    }

    #[tokio::test]
    async fn test_increment_download_without_row_affects_nothing() {
        let repo = repository().await;
        assert!(!repo.increment_download("no-such-id").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_reports_affected_rows() {
        let repo = repository().await;

        repo.create_file(file_at("f-1", "alice", "a.txt", "text/plain", None, 1, 1))
            .await
            .unwrap();

        // Primer borrado elimina la fila; el segundo no afecta a ninguna
        assert!(repo.delete_file("f-1").await.unwrap());
        assert!(!repo.delete_file("f-1").await.unwrap());
        assert!(repo.get_file_by_id("f-1").await.unwrap().is_none());
    }
}
