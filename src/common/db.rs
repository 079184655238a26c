use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use anyhow::{Context, Result};

use crate::common::config::AppConfig;

/// Sentencias de esquema; se ejecutan una a una porque SQLite prepara
/// una única sentencia por consulta.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id TEXT PRIMARY KEY,
        username TEXT,
        email TEXT,
        profile_picture_path TEXT NOT NULL DEFAULT '',
        profile_picture_url TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shared_files (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_id TEXT NOT NULL UNIQUE,
        owner_id TEXT NOT NULL,
        original_name TEXT NOT NULL,
        stored_name TEXT NOT NULL,
        stored_path TEXT NOT NULL,
        public_url TEXT NOT NULL,
        size_bytes INTEGER NOT NULL,
        mime_type TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT,
        download_count INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        last_accessed_at TEXT NOT NULL
    )
    "#,
    // file_id ya tiene índice implícito por la restricción UNIQUE
    "CREATE INDEX IF NOT EXISTS idx_shared_files_owner_id ON shared_files(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_shared_files_created_at ON shared_files(created_at)",
];

/// Crea el pool de SQLite y arranca el esquema de metadatos.
///
/// Falla inmediatamente si la ubicación de la base de datos no es escribible;
/// el aprovisionamiento del directorio es responsabilidad del host.
pub async fn create_database_pool(config: &AppConfig) -> Result<SqlitePool> {
    tracing::info!(
        "Inicializando base de datos SQLite en {}",
        config.database_path.display()
    );

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("database directory is not writable: {}", parent.display())
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.connect_timeout())
        .connect_with(options)
        .await
        .context("failed to open metadata database")?;

    init_schema(&pool).await?;

    tracing::info!("Esquema de metadatos listo");
    Ok(pool)
}

/// Crea un pool efímero en memoria (tests y herramientas).
///
/// Una sola conexión: cada conexión de SQLite en memoria ve una base de
/// datos distinta, así que el pool no puede crecer.
pub async fn create_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .context("failed to open in-memory database")?;

    init_schema(&pool).await?;
    Ok(pool)
}

async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("failed to initialize metadata schema")?;
    }
    Ok(())
}
