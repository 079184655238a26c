use std::path::PathBuf;
use std::time::Duration;

/// Configuración de la base de datos de metadatos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Máximo de conexiones del pool
    pub max_connections: u32,
    /// Timeout de adquisición de conexión (segundos)
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            connect_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Obtiene un Duration para la adquisición de conexiones
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Configuración global de la aplicación
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directorio raíz para los blobs (contiene los buckets profiles/ y shared/)
    pub storage_path: PathBuf,
    /// Ruta del fichero SQLite de metadatos
    pub database_path: PathBuf,
    /// Prefijo público bajo el que el host sirve los blobs
    pub public_base_url: String,
    /// Configuración de la base de datos
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./storage"),
            database_path: PathBuf::from("./storage/oxishare.db"),
            public_base_url: "/uploads".to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno, con valores por defecto
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let storage_path = std::env::var("OXISHARE_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);

        let database_path = std::env::var("OXISHARE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| storage_path.join("oxishare.db"));

        let public_base_url = std::env::var("OXISHARE_PUBLIC_BASE_URL")
            .unwrap_or(defaults.public_base_url);

        Self {
            storage_path,
            database_path,
            public_base_url,
            database: DatabaseConfig::default(),
        }
    }

    /// Construye la URL pública para una ruta relativa de blob ("bucket/nombre")
    pub fn public_url_for(&self, relative_path: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            relative_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_for_joins_without_double_slash() {
        let config = AppConfig {
            public_base_url: "/uploads/".to_string(),
            ..AppConfig::default()
        };

        assert_eq!(
            config.public_url_for("shared/abc.png"),
            "/uploads/shared/abc.png"
        );
    }

    #[test]
    fn test_default_database_lives_under_storage() {
        let config = AppConfig::default();
        assert!(config.database_path.starts_with(&config.storage_path));
    }
}
