use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

use crate::domain::services::classification::{category_of, FileCategory};

/// Error en la creación o manipulación de archivos compartidos
#[derive(Debug, thiserror::Error)]
pub enum SharedFileError {
    #[error("Propietario ausente: {0}")]
    MissingOwner(String),

    #[error("Nombre de archivo inválido: {0}")]
    InvalidFileName(String),
}

/// Tipo de resultado para operaciones con la entidad
pub type SharedFileResult<T> = Result<T, SharedFileError>;

/// Representa un archivo compartido: la fila de metadatos que acompaña a un
/// blob en disco.
///
/// `stored_name`, `stored_path` y `public_url` se derivan una vez en la
/// creación y son inmutables; `original_name` es opaco y jamás se usa para
/// acceder al sistema de archivos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharedFile {
    /// Identificador opaco, clave de todas las operaciones
    id: String,

    /// Identidad del propietario, aportada por el llamante
    owner_id: String,

    /// Nombre con el que se subió (puede contener caracteres arbitrarios)
    original_name: String,

    /// Nombre en disco derivado del identificador
    stored_name: String,

    /// Ruta relativa dentro del root de blobs ("shared/<stored_name>")
    stored_path: String,

    /// URL pública bajo la que el host sirve el blob
    public_url: String,

    /// Tamaño en bytes; igual a la longitud del blob persistido
    size_bytes: u64,

    /// Tipo MIME declarado por el llamante, sin verificar contenido
    mime_type: String,

    /// Categoría derivada del MIME en la creación
    category: FileCategory,

    /// Descripción opcional
    description: Option<String>,

    /// Contador de descargas, monótono no decreciente
    download_count: u64,

    created_at: DateTime<Utc>,

    /// Última descarga correcta
    last_accessed_at: DateTime<Utc>,
}

impl SharedFile {
    /// Crea un nuevo archivo compartido con validación.
    ///
    /// La categoría se deriva aquí del MIME declarado y no vuelve a
    /// recalcularse durante la vida de la fila.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        owner_id: String,
        original_name: String,
        stored_name: String,
        stored_path: String,
        public_url: String,
        size_bytes: u64,
        mime_type: String,
        description: Option<String>,
    ) -> SharedFileResult<Self> {
        if owner_id.trim().is_empty() {
            return Err(SharedFileError::MissingOwner(id));
        }

        if original_name.is_empty() {
            return Err(SharedFileError::InvalidFileName(
                "el nombre original no puede estar vacío".to_string(),
            ));
        }

        let category = category_of(&mime_type);
        let now = Utc::now();

        Ok(Self {
            id,
            owner_id,
            original_name,
            stored_name,
            stored_path,
            public_url,
            size_bytes,
            mime_type,
            category,
            description,
            download_count: 0,
            created_at: now,
            last_accessed_at: now,
        })
    }

    /// Reconstruye la entidad desde valores persistidos
    #[allow(clippy::too_many_arguments)]
    pub fn from_data(
        id: String,
        owner_id: String,
        original_name: String,
        stored_name: String,
        stored_path: String,
        public_url: String,
        size_bytes: u64,
        mime_type: String,
        category: FileCategory,
        description: Option<String>,
        download_count: u64,
        created_at: DateTime<Utc>,
        last_accessed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            original_name,
            stored_name,
            stored_path,
            public_url,
            size_bytes,
            mime_type,
            category,
            description,
            download_count,
            created_at,
            last_accessed_at,
        }
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }

    pub fn stored_path(&self) -> &str {
        &self.stored_path
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn category(&self) -> FileCategory {
        self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn download_count(&self) -> u64 {
        self.download_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }

    /// Comprueba si el llamante es el propietario
    pub fn is_owned_by(&self, caller_id: &str) -> bool {
        self.owner_id == caller_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_file(owner: &str, mime: &str) -> SharedFileResult<SharedFile> {
        SharedFile::new(
            "f-1".to_string(),
            owner.to_string(),
            "informe.pdf".to_string(),
            "f-1.pdf".to_string(),
            "shared/f-1.pdf".to_string(),
            "/uploads/shared/f-1.pdf".to_string(),
            2048,
            mime.to_string(),
            Some("informe trimestral".to_string()),
        )
    }

    #[test]
    fn test_creation_derives_category() {
        let file = build_file("alice", "application/pdf").unwrap();
        assert_eq!(file.category(), FileCategory::Pdf);
        assert_eq!(file.download_count(), 0);
        assert_eq!(file.size_bytes(), 2048);
    }

    #[test]
    fn test_creation_rejects_missing_owner() {
        let file = build_file("  ", "application/pdf");
        assert!(matches!(file, Err(SharedFileError::MissingOwner(_))));
    }

    #[test]
    fn test_creation_rejects_empty_name() {
        let file = SharedFile::new(
            "f-1".to_string(),
            "alice".to_string(),
            "".to_string(),
            "f-1.bin".to_string(),
            "shared/f-1.bin".to_string(),
            "/uploads/shared/f-1.bin".to_string(),
            0,
            "application/octet-stream".to_string(),
            None,
        );
        assert!(matches!(file, Err(SharedFileError::InvalidFileName(_))));
    }

    #[test]
    fn test_ownership_check() {
        let file = build_file("alice", "image/png").unwrap();
        assert!(file.is_owned_by("alice"));
        assert!(!file.is_owned_by("bob"));
    }
}
