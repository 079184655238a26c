use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::common::errors::DomainError;

/// Bucket lógico bajo el root de blobs.
///
/// Cada bucket aísla un espacio de nombres; como los identificadores son
/// únicos, la unicidad de rutas dentro del bucket es estructural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobBucket {
    /// Fotos de perfil
    Profiles,
    /// Archivos compartidos
    Shared,
}

impl BlobBucket {
    /// Nombre del directorio del bucket
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobBucket::Profiles => "profiles",
            BlobBucket::Shared => "shared",
        }
    }
}

impl std::fmt::Display for BlobBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Puerto secundario para escritura de blobs.
///
/// Las rutas relativas que devuelve `put` son el único vínculo entre la
/// fila de metadatos y los bytes en disco; ningún otro componente construye
/// cadenas de ruta.
#[async_trait]
pub trait BlobWritePort: Send + Sync + 'static {
    /// Escribe los bytes bajo el bucket con el nombre almacenado dado y
    /// devuelve la ruta relativa ("bucket/nombre") para lecturas futuras
    async fn put(
        &self,
        bucket: BlobBucket,
        stored_name: &str,
        content: &[u8],
    ) -> Result<String, DomainError>;

    /// Elimina el blob de la ruta relativa dada.
    ///
    /// Idempotente: eliminar un blob ausente no es un error, para que la
    /// limpieza sea segura ante reintentos.
    async fn remove(&self, relative_path: &str) -> Result<(), DomainError>;
}

/// Puerto secundario para lectura de blobs
#[async_trait]
pub trait BlobReadPort: Send + Sync + 'static {
    /// Obtiene el contenido completo del blob (para blobs pequeños)
    async fn get(&self, relative_path: &str) -> Result<Vec<u8>, DomainError>;

    /// Obtiene el contenido como stream (para blobs grandes)
    async fn get_stream(
        &self,
        relative_path: &str,
    ) -> Result<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>, DomainError>;

    /// Verifica si existe un blob en la ruta dada
    async fn exists(&self, relative_path: &str) -> Result<bool, DomainError>;
}
