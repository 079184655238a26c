use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::application::dtos::file_dto::FileDto;
use crate::application::dtos::stats_dto::OwnerStatsDto;
use crate::common::errors::DomainError;

/// Puerto primario para la subida de archivos compartidos
#[async_trait]
pub trait FileUploadUseCase: Send + Sync + 'static {
    /// Sube un nuevo archivo: genera el identificador, persiste el blob y
    /// registra la fila de metadatos como una unidad lógica
    async fn upload_file(
        &self,
        owner_id: String,
        original_name: String,
        mime_type: String,
        content: Vec<u8>,
        description: Option<String>,
    ) -> Result<FileDto, DomainError>;
}

/// Puerto primario para lectura y descarga de archivos compartidos
#[async_trait]
pub trait FileRetrievalUseCase: Send + Sync + 'static {
    /// Obtiene los metadatos de un archivo por su ID
    async fn get_file(&self, id: &str) -> Result<FileDto, DomainError>;

    /// Lista los archivos de un propietario, más recientes primero
    async fn list_files(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FileDto>, DomainError>;

    /// Agregados del propietario (número de archivos, bytes, descargas)
    async fn get_owner_stats(&self, owner_id: &str) -> Result<OwnerStatsDto, DomainError>;

    /// Descarga el contenido completo y contabiliza la descarga
    async fn download_file(&self, id: &str) -> Result<(FileDto, Vec<u8>), DomainError>;

    /// Descarga como stream y contabiliza la descarga
    #[allow(clippy::type_complexity)]
    async fn download_stream(
        &self,
        id: &str,
    ) -> Result<
        (
            FileDto,
            Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>,
        ),
        DomainError,
    >;
}

/// Puerto primario para la gestión de archivos compartidos
#[async_trait]
pub trait FileManagementUseCase: Send + Sync + 'static {
    /// Elimina un archivo y su blob, con verificación de propiedad previa
    /// a cualquier mutación
    async fn delete_file(&self, id: &str, caller_id: &str) -> Result<(), DomainError>;
}

/// Puerto primario para la búsqueda de archivos compartidos
#[async_trait]
pub trait FileSearchUseCase: Send + Sync + 'static {
    /// Busca por subcadena en nombre, descripción o categoría, dentro de
    /// los archivos de un propietario
    async fn search_files(&self, owner_id: &str, term: &str) -> Result<Vec<FileDto>, DomainError>;
}
