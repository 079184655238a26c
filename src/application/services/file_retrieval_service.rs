use std::sync::Arc;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::application::dtos::file_dto::FileDto;
use crate::application::dtos::stats_dto::OwnerStatsDto;
use crate::application::ports::file_ports::FileRetrievalUseCase;
use crate::application::ports::storage_ports::BlobReadPort;
use crate::common::errors::{DomainError, ErrorKind};
use crate::domain::entities::shared_file::SharedFile;
use crate::domain::repositories::shared_file_repository::SharedFileRepository;

/// Servicio de lectura y descarga de archivos compartidos.
///
/// Las consultas van directas al repositorio de metadatos; la descarga toca
/// además el almacén de blobs y solo contabiliza cuando los bytes están
/// confirmados.
pub struct FileRetrievalService {
    blob_store: Arc<dyn BlobReadPort>,
    file_repository: Arc<dyn SharedFileRepository>,
}

impl FileRetrievalService {
    /// Crea un nuevo servicio de lectura
    pub fn new(
        blob_store: Arc<dyn BlobReadPort>,
        file_repository: Arc<dyn SharedFileRepository>,
    ) -> Self {
        Self {
            blob_store,
            file_repository,
        }
    }

    async fn require_file(&self, id: &str) -> Result<SharedFile, DomainError> {
        self.file_repository
            .get_file_by_id(id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::not_found("SharedFile", id))
    }

    /// Contabiliza una descarga confirmada.
    ///
    /// Si la fila desapareció entre la lectura del blob y el UPDATE
    /// (borrado concurrente), los bytes ya servidos siguen siendo válidos;
    /// la contabilidad perdida solo se registra.
    async fn record_download(&self, id: &str) -> Result<(), DomainError> {
        let updated = self
            .file_repository
            .increment_download(id)
            .await
            .map_err(DomainError::from)?;

        if !updated {
            tracing::warn!(
                "La fila de {} desapareció durante la descarga; contador no actualizado",
                id
            );
        }

        Ok(())
    }

    /// Un blob ausente con fila presente es un estado inconsistente
    fn map_blob_error(file: &SharedFile, err: DomainError) -> DomainError {
        if err.kind == ErrorKind::NotFound {
            tracing::error!(
                "Estado inconsistente: la fila {} referencia un blob ausente en {}",
                file.id(),
                file.stored_path()
            );
            DomainError::inconsistent(
                "SharedFile",
                format!("blob missing for file {}", file.id()),
            )
            .with_id(file.id())
        } else {
            err
        }
    }
}

#[async_trait]
impl FileRetrievalUseCase for FileRetrievalService {
    async fn get_file(&self, id: &str) -> Result<FileDto, DomainError> {
        let file = self.require_file(id).await?;
        Ok(FileDto::from(file))
    }

    async fn list_files(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FileDto>, DomainError> {
        let files = self
            .file_repository
            .list_by_owner(owner_id, limit, offset)
            .await
            .map_err(DomainError::from)?;

        Ok(files.into_iter().map(FileDto::from).collect())
    }

    async fn get_owner_stats(&self, owner_id: &str) -> Result<OwnerStatsDto, DomainError> {
        let stats = self
            .file_repository
            .stats_by_owner(owner_id)
            .await
            .map_err(DomainError::from)?;

        Ok(OwnerStatsDto::from(stats))
    }

    async fn download_file(&self, id: &str) -> Result<(FileDto, Vec<u8>), DomainError> {
        let file = self.require_file(id).await?;

        let content = self
            .blob_store
            .get(file.stored_path())
            .await
            .map_err(|e| Self::map_blob_error(&file, e))?;

        self.record_download(id).await?;

        tracing::debug!("Descarga de {} ({} bytes)", id, content.len());
        Ok((FileDto::from(file), content))
    }

    async fn download_stream(
        &self,
        id: &str,
    ) -> Result<
        (
            FileDto,
            Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>,
        ),
        DomainError,
    > {
        let file = self.require_file(id).await?;

        // Abrir el stream confirma la presencia del blob; la descarga se
        // contabiliza en ese momento, no al agotar el stream
        let stream = self
            .blob_store
            .get_stream(file.stored_path())
            .await
            .map_err(|e| Self::map_blob_error(&file, e))?;

        self.record_download(id).await?;

        Ok((FileDto::from(file), stream))
    }
}
