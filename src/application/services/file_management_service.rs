use std::sync::Arc;
use async_trait::async_trait;

use crate::application::ports::file_ports::FileManagementUseCase;
use crate::application::ports::storage_ports::BlobWritePort;
use crate::common::errors::DomainError;
use crate::domain::repositories::shared_file_repository::SharedFileRepository;

/// Servicio de gestión de archivos compartidos.
///
/// El borrado verifica la propiedad antes de tocar nada: es una puerta del
/// coordinador, no una restricción de base de datos.
pub struct FileManagementService {
    blob_store: Arc<dyn BlobWritePort>,
    file_repository: Arc<dyn SharedFileRepository>,
}

impl FileManagementService {
    /// Crea un nuevo servicio de gestión
    pub fn new(
        blob_store: Arc<dyn BlobWritePort>,
        file_repository: Arc<dyn SharedFileRepository>,
    ) -> Self {
        Self {
            blob_store,
            file_repository,
        }
    }
}

#[async_trait]
impl FileManagementUseCase for FileManagementService {
    async fn delete_file(&self, id: &str, caller_id: &str) -> Result<(), DomainError> {
        let file = self
            .file_repository
            .get_file_by_id(id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::not_found("SharedFile", id))?;

        if !file.is_owned_by(caller_id) {
            tracing::warn!(
                "Borrado rechazado: {} no es propietario de {}",
                caller_id,
                id
            );
            return Err(DomainError::forbidden("SharedFile", id));
        }

        // Primero la fila; el blob solo se toca si este borrado la eliminó
        let deleted = self
            .file_repository
            .delete_file(id)
            .await
            .map_err(DomainError::from)?;

        if !deleted {
            // Un borrado concurrente ganó la carrera: resultado normal, el
            // blob ya no nos pertenece
            tracing::debug!("Borrado de {} sin filas afectadas", id);
            return Ok(());
        }

        if let Err(e) = self.blob_store.remove(file.stored_path()).await {
            tracing::error!(
                "Estado inconsistente: fila de {} eliminada pero el blob {} persiste: {}",
                id,
                file.stored_path(),
                e
            );
            return Err(e);
        }

        tracing::info!("Archivo eliminado: {} (propietario {})", id, caller_id);
        Ok(())
    }
}
