use std::sync::Arc;
use async_trait::async_trait;

use crate::application::dtos::file_dto::FileDto;
use crate::application::ports::file_ports::FileUploadUseCase;
use crate::application::ports::storage_ports::{BlobBucket, BlobWritePort};
use crate::common::config::AppConfig;
use crate::common::errors::DomainError;
use crate::domain::entities::shared_file::SharedFile;
use crate::domain::repositories::shared_file_repository::SharedFileRepository;
use crate::domain::services::id_service::IdGenerator;

/// Servicio para la subida de archivos compartidos.
///
/// Coordina el almacén de blobs y el repositorio de metadatos para que una
/// subida o bien confirme ambos efectos o bien deshaga el blob recién
/// escrito. La ventana entre el `put` y el `create` ante una caída del
/// proceso queda fuera de alcance: deja un blob huérfano que se registra,
/// no se repara.
pub struct FileUploadService {
    blob_store: Arc<dyn BlobWritePort>,
    file_repository: Arc<dyn SharedFileRepository>,
    config: AppConfig,
}

impl FileUploadService {
    /// Crea un nuevo servicio de subida
    pub fn new(
        blob_store: Arc<dyn BlobWritePort>,
        file_repository: Arc<dyn SharedFileRepository>,
        config: AppConfig,
    ) -> Self {
        Self {
            blob_store,
            file_repository,
            config,
        }
    }

    /// Deshace el blob de una subida cuyo registro de metadatos falló.
    ///
    /// Si además el borrado falla, el blob queda huérfano: se registra como
    /// estado inconsistente y se continúa con el error original.
    async fn rollback_blob(&self, stored_path: &str) {
        if let Err(remove_err) = self.blob_store.remove(stored_path).await {
            tracing::error!(
                "Estado inconsistente: blob huérfano en {}: {}",
                stored_path,
                remove_err
            );
        } else {
            tracing::debug!("Blob revertido tras fallo de registro: {}", stored_path);
        }
    }
}

#[async_trait]
impl FileUploadUseCase for FileUploadService {
    async fn upload_file(
        &self,
        owner_id: String,
        original_name: String,
        mime_type: String,
        content: Vec<u8>,
        description: Option<String>,
    ) -> Result<FileDto, DomainError> {
        // Validación previa a cualquier mutación
        if owner_id.trim().is_empty() {
            return Err(DomainError::invalid_input(
                "SharedFile",
                "owner id is required",
            ));
        }
        if original_name.is_empty() {
            return Err(DomainError::invalid_input(
                "SharedFile",
                "original file name is required",
            ));
        }

        // MIME declarado por el llamante; si no declara ninguno se deriva
        // del nombre original
        let mime_type = if mime_type.trim().is_empty() {
            mime_guess::from_path(&original_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        } else {
            mime_type
        };

        let id = IdGenerator::new_file_id();
        let stored_name = IdGenerator::stored_name_for(&id, &original_name);
        let size_bytes = content.len() as u64;

        // Primero los bytes, después la fila
        let stored_path = self
            .blob_store
            .put(BlobBucket::Shared, &stored_name, &content)
            .await?;
        let public_url = self.config.public_url_for(&stored_path);

        let file = match SharedFile::new(
            id.clone(),
            owner_id,
            original_name,
            stored_name,
            stored_path.clone(),
            public_url,
            size_bytes,
            mime_type,
            description,
        ) {
            Ok(file) => file,
            Err(e) => {
                self.rollback_blob(&stored_path).await;
                return Err(DomainError::invalid_input("SharedFile", e.to_string()));
            }
        };

        match self.file_repository.create_file(file).await {
            Ok(created) => {
                tracing::info!(
                    "Archivo subido: {} ({}, {} bytes) de {}",
                    created.id(),
                    created.original_name(),
                    created.size_bytes(),
                    created.owner_id()
                );
                Ok(FileDto::from(created))
            }
            Err(e) => {
                tracing::error!("Error registrando archivo {}: {}", id, e);
                self.rollback_blob(&stored_path).await;
                Err(e.into())
            }
        }
    }
}
