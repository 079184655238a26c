use std::sync::Arc;
use async_trait::async_trait;

use crate::application::dtos::file_dto::FileDto;
use crate::application::ports::file_ports::FileSearchUseCase;
use crate::common::errors::DomainError;
use crate::domain::repositories::shared_file_repository::SharedFileRepository;

/// Servicio de búsqueda sobre los archivos de un propietario.
///
/// Delegación directa al repositorio: coincidencia por subcadena sin
/// distinguir mayúsculas, siempre acotada por el tope del repositorio.
pub struct SearchService {
    file_repository: Arc<dyn SharedFileRepository>,
}

impl SearchService {
    /// Crea un nuevo servicio de búsqueda
    pub fn new(file_repository: Arc<dyn SharedFileRepository>) -> Self {
        Self { file_repository }
    }
}

#[async_trait]
impl FileSearchUseCase for SearchService {
    async fn search_files(&self, owner_id: &str, term: &str) -> Result<Vec<FileDto>, DomainError> {
        if owner_id.trim().is_empty() {
            return Err(DomainError::invalid_input(
                "SharedFile",
                "owner id is required",
            ));
        }

        let files = self
            .file_repository
            .search_by_owner(owner_id, term)
            .await
            .map_err(DomainError::from)?;

        tracing::debug!(
            "Búsqueda de \"{}\" para {}: {} resultados",
            term,
            owner_id,
            files.len()
        );

        Ok(files.into_iter().map(FileDto::from).collect())
    }
}
