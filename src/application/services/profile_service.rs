use std::sync::Arc;
use async_trait::async_trait;

use crate::application::dtos::user_dto::UserDto;
use crate::application::ports::profile_ports::ProfileUseCase;
use crate::application::ports::storage_ports::{BlobBucket, BlobReadPort, BlobWritePort};
use crate::common::config::AppConfig;
use crate::common::errors::{DomainError, ErrorKind};
use crate::domain::entities::user::User;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::id_service::IdGenerator;

/// Servicio de perfiles de usuario y sus fotos.
///
/// La sustitución de foto sigue un orden deliberado: blob nuevo, después la
/// fila, y solo entonces se retira el blob anterior. Un fallo a mitad deja
/// al usuario con su foto antigua intacta, nunca sin ninguna.
pub struct ProfileService {
    blob_writer: Arc<dyn BlobWritePort>,
    blob_reader: Arc<dyn BlobReadPort>,
    user_repository: Arc<dyn UserRepository>,
    config: AppConfig,
}

impl ProfileService {
    /// Crea un nuevo servicio de perfiles
    pub fn new(
        blob_writer: Arc<dyn BlobWritePort>,
        blob_reader: Arc<dyn BlobReadPort>,
        user_repository: Arc<dyn UserRepository>,
        config: AppConfig,
    ) -> Self {
        Self {
            blob_writer,
            blob_reader,
            user_repository,
            config,
        }
    }

    async fn require_user(&self, user_id: &str) -> Result<User, DomainError> {
        self.user_repository
            .get_user_by_id(user_id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// Retirada best-effort de un blob de foto ya sustituido.
    ///
    /// Perder el blob antiguo es aceptable; perder el nuevo no. Por eso el
    /// fallo aquí solo se registra y la operación continúa.
    async fn discard_old_picture(&self, relative_path: &str) {
        if let Err(e) = self.blob_writer.remove(relative_path).await {
            tracing::warn!(
                "No se pudo retirar la foto de perfil anterior {}: {}",
                relative_path,
                e
            );
        }
    }
}

#[async_trait]
impl ProfileUseCase for ProfileService {
    async fn sync_user(
        &self,
        user_id: String,
        username: Option<String>,
        email: Option<String>,
    ) -> Result<UserDto, DomainError> {
        let existing = self
            .user_repository
            .get_user_by_id(&user_id)
            .await
            .map_err(DomainError::from)?;

        // El reemplazo es total en el repositorio: los campos de foto
        // existentes se arrastran aquí, no hay fusión implícita
        let user = match existing {
            Some(user) => user.with_profile(username, email),
            None => User::new(user_id, username, email)
                .map_err(|e| DomainError::invalid_input("User", e.to_string()))?,
        };

        let saved = self
            .user_repository
            .upsert_user(user)
            .await
            .map_err(DomainError::from)?;

        tracing::debug!("Perfil sincronizado: {}", saved.id());
        Ok(UserDto::from(saved))
    }

    async fn get_user(&self, user_id: &str) -> Result<UserDto, DomainError> {
        let user = self.require_user(user_id).await?;
        Ok(UserDto::from(user))
    }

    async fn update_profile_picture(
        &self,
        user_id: String,
        original_name: String,
        mime_type: String,
        content: Vec<u8>,
    ) -> Result<UserDto, DomainError> {
        if user_id.trim().is_empty() {
            return Err(DomainError::invalid_input("User", "user id is required"));
        }

        let mime_type = if mime_type.trim().is_empty() {
            mime_guess::from_path(&original_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        } else {
            mime_type
        };

        if !mime_type.starts_with("image/") {
            return Err(DomainError::invalid_input(
                "User",
                format!("profile pictures must be images, got {}", mime_type),
            ));
        }

        let existing = self
            .user_repository
            .get_user_by_id(&user_id)
            .await
            .map_err(DomainError::from)?;

        let previous_path = existing
            .as_ref()
            .map(|u| u.profile_picture_path().to_string())
            .filter(|p| !p.is_empty());

        // Blob nuevo primero; la foto anterior sigue siendo la referenciada
        // hasta que la fila confirme
        let picture_id = IdGenerator::new_file_id();
        let stored_name = IdGenerator::stored_name_for(&picture_id, &original_name);
        let stored_path = self
            .blob_writer
            .put(BlobBucket::Profiles, &stored_name, &content)
            .await?;
        let public_url = self.config.public_url_for(&stored_path);

        let user = match existing {
            Some(user) => user.with_profile_picture(stored_path.clone(), public_url),
            None => User::new(user_id.clone(), None, None)
                .and_then(|u| u.with_profile_picture(stored_path.clone(), public_url)),
        }
        .map_err(|e| DomainError::invalid_input("User", e.to_string()))?;

        match self.user_repository.upsert_user(user).await {
            Ok(saved) => {
                if let Some(old_path) = previous_path {
                    if old_path != saved.profile_picture_path() {
                        self.discard_old_picture(&old_path).await;
                    }
                }

                tracing::info!("Foto de perfil actualizada para {}", saved.id());
                Ok(UserDto::from(saved))
            }
            Err(e) => {
                // La fila no cambió: se deshace el blob nuevo y la foto
                // antigua queda vigente
                if let Err(remove_err) = self.blob_writer.remove(&stored_path).await {
                    tracing::error!(
                        "Estado inconsistente: blob huérfano en {}: {}",
                        stored_path,
                        remove_err
                    );
                }
                Err(e.into())
            }
        }
    }

    async fn remove_profile_picture(&self, user_id: &str) -> Result<UserDto, DomainError> {
        let user = self.require_user(user_id).await?;

        if !user.has_profile_picture() {
            // Nada que limpiar; la operación es idempotente
            return Ok(UserDto::from(user));
        }

        let old_path = user.profile_picture_path().to_string();
        let cleared = user.without_profile_picture();

        let saved = self
            .user_repository
            .upsert_user(cleared)
            .await
            .map_err(DomainError::from)?;

        // La fila ya no referencia el blob; su retirada es best-effort
        self.discard_old_picture(&old_path).await;

        tracing::info!("Foto de perfil eliminada para {}", saved.id());
        Ok(UserDto::from(saved))
    }

    async fn get_profile_picture(&self, user_id: &str) -> Result<Vec<u8>, DomainError> {
        let user = self.require_user(user_id).await?;

        if !user.has_profile_picture() {
            return Err(DomainError::not_found("ProfilePicture", user_id));
        }

        self.blob_reader
            .get(user.profile_picture_path())
            .await
            .map_err(|e| {
                if e.kind == ErrorKind::NotFound {
                    tracing::error!(
                        "Estado inconsistente: el perfil {} referencia un blob ausente en {}",
                        user.id(),
                        user.profile_picture_path()
                    );
                    DomainError::inconsistent(
                        "ProfilePicture",
                        format!("blob missing for user {}", user.id()),
                    )
                    .with_id(user.id())
                } else {
                    e
                }
            })
    }
}
