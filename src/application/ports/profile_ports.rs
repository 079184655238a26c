use async_trait::async_trait;

use crate::application::dtos::user_dto::UserDto;
use crate::common::errors::DomainError;

/// Puerto primario para perfiles de usuario y sus fotos
#[async_trait]
pub trait ProfileUseCase: Send + Sync + 'static {
    /// Sincroniza (inserta o reemplaza) el perfil de un usuario,
    /// conservando los campos de foto existentes
    async fn sync_user(
        &self,
        user_id: String,
        username: Option<String>,
        email: Option<String>,
    ) -> Result<UserDto, DomainError>;

    /// Obtiene el perfil de un usuario
    async fn get_user(&self, user_id: &str) -> Result<UserDto, DomainError>;

    /// Sustituye la foto de perfil: primero el blob nuevo, después la fila;
    /// la foto anterior solo se retira cuando la fila ya apunta a la nueva
    async fn update_profile_picture(
        &self,
        user_id: String,
        original_name: String,
        mime_type: String,
        content: Vec<u8>,
    ) -> Result<UserDto, DomainError>;

    /// Limpia los campos de foto (la fila se conserva) y retira el blob
    async fn remove_profile_picture(&self, user_id: &str) -> Result<UserDto, DomainError>;

    /// Sirve los bytes de la foto de perfil referenciada
    async fn get_profile_picture(&self, user_id: &str) -> Result<Vec<u8>, DomainError>;
}
