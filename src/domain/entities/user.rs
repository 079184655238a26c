use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Identificador de usuario inválido: {0}")]
    InvalidUserId(String),

    #[error("Foto de perfil inválida: {0}")]
    InvalidProfilePicture(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Perfil de usuario propietario de archivos compartidos.
///
/// El identificador lo aporta el llamante (la identidad ya viene establecida);
/// el núcleo nunca lo genera. Los campos de foto de perfil van siempre en
/// pareja: ruta y URL se asignan juntas y se limpian juntas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: String,
    username: Option<String>,
    email: Option<String>,
    /// Ruta relativa al root de blobs, o cadena vacía si no hay foto
    profile_picture_path: String,
    /// URL pública de la foto, o cadena vacía si no hay foto
    profile_picture_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Crea un usuario sin foto de perfil
    pub fn new(
        id: String,
        username: Option<String>,
        email: Option<String>,
    ) -> UserResult<Self> {
        if id.trim().is_empty() {
            return Err(UserError::InvalidUserId(
                "el identificador no puede estar vacío".to_string(),
            ));
        }

        let now = Utc::now();

        Ok(Self {
            id,
            username,
            email,
            profile_picture_path: String::new(),
            profile_picture_url: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Crea un usuario desde valores existentes (reconstrucción desde BD)
    pub fn from_data(
        id: String,
        username: Option<String>,
        email: Option<String>,
        profile_picture_path: String,
        profile_picture_url: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            profile_picture_path,
            profile_picture_url,
            created_at,
            updated_at,
        }
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn profile_picture_path(&self) -> &str {
        &self.profile_picture_path
    }

    pub fn profile_picture_url(&self) -> &str {
        &self.profile_picture_url
    }

    /// Indica si el usuario tiene foto de perfil
    pub fn has_profile_picture(&self) -> bool {
        !self.profile_picture_path.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Nueva versión del usuario con los datos de perfil sincronizados.
    ///
    /// Los campos de foto se conservan tal cual; sustituirlos es una
    /// operación aparte con su propia coordinación de blobs.
    pub fn with_profile(&self, username: Option<String>, email: Option<String>) -> Self {
        Self {
            id: self.id.clone(),
            username,
            email,
            profile_picture_path: self.profile_picture_path.clone(),
            profile_picture_url: self.profile_picture_url.clone(),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }

    /// Nueva versión del usuario con foto de perfil.
    ///
    /// Ruta y URL deben ir juntas: una referencia a medias rompería el
    /// invariante de la entidad.
    pub fn with_profile_picture(&self, path: String, url: String) -> UserResult<Self> {
        if path.is_empty() || url.is_empty() {
            return Err(UserError::InvalidProfilePicture(
                "ruta y URL de la foto deben asignarse juntas".to_string(),
            ));
        }

        Ok(Self {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            profile_picture_path: path,
            profile_picture_url: url,
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }

    /// Nueva versión del usuario sin foto de perfil (la fila se conserva)
    pub fn without_profile_picture(&self) -> Self {
        Self {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            profile_picture_path: String::new(),
            profile_picture_url: String::new(),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}
