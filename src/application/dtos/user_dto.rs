use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::domain::entities::user::User;

/// DTO for user profile responses.
///
/// The server-relative picture path never leaves the core; only the public
/// URL is exposed.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    /// Caller-supplied user identifier
    pub id: String,

    pub username: Option<String>,

    pub email: Option<String>,

    /// Public URL of the profile picture, if any
    pub profile_picture_url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let profile_picture_url = if user.profile_picture_url().is_empty() {
            None
        } else {
            Some(user.profile_picture_url().to_string())
        };

        Self {
            id: user.id().to_string(),
            username: user.username().map(|u| u.to_string()),
            email: user.email().map(|e| e.to_string()),
            profile_picture_url,
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_picture_url_becomes_none() {
        let user = User::new("alice".to_string(), None, None).unwrap();
        let dto = UserDto::from(user);
        assert!(dto.profile_picture_url.is_none());
    }
}
