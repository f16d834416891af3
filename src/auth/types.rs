use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// User record as persisted in the `users` blob. The password hash never
/// leaves the auth module; callers only ever see a [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String, // Argon2 hash, never the plain password
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Read-only projection of a user, stripped of sensitive fields. This is
/// what the session caches and what the view layer sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// The authenticated identity for the current process. Passed explicitly to
/// everything that operates on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}
