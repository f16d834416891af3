use anyhow::Context;

use crate::auth::types::{Session, User, UserProfile};
use crate::error::Result;
use crate::store::Store;

/// The whole user table, rewritten wholesale on every mutation.
pub const USERS_KEY: &str = "users";
/// Current session token, absent when logged out.
pub const AUTH_TOKEN_KEY: &str = "auth-token";
/// Cached projection of the session's user, absent when logged out.
pub const USER_DATA_KEY: &str = "user-data";

pub fn load_users(store: &dyn Store) -> Result<Vec<User>> {
    match store.get(USERS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw).context("parse users blob")?),
        None => Ok(Vec::new()),
    }
}

pub fn save_users(store: &mut dyn Store, users: &[User]) -> Result<()> {
    let raw = serde_json::to_string(users).context("serialize users blob")?;
    store.put(USERS_KEY, &raw)
}

/// Persist both halves of a session. The two writes are back-to-back with no
/// fallible step between them beyond the store itself.
pub fn save_session(store: &mut dyn Store, session: &Session) -> Result<()> {
    let raw = serde_json::to_string(&session.user).context("serialize user projection")?;
    store.put(AUTH_TOKEN_KEY, &session.token)?;
    store.put(USER_DATA_KEY, &raw)
}

/// Restore the session from persisted state. Both the token and the cached
/// projection must be present; the token is not re-checked against the user
/// table.
pub fn load_session(store: &dyn Store) -> Result<Option<Session>> {
    let token = match store.get(AUTH_TOKEN_KEY)? {
        Some(t) => t,
        None => return Ok(None),
    };
    let user: UserProfile = match store.get(USER_DATA_KEY)? {
        Some(raw) => serde_json::from_str(&raw).context("parse user projection")?,
        None => return Ok(None),
    };
    Ok(Some(Session { token, user }))
}

pub fn save_profile(store: &mut dyn Store, profile: &UserProfile) -> Result<()> {
    let raw = serde_json::to_string(profile).context("serialize user projection")?;
    store.put(USER_DATA_KEY, &raw)
}

pub fn clear_session(store: &mut dyn Store) -> Result<()> {
    store.remove(AUTH_TOKEN_KEY)?;
    store.remove(USER_DATA_KEY)
}
