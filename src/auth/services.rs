use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo;
use crate::auth::token;
use crate::auth::types::{Session, User, UserProfile};
use crate::error::{Error, Result};
use crate::ids;
use crate::store::Store;

const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Credential store and session manager over a blob store.
///
/// Email matching is exact and case-sensitive; inputs are only trimmed of
/// surrounding whitespace.
pub struct Auth<'a> {
    store: &'a mut dyn Store,
}

impl<'a> Auth<'a> {
    pub fn new(store: &'a mut dyn Store) -> Self {
        Self { store }
    }

    #[instrument(skip(self, password))]
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<Session> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email");
            return Err(Error::validation("invalid email address"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            warn!("password too short");
            return Err(Error::validation(
                "password must be at least 6 characters long",
            ));
        }

        let mut users = repo::load_users(self.store)?;
        if users.iter().any(|u| u.email == email) {
            warn!(email = %email, "email already registered");
            return Err(Error::DuplicateEmail);
        }

        let user = User {
            id: ids::next_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        repo::save_users(self.store, &users)?;

        let session = Session {
            token: token::issue(&user.id, OffsetDateTime::now_utc()),
            user: user.profile(),
        };
        repo::save_session(self.store, &session)?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(session)
    }

    #[instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();

        let users = repo::load_users(self.store)?;
        let user = match users.iter().find(|u| u.email == email) {
            Some(u) => u,
            None => {
                warn!(email = %email, "login unknown email");
                return Err(Error::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(Error::InvalidCredentials);
        }

        let session = Session {
            token: token::issue(&user.id, OffsetDateTime::now_utc()),
            user: user.profile(),
        };
        repo::save_session(self.store, &session)?;

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(session)
    }

    /// Idempotent; clearing an absent session is fine.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<()> {
        repo::clear_session(self.store)?;
        info!("logged out");
        Ok(())
    }

    /// Restore the session persisted by a previous run. The token is taken
    /// at face value; the user table is not consulted.
    pub fn current_session(&self) -> Result<Option<Session>> {
        let session = repo::load_session(self.store)?;
        if let Some(ref s) = session {
            if let Some((user_id, issued_ms)) = token::parse(&s.token) {
                debug!(user_id = %user_id, issued_ms, "session restored");
            }
        }
        Ok(session)
    }

    /// Update name and email of the logged-in user. The user record and the
    /// session's cached projection are written back-to-back so neither can
    /// be observed half-updated.
    #[instrument(skip(self))]
    pub fn update_profile(&mut self, name: &str, email: &str) -> Result<UserProfile> {
        let session = self.current_session()?.ok_or(Error::NotAuthenticated)?;
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if !is_valid_email(email) {
            return Err(Error::validation("invalid email address"));
        }

        let mut users = repo::load_users(self.store)?;
        let idx = users
            .iter()
            .position(|u| u.id == session.user.id)
            .ok_or(Error::NotAuthenticated)?; // stale session, user is gone

        if users
            .iter()
            .any(|u| u.email == email && u.id != session.user.id)
        {
            warn!(email = %email, "email already in use");
            return Err(Error::EmailInUse);
        }

        users[idx].name = name.to_string();
        users[idx].email = email.to_string();
        let profile = users[idx].profile();
        repo::save_users(self.store, &users)?;
        repo::save_profile(self.store, &profile)?;

        info!(user_id = %profile.id, email = %profile.email, "profile updated");
        Ok(profile)
    }

    /// Overwrites the stored password hash only; the session is untouched.
    #[instrument(skip(self, current_password, new_password))]
    pub fn change_password(&mut self, current_password: &str, new_password: &str) -> Result<()> {
        let session = self.current_session()?.ok_or(Error::NotAuthenticated)?;

        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(Error::validation(
                "password must be at least 6 characters long",
            ));
        }

        let mut users = repo::load_users(self.store)?;
        let idx = users
            .iter()
            .position(|u| u.id == session.user.id)
            .ok_or(Error::NotAuthenticated)?;

        if !verify_password(current_password, &users[idx].password_hash)? {
            warn!(user_id = %session.user.id, "change password with wrong current password");
            return Err(Error::IncorrectPassword);
        }

        users[idx].password_hash = hash_password(new_password)?;
        repo::save_users(self.store, &users)?;

        info!(user_id = %session.user.id, "password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn registered(store: &mut MemoryStore) -> Session {
        Auth::new(store)
            .register("Ada", "ada@example.com", "hunter22")
            .expect("register should succeed")
    }

    #[test]
    fn register_persists_user_and_session() {
        let mut store = MemoryStore::new();
        let session = registered(&mut store);
        assert!(session.token.starts_with("token_"));
        assert_eq!(session.user.email, "ada@example.com");

        let restored = Auth::new(&mut store).current_session().unwrap().unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn register_rejects_duplicate_email() {
        let mut store = MemoryStore::new();
        registered(&mut store);
        let err = Auth::new(&mut store)
            .register("Other", "ada@example.com", "password1")
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateEmail));

        // User table unchanged.
        let users = repo::load_users(&store).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ada");
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let mut store = MemoryStore::new();
        registered(&mut store);
        // A different-cased email is a different identity.
        Auth::new(&mut store)
            .register("Ada2", "Ada@example.com", "hunter22")
            .expect("differently-cased email registers");
    }

    #[test]
    fn register_validates_input() {
        let mut store = MemoryStore::new();
        let mut auth = Auth::new(&mut store);
        assert!(matches!(
            auth.register("  ", "a@b.co", "hunter22"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            auth.register("Ada", "not-an-email", "hunter22"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            auth.register("Ada", "a@b.co", "short"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn login_rejects_wrong_password_and_unknown_email() {
        let mut store = MemoryStore::new();
        registered(&mut store);

        let mut auth = Auth::new(&mut store);
        assert!(matches!(
            auth.login("ada@example.com", "wrong-password"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@example.com", "hunter22"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn login_after_logout_restores_access() {
        let mut store = MemoryStore::new();
        registered(&mut store);

        let mut auth = Auth::new(&mut store);
        auth.logout().unwrap();
        assert!(auth.current_session().unwrap().is_none());
        // Logout twice is fine.
        auth.logout().unwrap();

        let session = auth.login("ada@example.com", "hunter22").unwrap();
        assert_eq!(session.user.name, "Ada");
    }

    #[test]
    fn update_profile_requires_session() {
        let mut store = MemoryStore::new();
        let err = Auth::new(&mut store)
            .update_profile("Ada", "ada@example.com")
            .unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
    }

    #[test]
    fn update_profile_rewrites_record_and_projection() {
        let mut store = MemoryStore::new();
        registered(&mut store);

        let mut auth = Auth::new(&mut store);
        let profile = auth.update_profile("Ada L.", "lovelace@example.com").unwrap();
        assert_eq!(profile.name, "Ada L.");

        let session = auth.current_session().unwrap().unwrap();
        assert_eq!(session.user.email, "lovelace@example.com");

        let users = repo::load_users(&store).unwrap();
        assert_eq!(users[0].email, "lovelace@example.com");
    }

    #[test]
    fn update_profile_rejects_taken_email() {
        let mut store = MemoryStore::new();
        registered(&mut store);
        Auth::new(&mut store)
            .register("Grace", "grace@example.com", "hunter22")
            .unwrap();

        // Grace holds the session now; taking Ada's email must fail.
        let err = Auth::new(&mut store)
            .update_profile("Grace", "ada@example.com")
            .unwrap_err();
        assert!(matches!(err, Error::EmailInUse));

        // Keeping your own email is allowed.
        Auth::new(&mut store)
            .update_profile("Grace H.", "grace@example.com")
            .unwrap();
    }

    #[test]
    fn change_password_verifies_current() {
        let mut store = MemoryStore::new();
        registered(&mut store);

        let mut auth = Auth::new(&mut store);
        let err = auth.change_password("wrong", "new-password").unwrap_err();
        assert!(matches!(err, Error::IncorrectPassword));

        // Old password still works.
        auth.login("ada@example.com", "hunter22").unwrap();

        auth.change_password("hunter22", "new-password").unwrap();
        assert!(matches!(
            auth.login("ada@example.com", "hunter22"),
            Err(Error::InvalidCredentials)
        ));
        auth.login("ada@example.com", "new-password").unwrap();
    }

    #[test]
    fn email_regex_accepts_reasonable_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.com"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }
}
