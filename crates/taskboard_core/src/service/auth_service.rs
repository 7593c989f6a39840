//! Registration, login and session operations.
//!
//! # Invariants
//! - Emails are unique ignoring case.
//! - At most one session exists; login and register replace it wholesale.
//! - Passwords and tokens never appear in log events.

use crate::model::ids::{new_id, new_token, Clock};
use crate::model::user::{AuthGrant, Session, User};
use crate::repo::DocumentRepository;
use crate::service::store::{require_text, DocumentStore, StoreError, StoreResult};
use log::{info, warn};

impl<R: DocumentRepository, C: Clock> DocumentStore<R, C> {
    /// Creates a user and logs them in.
    ///
    /// # Errors
    /// - `Validation(MissingField)` when any input is blank.
    /// - `DuplicateEmail` when the email is taken, ignoring case.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> StoreResult<AuthGrant> {
        require_text("name", name)?;
        require_text("email", email)?;
        require_text("password", password)?;

        let mut document = self.load()?;
        if document.users.iter().any(|user| user.email_matches(email)) {
            warn!("event=register module=store status=error error_code=duplicate_email");
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }

        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let session = Session {
            token: new_token(),
            user_id: user.id.clone(),
        };
        document.users.push(user.clone());
        document.session = Some(session.clone());
        self.commit(&document)?;

        info!(
            "event=register module=store status=ok user_id={} backend={}",
            user.id,
            self.repo.backend_name()
        );
        Ok(AuthGrant {
            token: session.token,
            user,
        })
    }

    /// Starts a new session for the user matching `email` and `password`.
    ///
    /// Email comparison ignores case; password comparison is exact.
    pub fn login(&mut self, email: &str, password: &str) -> StoreResult<AuthGrant> {
        let mut document = self.load()?;
        let Some(user) = document
            .users
            .iter()
            .find(|user| user.email_matches(email) && user.password == password)
            .cloned()
        else {
            warn!("event=login module=store status=error error_code=invalid_credentials");
            return Err(StoreError::InvalidCredentials);
        };

        let session = Session {
            token: new_token(),
            user_id: user.id.clone(),
        };
        document.session = Some(session.clone());
        self.commit(&document)?;

        info!("event=login module=store status=ok user_id={}", user.id);
        Ok(AuthGrant {
            token: session.token,
            user,
        })
    }

    /// Clears the session. Calling it without a session is a no-op.
    pub fn logout(&mut self) -> StoreResult<()> {
        let mut document = self.load()?;
        if document.session.take().is_none() {
            return Ok(());
        }
        self.commit(&document)?;
        info!("event=logout module=store status=ok");
        Ok(())
    }

    pub fn session(&self) -> StoreResult<Option<Session>> {
        Ok(self.load()?.session)
    }

    /// Returns the logged-in user, or `None` when there is no session or
    /// the session points at a user that no longer exists.
    pub fn current_user(&self) -> StoreResult<Option<User>> {
        let document = self.load()?;
        let user = document
            .session
            .as_ref()
            .and_then(|session| document.user(&session.user_id))
            .cloned();
        Ok(user)
    }

    pub fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.load()?.user(user_id).cloned())
    }

    /// Lists users in registration order, filtered by name or email.
    pub fn list_users(&self, query: Option<&str>) -> StoreResult<Vec<User>> {
        let matcher = self.matcher(query)?;
        let users = self
            .load()?
            .users
            .into_iter()
            .filter(|user| matcher.matches_any(&[user.name.as_str(), user.email.as_str()]))
            .collect();
        Ok(users)
    }
}
