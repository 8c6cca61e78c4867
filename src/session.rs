//! Login state of one interactive session.

use tracing::info;

use crate::credentials::CredentialStore;
use crate::error::{FitnessError, Result};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No user authenticated
    #[default]
    LoggedOut,
    /// `username` passed credential verification
    LoggedIn {
        /// Authenticated user
        username: String,
    },
}

/// Explicit session state machine, independent of any rendering.
///
/// The only transitions are LoggedOut → LoggedIn on a verified login and
/// LoggedIn → LoggedOut on logout.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// A logged-out session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Authenticated user, if any
    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedIn { username } => Some(username.as_str()),
            SessionState::LoggedOut => None,
        }
    }

    /// Whether a user is logged in
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn { .. })
    }

    /// Verify the credentials and move to LoggedIn. On failure the state is
    /// left unchanged.
    pub fn login(&mut self, store: &CredentialStore, username: &str, password: &str) -> Result<()> {
        if let Some(current) = self.current_user() {
            return Err(FitnessError::Session(format!("already logged in as {current}")));
        }

        let verified = store.verify(username, password);
        crate::metrics::record_login(verified);
        if !verified {
            return Err(FitnessError::AuthFailure(username.to_string()));
        }

        info!(username, "User logged in");
        self.state = SessionState::LoggedIn {
            username: username.to_string(),
        };
        Ok(())
    }

    /// Move back to LoggedOut.
    pub fn logout(&mut self) -> Result<()> {
        match std::mem::take(&mut self.state) {
            SessionState::LoggedIn { username } => {
                info!(username, "User logged out");
                Ok(())
            }
            SessionState::LoggedOut => Err(FitnessError::Session("not logged in".to_string())),
        }
    }

    /// Authenticated user, or a session error for logged-out sessions.
    pub fn require_user(&self) -> Result<&str> {
        self.current_user()
            .ok_or_else(|| FitnessError::Session("login required".to_string()))
    }
}
