use zeroize::Zeroizing;

use crate::errors::{GfAuthError, Result};

/// Platform credentials
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Mutable handshake state owned by `SessionClient`
#[derive(Clone, Default)]
pub struct Session {
    installation_id: Option<String>,
    credentials: Option<Credentials>,
    bearer_token: Option<String>,
}

impl Session {
    pub fn new(installation_id: Option<String>) -> Self {
        Self {
            installation_id,
            ..Self::default()
        }
    }

    pub fn installation_id(&self) -> Option<&str> {
        self.installation_id.as_deref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Record a successful login. An installation id that is already set is kept.
    pub(crate) fn commit_login(
        &mut self,
        installation_id: String,
        credentials: Credentials,
        bearer_token: String,
    ) {
        self.installation_id.get_or_insert(installation_id);
        self.credentials = Some(credentials);
        self.bearer_token = Some(bearer_token);
    }

    pub(crate) fn require_bearer_token(&self) -> Result<&str> {
        self.bearer_token()
            .ok_or(GfAuthError::Precondition("not authenticated - call authenticate first"))
    }

    pub(crate) fn require_installation_id(&self) -> Result<&str> {
        self.installation_id()
            .ok_or(GfAuthError::Precondition("installation id is not established yet"))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("installation_id", &self.installation_id)
            .field("credentials", &self.credentials)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
