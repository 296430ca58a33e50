mod storage;

pub use storage::{FileStorage, MemoryStorage, TokenStorage};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Storage key holding the serialized user record.
pub const TOKEN_KEY: &str = "fleetui_token";

const ADMIN_EMAIL: &str = "admin@liberdadepro.com";
const ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl User {
    fn admin() -> Self {
        Self {
            id: "1".to_string(),
            name: "Administrador".to_string(),
            email: ADMIN_EMAIL.to_string(),
            role: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Stored token not checked yet.
    Loading,
    Authenticated(User),
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub success: bool,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl LoginResult {
    fn ok(user: User) -> Self {
        Self {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            error: Some(error.into()),
        }
    }
}

/// The one authenticated-session store. Owned by the app (or the CLI run)
/// and passed by reference; nothing global.
///
/// The token is the plain JSON of the [`User`]. It is trusted as-is on load,
/// so anything able to write the storage can forge a session.
pub struct AuthContext {
    storage: Box<dyn TokenStorage>,
    state: AuthState,
}

impl AuthContext {
    /// The one accepted email/password pair, shown on the login screen.
    pub fn demo_credentials() -> (&'static str, &'static str) {
        (ADMIN_EMAIL, ADMIN_PASSWORD)
    }

    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            storage,
            state: AuthState::Loading,
        }
    }

    /// Read the stored token and leave `Loading`. A token that does not parse
    /// is removed and the session treated as absent.
    pub fn init(&mut self) {
        self.state = match self.storage.get(TOKEN_KEY) {
            None => AuthState::Unauthenticated,
            Some(token) => match serde_json::from_str::<User>(&token) {
                Ok(user) => {
                    tracing::debug!(email = %user.email, "restored session");
                    AuthState::Authenticated(user)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "invalid session token, clearing it");
                    if let Err(e) = self.storage.remove(TOKEN_KEY) {
                        tracing::error!(error = %e, "failed to clear invalid session token");
                    }
                    AuthState::Unauthenticated
                }
            },
        };
    }

    pub fn login(&mut self, email: &str, password: &str) -> LoginResult {
        if email != ADMIN_EMAIL || password != ADMIN_PASSWORD {
            tracing::info!(email, "login rejected");
            return LoginResult::failed(Error::Authentication.to_string());
        }

        let user = User::admin();
        let token = match serde_json::to_string(&user) {
            Ok(token) => token,
            Err(e) => return LoginResult::failed(e.to_string()),
        };
        if let Err(e) = self.storage.set(TOKEN_KEY, &token) {
            tracing::error!(error = %e, "failed to store session token");
            return LoginResult::failed(e.to_string());
        }

        tracing::info!(email, "logged in");
        self.state = AuthState::Authenticated(user.clone());
        LoginResult::ok(user)
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::error!(error = %e, "failed to remove session token");
        }
        self.state = AuthState::Unauthenticated;
        tracing::info!("logged out");
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        self.state == AuthState::Loading
    }

    pub fn storage(&self) -> &dyn TokenStorage {
        self.storage.as_ref()
    }
}

#[cfg(test)]
mod tests;
