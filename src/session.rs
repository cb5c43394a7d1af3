use std::env;

use crate::error::Error;
use crate::models::{User, ADMIN_DISPLAY_NAME};
use crate::storage::KvStore;

pub const AUTH_KEY: &str = "hjnj_auth_state";

/// The single configured admin account. Injected at startup so the
/// comparison site never holds literals; the defaults match the account the
/// board has always shipped with.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn from_env() -> Self {
        Self {
            username: env::var("BOARD_ADMIN_USER").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("BOARD_ADMIN_PASS").unwrap_or_else(|_| "admin123".to_string()),
        }
    }
}

pub struct SessionController {
    credentials: AdminCredentials,
    user: Option<User>,
}

impl SessionController {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self {
            credentials,
            user: None,
        }
    }

    /// Restores a previously persisted session. Absent or unreadable data is
    /// simply "not logged in"; unlike the notice collection, a broken session
    /// document carries nothing worth recovering.
    pub fn restore<S: KvStore>(&mut self, kv: &S) -> Result<Option<User>, Error> {
        let user = match kv.get(AUTH_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(error = %err, "stored session unreadable, treating as logged out");
                    None
                }
            },
            None => None,
        };
        self.user = user.clone();
        Ok(user)
    }

    /// Exact match against the configured pair. A miss changes nothing,
    /// including any session that is already live.
    pub fn login<S: KvStore>(
        &mut self,
        kv: &S,
        username: &str,
        password: &str,
    ) -> Result<User, Error> {
        if username != self.credentials.username || password != self.credentials.password {
            return Err(Error::InvalidCredentials);
        }
        let user = User {
            username: ADMIN_DISPLAY_NAME.to_string(),
            is_admin: true,
        };
        let raw = serde_json::to_string(&user).map_err(Error::Serialize)?;
        kv.set(AUTH_KEY, &raw)?;
        self.user = Some(user.clone());
        Ok(user)
    }

    pub fn logout<S: KvStore>(&mut self, kv: &S) -> Result<(), Error> {
        self.user = None;
        kv.remove(AUTH_KEY)
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
