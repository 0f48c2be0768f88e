//! # Session Identity
//!
//! Every chat request carries a `(sessionId, userId)` pair. Both are random
//! UUIDs created the first time they are needed and then reused forever
//! within the same storage scope.
//!
//! The pair is persisted as a small JSON object at `~/.everest/identity.json`:
//!
//! ```json
//! { "ev_session_id": "…", "ev_user_id": "…" }
//! ```
//!
//! Each key is generated independently if absent. Writes use atomic rename
//! (write `.tmp`, then `rename()`).

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const SESSION_KEY: &str = "ev_session_id";
pub const USER_KEY: &str = "ev_user_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub session_id: String,
    pub user_id: String,
}

impl Identity {
    /// A fresh, unpersisted identity.
    pub fn generate() -> Self {
        Self {
            session_id: new_id(),
            user_id: new_id(),
        }
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug)]
pub enum IdentityError {
    NoHome,
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::NoHome => write!(f, "could not determine home directory"),
            IdentityError::Io(e) => write!(f, "identity I/O error: {e}"),
            IdentityError::Parse(e) => write!(f, "identity file is malformed: {e}"),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Source of the session/user identifiers.
///
/// Injected into the widget so tests can substitute a fixed pair.
pub trait IdentityProvider: Send + Sync {
    /// Returns the stored identity, creating and persisting any missing id.
    fn identity(&self) -> Result<Identity, IdentityError>;
}

/// Always returns the same identity. Nothing is persisted.
pub struct FixedIdentity(pub Identity);

impl IdentityProvider for FixedIdentity {
    fn identity(&self) -> Result<Identity, IdentityError> {
        Ok(self.0.clone())
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
struct StoredIdentity {
    #[serde(rename = "ev_session_id", default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(rename = "ev_user_id", default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

/// File-backed identity storage. One file is one storage scope.
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.everest/identity.json`.
    pub fn default_location() -> Result<Self, IdentityError> {
        let home = dirs::home_dir().ok_or(IdentityError::NoHome)?;
        Ok(Self::new(home.join(".everest").join("identity.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredIdentity, IdentityError> {
        if !self.path.exists() {
            return Ok(StoredIdentity::default());
        }
        let json = fs::read_to_string(&self.path).map_err(IdentityError::Io)?;
        if json.trim().is_empty() {
            return Ok(StoredIdentity::default());
        }
        serde_json::from_str(&json).map_err(IdentityError::Parse)
    }

    fn write(&self, stored: &StoredIdentity) -> Result<(), IdentityError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(IdentityError::Io)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(stored).map_err(IdentityError::Parse)?;
        fs::write(&tmp_path, json).map_err(IdentityError::Io)?;
        fs::rename(&tmp_path, &self.path).map_err(IdentityError::Io)?;
        Ok(())
    }
}

impl IdentityProvider for FileIdentityStore {
    fn identity(&self) -> Result<Identity, IdentityError> {
        let mut stored = self.read()?;
        let mut changed = false;

        let session_id = match stored.session_id.clone().filter(|s| !s.is_empty()) {
            Some(id) => id,
            None => {
                changed = true;
                stored.session_id.insert(new_id()).clone()
            }
        };
        let user_id = match stored.user_id.clone().filter(|s| !s.is_empty()) {
            Some(id) => id,
            None => {
                changed = true;
                stored.user_id.insert(new_id()).clone()
            }
        };

        if changed {
            self.write(&stored)?;
            info!("Created identity at {}", self.path.display());
        } else {
            debug!("Loaded identity from {}", self.path.display());
        }

        Ok(Identity {
            session_id,
            user_id,
        })
    }
}
