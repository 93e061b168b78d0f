//! Authenticated session context for the CLI.
//!
//! A [`Session`] is created once at startup from the stored session file (or
//! the `GEOTRACK_API_TOKEN` fallback) and handed to every command handler.
//! `login` verifies a token against the backend before persisting it;
//! `logout` removes the stored file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use geotrack_api::ApiClient;
use geotrack_core::{AppConfig, AuthUser};
use serde::{Deserialize, Serialize};

use crate::output::print_json;

const SESSION_DIR: &str = "geotrack";
const SESSION_FILE: &str = "session.json";

/// On-disk form of a logged-in session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub saved_at: Option<String>,
}

/// Where the session file lives unless `GEOTRACK_SESSION_PATH` overrides it.
pub(crate) fn default_session_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SESSION_DIR).join(SESSION_FILE))
}

/// Reads a stored session. A missing file is `None`; an unreadable or
/// corrupt one is logged and ignored so a bad file never blocks the CLI.
fn read_stored(path: &Path) -> Option<StoredSession> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read session file");
            return None;
        }
    };
    match serde_json::from_str::<StoredSession>(&raw) {
        Ok(stored) if !stored.token.trim().is_empty() => Some(stored),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
            None
        }
    }
}

fn write_stored(path: &Path, stored: &StoredSession) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating session directory {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(stored)?;
    std::fs::write(path, body)
        .with_context(|| format!("writing session file {}", path.display()))?;
    restrict_permissions(path)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("restricting permissions on {}", path.display()))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}

/// The caller's identity and the API client that carries it.
#[derive(Debug)]
pub struct Session {
    path: Option<PathBuf>,
    base: ApiClient,
    client: ApiClient,
    user: Option<AuthUser>,
}

impl Session {
    /// Builds the session from config and whatever is stored on disk.
    ///
    /// A stored token wins over `GEOTRACK_API_TOKEN`. The stored user is
    /// trusted as-is; it is re-verified only by `whoami`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built from `config`.
    pub fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let path = config.session_path.clone().or_else(default_session_path);
        let base = ApiClient::from_config(config)?.with_token(None);
        let stored = path.as_deref().and_then(read_stored);

        let (token, user) = match stored {
            Some(stored) => (Some(stored.token), stored.user),
            None => (config.api_token.clone(), None),
        };
        let client = base.clone().with_token(token);
        tracing::debug!(
            authenticated = client.has_token(),
            path = ?path,
            "session initialized"
        );

        Ok(Self {
            path,
            base,
            client,
            user,
        })
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.client.has_token()
    }

    /// Verifies `token` and, if accepted, makes it the active credential and
    /// stores it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the token, the request fails,
    /// or the session file cannot be written.
    pub async fn login(&mut self, token: &str) -> anyhow::Result<&AuthUser> {
        let candidate = self.base.clone().with_token(Some(token.trim().to_string()));
        anyhow::ensure!(candidate.has_token(), "token must not be blank");

        let user = candidate
            .verify_token()
            .await?
            .ok_or_else(|| anyhow::anyhow!("token was rejected by the server"))?;

        if let Some(path) = &self.path {
            let stored = StoredSession {
                token: token.trim().to_string(),
                user: Some(user.clone()),
                saved_at: Some(Utc::now().to_rfc3339()),
            };
            write_stored(path, &stored)?;
        } else {
            tracing::warn!("no config directory available; session will not persist");
        }

        tracing::info!(email = %user.email, "logged in");
        self.client = candidate;
        Ok(&*self.user.insert(user))
    }

    /// Re-checks the active token with the backend and refreshes the cached
    /// user. Returns `None` when there is no token or it is no longer valid.
    ///
    /// # Errors
    ///
    /// Network and unexpected server errors.
    pub async fn refresh_user(&mut self) -> anyhow::Result<Option<&AuthUser>> {
        self.user = self.client.verify_token().await?;
        Ok(self.user.as_ref())
    }

    /// Drops the credential and deletes the session file. Returns whether a
    /// stored session existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file exists but cannot be removed.
    pub fn logout(&mut self) -> anyhow::Result<bool> {
        self.client = self.base.clone();
        self.user = None;
        let Some(path) = &self.path else {
            return Ok(false);
        };
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "session removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("removing session file {}", path.display()))
            }
        }
    }

    /// Ends the process-level session. Nothing is persisted here: `login`
    /// and `logout` write through immediately.
    pub fn teardown(self) {
        tracing::debug!(authenticated = self.client.has_token(), "session closed");
    }
}

/// Sub-commands available under `session`.
#[derive(Debug, Subcommand)]
pub enum SessionCommands {
    /// Verify an API token and store it for later commands
    Login {
        /// Bearer token issued by the backend
        #[arg(env = "GEOTRACK_LOGIN_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Show who the stored token belongs to
    Whoami,
    /// Forget the stored token
    Logout,
}

fn print_user(user: &AuthUser) {
    println!("Email:    {}", user.email);
    if let Some(name) = &user.name {
        println!("Name:     {name}");
    }
    if let Some(company) = &user.company {
        println!("Company:  {company}");
    }
    println!("Role:     {}", user.role.as_deref().unwrap_or("-"));
    println!(
        "Admin:    {}",
        if user.has_admin_access() { "yes" } else { "no" }
    );
}

pub(crate) async fn run_session_login(
    session: &mut Session,
    token: &str,
    json: bool,
) -> anyhow::Result<()> {
    let user = session.login(token).await?;
    if json {
        return print_json(user);
    }
    println!("logged in as {}", user.email);
    Ok(())
}

pub(crate) async fn run_session_whoami(session: &mut Session, json: bool) -> anyhow::Result<()> {
    if !session.is_authenticated() {
        println!("not logged in");
        return Ok(());
    }
    match session.refresh_user().await? {
        Some(user) if json => print_json(user),
        Some(user) => {
            print_user(user);
            Ok(())
        }
        None => {
            println!("stored token is no longer valid; log in again");
            Ok(())
        }
    }
}

pub(crate) fn run_session_logout(session: &mut Session) -> anyhow::Result<()> {
    if session.logout()? {
        println!("logged out");
    } else {
        println!("no stored session");
    }
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
