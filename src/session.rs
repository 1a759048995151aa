//! Owner identity management.
//!
//! Owner resolution order:
//! 1) CLI --owner (explicit)
//! 2) TSK_OWNER environment variable
//! 3) Persisted session file in the data dir
//!
//! Commands that touch tasks require a resolved owner; resolving nothing is
//! an auth error, not a default identity.

use std::path::Path;

use crate::error::{Error, Result};

pub const OWNER_ENV: &str = "TSK_OWNER";

/// Where a resolved owner came from, for `whoami` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerSource {
    Flag,
    Environment,
    Session,
}

impl OwnerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerSource::Flag => "flag",
            OwnerSource::Environment => "environment",
            OwnerSource::Session => "session",
        }
    }
}

/// Resolve the current owner using CLI flag, environment, and session file.
pub fn resolve_owner(
    session_file: &Path,
    cli_owner: Option<&str>,
) -> Result<(String, OwnerSource)> {
    if let Some(owner) = non_empty(cli_owner) {
        return Ok((owner.to_string(), OwnerSource::Flag));
    }

    if let Ok(env_owner) = std::env::var(OWNER_ENV) {
        if let Some(owner) = non_empty(Some(env_owner.as_str())) {
            return Ok((owner.to_string(), OwnerSource::Environment));
        }
    }

    if let Some(owner) = load_session(session_file)? {
        return Ok((owner, OwnerSource::Session));
    }

    Err(Error::Auth(
        "no owner; run `tsk login <owner>` or pass --owner".to_string(),
    ))
}

/// Read the persisted session, if any.
pub fn load_session(session_file: &Path) -> Result<Option<String>> {
    if !session_file.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(session_file)?;
    Ok(non_empty(Some(content.as_str())).map(|owner| owner.to_string()))
}

/// Sign in: persist the owner identity.
pub fn login(session_file: &Path, owner: &str) -> Result<String> {
    let owner = non_empty(Some(owner))
        .ok_or_else(|| Error::InvalidArgument("owner name cannot be empty".to_string()))?;

    if let Some(parent) = session_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(session_file, format!("{owner}\n"))?;
    Ok(owner.to_string())
}

/// Sign out: remove the persisted session. Returns the owner that was
/// signed in, if any. The caller clears any in-memory collection.
pub fn logout(session_file: &Path) -> Result<Option<String>> {
    let previous = load_session(session_file)?;
    if session_file.exists() {
        std::fs::remove_file(session_file)?;
    }
    Ok(previous)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
