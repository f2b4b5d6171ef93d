//! Authentication command handlers

use anyhow::{Context, Result};

use cargodesk_core::{SessionManager, Store};

use crate::output::Output;

/// Log in and persist a session
pub fn login(store: &Store, email: &str, password: &str, output: &Output) -> Result<()> {
    let sessions = SessionManager::new(store);
    let profile = sessions.login(email, password).context("Login failed")?;

    output.message(&format!("Logged in as {} ({})", profile.name, profile.role));
    Ok(())
}

/// Clear the current session
pub fn logout(store: &Store, output: &Output) -> Result<()> {
    let sessions = SessionManager::new(store);
    sessions.logout().context("Logout failed")?;

    output.message("Logged out.");
    Ok(())
}

/// Show the current session's profile
pub fn whoami(store: &Store, output: &Output) -> Result<()> {
    let sessions = SessionManager::new(store);
    let profile = sessions.current_user().context("No active session")?;

    output.print_profile(&profile);
    Ok(())
}
