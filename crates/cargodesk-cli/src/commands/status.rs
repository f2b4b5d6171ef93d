//! Status command handler

use anyhow::{Context, Result};

use cargodesk_core::{LocationSample, PodEntry, SessionManager, Store, UserProfile};

use crate::output::{Output, OutputFormat};

/// Show store status and collection counts
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let profiles: Vec<UserProfile> = store.list(&[]).context("Failed to list profiles")?;
    let pods: Vec<PodEntry> = store.list(&[]).context("Failed to list deliveries")?;
    let history: Vec<LocationSample> = store
        .list(&[])
        .context("Failed to list location history")?;

    let session_user = SessionManager::new(store).current_user().ok();
    let config = store.config();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "session": session_user.as_ref().map(|p| p.email.as_str()),
                    "counts": {
                        "profiles": profiles.len(),
                        "pods": pods.len(),
                        "location_history": history.len(),
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{} {} {}", profiles.len(), pods.len(), history.len());
        }
        OutputFormat::Human => {
            println!("Cargodesk Status");
            println!("================");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!();
            println!("Session:");
            match session_user {
                Some(profile) => println!("  Logged in as {} ({})", profile.email, profile.role),
                None => println!("  Not logged in"),
            }
            println!();
            println!("Contents:");
            println!("  Profiles:         {}", profiles.len());
            println!("  Deliveries:       {}", pods.len());
            println!("  Location samples: {}", history.len());
        }
    }

    Ok(())
}
