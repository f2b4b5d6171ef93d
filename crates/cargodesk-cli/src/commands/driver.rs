//! Driver command handlers

use anyhow::{Context, Result};
use serde_json::json;

use cargodesk_core::{
    CredentialRegistry, LocationSample, Patch, Query, Store, UserProfile, UserRole,
};

use crate::output::Output;

/// List all driver profiles
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let drivers: Vec<UserProfile> = store
        .list(&[Query::equal("role", "driver")])
        .context("Failed to list drivers")?;

    output.print_profiles(&drivers);
    Ok(())
}

/// Register a new driver profile with its login secret
pub fn add(store: &Store, name: &str, email: &str, password: &str, output: &Output) -> Result<()> {
    let profile = store
        .create(UserProfile::new(name, email, UserRole::Driver))
        .context("Failed to create driver profile")?;

    CredentialRegistry::new(store)
        .set_secret(email, password)
        .context("Failed to store driver credentials")?;

    output.print_profile(&profile);
    Ok(())
}

/// Show a driver's most recent location samples
pub fn track(store: &Store, id: &str, limit: usize, output: &Output) -> Result<()> {
    // Fails early with NotFound if the driver doesn't exist
    let driver: UserProfile = store.get(id).context("Unknown driver id")?;

    let samples: Vec<LocationSample> = store
        .list(&[
            Query::equal("driverId", driver.id.as_str()),
            Query::order_desc("timestamp"),
            Query::limit(limit),
        ])
        .context("Failed to load location history")?;

    output.print_samples(&samples);
    Ok(())
}

/// Append a position report and refresh the driver's profile telemetry
pub fn report(
    store: &Store,
    id: &str,
    lat: f64,
    lng: f64,
    speed: Option<f64>,
    output: &Output,
) -> Result<()> {
    let driver: UserProfile = store.get(id).context("Unknown driver id")?;

    let mut sample = LocationSample::new(driver.id.clone(), lat, lng);
    sample.speed = speed;
    let sample = store
        .create(sample)
        .context("Failed to record location sample")?;

    store
        .update::<UserProfile>(
            &driver.id,
            &Patch::new()
                .set("currentLat", lat)
                .set("currentLng", lng)
                .set("lastUpdated", json!(sample.timestamp))
                .set("isOnline", true),
        )
        .context("Failed to update driver position")?;

    output.message(&format!(
        "Recorded position {lat:.4}, {lng:.4} for {}",
        driver.name
    ));
    Ok(())
}
