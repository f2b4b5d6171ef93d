//! Default datasets
//!
//! Fixed seed documents materialized the first time a collection is read.
//! The fleet is a small Delhi NCR demo: one ops manager and two drivers,
//! one delivery in transit, and a few hours of location history per driver.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::id::unique_id;
use crate::models::{LocationSample, MoveType, PodEntry, PodStatus, UserProfile, UserRole};

/// Demo secret shared by all seeded profiles
pub const SEED_PASSWORD: &str = "demo123";

/// Samples of location history generated per seeded driver
const HISTORY_POINTS: usize = 12;

/// Seed profiles: one admin and two drivers
pub fn initial_profiles() -> Vec<UserProfile> {
    let now = Utc::now();

    let mut admin = UserProfile::with_id("admin_1", "Ops Manager", "admin@cargo.com", UserRole::Admin);
    admin.is_online = true;
    admin.set_duty_window("08:00", "18:00");

    let mut rajesh =
        UserProfile::with_id("driver_1", "Rajesh Kumar", "rajesh@cargo.com", UserRole::Driver);
    rajesh.is_online = true;
    rajesh.set_duty_window("09:00", "17:00");
    rajesh.battery_level = Some(88);
    rajesh.signal_strength = Some("Excellent".to_string());
    rajesh.current_lat = Some(28.6139);
    rajesh.current_lng = Some(77.2090);
    rajesh.last_updated = Some(now);

    let mut amit =
        UserProfile::with_id("driver_2", "Amit Singh", "amit@cargo.com", UserRole::Driver);
    amit.is_online = false;
    amit.set_duty_window("10:00", "19:00");
    amit.battery_level = Some(45);
    amit.signal_strength = Some("Weak".to_string());
    amit.current_lat = Some(28.5355);
    amit.current_lng = Some(77.3910);
    amit.last_updated = Some(now);

    vec![admin, rajesh, amit]
}

/// Seed deliveries: a single shipment already on the road
pub fn initial_pods() -> Vec<PodEntry> {
    vec![PodEntry {
        id: "pod_1".to_string(),
        awb_number: "AWB-882910".to_string(),
        move_type: MoveType::Local,
        pieces: 4,
        weight: 120.5,
        origin: "Okhla Phase III, Delhi".to_string(),
        destination: "Sector 62, Noida".to_string(),
        description: "Fragile electronic parts".to_string(),
        driver_id: "driver_1".to_string(),
        driver_name: "Rajesh Kumar".to_string(),
        status: PodStatus::InTransit,
        recipient_name: None,
        signature_url: None,
        created_at: Utc::now() - Duration::hours(1),
        delivered_at: None,
    }]
}

/// Seed location history for both drivers
pub fn initial_location_history() -> Vec<LocationSample> {
    let mut samples = generate_history("driver_1");
    samples.extend(generate_history("driver_2"));
    samples
}

/// Generate a trail of samples walking north-east from central Delhi,
/// one per hour going backwards from now
fn generate_history(driver_id: &str) -> Vec<LocationSample> {
    let start_lat = 28.6139;
    let start_lng = 77.2090;
    let now = Utc::now();

    (0..HISTORY_POINTS)
        .map(|i| LocationSample {
            id: unique_id(),
            driver_id: driver_id.to_string(),
            lat: start_lat + (i as f64 * 0.005) + (random_unit() * 0.002),
            lng: start_lng + (i as f64 * 0.005) + (random_unit() * 0.002),
            timestamp: now - Duration::hours(i as i64),
            speed: Some((random_unit() * 45.0).floor() + 15.0),
            distance_from_prev: Some(random_unit() * 2.5 + 0.5),
        })
        .collect()
}

/// Uniform-ish value in [0, 1) drawn from UUIDv4 entropy
fn random_unit() -> f64 {
    let bits = (Uuid::new_v4().as_u128() & ((1u128 << 53) - 1)) as u64;
    bits as f64 / (1u64 << 53) as f64
}
