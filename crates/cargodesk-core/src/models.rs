//! Data models for Cargodesk
//!
//! Defines the typed records behind each collection: user profiles,
//! delivery (POD) entries, and driver location samples. Field names on the
//! wire match the emulated service's persisted layout (`$id`, camelCase,
//! RFC 3339 timestamps), so a substrate written by this store is readable
//! by anything expecting that layout.
//!
//! Records are validated at the store boundary, not on construction, so a
//! half-built record can exist in memory but never reaches the substrate.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::id::unique_id;
use crate::seed;

/// The named collections this store manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    Pods,
    LocationHistory,
}

impl Collection {
    /// Collection name as consumers address it
    pub fn name(self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Pods => "pods",
            Collection::LocationHistory => "location_history",
        }
    }

    /// Substrate key holding this collection's document list
    pub fn storage_key(self) -> String {
        format!("cargo_{}", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed document belonging to one collection
///
/// The store is generic over this trait: it knows how to seed, validate,
/// and address a collection purely through the implementing type.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// The collection this record type lives in
    const COLLECTION: Collection;

    /// Unique document id within the collection
    fn id(&self) -> &str;

    /// Structural validation, applied on create and after update merges.
    /// Returns a human-readable reason on failure.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Validation against the rest of the collection on create
    fn validate_create(&self, existing: &[Self]) -> Result<(), String> {
        let _ = existing;
        self.validate()
    }

    /// Validation of an update against the pre-image and the rest of the
    /// collection (the document being updated is not in `others`)
    fn validate_update(previous: &Self, updated: &Self, others: &[Self]) -> Result<(), String> {
        let _ = (previous, others);
        updated.validate()
    }

    /// Default documents materialized the first time the collection is read
    fn seed() -> Vec<Self>;
}

/// Role of a system user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Driver,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Driver => write!(f, "driver"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "driver" => Ok(UserRole::Driver),
            other => Err(format!("unknown role '{other}' (expected admin or driver)")),
        }
    }
}

/// Lifecycle status of a delivery
///
/// Transitions are monotonic: `pending` -> `in_transit` -> `delivered`,
/// never backwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PodStatus {
    Pending,
    InTransit,
    Delivered,
}

impl PodStatus {
    fn rank(self) -> u8 {
        match self {
            PodStatus::Pending => 0,
            PodStatus::InTransit => 1,
            PodStatus::Delivered => 2,
        }
    }

    /// Whether moving to `next` is allowed (same status counts as allowed)
    pub fn can_transition_to(self, next: PodStatus) -> bool {
        next.rank() >= self.rank()
    }
}

impl fmt::Display for PodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodStatus::Pending => write!(f, "pending"),
            PodStatus::InTransit => write!(f, "in_transit"),
            PodStatus::Delivered => write!(f, "delivered"),
        }
    }
}

impl FromStr for PodStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PodStatus::Pending),
            "in_transit" => Ok(PodStatus::InTransit),
            "delivered" => Ok(PodStatus::Delivered),
            other => Err(format!(
                "unknown status '{other}' (expected pending, in_transit or delivered)"
            )),
        }
    }
}

/// Kind of shipment move
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveType {
    Local,
    International,
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveType::Local => write!(f, "local"),
            MoveType::International => write!(f, "international"),
        }
    }
}

impl FromStr for MoveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(MoveType::Local),
            "international" => Ok(MoveType::International),
            other => Err(format!(
                "unknown move type '{other}' (expected local or international)"
            )),
        }
    }
}

/// Identity record for a system user
///
/// Carries no credential material; secrets live in the credential
/// registry under a separate substrate key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique identifier
    #[serde(rename = "$id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Login key, unique within the collection
    pub email: String,
    /// Role, immutable after creation
    pub role: UserRole,
    /// Whether the user is currently on shift
    pub is_online: bool,
    /// Duty window start, "HH:MM"
    pub duty_start: String,
    /// Duty window end, "HH:MM"
    pub duty_end: String,
    /// Device battery percentage (drivers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
    /// Signal strength label (drivers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<String>,
    /// Last known latitude (drivers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_lat: Option<f64>,
    /// Last known longitude (drivers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_lng: Option<f64>,
    /// When the position was last reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Create a profile with a generated id
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self::with_id(unique_id(), name, email, role)
    }

    /// Create a profile with a caller-supplied id
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            is_online: false,
            duty_start: "09:00".to_string(),
            duty_end: "17:00".to_string(),
            battery_level: None,
            signal_strength: None,
            current_lat: None,
            current_lng: None,
            last_updated: None,
        }
    }

    /// Set the duty window
    pub fn set_duty_window(&mut self, start: impl Into<String>, end: impl Into<String>) {
        self.duty_start = start.into();
        self.duty_end = end.into();
    }

    /// Record a position report
    pub fn set_position(&mut self, lat: f64, lng: f64) {
        self.current_lat = Some(lat);
        self.current_lng = Some(lng);
        self.last_updated = Some(Utc::now());
    }
}

impl Record for UserProfile {
    const COLLECTION: Collection = Collection::Profiles;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if !self.email.contains('@') {
            return Err(format!("'{}' is not a valid email address", self.email));
        }
        Ok(())
    }

    fn validate_create(&self, existing: &[Self]) -> Result<(), String> {
        self.validate()?;
        if existing.iter().any(|p| p.email == self.email) {
            return Err(format!("email '{}' is already registered", self.email));
        }
        Ok(())
    }

    fn validate_update(previous: &Self, updated: &Self, others: &[Self]) -> Result<(), String> {
        updated.validate()?;
        if previous.role != updated.role {
            return Err("role is immutable after creation".to_string());
        }
        if others.iter().any(|p| p.email == updated.email) {
            return Err(format!("email '{}' is already registered", updated.email));
        }
        Ok(())
    }

    fn seed() -> Vec<Self> {
        seed::initial_profiles()
    }
}

/// A shipment/delivery unit (proof-of-delivery entry)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodEntry {
    /// Unique identifier
    #[serde(rename = "$id")]
    pub id: String,
    /// Waybill number
    pub awb_number: String,
    /// Local vs international move
    pub move_type: MoveType,
    /// Piece count, at least 1
    pub pieces: u32,
    /// Total weight in kg, positive
    pub weight: f64,
    /// Origin address
    pub origin: String,
    /// Destination address
    pub destination: String,
    /// Free-text cargo description
    pub description: String,
    /// Assigned driver's profile id
    pub driver_id: String,
    /// Denormalized driver display name
    pub driver_name: String,
    /// Delivery lifecycle status
    pub status: PodStatus,
    /// Who signed for it; only once delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    /// Signature artifact reference; only once delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Delivery time; present iff status is delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Fields a caller supplies when opening a new delivery
pub struct NewPod {
    pub awb_number: String,
    pub move_type: MoveType,
    pub pieces: u32,
    pub weight: f64,
    pub origin: String,
    pub destination: String,
    pub description: String,
    pub driver_id: String,
    pub driver_name: String,
}

impl PodEntry {
    /// Create a pending delivery with a generated id
    pub fn new(fields: NewPod) -> Self {
        Self::with_id(unique_id(), fields)
    }

    /// Create a pending delivery with a caller-supplied id
    pub fn with_id(id: impl Into<String>, fields: NewPod) -> Self {
        Self {
            id: id.into(),
            awb_number: fields.awb_number,
            move_type: fields.move_type,
            pieces: fields.pieces,
            weight: fields.weight,
            origin: fields.origin,
            destination: fields.destination,
            description: fields.description,
            driver_id: fields.driver_id,
            driver_name: fields.driver_name,
            status: PodStatus::Pending,
            recipient_name: None,
            signature_url: None,
            created_at: Utc::now(),
            delivered_at: None,
        }
    }
}

impl Record for PodEntry {
    const COLLECTION: Collection = Collection::Pods;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        if self.awb_number.trim().is_empty() {
            return Err("waybill number must not be empty".to_string());
        }
        if self.pieces == 0 {
            return Err("piece count must be positive".to_string());
        }
        if !(self.weight > 0.0) {
            return Err("weight must be positive".to_string());
        }
        let delivered = self.status == PodStatus::Delivered;
        if self.delivered_at.is_some() != delivered {
            return Err(format!(
                "deliveredAt must be present exactly when status is delivered (status is {})",
                self.status
            ));
        }
        if !delivered && (self.recipient_name.is_some() || self.signature_url.is_some()) {
            return Err("recipient and signature are only set on delivery".to_string());
        }
        Ok(())
    }

    fn validate_update(previous: &Self, updated: &Self, others: &[Self]) -> Result<(), String> {
        let _ = others;
        updated.validate()?;
        if !previous.status.can_transition_to(updated.status) {
            return Err(format!(
                "status cannot regress from {} to {}",
                previous.status, updated.status
            ));
        }
        Ok(())
    }

    fn seed() -> Vec<Self> {
        seed::initial_pods()
    }
}

/// A point in a driver's movement history
///
/// Append-only by convention; consumers order by timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    /// Unique identifier
    #[serde(rename = "$id")]
    pub id: String,
    /// Owning driver's profile id
    pub driver_id: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
    /// Instantaneous speed in km/h, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Distance from the previous sample in km, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_from_prev: Option<f64>,
}

impl LocationSample {
    /// Create a sample taken now, with a generated id
    pub fn new(driver_id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: unique_id(),
            driver_id: driver_id.into(),
            lat,
            lng,
            timestamp: Utc::now(),
            speed: None,
            distance_from_prev: None,
        }
    }
}

impl Record for LocationSample {
    const COLLECTION: Collection = Collection::LocationHistory;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} out of range", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!("longitude {} out of range", self.lng));
        }
        Ok(())
    }

    fn seed() -> Vec<Self> {
        seed::initial_location_history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_storage_keys() {
        assert_eq!(Collection::Profiles.storage_key(), "cargo_profiles");
        assert_eq!(Collection::Pods.storage_key(), "cargo_pods");
        assert_eq!(
            Collection::LocationHistory.storage_key(),
            "cargo_location_history"
        );
    }

    #[test]
    fn test_profile_wire_format() {
        let profile = UserProfile::with_id("admin_1", "Ops Manager", "admin@cargo.com", UserRole::Admin);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["$id"], "admin_1");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["dutyStart"], "09:00");
        assert!(json.get("isOnline").is_some());
        // Absent driver-only fields are omitted entirely
        assert!(json.get("batteryLevel").is_none());
        // No credential material on the profile
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_profile_email_validation() {
        let mut profile = UserProfile::new("X", "not-an-email", UserRole::Driver);
        assert!(profile.validate().is_err());
        profile.email = "x@cargo.com".to_string();
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_profile_duplicate_email_rejected_on_create() {
        let a = UserProfile::new("A", "dup@cargo.com", UserRole::Driver);
        let b = UserProfile::new("B", "dup@cargo.com", UserRole::Driver);
        assert!(b.validate_create(&[a]).is_err());
    }

    #[test]
    fn test_profile_role_is_immutable() {
        let before = UserProfile::new("A", "a@cargo.com", UserRole::Driver);
        let mut after = before.clone();
        after.role = UserRole::Admin;
        assert!(UserProfile::validate_update(&before, &after, &[]).is_err());

        after.role = UserRole::Driver;
        after.is_online = true;
        assert!(UserProfile::validate_update(&before, &after, &[]).is_ok());
    }

    #[test]
    fn test_profile_update_rejects_email_held_by_another() {
        let taken = UserProfile::new("B", "b@cargo.com", UserRole::Driver);
        let before = UserProfile::new("A", "a@cargo.com", UserRole::Driver);
        let mut after = before.clone();
        after.email = "b@cargo.com".to_string();
        assert!(UserProfile::validate_update(&before, &after, &[taken.clone()]).is_err());

        after.email = "fresh@cargo.com".to_string();
        assert!(UserProfile::validate_update(&before, &after, &[taken]).is_ok());
    }

    #[test]
    fn test_status_transitions_are_monotonic() {
        assert!(PodStatus::Pending.can_transition_to(PodStatus::InTransit));
        assert!(PodStatus::InTransit.can_transition_to(PodStatus::Delivered));
        assert!(PodStatus::Pending.can_transition_to(PodStatus::Delivered));
        assert!(PodStatus::InTransit.can_transition_to(PodStatus::InTransit));
        assert!(!PodStatus::Delivered.can_transition_to(PodStatus::InTransit));
        assert!(!PodStatus::InTransit.can_transition_to(PodStatus::Pending));
    }

    fn sample_pod() -> PodEntry {
        PodEntry::new(NewPod {
            awb_number: "AWB-1001".to_string(),
            move_type: MoveType::Local,
            pieces: 2,
            weight: 18.5,
            origin: "Okhla Phase III, Delhi".to_string(),
            destination: "Sector 62, Noida".to_string(),
            description: "Machine spares".to_string(),
            driver_id: "driver_1".to_string(),
            driver_name: "Rajesh Kumar".to_string(),
        })
    }

    #[test]
    fn test_pod_starts_pending_and_valid() {
        let pod = sample_pod();
        assert_eq!(pod.status, PodStatus::Pending);
        assert!(pod.delivered_at.is_none());
        assert!(pod.validate().is_ok());
    }

    #[test]
    fn test_pod_delivered_requires_timestamp() {
        let mut pod = sample_pod();
        pod.status = PodStatus::Delivered;
        assert!(pod.validate().is_err());

        pod.delivered_at = Some(Utc::now());
        assert!(pod.validate().is_ok());
    }

    #[test]
    fn test_pod_recipient_only_when_delivered() {
        let mut pod = sample_pod();
        pod.recipient_name = Some("S. Gupta".to_string());
        assert!(pod.validate().is_err());
    }

    #[test]
    fn test_pod_rejects_zero_pieces_and_weight() {
        let mut pod = sample_pod();
        pod.pieces = 0;
        assert!(pod.validate().is_err());

        let mut pod = sample_pod();
        pod.weight = 0.0;
        assert!(pod.validate().is_err());
    }

    #[test]
    fn test_pod_status_regression_rejected_on_update() {
        let before = sample_pod();
        let mut in_transit = before.clone();
        in_transit.status = PodStatus::InTransit;
        assert!(PodEntry::validate_update(&before, &in_transit, &[]).is_ok());

        let mut regressed = in_transit.clone();
        regressed.status = PodStatus::Pending;
        assert!(PodEntry::validate_update(&in_transit, &regressed, &[]).is_err());
    }

    #[test]
    fn test_pod_status_wire_names() {
        assert_eq!(
            serde_json::to_value(PodStatus::InTransit).unwrap(),
            serde_json::json!("in_transit")
        );
        assert_eq!("in_transit".parse::<PodStatus>().unwrap(), PodStatus::InTransit);
    }

    #[test]
    fn test_location_sample_range_checks() {
        let mut sample = LocationSample::new("driver_1", 28.6139, 77.2090);
        assert!(sample.validate().is_ok());

        sample.lat = 91.0;
        assert!(sample.validate().is_err());
    }

    #[test]
    fn test_pod_serialization_round_trip() {
        let pod = sample_pod();
        let json = serde_json::to_string(&pod).unwrap();
        let back: PodEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(pod, back);
    }
}
