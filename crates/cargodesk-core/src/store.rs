//! Collection store
//!
//! The `Store` is the single owner of the canonical collections. It is a
//! generic CRUD and query engine over the typed records in
//! [`crate::models`], built on an injected [`Substrate`].
//!
//! ## Behavior
//!
//! - A collection that has never been written is lazily seeded with its
//!   fixed default dataset, persisted, and only then returned.
//! - Query expressions evaluate in a fixed order regardless of how they
//!   were supplied: equality filters (ANDed), then one descending sort,
//!   then one limit.
//! - Writes rewrite the whole collection. That trades write efficiency for
//!   simplicity; collections stay small (one organization's fleet) and
//!   there is a single writer.
//! - The store caches nothing between calls; every read re-fetches from
//!   the substrate.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open()?;
//!
//! let drivers: Vec<UserProfile> =
//!     store.list(&[Query::equal("role", "driver")])?;
//!
//! let pod = store.create(PodEntry::new(fields))?;
//! store.update::<PodEntry>(&pod.id, &Patch::new().set("status", "in_transit"))?;
//! ```

use serde_json::{Map, Value};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{Config, DuplicateIdPolicy};
use crate::error::{StoreError, StoreResult};
use crate::models::Record;
use crate::query::{compare_values, Query};
use crate::substrate::{FileSubstrate, Substrate};

/// Generic document store over named collections
pub struct Store {
    /// Backing substrate; injected so independent instances never collide
    substrate: Box<dyn Substrate>,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store with configuration from the default location
    pub fn open() -> StoreResult<Self> {
        let config = Config::load()?;
        Self::open_with_config(config)
    }

    /// Open a file-backed store with a specific configuration
    pub fn open_with_config(config: Config) -> StoreResult<Self> {
        config.ensure_data_dir()?;
        let substrate = Box::new(FileSubstrate::new(config.substrate_dir()));
        Ok(Self::with_substrate(substrate, config))
    }

    /// Build a store over an explicit substrate
    pub fn with_substrate(substrate: Box<dyn Substrate>, config: Config) -> Self {
        Self { substrate, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Backing substrate, shared with the session manager
    pub(crate) fn substrate(&self) -> &dyn Substrate {
        self.substrate.as_ref()
    }

    /// List a collection's documents, applying query expressions
    ///
    /// Evaluation order is fixed: equality filters restrict the set (all
    /// must match), a descending order-by sorts it, a limit truncates it.
    /// Omitted categories are no-ops; filtering preserves insertion order
    /// and the sort is stable.
    pub fn list<R: Record>(&self, queries: &[Query]) -> StoreResult<Vec<R>> {
        // Emulated network latency; perceived responsiveness only, never
        // relied on for ordering.
        if self.config.simulated_latency_ms > 0 {
            thread::sleep(Duration::from_millis(self.config.simulated_latency_ms));
        }

        let docs = self.load_collection::<R>()?;
        let mut rows = docs
            .into_iter()
            .map(|doc| Ok((serde_json::to_value(&doc)?, doc)))
            .collect::<StoreResult<Vec<(Value, R)>>>()?;

        for query in queries {
            if let Query::Equal { field, value } = query {
                rows.retain(|(json, _)| json.get(field.as_str()) == Some(value));
            }
        }

        if let Some(Query::OrderDesc { field }) = queries
            .iter()
            .find(|q| matches!(q, Query::OrderDesc { .. }))
        {
            rows.sort_by(|(a, _), (b, _)| {
                compare_values(
                    b.get(field.as_str()).unwrap_or(&Value::Null),
                    a.get(field.as_str()).unwrap_or(&Value::Null),
                )
            });
        }

        if let Some(Query::Limit { count }) = queries
            .iter()
            .find(|q| matches!(q, Query::Limit { .. }))
        {
            rows.truncate(*count);
        }

        Ok(rows.into_iter().map(|(_, doc)| doc).collect())
    }

    /// Get a single document by id
    pub fn get<R: Record>(&self, id: &str) -> StoreResult<R> {
        self.load_collection::<R>()?
            .into_iter()
            .find(|doc| doc.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: R::COLLECTION.name(),
                id: id.to_string(),
            })
    }

    /// Create a document, prepending it to the collection (newest-first)
    ///
    /// A duplicate id follows the configured policy: `reject` fails the
    /// call, `overwrite` replaces the existing document.
    pub fn create<R: Record>(&self, record: R) -> StoreResult<R> {
        let mut docs = self.load_collection::<R>()?;

        if let Some(pos) = docs.iter().position(|doc| doc.id() == record.id()) {
            match self.config.duplicate_ids {
                DuplicateIdPolicy::Reject => {
                    return Err(StoreError::DuplicateId {
                        collection: R::COLLECTION.name(),
                        id: record.id().to_string(),
                    });
                }
                DuplicateIdPolicy::Overwrite => {
                    warn!(
                        collection = R::COLLECTION.name(),
                        id = record.id(),
                        "overwriting existing document with reused id"
                    );
                    docs.remove(pos);
                }
            }
        }

        record
            .validate_create(&docs)
            .map_err(|reason| StoreError::InvalidRecord {
                collection: R::COLLECTION.name(),
                reason,
            })?;

        docs.insert(0, record.clone());
        self.write_collection(&docs)?;
        debug!(
            collection = R::COLLECTION.name(),
            id = record.id(),
            "created document"
        );
        Ok(record)
    }

    /// Shallow-merge a patch onto an existing document
    ///
    /// New keys are added, patched keys overwritten, untouched keys
    /// retained. The merged record is revalidated against the pre-image
    /// and the rest of the collection before anything is rewritten.
    pub fn update<R: Record>(&self, id: &str, patch: &Patch) -> StoreResult<R> {
        let mut docs = self.load_collection::<R>()?;
        let pos = docs
            .iter()
            .position(|doc| doc.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: R::COLLECTION.name(),
                id: id.to_string(),
            })?;

        let previous = docs.remove(pos);
        let mut merged = serde_json::to_value(&previous)?;
        patch
            .apply(&mut merged)
            .map_err(|reason| StoreError::InvalidRecord {
                collection: R::COLLECTION.name(),
                reason,
            })?;

        let updated: R =
            serde_json::from_value(merged).map_err(|e| StoreError::InvalidRecord {
                collection: R::COLLECTION.name(),
                reason: e.to_string(),
            })?;

        R::validate_update(&previous, &updated, &docs).map_err(|reason| {
            StoreError::InvalidRecord {
                collection: R::COLLECTION.name(),
                reason,
            }
        })?;

        docs.insert(pos, updated.clone());
        self.write_collection(&docs)?;
        debug!(
            collection = R::COLLECTION.name(),
            id, "updated document"
        );
        Ok(updated)
    }

    /// Load a collection, seeding it on first access
    fn load_collection<R: Record>(&self) -> StoreResult<Vec<R>> {
        let key = R::COLLECTION.storage_key();
        match self.substrate.read(&key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                let seeded = R::seed();
                info!(
                    collection = R::COLLECTION.name(),
                    documents = seeded.len(),
                    "seeding collection with default dataset"
                );
                self.write_collection(&seeded)?;
                Ok(seeded)
            }
        }
    }

    /// Rewrite a collection's full document list
    fn write_collection<R: Record>(&self, docs: &[R]) -> StoreResult<()> {
        let key = R::COLLECTION.storage_key();
        let raw = serde_json::to_string(docs)?;
        self.substrate.write(&key, &raw)?;
        Ok(())
    }
}

/// A shallow set of field overrides for `update`
///
/// Keys name the serialized (wire) fields of a record, e.g. `"status"` or
/// `"deliveredAt"`. The document id (`$id`) cannot be patched.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    fields: Map<String, Value>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override one field
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merge this patch's keys over `target`
    fn apply(&self, target: &mut Value) -> Result<(), String> {
        if self.fields.contains_key("$id") {
            return Err("the document id cannot be patched".to_string());
        }
        let object = target
            .as_object_mut()
            .ok_or_else(|| "document is not an object".to_string())?;
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

impl From<Map<String, Value>> for Patch {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        LocationSample, MoveType, NewPod, PodEntry, PodStatus, UserProfile, UserRole,
    };
    use crate::substrate::MemorySubstrate;
    use chrono::Utc;
    use serde_json::json;
    use tempfile::TempDir;

    fn memory_store() -> Store {
        Store::with_substrate(Box::new(MemorySubstrate::new()), Config::default())
    }

    fn new_pod(awb: &str) -> PodEntry {
        PodEntry::new(NewPod {
            awb_number: awb.to_string(),
            move_type: MoveType::Local,
            pieces: 2,
            weight: 40.0,
            origin: "Okhla Phase III, Delhi".to_string(),
            destination: "Sector 62, Noida".to_string(),
            description: "Packing crates".to_string(),
            driver_id: "driver_2".to_string(),
            driver_name: "Amit Singh".to_string(),
        })
    }

    #[test]
    fn test_first_list_seeds_collection() {
        let store = memory_store();

        let profiles: Vec<UserProfile> = store.list(&[]).unwrap();
        assert_eq!(profiles.len(), 3);

        let pods: Vec<PodEntry> = store.list(&[]).unwrap();
        assert_eq!(pods.len(), 1);

        let history: Vec<LocationSample> = store.list(&[]).unwrap();
        assert_eq!(history.len(), 24);
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let store = memory_store();

        let first: Vec<LocationSample> = store.list(&[]).unwrap();
        let second: Vec<LocationSample> = store.list(&[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_create_then_get_is_deep_equal() {
        let store = memory_store();

        let created = store.create(new_pod("AWB-100200")).unwrap();
        let fetched: PodEntry = store.get(&created.id).unwrap();
        assert_eq!(created, fetched);
    }

    #[test]
    fn test_create_prepends_newest_first() {
        let store = memory_store();

        let a = store.create(new_pod("AWB-A")).unwrap();
        let b = store.create(new_pod("AWB-B")).unwrap();

        let pods: Vec<PodEntry> = store.list(&[]).unwrap();
        assert_eq!(pods[0].id, b.id);
        assert_eq!(pods[1].id, a.id);
        // Seeded delivery stays at the tail
        assert_eq!(pods[2].id, "pod_1");
    }

    #[test]
    fn test_get_missing_id_is_not_found() {
        let store = memory_store();

        let err = store.get::<UserProfile>("ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { collection: "profiles", .. }));

        let err = store.get::<PodEntry>("ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { collection: "pods", .. }));

        let err = store.get::<LocationSample>("ghost").unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { collection: "location_history", .. }
        ));
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let store = memory_store();
        let patch = Patch::new().set("isOnline", true);

        let err = store.update::<UserProfile>("ghost", &patch).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { collection: "profiles", .. }));

        let err = store.update::<PodEntry>("ghost", &patch).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { collection: "pods", .. }));

        let err = store.update::<LocationSample>("ghost", &patch).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { collection: "location_history", .. }
        ));
    }

    #[test]
    fn test_update_rejects_email_held_by_another_profile() {
        let store = memory_store();

        let err = store
            .update::<UserProfile>("driver_2", &Patch::new().set("email", "rajesh@cargo.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { collection: "profiles", .. }));

        // An address nobody else holds is fine, over and over
        let moved: UserProfile = store
            .update("driver_2", &Patch::new().set("email", "amit.singh@cargo.com"))
            .unwrap();
        assert_eq!(moved.email, "amit.singh@cargo.com");

        let again: UserProfile = store
            .update("driver_2", &Patch::new().set("email", "amit.singh@cargo.com"))
            .unwrap();
        assert_eq!(again.email, "amit.singh@cargo.com");
    }

    #[test]
    fn test_update_merges_shallowly() {
        let store = memory_store();
        let before: UserProfile = store.get("driver_2").unwrap();
        assert!(!before.is_online);

        let after: UserProfile = store
            .update("driver_2", &Patch::new().set("isOnline", true).set("batteryLevel", 70))
            .unwrap();

        assert!(after.is_online);
        assert_eq!(after.battery_level, Some(70));
        // Unpatched keys are unchanged
        assert_eq!(after.name, before.name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.duty_start, before.duty_start);
    }

    #[test]
    fn test_update_persists() {
        let store = memory_store();
        store
            .update::<UserProfile>("driver_2", &Patch::new().set("isOnline", true))
            .unwrap();

        let fetched: UserProfile = store.get("driver_2").unwrap();
        assert!(fetched.is_online);
    }

    #[test]
    fn test_patching_the_id_is_rejected() {
        let store = memory_store();
        let err = store
            .update::<UserProfile>("driver_2", &Patch::new().set("$id", "driver_9"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }

    fn write_query_fixture(substrate: &MemorySubstrate) {
        // Three profiles named A, B, C as the evaluation-order example
        let mut a = UserProfile::with_id("p_a", "A", "a@cargo.com", UserRole::Driver);
        let mut b = UserProfile::with_id("p_b", "B", "b@cargo.com", UserRole::Admin);
        let mut c = UserProfile::with_id("p_c", "C", "c@cargo.com", UserRole::Driver);
        a.is_online = true;
        b.is_online = true;
        c.is_online = true;
        let raw = serde_json::to_string(&vec![a, b, c]).unwrap();
        substrate.write("cargo_profiles", &raw).unwrap();
    }

    #[test]
    fn test_equality_filter_preserves_relative_order() {
        let substrate = MemorySubstrate::new();
        write_query_fixture(&substrate);
        let store = Store::with_substrate(Box::new(substrate), Config::default());

        let drivers: Vec<UserProfile> =
            store.list(&[Query::equal("role", "driver")]).unwrap();
        let names: Vec<&str> = drivers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_order_desc_applies_after_filtering() {
        let substrate = MemorySubstrate::new();
        write_query_fixture(&substrate);
        let store = Store::with_substrate(Box::new(substrate), Config::default());

        let drivers: Vec<UserProfile> = store
            .list(&[Query::equal("role", "driver"), Query::order_desc("name")])
            .unwrap();
        let names: Vec<&str> = drivers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
    }

    #[test]
    fn test_limit_applies_last() {
        let substrate = MemorySubstrate::new();
        write_query_fixture(&substrate);
        let store = Store::with_substrate(Box::new(substrate), Config::default());

        let drivers: Vec<UserProfile> = store
            .list(&[
                Query::equal("role", "driver"),
                Query::order_desc("name"),
                Query::limit(1),
            ])
            .unwrap();
        let names: Vec<&str> = drivers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["C"]);
    }

    #[test]
    fn test_query_categories_apply_in_fixed_order_regardless_of_position() {
        let substrate = MemorySubstrate::new();
        write_query_fixture(&substrate);
        let store = Store::with_substrate(Box::new(substrate), Config::default());

        // Limit listed first must still apply last
        let drivers: Vec<UserProfile> = store
            .list(&[
                Query::limit(1),
                Query::order_desc("name"),
                Query::equal("role", "driver"),
            ])
            .unwrap();
        assert_eq!(drivers[0].name, "C");
    }

    #[test]
    fn test_multiple_equality_filters_are_anded() {
        let store = memory_store();

        let online_drivers: Vec<UserProfile> = store
            .list(&[Query::equal("role", "driver"), Query::equal("isOnline", true)])
            .unwrap();
        assert_eq!(online_drivers.len(), 1);
        assert_eq!(online_drivers[0].id, "driver_1");
    }

    #[test]
    fn test_filter_history_by_driver_ordered_by_time() {
        let store = memory_store();

        let samples: Vec<LocationSample> = store
            .list(&[
                Query::equal("driverId", "driver_1"),
                Query::order_desc("timestamp"),
                Query::limit(5),
            ])
            .unwrap();

        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|s| s.driver_id == "driver_1"));
        assert!(samples.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn test_duplicate_id_rejected_by_default() {
        let store = memory_store();

        let pod = store.create(new_pod("AWB-1")).unwrap();
        let mut dup = new_pod("AWB-2");
        dup.id = pod.id.clone();

        let err = store.create(dup).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { collection: "pods", .. }));
    }

    #[test]
    fn test_duplicate_id_overwrite_policy() {
        let config = Config {
            duplicate_ids: DuplicateIdPolicy::Overwrite,
            ..Config::default()
        };
        let store = Store::with_substrate(Box::new(MemorySubstrate::new()), config);

        let pod = store.create(new_pod("AWB-1")).unwrap();
        let mut dup = new_pod("AWB-2");
        dup.id = pod.id.clone();
        store.create(dup).unwrap();

        let fetched: PodEntry = store.get(&pod.id).unwrap();
        assert_eq!(fetched.awb_number, "AWB-2");

        // The old document is gone, not shadowed
        let pods: Vec<PodEntry> = store.list(&[]).unwrap();
        assert_eq!(pods.iter().filter(|p| p.id == pod.id).count(), 1);
    }

    #[test]
    fn test_invalid_record_rejected_at_create() {
        let store = memory_store();
        let mut pod = new_pod("AWB-1");
        pod.pieces = 0;

        let err = store.create(pod).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { collection: "pods", .. }));
    }

    #[test]
    fn test_delivery_scenario() {
        let store = memory_store();
        let pod = store.create(new_pod("AWB-778899")).unwrap();
        assert_eq!(pod.status, PodStatus::Pending);

        let delivered_at = Utc::now();
        let updated: PodEntry = store
            .update(
                &pod.id,
                &Patch::new()
                    .set("status", "delivered")
                    .set("deliveredAt", json!(delivered_at))
                    .set("recipientName", "S. Gupta")
                    .set("signatureUrl", "https://placehold.co/400x200?text=Signature"),
            )
            .unwrap();

        assert_eq!(updated.status, PodStatus::Delivered);
        assert_eq!(updated.delivered_at, Some(delivered_at));
        assert_eq!(updated.recipient_name.as_deref(), Some("S. Gupta"));
        // Everything else untouched
        assert_eq!(updated.awb_number, pod.awb_number);
        assert_eq!(updated.origin, pod.origin);
        assert_eq!(updated.destination, pod.destination);
        assert_eq!(updated.driver_id, pod.driver_id);
        assert_eq!(updated.created_at, pod.created_at);
    }

    #[test]
    fn test_status_regression_rejected() {
        let store = memory_store();

        // Seeded pod_1 is already in transit
        let err = store
            .update::<PodEntry>("pod_1", &Patch::new().set("status", "pending"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }

    #[test]
    fn test_role_change_rejected() {
        let store = memory_store();

        let err = store
            .update::<UserProfile>("driver_1", &Patch::new().set("role", "admin"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }

    #[test]
    fn test_independent_stores_do_not_collide() {
        let a = memory_store();
        let b = memory_store();

        a.create(new_pod("AWB-ONLY-IN-A")).unwrap();

        let pods: Vec<PodEntry> = b.list(&[]).unwrap();
        assert!(pods.iter().all(|p| p.awb_number != "AWB-ONLY-IN-A"));
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };

        let created = {
            let store = Store::open_with_config(config.clone()).unwrap();
            store.create(new_pod("AWB-PERSIST")).unwrap()
        };

        let store = Store::open_with_config(config).unwrap();
        let fetched: PodEntry = store.get(&created.id).unwrap();
        assert_eq!(fetched, created);
    }
}
