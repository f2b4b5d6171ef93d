//! Delivery command handlers

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;

use cargodesk_core::{MoveType, NewPod, Patch, PodEntry, Query, Store, UserProfile};

use crate::output::Output;

/// Arguments for `pod create`
pub struct CreateArgs {
    pub awb: String,
    pub move_type: String,
    pub pieces: u32,
    pub weight: f64,
    pub origin: String,
    pub destination: String,
    pub description: String,
    pub driver: String,
}

/// List deliveries, optionally filtered by driver and status
pub fn list(
    store: &Store,
    driver: Option<String>,
    status: Option<String>,
    limit: Option<usize>,
    output: &Output,
) -> Result<()> {
    let mut queries = Vec::new();
    if let Some(driver_id) = driver {
        queries.push(Query::equal("driverId", driver_id));
    }
    if let Some(status) = status {
        queries.push(Query::equal("status", status));
    }
    queries.push(Query::order_desc("createdAt"));
    if let Some(limit) = limit {
        queries.push(Query::limit(limit));
    }

    let pods: Vec<PodEntry> = store.list(&queries).context("Failed to list deliveries")?;
    output.print_pods(&pods);
    Ok(())
}

/// Show one delivery
pub fn show(store: &Store, id: &str, output: &Output) -> Result<()> {
    let pod: PodEntry = store.get(id).context("Failed to get delivery")?;
    output.print_pod(&pod);
    Ok(())
}

/// Create a new pending delivery assigned to a driver
pub fn create(store: &Store, args: CreateArgs, output: &Output) -> Result<()> {
    let move_type: MoveType = args
        .move_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // Resolve the driver to denormalize the display name
    let driver: UserProfile = store.get(&args.driver).context("Unknown driver id")?;

    let pod = store
        .create(PodEntry::new(NewPod {
            awb_number: args.awb,
            move_type,
            pieces: args.pieces,
            weight: args.weight,
            origin: args.origin,
            destination: args.destination,
            description: args.description,
            driver_id: driver.id.clone(),
            driver_name: driver.name.clone(),
        }))
        .context("Failed to create delivery")?;

    output.print_pod(&pod);
    Ok(())
}

/// Move a delivery to in_transit
pub fn dispatch(store: &Store, id: &str, output: &Output) -> Result<()> {
    let pod: PodEntry = store
        .update(id, &Patch::new().set("status", "in_transit"))
        .context("Failed to dispatch delivery")?;

    output.print_pod(&pod);
    Ok(())
}

/// Complete a delivery with recipient and optional signature
pub fn deliver(
    store: &Store,
    id: &str,
    recipient: &str,
    signature: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut patch = Patch::new()
        .set("status", "delivered")
        .set("deliveredAt", json!(Utc::now()))
        .set("recipientName", recipient);
    if let Some(url) = signature {
        patch = patch.set("signatureUrl", url);
    }

    let pod: PodEntry = store
        .update(id, &patch)
        .context("Failed to mark delivery as delivered")?;

    output.print_pod(&pod);
    Ok(())
}
