//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use cargodesk_core::{LocationSample, PodEntry, UserProfile};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a plain message (suppressed in quiet mode)
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{msg}"),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "message": msg }));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a single profile
    pub fn print_profile(&self, profile: &UserProfile) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:     {}", profile.id);
                println!("Name:   {}", profile.name);
                println!("Email:  {}", profile.email);
                println!("Role:   {}", profile.role);
                println!(
                    "Duty:   {} - {} ({})",
                    profile.duty_start,
                    profile.duty_end,
                    if profile.is_online { "online" } else { "offline" }
                );
                if let Some(battery) = profile.battery_level {
                    println!("Device: {}% battery, {} signal",
                        battery,
                        profile.signal_strength.as_deref().unwrap_or("unknown"));
                }
                if let (Some(lat), Some(lng)) = (profile.current_lat, profile.current_lng) {
                    println!("Last position: {lat:.4}, {lng:.4}");
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(profile).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", profile.id);
            }
        }
    }

    /// Print a list of profiles
    pub fn print_profiles(&self, profiles: &[UserProfile]) {
        match self.format {
            OutputFormat::Human => {
                if profiles.is_empty() {
                    println!("No profiles found.");
                    return;
                }
                for profile in profiles {
                    println!(
                        "{} | {} | {} | {}",
                        profile.id,
                        truncate(&profile.name, 24),
                        profile.role,
                        if profile.is_online { "online" } else { "offline" }
                    );
                }
                println!("\n{} profile(s)", profiles.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(profiles).unwrap());
            }
            OutputFormat::Quiet => {
                for profile in profiles {
                    println!("{}", profile.id);
                }
            }
        }
    }

    /// Print a single delivery
    pub fn print_pod(&self, pod: &PodEntry) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", pod.id);
                println!("AWB:         {}", pod.awb_number);
                println!("Move:        {} | {} pc | {} kg", pod.move_type, pod.pieces, pod.weight);
                println!("From:        {}", pod.origin);
                println!("To:          {}", pod.destination);
                if !pod.description.is_empty() {
                    println!("Cargo:       {}", pod.description);
                }
                println!("Driver:      {} ({})", pod.driver_name, pod.driver_id);
                println!("Status:      {}", pod.status);
                println!("Created:     {}", pod.created_at.format("%Y-%m-%d %H:%M"));
                if let Some(delivered_at) = pod.delivered_at {
                    println!("Delivered:   {}", delivered_at.format("%Y-%m-%d %H:%M"));
                }
                if let Some(ref recipient) = pod.recipient_name {
                    println!("Recipient:   {}", recipient);
                }
                if let Some(ref url) = pod.signature_url {
                    println!("Signature:   {}", url);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(pod).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", pod.id);
            }
        }
    }

    /// Print a list of deliveries
    pub fn print_pods(&self, pods: &[PodEntry]) {
        match self.format {
            OutputFormat::Human => {
                if pods.is_empty() {
                    println!("No deliveries found.");
                    return;
                }
                for pod in pods {
                    println!(
                        "{} | {} | {} | {} -> {} | {}",
                        pod.id,
                        pod.awb_number,
                        pod.status,
                        truncate(&pod.origin, 24),
                        truncate(&pod.destination, 24),
                        pod.driver_name
                    );
                }
                println!("\n{} deliver(ies)", pods.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(pods).unwrap());
            }
            OutputFormat::Quiet => {
                for pod in pods {
                    println!("{}", pod.id);
                }
            }
        }
    }

    /// Print a trail of location samples
    pub fn print_samples(&self, samples: &[LocationSample]) {
        match self.format {
            OutputFormat::Human => {
                if samples.is_empty() {
                    println!("No location history.");
                    return;
                }
                for sample in samples {
                    let speed = sample
                        .speed
                        .map(|s| format!("{s:.0} km/h"))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{} | {:.4}, {:.4} | {}",
                        sample.timestamp.format("%Y-%m-%d %H:%M"),
                        sample.lat,
                        sample.lng,
                        speed
                    );
                }
                println!("\n{} sample(s)", samples.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(samples).unwrap());
            }
            OutputFormat::Quiet => {
                for sample in samples {
                    println!("{}", sample.id);
                }
            }
        }
    }
}

/// Truncate a string to a maximum display width
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
