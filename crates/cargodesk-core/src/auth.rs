//! Credential registry
//!
//! Secrets never live on profile documents; they are kept in a dedicated
//! substrate key as salted, iterated SHA-256 hashes. `list`/`get` results
//! therefore cannot leak credential material.
//!
//! Stored format per entry: `v1$<iterations>$<salt_b64>$<digest_b64>`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::seed;
use crate::store::Store;
use crate::substrate::Substrate;

/// Substrate key holding the email -> hash map
const CREDENTIALS_KEY: &str = "cargo_credentials";

/// Hash iterations for newly stored secrets
const ITERATIONS: u32 = 10_000;

/// Salted-hash credential storage and verification
pub struct CredentialRegistry<'a> {
    substrate: &'a dyn Substrate,
}

impl<'a> CredentialRegistry<'a> {
    /// Registry over the same substrate as `store`
    pub fn new(store: &'a Store) -> Self {
        Self {
            substrate: store.substrate(),
        }
    }

    /// Check a secret against the stored hash for `email`
    ///
    /// Unknown emails verify as false; the caller maps both cases to the
    /// same InvalidCredentials failure.
    pub fn verify(&self, email: &str, secret: &str) -> StoreResult<bool> {
        let entries = self.load()?;
        Ok(match entries.get(email) {
            Some(stored) => verify_hash(secret, stored),
            None => false,
        })
    }

    /// Store (or replace) the secret for `email`
    pub fn set_secret(&self, email: &str, secret: &str) -> StoreResult<()> {
        let mut entries = self.load()?;
        entries.insert(email.to_string(), hash_secret(secret));
        self.save(&entries)
    }

    /// Load the registry, seeding it alongside the seed profiles on first
    /// access (every seeded profile gets the demo secret)
    fn load(&self) -> StoreResult<BTreeMap<String, String>> {
        match self.substrate.read(CREDENTIALS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                let entries: BTreeMap<String, String> = seed::initial_profiles()
                    .into_iter()
                    .map(|profile| (profile.email, hash_secret(seed::SEED_PASSWORD)))
                    .collect();
                self.save(&entries)?;
                Ok(entries)
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let raw = serde_json::to_string(entries)?;
        self.substrate.write(CREDENTIALS_KEY, &raw)?;
        Ok(())
    }
}

/// Hash a secret with a fresh random salt
fn hash_secret(secret: &str) -> String {
    let salt = Uuid::new_v4().into_bytes();
    let digest = derive(secret, &salt, ITERATIONS);
    format!(
        "v1${}${}${}",
        ITERATIONS,
        BASE64.encode(salt),
        BASE64.encode(digest)
    )
}

/// Check a secret against a stored `v1$...` entry
fn verify_hash(secret: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (version, iterations, salt, digest) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(v), Some(i), Some(s), Some(d)) => (v, i, s, d),
        _ => return false,
    };
    if version != "v1" {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(digest)) = (BASE64.decode(salt), BASE64.decode(digest)) else {
        return false;
    };
    derive(secret, &salt, iterations) == digest
}

/// Iterated salted SHA-256
fn derive(secret: &str, salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut digest = Sha256::new()
        .chain_update(salt)
        .chain_update(secret.as_bytes())
        .finalize();
    for _ in 1..iterations {
        digest = Sha256::new().chain_update(salt).chain_update(digest).finalize();
    }
    digest.to_vec()
}
