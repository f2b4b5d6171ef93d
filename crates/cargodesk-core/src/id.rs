//! Document identifier generation
//!
//! Ids are short lowercase base-36 strings, random rather than
//! collision-checked: unique with high probability, matching the contract
//! of the service being emulated. Entropy comes from UUIDv4.

use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated identifiers
pub const ID_LENGTH: usize = 10;

/// Produce a fresh document identifier
pub fn unique_id() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(ID_LENGTH);
    for _ in 0..ID_LENGTH {
        out.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}
