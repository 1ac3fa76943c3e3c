//! Random identifiers used as node uris.
//!
//! Identifiers are drawn uniformly from `[a-z0-9]`; they are not
//! cryptographic and not checked for uniqueness here. The identifier space
//! is 36^length.

use rand::Rng;

/// Length used for every generated uri suffix.
pub const DEFAULT_LENGTH: usize = 10;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A random lowercase alphanumeric string of exactly `length` characters.
pub fn random_string(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// A fresh uri of the form `<prefix>_<random>`.
pub fn generate_uri(prefix: &str) -> String {
    format!("{prefix}_{}", random_string(DEFAULT_LENGTH))
}
