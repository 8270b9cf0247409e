//! Utility functions and helpers
//!
//! Hashing, Base58 encoding, key generation, and the binary codec used
//! for everything the crate persists.

pub mod crypto;
pub mod serialization;

pub use crypto::{base58_decode, base58_encode, new_private_key, ripemd160_digest, sha256_digest};

pub use serialization::{deserialize, serialize};
