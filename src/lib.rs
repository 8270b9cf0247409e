//! # Ledger Chain - a single-node proof-of-work ledger
//!
//! A chain of hash-linked blocks sealed by a tunable proof-of-work puzzle,
//! kept in an embedded Sled store, plus wallets that derive Base58Check
//! addresses from secp256k1 keypairs.
//!
//! ## How the code is organized
//! - `core/`: blocks, the proof-of-work engine, and the persistent chain store
//! - `wallet/`: keypairs, address derivation/validation, the wallet file
//! - `config/`: node id, storage paths, and difficulty from the environment
//! - `utils/`: hashing, Base58, key generation, and the bincode codec
//! - `cli/`: command-line argument definitions
//! - `error/`: the error type shared by everything above
//!
//! ## Where to start
//! 1. `main.rs` shows every command end to end
//! 2. `core/blockchain.rs` for bootstrap, append, and iteration
//! 3. `core/proof_of_work.rs` for sealing and validation
//! 4. `wallet/wallet.rs` for the address pipeline

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testkit;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use crate::core::{
    Block, Blockchain, BlockchainIterator, PowSettings, ProofOfWork, GENESIS_DATA,
};
pub use error::{BlockchainError, Result};
pub use utils::{base58_decode, base58_encode, ripemd160_digest, sha256_digest};
pub use wallet::{
    convert_address, hash_pub_key, validate_address, Wallet, Wallets, ADDRESS_CHECK_SUM_LEN,
};
