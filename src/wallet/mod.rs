//! Wallet management
//!
//! Key generation, address derivation and validation, and the per-node
//! wallet collection file.

#[allow(clippy::module_inception)]
pub mod wallet;
pub mod wallets;

pub use wallet::{
    convert_address, hash_pub_key, validate_address, Wallet, ADDRESS_CHECK_SUM_LEN, CURVE_NAME,
};
pub use wallets::{wallet_file_name, Wallets, WALLET_FILE_EXT};
