//! Test utilities for ledger and wallet tests

use crate::core::{Blockchain, PowSettings, DEFAULT_MAX_NONCE};
use crate::error::{BlockchainError, Result};
use crate::wallet::Wallets;
use tempfile::TempDir;

/// Easy difficulty so sealing takes a few hundred hashes at most
pub const TEST_DIFFICULTY: u32 = 4;

pub fn test_settings() -> PowSettings {
    PowSettings {
        difficulty: TEST_DIFFICULTY,
        max_nonce: DEFAULT_MAX_NONCE,
    }
}

/// Create a temporary directory for testing
pub fn create_temp_dir() -> Result<TempDir> {
    tempfile::tempdir().map_err(|e| BlockchainError::Io(e.to_string()))
}

/// Create a test ledger with temporary storage
pub fn create_test_blockchain() -> Result<(Blockchain, TempDir)> {
    let temp_dir = create_temp_dir()?;
    let db_path = temp_dir.path().join("blocks");
    let blockchain = Blockchain::open_with_path(&db_path, test_settings())?;
    Ok((blockchain, temp_dir))
}

/// Create an empty wallet collection backed by a temporary directory
pub fn create_test_wallets(node_id: &str, count: usize) -> Result<(Wallets, Vec<String>, TempDir)> {
    let temp_dir = create_temp_dir()?;
    let mut wallets = Wallets::create_in(temp_dir.path(), node_id)?;
    let mut addresses = Vec::new();
    for _ in 0..count {
        addresses.push(wallets.add_wallet()?);
    }
    Ok((wallets, addresses, temp_dir))
}
