//! Core ledger functionality
//!
//! Blocks, the proof-of-work sealing engine, and the persistent chain store.

pub mod block;
pub mod blockchain;
pub mod proof_of_work;

pub use block::{Block, GENESIS_DATA};
pub use blockchain::{Blockchain, BlockchainIterator};
pub use proof_of_work::{
    leading_zero_bits, PowSettings, ProofOfWork, DEFAULT_DIFFICULTY, DEFAULT_MAX_NONCE,
};
