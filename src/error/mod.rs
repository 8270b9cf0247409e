//! Error handling for the ledger
//!
//! Every fallible operation in the crate returns [`Result`], carrying one of the
//! [`BlockchainError`] variants below.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    /// The nonce search ran out of candidates before meeting the target
    PowExhausted { difficulty: u32, max_nonce: u64 },
    /// A block's hash does not match its recomputed proof of work
    InvalidSeal(String),
    /// A hash referenced by the tip pointer or a `prev_hash` is missing or malformed
    CorruptLedger(String),
    /// Malformed Base58 input
    Decode(String),
    /// Lookup of an absent entry
    NotFound(String),
    /// Embedded store errors
    Database(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Randomness and key material errors
    Crypto(String),
    /// Wallet file integrity errors
    Wallet(String),
    /// Configuration errors
    Config(String),
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::PowExhausted {
                difficulty,
                max_nonce,
            } => write!(
                f,
                "Proof of work exhausted: no nonce below {max_nonce} meets difficulty {difficulty}"
            ),
            BlockchainError::InvalidSeal(msg) => write!(f, "Invalid seal: {msg}"),
            BlockchainError::CorruptLedger(msg) => write!(f, "Corrupt ledger: {msg}"),
            BlockchainError::Decode(msg) => write!(f, "Decode error: {msg}"),
            BlockchainError::NotFound(what) => write!(f, "Not found: {what}"),
            BlockchainError::Database(msg) => write!(f, "Database error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            BlockchainError::Wallet(msg) => write!(f, "Wallet error: {msg}"),
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<sled::Error> for BlockchainError {
    fn from(err: sled::Error) -> Self {
        BlockchainError::Database(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for BlockchainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for BlockchainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}
