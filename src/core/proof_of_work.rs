use crate::core::Block;
use crate::error::{BlockchainError, Result};
use crate::utils::sha256_digest;
use data_encoding::HEXLOWER;
use log::{debug, info};
use num_bigint::BigUint;

/// Default number of leading zero bits a sealed hash must carry.
pub const DEFAULT_DIFFICULTY: u32 = 12;

/// Default exhaustion bound for the nonce search.
pub const DEFAULT_MAX_NONCE: u64 = i64::MAX as u64;

const MAX_DIFFICULTY: u32 = 255;

// How often the search loop reports progress at debug level.
const PROGRESS_INTERVAL: u64 = 1 << 20;

/// Difficulty and search bound shared by sealing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowSettings {
    pub difficulty: u32,
    pub max_nonce: u64,
}

impl Default for PowSettings {
    fn default() -> Self {
        PowSettings {
            difficulty: DEFAULT_DIFFICULTY,
            max_nonce: DEFAULT_MAX_NONCE,
        }
    }
}

impl PowSettings {
    pub fn new(difficulty: u32, max_nonce: u64) -> Result<PowSettings> {
        if difficulty == 0 || difficulty > MAX_DIFFICULTY {
            return Err(BlockchainError::Config(format!(
                "Difficulty must be between 1 and {MAX_DIFFICULTY} bits, got {difficulty}"
            )));
        }
        Ok(PowSettings {
            difficulty,
            max_nonce,
        })
    }

    /// target = 2^(256 - difficulty)
    pub fn target(&self) -> BigUint {
        BigUint::from(1u8) << (256 - self.difficulty.min(MAX_DIFFICULTY)) as usize
    }
}

pub struct ProofOfWork<'a> {
    block: &'a Block,
    target: BigUint,
    settings: PowSettings,
}

impl<'a> ProofOfWork<'a> {
    pub fn new_proof_of_work(block: &'a Block, settings: PowSettings) -> ProofOfWork<'a> {
        ProofOfWork {
            block,
            target: settings.target(),
            settings,
        }
    }

    /// data || prev_hash || nonce (8 bytes, big-endian)
    fn prepare_data(&self, nonce: u64) -> Vec<u8> {
        let data = self.block.get_data();
        let prev_hash = self.block.get_prev_hash();
        let mut payload = Vec::with_capacity(data.len() + prev_hash.len() + 8);
        payload.extend(data);
        payload.extend(prev_hash);
        payload.extend(nonce.to_be_bytes());
        payload
    }

    fn meets_target(&self, hash: &[u8]) -> bool {
        BigUint::from_bytes_be(hash) < self.target
    }

    /// Searches nonces from zero upward until a digest falls below the target.
    pub fn run(&self) -> Result<(u64, Vec<u8>)> {
        debug!(
            "Mining block with data {:?} at difficulty {}",
            String::from_utf8_lossy(self.block.get_data()),
            self.settings.difficulty
        );
        let mut nonce = 0;
        while nonce < self.settings.max_nonce {
            let hash = sha256_digest(self.prepare_data(nonce).as_slice());
            if self.meets_target(&hash) {
                info!("Found seal {} at nonce {nonce}", HEXLOWER.encode(&hash));
                return Ok((nonce, hash));
            }
            if nonce > 0 && nonce % PROGRESS_INTERVAL == 0 {
                debug!("Tried {nonce} nonces without a seal");
            }
            nonce += 1;
        }
        Err(BlockchainError::PowExhausted {
            difficulty: self.settings.difficulty,
            max_nonce: self.settings.max_nonce,
        })
    }

    /// Recomputes the digest for the block's stored nonce and checks it against
    /// both the target and the stored hash.
    pub fn validate(block: &Block, settings: PowSettings) -> Result<()> {
        let pow = ProofOfWork::new_proof_of_work(block, settings);
        let hash = sha256_digest(pow.prepare_data(block.get_nonce()).as_slice());
        if hash.as_slice() != block.get_hash() {
            return Err(BlockchainError::InvalidSeal(format!(
                "stored hash {} does not match recomputed {}",
                HEXLOWER.encode(block.get_hash()),
                HEXLOWER.encode(&hash)
            )));
        }
        if !pow.meets_target(&hash) {
            return Err(BlockchainError::InvalidSeal(format!(
                "hash {} is above the target for difficulty {}",
                HEXLOWER.encode(&hash),
                settings.difficulty
            )));
        }
        Ok(())
    }

    pub fn is_valid(block: &Block, settings: PowSettings) -> bool {
        Self::validate(block, settings).is_ok()
    }
}

/// Leading zero bits of a digest, used for reporting.
pub fn leading_zero_bits(hash: &[u8]) -> u32 {
    let mut bits = 0;
    for byte in hash {
        if *byte == 0 {
            bits += 8;
        } else {
            bits += byte.leading_zeros();
            break;
        }
    }
    bits
}
