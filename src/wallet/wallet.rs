use crate::error::{BlockchainError, Result};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::fmt;
use zeroize::Zeroizing;

const VERSION: u8 = 0x00;
pub const ADDRESS_CHECK_SUM_LEN: usize = 4;

/// Name of the curve every wallet key lives on; persisted alongside the keys.
pub const CURVE_NAME: &str = "secp256k1";

#[derive(Clone)]
pub struct Wallet {
    private_key: SecretKey,
    public_key: Vec<u8>, // X || Y, 64 bytes
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let private_key = crate::utils::new_private_key()?;
        Ok(Self::from_secret_key(private_key))
    }

    /// Rebuilds a wallet from a stored 32-byte private scalar.
    pub fn from_private_key(bytes: &[u8]) -> Result<Wallet> {
        let private_key = SecretKey::from_slice(bytes)
            .map_err(|e| BlockchainError::Crypto(format!("Invalid private key: {e}")))?;
        Ok(Self::from_secret_key(private_key))
    }

    fn from_secret_key(private_key: SecretKey) -> Wallet {
        let secp = Secp256k1::signing_only();
        let point = PublicKey::from_secret_key(&secp, &private_key).serialize_uncompressed();
        // Drop the 0x04 tag; the address pipeline hashes the bare coordinates.
        Wallet {
            private_key,
            public_key: point[1..].to_vec(),
        }
    }

    pub fn get_address(&self) -> String {
        let pub_key_hash = hash_pub_key(self.public_key.as_slice());
        convert_address(pub_key_hash.as_slice())
    }

    pub fn get_public_key(&self) -> &[u8] {
        self.public_key.as_slice()
    }

    /// Copy of the private scalar, wiped when the returned buffer drops.
    pub fn get_private_key(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.private_key.secret_bytes())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.get_address())
            .finish_non_exhaustive()
    }
}

pub fn hash_pub_key(pub_key: &[u8]) -> Vec<u8> {
    let pub_key_sha256 = crate::utils::sha256_digest(pub_key);
    crate::utils::ripemd160_digest(pub_key_sha256.as_slice())
}

fn checksum(payload: &[u8]) -> Vec<u8> {
    let first_sha = crate::utils::sha256_digest(payload);
    let second_sha = crate::utils::sha256_digest(first_sha.as_slice());
    second_sha[0..ADDRESS_CHECK_SUM_LEN].to_vec()
}

/// version + pub_key_hash + checksum, Base58 encoded
pub fn convert_address(pub_key_hash: &[u8]) -> String {
    let mut payload: Vec<u8> = vec![];
    payload.push(VERSION);
    payload.extend(pub_key_hash);
    let checksum = checksum(payload.as_slice());
    payload.extend(checksum.as_slice());
    crate::utils::base58_encode(payload.as_slice())
}

/// Any decode failure or checksum mismatch is simply `false`.
pub fn validate_address(address: &str) -> bool {
    let payload = match crate::utils::base58_decode(address) {
        Ok(payload) => payload,
        Err(_) => return false,
    };

    if payload.len() < ADDRESS_CHECK_SUM_LEN + 1 {
        return false;
    }

    let (versioned, actual_checksum) = payload.split_at(payload.len() - ADDRESS_CHECK_SUM_LEN);
    checksum(versioned).as_slice() == actual_checksum
}
