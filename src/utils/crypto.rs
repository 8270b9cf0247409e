use ring::digest::{Context, SHA256};
use ring::rand::{SecureRandom, SystemRandom};
use ripemd::{Digest as RipemdDigest, Ripemd160};
use secp256k1::SecretKey;
use zeroize::Zeroize;

use crate::error::{BlockchainError, Result};

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

pub fn ripemd160_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn base58_decode(data: &str) -> Result<Vec<u8>> {
    bs58::decode(data)
        .into_vec()
        .map_err(|e| BlockchainError::Decode(format!("Invalid base58 encoding: {e}")))
}

/// Draws a private scalar uniformly from the curve order using the OS random source.
///
/// Candidates outside `[1, n)` are redrawn; a failing random source is not retried.
pub fn new_private_key() -> Result<SecretKey> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 32];
    loop {
        rng.fill(&mut bytes)
            .map_err(|e| BlockchainError::Crypto(format!("Random source failure: {e}")))?;
        if let Ok(key) = SecretKey::from_slice(&bytes) {
            bytes.zeroize();
            return Ok(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::HEXLOWER;
    use rand::{Rng, RngCore};

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            HEXLOWER.encode(&sha256_digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_ripemd160_known_vector() {
        assert_eq!(
            HEXLOWER.encode(&ripemd160_digest(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
        assert_eq!(ripemd160_digest(b"").len(), 20);
    }

    #[test]
    fn test_base58_known_vectors() {
        assert_eq!(base58_encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(base58_encode(&[0, 0, 1]), "112");
        assert_eq!(base58_encode(&[]), "");
    }

    #[test]
    fn test_base58_round_trip_random_inputs() {
        let mut rng = rand::thread_rng();
        for len in [0usize, 1, 2, 20, 25, 64] {
            let mut data = vec![0u8; len];
            rng.fill_bytes(&mut data);
            // Force leading zero bytes on some inputs.
            let zeros = rng.gen_range(0..=len.min(3));
            for byte in data.iter_mut().take(zeros) {
                *byte = 0;
            }
            let encoded = base58_encode(&data);
            assert_eq!(base58_decode(&encoded).unwrap(), data);
        }
    }

    #[test]
    fn test_base58_decode_rejects_ambiguous_characters() {
        for bad in ["0", "O", "I", "l", "abc0def", "+"] {
            assert!(matches!(
                base58_decode(bad),
                Err(BlockchainError::Decode(_))
            ));
        }
    }

    #[test]
    fn test_new_private_key_is_random() {
        let a = new_private_key().unwrap();
        let b = new_private_key().unwrap();
        assert_ne!(a.secret_bytes(), b.secret_bytes());
    }
}
