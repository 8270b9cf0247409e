use crate::core::{PowSettings, ProofOfWork};
use crate::error::Result;
use crate::utils::{deserialize, serialize};
use data_encoding::HEXLOWER;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const GENESIS_DATA: &str = "Genesis Block";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    hash: Vec<u8>,
    data: Vec<u8>,
    prev_hash: Vec<u8>, // empty for the genesis block
    nonce: u64,
}

impl Block {
    /// Builds a candidate with an empty hash and nonce zero, then seals it.
    pub fn new_block(data: &[u8], prev_hash: &[u8], settings: PowSettings) -> Result<Block> {
        let mut block = Block {
            hash: Vec::new(),
            data: data.to_vec(),
            prev_hash: prev_hash.to_vec(),
            nonce: 0,
        };

        let (nonce, hash) = ProofOfWork::new_proof_of_work(&block, settings).run()?;
        block.nonce = nonce;
        block.hash = hash;
        info!(
            "Sealed block {} (difficulty: {})",
            HEXLOWER.encode(&block.hash),
            settings.difficulty
        );

        Ok(block)
    }

    pub fn generate_genesis_block(settings: PowSettings) -> Result<Block> {
        Block::new_block(GENESIS_DATA.as_bytes(), &[], settings)
    }

    /// Reassembles a block from stored fields without sealing it.
    pub fn from_parts(hash: Vec<u8>, data: Vec<u8>, prev_hash: Vec<u8>, nonce: u64) -> Block {
        Block {
            hash,
            data,
            prev_hash,
            nonce,
        }
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn get_hash(&self) -> &[u8] {
        self.hash.as_slice()
    }

    pub fn get_data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn get_prev_hash(&self) -> &[u8] {
        self.prev_hash.as_slice()
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }
}

// Hash, data, then previous hash, one per line
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hash: {}", HEXLOWER.encode(&self.hash))?;
        writeln!(f, "Data: {}", String::from_utf8_lossy(&self.data))?;
        writeln!(f, "Prev hash: {}", HEXLOWER.encode(&self.prev_hash))?;
        write!(f, "Nonce: {}", self.nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_MAX_NONCE;

    fn easy() -> PowSettings {
        PowSettings::new(6, DEFAULT_MAX_NONCE).unwrap()
    }

    #[test]
    fn test_genesis_block_shape() {
        let genesis = Block::generate_genesis_block(easy()).unwrap();
        assert_eq!(genesis.get_data(), b"Genesis Block");
        assert!(genesis.is_genesis());
        assert_eq!(genesis.get_hash().len(), 32);
    }

    #[test]
    fn test_new_block_links_to_previous() {
        let genesis = Block::generate_genesis_block(easy()).unwrap();
        let next = Block::new_block(b"A", genesis.get_hash(), easy()).unwrap();
        assert_eq!(next.get_prev_hash(), genesis.get_hash());
        assert!(!next.is_genesis());
        assert_ne!(next.get_hash(), genesis.get_hash());
    }

    #[test]
    fn test_serialized_form_is_exact() {
        let block = Block::new_block(&[0, 1, 2, 0xff], &[0u8; 32], easy()).unwrap();
        let bytes = block.serialize().unwrap();
        let decoded = Block::deserialize(&bytes).unwrap();
        assert_eq!(decoded, block);
        assert_eq!(decoded.serialize().unwrap(), bytes);
    }

    #[test]
    fn test_garbage_does_not_deserialize() {
        assert!(Block::deserialize(b"not a block").is_err());
    }

    #[test]
    fn test_display_lists_hash_before_data_and_prev_hash() {
        let block = Block::from_parts(vec![0xab; 2], b"A".to_vec(), vec![0xcd; 2], 9);
        let lines: Vec<String> = block.to_string().lines().map(String::from).collect();
        assert_eq!(
            lines,
            vec!["Hash: abab", "Data: A", "Prev hash: cdcd", "Nonce: 9"]
        );
    }
}
