// This is the persistent ledger - the chain of sealed blocks kept in Sled
// Blocks are stored under their own hash, and the "lh" key points at the newest one
// Walking the chain always starts at the tip and follows prev_hash back to genesis

use crate::config::GLOBAL_CONFIG;
use crate::core::{Block, PowSettings, ProofOfWork};
use crate::error::{BlockchainError, Result};
use data_encoding::HEXLOWER;
use log::{debug, info};
use sled::transaction::{abort, ConflictableTransactionResult, TransactionError};
use sled::{Db, Tree};
use std::path::{Path, PathBuf};

// I use these constants to organize my database storage
const TIP_BLOCK_HASH_KEY: &[u8] = b"lh"; // Key holding the hash of the latest block
const BLOCKS_TREE: &str = "blocks"; // Tree name for storing all blocks
const HASH_LEN: usize = 32;

// This is my handle on one ledger directory; dropping it (or calling close) releases the store
pub struct Blockchain {
    tip_hash: Vec<u8>, // Hash of the most recent block, mirrored from the "lh" key
    db: Db,
    blocks: Tree,
    db_path: PathBuf,
    settings: PowSettings,
    created_genesis: bool, // True when this open had to bootstrap a fresh chain
}

impl Blockchain {
    // When I want to open the ledger configured for this process
    pub fn initialize() -> Result<Blockchain> {
        let db_path = GLOBAL_CONFIG.get_db_path();
        let settings = GLOBAL_CONFIG.get_pow_settings()?;
        Self::open_with_path(db_path, settings)
    }

    // Opens the ledger at db_path, creating the genesis block if no tip pointer exists yet
    pub fn open_with_path<P: AsRef<Path>>(db_path: P, settings: PowSettings) -> Result<Blockchain> {
        let path = db_path.as_ref().to_path_buf();
        let db = sled::open(&path)
            .map_err(|e| BlockchainError::Database(format!("Failed to open database: {e}")))?;
        let blocks = db
            .open_tree(BLOCKS_TREE)
            .map_err(|e| BlockchainError::Database(format!("Failed to open blocks tree: {e}")))?;

        let existing = blocks
            .get(TIP_BLOCK_HASH_KEY)
            .map_err(|e| BlockchainError::Database(format!("Failed to get tip hash: {e}")))?;

        let (tip_hash, created_genesis) = match existing {
            Some(tip) => {
                let tip = Self::check_tip(tip.as_ref())?;
                debug!("Resuming ledger at tip {}", HEXLOWER.encode(&tip));
                (tip, false)
            }
            None => {
                // No chain here yet, so I seal a genesis block and make it the tip
                let genesis = Block::generate_genesis_block(settings)?;
                Self::bootstrap(&blocks, &genesis)?;
                info!(
                    "No existing blockchain found, genesis block created: {}",
                    HEXLOWER.encode(genesis.get_hash())
                );
                (genesis.get_hash().to_vec(), true)
            }
        };

        Ok(Blockchain {
            tip_hash,
            db,
            blocks,
            db_path: path,
            settings,
            created_genesis,
        })
    }

    // Writes genesis and the tip pointer together, but only if no tip appeared meanwhile
    fn bootstrap(blocks: &Tree, genesis: &Block) -> Result<()> {
        let block_data = genesis.serialize()?;
        blocks
            .transaction(|tx_db| -> ConflictableTransactionResult<(), BlockchainError> {
                if tx_db.get(TIP_BLOCK_HASH_KEY)?.is_some() {
                    return abort(BlockchainError::Database(
                        "Ledger was initialized concurrently".to_string(),
                    ));
                }
                tx_db.insert(genesis.get_hash(), block_data.as_slice())?;
                tx_db.insert(TIP_BLOCK_HASH_KEY, genesis.get_hash())?;
                Ok(())
            })
            .map_err(Self::transaction_error)?;
        blocks.flush()?;
        Ok(())
    }

    fn check_tip(tip: &[u8]) -> Result<Vec<u8>> {
        if tip.len() != HASH_LEN {
            return Err(BlockchainError::CorruptLedger(format!(
                "Tip pointer is {} bytes, expected {HASH_LEN}",
                tip.len()
            )));
        }
        Ok(tip.to_vec())
    }

    fn read_tip(&self) -> Result<Vec<u8>> {
        let tip = self
            .blocks
            .get(TIP_BLOCK_HASH_KEY)
            .map_err(|e| BlockchainError::Database(format!("Failed to get tip hash: {e}")))?
            .ok_or_else(|| BlockchainError::CorruptLedger("Tip pointer is missing".to_string()))?;
        Self::check_tip(tip.as_ref())
    }

    fn transaction_error(e: TransactionError<BlockchainError>) -> BlockchainError {
        match e {
            TransactionError::Abort(err) => err,
            TransactionError::Storage(err) => {
                BlockchainError::Database(format!("Failed to update blocks tree: {err}"))
            }
        }
    }

    // When I want to append a new data-bearing block on top of the current tip
    pub fn add_block(&mut self, data: &[u8]) -> Result<Block> {
        let last_hash = self.read_tip()?;
        if !self.block_exists(&last_hash)? {
            return Err(BlockchainError::CorruptLedger(format!(
                "Tip block {} is missing",
                HEXLOWER.encode(&last_hash)
            )));
        }

        let block = Block::new_block(data, &last_hash, self.settings)?;
        let block_data = block.serialize()?;

        // The block record and the tip move together or not at all
        self.blocks
            .transaction(|tx_db| -> ConflictableTransactionResult<(), BlockchainError> {
                let current = tx_db.get(TIP_BLOCK_HASH_KEY)?;
                if current.as_deref() != Some(last_hash.as_slice()) {
                    return abort(BlockchainError::Database(
                        "Tip moved while the block was being sealed".to_string(),
                    ));
                }
                tx_db.insert(block.get_hash(), block_data.as_slice())?;
                tx_db.insert(TIP_BLOCK_HASH_KEY, block.get_hash())?;
                Ok(())
            })
            .map_err(Self::transaction_error)?;

        self.tip_hash = block.get_hash().to_vec();
        info!("Appended block: {}", HEXLOWER.encode(block.get_hash()));
        Ok(block)
    }

    pub fn iterator(&self) -> BlockchainIterator {
        BlockchainIterator::new(self.tip_hash.clone(), self.blocks.clone())
    }

    /// Walks the chain from tip to genesis, checking every seal against the
    /// configured difficulty. Returns the number of blocks, genesis included.
    pub fn verify_chain(&self) -> Result<usize> {
        let mut count = 0;
        for block in self.iterator() {
            let block = block?;
            ProofOfWork::validate(&block, self.settings).map_err(|e| match e {
                BlockchainError::InvalidSeal(msg) => BlockchainError::InvalidSeal(format!(
                    "block {}: {msg}",
                    HEXLOWER.encode(block.get_hash())
                )),
                other => other,
            })?;
            count += 1;
        }
        Ok(count)
    }

    pub fn get_block(&self, block_hash: &[u8]) -> Result<Option<Block>> {
        if block_hash == TIP_BLOCK_HASH_KEY {
            return Ok(None);
        }
        match self
            .blocks
            .get(block_hash)
            .map_err(|e| BlockchainError::Database(format!("Failed to get block: {e}")))?
        {
            Some(bytes) => Ok(Some(Block::deserialize(bytes.as_ref())?)),
            None => Ok(None),
        }
    }

    pub fn block_exists(&self, block_hash: &[u8]) -> Result<bool> {
        if block_hash == TIP_BLOCK_HASH_KEY {
            return Ok(false);
        }
        self.blocks.contains_key(block_hash).map_err(|e| {
            BlockchainError::Database(format!("Failed to check block existence: {e}"))
        })
    }

    pub fn get_tip_hash(&self) -> &[u8] {
        self.tip_hash.as_slice()
    }

    pub fn get_settings(&self) -> PowSettings {
        self.settings
    }

    pub fn get_db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub fn created_genesis(&self) -> bool {
        self.created_genesis
    }

    // Flushes pending writes; the store itself is released when the handle drops
    pub fn close(self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| BlockchainError::Database(format!("Failed to flush database: {e}")))?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn get_tree(&self) -> &Tree {
        &self.blocks
    }
}

// Where the cursor stands: at a hash still to be read, or past genesis
enum Cursor {
    At(Vec<u8>),
    Exhausted,
}

/// Tip-to-genesis traversal. Each call to [`Blockchain::iterator`] starts a
/// fresh one; after yielding genesis (or an error) it yields nothing more.
pub struct BlockchainIterator {
    blocks: Tree,
    cursor: Cursor,
}

impl BlockchainIterator {
    fn new(tip_hash: Vec<u8>, blocks: Tree) -> BlockchainIterator {
        BlockchainIterator {
            blocks,
            cursor: Cursor::At(tip_hash),
        }
    }

    fn read(&self, hash: &[u8]) -> Result<Block> {
        let data = self
            .blocks
            .get(hash)
            .map_err(|e| BlockchainError::Database(format!("Failed to get block: {e}")))?
            .ok_or_else(|| {
                BlockchainError::CorruptLedger(format!(
                    "Referenced block {} is missing",
                    HEXLOWER.encode(hash)
                ))
            })?;
        let block = Block::deserialize(data.as_ref()).map_err(|e| {
            BlockchainError::CorruptLedger(format!(
                "Block {} cannot be decoded: {e}",
                HEXLOWER.encode(hash)
            ))
        })?;
        if block.get_hash() != hash {
            return Err(BlockchainError::CorruptLedger(format!(
                "Block stored under {} claims hash {}",
                HEXLOWER.encode(hash),
                HEXLOWER.encode(block.get_hash())
            )));
        }
        Ok(block)
    }
}

impl Iterator for BlockchainIterator {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
            Cursor::At(hash) => hash,
            Cursor::Exhausted => return None,
        };
        let block = match self.read(&current) {
            Ok(block) => block,
            Err(e) => return Some(Err(e)),
        };
        if !block.is_genesis() {
            self.cursor = Cursor::At(block.get_prev_hash().to_vec());
        }
        debug!("Iterated block {}", HEXLOWER.encode(block.get_hash()));
        Some(Ok(block))
    }
}
