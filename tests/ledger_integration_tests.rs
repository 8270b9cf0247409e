//! Ledger and wallet integration tests
//!
//! Exercises the public API end to end against real on-disk stores.

use ledger_chain::core::{Block, Blockchain, PowSettings, ProofOfWork, DEFAULT_MAX_NONCE};
use ledger_chain::wallet::{validate_address, Wallets};
use ledger_chain::{sha256_digest, BlockchainError};
use tempfile::tempdir;

fn settings() -> PowSettings {
    PowSettings::new(6, DEFAULT_MAX_NONCE).unwrap()
}

#[test]
fn test_append_a_b_then_iterate() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("blocks");

    let mut blockchain = Blockchain::open_with_path(&db_path, settings()).unwrap();
    assert!(blockchain.created_genesis());
    blockchain.add_block(b"A").unwrap();
    blockchain.add_block(b"B").unwrap();

    let blocks: Vec<Block> = blockchain.iterator().map(|b| b.unwrap()).collect();
    let data: Vec<&[u8]> = blocks.iter().map(|b| b.get_data()).collect();
    assert_eq!(data, vec![&b"B"[..], &b"A"[..], &b"Genesis Block"[..]]);

    assert_eq!(blocks[0].get_prev_hash(), blocks[1].get_hash());
    assert_eq!(blocks[1].get_prev_hash(), blocks[2].get_hash());
    assert!(blocks[2].get_prev_hash().is_empty());
}

#[test]
fn test_chain_length_is_appends_plus_genesis() {
    let temp_dir = tempdir().unwrap();
    let mut blockchain =
        Blockchain::open_with_path(temp_dir.path().join("blocks"), settings()).unwrap();

    let appends = 7;
    for i in 0..appends {
        blockchain.add_block(format!("block {i}").as_bytes()).unwrap();
    }

    let blocks: Vec<Block> = blockchain.iterator().map(|b| b.unwrap()).collect();
    assert_eq!(blocks.len(), appends + 1);
    for pair in blocks.windows(2) {
        assert_eq!(pair[0].get_prev_hash(), pair[1].get_hash());
    }
    assert_eq!(blockchain.verify_chain().unwrap(), appends + 1);
}

#[test]
fn test_every_sealed_block_recomputes() {
    let temp_dir = tempdir().unwrap();
    let mut blockchain =
        Blockchain::open_with_path(temp_dir.path().join("blocks"), settings()).unwrap();
    blockchain.add_block(b"payload").unwrap();

    for block in blockchain.iterator() {
        let block = block.unwrap();
        assert!(ProofOfWork::validate(&block, settings()).is_ok());

        let mut payload = block.get_data().to_vec();
        payload.extend(block.get_prev_hash());
        payload.extend(block.get_nonce().to_be_bytes());
        assert_eq!(sha256_digest(&payload), block.get_hash());
    }
}

#[test]
fn test_reopen_without_append_keeps_tip() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("blocks");

    let first = Blockchain::open_with_path(&db_path, settings()).unwrap();
    let tip = first.get_tip_hash().to_vec();
    first.close().unwrap();

    let second = Blockchain::open_with_path(&db_path, settings()).unwrap();
    assert!(!second.created_genesis());
    assert_eq!(second.get_tip_hash(), tip.as_slice());
    assert_eq!(second.iterator().count(), 1);
}

#[test]
fn test_appends_survive_reopen() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("blocks");

    let mut blockchain = Blockchain::open_with_path(&db_path, settings()).unwrap();
    let appended = blockchain.add_block(b"persisted").unwrap();
    blockchain.close().unwrap();

    let mut reopened = Blockchain::open_with_path(&db_path, settings()).unwrap();
    assert_eq!(reopened.get_tip_hash(), appended.get_hash());
    let next = reopened.add_block(b"after reopen").unwrap();
    assert_eq!(next.get_prev_hash(), appended.get_hash());
    assert_eq!(reopened.verify_chain().unwrap(), 3);
}

#[test]
fn test_unreachable_difficulty_fails_bootstrap() {
    let temp_dir = tempdir().unwrap();
    let unreachable = PowSettings::new(255, 32).unwrap();
    let result = Blockchain::open_with_path(temp_dir.path().join("blocks"), unreachable);
    assert!(matches!(result, Err(BlockchainError::PowExhausted { .. })));
}

#[test]
fn test_wallet_collection_round_trip() {
    let temp_dir = tempdir().unwrap();

    let mut wallets = Wallets::create_in(temp_dir.path(), "3000").unwrap();
    assert!(!wallets.loaded_from_file());
    let first = wallets.add_wallet().unwrap();
    let second = wallets.add_wallet().unwrap();
    wallets.save("3000").unwrap();

    let reloaded = Wallets::create_in(temp_dir.path(), "3000").unwrap();
    let mut addresses = reloaded.get_all_addresses();
    addresses.sort();
    let mut expected = vec![first.clone(), second.clone()];
    expected.sort();
    assert_eq!(addresses, expected);

    for address in [&first, &second] {
        assert!(validate_address(address));
        assert_eq!(
            reloaded.get_wallet(address).unwrap().get_public_key(),
            wallets.get_wallet(address).unwrap().get_public_key()
        );
    }
}
