use crate::config::GLOBAL_CONFIG;
use crate::error::{BlockchainError, Result};
use crate::utils::{deserialize, serialize};
use crate::wallet::{Wallet, CURVE_NAME};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const WALLET_FILE_EXT: &str = "dat";

pub fn wallet_file_name(node_id: &str) -> String {
    format!("wallets_{node_id}.{WALLET_FILE_EXT}")
}

// On-disk form of one wallet: the private scalar and the public key it should derive to
#[derive(Serialize, Deserialize, bincode::Encode, bincode::Decode, Zeroize, ZeroizeOnDrop)]
struct StoredWallet {
    private_key: Vec<u8>,
    #[zeroize(skip)]
    public_key: Vec<u8>,
}

#[derive(Serialize, Deserialize, bincode::Encode, bincode::Decode)]
struct WalletFile {
    curve: String,
    wallets: HashMap<String, StoredWallet>,
}

pub struct Wallets {
    wallets: HashMap<String, Wallet>,
    dir: PathBuf,
    loaded_from_file: bool,
}

impl Wallets {
    /// Loads the collection for `node_id` from the configured wallet directory.
    pub fn create(node_id: &str) -> Result<Wallets> {
        Self::create_in(GLOBAL_CONFIG.get_wallet_dir(), node_id)
    }

    /// Loads `wallets_<node_id>.dat` from `dir`, or starts empty if the file is absent.
    pub fn create_in<P: AsRef<Path>>(dir: P, node_id: &str) -> Result<Wallets> {
        let mut wallets = Wallets {
            wallets: HashMap::new(),
            dir: dir.as_ref().to_path_buf(),
            loaded_from_file: false,
        };
        wallets.load_from_file(node_id)?;
        Ok(wallets)
    }

    pub fn add_wallet(&mut self) -> Result<String> {
        let wallet = Wallet::new()?;
        let address = wallet.get_address();
        self.wallets.insert(address.clone(), wallet);
        Ok(address)
    }

    pub fn get_all_addresses(&self) -> Vec<String> {
        self.wallets.keys().cloned().collect()
    }

    pub fn get_wallet(&self, address: &str) -> Result<&Wallet> {
        self.wallets
            .get(address)
            .ok_or_else(|| BlockchainError::NotFound(format!("wallet for address {address}")))
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Whether the collection came from an existing wallet file.
    pub fn loaded_from_file(&self) -> bool {
        self.loaded_from_file
    }

    pub fn file_path(&self, node_id: &str) -> PathBuf {
        self.dir.join(wallet_file_name(node_id))
    }

    fn load_from_file(&mut self, node_id: &str) -> Result<()> {
        let path = self.file_path(node_id);
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        let stored: WalletFile = deserialize(&buf)?;
        buf.zeroize();

        if stored.curve != CURVE_NAME {
            return Err(BlockchainError::Wallet(format!(
                "Wallet file {} uses unsupported curve {}",
                path.display(),
                stored.curve
            )));
        }

        let mut wallets = HashMap::with_capacity(stored.wallets.len());
        for (address, entry) in stored.wallets.iter() {
            let wallet = Wallet::from_private_key(&entry.private_key)?;
            if wallet.get_public_key() != entry.public_key.as_slice() {
                return Err(BlockchainError::Wallet(format!(
                    "Stored public key for {address} does not match its private key"
                )));
            }
            if wallet.get_address() != *address {
                return Err(BlockchainError::Wallet(format!(
                    "Stored address {address} does not match its public key"
                )));
            }
            wallets.insert(address.clone(), wallet);
        }

        self.wallets = wallets;
        self.loaded_from_file = true;
        Ok(())
    }

    /// Rewrites the whole wallet file for `node_id`.
    pub fn save(&self, node_id: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.file_path(node_id);

        let stored = WalletFile {
            curve: CURVE_NAME.to_string(),
            wallets: self
                .wallets
                .iter()
                .map(|(address, wallet)| {
                    (
                        address.clone(),
                        StoredWallet {
                            private_key: wallet.get_private_key().to_vec(),
                            public_key: wallet.get_public_key().to_vec(),
                        },
                    )
                })
                .collect(),
        };
        let mut wallets_bytes = serialize(&stored)?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(wallets_bytes.as_slice())?;
        writer.flush()?;
        wallets_bytes.zeroize();

        info!("Saved {} wallets to {}", self.wallets.len(), path.display());
        Ok(())
    }
}
