use crate::core::{PowSettings, DEFAULT_DIFFICULTY, DEFAULT_MAX_NONCE};
use crate::error::{BlockchainError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_NODE_ID: &str = "3000";
static DEFAULT_DB_PATH: &str = "tmp/blocks";
static DEFAULT_WALLET_DIR: &str = "tmp";

const NODE_ID_KEY: &str = "NODE_ID";
const DB_PATH_KEY: &str = "LEDGER_DB_PATH";
const WALLET_DIR_KEY: &str = "WALLET_DIR";
const DIFFICULTY_KEY: &str = "POW_DIFFICULTY";
const MAX_NONCE_KEY: &str = "POW_MAX_NONCE";

const ENV_KEYS: [&str; 5] = [
    NODE_ID_KEY,
    DB_PATH_KEY,
    WALLET_DIR_KEY,
    DIFFICULTY_KEY,
    MAX_NONCE_KEY,
];

pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Seeds the configuration from the process environment.
    pub fn new() -> Config {
        Self::from_pairs(
            ENV_KEYS
                .iter()
                .filter_map(|key| env::var(key).ok().map(|value| (key.to_string(), value))),
        )
    }

    /// Builds a configuration from explicit key/value pairs, without touching the environment.
    pub fn from_pairs<I>(pairs: I) -> Config
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();
        map.insert(String::from(NODE_ID_KEY), String::from(DEFAULT_NODE_ID));
        map.insert(String::from(DB_PATH_KEY), String::from(DEFAULT_DB_PATH));
        map.insert(String::from(WALLET_DIR_KEY), String::from(DEFAULT_WALLET_DIR));
        map.extend(pairs);
        Config {
            inner: RwLock::new(map),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        inner.insert(String::from(key), value);
    }

    fn get_parsed<T: FromStr>(&self, key: &str, default: T) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| BlockchainError::Config(format!("Invalid {key} value {raw:?}: {e}"))),
            None => Ok(default),
        }
    }

    pub fn get_node_id(&self) -> String {
        self.get(NODE_ID_KEY)
            .unwrap_or_else(|| String::from(DEFAULT_NODE_ID))
    }

    pub fn set_node_id(&self, node_id: String) {
        self.set(NODE_ID_KEY, node_id);
    }

    pub fn get_db_path(&self) -> PathBuf {
        PathBuf::from(
            self.get(DB_PATH_KEY)
                .unwrap_or_else(|| String::from(DEFAULT_DB_PATH)),
        )
    }

    pub fn set_db_path(&self, path: String) {
        self.set(DB_PATH_KEY, path);
    }

    pub fn get_wallet_dir(&self) -> PathBuf {
        PathBuf::from(
            self.get(WALLET_DIR_KEY)
                .unwrap_or_else(|| String::from(DEFAULT_WALLET_DIR)),
        )
    }

    pub fn set_wallet_dir(&self, dir: String) {
        self.set(WALLET_DIR_KEY, dir);
    }

    pub fn set_difficulty(&self, difficulty: u32) {
        self.set(DIFFICULTY_KEY, difficulty.to_string());
    }

    /// Difficulty and nonce bound, validated.
    pub fn get_pow_settings(&self) -> Result<PowSettings> {
        let difficulty = self.get_parsed(DIFFICULTY_KEY, DEFAULT_DIFFICULTY)?;
        let max_nonce = self.get_parsed(MAX_NONCE_KEY, DEFAULT_MAX_NONCE)?;
        PowSettings::new(difficulty, max_nonce)
    }
}
