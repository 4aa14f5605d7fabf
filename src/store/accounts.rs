//! Player accounts: balance, bests, and owned power-ups

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::StoreError;

const ACCOUNTS_FILE: &str = "accounts.json";

/// One player's persistent record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    /// Credits available to spend
    pub balance: u64,
    /// Best score since the last day settlement
    #[serde(default)]
    pub daily_best: u32,
    /// All-time best score
    #[serde(default)]
    pub high_score: u32,
    /// Owned double-jump power-ups
    #[serde(default)]
    pub double_jumps: u32,
    /// Owned shield power-ups
    #[serde(default)]
    pub shields: u32,
}

impl Account {
    pub fn new(name: &str, balance: u64) -> Self {
        Self {
            name: name.to_string(),
            balance,
            daily_best: 0,
            high_score: 0,
            double_jumps: 0,
            shields: 0,
        }
    }
}

/// Account storage. `update` replaces the whole record; callers mutate a
/// fetched `Account` and write it back.
pub trait AccountStore {
    fn get(&self, name: &str) -> Result<Option<Account>, StoreError>;

    /// Fetch-or-create: an existing record is returned untouched, so a
    /// returning player keeps their balance and bests.
    fn create(&mut self, name: &str, initial_balance: u64) -> Result<Account, StoreError>;

    fn update(&mut self, account: &Account) -> Result<(), StoreError>;

    /// Zero every account's daily best. Called at day settlement.
    fn reset_daily_bests(&mut self) -> Result<(), StoreError>;
}

/// In-memory backend for tests
#[derive(Debug, Default)]
pub struct MemoryAccounts {
    accounts: HashMap<String, Account>,
    fail_next: bool,
}

impl MemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next mutating call fail once; reads are unaffected
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    fn check_injected_failure(&mut self) -> Result<(), StoreError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(StoreError::Unavailable("injected failure".into()));
        }
        Ok(())
    }
}

impl AccountStore for MemoryAccounts {
    fn get(&self, name: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(name).cloned())
    }

    fn create(&mut self, name: &str, initial_balance: u64) -> Result<Account, StoreError> {
        self.check_injected_failure()?;
        let account = self
            .accounts
            .entry(name.to_string())
            .or_insert_with(|| Account::new(name, initial_balance));
        Ok(account.clone())
    }

    fn update(&mut self, account: &Account) -> Result<(), StoreError> {
        self.check_injected_failure()?;
        self.accounts.insert(account.name.clone(), account.clone());
        Ok(())
    }

    fn reset_daily_bests(&mut self) -> Result<(), StoreError> {
        self.check_injected_failure()?;
        for account in self.accounts.values_mut() {
            account.daily_best = 0;
        }
        Ok(())
    }
}

/// JSON-file backend. The whole map is rewritten on every mutation; account
/// counts here are small enough that this stays simple and safe.
#[derive(Debug)]
pub struct JsonAccounts {
    dir: PathBuf,
    accounts: BTreeMap<String, Account>,
}

impl JsonAccounts {
    /// Open (or start) the store in `dir`. A missing file is an empty store;
    /// an unreadable one is an error rather than silent data loss.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(ACCOUNTS_FILE);
        let accounts = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("opened account store at {:?} ({} accounts)", path, accounts.len());
        Ok(Self { dir: dir.to_path_buf(), accounts })
    }

    fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.accounts)?;
        fs::write(self.dir.join(ACCOUNTS_FILE), text)?;
        Ok(())
    }
}

impl AccountStore for JsonAccounts {
    fn get(&self, name: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(name).cloned())
    }

    fn create(&mut self, name: &str, initial_balance: u64) -> Result<Account, StoreError> {
        if let Some(existing) = self.accounts.get(name) {
            return Ok(existing.clone());
        }
        let account = Account::new(name, initial_balance);
        self.accounts.insert(name.to_string(), account.clone());
        self.save()?;
        log::info!("created account {:?} with balance {}", name, initial_balance);
        Ok(account)
    }

    fn update(&mut self, account: &Account) -> Result<(), StoreError> {
        self.accounts.insert(account.name.clone(), account.clone());
        self.save()
    }

    fn reset_daily_bests(&mut self) -> Result<(), StoreError> {
        for account in self.accounts.values_mut() {
            account.daily_best = 0;
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tap-dash-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_create_is_fetch_or_create() {
        let mut store = MemoryAccounts::new();
        let mut first = store.create("alice", 100).unwrap();
        first.balance = 42;
        first.high_score = 9;
        store.update(&first).unwrap();

        // Logging in again must not reset the record
        let again = store.create("alice", 100).unwrap();
        assert_eq!(again.balance, 42);
        assert_eq!(again.high_score, 9);
    }

    #[test]
    fn test_reset_daily_bests_spares_high_scores() {
        let mut store = MemoryAccounts::new();
        let mut a = store.create("a", 100).unwrap();
        a.daily_best = 12;
        a.high_score = 30;
        store.update(&a).unwrap();

        store.reset_daily_bests().unwrap();
        let a = store.get("a").unwrap().unwrap();
        assert_eq!(a.daily_best, 0);
        assert_eq!(a.high_score, 30);
    }

    #[test]
    fn test_injected_failure_fires_once() {
        let mut store = MemoryAccounts::new();
        store.fail_next();
        assert!(store.create("a", 100).is_err());
        assert!(store.create("a", 100).is_ok());
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = temp_dir("accounts");
        let _ = fs::remove_dir_all(&dir);

        {
            let mut store = JsonAccounts::open(&dir).unwrap();
            let mut acct = store.create("bob", 100).unwrap();
            acct.balance = 85;
            acct.shields = 2;
            store.update(&acct).unwrap();
        }

        let store = JsonAccounts::open(&dir).unwrap();
        let acct = store.get("bob").unwrap().unwrap();
        assert_eq!(acct.balance, 85);
        assert_eq!(acct.shields, 2);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_json_store_rejects_corrupt_file() {
        let dir = temp_dir("accounts-corrupt");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(ACCOUNTS_FILE), "not json{{").unwrap();

        assert!(matches!(JsonAccounts::open(&dir), Err(StoreError::Corrupt(_))));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_fields_default_on_load() {
        // Records written before power-ups existed still load
        let acct: Account =
            serde_json::from_str(r#"{"name":"old","balance":50}"#).unwrap();
        assert_eq!(acct.balance, 50);
        assert_eq!(acct.daily_best, 0);
        assert_eq!(acct.double_jumps, 0);
        assert_eq!(acct.shields, 0);
    }
}
