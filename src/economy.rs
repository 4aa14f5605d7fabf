//! Daily pot, winner tracking, and day settlement
//!
//! Entry fees accumulate in a pot over the day. The best clean score holds
//! the winner slot; at settlement the winner is paid half the pot, the house
//! keeps the rest, and the day starts over.

use crate::store::{AccountStore, StoreError};

/// Current holder of the day's best score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyWinner {
    pub name: String,
    pub score: u32,
}

/// What a settlement paid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub winner: Option<DailyWinner>,
    /// Credits paid to the winner
    pub payout: u64,
    /// Credits kept by the house this settlement
    pub operator_cut: u64,
}

/// The running day's economy. Lives in memory; the pot is money already
/// debited from accounts, so a restart forfeits it to nobody but never
/// double-spends.
#[derive(Debug, Clone, Default)]
pub struct EconomyLedger {
    pub daily_pot: u64,
    pub daily_winner: Option<DailyWinner>,
    /// House earnings across all settlements
    pub operator_take: u64,
}

impl EconomyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry fee to the pot
    pub fn credit_entry(&mut self, fee: u64) {
        self.daily_pot += fee;
        log::info!("pot +{} -> {}", fee, self.daily_pot);
    }

    /// Offer a score for the winner slot. Only a strictly better score takes
    /// it; the first to reach a value keeps it against equals.
    pub fn offer_score(&mut self, name: &str, score: u32) {
        let beats = match &self.daily_winner {
            Some(w) => score > w.score,
            None => score > 0,
        };
        if beats {
            log::info!("daily lead: {} with {}", name, score);
            self.daily_winner = Some(DailyWinner { name: name.to_string(), score });
        }
    }

    /// Close out the day: zero every daily best, pay the winner half the pot
    /// (rounded down), keep the remainder, reset pot and winner.
    ///
    /// The idempotent daily-best reset runs first and the payout credit is
    /// the last fallible write; the ledger is only reset after every store
    /// write has landed. A failed settlement can therefore be retried
    /// without losing the pot and without paying the winner twice.
    pub fn settle(&mut self, accounts: &mut dyn AccountStore) -> Result<Settlement, StoreError> {
        let winner = self.daily_winner.clone();
        let pot = self.daily_pot;

        accounts.reset_daily_bests()?;

        let payout = match &winner {
            Some(w) => match accounts.get(&w.name)? {
                Some(mut acct) => {
                    let payout = pot / 2;
                    acct.balance += payout;
                    accounts.update(&acct)?;
                    log::info!(
                        "day settled: {} wins {} of pot {} (score {})",
                        w.name,
                        payout,
                        pot,
                        w.score
                    );
                    payout
                }
                None => {
                    log::warn!("day winner {:?} has no account, payout skipped", w.name);
                    0
                }
            },
            None => {
                log::info!("day settled with no winner, pot {} held", pot);
                0
            }
        };

        self.operator_take += pot - payout;
        self.daily_pot = 0;
        self.daily_winner = None;

        Ok(Settlement { winner, payout, operator_cut: pot - payout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Account, MemoryAccounts};
    use proptest::prelude::*;

    #[test]
    fn test_odd_pot_rounds_down_for_the_winner() {
        let mut accounts = MemoryAccounts::new();
        accounts.create("alice", 100).unwrap();

        let mut ledger = EconomyLedger::new();
        ledger.daily_pot = 101;
        ledger.offer_score("alice", 12);

        let report = ledger.settle(&mut accounts).unwrap();
        assert_eq!(report.payout, 50);
        assert_eq!(report.operator_cut, 51);
        assert_eq!(accounts.get("alice").unwrap().unwrap().balance, 150);
        assert_eq!(ledger.operator_take, 51);
        assert_eq!(ledger.daily_pot, 0);
        assert!(ledger.daily_winner.is_none());
    }

    #[test]
    fn test_settle_without_winner_holds_the_pot() {
        let mut accounts = MemoryAccounts::new();
        let mut ledger = EconomyLedger::new();
        ledger.daily_pot = 30;

        let report = ledger.settle(&mut accounts).unwrap();
        assert!(report.winner.is_none());
        assert_eq!(report.payout, 0);
        assert_eq!(report.operator_cut, 30);
        assert_eq!(ledger.operator_take, 30);
    }

    #[test]
    fn test_settle_on_an_empty_day_is_a_no_op_beyond_clearing() {
        let mut accounts = MemoryAccounts::new();
        accounts.create("idle", 100).unwrap();

        let mut ledger = EconomyLedger::new();
        let report = ledger.settle(&mut accounts).unwrap();

        assert!(report.winner.is_none());
        assert_eq!(report.payout, 0);
        assert_eq!(report.operator_cut, 0);
        assert_eq!(ledger.operator_take, 0);
        assert_eq!(ledger.daily_pot, 0);
        assert_eq!(accounts.get("idle").unwrap().unwrap().balance, 100);
    }

    #[test]
    fn test_equal_score_does_not_take_the_lead() {
        let mut ledger = EconomyLedger::new();
        ledger.offer_score("first", 10);
        ledger.offer_score("second", 10);
        assert_eq!(ledger.daily_winner.as_ref().unwrap().name, "first");

        ledger.offer_score("second", 11);
        assert_eq!(ledger.daily_winner.as_ref().unwrap().name, "second");
    }

    #[test]
    fn test_zero_score_never_leads() {
        let mut ledger = EconomyLedger::new();
        ledger.offer_score("nobody", 0);
        assert!(ledger.daily_winner.is_none());
    }

    #[test]
    fn test_vanished_winner_forfeits_to_the_house() {
        let mut accounts = MemoryAccounts::new();
        let mut ledger = EconomyLedger::new();
        ledger.daily_pot = 40;
        ledger.offer_score("ghost", 5);

        let report = ledger.settle(&mut accounts).unwrap();
        assert_eq!(report.payout, 0);
        assert_eq!(report.operator_cut, 40);
        // The day still resets
        assert!(ledger.daily_winner.is_none());
        assert_eq!(ledger.daily_pot, 0);
    }

    #[test]
    fn test_settle_resets_daily_bests() {
        let mut accounts = MemoryAccounts::new();
        let mut acct = accounts.create("alice", 100).unwrap();
        acct.daily_best = 12;
        acct.high_score = 12;
        accounts.update(&acct).unwrap();

        let mut ledger = EconomyLedger::new();
        ledger.settle(&mut accounts).unwrap();

        let acct = accounts.get("alice").unwrap().unwrap();
        assert_eq!(acct.daily_best, 0);
        assert_eq!(acct.high_score, 12);
    }

    #[test]
    fn test_failed_settlement_preserves_the_pot() {
        let mut accounts = MemoryAccounts::new();
        accounts.create("alice", 100).unwrap();

        let mut ledger = EconomyLedger::new();
        ledger.daily_pot = 60;
        ledger.offer_score("alice", 8);

        accounts.fail_next();
        assert!(ledger.settle(&mut accounts).is_err());
        // Nothing was reset; a retry can still pay out
        assert_eq!(ledger.daily_pot, 60);
        assert!(ledger.daily_winner.is_some());
        assert_eq!(ledger.operator_take, 0);

        let report = ledger.settle(&mut accounts).unwrap();
        assert_eq!(report.payout, 30);
        assert_eq!(accounts.get("alice").unwrap().unwrap().balance, 130);
    }

    /// Passes everything through to a `MemoryAccounts` but refuses a chosen
    /// number of calls, so a settlement can be made to die part-way through.
    #[derive(Default)]
    struct FlakyAccounts {
        inner: MemoryAccounts,
        refuse_resets: u32,
        refuse_updates: u32,
    }

    impl AccountStore for FlakyAccounts {
        fn get(&self, name: &str) -> Result<Option<Account>, StoreError> {
            self.inner.get(name)
        }

        fn create(&mut self, name: &str, initial_balance: u64) -> Result<Account, StoreError> {
            self.inner.create(name, initial_balance)
        }

        fn update(&mut self, account: &Account) -> Result<(), StoreError> {
            if self.refuse_updates > 0 {
                self.refuse_updates -= 1;
                return Err(StoreError::Unavailable("update refused".into()));
            }
            self.inner.update(account)
        }

        fn reset_daily_bests(&mut self) -> Result<(), StoreError> {
            if self.refuse_resets > 0 {
                self.refuse_resets -= 1;
                return Err(StoreError::Unavailable("reset refused".into()));
            }
            self.inner.reset_daily_bests()
        }
    }

    #[test]
    fn test_retry_after_failed_reset_pays_only_once() {
        let mut accounts = FlakyAccounts { refuse_resets: 1, ..Default::default() };
        accounts.create("alice", 100).unwrap();

        let mut ledger = EconomyLedger::new();
        ledger.daily_pot = 100;
        ledger.offer_score("alice", 9);

        // The reset dies before any credit lands
        assert!(ledger.settle(&mut accounts).is_err());
        assert_eq!(accounts.get("alice").unwrap().unwrap().balance, 100);
        assert_eq!(ledger.daily_pot, 100);
        assert!(ledger.daily_winner.is_some());

        let report = ledger.settle(&mut accounts).unwrap();
        assert_eq!(report.payout, 50);
        assert_eq!(accounts.get("alice").unwrap().unwrap().balance, 150);
        assert_eq!(ledger.operator_take, 50);
        assert_eq!(ledger.daily_pot, 0);
    }

    #[test]
    fn test_retry_after_failed_credit_pays_only_once() {
        let mut accounts = FlakyAccounts { refuse_updates: 1, ..Default::default() };
        accounts.create("alice", 100).unwrap();

        let mut ledger = EconomyLedger::new();
        ledger.daily_pot = 100;
        ledger.offer_score("alice", 9);

        // Bests were zeroed but the credit itself never landed
        assert!(ledger.settle(&mut accounts).is_err());
        assert_eq!(accounts.get("alice").unwrap().unwrap().balance, 100);
        assert_eq!(ledger.daily_pot, 100);

        let report = ledger.settle(&mut accounts).unwrap();
        assert_eq!(report.payout, 50);
        assert_eq!(accounts.get("alice").unwrap().unwrap().balance, 150);
        assert_eq!(ledger.operator_take, 50);
    }

    proptest! {
        #[test]
        fn test_payout_and_cut_always_sum_to_the_pot(pot in 0u64..100_000) {
            let mut accounts = MemoryAccounts::new();
            accounts.create("p", 0).unwrap();

            let mut ledger = EconomyLedger::new();
            ledger.daily_pot = pot;
            ledger.offer_score("p", 1);

            let report = ledger.settle(&mut accounts).unwrap();
            prop_assert_eq!(report.payout + report.operator_cut, pot);
            let balance = accounts.get("p").unwrap().unwrap().balance;
            prop_assert_eq!(balance, report.payout);
        }
    }
}
