//! Single-account ledger.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use misty_core::{
    Amount, Collaborator, CollaboratorError, Transaction, TransactionId, TransactionKind,
};
use misty_telemetry::Metrics;

use crate::config::WalletConfig;
use crate::error::{WalletError, WalletResult};
use crate::id::{Clock, SystemClock, TransactionIdGenerator};

/// Balance and log, always mutated together under one lock.
#[derive(Default)]
struct Account {
    balance: Amount,
    transactions: Vec<Transaction>,
}

/// In-memory ledger for a single account.
///
/// Thread-safe: share via `Arc<Ledger>`.
pub struct Ledger {
    config: WalletConfig,
    account: Mutex<Account>,
    ids: TransactionIdGenerator,
    initialized: AtomicBool,
}

impl Ledger {
    pub fn new(config: WalletConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a ledger whose ids and timestamps come from `clock`.
    pub fn with_clock(config: WalletConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            account: Mutex::new(Account::default()),
            ids: TransactionIdGenerator::new(clock),
            initialized: AtomicBool::new(false),
        }
    }

    /// Credit the account. Returns the new balance.
    ///
    /// Fails without touching balance or history if the new balance would
    /// exceed the decimal range.
    pub fn deposit(&self, amount: Decimal) -> WalletResult<Amount> {
        let amount = self.validate(amount)?;

        let outcome = {
            let mut account = self.account.lock();
            match account.balance.checked_add(amount) {
                Some(balance) => {
                    let id = self.commit(&mut account, TransactionKind::Deposit, amount, balance);
                    Ok((balance, id))
                }
                None => Err(WalletError::BalanceOverflow {
                    requested: amount,
                    available: account.balance,
                }),
            }
        };
        let (balance, id) = outcome.map_err(|e| self.reject(e))?;

        info!(
            txn_id = %id,
            amount = %amount,
            balance = %balance,
            currency = %self.config.currency,
            "Deposit recorded"
        );
        Metrics::wallet_transaction(TransactionKind::Deposit.as_str(), balance.to_f64());
        Ok(balance)
    }

    /// Debit the account. Returns the new balance.
    ///
    /// Fails without touching balance or history if `amount` exceeds the
    /// current balance.
    pub fn withdraw(&self, amount: Decimal) -> WalletResult<Amount> {
        let amount = self.validate(amount)?;

        let outcome = {
            let mut account = self.account.lock();
            match account.balance.checked_sub(amount) {
                Some(balance) => {
                    let id =
                        self.commit(&mut account, TransactionKind::Withdrawal, amount, balance);
                    Ok((balance, id))
                }
                None => Err(WalletError::InsufficientBalance {
                    requested: amount,
                    available: account.balance,
                }),
            }
        };

        match outcome {
            Ok((balance, id)) => {
                info!(
                    txn_id = %id,
                    amount = %amount,
                    balance = %balance,
                    currency = %self.config.currency,
                    "Withdrawal recorded"
                );
                Metrics::wallet_transaction(TransactionKind::Withdrawal.as_str(), balance.to_f64());
                Ok(balance)
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Current balance.
    pub fn balance(&self) -> Amount {
        self.account.lock().balance
    }

    /// Ordered copy of the transaction log.
    pub fn history(&self) -> Vec<Transaction> {
        self.account.lock().transactions.clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.account.lock().transactions.len()
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Produce a process-unique transaction id.
    pub fn generate_transaction_id(&self) -> TransactionId {
        self.ids.next_id()
    }

    fn validate(&self, amount: Decimal) -> WalletResult<Amount> {
        Amount::positive(amount).map_err(|_| self.reject(WalletError::InvalidAmount { amount }))
    }

    fn reject(&self, error: WalletError) -> WalletError {
        warn!(reason = error.reason(), error = %error, "Wallet mutation rejected");
        Metrics::wallet_rejected(error.reason());
        error
    }

    /// Apply a balance change and append its record. Caller holds the lock.
    fn commit(
        &self,
        account: &mut Account,
        kind: TransactionKind,
        amount: Amount,
        new_balance: Amount,
    ) -> TransactionId {
        let id = self.generate_transaction_id();
        let timestamp = self.next_timestamp(account);
        account.balance = new_balance;
        account
            .transactions
            .push(Transaction::new(id.clone(), kind, amount, timestamp));
        id
    }

    /// Clock time, clamped so the log never goes backwards.
    fn next_timestamp(&self, account: &Account) -> DateTime<Utc> {
        let now = Utc
            .timestamp_millis_opt(self.ids.clock().now_ms() as i64)
            .single()
            .unwrap_or_else(Utc::now);
        match account.transactions.last() {
            Some(last) if last.timestamp() > now => last.timestamp(),
            _ => now,
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(WalletConfig::default())
    }
}

#[async_trait]
impl Collaborator for Ledger {
    fn name(&self) -> &'static str {
        "wallet"
    }

    /// Wallet initialization step of bot startup.
    async fn start(&self) -> Result<(), CollaboratorError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("Wallet already initialized");
            return Ok(());
        }
        info!(
            currency = %self.config.currency,
            balance = %self.balance(),
            transactions = self.transaction_count(),
            "Wallet initialized"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}
