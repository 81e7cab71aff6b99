//! Reconciliation report types.

use serde::Serialize;

use crate::registry::AccountEntry;

/// Balances of one registered account's lockup, read at a single point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledAccount {
    pub entry: AccountEntry,
    pub lockup_account_id: String,
    pub lockup_exists: bool,
    /// Liquid lockup balance in yoctoNEAR.
    pub lockup_balance: u128,
    /// Amount the lockup believes it deposited in its pool.
    pub deposited_balance: u128,
    pub staked_balance: u128,
    pub unstaked_balance: u128,
    pub staking_pool: Option<String>,
    /// `None` when the validator set could not be fetched.
    pub pool_active: Option<bool>,
    pub can_withdraw: bool,
    /// Set when a read failed; all amounts are zero then.
    pub error: Option<String>,
}

impl ReconciledAccount {
    /// Row with nothing read yet.
    pub fn empty(entry: AccountEntry, lockup_account_id: String) -> Self {
        Self {
            entry,
            lockup_account_id,
            lockup_exists: false,
            lockup_balance: 0,
            deposited_balance: 0,
            staked_balance: 0,
            unstaked_balance: 0,
            staking_pool: None,
            pool_active: None,
            can_withdraw: false,
            error: None,
        }
    }

    /// Row for an account whose reads failed.
    pub fn failed(entry: AccountEntry, lockup_account_id: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::empty(entry, lockup_account_id)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Sums over the accounts whose reads succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileTotals {
    pub total_available: u128,
    pub total_staked: u128,
    pub total_unstaked: u128,
}

impl ReconcileTotals {
    pub fn add(&mut self, account: &ReconciledAccount) {
        if !account.is_ok() {
            return;
        }
        self.total_available = self.total_available.saturating_add(account.lockup_balance);
        self.total_staked = self.total_staked.saturating_add(account.staked_balance);
        self.total_unstaked = self.total_unstaked.saturating_add(account.unstaked_balance);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub accounts: Vec<ReconciledAccount>,
    pub totals: ReconcileTotals,
}

impl ReconcileReport {
    pub fn failures(&self) -> impl Iterator<Item = &ReconciledAccount> {
        self.accounts.iter().filter(|a| !a.is_ok())
    }
}
