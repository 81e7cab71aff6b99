//! One reconciliation pass.

use futures_util::future::join_all;
use serde_json::json;
use std::collections::HashSet;

use crate::chain::{
    lockup_account_id, parse_amount, selected_pool, ChainClient, ChainError, ChainResult,
};
use crate::observability::metrics;
use crate::reconcile::types::{ReconcileReport, ReconcileTotals, ReconciledAccount};
use crate::registry::{AccountEntry, AccountRegistry};

/// Read the lockup and pool balances of every registered account.
///
/// Never fails as a whole: per-account errors end up on the rows.
pub async fn reconcile(
    chain: &dyn ChainClient,
    registry: &AccountRegistry,
    lockup_base: &str,
) -> ReconcileReport {
    let reads = join_all(
        registry
            .entries()
            .iter()
            .map(|entry| reconcile_account(chain, entry.clone(), lockup_base)),
    );
    let (mut accounts, validators) = tokio::join!(reads, chain.active_validators());

    let active = match validators {
        Ok(set) => Some(set),
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch active validators");
            None
        }
    };

    let mut totals = ReconcileTotals::default();
    for account in &mut accounts {
        annotate_pool(account, active.as_ref());
        if let Some(error) = &account.error {
            metrics::record_reconcile_failure();
            tracing::warn!(account_id = %account.entry.account_id, error = %error, "Reconciliation failed");
        }
        totals.add(account);
    }

    tracing::info!(
        accounts = accounts.len(),
        failed = accounts.iter().filter(|a| !a.is_ok()).count(),
        "Reconciliation complete"
    );
    ReconcileReport { accounts, totals }
}

fn annotate_pool(account: &mut ReconciledAccount, active: Option<&HashSet<String>>) {
    account.pool_active = match (&account.staking_pool, active) {
        (Some(pool), Some(set)) => Some(set.contains(pool)),
        _ => None,
    };
}

async fn reconcile_account(
    chain: &dyn ChainClient,
    entry: AccountEntry,
    lockup_base: &str,
) -> ReconciledAccount {
    let lockup_id = lockup_account_id(&entry.account_id, lockup_base);
    let mut row = ReconciledAccount::empty(entry, lockup_id);
    match read_balances(chain, &mut row).await {
        Ok(()) => row,
        Err(e) => ReconciledAccount::failed(row.entry, row.lockup_account_id, e.to_string()),
    }
}

async fn read_balances(chain: &dyn ChainClient, row: &mut ReconciledAccount) -> ChainResult<()> {
    let lockup = row.lockup_account_id.clone();
    let state = match chain.view_account(&lockup).await {
        Ok(state) => state,
        Err(ChainError::NotFound(_)) => return Ok(()),
        Err(e) => return Err(e),
    };
    row.lockup_exists = true;
    row.lockup_balance = state.amount;

    let (pool, deposited) = tokio::try_join!(
        chain.view_function(&lockup, "get_staking_pool_account_id", json!({})),
        chain.view_function(&lockup, "get_known_deposited_balance", json!({})),
    )?;
    row.deposited_balance = parse_amount(&deposited)?;

    let Some(pool) = selected_pool(&pool).map(str::to_string) else {
        return Ok(());
    };

    let args = json!({ "account_id": lockup });
    let (staked, unstaked, available) = tokio::try_join!(
        chain.view_function(&pool, "get_account_staked_balance", args.clone()),
        chain.view_function(&pool, "get_account_unstaked_balance", args.clone()),
        chain.view_function(&pool, "is_account_unstaked_balance_available", args),
    )?;
    row.staked_balance = parse_amount(&staked)?;
    row.unstaked_balance = parse_amount(&unstaked)?;
    row.can_withdraw = available.as_bool().unwrap_or(false);
    row.staking_pool = Some(pool);
    Ok(())
}
