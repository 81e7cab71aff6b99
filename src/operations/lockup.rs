//! Signed calls against an account's lockup contract.

use serde_json::{json, Value};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::chain::{
    account_exists, lockup_account_id, selected_pool, FunctionCall, TransactionOutcome,
};
use crate::device::HardwareTransport;
use crate::error::{StakerError, StakerResult};
use crate::registry::AccountEntry;
use crate::session::Session;
use crate::signer::DelegatedSigner;
use crate::storage::LAST_STAKE_TIME_KEY;

/// Point the lockup of `account_id` at `pool_id`.
pub async fn select_pool(
    session: &Session,
    transport: &dyn HardwareTransport,
    account_id: &str,
    pool_id: &str,
) -> StakerResult<TransactionOutcome> {
    let entry = registered(session, account_id)?;
    if !account_exists(session.chain(), pool_id).await? {
        return Err(StakerError::PoolNotFound(pool_id.to_string()));
    }
    let gas = session.config().gas.select_staking_pool;
    submit(
        session,
        transport,
        &entry,
        "select_staking_pool",
        json!({ "staking_pool_account_id": pool_id }),
        gas,
    )
    .await
}

/// Deposit `amount` yoctoNEAR from the lockup into its selected pool.
///
/// Records the stake time on success.
pub async fn stake(
    session: &Session,
    transport: &dyn HardwareTransport,
    account_id: &str,
    amount: u128,
) -> StakerResult<TransactionOutcome> {
    let entry = registered(session, account_id)?;
    let lockup = lockup_for(session, account_id);
    let pool = session
        .chain()
        .view_function(&lockup, "get_staking_pool_account_id", json!({}))
        .await?;
    if selected_pool(&pool).is_none() {
        return Err(StakerError::NoPoolSelected(lockup));
    }

    let gas = session.config().gas.deposit_and_stake;
    let outcome = submit(
        session,
        transport,
        &entry,
        "deposit_and_stake",
        json!({ "amount": amount.to_string() }),
        gas,
    )
    .await?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    session.store().set(LAST_STAKE_TIME_KEY, &now.to_string())?;
    Ok(outcome)
}

/// Ask the pool to unstake `amount` yoctoNEAR held for the lockup.
pub async fn unstake(
    session: &Session,
    transport: &dyn HardwareTransport,
    account_id: &str,
    amount: u128,
) -> StakerResult<TransactionOutcome> {
    let entry = registered(session, account_id)?;
    let gas = session.config().gas.unstake;
    submit(
        session,
        transport,
        &entry,
        "unstake",
        json!({ "amount": amount.to_string() }),
        gas,
    )
    .await
}

/// Move everything withdrawable from the pool back into the lockup.
pub async fn withdraw_all(
    session: &Session,
    transport: &dyn HardwareTransport,
    account_id: &str,
) -> StakerResult<TransactionOutcome> {
    let entry = registered(session, account_id)?;
    let gas = session.config().gas.withdraw_all_from_staking_pool;
    submit(
        session,
        transport,
        &entry,
        "withdraw_all_from_staking_pool",
        json!({}),
        gas,
    )
    .await
}

/// Time since the last successful stake, if one was recorded.
pub fn last_stake_elapsed(session: &Session) -> StakerResult<Option<Duration>> {
    let Some(stored) = session.store().get(LAST_STAKE_TIME_KEY)? else {
        return Ok(None);
    };
    let Ok(secs) = stored.trim().parse::<u64>() else {
        tracing::warn!(value = %stored, "Ignoring unreadable last stake time");
        return Ok(None);
    };
    let then = UNIX_EPOCH + Duration::from_secs(secs);
    Ok(Some(SystemTime::now().duration_since(then).unwrap_or_default()))
}

fn lockup_for(session: &Session, account_id: &str) -> String {
    lockup_account_id(account_id, &session.config().network.lockup_base)
}

fn registered(session: &Session, account_id: &str) -> StakerResult<AccountEntry> {
    session
        .load_registry()?
        .find(account_id)
        .cloned()
        .ok_or_else(|| StakerError::UnknownAccount(account_id.to_string()))
}

/// Bind a signer for `entry` and submit one call to its lockup.
async fn submit(
    session: &Session,
    transport: &dyn HardwareTransport,
    entry: &AccountEntry,
    method_name: &str,
    args: Value,
    gas: u64,
) -> StakerResult<TransactionOutcome> {
    let account_id = entry.account_id.as_str();
    let signer = DelegatedSigner::bind(transport, entry.path.clone(), &entry.public_key)?;
    let call = FunctionCall {
        receiver_id: lockup_for(session, account_id),
        method_name: method_name.to_string(),
        args,
        gas,
        deposit: 0,
    };

    tracing::info!(
        account_id,
        path = %signer.path(),
        lockup = %call.receiver_id,
        method = method_name,
        "Submitting lockup call, confirm on device"
    );
    let outcome = session.chain().function_call(&signer, account_id, call).await?;
    tracing::info!(account_id, method = method_name, hash = %outcome.hash, "Transaction confirmed");
    Ok(outcome)
}
