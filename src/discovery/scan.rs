//! Scan a path range and record every account found.

use crate::chain::PublicKey;
use crate::device::HardwareTransport;
use crate::discovery::prompt::AccountPrompt;
use crate::discovery::resolver::AccountDiscovery;
use crate::error::{StakerError, StakerResult};
use crate::observability::metrics;
use crate::path::{HdPath, PathRange};
use crate::registry::AccountEntry;
use crate::session::Session;

/// A path that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub path: HdPath,
    pub error: String,
}

/// Summary of one completed pass.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Paths the range expanded to.
    pub paths_scanned: usize,
    /// Paths for which the device returned a usable key.
    pub keys_derived: usize,
    pub failures: Vec<ScanFailure>,
    /// Registry entries this pass added, in registry order.
    pub added: Vec<AccountEntry>,
}

/// Walk `range` on the device, resolve the accounts of every derived key and
/// merge them into the session's registry.
///
/// Only one scan may run against a store at a time: the registry is loaded
/// before the walk and written back once after it, so concurrent passes
/// would overwrite each other's additions.
///
/// The range size is checked against `scan.max_paths` before the device is
/// touched. Failures on a single path are recorded in the report and the
/// walk continues. Registry load and save failures abort the pass.
pub async fn scan_range(
    session: &Session,
    transport: &dyn HardwareTransport,
    prompt: &dyn AccountPrompt,
    range: &PathRange,
) -> StakerResult<ScanReport> {
    let count = range.count_paths();
    let limit = session.config().scan.max_paths;
    if count > limit as u128 {
        return Err(StakerError::RangeTooLarge { count, limit });
    }
    tracing::info!(start = %range.start(), end = %range.end(), "Found {} paths", count);

    let mut registry = session.load_registry()?;
    let discovery = AccountDiscovery::new(session.chain(), session.index(), prompt);

    let mut report = ScanReport::default();
    let mut found = Vec::new();
    for path in range.iter() {
        report.paths_scanned += 1;
        match scan_path(transport, &discovery, &path).await {
            Ok((public_key, accounts)) => {
                report.keys_derived += 1;
                metrics::record_path_scanned("ok");
                tracing::info!(
                    path = %path,
                    public_key = %public_key,
                    accounts = accounts.len(),
                    "Path scanned"
                );
                let key_str = public_key.to_string();
                found.extend(
                    accounts
                        .into_iter()
                        .map(|account| AccountEntry::new(path.clone(), key_str.clone(), account)),
                );
            }
            Err(e) => {
                metrics::record_path_scanned("error");
                tracing::warn!(path = %path, error = %e, "Skipping path");
                report.failures.push(ScanFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    report.added = registry.merge_found(found);
    registry.save(session.store())?;
    metrics::record_accounts_added(report.added.len());

    tracing::info!(
        scanned = report.paths_scanned,
        failed = report.failures.len(),
        added = report.added.len(),
        total = registry.len(),
        "Scan complete"
    );
    Ok(report)
}

async fn scan_path(
    transport: &dyn HardwareTransport,
    discovery: &AccountDiscovery<'_>,
    path: &HdPath,
) -> StakerResult<(PublicKey, Vec<String>)> {
    let raw = transport.get_public_key(path).await?;
    let public_key = PublicKey::from_bytes(&raw)?;
    let accounts = discovery.discover(&public_key).await?;
    Ok((public_key, accounts))
}
