//! Registry entries and the merge rule.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::path::HdPath;

/// Claim that the key at `path` controls `account_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub path: HdPath,
    pub public_key: String,
    pub account_id: String,
}

impl AccountEntry {
    pub fn new(path: HdPath, public_key: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            path,
            public_key: public_key.into(),
            account_id: account_id.into(),
        }
    }
}

/// Append `found` to `existing`, skipping any account id already present
/// (in `existing` or earlier in `found`).
pub fn merge(existing: Vec<AccountEntry>, found: Vec<AccountEntry>) -> Vec<AccountEntry> {
    let mut seen: HashSet<String> = existing.iter().map(|e| e.account_id.clone()).collect();
    let mut merged = existing;
    for entry in found {
        if seen.insert(entry.account_id.clone()) {
            merged.push(entry);
        }
    }
    merged
}
